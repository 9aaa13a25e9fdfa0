//! Locker generation and key reproduction.

use crate::helper::{HelperBundle, LockerSlot};
use crate::{ExtractorConfig, ExtractorError, HashFn};
use facekey_core::BinaryTemplate;
use pbkdf2::pbkdf2_hmac;
use rand::{CryptoRng, RngCore};
use sha2::Sha256;
use std::fmt;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Locker KDF iteration count. One iteration: the KDF acts as a
/// salt-keyed compression of the masked template, not as password
/// stretching — the template is not a low-entropy password.
const KDF_ITERATIONS: u32 = 1;

/// The extracted symmetric key. Wiped on drop; never persisted.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct SymmetricKey(Vec<u8>);

impl SymmetricKey {
    fn new(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for SymmetricKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SymmetricKey(<{} bytes>)", self.0.len())
    }
}

/// Stateless generate/reproduce over a fixed [`ExtractorConfig`].
///
/// Safe to share across threads; every call is independent.
#[derive(Debug, Clone, Copy)]
pub struct FuzzyExtractor {
    config: ExtractorConfig,
}

impl FuzzyExtractor {
    pub fn new(config: ExtractorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ExtractorConfig {
        &self.config
    }

    /// Enroll a template: draw a fresh key and lock it into
    /// `num_helpers` independent slots.
    ///
    /// Returns the key (for immediate derivation, never storage) and
    /// the helper bundle (for persistence).
    ///
    /// # Errors
    /// `TemplateLength` if the template does not match the configured
    /// key length.
    pub fn generate<R>(
        &self,
        template: &BinaryTemplate,
        rng: &mut R,
    ) -> Result<(SymmetricKey, HelperBundle), ExtractorError>
    where
        R: RngCore + CryptoRng,
    {
        let cfg = &self.config;
        self.check_template(template)?;

        let mut key = vec![0u8; cfg.len()];
        rng.fill_bytes(&mut key);

        // key_pad = key || zero-checksum; the zero tail is what
        // reproduce() looks for to recognize an unlocked slot.
        let mut key_pad = vec![0u8; cfg.cipher_len()];
        key_pad[..cfg.len()].copy_from_slice(&key);

        let mut slots = Vec::with_capacity(cfg.num_helpers());
        let mut masked = vec![0u8; cfg.len()];
        let mut digest = vec![0u8; cfg.cipher_len()];
        for _ in 0..cfg.num_helpers() {
            let mut nonce = vec![0u8; cfg.nonce_len()];
            rng.fill_bytes(&mut nonce);
            let mut mask = vec![0u8; cfg.len()];
            rng.fill_bytes(&mut mask);

            apply_mask(&mask, template.as_bytes(), &mut masked);
            locker_kdf(cfg.hash(), &masked, &nonce, &mut digest);

            let cipher = digest
                .iter()
                .zip(&key_pad)
                .map(|(d, k)| d ^ k)
                .collect::<Vec<u8>>();
            slots.push(LockerSlot { cipher, mask, nonce });
        }

        masked.zeroize();
        digest.zeroize();
        key_pad.zeroize();

        log::debug!("generated helper bundle with {} locker slots", slots.len());
        Ok((SymmetricKey::new(key), HelperBundle::from_slots(slots)))
    }

    /// Retry every locker slot with a fresh probe template.
    ///
    /// Slots are scanned in bundle order; the first slot whose
    /// checksum tail decrypts to all zeros yields the key. The scan is
    /// fully deterministic for fixed inputs.
    ///
    /// # Errors
    /// `ReproductionFailed` when no slot unlocks — an expected outcome
    /// for a probe outside the noise budget, not a crash.
    pub fn reproduce(
        &self,
        template: &BinaryTemplate,
        bundle: &HelperBundle,
    ) -> Result<SymmetricKey, ExtractorError> {
        let cfg = &self.config;
        self.check_template(template)?;

        let mut masked = vec![0u8; cfg.len()];
        let mut digest = vec![0u8; cfg.cipher_len()];
        for (i, slot) in bundle.slots().iter().enumerate() {
            if slot.mask.len() != cfg.len()
                || slot.cipher.len() != cfg.cipher_len()
                || slot.nonce.len() != cfg.nonce_len()
            {
                return Err(ExtractorError::InvalidBundle(format!(
                    "slot {} does not match the extractor config",
                    i
                )));
            }

            apply_mask(&slot.mask, template.as_bytes(), &mut masked);
            locker_kdf(cfg.hash(), &masked, &slot.nonce, &mut digest);

            let mut plain = digest
                .iter()
                .zip(&slot.cipher)
                .map(|(d, c)| d ^ c)
                .collect::<Vec<u8>>();

            if plain[cfg.len()..].iter().all(|&b| b == 0) {
                log::debug!("locker slot {} unlocked", i);
                plain.truncate(cfg.len());
                masked.zeroize();
                digest.zeroize();
                return Ok(SymmetricKey::new(plain));
            }
            plain.zeroize();
        }

        masked.zeroize();
        digest.zeroize();
        log::debug!(
            "no locker slot unlocked after {} trials",
            bundle.slots().len()
        );
        Err(ExtractorError::ReproductionFailed)
    }

    fn check_template(&self, template: &BinaryTemplate) -> Result<(), ExtractorError> {
        if template.len() != self.config.len() {
            return Err(ExtractorError::TemplateLength {
                got: template.len(),
                expected: self.config.len(),
            });
        }
        Ok(())
    }
}

/// Bytewise `mask & template`. Bits the mask zeroes are absorbed for
/// that slot, which is the entire noise-tolerance mechanism.
fn apply_mask(mask: &[u8], template: &[u8], out: &mut [u8]) {
    for ((o, &m), &t) in out.iter_mut().zip(mask).zip(template) {
        *o = m & t;
    }
}

/// Salt-keyed, fixed-output compression of the masked template.
fn locker_kdf(hash: HashFn, masked: &[u8], nonce: &[u8], out: &mut [u8]) {
    match hash {
        HashFn::Sha256 => pbkdf2_hmac::<Sha256>(masked, nonce, KDF_ITERATIONS, out),
    }
}
