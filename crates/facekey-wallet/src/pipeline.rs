//! Registration and login orchestration.
//!
//! Registration: binarize → lock a fresh key → derive the signer
//! address (password) and recovery address (recovery secret) → emit
//! both plus the helper bundle for the account system.
//!
//! Login: binarize → reproduce the key from the stored helper → derive
//! with the presented password → compare against the registered
//! signer. Reproduction succeeding with a wrong password is still an
//! authentication failure, never partial success.

use crate::derive::{derive_wallet, WalletError, WalletKey};
use facekey_core::{binarize, TemplateError};
use facekey_extractor::{ExtractorConfig, ExtractorError, FuzzyExtractor, HelperBundle};
use rand::{CryptoRng, RngCore};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AuthError {
    #[error(transparent)]
    Template(#[from] TemplateError),
    #[error(transparent)]
    Wallet(#[from] WalletError),
    #[error(transparent)]
    Extractor(ExtractorError),
    #[error("biometric probe did not reproduce the key")]
    ReproductionFailed,
    #[error("derived address does not match the registered signer")]
    AddressMismatch,
}

impl From<ExtractorError> for AuthError {
    fn from(err: ExtractorError) -> Self {
        match err {
            ExtractorError::ReproductionFailed => AuthError::ReproductionFailed,
            other => AuthError::Extractor(other),
        }
    }
}

/// Everything the account system needs to create a wallet for a new
/// user. The symmetric key and both secrets never leave `register`.
#[derive(Debug, Clone)]
pub struct Registration {
    /// Address derived from (key, password).
    pub signer: String,
    /// Address derived from (key, recovery secret).
    pub recovery_signer: String,
    /// Public helper data to persist for later logins.
    pub helper: HelperBundle,
}

/// Synchronous, stateless orchestration over one extractor config.
///
/// Each call is independent; the pipeline caches nothing and is safe
/// to share read-only across sessions.
#[derive(Debug, Clone, Copy)]
pub struct AuthPipeline {
    extractor: FuzzyExtractor,
}

impl AuthPipeline {
    pub fn new(config: ExtractorConfig) -> Self {
        Self {
            extractor: FuzzyExtractor::new(config),
        }
    }

    pub fn config(&self) -> &ExtractorConfig {
        self.extractor.config()
    }

    /// Enroll a user from one capture.
    ///
    /// # Errors
    /// Propagates binarization, extraction, and derivation errors;
    /// `WalletError::InvalidSecret` if either secret is empty.
    pub fn register<R>(
        &self,
        vector: &[f32],
        password: &str,
        recovery_secret: &str,
        rng: &mut R,
    ) -> Result<Registration, AuthError>
    where
        R: RngCore + CryptoRng,
    {
        let template = binarize(vector, self.config().len())?;
        let (key, helper) = self.extractor.generate(&template, rng)?;

        let signer_wallet = derive_wallet(key.as_bytes(), password)?;
        let recovery_wallet = derive_wallet(key.as_bytes(), recovery_secret)?;

        log::debug!("registered signer {}", signer_wallet.address());
        Ok(Registration {
            signer: signer_wallet.address().to_string(),
            recovery_signer: recovery_wallet.address().to_string(),
            helper,
        })
    }

    /// Authenticate a user from one capture and hand back the session
    /// wallet key on success.
    ///
    /// No retries happen inside this call; the caller may re-capture
    /// and invoke again, each attempt independent.
    ///
    /// # Errors
    /// `ReproductionFailed` if no locker slot unlocks;
    /// `AddressMismatch` if the key reproduces but the password does
    /// not derive the registered signer.
    pub fn login(
        &self,
        vector: &[f32],
        helper: &HelperBundle,
        password: &str,
        expected_signer: &str,
    ) -> Result<WalletKey, AuthError> {
        let template = binarize(vector, self.config().len())?;
        let key = self.extractor.reproduce(&template, helper)?;
        let wallet = derive_wallet(key.as_bytes(), password)?;

        // EIP-55 is case-folded encoding of the same bytes, so the
        // comparison must ignore case.
        if !wallet.address().eq_ignore_ascii_case(expected_signer) {
            log::warn!("address mismatch after successful key reproduction");
            return Err(AuthError::AddressMismatch);
        }

        Ok(wallet)
    }
}
