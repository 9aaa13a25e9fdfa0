//! Persisted helper data.
//!
//! The helper bundle is the public artifact of enrollment: one
//! (cipher, mask, nonce) triple per locker slot. It is stored by the
//! backend and round-tripped as JSON with hex-encoded byte strings,
//! matching the account record the backend keeps per user. Leaking it
//! is assumed not to reveal the key faster than brute force, but that
//! margin is a heuristic — see the crate docs.

use crate::{ExtractorConfig, ExtractorError};
use serde::{Deserialize, Serialize};

/// Current helper-data format version.
///
/// The version is written into every serialized bundle so parameter
/// changes (key length, checksum size, KDF hash) can be detected
/// instead of silently failing to reproduce.
pub const HELPER_FORMAT_VERSION: u32 = 1;

/// One independent locker slot: a locked key copy plus the mask and
/// KDF salt needed to retry it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LockerSlot {
    /// `KDF(mask & template, nonce) XOR (key ‖ zero-checksum)`.
    pub cipher: Vec<u8>,
    /// Random bit mask applied to the template before the KDF.
    pub mask: Vec<u8>,
    /// Per-slot KDF salt.
    pub nonce: Vec<u8>,
}

/// The full set of locker slots produced by one enrollment.
///
/// Immutable after generation; non-secret.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HelperBundle {
    version: u32,
    slots: Vec<LockerSlot>,
}

/// Wire form: three parallel arrays of hex strings, as stored by the
/// account backend.
#[derive(Serialize, Deserialize)]
struct HelperBundleWire {
    version: u32,
    ciphers: Vec<String>,
    masks: Vec<String>,
    nonces: Vec<String>,
}

impl HelperBundle {
    pub(crate) fn from_slots(slots: Vec<LockerSlot>) -> Self {
        Self {
            version: HELPER_FORMAT_VERSION,
            slots,
        }
    }

    /// Format version this bundle was produced with.
    pub fn version(&self) -> u32 {
        self.version
    }

    /// Locker slots in generation order.
    pub fn slots(&self) -> &[LockerSlot] {
        &self.slots
    }

    /// Serialize for storage.
    pub fn to_json(&self) -> String {
        let wire = HelperBundleWire {
            version: self.version,
            ciphers: self.slots.iter().map(|s| hex::encode(&s.cipher)).collect(),
            masks: self.slots.iter().map(|s| hex::encode(&s.mask)).collect(),
            nonces: self.slots.iter().map(|s| hex::encode(&s.nonce)).collect(),
        };
        serde_json::to_string(&wire).expect("helper bundle serialization cannot fail")
    }

    /// Parse a stored bundle and validate its shape against `config`.
    ///
    /// # Errors
    /// `UnsupportedVersion` for a version we do not read;
    /// `InvalidBundle` for malformed JSON, disagreeing array lengths,
    /// or per-slot byte lengths that do not match the config.
    pub fn from_json(json: &str, config: &ExtractorConfig) -> Result<Self, ExtractorError> {
        let wire: HelperBundleWire = serde_json::from_str(json)
            .map_err(|e| ExtractorError::InvalidBundle(e.to_string()))?;

        if wire.version != HELPER_FORMAT_VERSION {
            return Err(ExtractorError::UnsupportedVersion(wire.version));
        }
        if wire.ciphers.len() != wire.masks.len() || wire.ciphers.len() != wire.nonces.len() {
            return Err(ExtractorError::InvalidBundle(format!(
                "slot arrays disagree: {} ciphers, {} masks, {} nonces",
                wire.ciphers.len(),
                wire.masks.len(),
                wire.nonces.len()
            )));
        }
        if wire.ciphers.is_empty() {
            return Err(ExtractorError::InvalidBundle("bundle has no slots".into()));
        }

        let decode = |field: &str, s: &str, expected: usize| -> Result<Vec<u8>, ExtractorError> {
            let bytes = hex::decode(s)
                .map_err(|e| ExtractorError::InvalidBundle(format!("bad hex in {}: {}", field, e)))?;
            if bytes.len() != expected {
                return Err(ExtractorError::InvalidBundle(format!(
                    "{} has {} bytes, expected {}",
                    field,
                    bytes.len(),
                    expected
                )));
            }
            Ok(bytes)
        };

        let mut slots = Vec::with_capacity(wire.ciphers.len());
        for i in 0..wire.ciphers.len() {
            slots.push(LockerSlot {
                cipher: decode("cipher", &wire.ciphers[i], config.cipher_len())?,
                mask: decode("mask", &wire.masks[i], config.len())?,
                nonce: decode("nonce", &wire.nonces[i], config.nonce_len())?,
            });
        }

        Ok(Self {
            version: wire.version,
            slots,
        })
    }
}
