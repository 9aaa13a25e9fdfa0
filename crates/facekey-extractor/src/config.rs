//! Extractor parameters, fixed at construction.

use crate::ExtractorError;
use serde::{Deserialize, Serialize};

/// KDF hash function used inside locker slots.
///
/// Only SHA-256 is defined for format version 1. The enum exists so a
/// future version bump can change the hash without silently breaking
/// old helper bundles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum HashFn {
    #[default]
    Sha256,
}

/// Tunable knobs with conventional defaults.
#[derive(Debug, Clone, Copy)]
pub struct ExtractorOptions {
    /// Target probability that reproduction fails for a genuine match.
    pub rep_err: f64,
    /// Checksum bytes appended to the key before locking.
    pub sec_len: usize,
    /// Per-slot KDF salt length in bytes.
    pub nonce_len: usize,
    /// Locker KDF hash.
    pub hash: HashFn,
}

impl Default for ExtractorOptions {
    fn default() -> Self {
        Self {
            rep_err: 1e-3,
            sec_len: 2,
            nonce_len: 16,
            hash: HashFn::Sha256,
        }
    }
}

/// Immutable fuzzy-extractor parameters.
///
/// `num_helpers` balances reliability against helper size and
/// generate/reproduce cost:
///
/// ```text
/// bits        = len * 8
/// exponent    = ham_err / ln(bits)
/// num_helpers = round(bits^exponent * log2(2 / rep_err))
/// ```
///
/// More tolerated bit flips (`ham_err`) or a lower failure target
/// (`rep_err`) both push the slot count up. The formula is a heuristic
/// reliability estimate, not a proven security bound.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ExtractorConfig {
    len: usize,
    ham_err: usize,
    rep_err: f64,
    sec_len: usize,
    nonce_len: usize,
    hash: HashFn,
    cipher_len: usize,
    num_helpers: usize,
}

impl ExtractorConfig {
    /// Build a config with default options (`rep_err` 1e-3, 2 checksum
    /// bytes, 16-byte nonces, SHA-256).
    pub fn new(len: usize, ham_err: usize) -> Result<Self, ExtractorError> {
        Self::with_options(len, ham_err, ExtractorOptions::default())
    }

    /// Build a config with explicit options.
    pub fn with_options(
        len: usize,
        ham_err: usize,
        options: ExtractorOptions,
    ) -> Result<Self, ExtractorError> {
        if len == 0 {
            return Err(ExtractorError::InvalidConfig(
                "key length must be at least 1 byte".into(),
            ));
        }
        if ham_err > len * 8 {
            return Err(ExtractorError::InvalidConfig(format!(
                "ham_err {} exceeds template size of {} bits",
                ham_err,
                len * 8
            )));
        }
        if !(options.rep_err > 0.0 && options.rep_err < 2.0) {
            return Err(ExtractorError::InvalidConfig(format!(
                "rep_err must lie in (0, 2), got {}",
                options.rep_err
            )));
        }
        if options.sec_len == 0 {
            return Err(ExtractorError::InvalidConfig(
                "sec_len must be at least 1 byte".into(),
            ));
        }
        if options.nonce_len < 8 {
            return Err(ExtractorError::InvalidConfig(
                "nonce_len must be at least 8 bytes".into(),
            ));
        }

        let bits = (len * 8) as f64;
        let exponent = ham_err as f64 / bits.ln();
        let raw = bits.powf(exponent) * (2.0 / options.rep_err).log2();
        let num_helpers = raw.round() as usize;
        if num_helpers == 0 {
            return Err(ExtractorError::InvalidConfig(
                "parameters yield zero locker slots".into(),
            ));
        }

        Ok(Self {
            len,
            ham_err,
            rep_err: options.rep_err,
            sec_len: options.sec_len,
            nonce_len: options.nonce_len,
            hash: options.hash,
            cipher_len: len + options.sec_len,
            num_helpers,
        })
    }

    /// Key / template length in bytes.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Maximum tolerated bit-flip count for a genuine probe.
    pub fn ham_err(&self) -> usize {
        self.ham_err
    }

    /// Target reproduction-failure probability.
    pub fn rep_err(&self) -> f64 {
        self.rep_err
    }

    /// Checksum tail length in bytes.
    pub fn sec_len(&self) -> usize {
        self.sec_len
    }

    /// Per-slot nonce length in bytes.
    pub fn nonce_len(&self) -> usize {
        self.nonce_len
    }

    /// Locker KDF hash.
    pub fn hash(&self) -> HashFn {
        self.hash
    }

    /// Locked value length: key plus checksum tail.
    pub fn cipher_len(&self) -> usize {
        self.cipher_len
    }

    /// Number of independent locker slots per bundle.
    pub fn num_helpers(&self) -> usize {
        self.num_helpers
    }
}
