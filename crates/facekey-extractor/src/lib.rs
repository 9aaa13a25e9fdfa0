//! FaceKey Fuzzy Extractor
//!
//! Turns a noisy binary template into a stable symmetric key using
//! public, non-secret helper data.
//!
//! # Scheme
//!
//! At enrollment, [`FuzzyExtractor::generate`] draws a random key and
//! locks it into `num_helpers` independent locker slots. Each slot
//! masks the template with a random bit mask, stretches the masked
//! value with a salt-keyed KDF, and XORs the result over
//! `key ‖ zero-checksum`. At login, [`FuzzyExtractor::reproduce`]
//! retries every slot with the fresh template; a slot whose checksum
//! tail comes out all-zero yields the key.
//!
//! Bit positions zeroed by a slot's mask are absorbed for that slot,
//! so a probe within the configured Hamming budget unlocks at least
//! one slot with probability ≥ `1 - rep_err`.
//!
//! This is a brute-force trial-match construction, not an
//! error-correcting code, and the reliability formula behind
//! `num_helpers` is a heuristic knob rather than a proven bound.
//!
//! # Example
//!
//! ```
//! use facekey_core::binarize;
//! use facekey_extractor::{ExtractorConfig, FuzzyExtractor};
//!
//! let config = ExtractorConfig::new(16, 2).unwrap();
//! let extractor = FuzzyExtractor::new(config);
//!
//! let vector: Vec<f32> = (0..128).map(|i| (i as f32) - 63.5).collect();
//! let template = binarize(&vector, 16).unwrap();
//!
//! let (key, helper) = extractor
//!     .generate(&template, &mut rand::rngs::OsRng)
//!     .unwrap();
//! let recovered = extractor.reproduce(&template, &helper).unwrap();
//! assert_eq!(key, recovered);
//! ```

pub mod config;
pub mod extractor;
pub mod helper;

pub use config::{ExtractorConfig, ExtractorOptions, HashFn};
pub use extractor::{FuzzyExtractor, SymmetricKey};
pub use helper::{HelperBundle, LockerSlot, HELPER_FORMAT_VERSION};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExtractorError {
    #[error("invalid extractor config: {0}")]
    InvalidConfig(String),
    #[error("template length mismatch: got {got} bytes, expected {expected}")]
    TemplateLength { got: usize, expected: usize },
    #[error("malformed helper bundle: {0}")]
    InvalidBundle(String),
    #[error("unsupported helper bundle version {0}")]
    UnsupportedVersion(u32),
    #[error("no locker slot unlocked with the presented template")]
    ReproductionFailed,
}
