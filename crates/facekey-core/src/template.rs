//! Fixed-length bit templates derived from biometric captures.

use std::fmt;
use zeroize::Zeroize;

/// A packed bit template of fixed byte length.
///
/// Derived from one capture, compared against nothing directly —
/// matching happens inside the fuzzy extractor. The underlying bytes
/// are wiped when the template is dropped, since the bit pattern is
/// biometric-derived.
#[derive(Clone, PartialEq, Eq)]
pub struct BinaryTemplate {
    bytes: Vec<u8>,
}

impl BinaryTemplate {
    /// Wrap raw packed bits.
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        Self { bytes }
    }

    /// Template length in bytes.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Whether the template holds no bytes.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// The packed bits, MSB-first within each byte.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Number of differing bit positions between two templates.
    ///
    /// Returns `None` if the templates have different lengths.
    pub fn hamming_distance(&self, other: &Self) -> Option<u32> {
        if self.bytes.len() != other.bytes.len() {
            return None;
        }
        Some(
            self.bytes
                .iter()
                .zip(&other.bytes)
                .map(|(a, b)| (a ^ b).count_ones())
                .sum(),
        )
    }

    /// Flip a single bit, indexed MSB-first from bit 0.
    ///
    /// Used by noise-tolerance tests to simulate sensor jitter.
    pub fn flip_bit(&mut self, bit: usize) {
        assert!(bit < self.bytes.len() * 8, "bit index out of range");
        self.bytes[bit / 8] ^= 1 << (7 - bit % 8);
    }
}

impl fmt::Debug for BinaryTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BinaryTemplate(")?;
        for b in &self.bytes {
            write!(f, "{:02x}", b)?;
        }
        write!(f, ")")
    }
}

impl Drop for BinaryTemplate {
    fn drop(&mut self) {
        self.bytes.zeroize();
    }
}
