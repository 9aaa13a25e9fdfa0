//! Sign-based binarization of face descriptors.
//!
//! The capture layer hands us a fixed-dimension float vector. We
//! L2-normalize it and keep one bit per component: 1 if the component
//! is non-negative, 0 otherwise. Normalizing by a positive scalar never
//! changes a sign, so the bit pattern is stable under overall gain
//! changes in the descriptor.

use crate::template::BinaryTemplate;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TemplateError {
    #[error("feature vector is empty")]
    EmptyVector,
    #[error("feature vector too short: {got} components, need at least {need}")]
    VectorTooShort { got: usize, need: usize },
    #[error("template length must be at least 1 byte")]
    ZeroLength,
}

/// Binarize a feature vector into a packed template of `length` bytes.
///
/// The first `8 * length` components each contribute one bit: bit `i`
/// lands in byte `i / 8`, shifted into position `7 - i % 8` (MSB-first).
/// Extra components beyond `8 * length` are ignored.
///
/// # Errors
/// `TemplateError` if the vector is empty or supplies fewer than
/// `8 * length` components, or if `length` is zero.
pub fn binarize(vector: &[f32], length: usize) -> Result<BinaryTemplate, TemplateError> {
    if length == 0 {
        return Err(TemplateError::ZeroLength);
    }
    if vector.is_empty() {
        return Err(TemplateError::EmptyVector);
    }
    let need = length * 8;
    if vector.len() < need {
        return Err(TemplateError::VectorTooShort {
            got: vector.len(),
            need,
        });
    }

    let norm = vector
        .iter()
        .map(|&v| f64::from(v) * f64::from(v))
        .sum::<f64>()
        .sqrt();

    let mut bytes = vec![0u8; length];
    for (i, &v) in vector.iter().take(need).enumerate() {
        let component = if norm > 0.0 { f64::from(v) / norm } else { f64::from(v) };
        if component >= 0.0 {
            bytes[i / 8] |= 1 << (7 - i % 8);
        }
    }

    Ok(BinaryTemplate::from_bytes(bytes))
}
