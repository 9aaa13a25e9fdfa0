//! FaceKey Core
//!
//! Shared types for the FaceKey biometric key pipeline.
//!
//! # Binarization
//!
//! A face descriptor arrives as a fixed-dimension vector of floats
//! (128 components from the capture layer). [`binarize`] collapses it
//! into a [`BinaryTemplate`]: L2-normalize, take the sign of each
//! component as one bit, pack MSB-first.
//!
//! Two captures of the same face produce templates that differ in a
//! small number of bit positions; the fuzzy extractor built on top of
//! this crate absorbs that noise.
//!
//! Feature vectors and templates are ephemeral — they live for one
//! capture and are never persisted.

pub mod binarize;
pub mod template;

pub use binarize::{binarize, TemplateError};
pub use template::BinaryTemplate;
