//! Color conversion and feature extraction module
//!
//! This module converts sampled seed pixels between color spaces and
//! reduces them to one feature vector per seed.

pub mod conversion;
pub mod features;

pub use conversion::ColorSpace;
pub use features::{build_dataset, ClassCounts, Dataset, SeedKey};
