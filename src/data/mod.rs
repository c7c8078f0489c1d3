//! Seed table loading and filtering
//!
//! This module reads the tab-separated photo and seed tables and joins
//! them into the per-pixel rows the feature builder consumes.

pub mod table;
pub mod filter;

pub use table::{PhotoInfo, SeedSample, read_photo_info, read_seed_data};
pub use filter::{FilteredRow, filter_samples, image_id};
