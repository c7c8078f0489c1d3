//! Search grid bounds and label encodings
//!
//! This module contains compile-time constants for the classifier parameter
//! grid and for the encoding of seed colors as class labels.

/// Linear SVM parameter grid
///
/// Both axes are logarithmically spaced; the cost axis is the outer loop.
pub mod svm {
    /// Decimal exponent of the smallest cost value (C = 0.01)
    pub const C_START_EXP: f64 = -2.0;

    /// Decimal exponent of the largest cost value (C = 100)
    pub const C_STOP_EXP: f64 = 2.0;

    /// Number of cost values
    pub const C_STEPS: usize = 20;

    /// Decimal exponent of the smallest gamma value (gamma = 0.001)
    pub const GAMMA_START_EXP: f64 = -3.0;

    /// Decimal exponent of the largest gamma value (gamma = 1)
    pub const GAMMA_STOP_EXP: f64 = 0.0;

    /// Number of gamma values
    pub const GAMMA_STEPS: usize = 20;
}

/// K-nearest-neighbor sweep
pub mod knn {
    /// Smallest neighbor count
    pub const K_MIN: usize = 1;

    /// Largest neighbor count (inclusive)
    pub const K_MAX: usize = 29;
}

/// Cross-validation settings
pub mod validation {
    /// Number of folds
    pub const FOLDS: usize = 10;
}

/// Class labels for the three-class problem
pub mod labels {
    /// Purple and any unrecognized color
    pub const OTHER: i32 = 0;

    /// Red seeds
    pub const RED: i32 = 1;

    /// White seeds
    pub const WHITE: i32 = 2;

    /// Positive label in single-color mode
    pub const TARGET: i32 = 1;

    /// Negative label in single-color mode
    pub const NOT_TARGET: i32 = 0;
}

/// Acquisition types recorded in the seed table
pub mod acquisition {
    /// Pixels sampled from the raw photograph
    pub const SOURCE: &str = "source";

    /// Pixels sampled after color-checker calibration
    pub const CALIBRATED: &str = "calibrated";
}

/// Seed colors with ground truth in the photo table
pub const SEED_COLORS: [&str; 3] = ["purple", "red", "white"];
