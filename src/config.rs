//! Configuration for the seed classifier parameter search.
//!
//! [`SearchConfig`] holds the input tables and every tunable of the grid
//! search. It is built from the command line or loaded from JSON:
//!
//! ```no_run
//! use seed_classifier::SearchConfig;
//! use std::path::Path;
//!
//! // Load from file
//! let config = SearchConfig::from_json_file(Path::new("search.json"))?;
//!
//! // Or use defaults
//! let config = SearchConfig::new("photo_info.tsv", "seed_data.tsv");
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::constants::{knn, svm, validation};
use crate::{ClassifierError, Result};

/// Complete configuration of one program run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Tab-separated photo metadata (image, color)
    pub photo_info: PathBuf,

    /// Tab-separated seed pixel samples
    pub seed_data: PathBuf,

    /// Grid search settings
    #[serde(default)]
    pub grid: GridConfig,
}

/// Parameter grid and cross-validation settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridConfig {
    /// Number of cross-validation folds
    pub folds: usize,

    /// Shuffle rows before assigning folds
    pub shuffle: bool,

    /// Seed for fold shuffling; `None` draws from the thread RNG
    #[serde(default)]
    pub seed: Option<u64>,

    /// SVM cost values
    pub svm_c: LogRange,

    /// SVM gamma values
    pub svm_gamma: LogRange,

    /// KNN neighbor counts
    pub knn_k: KRange,
}

/// Logarithmically spaced values `10^start_exp ..= 10^stop_exp`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LogRange {
    pub start_exp: f64,
    pub stop_exp: f64,
    pub count: usize,
}

/// Inclusive range of neighbor counts.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct KRange {
    pub min: usize,
    pub max: usize,
}

impl LogRange {
    pub fn new(start_exp: f64, stop_exp: f64, count: usize) -> Self {
        Self {
            start_exp,
            stop_exp,
            count,
        }
    }

    /// Materialize the range, endpoints included
    pub fn values(&self) -> Vec<f64> {
        match self.count {
            0 => Vec::new(),
            1 => vec![10f64.powf(self.start_exp)],
            n => {
                let step = (self.stop_exp - self.start_exp) / (n - 1) as f64;
                (0..n)
                    .map(|i| 10f64.powf(self.start_exp + step * i as f64))
                    .collect()
            }
        }
    }
}

impl KRange {
    pub fn values(&self) -> impl Iterator<Item = usize> {
        self.min..=self.max
    }

    pub fn len(&self) -> usize {
        if self.max < self.min {
            0
        } else {
            self.max - self.min + 1
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            folds: validation::FOLDS,
            shuffle: true,
            seed: None,
            svm_c: LogRange::new(svm::C_START_EXP, svm::C_STOP_EXP, svm::C_STEPS),
            svm_gamma: LogRange::new(svm::GAMMA_START_EXP, svm::GAMMA_STOP_EXP, svm::GAMMA_STEPS),
            knn_k: KRange {
                min: knn::K_MIN,
                max: knn::K_MAX,
            },
        }
    }
}

impl GridConfig {
    /// Number of classifier configurations the grid yields
    pub fn configuration_count(&self) -> usize {
        self.svm_c.count * self.svm_gamma.count + self.knn_k.len()
    }

    /// Reject settings the search cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.folds < 2 {
            return Err(ClassifierError::Config(format!(
                "folds must be at least 2, got {}",
                self.folds
            )));
        }
        if self.knn_k.min == 0 {
            return Err(ClassifierError::Config("knn_k.min must be at least 1".into()));
        }
        if self.configuration_count() == 0 {
            return Err(ClassifierError::EmptySearch);
        }
        Ok(())
    }
}

impl SearchConfig {
    /// Configuration with the default grid for the given input tables
    pub fn new(photo_info: impl Into<PathBuf>, seed_data: impl Into<PathBuf>) -> Self {
        Self {
            photo_info: photo_info.into(),
            seed_data: seed_data.into(),
            grid: GridConfig::default(),
        }
    }

    /// Load configuration from JSON file
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ClassifierError::io(path, "cannot read config", e))?;
        let config: Self = serde_json::from_str(&content)
            .map_err(|e| ClassifierError::Config(format!("{}: {}", path.display(), e)))?;
        config.grid.validate()?;
        Ok(config)
    }

    /// Save configuration to JSON file
    pub fn to_json_file(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| ClassifierError::Config(e.to_string()))?;
        std::fs::write(path, json).map_err(|e| ClassifierError::io(path, "cannot write config", e))
    }
}
