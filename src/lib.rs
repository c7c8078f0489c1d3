//! # Seed Classifier
//!
//! Chooses the best classifier for seed color (purple, red, white) from
//! pixels sampled on seed photographs.
//!
//! The search:
//! - Joins sampled seed pixels with the ground-truth color of their photograph
//! - Reduces each seed to the median of its pixels in RGB, Lab or HSV
//! - Scores a linear SVM grid and a KNN sweep with 10-fold cross-validation
//! - Reports the best color space and parameters per problem
//!
//! ## Example
//!
//! ```rust,no_run
//! use seed_classifier::{run_searches, SearchConfig};
//!
//! let config = SearchConfig::new("photo_info.tsv", "seed_data.tsv");
//! run_searches(&config, |case, report| {
//!     println!("{}", case);
//!     println!("{}", report);
//! })?;
//! # Ok::<(), seed_classifier::ClassifierError>(())
//! ```

use serde::Serialize;
use std::fmt;

pub mod error;
pub mod constants;
pub mod config;
pub mod data;
pub mod color;
pub mod model;

pub use error::{ClassifierError, Result};
pub use config::{GridConfig, KRange, LogRange, SearchConfig};
pub use color::{build_dataset, ClassCounts, ColorSpace, Dataset};
pub use data::{filter_samples, read_photo_info, read_seed_data, FilteredRow};
pub use model::{
    grid_search, iterate_classifiers, BestParams, ClassifierConfig, ClassifierKind, ColorEnsemble,
    SearchReport, SeedColor,
};

use constants::{acquisition, SEED_COLORS};

/// One problem of a full run: an acquisition type and an optional target color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SearchCase {
    pub acquisition: &'static str,
    pub target_color: Option<&'static str>,
}

impl SearchCase {
    /// The eight problems of a run: three-class, then one-vs-rest per color,
    /// each on source and calibrated pixels
    pub fn all() -> Vec<SearchCase> {
        let targets = std::iter::once(None).chain(SEED_COLORS.iter().copied().map(Some));
        targets
            .flat_map(|target_color| {
                [acquisition::SOURCE, acquisition::CALIBRATED]
                    .into_iter()
                    .map(move |acquisition| SearchCase {
                        acquisition,
                        target_color,
                    })
            })
            .collect()
    }
}

impl fmt::Display for SearchCase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut chars = self.acquisition.chars();
        if let Some(first) = chars.next() {
            write!(f, "{}{}", first.to_uppercase(), chars.as_str())?;
        }
        if let Some(color) = self.target_color {
            write!(f, ", {}", color)?;
        }
        Ok(())
    }
}

/// Load both tables and run every [`SearchCase`] in order.
///
/// `on_report` is called after each search so results can be shown while
/// the remaining searches run.
pub fn run_searches<F>(config: &SearchConfig, mut on_report: F) -> Result<Vec<SearchReport>>
where
    F: FnMut(&SearchCase, &SearchReport),
{
    config.grid.validate()?;
    let photos = read_photo_info(&config.photo_info)?;
    let samples = read_seed_data(&config.seed_data)?;

    let source = filter_samples(&samples, &photos, acquisition::SOURCE);
    let calibrated = filter_samples(&samples, &photos, acquisition::CALIBRATED);
    tracing::info!(
        "{} source and {} calibrated pixels with photo info",
        source.len(),
        calibrated.len()
    );

    let mut reports = Vec::new();
    for case in SearchCase::all() {
        let rows = if case.acquisition == acquisition::SOURCE {
            &source
        } else {
            &calibrated
        };
        let report = grid_search(rows, case.target_color, &config.grid)?;
        on_report(&case, &report);
        reports.push(report);
    }
    Ok(reports)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_case_order() {
        let titles: Vec<String> = SearchCase::all().iter().map(|c| c.to_string()).collect();
        assert_eq!(
            titles,
            vec![
                "Source",
                "Calibrated",
                "Source, purple",
                "Calibrated, purple",
                "Source, red",
                "Calibrated, red",
                "Source, white",
                "Calibrated, white",
            ]
        );
    }

    #[test]
    fn test_search_report_serialization() {
        let report = SearchReport {
            target_color: Some("red".to_string()),
            best: BestParams {
                color_space: ColorSpace::Hsv,
                classifier: ClassifierConfig::Svm { c: 1.0, gamma: 0.01 },
                accuracy: 0.93,
            },
            class_counts: None,
            evaluated: 1287,
        };

        let json = serde_json::to_string(&report).unwrap();
        let deserialized: SearchReport = serde_json::from_str(&json).unwrap();
        assert_eq!(report, deserialized);
    }
}
