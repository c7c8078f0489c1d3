//! Exhaustive search over color spaces and classifier configurations
//!
//! Every color space is paired with every configuration of the grid. Each
//! pair is scored by the mean k-fold accuracy; the first pair reaching the
//! highest score wins.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::classifier::{iterate_classifiers, ClassifierConfig};
use super::cross_validation::{cross_validate, KFold};
use crate::color::{build_dataset, ClassCounts, ColorSpace};
use crate::config::GridConfig;
use crate::data::FilteredRow;
use crate::{ClassifierError, Result};

/// Winning configuration of one search
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BestParams {
    pub color_space: ColorSpace,
    #[serde(flatten)]
    pub classifier: ClassifierConfig,
    /// Mean cross-validated accuracy in [0, 1]
    pub accuracy: f64,
}

/// Outcome of one grid search
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchReport {
    /// Color of the one-vs-rest problem; `None` for three classes
    pub target_color: Option<String>,
    pub best: BestParams,
    /// Seed totals, reported for the three-class problem only
    pub class_counts: Option<ClassCounts>,
    /// Number of (color space, configuration) pairs scored
    pub evaluated: usize,
}

impl fmt::Display for BestParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Color space: {}, {}, cross-val accuracy: {:.2}",
            self.color_space,
            self.classifier,
            self.accuracy * 100.0
        )
    }
}

impl fmt::Display for SearchReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(counts) = &self.class_counts {
            writeln!(f, "{}", counts)?;
        }
        write!(f, "{}", self.best)
    }
}

/// Find the best color space and classifier for `rows`.
///
/// With `target_color` the problem is binary (that color against the rest),
/// otherwise it has the three classes purple/other, red and white.
pub fn grid_search(
    rows: &[FilteredRow],
    target_color: Option<&str>,
    grid: &GridConfig,
) -> Result<SearchReport> {
    grid.validate()?;
    let kfold = KFold::new(grid.folds)
        .with_shuffle(grid.shuffle)
        .with_seed(grid.seed);

    let mut best: Option<BestParams> = None;
    let mut class_counts = None;
    let mut evaluated = 0usize;

    tracing::info!(
        "Grid search over {} rows, target {:?}",
        rows.len(),
        target_color
    );

    for color_space in ColorSpace::ALL {
        let dataset = build_dataset(rows, color_space, target_color)?;
        if color_space == ColorSpace::Rgb && target_color.is_none() {
            class_counts = Some(dataset.class_counts());
        }

        for config in iterate_classifiers(grid) {
            let mean = cross_validate(&config, &dataset, &kfold)?.mean();
            evaluated += 1;
            tracing::debug!("{} {}: {:.4}", color_space, config, mean);

            if best.map_or(true, |b| mean > b.accuracy) {
                best = Some(BestParams {
                    color_space,
                    classifier: config,
                    accuracy: mean,
                });
            }
        }
    }

    let best = best.ok_or(ClassifierError::EmptySearch)?;
    tracing::info!("Best of {} configurations: {}", evaluated, best);

    Ok(SearchReport {
        target_color: target_color.map(str::to_string),
        best,
        class_counts,
        evaluated,
    })
}
