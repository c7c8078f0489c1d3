//! Per-seed feature extraction
//!
//! Pixels are converted to the requested color space, grouped by
//! `(image, seed_number)` and reduced to the per-channel median. Each seed
//! gets an integer class label from its ground-truth color.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::conversion::ColorSpace;
use crate::constants::labels;
use crate::data::FilteredRow;
use crate::Result;

/// Identity of one seed
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SeedKey {
    pub image: String,
    pub seed_number: i64,
}

/// Feature matrix and aligned labels, one row per seed in key order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    pub color_space: ColorSpace,
    pub keys: Vec<SeedKey>,
    pub features: Vec<[f32; 3]>,
    pub labels: Vec<i32>,
    /// Ground-truth color of each seed
    pub truth: Vec<String>,
}

/// Seed totals per ground-truth color
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassCounts {
    pub seeds: usize,
    pub purple: usize,
    pub red: usize,
    pub white: usize,
}

impl Dataset {
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn class_counts(&self) -> ClassCounts {
        let mut counts = ClassCounts {
            seeds: self.truth.len(),
            ..ClassCounts::default()
        };
        for color in &self.truth {
            match color.as_str() {
                "purple" => counts.purple += 1,
                "red" => counts.red += 1,
                "white" => counts.white += 1,
                _ => {}
            }
        }
        counts
    }
}

/// Three-class label: red, white, or anything else
pub fn class_label(color: &str) -> i32 {
    match color {
        "red" => labels::RED,
        "white" => labels::WHITE,
        _ => labels::OTHER,
    }
}

/// Binary label for single-color mode
pub fn target_label(color: &str, target: &str) -> i32 {
    if color == target {
        labels::TARGET
    } else {
        labels::NOT_TARGET
    }
}

/// Median of byte values; even counts average the two middle values
pub fn median(values: &mut [u8]) -> f32 {
    if values.is_empty() {
        return 0.0;
    }
    values.sort_unstable();
    let mid = values.len() / 2;
    if values.len() % 2 == 0 {
        (values[mid - 1] as f32 + values[mid] as f32) / 2.0
    } else {
        values[mid] as f32
    }
}

#[derive(Default)]
struct SeedPixels {
    channels: [Vec<u8>; 3],
    color: Option<String>,
    disagreement: bool,
}

/// Build the per-seed dataset in `color_space`.
///
/// Without a target color the labels are 0 (purple/other), 1 (red), 2 (white);
/// with one they are 1 for seeds of that color and 0 otherwise.
pub fn build_dataset(
    rows: &[FilteredRow],
    color_space: ColorSpace,
    target_color: Option<&str>,
) -> Result<Dataset> {
    let bgr: Vec<[u8; 3]> = rows.iter().map(|r| [r.blue, r.green, r.red]).collect();
    let channels = color_space.convert_bgr(&bgr)?;

    let mut groups: BTreeMap<SeedKey, SeedPixels> = BTreeMap::new();
    for (row, pixel) in rows.iter().zip(channels) {
        let key = SeedKey {
            image: row.image.clone(),
            seed_number: row.seed_number,
        };
        let seed = groups.entry(key).or_default();
        for (channel, value) in seed.channels.iter_mut().zip(pixel) {
            channel.push(value);
        }
        seed.color = match seed.color.take() {
            None => Some(row.color.clone()),
            Some(current) => {
                if current != row.color {
                    seed.disagreement = true;
                }
                Some(if row.color < current { row.color.clone() } else { current })
            }
        };
    }

    let mut dataset = Dataset {
        color_space,
        keys: Vec::with_capacity(groups.len()),
        features: Vec::with_capacity(groups.len()),
        labels: Vec::with_capacity(groups.len()),
        truth: Vec::with_capacity(groups.len()),
    };

    for (key, mut seed) in groups {
        if seed.disagreement {
            tracing::warn!(
                "Seed {} of {} has conflicting colors, using {:?}",
                key.seed_number,
                key.image,
                seed.color
            );
        }
        let color = seed.color.unwrap_or_default();
        let [c1, c2, c3] = &mut seed.channels;
        dataset.features.push([median(c1), median(c2), median(c3)]);
        dataset.labels.push(match target_color {
            Some(target) => target_label(&color, target),
            None => class_label(&color),
        });
        dataset.truth.push(color);
        dataset.keys.push(key);
    }

    tracing::debug!(
        "Built {} dataset with {} seeds from {} pixels",
        color_space,
        dataset.len(),
        rows.len()
    );
    Ok(dataset)
}

impl std::fmt::Display for ClassCounts {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "{} seeds", self.seeds)?;
        write!(
            f,
            "Purple: {}, red: {}, white {}",
            self.purple, self.red, self.white
        )
    }
}
