//! Seed and photograph classification with one binary model per color
//!
//! Each model answers "is this seed <color>?" in the color space its own
//! search selected. A seed takes the first positive answer in the order
//! white, purple, red. A photograph takes the color held by a strict
//! majority of its seeds.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::classifier::Classifier;
use super::grid_search::BestParams;
use crate::color::features::median;
use crate::color::{build_dataset, ColorSpace};
use crate::constants::labels;
use crate::data::FilteredRow;
use crate::Result;

/// Predicted seed color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SeedColor {
    Purple,
    Red,
    White,
    Unknown,
}

impl fmt::Display for SeedColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SeedColor::Purple => "purple",
            SeedColor::Red => "red",
            SeedColor::White => "white",
            SeedColor::Unknown => "unknown",
        };
        f.write_str(name)
    }
}

/// Binary model for one color
#[derive(Debug)]
struct ColorModel {
    color_space: ColorSpace,
    classifier: Classifier,
}

impl ColorModel {
    fn train(rows: &[FilteredRow], color: &str, params: &BestParams) -> Result<Self> {
        let dataset = build_dataset(rows, params.color_space, Some(color))?;
        let classifier = Classifier::fit(&params.classifier, &dataset.features, &dataset.labels)?;
        tracing::debug!("Trained {} model: {}", color, params);
        Ok(Self {
            color_space: params.color_space,
            classifier,
        })
    }

    fn is_match(&self, pixels: &[[u8; 3]]) -> Result<bool> {
        let converted = self.color_space.convert_bgr(pixels)?;
        let mut channels: [Vec<u8>; 3] = Default::default();
        for pixel in converted {
            for (channel, value) in channels.iter_mut().zip(pixel) {
                channel.push(value);
            }
        }
        let [c1, c2, c3] = &mut channels;
        let features = [median(c1), median(c2), median(c3)];
        let predicted = self.classifier.predict(&[features])?;
        Ok(predicted[0] == labels::TARGET)
    }
}

/// Purple, red and white models trained on one table
#[derive(Debug)]
pub struct ColorEnsemble {
    purple: ColorModel,
    red: ColorModel,
    white: ColorModel,
}

impl ColorEnsemble {
    /// Train every color model on all `rows` with its searched parameters
    pub fn train(
        rows: &[FilteredRow],
        purple: &BestParams,
        red: &BestParams,
        white: &BestParams,
    ) -> Result<Self> {
        Ok(Self {
            purple: ColorModel::train(rows, "purple", purple)?,
            red: ColorModel::train(rows, "red", red)?,
            white: ColorModel::train(rows, "white", white)?,
        })
    }

    /// Classify one seed from its BGR pixel samples
    pub fn classify_seed(&self, pixels: &[[u8; 3]]) -> Result<SeedColor> {
        if pixels.is_empty() {
            return Ok(SeedColor::Unknown);
        }
        if self.white.is_match(pixels)? {
            Ok(SeedColor::White)
        } else if self.purple.is_match(pixels)? {
            Ok(SeedColor::Purple)
        } else if self.red.is_match(pixels)? {
            Ok(SeedColor::Red)
        } else {
            Ok(SeedColor::Unknown)
        }
    }

    /// Classify a photograph from the pixel samples of its seeds
    pub fn classify_image(&self, seeds: &[Vec<[u8; 3]>]) -> Result<SeedColor> {
        let mut votes = Vec::with_capacity(seeds.len());
        for pixels in seeds {
            votes.push(self.classify_seed(pixels)?);
        }
        Ok(majority(&votes))
    }
}

/// Color with more votes than each other color, or `Unknown`
pub fn majority(votes: &[SeedColor]) -> SeedColor {
    let count = |color: SeedColor| votes.iter().filter(|&&v| v == color).count();
    let purple = count(SeedColor::Purple);
    let red = count(SeedColor::Red);
    let white = count(SeedColor::White);

    if purple > red && purple > white {
        SeedColor::Purple
    } else if red > purple && red > white {
        SeedColor::Red
    } else if white > purple && white > red {
        SeedColor::White
    } else {
        SeedColor::Unknown
    }
}
