//! Tab-separated input tables
//!
//! Columns are matched by header name, so extra columns (`area`, `x`, `y`)
//! and any column order are accepted. Channel values may be written either
//! as integers or as decimals (`"123.0"`).

use serde::{Deserialize, Deserializer, Serialize};
use std::io::Read;
use std::path::Path;

use crate::{ClassifierError, Result};

/// One sampled pixel of one seed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeedSample {
    /// Path of the photograph the pixel was sampled from
    pub file: String,
    /// Acquisition type, `source` or `calibrated`
    #[serde(rename = "type")]
    pub acquisition: String,
    /// Seed index within the photograph
    pub seed_number: i64,
    /// Color observed while sampling, if recorded
    #[serde(default)]
    pub color: Option<String>,
    #[serde(deserialize_with = "channel")]
    pub red: u8,
    #[serde(deserialize_with = "channel")]
    pub green: u8,
    #[serde(deserialize_with = "channel")]
    pub blue: u8,
}

/// Ground truth for one photograph
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhotoInfo {
    /// Photograph file name
    pub image: String,
    /// Color of every seed on the photograph
    pub color: String,
}

/// Parse a channel cell and truncate it into the byte range
fn channel<'de, D>(deserializer: D) -> std::result::Result<u8, D::Error>
where
    D: Deserializer<'de>,
{
    let value = f64::deserialize(deserializer)?;
    if !value.is_finite() {
        return Err(serde::de::Error::custom(format!(
            "channel value {} is not a number",
            value
        )));
    }
    Ok(value.clamp(0.0, 255.0) as u8)
}

fn tsv_reader<R: Read>(reader: R) -> csv::Reader<R> {
    csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader)
}

/// Deserialize every row of a TSV stream
pub fn read_table<T, R>(reader: R, name: &str) -> Result<Vec<T>>
where
    T: for<'de> Deserialize<'de>,
    R: Read,
{
    let mut reader = tsv_reader(reader);
    let mut rows = Vec::new();
    for (index, record) in reader.deserialize::<T>().enumerate() {
        // Header is line 1
        let row: T = record.map_err(|e| {
            ClassifierError::data_shape(format!("{} line {}: {}", name, index + 2, e))
        })?;
        rows.push(row);
    }
    Ok(rows)
}

fn read_table_file<T>(path: &Path) -> Result<Vec<T>>
where
    T: for<'de> Deserialize<'de>,
{
    let file = std::fs::File::open(path)
        .map_err(|e| ClassifierError::io(path, "cannot open table", e))?;
    let name = path.display().to_string();
    read_table(std::io::BufReader::new(file), &name)
}

/// Load the photo table (`image`, `color`)
pub fn read_photo_info(path: &Path) -> Result<Vec<PhotoInfo>> {
    let photos: Vec<PhotoInfo> = read_table_file(path)?;
    tracing::debug!("Loaded {} photos from {}", photos.len(), path.display());
    Ok(photos)
}

/// Load the seed pixel table (`file`, `type`, `seed_number`, `red`, `green`, `blue`)
pub fn read_seed_data(path: &Path) -> Result<Vec<SeedSample>> {
    let samples: Vec<SeedSample> = read_table_file(path)?;
    tracing::debug!("Loaded {} seed pixels from {}", samples.len(), path.display());
    Ok(samples)
}
