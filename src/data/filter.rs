//! Acquisition filter and photo join
//!
//! Selects the pixels of one acquisition type and attaches the ground-truth
//! color of their photograph. Pixels whose photograph is missing from the
//! photo table are dropped.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::table::{PhotoInfo, SeedSample};

/// One pixel with its seed identity and ground-truth color
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilteredRow {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
    pub image: String,
    pub seed_number: i64,
    pub color: String,
}

/// Final path segment of a recorded file path
pub fn image_id(file: &str) -> &str {
    file.rsplit('/').next().unwrap_or(file)
}

/// Keep rows of `acquisition` type joined with their photo's color.
///
/// Row order follows the seed table. A photo listed several times yields one
/// output row per listing.
pub fn filter_samples(
    samples: &[SeedSample],
    photos: &[PhotoInfo],
    acquisition: &str,
) -> Vec<FilteredRow> {
    let mut by_image: HashMap<&str, Vec<&PhotoInfo>> = HashMap::new();
    for photo in photos {
        by_image.entry(photo.image.as_str()).or_default().push(photo);
    }

    let mut rows = Vec::new();
    let mut unmatched = 0usize;
    for sample in samples.iter().filter(|s| s.acquisition == acquisition) {
        let image = image_id(&sample.file);
        match by_image.get(image) {
            Some(matches) => {
                for photo in matches {
                    rows.push(FilteredRow {
                        red: sample.red,
                        green: sample.green,
                        blue: sample.blue,
                        image: image.to_string(),
                        seed_number: sample.seed_number,
                        color: photo.color.clone(),
                    });
                }
            }
            None => unmatched += 1,
        }
    }

    if unmatched > 0 {
        tracing::debug!(
            "Dropped {} {} pixels without photo info",
            unmatched,
            acquisition
        );
    }
    rows
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(file: &str, acquisition: &str, seed_number: i64, rgb: (u8, u8, u8)) -> SeedSample {
        SeedSample {
            file: file.to_string(),
            acquisition: acquisition.to_string(),
            seed_number,
            color: None,
            red: rgb.0,
            green: rgb.1,
            blue: rgb.2,
        }
    }

    fn photo(image: &str, color: &str) -> PhotoInfo {
        PhotoInfo {
            image: image.to_string(),
            color: color.to_string(),
        }
    }

    #[test]
    fn test_image_id() {
        assert_eq!(image_id("data/photos/IMG_01.jpg"), "IMG_01.jpg");
        assert_eq!(image_id("IMG_01.jpg"), "IMG_01.jpg");
        assert_eq!(image_id("dir/"), "");
    }

    #[test]
    fn test_filter_joins_color() {
        let samples = vec![
            sample("in/a.jpg", "source", 0, (200, 10, 10)),
            sample("in/a.jpg", "calibrated", 0, (210, 12, 12)),
            sample("in/b.jpg", "source", 3, (250, 250, 250)),
        ];
        let photos = vec![photo("a.jpg", "red"), photo("b.jpg", "white")];

        let rows = filter_samples(&samples, &photos, "source");
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].image, "a.jpg");
        assert_eq!(rows[0].color, "red");
        assert_eq!((rows[0].red, rows[0].green, rows[0].blue), (200, 10, 10));
        assert_eq!(rows[1].image, "b.jpg");
        assert_eq!(rows[1].seed_number, 3);
        assert_eq!(rows[1].color, "white");
    }

    #[test]
    fn test_filter_drops_unknown_photos() {
        let samples = vec![
            sample("in/a.jpg", "source", 0, (1, 2, 3)),
            sample("in/missing.jpg", "source", 0, (1, 2, 3)),
        ];
        let photos = vec![photo("a.jpg", "purple")];

        let rows = filter_samples(&samples, &photos, "source");
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].image, "a.jpg");
    }

    #[test]
    fn test_filter_wrong_type_is_empty() {
        let samples = vec![
            sample("in/a.jpg", "calibrated", 0, (1, 2, 3)),
            sample("in/a.jpg", "calibrated", 1, (4, 5, 6)),
        ];
        let photos = vec![photo("a.jpg", "purple")];

        assert!(filter_samples(&samples, &photos, "source").is_empty());
    }

    #[test]
    fn test_duplicate_photo_rows_multiply() {
        let samples = vec![sample("a.jpg", "source", 0, (1, 2, 3))];
        let photos = vec![photo("a.jpg", "purple"), photo("a.jpg", "red")];

        let rows = filter_samples(&samples, &photos, "source");
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].color, "purple");
        assert_eq!(rows[1].color, "red");
    }
}
