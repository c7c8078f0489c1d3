//! Color space conversion of pixel buffers
//!
//! Pixels are stored as blue/green/red byte triples, the channel order of
//! the seed table and of OpenCV. Lab and HSV use OpenCV's 8-bit encodings:
//! - Lab: L* scaled to [0, 255], a* and b* offset by 128
//! - HSV: hue halved to [0, 180), saturation and value in [0, 255]

use opencv::{
    core::{AlgorithmHint, Mat, Scalar, Vec3b, CV_8UC3},
    imgproc::{cvt_color, COLOR_BGR2HSV, COLOR_BGR2Lab},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::{ClassifierError, Result};

/// Feature color space
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorSpace {
    /// Raw channels, kept in blue/green/red order
    Rgb,
    /// CIE L*a*b*
    Lab,
    /// Hue, saturation, value
    Hsv,
}

impl ColorSpace {
    /// Search order of the color spaces
    pub const ALL: [ColorSpace; 3] = [ColorSpace::Rgb, ColorSpace::Lab, ColorSpace::Hsv];

    pub fn name(&self) -> &'static str {
        match self {
            ColorSpace::Rgb => "rgb",
            ColorSpace::Lab => "lab",
            ColorSpace::Hsv => "hsv",
        }
    }

    fn conversion_code(&self) -> Option<i32> {
        match self {
            ColorSpace::Rgb => None,
            ColorSpace::Lab => Some(COLOR_BGR2Lab),
            ColorSpace::Hsv => Some(COLOR_BGR2HSV),
        }
    }

    /// Convert a buffer of BGR pixels into this color space.
    ///
    /// `Rgb` returns the buffer unchanged.
    pub fn convert_bgr(&self, pixels: &[[u8; 3]]) -> Result<Vec<[u8; 3]>> {
        let code = match self.conversion_code() {
            Some(code) if !pixels.is_empty() => code,
            _ => return Ok(pixels.to_vec()),
        };

        let source = pixel_row(pixels)?;
        let mut converted = Mat::default();
        cvt_color(&source, &mut converted, code, 0, AlgorithmHint::ALGO_HINT_DEFAULT)
            .map_err(|e| ClassifierError::opencv(format!("BGR to {} conversion", self), e))?;

        let mut result = Vec::with_capacity(pixels.len());
        for col in 0..converted.cols() {
            let pixel = converted
                .at_2d::<Vec3b>(0, col)
                .map_err(|e| ClassifierError::opencv("converted pixel access", e))?;
            result.push([pixel[0], pixel[1], pixel[2]]);
        }
        Ok(result)
    }

    /// Convert a single BGR pixel
    pub fn convert_pixel(&self, pixel: [u8; 3]) -> Result<[u8; 3]> {
        let converted = self.convert_bgr(&[pixel])?;
        Ok(converted[0])
    }
}

/// Pack pixels into a 1 x N three-channel Mat
fn pixel_row(pixels: &[[u8; 3]]) -> Result<Mat> {
    let mut mat = Mat::new_rows_cols_with_default(1, pixels.len() as i32, CV_8UC3, Scalar::all(0.0))
        .map_err(|e| ClassifierError::opencv("pixel buffer allocation", e))?;

    for (col, bgr) in pixels.iter().enumerate() {
        let pixel = mat
            .at_2d_mut::<Vec3b>(0, col as i32)
            .map_err(|e| ClassifierError::opencv("pixel buffer access", e))?;
        pixel[0] = bgr[0];
        pixel[1] = bgr[1];
        pixel[2] = bgr[2];
    }

    Ok(mat)
}

impl fmt::Display for ColorSpace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ColorSpace {
    type Err = ClassifierError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "rgb" => Ok(ColorSpace::Rgb),
            "lab" => Ok(ColorSpace::Lab),
            "hsv" => Ok(ColorSpace::Hsv),
            other => Err(ClassifierError::Config(format!("unknown color space `{}`", other))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BLACK: [u8; 3] = [0, 0, 0];
    const WHITE: [u8; 3] = [255, 255, 255];
    const RED: [u8; 3] = [0, 0, 255];
    const GREEN: [u8; 3] = [0, 255, 0];
    const BLUE: [u8; 3] = [255, 0, 0];

    #[test]
    fn test_rgb_is_passthrough() {
        let pixels = vec![[12, 34, 56], RED, WHITE];
        assert_eq!(ColorSpace::Rgb.convert_bgr(&pixels).unwrap(), pixels);
    }

    #[test]
    fn test_empty_buffer() {
        for space in ColorSpace::ALL {
            assert!(space.convert_bgr(&[]).unwrap().is_empty());
        }
    }

    #[test]
    fn test_lab_neutral_colors() {
        let lab = ColorSpace::Lab.convert_bgr(&[BLACK, WHITE]).unwrap();
        assert_eq!(lab[0], [0, 128, 128]);
        assert_eq!(lab[1], [255, 128, 128]);
    }

    #[test]
    fn test_lab_red_has_positive_a() {
        let lab = ColorSpace::Lab.convert_pixel(RED).unwrap();
        assert!(lab[1] > 128 + 40);
        assert!(lab[2] > 128);
    }

    #[test]
    fn test_hsv_primaries() {
        let hsv = ColorSpace::Hsv.convert_bgr(&[RED, GREEN, BLUE, WHITE]).unwrap();
        assert_eq!(hsv[0], [0, 255, 255]);
        assert_eq!(hsv[1], [60, 255, 255]);
        assert_eq!(hsv[2], [120, 255, 255]);
        assert_eq!(hsv[3], [0, 0, 255]);
    }

    #[test]
    fn test_conversion_is_deterministic() {
        let pixels: Vec<[u8; 3]> = (0..64u8).map(|i| [i * 3, 255 - i, i.wrapping_mul(7)]).collect();
        for space in ColorSpace::ALL {
            let first = space.convert_bgr(&pixels).unwrap();
            let second = space.convert_bgr(&pixels).unwrap();
            assert_eq!(first, second);
            assert_eq!(first.len(), pixels.len());
        }
    }

    #[test]
    fn test_parse_and_display() {
        assert_eq!("LAB".parse::<ColorSpace>().unwrap(), ColorSpace::Lab);
        assert_eq!(ColorSpace::Hsv.to_string(), "hsv");
        assert!("cmyk".parse::<ColorSpace>().is_err());
    }
}
