//! Grayscale conversion and fixed-threshold binarization

use clap::ValueEnum;
use image::{DynamicImage, GrayImage, Luma};
use serde::{Deserialize, Serialize};

/// Which side of the threshold counts as foreground
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Polarity {
    /// Foreground when luma >= threshold
    #[default]
    Bright,
    /// Foreground when luma < threshold
    Dark,
}

impl Polarity {
    pub fn is_foreground(&self, value: u8, threshold: u8) -> bool {
        match self {
            Polarity::Bright => value >= threshold,
            Polarity::Dark => value < threshold,
        }
    }
}

impl std::fmt::Display for Polarity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Polarity::Bright => write!(f, "bright"),
            Polarity::Dark => write!(f, "dark"),
        }
    }
}

/// BT.601 luma
pub fn luma(r: u8, g: u8, b: u8) -> u8 {
    let y = 0.299 * f64::from(r) + 0.587 * f64::from(g) + 0.114 * f64::from(b);
    y.round().clamp(0.0, 255.0) as u8
}

/// Binary mask: foreground 255, background 0
pub fn binarize(image: &DynamicImage, threshold: u8, polarity: Polarity) -> GrayImage {
    let rgb = image.to_rgb8();
    let mut mask = GrayImage::new(rgb.width(), rgb.height());

    for (x, y, pixel) in rgb.enumerate_pixels() {
        let [r, g, b] = pixel.0;
        if polarity.is_foreground(luma(r, g, b), threshold) {
            mask.put_pixel(x, y, Luma([255]));
        }
    }

    mask
}
