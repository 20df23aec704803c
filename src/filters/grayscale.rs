//! Greyscale conversion.
//!
//! Uses ITU-R BT.601 luma coefficients by default:
//! `0.299 R + 0.587 G + 0.114 B`, rounded to the nearest channel value and
//! replicated into R=G=B. BT.709 and custom weights are available through
//! [`GrayscaleWeights`].

use crate::buffer::{PixelBuffer, Rgb8};
use crate::filters::core::to_channel;

/// RGB weights for the luminance sum.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GrayscaleWeights {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl GrayscaleWeights {
    /// ITU-R BT.601, the default.
    pub const BT601: GrayscaleWeights = GrayscaleWeights {
        r: 0.299,
        g: 0.587,
        b: 0.114,
    };

    /// ITU-R BT.709.
    pub const BT709: GrayscaleWeights = GrayscaleWeights {
        r: 0.2126,
        g: 0.7152,
        b: 0.0722,
    };

    /// Custom weights, normalized to sum to 1.0.
    ///
    /// Falls back to equal weights when the sum is not positive.
    pub fn custom(r: f32, g: f32, b: f32) -> Self {
        let sum = r + g + b;
        if sum <= 0.0 {
            return Self {
                r: 1.0 / 3.0,
                g: 1.0 / 3.0,
                b: 1.0 / 3.0,
            };
        }
        Self {
            r: r / sum,
            g: g / sum,
            b: b / sum,
        }
    }

    /// Weighted luminance of one sample.
    #[inline]
    pub fn luminance(&self, c: Rgb8) -> u8 {
        to_channel(self.r * c.r as f32 + self.g * c.g as f32 + self.b * c.b as f32)
    }
}

impl Default for GrayscaleWeights {
    fn default() -> Self {
        Self::BT601
    }
}

/// BT.601 luminance of one sample.
#[inline]
pub fn luminance(c: Rgb8) -> u8 {
    GrayscaleWeights::BT601.luminance(c)
}

/// Convert to greyscale with BT.601 weights. The input is left untouched.
pub fn to_greyscale(input: &PixelBuffer) -> PixelBuffer {
    to_greyscale_weighted(input, GrayscaleWeights::default())
}

/// Convert to greyscale with the given weights.
pub fn to_greyscale_weighted(input: &PixelBuffer, weights: GrayscaleWeights) -> PixelBuffer {
    let mut output = input.copy();
    for y in 0..input.height() {
        for x in 0..input.width() {
            let gray = weights.luminance(input.pixel(x, y));
            output.put(x, y, Rgb8::gray(gray));
        }
    }
    tracing::trace!(width = input.width(), height = input.height(), "greyscale");
    output
}
