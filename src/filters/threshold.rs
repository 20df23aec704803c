//! Binary thresholding.
//!
//! A pixel becomes white when its BT.601 luminance is `>= threshold`,
//! black otherwise. On greyscale input the luminance is the channel value
//! itself. The default threshold is the fixed constant
//! [`DEFAULT_THRESHOLD`], so repeated calls are reproducible and
//! `to_binary(to_binary(b)) == to_binary(b)`.

use crate::buffer::{PixelBuffer, Rgb8};
use crate::filters::grayscale::{luminance, to_greyscale};

/// Luminance at or above which a pixel is white.
pub const DEFAULT_THRESHOLD: u8 = 128;

/// Threshold with [`DEFAULT_THRESHOLD`]. The input is left untouched.
pub fn to_binary(input: &PixelBuffer) -> PixelBuffer {
    to_binary_with(input, DEFAULT_THRESHOLD)
}

/// Threshold with a caller-supplied value.
pub fn to_binary_with(input: &PixelBuffer, threshold: u8) -> PixelBuffer {
    let mut output = input.copy();
    for y in 0..input.height() {
        for x in 0..input.width() {
            let on = luminance(input.pixel(x, y)) >= threshold;
            output.put(x, y, if on { Rgb8::WHITE } else { Rgb8::BLACK });
        }
    }
    output
}

/// Greyscale then threshold in one step.
pub fn binarize(input: &PixelBuffer) -> PixelBuffer {
    to_binary(&to_greyscale(input))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ramp() -> PixelBuffer {
        PixelBuffer::from_fn(16, 16, |x, y| Rgb8::gray((y * 16 + x) as u8)).unwrap()
    }

    #[test]
    fn test_threshold_boundary() {
        let result = to_binary(&ramp());
        assert_eq!(result.get(15, 7).unwrap(), Rgb8::BLACK); // 127
        assert_eq!(result.get(0, 8).unwrap(), Rgb8::WHITE); // 128
    }

    #[test]
    fn test_output_is_pure_black_or_white() {
        let result = to_binary(&ramp());
        assert!(result
            .pixels()
            .all(|(_, _, c)| c == Rgb8::BLACK || c == Rgb8::WHITE));
    }

    #[test]
    fn test_idempotent() {
        for t in [0u8, 1, 64, 128, 255] {
            let once = to_binary_with(&ramp(), t);
            let twice = to_binary_with(&once, t);
            assert_eq!(once, twice, "threshold {t}");
        }
    }

    #[test]
    fn test_zero_threshold_is_all_white() {
        let result = to_binary_with(&PixelBuffer::new(3, 3).unwrap(), 0);
        assert!(result.pixels().all(|(_, _, c)| c == Rgb8::WHITE));
    }

    #[test]
    fn test_binarize_color_input() {
        let input = PixelBuffer::from_fn(2, 1, |x, _| {
            if x == 0 {
                Rgb8::new(0, 255, 0) // luminance 150
            } else {
                Rgb8::new(0, 0, 255) // luminance 29
            }
        })
        .unwrap();
        let result = binarize(&input);
        assert_eq!(result.get(0, 0).unwrap(), Rgb8::WHITE);
        assert_eq!(result.get(1, 0).unwrap(), Rgb8::BLACK);
    }
}
