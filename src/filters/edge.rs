//! Sobel edge detection.
//!
//! Input is reduced to BT.601 luminance (greyscale input passes through
//! unchanged), then the horizontal and vertical Sobel kernels are applied.
//! The gradient magnitude is rounded, clamped to 0-255 and written to all
//! three channels.
//!
//! Border policy is clamp-to-edge, matching the blur: there is no black
//! frame around the output, and a uniform image yields all zeros.

use ndarray::Array2;

use crate::buffer::{PixelBuffer, Rgb8};
use crate::filters::core::{clamp_index, to_channel};
use crate::filters::grayscale::luminance;

const SOBEL_X: [[i32; 3]; 3] = [[-1, 0, 1], [-2, 0, 2], [-1, 0, 1]];
const SOBEL_Y: [[i32; 3]; 3] = [[-1, -2, -1], [0, 0, 0], [1, 2, 1]];

/// How the two gradient components are combined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GradientNorm {
    /// `sqrt(gx^2 + gy^2)`
    #[default]
    Euclidean,
    /// `|gx| + |gy|`
    Manhattan,
}

impl GradientNorm {
    #[inline]
    fn magnitude(self, gx: i32, gy: i32) -> f32 {
        match self {
            GradientNorm::Euclidean => ((gx * gx + gy * gy) as f32).sqrt(),
            GradientNorm::Manhattan => (gx.abs() + gy.abs()) as f32,
        }
    }
}

/// Edge map with the Euclidean gradient magnitude.
pub fn detect_edges(input: &PixelBuffer) -> PixelBuffer {
    detect_edges_with(input, GradientNorm::default())
}

/// Edge map with the given norm.
pub fn detect_edges_with(input: &PixelBuffer, norm: GradientNorm) -> PixelBuffer {
    let (width, height) = input.dimensions();

    let lum = Array2::from_shape_fn((height, width), |(y, x)| {
        luminance(input.pixel(x, y)) as i32
    });

    let mut output = input.copy();
    for y in 0..height {
        for x in 0..width {
            let mut gx = 0i32;
            let mut gy = 0i32;

            for ky in 0..3 {
                let sy = clamp_index(y, ky as isize - 1, height);
                for kx in 0..3 {
                    let sx = clamp_index(x, kx as isize - 1, width);
                    let v = lum[[sy, sx]];
                    gx += v * SOBEL_X[ky][kx];
                    gy += v * SOBEL_Y[ky][kx];
                }
            }

            output.put(x, y, Rgb8::gray(to_channel(norm.magnitude(gx, gy))));
        }
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vertical_step() -> PixelBuffer {
        PixelBuffer::from_fn(6, 4, |x, _| if x < 3 { Rgb8::BLACK } else { Rgb8::WHITE }).unwrap()
    }

    #[test]
    fn test_detects_vertical_edge() {
        let result = detect_edges(&vertical_step());

        // Both sides of the step saturate: |gx| = 4 * 255
        assert_eq!(result.get(2, 1).unwrap(), Rgb8::WHITE);
        assert_eq!(result.get(3, 1).unwrap(), Rgb8::WHITE);
        assert_eq!(result.get(0, 1).unwrap(), Rgb8::BLACK);
        assert_eq!(result.get(5, 1).unwrap(), Rgb8::BLACK);
    }

    #[test]
    fn test_border_rows_use_clamped_neighbors() {
        let result = detect_edges(&vertical_step());
        // Top and bottom rows see the same step thanks to clamping.
        assert_eq!(result.get(2, 0).unwrap(), Rgb8::WHITE);
        assert_eq!(result.get(3, 3).unwrap(), Rgb8::WHITE);
        assert_eq!(result.get(0, 0).unwrap(), Rgb8::BLACK);
    }

    #[test]
    fn test_uniform_is_zero() {
        let img = PixelBuffer::filled(5, 5, Rgb8::new(90, 30, 200)).unwrap();
        let result = detect_edges(&img);
        assert!(result.pixels().all(|(_, _, c)| c == Rgb8::BLACK));
    }

    #[test]
    fn test_weak_gradient_magnitude() {
        // Horizontal ramp of 10 per column: gx = 10 * (1 + 2 + 1) * 2 = 80
        let img = PixelBuffer::from_fn(5, 3, |x, _| Rgb8::gray((x * 10) as u8)).unwrap();
        let result = detect_edges(&img);
        assert_eq!(result.get(2, 1).unwrap(), Rgb8::gray(80));
        // Clamped border column only sees one step: 10 * 4 = 40
        assert_eq!(result.get(0, 1).unwrap(), Rgb8::gray(40));
    }

    #[test]
    fn test_diagonal_norms() {
        // Single bright pixel above-left of (1,1): gx = gy = -v
        let mut img = PixelBuffer::new(3, 3).unwrap();
        img.set(0, 0, Rgb8::gray(30)).unwrap();

        let euclid = detect_edges_with(&img, GradientNorm::Euclidean);
        let manhattan = detect_edges_with(&img, GradientNorm::Manhattan);

        // sqrt(30^2 + 30^2) = 42.43
        assert_eq!(euclid.get(1, 1).unwrap(), Rgb8::gray(42));
        assert_eq!(manhattan.get(1, 1).unwrap(), Rgb8::gray(60));
    }

    #[test]
    fn test_output_is_grey() {
        let img = PixelBuffer::from_fn(6, 6, |x, y| Rgb8::new((x * 40) as u8, (y * 40) as u8, 7))
            .unwrap();
        let result = detect_edges(&img);
        assert!(result.pixels().all(|(_, _, c)| c.r == c.g && c.g == c.b));
    }
}
