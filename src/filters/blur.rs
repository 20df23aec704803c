//! Separable Gaussian blur.
//!
//! Two passes (horizontal, then vertical) through an internal f32 scratch
//! array, so the source is never read after it has been written. The
//! destination is a separate buffer: `&PixelBuffer` / `&mut PixelBuffer`
//! cannot alias, which rules out in-place blurring at compile time.
//!
//! Border policy is clamp-to-edge: taps outside the image repeat the nearest
//! valid pixel. Results are rounded to the nearest channel value.

use ndarray::Array3;

use crate::buffer::{PixelBuffer, CHANNELS};
use crate::error::BufferError;
use crate::filters::core::{clamp_index, for_each_row, gaussian_kernel_1d, to_channel};

/// A normalized, odd-length 1D kernel applied along both axes.
#[derive(Debug, Clone, PartialEq)]
pub struct GaussianKernel {
    taps: Vec<f32>,
}

impl GaussianKernel {
    /// `[1, 2, 1] / 4`, i.e. a 3x3 Gaussian. The default.
    pub fn binomial3() -> Self {
        Self {
            taps: vec![0.25, 0.5, 0.25],
        }
    }

    /// `[1, 4, 6, 4, 1] / 16`, i.e. a 5x5 Gaussian.
    pub fn binomial5() -> Self {
        Self {
            taps: [1.0, 4.0, 6.0, 4.0, 1.0].iter().map(|v| v / 16.0).collect(),
        }
    }

    /// Sampled Gaussian of the given standard deviation.
    pub fn from_sigma(sigma: f32) -> Self {
        Self {
            taps: gaussian_kernel_1d(sigma),
        }
    }

    pub fn taps(&self) -> &[f32] {
        &self.taps
    }

    /// Number of taps on each side of the center.
    pub fn radius(&self) -> usize {
        self.taps.len() / 2
    }
}

impl Default for GaussianKernel {
    fn default() -> Self {
        Self::binomial3()
    }
}

/// Blur `src` into `dst` with the default 3x3 kernel.
///
/// Fails with [`BufferError::DimensionMismatch`] when the shapes differ.
pub fn gaussian_blur(src: &PixelBuffer, dst: &mut PixelBuffer) -> Result<(), BufferError> {
    gaussian_blur_with(src, dst, &GaussianKernel::default())
}

/// Blur into a newly allocated buffer with the default kernel.
pub fn gaussian_blurred(src: &PixelBuffer) -> PixelBuffer {
    let mut dst = src.copy();
    blur_into(src, &mut dst, &GaussianKernel::default());
    dst
}

/// Blur `src` into `dst` with the given kernel.
pub fn gaussian_blur_with(
    src: &PixelBuffer,
    dst: &mut PixelBuffer,
    kernel: &GaussianKernel,
) -> Result<(), BufferError> {
    if src.dimensions() != dst.dimensions() {
        return Err(BufferError::DimensionMismatch {
            src_width: src.width(),
            src_height: src.height(),
            dst_width: dst.width(),
            dst_height: dst.height(),
        });
    }
    blur_into(src, dst, kernel);
    Ok(())
}

fn blur_into(src: &PixelBuffer, dst: &mut PixelBuffer, kernel: &GaussianKernel) {
    let (width, height) = src.dimensions();
    let input = src.view();
    let taps = kernel.taps();
    let half = kernel.radius() as isize;

    // Horizontal pass
    let mut temp = Array3::<f32>::zeros((height, width, CHANNELS));
    for_each_row(temp.view_mut(), |y, mut row| {
        for x in 0..width {
            for c in 0..CHANNELS {
                let mut sum = 0.0f32;
                for (ki, &kv) in taps.iter().enumerate() {
                    let sx = clamp_index(x, ki as isize - half, width);
                    sum += input[[y, sx, c]] as f32 * kv;
                }
                row[[x, c]] = sum;
            }
        }
    });

    // Vertical pass
    let temp = temp.view();
    for_each_row(dst.view_mut(), |y, mut row| {
        for x in 0..width {
            for c in 0..CHANNELS {
                let mut sum = 0.0f32;
                for (ki, &kv) in taps.iter().enumerate() {
                    let sy = clamp_index(y, ki as isize - half, height);
                    sum += temp[[sy, x, c]] * kv;
                }
                row[[x, c]] = to_channel(sum);
            }
        }
    });

    tracing::trace!(width, height, taps = taps.len(), "gaussian blur");
}
