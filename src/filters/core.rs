//! Core utilities shared by the neighborhood filters.
//!
//! This module provides:
//! - Gaussian kernel generation
//! - Border policies (clamp-to-edge, background-outside)
//! - Float to channel conversion
//! - A row driver that optionally fans out over rayon

use ndarray::{ArrayViewMut2, ArrayViewMut3, Axis};

/// Generate a normalized 1D Gaussian kernel.
///
/// Kernel size is `ceil(6 * sigma)` forced odd, covering 99.7% of the
/// distribution. A non-positive sigma yields the identity kernel `[1.0]`.
pub fn gaussian_kernel_1d(sigma: f32) -> Vec<f32> {
    if sigma <= 0.0 {
        return vec![1.0];
    }

    let kernel_size = ((sigma * 6.0).ceil() as usize) | 1;
    let half = kernel_size / 2;

    let mut kernel: Vec<f32> = (0..kernel_size)
        .map(|i| {
            let x = i as f32 - half as f32;
            (-x * x / (2.0 * sigma * sigma)).exp()
        })
        .collect();

    let sum: f32 = kernel.iter().sum();
    for v in kernel.iter_mut() {
        *v /= sum;
    }

    kernel
}

/// Clamp-to-edge: map `base + offset` onto `0..len`.
#[inline]
pub(crate) fn clamp_index(base: usize, offset: isize, len: usize) -> usize {
    (base as isize + offset).clamp(0, len as isize - 1) as usize
}

/// Background-outside: `None` when `base + offset` leaves `0..len`.
#[inline]
pub(crate) fn offset_index(base: usize, offset: isize, len: usize) -> Option<usize> {
    let i = base as isize + offset;
    if i < 0 || i >= len as isize {
        None
    } else {
        Some(i as usize)
    }
}

/// Round to nearest and clamp into a channel value.
#[inline]
pub(crate) fn to_channel(v: f32) -> u8 {
    v.round().clamp(0.0, 255.0) as u8
}

/// Run `f(y, row)` for every row of a `(height, width, channels)` array.
///
/// Each row is written independently, so with the `parallel` feature rows are
/// distributed over the rayon pool. The result is identical either way.
pub(crate) fn for_each_row<T, F>(mut output: ArrayViewMut3<'_, T>, f: F)
where
    T: Send + Sync,
    F: Fn(usize, ArrayViewMut2<'_, T>) + Sync + Send,
{
    #[cfg(feature = "parallel")]
    {
        use rayon::prelude::*;
        output
            .axis_iter_mut(Axis(0))
            .into_par_iter()
            .enumerate()
            .for_each(|(y, row)| f(y, row));
    }

    #[cfg(not(feature = "parallel"))]
    for (y, row) in output.axis_iter_mut(Axis(0)).enumerate() {
        f(y, row);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array3;

    #[test]
    fn test_gaussian_kernel_normalized_and_symmetric() {
        let k = gaussian_kernel_1d(1.5);
        assert_eq!(k.len() % 2, 1);
        let sum: f32 = k.iter().sum();
        assert!((sum - 1.0).abs() < 1e-5);
        for i in 0..k.len() / 2 {
            assert!((k[i] - k[k.len() - 1 - i]).abs() < 1e-6);
        }
    }

    #[test]
    fn test_gaussian_kernel_identity_for_zero_sigma() {
        assert_eq!(gaussian_kernel_1d(0.0), vec![1.0]);
    }

    #[test]
    fn test_clamp_index() {
        assert_eq!(clamp_index(0, -2, 5), 0);
        assert_eq!(clamp_index(4, 1, 5), 4);
        assert_eq!(clamp_index(2, 1, 5), 3);
    }

    #[test]
    fn test_offset_index() {
        assert_eq!(offset_index(0, -1, 5), None);
        assert_eq!(offset_index(4, 1, 5), None);
        assert_eq!(offset_index(4, -1, 5), Some(3));
    }

    #[test]
    fn test_to_channel_rounds_and_clamps() {
        assert_eq!(to_channel(63.75), 64);
        assert_eq!(to_channel(-3.0), 0);
        assert_eq!(to_channel(300.0), 255);
    }

    #[test]
    fn test_for_each_row_visits_every_row() {
        let mut out = Array3::<u8>::zeros((4, 3, 1));
        for_each_row(out.view_mut(), |y, mut row| {
            row.fill(y as u8 + 1);
        });
        for y in 0..4 {
            assert_eq!(out[[y, 2, 0]], y as u8 + 1);
        }
    }
}
