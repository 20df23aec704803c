//! The shared pixel buffer every codec and filter operates on.
//!
//! ## Layout
//!
//! Samples live in an `ndarray::Array3<u8>` of shape `(height, width, 3)`,
//! row-major, channels in R, G, B order. The origin is the **top-left**
//! corner: `y = 0` is the top row. The BMP codec converts to and from the
//! file's bottom-up row order, so a renderer with a bottom-left origin must
//! flip `y` itself.
//!
//! The shape is fixed at construction. Filters either return a new buffer
//! or write samples into an existing one, never resize it.

use ndarray::{Array3, ArrayView3, ArrayViewMut3};

use crate::error::BufferError;

/// Number of channels per sample.
pub const CHANNELS: usize = 3;

/// One RGB8 sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rgb8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb8 {
    pub const BLACK: Rgb8 = Rgb8::new(0, 0, 0);
    pub const WHITE: Rgb8 = Rgb8::new(255, 255, 255);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Same value in all three channels.
    pub const fn gray(v: u8) -> Self {
        Self { r: v, g: v, b: v }
    }

    /// Foreground is anything that is not pure black.
    #[inline]
    pub const fn is_foreground(self) -> bool {
        self.r != 0 || self.g != 0 || self.b != 0
    }

    /// Channels normalized to 0.0-1.0.
    #[inline]
    pub fn to_f32(self) -> (f32, f32, f32) {
        (
            self.r as f32 / 255.0,
            self.g as f32 / 255.0,
            self.b as f32 / 255.0,
        )
    }
}

impl From<[u8; 3]> for Rgb8 {
    fn from([r, g, b]: [u8; 3]) -> Self {
        Self { r, g, b }
    }
}

impl From<Rgb8> for [u8; 3] {
    fn from(c: Rgb8) -> Self {
        [c.r, c.g, c.b]
    }
}

/// An owned `width x height` grid of RGB8 samples.
///
/// `Clone` and [`PixelBuffer::copy`] both produce independent storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    data: Array3<u8>,
}

impl PixelBuffer {
    /// Allocate a black buffer.
    pub fn new(width: usize, height: usize) -> Result<Self, BufferError> {
        check_dimensions(width, height)?;
        Ok(Self {
            data: Array3::zeros((height, width, CHANNELS)),
        })
    }

    /// Allocate a buffer filled with one color.
    pub fn filled(width: usize, height: usize, color: Rgb8) -> Result<Self, BufferError> {
        let mut buffer = Self::new(width, height)?;
        buffer.fill(color);
        Ok(buffer)
    }

    /// Build a buffer by evaluating `f(x, y)` for every pixel.
    pub fn from_fn(
        width: usize,
        height: usize,
        mut f: impl FnMut(usize, usize) -> Rgb8,
    ) -> Result<Self, BufferError> {
        let mut buffer = Self::new(width, height)?;
        for y in 0..height {
            for x in 0..width {
                buffer.put(x, y, f(x, y));
            }
        }
        Ok(buffer)
    }

    /// Wrap an existing `(height, width, 3)` array.
    pub fn from_array(data: Array3<u8>) -> Result<Self, BufferError> {
        let (height, width, channels) = data.dim();
        let expected = sample_len(width, height)?;
        if channels != CHANNELS {
            return Err(BufferError::SampleCount {
                expected,
                actual: data.len(),
            });
        }
        Ok(Self { data })
    }

    /// Wrap a flat row-major RGB byte vector.
    pub fn from_raw(width: usize, height: usize, samples: Vec<u8>) -> Result<Self, BufferError> {
        let expected = sample_len(width, height)?;
        if samples.len() != expected {
            return Err(BufferError::SampleCount {
                expected,
                actual: samples.len(),
            });
        }
        let data = Array3::from_shape_vec((height, width, CHANNELS), samples).map_err(|_| {
            BufferError::SampleCount {
                expected,
                actual: expected,
            }
        })?;
        Ok(Self { data })
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.data.dim().1
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.data.dim().0
    }

    /// `(width, height)`
    #[inline]
    pub fn dimensions(&self) -> (usize, usize) {
        (self.width(), self.height())
    }

    #[inline]
    pub fn contains(&self, x: usize, y: usize) -> bool {
        x < self.width() && y < self.height()
    }

    /// Read one sample, validating the coordinates.
    pub fn get(&self, x: usize, y: usize) -> Result<Rgb8, BufferError> {
        self.check(x, y)?;
        Ok(self.pixel(x, y))
    }

    /// Write one sample, validating the coordinates.
    pub fn set(&mut self, x: usize, y: usize, color: Rgb8) -> Result<(), BufferError> {
        self.check(x, y)?;
        self.put(x, y, color);
        Ok(())
    }

    /// Normalized sample for renderers: each channel in 0.0-1.0.
    pub fn get_as_float(&self, x: usize, y: usize) -> Result<(f32, f32, f32), BufferError> {
        Ok(self.get(x, y)?.to_f32())
    }

    /// Deep copy with independent storage.
    pub fn copy(&self) -> Self {
        self.clone()
    }

    /// Release the buffer. Equivalent to dropping it.
    pub fn destroy(self) {}

    /// Set every sample to `color`.
    pub fn fill(&mut self, color: Rgb8) {
        for mut px in self.data.rows_mut() {
            px[0] = color.r;
            px[1] = color.g;
            px[2] = color.b;
        }
    }

    /// Iterate samples in row-major order as `(x, y, color)`.
    pub fn pixels(&self) -> impl Iterator<Item = (usize, usize, Rgb8)> + '_ {
        let width = self.width();
        self.data.rows().into_iter().enumerate().map(move |(i, px)| {
            (i % width, i / width, Rgb8::new(px[0], px[1], px[2]))
        })
    }

    pub fn view(&self) -> ArrayView3<'_, u8> {
        self.data.view()
    }

    /// Mutable view of the samples. The shape cannot change through it.
    pub fn view_mut(&mut self) -> ArrayViewMut3<'_, u8> {
        self.data.view_mut()
    }

    /// Consume the buffer, returning the `(height, width, 3)` array.
    pub fn into_array(self) -> Array3<u8> {
        self.data
    }

    /// Flat row-major RGB bytes.
    pub fn to_raw(&self) -> Vec<u8> {
        self.data.iter().copied().collect()
    }

    /// Unchecked read for inner loops whose coordinates are already in range.
    /// Panics on out-of-range coordinates.
    #[inline]
    pub(crate) fn pixel(&self, x: usize, y: usize) -> Rgb8 {
        Rgb8::new(
            self.data[[y, x, 0]],
            self.data[[y, x, 1]],
            self.data[[y, x, 2]],
        )
    }

    /// Unchecked counterpart of [`PixelBuffer::pixel`].
    #[inline]
    pub(crate) fn put(&mut self, x: usize, y: usize, color: Rgb8) {
        self.data[[y, x, 0]] = color.r;
        self.data[[y, x, 1]] = color.g;
        self.data[[y, x, 2]] = color.b;
    }

    fn check(&self, x: usize, y: usize) -> Result<(), BufferError> {
        if self.contains(x, y) {
            Ok(())
        } else {
            Err(BufferError::OutOfBounds {
                x,
                y,
                width: self.width(),
                height: self.height(),
            })
        }
    }
}

fn check_dimensions(width: usize, height: usize) -> Result<(), BufferError> {
    sample_len(width, height).map(|_| ())
}

/// Number of samples in a `width x height` RGB buffer.
///
/// Zero-sized shapes and shapes whose byte length does not fit in `isize`
/// are rejected.
pub(crate) fn sample_len(width: usize, height: usize) -> Result<usize, BufferError> {
    width
        .checked_mul(height)
        .and_then(|n| n.checked_mul(CHANNELS))
        .filter(|&n| n != 0 && n <= isize::MAX as usize)
        .ok_or(BufferError::InvalidDimension { width, height })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_is_black() {
        let buf = PixelBuffer::new(4, 3).unwrap();
        assert_eq!(buf.dimensions(), (4, 3));
        assert!(buf.pixels().all(|(_, _, c)| c == Rgb8::BLACK));
    }

    #[test]
    fn test_zero_dimension_rejected() {
        assert_eq!(
            PixelBuffer::new(0, 5),
            Err(BufferError::InvalidDimension { width: 0, height: 5 })
        );
        assert!(PixelBuffer::new(5, 0).is_err());
    }

    #[test]
    fn test_get_set_bounds() {
        let mut buf = PixelBuffer::new(2, 2).unwrap();
        buf.set(1, 0, Rgb8::new(10, 20, 30)).unwrap();
        assert_eq!(buf.get(1, 0).unwrap(), Rgb8::new(10, 20, 30));
        assert_eq!(
            buf.get(2, 0),
            Err(BufferError::OutOfBounds { x: 2, y: 0, width: 2, height: 2 })
        );
        assert!(buf.set(0, 2, Rgb8::WHITE).is_err());
    }

    #[test]
    fn test_copy_is_independent() {
        let mut a = PixelBuffer::new(3, 3).unwrap();
        let b = a.copy();
        a.set(0, 0, Rgb8::WHITE).unwrap();
        assert_eq!(b.get(0, 0).unwrap(), Rgb8::BLACK);
        assert_ne!(a, b);
    }

    #[test]
    fn test_get_as_float() {
        let buf = PixelBuffer::filled(1, 1, Rgb8::new(255, 0, 51)).unwrap();
        let (r, g, b) = buf.get_as_float(0, 0).unwrap();
        assert!((r - 1.0).abs() < 1e-6);
        assert_eq!(g, 0.0);
        assert!((b - 0.2).abs() < 1e-6);
    }

    #[test]
    fn test_from_raw_is_row_major() {
        let buf = PixelBuffer::from_raw(2, 1, vec![1, 2, 3, 4, 5, 6]).unwrap();
        assert_eq!(buf.get(1, 0).unwrap(), Rgb8::new(4, 5, 6));
        assert_eq!(buf.to_raw(), vec![1, 2, 3, 4, 5, 6]);
        assert!(matches!(
            PixelBuffer::from_raw(2, 2, vec![0; 5]),
            Err(BufferError::SampleCount { expected: 12, actual: 5 })
        ));
    }

    #[test]
    fn test_overflowing_dimensions_rejected() {
        assert_eq!(
            PixelBuffer::from_raw(usize::MAX, 2, Vec::new()),
            Err(BufferError::InvalidDimension { width: usize::MAX, height: 2 })
        );
        assert!(matches!(
            PixelBuffer::from_raw(usize::MAX / 3 + 1, 1, Vec::new()),
            Err(BufferError::InvalidDimension { .. })
        ));
        assert!(matches!(
            PixelBuffer::new(usize::MAX / 2, usize::MAX / 2),
            Err(BufferError::InvalidDimension { .. })
        ));
    }

    #[test]
    fn test_from_array_requires_rgb() {
        assert!(PixelBuffer::from_array(Array3::zeros((2, 2, 4))).is_err());
        assert!(PixelBuffer::from_array(Array3::zeros((2, 2, 3))).is_ok());
    }

    #[test]
    fn test_pixels_coordinates() {
        let buf = PixelBuffer::from_fn(3, 2, |x, y| Rgb8::gray((y * 3 + x) as u8)).unwrap();
        for (x, y, c) in buf.pixels() {
            assert_eq!(c.r as usize, y * 3 + x);
        }
    }

    #[test]
    fn test_foreground() {
        assert!(!Rgb8::BLACK.is_foreground());
        assert!(Rgb8::new(0, 0, 1).is_foreground());
    }
}
