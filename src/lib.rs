//! ImageStag Raster
//!
//! Image-processing core for dense RGB8 pixel buffers: a 24-bit BMP codec
//! plus greyscale, threshold, erosion/dilation, Gaussian blur, median,
//! Sobel edges and connected-component counting. Python bindings are
//! available via PyO3 and JavaScript bindings via WASM.
//!
//! ## Image Format
//!
//! A [`PixelBuffer`] is a `(height, width, 3)` array of `u8` samples in
//! R, G, B order with a **top-left** origin. The codec translates from and to
//! BMP's bottom-up B, G, R rows.
//!
//! ## Ownership
//!
//! No component keeps a reference to "the current image". Transforms borrow
//! their input and hand back a new buffer the caller owns, or write into a
//! caller-supplied destination; the two never alias. The single
//! [`Snapshot`] holds its own copy for "restore last loaded".
//!
//! ## Fixed conventions
//!
//! | Concern | Choice |
//! |---------|--------|
//! | Luminance | BT.601 `0.299 R + 0.587 G + 0.114 B`, rounded |
//! | Threshold | luminance `>= 128` is white |
//! | Foreground | any non-black pixel |
//! | Structuring element | 3x3 cross, outside = background |
//! | Blur | 3x3 binomial, clamp-to-edge |
//! | Median | 3x3, clamp-to-edge |
//! | Edges | Sobel, Euclidean magnitude, clamp-to-edge |
//! | Components | 4-connectivity |
//!
//! ## Logging
//!
//! Codec and filters emit `tracing` events at debug/trace level. The crate
//! never installs a subscriber; the embedding front-end decides whether
//! anything is recorded.

pub mod buffer;
pub mod codec;
pub mod error;
pub mod filters;
pub mod selection;
pub mod snapshot;

#[cfg(feature = "wasm")]
pub mod wasm;

use std::path::Path;

pub use buffer::{PixelBuffer, Rgb8};
pub use error::{BufferError, DecodeError, EncodeError, Error, Result};
pub use filters::{
    binarize, detect_edges, dilate, erode, gaussian_blur, gaussian_blurred, median_filter,
    median_filtered, to_binary, to_binary_with, to_greyscale,
};
pub use selection::{count_components, count_components_with, Connectivity};
pub use snapshot::Snapshot;

// ============================================================================
// Collaborator-facing API
// ============================================================================

/// Load a 24-bit BMP file.
#[tracing::instrument(skip_all, fields(path = %path.as_ref().display()))]
pub fn load(path: impl AsRef<Path>) -> Result<PixelBuffer> {
    let buffer = codec::decode(path.as_ref())?;
    tracing::debug!(width = buffer.width(), height = buffer.height(), "image loaded");
    Ok(buffer)
}

/// Load a BMP file together with a snapshot of it for later restore.
pub fn load_with_snapshot(path: impl AsRef<Path>) -> Result<(PixelBuffer, Snapshot)> {
    let buffer = load(path)?;
    let snapshot = Snapshot::capture(&buffer);
    Ok((buffer, snapshot))
}

/// Save `buffer` as a 24-bit BMP file.
#[tracing::instrument(skip_all, fields(path = %path.as_ref().display()))]
pub fn save(path: impl AsRef<Path>, buffer: &PixelBuffer) -> Result<()> {
    codec::encode(buffer, path.as_ref())?;
    tracing::debug!(width = buffer.width(), height = buffer.height(), "image saved");
    Ok(())
}

/// Width in pixels.
pub fn width(buffer: &PixelBuffer) -> usize {
    buffer.width()
}

/// Height in pixels.
pub fn height(buffer: &PixelBuffer) -> usize {
    buffer.height()
}

/// Normalized sample for renderers, each channel in 0.0-1.0.
pub fn sample_as_float(buffer: &PixelBuffer, x: usize, y: usize) -> Result<(f32, f32, f32)> {
    Ok(buffer.get_as_float(x, y)?)
}

/// Deep copy for snapshot workflows.
pub fn copy(buffer: &PixelBuffer) -> PixelBuffer {
    buffer.copy()
}

/// Release a buffer the caller no longer needs.
pub fn destroy(buffer: PixelBuffer) {
    buffer.destroy();
}

// Python bindings (only when python feature is enabled)
#[cfg(feature = "python")]
mod python {
    use numpy::{IntoPyArray, PyArray3, PyReadonlyArray3};
    use pyo3::exceptions::{PyIOError, PyValueError};
    use pyo3::prelude::*;

    use crate::filters::{self, GaussianKernel, GradientNorm, StructuringElement};
    use crate::selection::{self, Connectivity};
    use crate::{Error, PixelBuffer};

    fn to_py_err(err: Error) -> PyErr {
        match err {
            Error::Buffer(e) => PyValueError::new_err(e.to_string()),
            Error::Decode(e) => PyIOError::new_err(e.to_string()),
            Error::Encode(e) => PyIOError::new_err(e.to_string()),
        }
    }

    fn to_buffer(image: PyReadonlyArray3<'_, u8>) -> PyResult<PixelBuffer> {
        PixelBuffer::from_array(image.as_array().to_owned())
            .map_err(|e| to_py_err(Error::Buffer(e)))
    }

    fn to_array<'py>(py: Python<'py>, buffer: PixelBuffer) -> Bound<'py, PyArray3<u8>> {
        buffer.into_array().into_pyarray(py)
    }

    // ========================================================================
    // Codec
    // ========================================================================

    /// Load a 24-bit BMP file as an (H, W, 3) u8 array.
    #[pyfunction]
    pub fn load_bmp<'py>(py: Python<'py>, path: &str) -> PyResult<Bound<'py, PyArray3<u8>>> {
        let buffer = crate::load(path).map_err(to_py_err)?;
        Ok(to_array(py, buffer))
    }

    /// Save an (H, W, 3) u8 array as a 24-bit BMP file.
    #[pyfunction]
    pub fn save_bmp(path: &str, image: PyReadonlyArray3<'_, u8>) -> PyResult<()> {
        let buffer = to_buffer(image)?;
        crate::save(path, &buffer).map_err(to_py_err)
    }

    // ========================================================================
    // Point operations
    // ========================================================================

    #[pyfunction]
    pub fn greyscale<'py>(
        py: Python<'py>,
        image: PyReadonlyArray3<'py, u8>,
    ) -> PyResult<Bound<'py, PyArray3<u8>>> {
        let buffer = to_buffer(image)?;
        Ok(to_array(py, filters::to_greyscale(&buffer)))
    }

    #[pyfunction]
    #[pyo3(signature = (image, threshold=filters::DEFAULT_THRESHOLD))]
    pub fn binary<'py>(
        py: Python<'py>,
        image: PyReadonlyArray3<'py, u8>,
        threshold: u8,
    ) -> PyResult<Bound<'py, PyArray3<u8>>> {
        let buffer = to_buffer(image)?;
        Ok(to_array(py, filters::to_binary_with(&buffer, threshold)))
    }

    // ========================================================================
    // Morphology
    // ========================================================================

    fn element(square: bool) -> StructuringElement {
        if square {
            StructuringElement::SQUARE_3X3
        } else {
            StructuringElement::CROSS_3X3
        }
    }

    #[pyfunction]
    #[pyo3(signature = (image, square=false))]
    pub fn erode<'py>(
        py: Python<'py>,
        image: PyReadonlyArray3<'py, u8>,
        square: bool,
    ) -> PyResult<Bound<'py, PyArray3<u8>>> {
        let buffer = to_buffer(image)?;
        Ok(to_array(py, filters::erode_with(&buffer, &element(square))))
    }

    #[pyfunction]
    #[pyo3(signature = (image, square=false))]
    pub fn dilate<'py>(
        py: Python<'py>,
        image: PyReadonlyArray3<'py, u8>,
        square: bool,
    ) -> PyResult<Bound<'py, PyArray3<u8>>> {
        let buffer = to_buffer(image)?;
        Ok(to_array(py, filters::dilate_with(&buffer, &element(square))))
    }

    // ========================================================================
    // Blur, median, edges
    // ========================================================================

    /// Gaussian blur. `sigma <= 0` selects the default 3x3 binomial kernel.
    #[pyfunction]
    #[pyo3(signature = (image, sigma=0.0))]
    pub fn gaussian_blur<'py>(
        py: Python<'py>,
        image: PyReadonlyArray3<'py, u8>,
        sigma: f32,
    ) -> PyResult<Bound<'py, PyArray3<u8>>> {
        let src = to_buffer(image)?;
        let kernel = if sigma > 0.0 {
            GaussianKernel::from_sigma(sigma)
        } else {
            GaussianKernel::default()
        };
        let mut dst = src.copy();
        filters::gaussian_blur_with(&src, &mut dst, &kernel)
            .map_err(|e| to_py_err(Error::Buffer(e)))?;
        Ok(to_array(py, dst))
    }

    #[pyfunction]
    #[pyo3(signature = (image, radius=1))]
    pub fn median<'py>(
        py: Python<'py>,
        image: PyReadonlyArray3<'py, u8>,
        radius: usize,
    ) -> PyResult<Bound<'py, PyArray3<u8>>> {
        let mut buffer = to_buffer(image)?;
        filters::median_filter_with(&mut buffer, radius);
        Ok(to_array(py, buffer))
    }

    #[pyfunction]
    #[pyo3(signature = (image, manhattan=false))]
    pub fn edges<'py>(
        py: Python<'py>,
        image: PyReadonlyArray3<'py, u8>,
        manhattan: bool,
    ) -> PyResult<Bound<'py, PyArray3<u8>>> {
        let buffer = to_buffer(image)?;
        let norm = if manhattan {
            GradientNorm::Manhattan
        } else {
            GradientNorm::Euclidean
        };
        Ok(to_array(py, filters::detect_edges_with(&buffer, norm)))
    }

    // ========================================================================
    // Components
    // ========================================================================

    #[pyfunction]
    #[pyo3(signature = (image, eight_connected=false))]
    pub fn count_components(image: PyReadonlyArray3<'_, u8>, eight_connected: bool) -> PyResult<usize> {
        let buffer = to_buffer(image)?;
        let connectivity = if eight_connected {
            Connectivity::Eight
        } else {
            Connectivity::Four
        };
        Ok(selection::count_components_with(&buffer, connectivity))
    }

    /// ImageStag raster extension module
    #[pymodule]
    pub fn imagestag_raster(m: &Bound<'_, PyModule>) -> PyResult<()> {
        // Codec
        m.add_function(wrap_pyfunction!(load_bmp, m)?)?;
        m.add_function(wrap_pyfunction!(save_bmp, m)?)?;

        // Point operations
        m.add_function(wrap_pyfunction!(greyscale, m)?)?;
        m.add_function(wrap_pyfunction!(binary, m)?)?;

        // Morphology
        m.add_function(wrap_pyfunction!(erode, m)?)?;
        m.add_function(wrap_pyfunction!(dilate, m)?)?;

        // Neighborhood filters
        m.add_function(wrap_pyfunction!(gaussian_blur, m)?)?;
        m.add_function(wrap_pyfunction!(median, m)?)?;
        m.add_function(wrap_pyfunction!(edges, m)?)?;

        // Components
        m.add_function(wrap_pyfunction!(count_components, m)?)?;

        Ok(())
    }
}

#[cfg(feature = "python")]
pub use python::imagestag_raster;

#[cfg(test)]
mod tests {
    use super::*;

    fn blobs() -> PixelBuffer {
        PixelBuffer::from_fn(16, 12, |x, y| {
            let in_a = (2..6).contains(&x) && (2..6).contains(&y);
            let in_b = (9..14).contains(&x) && (5..10).contains(&y);
            if in_a || in_b {
                Rgb8::new(220, 180, 40)
            } else {
                Rgb8::new(20, 30, 60)
            }
        })
        .unwrap()
    }

    #[test]
    fn test_save_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("blobs.bmp");
        let img = blobs();

        save(&path, &img).unwrap();
        let (loaded, snapshot) = load_with_snapshot(&path).unwrap();

        assert_eq!(loaded, img);
        assert_eq!(snapshot.restore(), img);
        assert_eq!((width(&loaded), height(&loaded)), (16, 12));
    }

    #[test]
    fn test_load_missing_is_decode_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load(dir.path().join("nope.bmp")).unwrap_err();
        assert!(matches!(err, Error::Decode(DecodeError::Open { .. })));
    }

    #[test]
    fn test_sample_as_float_bounds() {
        let img = blobs();
        let (r, _, _) = sample_as_float(&img, 3, 3).unwrap();
        assert!((r - 220.0 / 255.0).abs() < 1e-6);
        assert!(matches!(
            sample_as_float(&img, 16, 0),
            Err(Error::Buffer(BufferError::OutOfBounds { .. }))
        ));
    }

    #[test]
    fn test_paint_session_pipeline() {
        // load -> binarize -> erode -> dilate -> count -> restore
        let original = blobs();
        let snapshot = Snapshot::capture(&original);

        let binary = binarize(&original);
        assert_eq!(count_components(&binary), 2);

        let opened = dilate(&erode(&binary));
        assert_eq!(count_components(&opened), 2);

        let mut smoothed = gaussian_blurred(&opened);
        median_filter(&mut smoothed);
        let edges = detect_edges(&smoothed);
        assert!(edges.pixels().any(|(_, _, c)| c.is_foreground()));

        destroy(binary);
        let restored = snapshot.restore();
        assert_eq!(restored, original);
        assert_eq!(copy(&restored), original);
    }
}
