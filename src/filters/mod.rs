//! Filter modules operating on [`PixelBuffer`](crate::PixelBuffer).
//!
//! ## Categories
//!
//! | Module | Operations | Output |
//! |--------|------------|--------|
//! | [`grayscale`] | to_greyscale | new buffer, R=G=B |
//! | [`threshold`] | to_binary, binarize | new buffer, black/white |
//! | [`morphology`] | erode, dilate | new buffer, black/white |
//! | [`blur`] | gaussian_blur | separate destination |
//! | [`median`] | median_filter | in place (internal scratch) or separate destination |
//! | [`edge`] | detect_edges | new buffer, R=G=B |
//!
//! ## Border policies
//!
//! - **Morphology**: pixels outside the image are background.
//! - **Blur, median, edges**: clamp-to-edge, the nearest valid pixel is
//!   repeated.
//!
//! ## Architecture
//!
//! - **No aliasing** - neighborhood filters always read an unmodified source
//! - **Input untouched** - filters that return a buffer never mutate their input
//! - **Deterministic** - the `parallel` feature splits work by rows via rayon
//!   and produces identical results

pub mod core;
pub mod grayscale;
pub mod threshold;
pub mod morphology;
pub mod blur;
pub mod median;
pub mod edge;

pub use blur::{gaussian_blur, gaussian_blur_with, gaussian_blurred, GaussianKernel};
pub use edge::{detect_edges, detect_edges_with, GradientNorm};
pub use grayscale::{luminance, to_greyscale, to_greyscale_weighted, GrayscaleWeights};
pub use median::{median_filter, median_filter_into, median_filter_with, median_filtered};
pub use morphology::{dilate, dilate_with, erode, erode_with, StructuringElement};
pub use threshold::{binarize, to_binary, to_binary_with, DEFAULT_THRESHOLD};
