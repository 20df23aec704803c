//! Median filter.
//!
//! Per-channel median over a `(2r+1) x (2r+1)` window with clamp-to-edge
//! borders. Every output sample is computed from the unmodified source, so
//! already-filtered neighbors never feed back into the same pass. The
//! in-place entry point snapshots the source before writing.

use crate::buffer::{PixelBuffer, CHANNELS};
use crate::error::BufferError;
use crate::filters::core::{clamp_index, for_each_row};

/// Window radius used by [`median_filter`]: a 3x3 window.
pub const DEFAULT_RADIUS: usize = 1;

/// Largest accepted radius; larger values are clamped.
pub const MAX_RADIUS: usize = 10;

/// Median-filter a buffer in place with a 3x3 window.
pub fn median_filter(buffer: &mut PixelBuffer) {
    median_filter_with(buffer, DEFAULT_RADIUS);
}

/// Median-filter a buffer in place with the given radius (clamped to
/// [`MAX_RADIUS`]).
pub fn median_filter_with(buffer: &mut PixelBuffer, radius: usize) {
    let src = buffer.copy();
    filter_into(&src, buffer, radius);
}

/// Median-filter into a new buffer with a 3x3 window.
pub fn median_filtered(src: &PixelBuffer) -> PixelBuffer {
    let mut dst = src.copy();
    filter_into(src, &mut dst, DEFAULT_RADIUS);
    dst
}

/// Median-filter `src` into a separate `dst` of the same shape.
pub fn median_filter_into(
    src: &PixelBuffer,
    dst: &mut PixelBuffer,
    radius: usize,
) -> Result<(), BufferError> {
    if src.dimensions() != dst.dimensions() {
        return Err(BufferError::DimensionMismatch {
            src_width: src.width(),
            src_height: src.height(),
            dst_width: dst.width(),
            dst_height: dst.height(),
        });
    }
    filter_into(src, dst, radius);
    Ok(())
}

fn filter_into(src: &PixelBuffer, dst: &mut PixelBuffer, radius: usize) {
    let (width, height) = src.dimensions();
    let radius = radius.min(MAX_RADIUS) as isize;
    let window_size = ((radius * 2 + 1) * (radius * 2 + 1)) as usize;
    let input = src.view();

    for_each_row(dst.view_mut(), |y, mut row| {
        let mut values: Vec<u8> = Vec::with_capacity(window_size);
        for x in 0..width {
            for c in 0..CHANNELS {
                values.clear();
                for dy in -radius..=radius {
                    let sy = clamp_index(y, dy, height);
                    for dx in -radius..=radius {
                        let sx = clamp_index(x, dx, width);
                        values.push(input[[sy, sx, c]]);
                    }
                }
                let mid = values.len() / 2;
                row[[x, c]] = *values.select_nth_unstable(mid).1;
            }
        }
    });
}
