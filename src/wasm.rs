//! WebAssembly exports for the raster core.
//!
//! These functions are exposed to JavaScript via wasm-bindgen.
//!
//! ## Data Layout
//!
//! Images cross the boundary as flat RGB byte arrays
//! (length = width * height * 3), row-major with a top-left origin.
//! BMP files cross as their raw bytes.

use wasm_bindgen::prelude::*;

use crate::buffer::PixelBuffer;
use crate::codec;
use crate::filters;
use crate::selection;

fn to_buffer(data: &[u8], width: usize, height: usize) -> Result<PixelBuffer, JsValue> {
    PixelBuffer::from_raw(width, height, data.to_vec())
        .map_err(|e| JsValue::from_str(&e.to_string()))
}

// ============================================================================
// Codec
// ============================================================================

/// Decode BMP bytes into flat RGB; width and height are prepended as two
/// little-endian u32 values.
#[wasm_bindgen]
pub fn decode_bmp_wasm(bytes: &[u8]) -> Result<Vec<u8>, JsValue> {
    let buffer = codec::decode_bytes(bytes).map_err(|e| JsValue::from_str(&e.to_string()))?;
    let mut out = Vec::with_capacity(8 + buffer.width() * buffer.height() * 3);
    out.extend_from_slice(&(buffer.width() as u32).to_le_bytes());
    out.extend_from_slice(&(buffer.height() as u32).to_le_bytes());
    out.extend(buffer.view().iter().copied());
    Ok(out)
}

/// Encode flat RGB into BMP bytes.
#[wasm_bindgen]
pub fn encode_bmp_wasm(data: &[u8], width: usize, height: usize) -> Result<Vec<u8>, JsValue> {
    let buffer = to_buffer(data, width, height)?;
    codec::encode_to_vec(&buffer).map_err(|e| JsValue::from_str(&e.to_string()))
}

// ============================================================================
// Filters
// ============================================================================

#[wasm_bindgen]
pub fn greyscale_wasm(data: &[u8], width: usize, height: usize) -> Result<Vec<u8>, JsValue> {
    Ok(filters::to_greyscale(&to_buffer(data, width, height)?).to_raw())
}

#[wasm_bindgen]
pub fn binary_wasm(
    data: &[u8],
    width: usize,
    height: usize,
    threshold: u8,
) -> Result<Vec<u8>, JsValue> {
    Ok(filters::to_binary_with(&to_buffer(data, width, height)?, threshold).to_raw())
}

#[wasm_bindgen]
pub fn erode_wasm(data: &[u8], width: usize, height: usize) -> Result<Vec<u8>, JsValue> {
    Ok(filters::erode(&to_buffer(data, width, height)?).to_raw())
}

#[wasm_bindgen]
pub fn dilate_wasm(data: &[u8], width: usize, height: usize) -> Result<Vec<u8>, JsValue> {
    Ok(filters::dilate(&to_buffer(data, width, height)?).to_raw())
}

#[wasm_bindgen]
pub fn gaussian_blur_wasm(data: &[u8], width: usize, height: usize) -> Result<Vec<u8>, JsValue> {
    Ok(filters::gaussian_blurred(&to_buffer(data, width, height)?).to_raw())
}

#[wasm_bindgen]
pub fn median_wasm(data: &[u8], width: usize, height: usize) -> Result<Vec<u8>, JsValue> {
    let mut buffer = to_buffer(data, width, height)?;
    filters::median_filter(&mut buffer);
    Ok(buffer.to_raw())
}

#[wasm_bindgen]
pub fn edges_wasm(data: &[u8], width: usize, height: usize) -> Result<Vec<u8>, JsValue> {
    Ok(filters::detect_edges(&to_buffer(data, width, height)?).to_raw())
}

#[wasm_bindgen]
pub fn count_components_wasm(data: &[u8], width: usize, height: usize) -> Result<usize, JsValue> {
    Ok(selection::count_components(&to_buffer(data, width, height)?))
}
