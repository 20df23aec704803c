//! Raster file codec.
//!
//! Only uncompressed 24-bit BMP is supported (see [`bmp`]). The path-based
//! entry points open, fully read or write, and close the file within the
//! call; no handle outlives it.

pub mod bmp;

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use crate::buffer::PixelBuffer;
use crate::error::{DecodeError, EncodeError};

pub use bmp::{decode_bytes, decode_from, encode_to, encode_to_vec};

/// Decode the BMP file at `path`.
pub fn decode(path: impl AsRef<Path>) -> Result<PixelBuffer, DecodeError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| DecodeError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    bmp::decode_from(BufReader::new(file))
}

/// Encode `buffer` as a BMP file at `path`, replacing any existing file.
pub fn encode(buffer: &PixelBuffer, path: impl AsRef<Path>) -> Result<(), EncodeError> {
    let path = path.as_ref();
    let file = File::create(path).map_err(|source| EncodeError::Create {
        path: path.to_path_buf(),
        source,
    })?;
    bmp::encode_to(buffer, BufWriter::new(file))
}
