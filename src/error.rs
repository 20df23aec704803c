//! Error types for buffer access and the BMP codec.
//!
//! Filters never fail on a valid buffer, so only the buffer accessors and
//! the codec boundary surface errors. `Error` wraps all of them for callers
//! that just want one type.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors raised by [`PixelBuffer`](crate::PixelBuffer) construction and access.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BufferError {
    #[error("invalid dimensions {width}x{height}: both must be positive")]
    InvalidDimension { width: usize, height: usize },

    #[error("pixel ({x}, {y}) is outside the {width}x{height} buffer")]
    OutOfBounds {
        x: usize,
        y: usize,
        width: usize,
        height: usize,
    },

    #[error("expected {expected} samples, got {actual}")]
    SampleCount { expected: usize, actual: usize },

    #[error("source is {src_width}x{src_height} but destination is {dst_width}x{dst_height}")]
    DimensionMismatch {
        src_width: usize,
        src_height: usize,
        dst_width: usize,
        dst_height: usize,
    },
}

/// Errors raised while decoding a BMP stream.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("cannot open {}: {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("read failed: {0}")]
    Io(io::Error),

    #[error("file ends before the header or pixel data is complete")]
    TruncatedFile,

    #[error("bad signature {0:02x?}, expected \"BM\"")]
    BadSignature([u8; 2]),

    #[error("unsupported DIB header of {0} bytes")]
    UnsupportedHeader(u32),

    #[error("unsupported format: {bits_per_pixel} bits per pixel, compression {compression}")]
    UnsupportedFormat { bits_per_pixel: u16, compression: u32 },

    #[error("invalid header: {0}")]
    InvalidHeader(&'static str),

    #[error(transparent)]
    InvalidDimension(#[from] BufferError),
}

// A short read anywhere in the stream means the file was cut off.
impl From<io::Error> for DecodeError {
    fn from(err: io::Error) -> Self {
        if err.kind() == io::ErrorKind::UnexpectedEof {
            DecodeError::TruncatedFile
        } else {
            DecodeError::Io(err)
        }
    }
}

/// Errors raised while encoding a BMP stream.
#[derive(Debug, Error)]
pub enum EncodeError {
    #[error("cannot create {}: {source}", path.display())]
    Create {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("write failed: {0}")]
    Io(#[from] io::Error),

    #[error("{width}x{height} does not fit in a BMP header")]
    TooLarge { width: usize, height: usize },
}

/// Umbrella error for the collaborator-facing API.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Buffer(#[from] BufferError),

    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error(transparent)]
    Encode(#[from] EncodeError),
}

/// Alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_eof_maps_to_truncated() {
        let err: DecodeError = io::Error::from(io::ErrorKind::UnexpectedEof).into();
        assert!(matches!(err, DecodeError::TruncatedFile));
    }

    #[test]
    fn test_other_io_kept() {
        let err: DecodeError = io::Error::from(io::ErrorKind::PermissionDenied).into();
        assert!(matches!(err, DecodeError::Io(_)));
    }

    #[test]
    fn test_umbrella_message_is_transparent() {
        let err: Error = BufferError::InvalidDimension { width: 0, height: 3 }.into();
        assert_eq!(err.to_string(), "invalid dimensions 0x3: both must be positive");
    }
}
