//! Single "restore last loaded" snapshot.
//!
//! The snapshot owns its own deep copy, so later edits to the working
//! buffer never reach it, and every restore hands out a fresh copy.

use crate::buffer::PixelBuffer;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    original: PixelBuffer,
}

impl Snapshot {
    /// Capture a deep copy of `buffer`.
    pub fn capture(buffer: &PixelBuffer) -> Self {
        Self {
            original: buffer.copy(),
        }
    }

    /// A new, independent copy of the captured buffer.
    pub fn restore(&self) -> PixelBuffer {
        self.original.copy()
    }

    pub fn original(&self) -> &PixelBuffer {
        &self.original
    }
}
