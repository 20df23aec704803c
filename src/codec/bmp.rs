//! Uncompressed 24-bit BMP.
//!
//! ## Layout
//!
//! | Offset | Size | Field |
//! |--------|------|-------|
//! | 0 | 2 | signature `BM` |
//! | 2 | 4 | file size |
//! | 6 | 4 | reserved (0) |
//! | 10 | 4 | pixel data offset |
//! | 14 | 4 | DIB header size (40 for BITMAPINFOHEADER) |
//! | 18 | 4 | width (i32) |
//! | 22 | 4 | height (i32, negative = top-down rows) |
//! | 26 | 2 | planes (1) |
//! | 28 | 2 | bits per pixel (24) |
//! | 30 | 4 | compression (0 = none) |
//! | 34 | 4 | image size |
//! | 38 | 8 | horizontal / vertical resolution (px/m) |
//! | 46 | 8 | palette colors used / important (0) |
//!
//! Pixel rows are stored B, G, R per sample and padded with zero bytes to a
//! multiple of 4. Rows are bottom-up unless the height is negative. Decoding
//! strips the padding and reorders into the buffer's top-left R, G, B layout;
//! encoding always writes bottom-up rows with the padding restored.
//!
//! All integers are little-endian.

use std::io::{self, Read, Write};

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};

use crate::buffer::{PixelBuffer, CHANNELS};
use crate::error::{BufferError, DecodeError, EncodeError};

pub const SIGNATURE: [u8; 2] = *b"BM";
pub const FILE_HEADER_SIZE: u32 = 14;
pub const INFO_HEADER_SIZE: u32 = 40;
pub const PIXEL_DATA_OFFSET: u32 = FILE_HEADER_SIZE + INFO_HEADER_SIZE;
pub const BITS_PER_PIXEL: u16 = 24;
pub const COMPRESSION_NONE: u32 = 0;
/// 72 DPI expressed in pixels per meter.
pub const PIXELS_PER_METER: i32 = 2835;
/// Largest image the decoder accepts (16384 x 16384). Headers claiming more
/// are rejected as `InvalidHeader` before anything is allocated.
pub const MAX_PIXELS: usize = 1 << 28;

/// Bytes per stored row, including padding to a multiple of 4.
#[inline]
pub fn row_stride(width: usize) -> usize {
    (width * CHANNELS + 3) & !3
}

/// Header fields that matter for decoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BmpHeader {
    pub file_size: u32,
    pub pixel_offset: u32,
    pub dib_size: u32,
    pub width: i32,
    pub height: i32,
    pub planes: u16,
    pub bits_per_pixel: u16,
    pub compression: u32,
    pub image_size: u32,
}

impl BmpHeader {
    /// Read both headers, leaving the reader just past the 40-byte info block.
    pub fn read_from<R: Read>(reader: &mut R) -> Result<Self, DecodeError> {
        let mut signature = [0u8; 2];
        reader.read_exact(&mut signature)?;
        if signature != SIGNATURE {
            return Err(DecodeError::BadSignature(signature));
        }

        let file_size = reader.read_u32::<LittleEndian>()?;
        let _reserved = reader.read_u32::<LittleEndian>()?;
        let pixel_offset = reader.read_u32::<LittleEndian>()?;

        let dib_size = reader.read_u32::<LittleEndian>()?;
        if dib_size < INFO_HEADER_SIZE {
            return Err(DecodeError::UnsupportedHeader(dib_size));
        }

        let width = reader.read_i32::<LittleEndian>()?;
        let height = reader.read_i32::<LittleEndian>()?;
        let planes = reader.read_u16::<LittleEndian>()?;
        let bits_per_pixel = reader.read_u16::<LittleEndian>()?;
        let compression = reader.read_u32::<LittleEndian>()?;
        let image_size = reader.read_u32::<LittleEndian>()?;
        let _x_ppm = reader.read_i32::<LittleEndian>()?;
        let _y_ppm = reader.read_i32::<LittleEndian>()?;
        let _colors_used = reader.read_u32::<LittleEndian>()?;
        let _colors_important = reader.read_u32::<LittleEndian>()?;

        Ok(Self {
            file_size,
            pixel_offset,
            dib_size,
            width,
            height,
            planes,
            bits_per_pixel,
            compression,
            image_size,
        })
    }

    /// Rows are stored top row first.
    pub fn is_top_down(&self) -> bool {
        self.height < 0
    }
}

/// Decode a 24-bit BMP stream.
///
/// Consumes exactly the headers plus the pixel rows; anything after the last
/// row is left unread.
pub fn decode_from<R: Read>(mut reader: R) -> Result<PixelBuffer, DecodeError> {
    let header = BmpHeader::read_from(&mut reader)?;

    if header.bits_per_pixel != BITS_PER_PIXEL || header.compression != COMPRESSION_NONE {
        return Err(DecodeError::UnsupportedFormat {
            bits_per_pixel: header.bits_per_pixel,
            compression: header.compression,
        });
    }
    if header.planes != 1 {
        return Err(DecodeError::InvalidHeader("planes must be 1"));
    }
    if header.width <= 0 || header.height == 0 {
        return Err(DecodeError::InvalidDimension(BufferError::InvalidDimension {
            width: header.width.max(0) as usize,
            height: header.height.unsigned_abs() as usize,
        }));
    }

    let width = header.width as usize;
    let height = header.height.unsigned_abs() as usize;
    let too_large = || DecodeError::InvalidHeader("dimensions too large");
    match width.checked_mul(height) {
        Some(n) if n <= MAX_PIXELS => {}
        _ => return Err(too_large()),
    }

    // Skip any extended DIB fields and gap up to the pixel array.
    let consumed = FILE_HEADER_SIZE + INFO_HEADER_SIZE;
    let header_end = FILE_HEADER_SIZE
        .checked_add(header.dib_size)
        .ok_or(DecodeError::InvalidHeader("DIB header size overflows"))?;
    if header.pixel_offset < header_end {
        return Err(DecodeError::InvalidHeader("pixel data overlaps the header"));
    }
    let skip = u64::from(header.pixel_offset - consumed);
    let skipped = io::copy(&mut reader.by_ref().take(skip), &mut io::sink())?;
    if skipped != skip {
        return Err(DecodeError::TruncatedFile);
    }

    let stride = row_stride(width);
    let pixel_bytes = stride.checked_mul(height).ok_or_else(too_large)?;
    tracing::debug!(width, height, stride, top_down = header.is_top_down(), "decoding BMP");

    // Grows with the bytes actually present, so a short file fails before
    // the full image is allocated.
    let mut pixels = Vec::new();
    reader.take(pixel_bytes as u64).read_to_end(&mut pixels)?;
    if pixels.len() != pixel_bytes {
        return Err(DecodeError::TruncatedFile);
    }

    let line = width * CHANNELS;
    let mut samples = vec![0u8; height * line];
    for (file_row, row) in pixels.chunks_exact(stride).enumerate() {
        let y = if header.is_top_down() {
            file_row
        } else {
            height - 1 - file_row
        };
        let out = &mut samples[y * line..(y + 1) * line];
        for (rgb, bgr) in out.chunks_exact_mut(CHANNELS).zip(row.chunks_exact(CHANNELS)) {
            rgb[0] = bgr[2];
            rgb[1] = bgr[1];
            rgb[2] = bgr[0];
        }
    }

    Ok(PixelBuffer::from_raw(width, height, samples)?)
}

/// Decode a BMP held in memory.
pub fn decode_bytes(bytes: &[u8]) -> Result<PixelBuffer, DecodeError> {
    decode_from(bytes)
}

/// Encode as a bottom-up 24-bit BMP.
pub fn encode_to<W: Write>(buffer: &PixelBuffer, mut writer: W) -> Result<(), EncodeError> {
    let (width, height) = buffer.dimensions();
    let stride = row_stride(width);
    let too_large = || EncodeError::TooLarge { width, height };

    let image_size = stride
        .checked_mul(height)
        .and_then(|n| u32::try_from(n).ok())
        .ok_or_else(too_large)?;
    let file_size = image_size
        .checked_add(PIXEL_DATA_OFFSET)
        .ok_or_else(too_large)?;
    let width_field = i32::try_from(width).map_err(|_| too_large())?;
    let height_field = i32::try_from(height).map_err(|_| too_large())?;

    tracing::debug!(width, height, stride, file_size, "encoding BMP");

    // File header
    writer.write_all(&SIGNATURE)?;
    writer.write_u32::<LittleEndian>(file_size)?;
    writer.write_u32::<LittleEndian>(0)?;
    writer.write_u32::<LittleEndian>(PIXEL_DATA_OFFSET)?;

    // Info header
    writer.write_u32::<LittleEndian>(INFO_HEADER_SIZE)?;
    writer.write_i32::<LittleEndian>(width_field)?;
    writer.write_i32::<LittleEndian>(height_field)?;
    writer.write_u16::<LittleEndian>(1)?;
    writer.write_u16::<LittleEndian>(BITS_PER_PIXEL)?;
    writer.write_u32::<LittleEndian>(COMPRESSION_NONE)?;
    writer.write_u32::<LittleEndian>(image_size)?;
    writer.write_i32::<LittleEndian>(PIXELS_PER_METER)?;
    writer.write_i32::<LittleEndian>(PIXELS_PER_METER)?;
    writer.write_u32::<LittleEndian>(0)?;
    writer.write_u32::<LittleEndian>(0)?;

    // Pixel rows, bottom-up, padding bytes stay zero
    let data = buffer.view();
    let mut row = vec![0u8; stride];
    for y in (0..height).rev() {
        for x in 0..width {
            row[x * CHANNELS] = data[[y, x, 2]];
            row[x * CHANNELS + 1] = data[[y, x, 1]];
            row[x * CHANNELS + 2] = data[[y, x, 0]];
        }
        writer.write_all(&row)?;
    }

    writer.flush()?;
    Ok(())
}

/// Encode into a new byte vector.
pub fn encode_to_vec(buffer: &PixelBuffer) -> Result<Vec<u8>, EncodeError> {
    let mut out = Vec::with_capacity(
        PIXEL_DATA_OFFSET as usize + row_stride(buffer.width()) * buffer.height(),
    );
    encode_to(buffer, &mut out)?;
    Ok(out)
}
