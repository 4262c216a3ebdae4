//! # Monochrome Bitmap Converter
//!
//! Thresholds a colour raster into a packed 1-bit bitmap for the TSPL
//! `BITMAP` command.
//!
//! ## Luminance
//!
//! Each pixel is reduced to its ITU-R BT.601 luma:
//!
//! ```text
//! L = 0.299 R + 0.587 G + 0.114 B
//! ```
//!
//! The comparison is done in integer thousandths (`299R + 587G + 114B`
//! against `1000 * threshold`) so a pure white pixel (L = 255) is never
//! ink, whatever the threshold. A pixel with alpha 0 is background;
//! alpha is otherwise ignored.
//!
//! ## Bit Packing
//!
//! - Row-major, 8 pixels per byte
//! - Bit 7 (MSB) = leftmost pixel of the group
//! - 1 = ink (printed), 0 = background
//! - Padding bits past the last pixel of a row are 0
//!
//! ```text
//! width = 10 px, all ink:
//!   byte 0: 11111111
//!   byte 1: 11000000   <- 6 padding bits forced to 0
//! ```

use image::{DynamicImage, RgbaImage};
use rayon::prelude::*;

use super::dimensions::{self, BitmapDimensions, PixelSize};
use crate::error::{EtiquetaError, Result};

/// Luminance threshold in `0..=255`.
///
/// Pixels whose luminance is strictly below the threshold become ink.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Threshold(pub u8);

impl Threshold {
    pub const DEFAULT: Threshold = Threshold(128);

    /// Build a threshold from an unchecked integer.
    pub fn try_from_i64(value: i64) -> Option<Self> {
        u8::try_from(value).ok().map(Threshold)
    }
}

impl Default for Threshold {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// A packed 1-bit-per-pixel image.
///
/// The buffer is always exactly `width_bytes * height_px` bytes long.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonochromeBitmap {
    width_px: u32,
    width_bytes: u32,
    height_px: u32,
    data: Vec<u8>,
}

impl MonochromeBitmap {
    /// Wrap an already packed buffer.
    ///
    /// Fails with [`EtiquetaError::EncodingMismatch`] if the buffer length is
    /// not `ceil(width_px / 8) * height_px`.
    pub fn from_packed(width_px: u32, height_px: u32, data: Vec<u8>) -> Result<Self> {
        let dims = dimensions::bitmap_dimensions(width_px, height_px)?;
        if data.len() != dims.byte_len() {
            return Err(EtiquetaError::EncodingMismatch {
                declared: dims.byte_len(),
                actual: data.len(),
            });
        }
        Ok(Self {
            width_px,
            width_bytes: dims.width_bytes,
            height_px,
            data,
        })
    }

    /// Width in pixels (dots).
    pub fn width_px(&self) -> u32 {
        self.width_px
    }

    /// Bytes per row.
    pub fn width_bytes(&self) -> u32 {
        self.width_bytes
    }

    /// Height in rows.
    pub fn height_px(&self) -> u32 {
        self.height_px
    }

    pub fn dimensions(&self) -> BitmapDimensions {
        BitmapDimensions {
            width_bytes: self.width_bytes,
            height_px: self.height_px,
        }
    }

    /// The packed buffer.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn into_data(self) -> Vec<u8> {
        self.data
    }

    /// Packed bytes of one row.
    pub fn row(&self, y: u32) -> &[u8] {
        let stride = self.width_bytes as usize;
        let start = y as usize * stride;
        &self.data[start..start + stride]
    }

    /// Whether the dot at `(x, y)` is ink.
    pub fn is_ink(&self, x: u32, y: u32) -> bool {
        let byte = self.row(y)[(x / 8) as usize];
        (byte >> (7 - (x % 8))) & 1 == 1
    }

    /// Number of ink dots in the bitmap.
    pub fn ink_count(&self) -> usize {
        self.data.iter().map(|b| b.count_ones() as usize).sum()
    }
}

/// Whether a pixel is printed at the given threshold.
#[inline]
pub fn is_ink(r: u8, g: u8, b: u8, a: u8, threshold: Threshold) -> bool {
    if a == 0 {
        return false;
    }
    let luma_milli = 299 * r as u32 + 587 * g as u32 + 114 * b as u32;
    luma_milli < 1000 * threshold.0 as u32
}

/// Convert a decoded raster image into a packed monochrome bitmap.
///
/// `size` is the pixel size that was requested from the renderer; the image
/// must match it exactly, otherwise [`EtiquetaError::ConversionFailed`] is
/// returned.
pub fn convert(
    image: &DynamicImage,
    size: PixelSize,
    threshold: Threshold,
) -> Result<MonochromeBitmap> {
    if image.width() != size.width || image.height() != size.height {
        return Err(EtiquetaError::ConversionFailed(format!(
            "image is {}x{} but {}x{} was requested",
            image.width(),
            image.height(),
            size.width,
            size.height
        )));
    }
    let dims = dimensions::bitmap_dimensions(size.width, size.height)
        .map_err(|e| EtiquetaError::ConversionFailed(e.to_string()))?;

    let rgba = image.to_rgba8();
    let data = pack_rows(&rgba, dims, threshold);

    MonochromeBitmap::from_packed(size.width, size.height, data)
}

/// Decode an encoded image (PNG, etc.) and convert it.
///
/// Undecodable data is reported as [`EtiquetaError::ConversionFailed`].
pub fn convert_encoded(
    bytes: &[u8],
    size: PixelSize,
    threshold: Threshold,
) -> Result<MonochromeBitmap> {
    let image = image::load_from_memory(bytes)
        .map_err(|e| EtiquetaError::ConversionFailed(format!("Failed to decode image: {}", e)))?;
    convert(&image, size, threshold)
}

/// Pack every row of `rgba`, in parallel, into one contiguous buffer.
fn pack_rows(rgba: &RgbaImage, dims: BitmapDimensions, threshold: Threshold) -> Vec<u8> {
    let stride = dims.width_bytes as usize;
    let width = rgba.width();
    let mut data = vec![0u8; dims.byte_len()];

    data.par_chunks_mut(stride)
        .enumerate()
        .for_each(|(y, row)| {
            for x in 0..width {
                let [r, g, b, a] = rgba.get_pixel(x, y as u32).0;
                if is_ink(r, g, b, a, threshold) {
                    row[(x / 8) as usize] |= 0x80 >> (x % 8);
                }
            }
        });

    data
}
