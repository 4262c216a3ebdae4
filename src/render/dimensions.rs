//! # Dimension Calculator
//!
//! Converts physical label measurements into printer dots and packed
//! bitmap geometry.
//!
//! ## Calculations
//!
//! ```text
//! pixels      = round(mm * dpi / 25.4)
//! width_bytes = ceil(width_px / 8)
//!
//! 48mm x 25mm label at 203 DPI:
//!   width_px    = round(48 * 203 / 25.4) = 384
//!   height_px   = round(25 * 203 / 25.4) = 200
//!   width_bytes = 384 / 8                = 48
//! ```

use crate::error::{EtiquetaError, Result};

/// Millimetres per inch.
pub const MM_PER_INCH: f64 = 25.4;

/// Highest supported printer resolution.
pub const MAX_DPI: u32 = 600;

/// Most dots allowed along either label axis (about 1m at 203 DPI).
pub const MAX_DOTS: u32 = 8000;

/// Pixel size of a raster image or label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelSize {
    pub width: u32,
    pub height: u32,
}

impl PixelSize {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

/// Geometry of a packed 1-bit bitmap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BitmapDimensions {
    /// Bytes per row, `ceil(width_px / 8)`
    pub width_bytes: u32,
    /// Number of rows
    pub height_px: u32,
}

impl BitmapDimensions {
    /// Total number of bytes in the packed buffer.
    #[inline]
    pub fn byte_len(&self) -> usize {
        self.width_bytes as usize * self.height_px as usize
    }
}

/// Convert a length in millimetres to printer dots.
///
/// Fails with [`EtiquetaError::InvalidDimensions`] when the length or the
/// resolution is not positive, when the resolution exceeds [`MAX_DPI`], or
/// when the result rounds to zero dots or to more than [`MAX_DOTS`].
///
/// ## Example
///
/// ```
/// use etiqueta::render::dimensions::to_pixels;
///
/// assert_eq!(to_pixels(48.0, 203).unwrap(), 384);
/// assert_eq!(to_pixels(25.0, 203).unwrap(), 200);
/// assert!(to_pixels(0.0, 203).is_err());
/// ```
pub fn to_pixels(length_mm: f64, dpi: u32) -> Result<u32> {
    if !length_mm.is_finite() || length_mm <= 0.0 {
        return Err(EtiquetaError::InvalidDimensions(format!(
            "length must be positive, got {} mm",
            length_mm
        )));
    }
    if dpi == 0 || dpi > MAX_DPI {
        return Err(EtiquetaError::InvalidDimensions(format!(
            "resolution must be within 1-{} dpi, got {}",
            MAX_DPI, dpi
        )));
    }

    let pixels = (length_mm * dpi as f64 / MM_PER_INCH).round();
    if pixels < 1.0 {
        return Err(EtiquetaError::InvalidDimensions(format!(
            "{} mm at {} dpi rounds to zero dots",
            length_mm, dpi
        )));
    }
    if pixels > MAX_DOTS as f64 {
        return Err(EtiquetaError::InvalidDimensions(format!(
            "{} mm at {} dpi is {} dots, more than the {} dot limit",
            length_mm, dpi, pixels, MAX_DOTS
        )));
    }

    Ok(pixels as u32)
}

/// Compute the packed bitmap geometry for an image of the given size.
///
/// ## Example
///
/// ```
/// use etiqueta::render::dimensions::bitmap_dimensions;
///
/// let dims = bitmap_dimensions(385, 200).unwrap();
/// assert_eq!(dims.width_bytes, 49);
/// assert_eq!(dims.height_px, 200);
/// ```
pub fn bitmap_dimensions(width_px: u32, height_px: u32) -> Result<BitmapDimensions> {
    if width_px == 0 || height_px == 0 {
        return Err(EtiquetaError::InvalidDimensions(format!(
            "bitmap must be at least 1x1, got {}x{}",
            width_px, height_px
        )));
    }

    Ok(BitmapDimensions {
        width_bytes: width_px.div_ceil(8),
        height_px,
    })
}
