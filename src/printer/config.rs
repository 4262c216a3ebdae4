//! # Printer Configuration
//!
//! Resolution presets for TSPL label printers.
//!
//! | Model class | Resolution | Dots per mm |
//! |-------------|------------|-------------|
//! | 203 DPI (TE200, TDP-225, ...) | 203 | ~8 |
//! | 300 DPI (TE300, TTP-345, ...) | 300 | ~11.8 |
//!
//! ## Usage
//!
//! ```
//! use etiqueta::printer::PrinterConfig;
//!
//! let config = PrinterConfig::DPI_203;
//! assert_eq!(config.mm_to_dots(48.0).unwrap(), 384);
//! ```

use crate::error::Result;
use crate::printer::geometry::LabelGeometry;
use crate::render::dimensions::{self, MM_PER_INCH, PixelSize};

/// # Printer Configuration
///
/// ## Calculations
///
/// ```text
/// dots_per_mm = dpi / 25.4
///
/// For 203 DPI:
///   dots_per_mm = 203 / 25.4 ≈ 8
///   48mm label  = 384 dots
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PrinterConfig {
    /// Resolution in dots per inch
    pub dpi: u32,
}

impl PrinterConfig {
    /// Standard 203 DPI desktop label printer.
    pub const DPI_203: Self = Self { dpi: 203 };

    /// High resolution 300 DPI label printer.
    pub const DPI_300: Self = Self { dpi: 300 };

    /// Configuration for an arbitrary resolution.
    pub fn with_dpi(dpi: u32) -> Self {
        Self { dpi }
    }

    /// Calculate dots per millimeter
    #[inline]
    pub fn dots_per_mm(&self) -> f64 {
        self.dpi as f64 / MM_PER_INCH
    }

    /// Convert millimeters to dots
    #[inline]
    pub fn mm_to_dots(&self, mm: f64) -> Result<u32> {
        dimensions::to_pixels(mm, self.dpi)
    }

    /// Pixel size of one label at this resolution.
    pub fn label_pixels(&self, geometry: &LabelGeometry) -> Result<PixelSize> {
        Ok(PixelSize::new(
            self.mm_to_dots(geometry.width_mm)?,
            self.mm_to_dots(geometry.height_mm)?,
        ))
    }
}

impl Default for PrinterConfig {
    fn default() -> Self {
        Self::DPI_203
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dots_per_mm() {
        assert!((PrinterConfig::DPI_203.dots_per_mm() - 8.0).abs() < 0.1);
        assert!((PrinterConfig::DPI_300.dots_per_mm() - 11.8).abs() < 0.1);
    }

    #[test]
    fn test_with_dpi_uses_presets() {
        assert_eq!(PrinterConfig::with_dpi(203), PrinterConfig::DPI_203);
        assert_eq!(PrinterConfig::with_dpi(300), PrinterConfig::DPI_300);
        assert_eq!(PrinterConfig::with_dpi(600).dpi, 600);
    }

    #[test]
    fn test_label_pixels() {
        let geometry = LabelGeometry::new(48.0, 25.0, 0.0).unwrap();
        let size = PrinterConfig::DPI_203.label_pixels(&geometry).unwrap();
        assert_eq!(size, PixelSize::new(384, 200));
    }

    #[test]
    fn test_unsupported_dpi_fails() {
        let geometry = LabelGeometry::new(48.0, 25.0, 0.0).unwrap();
        assert!(PrinterConfig::with_dpi(1200).label_pixels(&geometry).is_err());
    }

    #[test]
    fn test_zero_dpi_fails() {
        let geometry = LabelGeometry::new(48.0, 25.0, 0.0).unwrap();
        assert!(PrinterConfig::with_dpi(0).label_pixels(&geometry).is_err());
    }
}
