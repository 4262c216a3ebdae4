//! # TSPL Script Generator
//!
//! Builds the ASCII preamble and trailer that surround a bitmap in a TSPL
//! print job.
//!
//! ```text
//! ┌──────────────── preamble ────────────────┐┌── bitmap ──┐┌── trailer ──┐
//! SIZE…\r\nGAP…\r\nDIRECTION…\r\nREFERENCE…\r\n
//! CLS\r\nBITMAP x,y,wb,h,0,                    <wb*h bytes>  \r\nPRINT n\r\n
//! ```
//!
//! The bitmap itself never passes through here: the generator only needs
//! its geometry. The raw bytes are spliced in by
//! [`payload::combine`](super::payload::combine), which re-checks the
//! header against the actual buffer.

use super::commands::{self, BITMAP_MODE_OVERWRITE, CRLF};
use super::payload::{self, ProtocolPayload};
use crate::error::{EtiquetaError, Result};
use crate::printer::LabelGeometry;
use crate::render::dimensions::BitmapDimensions;
use crate::render::monochrome::MonochromeBitmap;

/// Number of labels to print, always at least 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Copies(u32);

impl Copies {
    pub const ONE: Copies = Copies(1);

    /// Normalize a requested copy count: missing, zero or negative is 1.
    pub fn normalize(requested: Option<i64>) -> Self {
        match requested {
            Some(n) if n > 0 => Copies(u32::try_from(n).unwrap_or(u32::MAX)),
            _ => Self::ONE,
        }
    }

    pub fn get(self) -> u32 {
        self.0
    }
}

impl Default for Copies {
    fn default() -> Self {
        Self::ONE
    }
}

impl From<Option<i64>> for Copies {
    fn from(requested: Option<i64>) -> Self {
        Self::normalize(requested)
    }
}

/// Where the bitmap goes and how big it is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BitmapPlacement {
    /// Top-left corner in dots
    pub x: u32,
    pub y: u32,
    pub width_bytes: u32,
    pub height_px: u32,
}

impl BitmapPlacement {
    pub fn new(x: u32, y: u32, dims: BitmapDimensions) -> Self {
        Self {
            x,
            y,
            width_bytes: dims.width_bytes,
            height_px: dims.height_px,
        }
    }

    pub fn dimensions(&self) -> BitmapDimensions {
        BitmapDimensions {
            width_bytes: self.width_bytes,
            height_px: self.height_px,
        }
    }
}

/// Generated preamble and trailer for one print job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TsplScript {
    preamble: String,
    trailer: String,
    placement: BitmapPlacement,
    copies: Copies,
}

impl TsplScript {
    /// Text up to and including the `BITMAP` header.
    pub fn preamble(&self) -> &str {
        &self.preamble
    }

    /// Text that follows the bitmap bytes.
    pub fn trailer(&self) -> &str {
        &self.trailer
    }

    /// Geometry declared in the `BITMAP` header.
    pub fn placement(&self) -> BitmapPlacement {
        self.placement
    }

    pub fn copies(&self) -> Copies {
        self.copies
    }

    /// Splice `bitmap` between preamble and trailer.
    ///
    /// Fails with [`EtiquetaError::EncodingMismatch`] if the bitmap's
    /// geometry differs from the geometry this script was generated for.
    pub fn assemble(&self, bitmap: &MonochromeBitmap) -> Result<ProtocolPayload> {
        if bitmap.dimensions() != self.placement.dimensions() {
            return Err(EtiquetaError::EncodingMismatch {
                declared: self.placement.dimensions().byte_len(),
                actual: bitmap.data().len(),
            });
        }
        payload::combine(
            self.preamble.as_bytes(),
            bitmap.data(),
            self.trailer.as_bytes(),
        )
    }
}

/// Generate the TSPL preamble and trailer for one label.
///
/// Fails with [`EtiquetaError::InvalidDimensions`] if the placement has a
/// zero width or height.
///
/// ## Example
///
/// ```
/// use etiqueta::printer::LabelGeometry;
/// use etiqueta::protocol::script::{self, BitmapPlacement, Copies};
///
/// let geometry = LabelGeometry::new(48.0, 25.0, 0.0).unwrap();
/// let placement = BitmapPlacement { x: 0, y: 0, width_bytes: 48, height_px: 200 };
/// let script = script::generate(&geometry, placement, Copies::normalize(Some(2))).unwrap();
///
/// assert!(script.preamble().ends_with("BITMAP 0,0,48,200,0,"));
/// assert_eq!(script.trailer(), "\r\nPRINT 2\r\n");
/// ```
pub fn generate(
    geometry: &LabelGeometry,
    placement: BitmapPlacement,
    copies: Copies,
) -> Result<TsplScript> {
    if placement.width_bytes == 0 || placement.height_px == 0 {
        return Err(EtiquetaError::InvalidDimensions(format!(
            "bitmap must be at least 1x1 bytes, got {}x{}",
            placement.width_bytes, placement.height_px
        )));
    }

    let mut preamble = String::new();
    preamble.push_str(&commands::size(geometry.width_mm, geometry.height_mm));
    preamble.push_str(&commands::gap(geometry.gap_mm));
    preamble.push_str(&commands::direction(geometry.direction));
    preamble.push_str(&commands::reference(
        geometry.reference_x,
        geometry.reference_y,
    ));
    preamble.push_str(&commands::cls());
    preamble.push_str(&commands::bitmap_header(
        placement.x,
        placement.y,
        placement.width_bytes,
        placement.height_px,
        BITMAP_MODE_OVERWRITE,
    ));

    // CRLF closes the BITMAP command after its binary data
    let mut trailer = String::from(CRLF);
    trailer.push_str(&commands::print(copies.get()));

    Ok(TsplScript {
        preamble,
        trailer,
        placement,
        copies,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::printer::Direction;
    use pretty_assertions::assert_eq;

    fn placement(width_bytes: u32, height_px: u32) -> BitmapPlacement {
        BitmapPlacement {
            x: 0,
            y: 0,
            width_bytes,
            height_px,
        }
    }

    #[test]
    fn test_preamble_layout() {
        let geometry = LabelGeometry::new(48.0, 25.0, 0.0).unwrap();
        let script = generate(&geometry, placement(48, 200), Copies::ONE).unwrap();
        assert_eq!(
            script.preamble(),
            "SIZE 48 mm,25 mm\r\n\
             GAP 0 mm,0 mm\r\n\
             DIRECTION 0\r\n\
             REFERENCE 0,0\r\n\
             CLS\r\n\
             BITMAP 0,0,48,200,0,"
        );
        assert_eq!(script.trailer(), "\r\nPRINT 1\r\n");
    }

    #[test]
    fn test_geometry_fields_flow_through() {
        let geometry = LabelGeometry::new(62.5, 29.0, 3.0)
            .unwrap()
            .with_direction(Direction::Reverse)
            .with_reference(5, 7);
        let placement = BitmapPlacement {
            x: 16,
            y: 24,
            width_bytes: 62,
            height_px: 232,
        };
        let script = generate(&geometry, placement, Copies::ONE).unwrap();
        assert!(script.preamble().starts_with("SIZE 62.5 mm,29 mm\r\nGAP 3 mm,0 mm\r\n"));
        assert!(script.preamble().contains("DIRECTION 1\r\n"));
        assert!(script.preamble().contains("REFERENCE 5,7\r\n"));
        assert!(script.preamble().ends_with("CLS\r\nBITMAP 16,24,62,232,0,"));
    }

    #[test]
    fn test_copies_normalization() {
        assert_eq!(Copies::normalize(None).get(), 1);
        assert_eq!(Copies::normalize(Some(0)).get(), 1);
        assert_eq!(Copies::normalize(Some(-4)).get(), 1);
        assert_eq!(Copies::normalize(Some(3)).get(), 3);
        assert_eq!(Copies::normalize(Some(i64::MAX)).get(), u32::MAX);
    }

    #[test]
    fn test_trailer_copies() {
        let geometry = LabelGeometry::new(48.0, 25.0, 0.0).unwrap();
        let zero = generate(&geometry, placement(48, 200), Copies::from(Some(0))).unwrap();
        assert_eq!(zero.trailer(), "\r\nPRINT 1\r\n");
        let negative = generate(&geometry, placement(48, 200), Copies::from(Some(-2))).unwrap();
        assert_eq!(negative.trailer(), "\r\nPRINT 1\r\n");
        let three = generate(&geometry, placement(48, 200), Copies::from(Some(3))).unwrap();
        assert_eq!(three.trailer(), "\r\nPRINT 3\r\n");
    }

    #[test]
    fn test_zero_placement_rejected() {
        let geometry = LabelGeometry::new(48.0, 25.0, 0.0).unwrap();
        assert!(matches!(
            generate(&geometry, placement(0, 200), Copies::ONE),
            Err(EtiquetaError::InvalidDimensions(_))
        ));
        assert!(matches!(
            generate(&geometry, placement(48, 0), Copies::ONE),
            Err(EtiquetaError::InvalidDimensions(_))
        ));
    }

    #[test]
    fn test_assemble_checks_bitmap_geometry() {
        let geometry = LabelGeometry::new(10.0, 10.0, 0.0).unwrap();
        let script = generate(&geometry, placement(10, 10), Copies::ONE).unwrap();

        // Same byte count, different shape
        let bitmap = MonochromeBitmap::from_packed(40, 20, vec![0; 100]).unwrap();
        assert!(matches!(
            script.assemble(&bitmap),
            Err(EtiquetaError::EncodingMismatch { .. })
        ));

        let bitmap = MonochromeBitmap::from_packed(80, 10, vec![0; 100]).unwrap();
        let payload = script.assemble(&bitmap).unwrap();
        assert_eq!(payload.bitmap_segment(), &[0u8; 100][..]);
    }
}
