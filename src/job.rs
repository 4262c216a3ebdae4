//! # Print Jobs
//!
//! Runs the full encoding pipeline for one label:
//!
//! ```text
//! geometry + dpi ──► dimensions ──► monochrome bitmap ──► TSPL script ──► payload
//!                        │                 ▲
//!                        └── PixelSize ────┘ (must match the rendered image)
//! ```
//!
//! Every stage is a pure function of its inputs, so jobs can be encoded
//! concurrently without coordination.

use image::DynamicImage;

use crate::error::Result;
use crate::printer::{LabelGeometry, PrinterConfig};
use crate::protocol::payload::ProtocolPayload;
use crate::protocol::script::{self, BitmapPlacement, Copies};
use crate::render::dimensions::PixelSize;
use crate::render::monochrome::{self, MonochromeBitmap, Threshold};

/// Everything besides the image that determines the payload.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct JobSettings {
    pub geometry: LabelGeometry,
    pub dpi: u32,
    pub copies: Copies,
    pub threshold: Threshold,
    /// Bitmap position on the label, in dots
    pub offset_x: u32,
    pub offset_y: u32,
}

impl JobSettings {
    /// Settings for a single copy at the default threshold, placed at 0,0.
    pub fn new(geometry: LabelGeometry, dpi: u32) -> Self {
        Self {
            geometry,
            dpi,
            copies: Copies::ONE,
            threshold: Threshold::DEFAULT,
            offset_x: 0,
            offset_y: 0,
        }
    }

    /// Pixel size the renderer must produce for this label.
    pub fn label_pixels(&self) -> Result<PixelSize> {
        label_pixels(&self.geometry, self.dpi)
    }
}

/// Pixel size of a label at the given resolution.
pub fn label_pixels(geometry: &LabelGeometry, dpi: u32) -> Result<PixelSize> {
    PrinterConfig::with_dpi(dpi).label_pixels(geometry)
}

/// A converted label ready to be turned into a payload.
#[derive(Debug, Clone, PartialEq)]
pub struct PrintJob {
    pub geometry: LabelGeometry,
    pub bitmap: MonochromeBitmap,
    pub x: u32,
    pub y: u32,
    pub copies: Copies,
}

impl PrintJob {
    /// Generate the script for this job and splice in the bitmap.
    pub fn to_payload(&self) -> Result<ProtocolPayload> {
        let placement = BitmapPlacement::new(self.x, self.y, self.bitmap.dimensions());
        let script = script::generate(&self.geometry, placement, self.copies)?;
        script.assemble(&self.bitmap)
    }
}

/// Convert a rendered label image into a [`PrintJob`].
pub fn prepare(image: &DynamicImage, settings: &JobSettings) -> Result<PrintJob> {
    let size = settings.label_pixels()?;
    let bitmap = monochrome::convert(image, size, settings.threshold)?;

    Ok(PrintJob {
        geometry: settings.geometry,
        bitmap,
        x: settings.offset_x,
        y: settings.offset_y,
        copies: settings.copies,
    })
}

/// Encode a rendered label image into a TSPL payload.
///
/// ## Example
///
/// ```
/// use etiqueta::job::{self, JobSettings};
/// use etiqueta::printer::LabelGeometry;
/// use image::{DynamicImage, Rgb, RgbImage};
///
/// let settings = JobSettings::new(LabelGeometry::new(48.0, 25.0, 0.0).unwrap(), 203);
/// let image = DynamicImage::ImageRgb8(RgbImage::from_pixel(384, 200, Rgb([255, 255, 255])));
///
/// let payload = job::encode(&image, &settings).unwrap();
/// assert_eq!(payload.bitmap_segment().len(), 48 * 200);
/// ```
pub fn encode(image: &DynamicImage, settings: &JobSettings) -> Result<ProtocolPayload> {
    prepare(image, settings)?.to_payload()
}

/// Decode an encoded image (PNG, etc.) and encode it into a TSPL payload.
pub fn encode_png(bytes: &[u8], settings: &JobSettings) -> Result<ProtocolPayload> {
    let size = settings.label_pixels()?;
    let bitmap = monochrome::convert_encoded(bytes, size, settings.threshold)?;

    PrintJob {
        geometry: settings.geometry,
        bitmap,
        x: settings.offset_x,
        y: settings.offset_y,
        copies: settings.copies,
    }
    .to_payload()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EtiquetaError;
    use image::{Rgb, RgbImage};

    fn settings() -> JobSettings {
        JobSettings::new(LabelGeometry::new(48.0, 25.0, 0.0).unwrap(), 203)
    }

    #[test]
    fn test_label_pixels() {
        assert_eq!(settings().label_pixels().unwrap(), PixelSize::new(384, 200));
    }

    #[test]
    fn test_prepare_sets_placement() {
        let mut settings = settings();
        settings.offset_x = 8;
        settings.offset_y = 4;
        settings.copies = Copies::normalize(Some(2));
        let image = DynamicImage::ImageRgb8(RgbImage::from_pixel(384, 200, Rgb([0, 0, 0])));

        let job = prepare(&image, &settings).unwrap();
        assert_eq!((job.x, job.y), (8, 4));
        assert_eq!(job.bitmap.width_bytes(), 48);

        let payload = job.to_payload().unwrap();
        let text = String::from_utf8_lossy(payload.preamble()).to_string();
        assert!(text.ends_with("BITMAP 8,4,48,200,0,"));
        assert_eq!(payload.trailer(), b"\r\nPRINT 2\r\n");
        assert!(payload.bitmap_segment().iter().all(|&b| b == 0xFF));
    }

    #[test]
    fn test_wrong_image_size() {
        let image = DynamicImage::ImageRgb8(RgbImage::new(383, 200));
        assert!(matches!(
            encode(&image, &settings()),
            Err(EtiquetaError::ConversionFailed(_))
        ));
    }

    #[test]
    fn test_invalid_dpi() {
        let mut settings = settings();
        settings.dpi = 0;
        let image = DynamicImage::ImageRgb8(RgbImage::new(384, 200));
        assert!(matches!(
            encode(&image, &settings),
            Err(EtiquetaError::InvalidDimensions(_))
        ));
    }

    #[test]
    fn test_encode_png_rejects_garbage() {
        assert!(matches!(
            encode_png(b"\x89PNG garbage", &settings()),
            Err(EtiquetaError::ConversionFailed(_))
        ));
    }
}
