//! PNG previews of packed monochrome bitmaps.

use image::{GrayImage, ImageFormat, Luma};
use std::io::Cursor;

use super::monochrome::MonochromeBitmap;
use crate::error::{EtiquetaError, Result};

/// Expand a packed bitmap into a grayscale image (ink black, background white).
///
/// Padding bits at the end of each row are dropped.
pub fn to_gray_image(bitmap: &MonochromeBitmap) -> GrayImage {
    GrayImage::from_fn(bitmap.width_px(), bitmap.height_px(), |x, y| {
        if bitmap.is_ink(x, y) {
            Luma([0u8])
        } else {
            Luma([255u8])
        }
    })
}

/// Encode a packed bitmap as PNG.
pub fn to_png_bytes(bitmap: &MonochromeBitmap) -> Result<Vec<u8>> {
    let mut png = Vec::new();
    to_gray_image(bitmap)
        .write_to(&mut Cursor::new(&mut png), ImageFormat::Png)
        .map_err(|e| EtiquetaError::Render(format!("Failed to encode PNG: {}", e)))?;
    Ok(png)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gray_image_drops_padding() {
        let bitmap = MonochromeBitmap::from_packed(10, 1, vec![0b1000_0000, 0b0111_1111]).unwrap();
        let img = to_gray_image(&bitmap);
        assert_eq!(img.dimensions(), (10, 1));
        assert_eq!(img.get_pixel(0, 0)[0], 0);
        assert_eq!(img.get_pixel(1, 0)[0], 255);
        assert_eq!(img.get_pixel(8, 0)[0], 255);
        assert_eq!(img.get_pixel(9, 0)[0], 0);
    }

    #[test]
    fn test_png_decodes_back() {
        let bitmap = MonochromeBitmap::from_packed(16, 2, vec![0xFF, 0x00, 0x0F, 0xF0]).unwrap();
        let png = to_png_bytes(&bitmap).unwrap();
        let decoded = image::load_from_memory(&png).unwrap().to_luma8();
        assert_eq!(decoded.dimensions(), (16, 2));
        assert_eq!(decoded.get_pixel(0, 0)[0], 0);
        assert_eq!(decoded.get_pixel(8, 0)[0], 255);
        assert_eq!(decoded.get_pixel(4, 1)[0], 0);
    }
}
