//! # Rendering Module
//!
//! Turns a rendered label image into the packed bitmap that the TSPL
//! `BITMAP` command carries.
//!
//! ## Modules
//!
//! - [`dimensions`]: Millimetres to dots, dots to packed row bytes
//! - [`monochrome`]: Threshold conversion and MSB-first bit packing
//! - [`preview`]: PNG previews of packed bitmaps
//!
//! ## Usage Example
//!
//! ```
//! use etiqueta::render::dimensions::{self, PixelSize};
//! use etiqueta::render::monochrome::{self, Threshold};
//! use image::{DynamicImage, Rgb, RgbImage};
//!
//! let width = dimensions::to_pixels(48.0, 203).unwrap();
//! let height = dimensions::to_pixels(25.0, 203).unwrap();
//! let size = PixelSize::new(width, height);
//!
//! let white = DynamicImage::ImageRgb8(RgbImage::from_pixel(width, height, Rgb([255, 255, 255])));
//! let bitmap = monochrome::convert(&white, size, Threshold::default()).unwrap();
//!
//! assert_eq!(bitmap.width_bytes(), 48);
//! assert_eq!(bitmap.data().len(), 48 * 200);
//! ```

pub mod dimensions;
pub mod monochrome;
pub mod preview;
