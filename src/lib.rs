//! # Etiqueta - TSPL Label Printing Library
//!
//! Etiqueta turns a rendered label image into the byte-exact command stream
//! understood by TSPL thermal label printers. It provides:
//!
//! - **Dimension calculation**: millimetres and DPI to dots and row bytes
//! - **Monochrome conversion**: luminance thresholding and MSB-first packing
//! - **Protocol generation**: TSPL preamble/trailer around a raw `BITMAP`
//! - **Payload assembly**: byte-count checked splicing of text and binary
//! - **Label service**: request validation, a built-in renderer, HTTP API
//!
//! ## Quick Start
//!
//! ```
//! use etiqueta::{job::{self, JobSettings}, printer::LabelGeometry};
//! use image::{DynamicImage, Rgb, RgbImage};
//!
//! // 48mm x 25mm label on a 203 DPI printer
//! let geometry = LabelGeometry::new(48.0, 25.0, 0.0)?;
//! let settings = JobSettings::new(geometry, 203);
//!
//! // The label image must match the label's pixel size exactly
//! let size = settings.label_pixels()?;
//! let image = DynamicImage::ImageRgb8(RgbImage::from_pixel(size.width, size.height, Rgb([255, 255, 255])));
//!
//! let payload = job::encode(&image, &settings)?;
//! assert!(payload.as_bytes().starts_with(b"SIZE 48 mm,25 mm\r\n"));
//! assert_eq!(payload.bitmap_segment().len(), 48 * 200);
//!
//! # Ok::<(), etiqueta::error::EtiquetaError>(())
//! ```
//!
//! ## Module Overview
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`render`] | Dimensions, monochrome conversion, previews |
//! | [`protocol`] | TSPL commands, script generation, payload assembly |
//! | [`job`] | End-to-end encoding pipeline |
//! | [`printer`] | Label geometry and resolution presets |
//! | [`label`] | Print requests and label rendering |
//! | [`server`] | HTTP API |
//! | [`error`] | Error types |
//!
//! ## Supported Printers
//!
//! Any printer speaking TSPL/TSPL2 (TSC TE/TDP/TTP series and the many
//! compatible desktop label printers), at 203 or 300 DPI.

pub mod error;
pub mod job;
pub mod label;
pub mod printer;
pub mod protocol;
pub mod render;
pub mod server;

// Re-exports for convenience
pub use error::EtiquetaError;
pub use printer::{LabelGeometry, PrinterConfig};
pub use protocol::payload::ProtocolPayload;
