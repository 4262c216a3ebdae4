//! # TSPL Protocol Implementation
//!
//! This module builds the mixed text/binary command stream understood by
//! TSPL thermal label printers.
//!
//! ## Module Structure
//!
//! - [`commands`]: Textual command builders (SIZE, GAP, BITMAP, PRINT, ...)
//! - [`script`]: Preamble/trailer generation for one label
//! - [`payload`]: Byte-count checked concatenation with the raw bitmap
//! - [`decode`]: Parses a stream back into commands
//!
//! ## Usage Example
//!
//! ```
//! use etiqueta::printer::LabelGeometry;
//! use etiqueta::protocol::{payload, script::{self, BitmapPlacement, Copies}};
//!
//! let geometry = LabelGeometry::new(10.0, 10.0, 0.0).unwrap();
//! let placement = BitmapPlacement { x: 0, y: 0, width_bytes: 10, height_px: 80 };
//! let script = script::generate(&geometry, placement, Copies::ONE).unwrap();
//!
//! let bitmap = vec![0u8; 10 * 80];
//! let stream = payload::combine(
//!     script.preamble().as_bytes(),
//!     &bitmap,
//!     script.trailer().as_bytes(),
//! ).unwrap();
//!
//! assert!(stream.as_bytes().starts_with(b"SIZE 10 mm,10 mm\r\n"));
//! assert!(stream.as_bytes().ends_with(b"\r\nPRINT 1\r\n"));
//! ```
//!
//! ## Protocol Reference
//!
//! Based on the "TSPL/TSPL2 Programming Language" manual by TSC Auto ID
//! Technology Co., Ltd.

pub mod commands;
pub mod decode;
pub mod payload;
pub mod script;
