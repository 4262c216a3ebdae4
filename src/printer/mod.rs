//! # Printer Module
//!
//! This module provides printer-specific configurations and label geometry.
//!
//! ## Modules
//!
//! - [`config`]: Printer resolution presets
//! - [`geometry`]: Physical label size, gap, direction and reference

pub mod config;
pub mod geometry;

pub use config::PrinterConfig;
pub use geometry::{Direction, LabelGeometry};
