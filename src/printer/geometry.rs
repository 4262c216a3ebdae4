//! Physical label geometry.

use crate::error::{EtiquetaError, Result};

/// # Print Direction
///
/// TSPL `DIRECTION` parameter. `Reverse` rotates the printout 180° relative
/// to the feed direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    #[default]
    Forward = 0,
    Reverse = 1,
}

impl Direction {
    /// Wire value written after `DIRECTION`.
    pub fn as_u8(self) -> u8 {
        self as u8
    }
}

impl TryFrom<u8> for Direction {
    type Error = EtiquetaError;

    fn try_from(value: u8) -> Result<Self> {
        match value {
            0 => Ok(Self::Forward),
            1 => Ok(Self::Reverse),
            other => Err(EtiquetaError::InvalidDimensions(format!(
                "direction must be 0 or 1, got {}",
                other
            ))),
        }
    }
}

/// # Label Geometry
///
/// Size of one label and the gap between labels on the roll, plus the
/// printer's reference origin.
///
/// ```text
/// ┌──────── width_mm ────────┐
/// │                          │  height_mm
/// └──────────────────────────┘
///             gap_mm
/// ┌──────────────────────────┐
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LabelGeometry {
    pub width_mm: f64,
    pub height_mm: f64,
    pub gap_mm: f64,
    pub direction: Direction,
    /// Reference origin in dots
    pub reference_x: u32,
    pub reference_y: u32,
}

impl LabelGeometry {
    /// Build a geometry, rejecting non-positive width/height and a negative gap.
    pub fn new(width_mm: f64, height_mm: f64, gap_mm: f64) -> Result<Self> {
        if !width_mm.is_finite() || width_mm <= 0.0 {
            return Err(EtiquetaError::InvalidDimensions(format!(
                "label width must be positive, got {} mm",
                width_mm
            )));
        }
        if !height_mm.is_finite() || height_mm <= 0.0 {
            return Err(EtiquetaError::InvalidDimensions(format!(
                "label height must be positive, got {} mm",
                height_mm
            )));
        }
        if !gap_mm.is_finite() || gap_mm < 0.0 {
            return Err(EtiquetaError::InvalidDimensions(format!(
                "label gap must not be negative, got {} mm",
                gap_mm
            )));
        }

        Ok(Self {
            width_mm,
            height_mm,
            gap_mm,
            direction: Direction::Forward,
            reference_x: 0,
            reference_y: 0,
        })
    }

    pub fn with_direction(mut self, direction: Direction) -> Self {
        self.direction = direction;
        self
    }

    pub fn with_reference(mut self, x: u32, y: u32) -> Self {
        self.reference_x = x;
        self.reference_y = y;
        self
    }
}
