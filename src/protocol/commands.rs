//! # TSPL Commands
//!
//! This module implements the textual commands of TSPL (TSC Printer
//! Language) used by TSC and compatible thermal label printers.
//!
//! ## Protocol Overview
//!
//! TSPL commands are ASCII lines terminated by CR LF:
//!
//! ```text
//! SIZE 48 mm,25 mm\r\n
//! GAP 2 mm,0 mm\r\n
//! CLS\r\n
//! PRINT 1\r\n
//! ```
//!
//! The one exception is `BITMAP`, whose header is followed by raw binary
//! image data and only then by the CR LF (see [`bitmap_header`]).
//!
//! ## Number Formatting
//!
//! Integers are written in decimal. Millimetre values use the shortest
//! representation that round-trips (`48`, `48.5`, `0.25`).

use crate::printer::Direction;

/// Line terminator for every TSPL command.
pub const CRLF: &str = "\r\n";

/// `BITMAP` mode 0: overwrite the image buffer with the bitmap.
pub const BITMAP_MODE_OVERWRITE: u8 = 0;

/// Keyword that opens the bitmap command.
pub const BITMAP_KEYWORD: &str = "BITMAP ";

// ============================================================================
// SETUP COMMANDS
// ============================================================================

/// # Label Size (SIZE m mm,n mm)
///
/// Declares the width and height of one label.
///
/// ## Example
///
/// ```
/// use etiqueta::protocol::commands;
///
/// assert_eq!(commands::size(48.0, 25.0), "SIZE 48 mm,25 mm\r\n");
/// assert_eq!(commands::size(50.5, 30.0), "SIZE 50.5 mm,30 mm\r\n");
/// ```
pub fn size(width_mm: f64, height_mm: f64) -> String {
    format!("SIZE {} mm,{} mm{}", width_mm, height_mm, CRLF)
}

/// # Gap Between Labels (GAP m mm,n mm)
///
/// `m` is the vertical gap between two labels, `n` the gap offset. This
/// crate always writes an offset of 0.
///
/// ## Example
///
/// ```
/// use etiqueta::protocol::commands;
///
/// assert_eq!(commands::gap(2.0), "GAP 2 mm,0 mm\r\n");
/// ```
pub fn gap(gap_mm: f64) -> String {
    format!("GAP {} mm,0 mm{}", gap_mm, CRLF)
}

/// # Print Direction (DIRECTION n)
///
/// | n | Meaning |
/// |---|---------|
/// | 0 | Normal |
/// | 1 | Rotated 180° |
pub fn direction(direction: Direction) -> String {
    format!("DIRECTION {}{}", direction.as_u8(), CRLF)
}

/// # Reference Point (REFERENCE x,y)
///
/// Moves the label origin by `x`, `y` dots.
pub fn reference(x: u32, y: u32) -> String {
    format!("REFERENCE {},{}{}", x, y, CRLF)
}

/// # Clear Image Buffer (CLS)
///
/// Must precede any drawing command of a new label.
pub fn cls() -> String {
    format!("CLS{}", CRLF)
}

// ============================================================================
// GRAPHICS
// ============================================================================

/// # Bitmap Header (BITMAP x,y,width,height,mode,data)
///
/// Writes everything up to and including the comma that precedes the
/// binary data. The caller appends exactly `width_bytes * height` raw bytes
/// and then a CR LF.
///
/// ## Parameters
///
/// - `x`, `y`: Top-left corner in dots
/// - `width_bytes`: Bytes per row (8 dots per byte)
/// - `height`: Number of rows
/// - `mode`: 0 overwrite, 1 OR, 2 XOR
///
/// ## Data Layout
///
/// ```text
/// BITMAP 0,0,48,200,0,<9600 raw bytes>\r\n
///                     └─ 48 bytes × 200 rows, bit 7 = leftmost dot
/// ```
///
/// ## Example
///
/// ```
/// use etiqueta::protocol::commands;
///
/// assert_eq!(commands::bitmap_header(0, 0, 48, 200, 0), "BITMAP 0,0,48,200,0,");
/// ```
pub fn bitmap_header(x: u32, y: u32, width_bytes: u32, height: u32, mode: u8) -> String {
    format!(
        "{}{},{},{},{},{},",
        BITMAP_KEYWORD, x, y, width_bytes, height, mode
    )
}

// ============================================================================
// OUTPUT
// ============================================================================

/// # Print Label (PRINT n)
///
/// Prints the image buffer `copies` times.
///
/// ## Example
///
/// ```
/// use etiqueta::protocol::commands;
///
/// assert_eq!(commands::print(3), "PRINT 3\r\n");
/// ```
pub fn print(copies: u32) -> String {
    format!("PRINT {}{}", copies, CRLF)
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_size() {
        assert_eq!(size(48.0, 25.0), "SIZE 48 mm,25 mm\r\n");
        assert_eq!(size(100.0, 150.0), "SIZE 100 mm,150 mm\r\n");
        assert_eq!(size(62.5, 29.25), "SIZE 62.5 mm,29.25 mm\r\n");
    }

    #[test]
    fn test_gap() {
        assert_eq!(gap(0.0), "GAP 0 mm,0 mm\r\n");
        assert_eq!(gap(3.0), "GAP 3 mm,0 mm\r\n");
        assert_eq!(gap(2.5), "GAP 2.5 mm,0 mm\r\n");
    }

    #[test]
    fn test_direction() {
        assert_eq!(direction(Direction::Forward), "DIRECTION 0\r\n");
        assert_eq!(direction(Direction::Reverse), "DIRECTION 1\r\n");
    }

    #[test]
    fn test_reference() {
        assert_eq!(reference(0, 0), "REFERENCE 0,0\r\n");
        assert_eq!(reference(12, 340), "REFERENCE 12,340\r\n");
    }

    #[test]
    fn test_cls() {
        assert_eq!(cls(), "CLS\r\n");
    }

    #[test]
    fn test_bitmap_header() {
        assert_eq!(bitmap_header(0, 0, 48, 200, 0), "BITMAP 0,0,48,200,0,");
        assert_eq!(
            bitmap_header(10, 20, 49, 1000, 2),
            "BITMAP 10,20,49,1000,2,"
        );
    }

    #[test]
    fn test_bitmap_header_has_no_terminator() {
        let header = bitmap_header(0, 0, 1, 1, BITMAP_MODE_OVERWRITE);
        assert!(header.ends_with(','));
        assert!(!header.contains('\r'));
    }

    #[test]
    fn test_print() {
        assert_eq!(print(1), "PRINT 1\r\n");
        assert_eq!(print(25), "PRINT 25\r\n");
    }

    #[test]
    fn test_commands_are_ascii() {
        for cmd in [
            size(48.0, 25.0),
            gap(0.0),
            direction(Direction::Reverse),
            reference(1, 2),
            cls(),
            bitmap_header(1, 2, 3, 4, 0),
            print(2),
        ] {
            assert!(cmd.is_ascii(), "{:?}", cmd);
        }
    }
}
