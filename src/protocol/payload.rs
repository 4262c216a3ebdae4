//! # Payload Combiner
//!
//! Concatenates preamble, raw bitmap and trailer into the byte stream sent
//! to the printer. No byte of any segment is escaped or re-encoded.
//!
//! Before concatenating, the `BITMAP` header at the end of the preamble is
//! parsed back and its declared `width_bytes × height` is compared with
//! the bitmap length. A printer reading a miscounted header swallows
//! trailer bytes as image data (or image bytes as commands), so any
//! mismatch is rejected instead of padded or truncated.

use std::ops::Range;

use super::commands::BITMAP_KEYWORD;
use crate::error::{EtiquetaError, Result};

/// Parsed fields of a `BITMAP x,y,width_bytes,height,mode,` header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BitmapHeader {
    pub x: u32,
    pub y: u32,
    pub width_bytes: u32,
    pub height: u32,
    pub mode: u8,
}

impl BitmapHeader {
    /// Number of raw bytes the header announces.
    pub fn declared_len(&self) -> usize {
        self.width_bytes as usize * self.height as usize
    }

    /// Parse the comma separated fields that follow `BITMAP `.
    ///
    /// `fields` must be exactly `x,y,width_bytes,height,mode,` (the trailing
    /// comma included).
    pub fn parse_fields(fields: &[u8]) -> Option<Self> {
        let text = std::str::from_utf8(fields).ok()?;
        let body = text.strip_suffix(',')?;
        let mut parts = body.split(',');

        let x = parse_decimal(parts.next()?)?;
        let y = parse_decimal(parts.next()?)?;
        let width_bytes = parse_decimal(parts.next()?)?;
        let height = parse_decimal(parts.next()?)?;
        let mode = u8::try_from(parse_decimal(parts.next()?)?).ok()?;
        if parts.next().is_some() {
            return None;
        }

        Some(Self {
            x,
            y,
            width_bytes,
            height,
            mode,
        })
    }
}

/// Strict decimal: ASCII digits only, no sign or whitespace.
pub(crate) fn parse_decimal(text: &str) -> Option<u32> {
    if text.is_empty() || !text.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    text.parse().ok()
}

/// Find the `BITMAP` header that closes `preamble`.
///
/// Returns `None` if the preamble does not end with a well-formed header.
pub fn trailing_bitmap_header(preamble: &[u8]) -> Option<BitmapHeader> {
    let keyword = BITMAP_KEYWORD.as_bytes();
    let start = preamble
        .windows(keyword.len())
        .rposition(|window| window == keyword)?;

    // The keyword must start a command
    if start > 0 && preamble[start - 1] != b'\n' {
        return None;
    }

    BitmapHeader::parse_fields(&preamble[start + keyword.len()..])
}

/// A complete TSPL stream: preamble, raw bitmap, trailer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProtocolPayload {
    bytes: Vec<u8>,
    bitmap: Range<usize>,
}

impl ProtocolPayload {
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Byte range of the raw bitmap segment.
    pub fn bitmap_range(&self) -> Range<usize> {
        self.bitmap.clone()
    }

    /// The raw bitmap segment.
    pub fn bitmap_segment(&self) -> &[u8] {
        &self.bytes[self.bitmap.clone()]
    }

    /// Everything before the bitmap segment.
    pub fn preamble(&self) -> &[u8] {
        &self.bytes[..self.bitmap.start]
    }

    /// Everything after the bitmap segment.
    pub fn trailer(&self) -> &[u8] {
        &self.bytes[self.bitmap.end..]
    }
}

impl AsRef<[u8]> for ProtocolPayload {
    fn as_ref(&self) -> &[u8] {
        &self.bytes
    }
}

/// Concatenate `preamble ++ bitmap ++ trailer`.
///
/// Fails with [`EtiquetaError::EncodingMismatch`] if the preamble does not
/// end with a `BITMAP` header, or if the header's declared byte count is
/// not `bitmap.len()`.
///
/// ## Example
///
/// ```
/// use etiqueta::protocol::payload;
///
/// let bitmap = vec![0u8; 10 * 10];
/// let out = payload::combine(b"CLS\r\nBITMAP 0,0,10,10,0,", &bitmap, b"\r\nPRINT 1\r\n").unwrap();
/// assert_eq!(out.bitmap_segment(), &bitmap[..]);
///
/// let short = vec![0u8; 99];
/// assert!(payload::combine(b"CLS\r\nBITMAP 0,0,10,10,0,", &short, b"\r\nPRINT 1\r\n").is_err());
/// ```
pub fn combine(preamble: &[u8], bitmap: &[u8], trailer: &[u8]) -> Result<ProtocolPayload> {
    let header = trailing_bitmap_header(preamble).ok_or(EtiquetaError::EncodingMismatch {
        declared: 0,
        actual: bitmap.len(),
    })?;

    if header.declared_len() != bitmap.len() {
        return Err(EtiquetaError::EncodingMismatch {
            declared: header.declared_len(),
            actual: bitmap.len(),
        });
    }

    let mut bytes = Vec::with_capacity(preamble.len() + bitmap.len() + trailer.len());
    bytes.extend_from_slice(preamble);
    bytes.extend_from_slice(bitmap);
    bytes.extend_from_slice(trailer);

    let start = preamble.len();
    Ok(ProtocolPayload {
        bytes,
        bitmap: start..start + bitmap.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const PREAMBLE_10X10: &[u8] = b"SIZE 10 mm,10 mm\r\nCLS\r\nBITMAP 0,0,10,10,0,";
    const TRAILER: &[u8] = b"\r\nPRINT 1\r\n";

    #[test]
    fn test_combine_concatenates_verbatim() {
        let bitmap: Vec<u8> = (0..100).map(|i| i as u8).collect();
        let payload = combine(PREAMBLE_10X10, &bitmap, TRAILER).unwrap();

        let mut expected = PREAMBLE_10X10.to_vec();
        expected.extend_from_slice(&bitmap);
        expected.extend_from_slice(TRAILER);
        assert_eq!(payload.as_bytes(), &expected[..]);
        assert_eq!(payload.preamble(), PREAMBLE_10X10);
        assert_eq!(payload.bitmap_segment(), &bitmap[..]);
        assert_eq!(payload.trailer(), TRAILER);
    }

    #[test]
    fn test_binary_bytes_are_not_escaped() {
        // Bytes that look like CR, LF and commas stay untouched
        let bitmap = vec![b'\r', b'\n', b',', 0x00, 0xFF, 0x1B, b'P', b'R', b'I', b'N'];
        let preamble = b"CLS\r\nBITMAP 0,0,10,1,0,";
        let payload = combine(preamble, &bitmap, TRAILER).unwrap();
        assert_eq!(payload.bitmap_segment(), &bitmap[..]);
        assert_eq!(payload.len(), preamble.len() + 10 + TRAILER.len());
    }

    #[test]
    fn test_short_bitmap_rejected() {
        let bitmap = vec![0u8; 99];
        let err = combine(PREAMBLE_10X10, &bitmap, TRAILER).unwrap_err();
        assert!(matches!(
            err,
            EtiquetaError::EncodingMismatch {
                declared: 100,
                actual: 99
            }
        ));
    }

    #[test]
    fn test_long_bitmap_rejected() {
        let bitmap = vec![0u8; 101];
        assert!(matches!(
            combine(PREAMBLE_10X10, &bitmap, TRAILER),
            Err(EtiquetaError::EncodingMismatch {
                declared: 100,
                actual: 101
            })
        ));
    }

    #[test]
    fn test_missing_header_rejected() {
        assert!(matches!(
            combine(b"SIZE 10 mm,10 mm\r\nCLS\r\n", &[0u8; 4], TRAILER),
            Err(EtiquetaError::EncodingMismatch { declared: 0, .. })
        ));
    }

    #[test]
    fn test_header_must_close_preamble() {
        // Header followed by more commands is not where the bitmap goes
        let preamble = b"BITMAP 0,0,1,1,0,\r\nCLS\r\n";
        assert!(combine(preamble, &[0u8], TRAILER).is_err());
    }

    #[test]
    fn test_malformed_headers() {
        let cases: [&[u8]; 7] = [
            b"BITMAP 0,0,10,10,0",
            b"BITMAP 0,0,10,10,",
            b"BITMAP 0,0,-10,10,0,",
            b"BITMAP 0,0,10,10,0,0,",
            b"BITMAP 0,0, 10,10,0,",
            b"BITMAP 0,0,a,10,0,",
            b"CLS\r\nXBITMAP 0,0,10,10,0,",
        ];
        for preamble in cases {
            assert!(
                trailing_bitmap_header(preamble).is_none(),
                "{:?}",
                String::from_utf8_lossy(preamble)
            );
        }
    }

    #[test]
    fn test_uses_last_header() {
        let preamble = b"BITMAP 0,0,1,1,0,\x00\r\nBITMAP 8,16,2,3,1,";
        let header = trailing_bitmap_header(preamble).unwrap();
        assert_eq!(
            header,
            BitmapHeader {
                x: 8,
                y: 16,
                width_bytes: 2,
                height: 3,
                mode: 1
            }
        );
        assert_eq!(header.declared_len(), 6);
    }
}
