//! # TSPL Stream Decoder
//!
//! Parses a TSPL byte stream back into commands. `BITMAP` consumes exactly
//! the number of raw bytes its header declares, so the decoder sees the
//! stream the same way a printer does: a miscounted header shows up as
//! garbage commands or truncated data.

use super::commands::BITMAP_KEYWORD;
use super::payload::{BitmapHeader, parse_decimal};
use crate::error::{EtiquetaError, Result};

/// One decoded TSPL command.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Size { width_mm: f64, height_mm: f64 },
    Gap { gap_mm: f64, offset_mm: f64 },
    Direction(u8),
    Reference { x: u32, y: u32 },
    Cls,
    Bitmap { header: BitmapHeader, data: Vec<u8> },
    Print { copies: u32 },
    /// Any other command line, kept verbatim
    Other(String),
}

impl Command {
    /// Short name for listings.
    pub fn name(&self) -> &str {
        match self {
            Self::Size { .. } => "SIZE",
            Self::Gap { .. } => "GAP",
            Self::Direction(_) => "DIRECTION",
            Self::Reference { .. } => "REFERENCE",
            Self::Cls => "CLS",
            Self::Bitmap { .. } => "BITMAP",
            Self::Print { .. } => "PRINT",
            Self::Other(_) => "OTHER",
        }
    }
}

/// Decode a whole TSPL stream.
pub fn decode(bytes: &[u8]) -> Result<Vec<Command>> {
    let mut commands = Vec::new();
    let mut pos = 0;

    while pos < bytes.len() {
        let rest = &bytes[pos..];

        // Blank lines (e.g. the CRLF that closes BITMAP) carry no command
        if rest.starts_with(b"\r\n") {
            pos += 2;
            continue;
        }
        if rest[0] == b'\n' {
            pos += 1;
            continue;
        }

        if rest.starts_with(BITMAP_KEYWORD.as_bytes()) {
            let (command, used) = decode_bitmap(rest)?;
            commands.push(command);
            pos += used;
            continue;
        }

        let line_len = rest
            .iter()
            .position(|&b| b == b'\n')
            .map(|i| i + 1)
            .unwrap_or(rest.len());
        let line = std::str::from_utf8(&rest[..line_len])
            .map_err(|_| EtiquetaError::Decode(format!("non-ASCII command at byte {}", pos)))?;
        commands.push(decode_line(line.trim_end_matches(['\r', '\n']))?);
        pos += line_len;
    }

    Ok(commands)
}

/// Decode `BITMAP x,y,w,h,mode,<data>`, returning the bytes consumed.
fn decode_bitmap(rest: &[u8]) -> Result<(Command, usize)> {
    let keyword_len = BITMAP_KEYWORD.len();

    // Five fields, each followed by a comma
    let mut commas = 0;
    let mut fields_end = None;
    for (i, &b) in rest.iter().enumerate().skip(keyword_len) {
        if b == b',' {
            commas += 1;
            if commas == 5 {
                fields_end = Some(i + 1);
                break;
            }
        } else if !b.is_ascii_digit() {
            break;
        }
    }
    let fields_end =
        fields_end.ok_or_else(|| EtiquetaError::Decode("malformed BITMAP header".to_string()))?;

    let header = BitmapHeader::parse_fields(&rest[keyword_len..fields_end])
        .ok_or_else(|| EtiquetaError::Decode("malformed BITMAP header".to_string()))?;

    let data_end = fields_end + header.declared_len();
    if data_end > rest.len() {
        return Err(EtiquetaError::Decode(format!(
            "BITMAP declares {} bytes but only {} follow",
            header.declared_len(),
            rest.len() - fields_end
        )));
    }

    let data = rest[fields_end..data_end].to_vec();
    Ok((Command::Bitmap { header, data }, data_end))
}

fn decode_line(line: &str) -> Result<Command> {
    let (keyword, args) = line.split_once(' ').unwrap_or((line, ""));
    let bad = || EtiquetaError::Decode(format!("malformed command: {}", line));

    let command = match keyword {
        "SIZE" => {
            let (w, h) = args.split_once(',').ok_or_else(bad)?;
            Command::Size {
                width_mm: parse_mm(w).ok_or_else(bad)?,
                height_mm: parse_mm(h).ok_or_else(bad)?,
            }
        }
        "GAP" => {
            let (g, o) = args.split_once(',').ok_or_else(bad)?;
            Command::Gap {
                gap_mm: parse_mm(g).ok_or_else(bad)?,
                offset_mm: parse_mm(o).ok_or_else(bad)?,
            }
        }
        "DIRECTION" => {
            let value = parse_decimal(args.split(',').next().unwrap_or("")).ok_or_else(bad)?;
            Command::Direction(u8::try_from(value).map_err(|_| bad())?)
        }
        "REFERENCE" => {
            let (x, y) = args.split_once(',').ok_or_else(bad)?;
            Command::Reference {
                x: parse_decimal(x).ok_or_else(bad)?,
                y: parse_decimal(y).ok_or_else(bad)?,
            }
        }
        "CLS" if args.is_empty() => Command::Cls,
        "PRINT" => {
            let sets = args.split(',').next().unwrap_or("");
            Command::Print {
                copies: parse_decimal(sets).ok_or_else(bad)?,
            }
        }
        _ => Command::Other(line.to_string()),
    };

    Ok(command)
}

/// Parse `48 mm` or `48` into millimetres.
fn parse_mm(text: &str) -> Option<f64> {
    let value = text.trim().trim_end_matches("mm").trim();
    value.parse().ok().filter(|v: &f64| v.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_decode_full_stream() {
        let mut stream = b"SIZE 48 mm,25 mm\r\nGAP 0 mm,0 mm\r\nDIRECTION 1\r\nREFERENCE 3,4\r\nCLS\r\nBITMAP 0,0,2,2,0,"
            .to_vec();
        // Binary data that contains CR LF and digits
        stream.extend_from_slice(&[b'\r', b'\n', b'1', 0xFF]);
        stream.extend_from_slice(b"\r\nPRINT 2\r\n");

        let commands = decode(&stream).unwrap();
        assert_eq!(
            commands,
            vec![
                Command::Size {
                    width_mm: 48.0,
                    height_mm: 25.0
                },
                Command::Gap {
                    gap_mm: 0.0,
                    offset_mm: 0.0
                },
                Command::Direction(1),
                Command::Reference { x: 3, y: 4 },
                Command::Cls,
                Command::Bitmap {
                    header: BitmapHeader {
                        x: 0,
                        y: 0,
                        width_bytes: 2,
                        height: 2,
                        mode: 0
                    },
                    data: vec![b'\r', b'\n', b'1', 0xFF],
                },
                Command::Print { copies: 2 },
            ]
        );
    }

    #[test]
    fn test_truncated_bitmap() {
        let stream = b"CLS\r\nBITMAP 0,0,10,10,0,\x00\x00\x00";
        assert!(matches!(decode(stream), Err(EtiquetaError::Decode(_))));
    }

    #[test]
    fn test_malformed_bitmap_header() {
        assert!(decode(b"BITMAP 0,0,x,1,0,\x00").is_err());
        assert!(decode(b"BITMAP 0,0,1").is_err());
    }

    #[test]
    fn test_unknown_commands_kept() {
        let commands = decode(b"DENSITY 8\r\nSPEED 4\r\nPRINT 1,2\r\n").unwrap();
        assert_eq!(
            commands,
            vec![
                Command::Other("DENSITY 8".to_string()),
                Command::Other("SPEED 4".to_string()),
                Command::Print { copies: 1 },
            ]
        );
    }

    #[test]
    fn test_fractional_mm() {
        let commands = decode(b"SIZE 62.5 mm,29.25 mm\r\n").unwrap();
        assert_eq!(
            commands,
            vec![Command::Size {
                width_mm: 62.5,
                height_mm: 29.25
            }]
        );
    }

    #[test]
    fn test_command_names() {
        assert_eq!(Command::Cls.name(), "CLS");
        assert_eq!(Command::Print { copies: 1 }.name(), "PRINT");
    }
}
