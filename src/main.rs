//! # Etiqueta CLI
//!
//! Command-line interface for TSPL label payloads.
//!
//! ## Usage
//!
//! ```bash
//! # Run the HTTP label service (PORT defaults to 3002)
//! etiqueta serve
//!
//! # Encode a rendered 48x25mm label image for a 203 DPI printer
//! etiqueta encode label.png --width-mm 48 --height-mm 25 -o label.tspl
//!
//! # Render and encode a label from a JSON print request
//! etiqueta label request.json -o label.tspl --png preview.png
//!
//! # List the commands in a payload and dump its bitmap
//! etiqueta inspect label.tspl --png bitmap.png
//! ```

use base64::{Engine, engine::general_purpose::STANDARD};
use clap::{Parser, Subcommand};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info};
use tracing_subscriber::EnvFilter;

use etiqueta::{
    EtiquetaError, LabelGeometry, ProtocolPayload,
    job::{self, JobSettings},
    label::{self, BitmapFontRenderer, LabelRenderer, PrintLabelRequest, request},
    printer::Direction,
    protocol::{
        decode::{self, Command},
        payload::BitmapHeader,
        script::Copies,
    },
    render::{
        monochrome::{MonochromeBitmap, Threshold},
        preview,
    },
    server::{self, DEFAULT_PORT, ServerConfig},
};

/// Etiqueta - TSPL label printer payload utility
#[derive(Parser, Debug)]
#[command(name = "etiqueta")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the HTTP label service
    Serve {
        /// Address to bind
        #[arg(long, env = "ETIQUETA_HOST", default_value = "0.0.0.0")]
        host: String,

        /// Port to listen on
        #[arg(long, env = "PORT", default_value_t = DEFAULT_PORT)]
        port: u16,
    },

    /// Encode a rendered label image into a TSPL payload
    Encode {
        /// Label image (PNG, JPEG, ...) of exactly the label's pixel size
        image: PathBuf,

        /// Label width in millimetres
        #[arg(long)]
        width_mm: f64,

        /// Label height in millimetres
        #[arg(long)]
        height_mm: f64,

        /// Gap between labels in millimetres
        #[arg(long, default_value_t = 0.0)]
        gap_mm: f64,

        /// Printer resolution
        #[arg(long, default_value_t = 203)]
        dpi: u32,

        /// Number of copies (values below 1 print one)
        #[arg(long, default_value_t = 1, allow_negative_numbers = true)]
        copies: i64,

        /// Luminance threshold; darker pixels are printed
        #[arg(long, default_value_t = Threshold::DEFAULT.0)]
        threshold: u8,

        /// Print direction (0 or 1)
        #[arg(long, default_value_t = 0)]
        direction: u8,

        /// Output file (stdout if omitted)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Write base64 instead of raw bytes
        #[arg(long)]
        base64: bool,
    },

    /// Render a label from a JSON print request and encode it
    Label {
        /// JSON print request (same body as POST /print-label)
        request: PathBuf,

        /// Output file (stdout if omitted)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Write base64 instead of raw bytes
        #[arg(long)]
        base64: bool,

        /// Also save the rendered label as PNG
        #[arg(long, value_name = "FILE")]
        png: Option<PathBuf>,
    },

    /// Decode a TSPL payload and list its commands
    Inspect {
        /// Payload file
        payload: PathBuf,

        /// Input is base64 encoded
        #[arg(long)]
        base64: bool,

        /// Save the BITMAP data as PNG
        #[arg(long, value_name = "FILE")]
        png: Option<PathBuf>,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("etiqueta=info,tower_http=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run() {
        error!(code = e.code(), "{}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<(), EtiquetaError> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Serve { host, port } => {
            let config = ServerConfig {
                listen_addr: format!("{}:{}", host, port),
            };
            let runtime = tokio::runtime::Runtime::new()?;
            runtime.block_on(server::serve(config))?;
        }

        Commands::Encode {
            image,
            width_mm,
            height_mm,
            gap_mm,
            dpi,
            copies,
            threshold,
            direction,
            output,
            base64,
        } => {
            let geometry = LabelGeometry::new(width_mm, height_mm, gap_mm)?
                .with_direction(Direction::try_from(direction)?);
            let settings = JobSettings {
                copies: Copies::normalize(Some(copies)),
                threshold: Threshold(threshold),
                ..JobSettings::new(geometry, dpi)
            };

            let size = settings.label_pixels()?;
            info!(
                "Encoding {} ({}x{} dots at {} dpi)...",
                image.display(),
                size.width,
                size.height,
                dpi
            );

            let bytes = fs::read(&image)?;
            let payload = job::encode_png(&bytes, &settings)?;
            write_payload(&payload, output.as_deref(), base64)?;
        }

        Commands::Label {
            request: request_path,
            output,
            base64,
            png,
        } => {
            let text = fs::read_to_string(&request_path)?;
            let raw: PrintLabelRequest = serde_json::from_str(&text).map_err(|e| {
                EtiquetaError::Validation(format!("Invalid request JSON: {}", e))
            })?;
            let label = request::validate(&raw)?;

            let renderer = BitmapFontRenderer::new();
            if let Some(png_path) = png {
                let size = label.job_settings().label_pixels()?;
                let image = renderer.render(&label, size)?;
                image
                    .save(&png_path)
                    .map_err(|e| EtiquetaError::Render(format!("Failed to save PNG: {}", e)))?;
                info!("Saved label preview to {}", png_path.display());
            }

            let payload = label::print_label(&renderer, &label)?;
            write_payload(&payload, output.as_deref(), base64)?;
        }

        Commands::Inspect {
            payload,
            base64,
            png,
        } => {
            let mut bytes = fs::read(&payload)?;
            if base64 {
                let text = String::from_utf8_lossy(&bytes);
                bytes = STANDARD
                    .decode(text.trim())
                    .map_err(|e| EtiquetaError::Decode(format!("Invalid base64: {}", e)))?;
            }

            let commands = decode::decode(&bytes)?;
            for command in &commands {
                println!("{}", describe(command));
            }

            if let Some(png_path) = png {
                save_bitmap_png(&commands, &png_path)?;
                info!("Saved bitmap to {}", png_path.display());
            }
        }
    }

    Ok(())
}

/// Write a payload to a file or stdout, raw or base64.
fn write_payload(
    payload: &ProtocolPayload,
    output: Option<&Path>,
    base64: bool,
) -> Result<(), EtiquetaError> {
    let data = if base64 {
        let mut text = STANDARD.encode(payload.as_bytes()).into_bytes();
        text.push(b'\n');
        text
    } else {
        payload.as_bytes().to_vec()
    };

    match output {
        Some(path) => {
            fs::write(path, &data)?;
            info!(
                "Wrote {} bytes ({} bitmap) to {}",
                payload.len(),
                payload.bitmap_segment().len(),
                path.display()
            );
        }
        None => {
            use std::io::Write;
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(&data)?;
            stdout.flush()?;
        }
    }

    Ok(())
}

/// One-line summary of a decoded command.
fn describe(command: &Command) -> String {
    match command {
        Command::Size {
            width_mm,
            height_mm,
        } => format!("SIZE       {} x {} mm", width_mm, height_mm),
        Command::Gap { gap_mm, offset_mm } => {
            format!("GAP        {} mm (offset {} mm)", gap_mm, offset_mm)
        }
        Command::Direction(d) => format!("DIRECTION  {}", d),
        Command::Reference { x, y } => format!("REFERENCE  {},{}", x, y),
        Command::Cls => "CLS".to_string(),
        Command::Bitmap { header, data } => {
            let ink: usize = data.iter().map(|b| b.count_ones() as usize).sum();
            format!(
                "BITMAP     at {},{}: {} bytes x {} rows, mode {}, {} bytes, {} ink dots",
                header.x,
                header.y,
                header.width_bytes,
                header.height,
                header.mode,
                data.len(),
                ink
            )
        }
        Command::Print { copies } => format!("PRINT      {}", copies),
        Command::Other(line) => format!("(other)    {}", line),
    }
}

/// Save the first BITMAP command's data as a PNG.
fn save_bitmap_png(commands: &[Command], path: &Path) -> Result<(), EtiquetaError> {
    let (header, data) = commands
        .iter()
        .find_map(|c| match c {
            Command::Bitmap { header, data } => Some((header, data)),
            _ => None,
        })
        .ok_or_else(|| EtiquetaError::Decode("payload has no BITMAP command".to_string()))?;

    debug!("bitmap header: {:?}", header);
    let bitmap = bitmap_from_header(header, data)?;
    let png = preview::to_png_bytes(&bitmap)?;
    fs::write(path, png)?;
    Ok(())
}

/// Rebuild a bitmap from a decoded `BITMAP` command.
fn bitmap_from_header(header: &BitmapHeader, data: &[u8]) -> Result<MonochromeBitmap, EtiquetaError> {
    let width_px = header.width_bytes.checked_mul(8).ok_or_else(|| {
        EtiquetaError::Decode(format!(
            "BITMAP width of {} bytes is too large",
            header.width_bytes
        ))
    })?;
    MonochromeBitmap::from_packed(width_px, header.height, data.to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bitmap_from_header() {
        let header = BitmapHeader {
            x: 0,
            y: 0,
            width_bytes: 2,
            height: 1,
            mode: 0,
        };
        let bitmap = bitmap_from_header(&header, &[0xFF, 0x00]).unwrap();
        assert_eq!((bitmap.width_px(), bitmap.height_px()), (16, 1));
        assert_eq!(bitmap.ink_count(), 8);
    }

    #[test]
    fn test_bitmap_from_header_rejects_overflowing_width() {
        // Declares zero bytes, so it decodes, but the width overflows u32
        let commands = decode::decode(b"BITMAP 0,0,600000000,0,0,").unwrap();
        let Some(Command::Bitmap { header, data }) = commands.first() else {
            panic!("expected a BITMAP command");
        };
        assert!(matches!(
            bitmap_from_header(header, data),
            Err(EtiquetaError::Decode(_))
        ));
    }
}
