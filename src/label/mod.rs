//! # Label Requests and Rendering
//!
//! Everything that happens before the encoding pipeline: validating what
//! the client asked for and producing a raster image of the exact pixel
//! size the label needs.
//!
//! - [`request`]: JSON print request and its validation
//! - [`render`]: Renderer contract and the built-in bitmap font renderer

pub mod render;
pub mod request;

pub use render::{BitmapFontRenderer, LabelRenderer};
pub use request::{LabelRequest, PrintLabelRequest};

use crate::error::Result;
use crate::job::{self, JobSettings};
use crate::protocol::payload::ProtocolPayload;

impl LabelRequest {
    /// Pipeline settings for this label: no gap, no offset.
    pub fn job_settings(&self) -> JobSettings {
        JobSettings {
            copies: self.copies,
            threshold: self.threshold,
            ..JobSettings::new(self.geometry, self.dpi)
        }
    }
}

/// Render a validated label and encode it into a TSPL payload.
pub fn print_label(
    renderer: &dyn LabelRenderer,
    label: &LabelRequest,
) -> Result<ProtocolPayload> {
    let settings = label.job_settings();
    let size = settings.label_pixels()?;
    let image = renderer.render(label, size)?;
    job::encode(&image, &settings)
}
