//! Server state and configuration.

use std::sync::Arc;

use crate::label::{BitmapFontRenderer, LabelRenderer};

/// Port used when `PORT` is not set.
pub const DEFAULT_PORT: u16 = 3002;

/// Server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to listen on (e.g., "0.0.0.0:3002")
    pub listen_addr: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: format!("0.0.0.0:{}", DEFAULT_PORT),
        }
    }
}

/// Application state shared across handlers.
pub struct AppState {
    /// Produces the raster image for each label
    pub renderer: Arc<dyn LabelRenderer>,
}

impl AppState {
    /// State using the built-in bitmap font renderer.
    pub fn new() -> Self {
        Self::with_renderer(Arc::new(BitmapFontRenderer::new()))
    }

    pub fn with_renderer(renderer: Arc<dyn LabelRenderer>) -> Self {
        Self { renderer }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}
