//! # HTTP Label Service
//!
//! Turns label print requests into base64 encoded TSPL streams for client
//! devices that forward them to their label printer.
//!
//! ## Usage
//!
//! ```bash
//! PORT=3002 etiqueta serve
//! ```
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | POST | `/print-label` | Render and encode one label |
//! | GET | `/health` | Liveness check |

mod handlers;
mod state;

pub use handlers::print_label::{ErrorResponse, PrintLabelResponse};
pub use state::{AppState, DEFAULT_PORT, ServerConfig};

use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;

use crate::error::EtiquetaError;

/// Build the application router.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/print-label", post(handlers::print_label::print_label))
        .route("/health", get(handlers::health::health))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Start the HTTP server.
///
/// ## Example
///
/// ```no_run
/// use etiqueta::server::{serve, ServerConfig};
///
/// # async fn example() -> Result<(), etiqueta::error::EtiquetaError> {
/// let config = ServerConfig {
///     listen_addr: "0.0.0.0:3002".to_string(),
/// };
///
/// serve(config).await?;
/// # Ok(())
/// # }
/// ```
pub async fn serve(config: ServerConfig) -> Result<(), EtiquetaError> {
    let app_state = Arc::new(AppState::new());
    let app = router(app_state);

    let listener = tokio::net::TcpListener::bind(&config.listen_addr)
        .await
        .map_err(|e| {
            EtiquetaError::Io(std::io::Error::new(
                e.kind(),
                format!("Failed to bind to {}: {}", config.listen_addr, e),
            ))
        })?;

    info!("Label render server listening on http://{}", config.listen_addr);
    info!("Print endpoint: http://{}/print-label", config.listen_addr);
    info!("Health check: http://{}/health", config.listen_addr);

    axum::serve(listener, app).await?;

    Ok(())
}
