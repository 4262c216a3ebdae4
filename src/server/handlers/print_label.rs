//! Label printing handler.
//!
//! `POST /print-label` validates the request, renders the label, encodes it
//! into a TSPL stream and returns the stream as base64. The client device
//! sends the decoded bytes to its printer unchanged.

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use base64::{Engine, engine::general_purpose::STANDARD};
use serde::Serialize;
use std::sync::Arc;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::error::EtiquetaError;
use crate::label::{self, PrintLabelRequest, request};

use super::super::state::AppState;

/// Successful response body.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PrintLabelResponse {
    pub tspl_base64: String,
    pub label_type: String,
    pub dimensions: Dimensions,
}

/// Label size echoed back in millimetres.
#[derive(Debug, Serialize)]
pub struct Dimensions {
    pub width: f64,
    pub height: f64,
}

/// Error response body.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label_id: Option<String>,
}

/// Build the JSON error response for `err`.
pub fn error_response(err: &EtiquetaError, label_id: Option<String>) -> Response {
    let status = if err.is_client_error() {
        StatusCode::BAD_REQUEST
    } else {
        StatusCode::INTERNAL_SERVER_ERROR
    };

    let body = ErrorResponse {
        error: err.code().to_string(),
        message: err.to_string(),
        label_id,
    };
    (status, Json(body)).into_response()
}

/// Handle POST /print-label.
pub async fn print_label(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<PrintLabelRequest>, JsonRejection>,
) -> Response {
    let request_id = Uuid::new_v4();

    let Json(raw) = match payload {
        Ok(json) => json,
        Err(rejection) => {
            warn!(%request_id, "rejected print request body: {}", rejection.body_text());
            let err = EtiquetaError::Validation(rejection.body_text());
            return error_response(&err, None);
        }
    };
    let label_id = raw.label_id();

    let label = match request::validate(&raw) {
        Ok(label) => label,
        Err(e) => {
            warn!(%request_id, code = e.code(), "invalid print request: {}", e);
            return error_response(&e, label_id);
        }
    };

    // Rendering and packing are CPU-bound
    let renderer = state.renderer.clone();
    let result = tokio::task::spawn_blocking(move || {
        let payload = label::print_label(renderer.as_ref(), &label)?;
        Ok::<_, EtiquetaError>((label, payload))
    })
    .await;

    match result {
        Ok(Ok((label, payload))) => {
            info!(
                %request_id,
                name = %label.name,
                dpi = label.dpi,
                bitmap_bytes = payload.bitmap_segment().len(),
                total_bytes = payload.len(),
                "encoded label"
            );
            let body = PrintLabelResponse {
                tspl_base64: STANDARD.encode(payload.as_bytes()),
                label_type: label.label_type_name().to_string(),
                dimensions: Dimensions {
                    width: label.geometry.width_mm,
                    height: label.geometry.height_mm,
                },
            };
            (StatusCode::OK, Json(body)).into_response()
        }
        Ok(Err(e)) => {
            error!(%request_id, code = e.code(), "label encoding failed: {}", e);
            error_response(&e, label_id)
        }
        Err(e) => {
            error!(%request_id, "encoding task failed: {}", e);
            let body = ErrorResponse {
                error: "INTERNAL_ERROR".to_string(),
                message: format!("Task error: {}", e),
                label_id,
            };
            (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
        }
    }
}
