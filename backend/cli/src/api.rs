use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    extract::State,
    http::{
        header::{CONTENT_LENGTH, CONTENT_TYPE},
        HeaderMap, HeaderName, HeaderValue, Method,
    },
    response::Json,
    routing::{get, post},
    Router,
};
use serde_json::{json, Value};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::warn;

use pinyinlens_core::{new_request_id, ProcessResponse, ValidationError};
use pinyinlens_pipeline::{ProcessRequest, ResponseAssembler};

/// Shared application state for API handlers.
pub struct AppState {
    pub assembler: ResponseAssembler,
}

/// Build the Axum router with all API routes.
pub fn build_router(state: Arc<AppState>, cors_origins: &[String]) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/v1/process", post(process_image))
        .with_state(state)
        .layer(cors_layer(cors_origins))
        .layer(TraceLayer::new_for_http())
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([Method::POST, Method::OPTIONS])
        .allow_headers(Any);

    // tower-http rejects `*` inside an origin list.
    if origins.iter().any(|origin| origin == "*") {
        return layer.allow_origin(Any);
    }

    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    layer.allow_origin(origins)
}

/// Health check endpoint.
async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": "pinyinlens",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// POST /v1/process: raw image body in, envelope out.
///
/// Always answers 200; failures travel in the envelope's `status`/`error`.
pub async fn process_image(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Body,
) -> Json<ProcessResponse> {
    let request_id = new_request_id();

    let declared_length = header_str(&headers, CONTENT_LENGTH)
        .and_then(|v| v.trim().parse::<u64>().ok());
    if let Some(rejection) = state
        .assembler
        .reject_declared_length(&request_id, declared_length)
    {
        return Json(rejection);
    }

    let limit = state.assembler.validator().limits().max_file_bytes;
    let body = match to_bytes(body, usize::try_from(limit).unwrap_or(usize::MAX)).await {
        Ok(bytes) => bytes,
        // Over the cap without a usable Content-Length. A client that aborted
        // mid-upload lands here too but never reads the reply.
        Err(e) => {
            warn!(request_id = %request_id, error = %e, "Upload body rejected while buffering");
            return Json(ProcessResponse::error(request_id, ValidationError::FileTooLarge));
        }
    };

    let content_type = header_str(&headers, CONTENT_TYPE).map(str::to_string);

    let response = state
        .assembler
        .process(ProcessRequest {
            request_id,
            body,
            content_type,
        })
        .await;
    Json(response)
}

fn header_str(headers: &HeaderMap, name: HeaderName) -> Option<&str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}
