use std::sync::Arc;

use axum::{
    Json, Router,
    body::Body,
    extract::{Query, State},
    http::{StatusCode, header::CONTENT_TYPE},
    middleware,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::Deserialize;
use serde_json::json;
use url::Url;

use crate::{
    application::{
        error::AppError,
        qrcode::{QrCodeResponse, QrCodeService},
    },
    domain::{
        input::EmailAddress,
        qr::{ErrorCorrectionLevel, OutputFormat, QrRequest},
    },
};

use super::middleware::{log_responses, set_request_context};

#[derive(Clone)]
pub struct HttpState {
    pub qr: Arc<QrCodeService>,
}

pub fn build_router(state: HttpState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/qrcode", get(encoder_info))
        .route("/qrcode/from-text", post(qrcode_from_text))
        .route("/qrcode/from-url", post(qrcode_from_url))
        .route("/qrcode/from-email", post(qrcode_from_email))
        .route("/_health", get(health))
        .with_state(state)
        .layer(middleware::from_fn(log_responses))
        .layer(middleware::from_fn(set_request_context))
}

/// Output choices shared by every `from-*` endpoint. Raw strings here;
/// parsing resolves them against the closed enumerations so unrecognized
/// values are rejected before anything reaches the encoder.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RenderQuery {
    error_correction: Option<String>,
    output_format: Option<String>,
}

impl RenderQuery {
    fn resolve(self, payload: String) -> Result<QrRequest, AppError> {
        let correction = match self.error_correction.as_deref() {
            Some(value) => value.parse::<ErrorCorrectionLevel>()?,
            None => ErrorCorrectionLevel::default(),
        };
        let format = match self.output_format.as_deref() {
            Some(value) => value.parse::<OutputFormat>()?,
            None => OutputFormat::default(),
        };
        Ok(QrRequest::new(payload, correction, format))
    }
}

#[derive(Debug, Deserialize)]
struct TextInput {
    text: String,
}

#[derive(Debug, Deserialize)]
struct UrlInput {
    url: Url,
}

#[derive(Debug, Deserialize)]
struct EmailInput {
    email: String,
}

async fn index() -> Response {
    Json(json!({
        "service": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
    }))
    .into_response()
}

async fn encoder_info() -> Response {
    Json(json!({
        "encoder": "qrcode",
        "service_version": env!("CARGO_PKG_VERSION"),
    }))
    .into_response()
}

async fn health() -> StatusCode {
    StatusCode::NO_CONTENT
}

async fn qrcode_from_text(
    State(state): State<HttpState>,
    Query(query): Query<RenderQuery>,
    Json(input): Json<TextInput>,
) -> Result<Response, AppError> {
    let request = query.resolve(input.text)?;
    stream_qrcode(&state, request).await
}

async fn qrcode_from_url(
    State(state): State<HttpState>,
    Query(query): Query<RenderQuery>,
    Json(input): Json<UrlInput>,
) -> Result<Response, AppError> {
    let request = query.resolve(input.url.to_string())?;
    stream_qrcode(&state, request).await
}

async fn qrcode_from_email(
    State(state): State<HttpState>,
    Query(query): Query<RenderQuery>,
    Json(input): Json<EmailInput>,
) -> Result<Response, AppError> {
    let email = EmailAddress::parse(&input.email)?;
    let request = query.resolve(email.as_str().to_string())?;
    stream_qrcode(&state, request).await
}

/// Encoding and the temp-file write are synchronous, so they run on the
/// blocking pool rather than stalling the runtime worker.
async fn stream_qrcode(state: &HttpState, request: QrRequest) -> Result<Response, AppError> {
    let qr = Arc::clone(&state.qr);
    let QrCodeResponse { stream, mime_type } =
        tokio::task::spawn_blocking(move || qr.produce_stream(&request))
            .await
            .map_err(|err| AppError::unexpected(format!("render task failed: {err}")))??;
    let body = Body::from_stream(stream.into_chunks());
    Ok((StatusCode::OK, [(CONTENT_TYPE, mime_type)], body).into_response())
}
