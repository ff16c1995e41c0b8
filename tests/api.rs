use std::num::NonZeroUsize;
use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header::CONTENT_TYPE},
};
use http_body_util::BodyExt;
use tower::ServiceExt;

use tessera::application::qrcode::{QrCodeService, RenderedImage};
use tessera::domain::qr::{ErrorCorrectionLevel, OutputFormat, QrRequest};
use tessera::infra::http::{HttpState, build_router};

const PNG_SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

fn router() -> Router {
    router_with_chunk_size(512)
}

fn router_with_chunk_size(chunk_size: usize) -> Router {
    let state = HttpState {
        qr: Arc::new(QrCodeService::new(
            NonZeroUsize::new(chunk_size).expect("non-zero chunk size"),
        )),
    };
    build_router(state)
}

fn json_post(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .expect("request")
}

async fn body_bytes(response: axum::response::Response) -> Vec<u8> {
    response
        .into_body()
        .collect()
        .await
        .expect("collect body")
        .to_bytes()
        .to_vec()
}

#[tokio::test]
async fn text_request_streams_png_by_default() {
    let response = router()
        .oneshot(json_post("/qrcode/from-text", r#"{"text":"HELLO"}"#))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get(CONTENT_TYPE).expect("content type"),
        "image/png"
    );

    let body = body_bytes(response).await;
    assert!(body.starts_with(&PNG_SIGNATURE));
}

#[tokio::test]
async fn url_request_with_quartile_vector_yields_svg_markup() {
    let response = router()
        .oneshot(json_post(
            "/qrcode/from-url?error_correction=q&output_format=svg",
            r#"{"url":"https://example.com"}"#,
        ))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get(CONTENT_TYPE).expect("content type"),
        "image/svg+xml"
    );

    let body = String::from_utf8(body_bytes(response).await).expect("utf-8 svg");
    assert!(body.contains("<svg"));
    assert!(body.contains("<path"));

    // Both renderers share the module scale and quiet zone, so the raster
    // width of the same payload pins the exact viewBox dimensions.
    let service = QrCodeService::new(NonZeroUsize::new(512).expect("non-zero chunk size"));
    let raster = service
        .render(&QrRequest::new(
            "https://example.com/".to_string(),
            ErrorCorrectionLevel::Quartile,
            OutputFormat::Raster,
        ))
        .expect("raster render");
    let RenderedImage::Raster(bitmap) = raster else {
        panic!("expected a raster image");
    };
    let side = bitmap.width();
    assert!(body.contains(&format!("viewBox=\"0 0 {side} {side}\"")));
}

#[tokio::test]
async fn long_form_enum_values_are_accepted() {
    let response = router()
        .oneshot(json_post(
            "/qrcode/from-text?error_correction=quartile&output_format=vector",
            r#"{"text":"HELLO"}"#,
        ))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get(CONTENT_TYPE).expect("content type"),
        "image/svg+xml"
    );
}

#[tokio::test]
async fn email_request_streams_qrcode() {
    let response = router()
        .oneshot(json_post(
            "/qrcode/from-email",
            r#"{"email":"writer@example.com"}"#,
        ))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_bytes(response).await;
    assert!(body.starts_with(&PNG_SIGNATURE));
}

#[tokio::test]
async fn identical_requests_stream_identical_bytes() {
    let first = router()
        .oneshot(json_post("/qrcode/from-text", r#"{"text":"HELLO"}"#))
        .await
        .expect("response");
    let second = router()
        .oneshot(json_post("/qrcode/from-text", r#"{"text":"HELLO"}"#))
        .await
        .expect("response");

    assert_eq!(body_bytes(first).await, body_bytes(second).await);
}

#[tokio::test]
async fn chunk_size_does_not_change_the_streamed_content() {
    let small = router_with_chunk_size(1)
        .oneshot(json_post("/qrcode/from-text", r#"{"text":"HELLO"}"#))
        .await
        .expect("response");
    let large = router_with_chunk_size(1 << 20)
        .oneshot(json_post("/qrcode/from-text", r#"{"text":"HELLO"}"#))
        .await
        .expect("response");

    assert_eq!(body_bytes(small).await, body_bytes(large).await);
}

#[tokio::test]
async fn unrecognized_correction_level_is_a_client_error() {
    let response = router()
        .oneshot(json_post(
            "/qrcode/from-text?error_correction=ultra",
            r#"{"text":"HELLO"}"#,
        ))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn unrecognized_output_format_is_a_client_error() {
    let response = router()
        .oneshot(json_post(
            "/qrcode/from-text?output_format=gif",
            r#"{"text":"HELLO"}"#,
        ))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn malformed_email_is_a_client_error() {
    let response = router()
        .oneshot(json_post("/qrcode/from-email", r#"{"email":"not-an-email"}"#))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn malformed_url_is_rejected_by_the_extractor() {
    let response = router()
        .oneshot(json_post("/qrcode/from-url", r#"{"url":"not a url"}"#))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn oversized_payload_is_a_server_error() {
    let payload = "a".repeat(3000);
    let body = format!(r#"{{"text":"{payload}"}}"#);
    let response = router()
        .oneshot(json_post("/qrcode/from-text?error_correction=h", &body))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn index_reports_service_identity() {
    let response = router()
        .oneshot(
            Request::builder()
                .uri("/")
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::OK);
    let body: serde_json::Value =
        serde_json::from_slice(&body_bytes(response).await).expect("json body");
    assert_eq!(body["service"], "tessera");
}

#[tokio::test]
async fn encoder_info_names_the_engine() {
    let response = router()
        .oneshot(
            Request::builder()
                .uri("/qrcode")
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::OK);
    let body: serde_json::Value =
        serde_json::from_slice(&body_bytes(response).await).expect("json body");
    assert_eq!(body["encoder"], "qrcode");
}

#[tokio::test]
async fn health_endpoint_returns_no_content() {
    let response = router()
        .oneshot(
            Request::builder()
                .uri("/_health")
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::NO_CONTENT);
}
