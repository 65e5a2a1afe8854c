//! # HTTP Server Tests
//!
//! Drive the router directly with `oneshot`; printing goes to a loopback
//! listener standing in for the printer.

use std::io::Read;
use std::net::TcpListener;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use pretty_assertions::assert_eq;
use tower::ServiceExt;

use grocy_label::pipeline::LabelService;
use grocy_label::server::{create_router, AppState, StatusResponse, SERVICE_NAME};
use grocy_label::transport::{NetworkPrinter, PrinterEndpoint};

// ============================================================================
// HELPER FUNCTIONS
// ============================================================================

fn app(port: u16) -> Router {
    let printer = NetworkPrinter::new(
        PrinterEndpoint::new("127.0.0.1", port).with_timeout(Duration::from_secs(2)),
    );
    create_router(Arc::new(AppState::new(
        LabelService::builtin().unwrap(),
        printer,
    )))
}

/// Accept one connection and return everything written to it.
fn fake_printer() -> (u16, thread::JoinHandle<Vec<u8>>) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    let handle = thread::spawn(move || {
        let (mut socket, _) = listener.accept().unwrap();
        let mut received = Vec::new();
        socket.read_to_end(&mut received).unwrap();
        received
    });
    (port, handle)
}

/// A port nothing listens on.
fn closed_port() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    listener.local_addr().unwrap().port()
}

fn post_json(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn post_form(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Vec<u8>) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    (status, body.to_vec())
}

const MILK: &str = r#"{
    "product": "Organic Whole Milk 2L",
    "grocycode": "123456",
    "amount": 1,
    "qu_name": "liter",
    "qu_name_plural": "liters"
}"#;

// ============================================================================
// STATUS
// ============================================================================

#[tokio::test]
async fn test_status() {
    let port = closed_port();
    let (status, body) = send(app(port), get("/")).await;

    assert_eq!(status, StatusCode::OK);
    let response: StatusResponse = serde_json::from_slice(&body).unwrap();
    assert_eq!(
        response,
        StatusResponse {
            status: "running".into(),
            printer: format!("127.0.0.1:{}", port),
            service: SERVICE_NAME.into(),
            printer_online: None,
        }
    );
}

#[tokio::test]
async fn test_status_probe_reports_offline_printer() {
    let (status, body) = send(app(closed_port()), get("/?probe=true")).await;

    assert_eq!(status, StatusCode::OK);
    let response: StatusResponse = serde_json::from_slice(&body).unwrap();
    assert_eq!(response.printer_online, Some(false));
}

// ============================================================================
// PRINT
// ============================================================================

#[tokio::test]
async fn test_print_json() {
    let (port, printer) = fake_printer();
    let (status, body) = send(app(port), post_json("/print", MILK)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, b"OK");

    let received = printer.join().unwrap();
    assert_eq!(&received[..2], &[0x1B, 0x40]);
    assert_eq!(&received[received.len() - 4..], &[0x1D, 0x56, 0x42, 0]);
}

#[tokio::test]
async fn test_print_form() {
    let (port, printer) = fake_printer();
    let request = post_form(
        "/print",
        "product=Spelt+Flour&grocycode=grcy%3Ap%3A17&amount=2&qu_name=bag&qu_name_plural=bags",
    );
    let (status, body) = send(app(port), request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, b"OK");
    assert!(!printer.join().unwrap().is_empty());
}

#[tokio::test]
async fn test_print_without_data() {
    let (status, body) = send(app(closed_port()), post_json("/print", "{}")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, b"No data received");

    let request = Request::builder()
        .method("POST")
        .uri("/print")
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(app(closed_port()), request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, b"No data received");
}

#[tokio::test]
async fn test_print_without_name() {
    let (status, body) = send(
        app(closed_port()),
        post_form("/print", "grocycode=123&amount=2"),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, b"Product name required");
}

#[tokio::test]
async fn test_print_malformed_json() {
    let (status, _) = send(app(closed_port()), post_json("/print", "{not json")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_print_unreachable_printer() {
    let (status, body) = send(app(closed_port()), post_json("/print", MILK)).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, b"Print failed");
}

// ============================================================================
// IMAGE PREVIEW
// ============================================================================

#[tokio::test]
async fn test_image_from_query() {
    let app = app(closed_port());
    let response = app
        .oneshot(get("/image?product=Rice&grocycode=grcy%3Ap%3A3"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get(header::CONTENT_TYPE).unwrap(),
        "image/png"
    );
    let body = response.into_body().collect().await.unwrap().to_bytes();
    assert_eq!(&body[..8], b"\x89PNG\r\n\x1a\n");
}

#[tokio::test]
async fn test_image_from_json() {
    let (status, body) = send(app(closed_port()), post_json("/image", MILK)).await;

    assert_eq!(status, StatusCode::OK);
    let png = image::load_from_memory(&body).unwrap();
    assert_eq!(png.width(), 384);
}

#[tokio::test]
async fn test_image_without_data() {
    let (status, body) = send(app(closed_port()), get("/image")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, b"No data received");
}

// ============================================================================
// TEST LABEL
// ============================================================================

#[tokio::test]
async fn test_sample_label() {
    let (port, printer) = fake_printer();
    let (status, body) = send(app(port), get("/test")).await;

    assert_eq!(status, StatusCode::OK);
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["status"], "success");
    assert!(!printer.join().unwrap().is_empty());
}

#[tokio::test]
async fn test_sample_label_printer_offline() {
    let (status, body) = send(app(closed_port()), get("/test")).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["status"], "error");
    assert_eq!(json["message"], "Print failed");
}
