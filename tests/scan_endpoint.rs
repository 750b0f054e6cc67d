use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, StatusCode, header},
};
use tower::ServiceExt;

use ecoloop_scanner::features::scan::{Classifier, ClassifierError, Label, ScanService};
use ecoloop_scanner::{AppConfig, AppState, build_router};

const BOUNDARY: &str = "ecoloop-test-boundary";

struct Part<'a> {
    name: &'a str,
    filename: Option<&'a str>,
    data: &'a [u8],
}

fn multipart_body(parts: &[Part<'_>]) -> Vec<u8> {
    let mut body = Vec::new();
    for p in parts {
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        let disposition = match p.filename {
            Some(f) => format!(
                "Content-Disposition: form-data; name=\"{}\"; filename=\"{f}\"\r\n",
                p.name
            ),
            None => format!("Content-Disposition: form-data; name=\"{}\"\r\n", p.name),
        };
        body.extend_from_slice(disposition.as_bytes());
        body.extend_from_slice(b"Content-Type: application/octet-stream\r\n\r\n");
        body.extend_from_slice(p.data);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}

fn scan_request(parts: &[Part<'_>]) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/scan")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(multipart_body(parts)))
        .expect("build request")
}

fn upload(data: &[u8], filename: &str) -> Request<Body> {
    scan_request(&[Part {
        name: "image",
        filename: Some(filename),
        data,
    }])
}

fn instant_config() -> AppConfig {
    let mut cfg = AppConfig::default();
    cfg.scan.simulated_latency_ms = 0;
    cfg
}

fn make_app(cfg: &AppConfig) -> Router {
    build_router(cfg, AppState::from_config(cfg))
}

async fn json_body(resp: axum::response::Response) -> serde_json::Value {
    let bytes = to_bytes(resp.into_body(), usize::MAX)
        .await
        .expect("read body");
    serde_json::from_slice(&bytes).expect("parse json")
}

#[tokio::test]
async fn root_returns_exact_status_payload() {
    let app = make_app(&instant_config());
    let resp = app
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .expect("request /");

    assert_eq!(resp.status(), StatusCode::OK);
    let bytes = to_bytes(resp.into_body(), usize::MAX)
        .await
        .expect("read body");
    assert_eq!(
        std::str::from_utf8(&bytes).expect("utf8"),
        r#"{"status":"ok","service":"EcoLoop Hardware Scanner API"}"#
    );
}

#[tokio::test]
async fn one_kib_upload_is_broken_fan() {
    let app = make_app(&instant_config());
    let resp = app
        .oneshot(upload(&[0xAB; 1024], "fan.jpg"))
        .await
        .expect("scan");

    assert_eq!(resp.status(), StatusCode::OK);
    let v = json_body(resp).await;
    assert_eq!(
        v,
        serde_json::json!({
            "success": true,
            "filename": "fan.jpg",
            "size_kb": 1.0,
            "result": "IDENTIFIED: BROKEN PC FAN [95.1%]"
        })
    );
}

#[tokio::test]
async fn three_kib_upload_is_broken_fan() {
    let app = make_app(&instant_config());
    let v = json_body(app.oneshot(upload(&[1; 3072], "x.png")).await.unwrap()).await;
    assert_eq!(v["size_kb"], 3.0);
    assert_eq!(v["result"], "IDENTIFIED: BROKEN PC FAN [95.1%]");
}

#[tokio::test]
async fn empty_upload_succeeds() {
    let app = make_app(&instant_config());
    let v = json_body(app.oneshot(upload(&[], "empty.jpg")).await.unwrap()).await;
    assert_eq!(v["success"], true);
    assert_eq!(v["size_kb"], 0.0);
    assert_eq!(v["result"], "IDENTIFIED: BROKEN PC FAN [95.1%]");
}

#[tokio::test]
async fn one_and_a_half_kib_upload_is_stepper_motor() {
    let app = make_app(&instant_config());
    let v = json_body(app.oneshot(upload(&[9; 1536], "motor.jpg")).await.unwrap()).await;
    assert_eq!(v["size_kb"], 1.5);
    assert_eq!(v["result"], "IDENTIFIED: STEPPER MOTOR [98.4%]");
}

#[tokio::test]
async fn non_image_bytes_are_accepted() {
    let app = make_app(&instant_config());
    let resp = app
        .oneshot(upload(b"definitely not a jpeg", "notes.txt"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let v = json_body(resp).await;
    assert_eq!(v["size_kb"], 0.02);
}

#[tokio::test]
async fn part_without_filename_echoes_null() {
    let app = make_app(&instant_config());
    let resp = app
        .oneshot(scan_request(&[Part {
            name: "image",
            filename: None,
            data: &[0; 10],
        }]))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let v = json_body(resp).await;
    assert!(v["filename"].is_null());
}

#[tokio::test]
async fn unrelated_fields_are_ignored() {
    let app = make_app(&instant_config());
    let resp = app
        .oneshot(scan_request(&[
            Part {
                name: "note",
                filename: None,
                data: b"hello",
            },
            Part {
                name: "image",
                filename: Some("a.jpg"),
                data: &[0; 2048],
            },
        ]))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let v = json_body(resp).await;
    assert_eq!(v["filename"], "a.jpg");
    assert_eq!(v["size_kb"], 2.0);
}

#[tokio::test]
async fn first_image_field_wins() {
    let app = make_app(&instant_config());
    let resp = app
        .oneshot(scan_request(&[
            Part {
                name: "image",
                filename: Some("first.jpg"),
                data: &[0; 1024],
            },
            Part {
                name: "image",
                filename: Some("second.jpg"),
                data: &[0; 1536],
            },
        ]))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let v = json_body(resp).await;
    assert_eq!(v["filename"], "first.jpg");
    assert_eq!(v["size_kb"], 1.0);
    assert_eq!(v["result"], "IDENTIFIED: BROKEN PC FAN [95.1%]");
}

#[tokio::test]
async fn truncated_multipart_body_is_bad_request() {
    let app = make_app(&instant_config());
    // 缺少结束边界
    let body = format!(
        "--{BOUNDARY}\r\n\
         Content-Disposition: form-data; name=\"image\"; filename=\"cut.jpg\"\r\n\
         Content-Type: application/octet-stream\r\n\r\n\
         abc"
    );
    let resp = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/scan")
                .header(
                    header::CONTENT_TYPE,
                    format!("multipart/form-data; boundary={BOUNDARY}"),
                )
                .body(Body::from(body))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        resp.headers().get(header::CONTENT_TYPE).unwrap(),
        "application/problem+json"
    );
    let v = json_body(resp).await;
    assert_eq!(v["status"], 400);
    assert_eq!(v["code"], "BAD_REQUEST");
    assert!(v["requestId"].is_string());
}

#[tokio::test]
async fn missing_image_field_is_validation_problem() {
    let app = make_app(&instant_config());
    let resp = app
        .oneshot(scan_request(&[Part {
            name: "file",
            filename: Some("a.jpg"),
            data: &[0; 16],
        }]))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let content_type = resp
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_string();
    assert_eq!(content_type, "application/problem+json");

    let v = json_body(resp).await;
    assert_eq!(v["status"], 422);
    assert_eq!(v["code"], "VALIDATION_FAILED");
    assert!(v["requestId"].is_string());
}

#[tokio::test]
async fn non_multipart_body_is_rejected() {
    let app = make_app(&instant_config());
    let resp = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/scan")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from("{}"))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn configured_upload_limit_returns_413() {
    let mut cfg = instant_config();
    cfg.scan.max_upload_bytes = 1024;
    let app = make_app(&cfg);

    let resp = app.oneshot(upload(&[0; 8192], "big.jpg")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::PAYLOAD_TOO_LARGE);
    let v = json_body(resp).await;
    assert_eq!(v["code"], "PAYLOAD_TOO_LARGE");
}

#[tokio::test]
async fn uploads_above_axum_default_limit_are_accepted() {
    let app = make_app(&instant_config());
    let data = vec![0u8; 3 * 1024 * 1024];
    let resp = app.oneshot(upload(&data, "large.jpg")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let v = json_body(resp).await;
    assert_eq!(v["size_kb"], 3072.0);
}

#[tokio::test(start_paused = true)]
async fn scan_takes_at_least_two_seconds_by_default() {
    let app = make_app(&AppConfig::default());
    let started = tokio::time::Instant::now();
    let resp = app.oneshot(upload(&[0; 1024], "fan.jpg")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(started.elapsed() >= Duration::from_secs(2));
}

#[tokio::test(start_paused = true)]
async fn concurrent_scans_do_not_serialize() {
    let app = make_app(&AppConfig::default());
    let started = tokio::time::Instant::now();

    let (a, b) = tokio::join!(
        app.clone().oneshot(upload(&[0; 1024], "a.jpg")),
        app.clone().oneshot(upload(&[0; 1536], "b.jpg")),
    );
    assert_eq!(a.unwrap().status(), StatusCode::OK);
    assert_eq!(b.unwrap().status(), StatusCode::OK);

    let elapsed = started.elapsed();
    assert!(elapsed >= Duration::from_secs(2));
    assert!(elapsed < Duration::from_secs(4), "scans ran serially: {elapsed:?}");
}

#[tokio::test]
async fn permissive_cors_mirrors_origin_with_credentials() {
    let app = make_app(&instant_config());
    let resp = app
        .oneshot(
            Request::builder()
                .method("OPTIONS")
                .uri("/api/scan")
                .header(header::ORIGIN, "http://localhost:19006")
                .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
                .header(header::ACCESS_CONTROL_REQUEST_HEADERS, "x-custom-header")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    let h = resp.headers();
    assert_eq!(
        h.get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
        "http://localhost:19006"
    );
    assert_eq!(
        h.get(header::ACCESS_CONTROL_ALLOW_CREDENTIALS).unwrap(),
        "true"
    );
    assert!(
        h.get(header::ACCESS_CONTROL_ALLOW_METHODS)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
            .contains("POST")
    );
    assert!(
        h.get(header::ACCESS_CONTROL_ALLOW_HEADERS)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
            .contains("x-custom-header")
    );
}

#[tokio::test]
async fn openapi_document_is_served_when_docs_enabled() {
    let app = make_app(&instant_config());
    let resp = app
        .oneshot(
            Request::builder()
                .uri("/openapi.json")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let v = json_body(resp).await;
    assert!(v["paths"]["/api/scan"]["post"].is_object());
}

#[tokio::test]
async fn docs_can_be_disabled() {
    let mut cfg = instant_config();
    cfg.api.docs_enabled = false;
    let app = make_app(&cfg);
    let resp = app
        .oneshot(
            Request::builder()
                .uri("/openapi.json")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

struct OfflineClassifier;

#[async_trait]
impl Classifier for OfflineClassifier {
    async fn classify(&self, _image: &[u8]) -> Result<Label, ClassifierError> {
        Err(ClassifierError::Unavailable("inference backend offline".into()))
    }
}

#[tokio::test]
async fn classifier_can_be_swapped_without_touching_routes() {
    let cfg = instant_config();
    let state = AppState::new(ScanService::new(Arc::new(OfflineClassifier)));
    let app = build_router(&cfg, state);

    let resp = app.oneshot(upload(&[0; 1024], "fan.jpg")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_GATEWAY);
    let v = json_body(resp).await;
    assert_eq!(v["code"], "CLASSIFIER_FAILED");
}
