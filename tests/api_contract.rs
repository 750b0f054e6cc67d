use axum::{
    http::{StatusCode, header},
    response::IntoResponse,
};

use ecoloop_scanner::AppError;
use ecoloop_scanner::features::scan::ClassifierError;

async fn problem_of(err: AppError) -> (StatusCode, String, serde_json::Value) {
    let resp = err.into_response();
    let status = resp.status();
    let content_type = resp
        .headers()
        .get(header::CONTENT_TYPE)
        .expect("missing Content-Type")
        .to_str()
        .expect("invalid Content-Type")
        .to_string();
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .expect("read body");
    let v: serde_json::Value = serde_json::from_slice(&bytes).expect("parse json");
    (status, content_type, v)
}

/// 全局错误统一为 RFC7807 ProblemDetails（application/problem+json）。
#[tokio::test]
async fn app_error_into_response_is_problem_details() {
    let (status, content_type, v) = problem_of(AppError::BadRequest("boundary 缺失".into())).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(content_type, "application/problem+json");
    assert_eq!(v["status"], 400);
    assert_eq!(v["code"], "BAD_REQUEST");
    assert_eq!(v["type"], "about:blank");
    assert!(v.get("title").is_some());
    assert!(v.get("detail").is_some());
    // 不在请求上下文中时不输出 requestId
    assert!(v.get("requestId").is_none());
}

#[tokio::test]
async fn classifier_failure_maps_to_bad_gateway() {
    let err: AppError = ClassifierError::Unavailable("model offline".into()).into();
    let (status, _, v) = problem_of(err).await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(v["code"], "CLASSIFIER_FAILED");
    assert!(
        v["detail"]
            .as_str()
            .unwrap_or("")
            .contains("model offline")
    );
}
