use axum::{Router, extract::DefaultBodyLimit};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::config::AppConfig;
use crate::cors::build_cors_layer;
use crate::features::{health, scan};
use crate::openapi::ApiDoc;
use crate::request_id::request_id_middleware;
use crate::state::AppState;

/// 组装完整路由：业务路由、文档、上传上限、CORS 与 request-id 中间件。
///
/// 由 `main` 显式调用，测试也通过它拿到与线上一致的 Router。
pub fn build_router(config: &AppConfig, state: AppState) -> Router {
    // 默认不限制上传体积（axum 默认 2MB 上限会拒绝大图）
    let body_limit = match config.scan.max_upload_bytes {
        0 => DefaultBodyLimit::disable(),
        n => DefaultBodyLimit::max(n),
    };

    let mut app = Router::<AppState>::new()
        .merge(health::create_health_router::<AppState>())
        .merge(scan::create_scan_router().layer(body_limit))
        .with_state(state);

    if config.api.docs_enabled {
        app = app.merge(SwaggerUi::new("/docs").url("/openapi.json", ApiDoc::openapi()));
    }

    if let Some(cors) = build_cors_layer(&config.cors) {
        app = app.layer(cors);
    }

    app.layer(axum::middleware::from_fn(request_id_middleware))
}
