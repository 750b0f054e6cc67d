use axum::{Router, http::StatusCode, response::Json, routing::get};
use serde::Serialize;

/// 对外展示的服务名
pub const SERVICE_NAME: &str = "EcoLoop Hardware Scanner API";

/// 探活响应
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct HealthResponse {
    /// 服务状态
    #[schema(example = "ok")]
    pub status: String,
    /// 服务名称
    #[schema(example = "EcoLoop Hardware Scanner API")]
    pub service: String,
}

#[utoipa::path(
    get,
    path = "/",
    summary = "探活",
    description = "返回固定的服务状态与名称。",
    responses((status = 200, description = "服务正常", body = HealthResponse)),
    tag = "Health"
)]
pub async fn read_root() -> (StatusCode, Json<HealthResponse>) {
    (
        StatusCode::OK,
        Json(HealthResponse {
            status: "ok".to_string(),
            service: SERVICE_NAME.to_string(),
        }),
    )
}

pub fn create_health_router<S>() -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    Router::new().route("/", get(read_root))
}
