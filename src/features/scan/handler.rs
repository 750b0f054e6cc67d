use axum::{
    Router,
    extract::{Multipart, State, multipart::MultipartRejection},
    response::Json,
    routing::post,
};

use super::models::{ScanRequest, ScanResult};
use crate::error::AppError;
use crate::state::AppState;

/// 承载图片的 multipart 字段名
pub const IMAGE_FIELD: &str = "image";

/// multipart 上传表单（仅用于 OpenAPI 文档）
#[derive(utoipa::ToSchema)]
#[allow(dead_code)]
pub struct ScanUpload {
    /// 图片文件（任意字节序列均可，不做格式校验）
    #[schema(value_type = String, format = Binary)]
    image: Vec<u8>,
}

#[utoipa::path(
    post,
    path = "/api/scan",
    summary = "硬件图片识别（模拟）",
    description = "上传一张图片，固定等待约 2 秒模拟推理，然后按文件体积返回预置标签。任意字节内容都会被接受。",
    request_body(
        content = ScanUpload,
        content_type = "multipart/form-data",
        description = "表单字段 image 为图片文件"
    ),
    responses(
        (status = 200, description = "识别完成", body = ScanResult),
        (
            status = 400,
            description = "multipart 请求体损坏",
            body = crate::error::ProblemDetails,
            content_type = "application/problem+json"
        ),
        (
            status = 413,
            description = "超过配置的上传上限",
            body = crate::error::ProblemDetails,
            content_type = "application/problem+json"
        ),
        (
            status = 422,
            description = "缺少 image 字段或不是 multipart 请求",
            body = crate::error::ProblemDetails,
            content_type = "application/problem+json"
        ),
        (
            status = 502,
            description = "分类器不可用",
            body = crate::error::ProblemDetails,
            content_type = "application/problem+json"
        )
    ),
    tag = "Scan"
)]
pub async fn scan_hardware(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<ScanResult>, AppError> {
    let mut multipart = multipart.map_err(|rej| AppError::Validation(rej.body_text()))?;

    let upload = read_image_field(&mut multipart)
        .await?
        .ok_or_else(|| AppError::Validation(format!("缺少表单字段 {IMAGE_FIELD}")))?;

    let result = state.scanner.scan(upload).await?;
    Ok(Json(result))
}

/// 读取第一个 `image` 字段；其它字段直接跳过
async fn read_image_field(multipart: &mut Multipart) -> Result<Option<ScanRequest>, AppError> {
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(IMAGE_FIELD) {
            continue;
        }
        let filename = field.file_name().map(str::to_string);
        let bytes = field.bytes().await?;
        return Ok(Some(ScanRequest::new(bytes, filename)));
    }
    Ok(None)
}

pub fn create_scan_router() -> Router<AppState> {
    Router::new().route("/api/scan", post(scan_hardware))
}
