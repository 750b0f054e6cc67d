use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::features::health::handler::read_root,
        crate::features::scan::handler::scan_hardware,
    ),
    components(schemas(
        crate::features::health::handler::HealthResponse,
        crate::features::scan::models::ScanResult,
        crate::features::scan::handler::ScanUpload,
        crate::error::ProblemDetails,
    )),
    tags(
        (name = "Scan", description = "硬件识别：上传图片并返回（模拟的）识别标签。"),
        (name = "Health", description = "健康检查：服务探活。"),
    ),
    info(
        title = "EcoLoop Hardware Scanner API",
        version = env!("CARGO_PKG_VERSION"),
        description = "硬件回收识别服务（Axum + utoipa）。当前识别结果由模拟分类器给出，不涉及真实模型推理。"
    )
)]
pub struct ApiDoc;
