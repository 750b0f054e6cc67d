// 生成 OpenAPI JSON（无需启动服务），便于客户端代码生成
// 用法：cargo run --bin dump_openapi > openapi.json

use ecoloop_scanner::openapi::ApiDoc;
use utoipa::OpenApi;

fn main() -> Result<(), serde_json::Error> {
    let json = serde_json::to_string_pretty(&ApiDoc::openapi())?;
    println!("{json}");
    Ok(())
}
