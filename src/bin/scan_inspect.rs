//! 本地诊断工具：不启动 HTTP 服务，直接对本地文件执行一次扫描并输出结果。

use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use ecoloop_scanner::features::scan::{MockClassifier, ScanRequest, ScanResult, ScanService};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OutputFormat {
    Json,
    Text,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 最小日志：仅在需要调试时启用（例如 RUST_LOG=info）。
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();

    let args = Args::parse(std::env::args().skip(1).collect());
    if args.help {
        print_help();
        return Ok(());
    }
    let Some(path) = args.path else {
        print_help();
        return Err("缺少文件路径".into());
    };

    let bytes = fs::read(&path)?;
    let filename = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned());

    let service = ScanService::new(std::sync::Arc::new(MockClassifier::new(
        Duration::from_millis(args.latency_ms),
    )));
    let result = service.scan(ScanRequest::new(bytes, filename)).await?;

    let output = match args.format {
        OutputFormat::Json => serde_json::to_string_pretty(&result)?,
        OutputFormat::Text => render_text(&result),
    };
    println!("{output}");

    Ok(())
}

fn render_text(result: &ScanResult) -> String {
    format!(
        "filename: {}\nsize_kb: {:.2}\nresult: {}\n",
        result.filename.as_deref().unwrap_or("-"),
        result.size_kb,
        result.result
    )
}

#[derive(Debug, Clone)]
struct Args {
    help: bool,
    format: OutputFormat,
    latency_ms: u64,
    path: Option<PathBuf>,
}

impl Args {
    fn parse(argv: Vec<String>) -> Self {
        let mut args = Self {
            help: false,
            format: OutputFormat::Text,
            // 离线诊断默认不等待
            latency_ms: 0,
            path: None,
        };

        let mut it = argv.into_iter();
        while let Some(a) = it.next() {
            match a.as_str() {
                "-h" | "--help" => args.help = true,
                "--format" => {
                    let v = it.next().unwrap_or_else(|| "text".to_string());
                    args.format = match v.as_str() {
                        "json" => OutputFormat::Json,
                        _ => OutputFormat::Text,
                    };
                }
                "--latency-ms" => {
                    if let Some(v) = it.next() {
                        args.latency_ms = v.parse().unwrap_or(0);
                    }
                }
                other if !other.starts_with("--") && args.path.is_none() => {
                    args.path = Some(PathBuf::from(other));
                }
                _ => {}
            }
        }
        args
    }
}

fn print_help() {
    println!(
        r#"scan_inspect（本地诊断工具）

用法：
  cargo run --bin scan_inspect -- ./fan.jpg --format json

常用参数：
  --format text|json    输出格式（默认 text）
  --latency-ms N        模拟推理耗时（毫秒，默认 0）
"#
    );
}
