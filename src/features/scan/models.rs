use axum::body::Bytes;
use serde::Serialize;

/// 一次扫描的输入：上传文件的原始字节与可选文件名
///
/// 字节以 `Bytes` 持有，multipart 读出的缓冲区直接移交，不做复制。
#[derive(Debug, Clone)]
pub struct ScanRequest {
    pub image: Bytes,
    pub filename: Option<String>,
}

impl ScanRequest {
    pub fn new(image: impl Into<Bytes>, filename: Option<String>) -> Self {
        Self {
            image: image.into(),
            filename,
        }
    }

    /// 文件体积（KiB，未取整）
    pub fn size_kb(&self) -> f64 {
        size_kb(self.image.len())
    }
}

/// 字节数换算为 KiB（未取整）
pub fn size_kb(len: usize) -> f64 {
    len as f64 / 1024.0
}

/// 保留两位小数，恰好落在 .5 时取偶（与 Python `round(x, 2)` 一致）
///
/// `len / 1024 * 100` 在常规上传体积下是精确的，因此不会出现二进制误差导致的错位。
pub fn round_2dp(value: f64) -> f64 {
    (value * 100.0).round_ties_even() / 100.0
}

/// 模拟识别标签（含置信度展示文本）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Label {
    StepperMotor,
    BrokenPcFan,
    LithiumBattery,
    CopperWire,
}

impl Label {
    /// 全部标签（顺序固定）
    pub const ALL: [Label; 4] = [
        Label::StepperMotor,
        Label::BrokenPcFan,
        Label::LithiumBattery,
        Label::CopperWire,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Label::StepperMotor => "IDENTIFIED: STEPPER MOTOR [98.4%]",
            Label::BrokenPcFan => "IDENTIFIED: BROKEN PC FAN [95.1%]",
            Label::LithiumBattery => "IDENTIFIED: LITHIUM BATTERY [92.3%]",
            Label::CopperWire => "IDENTIFIED: COPPER WIRE [99.1%]",
        }
    }
}

impl std::fmt::Display for Label {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 扫描结果
#[derive(Debug, Clone, PartialEq, Serialize, utoipa::ToSchema)]
#[schema(example = json!({
  "success": true,
  "filename": "fan.jpg",
  "size_kb": 1.0,
  "result": "IDENTIFIED: BROKEN PC FAN [95.1%]"
}))]
pub struct ScanResult {
    /// 恒为 true
    pub success: bool,
    /// 原样回显上传文件名（multipart 未携带文件名时为 null）
    pub filename: Option<String>,
    /// 文件体积（KiB，两位小数）
    pub size_kb: f64,
    /// 识别标签
    pub result: String,
}

impl ScanResult {
    pub fn new(filename: Option<String>, byte_len: usize, label: Label) -> Self {
        Self {
            success: true,
            filename,
            size_kb: round_2dp(size_kb(byte_len)),
            result: label.as_str().to_string(),
        }
    }
}
