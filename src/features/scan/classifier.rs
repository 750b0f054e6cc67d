use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

use super::models::{Label, size_kb};

/// 分类器错误（为接入真实推理服务预留；模拟分类器不会返回错误）
#[derive(Error, Debug)]
pub enum ClassifierError {
    /// 推理后端不可用
    #[error("推理服务不可用: {0}")]
    Unavailable(String),
    /// 推理后端返回了无法识别的结果
    #[error("无效的推理结果: {0}")]
    InvalidOutput(String),
}

/// 图片分类能力：输入图片字节，输出识别标签。
///
/// HTTP 层只依赖该 trait，替换为真实模型时无需改动路由与响应结构。
#[async_trait]
pub trait Classifier: Send + Sync {
    async fn classify(&self, image: &[u8]) -> Result<Label, ClassifierError>;
}

/// 模拟分类器：固定等待一段时间后按文件体积奇偶挑选标签。
#[derive(Debug, Clone)]
pub struct MockClassifier {
    latency: Duration,
}

impl MockClassifier {
    pub fn new(latency: Duration) -> Self {
        Self { latency }
    }

    pub fn latency(&self) -> Duration {
        self.latency
    }

    /// 标签选择规则：`size_kb % 2 > 1` 时为步进电机，否则为损坏风扇。
    ///
    /// 整数 KiB 的余数只会是 0 或 1，因此步进电机只会出现在非整数 KiB 的文件上。
    /// 锂电池与铜线两个标签不会被选中。
    pub fn pick_label(byte_len: usize) -> Label {
        let remainder = size_kb(byte_len) % 2.0;
        if remainder > 1.0 {
            Label::StepperMotor
        } else {
            Label::BrokenPcFan
        }
    }
}

impl Default for MockClassifier {
    fn default() -> Self {
        Self::new(Duration::from_secs(2))
    }
}

#[async_trait]
impl Classifier for MockClassifier {
    async fn classify(&self, image: &[u8]) -> Result<Label, ClassifierError> {
        // 只挂起当前请求所在任务，不阻塞运行时
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        Ok(Self::pick_label(image.len()))
    }
}
