use std::sync::Arc;

use super::classifier::{Classifier, ClassifierError, MockClassifier};
use super::models::{ScanRequest, ScanResult};
use crate::config::ScanConfig;

/// 扫描服务：计算体积、记录日志、调用分类器并组装结果
#[derive(Clone)]
pub struct ScanService {
    classifier: Arc<dyn Classifier>,
}

impl ScanService {
    pub fn new(classifier: Arc<dyn Classifier>) -> Self {
        Self { classifier }
    }

    /// 按配置构建使用模拟分类器的服务
    pub fn from_config(cfg: &ScanConfig) -> Self {
        Self::new(Arc::new(MockClassifier::new(cfg.simulated_latency())))
    }

    /// 执行一次扫描
    pub async fn scan(&self, req: ScanRequest) -> Result<ScanResult, ClassifierError> {
        tracing::info!(
            "Received image: {}, Size: {:.2} KB",
            req.filename.as_deref().unwrap_or("<unnamed>"),
            req.size_kb()
        );

        let label = self.classifier.classify(&req.image).await?;
        tracing::debug!(label = %label, "扫描完成");

        Ok(ScanResult::new(req.filename, req.image.len(), label))
    }
}
