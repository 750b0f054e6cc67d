use std::sync::Arc;

use crate::config::AppConfig;
use crate::features::scan::ScanService;

/// 聚合的应用共享状态（只读，无跨请求可变数据）
#[derive(Clone)]
pub struct AppState {
    pub scanner: Arc<ScanService>,
}

impl AppState {
    pub fn new(scanner: ScanService) -> Self {
        Self {
            scanner: Arc::new(scanner),
        }
    }

    /// 按配置构建（使用模拟分类器）
    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(ScanService::from_config(&config.scan))
    }
}
