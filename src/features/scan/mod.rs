/// 分类能力抽象与模拟实现
pub mod classifier;
pub mod handler;
pub mod models;
mod service;

pub use classifier::{Classifier, ClassifierError, MockClassifier};
pub use handler::create_scan_router;
pub use models::{Label, ScanRequest, ScanResult};
pub use service::ScanService;
