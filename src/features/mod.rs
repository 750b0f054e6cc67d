/// 探活
pub mod health;
/// 硬件图片识别（模拟推理）
pub mod scan;
