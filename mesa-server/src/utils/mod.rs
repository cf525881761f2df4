//! 工具模块 - 通用工具函数和类型
//!
//! # 内容
//!
//! - [`AppError`] - 应用错误类型 (from shared::error)
//! - [`ApiResponse`] - API 响应结构 (from shared::error)
//! - 日志、时间等工具

pub mod logger;
pub mod time;
pub mod token;

// Re-export error types from shared
pub use shared::error::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};

/// 当前 Unix 时间戳 (毫秒)
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}
