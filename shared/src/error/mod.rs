//! Unified error handling for the Mesa platform
//!
//! - [`ErrorCode`] - numeric error codes, categorized by range
//! - [`ErrorCategory`] - category derived from the code range
//! - [`AppError`] - application error (code + message + details)
//! - [`ApiResponse`] - unified API response envelope

pub mod category;
pub mod codes;
pub mod http;
pub mod types;

pub use category::ErrorCategory;
pub use codes::{ErrorCode, InvalidErrorCode};
pub use types::{ApiResponse, AppError, AppResult};
