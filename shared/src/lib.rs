//! Shared types for the Mesa ordering platform
//!
//! Common types used across crates: data models, unified error
//! codes/responses, event-feed payloads and table-session types.

pub mod error;
pub mod message;
pub mod models;
pub mod session;

// Re-exports
pub use axum::{Json, body};
pub use http;
pub use serde::{Deserialize, Serialize};

// Error re-exports (for convenient access)
pub use error::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};

// Event feed re-exports
pub use message::{FeedEvent, FeedEventKind};
