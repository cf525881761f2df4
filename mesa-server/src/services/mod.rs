//! 服务模块
//!
//! - [`EventHub`] - 事件推送中心 (SSE 背后的 broadcast 通道)

pub mod events;

pub use events::EventHub;
