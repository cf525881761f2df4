//! Mesa Server - 多租户餐厅扫码点餐后端
//!
//! # 架构概述
//!
//! 本模块是 Mesa Server 的主入口，提供以下核心功能：
//!
//! - **二维码令牌门禁** (`api/qr` + `store/tokens`): 桌台令牌签发/校验/失效
//! - **桌台会话同步** (`sessions`): 同桌多设备共享购物车 (last-write-wins)
//! - **订单状态机** (`orders`): 角色视图限定的状态流转、并桌聚合、拆分支付
//! - **定价** (`pricing`): 菜品/分类折扣窗口解析
//! - **报表** (`reports`): 营收窗口、趋势、热销商品、小时直方图
//! - **事件推送** (`services/events` + `api/events`): SSE 订单事件流
//! - **认证** (`auth`): JWT + Argon2 员工认证
//!
//! # 模块结构
//!
//! ```text
//! mesa-server/src/
//! ├── core/          # 配置、状态、服务器、后台任务
//! ├── auth/          # JWT 认证、权限
//! ├── store/         # 嵌入式 redb 存储
//! ├── orders/        # 状态机、并桌聚合、拆分支付
//! ├── sessions/      # 桌台会话同步
//! ├── pricing/       # 折扣解析
//! ├── reports/       # 报表聚合
//! ├── notify/        # 通知邮箱
//! ├── services/      # 事件推送中心
//! ├── api/           # HTTP 路由和处理器
//! └── utils/         # 工具函数
//! ```

pub mod api;
pub mod auth;
pub mod core;
pub mod notify;
pub mod orders;
pub mod pricing;
pub mod reports;
pub mod services;
pub mod sessions;
pub mod store;
pub mod utils;

// Re-export 公共类型
pub use auth::{CurrentStaff, JwtService};
pub use core::{Config, Server, ServerState};
pub use services::EventHub;
pub use store::Store;

// Re-export unified error types from shared
pub use shared::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};

// Security logging macro - 支持 tracing 格式说明符
#[macro_export]
macro_rules! security_log {
    ($level:expr, $event:expr, $($key:ident = $value:expr),*) => {
        tracing::info!(
            target: "security",
            level = $level,
            event = $event,
            $($key = $value),*
        );
    };
}

/// 设置运行环境: dotenv + 日志
pub fn setup_environment() -> anyhow::Result<()> {
    // .env is optional
    let _ = dotenv::dotenv();

    let log_level = std::env::var("LOG_LEVEL").ok();
    let log_dir = std::env::var("LOG_DIR").ok();
    init_logger_with_file(log_level.as_deref(), log_dir.as_deref());

    Ok(())
}

pub fn print_banner() {
    println!(
        r#"
    __  ___
   /  |/  /__  _________ _
  / /|_/ / _ \/ ___/ __ `/
 / /  / /  __(__  ) /_/ /
/_/  /_/\___/____/\__,_/
    "#
    );
}
