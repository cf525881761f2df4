use std::path::PathBuf;

use crate::auth::JwtConfig;

/// 服务器配置 - 所有配置项
///
/// # 环境变量
///
/// 所有配置项都可以通过环境变量覆盖：
///
/// | 环境变量 | 默认值 | 说明 |
/// |----------|--------|------|
/// | WORK_DIR | /var/lib/mesa | 工作目录 |
/// | HTTP_PORT | 3000 | HTTP 服务端口 |
/// | TIMEZONE | Europe/Madrid | 默认业务时区 |
/// | QR_TOKEN_TTL_MINUTES | 180 | 二维码令牌有效期(分钟) |
/// | SESSION_IDLE_SECS | 120 | 会话客户端空闲驱逐阈值(秒) |
/// | SESSION_REAP_INTERVAL_SECS | 30 | 会话清理周期(秒) |
/// | TOKEN_SWEEP_INTERVAL_SECS | 60 | 过期令牌清理周期(秒) |
/// | ENVIRONMENT | development | 运行环境 |
///
/// # 示例
///
/// ```ignore
/// WORK_DIR=/data/mesa HTTP_PORT=8080 cargo run
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// 工作目录，存储数据库、日志等文件
    pub work_dir: String,
    /// HTTP API 服务端口
    pub http_port: u16,
    /// JWT 认证配置
    pub jwt: JwtConfig,
    /// 运行环境: development | staging | production
    pub environment: String,
    /// 默认业务时区 (餐厅未配置时区时使用)
    pub timezone: chrono_tz::Tz,
    /// 二维码令牌有效期 (分钟)
    pub qr_token_ttl_minutes: i64,
    /// 会话客户端空闲驱逐阈值 (秒)
    pub session_idle_secs: u64,
    /// 会话清理周期 (秒)
    pub session_reap_interval_secs: u64,
    /// 过期令牌清理周期 (秒)
    pub token_sweep_interval_secs: u64,
}

impl Config {
    /// 从环境变量加载配置
    ///
    /// 如果环境变量未设置，使用默认值
    pub fn from_env() -> Self {
        Self {
            work_dir: std::env::var("WORK_DIR").unwrap_or_else(|_| "/var/lib/mesa".into()),
            http_port: std::env::var("HTTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(3000),
            jwt: JwtConfig::default(),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into()),
            timezone: std::env::var("TIMEZONE")
                .ok()
                .and_then(|t| t.parse().ok())
                .unwrap_or(chrono_tz::Europe::Madrid),
            qr_token_ttl_minutes: std::env::var("QR_TOKEN_TTL_MINUTES")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(180),
            session_idle_secs: std::env::var("SESSION_IDLE_SECS")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(120),
            session_reap_interval_secs: std::env::var("SESSION_REAP_INTERVAL_SECS")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(30),
            token_sweep_interval_secs: std::env::var("TOKEN_SWEEP_INTERVAL_SECS")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(60),
        }
    }

    /// 使用自定义值覆盖部分配置
    ///
    /// 常用于测试场景
    pub fn with_overrides(work_dir: impl Into<String>, http_port: u16) -> Self {
        let mut config = Self::from_env();
        config.work_dir = work_dir.into();
        config.http_port = http_port;
        config
    }

    /// 数据库目录 (work_dir/database)
    pub fn database_dir(&self) -> PathBuf {
        PathBuf::from(&self.work_dir).join("database")
    }

    /// 日志目录 (work_dir/logs)
    pub fn log_dir(&self) -> PathBuf {
        PathBuf::from(&self.work_dir).join("logs")
    }

    /// 确保工作目录结构存在
    pub fn ensure_work_dir_structure(&self) -> std::io::Result<()> {
        std::fs::create_dir_all(self.database_dir())?;
        std::fs::create_dir_all(self.log_dir())?;
        Ok(())
    }

    /// 是否生产环境
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// 是否开发环境
    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}
