use std::sync::Arc;
use std::time::Duration;

use crate::core::{BackgroundTasks, Config, TaskKind};
use crate::notify::Mailbox;
use crate::services::EventHub;
use crate::sessions::SessionManager;
use crate::store::Store;
use crate::auth::JwtService;

/// 服务器状态 - 持有所有服务的单例引用
///
/// ServerState 是服务的核心数据结构，持有所有服务的共享引用。
/// 使用 Arc 实现浅拷贝，所有权成本极低。
///
/// # 服务组件
///
/// | 字段 | 类型 | 说明 |
/// |------|------|------|
/// | config | Config | 配置项 (不可变) |
/// | store | Store | 嵌入式数据库 (redb) |
/// | sessions | Arc<SessionManager> | 桌台会话管理 |
/// | mailbox | Arc<Mailbox> | 通知邮箱 |
/// | events | EventHub | 事件推送中心 (SSE) |
/// | jwt_service | Arc<JwtService> | JWT 认证服务 |
#[derive(Clone)]
pub struct ServerState {
    /// 服务器配置
    pub config: Config,
    /// 嵌入式数据库 (redb)
    pub store: Store,
    /// 桌台会话管理器
    pub sessions: Arc<SessionManager>,
    /// 通知邮箱
    pub mailbox: Arc<Mailbox>,
    /// 事件推送中心
    pub events: EventHub,
    /// JWT 认证服务 (Arc 共享所有权)
    pub jwt_service: Arc<JwtService>,
}

impl std::fmt::Debug for ServerState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServerState")
            .field("environment", &self.config.environment)
            .field("http_port", &self.config.http_port)
            .finish()
    }
}

impl ServerState {
    /// 初始化服务器状态
    ///
    /// 按顺序初始化：
    /// 1. 工作目录结构 (确保目录存在)
    /// 2. 数据库 (work_dir/database/mesa.redb)
    /// 3. 各服务 (Sessions, Mailbox, EventHub, JWT)
    ///
    /// # Panics
    ///
    /// 数据库初始化失败时 panic
    pub async fn initialize(config: &Config) -> Self {
        config
            .ensure_work_dir_structure()
            .expect("Failed to create work directory structure");

        let db_path = config.database_dir().join("mesa.redb");
        let store = Store::open(&db_path).expect("Failed to initialize database");

        // 开发模式首启填充演示数据
        if config.is_development()
            && let Err(e) = store.seed_dev_data()
        {
            tracing::error!(error = %e, "Failed to seed dev data");
        }

        Self::with_store(config.clone(), store)
    }

    /// 使用现有存储构造状态 (测试场景)
    pub fn with_store(config: Config, store: Store) -> Self {
        let sessions = Arc::new(SessionManager::new(Duration::from_secs(
            config.session_idle_secs,
        )));
        let mailbox = Arc::new(Mailbox::new());
        let events = EventHub::new();
        let jwt_service = Arc::new(JwtService::with_config(config.jwt.clone()));

        Self {
            config,
            store,
            sessions,
            mailbox,
            events,
            jwt_service,
        }
    }

    /// 启动后台任务
    ///
    /// 必须在 `Server::run()` 之前调用
    ///
    /// 启动的任务：
    /// - 会话清理器 (空闲客户端驱逐 / 空会话回收)
    /// - 过期令牌清理器
    pub fn start_background_tasks(&self) -> BackgroundTasks {
        let mut tasks = BackgroundTasks::new();
        let shutdown = tasks.shutdown_token();

        // 会话清理器
        let sessions = self.sessions.clone();
        let reap_interval = Duration::from_secs(self.config.session_reap_interval_secs);
        let token = shutdown.clone();
        tasks.spawn("session_reaper", TaskKind::Periodic, async move {
            let mut ticker = tokio::time::interval(reap_interval);
            loop {
                tokio::select! {
                    _ = token.cancelled() => break,
                    _ = ticker.tick() => {
                        let removed = sessions.reap_idle();
                        if removed > 0 {
                            tracing::debug!(removed, "Reaped idle table sessions");
                        }
                    }
                }
            }
        });

        // 过期令牌清理器
        let store = self.store.clone();
        let sweep_interval = Duration::from_secs(self.config.token_sweep_interval_secs);
        let token = shutdown.clone();
        tasks.spawn("token_sweeper", TaskKind::Periodic, async move {
            let mut ticker = tokio::time::interval(sweep_interval);
            loop {
                tokio::select! {
                    _ = token.cancelled() => break,
                    _ = ticker.tick() => {
                        let now = chrono::Utc::now().timestamp_millis();
                        match store.deactivate_expired_tokens(now) {
                            Ok(n) if n > 0 => {
                                tracing::info!(deactivated = n, "Deactivated expired QR tokens");
                            }
                            Ok(_) => {}
                            Err(e) => {
                                tracing::error!(error = %e, "Token sweep failed");
                            }
                        }
                    }
                }
            }
        });

        tasks.log_summary();
        tasks
    }

    /// 获取 JWT 服务
    pub fn get_jwt_service(&self) -> Arc<JwtService> {
        self.jwt_service.clone()
    }

    /// 投递一条面板通知并同时推送到事件流
    ///
    /// 邮箱保证 at-least-once 轮询投递，事件流负责实时性。
    pub fn notify(
        &self,
        restaurant_id: &str,
        audience: shared::models::NotificationAudience,
        kind: shared::models::NotificationKind,
        table_number: i32,
        body: Option<serde_json::Value>,
    ) {
        let notification = self
            .mailbox
            .push(restaurant_id, audience, kind, table_number, body);
        self.events.publish(
            shared::message::FeedEventKind::Notification,
            restaurant_id,
            &notification.id,
            Some(&notification),
        );
    }
}
