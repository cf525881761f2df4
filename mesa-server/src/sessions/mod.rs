//! 桌台会话同步
//!
//! 同一张桌子扫同一个二维码的所有设备加入同一个会话，共享一份
//! 购物车。会话键 = restaurant + table + token digest。购物车写入
//! 经过显式收敛策略 (默认 last-write-wins)；空闲客户端由后台任务
//! 周期性驱逐。
//!
//! 会话是纯内存状态 (DashMap) - 令牌失效或无人在线后即可丢弃，
//! 不需要持久化。

pub mod policy;

pub use policy::{ConvergencePolicy, LastWriteWins};

use dashmap::DashMap;
use shared::session::{CartLine, CartSnapshot, SessionView};
use shared::{AppError, AppResult, ErrorCode};
use std::collections::HashMap;
use std::time::Duration;

/// 单个桌台会话
#[derive(Debug, Clone)]
struct TableSession {
    /// client_id -> last_seen (Unix millis)
    clients: HashMap<String, i64>,
    cart: CartSnapshot,
}

impl TableSession {
    fn new() -> Self {
        Self {
            clients: HashMap::new(),
            cart: CartSnapshot::default(),
        }
    }

    fn view(&self, session_key: &str, client_id: &str) -> SessionView {
        SessionView {
            session_key: session_key.to_string(),
            client_id: client_id.to_string(),
            cart: self.cart.clone(),
            active_users_count: self.clients.len(),
        }
    }
}

/// 会话管理器
#[derive(Debug)]
pub struct SessionManager {
    sessions: DashMap<String, TableSession>,
    policy: Box<dyn ConvergencePolicy>,
    idle_timeout: Duration,
}

/// 会话键: `{restaurant_id}:{table_number}:{token_digest}`
pub fn session_key(restaurant_id: &str, table_number: i32, token_digest: &str) -> String {
    format!("{}:{}:{}", restaurant_id, table_number, token_digest)
}

impl SessionManager {
    pub fn new(idle_timeout: Duration) -> Self {
        Self::with_policy(idle_timeout, Box::new(LastWriteWins))
    }

    pub fn with_policy(idle_timeout: Duration, policy: Box<dyn ConvergencePolicy>) -> Self {
        Self {
            sessions: DashMap::new(),
            policy,
            idle_timeout,
        }
    }

    /// 加入会话 (不存在则创建)
    ///
    /// 携带已知 client_id 时重新加入，否则分配新的 uuid。
    /// 返回会话当前状态，包括共享购物车和在线人数。
    pub fn join(
        &self,
        restaurant_id: &str,
        table_number: i32,
        token_digest: &str,
        client_id: Option<String>,
        now: i64,
    ) -> SessionView {
        let key = session_key(restaurant_id, table_number, token_digest);
        let client_id = client_id.unwrap_or_else(|| uuid::Uuid::new_v4().to_string());

        let mut session = self.sessions.entry(key.clone()).or_insert_with(|| {
            tracing::debug!(session_key = %key, "Table session created");
            TableSession::new()
        });
        session.clients.insert(client_id.clone(), now);
        session.view(&key, &client_id)
    }

    /// 拉取会话状态 (2 秒轮询的 pull 端)
    ///
    /// 已知客户端顺带刷新 last_seen。
    pub fn get(&self, key: &str, client_id: &str, now: i64) -> AppResult<SessionView> {
        let mut session = self
            .sessions
            .get_mut(key)
            .ok_or_else(|| AppError::new(ErrorCode::SessionNotFound))?;
        if let Some(last_seen) = session.clients.get_mut(client_id) {
            *last_seen = now;
        }
        Ok(session.view(key, client_id))
    }

    /// 整车写入 (500ms 防抖后的 push 端)
    ///
    /// 写入经收敛策略落盘；未知客户端被拒绝。
    pub fn update_cart(
        &self,
        key: &str,
        client_id: &str,
        lines: Vec<CartLine>,
        now: i64,
    ) -> AppResult<CartSnapshot> {
        let mut session = self
            .sessions
            .get_mut(key)
            .ok_or_else(|| AppError::new(ErrorCode::SessionNotFound))?;
        if !session.clients.contains_key(client_id) {
            return Err(AppError::new(ErrorCode::ClientNotInSession));
        }
        session.clients.insert(client_id.to_string(), now);
        session.cart = self.policy.merge(&session.cart, lines, now);
        Ok(session.cart.clone())
    }

    /// 离开会话；最后一个客户端离开时丢弃会话
    pub fn leave(&self, key: &str, client_id: &str) -> bool {
        let mut drop_session = false;
        let removed = match self.sessions.get_mut(key) {
            Some(mut session) => {
                let removed = session.clients.remove(client_id).is_some();
                drop_session = session.clients.is_empty();
                removed
            }
            None => false,
        };
        if drop_session {
            self.sessions.remove(key);
            tracing::debug!(session_key = %key, "Table session dropped (empty)");
        }
        removed
    }

    /// 清空购物车 (下单完成后)
    pub fn clear_cart(&self, key: &str, now: i64) {
        if let Some(mut session) = self.sessions.get_mut(key) {
            session.cart = self.policy.merge(&session.cart, Vec::new(), now);
        }
    }

    /// 丢弃某令牌的所有会话 (令牌失效 = 就餐结束)
    pub fn drop_for_token(&self, token_digest: &str) -> usize {
        let suffix = format!(":{}", token_digest);
        let keys: Vec<String> = self
            .sessions
            .iter()
            .filter(|entry| entry.key().ends_with(&suffix))
            .map(|entry| entry.key().clone())
            .collect();
        let count = keys.len();
        for key in keys {
            self.sessions.remove(&key);
        }
        count
    }

    /// 驱逐空闲客户端并回收空会话；返回回收的会话数
    pub fn reap_idle(&self) -> usize {
        let now = crate::utils::now_millis();
        let cutoff = now - self.idle_timeout.as_millis() as i64;

        let mut empty_keys = Vec::new();
        for mut entry in self.sessions.iter_mut() {
            entry.clients.retain(|_, last_seen| *last_seen >= cutoff);
            if entry.clients.is_empty() {
                empty_keys.push(entry.key().clone());
            }
        }
        let count = empty_keys.len();
        for key in empty_keys {
            self.sessions.remove(&key);
        }
        count
    }

    /// 当前会话数
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn manager() -> SessionManager {
        SessionManager::new(Duration::from_secs(120))
    }

    fn line(id: &str, qty: i32) -> CartLine {
        CartLine {
            item_id: id.to_string(),
            name: format!("Item {}", id),
            price: 3.0,
            quantity: qty,
            note: None,
        }
    }

    #[test]
    fn test_join_and_rejoin() {
        let mgr = manager();
        let view = mgr.join("r1", 5, "digest", None, 100);
        assert_eq!(view.active_users_count, 1);

        // rejoin with the same client id does not add a second user
        let again = mgr.join("r1", 5, "digest", Some(view.client_id.clone()), 200);
        assert_eq!(again.active_users_count, 1);
        assert_eq!(again.client_id, view.client_id);

        // a second device joins fresh
        let second = mgr.join("r1", 5, "digest", None, 300);
        assert_eq!(second.active_users_count, 2);
    }

    #[test]
    fn test_last_write_wins_convergence() {
        let mgr = manager();
        let a = mgr.join("r1", 5, "digest", None, 100);
        let b = mgr.join("r1", 5, "digest", None, 100);
        let key = a.session_key.clone();

        // client A pushes cart A, then client B pushes cart B
        mgr.update_cart(&key, &a.client_id, vec![line("a", 1)], 200)
            .unwrap();
        mgr.update_cart(&key, &b.client_id, vec![line("b", 2)], 300)
            .unwrap();

        // any subsequent pull returns B, not a merge
        let pulled = mgr.get(&key, &a.client_id, 400).unwrap();
        assert_eq!(pulled.cart.lines, vec![line("b", 2)]);
        assert_eq!(pulled.cart.version, 2);
    }

    #[test]
    fn test_unknown_client_rejected() {
        let mgr = manager();
        let view = mgr.join("r1", 5, "digest", None, 100);
        let err = mgr
            .update_cart(&view.session_key, "stranger", vec![line("a", 1)], 200)
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::ClientNotInSession);
    }

    #[test]
    fn test_leave_drops_empty_session() {
        let mgr = manager();
        let view = mgr.join("r1", 5, "digest", None, 100);
        assert_eq!(mgr.len(), 1);
        assert!(mgr.leave(&view.session_key, &view.client_id));
        assert!(mgr.is_empty());
        assert!(mgr.get(&view.session_key, &view.client_id, 200).is_err());
    }

    #[test]
    fn test_reap_idle_clients() {
        let mgr = SessionManager::new(Duration::from_millis(0));
        let view = mgr.join("r1", 5, "digest", None, 0);
        // last_seen = 0 is far behind now -> reaped
        let reaped = mgr.reap_idle();
        assert_eq!(reaped, 1);
        assert!(mgr.is_empty());
        let _ = view;
    }

    #[test]
    fn test_drop_for_token() {
        let mgr = manager();
        mgr.join("r1", 5, "digest-a", None, 100);
        mgr.join("r1", 6, "digest-a", None, 100);
        mgr.join("r1", 7, "digest-b", None, 100);

        assert_eq!(mgr.drop_for_token("digest-a"), 2);
        assert_eq!(mgr.len(), 1);
    }

    #[test]
    fn test_clear_cart_bumps_version() {
        let mgr = manager();
        let view = mgr.join("r1", 5, "digest", None, 100);
        mgr.update_cart(&view.session_key, &view.client_id, vec![line("a", 1)], 200)
            .unwrap();
        mgr.clear_cart(&view.session_key, 300);
        let pulled = mgr.get(&view.session_key, &view.client_id, 400).unwrap();
        assert!(pulled.cart.lines.is_empty());
        assert_eq!(pulled.cart.version, 2);
    }
}
