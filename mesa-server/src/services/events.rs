//! 事件推送中心
//!
//! 封装一个进程内 broadcast 通道，把订单/通知变更扇出给所有
//! SSE 订阅者。每个餐厅维护独立的单调递增版本号，客户端通过
//! 版本号间隙判断是否错过事件并触发全量刷新。

use dashmap::DashMap;
use shared::message::{FeedEvent, FeedEventKind};
use tokio::sync::broadcast;

/// Event broadcast channel capacity
///
/// 滞后的订阅者会丢事件 (broadcast lag)，由客户端全量刷新兜底。
const EVENT_CHANNEL_CAPACITY: usize = 4096;

/// 每餐厅事件版本管理器
///
/// 使用 DashMap 实现无锁并发的版本号管理，原子递增。
#[derive(Debug)]
struct FeedVersions {
    versions: DashMap<String, u64>,
}

impl FeedVersions {
    fn new() -> Self {
        Self {
            versions: DashMap::new(),
        }
    }

    /// 递增指定餐厅的版本号并返回新值
    fn increment(&self, restaurant_id: &str) -> u64 {
        let mut entry = self.versions.entry(restaurant_id.to_string()).or_insert(0);
        *entry += 1;
        *entry
    }

    /// 获取当前版本号，不存在返回 0
    fn get(&self, restaurant_id: &str) -> u64 {
        self.versions.get(restaurant_id).map(|v| *v).unwrap_or(0)
    }
}

/// 事件推送中心
#[derive(Clone, Debug)]
pub struct EventHub {
    tx: broadcast::Sender<FeedEvent>,
    versions: std::sync::Arc<FeedVersions>,
}

impl EventHub {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            tx,
            versions: std::sync::Arc::new(FeedVersions::new()),
        }
    }

    /// 订阅事件流 (每个 SSE 连接一个接收端)
    pub fn subscribe(&self) -> broadcast::Receiver<FeedEvent> {
        self.tx.subscribe()
    }

    /// 当前版本号 (连接握手时发给客户端作为基准)
    pub fn current_version(&self, restaurant_id: &str) -> u64 {
        self.versions.get(restaurant_id)
    }

    /// 发布事件
    ///
    /// 版本号自动递增。没有活跃订阅者时发送失败是正常情况。
    pub fn publish<T: serde::Serialize>(
        &self,
        kind: FeedEventKind,
        restaurant_id: &str,
        id: &str,
        data: Option<&T>,
    ) {
        let version = self.versions.increment(restaurant_id);
        let event = FeedEvent::new(
            kind,
            restaurant_id,
            id,
            version,
            data.and_then(|d| serde_json::to_value(d).ok()),
        );
        if self.tx.send(event).is_err() {
            tracing::trace!(kind = %kind, "No active event feed subscribers");
        }
    }
}

impl Default for EventHub {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_publish_increments_version_per_restaurant() {
        let hub = EventHub::new();
        let mut rx = hub.subscribe();

        hub.publish::<()>(FeedEventKind::NewOrder, "r1", "o1", None);
        hub.publish::<()>(FeedEventKind::OrderUpdated, "r1", "o1", None);
        hub.publish::<()>(FeedEventKind::NewOrder, "r2", "o9", None);

        let e1 = rx.recv().await.unwrap();
        let e2 = rx.recv().await.unwrap();
        let e3 = rx.recv().await.unwrap();
        assert_eq!(e1.version, 1);
        assert_eq!(e2.version, 2);
        // 不同餐厅版本互不影响
        assert_eq!(e3.version, 1);
        assert_eq!(hub.current_version("r1"), 2);
        assert_eq!(hub.current_version("r2"), 1);
    }

    #[tokio::test]
    async fn test_publish_without_subscribers_is_ok() {
        let hub = EventHub::new();
        hub.publish::<()>(FeedEventKind::OrderDeleted, "r1", "o1", None);
        assert_eq!(hub.current_version("r1"), 1);
    }
}
