//! 通知邮箱
//!
//! 面板通知的显式投递信箱：消息按 (餐厅, 面板受众) 维护，轮询端
//! 每次取回全部未确认消息 (at-least-once)，确认后出箱。替代共享
//! 浏览器存储那类隐式队列 - 投递状态在这里是一等公民。

use dashmap::DashMap;
use shared::models::{Notification, NotificationAudience, NotificationKind};

/// 每家餐厅在箱消息上限，超出丢弃最旧的
const MAILBOX_CAP: usize = 500;

/// 通知邮箱
#[derive(Debug, Default)]
pub struct Mailbox {
    /// restaurant_id -> 按入箱顺序的消息
    messages: DashMap<String, Vec<Notification>>,
}

impl Mailbox {
    pub fn new() -> Self {
        Self::default()
    }

    /// 入箱一条通知并返回它
    pub fn push(
        &self,
        restaurant_id: &str,
        audience: NotificationAudience,
        kind: NotificationKind,
        table_number: i32,
        body: Option<serde_json::Value>,
    ) -> Notification {
        let notification = Notification {
            id: uuid::Uuid::new_v4().to_string(),
            restaurant_id: restaurant_id.to_string(),
            audience,
            kind,
            table_number,
            body,
            created_at: crate::utils::now_millis(),
            acknowledged: false,
        };

        let mut inbox = self.messages.entry(restaurant_id.to_string()).or_default();
        inbox.push(notification.clone());
        if inbox.len() > MAILBOX_CAP {
            let overflow = inbox.len() - MAILBOX_CAP;
            inbox.drain(0..overflow);
        }
        notification
    }

    /// 未确认消息 (入箱顺序)
    ///
    /// 不出箱 - 未确认的消息每次轮询都会重新投递。
    pub fn pending(
        &self,
        restaurant_id: &str,
        audience: NotificationAudience,
    ) -> Vec<Notification> {
        self.messages
            .get(restaurant_id)
            .map(|inbox| {
                inbox
                    .iter()
                    .filter(|n| n.audience == audience && !n.acknowledged)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default()
    }

    /// 确认一条消息，出箱；返回是否存在
    pub fn ack(&self, restaurant_id: &str, notification_id: &str) -> bool {
        match self.messages.get_mut(restaurant_id) {
            Some(mut inbox) => {
                let before = inbox.len();
                inbox.retain(|n| n.id != notification_id);
                inbox.len() < before
            }
            None => false,
        }
    }

    /// 在箱消息总数 (含已投递未确认)
    pub fn len(&self, restaurant_id: &str) -> usize {
        self.messages
            .get(restaurant_id)
            .map(|inbox| inbox.len())
            .unwrap_or(0)
    }

    pub fn is_empty(&self, restaurant_id: &str) -> bool {
        self.len(restaurant_id) == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_and_pending_by_audience() {
        let mailbox = Mailbox::new();
        mailbox.push(
            "r1",
            NotificationAudience::Cashier,
            NotificationKind::BillRequest,
            5,
            None,
        );
        mailbox.push(
            "r1",
            NotificationAudience::Kitchen,
            NotificationKind::NewOrder,
            5,
            None,
        );

        let cashier = mailbox.pending("r1", NotificationAudience::Cashier);
        assert_eq!(cashier.len(), 1);
        assert_eq!(cashier[0].kind, NotificationKind::BillRequest);
        assert_eq!(mailbox.pending("r2", NotificationAudience::Cashier).len(), 0);
    }

    #[test]
    fn test_redelivery_until_ack() {
        let mailbox = Mailbox::new();
        let n = mailbox.push(
            "r1",
            NotificationAudience::Cashier,
            NotificationKind::PaymentCompleted,
            3,
            None,
        );

        // two polls both see the message (at-least-once)
        assert_eq!(mailbox.pending("r1", NotificationAudience::Cashier).len(), 1);
        assert_eq!(mailbox.pending("r1", NotificationAudience::Cashier).len(), 1);

        assert!(mailbox.ack("r1", &n.id));
        assert!(mailbox.pending("r1", NotificationAudience::Cashier).is_empty());
        // double-ack reports missing
        assert!(!mailbox.ack("r1", &n.id));
    }

    #[test]
    fn test_mailbox_cap_drops_oldest() {
        let mailbox = Mailbox::new();
        for i in 0..(MAILBOX_CAP + 10) {
            mailbox.push(
                "r1",
                NotificationAudience::Kitchen,
                NotificationKind::NewOrder,
                i as i32,
                None,
            );
        }
        assert_eq!(mailbox.len("r1"), MAILBOX_CAP);
        let pending = mailbox.pending("r1", NotificationAudience::Kitchen);
        // oldest 10 were dropped
        assert_eq!(pending.first().unwrap().table_number, 10);
    }
}
