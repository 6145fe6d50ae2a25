//! 变更通知订阅管理
//!
//! 控制器通过 [`EventHub`] 向订阅者推送属性变更事件
//!
//! ## 设计要点
//! - 每个订阅者持有一个无界通道的接收端，发送永不阻塞
//! - `unsubscribe` 显式退订；接收端被丢弃的订阅者在下一次发布时自动清理

use dashmap::DashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::mpsc;
use tracing::debug;

/// 订阅 ID
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

/// 事件接收端
pub type EventReceiver<E> = mpsc::UnboundedReceiver<E>;

/// 订阅者注册表
#[derive(Debug)]
pub struct EventHub<E> {
    subscribers: DashMap<SubscriptionId, mpsc::UnboundedSender<E>>,
    next_id: AtomicU64,
}

impl<E: Clone> EventHub<E> {
    pub fn new() -> Self {
        Self {
            subscribers: DashMap::new(),
            next_id: AtomicU64::new(1),
        }
    }

    /// 新增订阅
    pub fn subscribe(&self) -> (SubscriptionId, EventReceiver<E>) {
        let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::SeqCst));
        let (tx, rx) = mpsc::unbounded_channel();
        self.subscribers.insert(id, tx);
        debug!("新增订阅: {:?}", id);
        (id, rx)
    }

    /// 取消订阅，返回订阅是否存在
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let removed = self.subscribers.remove(&id).is_some();
        if removed {
            debug!("取消订阅: {:?}", id);
        }
        removed
    }

    /// 当前订阅者数量
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }

    /// 向所有订阅者发布事件
    pub fn publish(&self, event: E) {
        self.subscribers
            .retain(|_, sender| sender.send(event.clone()).is_ok());
    }
}

impl<E: Clone> Default for EventHub<E> {
    fn default() -> Self {
        Self::new()
    }
}
