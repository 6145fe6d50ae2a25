//! 建议搜索控制器
//!
//! 每次输入变化发起一次异步查询，只有最新一次查询的结果会被发布。
//! 查询序号和发布都在同一把锁内完成，保证过期回调不会覆盖新结果。

use std::sync::Arc;

use parking_lot::Mutex;
use tokio::runtime::Handle;
use tracing::{debug, warn};

use super::events::{SearchState, SuggestionEvent};
use super::source::SuggestionSource;
use crate::config::SuggestionConfig;
use crate::events::{EventHub, EventReceiver, SubscriptionId};

struct Inner {
    source: Option<Arc<dyn SuggestionSource>>,
    query: String,
    items: Option<Vec<String>>,
    state: SearchState,
    /// 最近一次发起的查询序号
    latest_seq: u64,
}

/// 建议搜索控制器
///
/// 克隆得到的实例共享同一份状态
#[derive(Clone)]
pub struct SuggestionController {
    inner: Arc<Mutex<Inner>>,
    events: Arc<EventHub<SuggestionEvent>>,
    /// 发布前截断的最大候选数，0 表示不限制
    max_results: usize,
    runtime: Option<Handle>,
}

impl SuggestionController {
    pub fn new() -> Self {
        Self::from_config(&SuggestionConfig {
            max_results: 0,
            ..Default::default()
        })
    }

    pub fn from_config(config: &SuggestionConfig) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Inner {
                source: None,
                query: String::new(),
                items: None,
                state: SearchState::Idle,
                latest_seq: 0,
            })),
            events: Arc::new(EventHub::new()),
            max_results: config.max_results,
            runtime: Handle::try_current().ok(),
        }
    }

    pub fn subscribe(&self) -> (SubscriptionId, EventReceiver<SuggestionEvent>) {
        self.events.subscribe()
    }

    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.events.unsubscribe(id)
    }

    /// 替换建议来源，不取消进行中的查询
    pub fn set_source(&self, source: Option<Arc<dyn SuggestionSource>>) {
        self.inner.lock().source = source;
    }

    pub fn has_source(&self) -> bool {
        self.inner.lock().source.is_some()
    }

    pub fn query(&self) -> String {
        self.inner.lock().query.clone()
    }

    pub fn items(&self) -> Option<Vec<String>> {
        self.inner.lock().items.clone()
    }

    pub fn state(&self) -> SearchState {
        self.inner.lock().state
    }

    /// 发起查询，立即返回本次查询的序号
    ///
    /// 结果稍后通过 [`SuggestionEvent::ItemsChanged`] 发布；
    /// 在结果返回前又发起了新查询时，本次结果被丢弃。
    pub fn search(&self, text: impl Into<String>) -> u64 {
        let text = text.into();

        let mut inner = self.inner.lock();
        inner.latest_seq += 1;
        let seq = inner.latest_seq;
        inner.query = text.clone();

        let source = match inner.source.clone() {
            Some(source) => source,
            None => {
                // 没有来源：不显示任何建议
                inner.state = SearchState::Idle;
                inner.items = None;
                self.events.publish(SuggestionEvent::ItemsChanged {
                    seq,
                    query: text,
                    items: None,
                });
                return seq;
            }
        };

        let runtime = match self.runtime.clone().or_else(|| Handle::try_current().ok()) {
            Some(runtime) => runtime,
            None => {
                warn!("没有可用的异步运行时，建议查询按空结果处理: {}", text);
                self.commit(&mut inner, seq, text, Vec::new());
                return seq;
            }
        };

        inner.state = SearchState::Searching;
        self.events.publish(SuggestionEvent::SearchStarted {
            seq,
            query: text.clone(),
        });
        drop(inner);

        let controller = self.clone();
        runtime.spawn(async move {
            // 来源在独立任务中运行，panic 时同样按空结果处理
            let lookup = {
                let text = text.clone();
                tokio::spawn(async move { source.suggest(&text).await })
            };
            let items = match lookup.await {
                Ok(Ok(items)) => items,
                Ok(Err(e)) => {
                    warn!("建议查询失败，按空结果处理: query={}, 错误: {:#}", text, e);
                    Vec::new()
                }
                Err(e) => {
                    warn!("建议来源异常终止，按空结果处理: query={}, 错误: {}", text, e);
                    Vec::new()
                }
            };

            let mut inner = controller.inner.lock();
            if inner.latest_seq != seq {
                debug!(
                    "丢弃过期的建议结果: seq={}, 最新 seq={}",
                    seq, inner.latest_seq
                );
                return;
            }
            controller.commit(&mut inner, seq, text, items);
        });

        seq
    }

    /// 在持有锁的情况下提交并发布结果
    fn commit(&self, inner: &mut Inner, seq: u64, query: String, mut items: Vec<String>) {
        if self.max_results > 0 {
            items.truncate(self.max_results);
        }

        debug!("发布建议结果: seq={}, 数量={}", seq, items.len());
        inner.items = Some(items.clone());
        inner.state = SearchState::Idle;
        self.events.publish(SuggestionEvent::ItemsChanged {
            seq,
            query,
            items: Some(items),
        });
    }
}

impl Default for SuggestionController {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::suggestion::{from_fn, StaticWordList};
    use std::collections::HashMap;
    use std::time::Duration;
    use tokio::sync::Notify;

    /// 每个查询都要等测试显式放行后才返回
    struct GatedSource {
        gates: HashMap<String, Arc<Notify>>,
    }

    impl GatedSource {
        fn new(queries: &[&str]) -> Self {
            Self {
                gates: queries
                    .iter()
                    .map(|q| (q.to_string(), Arc::new(Notify::new())))
                    .collect(),
            }
        }

        fn release(&self, query: &str) {
            self.gates[query].notify_one();
        }
    }

    #[async_trait::async_trait]
    impl SuggestionSource for GatedSource {
        async fn suggest(&self, text: &str) -> anyhow::Result<Vec<String>> {
            let gate = self.gates[text].clone();
            gate.notified().await;
            Ok(vec![format!("{}-result", text)])
        }
    }

    async fn next_items(rx: &mut EventReceiver<SuggestionEvent>) -> (u64, Option<Vec<String>>) {
        loop {
            let event = tokio::time::timeout(Duration::from_secs(5), rx.recv())
                .await
                .expect("等待建议结果超时")
                .expect("事件通道已关闭");
            if let SuggestionEvent::ItemsChanged { seq, items, .. } = event {
                return (seq, items);
            }
        }
    }

    #[tokio::test]
    async fn test_latest_search_wins() {
        let source = Arc::new(GatedSource::new(&["a", "ab"]));
        let controller = SuggestionController::new();
        controller.set_source(Some(source.clone()));
        let (_, mut rx) = controller.subscribe();

        let first = controller.search("a");
        let second = controller.search("ab");
        assert!(second > first);
        assert_eq!(controller.state(), SearchState::Searching);

        source.release("ab");
        let (seq, items) = next_items(&mut rx).await;
        assert_eq!(seq, second);
        assert_eq!(items, Some(vec!["ab-result".to_string()]));

        // 较早的查询后返回，结果必须被丢弃
        source.release("a");
        tokio::time::sleep(Duration::from_millis(100)).await;

        while let Ok(event) = rx.try_recv() {
            assert!(!matches!(event, SuggestionEvent::ItemsChanged { .. }));
        }
        assert_eq!(controller.items(), Some(vec!["ab-result".to_string()]));
        assert_eq!(controller.query(), "ab");
        assert_eq!(controller.state(), SearchState::Idle);
    }

    #[tokio::test]
    async fn test_failure_degrades_to_empty() {
        let controller = SuggestionController::new();
        controller.set_source(Some(Arc::new(from_fn(|_text: String| async move {
            Err::<Vec<String>, _>(anyhow::anyhow!("backend unavailable"))
        }))));
        let (_, mut rx) = controller.subscribe();

        controller.search("x");
        let (_, items) = next_items(&mut rx).await;
        assert_eq!(items, Some(Vec::new()));
    }

    #[tokio::test]
    async fn test_panicking_source_degrades_to_empty() {
        let controller = SuggestionController::new();
        controller.set_source(Some(Arc::new(from_fn(|text: String| async move {
            if text == "boom" {
                panic!("source crashed");
            }
            Ok::<_, anyhow::Error>(vec![text])
        }))));
        let (_, mut rx) = controller.subscribe();

        let seq = controller.search("boom");
        let (items_seq, items) = next_items(&mut rx).await;

        assert_eq!(items_seq, seq);
        assert_eq!(items, Some(Vec::new()));
        assert_eq!(controller.state(), SearchState::Idle);
        assert_eq!(controller.items(), Some(Vec::new()));

        // 控制器在来源崩溃后仍可继续使用
        controller.search("ok");
        assert_eq!(next_items(&mut rx).await.1, Some(vec!["ok".to_string()]));
    }

    #[tokio::test]
    async fn test_without_source_shows_nothing() {
        let controller = SuggestionController::new();
        let (_, mut rx) = controller.subscribe();

        let seq = controller.search("abc");

        assert_eq!(rx.try_recv().unwrap().seq(), seq);
        assert_eq!(controller.items(), None);
        assert_eq!(controller.state(), SearchState::Idle);
    }

    #[tokio::test]
    async fn test_source_swap_applies_to_next_search() {
        let controller = SuggestionController::new();
        controller.set_source(Some(Arc::new(StaticWordList::new(["alpha", "beta"]))));
        let (_, mut rx) = controller.subscribe();

        controller.search("al");
        assert_eq!(next_items(&mut rx).await.1, Some(vec!["alpha".to_string()]));

        controller.set_source(Some(Arc::new(StaticWordList::new(["almond"]))));
        controller.search("al");
        assert_eq!(next_items(&mut rx).await.1, Some(vec!["almond".to_string()]));
    }

    #[tokio::test]
    async fn test_max_results_truncates() {
        let config = SuggestionConfig {
            max_results: 2,
            ..Default::default()
        };
        let controller = SuggestionController::from_config(&config);
        controller.set_source(Some(Arc::new(StaticWordList::new(["a1", "a2", "a3"]))));
        let (_, mut rx) = controller.subscribe();

        controller.search("a");
        let (_, items) = next_items(&mut rx).await;
        assert_eq!(items.unwrap().len(), 2);
    }

    #[test]
    fn test_search_without_runtime() {
        let controller = SuggestionController::new();
        controller.set_source(Some(Arc::new(StaticWordList::new(["alpha"]))));
        let (_, mut rx) = controller.subscribe();

        controller.search("al");

        match rx.try_recv().unwrap() {
            SuggestionEvent::ItemsChanged { items, .. } => assert_eq!(items, Some(Vec::new())),
            other => panic!("unexpected event: {:?}", other),
        }
    }
}
