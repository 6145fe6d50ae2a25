//! 建议来源
//!
//! 建议来源是一种能力："给定输入文本，异步产出候选列表"。
//! 不同来源（静态词表、最近使用、任意异步函数）都是同一能力的不同实现。

use std::collections::VecDeque;
use std::future::Future;

use anyhow::Result;
use async_trait::async_trait;
use parking_lot::Mutex;

use crate::config::SuggestionConfig;

/// 建议来源
#[async_trait]
pub trait SuggestionSource: Send + Sync {
    /// 根据输入文本查询候选项，失败时由控制器按空列表处理
    async fn suggest(&self, text: &str) -> Result<Vec<String>>;
}

/// 静态词表，按前缀匹配（不区分大小写）
#[derive(Debug, Clone)]
pub struct StaticWordList {
    words: Vec<String>,
    max_results: Option<usize>,
}

impl StaticWordList {
    pub fn new<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            words: words.into_iter().map(Into::into).collect(),
            max_results: None,
        }
    }

    pub fn with_max_results(mut self, max_results: usize) -> Self {
        self.max_results = Some(max_results);
        self
    }
}

#[async_trait]
impl SuggestionSource for StaticWordList {
    async fn suggest(&self, text: &str) -> Result<Vec<String>> {
        let needle = text.trim().to_lowercase();
        if needle.is_empty() {
            return Ok(Vec::new());
        }

        let matches = self
            .words
            .iter()
            .filter(|word| word.to_lowercase().starts_with(&needle))
            .take(self.max_results.unwrap_or(usize::MAX))
            .cloned()
            .collect();
        Ok(matches)
    }
}

/// 最近使用的条目，最新的排在最前
///
/// 输入为空时返回全部条目，否则按子串匹配（不区分大小写）
#[derive(Debug)]
pub struct RecentItems {
    items: Mutex<VecDeque<String>>,
    capacity: usize,
}

impl RecentItems {
    pub fn new(capacity: usize) -> Self {
        Self {
            items: Mutex::new(VecDeque::with_capacity(capacity)),
            capacity,
        }
    }

    pub fn from_config(config: &SuggestionConfig) -> Self {
        Self::new(config.recent_capacity)
    }

    /// 记录一次使用，重复条目移到最前，超出容量时丢弃最旧的
    pub fn push(&self, item: impl Into<String>) {
        let item = item.into();
        let mut items = self.items.lock();
        items.retain(|existing| existing != &item);
        items.push_front(item);
        items.truncate(self.capacity);
    }

    pub fn items(&self) -> Vec<String> {
        self.items.lock().iter().cloned().collect()
    }
}

#[async_trait]
impl SuggestionSource for RecentItems {
    async fn suggest(&self, text: &str) -> Result<Vec<String>> {
        let needle = text.trim().to_lowercase();
        let items = self.items.lock();
        Ok(items
            .iter()
            .filter(|item| needle.is_empty() || item.to_lowercase().contains(&needle))
            .cloned()
            .collect())
    }
}

/// 将异步函数包装为建议来源
pub struct FnSource<F> {
    f: F,
}

/// 用闭包创建建议来源
pub fn from_fn<F, Fut>(f: F) -> FnSource<F>
where
    F: Fn(String) -> Fut + Send + Sync,
    Fut: Future<Output = Result<Vec<String>>> + Send + 'static,
{
    FnSource { f }
}

#[async_trait]
impl<F, Fut> SuggestionSource for FnSource<F>
where
    F: Fn(String) -> Fut + Send + Sync,
    Fut: Future<Output = Result<Vec<String>>> + Send + 'static,
{
    async fn suggest(&self, text: &str) -> Result<Vec<String>> {
        (self.f)(text.to_string()).await
    }
}
