//! 建议搜索事件

use serde::Serialize;

/// 建议控制器状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchState {
    /// 没有进行中的查询
    Idle,
    /// 最新一次查询尚未返回
    Searching,
}

/// 建议事件
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event_type", rename_all = "snake_case")]
pub enum SuggestionEvent {
    /// 发起了新查询
    SearchStarted { seq: u64, query: String },
    /// 候选列表更新，`None` 表示不显示任何建议
    ItemsChanged {
        seq: u64,
        query: String,
        items: Option<Vec<String>>,
    },
}

impl SuggestionEvent {
    /// 事件对应的查询序号
    pub fn seq(&self) -> u64 {
        match self {
            SuggestionEvent::SearchStarted { seq, .. } => *seq,
            SuggestionEvent::ItemsChanged { seq, .. } => *seq,
        }
    }
}
