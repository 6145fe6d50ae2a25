//! 输入建议模块
//!
//! - `controller.rs`: 建议搜索控制器（只发布最新查询的结果）
//! - `source.rs`: 可插拔的建议来源
//! - `events.rs`: 建议事件与状态

mod controller;
mod events;
mod source;

pub use controller::SuggestionController;
pub use events::{SearchState, SuggestionEvent};
pub use source::{from_fn, FnSource, RecentItems, StaticWordList, SuggestionSource};
