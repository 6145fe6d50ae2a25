//! 目录导航模块
//!
//! - `controller.rs`: 导航控制器，维护当前目录/文件和过滤后的列表
//! - `listing.rs`: 目录列表加载与面包屑计算
//! - `events.rs`: 属性变更事件

mod controller;
mod events;
mod listing;

pub use controller::{NavigationController, SharedNavigationController};
pub use events::{NavigationEvent, NavigationProperty};
pub use listing::{path_parts, Listing};
