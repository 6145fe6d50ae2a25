// 本地文件系统导航与输入建议组件

// 配置管理模块
pub mod config;

// 日志模块
pub mod logging;

// 变更通知订阅
pub mod events;

// 本地文件系统访问模块
pub mod filesystem;

// 目录导航控制器
pub mod navigation;

// 输入建议控制器
pub mod suggestion;

// 导出常用类型
pub use config::{AppConfig, FilesystemConfig, LogConfig, SuggestionConfig};
pub use events::{EventHub, EventReceiver, SubscriptionId};
pub use filesystem::{
    DirectoryHandle, DriveDescriptor, DriveKind, Entry, EntryAttributes, EntryFilter, FileHandle,
    FileSystem, LocalFileSystem, NavigationError, SpecialFolder, SpecialLocation,
};
pub use navigation::{
    Listing, NavigationController, NavigationEvent, NavigationProperty,
    SharedNavigationController,
};
pub use suggestion::{
    from_fn, RecentItems, SearchState, StaticWordList, SuggestionController, SuggestionEvent,
    SuggestionSource,
};
