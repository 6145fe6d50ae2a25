//! 导航属性变更事件

use serde::Serialize;
use std::path::PathBuf;

/// 导航控制器的可观察属性
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NavigationProperty {
    CurrentDirectory,
    CurrentFile,
    Directories,
    Files,
    PathParts,
    ShowHidden,
    ShowSystem,
    /// 目录和文件的合并列表
    Entries,
}

/// 导航事件
///
/// 只在属性值真正发生变化时发布
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event_type", rename_all = "snake_case")]
pub enum NavigationEvent {
    CurrentDirectoryChanged {
        old: Option<PathBuf>,
        new: Option<PathBuf>,
    },
    CurrentFileChanged {
        old: Option<PathBuf>,
        new: Option<PathBuf>,
    },
    DirectoriesChanged {
        count: Option<usize>,
    },
    FilesChanged {
        count: Option<usize>,
    },
    PathPartsChanged {
        parts: Option<Vec<PathBuf>>,
    },
    ShowHiddenChanged {
        value: bool,
    },
    ShowSystemChanged {
        value: bool,
    },
    /// 合并列表变化，用于整体刷新
    EntriesChanged {
        count: usize,
    },
}

impl NavigationEvent {
    /// 事件对应的属性
    pub fn property(&self) -> NavigationProperty {
        match self {
            NavigationEvent::CurrentDirectoryChanged { .. } => NavigationProperty::CurrentDirectory,
            NavigationEvent::CurrentFileChanged { .. } => NavigationProperty::CurrentFile,
            NavigationEvent::DirectoriesChanged { .. } => NavigationProperty::Directories,
            NavigationEvent::FilesChanged { .. } => NavigationProperty::Files,
            NavigationEvent::PathPartsChanged { .. } => NavigationProperty::PathParts,
            NavigationEvent::ShowHiddenChanged { .. } => NavigationProperty::ShowHidden,
            NavigationEvent::ShowSystemChanged { .. } => NavigationProperty::ShowSystem,
            NavigationEvent::EntriesChanged { .. } => NavigationProperty::Entries,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_serialization() {
        let event = NavigationEvent::CurrentDirectoryChanged {
            old: None,
            new: Some(PathBuf::from("/tmp")),
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["event_type"], "current_directory_changed");
        assert_eq!(json["new"], "/tmp");
        assert!(json["old"].is_null());
    }

    #[test]
    fn test_event_property() {
        let event = NavigationEvent::ShowHiddenChanged { value: true };
        assert_eq!(event.property(), NavigationProperty::ShowHidden);
        let event = NavigationEvent::EntriesChanged { count: 0 };
        assert_eq!(event.property(), NavigationProperty::Entries);
    }
}
