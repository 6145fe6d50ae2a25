// 文件系统模块数据类型定义

use serde::{Deserialize, Serialize};
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// 文件系统错误码
/// 错误码范围：50001 - 50099
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FsErrorCode {
    /// 目录不存在
    DirectoryNotFound = 50002,
    /// 权限不足
    PermissionDenied = 50003,
    /// 目录读取失败
    DirectoryReadFailed = 50005,
}

impl FsErrorCode {
    pub fn code(&self) -> i32 {
        *self as i32
    }
}

/// 目录导航错误
///
/// 任何一种错误发生时，导航状态都保持调用前的样子
#[derive(Debug, Error)]
pub enum NavigationError {
    /// 目录不存在
    #[error("目录不存在: {name}")]
    NotFound { name: String, path: PathBuf },

    /// 没有权限读取目录内容
    #[error("没有权限访问目录: {name}")]
    AccessDenied {
        name: String,
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// 其他读取失败
    #[error("读取目录失败: {name}")]
    ReadFailed {
        name: String,
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl NavigationError {
    pub(crate) fn not_found(path: &Path) -> Self {
        Self::NotFound {
            name: display_name(path),
            path: path.to_path_buf(),
        }
    }

    /// 将枚举目录时的 IO 错误映射为导航错误
    pub(crate) fn from_io(path: &Path, source: io::Error) -> Self {
        let name = display_name(path);
        let path = path.to_path_buf();
        match source.kind() {
            io::ErrorKind::PermissionDenied => Self::AccessDenied { name, path, source },
            io::ErrorKind::NotFound => Self::NotFound { name, path },
            _ => Self::ReadFailed { name, path, source },
        }
    }

    pub fn code(&self) -> FsErrorCode {
        match self {
            Self::NotFound { .. } => FsErrorCode::DirectoryNotFound,
            Self::AccessDenied { .. } => FsErrorCode::PermissionDenied,
            Self::ReadFailed { .. } => FsErrorCode::DirectoryReadFailed,
        }
    }

    /// 出错的目录路径
    pub fn path(&self) -> &Path {
        match self {
            Self::NotFound { path, .. }
            | Self::AccessDenied { path, .. }
            | Self::ReadFailed { path, .. } => path,
        }
    }
}

/// 路径最后一段作为显示名称，根目录返回完整路径
pub(crate) fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.to_string_lossy().to_string())
}

/// 条目属性位
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EntryAttributes {
    /// 隐藏文件（Unix 以 . 开头，Windows 隐藏属性）
    pub hidden: bool,
    /// 受保护的系统文件（仅 Windows）
    pub system: bool,
}

/// 目录引用
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct DirectoryHandle {
    path: PathBuf,
    attributes: EntryAttributes,
}

impl DirectoryHandle {
    pub fn new(path: impl Into<PathBuf>, attributes: EntryAttributes) -> Self {
        Self {
            path: path.into(),
            attributes,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn name(&self) -> String {
        display_name(&self.path)
    }

    pub fn attributes(&self) -> EntryAttributes {
        self.attributes
    }

    /// 父目录路径，根目录返回 None
    pub fn parent_path(&self) -> Option<&Path> {
        self.path.parent()
    }
}

/// 文件引用
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct FileHandle {
    path: PathBuf,
    attributes: EntryAttributes,
}

impl FileHandle {
    pub fn new(path: impl Into<PathBuf>, attributes: EntryAttributes) -> Self {
        Self {
            path: path.into(),
            attributes,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn name(&self) -> String {
        display_name(&self.path)
    }

    pub fn attributes(&self) -> EntryAttributes {
        self.attributes
    }
}

/// 目录条目（目录或文件）
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "entryType", rename_all = "lowercase")]
pub enum Entry {
    Directory(DirectoryHandle),
    File(FileHandle),
}

impl Entry {
    pub fn path(&self) -> &Path {
        match self {
            Entry::Directory(dir) => dir.path(),
            Entry::File(file) => file.path(),
        }
    }

    pub fn name(&self) -> String {
        display_name(self.path())
    }

    pub fn attributes(&self) -> EntryAttributes {
        match self {
            Entry::Directory(dir) => dir.attributes(),
            Entry::File(file) => file.attributes(),
        }
    }

    pub fn is_directory(&self) -> bool {
        matches!(self, Entry::Directory(_))
    }
}

/// 一个目录的直接子条目
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Children {
    pub directories: Vec<DirectoryHandle>,
    pub files: Vec<FileHandle>,
}

/// 隐藏/系统条目过滤器
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryFilter {
    pub show_hidden: bool,
    pub show_system: bool,
}

impl EntryFilter {
    /// 条目是否可见
    pub fn accepts(&self, attributes: EntryAttributes) -> bool {
        (self.show_hidden || !attributes.hidden) && (self.show_system || !attributes.system)
    }
}

/// 驱动器类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DriveKind {
    Fixed,
    Removable,
    Network,
    Optical,
    Other,
}

impl DriveKind {
    /// 是否在驱动器列表中展示
    pub fn is_supported(&self) -> bool {
        !matches!(self, DriveKind::Other)
    }

    /// 图标建议
    pub fn icon(&self) -> &'static str {
        match self {
            DriveKind::Optical => "disk",
            DriveKind::Removable => "usb",
            DriveKind::Network => "server-network",
            DriveKind::Fixed | DriveKind::Other => "harddisk",
        }
    }
}

/// 文件系统报告的已挂载卷
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Volume {
    /// 卷根目录
    pub root: PathBuf,
    pub kind: DriveKind,
    /// 卷是否就绪（如光驱中是否有光盘）
    pub is_ready: bool,
    /// 卷标
    pub volume_label: Option<String>,
}

/// 驱动器快捷方式
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DriveDescriptor {
    pub root: DirectoryHandle,
    pub kind: DriveKind,
    /// 未就绪的卷没有卷标
    #[serde(rename = "volumeLabel")]
    pub volume_label: Option<String>,
    pub icon: &'static str,
}

/// 用户特殊目录
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpecialFolder {
    Home,
    Documents,
    Pictures,
    Music,
    Videos,
    Desktop,
}

impl SpecialFolder {
    /// 展示顺序
    pub const ALL: [SpecialFolder; 6] = [
        SpecialFolder::Home,
        SpecialFolder::Documents,
        SpecialFolder::Pictures,
        SpecialFolder::Music,
        SpecialFolder::Videos,
        SpecialFolder::Desktop,
    ];

    pub fn icon(&self) -> &'static str {
        match self {
            SpecialFolder::Home => "account",
            SpecialFolder::Documents => "file-document",
            SpecialFolder::Pictures => "file-image",
            SpecialFolder::Music => "file-music",
            SpecialFolder::Videos => "file-video",
            SpecialFolder::Desktop => "monitor",
        }
    }
}

/// 特殊目录快捷方式
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SpecialLocation {
    pub folder: SpecialFolder,
    pub directory: DirectoryHandle,
    pub icon: &'static str,
}
