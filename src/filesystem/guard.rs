// 路径与属性辅助函数
//
// 路径规范化、隐藏/系统属性检测

use std::fs::Metadata;
use std::path::{Component, Path, PathBuf};

use super::types::EntryAttributes;

/// 规范化路径（不访问文件系统）
///
/// 相对路径基于当前工作目录，去掉 `.`，并按字面折叠 `..`
pub fn normalize(path: &Path) -> PathBuf {
    let absolute = std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf());

    let mut normalized = PathBuf::new();
    for component in absolute.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                // 根目录的父目录仍是根目录
                if normalized.parent().is_some() {
                    normalized.pop();
                }
            }
            other => normalized.push(other.as_os_str()),
        }
    }

    dunce::simplified(&normalized).to_path_buf()
}

/// 检查是否为隐藏文件
pub fn is_hidden(path: &Path, metadata: Option<&Metadata>) -> bool {
    // 所有平台：以 . 开头的文件
    if let Some(name) = path.file_name() {
        if name.to_string_lossy().starts_with('.') {
            return true;
        }
    }

    #[cfg(target_os = "windows")]
    {
        use std::os::windows::fs::MetadataExt;
        const FILE_ATTRIBUTE_HIDDEN: u32 = 0x2;
        if let Some(metadata) = metadata {
            if metadata.file_attributes() & FILE_ATTRIBUTE_HIDDEN != 0 {
                return true;
            }
        }
    }

    #[cfg(not(target_os = "windows"))]
    let _ = metadata;

    false
}

/// 检查是否为受保护的系统文件（仅 Windows 有此属性）
pub fn is_system(metadata: Option<&Metadata>) -> bool {
    #[cfg(target_os = "windows")]
    {
        use std::os::windows::fs::MetadataExt;
        const FILE_ATTRIBUTE_SYSTEM: u32 = 0x4;
        if let Some(metadata) = metadata {
            return metadata.file_attributes() & FILE_ATTRIBUTE_SYSTEM != 0;
        }
    }

    #[cfg(not(target_os = "windows"))]
    let _ = metadata;

    false
}

/// 读取条目属性位
pub fn attributes_of(path: &Path, metadata: Option<&Metadata>) -> EntryAttributes {
    EntryAttributes {
        hidden: is_hidden(path, metadata),
        system: is_system(metadata),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hidden_files() {
        assert!(is_hidden(Path::new("/home/user/.bashrc"), None));
        assert!(is_hidden(Path::new(".gitignore"), None));
        assert!(!is_hidden(Path::new("normal_file.txt"), None));
        assert!(!is_hidden(Path::new("/"), None));
    }

    #[cfg(not(target_os = "windows"))]
    #[test]
    fn test_normalize_unix() {
        assert_eq!(normalize(Path::new("/a/b/../c/./d")), PathBuf::from("/a/c/d"));
        assert_eq!(normalize(Path::new("/../..")), PathBuf::from("/"));
        assert_eq!(normalize(Path::new("/tmp/")), PathBuf::from("/tmp"));
    }

    #[test]
    fn test_normalize_relative() {
        let cwd = std::env::current_dir().unwrap();
        assert_eq!(normalize(Path::new(".")), normalize(&cwd));
    }

    #[cfg(not(target_os = "windows"))]
    #[test]
    fn test_no_system_attribute_on_unix() {
        let metadata = std::fs::metadata("/").unwrap();
        assert!(!is_system(Some(&metadata)));
    }
}
