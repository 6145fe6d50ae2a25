// 文件系统服务
//
// 导航控制器依赖的文件系统能力，以及基于本地磁盘的实现

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use super::guard;
use super::types::*;
use super::volumes;

/// 导航控制器所需的文件系统能力
///
/// 所有查询都是同步的，每次调用都直接访问底层文件系统，不做缓存。
pub trait FileSystem: Send + Sync {
    /// 将路径解析为规范化的绝对路径
    fn resolve(&self, path: &Path) -> PathBuf;

    /// 路径是否为已存在的目录
    fn is_directory(&self, path: &Path) -> bool;

    /// 读取条目属性位，无法读取时返回默认值
    fn attributes(&self, path: &Path) -> EntryAttributes;

    /// 父目录，根目录返回 None
    fn parent(&self, path: &Path) -> Option<PathBuf> {
        path.parent().map(Path::to_path_buf)
    }

    /// 枚举直接子目录和子文件，顺序即底层返回的顺序
    fn read_children(&self, path: &Path) -> io::Result<Children>;

    /// 已挂载的卷
    fn volumes(&self) -> Vec<Volume>;

    /// 用户特殊目录
    fn special_folder(&self, folder: SpecialFolder) -> Option<PathBuf>;
}

/// 本地文件系统
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFileSystem;

impl LocalFileSystem {
    pub fn new() -> Self {
        Self
    }
}

impl FileSystem for LocalFileSystem {
    fn resolve(&self, path: &Path) -> PathBuf {
        guard::normalize(path)
    }

    fn is_directory(&self, path: &Path) -> bool {
        path.is_dir()
    }

    fn attributes(&self, path: &Path) -> EntryAttributes {
        let metadata = fs::metadata(path).ok();
        guard::attributes_of(path, metadata.as_ref())
    }

    fn read_children(&self, path: &Path) -> io::Result<Children> {
        let mut children = Children::default();

        for entry in fs::read_dir(path)? {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    tracing::debug!("跳过无法读取的条目: {:?}, 错误: {}", path, e);
                    continue;
                }
            };

            let entry_path = entry.path();
            let own_metadata = entry.metadata().ok();
            let attributes = guard::attributes_of(&entry_path, own_metadata.as_ref());

            // 跟随符号链接判断类型，失效的链接按文件处理
            let is_dir = fs::metadata(&entry_path)
                .map(|m| m.is_dir())
                .unwrap_or(false);

            if is_dir {
                children
                    .directories
                    .push(DirectoryHandle::new(entry_path, attributes));
            } else {
                children.files.push(FileHandle::new(entry_path, attributes));
            }
        }

        Ok(children)
    }

    fn volumes(&self) -> Vec<Volume> {
        volumes::detect_volumes()
    }

    fn special_folder(&self, folder: SpecialFolder) -> Option<PathBuf> {
        match folder {
            SpecialFolder::Home => dirs::home_dir(),
            SpecialFolder::Documents => dirs::document_dir(),
            SpecialFolder::Pictures => dirs::picture_dir(),
            SpecialFolder::Music => dirs::audio_dir(),
            SpecialFolder::Videos => dirs::video_dir(),
            SpecialFolder::Desktop => dirs::desktop_dir(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn create_test_folder() -> TempDir {
        let temp_dir = TempDir::new().unwrap();
        fs::create_dir(temp_dir.path().join("docs")).unwrap();
        fs::create_dir(temp_dir.path().join(".cache")).unwrap();
        fs::write(temp_dir.path().join("readme.md"), b"hello").unwrap();
        fs::write(temp_dir.path().join(".env"), b"KEY=1").unwrap();
        temp_dir
    }

    #[test]
    fn test_read_children() {
        let temp_dir = create_test_folder();
        let fs = LocalFileSystem::new();

        let children = fs.read_children(temp_dir.path()).unwrap();

        let mut dirs: Vec<String> = children.directories.iter().map(|d| d.name()).collect();
        dirs.sort();
        assert_eq!(dirs, vec![".cache", "docs"]);

        let mut files: Vec<String> = children.files.iter().map(|f| f.name()).collect();
        files.sort();
        assert_eq!(files, vec![".env", "readme.md"]);

        let env = children.files.iter().find(|f| f.name() == ".env").unwrap();
        assert!(env.attributes().hidden);
        let docs = children.directories.iter().find(|d| d.name() == "docs").unwrap();
        assert!(!docs.attributes().hidden);
    }

    #[test]
    fn test_read_missing_directory() {
        let temp_dir = TempDir::new().unwrap();
        let fs = LocalFileSystem::new();

        let err = fs.read_children(&temp_dir.path().join("missing")).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }

    #[test]
    fn test_is_directory() {
        let temp_dir = create_test_folder();
        let fs = LocalFileSystem::new();

        assert!(fs.is_directory(temp_dir.path()));
        assert!(fs.is_directory(&temp_dir.path().join("docs")));
        assert!(!fs.is_directory(&temp_dir.path().join("readme.md")));
        assert!(!fs.is_directory(&temp_dir.path().join("missing")));
    }

    #[test]
    fn test_parent_of_root() {
        let fs = LocalFileSystem::new();
        let root = fs.resolve(Path::new("/"));
        assert_eq!(fs.parent(&root), None);
    }
}
