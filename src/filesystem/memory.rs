// 内存文件系统（测试替身）
//
// 以 Unix 风格路径模拟目录树，可注入读取失败和卷列表

use std::collections::{BTreeMap, HashMap};
use std::io;
use std::path::{Path, PathBuf};

use parking_lot::Mutex;

use super::service::FileSystem;
use super::types::*;

#[derive(Debug, Clone)]
struct Node {
    is_dir: bool,
    attributes: EntryAttributes,
}

#[derive(Debug, Default)]
pub struct MemoryFileSystem {
    nodes: Mutex<BTreeMap<PathBuf, Node>>,
    failures: Mutex<HashMap<PathBuf, io::ErrorKind>>,
    volumes: Vec<Volume>,
    special: HashMap<SpecialFolder, PathBuf>,
}

impl MemoryFileSystem {
    /// 只包含根目录的文件系统
    pub fn new() -> Self {
        let fs = Self::default();
        fs.nodes.lock().insert(
            PathBuf::from("/"),
            Node {
                is_dir: true,
                attributes: EntryAttributes::default(),
            },
        );
        fs
    }

    pub fn with_dir(self, path: &str) -> Self {
        self.add(path, true, EntryAttributes::default());
        self
    }

    pub fn with_file(self, path: &str) -> Self {
        self.add(path, false, EntryAttributes::default());
        self
    }

    pub fn with_entry(self, path: &str, is_dir: bool, attributes: EntryAttributes) -> Self {
        self.add(path, is_dir, attributes);
        self
    }

    pub fn with_volume(mut self, volume: Volume) -> Self {
        self.volumes.push(volume);
        self
    }

    pub fn with_special(mut self, folder: SpecialFolder, path: &str) -> Self {
        self.special.insert(folder, PathBuf::from(path));
        self
    }

    /// 让读取某个目录时返回指定错误
    pub fn fail_reading(&self, path: &str, kind: io::ErrorKind) {
        self.failures.lock().insert(PathBuf::from(path), kind);
    }

    pub fn remove(&self, path: &str) {
        let target = PathBuf::from(path);
        self.nodes
            .lock()
            .retain(|p, _| p != &target && !p.starts_with(&target));
    }

    pub fn add(&self, path: &str, is_dir: bool, attributes: EntryAttributes) {
        let mut nodes = self.nodes.lock();
        let path = PathBuf::from(path);

        // 自动补齐父目录
        let mut ancestor = path.parent();
        while let Some(dir) = ancestor {
            nodes.entry(dir.to_path_buf()).or_insert(Node {
                is_dir: true,
                attributes: EntryAttributes::default(),
            });
            ancestor = dir.parent();
        }

        nodes.insert(path, Node { is_dir, attributes });
    }
}

impl FileSystem for MemoryFileSystem {
    fn resolve(&self, path: &Path) -> PathBuf {
        path.to_path_buf()
    }

    fn is_directory(&self, path: &Path) -> bool {
        self.nodes
            .lock()
            .get(path)
            .map(|node| node.is_dir)
            .unwrap_or(false)
    }

    fn attributes(&self, path: &Path) -> EntryAttributes {
        self.nodes
            .lock()
            .get(path)
            .map(|node| node.attributes)
            .unwrap_or_default()
    }

    fn read_children(&self, path: &Path) -> io::Result<Children> {
        if let Some(kind) = self.failures.lock().get(path) {
            return Err(io::Error::new(*kind, "injected failure"));
        }

        let nodes = self.nodes.lock();
        if !nodes.get(path).map(|n| n.is_dir).unwrap_or(false) {
            return Err(io::Error::new(io::ErrorKind::NotFound, "no such directory"));
        }

        let mut children = Children::default();
        for (child, node) in nodes.iter() {
            if child.parent() != Some(path) {
                continue;
            }
            if node.is_dir {
                children
                    .directories
                    .push(DirectoryHandle::new(child.clone(), node.attributes));
            } else {
                children
                    .files
                    .push(FileHandle::new(child.clone(), node.attributes));
            }
        }
        Ok(children)
    }

    fn volumes(&self) -> Vec<Volume> {
        self.volumes.clone()
    }

    fn special_folder(&self, folder: SpecialFolder) -> Option<PathBuf> {
        self.special.get(&folder).cloned()
    }
}
