//! 目录列表加载
//!
//! 先完成存在性检查和子条目枚举，再由控制器一次性提交。
//! 加载过程不接触控制器状态，可以放到后台线程执行。

use std::io;
use std::path::{Path, PathBuf};

use crate::filesystem::{
    Children, DirectoryHandle, EntryFilter, FileHandle, FileSystem, NavigationError,
};

/// 一次成功枚举的目录内容（未过滤）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Listing {
    directory: DirectoryHandle,
    children: Children,
}

impl Listing {
    /// 检查目录并枚举其子条目
    ///
    /// 枚举本身兼作访问检查：没有读取权限时返回 `AccessDenied`
    pub fn load<F: FileSystem + ?Sized>(fs: &F, path: &Path) -> Result<Self, NavigationError> {
        let path = fs.resolve(path);

        if !fs.is_directory(&path) {
            return Err(NavigationError::not_found(&path));
        }

        let children = fs.read_children(&path).map_err(|e| {
            tracing::warn!("读取目录失败: {:?}, 错误: {}", path, e);
            NavigationError::from_io(&path, e)
        })?;

        let directory = DirectoryHandle::new(path.clone(), fs.attributes(&path));

        Ok(Self {
            directory,
            children,
        })
    }

    /// 在阻塞线程池中加载，结果交回调用方所在的任务再提交
    pub async fn load_in_background<F>(fs: F, path: PathBuf) -> Result<Self, NavigationError>
    where
        F: FileSystem + 'static,
    {
        let fallback = path.clone();
        tokio::task::spawn_blocking(move || Self::load(&fs, &path))
            .await
            .unwrap_or_else(|e| {
                Err(NavigationError::from_io(
                    &fallback,
                    io::Error::new(io::ErrorKind::Other, e.to_string()),
                ))
            })
    }

    pub fn directory(&self) -> &DirectoryHandle {
        &self.directory
    }

    /// 按过滤器筛选出可见的子目录
    pub fn visible_directories(&self, filter: EntryFilter) -> Vec<DirectoryHandle> {
        self.children
            .directories
            .iter()
            .filter(|dir| filter.accepts(dir.attributes()))
            .cloned()
            .collect()
    }

    /// 按过滤器筛选出可见的文件
    pub fn visible_files(&self, filter: EntryFilter) -> Vec<FileHandle> {
        self.children
            .files
            .iter()
            .filter(|file| filter.accepts(file.attributes()))
            .cloned()
            .collect()
    }
}

/// 计算面包屑路径
///
/// 沿父目录一直走到根，收集经过的每个目录，再按完整路径字符串升序排序。
/// 同一棵目录树中，这个顺序就是从根到当前目录的顺序。
pub fn path_parts<F: FileSystem + ?Sized>(
    fs: &F,
    directory: &DirectoryHandle,
) -> Vec<DirectoryHandle> {
    let mut parts = vec![directory.clone()];

    let mut parent = fs.parent(directory.path());
    while let Some(path) = parent {
        parent = fs.parent(&path);
        let attributes = fs.attributes(&path);
        parts.push(DirectoryHandle::new(path, attributes));
    }

    parts.sort_by(|a, b| {
        a.path()
            .to_string_lossy()
            .cmp(&b.path().to_string_lossy())
    });
    parts
}
