//! 目录导航控制器
//!
//! 维护当前目录、当前文件、过滤后的子条目列表和面包屑路径，
//! 所有属性变更都通过 [`NavigationEvent`] 推送给订阅者。
//!
//! 控制器设计为由单个 UI/事件线程驱动；需要跨线程共享时，
//! 用一把互斥锁保护整个控制器即可（见 [`SharedNavigationController`]）。

use std::path::Path;
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{debug, info, warn};

use super::events::NavigationEvent;
use super::listing::{path_parts, Listing};
use crate::config::FilesystemConfig;
use crate::events::{EventHub, EventReceiver, SubscriptionId};
use crate::filesystem::{
    DirectoryHandle, DriveDescriptor, Entry, EntryFilter, FileHandle, FileSystem,
    LocalFileSystem, NavigationError, SpecialFolder, SpecialLocation,
};

/// 多线程共享的导航控制器
pub type SharedNavigationController<F = LocalFileSystem> = Arc<Mutex<NavigationController<F>>>;

/// 空路径或只有空白字符的路径表示"清空"
fn is_blank(path: &Path) -> bool {
    path.as_os_str().to_string_lossy().trim().is_empty()
}

/// 值不同时才写入，返回是否发生变化
fn assign<T: PartialEq>(slot: &mut T, value: T) -> bool {
    if *slot == value {
        false
    } else {
        *slot = value;
        true
    }
}

/// 目录导航控制器
pub struct NavigationController<F: FileSystem = LocalFileSystem> {
    fs: F,
    current_directory: Option<DirectoryHandle>,
    current_file: Option<FileHandle>,
    directories: Option<Vec<DirectoryHandle>>,
    files: Option<Vec<FileHandle>>,
    path_parts: Option<Vec<DirectoryHandle>>,
    filter: EntryFilter,
    events: EventHub<NavigationEvent>,
}

impl NavigationController<LocalFileSystem> {
    /// 基于本地文件系统创建控制器
    pub fn local() -> Self {
        Self::new(LocalFileSystem::new())
    }
}

impl<F: FileSystem> NavigationController<F> {
    pub fn new(fs: F) -> Self {
        Self::with_filter(fs, EntryFilter::default())
    }

    pub fn with_filter(fs: F, filter: EntryFilter) -> Self {
        Self {
            fs,
            current_directory: None,
            current_file: None,
            directories: None,
            files: None,
            path_parts: None,
            filter,
            events: EventHub::new(),
        }
    }

    /// 按配置创建控制器，配置了起始目录时尝试进入
    pub fn from_config(fs: F, config: &FilesystemConfig) -> Self {
        let mut controller = Self::with_filter(
            fs,
            EntryFilter {
                show_hidden: config.show_hidden,
                show_system: config.show_system,
            },
        );

        if let Some(ref start) = config.start_directory {
            match controller.select_directory(start) {
                Ok(()) => info!("已进入起始目录: {:?}", start),
                Err(e) => warn!("无法进入起始目录 {:?}: {}", start, e),
            }
        }

        controller
    }

    // ==================== 订阅 ====================

    pub fn subscribe(&self) -> (SubscriptionId, EventReceiver<NavigationEvent>) {
        self.events.subscribe()
    }

    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.events.unsubscribe(id)
    }

    // ==================== 读取 ====================

    pub fn filesystem(&self) -> &F {
        &self.fs
    }

    pub fn current_directory(&self) -> Option<&DirectoryHandle> {
        self.current_directory.as_ref()
    }

    pub fn current_file(&self) -> Option<&FileHandle> {
        self.current_file.as_ref()
    }

    pub fn directories(&self) -> Option<&[DirectoryHandle]> {
        self.directories.as_deref()
    }

    pub fn files(&self) -> Option<&[FileHandle]> {
        self.files.as_deref()
    }

    /// 从根目录到当前目录的各级目录
    pub fn path_parts(&self) -> Option<&[DirectoryHandle]> {
        self.path_parts.as_deref()
    }

    pub fn filter(&self) -> EntryFilter {
        self.filter
    }

    pub fn show_hidden(&self) -> bool {
        self.filter.show_hidden
    }

    pub fn show_system(&self) -> bool {
        self.filter.show_system
    }

    /// 目录在前、文件在后的合并列表
    pub fn entries(&self) -> Vec<Entry> {
        let directories = self
            .directories
            .iter()
            .flatten()
            .cloned()
            .map(Entry::Directory);
        let files = self.files.iter().flatten().cloned().map(Entry::File);
        directories.chain(files).collect()
    }

    /// 系统驱动器（每次读取都重新查询）
    pub fn drives(&self) -> Vec<DriveDescriptor> {
        self.fs
            .volumes()
            .into_iter()
            .filter(|volume| volume.kind.is_supported())
            .map(|volume| {
                let attributes = self.fs.attributes(&volume.root);
                DriveDescriptor {
                    root: DirectoryHandle::new(volume.root, attributes),
                    kind: volume.kind,
                    volume_label: if volume.is_ready {
                        volume.volume_label
                    } else {
                        None
                    },
                    icon: volume.kind.icon(),
                }
            })
            .collect()
    }

    /// 用户特殊目录（每次读取都重新查询，无法解析的目录被跳过）
    pub fn special_locations(&self) -> Vec<SpecialLocation> {
        SpecialFolder::ALL
            .iter()
            .filter_map(|folder| {
                let path = self.fs.special_folder(*folder)?;
                let attributes = self.fs.attributes(&path);
                Some(SpecialLocation {
                    folder: *folder,
                    directory: DirectoryHandle::new(path, attributes),
                    icon: folder.icon(),
                })
            })
            .collect()
    }

    // ==================== 操作 ====================

    /// 选择当前目录
    ///
    /// 空路径清空当前目录；目录不存在或无法枚举时返回错误且不修改任何状态
    pub fn select_directory(&mut self, path: impl AsRef<Path>) -> Result<(), NavigationError> {
        let path = path.as_ref();
        if is_blank(path) {
            self.clear_directory();
            return Ok(());
        }

        let listing = Listing::load(&self.fs, path)?;
        self.apply_listing(listing);
        Ok(())
    }

    pub fn select_directory_handle(
        &mut self,
        directory: Option<&DirectoryHandle>,
    ) -> Result<(), NavigationError> {
        match directory {
            Some(directory) => self.select_directory(directory.path()),
            None => {
                self.clear_directory();
                Ok(())
            }
        }
    }

    /// 提交一次已加载的目录列表
    ///
    /// 过滤使用提交时的过滤器，保证列表始终满足当前过滤条件
    pub fn apply_listing(&mut self, listing: Listing) {
        let directories = listing.visible_directories(self.filter);
        let files = listing.visible_files(self.filter);
        let directory = listing.directory().clone();

        debug!(
            "进入目录: {:?}, 子目录 {} 个, 文件 {} 个",
            directory.path(),
            directories.len(),
            files.len()
        );

        let mut changed = self.set_current_directory(Some(directory));
        changed |= self.set_directories(Some(directories));
        changed |= self.set_files(Some(files));
        self.update_path_parts();

        if changed {
            self.publish_entries_changed();
        }
    }

    /// 清空当前目录
    pub fn clear_directory(&mut self) {
        let mut changed = self.set_current_directory(None);
        changed |= self.set_directories(None);
        changed |= self.set_files(None);
        self.update_path_parts();

        if changed {
            self.publish_entries_changed();
        }
    }

    /// 选择文件，不检查文件是否存在（用于"另存为"等场景）
    pub fn select_file(&mut self, path: impl AsRef<Path>) {
        let path = path.as_ref();
        if is_blank(path) {
            self.set_current_file(None);
            return;
        }

        let path = self.fs.resolve(path);
        let attributes = self.fs.attributes(&path);
        self.set_current_file(Some(FileHandle::new(path, attributes)));
    }

    pub fn select_file_handle(&mut self, file: Option<FileHandle>) {
        self.set_current_file(file);
    }

    /// 激活一个列表条目：目录则进入并清空文件选择，文件则选中
    pub fn activate(&mut self, entry: &Entry) -> Result<(), NavigationError> {
        match entry {
            Entry::Directory(directory) => {
                self.select_directory(directory.path())?;
                self.set_current_file(None);
            }
            Entry::File(file) => {
                self.set_current_file(Some(file.clone()));
            }
        }
        Ok(())
    }

    /// 重新读取当前目录，没有当前目录时不做任何事
    pub fn refresh(&mut self) -> Result<(), NavigationError> {
        match self.current_directory.clone() {
            Some(directory) => self.select_directory(directory.path()),
            None => Ok(()),
        }
    }

    /// 设置是否显示隐藏条目，并立即刷新列表
    pub fn set_show_hidden(&mut self, show_hidden: bool) -> Result<(), NavigationError> {
        if assign(&mut self.filter.show_hidden, show_hidden) {
            self.events
                .publish(NavigationEvent::ShowHiddenChanged { value: show_hidden });
        }
        self.refresh_after_filter_change()
    }

    /// 设置是否显示系统条目，并立即刷新列表
    pub fn set_show_system(&mut self, show_system: bool) -> Result<(), NavigationError> {
        if assign(&mut self.filter.show_system, show_system) {
            self.events
                .publish(NavigationEvent::ShowSystemChanged { value: show_system });
        }
        self.refresh_after_filter_change()
    }

    // ==================== 内部 ====================

    fn refresh_after_filter_change(&mut self) -> Result<(), NavigationError> {
        let result = self.refresh();
        if result.is_err() {
            // 刷新失败时至少移除新过滤器不再允许的条目
            self.retain_visible();
        }
        result
    }

    fn retain_visible(&mut self) {
        let filter = self.filter;

        let directories = self.directories.clone().map(|mut dirs| {
            dirs.retain(|d| filter.accepts(d.attributes()));
            dirs
        });
        let files = self.files.clone().map(|mut files| {
            files.retain(|f| filter.accepts(f.attributes()));
            files
        });

        let mut changed = self.set_directories(directories);
        changed |= self.set_files(files);
        if changed {
            self.publish_entries_changed();
        }
    }

    fn update_path_parts(&mut self) {
        let parts = self
            .current_directory
            .as_ref()
            .map(|directory| path_parts(&self.fs, directory));
        self.set_path_parts(parts);
    }

    fn publish_entries_changed(&self) {
        let count = self.directories.as_ref().map_or(0, Vec::len)
            + self.files.as_ref().map_or(0, Vec::len);
        self.events.publish(NavigationEvent::EntriesChanged { count });
    }

    fn set_current_directory(&mut self, value: Option<DirectoryHandle>) -> bool {
        let old = self.current_directory.as_ref().map(|d| d.path().to_path_buf());
        if !assign(&mut self.current_directory, value) {
            return false;
        }
        let new = self.current_directory.as_ref().map(|d| d.path().to_path_buf());
        self.events
            .publish(NavigationEvent::CurrentDirectoryChanged { old, new });
        true
    }

    fn set_current_file(&mut self, value: Option<FileHandle>) -> bool {
        let old = self.current_file.as_ref().map(|f| f.path().to_path_buf());
        if !assign(&mut self.current_file, value) {
            return false;
        }
        let new = self.current_file.as_ref().map(|f| f.path().to_path_buf());
        self.events
            .publish(NavigationEvent::CurrentFileChanged { old, new });
        true
    }

    fn set_directories(&mut self, value: Option<Vec<DirectoryHandle>>) -> bool {
        if !assign(&mut self.directories, value) {
            return false;
        }
        let count = self.directories.as_ref().map(Vec::len);
        self.events
            .publish(NavigationEvent::DirectoriesChanged { count });
        true
    }

    fn set_files(&mut self, value: Option<Vec<FileHandle>>) -> bool {
        if !assign(&mut self.files, value) {
            return false;
        }
        let count = self.files.as_ref().map(Vec::len);
        self.events.publish(NavigationEvent::FilesChanged { count });
        true
    }

    fn set_path_parts(&mut self, value: Option<Vec<DirectoryHandle>>) -> bool {
        if !assign(&mut self.path_parts, value) {
            return false;
        }
        let parts = self
            .path_parts
            .as_ref()
            .map(|parts| parts.iter().map(|d| d.path().to_path_buf()).collect());
        self.events
            .publish(NavigationEvent::PathPartsChanged { parts });
        true
    }
}
