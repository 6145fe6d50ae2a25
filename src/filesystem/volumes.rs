// 已挂载卷检测
//
// 通过 sysinfo 枚举磁盘，并按文件系统类型归类为驱动器类型

use std::fs;
use std::path::{Path, PathBuf};

use sysinfo::Disks;

use super::types::{DriveKind, Volume};

/// 按卷标索引块设备的目录（udev）
const BY_LABEL_DIR: &str = "/dev/disk/by-label";

/// 网络文件系统类型
const NETWORK_FS: &[&str] = &[
    "nfs", "nfs4", "cifs", "smbfs", "smb3", "afs", "9p", "fuse.sshfs", "sshfs", "davfs",
    "ncpfs",
];

/// 光盘文件系统类型
const OPTICAL_FS: &[&str] = &["iso9660", "udf", "cd9660", "cdfs"];

/// 系统自动挂载的特殊文件系统类型
const SPECIAL_FS: &[&str] = &[
    "proc",
    "sysfs",
    "devpts",
    "tmpfs",
    "cgroup",
    "cgroup2",
    "mqueue",
    "hugetlbfs",
    "devtmpfs",
    "securityfs",
    "pstore",
    "bpf",
    "tracefs",
    "debugfs",
    "fusectl",
    "configfs",
    "overlay",
    "squashfs",
    "autofs",
    "binfmt_misc",
];

/// 根据文件系统类型和可移动标记判断驱动器类型
pub fn classify(fs_type: &str, is_removable: bool) -> DriveKind {
    let fs_type = fs_type.to_lowercase();

    if NETWORK_FS.contains(&fs_type.as_str()) {
        DriveKind::Network
    } else if OPTICAL_FS.contains(&fs_type.as_str()) {
        DriveKind::Optical
    } else if SPECIAL_FS.contains(&fs_type.as_str()) {
        DriveKind::Other
    } else if is_removable {
        DriveKind::Removable
    } else {
        DriveKind::Fixed
    }
}

/// 枚举当前挂载的卷（每次调用都重新查询）
pub fn detect_volumes() -> Vec<Volume> {
    let disks = Disks::new_with_refreshed_list();

    disks
        .list()
        .iter()
        .map(|disk| {
            let fs_type = disk.file_system().to_string_lossy().to_string();
            let kind = classify(&fs_type, disk.is_removable());
            // 容量为 0 视为未就绪（如空光驱）
            let is_ready = disk.total_space() > 0;
            let name = disk.name().to_string_lossy();

            Volume {
                root: PathBuf::from(disk.mount_point()),
                kind,
                is_ready,
                volume_label: volume_label(&name),
            }
        })
        .collect()
}

/// 解析卷标
///
/// Windows 上 sysinfo 返回的名称就是卷标；其他平台返回的是设备节点，
/// 需要通过 /dev/disk/by-label 反查
fn volume_label(name: &str) -> Option<String> {
    let name = name.trim();
    if name.is_empty() {
        return None;
    }

    if cfg!(windows) {
        Some(name.to_string())
    } else {
        label_for_device(Path::new(BY_LABEL_DIR), name)
    }
}

/// 在卷标目录中查找指向该设备的链接，链接名即卷标
fn label_for_device(by_label_dir: &Path, device: &str) -> Option<String> {
    let device = fs::canonicalize(device).ok()?;

    fs::read_dir(by_label_dir)
        .ok()?
        .flatten()
        .find_map(|entry| {
            let target = fs::canonicalize(entry.path()).ok()?;
            if target != device {
                return None;
            }
            let label = unescape_label(&entry.file_name().to_string_lossy());
            (!label.is_empty()).then_some(label)
        })
}

/// udev 将卷标中的特殊字符编码为 \xHH
fn unescape_label(raw: &str) -> String {
    let mut bytes = Vec::with_capacity(raw.len());
    let mut rest = raw.as_bytes();

    while let Some((&first, tail)) = rest.split_first() {
        if first == b'\\' && tail.len() >= 3 && tail[0] == b'x' {
            let decoded = std::str::from_utf8(&tail[1..3])
                .ok()
                .and_then(|hex| u8::from_str_radix(hex, 16).ok());
            if let Some(byte) = decoded {
                bytes.push(byte);
                rest = &tail[3..];
                continue;
            }
        }
        bytes.push(first);
        rest = tail;
    }

    String::from_utf8_lossy(&bytes).into_owned()
}
