// 本地文件系统访问模块
//
// 为目录导航提供存在性检查、属性位、子条目枚举、卷和特殊目录查询

mod guard;
#[cfg(test)]
pub(crate) mod memory;
mod service;
mod types;
mod volumes;

pub use service::{FileSystem, LocalFileSystem};
pub use types::*;
pub use volumes::classify as classify_volume;
