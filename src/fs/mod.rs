//! 文件系统高级 API
//!
//! 这个模块提供镜像的挂载、inode 读取以及命令层的导航会话。

mod filesystem;
mod metadata;
mod session;
mod types;

pub use filesystem::ExtFileSystem;
pub use metadata::{FileType, InodeStat, ListEntry};
pub use session::{Navigation, Navigator};
pub use types::FsConfig;
