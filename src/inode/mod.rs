//! Inode 操作模块
//!
//! 这个模块提供 inode 表的定位和 inode 解码。inode 按需读取，
//! 是否缓存由上层（`ExtFileSystem` 的 inode 缓存）决定。

mod read;

pub use read::*;
