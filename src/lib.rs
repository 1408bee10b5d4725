//! extbrowse_core: 简化版 ext2 镜像的只读浏览库
//!
//! 这个库解析一种简化的 ext2 风格磁盘镜像，并提供类似 shell 的浏览操作：
//! - **只读**，不修改镜像
//! - `no_std` + `alloc`，`std` feature 提供基于文件的设备
//! - 直接块 + 一级间接块寻址
//!
//! # 示例
//!
//! ```rust,ignore
//! use extbrowse_core::{ExtFileSystem, FileDevice, Navigator, Result};
//!
//! fn main() -> Result<()> {
//!     let mut fs = ExtFileSystem::mount(FileDevice::from_path("disk.img")?)?;
//!     let mut nav = Navigator::new();
//!
//!     for entry in nav.list_directory(&mut fs)? {
//!         println!("{:>6} {}", entry.inode, entry.name);
//!     }
//!
//!     nav.change_directory(&mut fs, "bin")?;
//!     println!("{}", nav.print_working_directory());
//!
//!     let data = nav.read_file(&mut fs, "readme.txt")?;
//!     Ok(())
//! }
//! ```
//!
//! # 模块结构
//!
//! - [`error`] - 错误类型定义
//! - [`block`] - 块设备抽象和 I/O 操作
//! - [`consts`] - 常量定义
//! - [`types`] - 磁盘数据结构定义
//! - [`superblock`] - Superblock 读取与校验
//! - [`inode`] - Inode 表定位与解码
//! - [`indirect`] - 块指针解析
//! - [`content`] - 文件内容读取
//! - [`dir`] - 目录解析与路径查找
//! - [`fs`] - 挂载与导航会话
//! - [`cache`] - 块缓存与 inode 缓存

#![no_std]
#![deny(unsafe_op_in_unsafe_fn)]
#![warn(missing_docs)]

extern crate alloc;

#[cfg(feature = "std")]
extern crate std;

// ===== 核心模块 =====

/// 错误处理
pub mod error;

/// 块设备抽象
pub mod block;

/// 常量定义
pub mod consts;

/// 数据结构定义
pub mod types;

/// Superblock 操作
pub mod superblock;

/// Inode 操作
pub mod inode;

/// 块指针解析（直接块 + 一级间接块）
pub mod indirect;

/// 文件内容读取
pub mod content;

/// 目录操作
pub mod dir;

/// 文件系统高级 API
pub mod fs;

/// 块缓存与 inode 缓存
pub mod cache;

#[cfg(test)]
pub(crate) mod testing;

// ===== 公共导出 =====

// 错误处理
pub use error::{Error, ErrorKind, Result};

// 块设备
pub use block::{BlockDev, BlockDevice, MemoryDevice};
#[cfg(feature = "std")]
pub use block::FileDevice;

// Superblock
pub use superblock::{read_superblock, Superblock};

// Inode
pub use inode::{read_inode, Inode, InodeMode};

// Indirect blocks
pub use indirect::{BlockList, IndirectBlockMapper};

// Content
pub use content::read_content;

// Dir
pub use dir::{find_entry_by_name, lookup_path, read_dir, DirEntry, DirIterator, PathLookup};

// FileSystem
pub use fs::{ExtFileSystem, FileType, FsConfig, InodeStat, ListEntry, Navigation, Navigator};

// Cache
pub use cache::{BlockCache, CacheStats, InodeCache, DEFAULT_CACHE_SIZE};
