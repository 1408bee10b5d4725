//! 缓存模块
//!
//! 镜像在本库的范围内只读，因此缓存只需要处理读取命中和驱逐，不需要脏块跟踪。
//!
//! # 主要组件
//!
//! - [`BlockCache`] - 块缓存，`块号 -> 块数据`，挂在 `BlockDev` 上
//! - [`InodeCache`] - inode 缓存，`inode 编号 -> 解码后的 Inode`，挂在文件系统上
//! - [`CacheStats`] - 缓存统计信息
//!
//! 两者都使用 `lru::LruCache`，满时自动驱逐最久未使用的条目。
//!
//! # 使用示例
//!
//! ```rust,ignore
//! use core::num::NonZeroUsize;
//! use extbrowse_core::cache::BlockCache;
//!
//! let mut cache = BlockCache::new(NonZeroUsize::new(64).unwrap(), 512);
//! cache.insert(7, &block);
//! assert!(cache.get(7).is_some());
//! println!("hit rate: {}", cache.stats().hit_rate());
//! ```

mod block_cache;
mod inode_cache;

pub use block_cache::{BlockCache, CacheStats, DEFAULT_CACHE_SIZE};
pub use inode_cache::{InodeCache, DEFAULT_INODE_CACHE_SIZE};
