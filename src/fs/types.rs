//! 文件系统配置

use crate::cache::{DEFAULT_CACHE_SIZE, DEFAULT_INODE_CACHE_SIZE};
use crate::consts::{EXT_DEFAULT_BLOCK_SIZE, EXT_DEFAULT_INODE_SIZE};

/// 文件系统配置
///
/// 镜像本身不记录 inode 记录大小，挂载方需要与镜像生成方约定。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FsConfig {
    /// 引导块大小（字节），用于在挂载时定位 superblock
    pub block_size: u32,
    /// inode 记录大小（字节）
    pub inode_size: u32,
    /// 块缓存大小（块数），0 表示不缓存
    pub bcache_size: usize,
    /// inode 缓存大小（个数），0 表示不缓存
    pub icache_size: usize,
}

impl Default for FsConfig {
    fn default() -> Self {
        Self {
            block_size: EXT_DEFAULT_BLOCK_SIZE,
            inode_size: EXT_DEFAULT_INODE_SIZE,
            bcache_size: DEFAULT_CACHE_SIZE,
            icache_size: DEFAULT_INODE_CACHE_SIZE,
        }
    }
}

impl FsConfig {
    /// 关闭所有缓存
    pub fn uncached() -> Self {
        Self {
            bcache_size: 0,
            icache_size: 0,
            ..Self::default()
        }
    }
}
