//! Inode 缓存
//!
//! `inode 编号 -> Inode` 的 LRU 缓存。镜像只读，缓存的 inode 永远不会过期。

use super::CacheStats;
use crate::inode::Inode;
use core::num::NonZeroUsize;
use lru::LruCache;

/// 默认 inode 缓存容量
pub const DEFAULT_INODE_CACHE_SIZE: usize = 32;

/// Inode 缓存
pub struct InodeCache {
    cache: LruCache<u32, Inode>,
    stats: CacheStats,
}

impl InodeCache {
    /// 创建新的 inode 缓存
    pub fn new(capacity: NonZeroUsize) -> Self {
        Self {
            cache: LruCache::new(capacity),
            stats: CacheStats::default(),
        }
    }

    /// 查找 inode，命中时返回拷贝
    pub fn get(&mut self, inode_num: u32) -> Option<Inode> {
        self.stats.total_accesses += 1;

        match self.cache.get(&inode_num) {
            Some(inode) => {
                self.stats.hits += 1;
                Some(inode.clone())
            }
            None => {
                self.stats.misses += 1;
                log::trace!("[CACHE] inode {} MISS", inode_num);
                None
            }
        }
    }

    /// 插入 inode
    pub fn insert(&mut self, inode: Inode) {
        self.cache.put(inode.inode_num(), inode);
    }

    /// 当前缓存的 inode 数
    pub fn len(&self) -> usize {
        self.cache.len()
    }

    /// 缓存是否为空
    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }

    /// 获取统计信息
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            used: self.cache.len(),
            capacity: self.cache.cap().get(),
            ..self.stats.clone()
        }
    }
}
