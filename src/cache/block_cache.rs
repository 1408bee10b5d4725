//! 块缓存实现
//!
//! 只读镜像的 LRU 块缓存：
//!
//! ```text
//! struct BlockCache {
//!     cache: LruCache<u64, Vec<u8>>,  // O(1)，自动LRU
//!     block_size: usize,
//!     stats: CacheStats,
//! }
//! ```

use alloc::vec::Vec;
use core::num::NonZeroUsize;
use lru::LruCache;

/// 默认缓存块数量
pub const DEFAULT_CACHE_SIZE: usize = 64;

/// 缓存统计信息
#[derive(Debug, Clone, Default)]
pub struct CacheStats {
    /// 总访问次数
    pub total_accesses: u64,
    /// 缓存命中次数
    pub hits: u64,
    /// 缓存未命中次数
    pub misses: u64,
    /// 当前缓存条目数
    pub used: usize,
    /// 缓存容量
    pub capacity: usize,
}

impl CacheStats {
    /// 计算命中率
    pub fn hit_rate(&self) -> f64 {
        if self.total_accesses == 0 {
            0.0
        } else {
            self.hits as f64 / self.total_accesses as f64
        }
    }
}

/// 块缓存
///
/// - `get` 自动将块移到最近使用
/// - `insert` 满时自动驱逐 LRU 块
pub struct BlockCache {
    /// LRU缓存核心
    cache: LruCache<u64, Vec<u8>>,

    /// 块大小（字节）
    block_size: usize,

    /// 统计信息
    stats: CacheStats,
}

impl BlockCache {
    /// 创建新的块缓存
    ///
    /// # 参数
    ///
    /// * `capacity` - 缓存容量（块数量）
    /// * `block_size` - 块大小（字节）
    pub fn new(capacity: NonZeroUsize, block_size: usize) -> Self {
        Self {
            cache: LruCache::new(capacity),
            block_size,
            stats: CacheStats::default(),
        }
    }

    /// 查找块
    ///
    /// 命中时返回块数据并更新 LRU 顺序
    pub fn get(&mut self, lba: u64) -> Option<&[u8]> {
        self.stats.total_accesses += 1;

        if !self.cache.contains(&lba) {
            self.stats.misses += 1;
            log::debug!(
                "[CACHE] block LBA={:#x} MISS, cache={}/{}",
                lba,
                self.cache.len(),
                self.cache.cap().get()
            );
            return None;
        }

        self.stats.hits += 1;
        log::trace!("[CACHE] block LBA={:#x} HIT", lba);
        self.cache.get(&lba).map(Vec::as_slice)
    }

    /// 插入块数据
    ///
    /// 只保存前 `block_size` 字节；满时驱逐最久未使用的块
    pub fn insert(&mut self, lba: u64, data: &[u8]) {
        let len = data.len().min(self.block_size);
        if let Some((evicted, _)) = self.cache.push(lba, data[..len].to_vec()) {
            if evicted != lba {
                log::trace!("[CACHE] Evicted block LBA={:#x}", evicted);
            }
        }
    }

    /// 清空缓存
    pub fn clear(&mut self) {
        self.cache.clear();
    }

    /// 清空缓存并修改块大小
    pub fn reset(&mut self, block_size: usize) {
        self.cache.clear();
        self.block_size = block_size;
    }

    /// 获取块大小
    pub fn block_size(&self) -> usize {
        self.block_size
    }

    /// 获取缓存容量
    pub fn capacity(&self) -> usize {
        self.cache.cap().get()
    }

    /// 当前缓存的块数
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
