//! 块设备核心类型

use crate::cache::BlockCache;
use crate::error::{Error, ErrorKind, Result};
use core::num::NonZeroUsize;

/// 块设备接口
///
/// 实现此 trait 以提供底层镜像访问。设备以扇区为单位随机读取，
/// 逻辑块大小由 [`BlockDev`] 决定（挂载后取 superblock 中的值）。
///
/// # 示例
///
/// ```rust,ignore
/// use extbrowse_core::{BlockDevice, Result};
///
/// struct MyDevice {
///     // ...
/// }
///
/// impl BlockDevice for MyDevice {
///     fn sector_size(&self) -> u32 {
///         512
///     }
///
///     fn total_sectors(&self) -> u64 {
///         2048
///     }
///
///     fn read_sectors(&mut self, lba: u64, count: u32, buf: &mut [u8]) -> Result<usize> {
///         // 实现扇区读取
///         Ok(count as usize * self.sector_size() as usize)
///     }
/// }
/// ```
pub trait BlockDevice {
    /// 物理扇区大小（通常 512）
    fn sector_size(&self) -> u32;

    /// 总扇区数
    fn total_sectors(&self) -> u64;

    /// 读取扇区
    ///
    /// # 参数
    ///
    /// * `lba` - 起始扇区号
    /// * `count` - 要读取的扇区数
    /// * `buf` - 目标缓冲区（大小至少为 count * sector_size）
    ///
    /// # 返回
    ///
    /// 成功返回实际读取的字节数，镜像末尾可能少于请求的字节数
    fn read_sectors(&mut self, lba: u64, count: u32, buf: &mut [u8]) -> Result<usize>;

    /// 打开设备
    ///
    /// 在开始使用设备前调用，默认实现什么都不做。
    fn open(&mut self) -> Result<()> {
        Ok(())
    }

    /// 关闭设备
    ///
    /// 在停止使用设备后调用，默认实现什么都不做。
    fn close(&mut self) -> Result<()> {
        Ok(())
    }
}

/// 块设备包装器
///
/// 为文件系统提供按逻辑块的只读访问，包含统计信息和可选的 LRU 块缓存。
///
/// # 并发使用
///
/// BlockDev 本身不包含内部锁，所有读取都需要 `&mut self`。
/// 对于多线程环境，用户应该把整个文件系统放进互斥锁：
///
/// ```rust,ignore
/// use std::sync::{Arc, Mutex};
///
/// let fs = Arc::new(Mutex::new(ExtFileSystem::mount(device)?));
/// ```
pub struct BlockDev<D> {
    /// 底层设备
    device: D,
    /// 逻辑块大小（字节）
    block_size: u32,
    /// 镜像总字节数
    total_bytes: u64,
    /// 逻辑读取次数（包括缓存命中）
    read_count: u64,
    /// 物理读取次数（实际设备操作）
    physical_read_count: u64,
    /// 块缓存（可选）
    pub(super) bcache: Option<BlockCache>,
}

impl<D: BlockDevice> BlockDev<D> {
    /// 创建新的块设备包装器（无缓存）
    ///
    /// # 参数
    ///
    /// * `device` - 底层块设备
    /// * `block_size` - 逻辑块大小，必须是扇区大小的整数倍
    pub fn new(device: D, block_size: u32) -> Result<Self> {
        Self::check_block_size(&device, block_size)?;

        let total_bytes = device.total_sectors() * device.sector_size() as u64;

        Ok(Self {
            device,
            block_size,
            total_bytes,
            read_count: 0,
            physical_read_count: 0,
            bcache: None,
        })
    }

    /// 创建带缓存的块设备包装器
    ///
    /// `cache_blocks` 为 0 时不启用缓存
    pub fn new_with_cache(device: D, block_size: u32, cache_blocks: usize) -> Result<Self> {
        let mut bd = Self::new(device, block_size)?;
        bd.bcache = NonZeroUsize::new(cache_blocks)
            .map(|capacity| BlockCache::new(capacity, block_size as usize));
        Ok(bd)
    }

    fn check_block_size(device: &D, block_size: u32) -> Result<()> {
        let sector_size = device.sector_size();

        if sector_size == 0 || block_size == 0 || block_size % sector_size != 0 {
            return Err(Error::new(
                ErrorKind::InvalidInput,
                "Block size must be a nonzero multiple of sector size",
            ));
        }

        Ok(())
    }

    /// 获取底层设备的引用
    pub fn device(&self) -> &D {
        &self.device
    }

    /// 获取底层设备的可变引用
    pub fn device_mut(&mut self) -> &mut D {
        &mut self.device
    }

    /// 取出底层设备
    pub fn into_device(self) -> D {
        self.device
    }

    /// 获取逻辑块大小
    pub fn block_size(&self) -> u32 {
        self.block_size
    }

    /// 修改逻辑块大小
    ///
    /// 挂载时用 superblock 中的块大小替换引导块大小。
    /// 块大小改变时缓存全部失效。
    pub fn set_block_size(&mut self, block_size: u32) -> Result<()> {
        if block_size == self.block_size {
            return Ok(());
        }

        Self::check_block_size(&self.device, block_size)?;
        self.block_size = block_size;

        if let Some(cache) = &mut self.bcache {
            cache.reset(block_size as usize);
        }

        Ok(())
    }

    /// 获取物理扇区大小
    pub fn sector_size(&self) -> u32 {
        self.device.sector_size()
    }

    /// 获取镜像可容纳的完整逻辑块数
    pub fn total_blocks(&self) -> u64 {
        self.total_bytes / self.block_size as u64
    }

    /// 获取逻辑读取次数（包括缓存命中）
    pub fn read_count(&self) -> u64 {
        self.read_count
    }

    /// 获取物理读取次数（实际设备操作）
    pub fn physical_read_count(&self) -> u64 {
        self.physical_read_count
    }

    /// 获取缓存命中率
    ///
    /// 返回 0.0 到 1.0 之间的值，表示缓存命中的百分比
    pub fn cache_hit_rate(&self) -> f64 {
        if self.read_count == 0 {
            return 0.0;
        }
        let hits = self.read_count.saturating_sub(self.physical_read_count);
        hits as f64 / self.read_count as f64
    }

    // 内部辅助方法

    /// 将逻辑块地址转换为物理扇区地址
    pub(super) fn logical_to_physical(&self, lba: u64) -> u64 {
        lba * self.block_size as u64 / self.device.sector_size() as u64
    }

    /// 每个逻辑块包含的物理扇区数
    pub(super) fn sectors_per_block(&self) -> u32 {
        self.block_size / self.device.sector_size()
    }

    /// 增加读计数
    pub(super) fn inc_read_count(&mut self) {
        self.read_count += 1;
    }

    /// 增加物理读计数
    pub(super) fn inc_physical_read_count(&mut self) {
        self.physical_read_count += 1;
    }

    // ===== 缓存管理接口 =====

    /// 获取缓存统计信息
    ///
    /// # 返回
    ///
    /// 如果启用了缓存，返回 Some(CacheStats)，否则返回 None
    pub fn cache_stats(&self) -> Option<crate::cache::CacheStats> {
        self.bcache.as_ref().map(|cache| cache.stats())
    }

    /// 检查是否启用了缓存
    pub fn has_cache(&self) -> bool {
        self.bcache.is_some()
    }

    /// 打开底层设备
    pub fn open(&mut self) -> Result<()> {
        self.device.open()
    }

    /// 关闭底层设备
    pub fn close(&mut self) -> Result<()> {
        if let Some(cache) = &mut self.bcache {
            cache.clear();
        }
        self.device.close()
    }
}
