//! Superblock 读取和验证

use crate::{
    block::{BlockDev, BlockDevice},
    consts::*,
    error::{Error, ErrorKind, Result},
    types::ext_sblock,
};
use alloc::string::String;

/// 从块设备读取 superblock
///
/// 以 `bdev` 当前的逻辑块大小读取 `EXT_SUPERBLOCK_LOCATION` 号块，
/// 按紧凑布局逐字段解析。除读取成功外不做任何校验。
///
/// # 错误
///
/// - `ErrorKind::ImageTooSmall` - 镜像无法提供完整的 superblock 块
pub fn read_superblock<D: BlockDevice>(bdev: &mut BlockDev<D>) -> Result<ext_sblock> {
    let buf = bdev.read_block_vec(EXT_SUPERBLOCK_LOCATION)?;
    ext_sblock::from_bytes(&buf)
}

/// Superblock 包装器，提供高级操作
#[derive(Debug, Clone)]
pub struct Superblock {
    pub(super) inner: ext_sblock,
}

impl Superblock {
    /// 从 ext_sblock 创建 Superblock（主要用于测试）
    pub fn new(inner: ext_sblock) -> Self {
        Self { inner }
    }

    /// 从块设备加载 superblock
    pub fn load<D: BlockDevice>(bdev: &mut BlockDev<D>) -> Result<Self> {
        let inner = read_superblock(bdev)?;
        log::debug!(
            "[MOUNT] superblock: block_size={} blocks={} inodes={} first_inode_block={}",
            inner.block_size,
            inner.blocks_count,
            inner.inodes_count,
            inner.first_inode_block
        );
        Ok(Self { inner })
    }

    /// 获取内部 superblock 结构的引用
    pub fn inner(&self) -> &ext_sblock {
        &self.inner
    }

    /// 获取块大小
    pub fn block_size(&self) -> u32 {
        self.inner.block_size
    }

    /// 获取总块数
    pub fn blocks_count(&self) -> u32 {
        self.inner.blocks_count
    }

    /// 获取总 inode 数
    pub fn inodes_count(&self) -> u32 {
        self.inner.inodes_count
    }

    /// 获取每组 inode 数
    pub fn inodes_per_group(&self) -> u32 {
        self.inner.inodes_per_group
    }

    /// 获取 inode 表起始块
    pub fn first_inode_block(&self) -> u32 {
        self.inner.first_inode_block
    }

    /// 获取第一个数据块
    pub fn first_data_block(&self) -> u32 {
        self.inner.first_data_block
    }

    /// 获取原始卷标字节
    pub fn label_bytes(&self) -> &[u8; EXT_LABEL_LEN] {
        &self.inner.label
    }

    /// 获取卷标的显示文本
    ///
    /// 截取到第一个 NUL（没有则取全部 32 字节），按 UTF-8 有损解码并去掉首尾空白
    pub fn disk_label(&self) -> String {
        let label = &self.inner.label;
        let len = label.iter().position(|&b| b == 0).unwrap_or(label.len());

        let text = match core::str::from_utf8(&label[..len]) {
            Ok(s) => String::from(s),
            Err(_) => {
                log::warn!("[MOUNT] disk label is not valid UTF-8");
                String::from_utf8_lossy(&label[..len]).into_owned()
            }
        };

        String::from(text.trim())
    }

    /// 每个块容纳的 inode 数
    pub fn inodes_per_block(&self, inode_size: u32) -> u32 {
        if inode_size == 0 {
            return 0;
        }
        self.block_size() / inode_size
    }

    /// 基本边界检查
    ///
    /// 检查后续计算依赖的字段：
    /// - 块大小非零、4 字节对齐、是扇区大小的整数倍、至少容纳一个 inode
    /// - inode 表不能从块 0 开始
    pub fn check(&self, sector_size: u32, inode_size: u32) -> Result<()> {
        let block_size = self.block_size();

        if block_size == 0 || block_size as usize % EXT_BLOCK_NUMBER_SIZE != 0 {
            return Err(Error::new(
                ErrorKind::Corrupted,
                "Superblock block_size is zero or misaligned",
            ));
        }

        if sector_size == 0 || block_size % sector_size != 0 {
            return Err(Error::new(
                ErrorKind::Corrupted,
                "Superblock block_size is not a multiple of sector size",
            ));
        }

        if (inode_size as usize) < EXT_INODE_RAW_SIZE || block_size < inode_size {
            return Err(Error::new(
                ErrorKind::Corrupted,
                "Block size cannot hold a single inode",
            ));
        }

        if self.first_inode_block() < 1 {
            return Err(Error::new(
                ErrorKind::Corrupted,
                "Superblock first_inode_block must be at least 1",
            ));
        }

        Ok(())
    }
}
