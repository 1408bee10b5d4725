//! Inode 读取和操作

use crate::{
    block::{BlockDev, BlockDevice},
    consts::*,
    error::{Error, ErrorKind, Result},
    superblock::Superblock,
    types::ext_inode,
};
use bitflags::bitflags;

bitflags! {
    /// Inode 模式位
    ///
    /// 两位都没有设置的 inode 视为特殊文件
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct InodeMode: u16 {
        /// 目录
        const DIRECTORY = EXT_INODE_MODE_DIRECTORY;
        /// 普通文件
        const REGULAR   = EXT_INODE_MODE_FILE;
    }
}

/// inode 在 inode 表中的位置
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InodeLocation {
    /// 所在块号
    pub block: u64,
    /// 块内字节偏移
    pub offset: usize,
}

/// 计算 inode 的位置
///
/// `index = inode_num - 1`，
/// `block = first_inode_block + index / inodes_per_block`，
/// `offset = (index % inodes_per_block) * inode_size`
///
/// # 错误
///
/// - `ErrorKind::InvalidInode` - 编号为 0，或超出 superblock 声明的 inode 数
pub fn locate_inode(sb: &Superblock, inode_size: u32, inode_num: u32) -> Result<InodeLocation> {
    if inode_num == 0 {
        return Err(Error::new(
            ErrorKind::InvalidInode,
            "Invalid inode number (0)",
        ));
    }

    // inodes_count 为 0 的镜像不做上限检查
    let inodes_count = sb.inodes_count();
    if inodes_count != 0 && inode_num > inodes_count {
        return Err(Error::new(
            ErrorKind::InvalidInode,
            "Inode number exceeds inodes_count",
        ));
    }

    let inodes_per_block = sb.inodes_per_block(inode_size);
    if inodes_per_block == 0 {
        return Err(Error::new(
            ErrorKind::Corrupted,
            "Block size cannot hold a single inode",
        ));
    }

    let index = inode_num - 1;
    Ok(InodeLocation {
        block: sb.first_inode_block() as u64 + (index / inodes_per_block) as u64,
        offset: ((index % inodes_per_block) * inode_size) as usize,
    })
}

/// 从块设备读取 inode
///
/// # 参数
///
/// * `bdev` - 块设备引用
/// * `sb` - superblock 引用
/// * `inode_size` - inode 记录宽度（字节）
/// * `inode_num` - inode 编号（从 1 开始）
///
/// # 说明
///
/// inode 编号从 1 开始，0 在整个系统中用作"未找到"哨兵，不能被解引用
pub fn read_inode<D: BlockDevice>(
    bdev: &mut BlockDev<D>,
    sb: &Superblock,
    inode_size: u32,
    inode_num: u32,
) -> Result<ext_inode> {
    let loc = locate_inode(sb, inode_size, inode_num)?;
    log::trace!(
        "[INODE] read inode {} at block {} offset {}",
        inode_num,
        loc.block,
        loc.offset
    );

    let buf = bdev.read_block_vec(loc.block)?;
    let record = buf.get(loc.offset..).ok_or(Error::new(
        ErrorKind::Corrupted,
        "Inode offset beyond block",
    ))?;
    ext_inode::from_bytes(record)
}

/// Inode 包装器，提供高级操作
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Inode {
    pub(super) inner: ext_inode,
    pub(super) inode_num: u32,
}

impl Inode {
    /// 从块设备加载 inode
    pub fn load<D: BlockDevice>(
        bdev: &mut BlockDev<D>,
        sb: &Superblock,
        inode_size: u32,
        inode_num: u32,
    ) -> Result<Self> {
        let inner = read_inode(bdev, sb, inode_size, inode_num)?;
        Ok(Self { inner, inode_num })
    }

    /// 从原始 inode 数据创建
    pub fn from_raw(inner: ext_inode, inode_num: u32) -> Self {
        Self { inner, inode_num }
    }

    /// 获取 inode 编号
    pub fn inode_num(&self) -> u32 {
        self.inode_num
    }

    /// 获取内部 inode 结构的引用
    pub fn inner(&self) -> &ext_inode {
        &self.inner
    }

    /// 获取文件模式
    pub fn mode(&self) -> u16 {
        self.inner.mode
    }

    /// 获取模式位
    pub fn mode_flags(&self) -> InodeMode {
        InodeMode::from_bits_retain(self.inner.mode)
    }

    /// 获取文件大小（字节）
    pub fn size(&self) -> u32 {
        self.inner.size
    }

    /// 获取占用块数
    pub fn blocks(&self) -> u32 {
        self.inner.blocks
    }

    /// 检查是否是目录
    pub fn is_dir(&self) -> bool {
        self.mode_flags().contains(InodeMode::DIRECTORY)
    }

    /// 检查是否是普通文件
    pub fn is_file(&self) -> bool {
        self.mode_flags().contains(InodeMode::REGULAR)
    }

    /// 获取直接块指针
    ///
    /// # 参数
    ///
    /// * `index` - 块索引（0-11）
    ///
    /// # 返回
    ///
    /// 块号，如果索引无效则返回 None
    pub fn get_direct_block(&self, index: usize) -> Option<u32> {
        self.inner.direct_blocks.get(index).copied()
    }

    /// 获取全部直接块指针
    pub fn direct_blocks(&self) -> &[u32; EXT_INODE_DIRECT_BLOCKS] {
        &self.inner.direct_blocks
    }

    /// 获取间接块指针（0 表示没有）
    pub fn get_indirect_block(&self) -> u32 {
        self.inner.indirect_block
    }
}
