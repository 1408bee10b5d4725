//! 文件内容读取
//!
//! 按块序列读取 inode 的数据，并截断到 inode 声明的大小。

use crate::{
    block::{BlockDev, BlockDevice},
    error::{Error, ErrorKind, Result},
    indirect::IndirectBlockMapper,
    inode::Inode,
};
use alloc::{vec, vec::Vec};

/// 读取 inode 的全部内容
///
/// 返回的字节数恰好等于 `inode.size()`。每个块读取完整的一块，
/// 追加 `min(block_size, 剩余字节)`，够数后立即停止。
///
/// # 错误
///
/// - `ErrorKind::TruncatedContent` - 块序列耗尽时仍未达到声明大小
/// - `ErrorKind::ImageTooSmall` - 块号超出镜像范围
pub fn read_content<D: BlockDevice>(bdev: &mut BlockDev<D>, inode: &Inode) -> Result<Vec<u8>> {
    let size = inode.size() as usize;
    if size == 0 {
        return Ok(Vec::new());
    }

    let block_size = bdev.block_size() as usize;
    let blocks = IndirectBlockMapper::new(bdev.block_size()).resolve(bdev, inode)?;

    // 声明大小可能远大于实际可读的块，按可读上限预分配
    let mut contents = Vec::with_capacity(size.min(blocks.len() * block_size));
    let mut block = vec![0u8; block_size];

    for lba in &blocks {
        let remaining = size - contents.len();
        if remaining == 0 {
            break;
        }

        bdev.read_block(lba, &mut block)?;
        contents.extend_from_slice(&block[..remaining.min(block_size)]);
    }

    if contents.len() < size {
        log::debug!(
            "[CONTENT] inode {} truncated: {} of {} bytes resolvable",
            inode.inode_num(),
            contents.len(),
            size
        );
        return Err(Error::new(
            ErrorKind::TruncatedContent,
            "Declared size exceeds resolvable blocks",
        ));
    }

    Ok(contents)
}
