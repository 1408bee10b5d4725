//! 块 I/O 操作实现

use super::{BlockDev, BlockDevice};
use crate::error::{Error, ErrorKind, Result};
use alloc::{vec, vec::Vec};

impl<D: BlockDevice> BlockDev<D> {
    /// 读取单个逻辑块
    ///
    /// 从指定逻辑块地址读取一个完整的块到缓冲区。
    /// 如果启用了缓存，优先从缓存读取；缓存未命中则从设备读取并填充缓存。
    ///
    /// # 参数
    ///
    /// * `lba` - 逻辑块地址（从 0 开始）
    /// * `buf` - 目标缓冲区（大小至少为 block_size）
    ///
    /// # 错误
    ///
    /// - `ErrorKind::ImageTooSmall` - 镜像无法提供完整的块
    /// - `ErrorKind::InvalidInput` - 缓冲区太小
    pub fn read_block(&mut self, lba: u64, buf: &mut [u8]) -> Result<usize> {
        let block_size = self.block_size() as usize;

        if buf.len() < block_size {
            return Err(Error::new(
                ErrorKind::InvalidInput,
                "buffer too small for block",
            ));
        }

        if lba >= self.total_blocks() {
            log::debug!(
                "[BLOCK] read LBA={} beyond image ({} blocks)",
                lba,
                self.total_blocks()
            );
            return Err(Error::new(
                ErrorKind::ImageTooSmall,
                "Block lies beyond the end of the image",
            ));
        }

        self.inc_read_count();

        if let Some(cache) = &mut self.bcache {
            if let Some(data) = cache.get(lba) {
                buf[..block_size].copy_from_slice(data);
                return Ok(block_size);
            }
        }

        let pba = self.logical_to_physical(lba);
        let count = self.sectors_per_block();
        self.inc_physical_read_count();
        let n = self.device_mut().read_sectors(pba, count, &mut buf[..block_size])?;

        if n < block_size {
            return Err(Error::new(
                ErrorKind::ImageTooSmall,
                "Short read from block device",
            ));
        }

        if let Some(cache) = &mut self.bcache {
            cache.insert(lba, &buf[..block_size]);
        }

        Ok(block_size)
    }

    /// 读取单个逻辑块到新分配的缓冲区
    pub fn read_block_vec(&mut self, lba: u64) -> Result<Vec<u8>> {
        let mut buf = vec![0u8; self.block_size() as usize];
        self.read_block(lba, &mut buf)?;
        Ok(buf)
    }
}
