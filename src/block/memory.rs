//! 内存镜像设备

use super::BlockDevice;
use crate::consts::EXT_DEFAULT_SECTOR_SIZE;
use crate::error::{Error, ErrorKind, Result};
use alloc::vec::Vec;

/// 以 `Vec<u8>` 持有整个镜像的块设备
///
/// 镜像末尾不足一个扇区的字节不计入 `total_sectors`，但仍可被读到。
#[derive(Debug, Clone)]
pub struct MemoryDevice {
    data: Vec<u8>,
    sector_size: u32,
}

impl MemoryDevice {
    /// 使用默认扇区大小（512）创建
    pub fn new(data: Vec<u8>) -> Self {
        Self::with_sector_size(data, EXT_DEFAULT_SECTOR_SIZE)
    }

    /// 使用指定扇区大小创建
    pub fn with_sector_size(data: Vec<u8>, sector_size: u32) -> Self {
        Self { data, sector_size }
    }

    /// 镜像字节
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// 取出镜像
    pub fn into_inner(self) -> Vec<u8> {
        self.data
    }
}

impl BlockDevice for MemoryDevice {
    fn sector_size(&self) -> u32 {
        self.sector_size
    }

    fn total_sectors(&self) -> u64 {
        if self.sector_size == 0 {
            return 0;
        }
        self.data.len() as u64 / self.sector_size as u64
    }

    fn read_sectors(&mut self, lba: u64, count: u32, buf: &mut [u8]) -> Result<usize> {
        let start = lba as usize * self.sector_size as usize;
        let len = count as usize * self.sector_size as usize;

        if start >= self.data.len() {
            return Err(Error::new(
                ErrorKind::ImageTooSmall,
                "Sector lies beyond the end of the image",
            ));
        }

        let len = len.min(self.data.len() - start).min(buf.len());
        buf[..len].copy_from_slice(&self.data[start..start + len]);
        Ok(len)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    #[test]
    fn test_memory_device_geometry() {
        let dev = MemoryDevice::new(vec![0u8; 1300]);
        assert_eq!(dev.sector_size(), 512);
        assert_eq!(dev.total_sectors(), 2);
    }

    #[test]
    fn test_memory_device_short_tail() {
        let mut data = vec![0u8; 600];
        data[599] = 0x7F;
        let mut dev = MemoryDevice::new(data);

        let mut buf = vec![0u8; 512];
        let n = dev.read_sectors(1, 1, &mut buf).unwrap();
        assert_eq!(n, 88);
        assert_eq!(buf[87], 0x7F);

        assert_eq!(
            dev.read_sectors(2, 1, &mut buf).unwrap_err().kind(),
            ErrorKind::ImageTooSmall
        );
    }
}
