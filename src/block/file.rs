//! 文件镜像设备（需要 `std` 特性）

use super::BlockDevice;
use crate::consts::EXT_DEFAULT_SECTOR_SIZE;
use crate::error::Result;
use std::fs::File;
use std::io::{ErrorKind as IoErrorKind, Read, Seek, SeekFrom};
use std::path::Path;

/// 基于 `std::fs::File` 的只读块设备
#[derive(Debug)]
pub struct FileDevice {
    file: File,
    len: u64,
    sector_size: u32,
}

impl FileDevice {
    /// 以只读方式打开镜像文件
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path)?;
        Self::new(file)
    }

    /// 包装已打开的文件
    pub fn new(file: File) -> Result<Self> {
        let len = file.metadata()?.len();
        log::debug!("[BLOCK] file device opened, {} bytes", len);
        Ok(Self {
            file,
            len,
            sector_size: EXT_DEFAULT_SECTOR_SIZE,
        })
    }

    /// 镜像文件长度（字节）
    pub fn len(&self) -> u64 {
        self.len
    }

    /// 镜像是否为空
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

impl BlockDevice for FileDevice {
    fn sector_size(&self) -> u32 {
        self.sector_size
    }

    fn total_sectors(&self) -> u64 {
        self.len / self.sector_size as u64
    }

    fn read_sectors(&mut self, lba: u64, count: u32, buf: &mut [u8]) -> Result<usize> {
        let want = (count as usize * self.sector_size as usize).min(buf.len());
        self.file.seek(SeekFrom::Start(lba * self.sector_size as u64))?;

        // 读到缓冲区满或文件结束为止
        let mut filled = 0;
        while filled < want {
            match self.file.read(&mut buf[filled..want]) {
                Ok(0) => break,
                Ok(n) => filled += n,
                Err(e) if e.kind() == IoErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            }
        }

        Ok(filled)
    }
}
