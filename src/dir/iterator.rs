//! 目录迭代器
//!
//! 目录内容就是一串变长记录：8 字节头部 + 名称 + 填充。
//! 迭代器不做任何 I/O，只在已经读出的目录内容上移动偏移。

use crate::{
    block::{BlockDev, BlockDevice},
    consts::EXT_DIR_ENTRY_HEADER_LEN,
    content::read_content,
    error::{Error, ErrorKind, Result},
    inode::Inode,
    types::ext_dir_entry,
};
use alloc::{borrow::Cow, string::String, vec::Vec};

/// 目录项
///
/// 名称保存原始字节，比较时按字节精确匹配
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirEntry {
    /// Inode 编号（0 表示未找到）
    pub inode: u32,
    /// 记录总长度
    pub rec_len: u16,
    /// 名称长度
    pub name_len: u8,
    /// 类型提示（不权威，以 inode mode 为准）
    pub file_type: u8,
    /// 名称原始字节
    pub name: Vec<u8>,
}

impl DirEntry {
    /// 未找到的哨兵值（inode 为 0）
    pub fn not_found() -> Self {
        Self {
            inode: 0,
            rec_len: 0,
            name_len: 0,
            file_type: 0,
            name: Vec::new(),
        }
    }

    /// 是否指向有效 inode
    pub fn is_found(&self) -> bool {
        self.inode != 0
    }

    /// 名称原始字节
    pub fn name_bytes(&self) -> &[u8] {
        &self.name
    }

    /// 名称（非 UTF-8 字节按替换字符显示）
    pub fn name(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.name)
    }

    /// 名称是否与 `name` 逐字节相同
    pub fn matches(&self, name: &str) -> bool {
        self.name == name.as_bytes()
    }
}

/// 目录迭代器
///
/// 产生存活的目录项（跳过 inode 为 0 的记录）。
/// 遇到格式错误时产生一次错误，之后结束。
pub struct DirIterator<'a> {
    /// 目录内容
    data: &'a [u8],
    /// 当前记录偏移
    offset: usize,
    /// 是否已遇到错误
    failed: bool,
}

impl<'a> DirIterator<'a> {
    /// 在目录内容上创建迭代器
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            data,
            offset: 0,
            failed: false,
        }
    }

    /// 是否到达目录末尾
    pub fn is_at_end(&self) -> bool {
        self.failed || self.offset >= self.data.len()
    }

    /// 获取下一个目录项
    ///
    /// # 返回
    ///
    /// - `Ok(Some(DirEntry))` - 下一个存活的目录项
    /// - `Ok(None)` - 已到达目录末尾
    /// - `Err(_)` - `MalformedDirectory`：头部越界、`rec_len` 为 0 或名称越界
    pub fn next_entry(&mut self) -> Result<Option<DirEntry>> {
        loop {
            if self.is_at_end() {
                return Ok(None);
            }

            let offset = self.offset;
            let len = self.data.len();

            if offset + EXT_DIR_ENTRY_HEADER_LEN > len {
                return Err(self.fail(offset, "Directory entry header extends beyond directory"));
            }

            let header = ext_dir_entry::from_bytes(&self.data[offset..])?;

            if header.rec_len == 0 {
                return Err(self.fail(offset, "Directory entry has zero rec_len"));
            }

            let name_start = offset + EXT_DIR_ENTRY_HEADER_LEN;
            let name_end = name_start + header.name_len as usize;

            if name_end > len {
                return Err(self.fail(offset, "Directory entry name extends beyond directory"));
            }

            // rec_len 越过末尾时不报错，下一轮循环自然结束
            self.offset = offset.saturating_add(header.rec_len as usize);

            // 跳过已删除的目录项
            if header.inode == 0 {
                continue;
            }

            return Ok(Some(DirEntry {
                inode: header.inode,
                rec_len: header.rec_len,
                name_len: header.name_len,
                file_type: header.file_type,
                name: self.data[name_start..name_end].to_vec(),
            }));
        }
    }

    fn fail(&mut self, offset: usize, message: &'static str) -> Error {
        log::debug!("[DIR] malformed entry at offset {}: {}", offset, message);
        self.failed = true;
        Error::new(ErrorKind::MalformedDirectory, message)
    }
}

impl Iterator for DirIterator<'_> {
    type Item = Result<DirEntry>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_entry().transpose()
    }
}

/// 便捷函数：读取目录中的所有条目
///
/// 非目录 inode 返回空列表（不报错），顺序与磁盘上一致。
///
/// # 参数
///
/// * `bdev` - 块设备
/// * `inode` - 目录 inode
pub fn read_dir<D: BlockDevice>(bdev: &mut BlockDev<D>, inode: &Inode) -> Result<Vec<DirEntry>> {
    if !inode.is_dir() {
        return Ok(Vec::new());
    }

    let content = read_content(bdev, inode)?;
    let entries = DirIterator::new(&content).collect::<Result<Vec<_>>>()?;

    log::trace!(
        "[DIR] inode {}: {} entries in {} bytes",
        inode.inode_num(),
        entries.len(),
        content.len()
    );

    Ok(entries)
}
