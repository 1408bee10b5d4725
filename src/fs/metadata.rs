//! 文件元数据

use crate::inode::Inode;
use alloc::{string::String, vec::Vec};
use core::fmt;

/// 文件类型
///
/// 由 inode mode 决定；目录位优先判断
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileType {
    /// 普通文件
    RegularFile,
    /// 目录
    Directory,
    /// 既不是目录也不是普通文件
    Special,
}

impl FileType {
    /// 从 inode 解析文件类型
    pub fn from_inode(inode: &Inode) -> Self {
        if inode.is_dir() {
            FileType::Directory
        } else if inode.is_file() {
            FileType::RegularFile
        } else {
            FileType::Special
        }
    }

    /// 是否是目录
    pub fn is_dir(&self) -> bool {
        matches!(self, FileType::Directory)
    }

    /// 是否是普通文件
    pub fn is_file(&self) -> bool {
        matches!(self, FileType::RegularFile)
    }
}

impl fmt::Display for FileType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FileType::RegularFile => "Regular File",
            FileType::Directory => "Directory",
            FileType::Special => "Special File",
        };
        f.write_str(name)
    }
}

/// 目录列表中的一项
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListEntry {
    /// 名称
    pub name: String,
    /// Inode 编号
    pub inode: u32,
    /// 文件类型（来自目标 inode）
    pub file_type: FileType,
    /// 是否是目录
    pub is_directory: bool,
    /// 文件大小，只对普通文件有值
    pub size: Option<u32>,
}

impl ListEntry {
    pub(crate) fn new(name: String, inode: &Inode) -> Self {
        let file_type = FileType::from_inode(inode);

        Self {
            name,
            inode: inode.inode_num(),
            file_type,
            is_directory: file_type.is_dir(),
            size: file_type.is_file().then(|| inode.size()),
        }
    }
}

/// inode 详细信息
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InodeStat {
    /// Inode 编号
    pub inode_num: u32,
    /// 文件类型
    pub file_type: FileType,
    /// 原始 mode
    pub mode: u16,
    /// 文件大小（字节）
    pub size: u32,
    /// 占用块数（inode 中记录的值）
    pub blocks: u32,
    /// 非零直接块指针：(槽位, 块号)
    pub direct_blocks: Vec<(usize, u32)>,
    /// 一级间接块号
    pub indirect_block: Option<u32>,
    /// 间接块中非零指针的数量
    pub indirect_pointers: usize,
}

impl InodeStat {
    pub(crate) fn new(inode: &Inode, indirect_pointers: usize) -> Self {
        let direct_blocks = inode
            .direct_blocks()
            .iter()
            .copied()
            .enumerate()
            .filter(|&(_, block)| block != 0)
            .collect();
        let indirect = inode.get_indirect_block();

        Self {
            inode_num: inode.inode_num(),
            file_type: FileType::from_inode(inode),
            mode: inode.mode(),
            size: inode.size(),
            blocks: inode.blocks(),
            direct_blocks,
            indirect_block: (indirect != 0).then_some(indirect),
            indirect_pointers,
        }
    }

    /// 是否是目录
    pub fn is_dir(&self) -> bool {
        self.file_type.is_dir()
    }

    /// 是否是普通文件
    pub fn is_file(&self) -> bool {
        self.file_type.is_file()
    }
}
