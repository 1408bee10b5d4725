//! 磁盘格式数据结构定义
//!
//! 这个模块包含了直接对应磁盘格式的数据结构。
//!
//! ## 设计原则
//!
//! 1. **磁盘格式结构** - 保留 C 风格命名（便于对照磁盘布局）
//! 2. **显式编解码** - 所有字段按小端序逐个解析，不依赖内存布局和编译器填充
//! 3. **辅助方法** - 提供 Rust 风格的访问器和工具函数

#![allow(non_camel_case_types)] // 允许C风格命名

use crate::consts::*;
use crate::error::{Error, ErrorKind, Result};
use byteorder::{ByteOrder, LittleEndian};

//=============================================================================
// 磁盘格式结构定义
//=============================================================================

/// Superblock 结构
///
/// 紧凑布局，共 56 字节：
///
/// ```text
/// 0   label[32]
/// 32  block_size
/// 36  blocks_count
/// 40  inodes_count
/// 44  inodes_per_group
/// 48  first_inode_block
/// 52  first_data_block
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ext_sblock {
    pub label: [u8; EXT_LABEL_LEN], // 0: 卷标（不保证 NUL 结尾）
    pub block_size: u32,            // 32: 块大小
    pub blocks_count: u32,          // 36: 总块数
    pub inodes_count: u32,          // 40: 总 inode 数
    pub inodes_per_group: u32,      // 44: 每组 inode 数
    pub first_inode_block: u32,     // 48: inode 表起始块
    pub first_data_block: u32,      // 52: 第一个数据块
}

impl ext_sblock {
    /// 从原始字节解析
    pub fn from_bytes(buf: &[u8]) -> Result<Self> {
        if buf.len() < EXT_SUPERBLOCK_SIZE {
            return Err(Error::new(
                ErrorKind::InvalidInput,
                "Buffer too small for superblock",
            ));
        }

        let mut label = [0u8; EXT_LABEL_LEN];
        label.copy_from_slice(&buf[SB_OFF_LABEL..SB_OFF_LABEL + EXT_LABEL_LEN]);

        Ok(Self {
            label,
            block_size: LittleEndian::read_u32(&buf[SB_OFF_BLOCK_SIZE..]),
            blocks_count: LittleEndian::read_u32(&buf[SB_OFF_BLOCKS_COUNT..]),
            inodes_count: LittleEndian::read_u32(&buf[SB_OFF_INODES_COUNT..]),
            inodes_per_group: LittleEndian::read_u32(&buf[SB_OFF_INODES_PER_GROUP..]),
            first_inode_block: LittleEndian::read_u32(&buf[SB_OFF_FIRST_INODE_BLOCK..]),
            first_data_block: LittleEndian::read_u32(&buf[SB_OFF_FIRST_DATA_BLOCK..]),
        })
    }

    /// 编码到字节缓冲区（用于构造镜像）
    pub fn write_to(&self, buf: &mut [u8]) -> Result<()> {
        if buf.len() < EXT_SUPERBLOCK_SIZE {
            return Err(Error::new(
                ErrorKind::InvalidInput,
                "Buffer too small for superblock",
            ));
        }

        buf[SB_OFF_LABEL..SB_OFF_LABEL + EXT_LABEL_LEN].copy_from_slice(&self.label);
        LittleEndian::write_u32(&mut buf[SB_OFF_BLOCK_SIZE..], self.block_size);
        LittleEndian::write_u32(&mut buf[SB_OFF_BLOCKS_COUNT..], self.blocks_count);
        LittleEndian::write_u32(&mut buf[SB_OFF_INODES_COUNT..], self.inodes_count);
        LittleEndian::write_u32(&mut buf[SB_OFF_INODES_PER_GROUP..], self.inodes_per_group);
        LittleEndian::write_u32(&mut buf[SB_OFF_FIRST_INODE_BLOCK..], self.first_inode_block);
        LittleEndian::write_u32(&mut buf[SB_OFF_FIRST_DATA_BLOCK..], self.first_data_block);
        Ok(())
    }

    /// 从字符串创建卷标（超出 32 字节的部分被截断）
    pub fn label_from_str(name: &str) -> [u8; EXT_LABEL_LEN] {
        let mut label = [0u8; EXT_LABEL_LEN];
        let bytes = name.as_bytes();
        let len = bytes.len().min(EXT_LABEL_LEN);
        label[..len].copy_from_slice(&bytes[..len]);
        label
    }
}

/// Inode 结构
///
/// 有效字段共 62 字节，位于 `inode_size` 宽的记录开头，其余字节保留：
///
/// ```text
/// 0   mode (u16)
/// 2   size
/// 6   blocks
/// 10  direct_blocks[12]
/// 58  indirect_block
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ext_inode {
    pub mode: u16,                                      // 0: 文件模式
    pub size: u32,                                      // 2: 文件大小（字节）
    pub blocks: u32,                                    // 6: 占用块数
    pub direct_blocks: [u32; EXT_INODE_DIRECT_BLOCKS], // 10: 直接块指针
    pub indirect_block: u32,                            // 58: 一级间接块指针
}

impl ext_inode {
    /// 从原始字节解析
    pub fn from_bytes(buf: &[u8]) -> Result<Self> {
        if buf.len() < EXT_INODE_RAW_SIZE {
            return Err(Error::new(
                ErrorKind::InvalidInput,
                "Buffer too small for inode",
            ));
        }

        let mut direct_blocks = [0u32; EXT_INODE_DIRECT_BLOCKS];
        LittleEndian::read_u32_into(
            &buf[INODE_OFF_DIRECT..INODE_OFF_INDIRECT],
            &mut direct_blocks,
        );

        Ok(Self {
            mode: LittleEndian::read_u16(&buf[INODE_OFF_MODE..]),
            size: LittleEndian::read_u32(&buf[INODE_OFF_SIZE..]),
            blocks: LittleEndian::read_u32(&buf[INODE_OFF_BLOCKS..]),
            direct_blocks,
            indirect_block: LittleEndian::read_u32(&buf[INODE_OFF_INDIRECT..]),
        })
    }

    /// 编码到字节缓冲区（用于构造镜像）
    pub fn write_to(&self, buf: &mut [u8]) -> Result<()> {
        if buf.len() < EXT_INODE_RAW_SIZE {
            return Err(Error::new(
                ErrorKind::InvalidInput,
                "Buffer too small for inode",
            ));
        }

        LittleEndian::write_u16(&mut buf[INODE_OFF_MODE..], self.mode);
        LittleEndian::write_u32(&mut buf[INODE_OFF_SIZE..], self.size);
        LittleEndian::write_u32(&mut buf[INODE_OFF_BLOCKS..], self.blocks);
        LittleEndian::write_u32_into(
            &self.direct_blocks,
            &mut buf[INODE_OFF_DIRECT..INODE_OFF_INDIRECT],
        );
        LittleEndian::write_u32(&mut buf[INODE_OFF_INDIRECT..], self.indirect_block);
        Ok(())
    }

    /// 检查是否是目录
    pub fn is_dir(&self) -> bool {
        self.mode & EXT_INODE_MODE_DIRECTORY != 0
    }

    /// 检查是否是普通文件
    pub fn is_file(&self) -> bool {
        self.mode & EXT_INODE_MODE_FILE != 0
    }
}

/// 目录项头部
///
/// 名称（`name_len` 字节）紧跟在 8 字节头部之后：
///
/// ```text
/// 0  inode
/// 4  rec_len (u16)
/// 6  name_len (u8)
/// 7  file_type (u8)
/// 8  name[name_len]
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ext_dir_entry {
    pub inode: u32,    // 0: 目标 inode 编号，0 表示已删除
    pub rec_len: u16,  // 4: 记录总长度（含名称和填充）
    pub name_len: u8,  // 6: 名称长度
    pub file_type: u8, // 7: 类型提示（不权威）
}

impl ext_dir_entry {
    /// 从原始字节解析头部
    pub fn from_bytes(buf: &[u8]) -> Result<Self> {
        if buf.len() < EXT_DIR_ENTRY_HEADER_LEN {
            return Err(Error::new(
                ErrorKind::MalformedDirectory,
                "Directory entry header extends beyond content",
            ));
        }

        Ok(Self {
            inode: LittleEndian::read_u32(&buf[DE_OFF_INODE..]),
            rec_len: LittleEndian::read_u16(&buf[DE_OFF_REC_LEN..]),
            name_len: buf[DE_OFF_NAME_LEN],
            file_type: buf[DE_OFF_FILE_TYPE],
        })
    }

    /// 编码头部和名称到字节缓冲区（用于构造镜像）
    pub fn write_to(&self, name: &[u8], buf: &mut [u8]) -> Result<()> {
        let end = EXT_DIR_ENTRY_HEADER_LEN + name.len();
        if buf.len() < end || name.len() != self.name_len as usize {
            return Err(Error::new(
                ErrorKind::InvalidInput,
                "Buffer too small for directory entry",
            ));
        }

        LittleEndian::write_u32(&mut buf[DE_OFF_INODE..], self.inode);
        LittleEndian::write_u16(&mut buf[DE_OFF_REC_LEN..], self.rec_len);
        buf[DE_OFF_NAME_LEN] = self.name_len;
        buf[DE_OFF_FILE_TYPE] = self.file_type;
        buf[EXT_DIR_ENTRY_HEADER_LEN..end].copy_from_slice(name);
        Ok(())
    }
}
