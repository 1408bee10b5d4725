//! 镜像格式常量定义
//!
//! 这个模块包含了简化版 ext2 镜像的所有常量定义，包括：
//! - 磁盘布局相关常量
//! - 文件类型位
//! - 各磁盘结构的字段偏移

//=============================================================================
// 基础常量
//=============================================================================

/// 默认扇区大小（512 字节）
pub const EXT_DEFAULT_SECTOR_SIZE: u32 = 512;

/// 默认逻辑块大小（512 字节），用于挂载时定位 superblock
pub const EXT_DEFAULT_BLOCK_SIZE: u32 = 512;

/// 默认 inode 记录大小（字节）
pub const EXT_DEFAULT_INODE_SIZE: u32 = 128;

/// 块号的字节宽度
pub const EXT_BLOCK_NUMBER_SIZE: usize = 4;

//=============================================================================
// Superblock 相关
//=============================================================================

/// Superblock 所在的块号（块 0 保留为引导块）
pub const EXT_SUPERBLOCK_LOCATION: u64 = 1;

/// 引导块大小下 superblock 无效时依次尝试的块大小
///
/// 按这些块大小布局的镜像，superblock 位于字节 `block_size * 1` 处
pub const EXT_FALLBACK_BLOCK_SIZES: [u32; 3] = [1024, 2048, 4096];

/// Superblock 的有效字节数
pub const EXT_SUPERBLOCK_SIZE: usize = 56;

/// 卷标长度（字节，不保证以 NUL 结尾）
pub const EXT_LABEL_LEN: usize = 32;

/// Root inode 编号
pub const EXT_ROOT_INODE: u32 = 2;

// Superblock 字段偏移
pub(crate) const SB_OFF_LABEL: usize = 0;
pub(crate) const SB_OFF_BLOCK_SIZE: usize = 32;
pub(crate) const SB_OFF_BLOCKS_COUNT: usize = 36;
pub(crate) const SB_OFF_INODES_COUNT: usize = 40;
pub(crate) const SB_OFF_INODES_PER_GROUP: usize = 44;
pub(crate) const SB_OFF_FIRST_INODE_BLOCK: usize = 48;
pub(crate) const SB_OFF_FIRST_DATA_BLOCK: usize = 52;

//=============================================================================
// Inode 相关
//=============================================================================

/// 直接块指针数量
pub const EXT_INODE_DIRECT_BLOCKS: usize = 12;

/// Inode 的有效字节数（其余为保留）
pub const EXT_INODE_RAW_SIZE: usize = 62;

/// 目录
pub const EXT_INODE_MODE_DIRECTORY: u16 = 0x4000;

/// 普通文件
pub const EXT_INODE_MODE_FILE: u16 = 0x8000;

// Inode 字段偏移
pub(crate) const INODE_OFF_MODE: usize = 0;
pub(crate) const INODE_OFF_SIZE: usize = 2;
pub(crate) const INODE_OFF_BLOCKS: usize = 6;
pub(crate) const INODE_OFF_DIRECT: usize = 10;
pub(crate) const INODE_OFF_INDIRECT: usize = 58;

//=============================================================================
// 目录项相关
//=============================================================================

/// 目录项固定头部长度（inode + rec_len + name_len + file_type）
pub const EXT_DIR_ENTRY_HEADER_LEN: usize = 8;

/// 最大文件名长度
pub const EXT_NAME_MAX: usize = 255;

/// 目录项类型：未知
pub const EXT_DE_UNKNOWN: u8 = 0;

/// 目录项类型：普通文件
pub const EXT_DE_REG_FILE: u8 = 1;

/// 目录项类型：目录
pub const EXT_DE_DIR: u8 = 2;

// 目录项字段偏移
pub(crate) const DE_OFF_INODE: usize = 0;
pub(crate) const DE_OFF_REC_LEN: usize = 4;
pub(crate) const DE_OFF_NAME_LEN: usize = 6;
pub(crate) const DE_OFF_FILE_TYPE: usize = 7;
