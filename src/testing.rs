//! 测试用镜像构造工具
//!
//! 布局固定为：块 0 引导块，字节 512 起为 superblock（可改为块 1 起），
//! 块 2 起为 inode 表，其后是数据块。

use crate::{
    block::{BlockDev, MemoryDevice},
    consts::*,
    fs::ExtFileSystem,
    superblock::Superblock,
    types::{ext_dir_entry, ext_inode, ext_sblock},
};
use alloc::{collections::BTreeMap, vec, vec::Vec};
use byteorder::{ByteOrder, LittleEndian};

const INODES_COUNT: u32 = 96;
const FIRST_INODE_BLOCK: u32 = 2;
const INODE_SIZE: u32 = EXT_DEFAULT_INODE_SIZE;

/// 构造一条目录记录，长度为 `max(rec_len, 8 + name.len())`
pub(crate) fn dir_record(inode: u32, name: &[u8], file_type: u8, rec_len: u16) -> Vec<u8> {
    let len = (rec_len as usize).max(EXT_DIR_ENTRY_HEADER_LEN + name.len());
    let mut buf = vec![0u8; len];
    ext_dir_entry {
        inode,
        rec_len,
        name_len: name.len() as u8,
        file_type,
    }
    .write_to(name, &mut buf)
    .unwrap();
    buf
}

enum DirContent {
    Records(Vec<(u32, Vec<u8>, u8)>),
    Raw(Vec<u8>),
}

impl DirContent {
    fn encode(&self) -> Vec<u8> {
        match self {
            DirContent::Raw(bytes) => bytes.clone(),
            DirContent::Records(records) => {
                let mut out = Vec::new();
                for (inode, name, file_type) in records {
                    let rec_len = (EXT_DIR_ENTRY_HEADER_LEN + name.len() + 3) & !3;
                    out.extend(dir_record(*inode, name, *file_type, rec_len as u16));
                }
                out
            }
        }
    }
}

/// 内存镜像构造器
pub(crate) struct ImageBuilder {
    block_size: u32,
    label: [u8; EXT_LABEL_LEN],
    inodes: Vec<ext_inode>,
    used: Vec<bool>,
    dirs: BTreeMap<u32, DirContent>,
    blocks: Vec<Vec<u8>>,
    superblock_in_own_block: bool,
}

impl ImageBuilder {
    /// Root inode 编号
    pub const ROOT: u32 = EXT_ROOT_INODE;

    /// 512 字节块的空镜像（只有根目录）
    pub fn new() -> Self {
        Self::with_block_size(EXT_DEFAULT_BLOCK_SIZE)
    }

    /// 指定块大小的空镜像
    pub fn with_block_size(block_size: u32) -> Self {
        let mut img = Self {
            block_size,
            label: ext_sblock::label_from_str("extbrowse"),
            inodes: vec![ext_inode::default(); INODES_COUNT as usize],
            used: vec![false; INODES_COUNT as usize],
            dirs: BTreeMap::new(),
            blocks: Vec::new(),
            superblock_in_own_block: false,
        };
        // inode 1 保留
        img.used[0] = true;
        img.add_dir_as(Self::ROOT);
        img
    }

    /// 设置卷标
    pub fn set_label(&mut self, label: &str) {
        self.label = ext_sblock::label_from_str(label);
    }

    /// superblock 写在本镜像块大小的块 1 处，而非固定的字节 512
    pub fn place_superblock_in_block_one(&mut self) {
        self.superblock_in_own_block = true;
    }

    fn first_data_block(&self) -> u32 {
        let table_bytes = INODES_COUNT * INODE_SIZE;
        FIRST_INODE_BLOCK + (table_bytes + self.block_size - 1) / self.block_size
    }

    fn next_free_inode(&self) -> u32 {
        let index = self.used.iter().position(|used| !used).expect("inode table full");
        index as u32 + 1
    }

    fn claim(&mut self, num: u32, inode: ext_inode) {
        let index = num as usize - 1;
        assert!(!self.used[index], "inode {} already in use", num);
        self.used[index] = true;
        self.inodes[index] = inode;
    }

    /// 分配一个数据块（不足一块时补零）
    pub fn alloc_block(&mut self, data: &[u8]) -> u32 {
        let block_size = self.block_size as usize;
        assert!(data.len() <= block_size);

        let mut block = vec![0u8; block_size];
        block[..data.len()].copy_from_slice(data);
        self.blocks.push(block);
        self.first_data_block() + self.blocks.len() as u32 - 1
    }

    /// 分配一个间接块，内容为给定的块号
    pub fn alloc_pointer_block(&mut self, pointers: &[u32]) -> u32 {
        let mut block = vec![0u8; pointers.len() * EXT_BLOCK_NUMBER_SIZE];
        LittleEndian::write_u32_into(pointers, &mut block);
        self.alloc_block(&block)
    }

    /// 把数据写入数据块，并填写 inode 的块指针
    fn store(&mut self, inode: &mut ext_inode, data: &[u8]) {
        let block_size = self.block_size as usize;
        let blocks: Vec<u32> = data
            .chunks(block_size)
            .map(|chunk| self.alloc_block(chunk))
            .collect();

        let per_indirect = block_size / EXT_BLOCK_NUMBER_SIZE;
        assert!(blocks.len() <= EXT_INODE_DIRECT_BLOCKS + per_indirect, "file too large");

        let direct = blocks.len().min(EXT_INODE_DIRECT_BLOCKS);
        inode.direct_blocks[..direct].copy_from_slice(&blocks[..direct]);

        let mut total = blocks.len() as u32;
        if blocks.len() > EXT_INODE_DIRECT_BLOCKS {
            inode.indirect_block = self.alloc_pointer_block(&blocks[EXT_INODE_DIRECT_BLOCKS..]);
            total += 1;
        }

        inode.size = data.len() as u32;
        inode.blocks = total;
    }

    /// 添加普通文件
    pub fn add_file(&mut self, data: &[u8]) -> u32 {
        let num = self.next_free_inode();
        self.add_file_as(num, data);
        num
    }

    /// 以指定 inode 编号添加普通文件
    pub fn add_file_as(&mut self, num: u32, data: &[u8]) {
        let mut inode = ext_inode {
            mode: EXT_INODE_MODE_FILE | 0o644,
            ..Default::default()
        };
        self.store(&mut inode, data);
        self.claim(num, inode);
    }

    /// 添加空目录
    pub fn add_dir(&mut self) -> u32 {
        let num = self.next_free_inode();
        self.add_dir_as(num);
        num
    }

    /// 以指定 inode 编号添加空目录
    pub fn add_dir_as(&mut self, num: u32) {
        let inode = ext_inode {
            mode: EXT_INODE_MODE_DIRECTORY | 0o755,
            ..Default::default()
        };
        self.claim(num, inode);
        self.dirs.insert(num, DirContent::Records(Vec::new()));
    }

    /// 添加内容为原始字节的目录
    pub fn add_raw_dir(&mut self, content: Vec<u8>) -> u32 {
        let num = self.add_dir();
        self.dirs.insert(num, DirContent::Raw(content));
        num
    }

    /// 添加原始 inode（块指针由调用方负责）
    pub fn add_raw_inode(&mut self, inode: ext_inode) -> u32 {
        let num = self.next_free_inode();
        self.claim(num, inode);
        num
    }

    /// 在目录 `parent` 中添加指向 `child` 的条目
    pub fn link(&mut self, parent: u32, name: &str, child: u32) {
        let child_inode = &self.inodes[child as usize - 1];
        let file_type = if child_inode.is_dir() {
            EXT_DE_DIR
        } else if child_inode.is_file() {
            EXT_DE_REG_FILE
        } else {
            EXT_DE_UNKNOWN
        };

        match self.dirs.get_mut(&parent) {
            Some(DirContent::Records(records)) => {
                records.push((child, name.as_bytes().to_vec(), file_type))
            }
            _ => panic!("inode {} is not a builder directory", parent),
        }
    }

    /// 生成镜像字节
    pub fn build(mut self) -> Vec<u8> {
        let dirs = core::mem::take(&mut self.dirs);
        for (num, content) in &dirs {
            let mut inode = self.inodes[*num as usize - 1];
            self.store(&mut inode, &content.encode());
            self.inodes[*num as usize - 1] = inode;
        }

        let block_size = self.block_size as usize;
        let first_data_block = self.first_data_block();
        let total_blocks = first_data_block as usize + self.blocks.len();
        let mut image = vec![0u8; total_blocks * block_size];

        let sb = ext_sblock {
            label: self.label,
            block_size: self.block_size,
            blocks_count: total_blocks as u32,
            inodes_count: INODES_COUNT,
            inodes_per_group: INODES_COUNT,
            first_inode_block: FIRST_INODE_BLOCK,
            first_data_block,
        };
        let sb_block_size = if self.superblock_in_own_block {
            block_size
        } else {
            EXT_DEFAULT_BLOCK_SIZE as usize
        };
        let sb_offset = EXT_SUPERBLOCK_LOCATION as usize * sb_block_size;
        sb.write_to(&mut image[sb_offset..]).unwrap();

        let table = FIRST_INODE_BLOCK as usize * block_size;
        for (i, inode) in self.inodes.iter().enumerate() {
            let offset = table + i * INODE_SIZE as usize;
            inode.write_to(&mut image[offset..]).unwrap();
        }

        for (i, block) in self.blocks.iter().enumerate() {
            let offset = (first_data_block as usize + i) * block_size;
            image[offset..offset + block_size].copy_from_slice(block);
        }

        image
    }

    /// 生成镜像并返回已切换到镜像块大小的块设备和 superblock
    pub fn build_bdev(self) -> (BlockDev<MemoryDevice>, Superblock) {
        let block_size = self.block_size;
        let bootstrap = if self.superblock_in_own_block {
            block_size
        } else {
            EXT_DEFAULT_BLOCK_SIZE
        };
        let mut bdev = BlockDev::new(MemoryDevice::new(self.build()), bootstrap).unwrap();
        let sb = Superblock::load(&mut bdev).unwrap();
        bdev.set_block_size(block_size).unwrap();
        (bdev, sb)
    }

    /// 生成镜像并挂载
    pub fn build_fs(self) -> ExtFileSystem<MemoryDevice> {
        ExtFileSystem::mount(MemoryDevice::new(self.build())).unwrap()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout() {
        let mut img = ImageBuilder::new();
        let file = img.add_file(b"abc");
        assert_eq!(file, 3);
        let image = img.build();

        let sb = ext_sblock::from_bytes(&image[512..]).unwrap();
        assert_eq!(sb.block_size, 512);
        assert_eq!(sb.first_inode_block, 2);
        assert_eq!(sb.blocks_count as usize * 512, image.len());
    }

    #[test]
    fn test_dir_records_fill_content() {
        let content = DirContent::Records(vec![(3, b"abc".to_vec(), 1), (4, b"defgh".to_vec(), 2)]);
        let bytes = content.encode();
        assert_eq!(bytes.len(), 12 + 16);
        assert_eq!(LittleEndian::read_u16(&bytes[4..]), 12);
        assert_eq!(LittleEndian::read_u16(&bytes[16..]), 16);
    }
}
