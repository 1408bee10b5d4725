//! 间接块映射器实现
//!
//! 计算 inode 数据所在的有序物理块序列，透明展开一级间接块。

use crate::block::{BlockDev, BlockDevice};
use crate::consts::{EXT_BLOCK_NUMBER_SIZE, EXT_INODE_DIRECT_BLOCKS};
use crate::error::Result;
use crate::inode::Inode;
use alloc::vec::Vec;
use byteorder::{ByteOrder, LittleEndian};

/// 已解析的块序列
///
/// 有限且可重复遍历：`iter()` 可以调用任意多次
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BlockList {
    blocks: Vec<u64>,
    direct_count: usize,
}

impl BlockList {
    /// 按文件顺序遍历物理块号
    pub fn iter(&self) -> impl Iterator<Item = u64> + '_ {
        self.blocks.iter().copied()
    }

    /// 块数量
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    /// 是否为空
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// 来自直接块指针的块数量
    pub fn direct_count(&self) -> usize {
        self.direct_count
    }

    /// 来自间接块的块数量
    pub fn indirect_count(&self) -> usize {
        self.blocks.len() - self.direct_count
    }

    /// 以切片形式访问
    pub fn as_slice(&self) -> &[u64] {
        &self.blocks
    }
}

/// 间接块映射器
///
/// 用于计算间接块容量并生成 inode 的块序列。
pub struct IndirectBlockMapper {
    /// 块大小（字节）
    block_size: u32,

    /// 每个间接块可以容纳的指针数量 (block_size / 4)
    blocks_per_indirect: u32,
}

impl IndirectBlockMapper {
    /// 创建新的间接块映射器
    ///
    /// # 参数
    ///
    /// - `block_size`: 文件系统块大小（字节）
    pub fn new(block_size: u32) -> Self {
        Self {
            block_size,
            blocks_per_indirect: block_size / EXT_BLOCK_NUMBER_SIZE as u32,
        }
    }

    /// 每个间接块可以容纳的指针数量
    pub fn blocks_per_indirect(&self) -> u32 {
        self.blocks_per_indirect
    }

    /// 单个 inode 最多可寻址的块数（12 + block_size / 4）
    pub fn max_blocks(&self) -> u64 {
        EXT_INODE_DIRECT_BLOCKS as u64 + self.blocks_per_indirect as u64
    }

    /// 生成 inode 的块序列
    ///
    /// 分两个阶段：
    /// 1. 直接块：在 `i * block_size < size` 且指针非零时依次输出，遇到 0 立即停止
    /// 2. 若仍有剩余字节且存在间接块：读取间接块，按序输出指针，
    ///    直到覆盖剩余字节或遇到 0
    ///
    /// 直接块阶段遇到 0 只结束直接块阶段，间接块阶段照常进行。
    /// 输出的块数永远不超过覆盖 `size` 所需的块数。
    pub fn resolve<D: BlockDevice>(
        &self,
        blockdev: &mut BlockDev<D>,
        inode: &Inode,
    ) -> Result<BlockList> {
        let size = inode.size() as u64;
        let block_size = self.block_size as u64;
        let mut blocks = Vec::new();

        if size == 0 || block_size == 0 {
            return Ok(BlockList::default());
        }

        // 1. 直接块
        for (i, &block) in inode.direct_blocks().iter().enumerate() {
            if i as u64 * block_size >= size {
                break;
            }
            if block == 0 {
                log::warn!(
                    "[INDIRECT] inode {} direct pointer {} is 0 before EOF, stopping direct range",
                    inode.inode_num(),
                    i
                );
                break;
            }
            blocks.push(block as u64);
        }
        let direct_count = blocks.len();

        // 2. 一级间接块
        let covered = direct_count as u64 * block_size;
        let indirect_block = inode.get_indirect_block();

        if covered < size && indirect_block != 0 {
            let remaining = size - covered;
            let blocks_needed = ((remaining + block_size - 1) / block_size) as usize;

            let pointers = self.read_block_pointers(blockdev, indirect_block as u64)?;
            for &pointer in pointers.iter().take(blocks_needed) {
                if pointer == 0 {
                    break;
                }
                blocks.push(pointer as u64);
            }
        }

        log::trace!(
            "[INDIRECT] inode {} resolved {} blocks ({} direct)",
            inode.inode_num(),
            blocks.len(),
            direct_count
        );

        Ok(BlockList {
            blocks,
            direct_count,
        })
    }

    /// 统计间接块中非零指针的数量
    ///
    /// 扫描全部 `block_size / 4` 个槽位；没有间接块时返回 0
    pub fn count_indirect_pointers<D: BlockDevice>(
        &self,
        blockdev: &mut BlockDev<D>,
        inode: &Inode,
    ) -> Result<usize> {
        let indirect_block = inode.get_indirect_block();
        if indirect_block == 0 {
            return Ok(0);
        }

        let pointers = self.read_block_pointers(blockdev, indirect_block as u64)?;
        Ok(pointers.iter().filter(|&&p| p != 0).count())
    }

    /// 读取间接块并按小端序解释为块号数组
    fn read_block_pointers<D: BlockDevice>(
        &self,
        blockdev: &mut BlockDev<D>,
        indirect_block: u64,
    ) -> Result<Vec<u32>> {
        let buf = blockdev.read_block_vec(indirect_block)?;

        let count = (self.blocks_per_indirect as usize).min(buf.len() / EXT_BLOCK_NUMBER_SIZE);
        let mut pointers = alloc::vec![0u32; count];
        LittleEndian::read_u32_into(&buf[..count * EXT_BLOCK_NUMBER_SIZE], &mut pointers);

        Ok(pointers)
    }
}

impl<'a> IntoIterator for &'a BlockList {
    type Item = u64;
    type IntoIter = core::iter::Copied<core::slice::Iter<'a, u64>>;

    fn into_iter(self) -> Self::IntoIter {
        self.blocks.iter().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::ImageBuilder;
    use crate::types::ext_inode;

    #[test]
    fn test_mapper_initialization() {
        let mapper = IndirectBlockMapper::new(4096);
        assert_eq!(mapper.blocks_per_indirect(), 1024);
        assert_eq!(mapper.max_blocks(), 12 + 1024);

        let mapper = IndirectBlockMapper::new(512);
        assert_eq!(mapper.blocks_per_indirect(), 128);
        assert_eq!(mapper.max_blocks(), 140);
    }

    #[test]
    fn test_empty_file_has_no_blocks() {
        let mut img = ImageBuilder::new();
        let file = img.add_file(b"");
        let (mut bdev, sb) = img.build_bdev();
        let inode = Inode::load(&mut bdev, &sb, 128, file).unwrap();

        let list = IndirectBlockMapper::new(512).resolve(&mut bdev, &inode).unwrap();
        assert!(list.is_empty());
    }

    #[test]
    fn test_direct_only() {
        let mut img = ImageBuilder::new();
        let file = img.add_file(&[7u8; 512 * 3]);
        let (mut bdev, sb) = img.build_bdev();
        let inode = Inode::load(&mut bdev, &sb, 128, file).unwrap();

        let list = IndirectBlockMapper::new(512).resolve(&mut bdev, &inode).unwrap();
        assert_eq!(list.len(), 3);
        assert_eq!(list.direct_count(), 3);
        assert_eq!(list.indirect_count(), 0);
        for (lba, &direct) in list.iter().zip(inode.direct_blocks()) {
            assert_eq!(lba, direct as u64);
        }
    }

    #[test]
    fn test_direct_and_indirect() {
        // 12 个直接块 + 5 个间接块（最后一块不满）
        let mut img = ImageBuilder::new();
        let file = img.add_file(&alloc::vec![1u8; 512 * 16 + 1]);
        let (mut bdev, sb) = img.build_bdev();
        let inode = Inode::load(&mut bdev, &sb, 128, file).unwrap();

        let mapper = IndirectBlockMapper::new(512);
        let list = mapper.resolve(&mut bdev, &inode).unwrap();
        assert_eq!(list.len(), 17);
        assert_eq!(list.direct_count(), 12);
        assert_eq!(list.indirect_count(), 5);
        assert_eq!(mapper.count_indirect_pointers(&mut bdev, &inode).unwrap(), 5);

        // 可以重复遍历
        let first: Vec<u64> = list.iter().collect();
        let second: Vec<u64> = (&list).into_iter().collect();
        assert_eq!(first, second);
    }

    #[test]
    fn test_never_emits_more_than_size_needs() {
        // 直接块指针比 size 需要的多
        let mut img = ImageBuilder::new();
        let data_blocks: Vec<u32> = (0..4).map(|_| img.alloc_block(&[0u8; 512])).collect();
        let mut raw = ext_inode {
            mode: 0x8000,
            size: 600,
            ..Default::default()
        };
        raw.direct_blocks[..4].copy_from_slice(&data_blocks);
        let file = img.add_raw_inode(raw);
        let (mut bdev, sb) = img.build_bdev();
        let inode = Inode::load(&mut bdev, &sb, 128, file).unwrap();

        let list = IndirectBlockMapper::new(512).resolve(&mut bdev, &inode).unwrap();
        assert_eq!(list.len(), 2);
    }

    #[test]
    fn test_zero_direct_pointer_stops_direct_phase() {
        // 直接块 [a, 0, b]：只输出 a，然后转入间接块
        let mut img = ImageBuilder::new();
        let a = img.alloc_block(&[b'a'; 512]);
        let b = img.alloc_block(&[b'b'; 512]);
        let c = img.alloc_block(&[b'c'; 512]);
        let indirect = img.alloc_pointer_block(&[c]);
        let mut raw = ext_inode {
            mode: 0x8000,
            size: 512 * 3,
            indirect_block: indirect,
            ..Default::default()
        };
        raw.direct_blocks[0] = a;
        raw.direct_blocks[2] = b;
        let file = img.add_raw_inode(raw);
        let (mut bdev, sb) = img.build_bdev();
        let inode = Inode::load(&mut bdev, &sb, 128, file).unwrap();

        let list = IndirectBlockMapper::new(512).resolve(&mut bdev, &inode).unwrap();
        assert_eq!(list.as_slice(), &[a as u64, c as u64]);
        assert_eq!(list.direct_count(), 1);
    }

    #[test]
    fn test_zero_indirect_pointer_stops() {
        let mut img = ImageBuilder::new();
        let x = img.alloc_block(&[0u8; 512]);
        let y = img.alloc_block(&[0u8; 512]);
        let indirect = img.alloc_pointer_block(&[x, 0, y]);
        let raw = ext_inode {
            mode: 0x8000,
            size: 512 * 3,
            indirect_block: indirect,
            ..Default::default()
        };
        let file = img.add_raw_inode(raw);
        let (mut bdev, sb) = img.build_bdev();
        let inode = Inode::load(&mut bdev, &sb, 128, file).unwrap();

        let mapper = IndirectBlockMapper::new(512);
        let list = mapper.resolve(&mut bdev, &inode).unwrap();
        assert_eq!(list.as_slice(), &[x as u64]);
        assert_eq!(mapper.count_indirect_pointers(&mut bdev, &inode).unwrap(), 2);
    }
}
