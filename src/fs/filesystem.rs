//! 文件系统核心结构

use crate::{
    block::{BlockDev, BlockDevice},
    cache::{CacheStats, InodeCache},
    consts::{EXT_FALLBACK_BLOCK_SIZES, EXT_ROOT_INODE},
    content,
    dir::{find_entry_by_name, lookup_path, read_dir, DirEntry},
    error::{Error, ErrorKind, Result},
    indirect::{BlockList, IndirectBlockMapper},
    inode::Inode,
    superblock::Superblock,
};
use alloc::{string::String, vec::Vec};
use core::num::NonZeroUsize;

use super::{
    metadata::{InodeStat, ListEntry},
    types::FsConfig,
};

/// 只读镜像文件系统
///
/// 挂载后持有块设备、superblock 以及可选的 inode 缓存。
///
/// # 示例
///
/// ```rust,ignore
/// use extbrowse_core::{ExtFileSystem, FileDevice};
///
/// let device = FileDevice::from_path("disk.img")?;
/// let mut fs = ExtFileSystem::mount(device)?;
///
/// println!("label: {}", fs.disk_label());
///
/// // 读取目录
/// for entry in fs.read_dir("/bin")? {
///     println!("{}", entry.name);
/// }
///
/// // 读取文件
/// let data = fs.read_file("/readme.txt")?;
/// ```
pub struct ExtFileSystem<D: BlockDevice> {
    bdev: BlockDev<D>,
    sb: Superblock,
    config: FsConfig,
    icache: Option<InodeCache>,
}

impl<D: BlockDevice> ExtFileSystem<D> {
    /// 使用默认配置挂载镜像
    pub fn mount(device: D) -> Result<Self> {
        Self::mount_with_config(device, FsConfig::default())
    }

    /// 挂载镜像
    ///
    /// 1. 以 `config.block_size` 为引导块大小读取块 1 作为 superblock，
    ///    即字节 `config.block_size * 1` 处（默认 512）
    /// 2. 校验 superblock 字段
    /// 3. 切换到 superblock 声明的块大小
    ///
    /// 如果引导块大小下的 superblock 校验失败，依次以
    /// [`EXT_FALLBACK_BLOCK_SIZES`] 重新读取块 1，只接受声明的块大小
    /// 与读取时所用块大小一致的 superblock。因此 superblock 位于
    /// 字节 1024 的 1024 字节块镜像也能用默认配置挂载。
    ///
    /// # 错误
    ///
    /// - `ErrorKind::ImageTooSmall` - 镜像不足以容纳 superblock
    /// - `ErrorKind::Corrupted` - superblock 字段不合法
    /// - `ErrorKind::InvalidInput` - 配置的块大小不是扇区大小的整数倍
    pub fn mount_with_config(device: D, config: FsConfig) -> Result<Self> {
        let mut bdev = BlockDev::new_with_cache(device, config.block_size, config.bcache_size)?;
        bdev.open()?;

        let sb = match Self::load_superblock(&mut bdev, &config) {
            Ok(sb) => sb,
            Err(err) if err.kind() == ErrorKind::Corrupted => {
                Self::load_superblock_fallback(&mut bdev, &config, err)?
            }
            Err(err) => return Err(err),
        };
        bdev.set_block_size(sb.block_size())?;

        log::info!(
            "[MOUNT] mounted {:?}: block_size={} blocks={} inodes={}",
            sb.disk_label(),
            sb.block_size(),
            sb.blocks_count(),
            sb.inodes_count()
        );

        if u64::from(sb.blocks_count()) > bdev.total_blocks() {
            log::warn!(
                "[MOUNT] superblock claims {} blocks, image holds {}",
                sb.blocks_count(),
                bdev.total_blocks()
            );
        }

        let icache = NonZeroUsize::new(config.icache_size).map(InodeCache::new);

        Ok(Self {
            bdev,
            sb,
            config,
            icache,
        })
    }

    fn load_superblock(bdev: &mut BlockDev<D>, config: &FsConfig) -> Result<Superblock> {
        let sb = Superblock::load(bdev)?;
        sb.check(bdev.sector_size(), config.inode_size)?;
        Ok(sb)
    }

    fn load_superblock_fallback(
        bdev: &mut BlockDev<D>,
        config: &FsConfig,
        err: Error,
    ) -> Result<Superblock> {
        for &block_size in EXT_FALLBACK_BLOCK_SIZES.iter() {
            if block_size == config.block_size || bdev.set_block_size(block_size).is_err() {
                continue;
            }

            match Self::load_superblock(bdev, config) {
                Ok(sb) if sb.block_size() == block_size => {
                    log::info!("[MOUNT] superblock found at byte {}", block_size);
                    return Ok(sb);
                }
                _ => log::debug!("[MOUNT] no superblock at byte {}", block_size),
            }
        }

        bdev.set_block_size(config.block_size)?;
        Err(err)
    }

    /// 卸载文件系统
    ///
    /// 关闭设备并返回其所有权
    pub fn unmount(mut self) -> Result<D> {
        self.bdev.close()?;
        Ok(self.bdev.into_device())
    }

    /// 获取 superblock 引用
    pub fn superblock(&self) -> &Superblock {
        &self.sb
    }

    /// 获取挂载配置
    pub fn config(&self) -> &FsConfig {
        &self.config
    }

    /// 获取块设备引用
    pub fn block_device(&self) -> &BlockDev<D> {
        &self.bdev
    }

    /// 卷标
    pub fn disk_label(&self) -> String {
        self.sb.disk_label()
    }

    /// 根目录 inode 编号
    pub fn root_inode(&self) -> u32 {
        EXT_ROOT_INODE
    }

    /// inode 缓存统计信息
    pub fn inode_cache_stats(&self) -> Option<CacheStats> {
        self.icache.as_ref().map(|cache| cache.stats())
    }

    // ===== inode 级接口 =====

    /// 读取 inode
    ///
    /// # 错误
    ///
    /// - `ErrorKind::InvalidInode` - 编号为 0 或超出 inodes_count
    /// - `ErrorKind::ImageTooSmall` - inode 所在块超出镜像
    pub fn get_inode(&mut self, inode_num: u32) -> Result<Inode> {
        if let Some(inode) = self.icache.as_mut().and_then(|cache| cache.get(inode_num)) {
            return Ok(inode);
        }

        let inode = Inode::load(&mut self.bdev, &self.sb, self.config.inode_size, inode_num)?;

        if let Some(cache) = &mut self.icache {
            cache.insert(inode.clone());
        }

        Ok(inode)
    }

    /// 生成 inode 的块序列
    pub fn resolve_blocks(&mut self, inode: &Inode) -> Result<BlockList> {
        IndirectBlockMapper::new(self.sb.block_size()).resolve(&mut self.bdev, inode)
    }

    /// 统计 inode 间接块中非零指针的数量
    pub fn count_indirect_pointers(&mut self, inode: &Inode) -> Result<usize> {
        IndirectBlockMapper::new(self.sb.block_size()).count_indirect_pointers(&mut self.bdev, inode)
    }

    /// 读取 inode 的全部内容
    pub fn read_content(&mut self, inode: &Inode) -> Result<Vec<u8>> {
        content::read_content(&mut self.bdev, inode)
    }

    /// 读取目录 inode 的所有条目（非目录返回空列表）
    pub fn list_entries(&mut self, dir: &Inode) -> Result<Vec<DirEntry>> {
        read_dir(&mut self.bdev, dir)
    }

    /// 在目录中查找名称
    ///
    /// 没有匹配时返回 [`DirEntry::not_found`]
    pub fn find_entry(&mut self, dir: &Inode, name: &str) -> Result<DirEntry> {
        let entries = self.list_entries(dir)?;
        Ok(find_entry_by_name(&entries, name))
    }

    /// 列出目录，并附带每个条目目标 inode 的类型和大小
    pub fn list_dir_inode(&mut self, dir_inode: u32) -> Result<Vec<ListEntry>> {
        let dir = self.get_inode(dir_inode)?;
        let entries = self.list_entries(&dir)?;

        let mut listing = Vec::with_capacity(entries.len());
        for entry in entries {
            let target = self.get_inode(entry.inode)?;
            listing.push(ListEntry::new(entry.name().into_owned(), &target));
        }

        Ok(listing)
    }

    /// 读取普通文件 inode 的内容
    ///
    /// # 错误
    ///
    /// - `ErrorKind::NotAFile` - 目标不是普通文件
    pub fn read_file_inode(&mut self, inode_num: u32) -> Result<Vec<u8>> {
        let inode = self.get_inode(inode_num)?;

        if !inode.is_file() {
            return Err(Error::new(ErrorKind::NotAFile, "Not a regular file"));
        }

        self.read_content(&inode)
    }

    /// 获取 inode 详细信息
    pub fn stat_inode(&mut self, inode_num: u32) -> Result<InodeStat> {
        let inode = self.get_inode(inode_num)?;
        let indirect_pointers = self.count_indirect_pointers(&inode)?;
        Ok(InodeStat::new(&inode, indirect_pointers))
    }

    // ===== 路径级接口 =====

    /// 根据路径查找 inode 编号（相对根目录）
    pub fn lookup(&mut self, path: &str) -> Result<u32> {
        lookup_path(self, path)
    }

    /// 读取目录
    ///
    /// # 错误
    ///
    /// - `ErrorKind::NotADirectory` - 路径指向的不是目录
    pub fn read_dir(&mut self, path: &str) -> Result<Vec<ListEntry>> {
        let inode_num = self.lookup(path)?;

        if !self.get_inode(inode_num)?.is_dir() {
            return Err(Error::new(ErrorKind::NotADirectory, "Not a directory"));
        }

        self.list_dir_inode(inode_num)
    }

    /// 读取文件
    pub fn read_file(&mut self, path: &str) -> Result<Vec<u8>> {
        let inode_num = self.lookup(path)?;
        self.read_file_inode(inode_num)
    }

    /// 获取路径的 inode 详细信息
    pub fn metadata(&mut self, path: &str) -> Result<InodeStat> {
        let inode_num = self.lookup(path)?;
        self.stat_inode(inode_num)
    }

    /// 检查路径是否存在
    pub fn exists(&mut self, path: &str) -> bool {
        self.lookup(path).is_ok()
    }
}
