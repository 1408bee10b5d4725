//! 路径查找
//!
//! 镜像中的目录不保证包含 `.` / `..` 条目，
//! 因此 `..` 通过 [`PathComponent`] 栈回退实现，不读取磁盘。

use crate::{
    block::BlockDevice,
    consts::EXT_ROOT_INODE,
    error::{Error, ErrorKind, Result},
    fs::ExtFileSystem,
};
use alloc::{
    string::{String, ToString},
    vec::Vec,
};

use super::{iterator::DirEntry, lookup::find_entry_by_name};

/// 路径中的一级目录
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathComponent {
    /// 目录名称
    pub name: String,
    /// 目录 inode 编号
    pub inode: u32,
}

/// 栈顶目录；空栈表示根目录
pub(crate) fn current_inode(stack: &[PathComponent]) -> u32 {
    stack.last().map_or(EXT_ROOT_INODE, |c| c.inode)
}

/// 路径查找器
///
/// 用于根据路径字符串查找 inode
pub struct PathLookup<'a, D: BlockDevice> {
    fs: &'a mut ExtFileSystem<D>,
}

impl<'a, D: BlockDevice> PathLookup<'a, D> {
    /// 创建新的路径查找器
    pub fn new(fs: &'a mut ExtFileSystem<D>) -> Self {
        Self { fs }
    }

    /// 在目录中查找指定名称的条目
    ///
    /// # 错误
    ///
    /// - `ErrorKind::NotFound` - 目录中没有该名称
    pub fn lookup_in_dir(&mut self, dir_inode: u32, name: &str) -> Result<DirEntry> {
        let dir = self.fs.get_inode(dir_inode)?;
        let entries = self.fs.list_entries(&dir)?;
        let entry = find_entry_by_name(&entries, name);

        if !entry.is_found() {
            return Err(Error::new(ErrorKind::NotFound, "No such entry in directory"));
        }

        Ok(entry)
    }

    /// 查找子目录
    ///
    /// # 返回
    ///
    /// 子目录的 inode 编号
    ///
    /// # 错误
    ///
    /// - `ErrorKind::NotFound` - 目录中没有该名称
    /// - `ErrorKind::NotADirectory` - 目标存在但不是目录
    pub fn enter_dir(&mut self, dir_inode: u32, name: &str) -> Result<u32> {
        let entry = self.lookup_in_dir(dir_inode, name)?;
        let target = self.fs.get_inode(entry.inode)?;

        if !target.is_dir() {
            return Err(Error::new(ErrorKind::NotADirectory, "Not a directory"));
        }

        Ok(entry.inode)
    }

    /// 沿路径移动目录栈
    ///
    /// 以 `/` 开头时从根目录开始；`.` 不移动，`..` 弹出一级（根目录下不动）。
    /// 出错时 `stack` 可能已部分修改，调用方需要自行回滚。
    pub fn walk(&mut self, stack: &mut Vec<PathComponent>, path: &str) -> Result<()> {
        if path.starts_with('/') {
            stack.clear();
        }

        for component in path.split('/').filter(|s| !s.is_empty()) {
            match component {
                "." => {}
                ".." => {
                    stack.pop();
                }
                name => {
                    let inode = self.enter_dir(current_inode(stack), name)?;
                    stack.push(PathComponent {
                        name: name.to_string(),
                        inode,
                    });
                }
            }
        }

        log::trace!("[NAV] walked {:?} to inode {}", path, current_inode(stack));
        Ok(())
    }

    /// 根据路径查找 inode
    ///
    /// 路径相对根目录解析。中间组件必须是目录，最后一个组件可以是任意类型；
    /// 路径以 `/` 结尾时最后一个组件也必须是目录。
    ///
    /// # 示例
    ///
    /// ```ignore
    /// let inode_num = PathLookup::new(&mut fs).find_inode("/bin/ls")?;
    /// ```
    pub fn find_inode(&mut self, path: &str) -> Result<u32> {
        self.find_inode_from(&[], path)
    }

    /// 从给定目录栈出发查找 inode
    ///
    /// 相对路径从 `start` 的栈顶目录开始，绝对路径忽略 `start`
    pub fn find_inode_from(&mut self, start: &[PathComponent], path: &str) -> Result<u32> {
        if path.is_empty() {
            return Err(Error::new(ErrorKind::InvalidInput, "Empty path"));
        }

        let trimmed = path.trim_end_matches('/');
        if trimmed.is_empty() {
            // 只有 "/" 的情况
            return Ok(EXT_ROOT_INODE);
        }

        let (parent, last) = match trimmed.rsplit_once('/') {
            Some(("", last)) => ("/", last),
            Some((parent, last)) => (parent, last),
            None => ("", trimmed),
        };

        let mut stack = start.to_vec();
        self.walk(&mut stack, parent)?;

        match last {
            "." | ".." => {
                self.walk(&mut stack, last)?;
                Ok(current_inode(&stack))
            }
            name if path.ends_with('/') => self.enter_dir(current_inode(&stack), name),
            name => Ok(self.lookup_in_dir(current_inode(&stack), name)?.inode),
        }
    }
}

/// 便捷函数：根据路径查找 inode
pub fn lookup_path<D: BlockDevice>(fs: &mut ExtFileSystem<D>, path: &str) -> Result<u32> {
    PathLookup::new(fs).find_inode(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::ImageBuilder;

    fn sample_fs() -> (ExtFileSystem<crate::block::MemoryDevice>, u32, u32, u32) {
        let mut img = ImageBuilder::new();
        let bin = img.add_dir();
        let ls = img.add_file(b"ELF");
        let etc = img.add_dir();
        img.link(ImageBuilder::ROOT, "bin", bin);
        img.link(ImageBuilder::ROOT, "etc", etc);
        img.link(bin, "ls", ls);
        (img.build_fs(), bin, ls, etc)
    }

    #[test]
    fn test_find_inode() {
        let (mut fs, bin, ls, _) = sample_fs();

        assert_eq!(lookup_path(&mut fs, "/").unwrap(), EXT_ROOT_INODE);
        assert_eq!(lookup_path(&mut fs, "/bin").unwrap(), bin);
        assert_eq!(lookup_path(&mut fs, "/bin/").unwrap(), bin);
        assert_eq!(lookup_path(&mut fs, "/bin/ls").unwrap(), ls);
        assert_eq!(lookup_path(&mut fs, "bin/ls").unwrap(), ls);
        assert_eq!(lookup_path(&mut fs, "/etc/../bin/./ls").unwrap(), ls);
        assert_eq!(lookup_path(&mut fs, "/..").unwrap(), EXT_ROOT_INODE);
    }

    #[test]
    fn test_find_inode_errors() {
        let (mut fs, ..) = sample_fs();

        assert_eq!(
            lookup_path(&mut fs, "").unwrap_err().kind(),
            ErrorKind::InvalidInput
        );
        assert_eq!(
            lookup_path(&mut fs, "/missing").unwrap_err().kind(),
            ErrorKind::NotFound
        );
        assert_eq!(
            lookup_path(&mut fs, "/bin/ls/x").unwrap_err().kind(),
            ErrorKind::NotADirectory
        );
    }

    #[test]
    fn test_trailing_slash_requires_directory() {
        let (mut fs, bin, ls, etc) = sample_fs();

        assert_eq!(lookup_path(&mut fs, "bin//").unwrap(), bin);
        assert_eq!(lookup_path(&mut fs, "/bin/../etc/").unwrap(), etc);
        assert_eq!(lookup_path(&mut fs, "/bin/ls").unwrap(), ls);
        assert_eq!(
            lookup_path(&mut fs, "/bin/ls/").unwrap_err().kind(),
            ErrorKind::NotADirectory
        );
        assert_eq!(
            lookup_path(&mut fs, "/bin/missing/").unwrap_err().kind(),
            ErrorKind::NotFound
        );
    }

    #[test]
    fn test_walk_stack() {
        let (mut fs, bin, _, etc) = sample_fs();
        let mut stack = Vec::new();

        PathLookup::new(&mut fs).walk(&mut stack, "bin").unwrap();
        assert_eq!(current_inode(&stack), bin);

        PathLookup::new(&mut fs).walk(&mut stack, "../etc").unwrap();
        assert_eq!(stack.len(), 1);
        assert_eq!(stack[0].name, "etc");
        assert_eq!(current_inode(&stack), etc);

        PathLookup::new(&mut fs).walk(&mut stack, "/").unwrap();
        assert!(stack.is_empty());
    }

    #[test]
    fn test_find_inode_from_stack() {
        let (mut fs, bin, ls, etc) = sample_fs();
        let stack = [PathComponent {
            name: "bin".to_string(),
            inode: bin,
        }];

        let mut lookup = PathLookup::new(&mut fs);
        assert_eq!(lookup.find_inode_from(&stack, "ls").unwrap(), ls);
        assert_eq!(lookup.find_inode_from(&stack, ".").unwrap(), bin);
        assert_eq!(lookup.find_inode_from(&stack, "..").unwrap(), EXT_ROOT_INODE);
        assert_eq!(lookup.find_inode_from(&stack, "../etc").unwrap(), etc);
        assert_eq!(lookup.find_inode_from(&stack, "/etc").unwrap(), etc);
        assert_eq!(
            lookup.find_inode_from(&stack, "etc").unwrap_err().kind(),
            ErrorKind::NotFound
        );
    }
}
