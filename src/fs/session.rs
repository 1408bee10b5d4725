//! 导航会话
//!
//! 维护当前工作目录，提供 ls / cd / cat / pwd / stat 对应的操作。
//! 会话只保存路径栈，每个操作显式传入文件系统。

use crate::{
    block::BlockDevice,
    dir::{path_lookup::current_inode, PathComponent, PathLookup},
    error::{Error, ErrorKind, Result},
};
use alloc::{string::String, vec::Vec};

use super::{
    filesystem::ExtFileSystem,
    metadata::{InodeStat, ListEntry},
};

/// `change_directory` 的结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Navigation {
    /// 进入了一个子目录
    Entered,
    /// 返回了上一级目录
    Ascended,
    /// `.`：不移动
    Stayed,
    /// 已经在根目录，`..` 不移动
    AlreadyAtRoot,
    /// 多级或绝对路径
    Moved,
}

/// 导航器
///
/// 路径栈为空表示位于根目录；栈顶是当前目录。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Navigator {
    stack: Vec<PathComponent>,
}

impl Navigator {
    /// 在根目录创建导航器
    pub fn new() -> Self {
        Self::default()
    }

    /// 当前目录的 inode 编号
    pub fn current_inode(&self) -> u32 {
        current_inode(&self.stack)
    }

    /// 是否位于根目录
    pub fn is_at_root(&self) -> bool {
        self.stack.is_empty()
    }

    /// 当前深度（根目录为 0）
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    /// 路径组件，根目录表示为开头的 `/`
    pub fn path_components(&self) -> Vec<&str> {
        let mut components = Vec::with_capacity(self.stack.len() + 1);
        components.push("/");
        components.extend(self.stack.iter().map(|c| c.name.as_str()));
        components
    }

    /// 当前路径，根目录为 `/`，其余形如 `/a/b`
    pub fn print_working_directory(&self) -> String {
        if self.stack.is_empty() {
            return String::from("/");
        }

        let mut path = String::new();
        for component in &self.stack {
            path.push('/');
            path.push_str(&component.name);
        }
        path
    }

    /// 列出当前目录
    pub fn list_directory<D: BlockDevice>(
        &self,
        fs: &mut ExtFileSystem<D>,
    ) -> Result<Vec<ListEntry>> {
        fs.list_dir_inode(self.current_inode())
    }

    /// 切换目录
    ///
    /// - `.` 不移动
    /// - `..` 返回上一级，根目录下报告 [`Navigation::AlreadyAtRoot`]
    /// - 单个名称进入当前目录下的子目录
    /// - 包含 `/` 的路径逐级解析，任何一级失败时当前目录保持不变
    /// - 结尾的 `/` 被忽略，`bin/` 等同于 `bin`
    ///
    /// # 错误
    ///
    /// - `ErrorKind::InvalidInput` - 参数为空
    /// - `ErrorKind::NotFound` - 名称不存在
    /// - `ErrorKind::NotADirectory` - 目标不是目录
    pub fn change_directory<D: BlockDevice>(
        &mut self,
        fs: &mut ExtFileSystem<D>,
        target: &str,
    ) -> Result<Navigation> {
        let target = match target.trim_end_matches('/') {
            "" if !target.is_empty() => "/",
            trimmed => trimmed,
        };

        match target {
            "" => Err(Error::new(ErrorKind::InvalidInput, "Missing directory name")),
            "." => Ok(self.stay()),
            ".." => Ok(self.ascend()),
            name if !name.contains('/') => self.descend(fs, name),
            path => {
                let mut stack = self.stack.clone();
                PathLookup::new(fs).walk(&mut stack, path)?;
                self.stack = stack;
                log::debug!("[NAV] cd {} -> {}", path, self.print_working_directory());
                Ok(Navigation::Moved)
            }
        }
    }

    /// 进入当前目录下名为 `name` 的子目录
    pub fn descend<D: BlockDevice>(
        &mut self,
        fs: &mut ExtFileSystem<D>,
        name: &str,
    ) -> Result<Navigation> {
        let inode = PathLookup::new(fs).enter_dir(self.current_inode(), name)?;
        self.stack.push(PathComponent {
            name: String::from(name),
            inode,
        });
        log::debug!("[NAV] entered {} (inode {})", name, inode);
        Ok(Navigation::Entered)
    }

    /// `.`：留在当前目录
    pub fn stay(&self) -> Navigation {
        Navigation::Stayed
    }

    /// 返回上一级目录
    pub fn ascend(&mut self) -> Navigation {
        match self.stack.pop() {
            Some(_) => Navigation::Ascended,
            None => Navigation::AlreadyAtRoot,
        }
    }

    /// 读取文件内容
    ///
    /// `name` 相对当前目录解析（可以是多级路径）
    ///
    /// # 错误
    ///
    /// - `ErrorKind::NotFound` - 名称不存在
    /// - `ErrorKind::NotAFile` - 目标不是普通文件
    /// - `ErrorKind::TruncatedContent` - 文件内容无法完整解析
    pub fn read_file<D: BlockDevice>(
        &self,
        fs: &mut ExtFileSystem<D>,
        name: &str,
    ) -> Result<Vec<u8>> {
        let inode_num = PathLookup::new(fs).find_inode_from(&self.stack, name)?;
        fs.read_file_inode(inode_num)
    }

    /// 获取条目的 inode 详细信息
    ///
    /// `name` 相对当前目录解析，`.` 表示当前目录
    pub fn stat<D: BlockDevice>(
        &self,
        fs: &mut ExtFileSystem<D>,
        name: &str,
    ) -> Result<InodeStat> {
        let inode_num = PathLookup::new(fs).find_inode_from(&self.stack, name)?;
        fs.stat_inode(inode_num)
    }
}
