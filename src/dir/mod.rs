//! 目录操作模块
//!
//! 这个模块提供目录内容的解析和路径查找功能。
//!
//! ## 模块结构
//!
//! - `iterator` - 目录项迭代器，直接在目录内容的字节缓冲区上解析
//! - `lookup` - 在目录项列表中按名称查找
//! - `path_lookup` - 多级路径解析（支持 `.` 和 `..`）

pub mod iterator;
pub mod lookup;
pub mod path_lookup;

pub use iterator::{read_dir, DirEntry, DirIterator};
pub use lookup::find_entry_by_name;
pub use path_lookup::{lookup_path, PathComponent, PathLookup};
