//! Superblock 操作模块
//!
//! 这个模块提供 superblock 的读取和基本边界检查。挂载时读取一次，之后不可变。

mod read;

pub use read::*;
