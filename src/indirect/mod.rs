//! 块指针解析
//!
//! 直接块 + 一级间接块寻址（ext2 风格）。不支持二级/三级间接块。

mod mapper;

pub use mapper::{BlockList, IndirectBlockMapper};
