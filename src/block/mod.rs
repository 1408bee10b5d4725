//! 块设备抽象
//!
//! 提供块设备接口和块级只读 I/O 操作。
//! block/device.rs 定义设备 trait 和包装器 BlockDev，以及缓存管理接口
//! block/io.rs 提供按逻辑块读取的函数，读取先查 cache，未命中再调用设备接口
//! block/memory.rs 和 block/file.rs 提供内存镜像和文件镜像两种设备实现

mod device;
mod io;
mod memory;
#[cfg(feature = "std")]
mod file;

pub use device::{BlockDevice, BlockDev};
pub use memory::MemoryDevice;
#[cfg(feature = "std")]
pub use file::FileDevice;
