//! 错误类型定义
//!
//! 提供镜像浏览操作的错误类型。
//!
//! 错误分两层：
//! - 解码层（`ImageTooSmall`、`InvalidInode`、`MalformedDirectory`、
//!   `TruncatedContent`、`Corrupted`、`Io`）表示镜像损坏或截断，直接上报
//! - 查找层（`NotFound`、`NotADirectory`、`NotAFile`）是正常使用中的预期结果，
//!   由外层 shell 渲染给用户

use core::fmt;

/// 浏览操作错误
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Error {
    kind: ErrorKind,
    message: &'static str,
}

/// 错误类别
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum ErrorKind {
    /// 块设备无法提供请求的块
    ImageTooSmall,
    /// inode 编号为 0 或超出声明范围
    InvalidInode,
    /// 目录项长度为 0 或名称越界
    MalformedDirectory,
    /// 声明大小超过可解析的块
    TruncatedContent,
    /// 当前目录中不存在该名称
    NotFound,
    /// 目标存在但不是目录
    NotADirectory,
    /// 目标存在但不是普通文件
    NotAFile,
    /// superblock 字段不合法
    Corrupted,
    /// 无效参数
    InvalidInput,
    /// I/O 错误
    Io,
}

impl ErrorKind {
    /// 是否是查找层的预期结果（而不是镜像损坏）
    pub const fn is_lookup(self) -> bool {
        matches!(
            self,
            ErrorKind::NotFound | ErrorKind::NotADirectory | ErrorKind::NotAFile
        )
    }
}

impl Error {
    /// 创建新错误
    pub const fn new(kind: ErrorKind, message: &'static str) -> Self {
        Self { kind, message }
    }

    /// 创建带原因的错误（简化版，仅记录日志）
    ///
    /// 注意：在 no_std 环境下，cause 不会被保存
    pub fn with_cause(kind: ErrorKind, message: &'static str, cause: impl fmt::Debug) -> Self {
        log::debug!("[ERROR] {:?}: {} ({:?})", kind, message, cause);
        Self { kind, message }
    }

    /// 获取错误类型
    pub const fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// 获取错误消息
    pub const fn message(&self) -> &'static str {
        self.message
    }

    /// 是否是查找层的预期结果
    pub const fn is_lookup(&self) -> bool {
        self.kind.is_lookup()
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}: {}", self.kind, self.message)
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}

#[cfg(feature = "std")]
impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        match err.kind() {
            std::io::ErrorKind::UnexpectedEof => {
                Error::with_cause(ErrorKind::ImageTooSmall, "Unexpected end of image", err)
            }
            _ => Error::with_cause(ErrorKind::Io, "Device I/O error", err),
        }
    }
}

/// Result 类型别名
pub type Result<T> = core::result::Result<T, Error>;
