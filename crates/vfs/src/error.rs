//! VFS 错误类型
//!
//! 定义了与 POSIX 兼容的文件系统错误码，可通过 [`FsError::to_errno()`] 转换为系统调用错误码。

use uapi::errno::{
    EACCES, EAGAIN, EBADF, EFBIG, EINVAL, EIO, EMFILE, ENFILE, ENODEV, ENOTSUP, EPIPE,
};

/// VFS 错误类型
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FsError {
    // 权限相关
    /// 文件未以所需方式打开 (-EACCES)
    PermissionDenied,

    // 文件描述符相关
    /// 无效的文件描述符 (-EBADF)
    BadFileDescriptor,
    /// 进程打开的文件过多 (-EMFILE)
    TooManyOpenFiles,
    /// 系统打开文件表已满 (-ENFILE)
    FileTableFull,

    // 参数相关
    /// 无效参数 (-EINVAL)
    InvalidArgument,

    // 文件系统相关
    /// I/O 错误或短写 (-EIO)
    IoError,
    /// 设备不存在或没有驱动 (-ENODEV)
    NoDevice,
    /// 写入会超过文件大小上限 (-EFBIG)
    FileTooLarge,

    // 管道相关
    /// 管道破裂 (-EPIPE)
    BrokenPipe,
    /// 非阻塞操作将阻塞 (-EAGAIN)
    WouldBlock,

    // 其他
    /// 操作不支持 (-ENOTSUP)
    NotSupported,
}

impl FsError {
    /// 转换为系统调用错误码（负数）
    pub fn to_errno(&self) -> isize {
        -match self {
            FsError::PermissionDenied => EACCES,
            FsError::BadFileDescriptor => EBADF,
            FsError::TooManyOpenFiles => EMFILE,
            FsError::FileTableFull => ENFILE,
            FsError::InvalidArgument => EINVAL,
            FsError::IoError => EIO,
            FsError::NoDevice => ENODEV,
            FsError::FileTooLarge => EFBIG,
            FsError::BrokenPipe => EPIPE,
            FsError::WouldBlock => EAGAIN,
            FsError::NotSupported => ENOTSUP,
        }
    }
}
