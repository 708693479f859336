//! 映射操作的错误类型

use uapi::errno::{EACCES, EINVAL, EIO, ENOENT, ENOMEM, ENOTSUP};

/// mmap / munmap 失败原因
///
/// 系统调用层会把 map 的所有失败折叠为 `MAP_FAILED`，
/// munmap 的失败则通过 [`MmapError::to_errno()`] 返回负的错误码。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MmapError {
    /// 参数非法：长度为 0、未对齐的地址、无效的共享方式或文件描述符 (-EINVAL)
    InvalidArgument,
    /// 共享映射要求文件同时可读可写 (-EACCES)
    PermissionDenied,
    /// 进程映射数达到上限，或全局描述符池已满 (-ENOMEM)
    ResourceExhausted,
    /// 映射窗口内找不到足够大的空闲区间 (-ENOMEM)
    NoSpace,
    /// 没有单个映射覆盖要解除的区间 (-ENOENT)
    NotFound,
    /// 脏页写回文件失败 (-EIO)
    Io,
    /// 要解除的区间严格位于某个映射内部 (-ENOTSUP)
    UnsupportedRange,
}

impl MmapError {
    /// 转换为系统调用错误码（负数）
    pub fn to_errno(&self) -> isize {
        match self {
            MmapError::InvalidArgument => -EINVAL,
            MmapError::PermissionDenied => -EACCES,
            MmapError::ResourceExhausted | MmapError::NoSpace => -ENOMEM,
            MmapError::NotFound => -ENOENT,
            MmapError::Io => -EIO,
            MmapError::UnsupportedRange => -ENOTSUP,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_errno_is_negative() {
        for err in [
            MmapError::InvalidArgument,
            MmapError::PermissionDenied,
            MmapError::ResourceExhausted,
            MmapError::NoSpace,
            MmapError::NotFound,
            MmapError::Io,
            MmapError::UnsupportedRange,
        ] {
            assert!(err.to_errno() < 0, "{:?}", err);
        }
        assert_eq!(MmapError::Io.to_errno(), -5);
        assert_eq!(MmapError::InvalidArgument.to_errno(), -22);
    }
}
