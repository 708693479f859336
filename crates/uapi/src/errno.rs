//! 错误码定义 (与 POSIX errno 数值一致)

pub const ENOENT: isize = 2;
pub const EIO: isize = 5;
pub const EBADF: isize = 9;
pub const EAGAIN: isize = 11;
pub const ENOMEM: isize = 12;
pub const EACCES: isize = 13;
pub const EFAULT: isize = 14;
pub const ENODEV: isize = 19;
pub const EISDIR: isize = 21;
pub const EINVAL: isize = 22;
pub const ENFILE: isize = 23;
pub const EMFILE: isize = 24;
pub const EFBIG: isize = 27;
pub const ENOSPC: isize = 28;
pub const EPIPE: isize = 32;
pub const ENOTSUP: isize = 95;
