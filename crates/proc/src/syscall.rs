//! 系统调用入口
//!
//! 参数已经从陷入帧中取出；用户缓冲区已由调用方复制进内核。
//! 失败统一折叠为负的 errno，`sys_mmap` 例外：任何失败都返回 [`MAP_FAILED`]。

use mm::{MmapError, PageTableInner, UsizeConvert, Vaddr};
use uapi::fs::Stat;
use uapi::mm::{MAP_FAILED, MapFlags, ProtFlags};
use vfs::FsError;

use crate::Process;

fn fd_index(fd: i32) -> Result<usize, FsError> {
    usize::try_from(fd).map_err(|_| FsError::BadFileDescriptor)
}

fn errno_of<T>(result: Result<T, FsError>, ok: impl FnOnce(T) -> isize) -> isize {
    match result {
        Ok(v) => ok(v),
        Err(err) => err.to_errno(),
    }
}

fn do_mmap<PT: PageTableInner>(
    proc: &Process<PT>,
    addr: usize,
    len: usize,
    prot: u32,
    flags: u32,
    fd: i32,
    offset: isize,
) -> Result<Vaddr, MmapError> {
    let prot = ProtFlags::from_bits(prot).ok_or(MmapError::InvalidArgument)?;
    let flags = MapFlags::from_bits(flags).ok_or(MmapError::InvalidArgument)?;
    let fd = usize::try_from(fd).map_err(|_| MmapError::InvalidArgument)?;
    let offset = usize::try_from(offset).map_err(|_| MmapError::InvalidArgument)?;
    proc.mmap(addr, len, prot, flags, fd, offset)
}

/// mmap(addr, len, prot, flags, fd, offset)
///
/// 返回映射的起始地址，失败返回 [`MAP_FAILED`]。
pub fn sys_mmap<PT: PageTableInner>(
    proc: &Process<PT>,
    addr: usize,
    len: usize,
    prot: u32,
    flags: u32,
    fd: i32,
    offset: isize,
) -> usize {
    match do_mmap(proc, addr, len, prot, flags, fd, offset) {
        Ok(va) => va.as_usize(),
        Err(err) => {
            log::warn!("pid {}: sys_mmap failed: {:?}", proc.pid(), err);
            MAP_FAILED
        }
    }
}

/// munmap(addr, len)
pub fn sys_munmap<PT: PageTableInner>(proc: &Process<PT>, addr: usize, len: usize) -> isize {
    match proc.munmap(addr, len) {
        Ok(()) => 0,
        Err(err) => err.to_errno(),
    }
}

/// close(fd)
pub fn sys_close<PT: PageTableInner>(proc: &Process<PT>, fd: i32) -> isize {
    errno_of(fd_index(fd).and_then(|fd| proc.files().close(fd)), |_| 0)
}

/// dup(fd)，返回新的文件描述符
pub fn sys_dup<PT: PageTableInner>(proc: &Process<PT>, fd: i32) -> isize {
    errno_of(fd_index(fd).and_then(|fd| proc.files().dup(fd)), |fd| fd as isize)
}

/// read(fd, buf)，返回读取的字节数
pub fn sys_read<PT: PageTableInner>(proc: &Process<PT>, fd: i32, buf: &mut [u8]) -> isize {
    let result = fd_index(fd)
        .and_then(|fd| proc.files().get(fd))
        .and_then(|file| file.read(buf));
    errno_of(result, |n| n as isize)
}

/// write(fd, buf)，返回写入的字节数
pub fn sys_write<PT: PageTableInner>(proc: &Process<PT>, fd: i32, buf: &[u8]) -> isize {
    let result = fd_index(fd)
        .and_then(|fd| proc.files().get(fd))
        .and_then(|file| file.write(buf));
    errno_of(result, |n| n as isize)
}

/// fstat(fd, st)
pub fn sys_fstat<PT: PageTableInner>(proc: &Process<PT>, fd: i32, st: &mut Stat) -> isize {
    let result = fd_index(fd)
        .and_then(|fd| proc.files().get(fd))
        .and_then(|file| file.stat());
    errno_of(result, |stat| {
        *st = stat;
        0
    })
}
