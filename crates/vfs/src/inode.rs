//! Inode 抽象层 - VFS 存储层接口
//!
//! 该模块定义了文件系统的底层存储接口，提供无状态、按显式偏移随机访问的文件访问能力。
//! 同一个 Inode 可以被多个 [`crate::File`] 会话对象以及内存映射共享；
//! 会话层负责维护 offset 等打开状态。

use uapi::fs::Stat;

use crate::FsError;

/// 文件系统底层存储接口
///
/// 实现内部自行持有 inode 锁：每次调用在锁内完成，调用者无需额外加锁。
/// 写操作需要在 [`Transaction`](crate::Transaction) 内进行。
pub trait Inode: Send + Sync {
    /// 从指定偏移量读取数据，返回实际读取的字节数（到达文件末尾时可能小于 `buf.len()`）
    fn read_at(&self, offset: usize, buf: &mut [u8]) -> Result<usize, FsError>;

    /// 向指定偏移量写入数据，必要时扩展文件，返回实际写入的字节数
    fn write_at(&self, offset: usize, buf: &[u8]) -> Result<usize, FsError>;

    /// 文件大小（字节）
    fn size(&self) -> usize;

    /// 获取文件元数据
    fn stat(&self) -> Stat;
}
