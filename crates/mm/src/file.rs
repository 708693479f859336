//! 文件映射接口 trait 定义
//!
//! mm 不依赖 vfs；由上层（proc crate 的桥接模块）为打开文件对象实现这些 trait。

use alloc::sync::Arc;

/// 可用于映射写回的 Inode 接口
pub trait MmInode: Send + Sync {
    /// 从指定偏移读取数据到缓冲区
    fn read_at(&self, offset: usize, buf: &mut [u8]) -> Result<usize, isize>;

    /// 将缓冲区数据写入指定偏移
    ///
    /// 实现负责文件系统事务的开始/结束以及 inode 加锁，返回实际写入的字节数。
    fn write_at(&self, offset: usize, buf: &[u8]) -> Result<usize, isize>;
}

/// 可映射到内存的打开文件
///
/// 实现者是打开文件池中某个条目的一个引用：`dup` 产生新引用（引用计数加一），
/// 引用被 drop 时计数减一。
pub trait MmFile: Send + Sync {
    /// 文件是否以可读方式打开
    fn readable(&self) -> bool;

    /// 文件是否以可写方式打开
    fn writable(&self) -> bool;

    /// 复制一个新的文件引用
    fn dup(&self) -> Arc<dyn MmFile>;

    /// 获取底层 Inode 用于读写操作
    fn inode(&self) -> Result<Arc<dyn MmInode>, isize>;
}
