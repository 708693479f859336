//! VFS 相关操作的 Mock 实现
//!
//! 注意：这里不直接依赖 `vfs` crate（避免循环依赖）。
//! `vfs` crate 的测试为这些类型实现其 trait（例如 `VfsOps`）。

use core::sync::atomic::{AtomicIsize, AtomicUsize, Ordering};

/// Mock 的日志事务操作
///
/// 记录 begin_op/end_op 的调用次数以及当前未结束的事务数，
/// 测试据此检查事务括号是否配对。
pub struct MockVfsOps {
    pub begun: AtomicUsize,
    pub ended: AtomicUsize,
    pub outstanding: AtomicIsize,
}

impl MockVfsOps {
    pub const fn new() -> Self {
        Self {
            begun: AtomicUsize::new(0),
            ended: AtomicUsize::new(0),
            outstanding: AtomicIsize::new(0),
        }
    }

    pub fn begin_op(&self) {
        self.begun.fetch_add(1, Ordering::SeqCst);
        self.outstanding.fetch_add(1, Ordering::SeqCst);
    }

    pub fn end_op(&self) {
        self.ended.fetch_add(1, Ordering::SeqCst);
        self.outstanding.fetch_sub(1, Ordering::SeqCst);
    }

    /// 单个事务允许写入的字节数：((MAXOPBLOCKS-1-1-2)/2) * BSIZE
    pub fn max_op_bytes(&self) -> usize {
        ((10 - 1 - 1 - 2) / 2) * 1024
    }

    pub fn default_max_fds(&self) -> usize {
        16
    }
}

/// 全局 Mock 实例
pub static MOCK_VFS_OPS: MockVfsOps = MockVfsOps::new();
