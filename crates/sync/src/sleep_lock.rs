//! 睡眠锁
//!
//! 不关中断，等待时通过 [`ArchOps::yield_now`](crate::ArchOps::yield_now) 让出 CPU。
//! 持有期间允许执行阻塞操作（磁盘 I/O、等待日志空间）。

use core::sync::atomic::{AtomicBool, Ordering};

use lock_api::{GuardSend, RawMutex};

use crate::arch_ops;

/// 睡眠锁的底层实现
#[derive(Debug)]
pub struct RawSleepLock {
    locked: AtomicBool,
}

impl RawSleepLock {
    /// 创建一个未加锁的睡眠锁
    pub const fn new() -> Self {
        RawSleepLock {
            locked: AtomicBool::new(false),
        }
    }
}

impl Default for RawSleepLock {
    fn default() -> Self {
        Self::new()
    }
}

unsafe impl RawMutex for RawSleepLock {
    #[allow(clippy::declare_interior_mutable_const)]
    const INIT: Self = RawSleepLock::new();

    type GuardMarker = GuardSend;

    fn lock(&self) {
        while !self.try_lock() {
            arch_ops().yield_now();
        }
    }

    fn try_lock(&self) -> bool {
        self.locked
            .compare_exchange(false, true, Ordering::Acquire, Ordering::Relaxed)
            .is_ok()
    }

    unsafe fn unlock(&self) {
        self.locked.store(false, Ordering::Release);
    }

    fn is_locked(&self) -> bool {
        self.locked.load(Ordering::Relaxed)
    }
}

/// 可在持有期间阻塞的互斥锁
///
/// 不可重入：持有者在临界区内调用的下层代码（文件系统事务、inode 锁）
/// 不得再次获取同一把锁。
pub type SleepLock<T> = lock_api::Mutex<RawSleepLock, T>;

/// SleepLock 的 RAII 保护器
pub type SleepLockGuard<'a, T> = lock_api::MutexGuard<'a, RawSleepLock, T>;
