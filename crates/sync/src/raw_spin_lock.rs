//! 自旋锁实现
//!
//! 基于原子操作实现自旋锁，结合 [`IntrGuard`] 在持锁期间关闭本地中断。

use core::hint;
use core::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use lock_api::{GuardNoSend, RawMutex};

use crate::intr_guard::IntrGuard;

/// 关中断自旋锁
///
/// 不可重入。加锁时保存进入前的中断状态，解锁时恢复，
/// 因此嵌套持有多把自旋锁时必须按加锁的逆序释放。
#[derive(Debug)]
pub struct RawSpinLock {
    locked: AtomicBool,
    /// 加锁前的中断状态，只由持锁者读写
    saved_intr: AtomicUsize,
}

impl RawSpinLock {
    /// 创建一个未加锁的自旋锁
    pub const fn new() -> Self {
        RawSpinLock {
            locked: AtomicBool::new(false),
            saved_intr: AtomicUsize::new(0),
        }
    }
}

impl Default for RawSpinLock {
    fn default() -> Self {
        Self::new()
    }
}

unsafe impl RawMutex for RawSpinLock {
    #[allow(clippy::declare_interior_mutable_const)]
    const INIT: Self = RawSpinLock::new();

    type GuardMarker = GuardNoSend;

    fn lock(&self) {
        let guard = IntrGuard::new();
        while self
            .locked
            .compare_exchange_weak(false, true, Ordering::Acquire, Ordering::Relaxed)
            .is_err()
        {
            hint::spin_loop();
        }
        self.saved_intr.store(guard.into_raw(), Ordering::Relaxed);
    }

    fn try_lock(&self) -> bool {
        let guard = IntrGuard::new();
        if self
            .locked
            .compare_exchange(false, true, Ordering::Acquire, Ordering::Relaxed)
            .is_ok()
        {
            self.saved_intr.store(guard.into_raw(), Ordering::Relaxed);
            true
        } else {
            // guard 在此处 drop，恢复中断
            false
        }
    }

    unsafe fn unlock(&self) {
        let flags = self.saved_intr.load(Ordering::Relaxed);
        self.locked.store(false, Ordering::Release);
        // SAFETY: flags 由本次加锁的 lock/try_lock 通过 into_raw 交出
        drop(unsafe { IntrGuard::from_raw(flags) });
    }

    fn is_locked(&self) -> bool {
        self.locked.load(Ordering::Relaxed)
    }
}
