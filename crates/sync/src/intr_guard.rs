//! 中断保护器
//!
//! 基于 RAII 实现中断保护，在创建时禁用中断，销毁时恢复。
//!
//! 注意：禁用中断只能阻止**本地 CPU** 的“任务 vs 本地中断”并发，
//! 并不能阻止其他 CPU 的并行访问；多核共享数据仍需要配合自旋锁等原语。

use crate::arch_ops;

/// 中断保护器
///
/// 创建时禁用中断并保存之前的状态；销毁时恢复。
/// [`RawSpinLock`](crate::RawSpinLock) 在加锁期间需要跨越 `lock`/`unlock`
/// 两次调用保存状态，因此提供 [`IntrGuard::into_raw`] / [`IntrGuard::from_raw`]。
pub struct IntrGuard {
    flags: usize,
}

impl IntrGuard {
    /// 禁用中断并返回保护器
    pub fn new() -> Self {
        // SAFETY: 保存的 flags 只会在 Drop 时原样恢复
        let flags = unsafe { arch_ops().read_and_disable_interrupts() };
        IntrGuard { flags }
    }

    /// 放弃自动恢复，交出保存的中断状态
    pub fn into_raw(self) -> usize {
        let flags = self.flags;
        core::mem::forget(self);
        flags
    }

    /// 从 [`IntrGuard::into_raw`] 交出的状态重建保护器
    ///
    /// # Safety
    /// `flags` 必须来自一次尚未被恢复的 `into_raw`
    pub unsafe fn from_raw(flags: usize) -> Self {
        IntrGuard { flags }
    }
}

impl Default for IntrGuard {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for IntrGuard {
    fn drop(&mut self) {
        // SAFETY: flags 是创建 IntrGuard 时保存的
        unsafe { arch_ops().restore_interrupts(self.flags) };
    }
}
