//! 同步原语
//!
//! 向其它内核模块提供基本的锁原语：
//!
//! - [`SpinLock`]：关中断自旋锁，用于短临界区（文件表、映射描述符池）
//! - [`SleepLock`]：不关中断的互斥锁，允许在持有期间进行阻塞 I/O（进程锁、inode 锁）
//!
//! 两者都基于 `lock_api`，守卫离开作用域时自动释放。
//!
//! # 架构依赖
//!
//! 此 crate 通过 `ArchOps` trait 抽象架构相关操作。
//! 使用前必须调用 `register_arch_ops` 注册实现。

#![no_std]

#[cfg(test)]
extern crate std;

mod global_ops;
mod intr_guard;
mod raw_spin_lock;
mod sleep_lock;
mod spin_lock;

pub use global_ops::FatPtrSlot;
pub use intr_guard::IntrGuard;
pub use raw_spin_lock::RawSpinLock;
pub use sleep_lock::{RawSleepLock, SleepLock, SleepLockGuard};
pub use spin_lock::{SpinLock, SpinLockGuard};

/// 架构相关操作的 trait
///
/// 由内核实现并注册，提供中断控制和 CPU 信息
pub trait ArchOps: Send + Sync {
    /// 读取并禁用中断，返回之前的状态
    ///
    /// # Safety
    /// 调用者必须确保在适当的上下文中调用
    unsafe fn read_and_disable_interrupts(&self) -> usize;

    /// 恢复中断状态
    ///
    /// # Safety
    /// flags 必须是之前 read_and_disable_interrupts 返回的值
    unsafe fn restore_interrupts(&self, flags: usize);

    /// 获取当前 CPU ID
    fn cpu_id(&self) -> usize;

    /// 等待 [`SleepLock`] 时让出 CPU
    ///
    /// 默认实现只做忙等提示；接入调度器后应切换到其他任务。
    fn yield_now(&self) {
        core::hint::spin_loop();
    }
}

crate::global_ops! {
    /// 注册架构操作实现
    ///
    /// # Safety
    /// 必须在单线程环境下调用，且只能调用一次
    pub unsafe fn register_arch_ops;
    /// 获取架构操作实例
    pub(crate) fn arch_ops() -> &'static dyn ArchOps;
}
