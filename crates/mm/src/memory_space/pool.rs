//! 全局映射描述符池
//!
//! 所有进程共享一个固定容量的描述符表，由一把 [`SpinLock`] 保护，
//! 分配时线性扫描第一个空闲槽位。持有槽位的凭证是 [`VmaSlot`]，
//! 它被 drop 时槽位自动归还，因此“槽位在用”当且仅当某个进程的映射链表持有它。

use alloc::sync::Arc;
use alloc::vec;
use alloc::vec::Vec;
use lazy_static::lazy_static;
use sync::SpinLock;

use super::MmapError;
use crate::mm_config;

/// 固定容量的映射描述符池
pub struct VmaPool {
    slots: SpinLock<Vec<bool>>,
}

impl VmaPool {
    /// 创建一个容量为 `capacity` 的空池
    pub fn new(capacity: usize) -> Self {
        Self {
            slots: SpinLock::new(vec![false; capacity]),
        }
    }

    /// 取得一个空闲槽位
    ///
    /// 池满时返回 [`MmapError::ResourceExhausted`]。
    pub fn acquire(self: &Arc<Self>) -> Result<VmaSlot, MmapError> {
        let mut slots = self.slots.lock();
        let index = slots
            .iter()
            .position(|used| !*used)
            .ok_or(MmapError::ResourceExhausted)?;
        slots[index] = true;
        Ok(VmaSlot {
            pool: self.clone(),
            index,
        })
    }

    fn release(&self, index: usize) {
        let mut slots = self.slots.lock();
        debug_assert!(slots[index], "vma slot {} released twice", index);
        slots[index] = false;
    }

    /// 当前在用的槽位数
    pub fn in_use(&self) -> usize {
        self.slots.lock().iter().filter(|used| **used).count()
    }

    /// 池的总容量
    pub fn capacity(&self) -> usize {
        self.slots.lock().len()
    }
}

/// 池中一个在用槽位的所有权凭证
pub struct VmaSlot {
    pool: Arc<VmaPool>,
    index: usize,
}

impl VmaSlot {
    /// 槽位在池中的下标
    pub fn index(&self) -> usize {
        self.index
    }
}

impl Drop for VmaSlot {
    fn drop(&mut self) {
        self.pool.release(self.index);
    }
}

impl core::fmt::Debug for VmaSlot {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_tuple("VmaSlot").field(&self.index).finish()
    }
}

lazy_static! {
    /// 系统全局的映射描述符池，容量由 [`MmConfig::vma_pool_capacity`](crate::MmConfig::vma_pool_capacity) 决定
    pub static ref VMA_POOL: Arc<VmaPool> = Arc::new(VmaPool::new(mm_config().vma_pool_capacity()));
}
