//! 内存管理相关操作的 Mock 实现
//!
//! 注意：这里不直接依赖 `mm` crate（避免循环依赖）。
//! `mm` crate 在 `cfg(test)` 下为这些类型实现其 trait（例如 `ArchMmOps` / `MmConfig`）。

use core::sync::atomic::{AtomicUsize, Ordering};

/// Mock 的内存管理架构操作
///
/// 采用“恒等映射”（vaddr == paddr）：[`MockPageTable`](super::page_table::MockPageTable)
/// 的物理页号就是宿主机上页帧缓冲区的地址除以页大小。
pub struct MockMmOps {
    /// `flush_tlb_page` 被调用的次数
    pub tlb_flushes: AtomicUsize,
}

impl MockMmOps {
    pub const fn new() -> Self {
        Self {
            tlb_flushes: AtomicUsize::new(0),
        }
    }

    /// 将物理地址转换为内核可访问的虚拟地址（恒等映射）
    pub fn paddr_to_vaddr(&self, paddr: usize) -> usize {
        paddr
    }

    /// 刷新单个 TLB 条目（仅计数）
    pub fn flush_tlb_page(&self, _vaddr: usize) {
        self.tlb_flushes.fetch_add(1, Ordering::Relaxed);
    }
}

/// 全局 Mock 实例
pub static MOCK_MM_OPS: MockMmOps = MockMmOps::new();

/// Mock 的内存管理配置
pub struct MockMmConfig;

impl MockMmConfig {
    pub const fn new() -> Self {
        Self
    }

    pub fn page_size(&self) -> usize {
        4096
    }

    pub fn mmap_base(&self) -> usize {
        0x20_0000_0000
    }

    pub fn mmap_end(&self) -> usize {
        0x3F_FFFF_E000
    }

    pub fn max_vmas_per_space(&self) -> usize {
        32
    }

    pub fn vma_pool_capacity(&self) -> usize {
        128
    }
}

/// 全局 Mock 实例
pub static MOCK_MM_CONFIG: MockMmConfig = MockMmConfig::new();
