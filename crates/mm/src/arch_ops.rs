//! 架构相关内存管理操作 trait 定义和注册

/// 架构相关内存管理操作
///
/// 由嵌入的内核为具体架构实现此 trait。
pub trait ArchMmOps: Send + Sync {
    /// 将物理地址转换为内核可直接访问的虚拟地址（直接映射区域）
    fn paddr_to_vaddr(&self, paddr: usize) -> usize;

    /// 刷新单个用户虚拟页的 TLB 条目
    fn flush_tlb_page(&self, vaddr: usize);
}

sync::global_ops! {
    /// 注册架构操作实现
    ///
    /// # Safety
    /// 必须在单线程环境下调用，且只能调用一次
    pub unsafe fn register_arch_ops;
    /// 获取已注册的架构操作实现
    ///
    /// # Panics
    /// 如果尚未调用 [`register_arch_ops`] 注册实现，则 panic
    pub fn arch_ops() -> &'static dyn ArchMmOps;
}
