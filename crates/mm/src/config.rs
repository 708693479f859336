//! 内存管理配置 trait 定义和注册

/// 内存管理配置常量
///
/// 此 trait 提供内存映射子系统所需的配置常量。
/// 由嵌入的内核实现并在启动时注册。
pub trait MmConfig: Send + Sync {
    /// 页大小（通常为 4096）
    fn page_size(&self) -> usize;

    /// 可映射窗口的起始地址，空地址空间的第一个映射放在这里
    fn mmap_base(&self) -> usize;

    /// 可映射窗口的结束地址（不包含），任何映射的结束地址都不能超过它
    fn mmap_end(&self) -> usize;

    /// 单个地址空间允许的最大映射数
    fn max_vmas_per_space(&self) -> usize;

    /// 全局映射描述符池的容量
    fn vma_pool_capacity(&self) -> usize;
}

sync::global_ops! {
    /// 注册配置实现
    ///
    /// # Safety
    /// 必须在单线程环境下调用，且只能调用一次
    pub unsafe fn register_config;
    /// 获取已注册的配置实现
    ///
    /// # Panics
    /// 如果尚未调用 [`register_config`] 注册实现，则 panic
    pub fn mm_config() -> &'static dyn MmConfig;
}
