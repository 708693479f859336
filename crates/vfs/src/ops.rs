//! VFS 运行时操作 trait 定义和注册
//!
//! 此模块定义了 VFS 层需要的外部依赖接口，通过 trait 抽象实现与内核其余部分的解耦。

/// VFS 运行时操作
///
/// 此 trait 抽象了 VFS 层需要的运行时操作：日志事务与配置。
/// 内核需要实现此 trait 并在启动时注册。
pub trait VfsOps: Send + Sync {
    // ========== 日志事务 ==========

    /// 开始一个文件系统事务，日志空间不足时阻塞
    fn begin_op(&self);

    /// 结束当前事务，最后一个事务结束时提交日志
    fn end_op(&self);

    // ========== 配置 ==========

    /// 单个事务最多写入的字节数
    fn max_op_bytes(&self) -> usize;

    /// 获取默认最大文件描述符数
    fn default_max_fds(&self) -> usize;
}

sync::global_ops! {
    /// 注册 VFS 操作实现
    ///
    /// # Safety
    /// 必须在单线程环境下调用，且只能调用一次
    pub unsafe fn register_vfs_ops;
    /// 获取已注册的 VFS 操作实现
    ///
    /// # Panics
    /// 如果尚未调用 [`register_vfs_ops`] 注册实现，则 panic
    pub fn vfs_ops() -> &'static dyn VfsOps;
}

/// 文件系统事务 guard
///
/// 创建时调用 `begin_op`，在作用域结束时自动调用 `end_op`
pub struct Transaction(());

impl Transaction {
    /// 开始一个事务
    #[inline]
    pub fn begin() -> Self {
        vfs_ops().begin_op();
        Self(())
    }
}

impl Drop for Transaction {
    #[inline]
    fn drop(&mut self) {
        vfs_ops().end_op();
    }
}
