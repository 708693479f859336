//! 页表模块
//!
//! mmap 子系统只消费页表层的两项能力：查询翻译项（有效位、脏位），
//! 以及解除翻译并释放页帧。建立翻译由缺页处理负责，具体页表格式由各架构实现。
mod pte_flag;
mod table;

pub use pte_flag::UniversalPTEFlag;
pub use table::PageTableInner;

/// 分页操作中可能发生的错误
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PagingError {
    /// 虚拟地址未被映射
    NotMapped,
    /// 提供了无效的地址
    InvalidAddress,
}

/// 分页操作的结果类型
pub type PagingResult<T> = Result<T, PagingError>;
