//! 页表接口
//!
//! 由各架构实现；上层（[`crate::memory_space::MemorySpace`]）只依赖该 trait，
//! 从而实现“地址空间管理逻辑”与“页表硬件细节”的解耦。

use super::{PagingResult, UniversalPTEFlag};
use crate::address::{Ppn, Vpn};

/// 单个地址空间的页表
pub trait PageTableInner: Send {
    /// 查询 `vpn` 的翻译项，返回映射到的物理页号及标志位
    ///
    /// 没有翻译项时返回 [`PagingError::NotMapped`](super::PagingError::NotMapped)。
    fn walk(&self, vpn: Vpn) -> PagingResult<(Ppn, UniversalPTEFlag)>;

    /// 解除 `vpn` 的翻译并释放其背后的物理页帧
    fn unmap_and_free(&mut self, vpn: Vpn) -> PagingResult<()>;
}
