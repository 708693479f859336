//! 内存管理子系统
//!
//! 提供地址抽象、页表接口和进程文件映射（mmap）管理功能。
//!
//! # 架构解耦
//!
//! 通过 trait 抽象与架构特定组件解耦：
//! - [`ArchMmOps`]: 地址转换、TLB 操作
//! - [`MmConfig`]: 内存布局常量
//! - [`PageTableInner`]: 页表的查询与解除映射
//! - [`MmFile`] / [`MmInode`]: 被映射的打开文件
//!
//! 使用前必须调用 [`register_arch_ops`] 和 [`register_config`] 注册实现。

#![no_std]

extern crate alloc;

#[cfg(test)]
extern crate std;

mod arch_ops;
mod config;
mod file;

pub mod address;
pub mod memory_space;
pub mod page_table;

pub use arch_ops::{ArchMmOps, arch_ops, register_arch_ops};
pub use config::{MmConfig, mm_config, register_config};
pub use file::{MmFile, MmInode};

// Re-export 常用类型
pub use address::{AlignOps, PageNum, Paddr, Ppn, UsizeConvert, Vaddr, Vpn, VpnRange};
pub use memory_space::{MemorySpace, MmapError, MmapFile, VMA_POOL, Vma, VmaPool};
pub use page_table::{PageTableInner, PagingError, PagingResult, UniversalPTEFlag};
