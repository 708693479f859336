//! 地址与页码
//!
//! [`Vaddr`] / [`Paddr`] 是字节地址，[`Vpn`] / [`Ppn`] 是页码，
//! [`VpnRange`] 描述一段映射覆盖的页。对齐与页大小都取自注册的 [`MmConfig`](crate::MmConfig)。
pub mod operations;
pub mod page_num;
pub mod types;

pub use operations::{AlignOps, UsizeConvert, page_round_up};
pub use page_num::{PageNum, Ppn, Vpn, VpnRange};
pub use types::{Paddr, Vaddr};
