//! 页码
//!
//! 页码是页在地址空间中的索引：`Vpn` 由用户虚拟地址按页大小整除得到，
//! `Ppn` 则来自页表，写回时通过它找到页帧内容。

use core::ops::Range;

use crate::address::operations::{AlignOps, UsizeConvert, page_size};
use crate::address::types::{Paddr, Vaddr};

/// 页码类型的公共行为
pub trait PageNum: UsizeConvert + Copy + Ord {
    /// 关联的地址类型（Ppn 对应 Paddr，Vpn 对应 Vaddr）
    type TAddress: AlignOps;

    /// 地址所在页的页码
    fn from_addr_floor(addr: Self::TAddress) -> Self {
        Self::from_usize(addr.align_down_to_page().as_usize() / page_size())
    }

    /// 不小于地址的第一个页边界对应的页码，用于半开区间的结束地址
    fn from_addr_ceil(addr: Self::TAddress) -> Self {
        Self::from_usize(addr.align_up_to_page().as_usize() / page_size())
    }

    /// 页的起始地址
    fn start_addr(self) -> Self::TAddress {
        Self::TAddress::from_usize(self.as_usize() * page_size())
    }
}

macro_rules! impl_page_num {
    ($type:ident, $addr_type:ty) => {
        impl UsizeConvert for $type {
            fn as_usize(&self) -> usize {
                self.0
            }

            fn from_usize(value: usize) -> Self {
                Self(value)
            }
        }

        impl PageNum for $type {
            type TAddress = $addr_type;
        }
    };
}

/// 物理页码
#[repr(transparent)]
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Debug)]
pub struct Ppn(pub usize);
impl_page_num!(Ppn, Paddr);

/// 虚拟页码
#[repr(transparent)]
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Debug)]
pub struct Vpn(pub usize);
impl_page_num!(Vpn, Vaddr);

/// 虚拟页码的半开区间 `[start, end)`
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct VpnRange {
    /// 第一个页（包含）
    pub start: Vpn,
    /// 最后一页之后（不包含）
    pub end: Vpn,
}

impl VpnRange {
    /// 由地址区间 `[start, end)` 构造覆盖它的页码范围
    pub fn from_addr_range(start: Vaddr, end: Vaddr) -> Self {
        Self {
            start: Vpn::from_addr_floor(start),
            end: Vpn::from_addr_ceil(end),
        }
    }

    /// 页数
    pub fn len(&self) -> usize {
        self.end.0.saturating_sub(self.start.0)
    }

    /// 是否不含任何页
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// 是否包含 `vpn`
    pub fn contains(&self, vpn: Vpn) -> bool {
        (self.start..self.end).contains(&vpn)
    }

    /// 按升序遍历每一页
    pub fn iter(&self) -> core::iter::Map<Range<usize>, fn(usize) -> Vpn> {
        (self.start.0..self.end.0).map(Vpn as fn(usize) -> Vpn)
    }
}

impl IntoIterator for VpnRange {
    type Item = Vpn;
    type IntoIter = core::iter::Map<Range<usize>, fn(usize) -> Vpn>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_env;

    #[test]
    fn test_vpn_from_addr_floor_ceil() {
        test_env::init();
        let a = Vaddr::from_usize(4096);
        assert_eq!(Vpn::from_addr_floor(a), Vpn(1));
        assert_eq!(Vpn::from_addr_ceil(a), Vpn(1));
        assert_eq!(Vpn(1).start_addr(), a);

        let b = Vaddr::from_usize(4097);
        assert_eq!(Vpn::from_addr_floor(b), Vpn(1));
        assert_eq!(Vpn::from_addr_ceil(b), Vpn(2));
    }

    #[test]
    fn test_vpn_range_from_unaligned_addresses() {
        test_env::init();
        let r = VpnRange::from_addr_range(Vaddr(0x1800), Vaddr(0x3001));
        assert_eq!(r.start, Vpn(1));
        assert_eq!(r.end, Vpn(4));
        assert_eq!(r.len(), 3);
        assert!(r.contains(Vpn(3)));
        assert!(!r.contains(Vpn(4)));
        assert_eq!(r.iter().collect::<alloc::vec::Vec<_>>(), [Vpn(1), Vpn(2), Vpn(3)]);
    }

    #[test]
    fn test_empty_range_yields_nothing() {
        test_env::init();
        let r = VpnRange::from_addr_range(Vaddr(0x2000), Vaddr(0x2000));
        assert!(r.is_empty());
        assert_eq!(r.into_iter().count(), 0);
    }

    #[test]
    fn test_page_round_up() {
        test_env::init();
        assert_eq!(crate::address::page_round_up(1), Some(4096));
        assert_eq!(crate::address::page_round_up(4096), Some(4096));
        assert_eq!(crate::address::page_round_up(4097), Some(8192));
        assert_eq!(crate::address::page_round_up(usize::MAX), None);
    }
}
