//! 物理地址与虚拟地址类型

use core::fmt;

use crate::address::operations::{AlignOps, UsizeConvert};

macro_rules! impl_address {
    ($type:ident, $prefix:literal) => {
        impl UsizeConvert for $type {
            fn as_usize(&self) -> usize {
                self.0
            }

            fn from_usize(value: usize) -> Self {
                Self(value)
            }
        }

        impl AlignOps for $type {}

        impl $type {
            /// 地址加上字节偏移，溢出时返回 `None`
            pub fn checked_add(self, bytes: usize) -> Option<Self> {
                self.0.checked_add(bytes).map(Self)
            }

            /// 与更低地址 `base` 之间的字节距离
            ///
            /// # Panics
            /// `base` 高于 `self` 时 panic（debug 构建）。
            pub fn offset_from(self, base: Self) -> usize {
                debug_assert!(self.0 >= base.0);
                self.0 - base.0
            }
        }

        impl core::ops::Add<usize> for $type {
            type Output = Self;

            fn add(self, rhs: usize) -> Self {
                Self(self.0 + rhs)
            }
        }

        impl fmt::Display for $type {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($prefix, "{:#x}"), self.0)
            }
        }
    };
}

/// 物理地址
#[repr(transparent)]
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Debug, Default, Hash)]
pub struct Paddr(pub usize);
impl_address!(Paddr, "PA:");

/// 虚拟地址
#[repr(transparent)]
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Debug, Default, Hash)]
pub struct Vaddr(pub usize);
impl_address!(Vaddr, "VA:");
