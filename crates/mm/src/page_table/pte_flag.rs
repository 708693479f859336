//! 架构无关的页表项标志

use bitflags::bitflags;
use uapi::mm::ProtFlags;

bitflags! {
    /// 页表项标志（位布局与 RISC-V Sv39 PTE 的低 8 位一致，其他架构在实现中转换）
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct UniversalPTEFlag: usize {
        const VALID = 1 << 0;
        const READABLE = 1 << 1;
        const WRITEABLE = 1 << 2;
        const EXECUTABLE = 1 << 3;
        const USER_ACCESSIBLE = 1 << 4;
        const GLOBAL = 1 << 5;
        const ACCESSED = 1 << 6;
        const DIRTY = 1 << 7;
    }
}

impl UniversalPTEFlag {
    /// 按 mmap 保护标志生成用户页的页表项标志
    pub fn user_from_prot(prot: ProtFlags) -> Self {
        let mut flags = Self::VALID | Self::USER_ACCESSIBLE;
        if prot.contains(ProtFlags::READ) {
            flags |= Self::READABLE;
        }
        if prot.contains(ProtFlags::WRITE) {
            flags |= Self::WRITEABLE;
        }
        flags
    }

    /// 页表项是否有效
    pub fn is_valid(&self) -> bool {
        self.contains(Self::VALID)
    }

    /// 页是否在上次清除后被写过
    pub fn is_dirty(&self) -> bool {
        self.contains(Self::DIRTY)
    }
}
