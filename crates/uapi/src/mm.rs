//! 内存映射相关的用户态 ABI

use bitflags::bitflags;

bitflags! {
    /// mmap 的保护标志
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct ProtFlags: u32 {
        const READ = 1 << 1;
        const WRITE = 1 << 2;
        const READ_WRITE = Self::READ.bits() | Self::WRITE.bits();
    }
}

bitflags! {
    /// mmap 的映射标志
    ///
    /// `PRIVATE` 与 `SHARED` 必须且只能设置其一。
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct MapFlags: u32 {
        /// 私有映射：修改不会写回文件
        const PRIVATE = 1;
        /// 共享映射：解除映射时脏页写回文件
        const SHARED = 2;
    }
}

impl MapFlags {
    /// 共享/私有模式是否有且仅有一个被选中
    pub fn is_valid_sharing(&self) -> bool {
        self.contains(MapFlags::SHARED) != self.contains(MapFlags::PRIVATE)
    }
}

/// mmap 失败时返回给用户态的哨兵值 (`(char *) -1`)
pub const MAP_FAILED: usize = usize::MAX;
