//! mmap 文件映射信息

use crate::MmFile;
use crate::address::{UsizeConvert, Vaddr};
use alloc::sync::Arc;
use uapi::mm::{MapFlags, ProtFlags};

/// 文件映射信息
///
/// 创建后不再改变：映射被部分解除时只移动 [`Vma`](super::Vma) 的起止地址，
/// 写回偏移和长度仍以这里记录的原始起点计算。
pub struct MmapFile {
    /// 文件对象引用（映射存活期间一直持有，映射释放时归还）
    pub file: Arc<dyn MmFile>,
    /// `origin` 处对应的文件偏移量（字节）
    pub offset: usize,
    /// 映射建立时的起始地址
    pub origin: Vaddr,
    /// 请求的映射长度（字节，未按页取整）
    pub len: usize,
    /// 保护标志
    pub prot: ProtFlags,
    /// 映射标志
    pub flags: MapFlags,
}

impl MmapFile {
    /// `va` 在文件中对应的字节偏移
    pub fn file_offset(&self, va: Vaddr) -> usize {
        self.offset + va.offset_from(self.origin)
    }

    /// 从 `va` 开始写回时最多能写的字节数：不超过一页，也不超过请求长度的末尾
    pub fn writeback_len(&self, va: Vaddr, page_size: usize) -> usize {
        let tail = (self.origin.as_usize() + self.len).saturating_sub(va.as_usize());
        core::cmp::min(page_size, tail)
    }
}

// 手动实现 Debug，因为 dyn MmFile 没有实现 Debug
impl core::fmt::Debug for MmapFile {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("MmapFile")
            .field("file", &"<dyn MmFile>")
            .field("offset", &self.offset)
            .field("origin", &self.origin)
            .field("len", &self.len)
            .field("prot", &self.prot)
            .field("flags", &self.flags)
            .finish()
    }
}
