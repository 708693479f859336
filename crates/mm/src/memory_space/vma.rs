//! 映射描述符

use alloc::sync::Arc;
use uapi::mm::{MapFlags, ProtFlags};

use super::{MmapError, MmapFile, VmaSlot};
use crate::MmFile;
use crate::address::{PageNum, Ppn, UsizeConvert, Vaddr, Vpn, VpnRange};
use crate::arch_ops::arch_ops;
use crate::mm_config;
use crate::page_table::UniversalPTEFlag;

/// 一个进程内的一段连续文件映射（VMA）
///
/// 地址区间为 `[start, end)`，两端都按页对齐。
/// 描述符持有全局池中的一个槽位和一个文件引用，两者都在 drop 时归还。
#[derive(Debug)]
pub struct Vma {
    start: Vaddr,
    end: Vaddr,
    mapping: MmapFile,
    slot: VmaSlot,
}

impl Vma {
    pub(super) fn new(start: Vaddr, end: Vaddr, mapping: MmapFile, slot: VmaSlot) -> Self {
        debug_assert!(start < end);
        Self {
            start,
            end,
            mapping,
            slot,
        }
    }

    /// 起始地址（包含）
    pub fn start(&self) -> Vaddr {
        self.start
    }

    /// 结束地址（不包含）
    pub fn end(&self) -> Vaddr {
        self.end
    }

    /// 当前覆盖的字节数
    pub fn size(&self) -> usize {
        self.end.offset_from(self.start)
    }

    /// 当前覆盖的虚拟页
    pub fn vpn_range(&self) -> VpnRange {
        VpnRange::from_addr_range(self.start, self.end)
    }

    /// 保护标志
    pub fn prot(&self) -> ProtFlags {
        self.mapping.prot
    }

    /// 映射标志
    pub fn flags(&self) -> MapFlags {
        self.mapping.flags
    }

    /// 是否为共享（写回）映射
    pub fn is_shared(&self) -> bool {
        self.mapping.flags.contains(MapFlags::SHARED)
    }

    /// 背后的文件
    pub fn file(&self) -> &Arc<dyn MmFile> {
        &self.mapping.file
    }

    /// 映射信息
    pub fn mapping(&self) -> &MmapFile {
        &self.mapping
    }

    /// 占用的描述符池槽位
    pub fn slot_index(&self) -> usize {
        self.slot.index()
    }

    /// 地址是否落在映射内
    pub fn contains(&self, va: Vaddr) -> bool {
        self.start <= va && va < self.end
    }

    /// `[start, end)` 是否完全落在映射内
    pub fn covers(&self, start: Vaddr, end: Vaddr) -> bool {
        self.start <= start && end <= self.end
    }

    /// 映射内地址 `va` 对应的文件偏移
    ///
    /// 缺页处理据此从文件读入页内容。
    pub fn file_offset(&self, va: Vaddr) -> usize {
        self.mapping.file_offset(va)
    }

    /// 缺页处理为该映射安装页表项时使用的标志
    pub fn pte_flags(&self) -> UniversalPTEFlag {
        UniversalPTEFlag::user_from_prot(self.mapping.prot)
    }

    pub(super) fn set_start(&mut self, start: Vaddr) {
        debug_assert!(start < self.end);
        self.start = start;
    }

    pub(super) fn set_end(&mut self, end: Vaddr) {
        debug_assert!(self.start < end);
        self.end = end;
    }

    /// 把物理页 `ppn` 的内容写回到 `vpn` 对应的文件位置
    ///
    /// 写回长度不超过请求长度的末尾，映射在页中间结束时不会覆盖文件中与映射无关的字节。
    pub(super) fn write_back(&self, vpn: Vpn, ppn: Ppn) -> Result<(), MmapError> {
        let page_size = mm_config().page_size();
        let va = vpn.start_addr();
        let write_len = self.mapping.writeback_len(va, page_size);
        if write_len == 0 {
            return Ok(());
        }
        let file_offset = self.mapping.file_offset(va);

        let inode = self.mapping.file.inode().map_err(|errno| {
            log::error!("mmap writeback: no inode for {} (errno {})", va, errno);
            MmapError::Io
        })?;

        let kernel_vaddr = arch_ops().paddr_to_vaddr(ppn.start_addr().as_usize());
        // SAFETY: ppn 是页表中有效的翻译，帧在 unmap_and_free 之前一直存在；write_len 不超过一页
        let buffer = unsafe { core::slice::from_raw_parts(kernel_vaddr as *const u8, write_len) };

        match inode.write_at(file_offset, buffer) {
            Ok(written) if written == write_len => Ok(()),
            Ok(written) => {
                log::error!(
                    "Partial write at offset {}: expected {}, got {}",
                    file_offset,
                    write_len,
                    written
                );
                Err(MmapError::Io)
            }
            Err(errno) => {
                log::error!(
                    "mmap writeback of {} to offset {} failed (errno {})",
                    va,
                    file_offset,
                    errno
                );
                Err(MmapError::Io)
            }
        }
    }
}
