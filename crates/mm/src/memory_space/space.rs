//! 内存空间核心实现
//!
//! [`MemorySpace`] 是一个进程的映射链表：按起始地址严格升序、两两不重叠的 [`Vma`] 序列，
//! 以及与之配套的页表。调用者（进程锁的持有者）负责串行化对同一个空间的 map / unmap。

use alloc::sync::Arc;
use alloc::vec::Vec;
use uapi::mm::{MapFlags, ProtFlags};

use super::{MmapError, MmapFile, VMA_POOL, Vma, VmaPool};
use crate::MmFile;
use crate::address::{AlignOps, PageNum, UsizeConvert, Vaddr, Vpn, VpnRange, page_round_up};
use crate::arch_ops::arch_ops;
use crate::mm_config;
use crate::page_table::PageTableInner;

/// 表示地址空间的内存空间结构体
pub struct MemorySpace<PT: PageTableInner> {
    /// 与此内存空间关联的页表
    page_table: PT,

    /// 按起始地址升序排列的映射
    vmas: Vec<Vma>,

    /// 映射描述符从这里分配
    pool: Arc<VmaPool>,
}

impl<PT: PageTableInner> MemorySpace<PT> {
    /// 创建一个使用全局描述符池的空内存空间
    pub fn new(page_table: PT) -> Self {
        Self::with_pool(page_table, VMA_POOL.clone())
    }

    /// 创建一个从指定描述符池分配的空内存空间
    pub fn with_pool(page_table: PT, pool: Arc<VmaPool>) -> Self {
        MemorySpace {
            page_table,
            vmas: Vec::new(),
            pool,
        }
    }

    /// 返回页表的引用
    pub fn page_table(&self) -> &PT {
        &self.page_table
    }

    /// 返回页表的可变引用
    pub fn page_table_mut(&mut self) -> &mut PT {
        &mut self.page_table
    }

    /// 描述符池
    pub fn pool(&self) -> &Arc<VmaPool> {
        &self.pool
    }

    /// 按地址升序返回所有映射
    pub fn vmas(&self) -> &[Vma] {
        &self.vmas
    }

    /// 当前存活的映射数
    pub fn vma_count(&self) -> usize {
        self.vmas.len()
    }

    /// 查找包含 `va` 的映射
    pub fn find_vma(&self, va: Vaddr) -> Option<&Vma> {
        self.vmas.iter().find(|vma| vma.contains(va))
    }

    /// 建立一个文件映射，返回映射的起始地址
    ///
    /// 地址提示被忽略，映射位置总是由首次适配算法决定。
    /// 不建立任何页表项，页面由缺页处理按需装入。
    pub fn mmap(
        &mut self,
        _hint: usize,
        len: usize,
        prot: ProtFlags,
        flags: MapFlags,
        file: &dyn MmFile,
        offset: usize,
    ) -> Result<Vaddr, MmapError> {
        if len == 0 || !flags.is_valid_sharing() {
            log::warn!("mmap: invalid length {:#x} or flags {:?}", len, flags);
            return Err(MmapError::InvalidArgument);
        }
        if flags.contains(MapFlags::SHARED) && !(file.readable() && file.writable()) {
            log::warn!("mmap: shared mapping needs a file open for reading and writing");
            return Err(MmapError::PermissionDenied);
        }
        if self.vmas.len() >= mm_config().max_vmas_per_space() {
            log::warn!("mmap: per-process mapping limit reached ({})", self.vmas.len());
            return Err(MmapError::ResourceExhausted);
        }
        let size = page_round_up(len).ok_or(MmapError::InvalidArgument)?;

        let (index, start) = self.find_free_area(size).ok_or_else(|| {
            log::warn!("mmap: no gap of {:#x} bytes below the mapping ceiling", size);
            MmapError::NoSpace
        })?;

        let slot = self.pool.acquire().inspect_err(|_| {
            log::warn!("mmap: global mapping descriptor pool exhausted");
        })?;

        let mapping = MmapFile {
            file: file.dup(),
            offset,
            origin: start,
            len,
            prot,
            flags,
        };
        let vma = Vma::new(start, start + size, mapping, slot);
        log::debug!(
            "mmap: [{}, {}) len={:#x} prot={:?} flags={:?} offset={:#x}",
            vma.start(),
            vma.end(),
            len,
            prot,
            flags,
            offset
        );
        self.vmas.insert(index, vma);
        Ok(start)
    }

    /// 首次适配：在映射窗口内找第一个能容纳 `size` 字节的空闲区间
    ///
    /// 返回新映射在链表中的插入位置和起始地址。窗口起点视作第一个映射之前的“上一个结束地址”。
    fn find_free_area(&self, size: usize) -> Option<(usize, Vaddr)> {
        let config = mm_config();
        let mut prev_end = config.mmap_base();

        for (index, vma) in self.vmas.iter().enumerate() {
            let start = vma.start().as_usize();
            if start >= prev_end && start - prev_end >= size {
                return Some((index, Vaddr::from_usize(prev_end)));
            }
            prev_end = prev_end.max(vma.end().as_usize());
        }

        let end = prev_end.checked_add(size)?;
        if end > config.mmap_end() {
            return None;
        }
        Some((self.vmas.len(), Vaddr::from_usize(prev_end)))
    }

    /// 解除 `[addr, addr + len)` 的映射
    ///
    /// 区间必须落在单个映射内，且是它的整体、前缀或后缀。共享映射的脏页先写回文件，
    /// 然后无论是否写回都解除翻译并释放页帧。
    ///
    /// 写回失败时立即返回 [`MmapError::Io`]：已处理的页（包括失败的那一页）保持解除状态，
    /// 映射的地址区间不做调整，不回滚。
    pub fn munmap(&mut self, addr: usize, len: usize) -> Result<(), MmapError> {
        let start = Vaddr::from_usize(addr);
        if len == 0 || !start.is_page_aligned() {
            log::warn!("munmap: invalid range addr={:#x} len={:#x}", addr, len);
            return Err(MmapError::InvalidArgument);
        }
        let end = page_round_up(len)
            .and_then(|size| start.checked_add(size))
            .ok_or(MmapError::InvalidArgument)?;

        let index = self
            .vmas
            .iter()
            .position(|vma| vma.covers(start, end))
            .ok_or_else(|| {
                log::warn!("munmap: [{}, {}) is not inside a single mapping", start, end);
                MmapError::NotFound
            })?;

        let (is_prefix, is_suffix) = {
            let vma = &self.vmas[index];
            (vma.start() == start, vma.end() == end)
        };
        if !is_prefix && !is_suffix {
            log::warn!("munmap: [{}, {}) would split a mapping", start, end);
            return Err(MmapError::UnsupportedRange);
        }

        for vpn in VpnRange::from_addr_range(start, end) {
            self.release_page(index, vpn)?;
        }

        match (is_prefix, is_suffix) {
            (true, true) => {
                // drop 归还描述符槽位和文件引用
                self.vmas.remove(index);
            }
            (true, false) => self.vmas[index].set_start(end),
            _ => self.vmas[index].set_end(start),
        }
        log::debug!("munmap: [{}, {})", start, end);
        Ok(())
    }

    /// 写回（如需要）并释放映射 `index` 中的一页
    fn release_page(&mut self, index: usize, vpn: Vpn) -> Result<(), MmapError> {
        let (ppn, flags) = match self.page_table.walk(vpn) {
            Ok(entry) if entry.1.is_valid() => entry,
            _ => return Ok(()),
        };

        let vma = &self.vmas[index];
        let written = if vma.is_shared() && flags.is_dirty() {
            vma.write_back(vpn, ppn)
        } else {
            Ok(())
        };

        self.unmap_page(vpn)?;
        written
    }

    fn unmap_page(&mut self, vpn: Vpn) -> Result<(), MmapError> {
        self.page_table.unmap_and_free(vpn).map_err(|err| {
            log::error!("munmap: page table refused to unmap {:?}: {:?}", vpn, err);
            MmapError::Io
        })?;
        arch_ops().flush_tlb_page(vpn.start_addr().as_usize());
        Ok(())
    }

    /// 解除所有映射（进程退出时调用）
    ///
    /// 每个映射都按整体解除并写回脏页。某个映射失败后仍继续拆除其余映射：
    /// 失败映射剩下的页直接释放，不再写回。返回遇到的第一个错误。
    pub fn unmap_all(&mut self) -> Result<(), MmapError> {
        let mut first_err = None;
        while let Some(vma) = self.vmas.first() {
            let (start, size) = (vma.start(), vma.size());
            if let Err(err) = self.munmap(start.as_usize(), size) {
                log::error!("unmap_all: dropping [{}, {}) after {:?}", start, start + size, err);
                first_err.get_or_insert(err);
                self.discard_first();
            }
        }
        first_err.map_or(Ok(()), Err)
    }

    fn discard_first(&mut self) {
        let vma = self.vmas.remove(0);
        for vpn in vma.vpn_range() {
            if matches!(self.page_table.walk(vpn), Ok((_, flags)) if flags.is_valid()) {
                // 失败的页已经记录过日志，这里只需继续拆除
                let _ = self.unmap_page(vpn);
            }
        }
    }
}

impl<PT: PageTableInner> core::fmt::Debug for MemorySpace<PT> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("MemorySpace")
            .field("vmas", &self.vmas)
            .finish_non_exhaustive()
    }
}
