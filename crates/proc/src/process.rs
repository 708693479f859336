//! 进程控制块

use alloc::sync::Arc;
use mm::{MemorySpace, MmapError, PageTableInner, Vaddr, VmaPool};
use sync::SleepLock;
use uapi::mm::{MapFlags, ProtFlags};
use vfs::FDTable;

use crate::mm_bridge::MappedFile;

/// 进程控制块中与映射、打开文件相关的部分
///
/// `mm` 上的 [`SleepLock`] 就是进程锁：一次 map / unmap 全程持有，
/// 期间可能阻塞在写回的文件系统 I/O 上。锁顺序为进程锁在外，
/// 描述符池锁与打开文件表锁在内，反向从不发生。
pub struct Process<PT: PageTableInner> {
    pid: usize,
    files: FDTable,
    mm: SleepLock<MemorySpace<PT>>,
}

impl<PT: PageTableInner> Process<PT> {
    /// 创建进程，映射描述符从全局池分配
    pub fn new(pid: usize, page_table: PT) -> Self {
        Self::from_space(pid, MemorySpace::new(page_table))
    }

    /// 创建进程，映射描述符从给定的池分配
    pub fn with_pool(pid: usize, page_table: PT, pool: Arc<VmaPool>) -> Self {
        Self::from_space(pid, MemorySpace::with_pool(page_table, pool))
    }

    fn from_space(pid: usize, space: MemorySpace<PT>) -> Self {
        Self {
            pid,
            files: FDTable::new(),
            mm: SleepLock::new(space),
        }
    }

    /// 进程号
    pub fn pid(&self) -> usize {
        self.pid
    }

    /// 文件描述符表
    pub fn files(&self) -> &FDTable {
        &self.files
    }

    /// 地址空间（缺页处理通过它调用 [`MemorySpace::find_vma`]）
    pub fn mm(&self) -> &SleepLock<MemorySpace<PT>> {
        &self.mm
    }

    /// 把 `fd` 指向的文件映射进地址空间
    pub fn mmap(
        &self,
        addr: usize,
        len: usize,
        prot: ProtFlags,
        flags: MapFlags,
        fd: usize,
        offset: usize,
    ) -> Result<Vaddr, MmapError> {
        let file = self.files.get(fd).map_err(|err| {
            log::warn!("pid {}: mmap on bad fd {}: {:?}", self.pid, fd, err);
            MmapError::InvalidArgument
        })?;
        let file = MappedFile(file);
        self.mm.lock().mmap(addr, len, prot, flags, &file, offset)
    }

    /// 解除 `[addr, addr + len)` 的映射
    pub fn munmap(&self, addr: usize, len: usize) -> Result<(), MmapError> {
        self.mm.lock().munmap(addr, len)
    }

    /// 进程退出时拆除全部映射，脏页照常写回
    ///
    /// 某个映射写回失败不会中止拆除，返回第一个错误。
    pub fn exit_mm(&self) -> Result<(), MmapError> {
        let result = self.mm.lock().unmap_all();
        if let Err(err) = result {
            log::error!("pid {}: exit_mm failed: {:?}", self.pid, err);
        }
        result
    }

    /// 进程退出时关闭全部文件描述符
    pub fn close_all_files(&self) {
        // 在描述符表锁外关闭
        let files = self.files.take_all();
        drop(files);
    }
}
