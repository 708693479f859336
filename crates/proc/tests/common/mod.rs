//! 集成测试环境：把 test-support 中的 Mock 适配为 mm / vfs / sync 的实现

#![allow(dead_code)]

use std::cell::Cell;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use mm::{MmConfig, PageTableInner, PagingError, PagingResult, Ppn, UniversalPTEFlag, UsizeConvert, Vpn, VmaPool};
use proc::Process;
use test_support::mock::arch::MOCK_ARCH_OPS;
use test_support::mock::mm::{MOCK_MM_CONFIG, MOCK_MM_OPS};
use test_support::mock::page_table::{MockPageTable, PTE_R, PTE_U, PTE_W};
use test_support::mock::vfs::MOCK_VFS_OPS;
use vfs::{FileKind, FileRef, FileTable, FsError, Inode, OpenFlags, RamInode, Stat, VfsOps};

pub use test_support::mock::page_table::PAGE_SIZE;

/// 软件页表
#[derive(Default)]
pub struct TestPageTable(pub MockPageTable);

impl PageTableInner for TestPageTable {
    fn walk(&self, vpn: Vpn) -> PagingResult<(Ppn, UniversalPTEFlag)> {
        self.0
            .walk(vpn.as_usize())
            .map(|(ppn, flags)| (Ppn(ppn), UniversalPTEFlag::from_bits_truncate(flags)))
            .ok_or(PagingError::NotMapped)
    }

    fn unmap_and_free(&mut self, vpn: Vpn) -> PagingResult<()> {
        if self.0.unmap(vpn.as_usize()) {
            Ok(())
        } else {
            Err(PagingError::NotMapped)
        }
    }
}

struct TestMmConfig;

impl MmConfig for TestMmConfig {
    fn page_size(&self) -> usize {
        MOCK_MM_CONFIG.page_size()
    }

    fn mmap_base(&self) -> usize {
        MOCK_MM_CONFIG.mmap_base()
    }

    fn mmap_end(&self) -> usize {
        MOCK_MM_CONFIG.mmap_end()
    }

    fn max_vmas_per_space(&self) -> usize {
        MOCK_MM_CONFIG.max_vmas_per_space()
    }

    fn vma_pool_capacity(&self) -> usize {
        MOCK_MM_CONFIG.vma_pool_capacity()
    }
}

struct TestMmOps;

impl mm::ArchMmOps for TestMmOps {
    fn paddr_to_vaddr(&self, paddr: usize) -> usize {
        MOCK_MM_OPS.paddr_to_vaddr(paddr)
    }

    fn flush_tlb_page(&self, vaddr: usize) {
        MOCK_MM_OPS.flush_tlb_page(vaddr)
    }
}

std::thread_local! {
    static TX_BEGUN: Cell<usize> = const { Cell::new(0) };
}

struct TestVfs;

impl VfsOps for TestVfs {
    fn begin_op(&self) {
        MOCK_VFS_OPS.begin_op();
        TX_BEGUN.with(|c| c.set(c.get() + 1));
    }

    fn end_op(&self) {
        MOCK_VFS_OPS.end_op();
    }

    fn max_op_bytes(&self) -> usize {
        MOCK_VFS_OPS.max_op_bytes()
    }

    fn default_max_fds(&self) -> usize {
        MOCK_VFS_OPS.default_max_fds()
    }
}

struct TestArch;

impl sync::ArchOps for TestArch {
    unsafe fn read_and_disable_interrupts(&self) -> usize {
        unsafe { MOCK_ARCH_OPS.read_and_disable_interrupts() }
    }

    unsafe fn restore_interrupts(&self, flags: usize) {
        unsafe { MOCK_ARCH_OPS.restore_interrupts(flags) }
    }

    fn cpu_id(&self) -> usize {
        MOCK_ARCH_OPS.cpu_id()
    }

    fn yield_now(&self) {
        std::thread::yield_now();
    }
}

static MM_CONFIG: TestMmConfig = TestMmConfig;
static MM_OPS: TestMmOps = TestMmOps;
static VFS: TestVfs = TestVfs;
static ARCH: TestArch = TestArch;
// 0 = uninit, 1 = initializing, 2 = ready
static INIT: AtomicUsize = AtomicUsize::new(0);

pub fn init() {
    match INIT.compare_exchange(0, 1, Ordering::AcqRel, Ordering::Acquire) {
        Ok(_) => {
            // Safety: 测试进程内只注册这一组全局实例
            unsafe {
                sync::register_arch_ops(&ARCH);
                mm::register_config(&MM_CONFIG);
                mm::register_arch_ops(&MM_OPS);
                vfs::register_vfs_ops(&VFS);
            }
            INIT.store(2, Ordering::Release);
        }
        Err(_) => {
            while INIT.load(Ordering::Acquire) != 2 {
                core::hint::spin_loop();
            }
        }
    }
}

/// 当前线程开始过的事务数
pub fn transactions_begun() -> usize {
    TX_BEGUN.with(|c| c.get())
}

pub type TestProcess = Process<TestPageTable>;

/// 从独立的描述符池分配映射的进程
pub fn process(pid: usize, pool: &Arc<VmaPool>) -> TestProcess {
    init();
    Process::with_pool(pid, TestPageTable::default(), pool.clone())
}

pub fn pool(capacity: usize) -> Arc<VmaPool> {
    init();
    Arc::new(VmaPool::new(capacity))
}

/// 每个测试使用自己的打开文件表
pub fn file_table() -> Arc<FileTable> {
    init();
    Arc::new(FileTable::new(16))
}

/// 打开一个内存文件并装入进程的描述符表，返回 fd 与文件引用
pub fn open(
    proc: &TestProcess,
    table: &Arc<FileTable>,
    inode: Arc<dyn Inode>,
    flags: OpenFlags,
) -> (i32, FileRef) {
    let file = table.alloc(FileKind::Inode(inode), flags).unwrap();
    let fd = proc.files().alloc(file.clone()).unwrap();
    (fd as i32, file)
}

/// 以给定内容创建内存文件
pub fn ram_file(len: usize, fill: u8) -> Arc<RamInode> {
    Arc::new(RamInode::with_data(1, vec![fill; len]))
}

/// 模拟缺页处理为 `va` 所在页装入清零页帧
pub fn fault_in(proc: &TestProcess, va: usize) {
    proc.mm()
        .lock()
        .page_table_mut()
        .0
        .map_zeroed(va / PAGE_SIZE, PTE_R | PTE_W | PTE_U);
}

/// 模拟用户态写入（置脏）
pub fn user_write(proc: &TestProcess, va: usize, bytes: &[u8]) {
    assert!(proc.mm().lock().page_table_mut().0.user_write(va, bytes));
}

pub fn is_mapped(proc: &TestProcess, va: usize) -> bool {
    proc.mm().lock().page_table().0.is_mapped(va / PAGE_SIZE)
}

pub fn vma_count(proc: &TestProcess) -> usize {
    proc.mm().lock().vma_count()
}

/// 写入总是失败的文件
pub struct FailingInode(pub RamInode);

impl Inode for FailingInode {
    fn read_at(&self, offset: usize, buf: &mut [u8]) -> Result<usize, FsError> {
        self.0.read_at(offset, buf)
    }

    fn write_at(&self, _offset: usize, _buf: &[u8]) -> Result<usize, FsError> {
        Err(FsError::IoError)
    }

    fn size(&self) -> usize {
        self.0.size()
    }

    fn stat(&self) -> Stat {
        self.0.stat()
    }
}
