//! 集成测试环境：把 test-support 中的 Mock 适配为 vfs / sync 的实现

#![allow(dead_code)]

use std::cell::Cell;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use test_support::mock::arch::MOCK_ARCH_OPS;
use test_support::mock::vfs::MOCK_VFS_OPS;
use vfs::{CharDriver, FsError, VfsOps};

std::thread_local! {
    static TX_BEGUN: Cell<usize> = const { Cell::new(0) };
    static TX_OPEN: Cell<isize> = const { Cell::new(0) };
}

/// 每个测试线程各自统计事务
struct TestVfs;

impl VfsOps for TestVfs {
    fn begin_op(&self) {
        MOCK_VFS_OPS.begin_op();
        TX_BEGUN.with(|c| c.set(c.get() + 1));
        TX_OPEN.with(|c| c.set(c.get() + 1));
    }

    fn end_op(&self) {
        MOCK_VFS_OPS.end_op();
        TX_OPEN.with(|c| c.set(c.get() - 1));
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

/// 当前线程尚未结束的事务数
pub fn transactions_open() -> isize {
    TX_OPEN.with(|c| c.get())
}

/// 单个事务允许写入的字节数
pub fn max_op_bytes() -> usize {
    MOCK_VFS_OPS.max_op_bytes()
}

/// 记录写入内容的字符设备
#[derive(Default)]
pub struct EchoDriver {
    pub written: std::sync::Mutex<Vec<u8>>,
    pub reads: AtomicUsize,
}

impl CharDriver for EchoDriver {
    fn read(&self, buf: &mut [u8]) -> Result<usize, FsError> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        let n = buf.len().min(3);
        buf[..n].copy_from_slice(&b"dev"[..n]);
        Ok(n)
    }

    fn write(&self, buf: &[u8]) -> Result<usize, FsError> {
        self.written.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }
}

/// 每次最多写入 `limit` 字节的 Inode，用于测试短写
pub struct ShortWriteInode {
    pub inner: vfs::RamInode,
    pub limit: usize,
}

impl vfs::Inode for ShortWriteInode {
    fn read_at(&self, offset: usize, buf: &mut [u8]) -> Result<usize, FsError> {
        self.inner.read_at(offset, buf)
    }

    fn write_at(&self, offset: usize, buf: &[u8]) -> Result<usize, FsError> {
        let n = buf.len().min(self.limit);
        self.inner.write_at(offset, &buf[..n])
    }

    fn size(&self) -> usize {
        self.inner.size()
    }

    fn stat(&self) -> vfs::Stat {
        self.inner.stat()
    }
}

/// 被 drop 时计数的 Inode，用于检查最后一次 close 才释放
pub struct CountedInode {
    pub inner: vfs::RamInode,
    pub dropped: Arc<AtomicUsize>,
    pub open_tx_at_drop: Arc<AtomicUsize>,
}

impl Drop for CountedInode {
    fn drop(&mut self) {
        self.dropped.fetch_add(1, Ordering::SeqCst);
        self.open_tx_at_drop
            .store(transactions_open() as usize, Ordering::SeqCst);
    }
}

impl vfs::Inode for CountedInode {
    fn read_at(&self, offset: usize, buf: &mut [u8]) -> Result<usize, FsError> {
        self.inner.read_at(offset, buf)
    }

    fn write_at(&self, offset: usize, buf: &[u8]) -> Result<usize, FsError> {
        self.inner.write_at(offset, buf)
    }

    fn size(&self) -> usize {
        self.inner.size()
    }

    fn stat(&self) -> vfs::Stat {
        self.inner.stat()
    }
}
