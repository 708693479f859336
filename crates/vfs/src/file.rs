//! 打开文件与系统打开文件表
//!
//! 系统中所有打开的文件都登记在一个固定大小的 [`FileTable`] 里，每个槽位带引用计数。
//! [`FileRef`] 是指向某个槽位的一个引用：
//!
//! - `FileTable::alloc` 占用空闲槽位，计数为 1
//! - `FileRef::clone` 计数加一（dup）
//! - `FileRef` 被 drop 时计数减一（close）；减到 0 时槽位被释放，
//!   底层对象随之关闭：管道端关闭，Inode 引用在一个文件系统事务内释放
//!
//! 引用计数为 0 的槽位是空闲的，不会被任何 [`FileRef`] 访问。

use alloc::sync::Arc;
use alloc::vec::Vec;
use core::fmt;
use lazy_static::lazy_static;
use sync::{SleepLock, SpinLock};
use uapi::fcntl::OpenFlags;
use uapi::fs::Stat;

use crate::devsw::get_driver;
use crate::impls::Pipe;
use crate::{FsError, Inode, Transaction, vfs_ops};

/// 系统打开文件表的容量
pub const NFILE: usize = 100;

/// 打开文件的类型
pub enum FileKind {
    /// 管道的一端
    Pipe(Pipe),
    /// 普通文件
    Inode(Arc<dyn Inode>),
    /// 字符设备：元数据来自 `inode`，读写由主设备号对应的驱动处理
    Device {
        /// 设备节点
        inode: Arc<dyn Inode>,
        /// 主设备号
        major: usize,
    },
}

/// 一个打开的文件
pub struct File {
    kind: FileKind,
    readable: bool,
    writable: bool,
    /// 读写偏移，在 inode I/O 期间一直持有
    offset: SleepLock<usize>,
}

impl File {
    fn new(kind: FileKind, flags: OpenFlags) -> Self {
        Self {
            kind,
            readable: flags.readable(),
            writable: flags.writable(),
            offset: SleepLock::new(0),
        }
    }

    /// 文件类型
    pub fn kind(&self) -> &FileKind {
        &self.kind
    }

    /// 检查文件是否可读
    pub fn readable(&self) -> bool {
        self.readable
    }

    /// 检查文件是否可写
    pub fn writable(&self) -> bool {
        self.writable
    }

    /// 当前偏移量
    pub fn offset(&self) -> usize {
        *self.offset.lock()
    }

    /// 普通文件或设备文件的 Inode
    pub fn inode(&self) -> Option<&Arc<dyn Inode>> {
        match &self.kind {
            FileKind::Inode(inode) | FileKind::Device { inode, .. } => Some(inode),
            FileKind::Pipe(_) => None,
        }
    }

    /// 从文件读取数据；普通文件从当前偏移读取并推进偏移
    pub fn read(&self, buf: &mut [u8]) -> Result<usize, FsError> {
        if !self.readable {
            return Err(FsError::PermissionDenied);
        }
        match &self.kind {
            FileKind::Pipe(pipe) => pipe.read(buf),
            FileKind::Device { major, .. } => get_driver(*major)?.read(buf),
            FileKind::Inode(inode) => {
                let mut offset = self.offset.lock();
                let n = inode.read_at(*offset, buf)?;
                *offset += n;
                Ok(n)
            }
        }
    }

    /// 向文件写入数据
    ///
    /// 普通文件的写入按 [`VfsOps::max_op_bytes`](crate::VfsOps::max_op_bytes) 切分，
    /// 每段在独立的事务内完成，避免超出日志容量。任何一段短写都使整个写入失败，
    /// 已写入的段不回退。
    pub fn write(&self, buf: &[u8]) -> Result<usize, FsError> {
        if !self.writable {
            return Err(FsError::PermissionDenied);
        }
        match &self.kind {
            FileKind::Pipe(pipe) => pipe.write(buf),
            FileKind::Device { major, .. } => get_driver(*major)?.write(buf),
            FileKind::Inode(inode) => {
                let max = vfs_ops().max_op_bytes();
                let mut offset = self.offset.lock();
                for chunk in buf.chunks(max) {
                    let written = {
                        let _tx = Transaction::begin();
                        inode.write_at(*offset, chunk)?
                    };
                    *offset += written;
                    if written != chunk.len() {
                        log::error!(
                            "file write: short write at offset {} ({} of {})",
                            *offset,
                            written,
                            chunk.len()
                        );
                        return Err(FsError::IoError);
                    }
                }
                Ok(buf.len())
            }
        }
    }

    /// 获取文件元数据，管道没有元数据
    pub fn stat(&self) -> Result<Stat, FsError> {
        self.inode()
            .map(|inode| inode.stat())
            .ok_or(FsError::NotSupported)
    }

    /// 关闭底层对象
    fn close(self) {
        match self.kind {
            FileKind::Pipe(pipe) => drop(pipe),
            FileKind::Inode(inode) | FileKind::Device { inode, .. } => {
                let _tx = Transaction::begin();
                drop(inode);
            }
        }
    }
}

struct FileSlot {
    refs: usize,
    file: Option<Arc<File>>,
}

/// 固定大小的系统打开文件表
pub struct FileTable {
    slots: SpinLock<Vec<FileSlot>>,
}

impl FileTable {
    /// 创建一个有 `capacity` 个槽位的空表
    pub fn new(capacity: usize) -> Self {
        let slots = (0..capacity)
            .map(|_| FileSlot {
                refs: 0,
                file: None,
            })
            .collect();
        Self {
            slots: SpinLock::new(slots),
        }
    }

    /// 占用一个空闲槽位登记新打开的文件
    ///
    /// 表满时返回 [`FsError::FileTableFull`]，`kind` 被立即关闭。
    pub fn alloc(self: &Arc<Self>, kind: FileKind, flags: OpenFlags) -> Result<FileRef, FsError> {
        let file = File::new(kind, flags);
        let index = {
            let mut slots = self.slots.lock();
            let free = slots.iter().position(|slot| slot.refs == 0);
            match free {
                Some(index) => {
                    slots[index] = FileSlot {
                        refs: 1,
                        file: Some(Arc::new(file)),
                    };
                    index
                }
                None => {
                    let capacity = slots.len();
                    drop(slots);
                    log::warn!("file table: all {} slots in use", capacity);
                    file.close();
                    return Err(FsError::FileTableFull);
                }
            }
        };
        Ok(FileRef {
            table: self.clone(),
            index,
        })
    }

    /// 槽位总数
    pub fn capacity(&self) -> usize {
        self.slots.lock().len()
    }

    /// 在用槽位数
    pub fn in_use(&self) -> usize {
        self.slots.lock().iter().filter(|slot| slot.refs > 0).count()
    }

    fn file(&self, index: usize) -> Option<Arc<File>> {
        self.slots.lock()[index].file.clone()
    }

    fn refs(&self, index: usize) -> usize {
        self.slots.lock()[index].refs
    }

    fn dup(&self, index: usize) {
        let mut slots = self.slots.lock();
        debug_assert!(slots[index].refs > 0, "filedup");
        slots[index].refs += 1;
    }

    fn close(&self, index: usize) {
        let file = {
            let mut slots = self.slots.lock();
            let slot = &mut slots[index];
            debug_assert!(slot.refs > 0, "fileclose");
            slot.refs -= 1;
            if slot.refs > 0 {
                return;
            }
            slot.file.take()
        };

        // 锁外关闭：释放 Inode 可能阻塞在事务上
        match file.map(Arc::into_inner) {
            Some(Some(file)) => file.close(),
            Some(None) => log::error!("file table: slot {} released while still borrowed", index),
            None => {}
        }
    }
}

lazy_static! {
    /// 系统全局打开文件表
    pub static ref FILE_TABLE: Arc<FileTable> = Arc::new(FileTable::new(NFILE));
}

/// 打开文件表中一个槽位的引用
pub struct FileRef {
    table: Arc<FileTable>,
    index: usize,
}

impl FileRef {
    /// 在表中的下标
    pub fn index(&self) -> usize {
        self.index
    }

    /// 槽位当前的引用计数
    pub fn ref_count(&self) -> usize {
        self.table.refs(self.index)
    }

    /// 取得打开文件对象
    pub fn file(&self) -> Result<Arc<File>, FsError> {
        self.table.file(self.index).ok_or(FsError::BadFileDescriptor)
    }

    /// 检查文件是否可读
    pub fn readable(&self) -> bool {
        self.file().is_ok_and(|f| f.readable())
    }

    /// 检查文件是否可写
    pub fn writable(&self) -> bool {
        self.file().is_ok_and(|f| f.writable())
    }

    /// 从文件读取数据
    pub fn read(&self, buf: &mut [u8]) -> Result<usize, FsError> {
        self.file()?.read(buf)
    }

    /// 向文件写入数据
    pub fn write(&self, buf: &[u8]) -> Result<usize, FsError> {
        self.file()?.write(buf)
    }

    /// 获取文件元数据
    pub fn stat(&self) -> Result<Stat, FsError> {
        self.file()?.stat()
    }
}

impl Clone for FileRef {
    fn clone(&self) -> Self {
        self.table.dup(self.index);
        Self {
            table: self.table.clone(),
            index: self.index,
        }
    }
}

impl Drop for FileRef {
    fn drop(&mut self) {
        self.table.close(self.index);
    }
}

impl fmt::Debug for FileRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FileRef")
            .field("index", &self.index)
            .field("refs", &self.ref_count())
            .finish()
    }
}
