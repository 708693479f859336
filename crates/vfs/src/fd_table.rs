//! 文件描述符表
//!
//! 该模块实现了进程级的文件描述符管理。
//!
//! 约定与语义：
//!
//! - `alloc()` 分配“最小可用 fd”，上限为 [`VfsOps::default_max_fds`](crate::VfsOps::default_max_fds)
//! - 表中每一项是一个 [`FileRef`]，因此 `dup` 增加打开文件的引用计数，`close` 减少它
//! - 被移出表的 [`FileRef`] 总是在表锁之外 drop，关闭文件可能阻塞在文件系统事务上

use alloc::vec::Vec;
use core::fmt;
use sync::SpinLock;

use crate::{FileRef, FsError, vfs_ops};

/// 文件描述符表
pub struct FDTable {
    /// 文件描述符数组
    files: SpinLock<Vec<Option<FileRef>>>,
    /// 最大文件描述符数量
    max_fds: usize,
}

impl fmt::Debug for FDTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let files = self.files.lock();
        let used = files.iter().filter(|slot| slot.is_some()).count();
        f.debug_struct("FDTable")
            .field("max_fds", &self.max_fds)
            .field("slots", &files.len())
            .field("used", &used)
            .finish()
    }
}

impl FDTable {
    /// 创建新的文件描述符表
    pub fn new() -> Self {
        Self {
            files: SpinLock::new(Vec::new()),
            max_fds: vfs_ops().default_max_fds(),
        }
    }

    /// 取走并清空所有已打开的文件描述符
    pub fn take_all(&self) -> Vec<(usize, FileRef)> {
        let mut files = self.files.lock();
        files
            .iter_mut()
            .enumerate()
            .filter_map(|(fd, slot)| slot.take().map(|file| (fd, file)))
            .collect()
    }

    /// 分配一个新的文件描述符
    ///
    /// 表满时返回 [`FsError::TooManyOpenFiles`]，`file` 随之被 drop（关闭）。
    pub fn alloc(&self, file: FileRef) -> Result<usize, FsError> {
        let mut files = self.files.lock();

        // 查找最小可用 FD
        if let Some(fd) = files.iter().position(|slot| slot.is_none()) {
            files[fd] = Some(file);
            return Ok(fd);
        }

        // 如果没有空闲槽位，扩展数组
        let fd = files.len();
        if fd >= self.max_fds {
            drop(files);
            drop(file);
            return Err(FsError::TooManyOpenFiles);
        }

        files.push(Some(file));
        Ok(fd)
    }

    /// 获取文件引用（引用计数加一）
    pub fn get(&self, fd: usize) -> Result<FileRef, FsError> {
        let files = self.files.lock();
        files
            .get(fd)
            .and_then(|f| f.clone())
            .ok_or(FsError::BadFileDescriptor)
    }

    /// 关闭文件描述符
    pub fn close(&self, fd: usize) -> Result<(), FsError> {
        let file = self
            .files
            .lock()
            .get_mut(fd)
            .and_then(Option::take)
            .ok_or(FsError::BadFileDescriptor)?;
        drop(file);
        Ok(())
    }

    /// 复制文件描述符
    pub fn dup(&self, old_fd: usize) -> Result<usize, FsError> {
        let file = self.get(old_fd)?;
        self.alloc(file)
    }

    /// 已打开的文件描述符数量
    pub fn open_count(&self) -> usize {
        self.files.lock().iter().filter(|slot| slot.is_some()).count()
    }
}

impl Default for FDTable {
    fn default() -> Self {
        Self::new()
    }
}
