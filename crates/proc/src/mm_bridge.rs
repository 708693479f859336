//! VFS 与 mm crate 的桥接模块
//!
//! 为打开文件表中的文件实现 mm crate 的 MmInode 和 MmFile trait，
//! 使得 VFS 文件可以用于内存映射。

use alloc::sync::Arc;
use mm::{MmFile, MmInode};
use vfs::{FileRef, FsError, Inode, Transaction, vfs_ops};

/// Inode 的包装类型，实现 MmInode trait
///
/// 写回按 [`VfsOps::max_op_bytes`](vfs::VfsOps::max_op_bytes) 切分，每段在独立的事务内完成。
pub struct InodeWrapper(pub Arc<dyn Inode>);

impl MmInode for InodeWrapper {
    fn read_at(&self, offset: usize, buf: &mut [u8]) -> Result<usize, isize> {
        self.0.read_at(offset, buf).map_err(|e| e.to_errno())
    }

    fn write_at(&self, offset: usize, buf: &[u8]) -> Result<usize, isize> {
        let max = vfs_ops().max_op_bytes();
        let mut written = 0;
        for chunk in buf.chunks(max) {
            let n = {
                let _tx = Transaction::begin();
                self.0
                    .write_at(offset + written, chunk)
                    .map_err(|e| e.to_errno())?
            };
            written += n;
            if n != chunk.len() {
                break;
            }
        }
        Ok(written)
    }
}

/// 打开文件引用的包装类型，实现 MmFile trait
///
/// 持有一个 [`FileRef`]，因此映射存活期间文件的引用计数保持加一。
pub struct MappedFile(pub FileRef);

impl MmFile for MappedFile {
    fn readable(&self) -> bool {
        self.0.readable()
    }

    fn writable(&self) -> bool {
        self.0.writable()
    }

    fn dup(&self) -> Arc<dyn MmFile> {
        Arc::new(MappedFile(self.0.clone()))
    }

    fn inode(&self) -> Result<Arc<dyn MmInode>, isize> {
        let file = self.0.file().map_err(|e| e.to_errno())?;
        file.inode()
            .map(|inode| Arc::new(InodeWrapper(inode.clone())) as Arc<dyn MmInode>)
            .ok_or(FsError::NotSupported.to_errno())
    }
}
