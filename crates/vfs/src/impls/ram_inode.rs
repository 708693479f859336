//! 内存中的 Inode
//!
//! 内容保存在一段可增长的内存里，用于内核自测与宿主机测试。

use alloc::vec::Vec;
use sync::SleepLock;
use uapi::fs::{Stat, T_DEVICE, T_FILE};

use crate::{FsError, Inode};

/// 单个文件的最大字节数：(直接块 12 + 一级间接块 256) * 1024 字节块
pub const MAX_FILE_SIZE: usize = (12 + 256) * 1024;

/// 内存中的普通文件或设备节点
pub struct RamInode {
    ino: u32,
    file_type: u16,
    /// inode 锁保护的文件内容
    data: SleepLock<Vec<u8>>,
}

impl RamInode {
    /// 创建一个空的普通文件
    pub fn new(ino: u32) -> Self {
        Self::with_data(ino, Vec::new())
    }

    /// 以给定内容创建普通文件
    pub fn with_data(ino: u32, data: Vec<u8>) -> Self {
        Self {
            ino,
            file_type: T_FILE,
            data: SleepLock::new(data),
        }
    }

    /// 创建一个设备节点，读写由设备驱动处理
    pub fn device(ino: u32) -> Self {
        Self {
            ino,
            file_type: T_DEVICE,
            data: SleepLock::new(Vec::new()),
        }
    }

    /// 复制出当前的全部内容
    pub fn contents(&self) -> Vec<u8> {
        self.data.lock().clone()
    }
}

impl Inode for RamInode {
    fn read_at(&self, offset: usize, buf: &mut [u8]) -> Result<usize, FsError> {
        let data = self.data.lock();
        if offset >= data.len() {
            return Ok(0);
        }
        let n = buf.len().min(data.len() - offset);
        buf[..n].copy_from_slice(&data[offset..offset + n]);
        Ok(n)
    }

    fn write_at(&self, offset: usize, buf: &[u8]) -> Result<usize, FsError> {
        let end = offset
            .checked_add(buf.len())
            .filter(|end| *end <= MAX_FILE_SIZE)
            .ok_or_else(|| {
                log::warn!(
                    "ram inode {}: write of {} bytes at {:#x} exceeds max file size",
                    self.ino,
                    buf.len(),
                    offset
                );
                FsError::FileTooLarge
            })?;
        let mut data = self.data.lock();
        if data.len() < end {
            data.resize(end, 0);
        }
        data[offset..end].copy_from_slice(buf);
        Ok(buf.len())
    }

    fn size(&self) -> usize {
        self.data.lock().len()
    }

    fn stat(&self) -> Stat {
        Stat {
            dev: 1,
            ino: self.ino,
            file_type: self.file_type,
            nlink: 1,
            size: self.size() as u64,
        }
    }
}
