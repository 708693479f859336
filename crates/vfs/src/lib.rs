//! 内核虚拟文件系统层
//!
//! 此 crate 提供进程与文件系统之间的会话层：
//!
//! - [`FileTable`] / [`FileRef`] - 带引用计数的系统打开文件表
//! - [`File`] - 打开文件（管道、普通文件、字符设备）的读写与元数据
//! - [`FDTable`] - 进程文件描述符表
//! - [`Inode`] trait - 底层存储接口
//! - [`Transaction`] - 文件系统日志事务括号
//! - [`CharDriver`] - 按主设备号分派的字符设备驱动
//!
//! 使用前必须调用 [`register_vfs_ops`] 注册实现。

#![no_std]

extern crate alloc;

pub mod devsw;
pub mod error;
pub mod ops;

mod fd_table;
mod file;
pub mod impls;
mod inode;

// Re-export ops
pub use ops::{Transaction, VfsOps, register_vfs_ops, vfs_ops};

// Re-export error
pub use error::FsError;

// Re-export devsw
pub use devsw::{CharDriver, NDEV, get_driver, register_device};

// Re-export file
pub use file::{FILE_TABLE, File, FileKind, FileRef, FileTable, NFILE};

// Re-export inode
pub use inode::Inode;

// Re-export fd_table
pub use fd_table::FDTable;

// Re-export impls
pub use impls::{MAX_FILE_SIZE, Pipe, RamInode};

// Re-export uapi types for convenience
pub use uapi::fcntl::OpenFlags;
pub use uapi::fs::Stat;
