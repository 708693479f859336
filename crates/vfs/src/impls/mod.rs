//! 文件系统协作对象实现

mod pipe;
mod ram_inode;

pub use pipe::Pipe;
pub use ram_inode::{MAX_FILE_SIZE, RamInode};
