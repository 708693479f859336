//! 内存空间模块
//!
//! 本模块定义了进程的文件映射管理：
//!
//! - [`VmaPool`]：全局、固定容量的映射描述符池
//! - [`Vma`]：一段连续的文件映射
//! - [`MemorySpace`]：进程的映射链表，负责首次适配布局与解除映射/写回

mod error;
mod mmap_file;
mod pool;
mod space;
mod vma;


pub use error::MmapError;
pub use mmap_file::MmapFile;
pub use pool::{VMA_POOL, VmaPool, VmaSlot};
pub use space::MemorySpace;
pub use vma::Vma;
