//! 进程侧的内存映射与文件描述符接口
//!
//! - [`Process`] - 进程控制块中与映射、打开文件相关的部分
//! - [`mm_bridge`] - 让打开文件可以被 mm crate 映射和写回
//! - [`syscall`] - 用户可见的 mmap / munmap 及文件描述符系统调用

#![no_std]

extern crate alloc;

pub mod mm_bridge;
mod process;
pub mod syscall;

pub use process::Process;
