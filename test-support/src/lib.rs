//! 测试支持 crate
//!
//! 提供 Mock 实现和测试工具。
//!
//! 本 crate 不依赖任何内核 crate（避免循环依赖）；各内核 crate 在测试代码中
//! 为这里的类型实现自己的 trait（例如 `ArchOps` / `MmConfig` / `PageTableInner`）。

#![no_std]

extern crate alloc;

pub mod mock;
