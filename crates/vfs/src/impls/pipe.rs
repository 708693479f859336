//! 管道实现
//!
//! 管道是流式单向通信设备，读端和写端分别由两个 [`Pipe`] 实例表示。

use alloc::collections::VecDeque;
use alloc::sync::Arc;
use sync::SpinLock;

use crate::FsError;

/// 管道环形缓冲区
struct PipeRingBuffer {
    /// 内部缓冲区
    buffer: VecDeque<u8>,
    /// 缓冲区容量
    capacity: usize,
    /// 写端是否仍然打开
    write_open: bool,
    /// 读端是否仍然打开
    read_open: bool,
}

impl PipeRingBuffer {
    const CAPACITY: usize = 512;

    fn new() -> Self {
        Self {
            buffer: VecDeque::with_capacity(Self::CAPACITY),
            capacity: Self::CAPACITY,
            write_open: true,
            read_open: true,
        }
    }

    fn read(&mut self, buf: &mut [u8]) -> Result<usize, FsError> {
        if self.buffer.is_empty() {
            // 写端已关闭时读到文件末尾
            return if self.write_open {
                Err(FsError::WouldBlock)
            } else {
                Ok(0)
            };
        }

        let nread = buf.len().min(self.buffer.len());
        for (dst, src) in buf.iter_mut().zip(self.buffer.drain(..nread)) {
            *dst = src;
        }
        Ok(nread)
    }

    fn write(&mut self, buf: &[u8]) -> Result<usize, FsError> {
        if !self.read_open {
            return Err(FsError::BrokenPipe);
        }

        let available = self.capacity - self.buffer.len();
        if available == 0 && !buf.is_empty() {
            return Err(FsError::WouldBlock);
        }

        let nwrite = buf.len().min(available);
        self.buffer.extend(&buf[..nwrite]);
        Ok(nwrite)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PipeEnd {
    Read,
    Write,
}

/// 管道的一端
///
/// 特点:
/// - 单向数据流 (读端和写端分别创建两个 Pipe 实例)
/// - 流式设备 (无 offset 概念)
/// - 不依赖 Inode (纯内存结构)
/// - 一端被 drop 即关闭该端
pub struct Pipe {
    /// 共享的环形缓冲区
    buffer: Arc<SpinLock<PipeRingBuffer>>,
    /// 端点类型
    end_type: PipeEnd,
}

impl Pipe {
    /// 创建管道对 (返回 [读端, 写端])
    pub fn create_pair() -> (Self, Self) {
        let buffer = Arc::new(SpinLock::new(PipeRingBuffer::new()));

        let read_end = Self {
            buffer: buffer.clone(),
            end_type: PipeEnd::Read,
        };
        let write_end = Self {
            buffer,
            end_type: PipeEnd::Write,
        };

        (read_end, write_end)
    }

    /// 是否为写端
    pub fn is_write_end(&self) -> bool {
        self.end_type == PipeEnd::Write
    }

    /// 从管道读取数据
    ///
    /// 缓冲区为空时：写端仍打开返回 [`FsError::WouldBlock`]，否则返回 0（EOF）。
    pub fn read(&self, buf: &mut [u8]) -> Result<usize, FsError> {
        if self.end_type != PipeEnd::Read {
            return Err(FsError::InvalidArgument);
        }
        self.buffer.lock().read(buf)
    }

    /// 向管道写入数据，返回写入的字节数（缓冲区剩余空间不足时为部分写入）
    pub fn write(&self, buf: &[u8]) -> Result<usize, FsError> {
        if self.end_type != PipeEnd::Write {
            return Err(FsError::InvalidArgument);
        }
        self.buffer.lock().write(buf)
    }
}

impl Drop for Pipe {
    fn drop(&mut self) {
        let mut buf = self.buffer.lock();
        match self.end_type {
            PipeEnd::Read => buf.read_open = false,
            PipeEnd::Write => buf.write_open = false,
        }
    }
}
