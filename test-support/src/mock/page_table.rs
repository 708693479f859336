//! 软件页表 Mock
//!
//! 每个已映射的虚拟页背后是一块真实的、按页对齐的宿主机内存，
//! 配合 [`MockMmOps`](super::mm::MockMmOps) 的恒等映射，
//! 被测代码可以像访问物理帧一样直接读写页内容。

use alloc::boxed::Box;
use alloc::collections::BTreeMap;

/// 页大小
pub const PAGE_SIZE: usize = 4096;

/// 页表项标志位（与 RISC-V Sv39 PTE 低 8 位布局一致）
pub const PTE_V: usize = 1 << 0;
pub const PTE_R: usize = 1 << 1;
pub const PTE_W: usize = 1 << 2;
pub const PTE_X: usize = 1 << 3;
pub const PTE_U: usize = 1 << 4;
pub const PTE_A: usize = 1 << 6;
pub const PTE_D: usize = 1 << 7;

/// 一个物理页帧
#[repr(C, align(4096))]
pub struct MockFrame(pub [u8; PAGE_SIZE]);

struct MockPte {
    frame: Box<MockFrame>,
    flags: usize,
}

/// 以 VPN 为键的单级软件页表
#[derive(Default)]
pub struct MockPageTable {
    entries: BTreeMap<usize, MockPte>,
    freed_frames: usize,
}

impl MockPageTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// 为 `vpn` 分配一个清零的页帧并建立映射，返回物理页号
    ///
    /// 模拟缺页处理：`flags` 中的 `PTE_V` 会被自动加上。
    pub fn map_zeroed(&mut self, vpn: usize, flags: usize) -> usize {
        let frame = Box::new(MockFrame([0; PAGE_SIZE]));
        let ppn = frame.0.as_ptr() as usize / PAGE_SIZE;
        self.entries.insert(
            vpn,
            MockPte {
                frame,
                flags: flags | PTE_V,
            },
        );
        ppn
    }

    /// 查询 `vpn` 的物理页号和标志位
    pub fn walk(&self, vpn: usize) -> Option<(usize, usize)> {
        self.entries
            .get(&vpn)
            .map(|pte| (pte.frame.0.as_ptr() as usize / PAGE_SIZE, pte.flags))
    }

    /// 解除 `vpn` 的映射并释放页帧
    pub fn unmap(&mut self, vpn: usize) -> bool {
        if self.entries.remove(&vpn).is_some() {
            self.freed_frames += 1;
            true
        } else {
            false
        }
    }

    /// 模拟用户态写入：写入字节并置位 A/D
    ///
    /// 写入不能跨页；目标页未映射时返回 false。
    pub fn user_write(&mut self, vaddr: usize, bytes: &[u8]) -> bool {
        let off = vaddr % PAGE_SIZE;
        if off + bytes.len() > PAGE_SIZE {
            return false;
        }
        match self.entries.get_mut(&(vaddr / PAGE_SIZE)) {
            Some(pte) => {
                pte.frame.0[off..off + bytes.len()].copy_from_slice(bytes);
                pte.flags |= PTE_A | PTE_D;
                true
            }
            None => false,
        }
    }

    /// 读取已映射页的内容，不改变标志位
    pub fn peek(&self, vaddr: usize, out: &mut [u8]) -> bool {
        let off = vaddr % PAGE_SIZE;
        if off + out.len() > PAGE_SIZE {
            return false;
        }
        match self.entries.get(&(vaddr / PAGE_SIZE)) {
            Some(pte) => {
                out.copy_from_slice(&pte.frame.0[off..off + out.len()]);
                true
            }
            None => false,
        }
    }

    pub fn is_mapped(&self, vpn: usize) -> bool {
        self.entries.contains_key(&vpn)
    }

    pub fn mapped_pages(&self) -> usize {
        self.entries.len()
    }

    /// 因解除映射而释放的页帧总数
    pub fn freed_frames(&self) -> usize {
        self.freed_frames
    }
}
