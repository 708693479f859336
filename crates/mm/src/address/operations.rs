//! 地址与页码的基础操作 Trait

/// 获取页大小
#[inline]
pub(crate) fn page_size() -> usize {
    crate::mm_config().page_size()
}

/// 与 usize 互相转换
pub trait UsizeConvert {
    /// 转换为 usize
    fn as_usize(&self) -> usize;
    /// 从 usize 构造
    fn from_usize(value: usize) -> Self;
}

/// 页对齐操作
pub trait AlignOps: UsizeConvert + Sized {
    /// 是否按页对齐
    fn is_page_aligned(&self) -> bool {
        self.as_usize() % page_size() == 0
    }

    /// 向下对齐到页边界
    fn align_down_to_page(&self) -> Self {
        Self::from_usize(self.as_usize() & !(page_size() - 1))
    }

    /// 向上对齐到页边界
    ///
    /// # Panics
    /// 地址位于地址空间最后一页内（向上对齐溢出）时 panic。
    fn align_up_to_page(&self) -> Self {
        let mask = page_size() - 1;
        Self::from_usize((self.as_usize() + mask) & !mask)
    }
}

/// 将字节长度向上取整到页大小的整数倍，溢出时返回 `None`
pub fn page_round_up(len: usize) -> Option<usize> {
    let mask = page_size() - 1;
    len.checked_add(mask).map(|v| v & !mask)
}
