//! 全局 trait 对象注册
//!
//! 各 crate 的外部依赖（架构操作、配置、文件系统日志）都以 `&'static dyn Trait`
//! 的形式在启动时注册一次。[`global_ops!`](crate::global_ops) 为一个 trait 生成
//! 注册函数与访问函数，未注册就访问会 panic。

use core::sync::atomic::{AtomicUsize, Ordering};

/// `&'static dyn Trait` 的存储槽，fat pointer 拆成 data / vtable 两半保存
pub struct FatPtrSlot {
    data: AtomicUsize,
    vtable: AtomicUsize,
}

impl FatPtrSlot {
    /// 空槽
    pub const fn new() -> Self {
        Self {
            data: AtomicUsize::new(0),
            vtable: AtomicUsize::new(0),
        }
    }

    /// 保存拆开的 fat pointer；data 最后写入，读者看到非零 data 时 vtable 已就绪
    pub fn store(&self, (data, vtable): (usize, usize)) {
        self.vtable.store(vtable, Ordering::Release);
        self.data.store(data, Ordering::Release);
    }

    /// 读取 fat pointer 的两半，未注册时返回 `None`
    pub fn load(&self) -> Option<(usize, usize)> {
        match self.data.load(Ordering::Acquire) {
            0 => None,
            data => Some((data, self.vtable.load(Ordering::Acquire))),
        }
    }
}

impl Default for FatPtrSlot {
    fn default() -> Self {
        Self::new()
    }
}

/// 为 trait 生成全局注册函数和访问函数
///
/// ```ignore
/// sync::global_ops! {
///     /// 注册
///     pub unsafe fn register_vfs_ops;
///     /// 获取
///     pub fn vfs_ops() -> &'static dyn VfsOps;
/// }
/// ```
///
/// 同一个模块里只能展开一次。
#[macro_export]
macro_rules! global_ops {
    (
        $(#[$reg_attr:meta])*
        $reg_vis:vis unsafe fn $register:ident;
        $(#[$get_attr:meta])*
        $get_vis:vis fn $get:ident() -> &'static dyn $trait:ident;
    ) => {
        static GLOBAL_OPS_SLOT: $crate::FatPtrSlot = $crate::FatPtrSlot::new();

        $(#[$reg_attr])*
        $reg_vis unsafe fn $register(ops: &'static dyn $trait) {
            let ptr = ops as *const dyn $trait;
            // SAFETY: fat pointer 的布局是 (data, vtable)
            let parts = unsafe { ::core::mem::transmute::<*const dyn $trait, (usize, usize)>(ptr) };
            GLOBAL_OPS_SLOT.store(parts);
        }

        $(#[$get_attr])*
        #[inline]
        $get_vis fn $get() -> &'static dyn $trait {
            match GLOBAL_OPS_SLOT.load() {
                // SAFETY: 两半都来自注册时的 &'static 引用
                Some(parts) => unsafe {
                    &*::core::mem::transmute::<(usize, usize), *const dyn $trait>(parts)
                },
                None => panic!(concat!(
                    stringify!($trait),
                    " not registered, call ",
                    stringify!($register),
                    " first"
                )),
            }
        }
    };
}
