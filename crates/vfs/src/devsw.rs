//! 字符设备分派表
//!
//! 以主设备号为下标的驱动表。设备文件的读写按主设备号转发给这里注册的驱动。

use alloc::sync::Arc;
use sync::SpinLock;

use crate::FsError;

/// 主设备号上限（不包含）
pub const NDEV: usize = 10;

/// 字符设备驱动接口
pub trait CharDriver: Send + Sync {
    /// 读取数据，返回读取的字节数
    fn read(&self, buf: &mut [u8]) -> Result<usize, FsError>;

    /// 写入数据，返回写入的字节数
    fn write(&self, buf: &[u8]) -> Result<usize, FsError>;
}

static DEVSW: SpinLock<[Option<Arc<dyn CharDriver>>; NDEV]> =
    SpinLock::new([const { None }; NDEV]);

/// 为主设备号 `major` 注册驱动，替换已有的驱动
pub fn register_device(major: usize, driver: Arc<dyn CharDriver>) -> Result<(), FsError> {
    let mut devsw = DEVSW.lock();
    let slot = devsw.get_mut(major).ok_or(FsError::InvalidArgument)?;
    if slot.replace(driver).is_some() {
        log::warn!("devsw: driver for major {} replaced", major);
    }
    Ok(())
}

/// 查找主设备号 `major` 的驱动
///
/// 主设备号越界或未注册驱动时返回 [`FsError::NoDevice`]。
pub fn get_driver(major: usize) -> Result<Arc<dyn CharDriver>, FsError> {
    DEVSW
        .lock()
        .get(major)
        .and_then(|d| d.clone())
        .ok_or(FsError::NoDevice)
}
