//! 文件元数据 (fstat)

/// 目录
pub const T_DIR: u16 = 1;
/// 普通文件
pub const T_FILE: u16 = 2;
/// 设备
pub const T_DEVICE: u16 = 3;

/// fstat 返回给用户态的文件信息
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Stat {
    /// 文件系统所在磁盘设备号
    pub dev: i32,
    /// Inode 编号
    pub ino: u32,
    /// 文件类型 (`T_DIR` / `T_FILE` / `T_DEVICE`)
    pub file_type: u16,
    /// 硬链接数
    pub nlink: u16,
    /// 文件大小（字节）
    pub size: u64,
}
