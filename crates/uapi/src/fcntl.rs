//! open(2) 相关标志

use bitflags::bitflags;

bitflags! {
    /// 文件打开标志
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct OpenFlags: u32 {
        const O_RDONLY = 0x000;
        const O_WRONLY = 0x001;
        const O_RDWR = 0x002;
        const O_CREATE = 0x200;
        const O_TRUNC = 0x400;
    }
}

impl OpenFlags {
    /// 以这些标志打开的文件是否可读
    pub fn readable(&self) -> bool {
        !self.contains(OpenFlags::O_WRONLY)
    }

    /// 以这些标志打开的文件是否可写
    pub fn writable(&self) -> bool {
        self.contains(OpenFlags::O_WRONLY) || self.contains(OpenFlags::O_RDWR)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_access_mode_from_open_flags() {
        assert!(OpenFlags::O_RDONLY.readable());
        assert!(!OpenFlags::O_RDONLY.writable());
        assert!(!OpenFlags::O_WRONLY.readable());
        assert!(OpenFlags::O_WRONLY.writable());
        assert!(OpenFlags::O_RDWR.readable());
        assert!(OpenFlags::O_RDWR.writable());
    }
}
