mod common;

use vfs::{FsError, Pipe};

#[test]
fn test_pipe_fills_up_and_drains() {
    common::init();
    let (r, w) = Pipe::create_pair();
    assert!(w.is_write_end());
    assert!(!r.is_write_end());

    let data = [7u8; 600];
    let n = w.write(&data).unwrap();
    assert_eq!(n, 512);
    assert_eq!(w.write(&data), Err(FsError::WouldBlock));

    let mut buf = [0u8; 600];
    assert_eq!(r.read(&mut buf).unwrap(), 512);
    assert_eq!(w.write(&data[..10]).unwrap(), 10);
}

#[test]
fn test_pipe_wrong_end() {
    common::init();
    let (r, w) = Pipe::create_pair();
    let mut buf = [0u8; 4];
    assert_eq!(w.read(&mut buf), Err(FsError::InvalidArgument));
    assert_eq!(r.write(b"x"), Err(FsError::InvalidArgument));
}

#[test]
fn test_write_after_reader_closed_is_broken_pipe() {
    common::init();
    let (r, w) = Pipe::create_pair();
    drop(r);
    assert_eq!(w.write(b"lost"), Err(FsError::BrokenPipe));
    assert_eq!(FsError::BrokenPipe.to_errno(), -32);
}
