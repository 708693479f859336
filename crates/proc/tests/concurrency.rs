mod common;

use std::sync::Arc;
use std::thread;

use common::{PAGE_SIZE, fault_in, file_table, open, pool, process, ram_file, user_write, vma_count};
use mm::{MmapError, UsizeConvert, mm_config};
use proc::syscall::{sys_mmap, sys_munmap};
use uapi::mm::{MAP_FAILED, MapFlags, ProtFlags};
use vfs::OpenFlags;

const RW: u32 = ProtFlags::READ_WRITE.bits();
const SHARED: u32 = MapFlags::SHARED.bits();

#[test]
fn test_pool_is_shared_between_processes() {
    let pool = pool(4);
    let table = file_table();
    let p1 = process(1, &pool);
    let p2 = process(2, &pool);
    let (fd1, _f1) = open(&p1, &table, ram_file(0, 0), OpenFlags::O_RDWR);
    let (fd2, f2) = open(&p2, &table, ram_file(0, 0), OpenFlags::O_RDWR);

    let mut first = Vec::new();
    for _ in 0..3 {
        first.push(sys_mmap(&p1, 0, PAGE_SIZE, RW, SHARED, fd1, 0));
    }
    assert_ne!(sys_mmap(&p2, 0, PAGE_SIZE, RW, SHARED, fd2, 0), MAP_FAILED);
    assert_eq!(pool.in_use(), 4);

    let refs = f2.ref_count();
    assert_eq!(
        p2.mmap(0, PAGE_SIZE, ProtFlags::READ, MapFlags::SHARED, fd2 as usize, 0),
        Err(MmapError::ResourceExhausted)
    );
    assert_eq!(vma_count(&p2), 1);
    assert_eq!(f2.ref_count(), refs);

    // 另一个进程释放槽位后即可复用
    assert_eq!(sys_munmap(&p1, first[1], PAGE_SIZE), 0);
    assert_ne!(sys_mmap(&p2, 0, PAGE_SIZE, RW, SHARED, fd2, 0), MAP_FAILED);
    assert_eq!(pool.in_use(), 4);
}

#[test]
fn test_per_process_limit_comes_before_pool() {
    let limit = {
        common::init();
        mm_config().max_vmas_per_space()
    };
    let pool = pool(limit * 2);
    let table = file_table();
    let p = process(1, &pool);
    let q = process(2, &pool);
    let (fd, _file) = open(&p, &table, ram_file(0, 0), OpenFlags::O_RDWR);
    let (qfd, _qfile) = open(&q, &table, ram_file(0, 0), OpenFlags::O_RDWR);

    for _ in 0..limit {
        assert_ne!(sys_mmap(&p, 0, PAGE_SIZE, RW, SHARED, fd, 0), MAP_FAILED);
    }
    assert_eq!(
        p.mmap(0, PAGE_SIZE, ProtFlags::READ, MapFlags::SHARED, fd as usize, 0),
        Err(MmapError::ResourceExhausted)
    );
    assert_eq!(pool.in_use(), limit);
    // 池中仍有空位，其他进程不受影响
    assert_ne!(sys_mmap(&q, 0, PAGE_SIZE, RW, SHARED, qfd, 0), MAP_FAILED);
}

#[test]
fn test_independent_processes_map_and_unmap_concurrently() {
    const THREADS: usize = 8;
    const ROUNDS: usize = 50;

    let pool = pool(THREADS * 2);
    let table = file_table();
    let handles: Vec<_> = (0..THREADS)
        .map(|pid| {
            let pool = pool.clone();
            let table = table.clone();
            thread::spawn(move || {
                let p = process(pid, &pool);
                let inode = ram_file(2 * PAGE_SIZE, 0);
                let (fd, _file) = open(&p, &table, inode.clone(), OpenFlags::O_RDWR);
                for round in 0..ROUNDS {
                    let a = sys_mmap(&p, 0, PAGE_SIZE, RW, SHARED, fd, 0);
                    let b = sys_mmap(&p, 0, PAGE_SIZE, RW, SHARED, fd, PAGE_SIZE as isize);
                    assert_ne!(a, MAP_FAILED);
                    assert_ne!(b, MAP_FAILED);
                    assert!(pool.in_use() <= pool.capacity());
                    fault_in(&p, b);
                    user_write(&p, b, &[round as u8]);
                    assert_eq!(sys_munmap(&p, a, PAGE_SIZE), 0);
                    assert_eq!(sys_munmap(&p, b, PAGE_SIZE), 0);
                }
                assert_eq!(vma_count(&p), 0);
                assert_eq!(inode.contents()[PAGE_SIZE], (ROUNDS - 1) as u8);
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }
    assert_eq!(pool.in_use(), 0);
    assert_eq!(table.in_use(), 0);
}

#[test]
fn test_threads_of_one_process_get_disjoint_mappings() {
    const THREADS: usize = 4;
    const PER_THREAD: usize = 4;

    let pool = pool(THREADS * PER_THREAD);
    let table = file_table();
    let p = Arc::new(process(1, &pool));
    let (fd, _file) = open(&p, &table, ram_file(0, 0), OpenFlags::O_RDWR);

    let handles: Vec<_> = (0..THREADS)
        .map(|i| {
            let p = p.clone();
            thread::spawn(move || {
                (0..PER_THREAD)
                    .map(|_| sys_mmap(&*p, 0, (i + 1) * PAGE_SIZE, RW, SHARED, fd, 0))
                    .collect::<Vec<_>>()
            })
        })
        .collect();
    let mut addrs: Vec<usize> = handles
        .into_iter()
        .flat_map(|handle| handle.join().unwrap())
        .collect();
    assert!(addrs.iter().all(|a| *a != MAP_FAILED));
    addrs.sort_unstable();
    addrs.dedup();
    assert_eq!(addrs.len(), THREADS * PER_THREAD);

    let mm = p.mm().lock();
    assert_eq!(mm.vma_count(), THREADS * PER_THREAD);
    for pair in mm.vmas().windows(2) {
        assert!(pair[0].end() <= pair[1].start());
    }
    assert!(mm.vmas().iter().all(|vma| vma.start().as_usize() >= mm_config().mmap_base()));
}
