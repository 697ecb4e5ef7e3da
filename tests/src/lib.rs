//! End-to-end scenarios for the demand-paging swap subsystem, driven only
//! through the four kernel-facing entry points (`swap_init`, `swap_in`,
//! `check_pressure`, `release_all_swap`) plus `pressure_state` for
//! diagnostics, against the in-memory collaborator mocks in [`mock`].
#![cfg(test)]


use mock::{ConstantFrameAllocator, MockBlockDevice, MockFrameAllocator, MockPageTable, MockProcess, MockProcessTable};
use nexaswap_kernel::collab::{ProcessHandle, ProcessState};
use nexaswap_kernel::swap::config::PAGE_SIZE;
use nexaswap_kernel::swap::pte::{is_present, PERM_MASK, PRESENT};
use nexaswap_kernel::swap::{check_pressure, pressure_state, swap_in, swap_init};
use serial_test::serial;

#[test]
#[serial]
fn scenario_1_init_and_no_op_pressure() {
    swap_init();
    assert_eq!(pressure_state(), (100, 2));

    let frames = ConstantFrameAllocator::new(800);
    assert_eq!(frames.free_frame_count(), 800);

    let frames = ConstantFrameAllocator::new(200);
    let blocks = MockBlockDevice::new();
    let table = MockProcessTable::new(Vec::new());
    let walker = MockPageTable::new();

    check_pressure(&frames, &blocks, &table, &walker);
    // 200 >= 100: check_pressure must return before touching threshold/batch.
    assert_eq!(pressure_state(), (100, 2));
}

#[test]
#[serial]
fn scenario_2_first_pressure_event_targets_larger_process() {
    swap_init();

    let light = MockProcess::new(1, ProcessState::Sleeping, 10);
    let heavy = MockProcess::new(2, ProcessState::Running, 20);
    let walker = MockPageTable::new();

    let backing: Vec<Box<[u8; PAGE_SIZE]>> =
        (0..30).map(|_| Box::new([0u8; PAGE_SIZE])).collect();
    for (i, page) in backing.iter().take(10).enumerate() {
        walker.map_present(1, (i as u64) * PAGE_SIZE as u64, page.as_ptr() as u64, 0);
    }
    for (i, page) in backing.iter().skip(10).enumerate() {
        walker.map_present(2, (i as u64) * PAGE_SIZE as u64, page.as_ptr() as u64, 0);
    }
    light.adjust_rss(10);
    heavy.adjust_rss(20);

    let table = MockProcessTable::new(vec![light, heavy]);
    let frames = ConstantFrameAllocator::new(50);
    let blocks = MockBlockDevice::new();

    check_pressure(&frames, &blocks, &table, &walker);

    assert_eq!(table.process(1).rss(), 10, "lighter process must be untouched");
    assert_eq!(table.process(2).rss(), 18, "two pages evicted from the heavier process");
    assert_eq!(pressure_state(), (90, 2));
}

#[test]
#[serial]
fn scenario_3_adaptive_growth_trajectory() {
    swap_init();

    let process = MockProcess::new(1, ProcessState::Running, 20);
    let walker = MockPageTable::new();
    let backing: Vec<Box<[u8; PAGE_SIZE]>> = (0..20).map(|_| Box::new([0u8; PAGE_SIZE])).collect();
    for (i, page) in backing.iter().enumerate() {
        walker.map_present(1, (i as u64) * PAGE_SIZE as u64, page.as_ptr() as u64, 0);
    }
    process.adjust_rss(20);
    let table = MockProcessTable::new(vec![process]);

    let frames = ConstantFrameAllocator::new(0);
    let blocks = MockBlockDevice::new();

    let mut trajectory = Vec::new();
    for _ in 0..5 {
        check_pressure(&frames, &blocks, &table, &walker);
        trajectory.push(pressure_state());
    }

    assert_eq!(trajectory, vec![(90, 2), (81, 2), (72, 2), (64, 2), (57, 2)]);
    assert_eq!(table.process(1).rss(), 10);
}

#[test]
#[serial]
fn scenario_4_slot_exhaustion_leaves_remaining_pages_untouched() {
    swap_init();

    const PAGES: usize = 850;
    let process = MockProcess::new(1, ProcessState::Running, PAGES as u64);
    let walker = MockPageTable::new();
    let backing: Vec<Box<[u8; PAGE_SIZE]>> = (0..PAGES).map(|_| Box::new([0u8; PAGE_SIZE])).collect();
    for (i, page) in backing.iter().enumerate() {
        walker.map_present(1, (i as u64) * PAGE_SIZE as u64, page.as_ptr() as u64, 0);
    }
    process.adjust_rss(PAGES as i64);
    let table = MockProcessTable::new(vec![process]);

    // A constant reading keeps every event below threshold: batch is a
    // fixed point at 2 under this formula's integer truncation (2*125/100
    // floors back to 2), so 400 events evict exactly 800 pages, filling the
    // slot table; the 401st event's first eviction attempt finds the table
    // full and stops immediately.
    let frames = ConstantFrameAllocator::new(0);
    let blocks = MockBlockDevice::new();

    for _ in 0..401 {
        check_pressure(&frames, &blocks, &table, &walker);
    }

    assert_eq!(table.process(1).rss(), (PAGES - 800) as i64);

    for i in 0..800u64 {
        let leaf = walker.leaf(1, i * PAGE_SIZE as u64).expect("leaf must still exist");
        assert!(!is_present(leaf), "page {i} should have been evicted");
    }
    for i in 800..PAGES as u64 {
        let leaf = walker.leaf(1, i * PAGE_SIZE as u64).expect("leaf must still exist");
        assert!(is_present(leaf), "page {i} should remain resident: slot table is full");
    }

    // One more event changes nothing further: the slot table stays full.
    check_pressure(&frames, &blocks, &table, &walker);
    assert_eq!(table.process(1).rss(), (PAGES - 800) as i64);
}

#[test]
#[serial]
fn scenario_5_swap_round_trip_preserves_bytes_and_permissions() {
    swap_init();

    let process = MockProcess::new(1, ProcessState::Running, 1);
    let walker = MockPageTable::new();

    let mut page: Box<[u8; PAGE_SIZE]> = Box::new([0u8; PAGE_SIZE]);
    for (i, b) in page.iter_mut().enumerate() {
        *b = (i % 256) as u8;
    }
    let perm_bits = 0b0111;
    walker.map_present(1, 0, page.as_ptr() as u64, perm_bits);
    process.adjust_rss(1);
    let table = MockProcessTable::new(vec![process]);

    let frames = ConstantFrameAllocator::new(0);
    let blocks = MockBlockDevice::new();

    // One event, batch 2: the first iteration evicts the only present page;
    // the second finds no victim page and stops.
    check_pressure(&frames, &blocks, &table, &walker);
    assert_eq!(table.process(1).rss(), 0);
    let swapped_leaf = walker.leaf(1, 0).unwrap();
    assert!(!is_present(swapped_leaf));

    // Simulate memory pressure reusing other frames between swap-out and
    // swap-in: allocate (and leave allocated) several frames from a real
    // pool so swap-in is handed back a *different* frame than the original.
    let real_frames = MockFrameAllocator::new(8);
    for _ in 0..4 {
        let noisy = real_frames.allocate_frame().expect("pool should have spare frames");
        unsafe {
            core::ptr::write_bytes(noisy as *mut u8, 0xAA, PAGE_SIZE);
        }
    }

    let restore_target = table.process(1);
    swap_in(restore_target, 0, &real_frames, &blocks, &walker).expect("swap-in must succeed");

    assert_eq!(table.process(1).rss(), 1);
    let restored_leaf = walker.leaf(1, 0).unwrap();
    assert!(is_present(restored_leaf));
    assert_eq!(restored_leaf & PERM_MASK, perm_bits | PRESENT);

    let restored_frame = restored_leaf & !PERM_MASK;
    let restored_bytes: &[u8] = unsafe {
        core::slice::from_raw_parts(restored_frame as *const u8, PAGE_SIZE)
    };
    for (i, b) in restored_bytes.iter().enumerate() {
        assert_eq!(*b, (i % 256) as u8, "byte {i} mismatched after round trip");
    }
}

#[test]
#[serial]
fn scenario_6_victim_tie_break_prefers_smaller_pid() {
    swap_init();

    let a = MockProcess::new(12, ProcessState::Running, 1);
    let b = MockProcess::new(7, ProcessState::Running, 1);
    a.adjust_rss(5);
    b.adjust_rss(5);
    let table = MockProcessTable::new(vec![a, b]);

    let victim = nexaswap_kernel::swap::victim::find_victim_process(&table);
    assert_eq!(victim, Some(7));
}
