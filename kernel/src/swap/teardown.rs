//! Process Teardown Hook: reclaims every swap slot still owned by an exiting
//! process.
//!
//! Walks every virtual page of an exiting process and returns any swapped
//! slots it owns to the slot table. Ground:
//! `examples/original_source/xv6/pageswap.c` has no direct analogue for this
//! (the C source leaves it as an implicit TODO for the exit path); the walk
//! shape mirrors `find_victim_page`'s page-at-a-time scan.

use crate::collab::{PageTableWalker, ProcessHandle, VirtAddr};
use crate::swap::config::PAGE_SIZE;
use crate::swap::pte::decode_swapped;
use crate::swap::slot::SlotTable;

/// Release every swap slot owned by `process`. Unmapped addresses are
/// silently skipped. Called by the process-exit path before the address
/// space is dismantled.
///
/// # Safety
/// `walker` must resolve leaves belonging to `process`'s still-live address
/// space.
pub unsafe fn release_all_swap(
    slots: &SlotTable,
    walker: &dyn PageTableWalker,
    process: &dyn ProcessHandle,
) {
    let root = process.page_table_root();
    let mut vaddr: VirtAddr = 0;
    let mut released = 0usize;
    while vaddr < process.virtual_size() {
        if let Some(pte_ptr) = walker.walk(root, vaddr) {
            let value = *pte_ptr;
            if let Some(slot) = decode_swapped(value) {
                slots.release(slot);
                released += 1;
            }
        }
        vaddr += PAGE_SIZE as u64;
    }
    if released > 0 {
        crate::kinfo!("swap: teardown: pid={} released {} slots", process.pid(), released);
    }
}
