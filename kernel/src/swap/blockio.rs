//! Block I/O Adapter: transfers whole pages to and from the backing store a
//! block at a time.
//!
//! Transfers exactly one 4 KiB page between a physical frame and the 8
//! consecutive blocks a slot occupies, grounded on
//! `examples/original_source/xv6/pageswap.c`'s `write_page_to_disk` /
//! `read_page_from_disk` (one `bget`/`bwrite`/`brelse` or
//! `bget`/`brelse` cycle per 512 B block).

use crate::collab::BlockDevice;

use super::config::{BLOCKS_PER_SLOT, BLOCK_SIZE, PAGE_SIZE, SWAP_START};

/// First block number occupied by slot `slot`.
fn slot_base_block(slot: usize) -> u64 {
    SWAP_START + (slot as u64) * BLOCKS_PER_SLOT
}

/// Write the 4 KiB page at `page` to the 8 blocks backing `slot`.
///
/// # Safety
/// `page` must point to a valid, readable 4 KiB region.
pub unsafe fn write_page<D: BlockDevice + ?Sized>(dev: &D, slot: usize, page: *const u8) {
    let base = slot_base_block(slot);
    let mut buf = [0u8; BLOCK_SIZE];
    for i in 0..BLOCKS_PER_SLOT {
        let src = page.add((i as usize) * BLOCK_SIZE);
        core::ptr::copy_nonoverlapping(src, buf.as_mut_ptr(), BLOCK_SIZE);
        dev.write_block(base + i, &buf);
    }
}

/// Read the 8 blocks backing `slot` into the 4 KiB page at `page`.
///
/// # Safety
/// `page` must point to a valid, writable 4 KiB region.
pub unsafe fn read_page<D: BlockDevice + ?Sized>(dev: &D, slot: usize, page: *mut u8) {
    let base = slot_base_block(slot);
    let mut buf = [0u8; BLOCK_SIZE];
    for i in 0..BLOCKS_PER_SLOT {
        dev.read_block(base + i, &mut buf);
        let dst = page.add((i as usize) * BLOCK_SIZE);
        core::ptr::copy_nonoverlapping(buf.as_ptr(), dst, BLOCK_SIZE);
    }
}

const _PAGE_IS_EIGHT_BLOCKS: () = assert!(BLOCKS_PER_SLOT as usize * BLOCK_SIZE == PAGE_SIZE);
