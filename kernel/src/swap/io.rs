//! Swap-out / Swap-in: evict a resident page to backing store and restore a
//! swapped-out page on demand.
//!
//! Composes the slot table, the block I/O adapter, and the PTE codec to
//! evict a page and to restore a faulted one. Ground:
//! `examples/original_source/xv6/pageswap.c`'s `swap_out_page`/`swap_in_page`.
//!
//! Physical frames are assumed identity-mapped into the kernel's own address
//! space (true of every teaching kernel this spec targets, and of
//! `nexa-sys-nexa-os`'s low-memory direct map), so a [`PhysAddr`] doubles as
//! a valid `*mut u8`/`*const u8` for the block I/O adapter.

use crate::collab::{BlockDevice, FrameAllocator, PageTableWalker, ProcessHandle, VirtAddr};
use crate::swap::blockio;
use crate::swap::error::SwapError;
use crate::swap::pte::{decode_swapped, encode_present, encode_swapped, is_present, PERM_MASK};
use crate::swap::slot::SlotTable;

/// Collaborators needed by swap-out and swap-in. Bundled so call sites don't
/// thread four separate trait-object parameters through every call.
pub struct SwapIo<'a> {
    pub slots: &'a SlotTable,
    pub frames: &'a dyn FrameAllocator,
    pub blocks: &'a dyn BlockDevice,
    pub walker: &'a dyn PageTableWalker,
}

/// Evict the page at `vaddr` in `process`'s address space to a swap slot.
///
/// Precondition: the leaf at `vaddr` has `PRESENT = 1`. Returns
/// [`SwapError::NoSlot`] (soft) if the slot table is full; the caller may
/// retry with a different victim.
pub fn swap_out(io: &SwapIo<'_>, process: &dyn ProcessHandle, vaddr: VirtAddr) -> Result<(), SwapError> {
    let root = process.page_table_root();

    // SAFETY: caller-provided walker/root describe a live address space;
    // see `PageTableWalker::walk`'s safety contract.
    let pte_ptr = unsafe { io.walker.walk(root, vaddr) }.expect("swap_out: leaf must exist");
    let old_pte = unsafe { *pte_ptr };
    debug_assert!(is_present(old_pte), "swap_out precondition: leaf must be present");

    let frame = old_pte & !PERM_MASK;

    let slot = io.slots.allocate().ok_or_else(|| {
        crate::kwarn!("swap: out: pid={} va={:#x} no free slot", process.pid(), vaddr);
        SwapError::NoSlot
    })?;
    io.slots.save_perm(slot, old_pte & PERM_MASK);

    // SAFETY: `frame` is an identity-mapped physical frame the caller owns
    // exclusively until it is freed below.
    unsafe {
        blockio::write_page(io.blocks, slot, frame as *const u8);
    }

    unsafe {
        *pte_ptr = encode_swapped(slot, old_pte);
    }
    io.walker.invalidate(root, vaddr);

    io.frames.free_frame(frame);
    process.adjust_rss(-1);

    crate::kinfo!("swap: out: pid={} va={:#x} slot={}", process.pid(), vaddr, slot);
    Ok(())
}

/// Restore the page at `vaddr` in `process`'s address space from its swap
/// slot.
///
/// Precondition: the leaf at `vaddr` has `PRESENT = 0, SWAPPED = 1`.
/// Returns [`SwapError::NoFrame`] (soft) if no physical frame is available.
/// Halts (via [`crate::swap::error::fatal`]) on [`SwapError::NotSwapped`] or
/// [`SwapError::InvalidSlot`], which indicate a routing bug or corrupted PTE
/// encoding.
pub fn swap_in(io: &SwapIo<'_>, process: &dyn ProcessHandle, vaddr: VirtAddr) -> Result<(), SwapError> {
    let root = process.page_table_root();

    // SAFETY: see `swap_out`.
    let pte_ptr = unsafe { io.walker.walk(root, vaddr) }.expect("swap_in: leaf must exist");
    let old_pte = unsafe { *pte_ptr };

    let slot = match decode_swapped(old_pte) {
        Some(slot) => slot,
        None => crate::swap::error::fatal(SwapError::NotSwapped),
    };
    if !io.slots.is_occupied(slot) {
        crate::swap::error::fatal(SwapError::InvalidSlot);
    }

    let frame = io.frames.allocate_frame().ok_or_else(|| {
        crate::kwarn!("swap: in: pid={} va={:#x} no free frame", process.pid(), vaddr);
        SwapError::NoFrame
    })?;

    // SAFETY: `frame` was just allocated and is exclusively owned here.
    unsafe {
        blockio::read_page(io.blocks, slot, frame as *mut u8);
    }

    let perm = io.slots.load_perm(slot);
    unsafe {
        *pte_ptr = encode_present(frame, perm);
    }
    io.slots.release(slot);
    io.walker.invalidate(root, vaddr);

    process.adjust_rss(1);

    crate::kinfo!("swap: in: pid={} va={:#x} slot={}", process.pid(), vaddr, slot);
    Ok(())
}
