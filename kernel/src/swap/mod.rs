//! Demand-paging swap subsystem.
//!
//! Wires the slot table, block I/O adapter, PTE codec, victim selector,
//! pressure controller, and teardown hook together behind the four public
//! entry points a kernel calls:
//! [`swap_init`], [`swap_in`], [`check_pressure`], [`release_all_swap`].
//! Everything else in this module tree is private machinery composed by
//! these four functions.

pub mod blockio;
pub mod config;
pub mod error;
pub mod io;
pub mod pressure;
pub mod pte;
pub mod slot;
pub mod teardown;
pub mod victim;

use crate::collab::{BlockDevice, FrameAllocator, PageTableWalker, ProcessHandle, VirtAddr};
use pressure::PressureController;
use slot::SlotTable;

/// Global slot table. One per kernel, lives for the lifetime of the system;
/// initialized once by [`swap_init`].
static SLOT_TABLE: SlotTable = SlotTable::new();

/// Global pressure controller state.
static PRESSURE: PressureController = PressureController::new();

/// Initialize the swap subsystem. Must run once during boot, before any
/// other function in this module is called.
pub fn swap_init() {
    SLOT_TABLE.init();
    PRESSURE.init();
    crate::kinfo!("swap: subsystem initialized");
}

/// Restore the page at `vaddr` in `process`'s address space from its swap
/// slot. Called from the page-fault handler when it observes a non-present
/// leaf with `SWAPPED = 1`.
pub fn swap_in(
    process: &dyn ProcessHandle,
    vaddr: VirtAddr,
    frames: &dyn FrameAllocator,
    blocks: &dyn BlockDevice,
    walker: &dyn PageTableWalker,
) -> Result<(), error::SwapError> {
    let bundle = io::SwapIo { slots: &SLOT_TABLE, frames, blocks, walker };
    io::swap_in(&bundle, process, vaddr)
}

/// Poll free-frame count and evict pages if it has dropped below the
/// current threshold. Called periodically (timer tick or selected
/// allocation points).
pub fn check_pressure(
    frames: &dyn FrameAllocator,
    blocks: &dyn BlockDevice,
    processes: &dyn crate::collab::ProcessTable,
    walker: &dyn PageTableWalker,
) {
    let bundle = io::SwapIo { slots: &SLOT_TABLE, frames, blocks, walker };
    PRESSURE.check_pressure(&bundle, frames, processes, walker);
}

/// Release every swap slot owned by `process`. Called from the process-exit
/// path before its address space is dismantled.
pub fn release_all_swap(process: &dyn ProcessHandle, walker: &dyn PageTableWalker) {
    // SAFETY: `process` is exiting but its address space is still mapped
    // until this call returns.
    unsafe {
        teardown::release_all_swap(&SLOT_TABLE, walker, process);
    }
}

/// Current `(threshold, batch)` of the pressure controller. Not part of the
/// kernel-facing interface; exposed read-only so external test code can
/// assert the adaptive trajectory without reaching into the module's
/// private statics.
pub fn pressure_state() -> (u32, u32) {
    PRESSURE.current()
}
