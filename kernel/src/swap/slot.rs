//! Slot Table: the fixed-size pool of backing-store slots used to hold
//! swapped-out pages.
//!
//! A fixed-size array of slot descriptors behind one lock, grounded on the
//! `spin::Mutex`-guarded global tables in
//! `examples/nexa-sys-nexa-os/src/scheduler/table.rs` (`PROCESS_TABLE`).
//! First-fit linear scan mirrors `examples/original_source/xv6/pageswap.c`'s
//! `find_free_slot`.

use spin::Mutex;

use super::config::NSWAPSLOTS;
use super::error::{fatal, SwapError};

/// One backing-store slot's descriptor.
#[derive(Clone, Copy)]
struct SlotDescriptor {
    /// Low 12 bits of the PTE that was evicted into this slot, captured at
    /// swap-out and restored verbatim at swap-in.
    permissions: u64,
    /// Availability. A slot is occupied between swap-out completion and
    /// swap-in (or teardown) of its corresponding PTE.
    free: bool,
}

impl SlotDescriptor {
    const fn new() -> Self {
        Self { permissions: 0, free: true }
    }
}

/// The bounded pool of backing-store slots.
pub struct SlotTable {
    slots: Mutex<[SlotDescriptor; NSWAPSLOTS]>,
}

impl SlotTable {
    pub const fn new() -> Self {
        Self { slots: Mutex::new([SlotDescriptor::new(); NSWAPSLOTS]) }
    }

    /// Mark every slot free and clear its permissions. Must run once during
    /// boot before any other operation on this table.
    pub fn init(&self) {
        let mut slots = self.slots.lock();
        for slot in slots.iter_mut() {
            *slot = SlotDescriptor::new();
        }
        crate::kinfo!("swap: initialization: {} slots created", NSWAPSLOTS);
    }

    /// First-fit allocate a free slot, or `None` if the table is full.
    pub fn allocate(&self) -> Option<usize> {
        let mut slots = self.slots.lock();
        for (i, slot) in slots.iter_mut().enumerate() {
            if slot.free {
                slot.free = false;
                return Some(i);
            }
        }
        None
    }

    /// Release slot `i` back to the free pool.
    ///
    /// # Panics / halts
    /// Releasing an out-of-range index is a programming error and halts the
    /// system with [`SwapError::ReleaseOutOfRange`].
    pub fn release(&self, i: usize) {
        let mut slots = self.slots.lock();
        match slots.get_mut(i) {
            Some(slot) => {
                slot.free = true;
                slot.permissions = 0;
            }
            None => fatal(SwapError::ReleaseOutOfRange),
        }
    }

    /// Whether slot `i` is currently occupied. Used to validate a decoded
    /// slot index before trusting it on swap-in.
    pub fn is_occupied(&self, i: usize) -> bool {
        self.slots.lock().get(i).is_some_and(|s| !s.free)
    }

    /// Stash the low 12 permission bits of an evicted PTE into slot `i`.
    pub fn save_perm(&self, i: usize, bits: u64) {
        if let Some(slot) = self.slots.lock().get_mut(i) {
            slot.permissions = bits;
        }
    }

    /// Read back the permission bits stashed for slot `i`.
    pub fn load_perm(&self, i: usize) -> u64 {
        self.slots.lock().get(i).map(|s| s.permissions).unwrap_or(0)
    }
}

impl Default for SlotTable {
    fn default() -> Self {
        Self::new()
    }
}
