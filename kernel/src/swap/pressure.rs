//! Pressure Controller: polls free-frame count against an adaptively
//! decaying threshold and evicts an adaptively growing batch of pages.
//!
//! A geometric feedback loop: each pressure event lowers the low-water mark
//! and grows the batch size, per `examples/original_source/xv6/pageswap.c`'s
//! `update_swap_threshold` (`alpha=25`, `beta=10`, `LIMIT=100`).

use spin::Mutex;

use crate::collab::{FrameAllocator, PageTableWalker, ProcessTable};
use crate::swap::config::{ALPHA_PERCENT, BATCH_LIMIT, BETA_PERCENT, INITIAL_BATCH, INITIAL_THRESHOLD};
use crate::swap::io::SwapIo;
use crate::swap::victim::{find_victim_page, find_victim_process};

/// Mutable state of the pressure controller: the free-frame low-water mark
/// and the per-event eviction batch size.
///
/// `threshold` decays monotonically and is never raised again when pressure
/// relaxes: there is no pressure-relief path back up, by design, so repeated
/// low-memory events drive the system toward evicting earlier and evicting
/// more each time.
pub struct PressureController {
    state: Mutex<State>,
}

struct State {
    threshold: u32,
    batch: u32,
}

impl PressureController {
    pub const fn new() -> Self {
        Self { state: Mutex::new(State { threshold: INITIAL_THRESHOLD, batch: INITIAL_BATCH }) }
    }

    /// Reset to the initial threshold/batch. Called once during boot.
    pub fn init(&self) {
        let mut state = self.state.lock();
        state.threshold = INITIAL_THRESHOLD;
        state.batch = INITIAL_BATCH;
    }

    /// Current `(threshold, batch)`, for tests and diagnostics.
    pub fn current(&self) -> (u32, u32) {
        let state = self.state.lock();
        (state.threshold, state.batch)
    }

    /// Poll the free-frame count and, if below `threshold`, evict up to
    /// `batch` pages before updating `threshold` and `batch` for next time.
    ///
    /// Each eviction picks a fresh victim process and victim page; if either
    /// selection comes up empty the batch stops early (there is nothing left
    /// worth evicting this round).
    pub fn check_pressure(
        &self,
        io: &SwapIo<'_>,
        frames: &dyn FrameAllocator,
        processes: &dyn ProcessTable,
        walker: &dyn PageTableWalker,
    ) {
        let (threshold, batch) = {
            let state = self.state.lock();
            (state.threshold, state.batch)
        };

        if frames.free_frame_count() as u32 >= threshold {
            return;
        }

        crate::kinfo!("swap: pressure: threshold={} batch={}", threshold, batch);

        for _ in 0..batch {
            let Some(pid) = find_victim_process(processes) else {
                break;
            };
            let mut evicted = false;
            processes.with_process(pid, &mut |process| {
                let root = process.page_table_root();
                let vsize = process.virtual_size();
                // SAFETY: `root`/`vsize` describe `process`'s own live
                // address space, walked under the process table's lock.
                let victim = unsafe { find_victim_page(walker, root, vsize) };
                if let Some(vaddr) = victim {
                    if crate::swap::io::swap_out(io, process, vaddr).is_ok() {
                        evicted = true;
                    }
                }
            });
            if !evicted {
                break;
            }
        }

        let mut state = self.state.lock();
        state.threshold = core::cmp::max(1, state.threshold * (100 - BETA_PERCENT) / 100);
        state.batch = core::cmp::min(BATCH_LIMIT, core::cmp::max(1, state.batch * (100 + ALPHA_PERCENT) / 100));
    }
}

impl Default for PressureController {
    fn default() -> Self {
        Self::new()
    }
}
