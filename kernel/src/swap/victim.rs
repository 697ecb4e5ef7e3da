//! Victim Selector: picks which process and which page to evict next.
//!
//! Global approximation of LRU: pick the eligible process with the largest
//! `rss` (ties broken by smallest pid), then run a second-chance / clock
//! scan over its address space. Ground: `examples/original_source/xv6/pageswap.c`'s
//! `find_victim_proc`/`find_victim_page`.

use crate::collab::{PageTableWalker, Pid, ProcessHandle, ProcessState, ProcessTable, VirtAddr};
use crate::swap::config::PAGE_SIZE;
use crate::swap::pte::{is_present, PRESENT};

/// Bit within the PTE's OS-available range used as the hardware "accessed"
/// indicator for this approximation (bit 5, matching the position `A` holds
/// in both the 32-bit and 64-bit x86 page table formats).
const ACCESSED: u64 = 1 << 5;

fn is_eligible(state: ProcessState) -> bool {
    matches!(state, ProcessState::Running | ProcessState::Runnable | ProcessState::Sleeping)
}

/// Pick the eligible process with the largest `rss`; ties go to the
/// smallest `pid`. Returns `None` if no process is eligible.
pub fn find_victim_process(table: &dyn ProcessTable) -> Option<Pid> {
    let mut best: Option<(Pid, i64)> = None;
    table.for_each(&mut |p: &dyn ProcessHandle| {
        if !is_eligible(p.state()) || p.pid() < 1 {
            return;
        }
        let rss = p.rss();
        let pid = p.pid();
        best = Some(match best {
            None => (pid, rss),
            Some((bpid, brss)) => {
                if rss > brss || (rss == brss && pid < bpid) {
                    (pid, rss)
                } else {
                    (bpid, brss)
                }
            }
        });
    });
    best.map(|(pid, _)| pid)
}

/// Second-chance scan of `process`'s address space: first pass looks for a
/// present-but-unaccessed leaf; if none exists, a reset pass clears every
/// present leaf's accessed bit, and a second pass retries. Returns `None`
/// only if the process has no present leaves at all.
///
/// # Safety
/// `walker` must resolve leaves belonging to `root`'s live address space;
/// see [`PageTableWalker::walk`].
pub unsafe fn find_victim_page(
    walker: &dyn PageTableWalker,
    root: u64,
    virtual_size: VirtAddr,
) -> Option<VirtAddr> {
    if let Some(va) = scan_for_victim(walker, root, virtual_size) {
        return Some(va);
    }

    let mut vaddr = 0u64;
    while vaddr < virtual_size {
        if let Some(pte) = walker.walk(root, vaddr) {
            let value = *pte;
            if is_present(value) && value & ACCESSED != 0 {
                *pte = value & !ACCESSED;
            }
        }
        vaddr += PAGE_SIZE as u64;
    }

    scan_for_victim(walker, root, virtual_size)
}

unsafe fn scan_for_victim(
    walker: &dyn PageTableWalker,
    root: u64,
    virtual_size: VirtAddr,
) -> Option<VirtAddr> {
    let mut vaddr = 0u64;
    while vaddr < virtual_size {
        if let Some(pte) = walker.walk(root, vaddr) {
            let value = *pte;
            if value & PRESENT != 0 && value & ACCESSED == 0 {
                return Some(vaddr);
            }
        }
        vaddr += PAGE_SIZE as u64;
    }
    None
}
