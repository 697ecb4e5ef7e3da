//! External collaborators.
//!
//! The swap core depends on four subsystems it does not implement itself:
//! the physical frame allocator, the block device layer, the
//! page-table walker, and the process table / scheduler. Each is a `Sync`
//! trait here, in the same spirit as `nexa-sys-nexa-os`'s
//! `fs::traits::BlockFileSystem` (`examples/nexa-sys-nexa-os/src/fs/traits.rs`):
//! the subsystem is generic over "someone implements this elsewhere", and a
//! concrete kernel wires in the real frame allocator / block layer / page
//! tables / scheduler through these trait objects.

/// A physical address, in bytes.
pub type PhysAddr = u64;
/// A virtual address, in bytes.
pub type VirtAddr = u64;
/// A process identifier. `0` is reserved (never a live process); victim
/// selection only considers `pid >= 1`.
pub type Pid = u64;

/// Allocates and frees 4 KiB physical frames, and reports how many are free.
///
/// Grounded on the physical-page bookkeeping in
/// `examples/nexa-sys-nexa-os/src/mm/paging.rs` (`NEXT_PT_FRAME`,
/// `NEXT_USER_REGION`, the free-region list) -- the real implementation of
/// this trait in a full kernel would be backed by exactly that allocator.
pub trait FrameAllocator: Sync {
    /// Allocate one 4 KiB physical frame, or `None` if none remain.
    fn allocate_frame(&self) -> Option<PhysAddr>;
    /// Return a frame previously obtained from [`allocate_frame`](Self::allocate_frame).
    fn free_frame(&self, frame: PhysAddr);
    /// Number of frames currently free.
    fn free_frame_count(&self) -> usize;
}

/// Transfers raw 512-byte blocks to and from the backing store.
///
/// Grounded on the per-sector transfer loop in
/// `examples/nexa-sys-nexa-os/src/drivers/block/mod.rs`
/// (`read_sectors`/`write_sectors`), narrowed to the single-block granularity
/// `examples/original_source/xv6/pageswap.c`'s `write_page_to_disk` /
/// `read_page_from_disk` use (`bget`/`bwrite`/`brelse` per 512 B block). No
/// caching decisions are made by callers of this trait; an implementation is
/// free to route through its own buffer cache, as the block layer does.
pub trait BlockDevice: Sync {
    /// Read exactly one 512-byte block starting at `blockno` into `buf`.
    fn read_block(&self, blockno: u64, buf: &mut [u8; 512]);
    /// Write exactly one 512-byte block starting at `blockno` from `buf`.
    fn write_block(&self, blockno: u64, buf: &[u8; 512]);
}

/// Process lifecycle states relevant to victim selection.
///
/// Mirrors `examples/nexa-sys-nexa-os/src/process/types.rs::ProcessState`,
/// widened with a `Runnable` state (xv6 distinguishes `RUNNING`/`RUNNABLE`;
/// NexaOS's own enum collapses the two into `Ready`/`Running`) because the
/// eviction-eligibility rule below names all three explicitly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessState {
    Running,
    Runnable,
    Sleeping,
    Zombie,
}

/// A read/write view onto one process's scheduling and memory-accounting
/// state, as needed by the victim selector and the swap-out/in paths.
///
/// Grounded on `examples/nexa-sys-nexa-os/src/process/types.rs::Process` and
/// the `cr3`/`rss`-style fields a swap implementation needs out of it.
pub trait ProcessHandle {
    fn pid(&self) -> Pid;
    fn state(&self) -> ProcessState;
    /// Current resident-set count: the number of this process's virtual
    /// pages that are presently backed by a physical frame.
    fn rss(&self) -> i64;
    /// Apply a signed delta to the resident-set counter (+1 on swap-in, -1 on
    /// swap-out).
    fn adjust_rss(&self, delta: i64);
    /// Physical address of this process's page-table root, passed to
    /// [`PageTableWalker`] and [`PageTableWalker::invalidate`].
    fn page_table_root(&self) -> PhysAddr;
    /// Upper bound (exclusive) of the virtual address range that should be
    /// walked on this process's behalf, for both victim selection and
    /// swap teardown.
    fn virtual_size(&self) -> VirtAddr;
}

/// Iterates the live process table under its lock and looks processes up by
/// PID.
///
/// Grounded on `examples/nexa-sys-nexa-os/src/scheduler/table.rs`'s
/// `PROCESS_TABLE` (a `spin::Mutex`-guarded table) and its
/// `get_process_from_table`/iteration helpers. The callback shape (rather
/// than returning an iterator) keeps this trait object-safe so it can be
/// passed around as `&dyn ProcessTable`.
pub trait ProcessTable: Sync {
    /// Invoke `visit` once per live process table entry, under the table's
    /// lock.
    fn for_each(&self, visit: &mut dyn FnMut(&dyn ProcessHandle));
    /// Invoke `visit` with the handle for `pid` if it is still live; returns
    /// `false` if `pid` is not found.
    fn with_process(&self, pid: Pid, visit: &mut dyn FnMut(&dyn ProcessHandle)) -> bool;
}

/// Resolves and mutates leaf page-table entries without allocating
/// intermediate tables, and handles the TLB invalidation that must follow
/// any PTE rewrite.
///
/// Grounded on `examples/nexa-sys-nexa-os/src/mm/paging.rs`'s raw
/// `*mut PageTable`/`*mut PageTableEntry` manipulation style and its use of
/// `x86_64::instructions::tlb::flush`/`flush_all` and `Cr3::read`/`write`
/// after rewriting a mapping.
pub trait PageTableWalker: Sync {
    /// Resolve the leaf entry covering `vaddr` inside the address space
    /// rooted at `root`. Returns `None` if any level of the translation is
    /// missing; never allocates a missing intermediate table.
    ///
    /// # Safety
    /// The returned pointer aliases live kernel page-table memory. Callers
    /// must not retain it past the point where the address space could be
    /// torn down, and must serialize concurrent access: callers never touch
    /// the same leaf from two CPUs at once.
    unsafe fn walk(&self, root: PhysAddr, vaddr: VirtAddr) -> Option<*mut u64>;
    /// Invalidate any cached translation for `vaddr` in the address space
    /// rooted at `root` (the simplest correct action is reloading that
    /// address space's root register).
    fn invalidate(&self, root: PhysAddr, vaddr: VirtAddr);
}
