//! Compile-time tunables for the swap subsystem.
//!
//! Doc-commented `pub const`s, one per line, the way
//! `examples/nexa-sys-nexa-os/src/process/types.rs` documents its memory
//! layout constants.

/// Number of fixed-size backing-store slots in the slot table.
pub const NSWAPSLOTS: usize = 800;

/// First block of the swap region, immediately after the boot block and
/// superblock.
pub const SWAP_START: u64 = 2;

/// Size of one backing-store block, in bytes.
pub const BLOCK_SIZE: usize = 512;

/// Page size, in bytes. Must equal `BLOCKS_PER_SLOT * BLOCK_SIZE`.
pub const PAGE_SIZE: usize = 4096;

/// Number of consecutive blocks one slot occupies (4096 / 512).
pub const BLOCKS_PER_SLOT: u64 = (PAGE_SIZE / BLOCK_SIZE) as u64;

/// Initial free-frame low-water mark.
pub const INITIAL_THRESHOLD: u32 = 100;

/// Initial number of pages to evict per low-memory event.
pub const INITIAL_BATCH: u32 = 2;

/// Percent by which `batch` grows after each pressure event.
pub const ALPHA_PERCENT: u32 = 25;

/// Percent by which `threshold` decays after each pressure event.
pub const BETA_PERCENT: u32 = 10;

/// Hard ceiling on `batch`.
pub const BATCH_LIMIT: u32 = 100;

const _LAYOUT_CHECK: () = assert!(BLOCKS_PER_SLOT as usize * BLOCK_SIZE == PAGE_SIZE);
