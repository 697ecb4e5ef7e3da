//! Swap subsystem error kinds.
//!
//! Styled after `examples/nexa-sys-nexa-os/src/drivers/block/mod.rs`'s
//! `BlockError`: a small `Copy` enum with a classification method, rather
//! than a boxed/`String`-carrying error type (this crate is `no_std`
//! without `alloc`).

use core::fmt;

/// Whether an error is recoverable by the caller or indicates a kernel
/// invariant violation that must halt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Transient; the caller may retry with a different victim/slot/frame.
    Soft,
    /// A kernel invariant was violated. The only correct response is to
    /// halt.
    Fatal,
}

/// Errors the swap subsystem can report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwapError {
    /// Slot table full on swap-out. Eviction is abandoned for this page.
    NoSlot,
    /// Frame allocator empty during swap-in.
    NoFrame,
    /// Swap-in observed a decoded slot that is free or out-of-range.
    InvalidSlot,
    /// Swap-in was invoked on a PTE without the `SWAPPED` bit set.
    NotSwapped,
    /// `release` was called with a slot index outside `0..NSWAPSLOTS`.
    ReleaseOutOfRange,
}

impl SwapError {
    /// Soft errors are surfaced upward; fatal errors indicate a bug or
    /// corrupted state and must halt the system.
    pub const fn severity(self) -> Severity {
        match self {
            SwapError::NoSlot | SwapError::NoFrame => Severity::Soft,
            SwapError::InvalidSlot | SwapError::NotSwapped | SwapError::ReleaseOutOfRange => {
                Severity::Fatal
            }
        }
    }
}

impl fmt::Display for SwapError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            SwapError::NoSlot => "no free swap slot",
            SwapError::NoFrame => "no free physical frame",
            SwapError::InvalidSlot => "decoded swap slot is free or out of range",
            SwapError::NotSwapped => "swap-in invoked on a non-swapped PTE",
            SwapError::ReleaseOutOfRange => "release() called with an out-of-range slot index",
        };
        f.write_str(msg)
    }
}

/// Halts the system after logging a fatal invariant violation.
///
/// A real kernel wires this to whatever `arch::halt_loop`-style primitive it
/// has (`examples/nexa-sys-nexa-os/src/arch/mod.rs`); this crate has no
/// architecture to halt, so it logs and spins forever, which is the
/// worst-case behavior a caller can rely on in a `no_std` context without
/// `abort`.
pub fn fatal(err: SwapError) -> ! {
    crate::kerror!("swap: fatal: {err}");
    #[cfg(test)]
    {
        panic!("swap: fatal: {err}");
    }
    #[cfg(not(test))]
    loop {
        core::hint::spin_loop();
    }
}
