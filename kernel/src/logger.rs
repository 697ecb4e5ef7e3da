//! Minimal leveled logger over the serial sink.
//!
//! A deliberately small slice of `nexa-sys-nexa-os`'s `src/logger.rs`: that
//! logger drives a ring buffer, a VGA console, and TSC-based timestamps. This
//! subsystem only needs the level-tagged line format, so only that much is
//! kept.

use core::fmt;
use core::sync::atomic::{AtomicU8, Ordering};

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
}

impl LogLevel {
    const fn as_str(self) -> &'static str {
        match self {
            LogLevel::Error => "ERROR",
            LogLevel::Warn => "WARN",
            LogLevel::Info => "INFO",
            LogLevel::Debug => "DEBUG",
        }
    }

    const fn priority(self) -> u8 {
        match self {
            LogLevel::Error => 0,
            LogLevel::Warn => 1,
            LogLevel::Info => 2,
            LogLevel::Debug => 3,
        }
    }
}

static LOG_LEVEL: AtomicU8 = AtomicU8::new(LogLevel::Info.priority());

/// Raise or lower the minimum level that reaches the sink.
pub fn set_level(level: LogLevel) {
    LOG_LEVEL.store(level.priority(), Ordering::Relaxed);
}

#[doc(hidden)]
pub fn log(level: LogLevel, args: fmt::Arguments<'_>) {
    if level.priority() > LOG_LEVEL.load(Ordering::Relaxed) {
        return;
    }
    crate::serial::_print(format_args!("[{}] {}\n", level.as_str(), args));
}
