//! Platform abstraction layer
//!
//! Handles timing for the host loop:
//! - Countdown ticks (one armed timer per session)
//! - Keyed one-shot timers that freeze while the game is paused
//! - Wall clock access on web and native

pub mod timer;

pub use timer::{Countdown, DeferredQueue};

/// Current wall-clock time in milliseconds since the epoch
#[cfg(target_arch = "wasm32")]
pub fn now_ms() -> f64 {
    js_sys::Date::now()
}

/// Current wall-clock time in milliseconds since the epoch
#[cfg(not(target_arch = "wasm32"))]
pub fn now_ms() -> f64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs_f64() * 1000.0)
        .unwrap_or(0.0)
}
