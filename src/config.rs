//! Process-wide defaults for thresholds and wait timeouts.
//!
//! The threshold is read when a `Pattern` is created. The timeout is read when
//! a wait starts without an explicit or configured timeout. Changing a default
//! never affects a call that is already running.

use crate::util::{ScreenMatchError, ScreenMatchResult};
use std::sync::atomic::{AtomicU32, AtomicU64, Ordering};
use std::time::Duration;

/// Initial default similarity threshold.
pub const INITIAL_DEFAULT_THRESHOLD: f32 = 0.75;

/// Initial default wait timeout.
pub const INITIAL_DEFAULT_TIMEOUT: Duration = Duration::from_millis(10_000);

// f32 bit pattern of INITIAL_DEFAULT_THRESHOLD.
static DEFAULT_THRESHOLD_BITS: AtomicU32 = AtomicU32::new(0x3F40_0000);
static DEFAULT_TIMEOUT_MS: AtomicU64 = AtomicU64::new(10_000);

/// Returns the threshold given to patterns built without an explicit one.
pub fn default_threshold() -> f32 {
    f32::from_bits(DEFAULT_THRESHOLD_BITS.load(Ordering::Relaxed))
}

/// Sets the default threshold; it must lie in `[-1, 1]`.
pub fn set_default_threshold(threshold: f32) -> ScreenMatchResult<()> {
    validate_threshold(threshold)?;
    DEFAULT_THRESHOLD_BITS.store(threshold.to_bits(), Ordering::Relaxed);
    Ok(())
}

/// Returns the timeout used when a wait is given none.
pub fn default_timeout() -> Duration {
    Duration::from_millis(DEFAULT_TIMEOUT_MS.load(Ordering::Relaxed))
}

/// Sets the default wait timeout, at millisecond resolution.
pub fn set_default_timeout(timeout: Duration) {
    let ms = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX);
    DEFAULT_TIMEOUT_MS.store(ms, Ordering::Relaxed);
}

pub(crate) fn validate_threshold(threshold: f32) -> ScreenMatchResult<()> {
    if threshold.is_nan() || !(-1.0..=1.0).contains(&threshold) {
        return Err(ScreenMatchError::InvalidInput(
            "threshold must be in [-1, 1]",
        ));
    }
    Ok(())
}
