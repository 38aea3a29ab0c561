//! Frame sources and clocks consumed by the poller.

use crate::image::OwnedImage;
use crate::util::ScreenMatchResult;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Delivers a fresh context image for every poll iteration.
///
/// Errors are treated as transient by the wait loops.
pub trait FrameSource {
    fn capture(&mut self) -> ScreenMatchResult<OwnedImage>;
}

impl<F> FrameSource for F
where
    F: FnMut() -> ScreenMatchResult<OwnedImage>,
{
    fn capture(&mut self) -> ScreenMatchResult<OwnedImage> {
        self()
    }
}

/// Monotonic time source for timeout accounting.
pub trait Clock {
    /// Time elapsed since an arbitrary fixed origin.
    fn now(&self) -> Duration;
}

/// `Instant`-backed clock.
#[derive(Clone, Copy, Debug)]
pub struct MonotonicClock {
    origin: Instant,
}

impl MonotonicClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for MonotonicClock {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }
}

/// Shared flag that stops a wait at its next loop boundary.
#[derive(Clone, Debug, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Acquire)
    }

    /// Clears the flag so the token can be reused.
    pub fn reset(&self) {
        self.flag.store(false, Ordering::Release);
    }
}
