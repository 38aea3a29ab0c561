//! Bounded-time polling over a live frame source.
//!
//! Every wait follows the same cycle: capture a frame, evaluate the stop
//! condition against it, then check the timeout and the cancel token before
//! starting the next capture. Each wait samples at least once, so a zero
//! timeout behaves like a single check. Nothing is kept between calls.
//!
//! Structural matching errors abort a wait immediately. Capture failures are
//! logged and count as "no match" for that iteration.

mod source;

pub use source::{CancelToken, Clock, FrameSource, MonotonicClock};

use crate::config::default_timeout;
use crate::pattern::Pattern;
use crate::search::Match;
use crate::trace::{trace_event, trace_span, trace_warn};
use crate::util::ScreenMatchResult;
use crate::ImageView;
use std::time::Duration;

/// Timing configuration for wait operations.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct WaitConfig {
    /// Timeout used when a wait is called with `None`. `None` here reads the
    /// process-wide default each time a wait starts.
    pub timeout: Option<Duration>,
    /// Pause between samples; zero polls back to back.
    pub idle_delay: Duration,
}

impl WaitConfig {
    /// Resolves the timeout for a wait given the caller's override.
    pub fn resolve_timeout(&self, timeout: Option<Duration>) -> Duration {
        timeout.or(self.timeout).unwrap_or_else(default_timeout)
    }
}

/// Result of [`Poller::wait_for_any`]: which pattern matched, and where.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AnyMatch {
    /// Index of the winning pattern in the caller's slice.
    pub index: usize,
    /// The winning pattern's best match.
    pub matched: Match,
}

enum Verdict<T> {
    Satisfied(T),
    Pending(Option<T>),
}

enum Outcome<T> {
    Satisfied(T),
    TimedOut(Option<T>),
}

/// Repeatedly captures frames and matches patterns against them.
pub struct Poller<S, C = MonotonicClock> {
    source: S,
    clock: C,
    cfg: WaitConfig,
    origin: (i32, i32),
    cancel: Option<CancelToken>,
}

impl<S: FrameSource> Poller<S, MonotonicClock> {
    /// Creates a poller with a monotonic clock and the default wait config.
    ///
    /// The default config has no timeout of its own, so every wait started
    /// with `None` reads the current process-wide default.
    pub fn new(source: S) -> Self {
        Self {
            source,
            clock: MonotonicClock::new(),
            cfg: WaitConfig::default(),
            origin: (0, 0),
            cancel: None,
        }
    }
}

impl<S: FrameSource, C: Clock> Poller<S, C> {
    /// Replaces the clock used for timeout accounting.
    pub fn with_clock<C2: Clock>(self, clock: C2) -> Poller<S, C2> {
        Poller {
            source: self.source,
            clock,
            cfg: self.cfg,
            origin: self.origin,
            cancel: self.cancel,
        }
    }

    /// Replaces the wait configuration.
    pub fn with_config(mut self, cfg: WaitConfig) -> Self {
        self.cfg = cfg;
        self
    }

    /// Sets the screen position of the captured region; results are
    /// translated by it.
    pub fn with_origin(mut self, x: i32, y: i32) -> Self {
        self.origin = (x, y);
        self
    }

    /// Stops waits early once `token` is cancelled.
    pub fn with_cancel(mut self, token: CancelToken) -> Self {
        self.cancel = Some(token);
        self
    }

    /// Returns the wait configuration.
    pub fn config(&self) -> &WaitConfig {
        &self.cfg
    }

    /// Mutable access to the frame source between waits.
    pub fn source_mut(&mut self) -> &mut S {
        &mut self.source
    }

    /// Consumes the poller and returns its frame source.
    pub fn into_source(self) -> S {
        self.source
    }

    /// Captures once and returns the best match if it clears the threshold.
    ///
    /// Capture errors are returned to the caller.
    pub fn find_once(&mut self, pattern: &Pattern) -> ScreenMatchResult<Option<Match>> {
        let frame = self.source.capture()?;
        let found = pattern.find_in(frame.view())?;
        Ok(found.map(|m| self.translate(m)))
    }

    /// Captures once and returns every match that clears the threshold.
    pub fn find_all_once(&mut self, pattern: &Pattern) -> ScreenMatchResult<Vec<Match>> {
        let frame = self.source.capture()?;
        let found = pattern.find_all_in(frame.view())?;
        Ok(found.into_iter().map(|m| self.translate(m)).collect())
    }

    /// Waits until `pattern` appears; `None` on timeout.
    pub fn wait_for_match(
        &mut self,
        pattern: &Pattern,
        timeout: Option<Duration>,
    ) -> ScreenMatchResult<Option<Match>> {
        let outcome = self.run("wait_for_match", timeout, |frame| {
            Ok(match pattern.find_in(frame)? {
                Some(found) => Verdict::Satisfied(found),
                None => Verdict::Pending(None),
            })
        })?;
        Ok(match outcome {
            Outcome::Satisfied(found) => Some(self.translate(found)),
            Outcome::TimedOut(_) => None,
        })
    }

    /// Waits until at least `count` matches are visible at once.
    ///
    /// On timeout, returns the matches of the last evaluated frame, which may
    /// be fewer than `count`.
    pub fn wait_for_count(
        &mut self,
        pattern: &Pattern,
        count: usize,
        timeout: Option<Duration>,
    ) -> ScreenMatchResult<Vec<Match>> {
        let outcome = self.run("wait_for_count", timeout, |frame| {
            let found = pattern.find_all_in(frame)?;
            Ok(if found.len() >= count {
                Verdict::Satisfied(found)
            } else {
                Verdict::Pending(Some(found))
            })
        })?;
        let found = match outcome {
            Outcome::Satisfied(found) => found,
            Outcome::TimedOut(last) => last.unwrap_or_default(),
        };
        Ok(found.into_iter().map(|m| self.translate(m)).collect())
    }

    /// Waits until `pattern` is no longer found.
    ///
    /// Returns `true` once a frame without the pattern was seen, `false` on
    /// timeout.
    pub fn wait_for_vanish(
        &mut self,
        pattern: &Pattern,
        timeout: Option<Duration>,
    ) -> ScreenMatchResult<bool> {
        let outcome = self.run("wait_for_vanish", timeout, |frame| {
            Ok(match pattern.find_in(frame)? {
                Some(_) => Verdict::Pending(None),
                None => Verdict::Satisfied(()),
            })
        })?;
        Ok(matches!(outcome, Outcome::Satisfied(())))
    }

    /// Waits until any of `patterns` appears.
    ///
    /// All patterns are checked against the same frame, in order; the first
    /// one that clears its own threshold wins even when a later one scores
    /// higher.
    pub fn wait_for_any(
        &mut self,
        patterns: &[Pattern],
        timeout: Option<Duration>,
    ) -> ScreenMatchResult<Option<AnyMatch>> {
        if patterns.is_empty() {
            return Ok(None);
        }
        let outcome = self.run("wait_for_any", timeout, |frame| {
            for (index, pattern) in patterns.iter().enumerate() {
                if let Some(matched) = pattern.find_in(frame)? {
                    return Ok(Verdict::Satisfied(AnyMatch { index, matched }));
                }
            }
            Ok(Verdict::Pending(None))
        })?;
        Ok(match outcome {
            Outcome::Satisfied(any) => Some(AnyMatch {
                matched: self.translate(any.matched),
                ..any
            }),
            Outcome::TimedOut(_) => None,
        })
    }

    fn translate(&self, found: Match) -> Match {
        found.offset(self.origin.0, self.origin.1)
    }

    fn cancelled(&self) -> bool {
        self.cancel.as_ref().is_some_and(CancelToken::is_cancelled)
    }

    fn run<T>(
        &mut self,
        op: &'static str,
        timeout: Option<Duration>,
        mut eval: impl FnMut(ImageView<'_, u8>) -> ScreenMatchResult<Verdict<T>>,
    ) -> ScreenMatchResult<Outcome<T>> {
        let timeout = self.cfg.resolve_timeout(timeout);
        let _span = trace_span!("poll", op = op, timeout_ms = timeout.as_millis() as u64).entered();

        let start = self.clock.now();
        let mut samples = 0usize;
        let mut last = None;
        loop {
            match self.source.capture() {
                Ok(frame) => {
                    samples += 1;
                    match eval(frame.view())? {
                        Verdict::Satisfied(value) => {
                            trace_event!(
                                "poll_satisfied",
                                samples = samples,
                                elapsed_ms = self.clock.now().saturating_sub(start).as_millis() as u64
                            );
                            return Ok(Outcome::Satisfied(value));
                        }
                        Verdict::Pending(value) => {
                            if value.is_some() {
                                last = value;
                            }
                        }
                    }
                }
                Err(err) => {
                    trace_warn!("capture_failed", op = op, reason = err.to_string().as_str());
                }
            }

            let elapsed = self.clock.now().saturating_sub(start);
            if elapsed >= timeout || self.cancelled() {
                trace_event!(
                    "poll_timed_out",
                    samples = samples,
                    elapsed_ms = elapsed.as_millis() as u64,
                    cancelled = self.cancelled()
                );
                return Ok(Outcome::TimedOut(last));
            }
            if !self.cfg.idle_delay.is_zero() {
                std::thread::sleep(self.cfg.idle_delay);
            }
        }
    }
}
