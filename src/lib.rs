//! ScreenMatch is a CPU template matching library for screen automation.
//!
//! It locates a reference image inside a grayscale context image with the
//! normalized correlation coefficient, extracts every well-separated match
//! above a threshold, and polls a frame source until a pattern appears,
//! vanishes or reaches a count. Row-parallel scoring is available via the
//! `rayon` feature; `image-io` adds conversions from the `image` crate.

mod candidate;
pub mod config;
pub mod geom;
pub mod image;
pub mod kernel;
pub mod pattern;
pub mod poll;
pub mod search;
pub mod surface;
pub mod template;
mod trace;
pub mod util;

#[cfg(feature = "image-io")]
pub use image::io;
pub use image::{ImageView, OwnedImage};
pub use template::Template;
pub use util::{ScreenMatchError, ScreenMatchResult};

pub use geom::{Point, Rect};
pub use pattern::Pattern;
pub use poll::{AnyMatch, CancelToken, Clock, FrameSource, MonotonicClock, Poller, WaitConfig};
pub use search::{CcoeffNormed, Match, MatchConfig, Matcher};
pub use surface::CorrelationSurface;
