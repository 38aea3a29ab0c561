//! Matching strategies and their result types.
//!
//! A `Matcher` turns a context image and a search image into either the single
//! best placement or every well-separated placement above a threshold. The
//! normalized correlation coefficient strategy lives in [`ccoeff`].

use crate::geom::Rect;
use crate::util::{ScreenMatchError, ScreenMatchResult};
use crate::ImageView;
use std::fmt::Debug;

pub mod ccoeff;

pub use ccoeff::CcoeffNormed;

/// Fraction of the search size suppressed on each side of an extracted peak.
///
/// Empirical: a distinct second instance sits roughly one pattern width away,
/// so a window of about one pattern size centered on the peak removes the
/// near-duplicate neighbours of the same object. Tune through
/// [`MatchConfig::suppression_ratio`].
pub const DEFAULT_SUPPRESSION_RATIO: f32 = 0.5;

/// A located pattern: the matched region and its similarity score.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Match {
    /// Matched region; its size equals the reference image size.
    pub rect: Rect,
    /// Similarity score, higher is better.
    pub similarity: f32,
}

impl Match {
    pub fn new(rect: Rect, similarity: f32) -> Self {
        Self { rect, similarity }
    }

    /// Returns the match translated by `(dx, dy)`.
    pub fn offset(self, dx: i32, dy: i32) -> Self {
        Self {
            rect: self.rect.offset(dx, dy),
            ..self
        }
    }
}

/// Configuration for peak extraction.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MatchConfig {
    /// Suppression half-extent as a fraction of the search size, in `(0, 1]`.
    pub suppression_ratio: f32,
    /// Use the row-parallel kernel (only with the `rayon` feature).
    pub parallel: bool,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            suppression_ratio: DEFAULT_SUPPRESSION_RATIO,
            parallel: false,
        }
    }
}

impl MatchConfig {
    /// Checks that the configuration is usable.
    pub fn validate(&self) -> ScreenMatchResult<()> {
        let ratio = self.suppression_ratio;
        if !ratio.is_finite() || ratio <= 0.0 || ratio > 1.0 {
            return Err(ScreenMatchError::InvalidInput(
                "suppression_ratio must be in (0, 1]",
            ));
        }
        Ok(())
    }
}

/// Pluggable similarity strategy.
///
/// Implementations are stateless with respect to individual calls and can be
/// shared across threads and patterns.
pub trait Matcher: Send + Sync + Debug {
    /// Returns the placement of maximum similarity, whatever its score.
    fn find_best(
        &self,
        context: ImageView<'_, u8>,
        search: ImageView<'_, u8>,
    ) -> ScreenMatchResult<Match>;

    /// Returns every well-separated placement scoring at or above `threshold`.
    ///
    /// Order is unspecified. An empty result is not an error.
    fn find_all(
        &self,
        context: ImageView<'_, u8>,
        search: ImageView<'_, u8>,
        threshold: f32,
    ) -> ScreenMatchResult<Vec<Match>>;

    /// Returns the best placement only when it clears `threshold`.
    fn find_best_above(
        &self,
        context: ImageView<'_, u8>,
        search: ImageView<'_, u8>,
        threshold: f32,
    ) -> ScreenMatchResult<Option<Match>> {
        let best = self.find_best(context, search)?;
        Ok((best.similarity >= threshold).then_some(best))
    }
}

/// Rejects search images that do not fit inside the context.
pub(crate) fn ensure_fits(
    context: ImageView<'_, u8>,
    search: ImageView<'_, u8>,
) -> ScreenMatchResult<()> {
    if context.fits(&search) {
        return Ok(());
    }
    Err(ScreenMatchError::PatternLargerThanContext {
        search_width: search.width(),
        search_height: search.height(),
        context_width: context.width(),
        context_height: context.height(),
    })
}
