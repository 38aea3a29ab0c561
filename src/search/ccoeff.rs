//! Normalized correlation coefficient matcher.

use crate::candidate::blank::check_degenerate;
use crate::candidate::suppress::extract_peaks;
use crate::geom::Rect;
#[cfg(feature = "rayon")]
use crate::kernel::rayon::ParallelKernel;
use crate::kernel::{Kernel, ScalarKernel};
use crate::search::{ensure_fits, Match, MatchConfig, Matcher};
use crate::surface::CorrelationSurface;
use crate::template::TemplatePlan;
use crate::trace::{trace_event, trace_span};
use crate::util::{ScreenMatchError, ScreenMatchResult};
use crate::ImageView;
use std::sync::{Arc, OnceLock};

/// Matcher scoring placements with the zero-mean normalized correlation
/// coefficient. A perfect match scores 1.0.
#[derive(Clone, Debug, Default)]
pub struct CcoeffNormed {
    cfg: MatchConfig,
}

impl CcoeffNormed {
    /// Creates a matcher with the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a matcher with a custom configuration.
    pub fn with_config(cfg: MatchConfig) -> ScreenMatchResult<Self> {
        cfg.validate()?;
        Ok(Self { cfg })
    }

    /// Returns the process-wide instance with the default configuration.
    pub fn shared() -> Arc<CcoeffNormed> {
        static SHARED: OnceLock<Arc<CcoeffNormed>> = OnceLock::new();
        SHARED.get_or_init(|| Arc::new(CcoeffNormed::new())).clone()
    }

    /// Returns the matcher configuration.
    pub fn config(&self) -> &MatchConfig {
        &self.cfg
    }

    /// Computes the full correlation surface of `search` inside `context`.
    pub fn surface(
        &self,
        context: ImageView<'_, u8>,
        search: ImageView<'_, u8>,
    ) -> ScreenMatchResult<CorrelationSurface> {
        ensure_fits(context, search)?;
        let plan = TemplatePlan::from_view(search)?;
        self.kernel_surface(context, &plan)
    }

    #[cfg(feature = "rayon")]
    fn kernel_surface(
        &self,
        context: ImageView<'_, u8>,
        plan: &TemplatePlan,
    ) -> ScreenMatchResult<CorrelationSurface> {
        if self.cfg.parallel {
            ParallelKernel::surface(context, plan)
        } else {
            ScalarKernel::surface(context, plan)
        }
    }

    #[cfg(not(feature = "rayon"))]
    fn kernel_surface(
        &self,
        context: ImageView<'_, u8>,
        plan: &TemplatePlan,
    ) -> ScreenMatchResult<CorrelationSurface> {
        ScalarKernel::surface(context, plan)
    }
}

impl Matcher for CcoeffNormed {
    fn find_best(
        &self,
        context: ImageView<'_, u8>,
        search: ImageView<'_, u8>,
    ) -> ScreenMatchResult<Match> {
        let surface = self.surface(context, search)?;
        let best = surface
            .max()
            .ok_or(ScreenMatchError::InvalidInput("correlation surface has no scores"))?;
        Ok(Match::new(
            Rect::from_placement(best.x, best.y, search.width(), search.height()),
            best.value,
        ))
    }

    fn find_all(
        &self,
        context: ImageView<'_, u8>,
        search: ImageView<'_, u8>,
        threshold: f32,
    ) -> ScreenMatchResult<Vec<Match>> {
        let _span = trace_span!("find_all", threshold = threshold).entered();

        let mut surface = self.surface(context, search)?;
        if surface.min().is_some_and(|low| low.value >= threshold) {
            check_degenerate(self, search, threshold)?;
        }

        let peaks = extract_peaks(
            &mut surface,
            threshold,
            search.width(),
            search.height(),
            self.cfg.suppression_ratio,
        );

        trace_event!("find_all_matches", count = peaks.len());
        Ok(peaks
            .into_iter()
            .map(|peak| {
                Match::new(
                    Rect::from_placement(peak.x, peak.y, search.width(), search.height()),
                    peak.value,
                )
            })
            .collect())
    }
}
