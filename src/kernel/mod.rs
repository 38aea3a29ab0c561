//! Correlation kernels that materialize a full `CorrelationSurface`.
//!
//! All kernels share the per-row routine in this module, so the scalar and
//! parallel variants produce bit-identical surfaces.

use crate::image::integral::IntegralImage;
use crate::surface::CorrelationSurface;
use crate::template::{TemplatePlan, WindowStats};
use crate::util::{ScreenMatchError, ScreenMatchResult};
use crate::ImageView;

/// Kernel trait for computing a correlation surface.
pub trait Kernel {
    /// Scores every valid placement of `plan` inside `context`.
    fn surface(
        context: ImageView<'_, u8>,
        plan: &TemplatePlan,
    ) -> ScreenMatchResult<CorrelationSurface>;
}

pub mod scalar;

#[cfg(feature = "rayon")]
pub mod rayon;

pub use scalar::ScalarKernel;

/// Normalized correlation coefficient for one placement.
///
/// `dot` is the sum of the zero-mean template times the window pixels.
/// Flat (single-intensity) inputs have no defined coefficient: two flat
/// inputs score by how close their intensities are, and a flat input against
/// a textured one scores zero.
pub fn ccoeff_score(dot: f64, window: WindowStats, plan: &TemplatePlan) -> f32 {
    let tpl = plan.stats();
    match (tpl.is_flat(), window.is_flat()) {
        (true, true) => (1.0 - (tpl.mean() - window.mean()).abs() / 255.0) as f32,
        (false, false) => {
            let denom = (tpl.sq_dev() * window.sq_dev()).sqrt();
            let score = dot / denom;
            if score.is_finite() {
                score.clamp(-1.0, 1.0) as f32
            } else {
                0.0
            }
        }
        _ => 0.0,
    }
}

/// Returns the surface size for `plan` inside `context`.
pub fn surface_size(
    context: ImageView<'_, u8>,
    plan: &TemplatePlan,
) -> ScreenMatchResult<(usize, usize)> {
    let (ctx_w, ctx_h) = (context.width(), context.height());
    let (tpl_w, tpl_h) = (plan.width(), plan.height());
    if ctx_w < tpl_w || ctx_h < tpl_h {
        return Err(ScreenMatchError::PatternLargerThanContext {
            search_width: tpl_w,
            search_height: tpl_h,
            context_width: ctx_w,
            context_height: ctx_h,
        });
    }
    Ok((ctx_w - tpl_w + 1, ctx_h - tpl_h + 1))
}

/// Scores placement row `y` into `out`, one entry per placement column.
pub(crate) fn score_row(
    context: ImageView<'_, u8>,
    plan: &TemplatePlan,
    integral: &IntegralImage,
    y: usize,
    out: &mut [f32],
) {
    let tpl_w = plan.width();
    let tpl_h = plan.height();
    let count = (tpl_w * tpl_h) as u64;
    let zero_mean = plan.zero_mean();
    let flat_template = plan.is_flat();

    for (x, slot) in out.iter_mut().enumerate() {
        let (sum, sum_sq) = integral.window(x, y, tpl_w, tpl_h);
        let window = WindowStats { count, sum, sum_sq };

        let mut dot = 0.0f64;
        if !flat_template && !window.is_flat() {
            for ty in 0..tpl_h {
                let Some(img_row) = context.row(y + ty) else {
                    break;
                };
                let tpl_row = &zero_mean[ty * tpl_w..(ty + 1) * tpl_w];
                for (t, &value) in tpl_row.iter().zip(&img_row[x..x + tpl_w]) {
                    dot += t * f64::from(value);
                }
            }
        }

        *slot = ccoeff_score(dot, window, plan);
    }
}

#[cfg(test)]
mod tests {
    use super::ccoeff_score;
    use crate::template::{window_stats, TemplatePlan};
    use crate::ImageView;

    #[test]
    fn flat_inputs_score_by_intensity_distance() {
        let white = [255u8; 4];
        let gray = [51u8; 4];
        let plan = TemplatePlan::from_view(ImageView::from_slice(&white, 2, 2).unwrap()).unwrap();
        let same = window_stats(ImageView::from_slice(&white, 2, 2).unwrap());
        let other = window_stats(ImageView::from_slice(&gray, 2, 2).unwrap());
        assert_eq!(ccoeff_score(0.0, same, &plan), 1.0);
        assert!((ccoeff_score(0.0, other, &plan) - 0.2).abs() < 1e-6);
    }

    #[test]
    fn flat_against_textured_scores_zero() {
        let white = [255u8; 4];
        let ramp = [0u8, 10, 20, 30];
        let plan = TemplatePlan::from_view(ImageView::from_slice(&white, 2, 2).unwrap()).unwrap();
        let window = window_stats(ImageView::from_slice(&ramp, 2, 2).unwrap());
        assert_eq!(ccoeff_score(123.0, window, &plan), 0.0);
    }
}
