//! Scalar reference kernel.

use crate::image::integral::IntegralImage;
use crate::kernel::{score_row, surface_size, Kernel};
use crate::surface::CorrelationSurface;
use crate::template::TemplatePlan;
use crate::trace::trace_span;
use crate::util::ScreenMatchResult;
use crate::ImageView;

/// Single-threaded normalized correlation coefficient kernel.
pub struct ScalarKernel;

impl Kernel for ScalarKernel {
    fn surface(
        context: ImageView<'_, u8>,
        plan: &TemplatePlan,
    ) -> ScreenMatchResult<CorrelationSurface> {
        let (surf_w, surf_h) = surface_size(context, plan)?;
        let _span = trace_span!("surface", width = surf_w, height = surf_h).entered();

        let integral = IntegralImage::from_view(context)?;
        let mut scores = vec![0.0f32; surf_w * surf_h];
        for (y, row) in scores.chunks_mut(surf_w).enumerate() {
            score_row(context, plan, &integral, y, row);
        }
        CorrelationSurface::from_scores(scores, surf_w, surf_h)
    }
}
