//! Iterative peak extraction with zero-fill suppression.

use crate::surface::{CorrelationSurface, Extremum};

/// Clipped suppression window `(x, y, width, height)` around a peak.
///
/// The window reaches `floor(ratio * search)` cells on each side of the peak
/// and always contains the peak itself. Near the surface border the window is
/// shrunk rather than shifted.
pub fn suppression_window(
    peak: Extremum,
    search_width: usize,
    search_height: usize,
    ratio: f32,
    surface_width: usize,
    surface_height: usize,
) -> (usize, usize, usize, usize) {
    let half_w = (search_width as f32 * ratio) as usize;
    let half_h = (search_height as f32 * ratio) as usize;

    let x0 = peak.x.saturating_sub(half_w);
    let y0 = peak.y.saturating_sub(half_h);
    let x1 = peak.x.saturating_add(half_w.max(1)).min(surface_width);
    let y1 = peak.y.saturating_add(half_h.max(1)).min(surface_height);
    (x0, y0, x1 - x0, y1 - y0)
}

/// Upper bound on the number of peaks `extract_peaks` can return.
///
/// A later peak never falls inside an earlier peak's window, so two peaks are
/// at least `max(half, 1)` apart on one axis and each tile of that size holds
/// at most one of them.
pub fn max_peaks(
    search_width: usize,
    search_height: usize,
    ratio: f32,
    surface_width: usize,
    surface_height: usize,
) -> usize {
    let step_w = ((search_width as f32 * ratio) as usize).max(1);
    let step_h = ((search_height as f32 * ratio) as usize).max(1);
    surface_width.div_ceil(step_w) * surface_height.div_ceil(step_h)
}

/// Extracts peaks scoring at least `threshold`, best first.
///
/// Each extracted peak consumes its suppression window, so the loop runs at
/// most [`max_peaks`] times.
pub fn extract_peaks(
    surface: &mut CorrelationSurface,
    threshold: f32,
    search_width: usize,
    search_height: usize,
    ratio: f32,
) -> Vec<Extremum> {
    let mut peaks = Vec::new();
    while let Some(peak) = surface.max() {
        if peak.value < threshold {
            break;
        }
        peaks.push(peak);
        let (x, y, w, h) = suppression_window(
            peak,
            search_width,
            search_height,
            ratio,
            surface.width(),
            surface.height(),
        );
        let consumed = surface.zero_rect(x, y, w, h);
        debug_assert!(consumed > 0, "suppression window must contain the peak");
    }
    peaks
}
