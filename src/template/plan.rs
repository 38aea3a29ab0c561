//! Template plan precomputation for the normalized correlation coefficient.

use crate::image::ImageView;
use crate::util::{ScreenMatchError, ScreenMatchResult};

/// Exact first and second moments of a pixel window.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WindowStats {
    /// Number of pixels.
    pub count: u64,
    /// Sum of pixel values.
    pub sum: u64,
    /// Sum of squared pixel values.
    pub sum_sq: u64,
}

impl WindowStats {
    /// Mean intensity.
    pub fn mean(&self) -> f64 {
        self.sum as f64 / self.count as f64
    }

    /// Sum of squared deviations from the mean.
    pub fn sq_dev(&self) -> f64 {
        self.scaled_sq_dev() as f64 / self.count as f64
    }

    /// Returns true when every pixel has the same value.
    pub fn is_flat(&self) -> bool {
        self.scaled_sq_dev() == 0
    }

    // count * sum_sq - sum^2, exact for any u8 window that fits in memory.
    fn scaled_sq_dev(&self) -> u128 {
        let n = u128::from(self.count);
        let s = u128::from(self.sum);
        (n * u128::from(self.sum_sq)).saturating_sub(s * s)
    }
}

/// Computes exact window statistics by direct summation.
pub fn window_stats(view: ImageView<'_, u8>) -> WindowStats {
    let mut sum = 0u64;
    let mut sum_sq = 0u64;
    for y in 0..view.height() {
        if let Some(row) = view.row(y) {
            for &value in row {
                let v = u64::from(value);
                sum += v;
                sum_sq += v * v;
            }
        }
    }
    WindowStats {
        count: (view.width() * view.height()) as u64,
        sum,
        sum_sq,
    }
}

/// Precomputed statistics and zero-mean buffer for template matching.
pub struct TemplatePlan {
    width: usize,
    height: usize,
    stats: WindowStats,
    zero_mean: Vec<f64>,
}

impl TemplatePlan {
    /// Builds a plan from a template view.
    ///
    /// Flat templates are accepted; scoring treats them separately.
    pub fn from_view(tpl: ImageView<'_, u8>) -> ScreenMatchResult<Self> {
        let width = tpl.width();
        let height = tpl.height();
        let count = width
            .checked_mul(height)
            .ok_or(ScreenMatchError::InvalidImage { width, height })?;

        let stats = window_stats(tpl);
        let mean = stats.mean();
        let mut zero_mean = Vec::with_capacity(count);
        for y in 0..height {
            let row = tpl.row(y).ok_or(ScreenMatchError::BufferTooSmall {
                needed: y.saturating_mul(tpl.stride()).saturating_add(width),
                got: tpl.as_slice().len(),
            })?;
            zero_mean.extend(row.iter().map(|&value| f64::from(value) - mean));
        }

        Ok(Self {
            width,
            height,
            stats,
            zero_mean,
        })
    }

    /// Returns the template width in pixels.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Returns the template height in pixels.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Returns the exact template statistics.
    pub fn stats(&self) -> WindowStats {
        self.stats
    }

    /// Returns the mean intensity of the template.
    pub fn mean(&self) -> f64 {
        self.stats.mean()
    }

    /// Returns true when the template has a single intensity.
    pub fn is_flat(&self) -> bool {
        self.stats.is_flat()
    }

    /// Returns the zero-mean template buffer in row-major order.
    pub fn zero_mean(&self) -> &[f64] {
        &self.zero_mean
    }
}
