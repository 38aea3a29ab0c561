//! Summed-area tables for constant-time window statistics.
//!
//! Tables carry a zero row and column in front, so entry `(x, y)` holds the
//! sum over all pixels strictly above and to the left of `(x, y)`. Sums are
//! exact `u64` values, which keeps flat-window detection free of rounding.

use crate::image::ImageView;
use crate::util::{ScreenMatchError, ScreenMatchResult};

/// Integral images of pixel values and squared pixel values.
pub struct IntegralImage {
    width: usize,
    height: usize,
    sum: Vec<u64>,
    sum_sq: Vec<u64>,
}

impl IntegralImage {
    /// Builds both tables in a single pass over `image`.
    pub fn from_view(image: ImageView<'_, u8>) -> ScreenMatchResult<Self> {
        let width = image.width();
        let height = image.height();
        let table_w = width + 1;
        let len = table_w
            .checked_mul(height + 1)
            .ok_or(ScreenMatchError::InvalidImage { width, height })?;
        let mut sum = vec![0u64; len];
        let mut sum_sq = vec![0u64; len];

        for y in 0..height {
            let row = image.row(y).ok_or(ScreenMatchError::BufferTooSmall {
                needed: y.saturating_mul(image.stride()).saturating_add(width),
                got: image.as_slice().len(),
            })?;
            let mut row_sum = 0u64;
            let mut row_sum_sq = 0u64;
            let above = y * table_w;
            let here = (y + 1) * table_w;
            for (x, &value) in row.iter().enumerate() {
                let v = u64::from(value);
                row_sum += v;
                row_sum_sq += v * v;
                sum[here + x + 1] = sum[above + x + 1] + row_sum;
                sum_sq[here + x + 1] = sum_sq[above + x + 1] + row_sum_sq;
            }
        }

        Ok(Self {
            width,
            height,
            sum,
            sum_sq,
        })
    }

    /// Returns the width of the source image.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Returns the height of the source image.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Returns `(sum, sum of squares)` over the window at `(x, y)`.
    ///
    /// The window must lie inside the source image.
    pub fn window(&self, x: usize, y: usize, width: usize, height: usize) -> (u64, u64) {
        let table_w = self.width + 1;
        let a = y * table_w + x;
        let b = a + width;
        let c = (y + height) * table_w + x;
        let d = c + width;
        (
            self.sum[d] + self.sum[a] - self.sum[b] - self.sum[c],
            self.sum_sq[d] + self.sum_sq[a] - self.sum_sq[b] - self.sum_sq[c],
        )
    }
}
