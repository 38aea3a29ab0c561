//! Correlation surfaces produced by a single matching pass.
//!
//! A surface holds one score per valid top-left placement of the search image
//! inside the context image, so its size is
//! `(context_w - search_w + 1) x (context_h - search_h + 1)`.
//!
//! Suppression zeroes a rectangle of scores and also marks those cells as
//! consumed. Extremum queries skip consumed cells, which keeps peak extraction
//! moving forward even when zero itself clears the threshold.

use crate::util::{ScreenMatchError, ScreenMatchResult};

/// Location and value of a surface extremum.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Extremum {
    /// Column of the placement.
    pub x: usize,
    /// Row of the placement.
    pub y: usize,
    /// Score at the placement.
    pub value: f32,
}

/// Dense row-major grid of similarity scores.
#[derive(Clone, Debug)]
pub struct CorrelationSurface {
    width: usize,
    height: usize,
    scores: Vec<f32>,
    suppressed: Vec<bool>,
    remaining: usize,
}

impl CorrelationSurface {
    /// Wraps a row-major score buffer of exactly `width * height` entries.
    pub fn from_scores(scores: Vec<f32>, width: usize, height: usize) -> ScreenMatchResult<Self> {
        if width == 0 || height == 0 {
            return Err(ScreenMatchError::InvalidImage { width, height });
        }
        let needed = width
            .checked_mul(height)
            .ok_or(ScreenMatchError::InvalidImage { width, height })?;
        if scores.len() != needed {
            return Err(ScreenMatchError::BufferTooSmall {
                needed,
                got: scores.len(),
            });
        }
        Ok(Self {
            width,
            height,
            suppressed: vec![false; needed],
            remaining: needed,
            scores,
        })
    }

    /// Returns the number of placement columns.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Returns the number of placement rows.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Returns the score at `(x, y)`.
    pub fn get(&self, x: usize, y: usize) -> Option<f32> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.scores.get(y * self.width + x).copied()
    }

    /// Returns all scores in row-major order.
    pub fn scores(&self) -> &[f32] {
        &self.scores
    }

    /// Returns the number of cells that have not been suppressed.
    pub fn remaining(&self) -> usize {
        self.remaining
    }

    /// Returns the highest unsuppressed score.
    ///
    /// Ties resolve to the first cell in row-major order.
    pub fn max(&self) -> Option<Extremum> {
        self.extremum(|candidate, best| candidate > best)
    }

    /// Returns the lowest unsuppressed score.
    pub fn min(&self) -> Option<Extremum> {
        self.extremum(|candidate, best| candidate < best)
    }

    fn extremum(&self, better: impl Fn(f32, f32) -> bool) -> Option<Extremum> {
        let mut best: Option<(usize, f32)> = None;
        for (idx, (&value, &gone)) in self.scores.iter().zip(&self.suppressed).enumerate() {
            if gone || value.is_nan() {
                continue;
            }
            match best {
                Some((_, current)) if !better(value, current) => {}
                _ => best = Some((idx, value)),
            }
        }
        best.map(|(idx, value)| Extremum {
            x: idx % self.width,
            y: idx / self.width,
            value,
        })
    }

    /// Zeroes the rectangle `[x, x + width) x [y, y + height)` clipped to the
    /// surface and marks it consumed.
    ///
    /// Returns the number of cells that were not already consumed.
    pub fn zero_rect(&mut self, x: usize, y: usize, width: usize, height: usize) -> usize {
        let x1 = x.saturating_add(width).min(self.width);
        let y1 = y.saturating_add(height).min(self.height);
        let mut newly = 0;
        for yy in y.min(y1)..y1 {
            let start = yy * self.width;
            for idx in start + x.min(x1)..start + x1 {
                self.scores[idx] = 0.0;
                if !self.suppressed[idx] {
                    self.suppressed[idx] = true;
                    newly += 1;
                }
            }
        }
        self.remaining -= newly;
        newly
    }
}
