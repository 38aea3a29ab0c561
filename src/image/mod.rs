//! Grayscale image views and owned buffers.
//!
//! `ImageView` is a borrowed 2D view into a 1D buffer with an explicit stride.
//! The stride counts elements between the starts of consecutive rows, so a
//! stride larger than the width represents padded rows. ROI slices are zero-copy
//! views into the same backing slice and retain the original stride.
//!
//! Captured frames and reference images are both represented as 8-bit luma.

use crate::util::{ScreenMatchError, ScreenMatchResult};

pub mod integral;
#[cfg(feature = "image-io")]
pub mod io;

/// Borrowed 2D image view with an explicit stride.
#[derive(Copy, Clone, Debug)]
pub struct ImageView<'a, T> {
    data: &'a [T],
    width: usize,
    height: usize,
    stride: usize,
}

impl<'a, T> ImageView<'a, T> {
    /// Creates a contiguous view with `stride == width`.
    pub fn from_slice(data: &'a [T], width: usize, height: usize) -> ScreenMatchResult<Self> {
        Self::new(data, width, height, width)
    }

    /// Creates a view with an explicit stride.
    pub fn new(
        data: &'a [T],
        width: usize,
        height: usize,
        stride: usize,
    ) -> ScreenMatchResult<Self> {
        let needed = required_len(width, height, stride)?;
        if data.len() < needed {
            return Err(ScreenMatchError::BufferTooSmall {
                needed,
                got: data.len(),
            });
        }
        Ok(Self {
            data,
            width,
            height,
            stride,
        })
    }

    /// Returns the image width in pixels.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Returns the image height in pixels.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Returns the stride in elements between row starts.
    pub fn stride(&self) -> usize {
        self.stride
    }

    /// Returns the backing slice including any row padding.
    pub fn as_slice(&self) -> &'a [T] {
        self.data
    }

    /// Returns the element at `(x, y)` if it is within bounds.
    pub fn get(&self, x: usize, y: usize) -> Option<&'a T> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = y.checked_mul(self.stride)?.checked_add(x)?;
        self.data.get(idx)
    }

    /// Returns a contiguous slice for row `y` with length `width`.
    pub fn row(&self, y: usize) -> Option<&'a [T]> {
        if y >= self.height {
            return None;
        }
        let start = y.checked_mul(self.stride)?;
        let end = start.checked_add(self.width)?;
        self.data.get(start..end)
    }

    /// Returns a zero-copy ROI view into the same backing buffer.
    pub fn roi(
        &self,
        x: usize,
        y: usize,
        width: usize,
        height: usize,
    ) -> ScreenMatchResult<ImageView<'a, T>> {
        if width == 0 || height == 0 {
            return Err(ScreenMatchError::InvalidImage { width, height });
        }

        let out_of_bounds = ScreenMatchError::RoiOutOfBounds {
            x,
            y,
            width,
            height,
            img_width: self.width,
            img_height: self.height,
        };
        let end_x = x.checked_add(width).ok_or_else(|| out_of_bounds.clone())?;
        let end_y = y.checked_add(height).ok_or_else(|| out_of_bounds.clone())?;
        if end_x > self.width || end_y > self.height {
            return Err(out_of_bounds);
        }

        let start = y
            .checked_mul(self.stride)
            .and_then(|v| v.checked_add(x))
            .ok_or(ScreenMatchError::InvalidImage {
                width: self.width,
                height: self.height,
            })?;
        let data = self
            .data
            .get(start..)
            .ok_or(ScreenMatchError::BufferTooSmall {
                needed: start.saturating_add(1),
                got: self.data.len(),
            })?;

        ImageView::new(data, width, height, self.stride)
    }

    /// Returns true when `other` fits inside this image.
    pub fn fits<U>(&self, other: &ImageView<'_, U>) -> bool {
        other.width <= self.width && other.height <= self.height
    }
}

fn required_len(width: usize, height: usize, stride: usize) -> ScreenMatchResult<usize> {
    if width == 0 || height == 0 {
        return Err(ScreenMatchError::InvalidImage { width, height });
    }
    if stride < width {
        return Err(ScreenMatchError::InvalidStride { width, stride });
    }
    let needed = (height - 1)
        .checked_mul(stride)
        .and_then(|v| v.checked_add(width))
        .ok_or(ScreenMatchError::InvalidImage { width, height })?;
    Ok(needed)
}

/// Owned contiguous grayscale image buffer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OwnedImage {
    data: Vec<u8>,
    width: usize,
    height: usize,
}

impl OwnedImage {
    /// Wraps a contiguous row-major buffer of exactly `width * height` pixels.
    pub fn new(data: Vec<u8>, width: usize, height: usize) -> ScreenMatchResult<Self> {
        if width == 0 || height == 0 {
            return Err(ScreenMatchError::InvalidImage { width, height });
        }
        let needed = width
            .checked_mul(height)
            .ok_or(ScreenMatchError::InvalidImage { width, height })?;
        if data.len() < needed {
            return Err(ScreenMatchError::BufferTooSmall {
                needed,
                got: data.len(),
            });
        }
        if data.len() > needed {
            return Err(ScreenMatchError::InvalidImage { width, height });
        }
        Ok(Self {
            data,
            width,
            height,
        })
    }

    /// Creates an image filled with a single intensity.
    pub fn filled(width: usize, height: usize, value: u8) -> ScreenMatchResult<Self> {
        let len = width
            .checked_mul(height)
            .ok_or(ScreenMatchError::InvalidImage { width, height })?;
        Self::new(vec![value; len], width, height)
    }

    /// Copies a (possibly strided) view into a contiguous buffer.
    pub fn from_view(view: ImageView<'_, u8>) -> ScreenMatchResult<Self> {
        let width = view.width();
        let height = view.height();
        let mut data = Vec::with_capacity(width.saturating_mul(height));
        for y in 0..height {
            let row = view.row(y).ok_or(ScreenMatchError::BufferTooSmall {
                needed: y.saturating_mul(view.stride()).saturating_add(width),
                got: view.as_slice().len(),
            })?;
            data.extend_from_slice(row);
        }
        Self::new(data, width, height)
    }

    /// Returns a borrowed view of the image.
    pub fn view(&self) -> ImageView<'_, u8> {
        ImageView {
            data: &self.data,
            width: self.width,
            height: self.height,
            stride: self.width,
        }
    }

    /// Returns the image width in pixels.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Returns the image height in pixels.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Returns the pixel buffer in row-major order.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Fills an axis-aligned rectangle, clipped to the image bounds.
    pub fn fill_rect(&mut self, x: usize, y: usize, width: usize, height: usize, value: u8) {
        let x1 = x.saturating_add(width).min(self.width);
        let y1 = y.saturating_add(height).min(self.height);
        for yy in y.min(y1)..y1 {
            let start = yy * self.width;
            self.data[start + x.min(x1)..start + x1].fill(value);
        }
    }

    /// Copies `src` into this image with its top-left corner at `(x, y)`.
    ///
    /// Pixels falling outside the destination are dropped.
    pub fn paste(&mut self, src: ImageView<'_, u8>, x: usize, y: usize) {
        if x >= self.width || y >= self.height {
            return;
        }
        let copy_w = src.width().min(self.width - x);
        let copy_h = src.height().min(self.height - y);
        for sy in 0..copy_h {
            let Some(row) = src.row(sy) else {
                break;
            };
            let start = (y + sy) * self.width + x;
            self.data[start..start + copy_w].copy_from_slice(&row[..copy_w]);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::OwnedImage;

    #[test]
    fn fill_rect_clips_to_bounds() {
        let mut img = OwnedImage::filled(4, 3, 0).unwrap();
        img.fill_rect(2, 1, 10, 10, 9);
        assert_eq!(img.data(), &[0, 0, 0, 0, 0, 0, 9, 9, 0, 0, 9, 9]);
    }

    #[test]
    fn paste_drops_overhanging_pixels() {
        let mut dst = OwnedImage::filled(3, 3, 0).unwrap();
        let src = OwnedImage::filled(2, 2, 7).unwrap();
        dst.paste(src.view(), 2, 2);
        assert_eq!(dst.data(), &[0, 0, 0, 0, 0, 0, 0, 0, 7]);
    }

    #[test]
    fn from_view_compacts_strided_rows() {
        let data: Vec<u8> = (0u8..12).collect();
        let base = OwnedImage::new(data, 4, 3).unwrap();
        let roi = base.view().roi(1, 1, 2, 2).unwrap();
        let owned = OwnedImage::from_view(roi).unwrap();
        assert_eq!(owned.data(), &[5, 6, 9, 10]);
    }
}
