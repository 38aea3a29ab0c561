//! Blank-block test for patterns that match uniform content.
//!
//! When every placement of a surface clears the threshold, the pattern may be
//! unable to tell real content from blank regions. The pattern is scored
//! against synthetic blanks of its own size: first solid white, then a
//! two-tone block split along the anti-diagonal. Clearing the threshold on
//! both means peak extraction would only return noise.

use crate::image::OwnedImage;
use crate::search::Matcher;
use crate::util::{ScreenMatchError, ScreenMatchResult};
use crate::ImageView;

const BLANK_LIGHT: u8 = 255;
const BLANK_DARK: u8 = 0;

/// Builds a block whose upper-left triangle is light and lower-right is dark.
///
/// The bottom-right pixel is always dark unless the block is a single pixel,
/// so thin blocks still carry two tones.
pub(crate) fn two_tone_block(width: usize, height: usize) -> ScreenMatchResult<OwnedImage> {
    let mut img = OwnedImage::filled(width, height, BLANK_DARK)?;
    for y in 0..height {
        // Pixels with x / width + y / height < 1 sit above the anti-diagonal.
        let mut limit = (width * (height - y)).div_ceil(height);
        if y + 1 == height && width * height > 1 {
            limit = limit.min(width - 1);
        }
        img.fill_rect(0, y, limit, 1, BLANK_LIGHT);
    }
    Ok(img)
}

/// Fails with `DegeneratePattern` when `search` matches both blank blocks.
pub(crate) fn check_degenerate<M: Matcher + ?Sized>(
    matcher: &M,
    search: ImageView<'_, u8>,
    threshold: f32,
) -> ScreenMatchResult<()> {
    let (width, height) = (search.width(), search.height());

    let solid = OwnedImage::filled(width, height, BLANK_LIGHT)?;
    if matcher.find_best(solid.view(), search)?.similarity < threshold {
        return Ok(());
    }

    let split = two_tone_block(width, height)?;
    if matcher.find_best(split.view(), search)?.similarity < threshold {
        return Ok(());
    }

    Err(ScreenMatchError::DegeneratePattern {
        reason: "pattern matches blank and two-tone blocks",
    })
}
