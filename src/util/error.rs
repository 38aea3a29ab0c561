//! Error types for screenmatch.

use thiserror::Error;

/// Result alias for screenmatch operations.
pub type ScreenMatchResult<T> = std::result::Result<T, ScreenMatchError>;

/// Errors that can occur while matching patterns or polling for them.
///
/// Timeouts are not errors: polling operations report them as empty results.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum ScreenMatchError {
    /// An image has a zero dimension or a size that overflows `usize`.
    #[error("invalid image dimensions {width}x{height}")]
    InvalidImage { width: usize, height: usize },
    /// Row stride is smaller than the row width.
    #[error("invalid stride {stride} for width {width}")]
    InvalidStride { width: usize, stride: usize },
    /// Backing buffer is shorter than the view requires.
    #[error("buffer too small: needed {needed} elements, got {got}")]
    BufferTooSmall { needed: usize, got: usize },
    /// Requested sub-image does not fit inside the image.
    #[error("roi {width}x{height}+{x}+{y} outside of {img_width}x{img_height} image")]
    RoiOutOfBounds {
        x: usize,
        y: usize,
        width: usize,
        height: usize,
        img_width: usize,
        img_height: usize,
    },
    /// The search image does not fit inside the context image.
    #[error(
        "pattern {search_width}x{search_height} larger than context {context_width}x{context_height}"
    )]
    PatternLargerThanContext {
        search_width: usize,
        search_height: usize,
        context_width: usize,
        context_height: usize,
    },
    /// The pattern cannot be told apart from blank content.
    #[error("degenerate pattern: {reason}")]
    DegeneratePattern { reason: &'static str },
    /// The input data or parameters are invalid.
    #[error("invalid input: {0}")]
    InvalidInput(&'static str),
    /// The frame source failed to deliver an image.
    #[error("capture failed: {reason}")]
    Capture { reason: String },
    /// Loading or decoding an image file failed.
    #[error("image io: {reason}")]
    ImageIo { reason: String },
}
