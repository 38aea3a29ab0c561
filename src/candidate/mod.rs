//! Peak extraction and pattern validity checks.
//!
//! Includes iterative peak suppression over a correlation surface and the
//! blank-block test for degenerate patterns.

pub(crate) mod blank;
pub(crate) mod suppress;
