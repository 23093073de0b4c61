//! Errors raised while configuring a [`LayeredIndex`][crate::LayeredIndex].

use thiserror::Error;

/// Errors that can occur when building a [`LayeredIndex`][crate::LayeredIndex]
/// or one of its promotion policies.
///
/// Looking up or removing a missing key, or inserting a duplicate, is not an
/// error: those operations report the outcome as a `bool`.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum Error {
    /// The number of rows must be non-zero.
    #[error("depth must be non-zero.")]
    ZeroDepth,
    /// The promotion probability `$p$` must be in the range `$(0, 1)$`.
    #[error("p must be in (0, 1).")]
    InvalidProbability,
}
