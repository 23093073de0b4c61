//! Newly inserted keys always occupy row 0. Each further row is reached by a
//! fresh promotion decision, and the first refusal ends the tower: a key
//! never skips a row on its way up.
//!
//! The default policy is a fair coin backed by a small, seeded-once random
//! number generator. Tests and benchmarks can inject their own policy to fix
//! the exact shape of every tower.

pub mod coin_flip;
pub mod scripted;

pub use coin_flip::CoinFlip;
pub use scripted::Scripted;

// ////////////////////////////////////////////////////////////////////////////
// Promotion
// ////////////////////////////////////////////////////////////////////////////

/// Decides, one row at a time, whether a freshly inserted key's tower grows
/// one level higher.
///
/// [`promote`][Promotion::promote] is called at most `depth - 1` times per
/// insertion, and never again once it has returned `false`.
pub trait Promotion {
    /// Whether the tower currently being built should grow by one row.
    #[must_use]
    fn promote(&mut self) -> bool;
}

impl<F> Promotion for F
where
    F: FnMut() -> bool,
{
    #[inline]
    fn promote(&mut self) -> bool {
        self()
    }
}
