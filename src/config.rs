//! Configuration of a [`LayeredIndex`].

use std::num::NonZeroUsize;

use crate::{
    error::Error,
    layered_index::LayeredIndex,
    promotion::{CoinFlip, Promotion, coin_flip::DEFAULT_PROBABILITY},
};

/// The number of rows used when none is given: a plain sorted list.
pub const DEFAULT_DEPTH: usize = 1;

// ////////////////////////////////////////////////////////////////////////////
// SearchStrategy
// ////////////////////////////////////////////////////////////////////////////

/// How lookups walk the rows of a [`LayeredIndex`].
///
/// Both strategies return the same answers; they differ only in how many
/// nodes they visit.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum SearchStrategy {
    /// Scan every row in full, top row first, until the key is met.
    ///
    /// This never uses the ordering of a row to stop early nor the vertical
    /// links to skip ahead, so every operation is linear in the number of
    /// nodes.
    Linear,
    /// Walk each row while the next key is smaller than the target and drop
    /// one row down on overshoot, giving expected `O(log(n))` operations.
    #[default]
    Descent,
}

// ////////////////////////////////////////////////////////////////////////////
// Builder
// ////////////////////////////////////////////////////////////////////////////

/// Configures and builds a [`LayeredIndex`].
///
/// # Examples
///
/// ```
/// use layered_index::{LayeredIndex, SearchStrategy};
///
/// let index = LayeredIndex::builder()
///     .depth(8)
///     .probability(0.25)
///     .search(SearchStrategy::Linear)
///     .seed(7)
///     .build()?;
/// assert_eq!(index.depth(), 8);
/// # Ok::<(), layered_index::Error>(())
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct Builder {
    depth: usize,
    probability: f64,
    search: SearchStrategy,
    seed: Option<u64>,
}

impl Default for Builder {
    #[inline]
    fn default() -> Self {
        Builder {
            depth: DEFAULT_DEPTH,
            probability: DEFAULT_PROBABILITY,
            search: SearchStrategy::default(),
            seed: None,
        }
    }
}

impl Builder {
    /// A builder with the default settings: a single row, a fair coin and
    /// [`SearchStrategy::Descent`].
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The number of rows, fixed for the lifetime of the index.
    #[inline]
    #[must_use]
    pub fn depth(mut self, depth: usize) -> Self {
        self.depth = depth;
        self
    }

    /// The probability that a key is promoted from one row to the next.
    ///
    /// Only used by [`build`][Builder::build].
    #[inline]
    #[must_use]
    pub fn probability(mut self, p: f64) -> Self {
        self.probability = p;
        self
    }

    /// How lookups walk the rows.
    #[inline]
    #[must_use]
    pub fn search(mut self, search: SearchStrategy) -> Self {
        self.search = search;
        self
    }

    /// Seed the promotion coin so that tower heights are reproducible.
    ///
    /// Only used by [`build`][Builder::build].
    #[inline]
    #[must_use]
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Build an index promoting keys with a [`CoinFlip`].
    ///
    /// # Errors
    ///
    /// [`Error::ZeroDepth`] if the depth is zero, and
    /// [`Error::InvalidProbability`] if the probability is not in `$(0, 1)$`.
    #[inline]
    pub fn build(&self) -> Result<LayeredIndex<CoinFlip>, Error> {
        let depth = self.checked_depth()?;
        let coin = match self.seed {
            Some(seed) => CoinFlip::seeded(self.probability, seed)?,
            None => CoinFlip::new(self.probability)?,
        };
        Ok(LayeredIndex::assemble(depth, self.search, coin))
    }

    /// Build an index promoting keys with the given policy. The configured
    /// probability and seed are ignored.
    ///
    /// # Errors
    ///
    /// [`Error::ZeroDepth`] if the depth is zero.
    #[inline]
    pub fn build_with<P>(&self, promotion: P) -> Result<LayeredIndex<P>, Error>
    where
        P: Promotion,
    {
        Ok(LayeredIndex::assemble(
            self.checked_depth()?,
            self.search,
            promotion,
        ))
    }

    fn checked_depth(&self) -> Result<NonZeroUsize, Error> {
        NonZeroUsize::new(self.depth).ok_or(Error::ZeroDepth)
    }
}
