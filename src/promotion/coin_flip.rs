//! Biased coin promotion policy.

use rand::{Rng, SeedableRng, rngs::SmallRng};

use crate::{error::Error, promotion::Promotion};

/// The probability used when none is given.
pub const DEFAULT_PROBABILITY: f64 = 0.5;

/// A promotion policy which flips an independent, biased coin for every row.
///
/// With probability `$p$` a tower grows by one more row, so a key reaches row
/// `$n$` with probability `$p^n$`, truncated at the top row of the index.
///
/// The random number generator is seeded once, when the policy is created.
#[derive(Debug, Clone)]
pub struct CoinFlip {
    /// The probability that a tower grows by one more row.
    p: f64,
    /// The random number generator.
    rng: SmallRng,
}

impl CoinFlip {
    /// Create a coin with bias `p`, seeded from the thread-local generator.
    ///
    /// # Errors
    ///
    /// `p` must lie strictly between 0 and 1.
    #[inline]
    pub fn new(p: f64) -> Result<Self, Error> {
        Self::validate(p)?;
        Ok(CoinFlip {
            p,
            rng: SmallRng::from_rng(&mut rand::rng()),
        })
    }

    /// Create a coin with bias `p` whose sequence of outcomes is fully
    /// determined by `seed`.
    ///
    /// # Errors
    ///
    /// `p` must lie strictly between 0 and 1.
    #[inline]
    pub fn seeded(p: f64, seed: u64) -> Result<Self, Error> {
        Self::validate(p)?;
        Ok(CoinFlip {
            p,
            rng: SmallRng::seed_from_u64(seed),
        })
    }

    /// The probability that a tower grows by one more row.
    #[inline]
    #[must_use]
    pub fn probability(&self) -> f64 {
        self.p
    }

    fn validate(p: f64) -> Result<(), Error> {
        if 0.0 < p && p < 1.0 {
            Ok(())
        } else {
            Err(Error::InvalidProbability)
        }
    }
}

impl Default for CoinFlip {
    /// A fair coin.
    #[inline]
    fn default() -> Self {
        CoinFlip {
            p: DEFAULT_PROBABILITY,
            rng: SmallRng::from_rng(&mut rand::rng()),
        }
    }
}

impl Promotion for CoinFlip {
    #[inline]
    fn promote(&mut self) -> bool {
        self.rng.random_bool(self.p)
    }
}

#[cfg(test)]
mod tests {
    use anyhow::Result;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::{CoinFlip, DEFAULT_PROBABILITY};
    use crate::{error::Error, promotion::Promotion};

    #[rstest]
    fn invalid_p(#[values(0.0, 1.0, -0.5, 1.5, f64::NAN)] p: f64) {
        assert_eq!(CoinFlip::new(p).err(), Some(Error::InvalidProbability));
        assert_eq!(CoinFlip::seeded(p, 7).err(), Some(Error::InvalidProbability));
    }

    #[test]
    fn default_is_fair() {
        assert_eq!(CoinFlip::default().probability(), DEFAULT_PROBABILITY);
    }

    #[test]
    fn seeded_is_reproducible() -> Result<()> {
        let mut a = CoinFlip::seeded(0.5, 0x1234_abcd)?;
        let mut b = CoinFlip::seeded(0.5, 0x1234_abcd)?;
        let a: Vec<bool> = (0..256).map(|_| a.promote()).collect();
        let b: Vec<bool> = (0..256).map(|_| b.promote()).collect();
        assert_eq!(a, b);
        Ok(())
    }

    #[rstest]
    fn bias(#[values(0.1, 0.5, 0.9)] p: f64) -> Result<()> {
        let mut coin = CoinFlip::seeded(p, 42)?;
        let draws = 100_000;
        let heads = (0..draws).filter(|_| coin.promote()).count();
        #[expect(clippy::cast_precision_loss, reason = "Counts are small")]
        let observed = heads as f64 / f64::from(draws);
        assert!(
            (observed - p).abs() < 0.02,
            "observed {observed} for p = {p}"
        );
        Ok(())
    }
}
