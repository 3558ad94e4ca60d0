//! Random keys for filling trees in demos and tests.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::Error;

/// Draws integer keys from a half-open range `[min, max)`.
///
/// The generator owns its random source, there is no process-wide seed. Seed it
/// explicitly to make a run reproducible.
#[derive(Debug, Clone)]
pub struct KeyGenerator<R = StdRng> {
    rng: R,
}

impl KeyGenerator<StdRng> {
    pub fn from_seed(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }

    pub fn from_entropy() -> Self {
        Self::new(StdRng::from_entropy())
    }
}

impl<R: Rng> KeyGenerator<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }

    /// Returns a key in `[min, max)`.
    pub fn gen_range(&mut self, min: i64, max: i64) -> Result<i64, Error> {
        if min >= max {
            return Err(Error::EmptyRange { min, max });
        }
        Ok(self.rng.gen_range(min..max))
    }

    /// Draws `count` keys in `[min, max)`, duplicates included.
    pub fn keys(&mut self, count: usize, min: i64, max: i64) -> Result<Vec<i64>, Error> {
        (0..count).map(|_| self.gen_range(min, max)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_range_bounds() {
        let mut keys = KeyGenerator::from_seed(0);
        for _ in 0..1_000 {
            let key = keys.gen_range(-5, 5).unwrap();
            assert!((-5..5).contains(&key));
        }
        assert_eq!(keys.gen_range(7, 8), Ok(7));
    }

    #[test]
    fn test_empty_range() {
        let mut keys = KeyGenerator::from_seed(0);
        assert_eq!(keys.gen_range(3, 3), Err(Error::EmptyRange { min: 3, max: 3 }));
        assert_eq!(keys.gen_range(4, 3), Err(Error::EmptyRange { min: 4, max: 3 }));
        assert!(keys.keys(10, 1, 0).is_err());
        assert_eq!(keys.keys(0, 1, 0), Ok(Vec::new()));
    }

    #[test]
    fn test_seed_is_reproducible() {
        let first = KeyGenerator::from_seed(42).keys(64, 0, 1_000).unwrap();
        let second = KeyGenerator::from_seed(42).keys(64, 0, 1_000).unwrap();
        assert_eq!(first.len(), 64);
        assert_eq!(first, second);
    }
}
