//! Seeded train/test partitioning.
//!
//! A plain shuffle split (not stratified): indices are shuffled with a
//! seeded RNG and the first `ceil(n * test_ratio)` become the held-out
//! partition. The same row count, ratio, and seed always produce the same
//! partition, which makes training runs reproducible on identical input.

use downwatch_core::{DownwatchError, Result};
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// Row indices for the two partitions.
#[derive(Debug, Clone)]
pub struct SplitIndices {
    pub train: Vec<usize>,
    pub test: Vec<usize>,
}

/// Split `n` rows into train/test partitions.
///
/// # Errors
///
/// Returns [`DownwatchError::Config`] for a ratio outside `(0, 1)` and
/// [`DownwatchError::Dataset`] when `n` is too small to leave both
/// partitions non-empty.
pub fn shuffle_split(n: usize, test_ratio: f64, seed: u64) -> Result<SplitIndices> {
    if !(test_ratio > 0.0 && test_ratio < 1.0) {
        return Err(DownwatchError::Config(format!(
            "test_ratio must be in (0, 1), got {}",
            test_ratio
        )));
    }

    let mut indices: Vec<usize> = (0..n).collect();
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    indices.shuffle(&mut rng);

    let test_size = ((n as f64) * test_ratio).ceil() as usize;
    if test_size == 0 || test_size >= n {
        return Err(DownwatchError::Dataset(format!(
            "Dataset has too few rows ({}) for a {:.0}% held-out split",
            n,
            test_ratio * 100.0
        )));
    }

    let test = indices[..test_size].to_vec();
    let train = indices[test_size..].to_vec();
    Ok(SplitIndices { train, test })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partitions_cover_all_rows() {
        let split = shuffle_split(10, 0.2, 42).unwrap();
        assert_eq!(split.test.len(), 2);
        assert_eq!(split.train.len(), 8);

        let mut all: Vec<usize> = split.train.iter().chain(split.test.iter()).copied().collect();
        all.sort_unstable();
        assert_eq!(all, (0..10).collect::<Vec<_>>());
    }

    #[test]
    fn test_same_seed_same_partition() {
        let a = shuffle_split(100, 0.2, 42).unwrap();
        let b = shuffle_split(100, 0.2, 42).unwrap();
        assert_eq!(a.train, b.train);
        assert_eq!(a.test, b.test);
    }

    #[test]
    fn test_different_seed_different_partition() {
        let a = shuffle_split(100, 0.2, 42).unwrap();
        let b = shuffle_split(100, 0.2, 43).unwrap();
        assert_ne!(a.test, b.test);
    }

    #[test]
    fn test_test_size_rounds_up() {
        // ceil(7 * 0.2) = 2
        let split = shuffle_split(7, 0.2, 0).unwrap();
        assert_eq!(split.test.len(), 2);
        assert_eq!(split.train.len(), 5);
    }

    #[test]
    fn test_single_row_cannot_split() {
        assert!(matches!(
            shuffle_split(1, 0.2, 0),
            Err(DownwatchError::Dataset(_))
        ));
    }

    #[test]
    fn test_bad_ratio_is_a_config_error() {
        assert!(matches!(
            shuffle_split(10, 0.0, 0),
            Err(DownwatchError::Config(_))
        ));
        assert!(matches!(
            shuffle_split(10, 1.0, 0),
            Err(DownwatchError::Config(_))
        ));
    }
}
