//! Validated configuration primitives

use crate::{Error, Result};

/// Number of conversion workers, resolved against available parallelism
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkerCount(usize);

impl WorkerCount {
    /// Minimum worker count
    pub const MIN: usize = 1;
    /// Maximum worker count
    pub const MAX: usize = 256;

    /// Create a new worker count with validation
    pub fn new(count: usize) -> Result<Self> {
        if count < Self::MIN {
            Err(Error::config(format!(
                "worker count {count} is below minimum {}",
                Self::MIN
            )))
        } else if count > Self::MAX {
            Err(Error::config(format!(
                "worker count {count} exceeds maximum {}",
                Self::MAX
            )))
        } else {
            Ok(Self(count))
        }
    }

    /// Resolve a requested count, which may be relative.
    ///
    /// A positive request is taken as-is; zero or a negative request means
    /// "available parallelism minus that many", so `0` uses every core and
    /// `-2` leaves two cores free. The result is clamped to `MIN..=MAX`.
    pub fn resolve(requested: i64) -> Self {
        let resolved = if requested >= 1 {
            requested
        } else {
            let cores = std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1);
            cores as i64 + requested
        };
        Self(resolved.clamp(Self::MIN as i64, Self::MAX as i64) as usize)
    }

    /// Get the worker count value
    pub fn get(self) -> usize {
        self.0
    }
}

impl Default for WorkerCount {
    fn default() -> Self {
        Self::resolve(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(1)]
    #[case(4)]
    #[case(256)]
    fn test_new_accepts_valid_counts(#[case] count: usize) {
        assert_eq!(WorkerCount::new(count).unwrap().get(), count);
    }

    #[rstest]
    #[case(0)]
    #[case(257)]
    fn test_new_rejects_out_of_range(#[case] count: usize) {
        assert!(WorkerCount::new(count).is_err());
    }

    #[test]
    fn test_resolve_positive_is_taken_as_is() {
        assert_eq!(WorkerCount::resolve(3).get(), 3);
    }

    #[test]
    fn test_resolve_zero_uses_all_cores() {
        let cores = std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1);
        assert_eq!(WorkerCount::resolve(0).get(), cores.min(WorkerCount::MAX));
    }

    #[test]
    fn test_resolve_negative_leaves_cores_free() {
        let cores = std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1);
        let expected = cores.saturating_sub(1).max(WorkerCount::MIN);
        assert_eq!(WorkerCount::resolve(-1).get(), expected);
    }

    #[test]
    fn test_resolve_never_drops_below_one() {
        assert_eq!(WorkerCount::resolve(-10_000).get(), 1);
    }

    #[test]
    fn test_resolve_clamps_to_max() {
        assert_eq!(WorkerCount::resolve(100_000).get(), WorkerCount::MAX);
    }
}
