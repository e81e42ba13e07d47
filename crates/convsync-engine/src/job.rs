//! Conversion jobs and their outcomes

use convsync_types::Error;
use std::fmt;
use std::path::PathBuf;
use uuid::Uuid;

/// Unique identifier for a conversion job
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct JobId(Uuid);

impl JobId {
    /// Create a new job ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for JobId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One file scheduled for conversion.
///
/// Created by the executor, consumed by exactly one worker. The differ
/// guarantees destination paths are unique across a run, so jobs never race
/// on the same output file.
#[derive(Debug, Clone)]
pub struct ConversionJob {
    /// Unique job identifier
    pub id: JobId,
    /// Path relative to the source root, as listed by the scanner
    pub relative: PathBuf,
    /// Absolute source path
    pub source: PathBuf,
    /// Absolute destination path, extension already replaced
    pub dest: PathBuf,
}

impl ConversionJob {
    /// Create a new job
    pub fn new<P1: Into<PathBuf>, P2: Into<PathBuf>, P3: Into<PathBuf>>(
        relative: P1,
        source: P2,
        dest: P3,
    ) -> Self {
        Self {
            id: JobId::new(),
            relative: relative.into(),
            source: source.into(),
            dest: dest.into(),
        }
    }
}

/// Terminal state of a processed job.
///
/// A failed conversion is reported and counted but never halts the pool and
/// is never retried.
#[derive(Debug)]
pub enum JobOutcome {
    /// The converter exited successfully (or the job was only echoed)
    Completed,
    /// The converter could not be run or exited non-zero
    Failed {
        /// The per-job conversion error
        error: Error,
    },
}

impl JobOutcome {
    /// Whether this outcome is a failure
    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_job_ids_are_unique() {
        assert_ne!(JobId::new(), JobId::new());
    }

    #[test]
    fn test_job_construction() {
        let job = ConversionJob::new("a/b.wav", "/src/a/b.wav", "/dst/a/b.mp3");
        assert_eq!(job.relative, PathBuf::from("a/b.wav"));
        assert_eq!(job.source, PathBuf::from("/src/a/b.wav"));
        assert_eq!(job.dest, PathBuf::from("/dst/a/b.mp3"));
    }

    #[test]
    fn test_outcome_predicates() {
        assert!(!JobOutcome::Completed.is_failure());
        assert!(JobOutcome::Failed {
            error: Error::convert("a.wav", "converter exited with status 1")
        }
        .is_failure());
    }
}
