//! Error types and handling for convsync
//!
//! The error taxonomy mirrors the phases of a sync run: configuration
//! problems surface before any filesystem access, traversal problems abort
//! planning, mutation problems abort the run, and conversion problems are
//! recovered per job by the worker pool.

use std::path::PathBuf;

/// Main error type for convsync operations
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// Invalid configuration, reported before any filesystem mutation
    #[error("configuration error: {message}")]
    Config {
        /// Error message describing the configuration issue
        message: String,
    },

    /// A source or destination directory could not be enumerated
    #[error("cannot traverse '{path}': {message}")]
    Traversal {
        /// Directory or entry that failed to enumerate
        path: PathBuf,
        /// Underlying error message
        message: String,
    },

    /// A stale destination file could not be removed
    #[error("cannot remove '{path}': {message}")]
    Remove {
        /// Destination file that failed to be removed
        path: PathBuf,
        /// Underlying error message
        message: String,
    },

    /// A copy-through file could not be written to the destination
    #[error("cannot copy '{src}' to '{dest}': {message}")]
    Copy {
        /// Source file being copied
        src: PathBuf,
        /// Destination path that failed
        dest: PathBuf,
        /// Underlying error message
        message: String,
    },

    /// A conversion job failed; recovered at the job level by the pool
    #[error("conversion of '{path}' failed: {message}")]
    Convert {
        /// Source file whose conversion failed
        path: PathBuf,
        /// Underlying error message
        message: String,
    },

    /// The run was interrupted while draining the conversion queue
    #[error("operation cancelled")]
    Cancelled,

    /// I/O operation failed
    #[error("I/O error: {message}")]
    Io {
        /// Error message from the I/O operation
        message: String,
    },

    /// Generic error with custom message
    #[error("{message}")]
    Other {
        /// Custom error message
        message: String,
    },
}

/// Error kind for categorizing errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Configuration errors
    Config,
    /// Directory traversal errors
    Traversal,
    /// Deletion or copy errors
    Mutation,
    /// Per-job conversion errors
    Convert,
    /// Cancellation
    Cancelled,
    /// I/O related errors
    Io,
    /// Other errors
    Other,
}

impl Error {
    /// Get the error kind
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Config { .. } => ErrorKind::Config,
            Self::Traversal { .. } => ErrorKind::Traversal,
            Self::Remove { .. } | Self::Copy { .. } => ErrorKind::Mutation,
            Self::Convert { .. } => ErrorKind::Convert,
            Self::Cancelled => ErrorKind::Cancelled,
            Self::Io { .. } => ErrorKind::Io,
            Self::Other { .. } => ErrorKind::Other,
        }
    }

    /// Whether this error aborts the run.
    ///
    /// Conversion failures are per-job and the pool continues past them;
    /// cancellation ends the run but is reported rather than propagated as a
    /// failure. Everything else is fatal.
    pub fn is_fatal(&self) -> bool {
        !matches!(self.kind(), ErrorKind::Convert | ErrorKind::Cancelled)
    }

    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a new traversal error
    pub fn traversal<P: Into<PathBuf>, S: Into<String>>(path: P, message: S) -> Self {
        Self::Traversal {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create a new removal error
    pub fn remove<P: Into<PathBuf>, S: Into<String>>(path: P, message: S) -> Self {
        Self::Remove {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create a new copy error
    pub fn copy<P1: Into<PathBuf>, P2: Into<PathBuf>, S: Into<String>>(
        source: P1,
        dest: P2,
        message: S,
    ) -> Self {
        Self::Copy {
            src: source.into(),
            dest: dest.into(),
            message: message.into(),
        }
    }

    /// Create a new conversion error
    pub fn convert<P: Into<PathBuf>, S: Into<String>>(path: P, message: S) -> Self {
        Self::Convert {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create a new generic error
    pub fn other<S: Into<String>>(message: S) -> Self {
        Self::Other {
            message: message.into(),
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(error: std::io::Error) -> Self {
        Self::Io {
            message: error.to_string(),
        }
    }
}
