//! Core type system and error handling for convsync
//!
//! This crate provides the foundational types shared by the rest of the
//! convsync workspace:
//!
//! - **Error handling**: a structured error type covering the configuration,
//!   traversal, mutation, conversion, and cancellation failure classes
//! - **Extensions**: validated dot-prefixed extension names and ordered
//!   extension sets used as inclusion filters
//! - **Worker sizing**: relative worker-count resolution against the
//!   machine's available parallelism
//!
//! # Examples
//!
//! ```rust
//! use convsync_types::{Extension, ExtensionSet, Result};
//!
//! fn tracked() -> Result<ExtensionSet> {
//!     ExtensionSet::parse("flac,.wav")
//! }
//! ```

#![deny(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod error;
pub mod result;
pub mod types;

// Re-export commonly used types
pub use config::WorkerCount;
pub use error::{Error, ErrorKind};
pub use result::Result;
pub use types::{Extension, ExtensionSet};

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn test_extension_set_parse() {
        let set = ExtensionSet::parse("flac,.wav").unwrap();
        assert_eq!(set.len(), 2);
        assert!(set.contains_path(Path::new("album/track.flac")));
        assert!(!set.contains_path(Path::new("album/cover.jpg")));
    }

    #[test]
    fn test_error_fatality() {
        assert!(Error::config("missing placeholder").is_fatal());
        assert!(!Error::Cancelled.is_fatal());
    }
}
