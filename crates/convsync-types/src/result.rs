//! Result type alias for convsync operations

use crate::Error;

/// Result type alias for convsync operations
pub type Result<T> = std::result::Result<T, Error>;
