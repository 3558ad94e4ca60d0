use std::fmt;

use thiserror::Error;

/// Failures of the key generator and the demo driver.
///
/// The map itself has no fallible operations, a missing key is reported as `None`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("empty key range: min {min} is not below max {max}")]
    EmptyRange { min: i64, max: i64 },
    #[error("failed to format tree dump")]
    Format(#[from] fmt::Error),
}
