//! Error types for reductions

use thiserror::Error;

/// Boxed error returned by a fallible operator.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Result type alias using the crate's [`Error`]
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while running a reduction.
///
/// Panics raised by an operator are not represented here: they are
/// re-raised on the calling thread unchanged.
#[derive(Error, Debug)]
pub enum Error {
    /// An argument of the reduction is out of its valid range
    #[error("Invalid argument '{name}': {reason}")]
    InvalidArgument {
        /// Name of the argument
        name: &'static str,
        /// Why the value was rejected
        reason: String,
    },

    /// The caller supplied operator returned an error
    #[error("Operator failed: {0}")]
    Operator(#[source] BoxError),

    /// A worker thread of a parallel executor could not be spawned
    #[error("Failed to spawn worker thread: {0}")]
    Spawn(#[source] std::io::Error),
}

impl Error {
    pub(crate) fn invalid_argument(name: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidArgument {
            name,
            reason: reason.into(),
        }
    }

    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, Self::InvalidArgument { .. })
    }
}
