//! Error types for patchbay-core.

use thiserror::Error;

/// A value fell outside the domain of a bounded integer.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RangeError {
    #[error("integer underflow: value is below the type minimum")]
    Underflow,

    #[error("integer overflow: value is above the type maximum")]
    Overflow,
}
