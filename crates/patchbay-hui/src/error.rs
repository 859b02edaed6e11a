//! Error types for the HUI layer.

use thiserror::Error;

use patchbay_core::RangeError;
use patchbay_midi::ParseError;

use crate::event::HuiRole;

/// Failure to encode a [`HuiSurfaceEvent`](crate::HuiSurfaceEvent).
///
/// Decoding never fails; unrecognised input is dropped and logged.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HuiError {
    #[error("a {role} does not send {event}")]
    WrongDirection { event: &'static str, role: HuiRole },

    #[error("field outside the HUI protocol range: {0}")]
    OutOfRange(#[from] RangeError),

    #[error("display SysEx rejected: {0}")]
    SysEx(#[from] ParseError),
}

pub type Result<T> = std::result::Result<T, HuiError>;
