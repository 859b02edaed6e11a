//! Error types for the MIDI codec.

use thiserror::Error;

pub use patchbay_core::RangeError;

/// Failure to turn a buffer into a [`MidiEvent`](crate::MidiEvent), or to
/// produce an encoding the event does not have.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParseError {
    #[error("raw bytes are empty")]
    RawBytesEmpty,

    #[error("malformed message")]
    Malformed,

    #[error("unsupported message variant")]
    UnsupportedVariant,
}

impl From<RangeError> for ParseError {
    fn from(_: RangeError) -> Self {
        ParseError::Malformed
    }
}

/// Failure to read a note name such as `"C#4"`.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NoteNameError {
    #[error("not a note name")]
    Syntax,

    #[error("note outside the MIDI range: {0}")]
    OutOfRange(#[from] RangeError),
}
