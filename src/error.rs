//! Centralized error type for the patchbay umbrella crate.
//!
//! Wraps all subsystem errors so `?` propagates naturally across crate boundaries.

use thiserror::Error;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    #[error(transparent)]
    Range(#[from] patchbay_core::RangeError),

    #[error("MIDI: {0}")]
    Parse(#[from] patchbay_midi::ParseError),

    #[error("note name: {0}")]
    NoteName(#[from] patchbay_midi::NoteNameError),

    #[cfg(feature = "hui")]
    #[error("HUI: {0}")]
    Hui(#[from] patchbay_hui::HuiError),
}

pub type Result<T> = std::result::Result<T, Error>;
