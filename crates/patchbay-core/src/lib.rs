//! Core value types shared by the patchbay crates.
//!
//! - [`UInt4`], [`UInt7`], [`UInt14`]: bounded integers used as typed MIDI fields
//! - [`Atomic`]: reader/writer-locked container for shared state
//!
//! Everything here is free of MIDI wire-format knowledge; the codec lives in
//! `patchbay-midi`.

pub mod atomic;
pub mod error;
pub mod int;

pub use atomic::Atomic;
pub use error::RangeError;
pub use int::{UInt14, UInt4, UInt7};
