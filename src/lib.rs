//! # Patchbay - MIDI codec and HUI control-surface protocol
//!
//! ## Architecture
//!
//! Patchbay is an umbrella crate that coordinates:
//! - **patchbay-core** - Bounded MIDI integers (`UInt4`, `UInt7`, `UInt14`) and `Atomic<T>`
//! - **patchbay-midi** - `MidiEvent` with lossless MIDI 1.0 byte and UMP word codecs
//! - **patchbay-hui** - HUI switch map, stateful decoder, encoder and switch state store
//!
//! ## Quick Start
//!
//! ```
//! use patchbay::{HuiLink, HuiRole, MidiEvent, UInt4};
//! use patchbay::hui::HuiSurfaceEvent;
//!
//! // Codec
//! let stop = MidiEvent::Stop { group: UInt4::new(0xA).unwrap() };
//! assert_eq!(stop.midi1_raw_bytes()?, vec![0xFC]);
//! assert_eq!(stop.ump_raw_words(), vec![0x1AFC_0000]);
//!
//! // HUI: a surface answering a ping
//! let (tx, rx) = std::sync::mpsc::channel();
//! let mut surface = HuiLink::builder()
//!     .role(HuiRole::Surface)
//!     .build(move |event| {
//!         let _ = tx.send(event);
//!     });
//! surface.receive_midi1(&[0x90, 0x00, 0x00])?;
//! assert_eq!(rx.try_recv().unwrap(), HuiSurfaceEvent::Ping);
//! let reply = surface.encode_midi1(&HuiSurfaceEvent::PingReply)?;
//! assert_eq!(reply, vec![vec![0x90, 0x00, 0x7F]]);
//! # Ok::<(), patchbay::Error>(())
//! ```
//!
//! ## Feature Flags
//!
//! - `default` - `hui`
//! - `hui` - HUI layer and `HuiLink`

/// Re-export of patchbay-core for direct access
pub use patchbay_core as core;

/// Re-export of patchbay-midi for direct access
pub use patchbay_midi as midi;

// Error types
mod error;
pub use error::{Error, Result};

// Core types
pub use patchbay_core::{Atomic, RangeError, UInt14, UInt4, UInt7};

// MIDI codec
pub use patchbay_midi::{MessageType, MidiEvent, MidiNote, NoteNameError, NoteStyle, ParseError};

// HUI subsystem
#[cfg(feature = "hui")]
pub use patchbay_hui as hui;

#[cfg(feature = "hui")]
pub use patchbay_hui::{HuiDecoder, HuiError, HuiRole, HuiSwitchStates};

#[cfg(feature = "hui")]
mod builder;
#[cfg(feature = "hui")]
mod link;

#[cfg(feature = "hui")]
pub use builder::HuiLinkBuilder;
#[cfg(feature = "hui")]
pub use link::HuiLink;
