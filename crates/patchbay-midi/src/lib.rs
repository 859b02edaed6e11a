//! MIDI event model with lossless MIDI 1.0 and UMP codecs.
//!
//! One [`MidiEvent`] type covers channel voice, system common, system
//! real-time and System Exclusive messages. Every event can be encoded as
//! Universal MIDI Packet words; everything except SysEx8 and lone SysEx7
//! packets can also be encoded as MIDI 1.0 bytes.
//!
//! # Example
//!
//! ```
//! use patchbay_core::UInt4;
//! use patchbay_midi::MidiEvent;
//!
//! let stop = MidiEvent::Stop { group: UInt4::new(0xA).unwrap() };
//! assert_eq!(stop.midi1_raw_bytes().unwrap(), vec![0xFC]);
//! assert_eq!(stop.ump_raw_words(), vec![0x1AFC_0000]);
//!
//! let back = MidiEvent::parse_ump(&stop.ump_raw_words()).unwrap();
//! assert_eq!(back, stop);
//! ```

// Error types
pub mod error;
pub use error::{NoteNameError, ParseError, RangeError};

// Event model
pub mod event;
pub use event::MidiEvent;

// System Exclusive payloads and IDs
pub mod sysex;
pub use sysex::{
    ManufacturerId, PacketPosition, SysEx7, SysEx7Packet, SysEx8, SysExId, UniversalSysEx7,
    UniversalSysEx8, UniversalSysExType,
};

// Note numbers and names
pub mod note;
pub use note::{MidiNote, NoteStyle};

// Encodings
mod midi1;
pub mod ump;
pub use ump::MessageType;

// Bounded field types, re-exported for convenience
pub use patchbay_core::{UInt14, UInt4, UInt7};
