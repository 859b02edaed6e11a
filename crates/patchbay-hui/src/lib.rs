//! HUI control-surface protocol.
//!
//! HUI runs over plain MIDI 1.0 channel voice and SysEx messages. This crate
//! maps those messages to [`HuiSurfaceEvent`]s and back:
//!
//! - **Switch map**: every button/LED as a typed [`HuiSwitch`]
//! - **Decoder**: [`HuiDecoder`], stateful, role-aware, never fails
//! - **Encoder**: [`HuiSurfaceEvent::to_midi_events`]
//! - **State store**: [`HuiSwitchStates`], one bit per switch
//!
//! # Example
//!
//! ```
//! use patchbay_hui::{HuiDecoder, HuiRole, HuiSurfaceEvent, HuiSwitch, switch::Transport};
//!
//! let play = HuiSurfaceEvent::Switch {
//!     switch: HuiSwitch::Transport(Transport::Play),
//!     state: true,
//! };
//!
//! // surface presses Play ...
//! let messages = play.to_midi_events(HuiRole::Surface).unwrap();
//!
//! // ... and the host decodes it
//! let (mut decoder, events) = HuiDecoder::channel(HuiRole::Host);
//! decoder.midi_in_all(&messages);
//! assert_eq!(events.try_recv().unwrap(), play);
//! ```

// Error types
pub mod error;
pub use error::{HuiError, Result};

// Addressing
pub mod channel;
pub mod switch;
pub use channel::{HuiChannel, HuiVPot};
pub use switch::{ChannelStripSwitch, HuiSwitch, HuiSwitchIdentity};

// Events and encoding
pub mod event;
pub use event::{HuiRole, HuiSurfaceEvent, LargeDisplaySlice, MeterSide, VPotDisplay, VPotMode};

// Decoding
pub mod decoder;
pub use decoder::{HuiDecoder, HuiDecoderBuilder, DEFAULT_MAX_SYSEX_LEN};

// State
pub mod state;
pub use state::{HuiSurfaceState, HuiSwitchStates};

mod text;
mod wire;
