//! Strongly typed MIDI event model.

use patchbay_core::{UInt14, UInt4, UInt7};
use serde::{Deserialize, Serialize};

use crate::sysex::{SysEx7, SysEx7Packet, SysEx8, UniversalSysEx7, UniversalSysEx8};

/// One complete MIDI message.
///
/// Every variant carries the UMP `group` (0x0..=0xF) it travels on. Channel
/// voice messages use MIDI 1.0 resolution in both encodings. `SysEx8`,
/// `UniversalSysEx8` and `SysEx7Packet` exist only as UMP; asking for their
/// MIDI 1.0 bytes yields [`ParseError::UnsupportedVariant`](crate::ParseError).
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MidiEvent {
    // ==================== Channel Voice ====================
    NoteOff {
        note: UInt7,
        velocity: UInt7,
        channel: UInt4,
        group: UInt4,
    },
    NoteOn {
        note: UInt7,
        velocity: UInt7,
        channel: UInt4,
        group: UInt4,
    },
    /// Polyphonic key pressure.
    NotePressure {
        note: UInt7,
        amount: UInt7,
        channel: UInt4,
        group: UInt4,
    },
    Cc {
        controller: UInt7,
        value: UInt7,
        channel: UInt4,
        group: UInt4,
    },
    ProgramChange {
        program: UInt7,
        channel: UInt4,
        group: UInt4,
    },
    /// Channel pressure.
    Pressure {
        amount: UInt7,
        channel: UInt4,
        group: UInt4,
    },
    PitchBend {
        value: UInt14,
        channel: UInt4,
        group: UInt4,
    },

    // ==================== System Exclusive ====================
    SysEx7(SysEx7),
    UniversalSysEx7(UniversalSysEx7),
    SysEx8(SysEx8),
    UniversalSysEx8(UniversalSysEx8),
    SysEx7Packet(SysEx7Packet),

    // ==================== System Common ====================
    TimecodeQuarterFrame {
        data: UInt7,
        group: UInt4,
    },
    SongPositionPointer {
        midi_beat: UInt14,
        group: UInt4,
    },
    SongSelect {
        number: UInt7,
        group: UInt4,
    },
    TuneRequest {
        group: UInt4,
    },

    // ==================== System Real Time ====================
    TimingClock {
        group: UInt4,
    },
    Start {
        group: UInt4,
    },
    Continue {
        group: UInt4,
    },
    /// `0xFC`: playback in a receiver should stop immediately.
    Stop {
        group: UInt4,
    },
    ActiveSensing {
        group: UInt4,
    },
    SystemReset {
        group: UInt4,
    },
}

impl MidiEvent {
    // ==================== Constructors ====================

    #[inline]
    pub fn note_on(note: UInt7, velocity: UInt7, channel: UInt4) -> Self {
        Self::NoteOn {
            note,
            velocity,
            channel,
            group: UInt4::MIN,
        }
    }

    #[inline]
    pub fn note_off(note: UInt7, velocity: UInt7, channel: UInt4) -> Self {
        Self::NoteOff {
            note,
            velocity,
            channel,
            group: UInt4::MIN,
        }
    }

    #[inline]
    pub fn note_pressure(note: UInt7, amount: UInt7, channel: UInt4) -> Self {
        Self::NotePressure {
            note,
            amount,
            channel,
            group: UInt4::MIN,
        }
    }

    #[inline]
    pub fn cc(controller: UInt7, value: UInt7, channel: UInt4) -> Self {
        Self::Cc {
            controller,
            value,
            channel,
            group: UInt4::MIN,
        }
    }

    #[inline]
    pub fn pitch_bend(value: UInt14, channel: UInt4) -> Self {
        Self::PitchBend {
            value,
            channel,
            group: UInt4::MIN,
        }
    }

    #[inline]
    pub fn stop() -> Self {
        Self::Stop { group: UInt4::MIN }
    }

    /// Returns the event moved onto `group`.
    pub fn with_group(mut self, group: UInt4) -> Self {
        match &mut self {
            Self::NoteOff { group: g, .. }
            | Self::NoteOn { group: g, .. }
            | Self::NotePressure { group: g, .. }
            | Self::Cc { group: g, .. }
            | Self::ProgramChange { group: g, .. }
            | Self::Pressure { group: g, .. }
            | Self::PitchBend { group: g, .. }
            | Self::SysEx7(SysEx7 { group: g, .. })
            | Self::UniversalSysEx7(UniversalSysEx7 { group: g, .. })
            | Self::SysEx8(SysEx8 { group: g, .. })
            | Self::UniversalSysEx8(UniversalSysEx8 { group: g, .. })
            | Self::TimecodeQuarterFrame { group: g, .. }
            | Self::SongPositionPointer { group: g, .. }
            | Self::SongSelect { group: g, .. }
            | Self::TuneRequest { group: g }
            | Self::TimingClock { group: g }
            | Self::Start { group: g }
            | Self::Continue { group: g }
            | Self::Stop { group: g }
            | Self::ActiveSensing { group: g }
            | Self::SystemReset { group: g } => *g = group,
            Self::SysEx7Packet(packet) => packet.set_group(group),
        }
        self
    }

    // ==================== Accessors ====================

    /// UMP group (0x0..=0xF).
    pub fn group(&self) -> UInt4 {
        match self {
            Self::NoteOff { group, .. }
            | Self::NoteOn { group, .. }
            | Self::NotePressure { group, .. }
            | Self::Cc { group, .. }
            | Self::ProgramChange { group, .. }
            | Self::Pressure { group, .. }
            | Self::PitchBend { group, .. }
            | Self::SysEx7(SysEx7 { group, .. })
            | Self::UniversalSysEx7(UniversalSysEx7 { group, .. })
            | Self::SysEx8(SysEx8 { group, .. })
            | Self::UniversalSysEx8(UniversalSysEx8 { group, .. })
            | Self::TimecodeQuarterFrame { group, .. }
            | Self::SongPositionPointer { group, .. }
            | Self::SongSelect { group, .. }
            | Self::TuneRequest { group }
            | Self::TimingClock { group }
            | Self::Start { group }
            | Self::Continue { group }
            | Self::Stop { group }
            | Self::ActiveSensing { group }
            | Self::SystemReset { group } => *group,
            Self::SysEx7Packet(packet) => packet.group(),
        }
    }

    /// MIDI channel (0-15) for channel voice messages.
    pub fn channel(&self) -> Option<UInt4> {
        match self {
            Self::NoteOff { channel, .. }
            | Self::NoteOn { channel, .. }
            | Self::NotePressure { channel, .. }
            | Self::Cc { channel, .. }
            | Self::ProgramChange { channel, .. }
            | Self::Pressure { channel, .. }
            | Self::PitchBend { channel, .. } => Some(*channel),
            _ => None,
        }
    }

    /// True for variants that have no MIDI 1.0 byte encoding.
    #[inline]
    pub fn is_ump_only(&self) -> bool {
        matches!(
            self,
            Self::SysEx8(_) | Self::UniversalSysEx8(_) | Self::SysEx7Packet(_)
        )
    }

    #[inline]
    pub fn is_system_exclusive(&self) -> bool {
        matches!(
            self,
            Self::SysEx7(_)
                | Self::UniversalSysEx7(_)
                | Self::SysEx8(_)
                | Self::UniversalSysEx8(_)
                | Self::SysEx7Packet(_)
        )
    }

    #[inline]
    pub fn is_system_real_time(&self) -> bool {
        matches!(
            self,
            Self::TimingClock { .. }
                | Self::Start { .. }
                | Self::Continue { .. }
                | Self::Stop { .. }
                | Self::ActiveSensing { .. }
                | Self::SystemReset { .. }
        )
    }
}
