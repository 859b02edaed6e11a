//! MIDI 1.0 byte-stream encoding.
//!
//! One buffer holds exactly one complete message. Running status is not
//! accepted: the first byte must be a status byte.

use patchbay_core::{UInt14, UInt4, UInt7};

use crate::error::ParseError;
use crate::event::MidiEvent;

const SYSEX_START: u8 = 0xF0;
const SYSEX_END: u8 = 0xF7;

/// Number of data bytes following `status` in a non-SysEx message.
pub(crate) fn data_len(status: u8) -> Result<usize, ParseError> {
    match status {
        0x80..=0xBF | 0xE0..=0xEF => Ok(2),
        0xC0..=0xDF => Ok(1),
        0xF1 | 0xF3 => Ok(1),
        0xF2 => Ok(2),
        0xF6 | 0xF8 | 0xFA | 0xFB | 0xFC | 0xFE | 0xFF => Ok(0),
        0xF4 | 0xF5 | 0xF9 | 0xFD => Err(ParseError::UnsupportedVariant),
        _ => Err(ParseError::Malformed),
    }
}

/// Builds a non-SysEx event from a status byte and its data bytes.
///
/// `data` must already have the length [`data_len`] reports.
pub(crate) fn short_message(status: u8, data: &[u8], group: UInt4) -> Result<MidiEvent, ParseError> {
    let mut seven = [UInt7::MIN; 2];
    for (slot, &byte) in seven.iter_mut().zip(data) {
        *slot = UInt7::new(byte)?;
    }
    let [d1, d2] = seven;
    let channel = UInt4::new_masked(status & 0x0F);

    let event = match status & 0xF0 {
        0x80 => MidiEvent::NoteOff {
            note: d1,
            velocity: d2,
            channel,
            group,
        },
        0x90 => MidiEvent::NoteOn {
            note: d1,
            velocity: d2,
            channel,
            group,
        },
        0xA0 => MidiEvent::NotePressure {
            note: d1,
            amount: d2,
            channel,
            group,
        },
        0xB0 => MidiEvent::Cc {
            controller: d1,
            value: d2,
            channel,
            group,
        },
        0xC0 => MidiEvent::ProgramChange {
            program: d1,
            channel,
            group,
        },
        0xD0 => MidiEvent::Pressure {
            amount: d1,
            channel,
            group,
        },
        0xE0 => MidiEvent::PitchBend {
            value: UInt14::from_msb_lsb(d2, d1),
            channel,
            group,
        },
        _ => match status {
            0xF1 => MidiEvent::TimecodeQuarterFrame { data: d1, group },
            0xF2 => MidiEvent::SongPositionPointer {
                midi_beat: UInt14::from_msb_lsb(d2, d1),
                group,
            },
            0xF3 => MidiEvent::SongSelect { number: d1, group },
            0xF6 => MidiEvent::TuneRequest { group },
            0xF8 => MidiEvent::TimingClock { group },
            0xFA => MidiEvent::Start { group },
            0xFB => MidiEvent::Continue { group },
            0xFC => MidiEvent::Stop { group },
            0xFE => MidiEvent::ActiveSensing { group },
            0xFF => MidiEvent::SystemReset { group },
            _ => return Err(ParseError::Malformed),
        },
    };
    Ok(event)
}

impl MidiEvent {
    /// Parses one complete MIDI 1.0 message.
    pub fn parse_midi1(bytes: &[u8], group: UInt4) -> Result<Self, ParseError> {
        let (&status, data) = bytes.split_first().ok_or(ParseError::RawBytesEmpty)?;

        if status < 0x80 {
            return Err(ParseError::Malformed);
        }

        if status == SYSEX_START {
            let body = data.strip_suffix(&[SYSEX_END]).unwrap_or(data);
            if body.is_empty() {
                return Err(ParseError::Malformed);
            }
            return Self::sysex7(body, group);
        }

        if data.len() != data_len(status)? {
            return Err(ParseError::Malformed);
        }
        short_message(status, data, group)
    }

    /// Status byte plus data bytes for non-SysEx variants.
    pub(crate) fn short_message_bytes(&self) -> Option<([u8; 3], usize)> {
        let bytes = match *self {
            Self::NoteOff {
                note,
                velocity,
                channel,
                ..
            } => ([0x80 | channel.value(), note.value(), velocity.value()], 3),
            Self::NoteOn {
                note,
                velocity,
                channel,
                ..
            } => ([0x90 | channel.value(), note.value(), velocity.value()], 3),
            Self::NotePressure {
                note,
                amount,
                channel,
                ..
            } => ([0xA0 | channel.value(), note.value(), amount.value()], 3),
            Self::Cc {
                controller,
                value,
                channel,
                ..
            } => ([0xB0 | channel.value(), controller.value(), value.value()], 3),
            Self::ProgramChange {
                program, channel, ..
            } => ([0xC0 | channel.value(), program.value(), 0], 2),
            Self::Pressure {
                amount, channel, ..
            } => ([0xD0 | channel.value(), amount.value(), 0], 2),
            Self::PitchBend { value, channel, .. } => (
                [0xE0 | channel.value(), value.lsb().value(), value.msb().value()],
                3,
            ),
            Self::TimecodeQuarterFrame { data, .. } => ([0xF1, data.value(), 0], 2),
            Self::SongPositionPointer { midi_beat, .. } => {
                ([0xF2, midi_beat.lsb().value(), midi_beat.msb().value()], 3)
            }
            Self::SongSelect { number, .. } => ([0xF3, number.value(), 0], 2),
            Self::TuneRequest { .. } => ([0xF6, 0, 0], 1),
            Self::TimingClock { .. } => ([0xF8, 0, 0], 1),
            Self::Start { .. } => ([0xFA, 0, 0], 1),
            Self::Continue { .. } => ([0xFB, 0, 0], 1),
            Self::Stop { .. } => ([0xFC, 0, 0], 1),
            Self::ActiveSensing { .. } => ([0xFE, 0, 0], 1),
            Self::SystemReset { .. } => ([0xFF, 0, 0], 1),
            Self::SysEx7(_)
            | Self::UniversalSysEx7(_)
            | Self::SysEx8(_)
            | Self::UniversalSysEx8(_)
            | Self::SysEx7Packet(_) => return None,
        };
        Some(bytes)
    }

    /// MIDI 1.0 bytes for this event. SysEx is always framed `F0 .. F7`.
    pub fn midi1_raw_bytes(&self) -> Result<Vec<u8>, ParseError> {
        let body = match self {
            Self::SysEx7(sysex) => sysex.body(),
            Self::UniversalSysEx7(sysex) => sysex.body(),
            Self::SysEx8(_) | Self::UniversalSysEx8(_) | Self::SysEx7Packet(_) => {
                return Err(ParseError::UnsupportedVariant)
            }
            _ => {
                return self
                    .short_message_bytes()
                    .map(|(bytes, len)| bytes[..len].to_vec())
                    .ok_or(ParseError::UnsupportedVariant)
            }
        };

        let mut bytes = Vec::with_capacity(body.len() + 2);
        bytes.push(SYSEX_START);
        bytes.extend_from_slice(&body);
        bytes.push(SYSEX_END);
        Ok(bytes)
    }
}
