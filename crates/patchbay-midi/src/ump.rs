//! Universal MIDI Packet (UMP) word encoding.
//!
//! ```text
//! word 0: [message type:4][group:4][status:8][data:8][data:8]
//! ```
//!
//! System and MIDI 1.0 channel voice messages take one word. SysEx7 uses
//! 64-bit packets (6 data bytes each), SysEx8 uses 128-bit packets (stream ID
//! plus 13 data bytes each); long messages span Start/Continue/End packets.

use patchbay_core::UInt4;
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::error::ParseError;
use crate::event::MidiEvent;
use crate::midi1::{data_len, short_message};
use crate::sysex::{to_seven_bit, PacketPosition, SysEx7Packet};

const SYSEX7_PACKET_WORDS: usize = 2;
const SYSEX7_PACKET_BYTES: usize = 6;
const SYSEX8_PACKET_WORDS: usize = 4;
/// Data bytes per SysEx8 packet, not counting the stream ID.
const SYSEX8_PACKET_BYTES: usize = 13;

/// UMP message type nibble.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum MessageType {
    Utility = 0x0,
    SystemRealTimeAndCommon = 0x1,
    Midi1ChannelVoice = 0x2,
    /// SysEx7.
    Data64Bit = 0x3,
    Midi2ChannelVoice = 0x4,
    /// SysEx8 and mixed data sets.
    Data128Bit = 0x5,
}

impl MessageType {
    pub const fn from_nibble(nibble: u8) -> Option<Self> {
        match nibble {
            0x0 => Some(Self::Utility),
            0x1 => Some(Self::SystemRealTimeAndCommon),
            0x2 => Some(Self::Midi1ChannelVoice),
            0x3 => Some(Self::Data64Bit),
            0x4 => Some(Self::Midi2ChannelVoice),
            0x5 => Some(Self::Data128Bit),
            _ => None,
        }
    }

    /// First byte of every word-0: `(message_type << 4) | group`.
    #[inline]
    pub const fn with_group(self, group: UInt4) -> u8 {
        ((self as u8) << 4) | group.value()
    }
}

/// Packet status nibble shared by SysEx7 and SysEx8.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum SysExStatus {
    Complete = 0x0,
    Start = 0x1,
    Continue = 0x2,
    End = 0x3,
}

impl SysExStatus {
    fn from_nibble(nibble: u8) -> Result<Self, ParseError> {
        match nibble {
            0x0 => Ok(Self::Complete),
            0x1 => Ok(Self::Start),
            0x2 => Ok(Self::Continue),
            0x3 => Ok(Self::End),
            _ => Err(ParseError::Malformed),
        }
    }

    /// Status for packet `index` of `count`.
    fn for_index(index: usize, count: usize) -> Self {
        match (index, count) {
            (_, 1) => Self::Complete,
            (0, _) => Self::Start,
            (i, n) if i + 1 == n => Self::End,
            _ => Self::Continue,
        }
    }
}

impl From<PacketPosition> for SysExStatus {
    fn from(position: PacketPosition) -> Self {
        match position {
            PacketPosition::Start => Self::Start,
            PacketPosition::Continue => Self::Continue,
            PacketPosition::End => Self::End,
        }
    }
}

#[inline]
fn word(bytes: [u8; 4]) -> u32 {
    u32::from_be_bytes(bytes)
}

impl MidiEvent {
    /// Parses one complete UMP message from `words`.
    ///
    /// A buffer holding a single non-complete SysEx7 packet yields
    /// [`MidiEvent::SysEx7Packet`]; a run of packets must form a whole
    /// Start..End sequence on one group.
    pub fn parse_ump(words: &[u32]) -> Result<Self, ParseError> {
        let first = *words.first().ok_or(ParseError::RawBytesEmpty)?;
        let [b0, status, d1, d2] = first.to_be_bytes();
        let group = UInt4::new_masked(b0);

        match MessageType::from_nibble(b0 >> 4) {
            Some(MessageType::SystemRealTimeAndCommon) => {
                if words.len() != 1 || !(0xF1..=0xFF).contains(&status) || status == 0xF7 {
                    return Err(ParseError::Malformed);
                }
                let len = data_len(status)?;
                short_message(status, &[d1, d2][..len], group)
            }
            Some(MessageType::Midi1ChannelVoice) => {
                if words.len() != 1 || !(0x80..=0xEF).contains(&status) {
                    return Err(ParseError::Malformed);
                }
                let len = data_len(status)?;
                short_message(status, &[d1, d2][..len], group)
            }
            Some(MessageType::Data64Bit) => parse_sysex7_packets(words, group),
            Some(MessageType::Data128Bit) => parse_sysex8_packets(words, group),
            Some(MessageType::Utility) | Some(MessageType::Midi2ChannelVoice) | None => {
                Err(ParseError::UnsupportedVariant)
            }
        }
    }

    /// UMP words for this event.
    pub fn ump_raw_words(&self) -> Vec<u32> {
        let group = self.group();
        match self {
            Self::SysEx7(sysex) => sysex7_packets(&sysex.body(), group),
            Self::UniversalSysEx7(sysex) => sysex7_packets(&sysex.body(), group),
            Self::SysEx7Packet(packet) => {
                let data: Vec<u8> = packet.data().iter().map(|b| b.value()).collect();
                sysex7_packet(packet.position().into(), &data, group).to_vec()
            }
            Self::SysEx8(sysex) => sysex8_packets(sysex.stream_id, &sysex.payload(), group),
            Self::UniversalSysEx8(sysex) => {
                sysex8_packets(sysex.stream_id, &sysex.payload(), group)
            }
            _ => {
                let message_type = if self.channel().is_some() {
                    MessageType::Midi1ChannelVoice
                } else {
                    MessageType::SystemRealTimeAndCommon
                };
                let ([status, d1, d2], _) = self.short_message_bytes().unwrap_or(([0; 3], 0));
                vec![word([message_type.with_group(group), status, d1, d2])]
            }
        }
    }
}

// ==================== SysEx7 ====================

fn sysex7_packet(status: SysExStatus, data: &[u8], group: UInt4) -> [u32; 2] {
    let mut bytes = [0u8; SYSEX7_PACKET_BYTES];
    bytes[..data.len()].copy_from_slice(data);
    [
        word([
            MessageType::Data64Bit.with_group(group),
            ((status as u8) << 4) | data.len() as u8,
            bytes[0],
            bytes[1],
        ]),
        word([bytes[2], bytes[3], bytes[4], bytes[5]]),
    ]
}

fn sysex7_packets(body: &[u8], group: UInt4) -> Vec<u32> {
    if body.is_empty() {
        return sysex7_packet(SysExStatus::Complete, &[], group).to_vec();
    }
    let count = body.len().div_ceil(SYSEX7_PACKET_BYTES);
    body.chunks(SYSEX7_PACKET_BYTES)
        .enumerate()
        .flat_map(|(i, chunk)| sysex7_packet(SysExStatus::for_index(i, count), chunk, group))
        .collect()
}

fn parse_sysex7_packets(words: &[u32], group: UInt4) -> Result<MidiEvent, ParseError> {
    if words.len() % SYSEX7_PACKET_WORDS != 0 {
        return Err(ParseError::Malformed);
    }
    let count = words.len() / SYSEX7_PACKET_WORDS;
    let mut body = Vec::with_capacity(count * SYSEX7_PACKET_BYTES);

    for (i, packet) in words.chunks_exact(SYSEX7_PACKET_WORDS).enumerate() {
        let [b0, b1, d0, d1] = packet[0].to_be_bytes();
        let [d2, d3, d4, d5] = packet[1].to_be_bytes();

        if b0 != MessageType::Data64Bit.with_group(group) {
            trace!("SysEx7 packet {} changes message type or group", i);
            return Err(ParseError::Malformed);
        }
        let status = SysExStatus::from_nibble(b1 >> 4)?;
        let len = (b1 & 0x0F) as usize;
        if len > SYSEX7_PACKET_BYTES {
            return Err(ParseError::Malformed);
        }
        let bytes = [d0, d1, d2, d3, d4, d5];
        let data = &bytes[..len];

        if count == 1 {
            return match status {
                SysExStatus::Complete => MidiEvent::sysex7(data, group),
                _ => {
                    let position = match status {
                        SysExStatus::Start => PacketPosition::Start,
                        SysExStatus::Continue => PacketPosition::Continue,
                        _ => PacketPosition::End,
                    };
                    let packet = SysEx7Packet::new(position, to_seven_bit(data)?, group)?;
                    Ok(MidiEvent::SysEx7Packet(packet))
                }
            };
        }

        if status != SysExStatus::for_index(i, count) {
            trace!("SysEx7 packet {} has out-of-sequence status {:?}", i, status);
            return Err(ParseError::Malformed);
        }
        body.extend_from_slice(data);
    }

    MidiEvent::sysex7(&body, group)
}

// ==================== SysEx8 ====================

fn sysex8_packets(stream_id: u8, payload: &[u8], group: UInt4) -> Vec<u32> {
    let chunks: Vec<&[u8]> = if payload.is_empty() {
        vec![payload]
    } else {
        payload.chunks(SYSEX8_PACKET_BYTES).collect()
    };
    let count = chunks.len();

    let mut words = Vec::with_capacity(count * SYSEX8_PACKET_WORDS);
    for (i, chunk) in chunks.into_iter().enumerate() {
        let status = SysExStatus::for_index(i, count);
        let mut bytes = [0u8; SYSEX8_PACKET_BYTES];
        bytes[..chunk.len()].copy_from_slice(chunk);

        // byte count includes the stream ID
        words.push(word([
            MessageType::Data128Bit.with_group(group),
            ((status as u8) << 4) | (chunk.len() + 1) as u8,
            stream_id,
            bytes[0],
        ]));
        for quad in bytes[1..].chunks_exact(4) {
            words.push(word([quad[0], quad[1], quad[2], quad[3]]));
        }
    }
    words
}

fn parse_sysex8_packets(words: &[u32], group: UInt4) -> Result<MidiEvent, ParseError> {
    if words.len() % SYSEX8_PACKET_WORDS != 0 {
        return Err(ParseError::Malformed);
    }
    let count = words.len() / SYSEX8_PACKET_WORDS;
    let mut stream: Option<u8> = None;
    let mut raw = Vec::with_capacity(1 + count * SYSEX8_PACKET_BYTES);

    for (i, packet) in words.chunks_exact(SYSEX8_PACKET_WORDS).enumerate() {
        let [b0, b1, stream_id, first] = packet[0].to_be_bytes();

        if b0 != MessageType::Data128Bit.with_group(group) {
            trace!("SysEx8 packet {} changes message type or group", i);
            return Err(ParseError::Malformed);
        }
        let status = SysExStatus::from_nibble(b1 >> 4)?;
        if status != SysExStatus::for_index(i, count) {
            trace!("SysEx8 packet {} has out-of-sequence status {:?}", i, status);
            return Err(ParseError::Malformed);
        }
        let len = (b1 & 0x0F) as usize;
        if !(1..=SYSEX8_PACKET_BYTES + 1).contains(&len) {
            return Err(ParseError::Malformed);
        }

        match stream {
            None => {
                stream = Some(stream_id);
                raw.push(stream_id);
            }
            Some(id) if id != stream_id => {
                trace!("SysEx8 packet {} switches stream {} -> {}", i, id, stream_id);
                return Err(ParseError::Malformed);
            }
            Some(_) => {}
        }

        let mut bytes = [0u8; SYSEX8_PACKET_BYTES];
        bytes[0] = first;
        for (w, quad) in packet[1..].iter().zip(bytes[1..].chunks_exact_mut(4)) {
            quad.copy_from_slice(&w.to_be_bytes());
        }
        raw.extend_from_slice(&bytes[..len - 1]);
    }

    MidiEvent::sysex8(&raw, group)
}
