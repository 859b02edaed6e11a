//! System Exclusive identifiers, payloads and their byte-level parsers.
//!
//! Two ID layouts exist on the wire:
//!
//! ```text
//! MIDI 1.0 / SysEx7   universal: 7E|7F          manufacturer: nn | 00 nn nn
//! SysEx8 (UMP)        universal: 00 7E|7F       manufacturer: 00 nn | (80|nn) nn
//! ```

use patchbay_core::{UInt4, UInt7};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use smallvec::{smallvec, SmallVec};

use crate::error::ParseError;
use crate::event::MidiEvent;

/// Registered universal SysEx categories.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UniversalSysExType {
    NonRealTime,
    RealTime,
}

impl UniversalSysExType {
    #[inline]
    pub const fn id_byte(self) -> u8 {
        match self {
            Self::NonRealTime => 0x7E,
            Self::RealTime => 0x7F,
        }
    }

    #[inline]
    pub const fn from_id_byte(byte: u8) -> Option<Self> {
        match byte {
            0x7E => Some(Self::NonRealTime),
            0x7F => Some(Self::RealTime),
            _ => None,
        }
    }
}

/// Vendor code of a manufacturer SysEx message: one byte (0x01..=0x7D) or
/// three bytes (`0x00` followed by two 7-bit bytes).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ManufacturerId(Repr);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
enum Repr {
    OneByte(u8),
    ThreeByte(u8, u8),
}

impl ManufacturerId {
    pub fn one_byte(id: u8) -> Result<Self, ParseError> {
        match id {
            0x01..=0x7D => Ok(Self(Repr::OneByte(id))),
            _ => Err(ParseError::Malformed),
        }
    }

    /// Extended ID `0x00 byte1 byte2`.
    pub fn three_byte(byte1: u8, byte2: u8) -> Result<Self, ParseError> {
        if byte1 > 0x7F || byte2 > 0x7F {
            return Err(ParseError::Malformed);
        }
        Ok(Self(Repr::ThreeByte(byte1, byte2)))
    }

    /// Extended ID from bytes already known to be 7-bit.
    pub const fn extended(byte1: UInt7, byte2: UInt7) -> Self {
        Self(Repr::ThreeByte(byte1.value(), byte2.value()))
    }

    #[inline]
    pub fn is_one_byte(&self) -> bool {
        matches!(self.0, Repr::OneByte(_))
    }

    /// ID as it appears after `0xF0` in a MIDI 1.0 stream.
    pub fn midi1_bytes(&self) -> SmallVec<[u8; 3]> {
        match self.0 {
            Repr::OneByte(id) => smallvec![id],
            Repr::ThreeByte(b1, b2) => smallvec![0x00, b1, b2],
        }
    }

    /// 16-bit ID used by SysEx8 packets.
    pub fn sysex8_bytes(&self) -> [u8; 2] {
        match self.0 {
            Repr::OneByte(id) => [0x00, id],
            Repr::ThreeByte(b1, b2) => [0x80 | b1, b2],
        }
    }
}

impl Serialize for ManufacturerId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.midi1_bytes().as_slice().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for ManufacturerId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let bytes = Vec::<u8>::deserialize(deserializer)?;
        match SysExId::from_midi1_bytes(&bytes) {
            Ok((SysExId::Manufacturer(id), consumed)) if consumed == bytes.len() => Ok(id),
            _ => Err(serde::de::Error::custom("invalid manufacturer id")),
        }
    }
}

/// Classification of a SysEx message by its leading ID bytes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SysExId {
    Manufacturer(ManufacturerId),
    Universal(UniversalSysExType),
}

impl SysExId {
    /// Reads the ID at the start of a SysEx7 body, returning it and the
    /// number of bytes it occupied.
    pub fn from_midi1_bytes(body: &[u8]) -> Result<(Self, usize), ParseError> {
        match body {
            [] => Err(ParseError::RawBytesEmpty),
            [0x00, b1, b2, ..] => Ok((Self::Manufacturer(ManufacturerId::three_byte(*b1, *b2)?), 3)),
            [0x00, ..] => Err(ParseError::Malformed),
            [first, ..] => match UniversalSysExType::from_id_byte(*first) {
                Some(universal) => Ok((Self::Universal(universal), 1)),
                None => Ok((Self::Manufacturer(ManufacturerId::one_byte(*first)?), 1)),
            },
        }
    }

    /// Matches the two ID bytes of a SysEx8 message.
    pub fn from_sysex8_bytes(bytes: [u8; 2]) -> Option<Self> {
        match bytes {
            [0x00, second] => match UniversalSysExType::from_id_byte(second) {
                Some(universal) => Some(Self::Universal(universal)),
                None => ManufacturerId::one_byte(second).ok().map(Self::Manufacturer),
            },
            [first, second] if first & 0x80 != 0 => {
                ManufacturerId::three_byte(first & 0x7F, second)
                    .ok()
                    .map(Self::Manufacturer)
            }
            _ => None,
        }
    }

    pub fn midi1_bytes(&self) -> SmallVec<[u8; 3]> {
        match self {
            Self::Manufacturer(id) => id.midi1_bytes(),
            Self::Universal(universal) => smallvec![universal.id_byte()],
        }
    }

    pub fn sysex8_bytes(&self) -> [u8; 2] {
        match self {
            Self::Manufacturer(id) => id.sysex8_bytes(),
            Self::Universal(universal) => [0x00, universal.id_byte()],
        }
    }
}

/// Manufacturer-specific System Exclusive (7-bit data).
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SysEx7 {
    pub manufacturer: ManufacturerId,
    pub data: Vec<UInt7>,
    pub group: UInt4,
}

impl SysEx7 {
    /// Validates that every data byte is 7-bit.
    pub fn new(manufacturer: ManufacturerId, data: &[u8]) -> Result<Self, ParseError> {
        Ok(Self {
            manufacturer,
            data: to_seven_bit(data)?,
            group: UInt4::MIN,
        })
    }

    /// ID bytes followed by data, without `F0`/`F7` framing.
    pub fn body(&self) -> Vec<u8> {
        let mut body = Vec::with_capacity(3 + self.data.len());
        body.extend_from_slice(&self.manufacturer.midi1_bytes());
        body.extend(self.data.iter().map(|b| b.value()));
        body
    }
}

/// Universal System Exclusive (7-bit data).
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UniversalSysEx7 {
    pub universal_type: UniversalSysExType,
    pub device_id: UInt7,
    pub sub_id1: UInt7,
    pub sub_id2: UInt7,
    pub data: Vec<UInt7>,
    pub group: UInt4,
}

impl UniversalSysEx7 {
    pub fn body(&self) -> Vec<u8> {
        let mut body = Vec::with_capacity(4 + self.data.len());
        body.extend_from_slice(&[
            self.universal_type.id_byte(),
            self.device_id.value(),
            self.sub_id1.value(),
            self.sub_id2.value(),
        ]);
        body.extend(self.data.iter().map(|b| b.value()));
        body
    }
}

/// Manufacturer-specific System Exclusive 8 (UMP only, 8-bit data).
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SysEx8 {
    pub manufacturer: ManufacturerId,
    pub data: Vec<u8>,
    /// Correlates the packets of one stream; opaque to the codec.
    pub stream_id: u8,
    pub group: UInt4,
}

impl SysEx8 {
    /// ID bytes followed by data; the stream ID is carried separately.
    pub fn payload(&self) -> Vec<u8> {
        let mut payload = Vec::with_capacity(2 + self.data.len());
        payload.extend_from_slice(&self.manufacturer.sysex8_bytes());
        payload.extend_from_slice(&self.data);
        payload
    }
}

/// Universal System Exclusive 8 (UMP only, 8-bit data).
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UniversalSysEx8 {
    pub universal_type: UniversalSysExType,
    pub device_id: UInt7,
    pub sub_id1: UInt7,
    pub sub_id2: UInt7,
    pub data: Vec<u8>,
    pub stream_id: u8,
    pub group: UInt4,
}

impl UniversalSysEx8 {
    pub fn payload(&self) -> Vec<u8> {
        let mut payload = Vec::with_capacity(5 + self.data.len());
        payload.extend_from_slice(&[
            0x00,
            self.universal_type.id_byte(),
            self.device_id.value(),
            self.sub_id1.value(),
            self.sub_id2.value(),
        ]);
        payload.extend_from_slice(&self.data);
        payload
    }
}

/// Where a lone SysEx7 packet sits within a multi-packet stream.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PacketPosition {
    Start,
    Continue,
    End,
}

/// One segment of a multi-packet UMP SysEx7 stream, delivered on its own.
///
/// Receivers that get UMP packets one at a time see long SysEx messages as a
/// run of these; reassembly is up to the consumer.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct SysEx7Packet {
    position: PacketPosition,
    data: Vec<UInt7>,
    group: UInt4,
}

impl SysEx7Packet {
    pub const MAX_DATA_LEN: usize = 6;

    pub fn new(
        position: PacketPosition,
        data: Vec<UInt7>,
        group: UInt4,
    ) -> Result<Self, ParseError> {
        if data.len() > Self::MAX_DATA_LEN {
            return Err(ParseError::Malformed);
        }
        Ok(Self {
            position,
            data,
            group,
        })
    }

    #[inline]
    pub fn position(&self) -> PacketPosition {
        self.position
    }

    #[inline]
    pub fn data(&self) -> &[UInt7] {
        &self.data
    }

    #[inline]
    pub fn group(&self) -> UInt4 {
        self.group
    }

    pub(crate) fn set_group(&mut self, group: UInt4) {
        self.group = group;
    }
}

impl<'de> Deserialize<'de> for SysEx7Packet {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct Raw {
            position: PacketPosition,
            data: Vec<UInt7>,
            group: UInt4,
        }

        let raw = Raw::deserialize(deserializer)?;
        Self::new(raw.position, raw.data, raw.group).map_err(serde::de::Error::custom)
    }
}

pub(crate) fn to_seven_bit(bytes: &[u8]) -> Result<Vec<UInt7>, ParseError> {
    bytes
        .iter()
        .map(|&b| UInt7::new(b).map_err(ParseError::from))
        .collect()
}

impl MidiEvent {
    /// Parses a SysEx7 body (everything between `F0` and `F7`).
    ///
    /// Universal messages need device ID, sub-ID 1 and sub-ID 2 after the ID
    /// byte; anything after them is payload. Manufacturer messages may have
    /// an empty payload.
    pub fn sysex7(raw_bytes: &[u8], group: UInt4) -> Result<Self, ParseError> {
        let (id, consumed) = SysExId::from_midi1_bytes(raw_bytes)?;
        let rest = to_seven_bit(&raw_bytes[consumed..])?;

        match id {
            SysExId::Universal(universal_type) => {
                let [device_id, sub_id1, sub_id2, data @ ..] = rest.as_slice() else {
                    return Err(ParseError::Malformed);
                };
                Ok(MidiEvent::UniversalSysEx7(UniversalSysEx7 {
                    universal_type,
                    device_id: *device_id,
                    sub_id1: *sub_id1,
                    sub_id2: *sub_id2,
                    data: data.to_vec(),
                    group,
                }))
            }
            SysExId::Manufacturer(manufacturer) => Ok(MidiEvent::SysEx7(SysEx7 {
                manufacturer,
                data: rest,
                group,
            })),
        }
    }

    /// Parses a complete SysEx8 message starting at the stream ID byte.
    ///
    /// A single UMP packet carries 1..=14 of these bytes; reassembled
    /// multi-packet messages may be longer.
    pub fn sysex8(raw_bytes: &[u8], group: UInt4) -> Result<Self, ParseError> {
        let (&stream_id, rest) = raw_bytes.split_first().ok_or(ParseError::RawBytesEmpty)?;

        let [id1, id2, rest @ ..] = rest else {
            return Err(ParseError::Malformed);
        };

        match SysExId::from_sysex8_bytes([*id1, *id2]).ok_or(ParseError::Malformed)? {
            SysExId::Universal(universal_type) => {
                let [device_id, sub_id1, sub_id2, data @ ..] = rest else {
                    return Err(ParseError::Malformed);
                };
                Ok(MidiEvent::UniversalSysEx8(UniversalSysEx8 {
                    universal_type,
                    device_id: UInt7::new(*device_id)?,
                    sub_id1: UInt7::new(*sub_id1)?,
                    sub_id2: UInt7::new(*sub_id2)?,
                    data: data.to_vec(),
                    stream_id,
                    group,
                }))
            }
            SysExId::Manufacturer(manufacturer) => Ok(MidiEvent::SysEx8(SysEx8 {
                manufacturer,
                data: rest.to_vec(),
                stream_id,
                group,
            })),
        }
    }
}
