//! HUI wire constants. Everything travels on MIDI channel 1 (index 0).

use patchbay_core::UInt7;
use patchbay_midi::ManufacturerId;

// ==================== Control Change numbers ====================

/// Fader MSB for strip `n` is `FADER_MSB + n`.
pub(crate) const FADER_MSB: u8 = 0x00;
/// Fader LSB for strip `n` is `FADER_LSB + n`.
pub(crate) const FADER_LSB: u8 = 0x20;

pub(crate) const ZONE_SELECT_TO_SURFACE: u8 = 0x0C;
pub(crate) const PORT_TO_SURFACE: u8 = 0x2C;
pub(crate) const ZONE_SELECT_TO_HOST: u8 = 0x0F;
pub(crate) const PORT_TO_HOST: u8 = 0x2F;

/// Port value bit set when the switch is on.
pub(crate) const PORT_ON: u8 = 0x40;

pub(crate) const VPOT_RING: u8 = 0x10;
pub(crate) const VPOT_DELTA: u8 = 0x40;
pub(crate) const JOG_WHEEL: u8 = 0x0D;

/// Sign bit of a relative encoder value; the low six bits are the magnitude.
pub(crate) const DELTA_NEGATIVE: u8 = 0x40;
pub(crate) const DELTA_MAX: i8 = 0x3F;

// ==================== Notes ====================

pub(crate) const PING_NOTE: u8 = 0x00;
pub(crate) const PING_VELOCITY: u8 = 0x00;
pub(crate) const PING_REPLY_VELOCITY: u8 = 0x7F;

// ==================== SysEx ====================

/// Mackie Designs extended manufacturer ID `00 00 66`.
pub(crate) const MANUFACTURER: ManufacturerId =
    ManufacturerId::extended(UInt7::new_masked(0x00), UInt7::new_masked(0x66));

/// Bytes after the manufacturer ID: HUI product ID and device number.
pub(crate) const SYSEX_PREFIX: [u8; 2] = [0x05, 0x00];

pub(crate) const CMD_CHANNEL_TEXT: u8 = 0x10;
pub(crate) const CMD_TIME_DISPLAY: u8 = 0x11;
pub(crate) const CMD_LARGE_DISPLAY: u8 = 0x12;

pub(crate) const CHANNEL_TEXT_WIDTH: usize = 4;
/// Channel text slot of the select-assign display.
pub(crate) const SELECT_ASSIGN_SLOT: u8 = 8;
pub(crate) const TIME_DISPLAY_DIGITS: usize = 8;
pub(crate) const LARGE_DISPLAY_ZONES: u8 = 8;
pub(crate) const LARGE_DISPLAY_WIDTH: usize = 10;

// ==================== Meters ====================

pub(crate) const METER_LEVEL_MAX: u8 = 12;

// ==================== Relative deltas ====================

pub(crate) fn encode_delta(delta: i8) -> Option<u8> {
    if !(-DELTA_MAX..=DELTA_MAX).contains(&delta) {
        return None;
    }
    let magnitude = delta.unsigned_abs();
    Some(if delta < 0 { DELTA_NEGATIVE | magnitude } else { magnitude })
}

pub(crate) fn decode_delta(value: u8) -> i8 {
    let magnitude = (value & 0x3F) as i8;
    if value & DELTA_NEGATIVE != 0 {
        -magnitude
    } else {
        magnitude
    }
}
