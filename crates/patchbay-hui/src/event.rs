//! HUI surface events and their MIDI encoding.

use core::fmt;

use patchbay_core::{RangeError, UInt14, UInt4, UInt7};
use patchbay_midi::{MidiEvent, SysEx7};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::channel::{HuiChannel, HuiVPot};
use crate::error::{HuiError, Result};
use crate::switch::HuiSwitch;
use crate::text;
use crate::wire;

/// Which end of the HUI link a component plays.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HuiRole {
    /// The control surface hardware (or an emulation of it).
    Surface,
    /// The DAW driving the surface.
    Host,
}

impl HuiRole {
    #[inline]
    pub fn peer(self) -> Self {
        match self {
            Self::Surface => Self::Host,
            Self::Host => Self::Surface,
        }
    }
}

impl fmt::Display for HuiRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Surface => f.write_str("surface"),
            Self::Host => f.write_str("host"),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MeterSide {
    Left,
    Right,
}

/// LED pattern drawn around a V-Pot.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VPotMode {
    /// Single LED at the position.
    #[default]
    Dot,
    /// Bar from the centre out to the position.
    BoostCut,
    /// Bar from the left edge to the position.
    Wrap,
    /// Symmetric spread of width `position`.
    Spread,
}

/// State of one V-Pot LED ring.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VPotDisplay {
    pub mode: VPotMode,
    /// 0 = all ring LEDs off, 1..=11 = LED position.
    pub position: u8,
    /// The single LED below the ring.
    pub lower_led: bool,
}

impl VPotDisplay {
    pub const MAX_POSITION: u8 = 11;

    pub fn raw(&self) -> std::result::Result<UInt7, RangeError> {
        if self.position > Self::MAX_POSITION {
            return Err(RangeError::Overflow);
        }
        let mode = match self.mode {
            VPotMode::Dot => 0x00,
            VPotMode::BoostCut => 0x10,
            VPotMode::Wrap => 0x20,
            VPotMode::Spread => 0x30,
        };
        let lower = if self.lower_led { 0x40 } else { 0x00 };
        UInt7::new(mode | lower | self.position)
    }

    pub fn from_raw(raw: UInt7) -> Option<Self> {
        let raw = raw.value();
        let position = raw & 0x0F;
        if position > Self::MAX_POSITION {
            return None;
        }
        let mode = match (raw >> 4) & 0x03 {
            0 => VPotMode::Dot,
            1 => VPotMode::BoostCut,
            2 => VPotMode::Wrap,
            _ => VPotMode::Spread,
        };
        Some(Self {
            mode,
            position,
            lower_led: raw & 0x40 != 0,
        })
    }
}

/// One 10-character zone of the large (2x40) display.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LargeDisplaySlice {
    /// Zone 0..=7; zones 0..=3 are the top line, 4..=7 the bottom.
    pub zone: u8,
    pub text: String,
}

/// A decoded HUI surface event.
///
/// Direction matters: events a role cannot send are rejected by
/// [`to_midi_events`](Self::to_midi_events) with
/// [`HuiError::WrongDirection`].
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HuiSurfaceEvent {
    /// Host keep-alive.
    Ping,
    /// Surface answer to [`Ping`](Self::Ping).
    PingReply,
    /// Button press/release towards the host, LED on/off towards the surface.
    Switch { switch: HuiSwitch, state: bool },
    /// Motorised fader position, either direction.
    FaderLevel { channel: HuiChannel, level: UInt14 },
    VPotLedRing { vpot: HuiVPot, display: VPotDisplay },
    /// Relative V-Pot rotation, -63..=63.
    VPotDelta { vpot: HuiVPot, delta: i8 },
    /// Relative jog wheel rotation, -63..=63.
    JogWheel { delta: i8 },
    /// Level 0..=12; 12 is clip.
    LevelMeter {
        channel: HuiChannel,
        side: MeterSide,
        level: u8,
    },
    /// Four-character strip name display. Channel 8 is the select-assign
    /// display.
    ChannelText { channel: u8, text: String },
    /// Up to eight timecode/bars digits, left to right.
    TimeDisplay { digits: String },
    LargeDisplay { slices: Vec<LargeDisplaySlice> },
    /// Host request to return the surface to its power-on state: LEDs off,
    /// displays blank.
    SystemReset,
}

impl HuiSurfaceEvent {
    /// The role that sends this event, or `None` if both do.
    pub fn sender(&self) -> Option<HuiRole> {
        match self {
            Self::Switch { .. } | Self::FaderLevel { .. } => None,
            Self::PingReply | Self::VPotDelta { .. } | Self::JogWheel { .. } => {
                Some(HuiRole::Surface)
            }
            Self::Ping
            | Self::VPotLedRing { .. }
            | Self::LevelMeter { .. }
            | Self::ChannelText { .. }
            | Self::TimeDisplay { .. }
            | Self::LargeDisplay { .. }
            | Self::SystemReset => Some(HuiRole::Host),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Ping => "ping",
            Self::PingReply => "ping reply",
            Self::Switch { .. } => "switch",
            Self::FaderLevel { .. } => "fader level",
            Self::VPotLedRing { .. } => "V-Pot LED ring",
            Self::VPotDelta { .. } => "V-Pot delta",
            Self::JogWheel { .. } => "jog wheel",
            Self::LevelMeter { .. } => "level meter",
            Self::ChannelText { .. } => "channel text",
            Self::TimeDisplay { .. } => "time display",
            Self::LargeDisplay { .. } => "large display",
            Self::SystemReset => "system reset",
        }
    }

    /// MIDI messages that carry this event from `sender_role` to its peer,
    /// in transmission order, on group 0.
    pub fn to_midi_events(&self, sender_role: HuiRole) -> Result<Vec<MidiEvent>> {
        if let Some(sender) = self.sender() {
            if sender != sender_role {
                return Err(HuiError::WrongDirection {
                    event: self.name(),
                    role: sender_role,
                });
            }
        }

        let events: SmallVec<[MidiEvent; 2]> = match self {
            Self::Ping => smallvec::smallvec![note_on(wire::PING_NOTE, wire::PING_VELOCITY)],
            Self::PingReply => {
                smallvec::smallvec![note_on(wire::PING_NOTE, wire::PING_REPLY_VELOCITY)]
            }
            Self::Switch { switch, state } => {
                let (zone, port) = switch.zone_and_port();
                let (zone_cc, port_cc) = match sender_role {
                    HuiRole::Host => (wire::ZONE_SELECT_TO_SURFACE, wire::PORT_TO_SURFACE),
                    HuiRole::Surface => (wire::ZONE_SELECT_TO_HOST, wire::PORT_TO_HOST),
                };
                let port_value = if *state { wire::PORT_ON | port } else { port };
                smallvec::smallvec![cc(zone_cc, zone), cc(port_cc, port_value)]
            }
            Self::FaderLevel { channel, level } => smallvec::smallvec![
                cc(wire::FADER_MSB + channel.index(), level.msb().value()),
                cc(wire::FADER_LSB + channel.index(), level.lsb().value()),
            ],
            Self::VPotLedRing { vpot, display } => {
                smallvec::smallvec![cc(wire::VPOT_RING + vpot.number(), display.raw()?.value())]
            }
            Self::VPotDelta { vpot, delta } => {
                let value = wire::encode_delta(*delta).ok_or(RangeError::Overflow)?;
                smallvec::smallvec![cc(wire::VPOT_DELTA + vpot.number(), value)]
            }
            Self::JogWheel { delta } => {
                let value = wire::encode_delta(*delta).ok_or(RangeError::Overflow)?;
                smallvec::smallvec![cc(wire::JOG_WHEEL, value)]
            }
            Self::LevelMeter {
                channel,
                side,
                level,
            } => {
                if *level > wire::METER_LEVEL_MAX {
                    return Err(RangeError::Overflow.into());
                }
                let side = match side {
                    MeterSide::Left => 0x00,
                    MeterSide::Right => 0x10,
                };
                smallvec::smallvec![MidiEvent::note_pressure(
                    UInt7::new_masked(channel.index()),
                    UInt7::new(side | *level)?,
                    UInt4::MIN,
                )]
            }
            Self::ChannelText { channel, text } => {
                if *channel > wire::SELECT_ASSIGN_SLOT {
                    return Err(RangeError::Overflow.into());
                }
                let mut body = vec![wire::CMD_CHANNEL_TEXT, *channel];
                body.extend(text::encode_text(text, wire::CHANNEL_TEXT_WIDTH));
                smallvec::smallvec![display_sysex(&body)?]
            }
            Self::TimeDisplay { digits } => {
                let mut codes = text::encode_time_digits(digits)?;
                if codes.len() > wire::TIME_DISPLAY_DIGITS {
                    return Err(RangeError::Overflow.into());
                }
                // sent rightmost digit first
                codes.reverse();
                let mut body = vec![wire::CMD_TIME_DISPLAY];
                body.extend(codes);
                smallvec::smallvec![display_sysex(&body)?]
            }
            Self::LargeDisplay { slices } => {
                if slices.is_empty() {
                    return Err(RangeError::Underflow.into());
                }
                let mut body = vec![wire::CMD_LARGE_DISPLAY];
                for slice in slices {
                    if slice.zone >= wire::LARGE_DISPLAY_ZONES {
                        return Err(RangeError::Overflow.into());
                    }
                    body.push(slice.zone);
                    body.extend(text::encode_text(&slice.text, wire::LARGE_DISPLAY_WIDTH));
                }
                smallvec::smallvec![display_sysex(&body)?]
            }
            Self::SystemReset => smallvec::smallvec![MidiEvent::SystemReset { group: UInt4::MIN }],
        };

        Ok(events.into_vec())
    }
}

fn note_on(note: u8, velocity: u8) -> MidiEvent {
    MidiEvent::note_on(
        UInt7::new_masked(note),
        UInt7::new_masked(velocity),
        UInt4::MIN,
    )
}

fn cc(controller: u8, value: u8) -> MidiEvent {
    MidiEvent::cc(
        UInt7::new_masked(controller),
        UInt7::new_masked(value),
        UInt4::MIN,
    )
}

fn display_sysex(body: &[u8]) -> Result<MidiEvent> {
    let mut data = Vec::with_capacity(wire::SYSEX_PREFIX.len() + body.len());
    data.extend_from_slice(&wire::SYSEX_PREFIX);
    data.extend_from_slice(body);
    let sysex = SysEx7::new(wire::MANUFACTURER, &data)?;
    Ok(MidiEvent::SysEx7(sysex))
}
