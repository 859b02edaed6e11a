//! Stateful HUI decoder.
//!
//! Switch addresses and fader positions arrive as pairs of Control Change
//! messages, and display updates sent over UMP may arrive as a run of SysEx7
//! packets. The decoder holds at most one such partial sequence. Anything
//! that does not continue it discards the partial data and is then decoded
//! as if the decoder had been idle.

use core::fmt;

use crossbeam_channel::Receiver;
use patchbay_core::{UInt14, UInt4, UInt7};
use patchbay_midi::{MidiEvent, PacketPosition, SysEx7, SysEx7Packet};
use tracing::{debug, trace};

use crate::channel::{HuiChannel, HuiVPot};
use crate::event::{HuiRole, HuiSurfaceEvent, LargeDisplaySlice, MeterSide, VPotDisplay};
use crate::switch::HuiSwitch;
use crate::text;
use crate::wire;

/// Default limit on a reassembled SysEx body.
pub const DEFAULT_MAX_SYSEX_LEN: usize = 1024;

type Handler = Box<dyn FnMut(HuiSurfaceEvent) + Send>;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
enum Pending {
    #[default]
    Idle,
    /// Zone select received, waiting for the port.
    Zone(u8),
    /// Fader MSB received, waiting for the LSB of the same strip.
    FaderMsb { channel: HuiChannel, msb: UInt7 },
    /// SysEx7 body collected from Start/Continue packets of one group.
    SysEx { group: UInt4, body: Vec<u8> },
}

/// Outcome of offering an event to a pending sequence.
enum Step {
    /// The event continued the sequence.
    Consumed,
    /// The event does not belong to the sequence.
    Rejected,
}

/// Turns MIDI events into [`HuiSurfaceEvent`]s.
///
/// The role is the role of the component running the decoder: a
/// [`HuiRole::Surface`] decoder understands host-to-surface traffic and vice
/// versa. Events go to the handler synchronously, in order.
pub struct HuiDecoder {
    role: HuiRole,
    max_sysex_len: usize,
    pending: Pending,
    handler: Handler,
}

impl HuiDecoder {
    pub fn new(role: HuiRole, handler: impl FnMut(HuiSurfaceEvent) + Send + 'static) -> Self {
        Self::builder().role(role).build(handler)
    }

    pub fn builder() -> HuiDecoderBuilder {
        HuiDecoderBuilder::default()
    }

    /// Decoder that forwards events into an unbounded channel.
    pub fn channel(role: HuiRole) -> (Self, Receiver<HuiSurfaceEvent>) {
        Self::builder().role(role).build_channel()
    }

    #[inline]
    pub fn role(&self) -> HuiRole {
        self.role
    }

    /// True while a multi-message sequence is partially received.
    #[inline]
    pub fn is_assembling(&self) -> bool {
        self.pending != Pending::Idle
    }

    /// Drops any partial sequence. The role is kept.
    pub fn reset(&mut self) {
        if self.is_assembling() {
            trace!("HUI decoder reset, discarding {:?}", self.pending);
        }
        self.pending = Pending::Idle;
    }

    /// Feeds one MIDI event.
    pub fn midi_in(&mut self, event: &MidiEvent) {
        let pending = std::mem::take(&mut self.pending);
        if pending != Pending::Idle {
            match self.continue_sequence(pending, event) {
                Step::Consumed => return,
                Step::Rejected => trace!("HUI sequence interrupted by {:?}", event),
            }
        }
        self.from_idle(event);
    }

    pub fn midi_in_all<'a>(&mut self, events: impl IntoIterator<Item = &'a MidiEvent>) {
        for event in events {
            self.midi_in(event);
        }
    }

    fn emit(&mut self, event: HuiSurfaceEvent) {
        (self.handler)(event);
    }

    fn continue_sequence(&mut self, pending: Pending, event: &MidiEvent) -> Step {
        match (pending, event) {
            (Pending::Zone(zone), MidiEvent::Cc { controller, value, channel, .. })
                if *channel == 0 && *controller == self.port_controller() =>
            {
                self.decode_switch(zone, value.value());
                Step::Consumed
            }
            (
                Pending::FaderMsb { channel: strip, msb },
                MidiEvent::Cc { controller, value, channel, .. },
            ) if *channel == 0 && controller.value() == wire::FADER_LSB + strip.index() => {
                self.emit(HuiSurfaceEvent::FaderLevel {
                    channel: strip,
                    level: UInt14::from_msb_lsb(msb, *value),
                });
                Step::Consumed
            }
            (Pending::SysEx { group, mut body }, MidiEvent::SysEx7Packet(packet))
                if packet.position() != PacketPosition::Start && packet.group() == group =>
            {
                body.extend(packet.data().iter().map(|b| b.value()));
                if body.len() > self.max_sysex_len {
                    debug!(
                        "HUI SysEx assembly exceeded {} bytes, discarding",
                        self.max_sysex_len
                    );
                    return Step::Consumed;
                }
                match packet.position() {
                    PacketPosition::End => self.decode_sysex_body(&body, packet),
                    _ => self.pending = Pending::SysEx { group, body },
                }
                Step::Consumed
            }
            _ => Step::Rejected,
        }
    }

    fn from_idle(&mut self, event: &MidiEvent) {
        match event {
            MidiEvent::Cc { channel, .. }
            | MidiEvent::NoteOn { channel, .. }
            | MidiEvent::NotePressure { channel, .. }
                if *channel != 0 =>
            {
                trace!("ignoring HUI message on MIDI channel {}", channel);
            }
            MidiEvent::Cc {
                controller, value, ..
            } => self.decode_cc(controller.value(), *value),
            MidiEvent::NoteOn {
                note, velocity, ..
            } if note.value() == wire::PING_NOTE => self.decode_ping(velocity.value()),
            MidiEvent::NotePressure { note, amount, .. } if self.role == HuiRole::Surface => {
                self.decode_meter(note.value(), amount.value())
            }
            MidiEvent::SysEx7(sysex) if self.role == HuiRole::Surface => self.decode_sysex(sysex),
            MidiEvent::SysEx7Packet(packet) if self.role == HuiRole::Surface => {
                if packet.position() == PacketPosition::Start {
                    if packet.data().len() <= self.max_sysex_len {
                        self.pending = Pending::SysEx {
                            group: packet.group(),
                            body: packet.data().iter().map(|b| b.value()).collect(),
                        };
                    }
                } else {
                    trace!("HUI SysEx packet {:?} without start", packet.position());
                }
            }
            MidiEvent::SystemReset { .. } if self.role == HuiRole::Surface => {
                self.emit(HuiSurfaceEvent::SystemReset)
            }
            _ => trace!("unrecognised HUI message {:?}", event),
        }
    }

    // ==================== Control Change ====================

    fn zone_controller(&self) -> u8 {
        match self.role {
            HuiRole::Surface => wire::ZONE_SELECT_TO_SURFACE,
            HuiRole::Host => wire::ZONE_SELECT_TO_HOST,
        }
    }

    fn port_controller(&self) -> u8 {
        match self.role {
            HuiRole::Surface => wire::PORT_TO_SURFACE,
            HuiRole::Host => wire::PORT_TO_HOST,
        }
    }

    fn decode_cc(&mut self, controller: u8, value: UInt7) {
        let raw = value.value();

        if controller == self.zone_controller() {
            self.pending = Pending::Zone(raw);
            return;
        }

        if let Some(channel) = strip_offset(controller, wire::FADER_MSB) {
            self.pending = Pending::FaderMsb { channel, msb: value };
            return;
        }

        match self.role {
            HuiRole::Surface => {
                if let Some(vpot) = vpot_offset(controller, wire::VPOT_RING) {
                    match VPotDisplay::from_raw(value) {
                        Some(display) => self.emit(HuiSurfaceEvent::VPotLedRing { vpot, display }),
                        None => trace!("invalid V-Pot ring value {:#04x}", raw),
                    }
                    return;
                }
            }
            HuiRole::Host => {
                if controller == wire::JOG_WHEEL {
                    self.emit(HuiSurfaceEvent::JogWheel {
                        delta: wire::decode_delta(raw),
                    });
                    return;
                }
                if let Some(vpot) = vpot_offset(controller, wire::VPOT_DELTA) {
                    self.emit(HuiSurfaceEvent::VPotDelta {
                        vpot,
                        delta: wire::decode_delta(raw),
                    });
                    return;
                }
            }
        }

        trace!("unrecognised HUI controller {:#04x} = {:#04x}", controller, raw);
    }

    fn decode_switch(&mut self, zone: u8, port_value: u8) {
        let port = port_value & 0x0F;
        let state = port_value & wire::PORT_ON != 0;
        if port_value & !(wire::PORT_ON | 0x0F) != 0 {
            trace!("invalid HUI port value {:#04x}", port_value);
            return;
        }
        match HuiSwitch::from_zone_and_port(zone, port) {
            Some(switch) => self.emit(HuiSurfaceEvent::Switch { switch, state }),
            None => debug!("unknown HUI switch zone {:#04x} port {}", zone, port),
        }
    }

    // ==================== Notes ====================

    fn decode_ping(&mut self, velocity: u8) {
        match (self.role, velocity) {
            (HuiRole::Surface, wire::PING_VELOCITY) => self.emit(HuiSurfaceEvent::Ping),
            (HuiRole::Host, wire::PING_REPLY_VELOCITY) => self.emit(HuiSurfaceEvent::PingReply),
            _ => trace!("unexpected HUI ping velocity {:#04x}", velocity),
        }
    }

    fn decode_meter(&mut self, note: u8, value: u8) {
        let Ok(channel) = HuiChannel::new(note) else {
            trace!("HUI meter for unknown strip {}", note);
            return;
        };
        let side = match value >> 4 {
            0 => MeterSide::Left,
            1 => MeterSide::Right,
            _ => {
                trace!("invalid HUI meter side in {:#04x}", value);
                return;
            }
        };
        let level = value & 0x0F;
        if level > wire::METER_LEVEL_MAX {
            trace!("invalid HUI meter level {}", level);
            return;
        }
        self.emit(HuiSurfaceEvent::LevelMeter {
            channel,
            side,
            level,
        });
    }

    // ==================== SysEx ====================

    fn decode_sysex_body(&mut self, body: &[u8], last: &SysEx7Packet) {
        match MidiEvent::sysex7(body, last.group()) {
            Ok(MidiEvent::SysEx7(sysex)) => self.decode_sysex(&sysex),
            Ok(other) => trace!("non-HUI SysEx {:?}", other),
            Err(e) => debug!("reassembled SysEx is invalid: {}", e),
        }
    }

    fn decode_sysex(&mut self, sysex: &SysEx7) {
        if sysex.manufacturer != wire::MANUFACTURER {
            trace!("SysEx from another manufacturer {:?}", sysex.manufacturer);
            return;
        }
        let data: Vec<u8> = sysex.data.iter().map(|b| b.value()).collect();
        let Some(rest) = data.strip_prefix(&wire::SYSEX_PREFIX) else {
            trace!("SysEx without HUI prefix");
            return;
        };
        let Some((&command, payload)) = rest.split_first() else {
            trace!("empty HUI SysEx");
            return;
        };

        let event = match command {
            wire::CMD_CHANNEL_TEXT => decode_channel_text(payload),
            wire::CMD_TIME_DISPLAY => decode_time_display(payload),
            wire::CMD_LARGE_DISPLAY => decode_large_display(payload),
            _ => None,
        };
        match event {
            Some(event) => self.emit(event),
            None => debug!(
                "undecodable HUI SysEx command {:#04x} ({} bytes)",
                command,
                payload.len()
            ),
        }
    }
}

impl fmt::Debug for HuiDecoder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HuiDecoder")
            .field("role", &self.role)
            .field("max_sysex_len", &self.max_sysex_len)
            .field("pending", &self.pending)
            .finish_non_exhaustive()
    }
}

fn strip_offset(controller: u8, base: u8) -> Option<HuiChannel> {
    controller
        .checked_sub(base)
        .and_then(|index| HuiChannel::new(index).ok())
}

fn vpot_offset(controller: u8, base: u8) -> Option<HuiVPot> {
    controller
        .checked_sub(base)
        .and_then(|number| HuiVPot::new(number).ok())
}

fn decode_channel_text(payload: &[u8]) -> Option<HuiSurfaceEvent> {
    let (&channel, chars) = payload.split_first()?;
    if channel > wire::SELECT_ASSIGN_SLOT || chars.len() != wire::CHANNEL_TEXT_WIDTH {
        return None;
    }
    Some(HuiSurfaceEvent::ChannelText {
        channel,
        text: text::decode_text(chars),
    })
}

fn decode_time_display(payload: &[u8]) -> Option<HuiSurfaceEvent> {
    if payload.is_empty() || payload.len() > wire::TIME_DISPLAY_DIGITS {
        return None;
    }
    let left_to_right: Vec<u8> = payload.iter().rev().copied().collect();
    Some(HuiSurfaceEvent::TimeDisplay {
        digits: text::decode_time_digits(&left_to_right)?,
    })
}

fn decode_large_display(payload: &[u8]) -> Option<HuiSurfaceEvent> {
    const SLICE_LEN: usize = 1 + wire::LARGE_DISPLAY_WIDTH;
    if payload.is_empty() || payload.len() % SLICE_LEN != 0 {
        return None;
    }
    let slices = payload
        .chunks_exact(SLICE_LEN)
        .map(|chunk| {
            let zone = chunk[0];
            (zone < wire::LARGE_DISPLAY_ZONES).then(|| LargeDisplaySlice {
                zone,
                text: text::decode_text(&chunk[1..]),
            })
        })
        .collect::<Option<Vec<_>>>()?;
    Some(HuiSurfaceEvent::LargeDisplay { slices })
}

// ============================================================================
// HuiDecoderBuilder
// ============================================================================

/// Builder for configuring [`HuiDecoder`].
#[derive(Clone, Debug)]
pub struct HuiDecoderBuilder {
    role: HuiRole,
    max_sysex_len: usize,
}

impl Default for HuiDecoderBuilder {
    fn default() -> Self {
        Self {
            role: HuiRole::Surface,
            max_sysex_len: DEFAULT_MAX_SYSEX_LEN,
        }
    }
}

impl HuiDecoderBuilder {
    /// Role of the component that owns the decoder.
    pub fn role(mut self, role: HuiRole) -> Self {
        self.role = role;
        self
    }

    /// Longest SysEx body reassembled from UMP packets; longer assemblies are dropped.
    pub fn max_sysex_len(mut self, len: usize) -> Self {
        self.max_sysex_len = len;
        self
    }

    pub fn build(self, handler: impl FnMut(HuiSurfaceEvent) + Send + 'static) -> HuiDecoder {
        HuiDecoder {
            role: self.role,
            max_sysex_len: self.max_sysex_len,
            pending: Pending::Idle,
            handler: Box::new(handler),
        }
    }

    /// Builds a decoder that sends its events into an unbounded channel.
    pub fn build_channel(self) -> (HuiDecoder, Receiver<HuiSurfaceEvent>) {
        let (tx, rx) = crossbeam_channel::unbounded();
        let decoder = self.build(move |event| {
            if tx.send(event).is_err() {
                trace!("HUI event receiver dropped");
            }
        });
        (decoder, rx)
    }
}
