//! `HuiLink`: transport buffers in, surface events out, and back.

use std::sync::Arc;

use patchbay_core::{Atomic, UInt4};
use patchbay_hui::{HuiDecoder, HuiRole, HuiSurfaceEvent, HuiSwitchStates};
use patchbay_midi::MidiEvent;
use tracing::{debug, trace};

use crate::builder::HuiLinkBuilder;
use crate::Result;

/// One end of a HUI connection.
///
/// Incoming MIDI 1.0 byte buffers or UMP word buffers (one complete message
/// each) are parsed and fed to a [`HuiDecoder`]. Decoded switch events update
/// a shared [`HuiSwitchStates`] before the handler sees them. Outgoing
/// [`HuiSurfaceEvent`]s are encoded for this link's role and UMP group.
///
/// # Example
///
/// ```
/// use patchbay::{HuiLink, HuiRole};
/// use patchbay::hui::{HuiSurfaceEvent, HuiSwitch, HuiSurfaceState, switch::Transport};
///
/// let mut host = HuiLink::builder().role(HuiRole::Host).build(|_| {});
/// let mut surface = HuiLink::builder().role(HuiRole::Surface).build(|_| {});
///
/// let play = HuiSurfaceEvent::Switch {
///     switch: HuiSwitch::Transport(Transport::Play),
///     state: true,
/// };
/// for bytes in surface.encode_midi1(&play)? {
///     host.receive_midi1(&bytes)?;
/// }
/// assert!(host.switch_states().read(|s| s.state(HuiSwitch::Transport(Transport::Play))));
/// # Ok::<(), patchbay::Error>(())
/// ```
pub struct HuiLink {
    role: HuiRole,
    group: UInt4,
    decoder: HuiDecoder,
    switch_states: Arc<Atomic<HuiSwitchStates>>,
}

impl HuiLink {
    pub fn builder() -> HuiLinkBuilder {
        HuiLinkBuilder::default()
    }

    pub(crate) fn from_parts(
        role: HuiRole,
        group: UInt4,
        max_sysex_len: usize,
        mut handler: impl FnMut(HuiSurfaceEvent) + Send + 'static,
    ) -> Self {
        let switch_states = Arc::new(Atomic::new(HuiSwitchStates::new()));
        let mirror = Arc::clone(&switch_states);

        let decoder = HuiDecoder::builder()
            .role(role)
            .max_sysex_len(max_sysex_len)
            .build(move |event| {
                if mirror.modify(|states| states.apply(&event)) {
                    trace!("HUI switch state changed: {:?}", event);
                }
                handler(event);
            });

        Self {
            role,
            group,
            decoder,
            switch_states,
        }
    }

    #[inline]
    pub fn role(&self) -> HuiRole {
        self.role
    }

    #[inline]
    pub fn group(&self) -> UInt4 {
        self.group
    }

    /// Shared mirror of every switch state this link has decoded.
    pub fn switch_states(&self) -> Arc<Atomic<HuiSwitchStates>> {
        Arc::clone(&self.switch_states)
    }

    /// Parses one MIDI 1.0 message and feeds it to the decoder.
    pub fn receive_midi1(&mut self, bytes: &[u8]) -> Result<()> {
        let event = MidiEvent::parse_midi1(bytes, self.group).map_err(|e| {
            debug!("HUI link dropped MIDI 1.0 buffer {:02X?}: {}", bytes, e);
            e
        })?;
        self.receive(&event);
        Ok(())
    }

    /// Parses one UMP message and feeds it to the decoder.
    ///
    /// Messages on other groups are ignored.
    pub fn receive_ump(&mut self, words: &[u32]) -> Result<()> {
        let event = MidiEvent::parse_ump(words).map_err(|e| {
            debug!("HUI link dropped UMP buffer {:08X?}: {}", words, e);
            e
        })?;
        if event.group() != self.group {
            trace!("ignoring UMP message on group {}", event.group());
            return Ok(());
        }
        self.receive(&event);
        Ok(())
    }

    /// Feeds an already-parsed event.
    pub fn receive(&mut self, event: &MidiEvent) {
        self.decoder.midi_in(event);
    }

    /// MIDI 1.0 messages for `event`, one buffer per message.
    pub fn encode_midi1(&self, event: &HuiSurfaceEvent) -> Result<Vec<Vec<u8>>> {
        self.encode(event)?
            .iter()
            .map(|message| message.midi1_raw_bytes().map_err(Into::into))
            .collect()
    }

    /// UMP messages for `event` on this link's group, one buffer per message.
    pub fn encode_ump(&self, event: &HuiSurfaceEvent) -> Result<Vec<Vec<u32>>> {
        Ok(self
            .encode(event)?
            .iter()
            .map(MidiEvent::ump_raw_words)
            .collect())
    }

    fn encode(&self, event: &HuiSurfaceEvent) -> Result<Vec<MidiEvent>> {
        Ok(event
            .to_midi_events(self.role)?
            .into_iter()
            .map(|message| message.with_group(self.group))
            .collect())
    }

    /// Drops any partially received sequence. Switch states are kept.
    pub fn reset(&mut self) {
        self.decoder.reset();
    }
}

impl std::fmt::Debug for HuiLink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HuiLink")
            .field("role", &self.role)
            .field("group", &self.group)
            .field("decoder", &self.decoder)
            .finish_non_exhaustive()
    }
}
