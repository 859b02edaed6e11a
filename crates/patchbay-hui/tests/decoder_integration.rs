//! HUI decoder integration tests: encoder output fed back through the
//! decoder, over both MIDI 1.0 bytes and UMP words.
//!
//! Run with:
//! ```bash
//! cargo test -p patchbay-hui --test decoder_integration
//! ```

use patchbay_hui::switch::{AutoMode, NumPad, Transport};
use patchbay_hui::{
    HuiChannel, HuiDecoder, HuiError, HuiRole, HuiSurfaceEvent, HuiSurfaceState, HuiSwitch,
    HuiSwitchStates, HuiVPot, LargeDisplaySlice, MeterSide, VPotDisplay, VPotMode,
};
use patchbay_midi::{MidiEvent, RangeError, UInt14, UInt4};
use proptest::prelude::*;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::TRACE)
        .with_test_writer()
        .try_init();
}

fn strip(n: u8) -> HuiChannel {
    HuiChannel::new(n).unwrap()
}

/// Sends `event` from `sender` over MIDI 1.0 bytes and decodes it at the peer.
fn over_midi1(event: &HuiSurfaceEvent, sender: HuiRole) -> Vec<HuiSurfaceEvent> {
    let (mut decoder, rx) = HuiDecoder::channel(sender.peer());
    for message in event.to_midi_events(sender).unwrap() {
        let bytes = message.midi1_raw_bytes().unwrap();
        let parsed = MidiEvent::parse_midi1(&bytes, UInt4::MIN).unwrap();
        decoder.midi_in(&parsed);
    }
    assert!(!decoder.is_assembling());
    rx.try_iter().collect()
}

/// Same as [`over_midi1`], but over UMP with every SysEx packet delivered on
/// its own.
fn over_ump_packets(event: &HuiSurfaceEvent, sender: HuiRole) -> Vec<HuiSurfaceEvent> {
    let (mut decoder, rx) = HuiDecoder::channel(sender.peer());
    for message in event.to_midi_events(sender).unwrap() {
        let words = message.ump_raw_words();
        let packet_len = if message.is_system_exclusive() { 2 } else { words.len() };
        for packet in words.chunks(packet_len) {
            decoder.midi_in(&MidiEvent::parse_ump(packet).unwrap());
        }
    }
    assert!(!decoder.is_assembling());
    rx.try_iter().collect()
}

fn host_events() -> Vec<HuiSurfaceEvent> {
    vec![
        HuiSurfaceEvent::Ping,
        HuiSurfaceEvent::Switch {
            switch: HuiSwitch::AutoMode(AutoMode::Latch),
            state: true,
        },
        HuiSurfaceEvent::FaderLevel {
            channel: strip(7),
            level: UInt14::MAX,
        },
        HuiSurfaceEvent::VPotLedRing {
            vpot: HuiVPot::new(9).unwrap(),
            display: VPotDisplay {
                mode: VPotMode::Spread,
                position: 11,
                lower_led: false,
            },
        },
        HuiSurfaceEvent::LevelMeter {
            channel: strip(0),
            side: MeterSide::Left,
            level: 0,
        },
        HuiSurfaceEvent::ChannelText {
            channel: 0,
            text: "Vox1".into(),
        },
        HuiSurfaceEvent::TimeDisplay {
            digits: "01.02.03.04".into(),
        },
        HuiSurfaceEvent::LargeDisplay {
            slices: vec![
                LargeDisplaySlice {
                    zone: 0,
                    text: "Track Name".into(),
                },
                LargeDisplaySlice {
                    zone: 7,
                    text: "  Volume  ".into(),
                },
            ],
        },
        HuiSurfaceEvent::TimeDisplay {
            digits: " 9.AF".into(),
        },
        HuiSurfaceEvent::SystemReset,
    ]
}

fn surface_events() -> Vec<HuiSurfaceEvent> {
    vec![
        HuiSurfaceEvent::PingReply,
        HuiSurfaceEvent::Switch {
            switch: HuiSwitch::NumPad(NumPad::Enter),
            state: false,
        },
        HuiSurfaceEvent::FaderLevel {
            channel: strip(0),
            level: UInt14::MIN,
        },
        HuiSurfaceEvent::VPotDelta {
            vpot: HuiVPot::new(0).unwrap(),
            delta: -63,
        },
        HuiSurfaceEvent::JogWheel { delta: 63 },
    ]
}

#[test]
fn test_host_to_surface_over_midi1() {
    init_tracing();
    for event in host_events() {
        assert_eq!(over_midi1(&event, HuiRole::Host), vec![event]);
    }
}

#[test]
fn test_surface_to_host_over_midi1() {
    init_tracing();
    for event in surface_events() {
        assert_eq!(over_midi1(&event, HuiRole::Surface), vec![event]);
    }
}

#[test]
fn test_host_to_surface_over_segmented_ump() {
    init_tracing();
    for event in host_events() {
        assert_eq!(over_ump_packets(&event, HuiRole::Host), vec![event]);
    }
}

#[test]
fn test_time_display_encodes_only_what_decodes_back() {
    init_tracing();
    let time = |digits: &str| HuiSurfaceEvent::TimeDisplay {
        digits: digits.into(),
    };

    assert_eq!(
        time("").to_midi_events(HuiRole::Host),
        Err(HuiError::OutOfRange(RangeError::Underflow))
    );
    assert_eq!(
        time("1f.00").to_midi_events(HuiRole::Host),
        Err(HuiError::OutOfRange(RangeError::Overflow))
    );
    for digits in [" ", "0", "1F.00", "12345678"] {
        assert_eq!(over_midi1(&time(digits), HuiRole::Host), vec![time(digits)]);
    }
}

#[test]
fn test_full_switch_sequence_emits_once() {
    init_tracing();
    let press = HuiSurfaceEvent::Switch {
        switch: HuiSwitch::Transport(Transport::Record),
        state: true,
    };
    let (mut decoder, rx) = HuiDecoder::channel(HuiRole::Host);
    let messages = press.to_midi_events(HuiRole::Surface).unwrap();
    assert_eq!(messages.len(), 2);

    decoder.midi_in(&messages[0]);
    assert!(decoder.is_assembling());
    assert!(rx.try_recv().is_err());

    decoder.midi_in(&messages[1]);
    assert!(!decoder.is_assembling());
    assert_eq!(rx.try_iter().collect::<Vec<_>>(), vec![press]);
}

#[test]
fn test_reset_behaves_like_fresh_decoder() {
    init_tracing();
    let text = HuiSurfaceEvent::ChannelText {
        channel: 3,
        text: "Keys".into(),
    };
    let words = text.to_midi_events(HuiRole::Host).unwrap()[0].ump_raw_words();

    let (mut used, used_rx) = HuiDecoder::channel(HuiRole::Surface);
    let (mut fresh, fresh_rx) = HuiDecoder::channel(HuiRole::Surface);

    // leave `used` halfway through a display message
    used.midi_in(&MidiEvent::parse_ump(&words[..2]).unwrap());
    assert!(used.is_assembling());
    used.reset();

    for packet in words.chunks(2) {
        let event = MidiEvent::parse_ump(packet).unwrap();
        used.midi_in(&event);
        fresh.midi_in(&event);
    }

    let used_events: Vec<_> = used_rx.try_iter().collect();
    let fresh_events: Vec<_> = fresh_rx.try_iter().collect();
    assert_eq!(used_events, fresh_events);
    assert_eq!(fresh_events, vec![text]);
}

#[test]
fn test_switch_states_follow_decoder() {
    init_tracing();
    let (mut decoder, rx) = HuiDecoder::channel(HuiRole::Host);
    let mut states: HuiSwitchStates = HuiSwitchStates::new();

    for (switch, state) in [
        (HuiSwitch::Transport(Transport::Play), true),
        (HuiSwitch::Transport(Transport::Stop), true),
        (HuiSwitch::Transport(Transport::Stop), false),
    ] {
        let event = HuiSurfaceEvent::Switch { switch, state };
        decoder.midi_in_all(&event.to_midi_events(HuiRole::Surface).unwrap());
    }
    for event in rx.try_iter() {
        states.apply(&event);
    }

    assert!(states.state(HuiSwitch::Transport(Transport::Play)));
    assert!(!states.state(HuiSwitch::Transport(Transport::Stop)));
}

proptest! {
    #[test]
    fn fader_levels_survive_the_wire(channel in 0u8..8, level in 0u16..0x4000) {
        let event = HuiSurfaceEvent::FaderLevel {
            channel: strip(channel),
            level: UInt14::new(level).unwrap(),
        };
        prop_assert_eq!(over_midi1(&event, HuiRole::Surface), vec![event.clone()]);
        prop_assert_eq!(over_midi1(&event, HuiRole::Host), vec![event]);
    }

    #[test]
    fn every_switch_survives_the_wire(index in 0usize..256, state in any::<bool>()) {
        let switches: Vec<HuiSwitch> = HuiSwitch::all().collect();
        let switch = switches[index % switches.len()];
        let event = HuiSurfaceEvent::Switch { switch, state };
        prop_assert_eq!(over_midi1(&event, HuiRole::Host), vec![event.clone()]);
        prop_assert_eq!(over_midi1(&event, HuiRole::Surface), vec![event]);
    }

    #[test]
    fn decoder_never_panics(bytes in prop::collection::vec(prop::collection::vec(any::<u8>(), 1..8), 0..32)) {
        let (mut decoder, _rx) = HuiDecoder::channel(HuiRole::Surface);
        for message in bytes {
            if let Ok(event) = MidiEvent::parse_midi1(&message, UInt4::MIN) {
                decoder.midi_in(&event);
            }
        }
    }
}
