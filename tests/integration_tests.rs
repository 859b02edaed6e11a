//! HuiLink integration tests.
//!
//! Run with:
//! ```bash
//! cargo test -p patchbay --test integration_tests
//! ```

#![cfg(feature = "hui")]

use std::sync::Arc;
use std::thread;

use crossbeam_channel::Receiver;
use patchbay::hui::switch::{ChannelStripSwitch, Transport};
use patchbay::hui::{HuiChannel, HuiSurfaceEvent, HuiSurfaceState, HuiSwitch, LargeDisplaySlice};
use patchbay::{Error, HuiError, HuiLink, HuiRole, ParseError, UInt14, UInt4};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_test_writer()
        .try_init();
}

fn link(role: HuiRole, group: u8) -> (HuiLink, Receiver<HuiSurfaceEvent>) {
    let (tx, rx) = crossbeam_channel::unbounded();
    let link = HuiLink::builder()
        .role(role)
        .group(UInt4::new(group).unwrap())
        .build(move |event| {
            let _ = tx.send(event);
        });
    (link, rx)
}

fn solo(n: u8) -> HuiSwitch {
    HuiSwitch::ChannelStrip(HuiChannel::new(n).unwrap(), ChannelStripSwitch::Solo)
}

#[test]
fn test_midi1_surface_to_host() {
    init_tracing();
    let (surface, _) = link(HuiRole::Surface, 0);
    let (mut host, events) = link(HuiRole::Host, 0);

    let touch = HuiSurfaceEvent::FaderLevel {
        channel: HuiChannel::new(4).unwrap(),
        level: UInt14::new(12_000u16).unwrap(),
    };
    for bytes in surface.encode_midi1(&touch).unwrap() {
        host.receive_midi1(&bytes).unwrap();
    }
    assert_eq!(events.try_iter().collect::<Vec<_>>(), vec![touch]);
}

#[test]
fn test_ump_host_to_surface_on_group() {
    init_tracing();
    let (host, _) = link(HuiRole::Host, 0xF);
    let (mut surface, events) = link(HuiRole::Surface, 0xF);

    let display = HuiSurfaceEvent::LargeDisplay {
        slices: vec![LargeDisplaySlice {
            zone: 2,
            text: "Bar 17".into(),
        }],
    };
    let messages = host.encode_ump(&display).unwrap();
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0][0] >> 24, 0x3F);

    surface.receive_ump(&messages[0]).unwrap();
    assert_eq!(
        events.try_iter().collect::<Vec<_>>(),
        vec![HuiSurfaceEvent::LargeDisplay {
            slices: vec![LargeDisplaySlice {
                zone: 2,
                text: "Bar 17    ".into(),
            }],
        }]
    );
}

#[test]
fn test_ump_other_group_ignored() {
    init_tracing();
    let (host, _) = link(HuiRole::Host, 1);
    let (mut surface, events) = link(HuiRole::Surface, 2);

    for words in host.encode_ump(&HuiSurfaceEvent::Ping).unwrap() {
        surface.receive_ump(&words).unwrap();
    }
    assert!(events.try_recv().is_err());
}

#[test]
fn test_switch_states_mirrored_before_handler() {
    init_tracing();
    let (tx, rx) = crossbeam_channel::unbounded();
    let mut host = {
        let slot: Arc<std::sync::OnceLock<Arc<patchbay::Atomic<patchbay::HuiSwitchStates>>>> =
            Arc::new(std::sync::OnceLock::new());
        let seen = Arc::clone(&slot);
        let host = HuiLink::builder().role(HuiRole::Host).build(move |event| {
            // the mirror already holds the new state when the handler runs
            if let (HuiSurfaceEvent::Switch { switch, state }, Some(states)) = (&event, seen.get()) {
                let _ = tx.send(states.read(|s| s.state(*switch)) == *state);
            }
        });
        let _ = slot.set(host.switch_states());
        host
    };
    let (surface, _) = link(HuiRole::Surface, 0);

    for state in [true, false, true] {
        let event = HuiSurfaceEvent::Switch {
            switch: solo(6),
            state,
        };
        for bytes in surface.encode_midi1(&event).unwrap() {
            host.receive_midi1(&bytes).unwrap();
        }
    }

    assert_eq!(rx.try_iter().collect::<Vec<_>>(), vec![true, true, true]);
    assert!(host.switch_states().read(|s| s.state(solo(6))));
}

#[test]
fn test_switch_states_readable_from_other_threads() {
    init_tracing();
    let (surface, _) = link(HuiRole::Surface, 0);
    let (mut host, _) = link(HuiRole::Host, 0);
    let states = host.switch_states();

    let press = HuiSurfaceEvent::Switch {
        switch: HuiSwitch::Transport(Transport::Play),
        state: true,
    };
    for bytes in surface.encode_midi1(&press).unwrap() {
        host.receive_midi1(&bytes).unwrap();
    }

    let reader = thread::spawn(move || {
        states.read(|s| s.active().collect::<Vec<_>>())
    });
    assert_eq!(
        reader.join().unwrap(),
        vec![HuiSwitch::Transport(Transport::Play)]
    );
}

#[test]
fn test_errors_surface_through_umbrella() {
    init_tracing();
    let (mut surface, _) = link(HuiRole::Surface, 0);

    assert_eq!(
        surface.receive_midi1(&[]),
        Err(Error::Parse(ParseError::RawBytesEmpty))
    );
    assert_eq!(
        surface.receive_ump(&[0x4090_3C00, 0]),
        Err(Error::Parse(ParseError::UnsupportedVariant))
    );
    assert_eq!(
        surface.encode_midi1(&HuiSurfaceEvent::Ping),
        Err(Error::Hui(HuiError::WrongDirection {
            event: "ping",
            role: HuiRole::Surface,
        }))
    );
}

#[test]
fn test_reset_keeps_switch_states() {
    init_tracing();
    let (surface, _) = link(HuiRole::Surface, 0);
    let (mut host, events) = link(HuiRole::Host, 0);

    let press = HuiSurfaceEvent::Switch {
        switch: solo(1),
        state: true,
    };
    let messages = surface.encode_midi1(&press).unwrap();
    for bytes in &messages {
        host.receive_midi1(bytes).unwrap();
    }

    // half a sequence, then reset
    host.receive_midi1(&messages[0]).unwrap();
    host.reset();
    host.receive_midi1(&messages[1]).unwrap();

    assert_eq!(events.try_iter().count(), 1);
    assert!(host.switch_states().read(|s| s.state(solo(1))));
}

#[test]
fn test_system_reset_clears_surface_mirror() {
    init_tracing();
    let (host, _) = link(HuiRole::Host, 0);
    let (mut surface, events) = link(HuiRole::Surface, 0);

    let led = HuiSurfaceEvent::Switch {
        switch: solo(3),
        state: true,
    };
    for event in [led, HuiSurfaceEvent::SystemReset] {
        for bytes in host.encode_midi1(&event).unwrap() {
            surface.receive_midi1(&bytes).unwrap();
        }
    }

    assert_eq!(events.try_iter().count(), 2);
    assert_eq!(surface.switch_states().read(|s| s.active().count()), 0);
}
