//! Round-trip properties for the MIDI 1.0 and UMP codecs.
//!
//! Run with:
//! ```bash
//! cargo test -p patchbay-midi --test codec_roundtrip
//! ```

use patchbay_midi::{
    ManufacturerId, MidiEvent, PacketPosition, ParseError, SysEx7, SysEx7Packet, SysEx8,
    UInt14, UInt4, UInt7, UniversalSysEx7, UniversalSysEx8, UniversalSysExType,
};
use proptest::prelude::*;

// ==================== Strategies ====================

fn group() -> impl Strategy<Value = UInt4> {
    prop_oneof![Just(0u8), Just(0xF), 0u8..16].prop_map(UInt4::new_masked)
}

fn channel() -> impl Strategy<Value = UInt4> {
    (0u8..16).prop_map(UInt4::new_masked)
}

fn u7() -> impl Strategy<Value = UInt7> {
    prop_oneof![Just(0u8), Just(0x7F), 0u8..128].prop_map(UInt7::new_masked)
}

fn u14() -> impl Strategy<Value = UInt14> {
    prop_oneof![Just(0u16), Just(0x3FFF), Just(0x2000), 0u16..0x4000]
        .prop_map(UInt14::new_masked)
}

fn manufacturer() -> impl Strategy<Value = ManufacturerId> {
    prop_oneof![
        (0x01u8..=0x7D).prop_map(|id| ManufacturerId::one_byte(id).unwrap()),
        (0u8..128, 0u8..128).prop_map(|(a, b)| ManufacturerId::three_byte(a, b).unwrap()),
    ]
}

fn universal_type() -> impl Strategy<Value = UniversalSysExType> {
    prop_oneof![
        Just(UniversalSysExType::NonRealTime),
        Just(UniversalSysExType::RealTime)
    ]
}

fn channel_voice() -> impl Strategy<Value = MidiEvent> {
    prop_oneof![
        (u7(), u7(), channel(), group()).prop_map(|(note, velocity, channel, group)| {
            MidiEvent::NoteOff { note, velocity, channel, group }
        }),
        (u7(), u7(), channel(), group()).prop_map(|(note, velocity, channel, group)| {
            MidiEvent::NoteOn { note, velocity, channel, group }
        }),
        (u7(), u7(), channel(), group()).prop_map(|(note, amount, channel, group)| {
            MidiEvent::NotePressure { note, amount, channel, group }
        }),
        (u7(), u7(), channel(), group()).prop_map(|(controller, value, channel, group)| {
            MidiEvent::Cc { controller, value, channel, group }
        }),
        (u7(), channel(), group()).prop_map(|(program, channel, group)| {
            MidiEvent::ProgramChange { program, channel, group }
        }),
        (u7(), channel(), group()).prop_map(|(amount, channel, group)| {
            MidiEvent::Pressure { amount, channel, group }
        }),
        (u14(), channel(), group()).prop_map(|(value, channel, group)| {
            MidiEvent::PitchBend { value, channel, group }
        }),
    ]
}

fn system() -> impl Strategy<Value = MidiEvent> {
    prop_oneof![
        (u7(), group()).prop_map(|(data, group)| MidiEvent::TimecodeQuarterFrame { data, group }),
        (u14(), group())
            .prop_map(|(midi_beat, group)| MidiEvent::SongPositionPointer { midi_beat, group }),
        (u7(), group()).prop_map(|(number, group)| MidiEvent::SongSelect { number, group }),
        group().prop_map(|group| MidiEvent::TuneRequest { group }),
        group().prop_map(|group| MidiEvent::TimingClock { group }),
        group().prop_map(|group| MidiEvent::Start { group }),
        group().prop_map(|group| MidiEvent::Continue { group }),
        group().prop_map(|group| MidiEvent::Stop { group }),
        group().prop_map(|group| MidiEvent::ActiveSensing { group }),
        group().prop_map(|group| MidiEvent::SystemReset { group }),
    ]
}

fn sysex7() -> impl Strategy<Value = MidiEvent> {
    prop_oneof![
        (manufacturer(), prop::collection::vec(u7(), 0..40), group()).prop_map(
            |(manufacturer, data, group)| MidiEvent::SysEx7(SysEx7 { manufacturer, data, group })
        ),
        (
            universal_type(),
            u7(),
            u7(),
            u7(),
            prop::collection::vec(u7(), 0..40),
            group()
        )
            .prop_map(|(universal_type, device_id, sub_id1, sub_id2, data, group)| {
                MidiEvent::UniversalSysEx7(UniversalSysEx7 {
                    universal_type,
                    device_id,
                    sub_id1,
                    sub_id2,
                    data,
                    group,
                })
            }),
    ]
}

fn ump_only() -> impl Strategy<Value = MidiEvent> {
    prop_oneof![
        (
            manufacturer(),
            prop::collection::vec(any::<u8>(), 0..60),
            any::<u8>(),
            group()
        )
            .prop_map(|(manufacturer, data, stream_id, group)| {
                MidiEvent::SysEx8(SysEx8 { manufacturer, data, stream_id, group })
            }),
        (
            universal_type(),
            u7(),
            u7(),
            u7(),
            prop::collection::vec(any::<u8>(), 0..60),
            any::<u8>(),
            group()
        )
            .prop_map(
                |(universal_type, device_id, sub_id1, sub_id2, data, stream_id, group)| {
                    MidiEvent::UniversalSysEx8(UniversalSysEx8 {
                        universal_type,
                        device_id,
                        sub_id1,
                        sub_id2,
                        data,
                        stream_id,
                        group,
                    })
                }
            ),
        (
            prop_oneof![
                Just(PacketPosition::Start),
                Just(PacketPosition::Continue),
                Just(PacketPosition::End)
            ],
            prop::collection::vec(u7(), 0..=6),
            group()
        )
            .prop_map(|(position, data, group)| {
                MidiEvent::SysEx7Packet(SysEx7Packet::new(position, data, group).unwrap())
            }),
    ]
}

fn midi1_event() -> impl Strategy<Value = MidiEvent> {
    prop_oneof![channel_voice(), system(), sysex7()]
}

fn any_event() -> impl Strategy<Value = MidiEvent> {
    prop_oneof![channel_voice(), system(), sysex7(), ump_only()]
}

// ==================== Properties ====================

proptest! {
    #[test]
    fn ump_roundtrip(event in any_event()) {
        let words = event.ump_raw_words();
        prop_assert_eq!(MidiEvent::parse_ump(&words), Ok(event));
    }

    #[test]
    fn midi1_roundtrip(event in midi1_event()) {
        let bytes = event.midi1_raw_bytes().unwrap();
        prop_assert_eq!(MidiEvent::parse_midi1(&bytes, event.group()), Ok(event));
    }

    #[test]
    fn ump_only_refuses_midi1(event in ump_only()) {
        prop_assert!(event.is_ump_only());
        prop_assert_eq!(event.midi1_raw_bytes(), Err(ParseError::UnsupportedVariant));
    }

    #[test]
    fn ump_word0_carries_group(event in any_event()) {
        let words = event.ump_raw_words();
        prop_assert_eq!((words[0] >> 24) as u8 & 0x0F, event.group().value());
    }

    #[test]
    fn midi1_parse_never_panics(bytes in prop::collection::vec(any::<u8>(), 0..32)) {
        let _ = MidiEvent::parse_midi1(&bytes, UInt4::MIN);
    }

    #[test]
    fn ump_parse_never_panics(words in prop::collection::vec(any::<u32>(), 0..12)) {
        let _ = MidiEvent::parse_ump(&words);
    }
}

// ==================== Fixed vectors ====================

#[test]
fn test_stop_on_group_a() {
    let stop = MidiEvent::Stop { group: UInt4::new(0xA).unwrap() };
    assert_eq!(stop.midi1_raw_bytes().unwrap(), vec![0xFC]);
    assert_eq!(stop.ump_raw_words()[0].to_be_bytes(), [0x1A, 0xFC, 0x00, 0x00]);
}

#[test]
fn test_sysex8_id_forms() {
    let g = UInt4::MIN;

    let event = MidiEvent::sysex8(&[0x01, 0x00, 0x41, 0xAA], g).unwrap();
    assert_eq!(
        event,
        MidiEvent::SysEx8(SysEx8 {
            manufacturer: ManufacturerId::one_byte(0x41).unwrap(),
            data: vec![0xAA],
            stream_id: 0x01,
            group: g,
        })
    );

    let event = MidiEvent::sysex8(&[0x02, 0x80 | 0x21, 0x09], g).unwrap();
    assert_eq!(
        event,
        MidiEvent::SysEx8(SysEx8 {
            manufacturer: ManufacturerId::three_byte(0x21, 0x09).unwrap(),
            data: vec![],
            stream_id: 0x02,
            group: g,
        })
    );

    let event = MidiEvent::sysex8(&[0x03, 0x00, 0x7F, 0x10, 0x04, 0x01, 0xFF], g).unwrap();
    assert_eq!(
        event,
        MidiEvent::UniversalSysEx8(UniversalSysEx8 {
            universal_type: UniversalSysExType::RealTime,
            device_id: UInt7::new(0x10).unwrap(),
            sub_id1: UInt7::new(0x04).unwrap(),
            sub_id2: UInt7::new(0x01).unwrap(),
            data: vec![0xFF],
            stream_id: 0x03,
            group: g,
        })
    );
}

#[test]
fn test_sysex8_invalid_buffers() {
    let g = UInt4::MIN;
    assert_eq!(MidiEvent::sysex8(&[], g), Err(ParseError::RawBytesEmpty));
    // stream ID only
    assert_eq!(MidiEvent::sysex8(&[0x01], g), Err(ParseError::Malformed));
    // one ID byte
    assert_eq!(MidiEvent::sysex8(&[0x01, 0x00], g), Err(ParseError::Malformed));
    // 0x00 0x00 is not a manufacturer
    assert_eq!(MidiEvent::sysex8(&[0x01, 0x00, 0x00], g), Err(ParseError::Malformed));
    // universal missing sub-ID 2
    assert_eq!(
        MidiEvent::sysex8(&[0x01, 0x00, 0x7E, 0x00, 0x01], g),
        Err(ParseError::Malformed)
    );
}
