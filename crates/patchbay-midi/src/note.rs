//! Note numbers and their names.
//!
//! MIDI note 60 is middle C, but vendors disagree on which octave number it
//! gets:
//!
//! | Style      | Middle C | Note 0 |
//! |------------|----------|--------|
//! | `Yamaha`   | C3       | C-2    |
//! | `Roland`   | C4       | C-1    |
//! | `Cakewalk` | C5       | C0     |
//!
//! # Example
//!
//! ```
//! use patchbay_midi::{MidiNote, NoteStyle};
//!
//! let note = MidiNote::from_name("A4", NoteStyle::Roland).unwrap();
//! assert_eq!(note.number(), 69);
//! assert_eq!(note.name(NoteStyle::Yamaha), "A3");
//! ```

use core::fmt;

use patchbay_core::{RangeError, UInt7};
use serde::{Deserialize, Serialize};

use crate::error::NoteNameError;

const PITCH_NAMES: [&str; 12] = [
    "C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B",
];

/// Octave numbering convention.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NoteStyle {
    /// Middle C is C3.
    Yamaha,
    /// Middle C is C4 (scientific pitch notation).
    #[default]
    Roland,
    /// Middle C is C5; the lowest octave is octave 0.
    Cakewalk,
}

impl NoteStyle {
    pub const ALL: [NoteStyle; 3] = [Self::Yamaha, Self::Roland, Self::Cakewalk];

    /// Octave number of MIDI notes 0..=11.
    pub const fn first_octave_offset(self) -> i8 {
        match self {
            Self::Yamaha => -2,
            Self::Roland => -1,
            Self::Cakewalk => 0,
        }
    }
}

impl fmt::Display for NoteStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Yamaha => f.write_str("Yamaha (Middle C == C3)"),
            Self::Roland => f.write_str("Roland (Middle C == C4)"),
            Self::Cakewalk => f.write_str("Cakewalk (Middle C == C5)"),
        }
    }
}

/// MIDI note number 0..=127.
///
/// `Display` uses [`NoteStyle::Roland`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MidiNote(UInt7);

impl MidiNote {
    pub const MIN: MidiNote = MidiNote(UInt7::MIN);
    pub const MAX: MidiNote = MidiNote(UInt7::MAX);
    pub const MIDDLE_C: MidiNote = MidiNote(UInt7::new_masked(60));

    #[inline]
    pub const fn new(number: UInt7) -> Self {
        Self(number)
    }

    #[inline]
    pub const fn number(self) -> UInt7 {
        self.0
    }

    /// 0..=11, where 0 is C.
    #[inline]
    pub const fn pitch_class(self) -> u8 {
        self.0.value() % 12
    }

    pub const fn octave(self, style: NoteStyle) -> i8 {
        (self.0.value() / 12) as i8 + style.first_octave_offset()
    }

    /// Name with sharps, e.g. `"F#2"`.
    pub fn name(self, style: NoteStyle) -> String {
        format!("{}{}", PITCH_NAMES[self.pitch_class() as usize], self.octave(style))
    }

    /// Reads a letter `A`-`G` (either case), an optional `#` or `b`, and an
    /// octave number. `Cb4` and `B#3` cross into the neighbouring octave.
    pub fn from_name(name: &str, style: NoteStyle) -> Result<Self, NoteNameError> {
        let mut chars = name.chars();
        let base: i32 = match chars.next().map(|c| c.to_ascii_uppercase()) {
            Some('C') => 0,
            Some('D') => 2,
            Some('E') => 4,
            Some('F') => 5,
            Some('G') => 7,
            Some('A') => 9,
            Some('B') => 11,
            _ => return Err(NoteNameError::Syntax),
        };
        let rest = chars.as_str();
        let (accidental, octave) = match rest.as_bytes().first() {
            Some(b'#') => (1, &rest[1..]),
            Some(b'b') => (-1, &rest[1..]),
            _ => (0, rest),
        };
        if octave.is_empty() || octave.starts_with('+') {
            return Err(NoteNameError::Syntax);
        }
        let octave: i16 = octave.parse().map_err(|_| NoteNameError::Syntax)?;

        let octave = i32::from(octave) - i32::from(style.first_octave_offset());
        let number = octave * 12 + base + accidental;
        Ok(Self(UInt7::new(number)?))
    }

    /// Semitone offset, or `None` past either end of the MIDI range.
    pub fn transpose(self, semitones: i8) -> Option<Self> {
        let number = i16::from(self.0.value()) + i16::from(semitones);
        UInt7::new(number).ok().map(Self)
    }
}

impl From<UInt7> for MidiNote {
    fn from(number: UInt7) -> Self {
        Self(number)
    }
}

impl From<MidiNote> for UInt7 {
    fn from(note: MidiNote) -> Self {
        note.0
    }
}

impl TryFrom<u8> for MidiNote {
    type Error = RangeError;

    fn try_from(number: u8) -> Result<Self, Self::Error> {
        UInt7::new(number).map(Self)
    }
}

impl fmt::Display for MidiNote {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name(NoteStyle::Roland))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn note(n: u8) -> MidiNote {
        MidiNote::try_from(n).unwrap()
    }

    #[test]
    fn test_middle_c_per_style() {
        assert_eq!(MidiNote::MIDDLE_C.name(NoteStyle::Yamaha), "C3");
        assert_eq!(MidiNote::MIDDLE_C.name(NoteStyle::Roland), "C4");
        assert_eq!(MidiNote::MIDDLE_C.name(NoteStyle::Cakewalk), "C5");
        assert_eq!(MidiNote::MIDDLE_C.to_string(), "C4");
    }

    #[test]
    fn test_range_ends() {
        assert_eq!(MidiNote::MIN.name(NoteStyle::Yamaha), "C-2");
        assert_eq!(MidiNote::MIN.name(NoteStyle::Roland), "C-1");
        assert_eq!(MidiNote::MIN.name(NoteStyle::Cakewalk), "C0");
        assert_eq!(MidiNote::MAX.name(NoteStyle::Roland), "G9");
        assert_eq!(MidiNote::MAX.name(NoteStyle::Cakewalk), "G10");
    }

    #[test]
    fn test_every_name_reads_back() {
        for style in NoteStyle::ALL {
            for n in 0..=127u8 {
                let name = note(n).name(style);
                assert_eq!(MidiNote::from_name(&name, style), Ok(note(n)), "{name} ({style})");
            }
        }
    }

    #[test]
    fn test_flats_and_enharmonics() {
        let roland = NoteStyle::Roland;
        assert_eq!(MidiNote::from_name("Bb3", roland), Ok(note(58)));
        assert_eq!(MidiNote::from_name("a#3", roland), Ok(note(58)));
        assert_eq!(MidiNote::from_name("Cb4", roland), Ok(note(59)));
        assert_eq!(MidiNote::from_name("B#3", roland), Ok(note(60)));
        assert_eq!(MidiNote::from_name("bb3", roland), Ok(note(58)));
    }

    #[test]
    fn test_bad_names() {
        let roland = NoteStyle::Roland;
        assert_eq!(MidiNote::from_name("", roland), Err(NoteNameError::Syntax));
        assert_eq!(MidiNote::from_name("H4", roland), Err(NoteNameError::Syntax));
        assert_eq!(MidiNote::from_name("C", roland), Err(NoteNameError::Syntax));
        assert_eq!(MidiNote::from_name("C#", roland), Err(NoteNameError::Syntax));
        assert_eq!(MidiNote::from_name("C+4", roland), Err(NoteNameError::Syntax));
        assert_eq!(MidiNote::from_name("C4x", roland), Err(NoteNameError::Syntax));
        assert_eq!(
            MidiNote::from_name("C30000", roland),
            Err(NoteNameError::OutOfRange(RangeError::Overflow))
        );
        assert_eq!(
            MidiNote::from_name("G#9", roland),
            Err(NoteNameError::OutOfRange(RangeError::Overflow))
        );
        assert_eq!(
            MidiNote::from_name("Cb-1", roland),
            Err(NoteNameError::OutOfRange(RangeError::Underflow))
        );
    }

    #[test]
    fn test_transpose() {
        assert_eq!(MidiNote::MIDDLE_C.transpose(12), Some(note(72)));
        assert_eq!(MidiNote::MIDDLE_C.transpose(-60), Some(MidiNote::MIN));
        assert_eq!(MidiNote::MIDDLE_C.transpose(-61), None);
        assert_eq!(MidiNote::MAX.transpose(1), None);
    }

    #[test]
    fn test_style_descriptions() {
        assert_eq!(NoteStyle::default(), NoteStyle::Roland);
        assert_eq!(NoteStyle::Yamaha.to_string(), "Yamaha (Middle C == C3)");
        assert_eq!(NoteStyle::Cakewalk.first_octave_offset(), 0);
    }

    #[test]
    fn test_serde_is_the_bare_number() {
        let encoded = bincode::serialize(&note(64)).unwrap();
        assert_eq!(encoded, bincode::serialize(&64u8).unwrap());
        assert_eq!(bincode::deserialize::<MidiNote>(&encoded).unwrap(), note(64));
        assert!(bincode::deserialize::<MidiNote>(&bincode::serialize(&200u8).unwrap()).is_err());
    }
}
