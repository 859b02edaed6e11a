//! Channel strip and V-Pot addressing.

use core::fmt;

use patchbay_core::RangeError;
use serde::{Deserialize, Serialize};

/// One of the eight HUI channel strips (0..=7).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct HuiChannel(u8);

impl HuiChannel {
    pub const COUNT: u8 = 8;

    pub fn new(index: u8) -> Result<Self, RangeError> {
        if index < Self::COUNT {
            Ok(Self(index))
        } else {
            Err(RangeError::Overflow)
        }
    }

    #[inline]
    pub const fn index(self) -> u8 {
        self.0
    }

    /// All strips, left to right.
    pub fn all() -> impl Iterator<Item = Self> {
        (0..Self::COUNT).map(Self)
    }
}

impl TryFrom<u8> for HuiChannel {
    type Error = RangeError;

    fn try_from(index: u8) -> Result<Self, Self::Error> {
        Self::new(index)
    }
}

impl From<HuiChannel> for u8 {
    fn from(channel: HuiChannel) -> Self {
        channel.0
    }
}

impl fmt::Display for HuiChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "strip {}", self.0 + 1)
    }
}

/// A rotary encoder: 0..=7 sit on the channel strips, 8..=11 are the four
/// parameter-edit knobs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct HuiVPot(u8);

impl HuiVPot {
    pub const COUNT: u8 = 12;

    pub fn new(number: u8) -> Result<Self, RangeError> {
        if number < Self::COUNT {
            Ok(Self(number))
        } else {
            Err(RangeError::Overflow)
        }
    }

    #[inline]
    pub const fn strip(channel: HuiChannel) -> Self {
        Self(channel.index())
    }

    /// Parameter-edit knob 0..=3.
    pub fn param_edit(knob: u8) -> Result<Self, RangeError> {
        if knob < 4 {
            Ok(Self(HuiChannel::COUNT + knob))
        } else {
            Err(RangeError::Overflow)
        }
    }

    #[inline]
    pub const fn number(self) -> u8 {
        self.0
    }

    /// The strip this V-Pot sits on, if any.
    pub fn channel(self) -> Option<HuiChannel> {
        HuiChannel::new(self.0).ok()
    }
}

impl TryFrom<u8> for HuiVPot {
    type Error = RangeError;

    fn try_from(number: u8) -> Result<Self, Self::Error> {
        Self::new(number)
    }
}

impl From<HuiVPot> for u8 {
    fn from(vpot: HuiVPot) -> Self {
        vpot.0
    }
}
