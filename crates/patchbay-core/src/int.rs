//! Bounded unsigned integers for MIDI fields.
//!
//! Each type stores its value in the smallest native integer that fits and
//! rejects out-of-range construction instead of wrapping.

use core::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::RangeError;

macro_rules! bounded_uint {
    (
        $(#[$meta:meta])*
        $name:ident, $storage:ty, $bits:expr, into [$($wide:ty),*]
    ) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub struct $name($storage);

        impl $name {
            pub const BIT_WIDTH: u32 = $bits;
            pub const MIN: Self = Self(0);
            pub const MAX: Self = Self(((1u32 << $bits) - 1) as $storage);

            /// Bound-checked construction from any primitive integer up to 64 bits.
            pub fn new<T: Into<i128>>(value: T) -> Result<Self, RangeError> {
                let value: i128 = value.into();
                if value < 0 {
                    return Err(RangeError::Underflow);
                }
                if value > Self::MAX.0 as i128 {
                    return Err(RangeError::Overflow);
                }
                Ok(Self(value as $storage))
            }

            /// Keeps the low bits of `value`, discarding the rest.
            #[inline]
            pub const fn new_masked(value: $storage) -> Self {
                Self(value & Self::MAX.0)
            }

            /// Bound-checked construction from a float; fractions truncate toward zero.
            pub fn from_f64(value: f64) -> Result<Self, RangeError> {
                if value.is_nan() || value < 0.0 {
                    return Err(RangeError::Underflow);
                }
                if value > Self::MAX.0 as f64 {
                    return Err(RangeError::Overflow);
                }
                Ok(Self(value as $storage))
            }

            #[inline]
            pub const fn value(self) -> $storage {
                self.0
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                fmt::Display::fmt(&self.0, f)
            }
        }

        impl PartialEq<$storage> for $name {
            fn eq(&self, other: &$storage) -> bool {
                self.0 == *other
            }
        }

        $(
            impl From<$name> for $wide {
                #[inline]
                fn from(value: $name) -> Self {
                    value.0 as $wide
                }
            }
        )*

        bounded_uint!(@try_from $name, u8, u16, u32, u64, i8, i16, i32, i64);

        impl TryFrom<usize> for $name {
            type Error = RangeError;

            fn try_from(value: usize) -> Result<Self, Self::Error> {
                let value = i128::try_from(value).map_err(|_| RangeError::Overflow)?;
                Self::new(value)
            }
        }

        impl Serialize for $name {
            fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
            where
                S: Serializer,
            {
                self.0.serialize(serializer)
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: Deserializer<'de>,
            {
                let raw = <$storage>::deserialize(deserializer)?;
                Self::new(raw).map_err(serde::de::Error::custom)
            }
        }
    };

    (@try_from $name:ident, $($src:ty),*) => {
        $(
            impl TryFrom<$src> for $name {
                type Error = RangeError;

                #[inline]
                fn try_from(value: $src) -> Result<Self, Self::Error> {
                    Self::new(value)
                }
            }
        )*
    };
}

bounded_uint!(
    /// 4-bit unsigned integer (0x0..=0xF): UMP groups, MIDI channels.
    UInt4, u8, 4, into [u8, u16, u32, u64, usize]
);

bounded_uint!(
    /// 7-bit unsigned integer (0..=127): MIDI 1.0 data bytes.
    UInt7, u8, 7, into [u8, u16, u32, u64, usize]
);

bounded_uint!(
    /// 14-bit unsigned integer (0..=16383): pitch bend, song position, HUI faders.
    UInt14, u16, 14, into [u16, u32, u64, usize]
);

impl UInt14 {
    /// Center value for bipolar 14-bit controls.
    pub const MIDPOINT: Self = Self(8192);

    #[inline]
    pub const fn from_msb_lsb(msb: UInt7, lsb: UInt7) -> Self {
        Self(((msb.value() as u16) << 7) | lsb.value() as u16)
    }

    #[inline]
    pub const fn msb(self) -> UInt7 {
        UInt7::new_masked((self.0 >> 7) as u8)
    }

    #[inline]
    pub const fn lsb(self) -> UInt7 {
        UInt7::new_masked(self.0 as u8)
    }
}
