//! HUI switch identities.
//!
//! Every button and LED on a HUI surface is addressed by a zone (0x00..=0x1D)
//! and a port (0..=7) within it. Zones 0x00..=0x07 are the channel strips;
//! the rest are grouped function sections. The mapping is fixed by the
//! protocol, so `zone_and_port` and `from_zone_and_port` are exact inverses.

use core::fmt;
use core::hash::Hash;

use serde::{Deserialize, Serialize};

use crate::channel::HuiChannel;

/// Number of zones addressed by the protocol.
pub const ZONE_COUNT: usize = 0x1E;
/// Ports per zone.
pub const PORT_COUNT: u8 = 8;

/// Abstraction over switch identities stored by
/// [`HuiSwitchStates`](crate::HuiSwitchStates).
pub trait HuiSwitchIdentity: Copy + Eq + Hash + fmt::Debug {
    fn zone_and_port(self) -> (u8, u8);
    fn from_zone_and_port(zone: u8, port: u8) -> Option<Self>;
}

macro_rules! switch_group {
    (
        $(#[$meta:meta])*
        $name:ident {
            $($variant:ident = ($zone:literal, $port:literal)),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        pub enum $name {
            $($variant),*
        }

        impl $name {
            pub const ALL: &'static [Self] = &[$(Self::$variant),*];

            pub const fn zone_and_port(self) -> (u8, u8) {
                match self {
                    $(Self::$variant => ($zone, $port)),*
                }
            }

            pub const fn from_zone_and_port(zone: u8, port: u8) -> Option<Self> {
                match (zone, port) {
                    $(($zone, $port) => Some(Self::$variant),)*
                    _ => None,
                }
            }
        }
    };
}

/// Switches repeated on every channel strip; the port is fixed, the zone is
/// the strip index.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ChannelStripSwitch {
    FaderTouch,
    Select,
    Mute,
    Solo,
    Auto,
    VPotSelect,
    Insert,
    RecordReady,
}

impl ChannelStripSwitch {
    pub const ALL: &'static [Self] = &[
        Self::FaderTouch,
        Self::Select,
        Self::Mute,
        Self::Solo,
        Self::Auto,
        Self::VPotSelect,
        Self::Insert,
        Self::RecordReady,
    ];

    #[inline]
    pub const fn port(self) -> u8 {
        self as u8
    }

    pub fn from_port(port: u8) -> Option<Self> {
        Self::ALL.get(port as usize).copied()
    }
}

switch_group! {
    /// Modifier and global keys.
    HotKey {
        Ctrl = (0x08, 0),
        Shift = (0x08, 1),
        EditMode = (0x08, 2),
        Undo = (0x08, 3),
        Alt = (0x08, 4),
        Option = (0x08, 5),
        EditTool = (0x08, 6),
        Save = (0x08, 7),
    }
}

switch_group! {
    Window {
        Mix = (0x09, 0),
        Edit = (0x09, 1),
        Transport = (0x09, 2),
        MemLoc = (0x09, 3),
        Status = (0x09, 4),
        Alt = (0x09, 5),
    }
}

switch_group! {
    /// Bank and channel scrolling.
    BankMove {
        ChannelLeft = (0x0A, 0),
        BankLeft = (0x0A, 1),
        ChannelRight = (0x0A, 2),
        BankRight = (0x0A, 3),
    }
}

switch_group! {
    /// Assign section, two zones.
    Assign {
        Output = (0x0B, 0),
        Input = (0x0B, 1),
        Pan = (0x0B, 2),
        SendE = (0x0B, 3),
        SendD = (0x0B, 4),
        SendC = (0x0B, 5),
        SendB = (0x0B, 6),
        SendA = (0x0B, 7),
        Assign = (0x0C, 0),
        Default = (0x0C, 1),
        Suspend = (0x0C, 2),
        Shift = (0x0C, 3),
        Mute = (0x0C, 4),
        Bypass = (0x0C, 5),
        RecordReadyAll = (0x0C, 6),
    }
}

switch_group! {
    Cursor {
        Down = (0x0D, 0),
        Left = (0x0D, 1),
        Mode = (0x0D, 2),
        Right = (0x0D, 3),
        Up = (0x0D, 4),
        Scrub = (0x0D, 5),
        Shuttle = (0x0D, 6),
    }
}

switch_group! {
    /// Transport section, including punch and audition keys.
    Transport {
        Talkback = (0x0E, 0),
        Rewind = (0x0E, 1),
        FastForward = (0x0E, 2),
        Stop = (0x0E, 3),
        Play = (0x0E, 4),
        Record = (0x0E, 5),
        ReturnToZero = (0x0F, 0),
        End = (0x0F, 1),
        Online = (0x0F, 2),
        Loop = (0x0F, 3),
        QuickPunch = (0x0F, 4),
        Audition = (0x10, 0),
        Pre = (0x10, 1),
        In = (0x10, 2),
        Out = (0x10, 3),
        Post = (0x10, 4),
    }
}

switch_group! {
    ControlRoom {
        Input3 = (0x11, 0),
        Input2 = (0x11, 1),
        Input1 = (0x11, 2),
        Mute = (0x11, 3),
        Discrete = (0x11, 4),
        Output3 = (0x12, 0),
        Output2 = (0x12, 1),
        Output1 = (0x12, 2),
        Dim = (0x12, 3),
        Mono = (0x12, 4),
    }
}

switch_group! {
    /// Numeric keypad; the port layout follows the physical key matrix.
    NumPad {
        Num0 = (0x13, 0),
        Num1 = (0x13, 1),
        Num4 = (0x13, 2),
        Num2 = (0x13, 3),
        Num5 = (0x13, 4),
        Period = (0x13, 5),
        Num3 = (0x13, 6),
        Num6 = (0x13, 7),
        Enter = (0x14, 0),
        Plus = (0x14, 1),
        Num7 = (0x15, 0),
        Num8 = (0x15, 1),
        Num9 = (0x15, 2),
        Minus = (0x15, 3),
        Clear = (0x15, 4),
        Equals = (0x15, 5),
        Divide = (0x15, 6),
        Multiply = (0x15, 7),
    }
}

switch_group! {
    TimeDisplayMode {
        Timecode = (0x16, 0),
        Feet = (0x16, 1),
        Beats = (0x16, 2),
        RudeSolo = (0x16, 3),
    }
}

switch_group! {
    AutoEnable {
        Plugin = (0x17, 0),
        Pan = (0x17, 1),
        Fader = (0x17, 2),
        SendMute = (0x17, 3),
        Send = (0x17, 4),
        Mute = (0x17, 5),
    }
}

switch_group! {
    AutoMode {
        Trim = (0x18, 0),
        Latch = (0x18, 1),
        Read = (0x18, 2),
        Off = (0x18, 3),
        Write = (0x18, 4),
        Touch = (0x18, 5),
    }
}

switch_group! {
    /// Status and group keys.
    StatusGroup {
        Phase = (0x19, 0),
        Monitor = (0x19, 1),
        Auto = (0x19, 2),
        Suspend = (0x19, 3),
        Create = (0x19, 4),
        Group = (0x19, 5),
    }
}

switch_group! {
    Edit {
        Paste = (0x1A, 0),
        Cut = (0x1A, 1),
        Capture = (0x1A, 2),
        Delete = (0x1A, 3),
        Copy = (0x1A, 4),
        Separate = (0x1A, 5),
    }
}

switch_group! {
    FunctionKey {
        F1 = (0x1B, 0),
        F2 = (0x1B, 1),
        F3 = (0x1B, 2),
        F4 = (0x1B, 3),
        F5 = (0x1B, 4),
        F6 = (0x1B, 5),
        F7 = (0x1B, 6),
        F8Escape = (0x1B, 7),
    }
}

switch_group! {
    /// Parameter edit (plug-in) section.
    ParamEdit {
        Insert = (0x1C, 0),
        Assign = (0x1C, 1),
        Select1 = (0x1C, 2),
        Select2 = (0x1C, 3),
        Select3 = (0x1C, 4),
        Select4 = (0x1C, 5),
        Bypass = (0x1C, 6),
        Compare = (0x1C, 7),
    }
}

switch_group! {
    FootswitchRelay {
        Relay1 = (0x1D, 0),
        Relay2 = (0x1D, 1),
        Footswitch1 = (0x1D, 2),
        Footswitch2 = (0x1D, 3),
    }
}

macro_rules! hui_switch {
    ($($group:ident),* $(,)?) => {
        /// Any addressable HUI switch.
        #[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        pub enum HuiSwitch {
            ChannelStrip(HuiChannel, ChannelStripSwitch),
            $($group($group)),*
        }

        impl HuiSwitch {
            pub fn zone_and_port(self) -> (u8, u8) {
                match self {
                    Self::ChannelStrip(channel, switch) => (channel.index(), switch.port()),
                    $(Self::$group(switch) => switch.zone_and_port()),*
                }
            }

            pub fn from_zone_and_port(zone: u8, port: u8) -> Option<Self> {
                if let Ok(channel) = HuiChannel::new(zone) {
                    return ChannelStripSwitch::from_port(port)
                        .map(|switch| Self::ChannelStrip(channel, switch));
                }
                $(
                    if let Some(switch) = $group::from_zone_and_port(zone, port) {
                        return Some(Self::$group(switch));
                    }
                )*
                None
            }

            /// Every switch, in zone order.
            pub fn all() -> impl Iterator<Item = Self> {
                let strips = HuiChannel::all().flat_map(|channel| {
                    ChannelStripSwitch::ALL
                        .iter()
                        .map(move |&switch| Self::ChannelStrip(channel, switch))
                });
                strips $(.chain($group::ALL.iter().map(|&switch| Self::$group(switch))))*
            }
        }
    };
}

hui_switch!(
    HotKey,
    Window,
    BankMove,
    Assign,
    Cursor,
    Transport,
    ControlRoom,
    NumPad,
    TimeDisplayMode,
    AutoEnable,
    AutoMode,
    StatusGroup,
    Edit,
    FunctionKey,
    ParamEdit,
    FootswitchRelay,
);

impl HuiSwitchIdentity for HuiSwitch {
    #[inline]
    fn zone_and_port(self) -> (u8, u8) {
        HuiSwitch::zone_and_port(self)
    }

    #[inline]
    fn from_zone_and_port(zone: u8, port: u8) -> Option<Self> {
        HuiSwitch::from_zone_and_port(zone, port)
    }
}
