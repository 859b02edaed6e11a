//! Switch state store.

use core::fmt;
use core::marker::PhantomData;

use crate::event::HuiSurfaceEvent;
use crate::switch::{HuiSwitch, HuiSwitchIdentity, PORT_COUNT, ZONE_COUNT};

/// Readable and writable on/off state per switch.
pub trait HuiSurfaceState {
    type Switch: HuiSwitchIdentity;

    fn state(&self, of: Self::Switch) -> bool;
    fn set_state(&mut self, of: Self::Switch, to: bool);
}

/// One bit per (zone, port). Every switch starts off.
pub struct HuiSwitchStates<S: HuiSwitchIdentity = HuiSwitch> {
    zones: [u8; ZONE_COUNT],
    _switch: PhantomData<fn() -> S>,
}

impl<S: HuiSwitchIdentity> HuiSwitchStates<S> {
    pub fn new() -> Self {
        Self {
            zones: [0; ZONE_COUNT],
            _switch: PhantomData,
        }
    }

    /// Feeds a decoded event; returns `true` if a stored state changed.
    ///
    /// [`HuiSurfaceEvent::SystemReset`] turns every switch off.
    pub fn apply(&mut self, event: &HuiSurfaceEvent) -> bool {
        let (switch, state) = match event {
            HuiSurfaceEvent::Switch { switch, state } => (switch, state),
            HuiSurfaceEvent::SystemReset => {
                let changed = self.zones.iter().any(|&bits| bits != 0);
                self.clear();
                return changed;
            }
            _ => return false,
        };
        let (zone, port) = switch.zone_and_port();
        let Some(switch) = S::from_zone_and_port(zone, port) else {
            return false;
        };
        let changed = self.state(switch) != *state;
        self.set_state(switch, *state);
        changed
    }

    /// Switches currently on, in zone order.
    pub fn active(&self) -> impl Iterator<Item = S> + '_ {
        self.zones.iter().enumerate().flat_map(|(zone, &bits)| {
            (0..PORT_COUNT)
                .filter(move |port| bits & (1 << port) != 0)
                .filter_map(move |port| S::from_zone_and_port(zone as u8, port))
        })
    }

    pub fn clear(&mut self) {
        self.zones = [0; ZONE_COUNT];
    }

    fn slot(switch: S) -> Option<(usize, u8)> {
        let (zone, port) = switch.zone_and_port();
        let zone = zone as usize;
        (zone < ZONE_COUNT && port < PORT_COUNT).then_some((zone, 1 << port))
    }
}

impl<S: HuiSwitchIdentity> HuiSurfaceState for HuiSwitchStates<S> {
    type Switch = S;

    fn state(&self, of: S) -> bool {
        Self::slot(of).is_some_and(|(zone, mask)| self.zones[zone] & mask != 0)
    }

    fn set_state(&mut self, of: S, to: bool) {
        if let Some((zone, mask)) = Self::slot(of) {
            if to {
                self.zones[zone] |= mask;
            } else {
                self.zones[zone] &= !mask;
            }
        }
    }
}

impl<S: HuiSwitchIdentity> Default for HuiSwitchStates<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: HuiSwitchIdentity> Clone for HuiSwitchStates<S> {
    fn clone(&self) -> Self {
        Self {
            zones: self.zones,
            _switch: PhantomData,
        }
    }
}

impl<S: HuiSwitchIdentity> PartialEq for HuiSwitchStates<S> {
    fn eq(&self, other: &Self) -> bool {
        self.zones == other.zones
    }
}

impl<S: HuiSwitchIdentity> Eq for HuiSwitchStates<S> {}

impl<S: HuiSwitchIdentity> fmt::Debug for HuiSwitchStates<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.active()).finish()
    }
}
