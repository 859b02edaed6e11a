//! Builder for configuring and constructing a `HuiLink`.

use patchbay_core::UInt4;
use patchbay_hui::{HuiRole, HuiSurfaceEvent, DEFAULT_MAX_SYSEX_LEN};

use crate::HuiLink;

/// The handler is taken by [`build`](Self::build) so the builder stays
/// `Clone`.
///
/// # Example
///
/// ```
/// use patchbay::{HuiLink, HuiRole, UInt4};
///
/// let (tx, rx) = std::sync::mpsc::channel();
/// let link = HuiLink::builder()
///     .role(HuiRole::Host)
///     .group(UInt4::new(3).unwrap())
///     .max_sysex_len(4096)
///     .build(move |event| {
///         let _ = tx.send(event);
///     });
/// assert_eq!(link.group(), 3);
/// # drop(rx);
/// ```
#[derive(Clone, Debug)]
pub struct HuiLinkBuilder {
    role: HuiRole,
    group: UInt4,
    max_sysex_len: usize,
}

impl Default for HuiLinkBuilder {
    fn default() -> Self {
        Self {
            role: HuiRole::Surface,
            group: UInt4::MIN,
            max_sysex_len: DEFAULT_MAX_SYSEX_LEN,
        }
    }
}

impl HuiLinkBuilder {
    /// Default: `HuiRole::Surface`
    pub fn role(mut self, role: HuiRole) -> Self {
        self.role = role;
        self
    }

    /// UMP group used for outgoing words and accepted on incoming ones.
    /// Default: 0
    pub fn group(mut self, group: UInt4) -> Self {
        self.group = group;
        self
    }

    /// Default: 1024
    pub fn max_sysex_len(mut self, len: usize) -> Self {
        self.max_sysex_len = len;
        self
    }

    pub fn build(self, handler: impl FnMut(HuiSurfaceEvent) + Send + 'static) -> HuiLink {
        HuiLink::from_parts(self.role, self.group, self.max_sysex_len, handler)
    }
}
