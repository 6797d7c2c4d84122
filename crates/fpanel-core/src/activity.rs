#![forbid(unsafe_code)]

//! Activity triggers and the trigger policy.
//!
//! What counts as "activity" on a node's panels is a UI decision. The
//! promotion engine only knows how to bring a group to the front; the
//! coordinator consults a [`PromoteOn`] set to decide whether a given
//! [`ActivityTrigger`] should fire it.

use std::fmt;

use bitflags::bitflags;

/// A UI signal that may bring an owner's panels to the front.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActivityTrigger {
    /// A panel was just opened for the owner.
    Open,
    /// Pointer click landed on one of the owner's panels.
    Click,
    /// Pointer entered one of the owner's panels.
    Hover,
    /// Keyboard focus moved into one of the owner's panels.
    Focus,
    /// Application-defined signal (tag is opaque to fpanel).
    Custom(u16),
}

impl ActivityTrigger {
    /// The policy bit that governs this trigger.
    #[inline]
    #[must_use]
    pub const fn flag(self) -> PromoteOn {
        match self {
            Self::Open => PromoteOn::OPEN,
            Self::Click => PromoteOn::CLICK,
            Self::Hover => PromoteOn::HOVER,
            Self::Focus => PromoteOn::FOCUS,
            Self::Custom(_) => PromoteOn::CUSTOM,
        }
    }

    /// Short lowercase name, also accepted by [`PromoteOn::from_names`].
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Click => "click",
            Self::Hover => "hover",
            Self::Focus => "focus",
            Self::Custom(_) => "custom",
        }
    }
}

impl fmt::Display for ActivityTrigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Custom(tag) => write!(f, "custom({tag})"),
            other => f.write_str(other.name()),
        }
    }
}

bitflags! {
    /// Set of triggers that promote an owner's group.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct PromoteOn: u8 {
        const OPEN   = 0b0000_0001;
        const CLICK  = 0b0000_0010;
        const HOVER  = 0b0000_0100;
        const FOCUS  = 0b0000_1000;
        const CUSTOM = 0b0001_0000;
        const ALL = Self::OPEN.bits()
            | Self::CLICK.bits()
            | Self::HOVER.bits()
            | Self::FOCUS.bits()
            | Self::CUSTOM.bits();
    }
}

impl Default for PromoteOn {
    fn default() -> Self {
        Self::ALL
    }
}

impl PromoteOn {
    /// Whether `trigger` is enabled by this policy.
    #[inline]
    #[must_use]
    pub const fn allows(self, trigger: ActivityTrigger) -> bool {
        self.contains(trigger.flag())
    }

    /// Build a policy from trigger names (`"open"`, `"click"`, ...).
    ///
    /// Returns the first unrecognized name on failure.
    pub fn from_names<'a, I>(names: I) -> Result<Self, String>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut set = PromoteOn::empty();
        for name in names {
            let flag = match name.trim().to_ascii_lowercase().as_str() {
                "open" => PromoteOn::OPEN,
                "click" => PromoteOn::CLICK,
                "hover" => PromoteOn::HOVER,
                "focus" => PromoteOn::FOCUS,
                "custom" => PromoteOn::CUSTOM,
                "all" => PromoteOn::ALL,
                _ => return Err(name.to_owned()),
            };
            set |= flag;
        }
        Ok(set)
    }

    /// Names of the enabled triggers, in canonical order.
    #[must_use]
    pub fn names(self) -> Vec<&'static str> {
        [
            (PromoteOn::OPEN, "open"),
            (PromoteOn::CLICK, "click"),
            (PromoteOn::HOVER, "hover"),
            (PromoteOn::FOCUS, "focus"),
            (PromoteOn::CUSTOM, "custom"),
        ]
        .into_iter()
        .filter(|(flag, _)| self.contains(*flag))
        .map(|(_, name)| name)
        .collect()
    }
}
