#![forbid(unsafe_code)]

//! Group promotion and the two-band z-index scheme.
//!
//! Exactly one owner's panel group may be *active* at a time. Every panel of
//! the active group renders in the active band, every other panel in the
//! inactive band:
//!
//! ```text
//!   inactive:  inactive_base + stack_order + 1
//!   active:    active_base   + stack_order + 1
//! ```
//!
//! Because `active_base - inactive_base` exceeds the most panels an owner can
//! hold ([`PanelKind::COUNT`]), every active panel sits above every inactive
//! one while each group keeps its own left-to-right stacking.
//!
//! # Invariants
//!
//! 1. After `promote(x)` the registry's active pointer is `x` and no other
//!    group has `active = true`.
//! 2. The previously active group (if different) is moved to the inactive
//!    band with its relative order preserved.
//! 3. Promoting the already-active owner touches no other group.
//!
//! # Failure Modes
//!
//! None. Promoting an owner with no panels is accepted and leaves an empty
//! active group behind. That group is discarded the next time another owner
//! is promoted, or when it is removed.

use std::fmt;

use fpanel_core::{OwnerId, PanelKind};

use crate::registry::PanelRegistry;

/// Default base of the inactive z band.
pub const INACTIVE_BASE: i32 = 1000;
/// Default base of the active z band.
pub const ACTIVE_BASE: i32 = 3000;

/// The pair of z-index bands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize)]
pub struct ZBands {
    inactive_base: i32,
    active_base: i32,
}

impl Default for ZBands {
    fn default() -> Self {
        Self {
            inactive_base: INACTIVE_BASE,
            active_base: ACTIVE_BASE,
        }
    }
}

impl ZBands {
    /// Minimum distance between the bases so the bands never overlap.
    pub const MIN_SEPARATION: i32 = PanelKind::COUNT as i32 + 1;

    /// Create a band pair, rejecting bases that would let bands overlap.
    pub fn new(inactive_base: i32, active_base: i32) -> Result<Self, ZBandError> {
        let fits = inactive_base
            .checked_add(Self::MIN_SEPARATION)
            .is_some_and(|floor| active_base >= floor)
            && active_base
                .checked_add(Self::MIN_SEPARATION)
                .is_some();
        if !fits {
            return Err(ZBandError::Overlap {
                inactive_base,
                active_base,
                required_gap: Self::MIN_SEPARATION,
            });
        }
        Ok(Self {
            inactive_base,
            active_base,
        })
    }

    #[inline]
    #[must_use]
    pub const fn inactive_base(&self) -> i32 {
        self.inactive_base
    }

    #[inline]
    #[must_use]
    pub const fn active_base(&self) -> i32 {
        self.active_base
    }

    /// Z-index for a panel at `stack_order` in a group that is `active` or not.
    #[inline]
    #[must_use]
    pub const fn z_for(&self, active: bool, stack_order: usize) -> i32 {
        let base = if active {
            self.active_base
        } else {
            self.inactive_base
        };
        base + stack_order as i32 + 1
    }

    /// Whether `z` lies in the active band.
    #[inline]
    #[must_use]
    pub const fn is_active_z(&self, z: i32) -> bool {
        z > self.active_base && z <= self.active_base + PanelKind::COUNT as i32
    }

    /// Whether `z` lies in the inactive band.
    #[inline]
    #[must_use]
    pub const fn is_inactive_z(&self, z: i32) -> bool {
        z > self.inactive_base && z <= self.inactive_base + PanelKind::COUNT as i32
    }
}

/// Error returned for a band pair that would overlap.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ZBandError {
    Overlap {
        inactive_base: i32,
        active_base: i32,
        required_gap: i32,
    },
}

impl fmt::Display for ZBandError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Overlap {
                inactive_base,
                active_base,
                required_gap,
            } => write!(
                f,
                "active_base ({active_base}) must be at least {required_gap} above inactive_base ({inactive_base})"
            ),
        }
    }
}

impl std::error::Error for ZBandError {}

/// What a call to [`PanelRegistry::promote`] did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Promotion {
    /// The owner now at the front.
    pub owner: OwnerId,
    /// The owner that lost the front position, if any.
    pub demoted: Option<OwnerId>,
    /// `false` when `owner` was already active (only the activity stamp moved).
    pub changed: bool,
}

impl PanelRegistry {
    /// Bring `owner`'s panel group to the front.
    ///
    /// Demotes whichever other group was active, creates the group if it does
    /// not exist, stamps its activity time, and re-derives z-indices for both
    /// groups. Always succeeds.
    pub fn promote(&mut self, owner: impl Into<OwnerId>) -> Promotion {
        let owner = owner.into();
        let bands = self.bands();
        let span = fpanel_core::trace_span!("group.promote", owner = owner.as_str());
        let _guard = span.enter();

        let demoted = match self.active_owner() {
            Some(current) if current != &owner => Some(current.clone()),
            _ => None,
        };
        let changed = self.active_owner() != Some(&owner);

        if let Some(prev) = demoted.as_deref() {
            let drop_prev = match self.group_mut(prev) {
                Some(group) => {
                    group.set_active(false, bands);
                    group.is_empty()
                }
                None => false,
            };
            if drop_prev {
                self.discard_group(prev);
            }
        }

        let stamp = self.tick();
        let group = self.ensure_group(&owner, stamp);
        group.set_active(true, bands);
        group.touch(stamp);
        self.set_active_owner(Some(owner.clone()));

        if changed {
            fpanel_core::debug!(
                message = "group.promote",
                owner = owner.as_str(),
                demoted = demoted.as_deref().unwrap_or(""),
            );
        }

        Promotion {
            owner,
            demoted,
            changed,
        }
    }
}
