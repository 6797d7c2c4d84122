#![forbid(unsafe_code)]

//! Application-side panel management.
//!
//! [`PanelCoordinator`] is what UI event handlers talk to. It owns a
//! [`PanelRegistry`], the fixed [`PanelGeometry`], the trigger policy, and an
//! optional repeat-window gate, and turns UI activity into promotions and
//! registry state into a paint-ordered render list.
//!
//! # Invariants
//!
//! 1. Opening a panel always promotes its owner, whatever the policy says.
//! 2. Any other trigger promotes only if the policy allows it and the gate
//!    admits it.
//! 3. [`PanelCoordinator::render_list`] is sorted by ascending z-index, so
//!    painting it in order puts the active group on top.
//!
//! # Failure Modes
//!
//! - Activity for an owner with no open panels is ignored (stale events after
//!   a node deletion must not resurrect an empty group).
//! - Owners whose canvas position the caller cannot supply are left out of
//!   the render list rather than drawn at a made-up location.

use std::time::Duration;

use rustc_hash::FxHashMap;
use serde::Serialize;
use web_time::Instant;

use fpanel_core::{ActivityTrigger, CanvasPoint, CanvasRect, OwnerId, PanelKind, PromoteOn};
use fpanel_layout::PanelGeometry;

use crate::promotion::{Promotion, ZBands};
use crate::registry::{OpenOutcome, PanelRegistry};

/// One visible panel, ready to be drawn as an absolutely positioned overlay.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderedPanel {
    pub owner: OwnerId,
    pub kind: PanelKind,
    pub position: CanvasPoint,
    pub z_index: i32,
}

/// Suppresses rapid repeat activity on an owner that is already in front.
///
/// Hover and focus events can arrive many times per second. Re-promoting the
/// active owner is harmless but not free, so the gate drops a trigger when
/// the same owner is already active and its previous admitted trigger was
/// less than `repeat_window` ago. A zero window admits everything.
#[derive(Debug, Clone, Default)]
pub struct ActivityGate {
    repeat_window: Duration,
    last_admitted: FxHashMap<OwnerId, Instant>,
}

impl ActivityGate {
    #[must_use]
    pub fn new(repeat_window: Duration) -> Self {
        Self {
            repeat_window,
            last_admitted: FxHashMap::default(),
        }
    }

    /// A gate that admits every trigger.
    #[must_use]
    pub fn disabled() -> Self {
        Self::default()
    }

    #[inline]
    #[must_use]
    pub fn repeat_window(&self) -> Duration {
        self.repeat_window
    }

    /// Decide whether a trigger for `owner` at `now` should go through.
    pub fn admit(&mut self, owner: &OwnerId, already_active: bool, now: Instant) -> bool {
        if self.repeat_window.is_zero() {
            return true;
        }
        let suppressed = already_active
            && self
                .last_admitted
                .get(owner)
                .is_some_and(|&prev| now.saturating_duration_since(prev) < self.repeat_window);
        if !suppressed {
            self.last_admitted.insert(owner.clone(), now);
        }
        !suppressed
    }

    /// Drop any history for `owner`.
    pub fn forget(&mut self, owner: &str) {
        self.last_admitted.remove(owner);
    }
}

/// The application's panel-management layer.
#[derive(Debug, Clone, Default)]
pub struct PanelCoordinator {
    registry: PanelRegistry,
    geometry: PanelGeometry,
    policy: PromoteOn,
    gate: ActivityGate,
}

impl PanelCoordinator {
    /// Coordinator with default bands, geometry, policy, and no gating.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the z bands. Drops any open panels.
    #[must_use]
    pub fn bands(mut self, bands: ZBands) -> Self {
        self.registry = PanelRegistry::with_bands(bands);
        self
    }

    /// Set the panel geometry.
    #[must_use]
    pub fn geometry(mut self, geometry: PanelGeometry) -> Self {
        self.geometry = geometry;
        self
    }

    /// Set which triggers promote.
    #[must_use]
    pub fn policy(mut self, policy: PromoteOn) -> Self {
        self.policy = policy;
        self
    }

    /// Set the repeat-window gate.
    #[must_use]
    pub fn gate(mut self, gate: ActivityGate) -> Self {
        self.gate = gate;
        self
    }

    #[inline]
    #[must_use]
    pub fn registry(&self) -> &PanelRegistry {
        &self.registry
    }

    #[inline]
    #[must_use]
    pub fn panel_geometry(&self) -> &PanelGeometry {
        &self.geometry
    }

    #[inline]
    #[must_use]
    pub fn promote_on(&self) -> PromoteOn {
        self.policy
    }

    // --- Mutation entry points ---------------------------------------------

    pub fn open(&mut self, owner: impl Into<OwnerId>, kind: PanelKind) -> OpenOutcome {
        self.registry.open(owner, kind)
    }

    pub fn close(&mut self, owner: &str, kind: PanelKind) -> bool {
        self.registry.close(owner, kind)
    }

    pub fn toggle(&mut self, owner: impl Into<OwnerId>, kind: PanelKind) -> bool {
        self.registry.toggle(owner, kind)
    }

    /// Promote unconditionally, bypassing policy and gate.
    pub fn promote(&mut self, owner: impl Into<OwnerId>) -> Promotion {
        self.registry.promote(owner)
    }

    /// Route a UI activity signal. Returns the promotion if one happened.
    pub fn notify_activity(
        &mut self,
        owner: impl Into<OwnerId>,
        trigger: ActivityTrigger,
        now: Instant,
    ) -> Option<Promotion> {
        let owner = owner.into();
        if !self.policy.allows(trigger) {
            fpanel_core::trace!(message = "activity.ignored", owner = owner.as_str(), trigger = trigger.name());
            return None;
        }
        if self.registry.panels_of(&owner).is_empty() {
            fpanel_core::trace!(message = "activity.stale", owner = owner.as_str(), trigger = trigger.name());
            return None;
        }
        let already_active = self.registry.active_owner() == Some(&owner);
        if !self.gate.admit(&owner, already_active, now) {
            fpanel_core::debug!(message = "activity.gated", owner = owner.as_str(), trigger = trigger.name());
            return None;
        }
        Some(self.registry.promote(owner))
    }

    /// The owning canvas node was deleted: drop all of its panels.
    pub fn node_removed(&mut self, owner: &str) -> usize {
        self.gate.forget(owner);
        self.registry.remove_all(owner)
    }

    // --- Queries -------------------------------------------------------------

    #[must_use]
    pub fn is_open(&self, owner: &str, kind: PanelKind) -> bool {
        self.registry.is_open(owner, kind)
    }

    /// Position of one panel given its node's canvas position.
    #[must_use]
    pub fn position(&self, owner: &str, kind: PanelKind, node: CanvasPoint) -> CanvasPoint {
        self.registry.position(&self.geometry, owner, kind, node)
    }

    /// Every visible panel with its position and depth, in paint order.
    ///
    /// `node_position` supplies each owner's current canvas position; owners
    /// it returns `None` for are skipped.
    pub fn render_list<F>(&self, node_position: F) -> Vec<RenderedPanel>
    where
        F: Fn(&OwnerId) -> Option<CanvasPoint>,
    {
        let mut out = Vec::with_capacity(self.registry.panel_count());
        for group in self.registry.groups() {
            let Some(node) = node_position(group.owner()) else {
                continue;
            };
            for panel in group.panels().iter().filter(|p| p.visible()) {
                out.push(RenderedPanel {
                    owner: group.owner().clone(),
                    kind: panel.kind(),
                    position: self.position(group.owner(), panel.kind(), node),
                    z_index: panel.z_index(),
                });
            }
        }
        out.sort_by(|a, b| {
            a.z_index
                .cmp(&b.z_index)
                .then_with(|| a.owner.cmp(&b.owner))
        });
        out
    }

    /// Canvas rectangle covered by a rendered panel.
    #[must_use]
    pub fn panel_rect(&self, panel: &RenderedPanel) -> CanvasRect {
        CanvasRect::from_origin_size(
            panel.position,
            self.geometry.panel_width,
            self.geometry.panel_height,
        )
    }

    /// Topmost panel under `point`, if any.
    pub fn panel_at<F>(&self, point: CanvasPoint, node_position: F) -> Option<RenderedPanel>
    where
        F: Fn(&OwnerId) -> Option<CanvasPoint>,
    {
        self.render_list(node_position)
            .into_iter()
            .rev()
            .find(|panel| self.panel_rect(panel).contains(point))
    }

    /// Route a pointer press at `point`: hit-test, then treat it as a click on
    /// the owner of the panel that was hit.
    pub fn click_at<F>(
        &mut self,
        point: CanvasPoint,
        node_position: F,
        now: Instant,
    ) -> Option<RenderedPanel>
    where
        F: Fn(&OwnerId) -> Option<CanvasPoint>,
    {
        let hit = self.panel_at(point, node_position)?;
        self.notify_activity(hit.owner.clone(), ActivityTrigger::Click, now);
        Some(hit)
    }
}
