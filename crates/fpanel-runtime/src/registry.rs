#![forbid(unsafe_code)]

//! The panel registry: which floating panels are open, and for whom.
//!
//! A [`PanelRegistry`] is an ordinary owned value. Each canvas (or test) holds
//! its own; there is no process-wide instance.
//!
//! # Invariants
//!
//! 1. At most one [`PanelEntry`] per `(owner, kind)`.
//! 2. Within a group, `stack_order` values are exactly `0..n` in open order.
//!    Opening a panel never changes a sibling's `stack_order`; closing one
//!    shifts only the siblings opened after it, keeping their relative order.
//! 3. A [`NodeGroup`] exists iff it holds at least one panel. The one
//!    exception is an empty group created by promoting an owner with no
//!    panels; it is dropped as soon as it is demoted or removed.
//! 4. At most one group is active, and the registry's active pointer names it.
//!
//! # Failure Modes
//!
//! None. Every operation treats an unknown owner or kind as "nothing there":
//! closes and removals become no-ops, queries return `false` or an empty
//! slice. UI events routinely race with node deletion, so stale ids are
//! expected input.

use rustc_hash::FxHashMap;
use serde::Serialize;

use fpanel_core::{CanvasPoint, OwnerId, PanelKind};
use fpanel_layout::PanelGeometry;

use crate::promotion::ZBands;

/// Monotonic logical timestamp issued by a registry.
///
/// Used for diagnostics (open order, last activity); no logic depends on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize)]
#[serde(transparent)]
pub struct Stamp(u64);

impl Stamp {
    #[inline]
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

/// One open floating panel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PanelEntry {
    owner: OwnerId,
    kind: PanelKind,
    stack_order: usize,
    z_index: i32,
    visible: bool,
    opened_at: Stamp,
}

impl PanelEntry {
    #[inline]
    #[must_use]
    pub fn owner(&self) -> &OwnerId {
        &self.owner
    }

    #[inline]
    #[must_use]
    pub fn kind(&self) -> PanelKind {
        self.kind
    }

    /// Position within the owner's row, `0` is leftmost.
    #[inline]
    #[must_use]
    pub fn stack_order(&self) -> usize {
        self.stack_order
    }

    #[inline]
    #[must_use]
    pub fn z_index(&self) -> i32 {
        self.z_index
    }

    /// Always `true` while the entry exists; panels are present or absent.
    #[inline]
    #[must_use]
    pub fn visible(&self) -> bool {
        self.visible
    }

    #[inline]
    #[must_use]
    pub fn opened_at(&self) -> Stamp {
        self.opened_at
    }
}

/// Promotion state and panels of one owner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeGroup {
    owner: OwnerId,
    active: bool,
    last_activity_at: Stamp,
    /// Sorted by `stack_order`, which equals the index.
    panels: Vec<PanelEntry>,
}

impl NodeGroup {
    fn new(owner: OwnerId, stamp: Stamp) -> Self {
        Self {
            owner,
            active: false,
            last_activity_at: stamp,
            panels: Vec::with_capacity(PanelKind::COUNT),
        }
    }

    #[inline]
    #[must_use]
    pub fn owner(&self) -> &OwnerId {
        &self.owner
    }

    #[inline]
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.active
    }

    #[inline]
    #[must_use]
    pub fn last_activity_at(&self) -> Stamp {
        self.last_activity_at
    }

    /// The group's panels in stack order.
    #[inline]
    #[must_use]
    pub fn panels(&self) -> &[PanelEntry] {
        &self.panels
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.panels.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.panels.is_empty()
    }

    pub(crate) fn set_active(&mut self, active: bool, bands: ZBands) {
        self.active = active;
        self.restack(bands);
    }

    pub(crate) fn touch(&mut self, stamp: Stamp) {
        self.last_activity_at = stamp;
    }

    /// Re-derive stack orders (dense, in current order) and z-indices.
    fn restack(&mut self, bands: ZBands) {
        let active = self.active;
        for (index, panel) in self.panels.iter_mut().enumerate() {
            panel.stack_order = index;
            panel.z_index = bands.z_for(active, index);
        }
    }

    fn position_of(&self, kind: PanelKind) -> Option<usize> {
        self.panels.iter().position(|p| p.kind == kind)
    }
}

/// Result of [`PanelRegistry::open`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpenOutcome {
    /// A new panel was created at `stack_order` and its owner promoted.
    Opened { stack_order: usize },
    /// The panel was already open; nothing changed.
    AlreadyOpen,
}

impl OpenOutcome {
    #[inline]
    #[must_use]
    pub fn is_opened(self) -> bool {
        matches!(self, Self::Opened { .. })
    }
}

/// Authoritative store of open panels and group promotion state.
#[derive(Debug, Clone, Default)]
pub struct PanelRegistry {
    groups: FxHashMap<OwnerId, NodeGroup>,
    active: Option<OwnerId>,
    bands: ZBands,
    clock: u64,
}

impl PanelRegistry {
    /// Create an empty registry with the default z bands.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty registry with custom z bands.
    #[must_use]
    pub fn with_bands(bands: ZBands) -> Self {
        Self {
            bands,
            ..Self::default()
        }
    }

    #[inline]
    #[must_use]
    pub fn bands(&self) -> ZBands {
        self.bands
    }

    // --- Mutation ---------------------------------------------------------

    /// Open the `kind` panel for `owner` and bring the owner to the front.
    ///
    /// Opening a panel that is already open does nothing at all (in
    /// particular it does not promote).
    pub fn open(&mut self, owner: impl Into<OwnerId>, kind: PanelKind) -> OpenOutcome {
        let owner = owner.into();
        if self.is_open(&owner, kind) {
            fpanel_core::trace!(message = "panel.open.duplicate", owner = owner.as_str(), kind = kind.slug());
            return OpenOutcome::AlreadyOpen;
        }

        let stamp = self.tick();
        let bands = self.bands;
        let group = self.ensure_group(&owner, stamp);
        let stack_order = group.panels.len();
        group.panels.push(PanelEntry {
            owner: owner.clone(),
            kind,
            stack_order,
            z_index: bands.z_for(false, stack_order),
            visible: true,
            opened_at: stamp,
        });
        fpanel_core::debug!(message = "panel.open", owner = owner.as_str(), kind = kind.slug(), stack_order);

        self.promote(owner);
        OpenOutcome::Opened { stack_order }
    }

    /// Close the `kind` panel of `owner`. Returns whether a panel was removed.
    ///
    /// Closing the last panel removes the group. If that group was active the
    /// front position is simply vacated; no other group is promoted.
    pub fn close(&mut self, owner: &str, kind: PanelKind) -> bool {
        let bands = self.bands;
        let Some(group) = self.groups.get_mut(owner) else {
            return false;
        };
        let Some(index) = group.position_of(kind) else {
            return false;
        };
        group.panels.remove(index);
        let now_empty = group.panels.is_empty();
        if !now_empty {
            group.restack(bands);
        }
        fpanel_core::debug!(message = "panel.close", owner, kind = kind.slug(), now_empty);

        if now_empty {
            self.discard_group(owner);
        }
        true
    }

    /// Close the panel if open, open it otherwise. Returns the new open state.
    pub fn toggle(&mut self, owner: impl Into<OwnerId>, kind: PanelKind) -> bool {
        let owner = owner.into();
        if self.close(&owner, kind) {
            false
        } else {
            self.open(owner, kind);
            true
        }
    }

    /// Remove every panel of `owner` and its group. Returns how many panels
    /// were removed.
    ///
    /// Used when the owning canvas node is deleted.
    pub fn remove_all(&mut self, owner: &str) -> usize {
        let Some(group) = self.groups.remove(owner) else {
            return 0;
        };
        if self.active.as_deref() == Some(owner) {
            self.active = None;
        }
        fpanel_core::debug!(message = "panel.remove_all", owner, removed = group.panels.len());
        group.panels.len()
    }

    /// Drop every panel and group.
    pub fn clear(&mut self) {
        self.groups.clear();
        self.active = None;
    }

    // --- Queries ----------------------------------------------------------

    /// Whether the `(owner, kind)` panel is open.
    #[must_use]
    pub fn is_open(&self, owner: &str, kind: PanelKind) -> bool {
        self.groups
            .get(owner)
            .is_some_and(|group| group.position_of(kind).is_some())
    }

    /// The panels of `owner` in stack order. Empty for unknown owners.
    #[must_use]
    pub fn panels_of(&self, owner: &str) -> &[PanelEntry] {
        self.groups.get(owner).map(NodeGroup::panels).unwrap_or(&[])
    }

    /// Look up one panel.
    #[must_use]
    pub fn panel(&self, owner: &str, kind: PanelKind) -> Option<&PanelEntry> {
        self.panels_of(owner).iter().find(|p| p.kind == kind)
    }

    #[must_use]
    pub fn group(&self, owner: &str) -> Option<&NodeGroup> {
        self.groups.get(owner)
    }

    /// All groups, in unspecified order.
    pub fn groups(&self) -> impl Iterator<Item = &NodeGroup> + '_ {
        self.groups.values()
    }

    /// All open panels, in unspecified order.
    pub fn entries(&self) -> impl Iterator<Item = &PanelEntry> + '_ {
        self.groups.values().flat_map(|group| group.panels.iter())
    }

    /// The owner whose group is currently in front.
    #[inline]
    #[must_use]
    pub fn active_owner(&self) -> Option<&OwnerId> {
        self.active.as_ref()
    }

    #[must_use]
    pub fn panel_count(&self) -> usize {
        self.groups.values().map(NodeGroup::len).sum()
    }

    #[inline]
    #[must_use]
    pub fn owner_count(&self) -> usize {
        self.groups.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// On-canvas position of the `(owner, kind)` panel for a node at `node`.
    ///
    /// Pure: reads the owner's current row and delegates to the layout
    /// calculator.
    #[must_use]
    pub fn position(
        &self,
        geometry: &PanelGeometry,
        owner: &str,
        kind: PanelKind,
        node: CanvasPoint,
    ) -> CanvasPoint {
        let row = self.panels_of(owner).iter().map(PanelEntry::kind);
        fpanel_layout::position(geometry, row, &kind, node)
    }

    // --- Internals shared with the promotion engine ------------------------

    pub(crate) fn tick(&mut self) -> Stamp {
        self.clock += 1;
        Stamp(self.clock)
    }

    pub(crate) fn group_mut(&mut self, owner: &str) -> Option<&mut NodeGroup> {
        self.groups.get_mut(owner)
    }

    pub(crate) fn ensure_group(&mut self, owner: &OwnerId, stamp: Stamp) -> &mut NodeGroup {
        self.groups
            .entry(owner.clone())
            .or_insert_with(|| NodeGroup::new(owner.clone(), stamp))
    }

    pub(crate) fn set_active_owner(&mut self, owner: Option<OwnerId>) {
        self.active = owner;
    }

    /// Remove a group and vacate the front position if it held it.
    pub(crate) fn discard_group(&mut self, owner: &str) {
        self.groups.remove(owner);
        if self.active.as_deref() == Some(owner) {
            self.active = None;
        }
    }
}
