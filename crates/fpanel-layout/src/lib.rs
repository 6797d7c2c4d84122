#![forbid(unsafe_code)]

//! Panel row layout.
//!
//! All panels that belong to one canvas node sit in a single horizontal row
//! to the right of the node, top-aligned with it, in open order (first opened
//! is leftmost):
//!
//! ```text
//!  node          slot 0          slot 1          slot 2
//!  +----+ gap  +--------+ sp  +--------+ sp  +--------+
//!  |    |----->|        |---->|        |---->|        |
//!  +----+      +--------+     +--------+     +--------+
//! ```
//!
//! Everything here is a pure function of a [`PanelGeometry`], the node's
//! canvas position, and the caller's ordered panel list. Nothing is cached,
//! so it is safe to call on every render. No viewport clamping is done;
//! panels may land partly or fully off-screen.

pub use fpanel_core::geometry::{CanvasPoint, CanvasRect};

use serde::{Deserialize, Serialize};

/// Default panel width in canvas units.
pub const PANEL_WIDTH: f64 = 320.0;
/// Default panel height in canvas units.
pub const PANEL_HEIGHT: f64 = 420.0;
/// Default distance from the node's left edge to the first panel.
pub const FIXED_GAP: f64 = 220.0;
/// Default horizontal space between neighbouring panels.
pub const PANEL_SPACING: f64 = 16.0;

/// Fixed panel dimensions and row spacing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PanelGeometry {
    pub panel_width: f64,
    pub panel_height: f64,
    /// Offset from the node's x to the first slot.
    pub gap: f64,
    /// Space between adjacent slots.
    pub spacing: f64,
}

impl Default for PanelGeometry {
    fn default() -> Self {
        Self {
            panel_width: PANEL_WIDTH,
            panel_height: PANEL_HEIGHT,
            gap: FIXED_GAP,
            spacing: PANEL_SPACING,
        }
    }
}

impl PanelGeometry {
    /// Set the panel size.
    #[must_use]
    pub fn size(mut self, width: f64, height: f64) -> Self {
        self.panel_width = width;
        self.panel_height = height;
        self
    }

    /// Set the node-to-first-panel gap.
    #[must_use]
    pub fn gap(mut self, gap: f64) -> Self {
        self.gap = gap;
        self
    }

    /// Set the spacing between panels.
    #[must_use]
    pub fn spacing(mut self, spacing: f64) -> Self {
        self.spacing = spacing;
        self
    }

    /// Horizontal distance between the origins of adjacent slots.
    #[inline]
    #[must_use]
    pub fn stride(&self) -> f64 {
        self.panel_width + self.spacing
    }

    /// Top-left corner of slot `index` for a node at `node`.
    #[inline]
    #[must_use]
    pub fn slot_origin(&self, node: CanvasPoint, index: usize) -> CanvasPoint {
        CanvasPoint::new(node.x + self.gap + index as f64 * self.stride(), node.y)
    }

    /// Where a panel goes when it cannot be found in its owner's row.
    ///
    /// Same as slot 0. Only reached when a caller asks about a panel that is
    /// not open.
    #[inline]
    #[must_use]
    pub fn fallback_origin(&self, node: CanvasPoint) -> CanvasPoint {
        CanvasPoint::new(node.x + self.gap, node.y)
    }

    /// Full rectangle of slot `index`.
    #[must_use]
    pub fn slot_rect(&self, node: CanvasPoint, index: usize) -> CanvasRect {
        CanvasRect::from_origin_size(
            self.slot_origin(node, index),
            self.panel_width,
            self.panel_height,
        )
    }

    /// Rectangles for a row of `count` panels, left to right.
    pub fn row(&self, node: CanvasPoint, count: usize) -> impl Iterator<Item = CanvasRect> + '_ {
        (0..count).map(move |index| self.slot_rect(node, index))
    }

    /// Bounding box of a row of `count` panels, or `None` for an empty row.
    #[must_use]
    pub fn row_bounds(&self, node: CanvasPoint, count: usize) -> Option<CanvasRect> {
        let last = count.checked_sub(1)?;
        let first = self.slot_rect(node, 0);
        Some(first.union(&self.slot_rect(node, last)))
    }

    /// Index of the slot under `point`, if any, for a row of `count` panels.
    ///
    /// Points in the spacing between slots hit nothing.
    #[must_use]
    pub fn slot_at(&self, node: CanvasPoint, count: usize, point: CanvasPoint) -> Option<usize> {
        (0..count).find(|&index| self.slot_rect(node, index).contains(point))
    }
}

/// Position of the panel of `kind` within an owner's row.
///
/// `ordered` yields the owner's open panel kinds in stack order. If `kind`
/// is not among them, the fallback origin is returned.
#[must_use]
pub fn position<K, I>(geometry: &PanelGeometry, ordered: I, kind: &K, node: CanvasPoint) -> CanvasPoint
where
    K: PartialEq,
    I: IntoIterator<Item = K>,
{
    match ordered.into_iter().position(|k| k == *kind) {
        Some(index) => geometry.slot_origin(node, index),
        None => geometry.fallback_origin(node),
    }
}
