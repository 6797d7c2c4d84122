#![forbid(unsafe_code)]

//! Core vocabulary for the floating node panel system.
//!
//! # Role in fpanel
//! `fpanel-core` holds the types every other crate agrees on: which canvas
//! node a panel belongs to ([`OwnerId`]), what it shows ([`PanelKind`]), where
//! things sit on the canvas ([`CanvasPoint`], [`CanvasRect`]), and what kind
//! of user activity may bring a node's panels to the front
//! ([`ActivityTrigger`], [`PromoteOn`]).
//!
//! Nothing here holds mutable state. The registry and promotion engine live
//! in `fpanel-runtime`; the pure layout calculator lives in `fpanel-layout`.

pub mod activity;
pub mod geometry;
pub mod ids;
pub mod kind;
pub mod logging;

pub use activity::{ActivityTrigger, PromoteOn};
pub use geometry::{CanvasPoint, CanvasRect};
pub use ids::OwnerId;
pub use kind::{PanelKind, PanelKindInfo, ParseKindError};

// Re-export tracing macros at crate root for ergonomic use.
#[cfg(feature = "tracing")]
pub use logging::{debug, debug_span, info, trace, trace_span, warn};
