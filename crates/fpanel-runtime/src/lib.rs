#![forbid(unsafe_code)]

//! fpanel Runtime
//!
//! Stateful side of the floating node panel system.
//!
//! # Key Components
//!
//! - [`PanelRegistry`] - Authoritative store of open panels, grouped by owner
//! - [`PanelRegistry::promote`] - Brings one owner's group to the front
//! - [`ZBands`] - The inactive/active z-index band pair
//! - [`PanelCoordinator`] - Routes UI activity, builds the paint-ordered render list
//! - [`SharedPanelCoordinator`] - Mutex-guarded coordinator for multi-threaded hosts
//! - [`PanelConfig`] - Bands, geometry, and trigger policy as data
//!
//! # Role in fpanel
//! `fpanel-runtime` owns all mutable panel state. It consumes ids and kinds
//! from `fpanel-core`, asks `fpanel-layout` where panels go, and hands the
//! host a render list of `(owner, kind, position, z_index)` to paint.

pub mod config;
pub mod coordinator;
pub mod invariants;
pub mod promotion;
pub mod registry;
pub mod shared;
pub mod snapshot;

pub use config::{ActivityConfig, BandsConfig, PanelConfig, PanelConfigError};
pub use coordinator::{ActivityGate, PanelCoordinator, RenderedPanel};
pub use invariants::{InvariantCode, InvariantIssue, InvariantReport};
pub use promotion::{ACTIVE_BASE, INACTIVE_BASE, Promotion, ZBandError, ZBands};
pub use registry::{NodeGroup, OpenOutcome, PanelEntry, PanelRegistry, Stamp};
pub use shared::SharedPanelCoordinator;
pub use snapshot::{GroupRecord, PanelRecord, RegistrySnapshot};
