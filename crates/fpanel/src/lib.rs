#![forbid(unsafe_code)]

//! fpanel public facade crate.
//!
//! Floating node panels for diagram canvases: several overlay panels per
//! node, laid out in a row beside it, with whole groups brought to the front
//! on activity. This crate re-exports the stable surface of the internal
//! crates and offers a prelude for day-to-day use.
//!
//! ```
//! use fpanel::prelude::*;
//!
//! let mut panels = PanelCoordinator::new();
//! panels.open("n1", PanelKind::Summary);
//! panels.open("n2", PanelKind::Editor);
//!
//! let nodes = |id: &OwnerId| match id.as_str() {
//!     "n1" => Some(CanvasPoint::new(0.0, 0.0)),
//!     "n2" => Some(CanvasPoint::new(0.0, 600.0)),
//!     _ => None,
//! };
//! let list = panels.render_list(nodes);
//! assert_eq!(list.last().map(|p| p.owner.as_str()), Some("n2"));
//! ```

use std::fmt;

// --- Core re-exports -------------------------------------------------------

pub use fpanel_core::{
    ActivityTrigger, CanvasPoint, CanvasRect, OwnerId, PanelKind, PanelKindInfo, ParseKindError,
    PromoteOn,
};

// --- Layout re-exports -----------------------------------------------------

pub use fpanel_layout::{FIXED_GAP, PANEL_HEIGHT, PANEL_SPACING, PANEL_WIDTH, PanelGeometry};

// --- Runtime re-exports ----------------------------------------------------

pub use fpanel_runtime::{
    ACTIVE_BASE, ActivityGate, INACTIVE_BASE, InvariantReport, OpenOutcome, PanelConfig,
    PanelConfigError, PanelCoordinator, PanelEntry, PanelRegistry, Promotion, RegistrySnapshot,
    RenderedPanel, SharedPanelCoordinator, ZBandError, ZBands,
};

/// Clock used for activity timestamps (`std::time::Instant` on native).
pub use web_time::Instant;

// --- Errors ---------------------------------------------------------------

/// Top-level error type for fpanel hosts.
#[derive(Debug)]
pub enum Error {
    /// Configuration could not be loaded or failed validation.
    Config(PanelConfigError),
    /// Z band bases overlap.
    Bands(ZBandError),
    /// Unknown panel kind slug.
    Kind(ParseKindError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(err) => write!(f, "{err}"),
            Self::Bands(err) => write!(f, "{err}"),
            Self::Kind(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Config(err) => Some(err),
            Self::Bands(err) => Some(err),
            Self::Kind(err) => Some(err),
        }
    }
}

impl From<PanelConfigError> for Error {
    fn from(err: PanelConfigError) -> Self {
        Self::Config(err)
    }
}

impl From<ZBandError> for Error {
    fn from(err: ZBandError) -> Self {
        Self::Bands(err)
    }
}

impl From<ParseKindError> for Error {
    fn from(err: ParseKindError) -> Self {
        Self::Kind(err)
    }
}

/// Standard result type for fpanel APIs.
pub type Result<T> = std::result::Result<T, Error>;

// --- Prelude --------------------------------------------------------------

pub mod prelude {
    pub use crate::{
        ActivityTrigger, CanvasPoint, Error, Instant, OwnerId, PanelCoordinator, PanelGeometry,
        PanelKind, PanelRegistry, PromoteOn, RenderedPanel, Result, SharedPanelCoordinator,
    };

    pub use crate::{core, layout, runtime};
}

pub use fpanel_core as core;
pub use fpanel_layout as layout;
pub use fpanel_runtime as runtime;

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_kind(slug: &str) -> Result<PanelKind> {
        Ok(slug.parse::<PanelKind>()?)
    }

    #[test]
    fn errors_convert_and_display() {
        let err = parse_kind("sidebar").unwrap_err();
        assert!(matches!(err, Error::Kind(_)));
        assert!(err.to_string().contains("sidebar"));
        assert!(std::error::Error::source(&err).is_some());

        let err: Error = ZBands::new(10, 11).unwrap_err().into();
        assert!(matches!(err, Error::Bands(_)));
    }

    #[test]
    fn config_errors_flow_through_question_mark() {
        fn build(promote_on: &str) -> Result<PanelCoordinator> {
            let mut config = PanelConfig::default();
            config.activity.promote_on = vec![promote_on.to_string()];
            Ok(config.into_coordinator()?)
        }
        assert!(build("click").is_ok());
        assert!(matches!(build("poke"), Err(Error::Config(_))));
    }

    #[test]
    fn prelude_covers_the_basic_flow() {
        use crate::prelude::*;

        let mut panels = PanelCoordinator::new();
        panels.open("n1", PanelKind::Chat);
        panels.open("n2", PanelKind::Chat);
        let promotion = panels
            .notify_activity("n1", ActivityTrigger::Click, Instant::now())
            .unwrap();
        assert_eq!(promotion.demoted.as_deref(), Some("n2"));
    }
}
