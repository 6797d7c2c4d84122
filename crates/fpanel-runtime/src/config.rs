#![forbid(unsafe_code)]

//! Panel-system configuration as data.
//!
//! Everything that the panel system fixes at construction time (the z bands,
//! the row geometry, which triggers promote, and the repeat window) lives in
//! one [`PanelConfig`] that can be loaded from TOML or JSON at startup.
//!
//! # Loading
//!
//! ```toml
//! # fpanel.toml
//! [bands]
//! inactive_base = 1000
//! active_base = 3000
//!
//! [geometry]
//! gap = 240.0
//!
//! [activity]
//! promote_on = ["open", "click", "focus"]
//! repeat_window_ms = 120
//! ```
//!
//! ```rust,ignore
//! let coordinator = PanelConfig::from_toml_file("fpanel.toml")?.into_coordinator()?;
//! ```
//!
//! # Defaults
//!
//! Every field defaults to the built-in constants, so an empty file yields the
//! same coordinator as [`PanelCoordinator::new`].

#[cfg(feature = "policy-config")]
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use fpanel_core::PromoteOn;
use fpanel_layout::PanelGeometry;

use crate::coordinator::{ActivityGate, PanelCoordinator};
use crate::promotion::{ACTIVE_BASE, INACTIVE_BASE, ZBandError, ZBands};

// ---------------------------------------------------------------------------
// Top-level PanelConfig
// ---------------------------------------------------------------------------

/// Top-level panel-system configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PanelConfig {
    /// Z-index band bases.
    pub bands: BandsConfig,
    /// Panel row geometry.
    pub geometry: PanelGeometry,
    /// Trigger policy and repeat gating.
    pub activity: ActivityConfig,
}

impl PanelConfig {
    /// Load from a TOML string.
    #[cfg(feature = "policy-config")]
    pub fn from_toml_str(s: &str) -> Result<Self, PanelConfigError> {
        toml::from_str(s).map_err(PanelConfigError::Toml)
    }

    /// Load from a TOML file on disk.
    #[cfg(feature = "policy-config")]
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, PanelConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(PanelConfigError::Io)?;
        Self::from_toml_str(&content)
    }

    /// Load from a JSON string.
    #[cfg(feature = "policy-config")]
    pub fn from_json_str(s: &str) -> Result<Self, PanelConfigError> {
        serde_json::from_str(s).map_err(PanelConfigError::Json)
    }

    /// Load from a JSON file on disk.
    #[cfg(feature = "policy-config")]
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, PanelConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(PanelConfigError::Io)?;
        Self::from_json_str(&content)
    }

    /// Validate all parameters.
    ///
    /// Returns a list of validation errors. An empty list means the config
    /// is valid.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if let Err(e) = self.to_bands() {
            errors.push(format!("bands: {e}"));
        }

        let g = &self.geometry;
        for (name, value) in [("panel_width", g.panel_width), ("panel_height", g.panel_height)] {
            if !value.is_finite() || value <= 0.0 {
                errors.push(format!("geometry.{name} must be finite and > 0, got {value}"));
            }
        }
        for (name, value) in [("gap", g.gap), ("spacing", g.spacing)] {
            if !value.is_finite() || value < 0.0 {
                errors.push(format!("geometry.{name} must be finite and >= 0, got {value}"));
            }
        }

        if let Err(name) = self.to_promote_on() {
            errors.push(format!("activity.promote_on: unknown trigger {name:?}"));
        }

        errors
    }

    /// The configured z bands.
    pub fn to_bands(&self) -> Result<ZBands, ZBandError> {
        ZBands::new(self.bands.inactive_base, self.bands.active_base)
    }

    /// The configured trigger policy. Returns the first unknown name on failure.
    pub fn to_promote_on(&self) -> Result<PromoteOn, String> {
        PromoteOn::from_names(self.activity.promote_on.iter().map(String::as_str))
    }

    /// The configured repeat window.
    #[must_use]
    pub fn repeat_window(&self) -> Duration {
        Duration::from_millis(self.activity.repeat_window_ms)
    }

    /// Validate and build a coordinator.
    pub fn into_coordinator(self) -> Result<PanelCoordinator, PanelConfigError> {
        let errors = self.validate();
        if !errors.is_empty() {
            return Err(PanelConfigError::Validation(errors));
        }
        let bands = self
            .to_bands()
            .map_err(|e| PanelConfigError::Validation(vec![e.to_string()]))?;
        let policy = self
            .to_promote_on()
            .map_err(|name| PanelConfigError::Validation(vec![format!("unknown trigger {name:?}")]))?;

        Ok(PanelCoordinator::new()
            .bands(bands)
            .geometry(self.geometry)
            .policy(policy)
            .gate(ActivityGate::new(self.repeat_window())))
    }

    /// Format as a JSONL line for structured logging.
    #[must_use]
    pub fn to_jsonl(&self) -> String {
        format!(
            r#"{{"schema":"panel-config-v1","inactive_base":{},"active_base":{},"panel_width":{},"panel_height":{},"gap":{},"spacing":{},"promote_on":"{}","repeat_window_ms":{}}}"#,
            self.bands.inactive_base,
            self.bands.active_base,
            self.geometry.panel_width,
            self.geometry.panel_height,
            self.geometry.gap,
            self.geometry.spacing,
            self.activity.promote_on.join(","),
            self.activity.repeat_window_ms,
        )
    }
}

// ---------------------------------------------------------------------------
// Sections
// ---------------------------------------------------------------------------

/// Z band bases.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BandsConfig {
    /// Base of the inactive band. Default: 1000.
    pub inactive_base: i32,
    /// Base of the active band. Default: 3000.
    pub active_base: i32,
}

impl Default for BandsConfig {
    fn default() -> Self {
        Self {
            inactive_base: INACTIVE_BASE,
            active_base: ACTIVE_BASE,
        }
    }
}

/// Which activity promotes, and how often.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ActivityConfig {
    /// Trigger names that promote (`open`, `click`, `hover`, `focus`,
    /// `custom`, or `all`). Default: all of them.
    pub promote_on: Vec<String>,
    /// Repeat window for an already-active owner, in milliseconds.
    /// Default: 0 (no gating).
    pub repeat_window_ms: u64,
}

impl Default for ActivityConfig {
    fn default() -> Self {
        Self {
            promote_on: PromoteOn::ALL.names().into_iter().map(str::to_owned).collect(),
            repeat_window_ms: 0,
        }
    }
}

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

/// Errors that can occur when loading a panel configuration.
#[derive(Debug)]
pub enum PanelConfigError {
    /// I/O error reading a file.
    Io(std::io::Error),
    /// TOML parse error.
    #[cfg(feature = "policy-config")]
    Toml(toml::de::Error),
    /// JSON parse error.
    Json(serde_json::Error),
    /// Validation errors.
    Validation(Vec<String>),
}

impl std::fmt::Display for PanelConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            #[cfg(feature = "policy-config")]
            Self::Toml(e) => write!(f, "TOML parse error: {e}"),
            Self::Json(e) => write!(f, "JSON parse error: {e}"),
            Self::Validation(errors) => write!(f, "validation errors: {}", errors.join("; ")),
        }
    }
}

impl std::error::Error for PanelConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            #[cfg(feature = "policy-config")]
            Self::Toml(e) => Some(e),
            Self::Json(e) => Some(e),
            Self::Validation(_) => None,
        }
    }
}
