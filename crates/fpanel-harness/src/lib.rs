#![forbid(unsafe_code)]

//! Scripted replay harness for fpanel.
//!
//! Replays line-oriented UI event scripts (see [`script`]) against a
//! [`fpanel_runtime::PanelCoordinator`] so panel behavior can be reproduced
//! and inspected without a canvas.
//!
//! # Environment
//!
//! - `FPANEL_HARNESS_CONFIG`: path to a TOML [`fpanel_runtime::PanelConfig`]
//! - `FPANEL_LOG`: tracing filter directives (default `warn`)

pub mod script;

use std::path::Path;

use fpanel_runtime::{PanelConfig, PanelCoordinator};

pub use script::{Command, HarnessError, ScriptError, Session, parse_line, parse_script};

/// Environment variable naming the config file.
pub const CONFIG_ENV: &str = "FPANEL_HARNESS_CONFIG";
/// Environment variable holding tracing filter directives.
pub const LOG_ENV: &str = "FPANEL_LOG";

/// Build a coordinator from an optional TOML config file.
pub fn load_coordinator(config: Option<&Path>) -> Result<PanelCoordinator, HarnessError> {
    let Some(path) = config else {
        return Ok(PanelCoordinator::new());
    };
    let config = PanelConfig::from_toml_file(path)?;
    tracing::info!(config = %config.to_jsonl(), "loaded panel config");
    Ok(config.into_coordinator()?)
}
