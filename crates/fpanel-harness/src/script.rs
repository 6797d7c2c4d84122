#![forbid(unsafe_code)]

//! Line-oriented UI event scripts.
//!
//! Each non-blank line is one command; `#` starts a comment:
//!
//! ```text
//! node n1 0 0          # place node n1 on the canvas
//! open n1 summary
//! open n2 editor
//! click n1
//! wait 50              # advance the session clock by 50ms
//! render
//! check
//! ```
//!
//! A [`Session`] replays commands against a [`PanelCoordinator`] and writes a
//! short human-readable line per command. Replaying the same script always
//! produces the same output, because the session clock only moves on `wait`.

use std::collections::BTreeMap;
use std::fmt;
use std::io::{self, Write};
use std::time::Duration;

use fpanel_core::{ActivityTrigger, CanvasPoint, OwnerId, PanelKind};
use fpanel_runtime::{OpenOutcome, PanelConfigError, PanelCoordinator, Promotion};
use web_time::Instant;

/// One parsed script command.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Node { owner: OwnerId, at: CanvasPoint },
    Open { owner: OwnerId, kind: PanelKind },
    Close { owner: OwnerId, kind: PanelKind },
    Toggle { owner: OwnerId, kind: PanelKind },
    Activity { owner: OwnerId, trigger: ActivityTrigger },
    Promote { owner: OwnerId },
    Remove { owner: OwnerId },
    Wait(Duration),
    Render,
    Snapshot,
    Check,
}

/// A script line that could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptError {
    /// 1-based line number.
    pub line: usize,
    pub message: String,
}

impl fmt::Display for ScriptError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}: {}", self.line, self.message)
    }
}

impl std::error::Error for ScriptError {}

/// Anything that can stop a harness run.
#[derive(Debug)]
pub enum HarnessError {
    /// Bad script input.
    Script(ScriptError),
    /// Configuration could not be loaded.
    Config(PanelConfigError),
    /// Reading the script or writing output failed.
    Io(io::Error),
}

impl fmt::Display for HarnessError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Script(e) => write!(f, "script error: {e}"),
            Self::Config(e) => write!(f, "config error: {e}"),
            Self::Io(e) => write!(f, "I/O error: {e}"),
        }
    }
}

impl std::error::Error for HarnessError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Script(e) => Some(e),
            Self::Config(e) => Some(e),
            Self::Io(e) => Some(e),
        }
    }
}

impl From<ScriptError> for HarnessError {
    fn from(e: ScriptError) -> Self {
        Self::Script(e)
    }
}

impl From<PanelConfigError> for HarnessError {
    fn from(e: PanelConfigError) -> Self {
        Self::Config(e)
    }
}

impl From<io::Error> for HarnessError {
    fn from(e: io::Error) -> Self {
        Self::Io(e)
    }
}

/// Parse one line. Returns `Ok(None)` for blank and comment-only lines.
pub fn parse_line(line_no: usize, line: &str) -> Result<Option<Command>, ScriptError> {
    let code = line.split_once('#').map_or(line, |(before, _)| before);
    let mut words = code.split_whitespace();
    let Some(verb) = words.next() else {
        return Ok(None);
    };
    let args: Vec<&str> = words.collect();
    let err = |message: String| ScriptError {
        line: line_no,
        message,
    };
    let expect_args = |n: usize| {
        if args.len() == n {
            Ok(())
        } else {
            Err(err(format!("`{verb}` takes {n} argument(s), got {}", args.len())))
        }
    };
    let kind_at = |i: usize| {
        args[i]
            .parse::<PanelKind>()
            .map_err(|e| err(e.to_string()))
    };
    let number_at = |i: usize| {
        args[i]
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .ok_or_else(|| err(format!("`{}` is not a finite number", args[i])))
    };

    let command = match verb {
        "node" => {
            expect_args(3)?;
            Command::Node {
                owner: OwnerId::from(args[0]),
                at: CanvasPoint::new(number_at(1)?, number_at(2)?),
            }
        }
        "open" | "close" | "toggle" => {
            expect_args(2)?;
            let owner = OwnerId::from(args[0]);
            let kind = kind_at(1)?;
            match verb {
                "open" => Command::Open { owner, kind },
                "close" => Command::Close { owner, kind },
                _ => Command::Toggle { owner, kind },
            }
        }
        "click" | "hover" | "focus" => {
            expect_args(1)?;
            let trigger = match verb {
                "click" => ActivityTrigger::Click,
                "hover" => ActivityTrigger::Hover,
                _ => ActivityTrigger::Focus,
            };
            Command::Activity {
                owner: OwnerId::from(args[0]),
                trigger,
            }
        }
        "custom" => {
            expect_args(2)?;
            let code = args[1]
                .parse::<u16>()
                .map_err(|_| err(format!("`{}` is not a custom trigger code", args[1])))?;
            Command::Activity {
                owner: OwnerId::from(args[0]),
                trigger: ActivityTrigger::Custom(code),
            }
        }
        "promote" | "remove" => {
            expect_args(1)?;
            let owner = OwnerId::from(args[0]);
            if verb == "promote" {
                Command::Promote { owner }
            } else {
                Command::Remove { owner }
            }
        }
        "wait" => {
            expect_args(1)?;
            let ms = args[0]
                .parse::<u64>()
                .map_err(|_| err(format!("`{}` is not a duration in ms", args[0])))?;
            Command::Wait(Duration::from_millis(ms))
        }
        "render" | "snapshot" | "check" => {
            expect_args(0)?;
            match verb {
                "render" => Command::Render,
                "snapshot" => Command::Snapshot,
                _ => Command::Check,
            }
        }
        other => return Err(err(format!("unknown command `{other}`"))),
    };
    Ok(Some(command))
}

/// Parse a whole script, stopping at the first bad line.
pub fn parse_script(script: &str) -> Result<Vec<(usize, Command)>, ScriptError> {
    let mut commands = Vec::new();
    for (index, line) in script.lines().enumerate() {
        if let Some(command) = parse_line(index + 1, line)? {
            commands.push((index + 1, command));
        }
    }
    Ok(commands)
}

/// A coordinator plus the canvas state and clock a script drives.
#[derive(Debug)]
pub struct Session {
    coordinator: PanelCoordinator,
    nodes: BTreeMap<OwnerId, CanvasPoint>,
    epoch: Instant,
    elapsed: Duration,
}

impl Session {
    #[must_use]
    pub fn new(coordinator: PanelCoordinator) -> Self {
        Self {
            coordinator,
            nodes: BTreeMap::new(),
            epoch: Instant::now(),
            elapsed: Duration::ZERO,
        }
    }

    #[inline]
    #[must_use]
    pub fn coordinator(&self) -> &PanelCoordinator {
        &self.coordinator
    }

    /// Parse and run `script`, writing results to `out`.
    ///
    /// The whole script is parsed before anything runs, so a typo on the last
    /// line leaves the session untouched.
    pub fn run_script(&mut self, script: &str, out: &mut impl Write) -> Result<(), HarnessError> {
        for (line, command) in parse_script(script)? {
            let span = tracing::debug_span!("script.line", line);
            let _guard = span.enter();
            self.execute(&command, out)?;
        }
        Ok(())
    }

    /// Run one command.
    pub fn execute(&mut self, command: &Command, out: &mut impl Write) -> io::Result<()> {
        let now = self.epoch + self.elapsed;
        match command {
            Command::Node { owner, at } => {
                self.nodes.insert(owner.clone(), *at);
            }
            Command::Open { owner, kind } => match self.coordinator.open(owner.clone(), *kind) {
                OpenOutcome::Opened { stack_order } => {
                    writeln!(out, "opened {owner} {kind} #{stack_order}")?;
                }
                OpenOutcome::AlreadyOpen => writeln!(out, "{owner} {kind} already open")?,
            },
            Command::Close { owner, kind } => {
                if self.coordinator.close(owner, *kind) {
                    writeln!(out, "closed {owner} {kind}")?;
                } else {
                    writeln!(out, "{owner} {kind} not open")?;
                }
            }
            Command::Toggle { owner, kind } => {
                let state = if self.coordinator.toggle(owner.clone(), *kind) {
                    "open"
                } else {
                    "closed"
                };
                writeln!(out, "{owner} {kind} {state}")?;
            }
            Command::Activity { owner, trigger } => {
                match self.coordinator.notify_activity(owner.clone(), *trigger, now) {
                    Some(promotion) => write_promotion(out, &promotion)?,
                    None => writeln!(out, "ignored {trigger} {owner}")?,
                }
            }
            Command::Promote { owner } => {
                let promotion = self.coordinator.promote(owner.clone());
                write_promotion(out, &promotion)?;
            }
            Command::Remove { owner } => {
                let removed = self.coordinator.node_removed(owner);
                self.nodes.remove(owner.as_str());
                writeln!(out, "removed {owner} ({removed} panels)")?;
            }
            Command::Wait(step) => self.elapsed += *step,
            Command::Render => {
                let list = self
                    .coordinator
                    .render_list(|id| self.nodes.get(id).copied());
                if list.is_empty() {
                    writeln!(out, "(no panels)")?;
                }
                for panel in list {
                    writeln!(
                        out,
                        "z={} {} {} @ ({}, {})",
                        panel.z_index, panel.owner, panel.kind, panel.position.x, panel.position.y
                    )?;
                }
            }
            Command::Snapshot => {
                let json = self
                    .coordinator
                    .registry()
                    .snapshot()
                    .to_json()
                    .map_err(io::Error::other)?;
                writeln!(out, "{json}")?;
            }
            Command::Check => {
                let report = self.coordinator.registry().invariant_report();
                if report.has_errors() {
                    tracing::warn!(issues = report.issues.len(), "invariant check failed");
                }
                writeln!(out, "check: {report}")?;
            }
        }
        Ok(())
    }
}

fn write_promotion(out: &mut impl Write, promotion: &Promotion) -> io::Result<()> {
    match (&promotion.demoted, promotion.changed) {
        (_, false) => writeln!(out, "{} already in front", promotion.owner),
        (Some(demoted), true) => writeln!(out, "promoted {} over {demoted}", promotion.owner),
        (None, true) => writeln!(out, "promoted {}", promotion.owner),
    }
}
