#![forbid(unsafe_code)]

//! Structural self-check for a [`PanelRegistry`].
//!
//! The registry maintains its invariants by construction; this report exists
//! so tests, fuzzers, and the harness can prove it after arbitrary operation
//! streams instead of trusting it.

use std::fmt;

use fpanel_core::{OwnerId, PanelKind};

use crate::registry::PanelRegistry;

/// Which invariant an issue violates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum InvariantCode {
    /// More than one group has `active = true`.
    MultipleActiveGroups,
    /// The active pointer and the groups' `active` flags disagree.
    ActivePointerMismatch,
    /// An inactive group holds no panels.
    EmptyGroup,
    /// Stack orders within a group are not `0..n` in storage order.
    NonDenseStackOrder,
    /// A panel's z-index is not the one its band and stack order demand.
    WrongZIndex,
    /// A present panel is marked invisible.
    InvisiblePanel,
    /// Two panels of one owner share a kind.
    DuplicateKind,
    /// A panel's owner differs from its group's owner.
    ForeignPanel,
}

/// One detected violation.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct InvariantIssue {
    pub code: InvariantCode,
    pub owner: Option<OwnerId>,
    pub detail: String,
}

/// Result of [`PanelRegistry::invariant_report`].
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize)]
pub struct InvariantReport {
    pub issues: Vec<InvariantIssue>,
}

impl InvariantReport {
    #[must_use]
    pub fn has_errors(&self) -> bool {
        !self.issues.is_empty()
    }

    /// Whether any issue carries `code`.
    #[must_use]
    pub fn has(&self, code: InvariantCode) -> bool {
        self.issues.iter().any(|issue| issue.code == code)
    }

    fn push(&mut self, code: InvariantCode, owner: Option<&OwnerId>, detail: String) {
        self.issues.push(InvariantIssue {
            code,
            owner: owner.cloned(),
            detail,
        });
    }
}

impl fmt::Display for InvariantReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.issues.is_empty() {
            return f.write_str("ok");
        }
        for (i, issue) in self.issues.iter().enumerate() {
            if i > 0 {
                f.write_str("\n")?;
            }
            match &issue.owner {
                Some(owner) => write!(f, "{:?} [{owner}]: {}", issue.code, issue.detail)?,
                None => write!(f, "{:?}: {}", issue.code, issue.detail)?,
            }
        }
        Ok(())
    }
}

impl PanelRegistry {
    /// Check every structural invariant and report what is broken.
    #[must_use]
    pub fn invariant_report(&self) -> InvariantReport {
        let mut report = InvariantReport::default();
        let bands = self.bands();

        let mut active_groups: Vec<&OwnerId> = self
            .groups()
            .filter(|group| group.is_active())
            .map(|group| group.owner())
            .collect();
        active_groups.sort();

        if active_groups.len() > 1 {
            report.push(
                InvariantCode::MultipleActiveGroups,
                None,
                format!("active groups: {active_groups:?}"),
            );
        }
        let pointer = self.active_owner();
        let consistent = match pointer {
            Some(owner) => active_groups.as_slice() == [owner],
            None => active_groups.is_empty(),
        };
        if !consistent {
            report.push(
                InvariantCode::ActivePointerMismatch,
                pointer,
                format!("pointer {pointer:?} vs flags {active_groups:?}"),
            );
        }

        for group in self.groups() {
            let owner = group.owner();
            if group.is_empty() && !group.is_active() {
                report.push(InvariantCode::EmptyGroup, Some(owner), "no panels".into());
            }

            let mut seen: Vec<PanelKind> = Vec::with_capacity(group.len());
            for (index, panel) in group.panels().iter().enumerate() {
                if panel.owner() != owner {
                    report.push(
                        InvariantCode::ForeignPanel,
                        Some(owner),
                        format!("{} belongs to {}", panel.kind(), panel.owner()),
                    );
                }
                if panel.stack_order() != index {
                    report.push(
                        InvariantCode::NonDenseStackOrder,
                        Some(owner),
                        format!(
                            "{} has stack_order {} at index {index}",
                            panel.kind(),
                            panel.stack_order()
                        ),
                    );
                }
                let expected = bands.z_for(group.is_active(), panel.stack_order());
                if panel.z_index() != expected {
                    report.push(
                        InvariantCode::WrongZIndex,
                        Some(owner),
                        format!(
                            "{} has z {} expected {expected}",
                            panel.kind(),
                            panel.z_index()
                        ),
                    );
                }
                if !panel.visible() {
                    report.push(
                        InvariantCode::InvisiblePanel,
                        Some(owner),
                        panel.kind().to_string(),
                    );
                }
                if seen.contains(&panel.kind()) {
                    report.push(
                        InvariantCode::DuplicateKind,
                        Some(owner),
                        panel.kind().to_string(),
                    );
                }
                seen.push(panel.kind());
            }
        }

        report
    }
}
