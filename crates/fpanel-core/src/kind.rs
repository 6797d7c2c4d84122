#![forbid(unsafe_code)]

//! Panel kinds and their metadata table.
//!
//! The registry only ever tracks the [`PanelKind`] tag. Anything a renderer
//! needs to know about a kind (its slug, its title) comes from the static
//! [`PanelKindInfo`] table, so adding a kind is one enum variant plus one
//! table row.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// The closed set of panel contents a node can show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PanelKind {
    /// Read-only overview of the node.
    Summary,
    /// Property editor form.
    Editor,
    /// Conversation thread attached to the node.
    Chat,
    /// Sharing and export options.
    Share,
    /// Node-specific tool palette.
    Tools,
}

/// Static metadata for one [`PanelKind`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PanelKindInfo {
    pub kind: PanelKind,
    /// Lowercase identifier used in scripts, configs, and serialized output.
    pub slug: &'static str,
    /// Human-readable panel title.
    pub title: &'static str,
}

static KIND_TABLE: [PanelKindInfo; PanelKind::COUNT] = [
    PanelKindInfo {
        kind: PanelKind::Summary,
        slug: "summary",
        title: "Summary",
    },
    PanelKindInfo {
        kind: PanelKind::Editor,
        slug: "editor",
        title: "Edit Properties",
    },
    PanelKindInfo {
        kind: PanelKind::Chat,
        slug: "chat",
        title: "Chat",
    },
    PanelKindInfo {
        kind: PanelKind::Share,
        slug: "share",
        title: "Share",
    },
    PanelKindInfo {
        kind: PanelKind::Tools,
        slug: "tools",
        title: "Tools",
    },
];

impl PanelKind {
    /// Number of panel kinds, and so the most panels one owner can have open.
    pub const COUNT: usize = 5;

    /// Every kind in canonical order.
    pub const ALL: [PanelKind; Self::COUNT] = [
        PanelKind::Summary,
        PanelKind::Editor,
        PanelKind::Chat,
        PanelKind::Share,
        PanelKind::Tools,
    ];

    /// Metadata row for this kind.
    #[inline]
    #[must_use]
    pub fn info(self) -> &'static PanelKindInfo {
        &KIND_TABLE[self as usize]
    }

    #[inline]
    #[must_use]
    pub fn slug(self) -> &'static str {
        self.info().slug
    }

    #[inline]
    #[must_use]
    pub fn title(self) -> &'static str {
        self.info().title
    }

    /// Look a kind up by slug, ignoring ASCII case.
    #[must_use]
    pub fn from_slug(slug: &str) -> Option<Self> {
        KIND_TABLE
            .iter()
            .find(|row| row.slug.eq_ignore_ascii_case(slug.trim()))
            .map(|row| row.kind)
    }
}

impl fmt::Display for PanelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

/// Error returned when parsing an unknown panel kind slug.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseKindError {
    pub input: String,
}

impl fmt::Display for ParseKindError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown panel kind {:?} (expected one of: ", self.input)?;
        for (i, kind) in PanelKind::ALL.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            f.write_str(kind.slug())?;
        }
        f.write_str(")")
    }
}

impl std::error::Error for ParseKindError {}

impl FromStr for PanelKind {
    type Err = ParseKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_slug(s).ok_or_else(|| ParseKindError {
            input: s.to_owned(),
        })
    }
}
