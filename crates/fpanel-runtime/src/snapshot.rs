#![forbid(unsafe_code)]

//! Deterministic diagnostic snapshots of registry state.
//!
//! The registry keys groups by hash, so its iteration order is arbitrary. A
//! [`RegistrySnapshot`] sorts owners by id and each owner's panels by open
//! stamp, so two registries that went through the same operations serialize
//! identically. Snapshots are for logs and bug reports; they are never read
//! back into a registry.

use serde::Serialize;

use fpanel_core::{OwnerId, PanelKind};

use crate::promotion::ZBands;
use crate::registry::{PanelRegistry, Stamp};

/// Snapshot of one panel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PanelRecord {
    pub kind: PanelKind,
    pub stack_order: usize,
    pub z_index: i32,
    pub opened_at: Stamp,
}

/// Snapshot of one owner's group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GroupRecord {
    pub owner: OwnerId,
    pub active: bool,
    pub last_activity_at: Stamp,
    /// Sorted by `opened_at`.
    pub panels: Vec<PanelRecord>,
}

/// Snapshot of a whole registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegistrySnapshot {
    pub bands: ZBands,
    pub active_owner: Option<OwnerId>,
    pub panel_count: usize,
    /// Sorted by owner id.
    pub groups: Vec<GroupRecord>,
}

impl RegistrySnapshot {
    /// Serialize to pretty JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Deterministic FNV-1a hash of the structural state (not the stamps).
    ///
    /// Stable across runs and toolchains; intended for replay diagnostics.
    #[must_use]
    pub fn state_hash(&self) -> u64 {
        const OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;
        const PRIME: u64 = 0x0000_0001_0000_01b3;

        fn mix(hash: &mut u64, byte: u8) {
            *hash ^= u64::from(byte);
            *hash = hash.wrapping_mul(PRIME);
        }

        fn mix_bytes(hash: &mut u64, bytes: &[u8]) {
            for byte in bytes {
                mix(hash, *byte);
            }
        }

        fn mix_u64(hash: &mut u64, value: u64) {
            mix_bytes(hash, &value.to_le_bytes());
        }

        fn mix_str(hash: &mut u64, value: &str) {
            mix_u64(hash, value.len() as u64);
            mix_bytes(hash, value.as_bytes());
        }

        let mut hash = OFFSET_BASIS;
        mix_bytes(&mut hash, &self.bands.inactive_base().to_le_bytes());
        mix_bytes(&mut hash, &self.bands.active_base().to_le_bytes());
        match &self.active_owner {
            Some(owner) => {
                mix(&mut hash, 1);
                mix_str(&mut hash, owner);
            }
            None => mix(&mut hash, 0),
        }
        mix_u64(&mut hash, self.groups.len() as u64);
        for group in &self.groups {
            mix_str(&mut hash, &group.owner);
            mix(&mut hash, u8::from(group.active));
            mix_u64(&mut hash, group.panels.len() as u64);
            for panel in &group.panels {
                mix_str(&mut hash, panel.kind.slug());
                mix_u64(&mut hash, panel.stack_order as u64);
                mix_bytes(&mut hash, &panel.z_index.to_le_bytes());
            }
        }
        hash
    }
}

impl PanelRegistry {
    /// Capture a deterministic snapshot of the current state.
    #[must_use]
    pub fn snapshot(&self) -> RegistrySnapshot {
        let mut groups: Vec<GroupRecord> = self
            .groups()
            .map(|group| {
                let mut panels: Vec<PanelRecord> = group
                    .panels()
                    .iter()
                    .map(|p| PanelRecord {
                        kind: p.kind(),
                        stack_order: p.stack_order(),
                        z_index: p.z_index(),
                        opened_at: p.opened_at(),
                    })
                    .collect();
                panels.sort_by_key(|p| p.opened_at);
                GroupRecord {
                    owner: group.owner().clone(),
                    active: group.is_active(),
                    last_activity_at: group.last_activity_at(),
                    panels,
                }
            })
            .collect();
        groups.sort_by(|a, b| a.owner.cmp(&b.owner));

        RegistrySnapshot {
            bands: self.bands(),
            active_owner: self.active_owner().cloned(),
            panel_count: self.panel_count(),
            groups,
        }
    }
}
