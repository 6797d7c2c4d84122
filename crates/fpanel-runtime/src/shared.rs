#![forbid(unsafe_code)]

//! Thread-safe handle to a [`PanelCoordinator`].
//!
//! Every method takes the lock exactly once, so a promotion's demote,
//! activate, and z re-derivation are observed together by other threads.
//! Clones share state.

use std::sync::{Arc, Mutex, MutexGuard};

use web_time::Instant;

use fpanel_core::{ActivityTrigger, CanvasPoint, OwnerId, PanelKind};

use crate::coordinator::{PanelCoordinator, RenderedPanel};
use crate::promotion::Promotion;
use crate::registry::OpenOutcome;
use crate::snapshot::RegistrySnapshot;

/// `Arc<Mutex<PanelCoordinator>>` with the coordinator's API.
#[derive(Debug, Clone, Default)]
pub struct SharedPanelCoordinator {
    inner: Arc<Mutex<PanelCoordinator>>,
}

impl SharedPanelCoordinator {
    #[must_use]
    pub fn new(coordinator: PanelCoordinator) -> Self {
        Self {
            inner: Arc::new(Mutex::new(coordinator)),
        }
    }

    /// Run `f` with exclusive access to the coordinator.
    pub fn with<R>(&self, f: impl FnOnce(&mut PanelCoordinator) -> R) -> R {
        f(&mut self.lock())
    }

    pub fn open(&self, owner: impl Into<OwnerId>, kind: PanelKind) -> OpenOutcome {
        self.lock().open(owner, kind)
    }

    pub fn close(&self, owner: &str, kind: PanelKind) -> bool {
        self.lock().close(owner, kind)
    }

    pub fn toggle(&self, owner: impl Into<OwnerId>, kind: PanelKind) -> bool {
        self.lock().toggle(owner, kind)
    }

    pub fn promote(&self, owner: impl Into<OwnerId>) -> Promotion {
        self.lock().promote(owner)
    }

    pub fn notify_activity(
        &self,
        owner: impl Into<OwnerId>,
        trigger: ActivityTrigger,
        now: Instant,
    ) -> Option<Promotion> {
        self.lock().notify_activity(owner, trigger, now)
    }

    pub fn node_removed(&self, owner: &str) -> usize {
        self.lock().node_removed(owner)
    }

    #[must_use]
    pub fn is_open(&self, owner: &str, kind: PanelKind) -> bool {
        self.lock().is_open(owner, kind)
    }

    #[must_use]
    pub fn active_owner(&self) -> Option<OwnerId> {
        self.lock().registry().active_owner().cloned()
    }

    pub fn render_list<F>(&self, node_position: F) -> Vec<RenderedPanel>
    where
        F: Fn(&OwnerId) -> Option<CanvasPoint>,
    {
        self.lock().render_list(node_position)
    }

    #[must_use]
    pub fn snapshot(&self) -> RegistrySnapshot {
        self.lock().registry().snapshot()
    }

    // State is consistent between operations, so a poisoned lock is safe to reuse.
    fn lock(&self) -> MutexGuard<'_, PanelCoordinator> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }
}
