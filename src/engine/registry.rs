//! Section Registry - The live set of observable sections.
//!
//! Tracks which sections currently exist in the document:
//! - Registration order for deterministic iteration
//! - A membership signal (deriveds react to add/remove)
//! - Visibility observation begins on register, ends on unregister
//! - Re-scan against the host picks up lazily mounted sections and drops
//!   sections that left the document
//!
//! The registry holds identifiers only. Geometry is always looked up on the
//! host at the moment it is needed.

use log::{debug, trace};
use spark_signals::{signal, Signal};

use super::host::{SectionHost, VisibilitySource};
use crate::types::{SectionId, VisibilityEvent};

/// What a re-scan found.
#[derive(Debug, Clone, PartialEq)]
pub enum Rescan {
    /// The hosting region is not in the document yet. Nothing changed.
    HostMissing,
    /// The host was scanned; lists what was added and removed.
    Scanned {
        added: Vec<SectionId>,
        removed: Vec<SectionId>,
    },
}

impl Rescan {
    /// Check if the scan changed membership.
    pub fn changed(&self) -> bool {
        match self {
            Rescan::HostMissing => false,
            Rescan::Scanned { added, removed } => !added.is_empty() || !removed.is_empty(),
        }
    }
}

pub struct SectionRegistry {
    /// Registration order.
    order: Vec<SectionId>,
    /// Snapshot of `order`, republished on every membership change.
    members: Signal<Vec<SectionId>>,
    visibility: Box<dyn VisibilitySource>,
}

impl SectionRegistry {
    pub fn new(visibility: Box<dyn VisibilitySource>) -> Self {
        Self {
            order: Vec::new(),
            members: signal(Vec::new()),
            visibility,
        }
    }

    // =========================================================================
    // Membership
    // =========================================================================

    /// Begin observing a section.
    ///
    /// Idempotent: registering an id that is already tracked does nothing
    /// and returns `false`.
    pub fn register(&mut self, id: impl Into<SectionId>) -> bool {
        let id = id.into();
        if self.order.contains(&id) {
            trace!("section {id} already registered");
            return false;
        }

        self.visibility.observe(&id);
        debug!("registered section {id}");
        self.order.push(id);
        self.publish();
        true
    }

    /// Stop observing a section. Returns `false` if it was not tracked.
    pub fn unregister(&mut self, id: &str) -> bool {
        let Some(pos) = self.order.iter().position(|s| s == id) else {
            return false;
        };

        let id = self.order.remove(pos);
        self.visibility.unobserve(&id);
        self.publish();
        debug!("unregistered section {id}");
        true
    }

    /// Re-discover every section on the host.
    ///
    /// New sections are registered, vanished ones unregistered. When the
    /// host region is absent this is a no-op; the next mutation retries.
    pub fn rescan(&mut self, host: &dyn SectionHost) -> Rescan {
        let Some(present) = host.discover_sections() else {
            trace!("section host not rendered, skipping re-scan");
            return Rescan::HostMissing;
        };

        let removed: Vec<SectionId> = self
            .order
            .iter()
            .filter(|id| !present.contains(*id))
            .cloned()
            .collect();
        for id in &removed {
            self.unregister(id.as_str());
        }

        let mut added = Vec::new();
        for id in present {
            if self.register(id.clone()) {
                added.push(id);
            }
        }

        Rescan::Scanned { added, removed }
    }

    // =========================================================================
    // Lookups
    // =========================================================================

    pub fn contains(&self, id: &str) -> bool {
        self.order.iter().any(|s| s == id)
    }

    /// Registered ids in registration order.
    pub fn ids(&self) -> &[SectionId] {
        &self.order
    }

    /// Registered ids, read through the membership signal.
    ///
    /// Creates a reactive dependency when called from a derived/effect.
    pub fn tracked_ids(&self) -> Vec<SectionId> {
        self.members.get()
    }

    fn publish(&self) {
        self.members.set(self.order.clone());
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    // =========================================================================
    // Observation
    // =========================================================================

    /// Drain events from a pull-model visibility source.
    ///
    /// Events naming sections that are no longer registered are dropped.
    pub fn poll_visibility(&mut self, host: &dyn SectionHost) -> Vec<VisibilityEvent> {
        let events = self.visibility.poll(host);
        events
            .into_iter()
            .filter(|event| self.contains(event.id.as_str()))
            .collect()
    }

    /// Release every observation and forget all sections.
    pub fn disconnect(&mut self) {
        self.visibility.disconnect();
        self.order.clear();
        self.publish();
        debug!("section registry disconnected");
    }
}
