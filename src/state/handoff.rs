//! Navigation Hand-off - Finishing a section request on another page.
//!
//! A nav link clicked on a page without sections (a project detail page)
//! cannot scroll anywhere. The request travels with the route change instead
//! and the destination page completes it once its sections are mounted.
//!
//! # State Machine
//!
//! ```text
//! Idle ──request(id)──▶ Pending(id) ──arm(now)──▶ Pending(id), armed
//!   ▲                                                  │
//!   └────────────── poll(now) fires exactly once ◀─────┘
//! ```
//!
//! When an armed hand-off fires depends on [`SettleMode`]:
//! - `Readiness` - as soon as the target section is registered, or after
//!   the timeout if it never shows up
//! - `FixedDelay` - a fixed delay after the destination mounted
//!
//! `cancel()` (page unmount) drops an armed hand-off so it can never fire
//! into a detached page.

use std::time::{Duration, Instant};

use log::debug;
use serde::{Deserialize, Serialize};

use crate::engine::SectionRegistry;
use crate::types::SectionId;

/// When an armed hand-off completes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SettleMode {
    /// Fire once the target section is registered.
    #[default]
    Readiness,
    /// Fire after a fixed delay regardless of registration.
    FixedDelay,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HandoffState {
    Idle,
    Pending(SectionId),
}

#[derive(Debug, Clone)]
pub struct Handoff {
    state: HandoffState,
    armed_at: Option<Instant>,
    mode: SettleMode,
    settle_delay: Duration,
    timeout: Duration,
}

impl Handoff {
    pub fn new(mode: SettleMode, settle_delay: Duration, timeout: Duration) -> Self {
        Self {
            state: HandoffState::Idle,
            armed_at: None,
            mode,
            settle_delay,
            timeout,
        }
    }

    pub fn state(&self) -> &HandoffState {
        &self.state
    }

    pub fn pending(&self) -> Option<&SectionId> {
        match &self.state {
            HandoffState::Pending(id) => Some(id),
            HandoffState::Idle => None,
        }
    }

    pub fn is_idle(&self) -> bool {
        self.state == HandoffState::Idle
    }

    pub fn is_armed(&self) -> bool {
        self.armed_at.is_some()
    }

    // =========================================================================
    // Transitions
    // =========================================================================

    /// A nav link targets a section this page cannot reach yet.
    ///
    /// A newer request replaces an older pending target.
    pub fn request(&mut self, id: impl Into<SectionId>) {
        let id = id.into();
        debug!("hand-off pending for section {id}");
        self.state = HandoffState::Pending(id);
        self.armed_at = None;
    }

    /// The destination page mounted carrying a pending target.
    pub fn arm(&mut self, id: impl Into<SectionId>, now: Instant) {
        let id = id.into();
        debug!("hand-off armed for section {id}");
        self.state = HandoffState::Pending(id);
        self.armed_at = Some(now);
    }

    /// Check whether the armed hand-off is due.
    ///
    /// Returns the target exactly once and moves back to `Idle`. Unarmed or
    /// idle hand-offs return `None`.
    pub fn poll(&mut self, now: Instant, registry: &SectionRegistry) -> Option<SectionId> {
        let armed_at = self.armed_at?;
        let HandoffState::Pending(target) = &self.state else {
            return None;
        };

        let elapsed = now.saturating_duration_since(armed_at);
        let due = match self.mode {
            SettleMode::Readiness => {
                registry.contains(target.as_str()) || elapsed >= self.timeout
            }
            SettleMode::FixedDelay => elapsed >= self.settle_delay,
        };
        if !due {
            return None;
        }

        let target = target.clone();
        debug!("hand-off firing for section {target} after {elapsed:?}");
        self.state = HandoffState::Idle;
        self.armed_at = None;
        Some(target)
    }

    /// Drop any pending or armed hand-off.
    pub fn cancel(&mut self) {
        if let HandoffState::Pending(id) = &self.state {
            debug!("hand-off for section {id} cancelled");
        }
        self.state = HandoffState::Idle;
        self.armed_at = None;
    }
}

// =============================================================================
// TESTS
// =============================================================================
