//! Host capabilities - The seams between the tracker and the page it runs in.
//!
//! The tracker never touches a document directly. A host (a browser
//! binding, the terminal renderer, a test fixture) implements these traits:
//!
//! - [`SectionHost`] - section discovery, geometry and the scroll position
//! - [`VisibilitySource`] - viewport-band observation of individual sections
//! - [`MutationSource`] - "the section subtree changed" notifications
//!
//! Push-model sources deliver their events through the page controller
//! (`handle_visibility`, `handle_subtree_changed`). Pull-model sources
//! override [`VisibilitySource::poll`] and are drained on layout changes.

use crate::types::{ScrollBehavior, SectionBounds, SectionId, Viewport, VisibilityEvent};

/// The document region that hosts sections.
pub trait SectionHost {
    /// All sections currently present, in document order.
    ///
    /// Returns `None` when the hosting region itself is not rendered yet.
    fn discover_sections(&self) -> Option<Vec<SectionId>>;

    /// Current viewport-relative bounds of a section, computed on demand.
    fn section_bounds(&self, id: &SectionId) -> Option<SectionBounds>;

    /// Size of the visible area.
    fn viewport(&self) -> Viewport;

    /// Current vertical scroll offset of the page.
    fn scroll_offset(&self) -> f32;

    /// Move the page to an absolute vertical offset.
    fn scroll_to(&mut self, top: f32, behavior: ScrollBehavior);
}

/// Observes sections against the viewport band.
pub trait VisibilitySource {
    /// Begin observing a section. Called once per registration.
    fn observe(&mut self, id: &SectionId);

    /// Stop observing a section.
    fn unobserve(&mut self, id: &SectionId);

    /// Release every observation.
    fn disconnect(&mut self);

    /// Drain pending events for pull-model sources.
    fn poll(&mut self, _host: &dyn SectionHost) -> Vec<VisibilityEvent> {
        Vec::new()
    }
}

/// Notifies when the section-hosting subtree changes.
pub trait MutationSource {
    fn connect(&mut self);
    fn disconnect(&mut self);
}

/// A mutation source for hosts that report subtree changes some other way.
#[derive(Debug, Default)]
pub struct ManualMutations {
    connected: bool,
}

impl ManualMutations {
    pub fn is_connected(&self) -> bool {
        self.connected
    }
}

impl MutationSource for ManualMutations {
    fn connect(&mut self) {
        self.connected = true;
    }

    fn disconnect(&mut self) {
        self.connected = false;
    }
}
