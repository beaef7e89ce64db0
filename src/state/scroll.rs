//! Scroll Controller - Section ids to physical scroll positions.
//!
//! Manages page scrolling:
//! - Scroll-to-section with a fixed header clearance
//! - Offsets recomputed at call time (layout may have shifted since)
//! - Unknown or unmounted sections are a silent no-op
//! - Page scroll progress for the progress indicator
//!
//! Architecture:
//! - section geometry = host state (read on demand, never cached)
//! - header offset = configuration

use log::{debug, trace};

use crate::engine::{SectionHost, SectionRegistry};
use crate::types::ScrollBehavior;

// =============================================================================
// SCROLL CONSTANTS
// =============================================================================

/// Height of the fixed header that a scrolled-to section must clear.
pub const HEADER_OFFSET: f32 = 80.0;

// =============================================================================
// SCROLL CONTROLLER
// =============================================================================

#[derive(Debug, Clone, Copy)]
pub struct ScrollController {
    header_offset: f32,
    behavior: ScrollBehavior,
}

impl Default for ScrollController {
    fn default() -> Self {
        Self::new(HEADER_OFFSET)
    }
}

impl ScrollController {
    pub fn new(header_offset: f32) -> Self {
        Self {
            header_offset,
            behavior: ScrollBehavior::Smooth,
        }
    }

    pub fn with_behavior(mut self, behavior: ScrollBehavior) -> Self {
        self.behavior = behavior;
        self
    }

    pub fn header_offset(&self) -> f32 {
        self.header_offset
    }

    /// Absolute page offset that brings a section just below the header.
    ///
    /// Returns `None` if the section is not registered or the host cannot
    /// measure it.
    pub fn target_offset(
        &self,
        id: &str,
        registry: &SectionRegistry,
        host: &dyn SectionHost,
    ) -> Option<f32> {
        if !registry.contains(id) {
            return None;
        }
        let bounds = host.section_bounds(&id.into())?;
        Some((bounds.top + host.scroll_offset() - self.header_offset).max(0.0))
    }

    /// Scroll the host to a section.
    ///
    /// Returns `true` if a scroll was issued.
    pub fn scroll_to(
        &self,
        id: &str,
        registry: &SectionRegistry,
        host: &mut dyn SectionHost,
    ) -> bool {
        let Some(top) = self.target_offset(id, registry, host) else {
            trace!("scroll_to({id}): section not mounted");
            return false;
        };

        debug!("scrolling to section {id} at {top}");
        host.scroll_to(top, self.behavior);
        true
    }
}

// =============================================================================
// SCROLL PROGRESS
// =============================================================================

/// Fraction of the page scrolled, in `[0, 1]`.
///
/// A page that fits in the viewport reports 0.
pub fn scroll_progress(scroll_offset: f32, document_height: f32, viewport_height: f32) -> f32 {
    let max_scroll = document_height - viewport_height;
    if max_scroll <= 0.0 {
        return 0.0;
    }
    (scroll_offset / max_scroll).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::VisibilitySource;
    use crate::types::{SectionBounds, SectionId, Viewport};

    struct NullSource;

    impl VisibilitySource for NullSource {
        fn observe(&mut self, _id: &SectionId) {}
        fn unobserve(&mut self, _id: &SectionId) {}
        fn disconnect(&mut self) {}
    }

    struct Page {
        tops: Vec<(&'static str, f32)>,
        scroll: f32,
        scrolls: Vec<(f32, ScrollBehavior)>,
    }

    impl SectionHost for Page {
        fn discover_sections(&self) -> Option<Vec<SectionId>> {
            Some(self.tops.iter().map(|t| SectionId::from(t.0)).collect())
        }

        fn section_bounds(&self, id: &SectionId) -> Option<SectionBounds> {
            self.tops
                .iter()
                .find(|t| *id == t.0)
                .map(|t| SectionBounds::new(t.1 - self.scroll, 500.0))
        }

        fn viewport(&self) -> Viewport {
            Viewport::new(1200.0, 800.0)
        }

        fn scroll_offset(&self) -> f32 {
            self.scroll
        }

        fn scroll_to(&mut self, top: f32, behavior: ScrollBehavior) {
            self.scroll = top;
            self.scrolls.push((top, behavior));
        }
    }

    fn setup() -> (SectionRegistry, Page) {
        let page = Page {
            tops: vec![("home", 0.0), ("about", 900.0), ("works", 1800.0)],
            scroll: 0.0,
            scrolls: Vec::new(),
        };
        let mut registry = SectionRegistry::new(Box::new(NullSource));
        registry.rescan(&page);
        (registry, page)
    }

    #[test]
    fn test_scroll_subtracts_header_offset() {
        let (registry, mut page) = setup();
        let scroll = ScrollController::default();

        assert!(scroll.scroll_to("about", &registry, &mut page));
        assert_eq!(page.scrolls, vec![(820.0, ScrollBehavior::Smooth)]);
    }

    #[test]
    fn test_offset_recomputed_after_layout_shift() {
        let (registry, mut page) = setup();
        let scroll = ScrollController::default();

        page.scroll = 300.0;
        assert_eq!(scroll.target_offset("works", &registry, &page), Some(1720.0));

        // An image above "works" finished loading
        page.tops[2].1 = 2100.0;
        assert_eq!(scroll.target_offset("works", &registry, &page), Some(2020.0));
    }

    #[test]
    fn test_target_never_negative() {
        let (registry, page) = setup();
        let scroll = ScrollController::default();

        assert_eq!(scroll.target_offset("home", &registry, &page), Some(0.0));
    }

    #[test]
    fn test_unregistered_section_is_noop() {
        let (mut registry, mut page) = setup();
        let scroll = ScrollController::default();

        assert!(!scroll.scroll_to("contact", &registry, &mut page));

        registry.unregister("works");
        assert!(!scroll.scroll_to("works", &registry, &mut page));
        assert!(page.scrolls.is_empty());
    }

    #[test]
    fn test_instant_behavior() {
        let (registry, mut page) = setup();
        let scroll = ScrollController::new(0.0).with_behavior(ScrollBehavior::Instant);

        scroll.scroll_to("works", &registry, &mut page);
        assert_eq!(page.scrolls, vec![(1800.0, ScrollBehavior::Instant)]);
    }

    #[test]
    fn test_scroll_progress() {
        assert_eq!(scroll_progress(0.0, 2000.0, 1000.0), 0.0);
        assert!((scroll_progress(500.0, 2000.0, 1000.0) - 0.5).abs() < 0.001);
        assert_eq!(scroll_progress(1500.0, 2000.0, 1000.0), 1.0);
        assert_eq!(scroll_progress(-10.0, 2000.0, 1000.0), 0.0);
    }

    #[test]
    fn test_scroll_progress_short_page() {
        assert_eq!(scroll_progress(0.0, 500.0, 1000.0), 0.0);
        assert_eq!(scroll_progress(0.0, 1000.0, 1000.0), 0.0);
    }

    #[test]
    fn test_constants() {
        assert!((HEADER_OFFSET - 80.0).abs() < 0.001);
    }
}
