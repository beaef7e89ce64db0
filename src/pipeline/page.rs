//! Page Controller - Composes the tracker for one section-hosting page.
//!
//! The controller exclusively owns the mutable state of the tracker:
//! - The section registry (and through it the visibility source)
//! - The active section
//! - The armed navigation hand-off
//!
//! Hosts feed it events; navigation handlers call `scroll_to` and
//! `request_navigation`. Nothing is global, so two pages (or two tests)
//! never share state.
//!
//! # Lifecycle
//!
//! ```text
//! new ──mount(router, now)──▶ mounted ──unmount()/drop──▶ detached
//!                               │
//!     handle_visibility ────────┤ active section updates
//!     handle_subtree_changed ───┤ re-scan, hand-off readiness
//!     refresh_visibility ───────┤ pull-model sources
//!     tick(now) ────────────────┘ hand-off settle/timeout
//! ```
//!
//! Unmount releases every observation, disconnects the mutation source,
//! cancels the hand-off and drops change callbacks. Events delivered to a
//! detached controller are ignored.
//!
//! # Example
//!
//! ```ignore
//! use spark_folio::pipeline::{MemoryRouter, PageController, PageOptions};
//!
//! let mut page = PageController::new(host, visibility, mutations, PageOptions::default());
//! page.mount(&mut router, Instant::now());
//!
//! // Nav link clicked
//! page.request_navigation("works", &mut router, Instant::now());
//! ```

use std::time::{Duration, Instant};

use log::{debug, trace};

use super::router::{Route, RouteLayer, TransitionState};
use crate::engine::{MutationSource, Rescan, SectionHost, SectionRegistry, VisibilitySource};
use crate::state::{ActiveSection, Handoff, ScrollController, SettleMode, HEADER_OFFSET};
use crate::types::{ScrollBehavior, SectionId, VisibilityEvent};

// =============================================================================
// OPTIONS
// =============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct PageOptions {
    pub header_offset: f32,
    pub scroll_behavior: ScrollBehavior,
    pub settle_mode: SettleMode,
    pub settle_delay: Duration,
    pub handoff_timeout: Duration,
    /// Section highlighted before any observation arrives.
    pub initial_section: Option<SectionId>,
}

impl Default for PageOptions {
    fn default() -> Self {
        Self {
            header_offset: HEADER_OFFSET,
            scroll_behavior: ScrollBehavior::Smooth,
            settle_mode: SettleMode::Readiness,
            settle_delay: Duration::from_millis(100),
            handoff_timeout: Duration::from_millis(1500),
            initial_section: Some(SectionId::from("home")),
        }
    }
}

// =============================================================================
// PAGE CONTROLLER
// =============================================================================

pub struct PageController<H: SectionHost> {
    host: H,
    registry: SectionRegistry,
    mutations: Box<dyn MutationSource>,
    active: ActiveSection,
    scroll: ScrollController,
    handoff: Handoff,
    mounted: bool,
}

impl<H: SectionHost> PageController<H> {
    pub fn new(
        host: H,
        visibility: Box<dyn VisibilitySource>,
        mutations: Box<dyn MutationSource>,
        options: PageOptions,
    ) -> Self {
        Self {
            host,
            registry: SectionRegistry::new(visibility),
            mutations,
            active: ActiveSection::with_initial(options.initial_section),
            scroll: ScrollController::new(options.header_offset)
                .with_behavior(options.scroll_behavior),
            handoff: Handoff::new(
                options.settle_mode,
                options.settle_delay,
                options.handoff_timeout,
            ),
            mounted: false,
        }
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Attach to the page.
    ///
    /// Discovers the sections already present, starts listening for subtree
    /// changes and arms the hand-off if the route carried a pending target.
    pub fn mount(&mut self, router: &mut dyn RouteLayer, now: Instant) {
        if self.mounted {
            return;
        }
        self.mounted = true;
        self.mutations.connect();
        self.registry.rescan(&self.host);
        debug!("page mounted with {} sections", self.registry.len());

        if let Some(target) = router.transition_state().target_id {
            self.handoff.arm(target, now);
        }

        self.refresh_visibility();
        self.settle(now, router);
    }

    /// Detach from the page, releasing every subscription.
    pub fn unmount(&mut self) {
        if !self.mounted {
            return;
        }
        self.mounted = false;
        self.handoff.cancel();
        self.registry.disconnect();
        self.mutations.disconnect();
        self.active.clear_listeners();
        debug!("page unmounted");
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    // =========================================================================
    // Event intake
    // =========================================================================

    /// Visibility events from a push-model source.
    ///
    /// Returns `true` if the active section changed.
    pub fn handle_visibility(&mut self, events: &[VisibilityEvent]) -> bool {
        if !self.mounted {
            trace!("dropping {} visibility events after unmount", events.len());
            return false;
        }
        self.active.apply(events, &self.registry)
    }

    /// The section-hosting subtree changed.
    ///
    /// Re-scans the host, reports the initial state of new sections and
    /// completes a hand-off waiting on one of them.
    pub fn handle_subtree_changed(&mut self, now: Instant, router: &mut dyn RouteLayer) -> Rescan {
        if !self.mounted {
            return Rescan::HostMissing;
        }

        let outcome = self.registry.rescan(&self.host);
        if outcome.changed() {
            self.refresh_visibility();
        }
        self.settle(now, router);
        outcome
    }

    /// Drain a pull-model visibility source after layout or scroll changed.
    ///
    /// Returns `true` if the active section changed.
    pub fn refresh_visibility(&mut self) -> bool {
        if !self.mounted {
            return false;
        }
        let events = self.registry.poll_visibility(&self.host);
        if events.is_empty() {
            return false;
        }
        self.active.apply(&events, &self.registry)
    }

    /// Advance timers. Completes a hand-off whose settle delay or timeout
    /// elapsed.
    pub fn tick(&mut self, now: Instant, router: &mut dyn RouteLayer) -> Option<SectionId> {
        if !self.mounted {
            return None;
        }
        self.settle(now, router)
    }

    fn settle(&mut self, now: Instant, router: &mut dyn RouteLayer) -> Option<SectionId> {
        let target = self.handoff.poll(now, &self.registry)?;

        if !self.scroll.scroll_to(target.as_str(), &self.registry, &mut self.host) {
            debug!("hand-off target {target} never mounted, highlighting only");
        }
        self.active.activate(target.clone());
        router.clear_transition_state();
        Some(target)
    }

    // =========================================================================
    // Navigation
    // =========================================================================

    /// Scroll to a section. A no-op when it is not registered.
    pub fn scroll_to(&mut self, id: &str) -> bool {
        if !self.mounted {
            return false;
        }
        self.scroll.scroll_to(id, &self.registry, &mut self.host)
    }

    /// A nav link for `id` was activated on this page.
    ///
    /// A registered section is scrolled to and highlighted at once. A section
    /// that has not mounted yet becomes the pending target of the current
    /// route and is completed by the hand-off once it registers.
    pub fn request_navigation(
        &mut self,
        id: impl Into<SectionId>,
        router: &mut dyn RouteLayer,
        now: Instant,
    ) {
        let id = id.into();
        if !self.mounted {
            return;
        }

        if self.registry.contains(id.as_str()) {
            // A newer click supersedes a target still waiting to mount
            if !self.handoff.is_idle() {
                self.handoff.cancel();
                router.clear_transition_state();
            }
            self.scroll.scroll_to(id.as_str(), &self.registry, &mut self.host);
            self.active.activate(id);
            return;
        }

        debug!("section {id} not mounted yet, deferring to hand-off");
        router.replace(Route::Home, TransitionState::target(id.clone()));
        self.handoff.arm(id, now);
        self.settle(now, router);
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn active(&self) -> &ActiveSection {
        &self.active
    }

    /// Register a change callback on the active section.
    /// Returns cleanup function to unregister. Unmount drops it too.
    pub fn subscribe(
        &mut self,
        listener: impl Fn(Option<&SectionId>) + 'static,
    ) -> Box<dyn FnOnce()> {
        self.active.subscribe(listener)
    }

    pub fn registry(&self) -> &SectionRegistry {
        &self.registry
    }

    pub fn handoff(&self) -> &Handoff {
        &self.handoff
    }

    pub fn scroll_controller(&self) -> &ScrollController {
        &self.scroll
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }
}

impl<H: SectionHost> Drop for PageController<H> {
    fn drop(&mut self) {
        self.unmount();
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::ManualMutations;
    use crate::pipeline::{request_section, MemoryRouter};
    use crate::state::BandVisibility;
    use crate::types::{SectionBounds, Viewport, ViewportBand};
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    /// Sections stacked 1000 units apart; `None` sections = host not rendered.
    struct Document {
        sections: Option<Vec<&'static str>>,
        scroll: f32,
        scrolls: Vec<f32>,
    }

    impl Document {
        fn with(ids: &[&'static str]) -> Self {
            Self {
                sections: Some(ids.to_vec()),
                scroll: 0.0,
                scrolls: Vec::new(),
            }
        }

        fn mount_section(&mut self, id: &'static str) {
            self.sections.get_or_insert_with(Vec::new).push(id);
        }
    }

    impl SectionHost for Document {
        fn discover_sections(&self) -> Option<Vec<SectionId>> {
            self.sections
                .as_ref()
                .map(|ids| ids.iter().map(|id| SectionId::from(*id)).collect())
        }

        fn section_bounds(&self, id: &SectionId) -> Option<SectionBounds> {
            let ids = self.sections.as_ref()?;
            let pos = ids.iter().position(|s| *id == *s)?;
            Some(SectionBounds::new(pos as f32 * 1000.0 - self.scroll, 1000.0))
        }

        fn viewport(&self) -> Viewport {
            Viewport::new(1280.0, 1000.0)
        }

        fn scroll_offset(&self) -> f32 {
            self.scroll
        }

        fn scroll_to(&mut self, top: f32, _behavior: ScrollBehavior) {
            self.scroll = top;
            self.scrolls.push(top);
        }
    }

    struct FlagMutations(Rc<Cell<bool>>);

    impl MutationSource for FlagMutations {
        fn connect(&mut self) {
            self.0.set(true);
        }

        fn disconnect(&mut self) {
            self.0.set(false);
        }
    }

    fn setup(doc: Document, options: PageOptions) -> (PageController<Document>, Rc<Cell<bool>>) {
        let connected = Rc::new(Cell::new(false));
        let page = PageController::new(
            doc,
            Box::new(BandVisibility::new(ViewportBand::default())),
            Box::new(FlagMutations(connected.clone())),
            options,
        );
        (page, connected)
    }

    #[test]
    fn test_mount_registers_present_sections() {
        let (mut page, connected) = setup(Document::with(&["home", "about"]), PageOptions::default());
        let mut router = MemoryRouter::default();

        page.mount(&mut router, Instant::now());

        assert!(connected.get());
        assert_eq!(page.registry().len(), 2);
        assert!(page.active().is_active("home"));
    }

    #[test]
    fn test_missing_host_retried_on_mutation() {
        let doc = Document {
            sections: None,
            scroll: 0.0,
            scrolls: Vec::new(),
        };
        let (mut page, _) = setup(doc, PageOptions::default());
        let mut router = MemoryRouter::default();
        let now = Instant::now();

        page.mount(&mut router, now);
        assert!(page.registry().is_empty());

        page.host_mut().mount_section("home");
        let outcome = page.handle_subtree_changed(now, &mut router);
        assert!(outcome.changed());
        assert!(page.registry().contains("home"));
    }

    #[test]
    fn test_late_section_becomes_eligible() {
        let (mut page, _) = setup(Document::with(&["home", "about"]), PageOptions::default());
        let mut router = MemoryRouter::default();
        let now = Instant::now();
        page.mount(&mut router, now);

        assert!(!page.handle_visibility(&[VisibilityEvent::entered("works")]));

        page.host_mut().mount_section("works");
        page.handle_subtree_changed(now, &mut router);

        assert!(page.handle_visibility(&[VisibilityEvent::entered("works")]));
        assert!(page.active().is_active("works"));
    }

    #[test]
    fn test_scroll_updates_active_through_pull_source() {
        let (mut page, _) = setup(
            Document::with(&["home", "about", "works"]),
            PageOptions::default(),
        );
        let mut router = MemoryRouter::default();
        page.mount(&mut router, Instant::now());

        // Band spans 200..400 of a 1000 tall viewport
        page.host_mut().scroll = 1000.0;
        assert!(page.refresh_visibility());
        assert!(page.active().is_active("about"));
    }

    #[test]
    fn test_nav_click_on_registered_section() {
        let (mut page, _) = setup(
            Document::with(&["home", "about", "works"]),
            PageOptions::default(),
        );
        let mut router = MemoryRouter::default();
        let now = Instant::now();
        page.mount(&mut router, now);

        page.request_navigation("works", &mut router, now);

        assert_eq!(page.host().scrolls, vec![1920.0]);
        assert!(page.active().is_active("works"));
        assert!(page.handoff().is_idle());
        assert!(router.transition_state().is_empty());
    }

    #[test]
    fn test_nav_click_on_lazy_section_waits_for_mount() {
        let (mut page, _) = setup(Document::with(&["home", "about"]), PageOptions::default());
        let mut router = MemoryRouter::default();
        let now = Instant::now();
        page.mount(&mut router, now);

        page.request_navigation("contact", &mut router, now);
        assert!(page.host().scrolls.is_empty());
        assert_eq!(router.transition_state(), TransitionState::target("contact"));
        assert_eq!(router.depth(), 1);

        page.host_mut().mount_section("contact");
        page.handle_subtree_changed(now + Duration::from_millis(30), &mut router);

        assert_eq!(page.host().scrolls, vec![1920.0]);
        assert!(page.active().is_active("contact"));
        assert!(router.transition_state().is_empty());
    }

    #[test]
    fn test_handoff_from_other_page() {
        let mut router = MemoryRouter::new(Route::project("shop"));
        request_section(&mut router, "contact");

        let (mut page, _) = setup(Document::with(&["home", "about"]), PageOptions::default());
        let now = Instant::now();
        page.mount(&mut router, now);
        assert_eq!(page.handoff().pending(), Some(&SectionId::from("contact")));

        page.host_mut().mount_section("contact");
        page.handle_subtree_changed(now, &mut router);

        assert_eq!(page.host().scrolls.len(), 1);
        assert!(page.handoff().is_idle());

        // Unrelated re-mount does not replay
        page.unmount();
        page.mount(&mut router, now + Duration::from_secs(1));
        page.tick(now + Duration::from_secs(5), &mut router);
        assert_eq!(page.host().scrolls.len(), 1);
    }

    #[test]
    fn test_fixed_delay_handoff() {
        let options = PageOptions {
            settle_mode: SettleMode::FixedDelay,
            ..PageOptions::default()
        };
        let mut router = MemoryRouter::new(Route::project("shop"));
        request_section(&mut router, "about");

        let (mut page, _) = setup(Document::with(&["home", "about"]), options);
        let now = Instant::now();
        page.mount(&mut router, now);
        assert!(page.host().scrolls.is_empty());

        assert_eq!(page.tick(now + Duration::from_millis(50), &mut router), None);
        assert_eq!(
            page.tick(now + Duration::from_millis(100), &mut router),
            Some(SectionId::from("about"))
        );
        assert_eq!(page.host().scrolls, vec![920.0]);
    }

    #[test]
    fn test_handoff_timeout_highlights_without_scroll() {
        let mut router = MemoryRouter::new(Route::project("shop"));
        request_section(&mut router, "blog");

        let (mut page, _) = setup(Document::with(&["home"]), PageOptions::default());
        let now = Instant::now();
        page.mount(&mut router, now);

        page.tick(now + Duration::from_millis(1500), &mut router);

        assert!(page.host().scrolls.is_empty());
        assert!(page.active().is_active("blog"));
        assert!(router.transition_state().is_empty());
    }

    #[test]
    fn test_unmount_releases_everything() {
        let (mut page, connected) = setup(Document::with(&["home"]), PageOptions::default());
        let mut router = MemoryRouter::new(Route::project("shop"));
        request_section(&mut router, "contact");
        let now = Instant::now();
        page.mount(&mut router, now);

        let calls = Rc::new(Cell::new(0));
        let calls_clone = calls.clone();
        let _unsubscribe = page.subscribe(move |_| calls_clone.set(calls_clone.get() + 1));

        page.unmount();

        assert!(!connected.get());
        assert!(page.registry().is_empty());
        assert!(page.handoff().is_idle());
        assert_eq!(page.active().listener_count(), 0);

        // Timer and events after unmount are inert
        assert_eq!(page.tick(now + Duration::from_secs(10), &mut router), None);
        assert!(!page.handle_visibility(&[VisibilityEvent::entered("home")]));
        assert!(!page.scroll_to("home"));
        assert_eq!(calls.get(), 0);
    }

    #[test]
    fn test_drop_disconnects_mutations() {
        let (mut page, connected) = setup(Document::with(&["home"]), PageOptions::default());
        let mut router = MemoryRouter::default();
        page.mount(&mut router, Instant::now());
        assert!(connected.get());

        drop(page);
        assert!(!connected.get());
    }

    #[test]
    fn test_subscriber_sees_handoff_activation() {
        let (mut page, _) = setup(Document::with(&["home", "about"]), PageOptions::default());
        let seen = Rc::new(RefCell::new(Vec::new()));
        let seen_clone = seen.clone();
        let _unsubscribe = page.subscribe(move |id| {
            seen_clone.borrow_mut().push(id.map(|id| id.to_string()));
        });

        let mut router = MemoryRouter::new(Route::Projects);
        request_section(&mut router, "about");
        page.mount(&mut router, Instant::now());

        assert_eq!(*seen.borrow(), vec![Some("about".to_string())]);
    }

    #[test]
    fn test_manual_mutations_connect_on_mount() {
        let mut page = PageController::new(
            Document::with(&["home"]),
            Box::new(BandVisibility::new(ViewportBand::default())),
            Box::new(ManualMutations::default()),
            PageOptions::default(),
        );
        let mut router = MemoryRouter::default();
        page.mount(&mut router, Instant::now());
        assert!(page.is_mounted());
    }
}
