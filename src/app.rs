//! App - The terminal portfolio, one route at a time.
//!
//! Owns the router and whatever the current route shows:
//! - Home: a [`PageController`] over a [`TerminalDocument`], so the nav bar
//!   follows the section in view and nav keys scroll to sections
//! - Projects and project detail: a plain document without sections
//!
//! Nav keys pressed away from home go through [`request_section`]; the
//! fresh home page completes the jump once the section has mounted.
//!
//! # Frame loop
//!
//! ```text
//! event ──▶ handle(action) ──▶ router / form / scroll
//! tick  ──▶ document.advance ──▶ subtree changed? visibility? hand-off
//!       ──▶ progress spring
//! render ─▶ FrameBuffer (document, nav, progress, status)
//! ```

use std::time::{Duration, Instant};

use log::{debug, info, warn};

use crate::config::SiteConfig;
use crate::contact::{ContactError, ContactForm, EmailRelay, Field};
use crate::content::Portfolio;
use crate::engine::{ManualMutations, SectionHost};
use crate::pipeline::{
    MemoryRouter, PageController, Route, RouteLayer, TransitionState, redirect_unknown_project,
    request_section,
};
use crate::renderer::{
    Block, ContactView, FrameBuffer, NAV_ROWS, PROJECT_LIST_OFFSET, STATUS_ROWS, TerminalDocument,
    contact_paragraphs, home_blocks, paint_nav, paint_progress, paint_status, project_blocks,
    projects_blocks,
};
use crate::state::{Action, BandVisibility, InputMode, Spring, scroll_progress};
use crate::types::{ScrollBehavior, SectionId};

/// Blank rows between document blocks.
const BLOCK_GAP: u16 = 1;

pub struct App {
    config: SiteConfig,
    portfolio: Portfolio,
    router: MemoryRouter,
    /// Route the current document was built for
    shown: Option<Route>,
    home: Option<PageController<TerminalDocument>>,
    page: TerminalDocument,
    form: ContactForm,
    relay: Box<dyn EmailRelay>,
    editing: Option<Field>,
    notice: Option<String>,
    category: usize,
    selected: usize,
    progress: Spring,
    width: u16,
    height: u16,
    running: bool,
}

impl App {
    pub fn new(
        config: SiteConfig,
        portfolio: Portfolio,
        relay: Box<dyn EmailRelay>,
        initial: Route,
        (width, height): (u16, u16),
        now: Instant,
    ) -> Self {
        let form = ContactForm::new(config.contact_email.clone(), config.status_reset());
        let mut app = Self {
            config,
            portfolio,
            router: MemoryRouter::new(initial),
            shown: None,
            home: None,
            page: TerminalDocument::new(width, 0, BLOCK_GAP),
            form,
            relay,
            editing: None,
            notice: None,
            category: 0,
            selected: 0,
            progress: Spring::progress(),
            width,
            height,
            running: true,
        };
        let document_height = app.document_height();
        app.page.resize(width, document_height);
        app.sync_route(now);
        app
    }

    fn document_height(&self) -> u16 {
        self.height.saturating_sub(STATUS_ROWS)
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn route(&self) -> Route {
        self.router.current()
    }

    pub fn router(&self) -> &MemoryRouter {
        &self.router
    }

    pub fn input_mode(&self) -> InputMode {
        if self.editing.is_some() {
            InputMode::Editing
        } else {
            InputMode::Browse
        }
    }

    pub fn home(&self) -> Option<&PageController<TerminalDocument>> {
        self.home.as_ref()
    }

    /// The document of the current route.
    pub fn document(&self) -> &TerminalDocument {
        match &self.home {
            Some(page) => page.host(),
            None => &self.page,
        }
    }

    fn document_mut(&mut self) -> &mut TerminalDocument {
        match &mut self.home {
            Some(page) => page.host_mut(),
            None => &mut self.page,
        }
    }

    pub fn active_section(&self) -> Option<SectionId> {
        self.home.as_ref().and_then(|page| page.active().get())
    }

    pub fn form(&self) -> &ContactForm {
        &self.form
    }

    pub fn editing(&self) -> Option<Field> {
        self.editing
    }

    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    pub fn category(&self) -> &str {
        self.portfolio
            .categories()
            .get(self.category)
            .copied()
            .unwrap_or(crate::content::ALL_CATEGORIES)
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    pub fn progress(&self) -> f32 {
        self.progress.value()
    }

    // =========================================================================
    // Routes
    // =========================================================================

    /// Rebuild the page if the router moved to another route.
    fn sync_route(&mut self, now: Instant) {
        let portfolio = &self.portfolio;
        if redirect_unknown_project(&mut self.router, |slug| portfolio.project(slug).is_some()) {
            warn!("unknown project, showing home instead");
        }

        let route = self.router.current();
        if self.shown.as_ref() == Some(&route) {
            return;
        }
        info!("showing {route}");

        // Leaving home tears the controller down with its subscriptions
        self.home = None;
        self.editing = None;
        self.notice = None;

        match &route {
            Route::Home => self.build_home(now),
            Route::Projects => {
                let blocks = self.projects_page();
                self.page.set_blocks(with_spacer(blocks));
            }
            Route::Project(slug) => {
                let blocks = self
                    .portfolio
                    .project(slug)
                    .map(project_blocks)
                    .unwrap_or_default();
                self.page.set_blocks(with_spacer(blocks));
            }
        }
        self.progress.snap_to(0.0);
        self.shown = Some(route);
    }

    fn build_home(&mut self, now: Instant) {
        let height = self.document_height();
        let mut document = TerminalDocument::new(self.width, height, BLOCK_GAP);
        let view = ContactView {
            form: &self.form,
            editing: self.editing,
            notice: self.notice.as_deref(),
        };
        let blocks = home_blocks(
            &self.portfolio,
            self.config.featured_projects,
            view,
            height.saturating_sub(NAV_ROWS + BLOCK_GAP),
        );
        document.set_blocks(with_spacer(blocks));
        // Sections already on screen are discovered by mount
        document.relayout();

        let mut options = self.config.page_options();
        // The terminal host measures in rows
        options.header_offset = NAV_ROWS as f32;

        let mut page = PageController::new(
            document,
            Box::new(BandVisibility::new(self.config.band())),
            Box::new(ManualMutations::default()),
            options,
        );
        page.mount(&mut self.router, now);
        self.home = Some(page);
    }

    fn projects_page(&self) -> Vec<Block> {
        projects_blocks(&self.portfolio, self.category(), self.selected)
    }

    fn filtered_len(&self) -> usize {
        self.portfolio.filter(self.category()).len()
    }

    // =========================================================================
    // Actions
    // =========================================================================

    pub fn handle(&mut self, action: Action, now: Instant) {
        debug!("action {action:?} on {}", self.router.current());
        match action {
            Action::Quit => self.running = false,
            Action::Section(id) => self.navigate_to_section(id, now),
            Action::Projects => {
                if self.router.current() != Route::Projects {
                    self.router.navigate(Route::Projects, TransitionState::none());
                    self.sync_route(now);
                }
            }
            Action::Back => {
                if self.router.back() {
                    self.sync_route(now);
                }
            }
            Action::Up => self.step(-1),
            Action::Down => self.step(1),
            Action::Scroll(rows) => {
                self.document_mut().scroll_by(rows as f32, ScrollBehavior::Instant);
            }
            Action::PageUp => self.page_by(-1.0),
            Action::PageDown => self.page_by(1.0),
            Action::Top => self.document_mut().scroll_to(0.0, ScrollBehavior::Smooth),
            Action::Bottom => {
                let max = self.document().max_scroll();
                self.document_mut().scroll_to(max, ScrollBehavior::Smooth);
            }
            Action::NextCategory => self.next_category(),
            Action::Open => self.open(now),
            Action::Type(c) => {
                if let Some(field) = self.editing {
                    self.form.push_char(field, c);
                    self.notice = None;
                    self.refresh_contact();
                }
            }
            Action::Backspace => {
                if let Some(field) = self.editing {
                    self.form.pop_char(field);
                    self.refresh_contact();
                }
            }
            Action::NextField => {
                self.editing = self.editing.map(Field::next);
                self.refresh_contact();
            }
            Action::StopEditing => {
                self.editing = None;
                self.refresh_contact();
            }
        }
    }

    fn navigate_to_section(&mut self, id: &'static str, now: Instant) {
        if let Some(page) = self.home.as_mut() {
            page.request_navigation(id, &mut self.router, now);
            return;
        }
        request_section(&mut self.router, id);
        self.sync_route(now);
    }

    /// Arrow keys: move the selection on the projects page, scroll elsewhere.
    fn step(&mut self, delta: i32) {
        if self.router.current() != Route::Projects {
            self.document_mut().scroll_by(delta as f32, ScrollBehavior::Instant);
            return;
        }

        let len = self.filtered_len();
        if len == 0 {
            return;
        }
        let selected = (self.selected as i32 + delta).clamp(0, len as i32 - 1) as usize;
        if selected == self.selected {
            return;
        }
        self.selected = selected;
        self.refresh_projects();
    }

    fn page_by(&mut self, direction: f32) {
        let rows = self.document_height().saturating_sub(NAV_ROWS).max(1) as f32;
        self.document_mut().scroll_by(direction * rows, ScrollBehavior::Smooth);
    }

    fn next_category(&mut self) {
        if self.router.current() != Route::Projects {
            return;
        }
        let count = self.portfolio.categories().len();
        self.category = (self.category + 1) % count.max(1);
        self.selected = 0;
        let blocks = self.projects_page();
        self.page.set_blocks(with_spacer(blocks));
        debug!("category -> {}", self.category());
    }

    /// Rebuild the project list in place and keep the selection in view.
    fn refresh_projects(&mut self) {
        let blocks = with_spacer(self.projects_page());
        self.page.replace_blocks(blocks);
        self.page.relayout();
        // Spacer block comes first
        let index = 1 + PROJECT_LIST_OFFSET + self.selected;
        self.page.reveal_block(index, NAV_ROWS);
    }

    fn open(&mut self, now: Instant) {
        if self.editing.is_some() {
            match self.editing {
                Some(Field::Message) => self.submit(now),
                field => self.editing = field.map(Field::next),
            }
            self.refresh_contact();
            return;
        }

        match self.router.current() {
            Route::Projects => {
                let slug = self
                    .portfolio
                    .filter(self.category())
                    .get(self.selected)
                    .map(|p| p.slug.clone());
                if let Some(slug) = slug {
                    self.router.navigate(Route::project(slug), TransitionState::none());
                    self.sync_route(now);
                }
            }
            Route::Home => match self.active_section().as_ref().map(SectionId::as_str) {
                Some("works") => {
                    let slug = self
                        .portfolio
                        .featured(self.config.featured_projects)
                        .first()
                        .map(|p| p.slug.clone());
                    if let Some(slug) = slug {
                        self.router.navigate(Route::project(slug), TransitionState::none());
                        self.sync_route(now);
                    }
                }
                Some("contact") => {
                    self.editing = Some(Field::Name);
                    self.refresh_contact();
                }
                _ => {}
            },
            Route::Project(_) => {}
        }
    }

    fn submit(&mut self, now: Instant) {
        match self.form.submit(self.relay.as_mut(), now) {
            Ok(()) => {
                info!("contact message sent");
                self.notice = None;
                self.editing = None;
            }
            // The status line already reports relay failures
            Err(ContactError::Relay(_)) => self.notice = None,
            Err(err) => self.notice = Some(err.to_string()),
        }
    }

    fn refresh_contact(&mut self) {
        let view = ContactView {
            form: &self.form,
            editing: self.editing,
            notice: self.notice.as_deref(),
        };
        let paragraphs = contact_paragraphs(&self.portfolio, view);
        if let Some(page) = self.home.as_mut() {
            page.host_mut().update_section("contact", paragraphs);
        }
    }

    // =========================================================================
    // Frames
    // =========================================================================

    /// Advance one frame.
    pub fn tick(&mut self, now: Instant, elapsed: Duration) {
        if self.form.tick(now) {
            self.refresh_contact();
        }

        match self.home.as_mut() {
            Some(page) => {
                let tick = page.host_mut().advance(elapsed);
                if tick.mounted {
                    page.handle_subtree_changed(now, &mut self.router);
                }
                if tick.moved {
                    page.refresh_visibility();
                }
                page.tick(now, &mut self.router);
            }
            None => {
                self.page.advance(elapsed);
            }
        }

        let document = self.document();
        let target = scroll_progress(
            document.scroll_offset(),
            document.document_height(),
            document.viewport().height,
        );
        self.progress.set_target(target);
        self.progress.advance(elapsed);
    }

    pub fn resize(&mut self, width: u16, height: u16) {
        self.width = width;
        self.height = height;
        let document_height = self.document_height();
        self.page.resize(width, document_height);
        if let Some(page) = self.home.as_mut() {
            page.host_mut().resize(width, document_height);
        }
    }

    pub fn render(&self) -> FrameBuffer {
        let mut buffer = FrameBuffer::new(self.width, self.height);
        self.document().paint(&mut buffer, 0);

        let active = self.active_section();
        paint_nav(
            &mut buffer,
            &self.portfolio.profile.name,
            active.as_ref().map(SectionId::as_str),
            self.router.current() == Route::Projects,
        );
        paint_progress(&mut buffer, self.progress.value());
        paint_status(&mut buffer, &self.status_line());
        buffer
    }

    fn status_line(&self) -> String {
        if let Some(field) = self.editing {
            return format!("editing {}   Tab next   Enter send   Esc done", field.label());
        }
        let route = self.router.current();
        match &route {
            Route::Home => "1-5 sections   j/k scroll   p projects   q quit".to_string(),
            Route::Projects => format!(
                "{}   Tab category   j/k select   Enter open   Esc back   q quit",
                self.category()
            ),
            Route::Project(_) => format!("{}   Esc back   q quit", route.path()),
        }
    }
}

/// Reserve the rows the fixed navigation bar covers.
fn with_spacer(blocks: Vec<Block>) -> Vec<Block> {
    let mut all = Vec::with_capacity(blocks.len() + 1);
    all.push(Block::plain(Vec::new()).min_height(NAV_ROWS));
    all.extend(blocks);
    all
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contact::{ContactMessage, RelayError, SubmitStatus};
    use std::cell::RefCell;
    use std::rc::Rc;

    struct RecordingRelay(Rc<RefCell<Vec<ContactMessage>>>);

    impl EmailRelay for RecordingRelay {
        fn send(&mut self, message: &ContactMessage) -> Result<(), RelayError> {
            self.0.borrow_mut().push(message.clone());
            Ok(())
        }
    }

    const FRAME: Duration = Duration::from_millis(16);

    fn setup(initial: Route) -> (App, Rc<RefCell<Vec<ContactMessage>>>, Instant) {
        let sent = Rc::new(RefCell::new(Vec::new()));
        let config = SiteConfig {
            smooth_scroll: false,
            ..SiteConfig::default()
        };
        let now = Instant::now();
        let app = App::new(
            config,
            Portfolio::bundled().unwrap(),
            Box::new(RecordingRelay(sent.clone())),
            initial,
            (100, 30),
            now,
        );
        (app, sent, now)
    }

    /// Run frames until every lazy section has mounted.
    fn settle(app: &mut App, now: &mut Instant) {
        for _ in 0..10 {
            *now += FRAME;
            app.tick(*now, FRAME);
        }
    }

    #[test]
    fn test_starts_on_home_with_home_active() {
        let (app, _, _) = setup(Route::Home);
        assert_eq!(app.route(), Route::Home);
        assert!(app.home().is_some());
        assert_eq!(app.active_section(), Some(SectionId::from("home")));
        assert!(app.home().unwrap().registry().contains("about"));
        assert!(!app.home().unwrap().registry().contains("works"));
        // The nav bar reads the active id directly
        assert_eq!(app.home().unwrap().active().listener_count(), 0);
    }

    #[test]
    fn test_lazy_sections_register() {
        let (mut app, _, mut now) = setup(Route::Home);
        settle(&mut app, &mut now);
        let registry = app.home().unwrap().registry();
        assert_eq!(registry.len(), 5);
        assert!(registry.contains("contact"));
    }

    #[test]
    fn test_nav_key_on_home_scrolls() {
        let (mut app, _, mut now) = setup(Route::Home);
        settle(&mut app, &mut now);

        app.handle(Action::Section("experience"), now);
        assert_eq!(app.active_section(), Some(SectionId::from("experience")));
        assert!(app.document().scroll_offset() > 0.0);
        assert_eq!(app.router().depth(), 1);
    }

    #[test]
    fn test_nav_key_from_projects_hands_off() {
        let (mut app, _, mut now) = setup(Route::Projects);
        assert!(app.home().is_none());

        app.handle(Action::Section("experience"), now);
        assert_eq!(app.route(), Route::Home);
        assert_eq!(
            app.router().transition_state(),
            TransitionState::target("experience")
        );
        assert!(app.home().unwrap().handoff().is_armed());

        settle(&mut app, &mut now);
        assert_eq!(app.active_section(), Some(SectionId::from("experience")));
        assert!(app.router().transition_state().is_empty());
        assert!(app.home().unwrap().handoff().is_idle());
    }

    #[test]
    fn test_unknown_project_redirects_home() {
        let (app, _, _) = setup(Route::project("nope"));
        assert_eq!(app.route(), Route::Home);
        assert!(app.home().is_some());
    }

    #[test]
    fn test_projects_selection_and_open() {
        let (mut app, _, now) = setup(Route::Home);
        app.handle(Action::Projects, now);
        assert_eq!(app.route(), Route::Projects);
        assert!(app.home().is_none());

        app.handle(Action::Down, now);
        app.handle(Action::Down, now);
        assert_eq!(app.selected(), 2);

        app.handle(Action::Open, now);
        assert_eq!(app.route(), Route::project("weather-app"));

        app.handle(Action::Back, now);
        assert_eq!(app.route(), Route::Projects);
        app.handle(Action::Back, now);
        assert_eq!(app.route(), Route::Home);
    }

    #[test]
    fn test_selection_clamped() {
        let (mut app, _, now) = setup(Route::Projects);
        app.handle(Action::Up, now);
        assert_eq!(app.selected(), 0);
        for _ in 0..10 {
            app.handle(Action::Down, now);
        }
        assert_eq!(app.selected(), 3);
    }

    #[test]
    fn test_category_cycles() {
        let (mut app, _, now) = setup(Route::Projects);
        assert_eq!(app.category(), "All");
        app.handle(Action::NextCategory, now);
        assert_eq!(app.category(), "E-commerce");
        for _ in 0..3 {
            app.handle(Action::NextCategory, now);
        }
        assert_eq!(app.category(), "All");
    }

    #[test]
    fn test_contact_form_flow() {
        let (mut app, sent, mut now) = setup(Route::Home);
        settle(&mut app, &mut now);

        app.handle(Action::Section("contact"), now);
        app.handle(Action::Open, now);
        assert_eq!(app.input_mode(), InputMode::Editing);
        assert_eq!(app.editing(), Some(Field::Name));

        for c in "Ada".chars() {
            app.handle(Action::Type(c), now);
        }
        app.handle(Action::Open, now);
        assert_eq!(app.editing(), Some(Field::Email));
        for c in "ada@example.com".chars() {
            app.handle(Action::Type(c), now);
        }
        app.handle(Action::NextField, now);
        for c in "Hello!".chars() {
            app.handle(Action::Type(c), now);
        }
        app.handle(Action::Open, now);

        assert_eq!(app.form().status(), SubmitStatus::Success);
        assert_eq!(app.input_mode(), InputMode::Browse);
        assert_eq!(sent.borrow().len(), 1);
        assert_eq!(sent.borrow()[0].from_name, "Ada");
    }

    #[test]
    fn test_contact_validation_notice() {
        let (mut app, sent, mut now) = setup(Route::Home);
        settle(&mut app, &mut now);

        app.handle(Action::Section("contact"), now);
        app.handle(Action::Open, now);
        app.handle(Action::NextField, now);
        app.handle(Action::NextField, now);
        app.handle(Action::Open, now);

        assert_eq!(app.notice(), Some("Name is required"));
        assert_eq!(app.input_mode(), InputMode::Editing);
        assert!(sent.borrow().is_empty());
    }

    #[test]
    fn test_render_highlights_active_nav() {
        let (mut app, _, mut now) = setup(Route::Home);
        settle(&mut app, &mut now);
        app.handle(Action::Section("about"), now);
        app.tick(now, FRAME);

        let buffer = app.render();
        let nav = buffer.row_text(0);
        assert!(nav.contains("2 About"));
        let x = nav.find("2 About").unwrap() as u16;
        assert_eq!(buffer.get(x, 0).unwrap().fg, crate::types::Rgba::SKY);
    }

    #[test]
    fn test_quit() {
        let (mut app, _, now) = setup(Route::Home);
        app.handle(Action::Quit, now);
        assert!(!app.is_running());
    }
}
