//! Router - Client-side routes and the transition payload.
//!
//! Three routes exist:
//! - `/` - the home page, the only page that hosts sections
//! - `/projects` - every project, filterable by category
//! - `/project/:slug` - one project's detail page
//!
//! A route change can carry a [`TransitionState`]. Its `target_id` is the
//! pending navigation target: "scroll to this section once the destination
//! has mounted". The destination reads it once and clears it so back
//! navigation and reloads never replay the scroll.
//!
//! # Example
//!
//! ```ignore
//! use spark_folio::pipeline::{request_section, MemoryRouter, Route, RouteLayer};
//!
//! let mut router = MemoryRouter::new(Route::project("todo-app"));
//! request_section(&mut router, "contact");
//!
//! assert_eq!(router.current(), Route::Home);
//! assert_eq!(router.transition_state().target_id.unwrap(), "contact");
//! ```

use std::fmt;

use log::debug;

use crate::types::SectionId;

// =============================================================================
// ROUTES
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Route {
    #[default]
    Home,
    Projects,
    Project(String),
}

impl Route {
    pub fn project(slug: impl Into<String>) -> Self {
        Route::Project(slug.into())
    }

    /// Parse a path. Returns `None` for paths no page handles.
    pub fn parse(path: &str) -> Option<Self> {
        let path = path.split(['?', '#']).next().unwrap_or_default();
        let trimmed = path.trim_end_matches('/');

        match trimmed {
            "" => Some(Route::Home),
            "/projects" => Some(Route::Projects),
            _ => {
                let slug = trimmed.strip_prefix("/project/")?;
                if slug.is_empty() || slug.contains('/') {
                    return None;
                }
                Some(Route::Project(slug.to_string()))
            }
        }
    }

    pub fn path(&self) -> String {
        match self {
            Route::Home => "/".to_string(),
            Route::Projects => "/projects".to_string(),
            Route::Project(slug) => format!("/project/{slug}"),
        }
    }

    /// Only the home page renders sections.
    pub fn hosts_sections(&self) -> bool {
        matches!(self, Route::Home)
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

// =============================================================================
// TRANSITION STATE
// =============================================================================

/// Payload carried by a route change.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TransitionState {
    /// Section to scroll to once the destination page has mounted.
    pub target_id: Option<SectionId>,
}

impl TransitionState {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn target(id: impl Into<SectionId>) -> Self {
        Self {
            target_id: Some(id.into()),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.target_id.is_none()
    }
}

// =============================================================================
// ROUTE LAYER
// =============================================================================

/// The navigation surface the page controller and nav handlers talk to.
pub trait RouteLayer {
    /// The route currently shown.
    fn current(&self) -> Route;

    /// Push a new history entry.
    fn navigate(&mut self, route: Route, state: TransitionState);

    /// Swap the current history entry without adding one.
    fn replace(&mut self, route: Route, state: TransitionState);

    /// Transition payload of the current entry.
    fn transition_state(&self) -> TransitionState;

    /// Drop the payload of the current entry.
    fn clear_transition_state(&mut self);

    /// Return to the previous entry. Returns `false` at the start of history.
    fn back(&mut self) -> bool;
}

/// Ask for a section from a page that does not host sections.
///
/// Navigates home with the section attached as the pending target.
pub fn request_section(router: &mut dyn RouteLayer, id: impl Into<SectionId>) {
    let id = id.into();
    debug!("requesting section {id} from {}", router.current());
    router.navigate(Route::Home, TransitionState::target(id));
}

/// Replace a project route whose slug is unknown with the home page.
///
/// Returns `true` if a redirect happened.
pub fn redirect_unknown_project(
    router: &mut dyn RouteLayer,
    exists: impl Fn(&str) -> bool,
) -> bool {
    let Route::Project(slug) = router.current() else {
        return false;
    };
    if exists(&slug) {
        return false;
    }

    debug!("unknown project {slug}, redirecting home");
    router.replace(Route::Home, TransitionState::none());
    true
}

// =============================================================================
// MEMORY ROUTER
// =============================================================================

#[derive(Debug, Clone)]
struct Entry {
    route: Route,
    state: TransitionState,
}

/// In-memory history stack, used by the terminal front-end and tests.
#[derive(Debug, Clone)]
pub struct MemoryRouter {
    entries: Vec<Entry>,
    index: usize,
}

impl Default for MemoryRouter {
    fn default() -> Self {
        Self::new(Route::Home)
    }
}

impl MemoryRouter {
    pub fn new(initial: Route) -> Self {
        Self {
            entries: vec![Entry {
                route: initial,
                state: TransitionState::none(),
            }],
            index: 0,
        }
    }

    /// Number of entries up to and including the current one.
    pub fn depth(&self) -> usize {
        self.index + 1
    }

    fn entry(&self) -> &Entry {
        &self.entries[self.index]
    }
}

impl RouteLayer for MemoryRouter {
    fn current(&self) -> Route {
        self.entry().route.clone()
    }

    fn navigate(&mut self, route: Route, state: TransitionState) {
        debug!("navigate {} -> {route}", self.entry().route);
        self.entries.truncate(self.index + 1);
        self.entries.push(Entry { route, state });
        self.index = self.entries.len() - 1;
    }

    fn replace(&mut self, route: Route, state: TransitionState) {
        debug!("replace {} -> {route}", self.entry().route);
        self.entries[self.index] = Entry { route, state };
    }

    fn transition_state(&self) -> TransitionState {
        self.entry().state.clone()
    }

    fn clear_transition_state(&mut self) {
        self.entries[self.index].state = TransitionState::none();
    }

    fn back(&mut self) -> bool {
        if self.index == 0 {
            return false;
        }
        self.index -= 1;
        debug!("back -> {}", self.entry().route);
        true
    }
}
