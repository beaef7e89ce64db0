//! Active Section - Which section the navigation highlights.
//!
//! Converts visibility observations into a single active identifier:
//! - `current` signal (the active section, `None` before any activation)
//! - Last satisfying event wins, no ranking between sections
//! - Events for unregistered sections are ignored
//! - Leaving the band never clears the active section
//! - Change callbacks fire at the source, once per actual change
//!
//! # Example
//!
//! ```ignore
//! use spark_folio::state::ActiveSection;
//!
//! let mut active = ActiveSection::new();
//! let unsubscribe = active.subscribe(|id| println!("now on {id:?}"));
//!
//! active.apply(&events, &registry);
//! unsubscribe();
//! ```
//!
//! When two sections satisfy the band in the same frame, delivery order
//! decides. Visibility sources deliver same-frame events in document order,
//! so the later section in the document wins.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use log::{debug, trace};
use spark_signals::{signal, Signal};

use crate::engine::SectionRegistry;
use crate::types::{SectionId, VisibilityEvent};

type Listener = Box<dyn Fn(Option<&SectionId>)>;

// =============================================================================
// ACTIVE SECTION
// =============================================================================

pub struct ActiveSection {
    current: Signal<Option<SectionId>>,
    listeners: Rc<RefCell<HashMap<usize, Listener>>>,
    next_listener: usize,
}

impl Default for ActiveSection {
    fn default() -> Self {
        Self::new()
    }
}

impl ActiveSection {
    pub fn new() -> Self {
        Self::with_initial(None)
    }

    /// Start with a section already highlighted (the page's first section).
    pub fn with_initial(initial: Option<SectionId>) -> Self {
        Self {
            current: signal(initial),
            listeners: Rc::new(RefCell::new(HashMap::new())),
            next_listener: 0,
        }
    }

    /// The active section id.
    ///
    /// Creates a reactive dependency when called from a derived/effect.
    pub fn get(&self) -> Option<SectionId> {
        self.current.get()
    }

    /// Check if a specific section is the active one.
    pub fn is_active(&self, id: &str) -> bool {
        self.get().is_some_and(|current| current == id)
    }

    /// The underlying signal, for reactive consumers.
    pub fn signal(&self) -> Signal<Option<SectionId>> {
        self.current.clone()
    }

    // =========================================================================
    // Updates
    // =========================================================================

    /// Feed a batch of visibility events, in delivery order.
    ///
    /// Returns `true` if the active section changed.
    pub fn apply(&mut self, events: &[VisibilityEvent], registry: &SectionRegistry) -> bool {
        let before = self.current.get();

        for event in events {
            if !registry.contains(event.id.as_str()) {
                trace!("ignoring visibility event for unknown section {}", event.id);
                continue;
            }
            if event.satisfying {
                self.set(event.id.clone());
            }
        }

        self.current.get() != before
    }

    /// Set the active section directly, bypassing observation.
    ///
    /// Used for synthetic scrolls (nav clicks, cross-page hand-off) that must
    /// not wait for an observation event.
    pub fn activate(&mut self, id: impl Into<SectionId>) -> bool {
        self.set(id.into())
    }

    fn set(&mut self, id: SectionId) -> bool {
        if self.current.get().as_ref() == Some(&id) {
            return false;
        }

        debug!("active section -> {id}");
        self.current.set(Some(id.clone()));

        for listener in self.listeners.borrow().values() {
            listener(Some(&id));
        }
        true
    }

    // =========================================================================
    // Subscriptions
    // =========================================================================

    /// Register a change callback.
    /// Returns cleanup function to unregister.
    pub fn subscribe(
        &mut self,
        listener: impl Fn(Option<&SectionId>) + 'static,
    ) -> Box<dyn FnOnce()> {
        let key = self.next_listener;
        self.next_listener += 1;
        self.listeners.borrow_mut().insert(key, Box::new(listener));

        let listeners = Rc::downgrade(&self.listeners);
        Box::new(move || {
            if let Some(listeners) = listeners.upgrade() {
                listeners.borrow_mut().remove(&key);
            }
        })
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.borrow().len()
    }

    /// Drop every change callback.
    pub fn clear_listeners(&mut self) {
        self.listeners.borrow_mut().clear();
    }
}

// =============================================================================
// TESTS
// =============================================================================
