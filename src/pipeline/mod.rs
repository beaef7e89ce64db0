//! Page Pipeline
//!
//! Connects the tracker to routes and to the page that hosts sections.
//!
//! # Pipeline Architecture
//!
//! ```text
//! nav link → request_navigation → RouteLayer (TransitionState) → PageController::mount
//!                                                                  │
//! host events → handle_visibility / handle_subtree_changed ────────┴→ ActiveSection
//! ```
//!
//! ## Key Design Principles
//!
//! - **Owned State**: the page controller owns registry, active section and
//!   hand-off; nothing is global
//! - **Capabilities In**: hosts, sources and routers are traits, so every
//!   path runs against synthetic fixtures in tests
//! - **Read Once**: a pending navigation target is consumed and cleared

pub mod page;
pub mod router;

// Re-exports
pub use page::{PageController, PageOptions};
pub use router::{
    redirect_unknown_project, request_section, MemoryRouter, Route, RouteLayer, TransitionState,
};
