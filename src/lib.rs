//! # spark-folio
//!
//! Section-aware navigation for a single-page portfolio, with a terminal
//! front-end.
//!
//! Built on [spark-signals](https://github.com/RLabs-Inc/spark-signals) for
//! the reactive active-section state.
//!
//! ## Architecture
//!
//! ```text
//! host (SectionHost) ──▶ SectionRegistry ──▶ VisibilitySource ──▶ ActiveSection
//!        ▲                     │                                     │
//!        │                     ▼                                     ▼
//!   ScrollController ◀── PageController ◀── RouteLayer          nav highlight
//!                              │
//!                              └── Handoff (cross-page section jumps)
//! ```
//!
//! Nothing is global: a [`PageController`](pipeline::PageController) owns the
//! tracker state of one page and is torn down with it.
//!
//! ## Modules
//!
//! - [`types`] - Section ids, bounds, viewport band, nav items, colors
//! - [`engine`] - Host capability traits and the section registry
//! - [`state`] - Active section, visibility, scrolling, hand-off, springs, input
//! - [`pipeline`] - Routes and the page controller
//! - [`layout`] - Text measurement and Taffy block layout
//! - [`renderer`] - Terminal document host, frame buffer, diff output
//! - [`content`] - Bundled portfolio data and queries
//! - [`contact`] - Contact form and message relay
//! - [`config`] - Site configuration
//! - [`app`] - The terminal application

pub mod app;
pub mod config;
pub mod contact;
pub mod content;
pub mod engine;
pub mod layout;
pub mod pipeline;
pub mod renderer;
pub mod state;
pub mod types;

// Re-export commonly used items
pub use types::*;

pub use engine::{MutationSource, Rescan, SectionHost, SectionRegistry, VisibilitySource};

pub use pipeline::{
    MemoryRouter, PageController, PageOptions, Route, RouteLayer, TransitionState,
    redirect_unknown_project, request_section,
};

pub use state::{
    ActiveSection, BandVisibility, Handoff, HandoffState, ScrollController, SettleMode,
    scroll_progress,
};
