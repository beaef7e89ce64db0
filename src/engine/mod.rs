//! Tracker Engine - Section registry and host capabilities.
//!
//! The engine owns the one piece of bookkeeping the tracker needs:
//! - Registry: the live set of section ids, in registration order
//! - Host: the capability traits a page implements so the registry can
//!   discover, measure, observe and scroll sections
//!
//! # Architecture
//!
//! Sections are NOT stored. They are ids looked up on the host on demand:
//!
//! ```text
//! registry: ["home", "about", "works"]
//!              │
//!              ▼  host.section_bounds("about")
//!           SectionBounds { top: 412.0, height: 900.0 }
//! ```
//!
//! Geometry is never cached, so layout shifts can never leave a stale
//! offset behind.

mod host;
mod registry;

pub use host::*;
pub use registry::*;
