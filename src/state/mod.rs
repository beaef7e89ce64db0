//! State Module - Runtime state of the section tracker.
//!
//! - **Active** - the single active section id plus change callbacks
//! - **Visibility** - geometric viewport-band visibility for pull-model hosts
//! - **Scroll** - section id to scroll offset, scroll progress
//! - **Handoff** - cross-page navigation hand-off state machine
//! - **Spring** - damped spring smoothing for scroll and progress
//! - **Input** - terminal events mapped to front-end actions

mod active;
mod handoff;
mod input;
mod scroll;
mod spring;
mod visibility;

pub use active::*;
pub use handoff::*;
pub use input::*;
pub use scroll::*;
pub use spring::*;
pub use visibility::*;
