//! Terminal Renderer
//!
//! The terminal front-end of the portfolio:
//! - `buffer` - the cell grid each frame paints into
//! - `diff` - differential output through crossterm
//! - `document` - [`TerminalDocument`], the section host
//! - `pages` - portfolio content as document blocks
//! - `view` - navigation bar, progress line and status row

mod buffer;
mod diff;
mod document;
mod pages;
mod view;

pub use buffer::*;
pub use diff::*;
pub use document::*;
pub use pages::*;
pub use view::*;
