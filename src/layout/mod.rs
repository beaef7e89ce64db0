//! Layout Module
//!
//! Block layout for terminal pages using Taffy.
//!
//! # Architecture
//!
//! A page is one flex column of blocks. The bridge:
//!
//! 1. Converts each block's padding and minimum height to a Taffy style
//! 2. Attaches a text leaf with a measure context per block
//! 3. Measures wrapped paragraphs at the resolved width
//! 4. Extracts block offsets back out as rows
//!
//! # Example
//!
//! ```ignore
//! use spark_folio::layout::{layout_column, BlockSpec};
//!
//! let blocks = vec![BlockSpec { paragraphs: vec!["Hello"], ..Default::default() }];
//! let layout = layout_column(&blocks, 80, 1)?;
//! ```

mod page_layout;
mod text;

pub use page_layout::*;
pub use text::*;
