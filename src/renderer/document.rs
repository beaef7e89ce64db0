//! TerminalDocument - The section host for the terminal front-end.
//!
//! A document is a column of blocks laid out with Taffy at the terminal
//! width. Blocks carrying a section id are the page's sections. Blocks
//! marked lazy render a placeholder until enough frames have passed, the
//! way deferred sections appear after the first paint.
//!
//! Units are terminal rows. The scroll position is a damped spring so
//! smooth scrolling animates across frames.
//!
//! # Example
//!
//! ```ignore
//! let mut doc = TerminalDocument::new(80, 24, 1);
//! doc.set_blocks(blocks);
//! let tick = doc.advance(Duration::from_millis(16));
//! if tick.mounted {
//!     page.handle_subtree_changed(now, &mut router);
//! }
//! ```

use std::time::Duration;

use log::{debug, warn};

use super::buffer::{FrameBuffer, Style};
use crate::engine::SectionHost;
use crate::layout::{BlockSpec, ColumnLayout, layout_column, wrap_text};
use crate::state::Spring;
use crate::types::{Attr, Rgba, ScrollBehavior, SectionBounds, SectionId, Viewport};

// =============================================================================
// BLOCKS
// =============================================================================

/// One styled paragraph. Wraps at the block's content width.
#[derive(Debug, Clone, PartialEq)]
pub struct Paragraph {
    pub text: String,
    pub style: Style,
}

impl Paragraph {
    pub fn new(text: impl Into<String>, style: Style) -> Self {
        Self { text: text.into(), style }
    }

    pub fn plain(text: impl Into<String>) -> Self {
        Self::new(text, Style::default())
    }

    pub fn blank() -> Self {
        Self::plain("")
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Block {
    /// Section id, if this block is a navigable section
    pub id: Option<SectionId>,
    pub paragraphs: Vec<Paragraph>,
    pub padding_x: u16,
    pub padding_y: u16,
    pub min_height: u16,
    /// Frames to wait before the real content replaces the placeholder
    pub mount_after: u32,
}

impl Block {
    pub fn section(id: impl Into<SectionId>, paragraphs: Vec<Paragraph>) -> Self {
        Self {
            id: Some(id.into()),
            paragraphs,
            padding_x: 2,
            padding_y: 1,
            ..Default::default()
        }
    }

    pub fn plain(paragraphs: Vec<Paragraph>) -> Self {
        Self {
            paragraphs,
            padding_x: 2,
            ..Default::default()
        }
    }

    pub fn min_height(mut self, rows: u16) -> Self {
        self.min_height = rows;
        self
    }

    pub fn lazy(mut self, frames: u32) -> Self {
        self.mount_after = frames;
        self
    }
}

/// What changed during [`TerminalDocument::advance`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DocumentTick {
    /// At least one lazy block replaced its placeholder
    pub mounted: bool,
    /// Section geometry moved relative to the viewport
    pub moved: bool,
}

// =============================================================================
// DOCUMENT
// =============================================================================

pub struct TerminalDocument {
    blocks: Vec<Block>,
    mounted: Vec<bool>,
    layout: ColumnLayout,
    frame: u32,
    width: u16,
    height: u16,
    gap: u16,
    scroll: Spring,
    rendered: bool,
    dirty: bool,
}

impl TerminalDocument {
    pub fn new(width: u16, height: u16, gap: u16) -> Self {
        Self {
            blocks: Vec::new(),
            mounted: Vec::new(),
            layout: ColumnLayout::default(),
            frame: 0,
            width,
            height,
            gap,
            scroll: Spring::scroll(),
            rendered: false,
            dirty: true,
        }
    }

    /// Replace every block and start over from the top.
    pub fn set_blocks(&mut self, blocks: Vec<Block>) {
        self.mounted = blocks.iter().map(|b| b.mount_after == 0).collect();
        self.blocks = blocks;
        self.frame = 0;
        self.scroll.snap_to(0.0);
        self.dirty = true;
    }

    /// Replace every block, keeping the scroll position and elapsed frames.
    pub fn replace_blocks(&mut self, blocks: Vec<Block>) {
        self.mounted = blocks.iter().map(|b| b.mount_after <= self.frame).collect();
        self.blocks = blocks;
        self.dirty = true;
    }

    /// Swap the paragraphs of a section in place.
    pub fn update_section(&mut self, id: &str, paragraphs: Vec<Paragraph>) -> bool {
        let Some(block) = self.blocks.iter_mut().find(|b| b.id.as_ref().is_some_and(|b| b == id))
        else {
            return false;
        };
        if block.paragraphs != paragraphs {
            block.paragraphs = paragraphs;
            self.dirty = true;
        }
        true
    }

    pub fn resize(&mut self, width: u16, height: u16) {
        if (width, height) != (self.width, self.height) {
            self.width = width;
            self.height = height;
            self.dirty = true;
        }
    }

    /// Advance one frame: mount due lazy blocks, re-layout, step the scroll.
    pub fn advance(&mut self, elapsed: Duration) -> DocumentTick {
        let mut tick = DocumentTick::default();
        self.frame = self.frame.saturating_add(1);

        for (block, mounted) in self.blocks.iter().zip(self.mounted.iter_mut()) {
            if !*mounted && self.frame >= block.mount_after {
                *mounted = true;
                tick.mounted = true;
                debug!("block {:?} mounted at frame {}", block.id, self.frame);
            }
        }
        if tick.mounted {
            self.dirty = true;
        }

        if self.dirty {
            let first_render = !self.rendered;
            self.relayout();
            // The hosting region appearing counts as a subtree change
            tick.mounted |= first_render && self.rendered;
            tick.moved = true;
            // Content height may have shrunk under the scroll position
            let max = self.max_scroll();
            if self.scroll.target() > max {
                self.scroll.set_target(max);
            }
        }

        if !self.scroll.is_at_rest() {
            let before = self.scroll.value().round();
            self.scroll.advance(elapsed);
            tick.moved |= self.scroll.value().round() != before;
        }

        tick
    }

    /// Lay out blocks at the current width.
    pub fn relayout(&mut self) {
        let placeholder = ["Loading..."];
        let texts: Vec<Vec<&str>> = self
            .blocks
            .iter()
            .zip(&self.mounted)
            .map(|(block, &mounted)| {
                if mounted {
                    block.paragraphs.iter().map(|p| p.text.as_str()).collect()
                } else {
                    placeholder.to_vec()
                }
            })
            .collect();

        let specs: Vec<BlockSpec<'_>> = self
            .blocks
            .iter()
            .zip(&self.mounted)
            .zip(texts)
            .map(|((block, &mounted), paragraphs)| BlockSpec {
                paragraphs,
                padding_x: block.padding_x,
                padding_y: block.padding_y,
                // Placeholders reserve a screenful like a suspended section
                min_height: if mounted { block.min_height } else { self.height },
            })
            .collect();

        match layout_column(&specs, self.width, self.gap) {
            Ok(layout) => {
                self.layout = layout;
                self.rendered = true;
                self.dirty = false;
            }
            Err(err) => warn!("document layout failed: {err}"),
        }
    }

    // =========================================================================
    // Scrolling
    // =========================================================================

    /// Rows of content below the viewport top at the end of the page.
    pub fn max_scroll(&self) -> f32 {
        self.layout.height.saturating_sub(self.height) as f32
    }

    /// Scroll relative to the current target.
    pub fn scroll_by(&mut self, rows: f32, behavior: ScrollBehavior) {
        let target = self.scroll.target() + rows;
        SectionHost::scroll_to(self, target, behavior);
    }

    /// Scroll just enough to show a whole block below `header_rows`.
    pub fn reveal_block(&mut self, index: usize, header_rows: u16) {
        let Some(layout) = self.layout.blocks.get(index).copied() else {
            return;
        };
        let top = self.scroll.target();
        let target = if (layout.top as f32) < top + header_rows as f32 {
            layout.top as f32 - header_rows as f32
        } else if layout.bottom() as f32 > top + self.height as f32 {
            layout.bottom() as f32 - self.height as f32
        } else {
            return;
        };
        SectionHost::scroll_to(self, target, ScrollBehavior::Smooth);
    }

    pub fn document_height(&self) -> f32 {
        self.layout.height as f32
    }

    /// First visible row, as drawn this frame.
    pub fn scroll_row(&self) -> u16 {
        self.scroll.value().round().max(0.0) as u16
    }

    pub fn is_scrolling(&self) -> bool {
        !self.scroll.is_at_rest()
    }

    // =========================================================================
    // Queries
    // =========================================================================

    pub fn is_mounted(&self, id: &str) -> bool {
        self.position(id).is_some_and(|i| self.mounted[i])
    }

    /// Document row where a block starts, sections or not.
    pub fn block_top(&self, index: usize) -> Option<u16> {
        self.layout.blocks.get(index).map(|b| b.top)
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.blocks
            .iter()
            .position(|b| b.id.as_ref().is_some_and(|b| b == id))
    }

    // =========================================================================
    // Painting
    // =========================================================================

    /// Paint the visible rows into `buffer`, starting at screen row `top`.
    pub fn paint(&self, buffer: &mut FrameBuffer, top: u16) {
        let first = self.scroll_row();
        let last = first.saturating_add(self.height);
        let placeholder = [Paragraph::new(
            "Loading...",
            Style::new(Rgba::SLATE, Attr::DIM | Attr::ITALIC),
        )];

        for ((block, &mounted), layout) in self
            .blocks
            .iter()
            .zip(&self.mounted)
            .zip(&self.layout.blocks)
        {
            if layout.bottom() <= first || layout.top >= last {
                continue;
            }

            let paragraphs: &[Paragraph] = if mounted { &block.paragraphs } else { &placeholder };
            let mut row = layout.content_y;
            for paragraph in paragraphs {
                let lines = wrap_text(&paragraph.text, layout.content_width.max(1));
                let count = lines.len().max(1) as u16;
                for line in lines {
                    if row >= first && row < last {
                        buffer.draw_text(layout.content_x, top + (row - first), &line, paragraph.style);
                    }
                    row += 1;
                }
                if count == 1 && paragraph.text.is_empty() {
                    row += 1;
                }
            }
        }
    }
}

impl SectionHost for TerminalDocument {
    fn discover_sections(&self) -> Option<Vec<SectionId>> {
        if !self.rendered {
            return None;
        }
        Some(
            self.blocks
                .iter()
                .zip(&self.mounted)
                .filter(|(_, mounted)| **mounted)
                .filter_map(|(block, _)| block.id.clone())
                .collect(),
        )
    }

    fn section_bounds(&self, id: &SectionId) -> Option<SectionBounds> {
        let index = self.position(id.as_str())?;
        if !self.mounted[index] {
            return None;
        }
        let layout = self.layout.blocks.get(index)?;
        Some(SectionBounds::new(
            layout.top as f32 - self.scroll.value(),
            layout.height as f32,
        ))
    }

    fn viewport(&self) -> Viewport {
        Viewport::new(self.width as f32, self.height as f32)
    }

    fn scroll_offset(&self) -> f32 {
        self.scroll.value()
    }

    fn scroll_to(&mut self, top: f32, behavior: ScrollBehavior) {
        let top = top.clamp(0.0, self.max_scroll());
        match behavior {
            ScrollBehavior::Smooth => self.scroll.set_target(top),
            ScrollBehavior::Instant => self.scroll.snap_to(top),
        }
    }
}
