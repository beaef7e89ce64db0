//! Page Layout - Vertical block layout computed with Taffy.
//!
//! A page is a single column of blocks (nav spacer, sections, footer).
//! Each block holds wrapped paragraphs inside padding. Taffy resolves the
//! column so section offsets follow from real content height at the current
//! terminal width.
//!
//! ```text
//! root (column, width = terminal, gap)
//! ├── block 0 (padding, min height)
//! │   └── text leaf (measure: wrap paragraphs)
//! ├── block 1
//! │   └── text leaf
//! └── ...
//! ```

use taffy::{
    AvailableSpace, Dimension, FlexDirection, LengthPercentage, NodeId, Rect, Size, Style,
    TaffyResult, TaffyTree,
};

use super::text::{string_width, wrap_text};

/// Input for one block of the page.
#[derive(Debug, Clone, Default)]
pub struct BlockSpec<'a> {
    pub paragraphs: Vec<&'a str>,
    pub padding_x: u16,
    pub padding_y: u16,
    pub min_height: u16,
}

/// Resolved position of one block, in rows and columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BlockLayout {
    pub top: u16,
    pub height: u16,
    /// Column where content starts
    pub content_x: u16,
    /// Row where content starts
    pub content_y: u16,
    pub content_width: u16,
}

impl BlockLayout {
    pub fn bottom(&self) -> u16 {
        self.top.saturating_add(self.height)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ColumnLayout {
    pub blocks: Vec<BlockLayout>,
    /// Total document height in rows
    pub height: u16,
}

// =============================================================================
// MEASUREMENT
// =============================================================================

/// Intrinsic size of a paragraph list. Empty paragraphs take one blank row.
fn measure_paragraphs(
    paragraphs: &[&str],
    known_dimensions: Size<Option<f32>>,
    available_space: Size<AvailableSpace>,
) -> Size<f32> {
    let widest = paragraphs.iter().map(|p| string_width(p)).max().unwrap_or(0);

    let wrap_width = match known_dimensions.width {
        Some(w) => w as u16,
        None => match available_space.width {
            AvailableSpace::Definite(w) => (w as u16).min(widest),
            AvailableSpace::MinContent => paragraphs
                .iter()
                .flat_map(|p| p.split_whitespace())
                .map(string_width)
                .max()
                .unwrap_or(0),
            AvailableSpace::MaxContent => widest,
        },
    };

    let rows: usize = paragraphs
        .iter()
        .map(|p| wrap_text(p, wrap_width.max(1)).len().max(1))
        .sum();

    Size {
        width: known_dimensions.width.unwrap_or(wrap_width as f32),
        height: known_dimensions.height.unwrap_or(rows as f32),
    }
}

fn length(cells: u16) -> LengthPercentage {
    LengthPercentage::Length(cells as f32)
}

// =============================================================================
// MAIN ENTRY POINT
// =============================================================================

/// Lay out blocks top to bottom at a terminal width.
///
/// # Arguments
///
/// * `blocks` - Blocks in document order
/// * `width` - Available width in terminal columns
/// * `gap` - Blank rows between consecutive blocks
pub fn layout_column(blocks: &[BlockSpec<'_>], width: u16, gap: u16) -> TaffyResult<ColumnLayout> {
    if blocks.is_empty() {
        return Ok(ColumnLayout::default());
    }

    let mut tree: TaffyTree<usize> = TaffyTree::new();
    let mut block_nodes: Vec<NodeId> = Vec::with_capacity(blocks.len());

    for (idx, block) in blocks.iter().enumerate() {
        let text = tree.new_leaf_with_context(Style::default(), idx)?;
        let style = Style {
            flex_direction: FlexDirection::Column,
            flex_shrink: 0.0,
            padding: Rect {
                top: length(block.padding_y),
                bottom: length(block.padding_y),
                left: length(block.padding_x),
                right: length(block.padding_x),
            },
            min_size: Size {
                width: Dimension::Auto,
                height: Dimension::Length(block.min_height as f32),
            },
            ..Default::default()
        };
        block_nodes.push(tree.new_with_children(style, &[text])?);
    }

    let root = tree.new_with_children(
        Style {
            flex_direction: FlexDirection::Column,
            size: Size {
                width: Dimension::Length(width as f32),
                height: Dimension::Auto,
            },
            gap: Size {
                width: length(0),
                height: length(gap),
            },
            ..Default::default()
        },
        &block_nodes,
    )?;

    let available = Size {
        width: AvailableSpace::Definite(width as f32),
        height: AvailableSpace::MaxContent,
    };

    tree.compute_layout_with_measure(
        root,
        available,
        |known_dimensions, available_space, _node_id, context: Option<&mut usize>, _style| {
            match context {
                Some(&mut idx) => blocks
                    .get(idx)
                    .map(|b| measure_paragraphs(&b.paragraphs, known_dimensions, available_space))
                    .unwrap_or(Size::ZERO),
                None => Size::ZERO,
            }
        },
    )?;

    let mut result = ColumnLayout {
        blocks: Vec::with_capacity(blocks.len()),
        height: tree.layout(root)?.size.height.round() as u16,
    };

    for (block, &node) in blocks.iter().zip(&block_nodes) {
        let layout = tree.layout(node)?;
        let top = layout.location.y.round() as u16;
        let block_width = layout.size.width.round() as u16;
        result.blocks.push(BlockLayout {
            top,
            height: layout.size.height.round() as u16,
            content_x: block.padding_x,
            content_y: top.saturating_add(block.padding_y),
            content_width: block_width.saturating_sub(block.padding_x.saturating_mul(2)),
        });
    }

    Ok(result)
}
