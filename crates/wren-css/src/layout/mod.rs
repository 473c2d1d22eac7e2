//! Layout engine.
//!
//! Turns a styled DOM into a tree of positioned boxes. There are only two
//! kinds of content box: a block box stacks its children vertically, and an
//! inline box flows the words of its whole subtree into lines.
//!
//! # Module Structure
//!
//! - [`font`] - Font keys, the [`Font`]/[`FontProvider`] seam, and the session [`FontCache`]
//! - [`box_tree`] - The box arena and block layout
//! - [`inline`] - Word placement, line breaking, and baseline alignment

pub mod box_tree;
pub mod font;
pub mod inline;

pub use box_tree::{BoxId, BoxKind, LayoutBox, LayoutTree, PositionedWord, PreOrder};
pub use font::{
    ApproximateFont, ApproximateFontMetrics, Font, FontCache, FontKey, FontMetrics, FontProvider,
    FontStyle, FontWeight, MAX_FONT_SIZE_PX,
};
pub use inline::InlineLayout;

use serde::Serialize;
use strum_macros::Display;
use wren_dom::{DomTree, NodeId, NodeType};
use wren_html::tags::is_block_element;

/// Horizontal page margin.
pub const HSTEP: f32 = 13.0;

/// Vertical page margin, also the extra gap after a paragraph.
pub const VSTEP: f32 = 18.0;

/// How a box lays out its content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Display)]
#[strum(serialize_all = "lowercase")]
pub enum LayoutMode {
    /// Children are stacked as separate boxes.
    Block,
    /// The subtree's text is flowed into lines inside this box.
    Inline,
}

/// Choose the layout mode for a DOM node.
///
/// Text is always inline. An element with at least one block-level element
/// child is block; otherwise it is inline if it has any children and block
/// if it has none.
#[must_use]
pub fn layout_mode(tree: &DomTree, id: NodeId) -> LayoutMode {
    match tree.get(id).map(|n| &n.node_type) {
        Some(NodeType::Text(_)) => LayoutMode::Inline,
        _ => {
            let children = tree.children(id);
            let has_block_child = children
                .iter()
                .any(|&c| tree.tag_name(c).is_some_and(is_block_element));
            if has_block_child || children.is_empty() {
                LayoutMode::Block
            } else {
                LayoutMode::Inline
            }
        }
    }
}

/// Whether a node generates any boxes or text: false only for elements
/// whose computed `display` is `none`.
#[must_use]
pub fn is_rendered(tree: &DomTree, id: NodeId) -> bool {
    tree.as_element(id)
        .is_none_or(|e| e.style.get("display").is_none_or(|d| d != "none"))
}
