//! The box tree.
//!
//! [§ 9.2 Controlling box generation](https://www.w3.org/TR/CSS2/visuren.html#box-gen)
//!
//! Boxes live in an arena and refer to each other by [`BoxId`]. The tree is
//! rebuilt from scratch on every layout; nothing in it is updated in place
//! afterwards.
//!
//! Geometry flows top-down. A box takes its `x` and `width` from its parent
//! and its `y` from the bottom of its previous sibling (or the parent's top),
//! so a box is only ever laid out after its parent and its previous sibling.

use serde::Serialize;
use strum_macros::Display;
use wren_dom::{DomTree, NodeId};

use super::font::{FontCache, FontKey};
use super::inline::InlineLayout;
use super::{HSTEP, LayoutMode, VSTEP, is_rendered, layout_mode};
use crate::color::ColorValue;

/// Pending work in [`LayoutTree::layout_block`].
#[derive(Debug, Clone, Copy)]
enum Step {
    Enter(BoxId),
    Exit(BoxId),
}

/// Index of a box in a [`LayoutTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BoxId(pub usize);

/// What a box is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Display)]
pub enum BoxKind {
    /// The page itself: fixed margins, one child wrapping the DOM root.
    Document,
    /// A box for one DOM node, in block or inline mode.
    Block,
}

/// A word placed by inline layout, in page coordinates.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PositionedWord {
    /// Left edge.
    pub x: f32,
    /// Top edge.
    pub y: f32,
    /// The word itself.
    pub text: String,
    /// Font it was measured in.
    pub font: FontKey,
    /// Text color.
    pub color: ColorValue,
    /// Measured advance width.
    pub width: f32,
    /// Ascent plus descent of the font.
    pub height: f32,
}

/// One box in the tree.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutBox {
    /// Document or block.
    pub kind: BoxKind,
    /// The DOM node laid out by this box; `None` for the document box.
    pub node: Option<NodeId>,
    /// Block or inline, decided when the box is laid out.
    pub mode: LayoutMode,
    /// Parent box, `None` for the document box.
    pub parent: Option<BoxId>,
    /// Child boxes in document order. Only block-mode boxes have any.
    pub children: Vec<BoxId>,
    /// The sibling box laid out just before this one.
    pub previous: Option<BoxId>,
    /// Left edge.
    pub x: f32,
    /// Top edge.
    pub y: f32,
    /// Width available to content.
    pub width: f32,
    /// Height of the content.
    pub height: f32,
    /// Computed `background-color`, if it paints anything.
    pub background: Option<ColorValue>,
    /// Words of an inline-mode box.
    pub words: Vec<PositionedWord>,
}

impl LayoutBox {
    fn new(
        kind: BoxKind,
        node: Option<NodeId>,
        parent: Option<BoxId>,
        previous: Option<BoxId>,
    ) -> Self {
        Self {
            kind,
            node,
            mode: LayoutMode::Block,
            parent,
            children: Vec::new(),
            previous,
            x: 0.0,
            y: 0.0,
            width: 0.0,
            height: 0.0,
            background: None,
            words: Vec::new(),
        }
    }

    /// Bottom edge.
    #[must_use]
    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }
}

/// Arena of laid-out boxes. Index 0 is always the document box.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutTree {
    boxes: Vec<LayoutBox>,
}

impl LayoutTree {
    /// Lay out `dom` for a viewport `viewport_width` pixels wide.
    ///
    /// The document box sits at (`HSTEP`, `VSTEP`) and is
    /// `viewport_width - 2 * HSTEP` wide. `dom` must already be styled.
    #[must_use]
    pub fn layout(dom: &DomTree, viewport_width: f32, fonts: &mut FontCache) -> Self {
        let mut tree = Self { boxes: Vec::new() };

        let mut document = LayoutBox::new(BoxKind::Document, None, None, None);
        document.x = HSTEP;
        document.y = VSTEP;
        document.width = (viewport_width - 2.0 * HSTEP).max(0.0);
        let root = tree.push(document);

        if !dom.is_empty() {
            let child = tree.push(LayoutBox::new(
                BoxKind::Block,
                Some(dom.root()),
                Some(root),
                None,
            ));
            tree.boxes[root.0].children.push(child);
            tree.layout_block(child, dom, fonts);
            tree.boxes[root.0].height = tree.boxes[child.0].height;
        }

        log::debug!(
            "layout: {} boxes, document height {}",
            tree.boxes.len(),
            tree.boxes[root.0].height
        );
        tree
    }

    fn push(&mut self, layout_box: LayoutBox) -> BoxId {
        let id = BoxId(self.boxes.len());
        self.boxes.push(layout_box);
        id
    }

    /// Lay out the subtree under `id`.
    ///
    /// Walks with an explicit stack so document depth is not bounded by the
    /// call stack. A block box is entered (placed, children created) before
    /// its children and exited (height summed) after them, and each child
    /// exits before its next sibling is entered.
    fn layout_block(&mut self, id: BoxId, dom: &DomTree, fonts: &mut FontCache) {
        let mut stack = vec![Step::Enter(id)];
        while let Some(step) = stack.pop() {
            match step {
                Step::Enter(id) => {
                    if self.place(id, dom, fonts) == LayoutMode::Block {
                        stack.push(Step::Exit(id));
                        let children = self.boxes[id.0].children.iter().rev();
                        stack.extend(children.map(|&child| Step::Enter(child)));
                    }
                }
                Step::Exit(id) => {
                    let height = self.boxes[id.0]
                        .children
                        .iter()
                        .map(|c| self.boxes[c.0].height)
                        .sum();
                    self.boxes[id.0].height = height;
                }
            }
        }
    }

    /// Position one box from its parent and previous sibling.
    ///
    /// A block-mode box gets one child box per rendered DOM child; an
    /// inline-mode box runs inline layout and is finished on return.
    fn place(&mut self, id: BoxId, dom: &DomTree, fonts: &mut FontCache) -> LayoutMode {
        let (parent, previous, node) = {
            let b = &self.boxes[id.0];
            (b.parent, b.previous, b.node)
        };
        let Some(node) = node else {
            return LayoutMode::Inline;
        };

        // Geometry: inherit x and width, stack under the previous sibling.
        let (x, width, parent_y) = parent.map_or((0.0, 0.0, 0.0), |p| {
            let p = &self.boxes[p.0];
            (p.x, p.width, p.y)
        });
        let y = previous.map_or(parent_y, |prev| self.boxes[prev.0].bottom());
        let mode = layout_mode(dom, node);
        let background = dom
            .as_element(node)
            .and_then(|e| e.style.get("background-color"))
            .map(|value| ColorValue::from_css(value, ColorValue::TRANSPARENT))
            .filter(|color| !color.is_transparent());
        {
            let b = &mut self.boxes[id.0];
            b.x = x;
            b.y = y;
            b.width = width;
            b.mode = mode;
            b.background = background;
        }

        match mode {
            LayoutMode::Block => {
                let mut previous = None;
                for &child in dom.children(node) {
                    if !is_rendered(dom, child) {
                        continue;
                    }
                    let child_box = self.push(LayoutBox::new(
                        BoxKind::Block,
                        Some(child),
                        Some(id),
                        previous,
                    ));
                    self.boxes[id.0].children.push(child_box);
                    previous = Some(child_box);
                }
            }
            LayoutMode::Inline => {
                let (words, height) = InlineLayout::new(dom, fonts, x, y, width).run(node);
                let b = &mut self.boxes[id.0];
                b.words = words;
                b.height = height;
            }
        }
        mode
    }

    /// The document box.
    #[must_use]
    pub const fn root(&self) -> BoxId {
        BoxId(0)
    }

    /// A box by id.
    #[must_use]
    pub fn get(&self, id: BoxId) -> Option<&LayoutBox> {
        self.boxes.get(id.0)
    }

    /// Child boxes of `id`.
    #[must_use]
    pub fn children(&self, id: BoxId) -> &[BoxId] {
        self.get(id).map_or(&[], |b| b.children.as_slice())
    }

    /// Number of boxes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.boxes.len()
    }

    /// Always false: the document box exists even for an empty DOM.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.boxes.is_empty()
    }

    /// Height of the whole document.
    #[must_use]
    pub fn height(&self) -> f32 {
        self.get(self.root()).map_or(0.0, |b| b.height)
    }

    /// Every box in pre-order, parents before children.
    #[must_use]
    pub fn pre_order(&self) -> PreOrder<'_> {
        PreOrder {
            tree: self,
            stack: if self.boxes.is_empty() {
                Vec::new()
            } else {
                vec![self.root()]
            },
        }
    }
}

/// Pre-order iterator over a [`LayoutTree`].
pub struct PreOrder<'a> {
    tree: &'a LayoutTree,
    stack: Vec<BoxId>,
}

impl<'a> Iterator for PreOrder<'a> {
    type Item = (BoxId, &'a LayoutBox);

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.stack.pop()?;
        self.stack
            .extend(self.tree.children(id).iter().rev().copied());
        self.tree.get(id).map(|b| (id, b))
    }
}
