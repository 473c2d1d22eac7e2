//! Painter - generates display list from layout tree
//!
//! [CSS 2.1 Appendix E.2 Painting order](https://www.w3.org/TR/CSS2/zindex.html#painting-order)
//!
//! Boxes are visited in pre-order, so a parent's background is painted
//! before anything inside it.

use crate::layout::{LayoutBox, LayoutTree};

use super::{DisplayList, DrawCommand};

/// Paint a layout tree and return the display list.
#[must_use]
pub fn paint(tree: &LayoutTree) -> DisplayList {
    let mut display_list = DisplayList::new();
    for (_, layout_box) in tree.pre_order() {
        paint_box(layout_box, &mut display_list);
    }
    log::debug!("paint: {} commands", display_list.len());
    display_list
}

/// Background first, then the box's own words.
fn paint_box(layout_box: &LayoutBox, display_list: &mut DisplayList) {
    if let Some(color) = layout_box.background {
        display_list.push(DrawCommand::DrawRect {
            top: layout_box.y,
            left: layout_box.x,
            bottom: layout_box.bottom(),
            right: layout_box.x + layout_box.width,
            color,
        });
    }

    for word in &layout_box.words {
        display_list.push(DrawCommand::DrawText {
            top: word.y,
            left: word.x,
            bottom: word.y + word.height,
            right: word.x + word.width,
            text: word.text.clone(),
            font: word.font,
            color: word.color,
        });
    }
}
