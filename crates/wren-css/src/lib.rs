//! CSS parsing, cascade, layout, and paint for the Wren renderer.
//!
//! # Scope
//!
//! This crate implements:
//! - **CSS Parser**: tag and descendant selectors, `property: value`
//!   blocks, and recovery from anything else by skipping to the next `;`
//!   or `}`
//! - **Cascade**: inheritance of font and color properties, rules applied
//!   in specificity order, inline `style` attributes, percentage font sizes
//! - **Layout**: a box tree of block boxes (stacked vertically) and inline
//!   boxes (words flowed into lines on a shared baseline)
//! - **Paint**: a flat display list of text and rectangle commands that
//!   any [`Surface`] can execute
//!
//! # Not Yet Implemented
//!
//! - Class, id, and attribute selectors; selector lists
//! - Multi-word values (`font-family: Times New Roman`, `rgb(...)`)
//! - Margins, padding, borders, floats, positioning

/// CSS cascade and style computation per [CSS Cascading Level 4](https://www.w3.org/TR/css-cascade-4/).
pub mod cascade;
/// Color values per [CSS Color Level 4](https://www.w3.org/TR/css-color-4/).
pub mod color;
/// Box tree and inline layout.
pub mod layout;
/// Display list and painting per [CSS 2.1 Appendix E](https://www.w3.org/TR/CSS2/zindex.html).
pub mod paint;
/// Word-based stylesheet parser.
pub mod parser;
/// Selector matching per [Selectors Level 4](https://www.w3.org/TR/selectors-4/).
pub mod selector;
/// Built-in default stylesheet.
pub mod ua_stylesheet;

// Re-exports for convenience
pub use cascade::{INHERITED_PROPERTIES, cascade_priority, sort_rules, style};
pub use color::ColorValue;
pub use layout::{
    ApproximateFont, ApproximateFontMetrics, Font, FontCache, FontKey, FontProvider, FontStyle,
    FontWeight, HSTEP, LayoutBox, LayoutMode, LayoutTree, MAX_FONT_SIZE_PX, VSTEP, layout_mode,
};
pub use paint::{DisplayList, DrawCommand, Surface, paint};
pub use parser::{CssParseError, CssParser, Declaration, Rule, parse_stylesheet};
pub use selector::Selector;

use wren_dom::{DomTree, ElementData};

/// The default rules followed by `author` rules, sorted for [`style`].
///
/// Because the sort is stable, an author rule always beats a default rule
/// of the same specificity.
#[must_use]
pub fn cascade_rules(author: impl IntoIterator<Item = Rule>) -> Vec<Rule> {
    let mut rules = ua_stylesheet::default_rules().to_vec();
    rules.extend(author);
    sort_rules(&mut rules);
    rules
}

/// [§ 4.2.4 The link element](https://html.spec.whatwg.org/multipage/semantics.html#the-link-element)
///
/// The `href` of every `<link rel=stylesheet>` in document order, for the
/// fetch layer to resolve and load.
#[must_use]
pub fn stylesheet_links(tree: &DomTree) -> Vec<String> {
    tree.iter_all()
        .filter_map(|id| tree.as_element(id))
        .filter(|e| e.is("link") && is_stylesheet_link(e))
        .filter_map(|e| e.attr("href"))
        .map(str::to_string)
        .collect()
}

/// "If the rel attribute's value contains the token stylesheet, then the
/// link is a stylesheet link."
fn is_stylesheet_link(data: &ElementData) -> bool {
    data.attr("rel").is_some_and(|rel| {
        rel.split_ascii_whitespace()
            .any(|token| token.eq_ignore_ascii_case("stylesheet"))
    })
}

/// [§ 4.2.6 The style element](https://html.spec.whatwg.org/multipage/semantics.html#the-style-element)
///
/// The text of every `<style>` element, in document order.
#[must_use]
pub fn style_elements(tree: &DomTree) -> Vec<String> {
    tree.iter_all()
        .filter(|&id| tree.as_element(id).is_some_and(|e| e.is("style")))
        .map(|id| {
            tree.children(id)
                .iter()
                .filter_map(|&child| tree.as_text(child))
                .collect::<String>()
        })
        .collect()
}
