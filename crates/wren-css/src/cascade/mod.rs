//! CSS cascade and style computation.
//!
//! [CSS Cascading and Inheritance Level 4](https://www.w3.org/TR/css-cascade-4/)
//!
//! Every element ends up with a flat property-to-value map. The map is
//! built top-down so a parent's values are final before any child reads
//! them:
//!
//! 1. inherited properties are copied from the parent (or defaulted at the root),
//! 2. matching rules are applied in ascending specificity,
//! 3. the inline `style` attribute is applied last,
//! 4. a percentage `font-size` is resolved against the parent's pixel size.

use std::str::FromStr;

use wren_common::warning::warn_once;
use wren_dom::{DomTree, NodeId, StyleMap};

use crate::parser::{CssParser, Rule};

/// Font size of the root element when nothing sets one.
pub const DEFAULT_FONT_SIZE_PX: f32 = 16.0;

/// [§ 7.2 Inherited properties](https://www.w3.org/TR/css-cascade-4/#inheriting)
///
/// Properties copied from parent to child, with their initial values.
pub const INHERITED_PROPERTIES: &[(&str, &str)] = &[
    ("font-size", "16px"),
    ("font-style", "normal"),
    ("font-weight", "normal"),
    ("color", "black"),
];

/// Sort key of a rule in the cascade: its selector's specificity.
#[must_use]
pub fn cascade_priority(rule: &Rule) -> u32 {
    rule.selector.specificity()
}

/// Stable ascending sort by [`cascade_priority`]. Rules of equal
/// specificity keep their source order, so the later one still wins.
pub fn sort_rules(rules: &mut [Rule]) {
    rules.sort_by_key(cascade_priority);
}

/// Compute and store the style of every element in `tree`.
///
/// `rules` must already be sorted with [`sort_rules`]. Text nodes are left
/// alone; they use their parent's style. Nodes are visited in document
/// order, so a parent's style is final before any child reads it.
pub fn style(tree: &mut DomTree, rules: &[Rule]) {
    let order: Vec<NodeId> = tree.iter_all().collect();
    for id in order {
        let computed = compute_style(tree, id, rules);
        if let (Some(computed), Some(element)) = (computed, tree.as_element_mut(id)) {
            element.style = computed;
        }
    }
}

/// The style `id` would get from `rules`, or `None` for a text node.
fn compute_style(tree: &DomTree, id: NodeId, rules: &[Rule]) -> Option<StyleMap> {
    let element = tree.as_element(id)?;
    let parent_style = tree
        .parent(id)
        .and_then(|p| tree.as_element(p))
        .map(|p| &p.style);

    // STEP 1: inheritance.
    let mut style = StyleMap::new();
    for &(property, initial) in INHERITED_PROPERTIES {
        let value = parent_style
            .and_then(|s| s.get(property))
            .map_or(initial, String::as_str);
        let _ = style.insert(property.to_string(), value.to_string());
    }

    // STEP 2: sheet rules, least specific first.
    for rule in rules.iter().filter(|r| r.selector.matches(tree, id)) {
        for decl in &rule.declarations {
            let _ = style.insert(decl.property.clone(), decl.value.clone());
        }
    }

    // STEP 3: the style attribute beats every sheet rule.
    if let Some(inline) = element.attr("style") {
        for decl in CssParser::new(inline).body() {
            let _ = style.insert(decl.property, decl.value);
        }
    }

    // STEP 4: percentages need the parent's final pixel size.
    resolve_font_size(&mut style, parent_style);
    Some(style)
}

fn resolve_font_size(style: &mut StyleMap, parent: Option<&StyleMap>) {
    let Some(percent) = style
        .get("font-size")
        .and_then(|v| v.strip_suffix('%'))
        .map(str::to_owned)
    else {
        return;
    };

    let parent_px = parent
        .and_then(|s| s.get("font-size"))
        .and_then(|v| parse_px::<f64>(v))
        .unwrap_or(f64::from(DEFAULT_FONT_SIZE_PX));

    let resolved = match percent.trim().parse::<f64>() {
        Ok(percent) if percent.is_finite() => percent * parent_px / 100.0,
        _ => {
            let _ = warn_once("CSS", &format!("bad font-size '{percent}%', using parent size"));
            parent_px
        }
    };
    let _ = style.insert("font-size".to_string(), format_px(resolved));
}

/// Parse a `<n>px` value.
#[must_use]
pub fn parse_px<T: FromStr>(value: &str) -> Option<T> {
    value.trim().strip_suffix("px")?.trim().parse().ok()
}

/// Format a pixel length in the canonical form: shortest decimal, no
/// trailing `.0` (`24px`, `13.5px`).
#[must_use]
pub fn format_px(px: f64) -> String {
    format!("{px}px")
}
