//! User-agent stylesheet.
//!
//! [CSS Cascading § 6.1 Cascade Sorting Order](https://www.w3.org/TR/css-cascade-4/#cascade-sort)
//!
//! The default rules are placed ahead of every author rule before sorting,
//! so an author rule of equal specificity always overrides them.

use std::sync::OnceLock;

use crate::parser::{Rule, parse_stylesheet};

/// Default CSS for the elements the renderer gives special treatment.
///
/// One tag per rule: the selector grammar has no selector lists.
const UA_CSS: &str = r"
head { display: none; }
script { display: none; }
style { display: none; }
title { display: none; }
pre { background-color: gray; }
a { color: blue; }
b { font-weight: bold; }
strong { font-weight: bold; }
i { font-style: italic; }
em { font-style: italic; }
";

/// Return the parsed default rules, parsing only once.
#[must_use]
pub fn default_rules() -> &'static [Rule] {
    static RULES: OnceLock<Vec<Rule>> = OnceLock::new();
    RULES.get_or_init(|| parse_stylesheet(UA_CSS))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_default_rule_parses() {
        let expected = UA_CSS.lines().filter(|l| !l.trim().is_empty()).count();
        assert_eq!(default_rules().len(), expected);
    }

    #[test]
    fn test_pre_has_gray_background() {
        let pre = default_rules()
            .iter()
            .find(|r| r.selector.to_string() == "pre")
            .expect("pre rule");
        assert_eq!(pre.declarations[0].property, "background-color");
        assert_eq!(pre.declarations[0].value, "gray");
    }
}
