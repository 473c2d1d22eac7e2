//! Selector matching.
//!
//! Two forms exist: a bare tag name (`p`) and a descendant chain
//! (`div p`, `body div p`). Chains are built left-associatively, so
//! `a b c` is `Descendant(Descendant(a, b), c)`.

use std::fmt;

use wren_dom::{DomTree, NodeId};

/// A parsed selector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selector {
    /// Matches elements with this (lower-case) tag name.
    Tag(String),

    /// [§ 16.1 Descendant combinator](https://www.w3.org/TR/selectors-4/#descendant-combinators)
    ///
    /// "A selector of the form 'A B' represents an element B that is an
    /// arbitrary descendant of some ancestor element A."
    Descendant {
        /// The `A` part.
        ancestor: Box<Selector>,
        /// The `B` part, which must match the element itself.
        descendant: Box<Selector>,
    },
}

impl Selector {
    /// A tag selector.
    #[must_use]
    pub fn tag(name: impl Into<String>) -> Self {
        Self::Tag(name.into())
    }

    /// A descendant selector `ancestor descendant`.
    #[must_use]
    pub fn descendant(ancestor: Self, descendant: Self) -> Self {
        Self::Descendant {
            ancestor: Box::new(ancestor),
            descendant: Box::new(descendant),
        }
    }

    /// Specificity: one per tag name in the selector.
    #[must_use]
    pub fn specificity(&self) -> u32 {
        match self {
            Self::Tag(_) => 1,
            Self::Descendant {
                ancestor,
                descendant,
            } => ancestor.specificity() + descendant.specificity(),
        }
    }

    /// Whether the node `id` is matched by this selector.
    ///
    /// Text nodes never match.
    #[must_use]
    pub fn matches(&self, tree: &DomTree, id: NodeId) -> bool {
        match self {
            Self::Tag(tag) => tree.as_element(id).is_some_and(|e| e.is(tag)),
            Self::Descendant {
                ancestor,
                descendant,
            } => {
                // The descendant part must match the element itself.
                if !descendant.matches(tree, id) {
                    return false;
                }
                tree.ancestors(id).any(|a| ancestor.matches(tree, a))
            }
        }
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Tag(tag) => f.write_str(tag),
            Self::Descendant {
                ancestor,
                descendant,
            } => write!(f, "{ancestor} {descendant}"),
        }
    }
}
