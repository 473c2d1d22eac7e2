use std::fmt::Write as _;

use wren_dom::{AttributesMap, DomTree, ElementData, NodeId, NodeType};

use crate::tags::{is_head_tag, is_self_closing};
use crate::tokenizer::{Attribute, Token};

/// A repair the tree builder made while constructing the tree.
///
/// Malformed markup never fails the parse; these records exist for
/// debugging output only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseIssue {
    /// What was repaired.
    pub message: String,
    /// Index into the token stream where the repair happened.
    pub token_index: usize,
}

/// What is currently open, as far as implicit-tag repair cares.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OpenState {
    Nothing,
    HtmlOnly,
    HtmlHead,
    Deeper,
}

/// The tree builder. Consumes tokens and maintains a stack of open
/// elements, repairing missing `html`/`head`/`body` structure as it goes.
pub struct HTMLParser {
    /// Elements whose end tag has not been seen, outermost first.
    stack_of_open_elements: Vec<NodeId>,

    /// The tree under construction; `NodeId::ROOT` is the `<html>` element.
    tree: DomTree,

    /// Input tokens from the tokenizer.
    tokens: Vec<Token>,

    /// Current position in token stream.
    token_index: usize,

    /// Repairs made so far.
    issues: Vec<ParseIssue>,
}

impl HTMLParser {
    /// Create a new parser from a token stream.
    #[must_use]
    pub const fn new(tokens: Vec<Token>) -> Self {
        Self {
            stack_of_open_elements: Vec::new(),
            tree: DomTree::new(),
            tokens,
            token_index: 0,
            issues: Vec::new(),
        }
    }

    /// Build the tree and return it.
    #[must_use]
    pub fn run(self) -> DomTree {
        self.run_with_issues().0
    }

    /// Build the tree and return it together with the repairs made.
    #[must_use]
    pub fn run_with_issues(mut self) -> (DomTree, Vec<ParseIssue>) {
        let tokens = std::mem::take(&mut self.tokens);
        for (index, token) in tokens.into_iter().enumerate() {
            self.token_index = index;
            self.process_token(token);
        }
        self.finish();
        (self.tree, self.issues)
    }

    fn process_token(&mut self, token: Token) {
        match token {
            Token::Text { data } => self.add_text(data),
            Token::StartTag { name, attributes } => self.add_start_tag(&name, attributes),
            Token::EndTag { name } => self.add_end_tag(&name),
            Token::Declaration { .. } => {}
        }
    }

    fn add_text(&mut self, data: String) {
        if data.trim().is_empty() {
            return;
        }
        self.implicit_tags(None);
        let Some(&parent) = self.stack_of_open_elements.last() else {
            return;
        };
        let node = self.tree.alloc(NodeType::Text(data));
        self.tree.append_child(parent, node);
    }

    fn add_start_tag(&mut self, name: &str, attributes: Vec<Attribute>) {
        self.implicit_tags(Some(name));
        let attrs = attributes_map(attributes);

        if self.open_state() == OpenState::HtmlOnly && matches!(name, "head" | "body") {
            self.open_section(name, attrs);
            return;
        }

        if is_self_closing(name) {
            let Some(&parent) = self.stack_of_open_elements.last() else {
                return;
            };
            let node = self.tree.alloc(element(name, attrs));
            self.tree.append_child(parent, node);
            return;
        }

        let node = self.tree.alloc(element(name, attrs));
        if let Some(&parent) = self.stack_of_open_elements.last() {
            self.tree.append_child(parent, node);
        }
        self.stack_of_open_elements.push(node);
    }

    fn add_end_tag(&mut self, name: &str) {
        let closer = format!("/{name}");
        self.implicit_tags(Some(&closer));
        self.pop_current(&closer);
    }

    /// Pop the innermost open element. The root is never popped here.
    fn pop_current(&mut self, closer: &str) {
        if self.stack_of_open_elements.len() <= 1 {
            self.issue(format!("stray <{closer}> ignored"));
            return;
        }
        let _ = self.stack_of_open_elements.pop();
    }

    /// Synthesize the `html`, `head` and `body` structure the next token
    /// needs, given the token's tag (`/name` for end tags, `None` for text).
    fn implicit_tags(&mut self, tag: Option<&str>) {
        loop {
            match self.open_state() {
                OpenState::Nothing if tag != Some("html") => {
                    self.issue("implied <html>".to_string());
                    let root = self.tree.alloc(element("html", AttributesMap::new()));
                    self.stack_of_open_elements.push(root);
                }
                OpenState::HtmlOnly if !matches!(tag, Some("head" | "body" | "/html")) => {
                    let section = if tag.is_some_and(is_head_tag) {
                        "head"
                    } else {
                        "body"
                    };
                    self.issue(format!("implied <{section}>"));
                    self.open_section(section, AttributesMap::new());
                }
                OpenState::HtmlHead
                    if !(tag == Some("/head") || tag.is_some_and(is_head_tag)) =>
                {
                    self.issue("implied </head>".to_string());
                    self.pop_current("/head");
                }
                _ => break,
            }
        }
    }

    /// Open `head` or `body` directly under the root.
    ///
    /// The root keeps at most one of each, head before body: an existing
    /// section is reopened rather than duplicated, and a head requested
    /// after the body exists reopens the body.
    fn open_section(&mut self, tag: &str, attrs: AttributesMap) {
        let root = NodeId::ROOT;
        let body = self.tree.child_element(root, "body");
        let tag = if tag == "head" && body.is_some() {
            "body"
        } else {
            tag
        };

        let node = if let Some(existing) = self.tree.child_element(root, tag) {
            self.issue(format!("reopened <{tag}>"));
            if let Some(data) = self.tree.as_element_mut(existing) {
                for (key, value) in attrs {
                    let _ = data.attrs.entry(key).or_insert(value);
                }
            }
            existing
        } else {
            let node = self.tree.alloc(element(tag, attrs));
            self.tree.append_child(root, node);
            node
        };
        self.stack_of_open_elements.push(node);
    }

    /// Run repair once more and close everything but the root.
    fn finish(&mut self) {
        self.implicit_tags(None);
        self.stack_of_open_elements.truncate(1);
    }

    fn open_state(&self) -> OpenState {
        let tag = |id: &NodeId| self.tree.tag_name(*id);
        match self.stack_of_open_elements.as_slice() {
            [] => OpenState::Nothing,
            [html] if tag(html) == Some("html") => OpenState::HtmlOnly,
            [html, head] if tag(html) == Some("html") && tag(head) == Some("head") => {
                OpenState::HtmlHead
            }
            _ => OpenState::Deeper,
        }
    }

    fn issue(&mut self, message: String) {
        log::trace!("html: {message}");
        self.issues.push(ParseIssue {
            message,
            token_index: self.token_index,
        });
    }
}

fn element(tag: &str, attrs: AttributesMap) -> NodeType {
    NodeType::Element(ElementData::new(tag, attrs))
}

fn attributes_map(attributes: Vec<Attribute>) -> AttributesMap {
    attributes
        .into_iter()
        .map(|attr| (attr.name, attr.value))
        .collect()
}

/// Render the subtree at `id` as an indented outline, one node per line.
#[must_use]
pub fn dump_tree(tree: &DomTree, id: NodeId) -> String {
    let mut out = String::new();
    let mut stack = vec![(id, 0)];
    while let Some((id, indent)) = stack.pop() {
        dump_node(tree, id, indent, &mut out);
        stack.extend(tree.children(id).iter().rev().map(|&child| (child, indent + 1)));
    }
    out
}

fn dump_node(tree: &DomTree, id: NodeId, indent: usize, out: &mut String) {
    let prefix = "  ".repeat(indent);
    let Some(node) = tree.get(id) else { return };
    match &node.node_type {
        NodeType::Element(data) => {
            if data.attrs.is_empty() {
                let _ = writeln!(out, "{prefix}<{}>", data.tag_name);
            } else {
                let mut attrs: Vec<String> = data
                    .attrs
                    .iter()
                    .map(|(k, v)| {
                        if v.is_empty() {
                            k.clone()
                        } else {
                            format!("{k}=\"{v}\"")
                        }
                    })
                    .collect();
                attrs.sort();
                let _ = writeln!(out, "{prefix}<{} {}>", data.tag_name, attrs.join(" "));
            }
        }
        NodeType::Text(data) => {
            let display = data.replace('\n', "\\n");
            let _ = writeln!(out, "{prefix}\"{display}\"");
        }
    }
}

/// Print the subtree at `id` to stdout.
pub fn print_tree(tree: &DomTree, id: NodeId) {
    print!("{}", dump_tree(tree, id));
}
