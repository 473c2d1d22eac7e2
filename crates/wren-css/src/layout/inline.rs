//! Inline layout: flowing words into lines.
//!
//! [§ 9.4.2 Inline formatting contexts](https://www.w3.org/TR/CSS2/visuren.html#inline-formatting)
//!
//! "In an inline formatting context, boxes are laid out horizontally, one
//! after the other, beginning at the top of a containing block."
//!
//! Words are collected into the current line with box-relative x positions.
//! When a word would overflow the box, the line is flushed: every word in it
//! is aligned on a shared baseline placed 1.25 x the tallest ascent below
//! the cursor, and the cursor drops to 1.25 x the deepest descent below that
//! baseline.

use wren_common::warning::warn_once;
use wren_dom::{DomTree, NodeId, NodeType};

use super::box_tree::PositionedWord;
use super::font::{FontCache, FontKey, FontStyle, FontWeight};
use super::{VSTEP, is_rendered};
use crate::cascade::{DEFAULT_FONT_SIZE_PX, parse_px};
use crate::color::ColorValue;

/// Leading factor applied to both ascent and descent.
const LINE_SPACING: f32 = 1.25;

/// A word on the line that has not been flushed yet.
#[derive(Debug, Clone)]
struct LineItem {
    x: f32,
    text: String,
    font: FontKey,
    color: ColorValue,
    width: f32,
}

/// Pending work in [`InlineLayout::walk`].
#[derive(Debug, Clone, Copy)]
enum Visit {
    Open(NodeId),
    Close(NodeId),
}

/// Lays out the text of one inline-mode box.
pub struct InlineLayout<'a> {
    dom: &'a DomTree,
    fonts: &'a mut FontCache,

    /// Box origin and available width.
    x: f32,
    y: f32,
    width: f32,

    /// Pen position, relative to the box origin.
    cursor_x: f32,
    cursor_y: f32,

    line: Vec<LineItem>,
    words: Vec<PositionedWord>,

    /// Formatting-tag overlays on top of the computed style.
    italic: bool,
    bold: bool,
    size_delta: f32,
}

impl<'a> InlineLayout<'a> {
    /// Start laying out a box at `(x, y)` that is `width` wide.
    #[must_use]
    pub fn new(dom: &'a DomTree, fonts: &'a mut FontCache, x: f32, y: f32, width: f32) -> Self {
        Self {
            dom,
            fonts,
            x,
            y,
            width,
            cursor_x: 0.0,
            cursor_y: 0.0,
            line: Vec::new(),
            words: Vec::new(),
            italic: false,
            bold: false,
            size_delta: 0.0,
        }
    }

    /// Flow the subtree rooted at `node` and return the positioned words
    /// and the height they occupy.
    #[must_use]
    pub fn run(mut self, node: NodeId) -> (Vec<PositionedWord>, f32) {
        self.walk(node);
        self.flush();
        (self.words, self.cursor_y)
    }

    /// Visit the subtree in document order, opening each element's tag
    /// before its children and closing it after them.
    fn walk(&mut self, node: NodeId) {
        let dom = self.dom;
        let mut stack = vec![Visit::Open(node)];
        while let Some(visit) = stack.pop() {
            match visit {
                Visit::Open(node) => match dom.get(node).map(|n| &n.node_type) {
                    Some(NodeType::Text(text)) => {
                        for word in text.split_whitespace() {
                            self.word(node, word);
                        }
                    }
                    Some(NodeType::Element(element)) => {
                        if !is_rendered(dom, node) {
                            continue;
                        }
                        self.open_tag(element.tag_name.as_str());
                        stack.push(Visit::Close(node));
                        stack.extend(dom.children(node).iter().rev().map(|&c| Visit::Open(c)));
                    }
                    None => {}
                },
                Visit::Close(node) => {
                    if let Some(tag) = dom.tag_name(node) {
                        self.close_tag(tag);
                    }
                }
            }
        }
    }

    fn open_tag(&mut self, tag: &str) {
        match tag {
            "i" => self.italic = true,
            "b" => self.bold = true,
            "small" => self.size_delta -= 2.0,
            "big" => self.size_delta += 4.0,
            "br" => self.flush(),
            _ => {}
        }
    }

    fn close_tag(&mut self, tag: &str) {
        match tag {
            "i" => self.italic = false,
            "b" => self.bold = false,
            "small" => self.size_delta += 2.0,
            "big" => self.size_delta -= 4.0,
            "p" => {
                self.flush();
                self.cursor_y += VSTEP;
            }
            _ => {}
        }
    }

    /// The font and color for a word in `node`: its computed style with
    /// the formatting-tag overlays applied.
    fn font_for(&self, node: NodeId) -> (FontKey, ColorValue) {
        let style = self.dom.computed_style(node);
        let prop = |name: &str| style.and_then(|s| s.get(name)).map(String::as_str);

        let size = match prop("font-size") {
            None => DEFAULT_FONT_SIZE_PX,
            Some(value) => parse_px::<f32>(value).unwrap_or_else(|| {
                let _ = warn_once(
                    "Layout",
                    &format!("unsupported font-size '{value}', using {DEFAULT_FONT_SIZE_PX}px"),
                );
                DEFAULT_FONT_SIZE_PX
            }),
        };
        let weight = if self.bold {
            FontWeight::Bold
        } else {
            prop("font-weight").map_or(FontWeight::Normal, FontWeight::from_css)
        };
        let slant = if self.italic {
            FontStyle::Italic
        } else {
            prop("font-style").map_or(FontStyle::Normal, FontStyle::from_css)
        };
        let color = prop("color").map_or(ColorValue::BLACK, |c| {
            ColorValue::from_css(c, ColorValue::BLACK)
        });

        (FontKey::new(size + self.size_delta, weight, slant), color)
    }

    fn word(&mut self, node: NodeId, text: &str) {
        let (font, color) = self.font_for(node);
        let width = self.fonts.measure(font, text);
        if self.cursor_x + width > self.width {
            self.flush();
        }
        self.line.push(LineItem {
            x: self.cursor_x,
            text: text.to_string(),
            font,
            color,
            width,
        });
        self.cursor_x += width + self.fonts.metrics(font).space_width;
    }

    /// Place the pending line on a shared baseline and start a new one.
    fn flush(&mut self) {
        if self.line.is_empty() {
            return;
        }
        let line = std::mem::take(&mut self.line);
        let metrics: Vec<_> = line.iter().map(|item| self.fonts.metrics(item.font)).collect();

        let max_ascent = metrics.iter().map(|m| m.ascent).fold(0.0, f32::max);
        let baseline = self.cursor_y + LINE_SPACING * max_ascent;

        for (item, m) in line.into_iter().zip(&metrics) {
            self.words.push(PositionedWord {
                x: self.x + item.x,
                y: self.y + baseline - m.ascent,
                text: item.text,
                font: item.font,
                color: item.color,
                width: item.width,
                height: m.ascent + m.descent,
            });
        }

        let max_descent = metrics.iter().map(|m| m.descent).fold(0.0, f32::max);
        self.cursor_y = baseline + LINE_SPACING * max_descent;
        self.cursor_x = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cascade::{sort_rules, style};
    use crate::ua_stylesheet::default_rules;

    fn styled(html: &str) -> DomTree {
        let mut tree = wren_html::parse_document(html, false);
        let mut rules = default_rules().to_vec();
        sort_rules(&mut rules);
        style(&mut tree, &rules);
        tree
    }

    fn find_element(tree: &DomTree, tag: &str) -> NodeId {
        tree.iter_all()
            .find(|&id| tree.tag_name(id) == Some(tag))
            .unwrap_or_else(|| panic!("no <{tag}> in tree"))
    }

    fn flow(html: &str, tag: &str, width: f32) -> (Vec<PositionedWord>, f32) {
        let tree = styled(html);
        let mut fonts = FontCache::default();
        let node = find_element(&tree, tag);
        InlineLayout::new(&tree, &mut fonts, 0.0, 0.0, width).run(node)
    }

    #[test]
    fn test_small_and_big_restore_size() {
        let (words, _) = flow("<div>a <small>b</small> <big>c</big> d</div>", "div", 1000.0);
        let sizes: Vec<u32> = words.iter().map(|w| w.font.size).collect();
        assert_eq!(sizes, vec![16, 14, 20, 16]);
    }

    #[test]
    fn test_italic_toggle_overlays_style() {
        let (words, _) = flow("<div><i>a</i> b</div>", "div", 1000.0);
        assert_eq!(words[0].font.style, FontStyle::Italic);
        assert_eq!(words[1].font.style, FontStyle::Normal);
    }

    #[test]
    fn test_br_forces_new_line() {
        let (words, _) = flow("<div>a<br>b</div>", "div", 1000.0);
        assert!(words[1].y > words[0].y);
        assert!(words[1].x.abs() < 1e-4);
    }

    #[test]
    fn test_closing_p_adds_gap() {
        let (_, height) = flow("<p>a</p>", "p", 1000.0);
        // One 16px line: 1.25 * (12.8 + 3.2) = 20, plus the paragraph gap.
        assert!((height - (20.0 + VSTEP)).abs() < 1e-3);
    }

    #[test]
    fn test_hidden_children_are_skipped() {
        let (words, _) = flow("<div>a<script>var x</script> b</div>", "div", 1000.0);
        let texts: Vec<&str> = words.iter().map(|w| w.text.as_str()).collect();
        assert_eq!(texts, vec!["a", "b"]);
    }

    #[test]
    fn test_empty_subtree_has_no_height() {
        let (words, height) = flow("<div><span></span></div>", "div", 1000.0);
        assert!(words.is_empty());
        assert!(height.abs() < f32::EPSILON);
    }
}
