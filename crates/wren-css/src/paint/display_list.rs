//! Display List - a sequence of drawing commands
//!
//! [CSS 2.1 Appendix E](https://www.w3.org/TR/CSS2/zindex.html)
//!
//! The display list is the output of the painting phase. Commands are in
//! painting order (back to front); a later command draws over an earlier one.

use std::fmt;

use serde::Serialize;

use crate::color::ColorValue;
use crate::layout::{FontKey, VSTEP};

/// Something draw commands can be executed against: a window canvas, an
/// offscreen image, or a recorder in tests.
///
/// Coordinates are viewport coordinates, already shifted by the scroll
/// offset.
pub trait Surface {
    /// Fill the rectangle from `(left, top)` to `(right, bottom)`.
    fn fill_rect(&mut self, left: f32, top: f32, right: f32, bottom: f32, color: ColorValue);

    /// Draw `text` with its top-left corner at `(left, top)`.
    fn draw_text(&mut self, left: f32, top: f32, text: &str, font: FontKey, color: ColorValue);
}

/// A single drawing command in page coordinates.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind")]
pub enum DrawCommand {
    /// Draw one word.
    ///
    /// [CSS 2.1 Appendix E.2](https://www.w3.org/TR/CSS2/zindex.html#painting-order)
    /// Step 7: "the element's text"
    DrawText {
        /// Top edge of the line space.
        top: f32,
        /// Left edge.
        left: f32,
        /// `top` plus the font's ascent and descent.
        bottom: f32,
        /// `left` plus the measured width.
        right: f32,
        /// The word.
        text: String,
        /// Font to draw with.
        font: FontKey,
        /// Text color.
        color: ColorValue,
    },

    /// Fill a rectangle with a solid color.
    ///
    /// [CSS 2.1 Appendix E.2](https://www.w3.org/TR/CSS2/zindex.html#painting-order)
    /// Step 2: "the background color of the element"
    DrawRect {
        /// Top edge.
        top: f32,
        /// Left edge.
        left: f32,
        /// Bottom edge.
        bottom: f32,
        /// Right edge.
        right: f32,
        /// Fill color.
        color: ColorValue,
    },
}

impl DrawCommand {
    /// Top edge in page coordinates.
    #[must_use]
    pub const fn top(&self) -> f32 {
        match self {
            Self::DrawText { top, .. } | Self::DrawRect { top, .. } => *top,
        }
    }

    /// Left edge in page coordinates.
    #[must_use]
    pub const fn left(&self) -> f32 {
        match self {
            Self::DrawText { left, .. } | Self::DrawRect { left, .. } => *left,
        }
    }

    /// Bottom edge in page coordinates.
    #[must_use]
    pub const fn bottom(&self) -> f32 {
        match self {
            Self::DrawText { bottom, .. } | Self::DrawRect { bottom, .. } => *bottom,
        }
    }

    /// Right edge in page coordinates.
    #[must_use]
    pub const fn right(&self) -> f32 {
        match self {
            Self::DrawText { right, .. } | Self::DrawRect { right, .. } => *right,
        }
    }

    /// Draw onto `surface` with the page scrolled down by `scroll` pixels.
    pub fn execute(&self, scroll: f32, surface: &mut dyn Surface) {
        match self {
            Self::DrawText {
                top,
                left,
                text,
                font,
                color,
                ..
            } => surface.draw_text(*left, top - scroll, text, *font, *color),
            Self::DrawRect {
                top,
                left,
                bottom,
                right,
                color,
            } => surface.fill_rect(*left, top - scroll, *right, bottom - scroll, *color),
        }
    }
}

impl fmt::Display for DrawCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DrawText {
                top,
                left,
                bottom,
                right,
                text,
                font,
                color,
            } => write!(
                f,
                "text ({left:.1}, {top:.1})-({right:.1}, {bottom:.1}) {font} {color} {text:?}"
            ),
            Self::DrawRect {
                top,
                left,
                bottom,
                right,
                color,
            } => write!(f, "rect ({left:.1}, {top:.1})-({right:.1}, {bottom:.1}) {color}"),
        }
    }
}

/// A display list - the result of painting.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct DisplayList {
    commands: Vec<DrawCommand>,
}

impl DisplayList {
    /// Create an empty display list.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            commands: Vec::new(),
        }
    }

    /// Append a command.
    pub fn push(&mut self, command: DrawCommand) {
        self.commands.push(command);
    }

    /// All commands in painting order.
    #[must_use]
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Number of commands.
    #[must_use]
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    /// Whether nothing was painted.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Height of the scrollable page: the last command's bottom edge plus
    /// `VSTEP`, or `default` (normally the viewport height) when empty.
    #[must_use]
    pub fn total_height(&self, default: f32) -> f32 {
        self.commands.last().map_or(default, |c| c.bottom() + VSTEP)
    }

    /// Execute every command that intersects the viewport
    /// `[scroll, scroll + viewport_height]`, in order.
    pub fn execute_visible(&self, scroll: f32, viewport_height: f32, surface: &mut dyn Surface) {
        for command in &self.commands {
            if command.top() > scroll + viewport_height || command.bottom() < scroll {
                continue;
            }
            command.execute(scroll, surface);
        }
    }
}

impl<'a> IntoIterator for &'a DisplayList {
    type Item = &'a DrawCommand;
    type IntoIter = std::slice::Iter<'a, DrawCommand>;

    fn into_iter(self) -> Self::IntoIter {
        self.commands.iter()
    }
}
