//! High-level browser API for the Wren renderer.
//!
//! # Scope
//!
//! This crate provides:
//! - **Document Loading** - read HTML and stylesheet files from disk
//! - **Rendering Session** - [`Browser`] owns the parsed DOM, the cascade,
//!   the font caches, and the current display list, and re-runs style,
//!   layout, and paint on load and resize
//! - **Scrolling** - a clamped scroll offset over the painted page
//! - **Software Rendering** - headless screenshot generation
//!
//! # Not Yet Implemented
//!
//! - Network fetching: the caller supplies document and stylesheet bodies
//! - Incremental re-layout

pub mod font_metrics;
pub mod renderer;

pub use wren_css as css;
pub use wren_dom as dom;
pub use wren_html as html;

use std::fs;
use std::path::Path;

use thiserror::Error;
use wren_common::warning::clear_warnings;
use wren_css::{
    DisplayList, FontCache, LayoutTree, Rule, Surface, cascade_rules, paint, parse_stylesheet,
    style, style_elements, stylesheet_links,
};
use wren_dom::DomTree;

/// Viewport geometry and scroll behaviour.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewportConfig {
    /// Viewport width in pixels.
    pub width: f32,
    /// Viewport height in pixels.
    pub height: f32,
    /// Distance moved by one scroll step.
    pub scroll_step: f32,
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 600.0,
            scroll_step: 50.0,
        }
    }
}

/// Error type for document loading.
#[derive(Debug, Error)]
pub enum LoadError {
    /// Failed to read a document or stylesheet.
    #[error("failed to read '{path}': {source}")]
    File {
        /// The path that could not be read.
        path: String,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}

/// Read a document or stylesheet body from disk.
///
/// # Errors
///
/// Returns [`LoadError::File`] if the file cannot be read as UTF-8.
pub fn read_source(path: &Path) -> Result<String, LoadError> {
    fs::read_to_string(path).map_err(|source| LoadError::File {
        path: path.display().to_string(),
        source,
    })
}

/// One rendering session.
///
/// A session holds at most one loaded document. Loading parses it once;
/// every load and resize then restyles the DOM, lays it out from scratch,
/// and repaints. The font cache lives as long as the session.
#[derive(Debug)]
pub struct Browser {
    config: ViewportConfig,
    fonts: FontCache,
    dom: DomTree,
    rules: Vec<Rule>,
    layout: Option<LayoutTree>,
    display_list: DisplayList,
    scroll: f32,
}

impl Browser {
    /// A session that measures text with approximate metrics.
    #[must_use]
    pub fn new(config: ViewportConfig) -> Self {
        Self::with_fonts(config, FontCache::default())
    }

    /// A session that measures text through `fonts`.
    #[must_use]
    pub fn with_fonts(config: ViewportConfig, fonts: FontCache) -> Self {
        Self {
            config,
            fonts,
            dom: DomTree::new(),
            rules: Vec::new(),
            layout: None,
            display_list: DisplayList::new(),
            scroll: 0.0,
        }
    }

    /// Load a document.
    ///
    /// `body` is parsed as HTML, or shown as raw text when `view_source` is
    /// set. The cascade is the default rules, then every `<style>` element
    /// in document order, then `stylesheets` in the order given. Scroll is
    /// reset to the top.
    pub fn load(&mut self, body: &str, view_source: bool, stylesheets: &[String]) {
        clear_warnings();
        self.dom = wren_html::parse_document(body, view_source);

        let inline_sheets = style_elements(&self.dom);
        let author = inline_sheets
            .iter()
            .chain(stylesheets)
            .flat_map(|sheet| parse_stylesheet(sheet));
        self.rules = cascade_rules(author);
        log::debug!(
            "load: {} nodes, {} rules ({} inline sheets, {} external)",
            self.dom.len(),
            self.rules.len(),
            inline_sheets.len(),
            stylesheets.len()
        );

        self.scroll = 0.0;
        self.render();
    }

    /// Change the viewport size and lay the page out again.
    pub fn resize(&mut self, width: f32, height: f32) {
        self.config.width = width;
        self.config.height = height;
        self.render();
        self.scroll = self.scroll.min(self.max_scroll());
    }

    /// Scroll down one step, stopping at the bottom of the page.
    pub fn scroll_down(&mut self) {
        self.scroll = (self.scroll + self.config.scroll_step).min(self.max_scroll());
    }

    /// Scroll up one step, stopping at the top of the page.
    pub fn scroll_up(&mut self) {
        self.scroll = (self.scroll - self.config.scroll_step).max(0.0);
    }

    /// Scroll to `offset`, clamped to the page.
    pub fn scroll_to(&mut self, offset: f32) {
        self.scroll = offset.clamp(0.0, self.max_scroll());
    }

    fn max_scroll(&self) -> f32 {
        (self.total_height() - self.config.height).max(0.0)
    }

    fn render(&mut self) {
        style(&mut self.dom, &self.rules);
        let layout = LayoutTree::layout(&self.dom, self.config.width, &mut self.fonts);
        self.display_list = paint(&layout);
        self.layout = Some(layout);
        log::debug!(
            "render: {} commands, page height {}",
            self.display_list.len(),
            self.total_height()
        );
    }

    /// Execute the commands visible at the current scroll offset.
    pub fn draw(&self, surface: &mut dyn Surface) {
        self.display_list
            .execute_visible(self.scroll, self.config.height, surface);
    }

    /// Current viewport settings.
    #[must_use]
    pub const fn config(&self) -> &ViewportConfig {
        &self.config
    }

    /// The parsed (and styled) document.
    #[must_use]
    pub const fn dom(&self) -> &DomTree {
        &self.dom
    }

    /// The sorted cascade in effect.
    #[must_use]
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// The box tree from the last layout, if a document was loaded.
    #[must_use]
    pub const fn layout_tree(&self) -> Option<&LayoutTree> {
        self.layout.as_ref()
    }

    /// The draw commands from the last paint.
    #[must_use]
    pub const fn display_list(&self) -> &DisplayList {
        &self.display_list
    }

    /// Scrollable page height; the viewport height for an empty page.
    #[must_use]
    pub fn total_height(&self) -> f32 {
        self.display_list.total_height(self.config.height)
    }

    /// Current scroll offset.
    #[must_use]
    pub const fn scroll(&self) -> f32 {
        self.scroll
    }

    /// Stylesheets the loaded document links to, for the caller to fetch
    /// and pass to the next [`load`](Self::load).
    #[must_use]
    pub fn stylesheet_links(&self) -> Vec<String> {
        stylesheet_links(&self.dom)
    }
}

impl Default for Browser {
    fn default() -> Self {
        Self::new(ViewportConfig::default())
    }
}
