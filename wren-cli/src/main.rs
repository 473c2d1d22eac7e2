//! Wren CLI
//!
//! Headless front end for the rendering pipeline: load an HTML file, then
//! print its draw list, DOM, or box tree, or save a screenshot.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use owo_colors::OwoColorize;
use wren_browser::font_metrics::SystemFonts;
use wren_browser::renderer::Renderer;
use wren_browser::{Browser, ViewportConfig, read_source};
use wren_css::{FontCache, LayoutTree, layout::BoxId};
use wren_dom::DomTree;
use wren_html::print_tree;

/// Wren - render HTML to a draw list or a screenshot
#[derive(Parser, Debug)]
#[command(name = "wren")]
#[command(author, version, about, long_about = None)]
#[command(after_help = r#"EXAMPLES:
    # Print the draw list
    wren page.html

    # Show the page source instead of rendering it
    wren --view-source page.html

    # Add a stylesheet and print the DOM and box tree
    wren --css extra.css --dom --layout page.html

    # Take a screenshot of the second screenful
    wren -S out.png --scroll 12 page.html

    # Parse inline HTML and dump the draw list as JSON
    wren --html '<p>Hello <b>World</b></p>' --json
"#)]
struct Cli {
    /// Path to the HTML file to render
    #[arg(value_name = "FILE")]
    path: Option<PathBuf>,

    /// Parse HTML string directly instead of a file
    #[arg(long, value_name = "HTML", conflicts_with = "path")]
    html: Option<String>,

    /// Show the document source as plain text
    #[arg(long)]
    view_source: bool,

    /// Extra stylesheet, applied after the document's own (repeatable)
    #[arg(long = "css", value_name = "FILE")]
    stylesheets: Vec<PathBuf>,

    /// Viewport width
    #[arg(long, default_value = "800")]
    width: u32,

    /// Viewport height
    #[arg(long, default_value = "600")]
    height: u32,

    /// Number of scroll steps down before drawing
    #[arg(long, default_value = "0", value_name = "STEPS")]
    scroll: u32,

    /// Measure text with system fonts (always on for screenshots)
    #[arg(long)]
    system_fonts: bool,

    /// Take a screenshot and save to the specified file (PNG format)
    #[arg(short = 'S', long, value_name = "FILE")]
    screenshot: Option<PathBuf>,

    /// Print the DOM tree
    #[arg(long)]
    dom: bool,

    /// Print the box tree with computed geometry
    #[arg(long)]
    layout: bool,

    /// Print the draw list as JSON
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let (body, base) = match (&cli.html, &cli.path) {
        (Some(html), _) => (html.clone(), None),
        (None, Some(path)) => (read_source(path)?, path.parent()),
        (None, None) => anyhow::bail!("a file path or --html is required"),
    };

    let fonts = if cli.system_fonts || cli.screenshot.is_some() {
        SystemFonts::discover()
    } else {
        SystemFonts::default()
    };
    let config = ViewportConfig {
        width: cli.width as f32,
        height: cli.height as f32,
        ..ViewportConfig::default()
    };
    let mut browser = Browser::with_fonts(config, FontCache::new(fonts.clone()));

    browser.load(&body, cli.view_source, &[]);
    let sheets = collect_stylesheets(&browser, base, &cli.stylesheets)?;
    if !sheets.is_empty() {
        browser.load(&body, cli.view_source, &sheets);
    }
    for _ in 0..cli.scroll {
        browser.scroll_down();
    }

    if let Some(ref output_path) = cli.screenshot {
        let mut renderer = Renderer::new(cli.width, cli.height, fonts);
        renderer.render(browser.display_list(), browser.scroll());
        renderer.save(output_path)?;
        println!("Screenshot saved to: {}", output_path.display());
        return Ok(());
    }

    if cli.dom {
        println!("{}", "=== DOM Tree ===".bold());
        print_tree(browser.dom(), browser.dom().root());
        println!();
    }

    if cli.layout {
        println!(
            "{}",
            format!("=== Layout Tree (viewport: {}x{}) ===", cli.width, cli.height).bold()
        );
        if let Some(tree) = browser.layout_tree() {
            print_layout_tree(tree, browser.dom());
        }
        println!();
    }

    if cli.json {
        println!("{}", serde_json::to_string_pretty(browser.display_list())?);
    } else if !cli.dom && !cli.layout {
        for command in browser.display_list() {
            println!("{command}");
        }
        println!(
            "{}",
            format!(
                "{} commands, page height {:.1}, scroll {:.1}",
                browser.display_list().len(),
                browser.total_height(),
                browser.scroll()
            )
            .dimmed()
        );
    }

    Ok(())
}

/// Linked stylesheets resolved against the document's directory, then the
/// `--css` files. A link that cannot be read is skipped with a warning;
/// an unreadable `--css` file is an error.
fn collect_stylesheets(
    browser: &Browser,
    base: Option<&Path>,
    extra: &[PathBuf],
) -> Result<Vec<String>> {
    let mut sheets = Vec::new();
    if let Some(base) = base {
        for href in browser.stylesheet_links() {
            match read_source(&base.join(&href)) {
                Ok(sheet) => sheets.push(sheet),
                Err(e) => log::warn!("skipping stylesheet link '{href}': {e}"),
            }
        }
    }
    for path in extra {
        sheets.push(
            read_source(path).with_context(|| format!("loading --css {}", path.display()))?,
        );
    }
    Ok(sheets)
}

/// Print every layout box with its geometry, indented by depth
fn print_layout_tree(tree: &LayoutTree, dom: &DomTree) {
    let mut stack = vec![(tree.root(), 0)];
    while let Some((id, depth)) = stack.pop() {
        print_layout_box(tree, id, depth, dom);
        stack.extend(tree.children(id).iter().rev().map(|&child| (child, depth + 1)));
    }
}

/// Print one layout box with its geometry
fn print_layout_box(tree: &LayoutTree, id: BoxId, depth: usize, dom: &DomTree) {
    let Some(layout_box) = tree.get(id) else {
        return;
    };
    let indent = "  ".repeat(depth);
    let name = match layout_box.node {
        None => "Document".to_string(),
        Some(node) => dom.tag_name(node).map_or_else(
            || {
                let text = dom.as_text(node).unwrap_or_default();
                let preview: String = text.chars().take(30).collect();
                let suffix = if text.chars().count() > 30 { "..." } else { "" };
                format!("Text(\"{}{}\")", preview.replace('\n', "\\n"), suffix)
            },
            |tag| format!("<{tag}>"),
        ),
    };

    println!("{indent}[{name}] {}", layout_box.mode);
    println!(
        "{indent}  x={:.1} y={:.1} w={:.1} h={:.1}",
        layout_box.x, layout_box.y, layout_box.width, layout_box.height
    );
    if let Some(color) = layout_box.background {
        println!("{indent}  background: {color}");
    }
    if !layout_box.words.is_empty() {
        println!("{indent}  words: {}", layout_box.words.len());
    }
}
