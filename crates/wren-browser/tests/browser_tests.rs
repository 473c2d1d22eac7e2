//! Integration tests for the rendering session.

use wren_browser::{Browser, LoadError, ViewportConfig, read_source};
use wren_css::{ColorValue, DrawCommand, FontKey, Surface, VSTEP};

fn text_colors(browser: &Browser) -> Vec<ColorValue> {
    browser
        .display_list()
        .commands()
        .iter()
        .filter_map(|c| match c {
            DrawCommand::DrawText { color, .. } => Some(*color),
            DrawCommand::DrawRect { .. } => None,
        })
        .collect()
}

fn long_page(paragraphs: usize) -> String {
    "<p>line</p>".repeat(paragraphs)
}

#[derive(Default)]
struct Recorder {
    texts: Vec<(f32, String)>,
    rects: usize,
}

impl Surface for Recorder {
    fn fill_rect(&mut self, _: f32, _: f32, _: f32, _: f32, _: ColorValue) {
        self.rects += 1;
    }

    fn draw_text(&mut self, _: f32, top: f32, text: &str, _: FontKey, _: ColorValue) {
        self.texts.push((top, text.to_string()));
    }
}

#[test]
fn test_default_config() {
    let config = ViewportConfig::default();
    assert!((config.width - 800.0).abs() < f32::EPSILON);
    assert!((config.height - 600.0).abs() < f32::EPSILON);
    assert!((config.scroll_step - 50.0).abs() < f32::EPSILON);
}

#[test]
fn test_empty_session() {
    let browser = Browser::default();
    assert!(browser.display_list().is_empty());
    assert!(browser.layout_tree().is_none());
    assert!((browser.total_height() - 600.0).abs() < f32::EPSILON);
}

#[test]
fn test_load_paints_document() {
    let mut browser = Browser::default();
    browser.load("<p>Hello <b>World</b></p>", false, &[]);
    assert_eq!(browser.display_list().len(), 2);
    assert!(browser.layout_tree().is_some());
    assert!((browser.total_height() - (21.2 + 16.0 + VSTEP)).abs() < 1e-3);
}

#[test]
fn test_external_sheets_follow_style_elements() {
    let mut browser = Browser::default();
    browser.load(
        "<style>p { color: red; }</style><p>x</p>",
        false,
        &["p { color: blue; }".to_string()],
    );
    assert_eq!(text_colors(&browser), vec![ColorValue::rgb(0, 0, 255)]);

    browser.load("<style>p { color: red; }</style><p>x</p>", false, &[]);
    assert_eq!(text_colors(&browser), vec![ColorValue::rgb(255, 0, 0)]);
}

#[test]
fn test_view_source_shows_markup() {
    let mut browser = Browser::default();
    browser.load("<b>bold</b>", true, &[]);
    let words: Vec<&str> = browser
        .display_list()
        .commands()
        .iter()
        .filter_map(|c| match c {
            DrawCommand::DrawText { text, .. } => Some(text.as_str()),
            DrawCommand::DrawRect { .. } => None,
        })
        .collect();
    assert_eq!(words, vec!["<b>bold</b>"]);
}

#[test]
fn test_scroll_is_clamped() {
    let mut browser = Browser::default();
    browser.load(&long_page(60), false, &[]);
    let max = browser.total_height() - 600.0;
    assert!(max > 50.0);

    browser.scroll_up();
    assert!(browser.scroll().abs() < f32::EPSILON);

    browser.scroll_down();
    assert!((browser.scroll() - 50.0).abs() < f32::EPSILON);

    browser.scroll_to(1e6);
    assert!((browser.scroll() - max).abs() < 1e-3);
    browser.scroll_down();
    assert!((browser.scroll() - max).abs() < 1e-3);
}

#[test]
fn test_short_page_does_not_scroll() {
    let mut browser = Browser::default();
    browser.load("<p>short</p>", false, &[]);
    browser.scroll_down();
    assert!(browser.scroll().abs() < f32::EPSILON);
}

#[test]
fn test_load_resets_scroll() {
    let mut browser = Browser::default();
    browser.load(&long_page(60), false, &[]);
    browser.scroll_down();
    browser.load(&long_page(60), false, &[]);
    assert!(browser.scroll().abs() < f32::EPSILON);
}

#[test]
fn test_resize_relays_out() {
    let mut browser = Browser::default();
    let page = "<p>one two three four five six seven eight nine ten</p>";
    browser.load(page, false, &[]);
    let wide = browser.total_height();

    browser.resize(150.0, 600.0);
    assert!(browser.total_height() > wide);
    assert!((browser.config().width - 150.0).abs() < f32::EPSILON);
    for command in browser.display_list() {
        assert!(command.right() <= 150.0);
    }
}

#[test]
fn test_resize_clamps_scroll() {
    let mut browser = Browser::default();
    browser.load(&long_page(60), false, &[]);
    browser.scroll_to(1e6);
    browser.resize(800.0, 5000.0);
    assert!(browser.scroll().abs() < f32::EPSILON);
}

#[test]
fn test_draw_only_visible_commands() {
    let mut browser = Browser::new(ViewportConfig {
        width: 800.0,
        height: 100.0,
        scroll_step: 50.0,
    });
    browser.load(&long_page(20), false, &[]);
    browser.scroll_down();

    let mut recorder = Recorder::default();
    browser.draw(&mut recorder);
    assert!(!recorder.texts.is_empty());
    assert!(recorder.texts.len() < 20);
    assert_eq!(recorder.rects, 0);
    for (top, _) in &recorder.texts {
        assert!(*top >= -20.0 && *top <= 100.0, "top {top} outside viewport");
    }
}

#[test]
fn test_deeply_nested_document_renders() {
    let mut browser = Browser::default();
    browser.load(&format!("{}x", "<div>".repeat(50_000)), false, &[]);
    let words: Vec<&str> = browser
        .display_list()
        .commands()
        .iter()
        .filter_map(|c| match c {
            DrawCommand::DrawText { text, .. } => Some(text.as_str()),
            DrawCommand::DrawRect { .. } => None,
        })
        .collect();
    assert_eq!(words, vec!["x"]);
}

#[test]
fn test_stylesheet_links() {
    let mut browser = Browser::default();
    browser.load(r#"<link rel="stylesheet" href="site.css"><p>x</p>"#, false, &[]);
    assert_eq!(browser.stylesheet_links(), vec!["site.css"]);
}

#[test]
fn test_read_missing_file() {
    let err = read_source(std::path::Path::new("/nonexistent/wren/page.html"))
        .expect_err("missing file");
    let LoadError::File { path, .. } = &err;
    assert_eq!(path, "/nonexistent/wren/page.html");
    assert!(err.to_string().starts_with("failed to read '/nonexistent/wren/page.html'"));
}
