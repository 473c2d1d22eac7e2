//! End-to-end tests: HTML and CSS in, display list out.

use wren_css::{
    ColorValue, DisplayList, DrawCommand, FontCache, FontWeight, LayoutTree, VSTEP, cascade_rules,
    paint, parse_stylesheet, style,
};

const EPS: f32 = 1e-3;

fn assert_close(actual: f32, expected: f32) {
    assert!(
        (actual - expected).abs() < EPS,
        "expected {expected}, got {actual}"
    );
}

fn render(html: &str, css: &str) -> DisplayList {
    let mut dom = wren_html::parse_document(html, false);
    style(&mut dom, &cascade_rules(parse_stylesheet(css)));
    paint(&LayoutTree::layout(&dom, 800.0, &mut FontCache::default()))
}

fn rect_colors(list: &DisplayList) -> Vec<ColorValue> {
    list.commands()
        .iter()
        .filter_map(|c| match c {
            DrawCommand::DrawRect { color, .. } => Some(*color),
            DrawCommand::DrawText { .. } => None,
        })
        .collect()
}

#[test]
fn test_bold_word_on_same_line() {
    let list = render("<p>Hello <b>World</b></p>", "");
    assert_eq!(list.len(), 2);

    let DrawCommand::DrawText {
        top, left, text, font, ..
    } = &list.commands()[0]
    else {
        panic!("expected text, got {}", list.commands()[0]);
    };
    assert_eq!(text, "Hello");
    assert_eq!(font.weight, FontWeight::Normal);
    assert_close(*left, 13.0);
    assert_close(*top, 21.2);

    let DrawCommand::DrawText {
        top, left, text, font, ..
    } = &list.commands()[1]
    else {
        panic!("expected text, got {}", list.commands()[1]);
    };
    assert_eq!(text, "World");
    assert_eq!(font.weight, FontWeight::Bold);
    // "Hello" is 5 * 9.6 wide, then one 9.6 space.
    assert_close(*left, 13.0 + 48.0 + 9.6);
    assert_close(*top, 21.2);

    assert_close(list.total_height(600.0), 21.2 + 16.0 + VSTEP);
}

#[test]
fn test_pre_background_painted_before_text() {
    let list = render("<pre>code</pre>", "");
    assert_eq!(list.len(), 2);
    match &list.commands()[0] {
        DrawCommand::DrawRect {
            top,
            left,
            bottom,
            right,
            color,
        } => {
            assert_close(*top, 18.0);
            assert_close(*left, 13.0);
            assert_close(*bottom, 38.0);
            assert_close(*right, 787.0);
            assert_eq!(*color, ColorValue::rgb(128, 128, 128));
        }
        other => panic!("expected rect, got {other}"),
    }
    assert!(matches!(
        &list.commands()[1],
        DrawCommand::DrawText { text, .. } if text == "code"
    ));
}

#[test]
fn test_parent_background_under_child_background() {
    let list = render(
        "<div><pre>x</pre></div>",
        "div { background-color: yellow; }",
    );
    assert_eq!(
        rect_colors(&list),
        vec![ColorValue::rgb(255, 255, 0), ColorValue::rgb(128, 128, 128)]
    );
    assert!(matches!(list.commands()[2], DrawCommand::DrawText { .. }));
}

#[test]
fn test_transparent_background_paints_nothing() {
    let list = render("<pre>x</pre>", "pre { background-color: transparent; }");
    assert!(rect_colors(&list).is_empty());
}

#[test]
fn test_link_text_is_blue() {
    let list = render("<p>see <a>here</a></p>", "");
    let colors: Vec<ColorValue> = list
        .commands()
        .iter()
        .filter_map(|c| match c {
            DrawCommand::DrawText { color, .. } => Some(*color),
            DrawCommand::DrawRect { .. } => None,
        })
        .collect();
    assert_eq!(colors, vec![ColorValue::BLACK, ColorValue::rgb(0, 0, 255)]);
}

#[test]
fn test_commands_are_in_document_order() {
    let list = render("<p>one</p><p>two</p><p>three</p>", "");
    let tops: Vec<f32> = list.commands().iter().map(DrawCommand::top).collect();
    assert_eq!(tops.len(), 3);
    assert!(tops.windows(2).all(|w| w[0] < w[1]));
}

#[test]
fn test_empty_page_uses_default_height() {
    let list = render("", "");
    assert!(list.is_empty());
    assert_close(list.total_height(600.0), 600.0);
}

#[test]
fn test_display_list_json() {
    let list = render("<p>hi</p>", "");
    let json = serde_json::to_value(&list).expect("serialize");
    let commands = json.as_array().expect("array");
    assert_eq!(commands.len(), 1);
    assert_eq!(commands[0]["kind"], "DrawText");
    assert_eq!(commands[0]["text"], "hi");
    assert_eq!(commands[0]["font"]["size"], 16);
}
