//! Font metrics backed by fontdue for accurate text measurement during layout.
//!
//! [§ 10.8 Line height calculations](https://www.w3.org/TR/CSS2/visudet.html#line-height)
//!
//! "CSS assumes that every font has font metrics that specify a
//! characteristic height above the baseline and a depth below it."
//!
//! [`SystemFonts`] searches well-known system paths once per session for a
//! regular face and its bold, italic, and bold-italic variants. The same
//! faces feed both layout (through [`FontProvider`]) and the software
//! [`Renderer`](crate::renderer::Renderer), so measured and drawn widths
//! agree.

use std::rc::Rc;

use fontdue::FontSettings;
use wren_css::{ApproximateFont, Font, FontKey, FontProvider, FontStyle, FontWeight};

/// Common system font paths to search for a default (regular) font.
const FONT_SEARCH_PATHS: &[&str] = &[
    // macOS
    "/System/Library/Fonts/Helvetica.ttc",
    "/System/Library/Fonts/SFNS.ttf",
    "/Library/Fonts/Arial.ttf",
    "/System/Library/Fonts/Supplemental/Arial.ttf",
    // Linux
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
    "/usr/share/fonts/truetype/freefont/FreeSans.ttf",
    // Windows
    "C:\\Windows\\Fonts\\arial.ttf",
    "C:\\Windows\\Fonts\\segoeui.ttf",
];

/// System font paths for bold variants.
const FONT_BOLD_SEARCH_PATHS: &[&str] = &[
    "/System/Library/Fonts/Supplemental/Arial Bold.ttf",
    "/Library/Fonts/Arial Bold.ttf",
    "/usr/share/fonts/truetype/dejavu/DejaVuSans-Bold.ttf",
    "/usr/share/fonts/TTF/DejaVuSans-Bold.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Bold.ttf",
    "/usr/share/fonts/truetype/freefont/FreeSansBold.ttf",
    "C:\\Windows\\Fonts\\arialbd.ttf",
];

/// System font paths for italic variants.
const FONT_ITALIC_SEARCH_PATHS: &[&str] = &[
    "/System/Library/Fonts/Supplemental/Arial Italic.ttf",
    "/Library/Fonts/Arial Italic.ttf",
    "/usr/share/fonts/truetype/dejavu/DejaVuSans-Oblique.ttf",
    "/usr/share/fonts/TTF/DejaVuSans-Oblique.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Italic.ttf",
    "/usr/share/fonts/truetype/freefont/FreeSansOblique.ttf",
    "C:\\Windows\\Fonts\\ariali.ttf",
];

/// System font paths for bold-italic variants.
const FONT_BOLD_ITALIC_SEARCH_PATHS: &[&str] = &[
    "/System/Library/Fonts/Supplemental/Arial Bold Italic.ttf",
    "/Library/Fonts/Arial Bold Italic.ttf",
    "/usr/share/fonts/truetype/dejavu/DejaVuSans-BoldOblique.ttf",
    "/usr/share/fonts/TTF/DejaVuSans-BoldOblique.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-BoldItalic.ttf",
    "/usr/share/fonts/truetype/freefont/FreeSansBoldOblique.ttf",
    "C:\\Windows\\Fonts\\arialbi.ttf",
];

/// The regular system face and whichever variants were found.
///
/// Cloning is cheap; the faces are shared.
#[derive(Clone, Default)]
pub struct SystemFonts {
    regular: Option<Rc<fontdue::Font>>,
    bold: Option<Rc<fontdue::Font>>,
    italic: Option<Rc<fontdue::Font>>,
    bold_italic: Option<Rc<fontdue::Font>>,
}

impl SystemFonts {
    /// Search the system font paths.
    ///
    /// Missing faces are not an error: a missing variant falls back to the
    /// closest face found, and with no regular face at all layout uses
    /// approximate metrics and the renderer draws no glyphs.
    #[must_use]
    pub fn discover() -> Self {
        let fonts = Self {
            regular: load_font_from_paths(FONT_SEARCH_PATHS, "regular"),
            bold: load_font_from_paths(FONT_BOLD_SEARCH_PATHS, "bold"),
            italic: load_font_from_paths(FONT_ITALIC_SEARCH_PATHS, "italic"),
            bold_italic: load_font_from_paths(FONT_BOLD_ITALIC_SEARCH_PATHS, "bold-italic"),
        };
        if fonts.regular.is_none() {
            let searched = FONT_SEARCH_PATHS.join(", ");
            log::warn!("no system font in {searched}; text is measured approximately, not drawn");
        }
        fonts
    }

    /// Whether a regular face was found.
    #[must_use]
    pub const fn has_regular(&self) -> bool {
        self.regular.is_some()
    }

    /// The best available face for `weight` and `style`, falling back
    /// through: exact match, partial match, regular.
    #[must_use]
    pub fn select(&self, weight: FontWeight, style: FontStyle) -> Option<Rc<fontdue::Font>> {
        let is_bold = weight == FontWeight::Bold;
        let is_italic = style == FontStyle::Italic;
        let face = match (is_bold, is_italic) {
            (true, true) => self
                .bold_italic
                .as_ref()
                .or(self.bold.as_ref())
                .or(self.regular.as_ref()),
            (true, false) => self.bold.as_ref().or(self.regular.as_ref()),
            (false, true) => self.italic.as_ref().or(self.regular.as_ref()),
            (false, false) => self.regular.as_ref(),
        };
        face.cloned()
    }
}

impl std::fmt::Debug for SystemFonts {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SystemFonts")
            .field("regular", &self.regular.is_some())
            .field("bold", &self.bold.is_some())
            .field("italic", &self.italic.is_some())
            .field("bold_italic", &self.bold_italic.is_some())
            .finish()
    }
}

/// Try to load a font from a list of filesystem paths.
fn load_font_from_paths(paths: &[&str], label: &str) -> Option<Rc<fontdue::Font>> {
    for path in paths {
        let Ok(data) = std::fs::read(path) else {
            continue;
        };
        match fontdue::Font::from_bytes(data, FontSettings::default()) {
            Ok(font) => {
                log::debug!("loaded {label} font: {path}");
                return Some(Rc::new(font));
            }
            Err(e) => log::debug!("skipping {label} font {path}: {e}"),
        }
    }
    None
}

impl FontProvider for SystemFonts {
    fn load(&self, key: FontKey) -> Box<dyn Font> {
        match self.select(key.weight, key.style) {
            Some(face) => Box::new(FontdueFont::new(face, key.size_px())),
            None => Box::new(ApproximateFont::new(key)),
        }
    }
}

/// One system face at one pixel size.
///
/// This implementation queries fontdue for exact per-character advance
/// widths. It uses `Font::metrics()` (not `Font::rasterize()`) to avoid the
/// cost of bitmap generation when only measurements are needed.
pub struct FontdueFont {
    face: Rc<fontdue::Font>,
    size: f32,
    ascent: f32,
    descent: f32,
}

impl FontdueFont {
    /// Wrap `face` at `size` pixels.
    #[must_use]
    pub fn new(face: Rc<fontdue::Font>, size: f32) -> Self {
        // Faces without a hhea table get the same proportions as the
        // approximate metrics.
        let (ascent, descent) = face
            .horizontal_line_metrics(size)
            .map_or((size * 0.8, size * 0.2), |m| (m.ascent, -m.descent));
        Self {
            face,
            size,
            ascent,
            descent,
        }
    }
}

impl Font for FontdueFont {
    fn measure(&self, text: &str) -> f32 {
        // Sum per-character advance widths, matching the cursor advancement
        // used in Renderer::draw_text (renderer.rs).
        text.chars()
            .filter(|ch| !ch.is_control())
            .map(|ch| self.face.metrics(ch, self.size).advance_width)
            .sum()
    }

    fn ascent(&self) -> f32 {
        self.ascent
    }

    fn descent(&self) -> f32 {
        self.descent
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_faces_falls_back_to_approximate_metrics() {
        let fonts = SystemFonts::default();
        assert!(!fonts.has_regular());
        assert!(fonts.select(FontWeight::Bold, FontStyle::Italic).is_none());

        let key = FontKey::new(10.0, FontWeight::Normal, FontStyle::Normal);
        let font = fonts.load(key);
        assert!((font.measure("abcd") - 24.0).abs() < 1e-4);
        assert!((font.ascent() - 8.0).abs() < 1e-4);
    }

    #[test]
    fn test_system_fonts_measure_consistently() {
        let fonts = SystemFonts::discover();
        if !fonts.has_regular() {
            return;
        }
        let key = FontKey::new(16.0, FontWeight::Normal, FontStyle::Normal);
        let font = fonts.load(key);
        let one = font.measure("a");
        assert!(one > 0.0);
        assert!((font.measure("aa") - 2.0 * one).abs() < 1e-3);
        assert!(font.ascent() > 0.0);
        assert!(font.descent() >= 0.0);
    }
}
