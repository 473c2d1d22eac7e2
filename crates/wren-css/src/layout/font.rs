//! Fonts as layout sees them: a key, three metrics, and a session cache.
//!
//! [§ 10.8 Line height calculations](https://www.w3.org/TR/CSS2/visudet.html#line-height)
//!
//! "CSS assumes that every font has font metrics that specify a
//! characteristic height above the baseline and a depth below it."

use std::collections::HashMap;
use std::fmt;

use serde::Serialize;
use strum_macros::{Display, EnumString};

/// [§ 3.2 'font-weight'](https://www.w3.org/TR/css-fonts-4/#font-weight-prop)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Display, EnumString)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum FontWeight {
    /// Regular weight.
    #[default]
    Normal,
    /// Bold weight.
    Bold,
}

impl FontWeight {
    /// Read a computed `font-weight` value. Numeric weights of 600 and up
    /// count as bold; anything unrecognised is normal.
    #[must_use]
    pub fn from_css(value: &str) -> Self {
        if let Ok(weight) = value.parse::<Self>() {
            return weight;
        }
        match value {
            "bolder" => Self::Bold,
            _ => match value.parse::<u16>() {
                Ok(n) if n >= 600 => Self::Bold,
                _ => Self::Normal,
            },
        }
    }
}

/// [§ 3.3 'font-style'](https://www.w3.org/TR/css-fonts-4/#font-style-prop)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Display, EnumString)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum FontStyle {
    /// Upright glyphs.
    #[default]
    Normal,
    /// Slanted glyphs. `oblique` is treated the same.
    #[strum(to_string = "italic", serialize = "oblique")]
    Italic,
}

impl FontStyle {
    /// Read a computed `font-style` value; anything unrecognised is normal.
    #[must_use]
    pub fn from_css(value: &str) -> Self {
        value.parse().unwrap_or_default()
    }
}

/// Largest size a [`FontKey`] holds. Larger computed sizes are clamped so
/// glyph rasterization stays bounded.
pub const MAX_FONT_SIZE_PX: u32 = 1000;

/// Identifies a loaded font: pixel size, weight, and style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct FontKey {
    /// Size in whole pixels.
    pub size: u32,
    /// Weight.
    pub weight: FontWeight,
    /// Style.
    pub style: FontStyle,
}

impl FontKey {
    /// Build a key from a pixel size, rounding to a whole pixel and keeping
    /// it between 1 and [`MAX_FONT_SIZE_PX`].
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn new(size_px: f32, weight: FontWeight, style: FontStyle) -> Self {
        let size = if size_px.is_finite() && size_px > 1.0 {
            (size_px.round() as u32).min(MAX_FONT_SIZE_PX)
        } else {
            1
        };
        Self {
            size,
            weight,
            style,
        }
    }

    /// Size as a float, for metric arithmetic.
    #[must_use]
    pub fn size_px(&self) -> f32 {
        self.size as f32
    }
}

impl fmt::Display for FontKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}px {} {}", self.size, self.weight, self.style)
    }
}

/// A loaded font.
pub trait Font {
    /// Advance width of `text` in pixels.
    fn measure(&self, text: &str) -> f32;

    /// Height above the baseline, positive.
    fn ascent(&self) -> f32;

    /// Depth below the baseline, positive.
    fn descent(&self) -> f32;

    /// Distance from the top of one line to the next without extra leading.
    fn linespace(&self) -> f32 {
        self.ascent() + self.descent()
    }
}

/// Loads fonts on demand.
pub trait FontProvider {
    /// Load the font for `key`. Must always succeed; a provider that lacks
    /// the exact face falls back to its closest match.
    fn load(&self, key: FontKey) -> Box<dyn Font>;
}

/// Deterministic metrics for tests and headless use.
///
/// Every character is `0.6em` wide; ascent is `0.8em`, descent `0.2em`.
/// Bold text is slightly wider so weight changes are visible in layout.
#[derive(Debug, Clone, Copy, Default)]
pub struct ApproximateFontMetrics;

/// The font handed out by [`ApproximateFontMetrics`].
#[derive(Debug, Clone, Copy)]
pub struct ApproximateFont {
    size: f32,
    char_width: f32,
}

impl ApproximateFont {
    const CHAR_WIDTH_RATIO: f32 = 0.6;
    const BOLD_WIDTH_RATIO: f32 = 0.65;
    const ASCENT_RATIO: f32 = 0.8;
    const DESCENT_RATIO: f32 = 0.2;

    /// Metrics for `key`.
    #[must_use]
    pub fn new(key: FontKey) -> Self {
        let size = key.size_px();
        let ratio = match key.weight {
            FontWeight::Normal => Self::CHAR_WIDTH_RATIO,
            FontWeight::Bold => Self::BOLD_WIDTH_RATIO,
        };
        Self {
            size,
            char_width: size * ratio,
        }
    }
}

impl Font for ApproximateFont {
    fn measure(&self, text: &str) -> f32 {
        text.chars().count() as f32 * self.char_width
    }

    fn ascent(&self) -> f32 {
        self.size * Self::ASCENT_RATIO
    }

    fn descent(&self) -> f32 {
        self.size * Self::DESCENT_RATIO
    }
}

impl FontProvider for ApproximateFontMetrics {
    fn load(&self, key: FontKey) -> Box<dyn Font> {
        Box::new(ApproximateFont::new(key))
    }
}

/// Metrics of one font, copied out of the cache.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FontMetrics {
    /// Height above the baseline.
    pub ascent: f32,
    /// Depth below the baseline.
    pub descent: f32,
    /// Width of a single space.
    pub space_width: f32,
}

/// Session-owned font and word-width cache.
///
/// Keyed purely by inputs and never invalidated: the same key always loads
/// the same font and the same word always measures the same.
pub struct FontCache {
    provider: Box<dyn FontProvider>,
    fonts: HashMap<FontKey, Box<dyn Font>>,
    widths: HashMap<(FontKey, String), f32>,
}

impl FontCache {
    /// Create an empty cache over `provider`.
    #[must_use]
    pub fn new(provider: impl FontProvider + 'static) -> Self {
        Self {
            provider: Box::new(provider),
            fonts: HashMap::new(),
            widths: HashMap::new(),
        }
    }

    /// The font for `key`, loading it on first use.
    pub fn font(&mut self, key: FontKey) -> &dyn Font {
        let provider = &self.provider;
        &**self.fonts.entry(key).or_insert_with(|| {
            log::trace!("font cache: loading {key}");
            provider.load(key)
        })
    }

    /// Width of `word` in the font for `key`, measured once.
    pub fn measure(&mut self, key: FontKey, word: &str) -> f32 {
        if let Some(&width) = self.widths.get(&(key, word.to_string())) {
            return width;
        }
        let width = self.font(key).measure(word);
        let _ = self.widths.insert((key, word.to_string()), width);
        width
    }

    /// Ascent, descent, and space width for `key`.
    pub fn metrics(&mut self, key: FontKey) -> FontMetrics {
        let space_width = self.measure(key, " ");
        let font = self.font(key);
        FontMetrics {
            ascent: font.ascent(),
            descent: font.descent(),
            space_width,
        }
    }

    /// Number of distinct fonts loaded so far.
    #[must_use]
    pub fn loaded_fonts(&self) -> usize {
        self.fonts.len()
    }
}

impl Default for FontCache {
    fn default() -> Self {
        Self::new(ApproximateFontMetrics)
    }
}

impl fmt::Debug for FontCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FontCache")
            .field("fonts", &self.fonts.len())
            .field("widths", &self.widths.len())
            .finish_non_exhaustive()
    }
}
