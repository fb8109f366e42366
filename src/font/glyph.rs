//! Glyph identities, resolved glyphs, and scaled metrics.

use crate::ctx::Style;
use crate::data::{Font, GlyphMetrics};
use std::fmt;
use std::hash::{Hash, Hasher};

/// A character classification used to select the slot of a text-style mapping.
///
/// The discriminants are the slot indices of a [`TextStyleMapping`](crate::data::TextStyleMapping).
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy)]
pub enum CharKind {
    /// A decimal digit, `'0'` to `'9'`.
    Digit = 0,
    /// A capital Latin letter, `'A'` to `'Z'`.
    Capital = 1,
    /// A small Latin letter, `'a'` to `'z'`.
    Small = 2,
    /// Any other code point.
    Unicode = 3,
}

impl CharKind {
    /// Classifies a character and computes its offset.
    ///
    /// Digits and letters yield their position within their range; any other character yields the [`Unicode`](CharKind::Unicode) kind with the code point itself as the offset.
    ///
    /// # Example
    ///
    /// ```
    /// # use metrica::font::glyph::CharKind;
    /// assert_eq!(CharKind::classify('7'), (CharKind::Digit, 7));
    /// assert_eq!(CharKind::classify('c'), (CharKind::Small, 2));
    /// assert_eq!(CharKind::classify('Z'), (CharKind::Capital, 25));
    /// assert_eq!(CharKind::classify('∞'), (CharKind::Unicode, 0x221E));
    /// ```
    pub fn classify(c: char) -> (CharKind, u32) {
        match c {
            '0'..='9' => (CharKind::Digit, c as u32 - '0' as u32),
            'A'..='Z' => (CharKind::Capital, c as u32 - 'A' as u32),
            'a'..='z' => (CharKind::Small, c as u32 - 'a' as u32),
            _ => (CharKind::Unicode, c as u32),
        }
    }
}

/// A font-relative glyph identity.
///
/// A `CharFont` is a lightweight key, not an owning reference: it names a glyph code within a font, optionally with a dedicated bold companion font and the style it was resolved at.
///
/// Equality and hashing consider only the glyph code and font id.
/// Two identities that agree on those are interchangeable for kerning and ligature lookups regardless of their style tag.
#[derive(Debug, Clone, Copy)]
pub struct CharFont {
    /// The glyph code within the font.
    pub code: u32,
    /// The id of the font holding the glyph.
    pub font: usize,
    /// The id of a dedicated bold companion font, if one is mapped.
    pub bold_font: Option<usize>,
    /// The style the identity was resolved at, if any.
    pub style: Option<Style>,
}

impl CharFont {
    /// Creates an identity without a bold companion or style tag.
    pub fn new(code: u32, font: usize) -> Self {
        CharFont {
            code,
            font,
            bold_font: None,
            style: None,
        }
    }

    /// Creates an identity with a dedicated bold companion font.
    pub fn with_bold(code: u32, font: usize, bold_font: usize) -> Self {
        CharFont {
            code,
            font,
            bold_font: Some(bold_font),
            style: None,
        }
    }
}

impl PartialEq for CharFont {
    fn eq(&self, other: &Self) -> bool {
        self.code == other.code && self.font == other.font
    }
}

impl Eq for CharFont {}

impl Hash for CharFont {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.code.hash(state);
        self.font.hash(state);
    }
}

impl fmt::Display for CharFont {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "U+{:04X} in font {}", self.code, self.font)
    }
}

/// Scaled glyph metrics.
///
/// Metrics are immutable and only ever produced by scaling raw [`GlyphMetrics`](crate::data::GlyphMetrics) with a point size and the pixels-per-point conversion of the bank.
/// Both the pixel-space size and the raw point size are retained: later layout stages need both units.
#[derive(Debug, PartialEq, Clone, Copy)]
pub struct Metrics {
    /// The advance width in pixels.
    pub width: f32,
    /// The extent above the baseline in pixels.
    pub height: f32,
    /// The extent below the baseline in pixels.
    pub depth: f32,
    /// The italic correction in pixels.
    pub italic: f32,
    /// The glyph size in pixels.
    pub size_px: f32,
    /// The glyph size in points.
    pub size_pt: f32,
}

impl Metrics {
    /// Scales raw font-unit metrics to a point size.
    ///
    /// The dimensions are multiplied by `size_pt × pixels_per_point`, yielding pixel-space extents.
    pub fn scaled(raw: GlyphMetrics, size_pt: f32, pixels_per_point: f32) -> Self {
        let multiplier = size_pt * pixels_per_point;
        Metrics {
            width: raw.width * multiplier,
            height: raw.height * multiplier,
            depth: raw.depth * multiplier,
            italic: raw.italic * multiplier,
            size_px: multiplier,
            size_pt,
        }
    }
}

/// A resolved glyph: the externally visible result of every resolution query.
///
/// A `Char` borrows the font handle from the bank it was resolved against, so it cannot outlive the registries.
#[derive(Debug, PartialEq, Clone, Copy)]
pub struct Char<'a> {
    /// The resolved glyph code.
    pub code: u32,
    /// The graphic-layer handle of the resolved font.
    pub font: &'a Font,
    /// The id of the resolved font.
    pub font_id: usize,
    /// The scaled metrics of the glyph.
    pub metrics: Metrics,
}

impl<'a> Char<'a> {
    /// Returns the glyph identity of the resolved glyph.
    pub fn char_font(&self) -> CharFont {
        CharFont::new(self.code, self.font_id)
    }
}

/// An extensible glyph assembled from up to four parts.
///
/// A `None` slot means the glyph has no stretch part in that position.
/// Layout must treat absent slots as absent, not as zero-size.
#[derive(Debug, PartialEq, Clone, Copy)]
pub struct Extension<'a> {
    /// The top part.
    pub top: Option<Char<'a>>,
    /// The middle part.
    pub mid: Option<Char<'a>>,
    /// The repeatable part.
    pub rep: Option<Char<'a>>,
    /// The bottom part.
    pub bot: Option<Char<'a>>,
}
