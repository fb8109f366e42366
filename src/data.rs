//! The source data supplied by the font description parser.
//!
//! The engine never parses font description resources itself.
//! An external parser implements [`DescriptionSource`] and hands over [`FontDescription`] bundles; everything in this module describes the data such a bundle must carry.
//!
//! Font ids are small, dense, non-negative integers that stay index-stable for the process lifetime.
//! The base description establishes ids `0..n`; every alphabet description appends its fonts in order, so the ids it references are absolute.

use crate::error::Result;
use crate::font::glyph::CharFont;
use std::collections::HashMap;

/// An opaque graphic-layer font handle.
///
/// The engine never inspects a handle; it is carried through so that the drawing layer can locate the physical font of a resolved glyph.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct Font {
    /// The family name of the physical font.
    pub family: String,
    /// The path of the font resource.
    pub path: String,
}

impl Font {
    /// Creates a handle for the given family and resource path.
    pub fn new(family: impl Into<String>, path: impl Into<String>) -> Self {
        Font {
            family: family.into(),
            path: path.into(),
        }
    }
}

/// Raw per-glyph metrics in font units.
///
/// Raw metrics are unscaled; [`Metrics`](crate::font::glyph::Metrics) values are produced from them by the engine.
#[derive(Debug, PartialEq, Clone, Copy, Default)]
pub struct GlyphMetrics {
    /// The advance width.
    pub width: f32,
    /// The extent above the baseline.
    pub height: f32,
    /// The extent below the baseline.
    pub depth: f32,
    /// The italic correction.
    pub italic: f32,
}

impl GlyphMetrics {
    /// Creates raw metrics from the four font-unit extents.
    pub fn new(width: f32, height: f32, depth: f32, italic: f32) -> Self {
        GlyphMetrics {
            width,
            height,
            depth,
            italic,
        }
    }
}

/// The glyph codes of the up to four parts of an extensible glyph.
///
/// A `None` slot means the glyph has no stretch part in that position.
/// The slot order (top, mid, rep, bot) matches the declared layout of the font description format.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Default)]
pub struct ExtensionParts {
    /// The top part.
    pub top: Option<u32>,
    /// The middle part.
    pub mid: Option<u32>,
    /// The repeatable part.
    pub rep: Option<u32>,
    /// The bottom part.
    pub bot: Option<u32>,
}

/// The companion variant font ids a font declares.
///
/// A `None` entry means the font has no such variant; the corresponding override flag is then skipped during variant resolution.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Default)]
pub struct VariantIds {
    /// The bold companion font.
    pub bold: Option<usize>,
    /// The roman companion font.
    pub roman: Option<usize>,
    /// The sans-serif companion font.
    pub sans: Option<usize>,
    /// The typewriter companion font.
    pub typewriter: Option<usize>,
    /// The italic companion font.
    pub italic: Option<usize>,
}

/// The metric table of one physical font.
///
/// Populated entirely by the external parser; the engine reads it and never mutates it after the merge.
/// Lookups for relationships a font does not declare (kern pairs, ligatures, extensible parts, larger companions) answer with their defined defaults rather than errors, so partially described fonts degrade gracefully.
#[derive(Debug, Clone)]
pub struct FontInfo {
    /// The graphic-layer handle of the font.
    pub font: Font,
    /// The raw width of the inter-word space in font units.
    pub space: f32,
    /// The companion variant fonts this font declares.
    pub variants: VariantIds,
    metrics: HashMap<u32, GlyphMetrics>,
    kerns: HashMap<(u32, u32), f32>,
    ligatures: HashMap<(u32, u32), u32>,
    extensions: HashMap<u32, ExtensionParts>,
    larger: HashMap<u32, (u32, usize)>,
}

impl FontInfo {
    /// Creates an empty metric table for the given font handle.
    pub fn new(font: Font) -> Self {
        FontInfo {
            font,
            space: 0.0,
            variants: VariantIds::default(),
            metrics: HashMap::new(),
            kerns: HashMap::new(),
            ligatures: HashMap::new(),
            extensions: HashMap::new(),
            larger: HashMap::new(),
        }
    }

    /// Sets the raw metrics of a glyph.
    pub fn set_glyph(&mut self, code: u32, metrics: GlyphMetrics) {
        self.metrics.insert(code, metrics);
    }

    /// Registers a kern value between two glyphs of this font.
    pub fn add_kern(&mut self, left: u32, right: u32, value: f32) {
        self.kerns.insert((left, right), value);
    }

    /// Registers a ligature substitution for a glyph pair of this font.
    pub fn add_ligature(&mut self, left: u32, right: u32, substitution: u32) {
        self.ligatures.insert((left, right), substitution);
    }

    /// Sets the extensible-part table entry of a glyph.
    pub fn set_extension(&mut self, code: u32, parts: ExtensionParts) {
        self.extensions.insert(code, parts);
    }

    /// Declares the next-larger companion glyph of a glyph.
    pub fn set_larger(&mut self, code: u32, larger_code: u32, larger_font: usize) {
        self.larger.insert(code, (larger_code, larger_font));
    }

    /// Returns the raw metrics of a glyph.
    ///
    /// Glyphs the description does not cover yield zero metrics; a hole in the font data must not abort rendering.
    pub fn glyph(&self, code: u32) -> GlyphMetrics {
        self.metrics.get(&code).copied().unwrap_or_default()
    }

    /// Returns the raw kern value between two glyphs, or 0 if the pair declares none.
    pub fn kern(&self, left: u32, right: u32) -> f32 {
        self.kerns.get(&(left, right)).copied().unwrap_or(0.0)
    }

    /// Returns the ligature substitution for a glyph pair, if the font declares one.
    pub fn ligature(&self, left: u32, right: u32) -> Option<u32> {
        self.ligatures.get(&(left, right)).copied()
    }

    /// Returns the extensible-part entry of a glyph, if the font declares one.
    pub fn extension(&self, code: u32) -> Option<ExtensionParts> {
        self.extensions.get(&code).copied()
    }

    /// Returns the next-larger companion `(code, font id)` of a glyph, if the font declares one.
    pub fn larger(&self, code: u32) -> Option<(u32, usize)> {
        self.larger.get(&code).copied()
    }
}

/// A text-style mapping: one optional base glyph per character kind.
///
/// Slots are indexed by [`CharKind`](crate::font::glyph::CharKind) as `usize` (digit, capital, small, Unicode).
pub type TextStyleMapping = [Option<CharFont>; 4];

/// One parsed font description bundle.
///
/// The parser produces one bundle per description resource: one for the base alphabet at init time and one per added alphabet.
/// Merging a bundle appends its fonts and unions its mappings into the process-wide registries; a symbol name colliding with an earlier bundle silently replaces the earlier entry.
#[derive(Debug, Default)]
pub struct FontDescription {
    /// The font metric tables, in dense font-id order.
    pub fonts: Vec<FontInfo>,
    /// Layout constants such as inter-atom spacing.
    pub parameters: HashMap<String, f32>,
    /// Named text-style mappings.
    pub text_styles: HashMap<String, TextStyleMapping>,
    /// The fallback mapping of last resort.
    ///
    /// Only the base description carries one.
    /// The parser validates that the digit, capital, and small slots are present; the engine relies on that validation and does not re-check.
    pub default_text_style: Option<TextStyleMapping>,
    /// Named symbol mappings, such as `"infty"`.
    pub symbols: HashMap<String, CharFont>,
    /// Resolution-relevant settings, including `mufontid` and `spacefontid`.
    pub general_settings: HashMap<String, f32>,
}

/// The interface boundary to the external font description parser.
///
/// Implementations read description resources from disk (or memory) and produce [`FontDescription`] bundles.
/// Malformed resources are reported as [`Error::ParseFailure`](crate::error::Error::ParseFailure).
pub trait DescriptionSource {
    /// Parses the base font description resource.
    fn base(&mut self) -> Result<FontDescription>;

    /// Parses the font description resource of an alphabet package.
    ///
    /// `nested` is true when the load was triggered while another load is already in progress, so the parser can distinguish a fresh top-level load from a recursive one (see [`FontBank::is_loading`](crate::font::FontBank::is_loading)).
    fn alphabet(&mut self, package: &str, file: &str, nested: bool) -> Result<FontDescription>;
}
