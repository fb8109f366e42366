//! Per-glyph resolution queries.
//!
//! A [`Resolver`] pairs a [`FontBank`](crate::font::FontBank) with a per-render [`Config`](crate::ctx::Config) and answers every query the box-layout system poses during typesetting.
//! All queries are pure, bounded lookups over the registries; they mutate nothing and may run freely once loading has quiesced.

use crate::ctx::{Config, Style};
use crate::data::{FontInfo, TextStyleMapping, VariantIds};
use crate::error::{Error, Result};
use crate::font::glyph::{Char, CharFont, CharKind, Extension, Metrics};
use crate::font::{FontBank, SCRIPT_FACTOR, SCRIPT_SCRIPT_FACTOR, SPACE_FONT_ID, TEXT_FACTOR};

/// A resolution view over a font bank.
///
/// Resolvers are cheap to copy; the bank is borrowed for the lifetime of every resolved [`Char`], which ties the validity of returned font handles to the bank.
#[derive(Debug, Clone, Copy)]
pub struct Resolver<'a> {
    bank: &'a FontBank,
    /// The per-render context the resolver applies.
    pub config: Config,
}

impl<'a> Resolver<'a> {
    /// Creates a resolver over the given bank and context.
    pub fn new(bank: &'a FontBank, config: Config) -> Self {
        Resolver { bank, config }
    }

    fn font(&self, id: usize) -> Result<&'a FontInfo> {
        self.bank.font(id).ok_or(Error::UnknownFontId(id))
    }

    /// Resolves a character through a text-style mapping.
    ///
    /// The character is classified into digit, capital, small, or Unicode kind; the mapping slot of that kind supplies the base glyph, and the character's in-range offset is added to the *base glyph's* code.
    /// This assumes the font lays out the glyph range of a kind contiguously and in order — a documented precondition on font description data.
    ///
    /// A missing slot falls back to the bank's default text-style mapping, whose digit, capital, and small slots the parser guarantees.
    ///
    /// # Errors
    ///
    /// [`Error::MissingTextStyleMapping`] if a generic character has no slot in either mapping; [`Error::UnknownFontId`] if the mapped font was never loaded.
    pub fn resolve(
        &self,
        c: char,
        mapping: &TextStyleMapping,
        style: Style,
    ) -> Result<Char<'a>> {
        let (kind, offset) = CharKind::classify(c);
        match mapping[kind as usize] {
            Some(base) => self.resolve_variant(&CharFont::new(base.code + offset, base.font), style),
            None => self.resolve_default(c, style),
        }
    }

    /// Resolves a character through the default text-style mapping of last resort.
    fn resolve_default(&self, c: char, style: Style) -> Result<Char<'a>> {
        let (kind, offset) = CharKind::classify(c);
        let base = self.bank.default_text_style()[kind as usize]
            .ok_or_else(|| Error::MissingTextStyleMapping("default".to_string()))?;
        self.resolve_variant(&CharFont::new(base.code + offset, base.font), style)
    }

    /// Resolves a character through a named text-style mapping.
    ///
    /// # Errors
    ///
    /// [`Error::MissingTextStyleMapping`] if no mapping is registered under `name`.
    pub fn resolve_text_style(&self, c: char, name: &str, style: Style) -> Result<Char<'a>> {
        let mapping = self
            .bank
            .text_style(name)
            .ok_or_else(|| Error::MissingTextStyleMapping(name.to_string()))?;
        self.resolve(c, mapping, style)
    }

    /// Resolves a named symbol, such as `"infty"`.
    ///
    /// # Errors
    ///
    /// [`Error::MissingSymbolMapping`] if no symbol is registered under `name`.
    pub fn resolve_named(&self, name: &str, style: Style) -> Result<Char<'a>> {
        let identity = self
            .bank
            .symbol(name)
            .ok_or_else(|| Error::MissingSymbolMapping(name.to_string()))?;
        self.resolve_variant(&identity, style)
    }

    /// Resolves a glyph identity, applying the active style-variant overrides.
    ///
    /// The working font starts at the identity's dedicated bold font when the bold override is set and a distinct bold id is mapped, otherwise at the plain font.
    /// The overrides are then applied as a fixed pipeline — bold (only when the identity was not already redirected to a dedicated bold font), roman, sans-serif, typewriter, italic.
    /// Each active flag switches to the current font's declared companion when one exists and is skipped silently otherwise, so the order is significant: bold-then-roman lands on a different font than roman-then-bold would.
    ///
    /// Metrics are scaled by the context factor times the style's size factor.
    pub fn resolve_variant(&self, identity: &CharFont, style: Style) -> Result<Char<'a>> {
        let size = self.config.factor * self.size_factor(style);

        let mut id = if self.config.bold {
            identity.bold_font.unwrap_or(identity.font)
        } else {
            identity.font
        };
        let mut work = CharFont {
            font: id,
            ..*identity
        };
        let mut info = self.font(id)?;

        let redirect_bold =
            self.config.bold && identity.bold_font.map_or(true, |bold| bold == identity.font);
        let overrides: [(bool, fn(&VariantIds) -> Option<usize>); 5] = [
            (redirect_bold, |v| v.bold),
            (self.config.roman, |v| v.roman),
            (self.config.sans, |v| v.sans),
            (self.config.typewriter, |v| v.typewriter),
            (self.config.italic, |v| v.italic),
        ];

        for &(active, companion) in overrides.iter() {
            if !active {
                continue;
            }
            if let Some(next) = companion(&info.variants) {
                id = next;
                info = self.font(id)?;
                work = CharFont {
                    code: work.code,
                    font: id,
                    bold_font: None,
                    style: Some(style),
                };
            }
        }

        Ok(Char {
            code: work.code,
            font: &info.font,
            font_id: id,
            metrics: Metrics::scaled(info.glyph(work.code), size, self.bank.pixels_per_point()),
        })
    }

    /// Returns the size factor of a style.
    ///
    /// The factors are pre-computed general settings; `textfactor` is fixed at 1 unless overridden through [`FontBank::set_math_sizes`](crate::font::FontBank::set_math_sizes).
    /// An unconfigured factor defaults to 1.
    pub fn size_factor(&self, style: Style) -> f32 {
        let name = match style {
            Style::Text => TEXT_FACTOR,
            Style::Script => SCRIPT_FACTOR,
            Style::ScriptScript => SCRIPT_SCRIPT_FACTOR,
        };
        self.bank.general_setting(name).unwrap_or(1.0)
    }

    /// Returns the kern value between two glyph identities.
    ///
    /// Exactly 0 when the identities belong to different fonts or the font declares no kern for the pair; otherwise the raw kern scaled by the style's size factor and the pixels-per-point conversion.
    pub fn kern(&self, left: &CharFont, right: &CharFont, style: Style) -> f32 {
        if left.font != right.font {
            return 0.0;
        }
        match self.bank.font(left.font) {
            Some(info) => {
                info.kern(left.code, right.code)
                    * self.size_factor(style)
                    * self.bank.pixels_per_point()
            }
            None => 0.0,
        }
    }

    /// Returns the ligature substitution for two glyph identities.
    ///
    /// `None` when the identities belong to different fonts or no substitution is declared.
    /// Substitutions are not chained: the result is returned as declared.
    pub fn ligature(&self, left: &CharFont, right: &CharFont) -> Option<CharFont> {
        if left.font != right.font {
            return None;
        }
        let info = self.bank.font(left.font)?;
        info.ligature(left.code, right.code)
            .map(|code| CharFont::new(code, left.font))
    }

    /// Assembles the extensible form of a resolved glyph.
    ///
    /// Each declared part becomes a [`Char`] in the same font with metrics at the style's size factor; undeclared parts stay absent.
    /// A glyph without an extensible-part entry yields an extension with all slots absent.
    pub fn extension(&self, c: &Char<'a>, style: Style) -> Extension<'a> {
        let size = self.size_factor(style);
        let info = match self.bank.font(c.font_id) {
            Some(info) => info,
            None => {
                return Extension {
                    top: None,
                    mid: None,
                    rep: None,
                    bot: None,
                }
            }
        };
        let parts = info.extension(c.code).unwrap_or_default();
        let build = |code: Option<u32>| {
            code.map(|code| Char {
                code,
                font: c.font,
                font_id: c.font_id,
                metrics: Metrics::scaled(info.glyph(code), size, self.bank.pixels_per_point()),
            })
        };

        Extension {
            top: build(parts.top),
            mid: build(parts.mid),
            rep: build(parts.rep),
            bot: build(parts.bot),
        }
    }

    /// Returns the declared next-larger companion of a resolved glyph.
    ///
    /// The companion is used as given — variant overrides are not reapplied — with metrics at the style's size factor.
    /// `None` when the font declares no larger companion for the glyph.
    pub fn next_larger(&self, c: &Char<'a>, style: Style) -> Option<Char<'a>> {
        let info = self.bank.font(c.font_id)?;
        let (code, font_id) = info.larger(c.code)?;
        let larger = self.bank.font(font_id)?;
        Some(Char {
            code,
            font: &larger.font,
            font_id,
            metrics: Metrics::scaled(
                larger.glyph(code),
                self.size_factor(style),
                self.bank.pixels_per_point(),
            ),
        })
    }

    /// Returns the width of the inter-word space at a style.
    ///
    /// Read from the font named by the `spacefontid` general setting; 0 when that setting or font is missing.
    pub fn space_width(&self, style: Style) -> f32 {
        let id = match self.bank.setting_font_id(SPACE_FONT_ID) {
            Some(id) => id,
            None => return 0.0,
        };
        match self.bank.font(id) {
            Some(info) => info.space * self.size_factor(style) * self.bank.pixels_per_point(),
            None => 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::font::fixtures::sample_bank;

    fn resolver(bank: &FontBank) -> Resolver<'_> {
        bank.resolver(Config::new(12.0))
    }

    #[test]
    fn test_resolve_applies_offset_to_mapped_glyph() {
        let (bank, _) = sample_bank();
        let resolver = resolver(&bank);
        let mapping = *bank.text_style("mathrm").unwrap();

        let glyph = resolver.resolve('7', &mapping, Style::Text).unwrap();
        assert_eq!(glyph.code, '0' as u32 + 7);
        assert_eq!(glyph.font_id, 2);
        assert_eq!(glyph.metrics.size_pt, 1.0);
    }

    #[test]
    fn test_resolve_falls_back_to_default_mapping() {
        let (bank, _) = sample_bank();
        let resolver = resolver(&bank);
        let mapping = *bank.text_style("mathrm").unwrap();

        // mathrm has no capital slot, so the default mapping routes to font 0
        let glyph = resolver.resolve('C', &mapping, Style::Text).unwrap();
        assert_eq!(glyph.code, 'A' as u32 + 2);
        assert_eq!(glyph.font_id, 0);
    }

    #[test]
    fn test_resolve_generic_without_slot_is_an_error() {
        let (bank, _) = sample_bank();
        let resolver = resolver(&bank);
        let mapping = *bank.text_style("mathrm").unwrap();

        assert!(matches!(
            resolver.resolve('∀', &mapping, Style::Text),
            Err(Error::MissingTextStyleMapping(_))
        ));
    }

    #[test]
    fn test_resolve_text_style_unknown_name() {
        let (bank, _) = sample_bank();
        let resolver = resolver(&bank);
        assert_eq!(
            resolver.resolve_text_style('7', "mathfrak", Style::Text),
            Err(Error::MissingTextStyleMapping("mathfrak".to_string()))
        );
    }

    #[test]
    fn test_resolve_named_symbol() {
        let (bank, _) = sample_bank();
        let resolver = resolver(&bank);
        let glyph = resolver.resolve_named("infty", Style::Text).unwrap();
        assert_eq!(glyph.code, '1' as u32);
        assert_eq!(glyph.font_id, 0);

        assert_eq!(
            resolver.resolve_named("aleph", Style::Text),
            Err(Error::MissingSymbolMapping("aleph".to_string()))
        );
    }

    #[test]
    fn test_resolve_variant_without_overrides_keeps_font() {
        let (bank, _) = sample_bank();
        let resolver = resolver(&bank);
        let glyph = resolver
            .resolve_variant(&CharFont::new('x' as u32, 0), Style::Text)
            .unwrap();
        assert_eq!(glyph.font_id, 0);
        assert_eq!(glyph.code, 'x' as u32);
    }

    #[test]
    fn test_resolve_variant_bold_follows_companion() {
        let (bank, _) = sample_bank();
        let mut config = Config::new(12.0);
        config.bold = true;
        let resolver = bank.resolver(config);

        let glyph = resolver
            .resolve_variant(&CharFont::new('x' as u32, 0), Style::Text)
            .unwrap();
        assert_eq!(glyph.font_id, 1);
        assert_eq!(glyph.font.family, "bold");
    }

    #[test]
    fn test_resolve_variant_bold_without_companion_keeps_font() {
        let (bank, _) = sample_bank();
        let mut config = Config::new(12.0);
        config.bold = true;
        let resolver = bank.resolver(config);

        // font 2 declares no bold companion
        let glyph = resolver
            .resolve_variant(&CharFont::new('x' as u32, 2), Style::Text)
            .unwrap();
        assert_eq!(glyph.font_id, 2);
    }

    #[test]
    fn test_resolve_variant_prefers_dedicated_bold_font() {
        let (bank, _) = sample_bank();
        let mut config = Config::new(12.0);
        config.bold = true;
        let resolver = bank.resolver(config);

        // a distinct bold id short-circuits the font-level bold redirect
        let glyph = resolver
            .resolve_variant(&CharFont::with_bold('x' as u32, 0, 2), Style::Text)
            .unwrap();
        assert_eq!(glyph.font_id, 2);
    }

    #[test]
    fn test_resolve_variant_pipeline_order() {
        let (bank, _) = sample_bank();
        let mut config = Config::new(12.0);
        config.bold = true;
        config.roman = true;
        let resolver = bank.resolver(config);

        // bold switches 0 → 1, then roman switches 1 → 0
        let glyph = resolver
            .resolve_variant(&CharFont::new('x' as u32, 0), Style::Text)
            .unwrap();
        assert_eq!(glyph.font_id, 0);
    }

    #[test]
    fn test_size_factor_per_style() {
        let (bank, _) = sample_bank();
        let resolver = resolver(&bank);
        assert_eq!(resolver.size_factor(Style::Text), 1.0);
        assert_eq!(resolver.size_factor(Style::Script), 0.7);
        assert_eq!(resolver.size_factor(Style::ScriptScript), 0.5);
    }

    #[test]
    fn test_script_style_scales_metrics() {
        let (bank, _) = sample_bank();
        let resolver = resolver(&bank);
        let text = resolver
            .resolve_variant(&CharFont::new('x' as u32, 0), Style::Text)
            .unwrap();
        let script = resolver
            .resolve_variant(&CharFont::new('x' as u32, 0), Style::Script)
            .unwrap();
        assert_eq!(script.metrics.width, text.metrics.width * 0.7);
        assert_eq!(script.metrics.size_pt, 0.7);
    }

    #[test]
    fn test_kern_is_zero_across_fonts() {
        let (bank, _) = sample_bank();
        let resolver = resolver(&bank);
        let left = CharFont::new('A' as u32, 0);
        let right = CharFont::new('V' as u32, 1);
        assert_eq!(resolver.kern(&left, &right, Style::Text), 0.0);
        assert_eq!(resolver.kern(&left, &right, Style::Script), 0.0);
    }

    #[test]
    fn test_kern_scales_declared_pairs() {
        let (bank, _) = sample_bank();
        let resolver = resolver(&bank);
        let left = CharFont::new('A' as u32, 0);
        let right = CharFont::new('V' as u32, 0);
        assert_eq!(resolver.kern(&left, &right, Style::Text), -0.2);
        assert_eq!(resolver.kern(&left, &right, Style::Script), -0.2 * 0.7);
        // undeclared pair
        assert_eq!(
            resolver.kern(&right, &left, Style::Text),
            0.0
        );
    }

    #[test]
    fn test_ligature_same_font_only() {
        let (bank, _) = sample_bank();
        let resolver = resolver(&bank);
        let f = CharFont::new('f' as u32, 0);
        let i = CharFont::new('i' as u32, 0);
        assert_eq!(resolver.ligature(&f, &i), Some(CharFont::new(0xFB01, 0)));

        let i_bold = CharFont::new('i' as u32, 1);
        assert_eq!(resolver.ligature(&f, &i_bold), None);
        assert_eq!(resolver.ligature(&i, &f), None);
    }

    #[test]
    fn test_extension_keeps_declared_parts_only() {
        let (bank, _) = sample_bank();
        let resolver = resolver(&bank);
        let paren = resolver
            .resolve_variant(&CharFont::new('(' as u32, 0), Style::Text)
            .unwrap();

        let extension = resolver.extension(&paren, Style::Text);
        assert_eq!(extension.top.unwrap().code, 5);
        assert_eq!(extension.rep.unwrap().code, 6);
        assert!(extension.mid.is_none());
        assert!(extension.bot.is_none());
        assert_eq!(extension.top.unwrap().font_id, paren.font_id);
    }

    #[test]
    fn test_extension_without_entry_is_empty() {
        let (bank, _) = sample_bank();
        let resolver = resolver(&bank);
        let x = resolver
            .resolve_variant(&CharFont::new('x' as u32, 0), Style::Text)
            .unwrap();

        let extension = resolver.extension(&x, Style::Text);
        assert!(extension.top.is_none());
        assert!(extension.mid.is_none());
        assert!(extension.rep.is_none());
        assert!(extension.bot.is_none());
    }

    #[test]
    fn test_next_larger() {
        let (bank, _) = sample_bank();
        let resolver = resolver(&bank);
        let paren = resolver
            .resolve_variant(&CharFont::new('(' as u32, 0), Style::Text)
            .unwrap();

        let larger = resolver.next_larger(&paren, Style::Text).unwrap();
        assert_eq!(larger.code, '(' as u32);
        assert_eq!(larger.font_id, 2);
        assert_eq!(larger.font.family, "italic");

        let x = resolver
            .resolve_variant(&CharFont::new('x' as u32, 0), Style::Text)
            .unwrap();
        assert!(resolver.next_larger(&x, Style::Text).is_none());
    }

    #[test]
    fn test_space_width() {
        let (bank, _) = sample_bank();
        let resolver = resolver(&bank);
        assert_eq!(resolver.space_width(Style::Text), 0.33);
        assert_eq!(resolver.space_width(Style::Script), 0.33 * 0.7);
    }
}
