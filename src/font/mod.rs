//! The process-wide font registries and their lifecycle.
//!
//! A [`FontBank`] owns every registry the resolution engine reads: font metric tables, text-style mappings, symbol mappings, layout parameters, general settings, and the alphabet bookkeeping.
//! It is constructed once with [`FontBank::init`], extended incrementally with [`FontBank::add_alphabet`], and torn down by dropping it.
//!
//! All mutation takes `&mut self` and all resolution queries borrow `&self`, so the borrow checker enforces the load-then-query contract: no query can observe a half-merged registry.

pub mod glyph;
pub mod resolve;

use crate::ctx::Config;
use crate::data::{DescriptionSource, FontDescription, FontInfo, TextStyleMapping};
use crate::error::{Error, Result};
use crate::font::glyph::CharFont;
use crate::font::resolve::Resolver;
use crate::unicode::{AlphabetRegistration, UnicodeBlock};
use itertools::Itertools;
use std::collections::HashMap;
use std::rc::Rc;

/// The general-settings key naming the font used for math units.
pub const MU_FONT_ID: &str = "mufontid";
/// The general-settings key naming the font whose space width is used for spacing.
pub const SPACE_FONT_ID: &str = "spacefontid";
/// The general-settings key holding the text-style size factor.
pub const TEXT_FACTOR: &str = "textfactor";
/// The general-settings key holding the script-style size factor.
pub const SCRIPT_FACTOR: &str = "scriptfactor";
/// The general-settings key holding the scriptscript-style size factor.
pub const SCRIPT_SCRIPT_FACTOR: &str = "scriptscriptfactor";

/// The outcome of loading a registered alphabet.
///
/// Only genuine parse failures surface as errors; everything else is an expected outcome, since a missing optional script must never abort rendering of unrelated content.
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy)]
pub enum AlphabetLoad {
    /// The alphabet was parsed and merged.
    Loaded,
    /// At least one block of the alphabet was already loaded; nothing changed.
    AlreadyLoaded,
    /// The registration is structurally invalid and was skipped.
    Invalid,
}

/// The process-wide registry context of the resolution engine.
///
/// # Example
///
/// ```no_run
/// # use metrica::ctx::{Config, Style};
/// # use metrica::data::DescriptionSource;
/// # use metrica::font::FontBank;
/// # fn demo(source: &mut impl DescriptionSource) -> metrica::error::Result<()> {
/// let bank = FontBank::init(source, 96.0 / 72.0)?;
/// let resolver = bank.resolver(Config::new(17.0));
/// let glyph = resolver.resolve_named("infty", Style::Text)?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct FontBank {
    fonts: Vec<FontInfo>,
    parameters: HashMap<String, f32>,
    general_settings: HashMap<String, f32>,
    text_styles: HashMap<String, TextStyleMapping>,
    default_text_style: TextStyleMapping,
    symbols: HashMap<String, CharFont>,
    loaded_alphabets: Vec<UnicodeBlock>,
    registered_alphabets: HashMap<UnicodeBlock, Rc<AlphabetRegistration>>,
    pixels_per_point: f32,
    magnification_enabled: bool,
    default_size: f32,
    mag_factor: f32,
    loading: bool,
}

impl FontBank {
    /// Loads the base font descriptions and constructs the registry context.
    ///
    /// The base alphabet ([`UnicodeBlock::BASIC_LATIN`]) is marked loaded, the text-style size factor is fixed at 1, and the single eager integrity check is performed: the configured `mufontid` must index a loaded font metric table.
    ///
    /// # Errors
    ///
    /// [`Error::ParseFailure`] if the base resource is malformed or missing `mufontid`; [`Error::UnknownFontId`] if `mufontid` is out of range.
    pub fn init<S: DescriptionSource>(source: &mut S, pixels_per_point: f32) -> Result<FontBank> {
        let description = source.base()?;

        let mut bank = FontBank {
            fonts: Vec::new(),
            parameters: HashMap::new(),
            general_settings: HashMap::new(),
            text_styles: HashMap::new(),
            default_text_style: [None, None, None, None],
            symbols: HashMap::new(),
            loaded_alphabets: vec![UnicodeBlock::BASIC_LATIN],
            registered_alphabets: HashMap::new(),
            pixels_per_point,
            magnification_enabled: true,
            default_size: 0.0,
            mag_factor: 1.0,
            loading: false,
        };

        bank.merge(description);
        bank.general_settings.insert(TEXT_FACTOR.to_string(), 1.0);

        match bank.setting_font_id(MU_FONT_ID) {
            Some(id) if id < bank.fonts.len() => {}
            Some(id) => return Err(Error::UnknownFontId(id)),
            None => {
                return Err(Error::ParseFailure {
                    file: "base".to_string(),
                    message: format!("general settings are missing `{}`", MU_FONT_ID),
                })
            }
        }

        log::info!(
            "base descriptions loaded: {} fonts, {} symbols, text styles: {}",
            bank.fonts.len(),
            bank.symbols.len(),
            bank.text_styles.keys().sorted().join("; "),
        );

        Ok(bank)
    }

    /// Merges a parsed description bundle into the registries.
    ///
    /// Fonts are appended in dense-id order; mapping tables are unioned, later entries replacing earlier ones on name collision.
    fn merge(&mut self, description: FontDescription) {
        let FontDescription {
            fonts,
            parameters,
            text_styles,
            default_text_style,
            symbols,
            general_settings,
        } = description;

        self.fonts.extend(fonts);
        self.parameters.extend(parameters);
        self.text_styles.extend(text_styles);
        self.symbols.extend(symbols);
        self.general_settings.extend(general_settings);

        if let Some(mapping) = default_text_style {
            self.default_text_style = mapping;
        }
    }

    /// Loads the font descriptions of an alphabet.
    ///
    /// If any block of `blocks` is already loaded the call is a no-op: alphabets are all-or-nothing, and loading the same block set twice changes no registry state.
    /// Otherwise the reentrancy guard is set for the full duration of the merge (observable through [`is_loading`](FontBank::is_loading) and passed to the parser), the parsed description is merged, and the blocks are appended to the loaded set.
    ///
    /// # Errors
    ///
    /// [`Error::ParseFailure`] if the description resource is malformed.
    pub fn add_alphabet<S: DescriptionSource>(
        &mut self,
        source: &mut S,
        package: &str,
        blocks: &[UnicodeBlock],
        file: &str,
    ) -> Result<()> {
        if blocks.iter().any(|block| self.loaded_alphabets.contains(block)) {
            return Ok(());
        }

        let nested = self.loading;
        self.loading = true;
        let result = source.alphabet(package, file, nested);
        self.loading = nested;

        let description = result?;
        self.merge(description);
        self.loaded_alphabets.extend_from_slice(blocks);

        log::info!("alphabet `{}` loaded from `{}`", package, file);

        Ok(())
    }

    /// Loads a registered alphabet, tolerating the expected failure modes.
    ///
    /// An already-loaded alphabet and a structurally invalid registration are logged and reported as [`AlphabetLoad`] outcomes, never as errors.
    ///
    /// # Errors
    ///
    /// Only [`Error::ParseFailure`] propagates.
    pub fn add_registered<S: DescriptionSource>(
        &mut self,
        source: &mut S,
        registration: &AlphabetRegistration,
    ) -> Result<AlphabetLoad> {
        if !registration.is_valid() {
            log::warn!(
                "skipping invalid alphabet registration for package `{}`",
                registration.package
            );
            return Ok(AlphabetLoad::Invalid);
        }

        if registration
            .blocks
            .iter()
            .any(|block| self.loaded_alphabets.contains(block))
        {
            log::info!("alphabet `{}` is already loaded", registration.package);
            return Ok(AlphabetLoad::AlreadyLoaded);
        }

        self.add_alphabet(
            source,
            &registration.package,
            &registration.blocks,
            &registration.file,
        )?;

        Ok(AlphabetLoad::Loaded)
    }

    /// Registers an alphabet for later lazy loading without loading anything.
    ///
    /// The registration is inserted under every one of its blocks; the slots share one underlying value.
    pub fn register_alphabet(&mut self, registration: Rc<AlphabetRegistration>) {
        for &block in &registration.blocks {
            self.registered_alphabets
                .insert(block, Rc::clone(&registration));
        }
    }

    /// Returns the registration covering the given block, if one was registered.
    ///
    /// Clients that detect an unsupported code point use this to find the alphabet to load late.
    pub fn registered(&self, block: &UnicodeBlock) -> Option<&Rc<AlphabetRegistration>> {
        self.registered_alphabets.get(block)
    }

    /// Returns whether the given block was already loaded.
    pub fn is_loaded(&self, block: &UnicodeBlock) -> bool {
        self.loaded_alphabets.contains(block)
    }

    /// Returns whether an alphabet load is currently in progress.
    ///
    /// This is the reentrancy guard of [`add_alphabet`](FontBank::add_alphabet), not a concurrency primitive: it lets a parser distinguish a fresh top-level load from one triggered recursively while another load is running.
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Returns a resolver pairing this bank with a per-render context.
    pub fn resolver(&self, config: Config) -> Resolver<'_> {
        Resolver::new(self, config)
    }

    /// Returns the metric table of a font id.
    pub fn font(&self, id: usize) -> Option<&FontInfo> {
        self.fonts.get(id)
    }

    /// Returns a layout parameter, or 0 if the parameter was never supplied.
    pub fn parameter(&self, name: &str) -> f32 {
        self.parameters.get(name).copied().unwrap_or(0.0)
    }

    /// Returns a general setting, if it was supplied.
    pub fn general_setting(&self, name: &str) -> Option<f32> {
        self.general_settings.get(name).copied()
    }

    /// Returns a general setting interpreted as a font id.
    ///
    /// Negative values are treated as absent.
    pub fn setting_font_id(&self, name: &str) -> Option<usize> {
        let value = self.general_setting(name)?;
        if value < 0.0 {
            None
        } else {
            Some(value as usize)
        }
    }

    /// Returns the id of the font used for math units.
    ///
    /// Validated at init time, so the id always indexes a loaded font.
    pub fn mu_font_id(&self) -> usize {
        self.setting_font_id(MU_FONT_ID).unwrap_or(0)
    }

    /// Returns the named text-style mapping.
    pub fn text_style(&self, name: &str) -> Option<&TextStyleMapping> {
        self.text_styles.get(name)
    }

    /// Returns the fallback text-style mapping of last resort.
    pub fn default_text_style(&self) -> &TextStyleMapping {
        &self.default_text_style
    }

    /// Returns the glyph identity mapped to a symbol name.
    pub fn symbol(&self, name: &str) -> Option<CharFont> {
        self.symbols.get(name).copied()
    }

    /// Returns the pixels-per-point conversion constant of this bank.
    pub fn pixels_per_point(&self) -> f32 {
        self.pixels_per_point
    }

    /// Recomputes the per-style size factors from the four raw math point sizes.
    ///
    /// `display` is the reference: the factors are `|text / display|`, `|script / display|`, and `|scriptscript / display|`, and the default render size becomes `|display|`.
    /// A no-op while magnification is disabled.
    pub fn set_math_sizes(&mut self, display: f32, text: f32, script: f32, scriptscript: f32) {
        if !self.magnification_enabled {
            return;
        }
        self.general_settings
            .insert(TEXT_FACTOR.to_string(), (text / display).abs());
        self.general_settings
            .insert(SCRIPT_FACTOR.to_string(), (script / display).abs());
        self.general_settings
            .insert(SCRIPT_SCRIPT_FACTOR.to_string(), (scriptscript / display).abs());
        self.default_size = display.abs();
    }

    /// Sets the global magnification percentage on a basis of 1000 (1000 = 100%).
    ///
    /// A no-op while magnification is disabled.
    pub fn set_magnification(&mut self, mag: f32) {
        if !self.magnification_enabled {
            return;
        }
        self.mag_factor = mag / 1000.0;
    }

    /// Enables or disables magnification.
    ///
    /// While disabled, [`set_math_sizes`](FontBank::set_math_sizes) and [`set_magnification`](FontBank::set_magnification) are no-ops, freezing whatever was configured before.
    /// A hosting application uses this to avoid surprising re-scaling after initial calibration.
    pub fn enable_magnification(&mut self, enabled: bool) {
        self.magnification_enabled = enabled;
    }

    /// Returns the default render size in points.
    pub fn default_size(&self) -> f32 {
        self.default_size
    }

    /// Returns the global magnification factor.
    pub fn mag_factor(&self) -> f32 {
        self.mag_factor
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;
    use crate::data::{ExtensionParts, Font, FontDescription, GlyphMetrics, VariantIds};
    use crate::unicode::UnicodeBlock;

    /// The block covered by the sample Greek alphabet.
    pub const GREEK: UnicodeBlock = UnicodeBlock::GREEK_AND_COPTIC;
    /// A second block sharing fonts with the sample Greek alphabet.
    pub const COPTIC: UnicodeBlock = UnicodeBlock::new("COPTIC_TEST", 0x2C80, 0x2D00);

    /// A description source with an in-memory base alphabet of three fonts.
    ///
    /// - Font 0 (`roman`): full Latin metrics, a kern pair `(A, V)`, an `fi` ligature,
    ///   an extensible `(` with top and rep parts only, and a next-larger `(`.
    ///   Declares bold → 1 and italic → 2.
    /// - Font 1 (`bold`): declares roman → 0.
    /// - Font 2 (`italic`): declares no companions.
    pub struct SampleSource {
        /// How many description resources were parsed so far.
        pub loads: usize,
        /// Whether the next parse should fail.
        pub fail: bool,
        /// The `nested` flag observed by the most recent alphabet parse.
        pub last_nested: Option<bool>,
    }

    impl SampleSource {
        pub fn new() -> Self {
            SampleSource {
                loads: 0,
                fail: false,
                last_nested: None,
            }
        }
    }

    fn latin_font(family: &str, variants: VariantIds) -> FontInfo {
        let mut info = FontInfo::new(Font::new(family, format!("{}.otf", family)));
        info.space = 0.33;
        info.variants = variants;
        for code in 0x20..0x7F {
            info.set_glyph(code, GlyphMetrics::new(0.5, 0.7, 0.1, 0.02));
        }
        info
    }

    impl DescriptionSource for SampleSource {
        fn base(&mut self) -> crate::error::Result<FontDescription> {
            self.loads += 1;
            if self.fail {
                return Err(Error::ParseFailure {
                    file: "base".to_string(),
                    message: "forced failure".to_string(),
                });
            }

            let mut roman = latin_font(
                "roman",
                VariantIds {
                    bold: Some(1),
                    italic: Some(2),
                    ..VariantIds::default()
                },
            );
            roman.add_kern('A' as u32, 'V' as u32, -0.2);
            roman.add_ligature('f' as u32, 'i' as u32, 0xFB01);
            roman.set_extension(
                '(' as u32,
                ExtensionParts {
                    top: Some(5),
                    mid: None,
                    rep: Some(6),
                    bot: None,
                },
            );
            roman.set_larger('(' as u32, 0x28, 2);

            let bold = latin_font(
                "bold",
                VariantIds {
                    roman: Some(0),
                    ..VariantIds::default()
                },
            );
            let italic = latin_font("italic", VariantIds::default());

            let mut description = FontDescription::default();
            description.fonts = vec![roman, bold, italic];
            description.general_settings.insert(MU_FONT_ID.to_string(), 0.0);
            description
                .general_settings
                .insert(SPACE_FONT_ID.to_string(), 0.0);
            description
                .general_settings
                .insert(SCRIPT_FACTOR.to_string(), 0.7);
            description
                .general_settings
                .insert(SCRIPT_SCRIPT_FACTOR.to_string(), 0.5);
            description.default_text_style = Some([
                Some(CharFont::new('0' as u32, 0)),
                Some(CharFont::new('A' as u32, 0)),
                Some(CharFont::new('a' as u32, 0)),
                None,
            ]);
            description
                .text_styles
                .insert("mathrm".to_string(), [Some(CharFont::new('0' as u32, 2)), None, None, None]);
            description
                .symbols
                .insert("infty".to_string(), CharFont::new('1' as u32, 0));
            Ok(description)
        }

        fn alphabet(
            &mut self,
            _package: &str,
            file: &str,
            nested: bool,
        ) -> crate::error::Result<FontDescription> {
            self.loads += 1;
            self.last_nested = Some(nested);
            if self.fail {
                return Err(Error::ParseFailure {
                    file: file.to_string(),
                    message: "forced failure".to_string(),
                });
            }

            let greek = latin_font("greek", VariantIds::default());
            let mut description = FontDescription::default();
            description.fonts = vec![greek];
            description
                .symbols
                .insert("alpha".to_string(), CharFont::new(0x03B1, 3));
            // colliding name, replaces the base entry
            description
                .symbols
                .insert("infty".to_string(), CharFont::new(0x221E, 3));
            Ok(description)
        }
    }

    /// Builds a bank from a fresh [`SampleSource`] with a pixels-per-point of 1.
    pub fn sample_bank() -> (FontBank, SampleSource) {
        let mut source = SampleSource::new();
        let bank = FontBank::init(&mut source, 1.0).unwrap();
        (bank, source)
    }
}
