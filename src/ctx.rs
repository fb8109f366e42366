//! The context with which a resolution is performed.

/// A math-typesetting size class.
///
/// The style selects one of the pre-computed size factors of the general-settings registry (see [`Resolver::size_factor`](crate::font::resolve::Resolver::size_factor)).
/// It is distinct from a *style variant* (bold, roman, sans-serif, typewriter, italic), which is an override flag on [`Config`].
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy)]
pub enum Style {
    /// Regular running size.
    Text,
    /// First-level script size (superscripts and subscripts).
    Script,
    /// Second-level script size (scripts of scripts).
    ScriptScript,
}

/// A per-render resolution context.
///
/// A config is a view over the process-wide registries of a [`FontBank`](crate::font::FontBank): it owns nothing and is cheap to copy.
/// It carries the base point size, a global scale factor, and the five style-variant override flags applied by [`Resolver::resolve_variant`](crate::font::resolve::Resolver::resolve_variant).
///
/// # Example
///
/// ```
/// # use metrica::ctx::Config;
/// let mut config = Config::new(17.0);
/// config.bold = true;
/// assert_eq!(config.size, 17.0);
/// assert_eq!(config.factor, 1.0);
/// ```
#[derive(Debug, PartialEq, Clone, Copy)]
pub struct Config {
    /// The base point size of the rendered formula.
    pub size: f32,
    /// A global scale factor applied on top of the per-style size factor.
    pub factor: f32,
    /// Whether to prefer the bold variant of resolved fonts.
    pub bold: bool,
    /// Whether to prefer the roman variant of resolved fonts.
    pub roman: bool,
    /// Whether to prefer the sans-serif variant of resolved fonts.
    pub sans: bool,
    /// Whether to prefer the typewriter variant of resolved fonts.
    pub typewriter: bool,
    /// Whether to prefer the italic variant of resolved fonts.
    pub italic: bool,
}

impl Config {
    /// Creates a context for the given point size with all variant overrides off and a factor of 1.
    pub fn new(size: f32) -> Self {
        Config {
            size,
            factor: 1.0,
            bold: false,
            roman: false,
            sans: false,
            typewriter: false,
            italic: false,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Config::new(12.0)
    }
}
