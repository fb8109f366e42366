//! Error kinds surfaced by the resolution engine.
//!
//! Only true failures are represented here.
//! Expected "not applicable" outcomes — a missing kerning pair, a missing ligature, an absent extensible part, an alphabet that is already loaded — are plain return values with defined defaults and never pass through this type.

use thiserror::Error;

/// A failure reported by the resolution engine.
#[derive(Debug, Error, PartialEq)]
pub enum Error {
    /// A font description resource is malformed.
    ///
    /// Fatal during [`FontBank::init`](crate::font::FontBank::init); propagated from alphabet loads.
    #[error("malformed font description in `{file}`: {message}")]
    ParseFailure {
        /// The description file that failed to parse.
        file: String,
        /// A parser-supplied description of the failure.
        message: String,
    },
    /// A font id indexes no loaded font metric table.
    ///
    /// Raised fatally at init time when the configured `mufontid` general setting is out of range, and defensively whenever a mapping references a font that was never loaded.
    #[error("font id {0} indexes no loaded font metric table")]
    UnknownFontId(usize),
    /// No text-style mapping is registered under the given name.
    ///
    /// Recoverable: the caller may retry with another style or skip the glyph.
    #[error("no text style mapping named `{0}`")]
    MissingTextStyleMapping(String),
    /// No symbol mapping is registered under the given name.
    ///
    /// Recoverable: the caller may skip the symbol.
    #[error("no symbol mapping named `{0}`")]
    MissingSymbolMapping(String),
}

/// A specialized result type for resolution operations.
pub type Result<T> = std::result::Result<T, Error>;
