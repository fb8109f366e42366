//! # The Metrica Font-Resolution Engine
//!
//! *Metrica* resolves characters to concrete glyphs and scaled metrics for a mathematical-typesetting renderer.
//!
//! Given a requested character — by code point, by symbolic name (such as `"infty"`), or by an explicit font-relative glyph identity — and a rendering style and size, the engine answers with the concrete glyph, its font, and its scaled metrics (width, height, depth, italic correction).
//! The answer honors style-variant overrides (bold, roman, sans-serif, typewriter, italic), kerning, ligature substitution, extensible (stretchable) glyph assembly, and multi-alphabet loading.
//!
//! The engine does not parse font description resources itself.
//! A [`DescriptionSource`](crate::data::DescriptionSource) implementation supplies parsed [`FontDescription`](crate::data::FontDescription) bundles; the engine owns the merged registries and the resolution algorithms.
//!
//! ## Architecture
//!
//! - A [`FontBank`](crate::font::FontBank) holds the process-wide registries: font metric tables, text-style mappings, symbol mappings, parameters, general settings, and the alphabet bookkeeping.
//!   It is constructed once with [`FontBank::init`](crate::font::FontBank::init) and extended incrementally with [`FontBank::add_alphabet`](crate::font::FontBank::add_alphabet).
//! - A [`Config`](crate::ctx::Config) is the cheap per-render context: point size, global scale factor, and the five style-variant flags.
//! - A [`Resolver`](crate::font::resolve::Resolver) pairs the two and answers every per-glyph query: [`resolve`](crate::font::resolve::Resolver::resolve), [`kern`](crate::font::resolve::Resolver::kern), [`ligature`](crate::font::resolve::Resolver::ligature), [`extension`](crate::font::resolve::Resolver::extension), [`next_larger`](crate::font::resolve::Resolver::next_larger), and friends.

#![deny(missing_docs, missing_debug_implementations)]

pub mod ctx;
pub mod data;
pub mod error;
pub mod font;
pub mod unicode;
