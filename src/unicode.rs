//! Unicode blocks and alphabet registrations.
//!
//! An *alphabet* is a named, loadable bundle of Unicode blocks together with the font description file that covers them.
//! The engine only needs range membership from blocks; the full Unicode block inventory is out of scope and the table kept here is limited to the blocks the bundled alphabets use.

use lazy_static::lazy_static;
use std::fmt;
use std::rc::Rc;

/// A named half-open range of code points.
///
/// Equality and hashing consider the range only; the name is a label for logs and diagnostics.
///
/// # Example
///
/// ```
/// # use metrica::unicode::UnicodeBlock;
/// assert!(UnicodeBlock::BASIC_LATIN.contains('a'));
/// assert!(!UnicodeBlock::BASIC_LATIN.contains('α'));
/// ```
#[derive(Debug, Clone, Copy)]
pub struct UnicodeBlock {
    name: &'static str,
    start: u32,
    end: u32,
}

impl UnicodeBlock {
    /// Basic Latin: `U+0000` to `U+007F`.
    pub const BASIC_LATIN: UnicodeBlock = UnicodeBlock::new("BASIC_LATIN", 0x0000, 0x0080);
    /// Latin-1 Supplement: `U+0080` to `U+00FF`.
    pub const LATIN_1_SUPPLEMENT: UnicodeBlock =
        UnicodeBlock::new("LATIN_1_SUPPLEMENT", 0x0080, 0x0100);
    /// Greek and Coptic: `U+0370` to `U+03FF`.
    pub const GREEK_AND_COPTIC: UnicodeBlock =
        UnicodeBlock::new("GREEK_AND_COPTIC", 0x0370, 0x0400);
    /// Cyrillic: `U+0400` to `U+04FF`.
    pub const CYRILLIC: UnicodeBlock = UnicodeBlock::new("CYRILLIC", 0x0400, 0x0500);

    /// Creates a block covering the code points from `start` (inclusive) to `end` (exclusive).
    pub const fn new(name: &'static str, start: u32, end: u32) -> Self {
        UnicodeBlock { name, start, end }
    }

    /// Returns the name of the block.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Returns whether the block contains the given character.
    pub fn contains(&self, c: char) -> bool {
        let code = c as u32;
        self.start <= code && code < self.end
    }

    /// Returns the known block containing the given character, or `None` if no known block covers it.
    pub fn of(c: char) -> Option<UnicodeBlock> {
        KNOWN_BLOCKS.iter().find(|block| block.contains(c)).copied()
    }
}

impl PartialEq for UnicodeBlock {
    fn eq(&self, other: &Self) -> bool {
        self.start == other.start && self.end == other.end
    }
}

impl Eq for UnicodeBlock {}

impl std::hash::Hash for UnicodeBlock {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.start.hash(state);
        self.end.hash(state);
    }
}

impl fmt::Display for UnicodeBlock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (U+{:04X}..U+{:04X})", self.name, self.start, self.end)
    }
}

lazy_static! {
    /// The blocks known to [`UnicodeBlock::of`] in ascending range order.
    static ref KNOWN_BLOCKS: Vec<UnicodeBlock> = vec![
        UnicodeBlock::BASIC_LATIN,
        UnicodeBlock::LATIN_1_SUPPLEMENT,
        UnicodeBlock::GREEK_AND_COPTIC,
        UnicodeBlock::CYRILLIC,
    ];
}

/// A loadable alphabet: a font package, the Unicode blocks it covers, and its font description file.
///
/// Registrations are shared: [`FontBank::register_alphabet`](crate::font::FontBank::register_alphabet) inserts the same [`Rc`]ed registration under every one of its blocks, so the underlying value is freed exactly once at teardown no matter how many block keys reference it.
#[derive(Debug, PartialEq, Eq)]
pub struct AlphabetRegistration {
    /// The name of the font package providing the alphabet.
    pub package: String,
    /// The Unicode blocks the alphabet covers.
    pub blocks: Vec<UnicodeBlock>,
    /// The font description file to load the alphabet from.
    pub file: String,
}

impl AlphabetRegistration {
    /// Creates a registration and wraps it for shared use under multiple block keys.
    pub fn shared(
        package: impl Into<String>,
        blocks: Vec<UnicodeBlock>,
        file: impl Into<String>,
    ) -> Rc<AlphabetRegistration> {
        Rc::new(AlphabetRegistration {
            package: package.into(),
            blocks,
            file: file.into(),
        })
    }

    /// Returns whether the registration is structurally usable.
    ///
    /// A registration without a package name, without blocks, or without a description file cannot be loaded.
    pub fn is_valid(&self) -> bool {
        !self.package.is_empty() && !self.blocks.is_empty() && !self.file.is_empty()
    }
}
