//! # Kana Classification
//!
//! Verb records are keyed by their hiragana spelling. The accepted range is
//! the whole Hiragana block from U+3041 (small a) to U+309F (the yori
//! digraph), which includes the small kana and the voicing marks.

/// First code point accepted as hiragana.
pub const HIRAGANA_FIRST: char = '\u{3041}';

/// Last code point accepted as hiragana.
pub const HIRAGANA_LAST: char = '\u{309F}';

/// Returns true if `c` lies in the Hiragana block.
pub fn is_hiragana_char(c: char) -> bool {
    (HIRAGANA_FIRST..=HIRAGANA_LAST).contains(&c)
}

/// Returns true if `s` is non-empty and consists solely of hiragana.
pub fn is_hiragana(s: &str) -> bool {
    !s.is_empty() && s.chars().all(is_hiragana_char)
}
