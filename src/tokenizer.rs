/*! Word tokenizer

Splits text into lowercase runs of word characters.

A word character is a letter, a combining mark, a number or a connector punctuation (`_`, `‿`...),
as given by the Unicode general category. Everything else separates tokens.
!*/
use unic_ucd::GeneralCategory;

/// Checks if `c` belongs to a word.
#[inline]
pub fn is_word_char(c: char) -> bool {
    let category = GeneralCategory::of(c);
    category.is_letter()
        || category.is_mark()
        || category.is_number()
        || category == GeneralCategory::ConnectorPunctuation
}

/// Tokenize `text`, returning an empty sequence on null input.
pub fn tokenize(text: Option<&str>) -> Vec<String> {
    match text {
        Some(text) => tokenize_str(text),
        None => Vec::new(),
    }
}

/// Tokenize a string.
pub fn tokenize_str(text: &str) -> Vec<String> {
    let lowered = text.to_lowercase();
    lowered
        .split(|c: char| !is_word_char(c))
        .filter(|token| !token.is_empty())
        .map(String::from)
        .collect()
}
