// src/core/normalizer.rs
use once_cell::sync::Lazy;
use regex::Regex;
use std::borrow::Cow;

/// Hebrew hyphen. Sits inside the diacritic range, so it must be
/// handled before diacritics are dropped.
pub const MAQAF: char = '\u{05be}';

static MARKUP: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]+>").unwrap());
// Lazy and line-bound: also eats empty "<>" pairs.
static TRANSLATION_TAGS: Lazy<Regex> = Lazy::new(|| Regex::new(r"<.*?>").unwrap());

/// Consonants א through ת, final forms included.
pub fn is_hebrew_letter(c: char) -> bool {
    ('\u{05d0}'..='\u{05ea}').contains(&c)
}

/// Vowel points and cantillation marks.
pub fn is_diacritic(c: char) -> bool {
    ('\u{0591}'..='\u{05c7}').contains(&c)
}

/// Removes markup tags without leaving a separator behind.
pub fn strip_markup(text: &str) -> Cow<'_, str> {
    MARKUP.replace_all(text, "")
}

/// Cleans a translation for display. Unlike [`strip_markup`], an empty
/// `<>` is removed and a tag never spans a line break.
pub fn strip_translation_tags(text: &str) -> Cow<'_, str> {
    TRANSLATION_TAGS.replace_all(text, "")
}

/// Keeps Hebrew consonants only.
pub fn strip_to_letters(text: &str) -> String {
    text.chars().filter(|&c| is_hebrew_letter(c)).collect()
}

/// Turns raw verse text into Hebrew letters separated by single spaces.
///
/// Tags vanish, maqaf and '-' become word breaks, diacritics are deleted
/// (so letters around them fuse into one word) and every other non-letter
/// becomes a word break. The match arms below are ordered accordingly.
pub fn normalize(raw: &str) -> String {
    let unmarked = strip_markup(raw);
    let mut spaced = String::with_capacity(unmarked.len());

    for c in unmarked.chars() {
        match c {
            MAQAF | '-' => spaced.push(' '),
            c if is_diacritic(c) => {}
            c if is_hebrew_letter(c) || c.is_whitespace() => spaced.push(c),
            _ => spaced.push(' '),
        }
    }

    collapse_whitespace(&spaced)
}

/// Normalized words of `raw`, in order.
pub fn words(raw: &str) -> Vec<String> {
    normalize(raw).split(' ').filter(|w| !w.is_empty()).map(str::to_string).collect()
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
