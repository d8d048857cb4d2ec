// src/core/gematria.rs
use crate::core::normalizer::is_hebrew_letter;
use crate::core::types::GematriaValue;

/// Standard value of a consonant. Final forms share their base letter's value.
pub fn letter_value(c: char) -> Option<GematriaValue> {
    match c {
        'א' => Some(1), 'ב' => Some(2), 'ג' => Some(3),
        'ד' => Some(4), 'ה' => Some(5), 'ו' => Some(6),
        'ז' => Some(7), 'ח' => Some(8), 'ט' => Some(9),
        'י' => Some(10), 'כ' | 'ך' => Some(20), 'ל' => Some(30),
        'מ' | 'ם' => Some(40), 'נ' | 'ן' => Some(50), 'ס' => Some(60),
        'ע' => Some(70), 'פ' | 'ף' => Some(80), 'צ' | 'ץ' => Some(90),
        'ק' => Some(100), 'ר' => Some(200), 'ש' => Some(300),
        'ת' => Some(400),
        _ => None,
    }
}

/// Sums letter values over the Hebrew consonants of `text`.
/// Returns 0 when there are none.
pub fn value(text: &str) -> GematriaValue {
    text.chars()
        .filter(|&c| is_hebrew_letter(c))
        .map(|c| letter_value(c).unwrap_or(0))
        .sum()
}

/// A search query is either a literal number or Hebrew text.
pub fn query_value(query: &str) -> GematriaValue {
    let trimmed = query.trim();
    if !trimmed.is_empty() && trimmed.chars().all(|c| c.is_ascii_digit()) {
        // Out-of-range numbers cannot match anything.
        trimmed.parse().unwrap_or(0)
    } else {
        value(trimmed)
    }
}

/// Distance between two queries, used by the matcher search.
pub fn difference(a: &str, b: &str) -> GematriaValue {
    query_value(a).abs_diff(query_value(b))
}
