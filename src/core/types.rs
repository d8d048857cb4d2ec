// src/core/types.rs
use serde::{Deserialize, Serialize};

/// Numeric value of a Hebrew string. Zero means "no Hebrew content".
pub type GematriaValue = u32;

/// Phrase marker used for whole-verse index entries.
pub const WHOLE_VERSE: &str = "(Whole Verse)";

/// Builds the canonical "Book C:V" reference.
pub fn format_ref(book: &str, chapter: u32, verse: u32) -> String {
    format!("{} {}:{}", book, chapter, verse)
}

/// One verse as delivered by a corpus provider. Read-only to the core.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Verse {
    pub book: String,
    pub chapter: u32,
    pub verse_number: u32,
    pub reference: String,
    /// Hebrew text, may still carry markup and diacritics.
    pub raw_text: String,
    /// Parallel translation, empty when the provider had none.
    pub translation: String,
}

impl Verse {
    pub fn new(
        book: &str,
        chapter: u32,
        verse_number: u32,
        raw_text: impl Into<String>,
        translation: impl Into<String>,
    ) -> Self {
        Self {
            book: book.to_string(),
            chapter,
            verse_number,
            reference: format_ref(book, chapter, verse_number),
            raw_text: raw_text.into(),
            translation: translation.into(),
        }
    }
}

/// All verses of one chapter, in verse order. The unit of a race frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChapterGroup {
    pub book: String,
    pub chapter: u32,
    pub verses: Vec<Verse>,
}

impl ChapterGroup {
    /// Frame label, e.g. "Genesis Ch.1".
    pub fn label(&self) -> String {
        format!("{} Ch.{}", self.book, self.chapter)
    }
}

/// A single hit stored in a gematria bucket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexEntry {
    pub phrase: String,
    #[serde(rename = "ref")]
    pub reference: String,
    pub context_en: String,
    #[serde(rename = "isVerse")]
    pub is_verse: bool,
    /// Untouched Hebrew, only kept for whole-verse entries.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_he: Option<String>,
}

/// Exact and prefix-inclusive occurrence counts of a tracked word.
/// `prefix >= exact` always holds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordCounts {
    pub exact: u64,
    pub prefix: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RaceEntry {
    pub name: String,
    pub exact: u64,
    pub prefix: u64,
}

/// Ranked leaderboard snapshot taken after one chapter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RaceFrame {
    pub label: String,
    pub data: Vec<RaceEntry>,
}

/// Flat per-verse record: normalized text next to the original, with a
/// running position across the whole corpus.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerseRecord {
    #[serde(rename = "b")]
    pub book: String,
    #[serde(rename = "r")]
    pub reference: String,
    #[serde(rename = "t")]
    pub text: String,
    #[serde(rename = "o")]
    pub original: String,
    #[serde(rename = "i")]
    pub index: usize,
}
