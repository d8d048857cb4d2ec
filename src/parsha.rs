// File: src/parsha.rs
use crate::core::types::{GematriaValue, IndexEntry};
use crate::error::{Error, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

static VERSE_REF: Lazy<Regex> = Lazy::new(|| Regex::new(r"^([A-Za-z\s]+) (\d+):(\d+)$").unwrap());

/// A parsed "Book C:V" reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerseRef {
    pub book: String,
    pub chapter: u32,
    pub verse: u32,
}

impl FromStr for VerseRef {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let caps = VERSE_REF
            .captures(s)
            .ok_or_else(|| Error::InvalidReference(s.to_string()))?;
        let number = |i: usize| {
            caps[i]
                .parse::<u32>()
                .map_err(|_| Error::InvalidReference(s.to_string()))
        };
        Ok(Self {
            book: caps[1].to_string(),
            chapter: number(2)?,
            verse: number(3)?,
        })
    }
}

/// A contiguous weekly-portion range inside one book, bounds inclusive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParshaRange {
    pub book: String,
    /// (chapter, verse)
    pub start: (u32, u32),
    pub end: (u32, u32),
}

impl ParshaRange {
    /// Parses "Genesis 1:1-6:8". A bare chapter ("Genesis 6") means its
    /// first verse, a bare end after "C:V-" is a verse in chapter C, and a
    /// missing end means the range is a single point.
    pub fn parse(range: &str) -> Result<Self> {
        let invalid = || Error::InvalidReference(range.to_string());
        let (book, span) = range.trim().rsplit_once(' ').ok_or_else(invalid)?;
        let (start, end) = span.split_once('-').unwrap_or((span, span));

        let chapter_verse = |s: &str| -> Result<(u32, Option<u32>)> {
            match s.split_once(':') {
                Some((c, v)) => Ok((
                    c.parse().map_err(|_| invalid())?,
                    Some(v.parse().map_err(|_| invalid())?),
                )),
                None => Ok((s.parse().map_err(|_| invalid())?, None)),
            }
        };

        let (start_chapter, start_verse) = chapter_verse(start)?;
        let end = match chapter_verse(end)? {
            (c, Some(v)) => (c, v),
            // "31:1-30" ends at verse 30 of chapter 31.
            (v, None) if start_verse.is_some() => (start_chapter, v),
            (c, None) => (c, 1),
        };

        Ok(Self {
            book: book.trim().to_string(),
            start: (start_chapter, start_verse.unwrap_or(1)),
            end,
        })
    }

    pub fn contains(&self, r: &VerseRef) -> bool {
        r.book == self.book && (r.chapter, r.verse) >= self.start && (r.chapter, r.verse) <= self.end
    }

    /// False for anything that is not a well-formed verse reference.
    pub fn contains_ref(&self, reference: &str) -> bool {
        reference
            .parse::<VerseRef>()
            .map(|r| self.contains(&r))
            .unwrap_or(false)
    }
}

/// Reference shown on hits that come from the parsha table rather than the index.
pub const STATS_REF: &str = "Torah Stats";

/// Weekly Torah portions in reading order: name, book, start, end, verses.
const CATALOGUE: [(&str, &str, (u32, u32), (u32, u32), u32); 54] = [
    ("Bereshit", "Genesis", (1, 1), (6, 8), 146),
    ("Noach", "Genesis", (6, 9), (11, 32), 153),
    ("Lech Lecha", "Genesis", (12, 1), (17, 27), 126),
    ("Vayera", "Genesis", (18, 1), (22, 24), 147),
    ("Chayei Sara", "Genesis", (23, 1), (25, 18), 105),
    ("Toldot", "Genesis", (25, 19), (28, 9), 106),
    ("Vayetzei", "Genesis", (28, 10), (32, 3), 148),
    ("Vayishlach", "Genesis", (32, 4), (36, 43), 153),
    ("Vayeshev", "Genesis", (37, 1), (40, 23), 112),
    ("Miketz", "Genesis", (41, 1), (44, 17), 146),
    ("Vayigash", "Genesis", (44, 18), (47, 27), 106),
    ("Vayechi", "Genesis", (47, 28), (50, 26), 85),
    ("Shemot", "Exodus", (1, 1), (6, 1), 124),
    ("Vaera", "Exodus", (6, 2), (9, 35), 121),
    ("Bo", "Exodus", (10, 1), (13, 16), 106),
    ("Beshalach", "Exodus", (13, 17), (17, 16), 116),
    ("Yitro", "Exodus", (18, 1), (20, 23), 75),
    ("Mishpatim", "Exodus", (21, 1), (24, 18), 118),
    ("Terumah", "Exodus", (25, 1), (27, 19), 96),
    ("Tetzaveh", "Exodus", (27, 20), (30, 10), 101),
    ("Ki Tisa", "Exodus", (30, 11), (34, 35), 139),
    ("Vayakhel", "Exodus", (35, 1), (38, 20), 122),
    ("Pekudei", "Exodus", (38, 21), (40, 38), 92),
    ("Vayikra", "Leviticus", (1, 1), (5, 26), 111),
    ("Tzav", "Leviticus", (6, 1), (8, 36), 97),
    ("Shmini", "Leviticus", (9, 1), (11, 47), 91),
    ("Tazria", "Leviticus", (12, 1), (13, 59), 67),
    ("Metzora", "Leviticus", (14, 1), (15, 33), 90),
    ("Achrei Mot", "Leviticus", (16, 1), (18, 30), 80),
    ("Kedoshim", "Leviticus", (19, 1), (20, 27), 64),
    ("Emor", "Leviticus", (21, 1), (24, 23), 124),
    ("Behar", "Leviticus", (25, 1), (26, 2), 57),
    ("Bechukotai", "Leviticus", (26, 3), (27, 34), 78),
    ("Bamidbar", "Numbers", (1, 1), (4, 20), 159),
    ("Nasso", "Numbers", (4, 21), (7, 89), 176),
    ("Beha'alotcha", "Numbers", (8, 1), (12, 16), 136),
    ("Sh'lach", "Numbers", (13, 1), (15, 41), 119),
    ("Korach", "Numbers", (16, 1), (18, 32), 95),
    ("Chukat", "Numbers", (19, 1), (22, 1), 87),
    ("Balak", "Numbers", (22, 2), (25, 9), 104),
    ("Pinchas", "Numbers", (25, 10), (30, 1), 168),
    ("Matot", "Numbers", (30, 2), (32, 42), 112),
    ("Masei", "Numbers", (33, 1), (36, 13), 132),
    ("Devarim", "Deuteronomy", (1, 1), (3, 22), 105),
    ("Vaetchanan", "Deuteronomy", (3, 23), (7, 11), 122),
    ("Eikev", "Deuteronomy", (7, 12), (11, 25), 111),
    ("Re'eh", "Deuteronomy", (11, 26), (16, 17), 126),
    ("Shoftim", "Deuteronomy", (16, 18), (21, 9), 97),
    ("Ki Teitzei", "Deuteronomy", (21, 10), (25, 19), 110),
    ("Ki Tavo", "Deuteronomy", (26, 1), (29, 8), 122),
    ("Nitzavim", "Deuteronomy", (29, 9), (30, 20), 40),
    ("Vayeilech", "Deuteronomy", (31, 1), (31, 30), 30),
    ("Ha'Azinu", "Deuteronomy", (32, 1), (32, 52), 52),
    ("V'Zot HaBerachah", "Deuteronomy", (33, 1), (34, 12), 41),
];

static PARSHAS: Lazy<Vec<Parsha>> = Lazy::new(|| {
    CATALOGUE
        .iter()
        .map(|&(name, book, start, end, verse_count)| Parsha {
            name: name.to_string(),
            range: ParshaRange { book: book.to_string(), start, end },
            verse_count,
        })
        .collect()
});

/// A named weekly portion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parsha {
    pub name: String,
    pub range: ParshaRange,
    pub verse_count: u32,
}

impl Parsha {
    pub fn all() -> &'static [Parsha] {
        &PARSHAS
    }

    /// Case-insensitive lookup by transliterated name.
    pub fn by_name(name: &str) -> Option<&'static Parsha> {
        let name = name.trim();
        PARSHAS.iter().find(|p| p.name.eq_ignore_ascii_case(name))
    }

    /// Portions whose verse count equals `val`, in reading order.
    pub fn with_verse_count(val: GematriaValue) -> impl Iterator<Item = &'static Parsha> {
        PARSHAS.iter().filter(move |p| p.verse_count == val)
    }

    /// The index-shaped entry reported when a searched value equals this
    /// portion's verse count.
    pub fn stat_entry(&self) -> IndexEntry {
        IndexEntry {
            phrase: format!("Parshat {}", self.name),
            reference: STATS_REF.to_string(),
            context_en: format!("This Parsha contains exactly {} verses.", self.verse_count),
            is_verse: false,
            original_he: None,
        }
    }
}

/// Resolves a portion name, falling back to an explicit "Book C:V-C:V" range.
pub fn resolve(arg: &str) -> Result<ParshaRange> {
    match Parsha::by_name(arg) {
        Some(p) => Ok(p.range.clone()),
        None => ParshaRange::parse(arg),
    }
}
