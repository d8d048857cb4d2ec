// File: src/core/trend.rs
use crate::core::tracker::{match_token, MatchKind, PrefixSet};
use crate::core::types::VerseRecord;
use serde::Serialize;

/// Prefixes a trend accepts in front of the word. Narrower than the race set.
pub const TREND_PREFIXES: [&str; 10] = ["ו", "ב", "כ", "ל", "מ", "וב", "וכ", "ול", "ומ", "ש"];

pub fn trend_prefixes() -> PrefixSet {
    PrefixSet::new(&TREND_PREFIXES)
}

/// Cumulative count of a word at one sampled corpus position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TrendPoint {
    pub index: usize,
    #[serde(rename = "name")]
    pub reference: String,
    pub book: String,
    pub count: u64,
}

/// A verse in which the word occurs at least once.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VerseMatch {
    #[serde(rename = "ref")]
    pub reference: String,
    pub book: String,
    pub text: String,
    pub word: String,
    pub count: u64,
    pub index: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Trend {
    pub points: Vec<TrendPoint>,
    pub matches: Vec<VerseMatch>,
}

impl Trend {
    /// Occurrences per book, in first-seen order.
    pub fn per_book(&self) -> Vec<(String, u64)> {
        let mut totals: Vec<(String, u64)> = Vec::new();
        for m in &self.matches {
            match totals.iter_mut().find(|(book, _)| *book == m.book) {
                Some((_, n)) => *n += m.count,
                None => totals.push((m.book.clone(), m.count)),
            }
        }
        totals
    }

    pub fn total(&self) -> u64 {
        self.matches.iter().map(|m| m.count).sum()
    }
}

/// Tracks how often `word` has occurred up to every `sample_rate`-th verse
/// of the flat corpus. The last verse is always sampled.
pub fn trend(
    records: &[VerseRecord],
    word: &str,
    use_prefixes: bool,
    sample_rate: usize,
    prefixes: &PrefixSet,
) -> Trend {
    if records.is_empty() || word.is_empty() {
        return Trend::default();
    }

    let step = sample_rate.max(1);
    let mut sample_at: Vec<usize> = (0..records.len()).step_by(step).collect();
    if sample_at.last().is_some_and(|&last| last < records.len() - 1) {
        sample_at.push(records.len() - 1);
    }

    let mut trend = Trend::default();
    let mut running = 0u64;
    let mut next = 0;

    for at in sample_at {
        while next <= at {
            let record = &records[next];
            let in_verse = record
                .text
                .split(' ')
                .filter(|w| match match_token(w, word, prefixes) {
                    Some(MatchKind::Exact) => true,
                    Some(MatchKind::Prefixed) => use_prefixes,
                    None => false,
                })
                .count() as u64;

            if in_verse > 0 {
                running += in_verse;
                trend.matches.push(VerseMatch {
                    reference: record.reference.clone(),
                    book: record.book.clone(),
                    text: if record.original.is_empty() {
                        record.text.clone()
                    } else {
                        record.original.clone()
                    },
                    word: word.to_string(),
                    count: in_verse,
                    index: record.index,
                });
            }
            next += 1;
        }

        let record = &records[at];
        trend.points.push(TrendPoint {
            index: at,
            reference: record.reference.clone(),
            book: record.book.clone(),
            count: running,
        });
    }

    trend
}
