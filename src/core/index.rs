// --- File: src/core/index.rs
use crate::core::gematria::value;
use crate::core::normalizer::{strip_to_letters, strip_translation_tags, MAQAF};
use crate::core::types::{GematriaValue, IndexEntry, Verse, WHOLE_VERSE};
use crate::parsha::{Parsha, ParshaRange};
use log::debug;
use serde::Serialize;
use std::borrow::Cow;
use std::collections::{BTreeMap, HashSet};

/// Default sliding-window width, in words.
pub const MAX_PHRASE_LENGTH: usize = 3;

/// Inverted index from gematria value to the verses and phrases that sum to it.
///
/// Buckets keep insertion order and never hold two entries with the same
/// (phrase, ref). Serializes as a JSON object keyed by the decimal value.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct GematriaIndex {
    buckets: BTreeMap<GematriaValue, Vec<IndexEntry>>,
    #[serde(skip)]
    seen: HashSet<(GematriaValue, String, String)>,
}

impl GematriaIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuilds an index from loaded buckets. Duplicates and empty or
    /// zero-valued buckets are dropped on the way in.
    pub fn from_buckets(buckets: BTreeMap<GematriaValue, Vec<IndexEntry>>) -> Self {
        let mut index = Self::new();
        for (val, entries) in buckets {
            for entry in entries {
                index.insert(val, entry);
            }
        }
        index
    }

    /// Appends `entry` to the bucket for `val`.
    /// Returns false when the value is zero or the (phrase, ref) pair is already there.
    pub fn insert(&mut self, val: GematriaValue, entry: IndexEntry) -> bool {
        if val == 0 {
            return false;
        }
        let key = (val, entry.phrase.clone(), entry.reference.clone());
        if !self.seen.insert(key) {
            return false;
        }
        self.buckets.entry(val).or_default().push(entry);
        true
    }

    /// Entries for `val`, in insertion order.
    pub fn lookup(&self, val: GematriaValue) -> &[IndexEntry] {
        self.buckets.get(&val).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn values(&self) -> impl Iterator<Item = GematriaValue> + '_ {
        self.buckets.keys().copied()
    }

    /// Number of distinct values.
    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    /// Total number of entries across all buckets.
    pub fn entry_count(&self) -> usize {
        self.seen.len()
    }

    pub fn buckets(&self) -> &BTreeMap<GematriaValue, Vec<IndexEntry>> {
        &self.buckets
    }

    /// Finds entries for `target` (and its neighbours in colel mode),
    /// filtered by `options`. Hits are grouped by value: target first, then
    /// target - 1, then target + 1. Within a value, portions whose verse
    /// count equals it come before index entries.
    ///
    /// In matcher mode only `target` itself is searched, with no portion
    /// stats and no portion filter.
    pub fn search(&self, target: GematriaValue, options: &SearchOptions) -> Vec<SearchHit<'_>> {
        if target == 0 {
            return vec![];
        }

        let mut values = vec![target];
        if options.colel && !options.matcher {
            values.push(target - 1);
            values.push(target.saturating_add(1));
        }
        let range = options.parsha.as_ref().filter(|_| !options.matcher);

        let mut hits = Vec::new();
        for actual in values.into_iter().filter(|&v| v > 0) {
            if !options.matcher {
                for parsha in Parsha::with_verse_count(actual) {
                    hits.push(SearchHit {
                        entry: Cow::Owned(parsha.stat_entry()),
                        actual_value: actual,
                        is_exact: actual == target,
                        kind: HitKind::Stat,
                    });
                }
            }

            for entry in self.lookup(actual) {
                if options.single_word && (entry.is_verse || entry.phrase.contains(' ')) {
                    continue;
                }
                if let Some(range) = range {
                    if !range.contains_ref(&entry.reference) {
                        continue;
                    }
                }
                hits.push(SearchHit {
                    entry: Cow::Borrowed(entry),
                    actual_value: actual,
                    is_exact: actual == target,
                    kind: HitKind::Standard,
                });
            }
        }
        hits
    }
}

/// Filters for [`GematriaIndex::search`].
#[derive(Debug, Clone, Default)]
pub struct SearchOptions {
    /// Also search one below and one above the target.
    pub colel: bool,
    /// Drop whole verses and multi-word phrases.
    pub single_word: bool,
    pub parsha: Option<ParshaRange>,
    /// The target is a difference between two inputs.
    pub matcher: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitKind {
    Standard,
    /// A portion whose verse count equals the value.
    Stat,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchHit<'a> {
    pub entry: Cow<'a, IndexEntry>,
    pub actual_value: GematriaValue,
    pub is_exact: bool,
    pub kind: HitKind,
}

/// Builds a [`GematriaIndex`] from verses with a bounded sliding window.
#[derive(Debug, Clone)]
pub struct PhraseIndexer {
    max_phrase_length: usize,
}

impl Default for PhraseIndexer {
    fn default() -> Self {
        Self::new(MAX_PHRASE_LENGTH)
    }
}

impl PhraseIndexer {
    pub fn new(max_phrase_length: usize) -> Self {
        Self { max_phrase_length }
    }

    /// Indexes `verses` in the order given into a fresh index.
    pub fn build_index<'a>(&self, verses: impl IntoIterator<Item = &'a Verse>) -> GematriaIndex {
        let mut index = GematriaIndex::new();
        for verse in verses {
            self.index_verse(&mut index, verse);
        }
        index
    }

    /// Adds the whole-verse entry and every phrase window of `verse` to `index`.
    /// Returns the number of entries actually added.
    pub fn index_verse(&self, index: &mut GematriaIndex, verse: &Verse) -> usize {
        let clean_verse = verse.raw_text.replace(MAQAF, " ");
        let context_en = strip_translation_tags(&verse.translation).into_owned();
        let mut added = 0;

        let verse_val = value(&clean_verse);
        let whole = IndexEntry {
            phrase: WHOLE_VERSE.to_string(),
            reference: verse.reference.clone(),
            context_en: context_en.clone(),
            is_verse: true,
            original_he: Some(verse.raw_text.clone()),
        };
        if index.insert(verse_val, whole) {
            added += 1;
        }

        let raw_words: Vec<&str> = clean_verse.split_whitespace().collect();
        let n = raw_words.len();

        for i in 0..n {
            let mut window: Vec<String> = Vec::with_capacity(self.max_phrase_length);
            for word in &raw_words[i..n.min(i + self.max_phrase_length)] {
                let clean_word = strip_to_letters(word);
                if clean_word.is_empty() {
                    continue;
                }
                window.push(clean_word);

                let phrase = window.join(" ");
                let val = value(&phrase);
                let entry = IndexEntry {
                    phrase,
                    reference: verse.reference.clone(),
                    context_en: context_en.clone(),
                    is_verse: false,
                    original_he: None,
                };
                if index.insert(val, entry) {
                    added += 1;
                }

                // A colon or period ends the window at this word.
                if word.contains(':') || word.contains('.') {
                    break;
                }
            }
        }

        debug!("indexed {} ({} new entries)", verse.reference, added);
        added
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn verse(reference_verse: u32, he: &str) -> Verse {
        Verse::new("Genesis", 1, reference_verse, he, "In the <i>beginning</i>")
    }

    fn phrases(index: &GematriaIndex) -> Vec<(GematriaValue, String)> {
        index
            .buckets()
            .iter()
            .flat_map(|(v, entries)| entries.iter().filter(|e| !e.is_verse).map(move |e| (*v, e.phrase.clone())))
            .collect()
    }

    #[test]
    fn bereshit_bara_end_to_end() {
        let index = PhraseIndexer::new(3).build_index(&[verse(1, "בראשית ברא")]);

        let whole = index.lookup(1116);
        assert_eq!(whole.len(), 2);
        assert!(whole[0].is_verse);
        assert_eq!(whole[0].phrase, WHOLE_VERSE);
        assert_eq!(whole[0].original_he.as_deref(), Some("בראשית ברא"));
        assert_eq!(whole[0].context_en, "In the beginning");
        assert_eq!(whole[1].phrase, "בראשית ברא");
        assert!(!whole[1].is_verse);
        assert_eq!(whole[1].original_he, None);

        assert_eq!(index.lookup(913).len(), 1);
        assert_eq!(index.lookup(913)[0].phrase, "בראשית");
        assert_eq!(index.lookup(203).len(), 1);
        assert_eq!(index.lookup(203)[0].phrase, "ברא");
        assert_eq!(index.entry_count(), 4);
    }

    #[test]
    fn translation_loses_empty_tags() {
        let v = Verse::new("Genesis", 1, 1, "ברא", "In <> the <i>beginning</i>");
        let index = PhraseIndexer::default().build_index(&[v]);
        assert!(index.lookup(203).iter().all(|e| e.context_en == "In  the beginning"));
    }

    #[test]
    fn colon_token_stops_window_growth() {
        // "ברא:" ends the phrase; nothing may span past it.
        let index = PhraseIndexer::new(3).build_index(&[verse(1, "בראשית ברא: אלהים")]);
        let found = phrases(&index);
        assert!(found.iter().any(|(_, p)| p == "בראשית ברא"));
        assert!(found.iter().any(|(_, p)| p == "ברא"));
        assert!(found.iter().any(|(_, p)| p == "אלהים"));
        assert!(!found.iter().any(|(_, p)| p == "בראשית ברא אלהים"));
        assert!(!found.iter().any(|(_, p)| p == "ברא אלהים"));
    }

    #[test]
    fn period_also_stops_window() {
        let index = PhraseIndexer::new(3).build_index(&[verse(1, "אב. גד הו")]);
        let found = phrases(&index);
        assert!(!found.iter().any(|(_, p)| p.starts_with("אב ")));
        assert!(found.iter().any(|(_, p)| p == "גד הו"));
    }

    #[test]
    fn non_hebrew_tokens_are_skipped_without_breaking() {
        // "--" strips to nothing but still takes a window slot.
        let index = PhraseIndexer::new(3).build_index(&[verse(1, "אב -- גד הו")]);
        let found = phrases(&index);
        assert!(found.iter().any(|(_, p)| p == "אב גד"));
        assert!(!found.iter().any(|(_, p)| p == "אב גד הו"));
        assert!(found.iter().any(|(_, p)| p == "גד הו"));
    }

    #[test]
    fn maqaf_separates_window_words() {
        let index = PhraseIndexer::new(3).build_index(&[verse(1, "את\u{05be}השמים")]);
        let found = phrases(&index);
        assert!(found.iter().any(|(_, p)| p == "את"));
        assert!(found.iter().any(|(_, p)| p == "השמים"));
        assert!(found.iter().any(|(_, p)| p == "את השמים"));
    }

    #[test]
    fn repeated_phrase_in_one_verse_is_stored_once() {
        let index = PhraseIndexer::new(1).build_index(&[verse(1, "אב אב אב")]);
        assert_eq!(index.lookup(3).iter().filter(|e| !e.is_verse).count(), 1);
    }

    #[test]
    fn same_phrase_in_different_verses_is_kept() {
        let index = PhraseIndexer::new(1).build_index(&[verse(1, "אב"), verse(2, "אב")]);
        let refs: Vec<&str> = index.lookup(3).iter().map(|e| e.reference.as_str()).collect();
        assert_eq!(refs, vec!["Genesis 1:1", "Genesis 1:1", "Genesis 1:2", "Genesis 1:2"]);
    }

    #[test]
    fn whole_verse_appears_once_and_rebuilds_are_stable() {
        let corpus = vec![
            verse(1, "בְּרֵאשִׁית בָּרָא אֱלֹהִים"),
            verse(2, "וְהָאָרֶץ הָיְתָה תֹהוּ וָבֹהוּ"),
        ];
        let indexer = PhraseIndexer::default();
        let first = indexer.build_index(&corpus);
        let second = indexer.build_index(&corpus);

        for (v, entries) in first.buckets() {
            assert_eq!(entries.len(), second.lookup(*v).len());
        }
        let total = value(&corpus[0].raw_text);
        let wholes = first.lookup(total).iter().filter(|e| e.is_verse && e.reference == "Genesis 1:1").count();
        assert_eq!(wholes, 1);

        // Feeding the same verse again into a live index adds nothing.
        let mut live = first.clone();
        assert_eq!(indexer.index_verse(&mut live, &corpus[0]), 0);
        assert_eq!(live.entry_count(), first.entry_count());
    }

    #[test]
    fn zero_value_text_is_never_indexed() {
        let index = PhraseIndexer::default().build_index(&[verse(1, "123 ... abc")]);
        assert!(index.is_empty());
        assert!(index.lookup(0).is_empty());
    }

    #[test]
    fn from_buckets_drops_duplicates() {
        let index = PhraseIndexer::default().build_index(&[verse(1, "בראשית ברא")]);
        let mut buckets = index.buckets().clone();
        let dup = buckets[&913][0].clone();
        buckets.get_mut(&913).unwrap().push(dup);
        buckets.insert(0, vec![]);

        let rebuilt = GematriaIndex::from_buckets(buckets);
        assert_eq!(rebuilt.lookup(913).len(), 1);
        assert_eq!(rebuilt.len(), index.len());
    }

    #[test]
    fn search_filters() {
        let corpus = vec![
            Verse::new("Genesis", 1, 1, "בראשית ברא", ""),
            Verse::new("Exodus", 1, 1, "ברא", ""),
        ];
        let index = PhraseIndexer::default().build_index(&corpus);

        let all = index.search(203, &SearchOptions::default());
        assert_eq!(all.len(), 3);
        assert!(all.iter().all(|h| h.is_exact));

        let single = index.search(1116, &SearchOptions { single_word: true, ..Default::default() });
        assert!(single.is_empty());

        let genesis = SearchOptions {
            parsha: Some(ParshaRange::parse("Genesis 1:1-6:8").unwrap()),
            ..Default::default()
        };
        let hits = index.search(203, &genesis);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].entry.reference, "Genesis 1:1");

        let colel = index.search(204, &SearchOptions { colel: true, ..Default::default() });
        assert_eq!(colel.len(), 3);
        assert!(colel.iter().all(|h| h.actual_value == 203 && !h.is_exact));

        assert!(index.search(0, &SearchOptions::default()).is_empty());
    }

    #[test]
    fn verse_counts_surface_as_stats() {
        // Bereshit has 146 verses; 146 = קמו.
        let corpus = vec![
            Verse::new("Genesis", 1, 1, "קמו", ""),
            Verse::new("Exodus", 1, 1, "קמו", ""),
        ];
        let index = PhraseIndexer::default().build_index(&corpus);

        let hits = index.search(146, &SearchOptions::default());
        let stats: Vec<&str> = hits
            .iter()
            .filter(|h| h.kind == HitKind::Stat)
            .map(|h| h.entry.phrase.as_str())
            .collect();
        assert_eq!(stats, vec!["Parshat Bereshit", "Parshat Miketz"]);
        assert_eq!(hits[0].kind, HitKind::Stat);
        assert_eq!(hits.len(), 6);

        // The portion filter keeps stats and drops index entries outside the range.
        let in_exodus = SearchOptions {
            parsha: Some(crate::parsha::resolve("Shemot").unwrap()),
            ..Default::default()
        };
        let filtered = index.search(146, &in_exodus);
        assert_eq!(filtered.iter().filter(|h| h.kind == HitKind::Stat).count(), 2);
        assert!(filtered
            .iter()
            .filter(|h| h.kind == HitKind::Standard)
            .all(|h| h.entry.reference == "Exodus 1:1"));
        assert_eq!(filtered.len(), 4);
    }

    #[test]
    fn matcher_mode_ignores_colel_stats_and_portion() {
        let corpus = vec![
            Verse::new("Genesis", 1, 1, "קמו", ""),
            Verse::new("Exodus", 1, 1, "קמה", ""),
        ];
        let index = PhraseIndexer::default().build_index(&corpus);
        let options = SearchOptions {
            colel: true,
            parsha: Some(crate::parsha::resolve("Shemot").unwrap()),
            matcher: true,
            ..Default::default()
        };

        let hits = index.search(146, &options);
        assert!(hits.iter().all(|h| h.kind == HitKind::Standard && h.actual_value == 146));
        let refs: Vec<&str> = hits.iter().map(|h| h.entry.reference.as_str()).collect();
        assert_eq!(refs, vec!["Genesis 1:1", "Genesis 1:1"]);
    }
}
