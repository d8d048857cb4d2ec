// File: src/core/tracker.rs
use crate::core::normalizer::words;
use crate::core::types::{ChapterGroup, RaceEntry, RaceFrame, WordCounts};
use log::debug;
use std::cmp::Reverse;
use std::collections::{BTreeMap, HashSet};

/// Number of words kept in each leaderboard frame.
pub const LEADERBOARD_SIZE: usize = 20;

/// Conjunction, article and preposition clusters allowed in front of a
/// tracked word. Closed list.
pub const GRAMMAR_PREFIXES: [&str; 20] = [
    "ו", "ה", "ב", "כ", "ל", "מ", "ש",
    "וה", "וב", "וכ", "ול", "ומ", "וש",
    "שב", "שכ", "של", "שמ",
    "כש", "מש", "בש",
];

/// The fixed set of grammatical prefixes.
#[derive(Debug, Clone)]
pub struct PrefixSet {
    prefixes: HashSet<&'static str>,
    /// Longest prefix, in chars.
    max_len: usize,
}

impl Default for PrefixSet {
    fn default() -> Self {
        Self::new(&GRAMMAR_PREFIXES)
    }
}

impl PrefixSet {
    pub fn new(prefixes: &[&'static str]) -> Self {
        Self {
            prefixes: prefixes.iter().copied().collect(),
            max_len: prefixes.iter().map(|p| p.chars().count()).max().unwrap_or(0),
        }
    }

    pub fn contains(&self, prefix: &str) -> bool {
        self.prefixes.contains(prefix)
    }

    /// Every split of `token` into (prefix, rest) where the prefix is in
    /// the set and the rest is non-empty.
    pub fn splits<'a>(&'a self, token: &'a str) -> impl Iterator<Item = (&'a str, &'a str)> + 'a {
        token
            .char_indices()
            .skip(1)
            .take(self.max_len)
            .map(move |(at, _)| token.split_at(at))
            .filter(move |(prefix, _)| self.contains(prefix))
    }
}

/// How a token matched a tracked word.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchKind {
    Exact,
    Prefixed,
}

/// Running counters per tracked word. Kept sorted by word so leaderboard
/// ties resolve alphabetically.
pub type WordCounters = BTreeMap<String, WordCounts>;

/// Counts tracked words across a corpus and snapshots a leaderboard after
/// every chapter. Counters are never reset during a scan.
#[derive(Debug, Clone)]
pub struct WordTracker {
    counters: WordCounters,
    prefixes: PrefixSet,
    leaderboard_size: usize,
}

impl WordTracker {
    pub fn new(tracked: impl IntoIterator<Item = String>) -> Self {
        Self::with_prefixes(tracked, PrefixSet::default())
    }

    pub fn with_prefixes(tracked: impl IntoIterator<Item = String>, prefixes: PrefixSet) -> Self {
        Self {
            counters: tracked
                .into_iter()
                .filter(|w| !w.is_empty())
                .map(|w| (w, WordCounts::default()))
                .collect(),
            prefixes,
            leaderboard_size: LEADERBOARD_SIZE,
        }
    }

    pub fn counters(&self) -> &WordCounters {
        &self.counters
    }

    pub fn counts(&self, word: &str) -> Option<WordCounts> {
        self.counters.get(word).copied()
    }

    pub fn tracked_len(&self) -> usize {
        self.counters.len()
    }

    /// Credits one normalized token. An exact hit bumps both counters;
    /// a tracked word behind a valid prefix bumps only `prefix`. One token
    /// may credit several targets when one target is a suffix of another.
    pub fn count_token(&mut self, token: &str) {
        if let Some(counts) = self.counters.get_mut(token) {
            counts.exact += 1;
            counts.prefix += 1;
        }
        for (_, rest) in self.prefixes.splits(token) {
            if let Some(counts) = self.counters.get_mut(rest) {
                counts.prefix += 1;
            }
        }
    }

    /// Normalizes `raw_text` and counts every word in it.
    pub fn scan_text(&mut self, raw_text: &str) {
        for word in words(raw_text) {
            self.count_token(&word);
        }
    }

    /// Scans a whole chapter and returns the frame taken right after it.
    pub fn scan_chapter(&mut self, chapter: &ChapterGroup) -> RaceFrame {
        for verse in &chapter.verses {
            self.scan_text(&verse.raw_text);
        }
        let frame = self.snapshot(chapter.label());
        debug!("{}: {} words on the board", frame.label, frame.data.len());
        frame
    }

    /// Top words by prefix-inclusive count, zero counts dropped.
    pub fn snapshot(&self, label: impl Into<String>) -> RaceFrame {
        let mut ranked: Vec<(&String, &WordCounts)> = self.counters.iter().collect();
        // Stable: equal counts stay in word order.
        ranked.sort_by_key(|(_, counts)| Reverse(counts.prefix));

        let data = ranked
            .into_iter()
            .take(self.leaderboard_size)
            .filter(|(_, counts)| counts.prefix > 0)
            .map(|(name, counts)| RaceEntry {
                name: name.clone(),
                exact: counts.exact,
                prefix: counts.prefix,
            })
            .collect();

        RaceFrame {
            label: label.into(),
            data,
        }
    }
}

/// Classifies `token` against a single `target`.
pub fn match_token(token: &str, target: &str, prefixes: &PrefixSet) -> Option<MatchKind> {
    if token == target {
        return Some(MatchKind::Exact);
    }
    token
        .strip_suffix(target)
        .filter(|prefix| prefixes.contains(prefix))
        .map(|_| MatchKind::Prefixed)
}

/// Scans `corpus` chapter by chapter, one frame per chapter.
pub fn build_race<'a>(
    corpus: impl IntoIterator<Item = &'a ChapterGroup>,
    tracked: impl IntoIterator<Item = String>,
) -> Vec<RaceFrame> {
    let mut tracker = WordTracker::new(tracked);
    corpus.into_iter().map(|chapter| tracker.scan_chapter(chapter)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::Verse;

    fn chapter(book: &str, n: u32, verses: &[&str]) -> ChapterGroup {
        ChapterGroup {
            book: book.to_string(),
            chapter: n,
            verses: verses
                .iter()
                .enumerate()
                .map(|(i, he)| Verse::new(book, n, i as u32 + 1, *he, ""))
                .collect(),
        }
    }

    fn tracker(words: &[&str]) -> WordTracker {
        WordTracker::new(words.iter().map(|w| w.to_string()))
    }

    #[test]
    fn prefixed_token_counts_only_prefix() {
        let mut t = tracker(&["משה"]);
        t.scan_text("ובמשה");
        assert_eq!(t.counts("משה"), Some(WordCounts { exact: 0, prefix: 1 }));
    }

    #[test]
    fn exact_token_counts_both() {
        let mut t = tracker(&["משה"]);
        t.scan_chapter(&chapter("Exodus", 2, &["משה"]));
        assert_eq!(t.counts("משה"), Some(WordCounts { exact: 1, prefix: 1 }));
    }

    #[test]
    fn unknown_prefix_does_not_match() {
        let mut t = tracker(&["משה"]);
        t.scan_text("אמשה תמשה משהו");
        assert_eq!(t.counts("משה"), Some(WordCounts::default()));
    }

    #[test]
    fn diacritics_and_maqaf_are_normalized_before_matching() {
        let mut t = tracker(&["משה"]);
        t.scan_text("וַיֹּ֥אמֶר מֹשֶׁ֖ה אֶל\u{05be}מֹשֶׁה וּמֹשֶׁ֣ה");
        assert_eq!(t.counts("משה"), Some(WordCounts { exact: 2, prefix: 3 }));
    }

    #[test]
    fn overlapping_targets_are_each_credited() {
        // "במשה" is itself tracked and ends with "משה": both get credit
        // from "ובמשה", through "ו" and "וב" respectively.
        let mut t = tracker(&["משה", "במשה"]);
        t.count_token("ובמשה");
        assert_eq!(t.counts("משה"), Some(WordCounts { exact: 0, prefix: 1 }));
        assert_eq!(t.counts("במשה"), Some(WordCounts { exact: 0, prefix: 1 }));

        // An exact hit on the longer word still counts as a prefixed hit
        // on the shorter one.
        t.count_token("במשה");
        assert_eq!(t.counts("במשה"), Some(WordCounts { exact: 1, prefix: 2 }));
        assert_eq!(t.counts("משה"), Some(WordCounts { exact: 0, prefix: 2 }));
    }

    #[test]
    fn splits_agree_with_match_token() {
        let prefixes = PrefixSet::default();
        let targets = ["משה", "ה", "שה", "ובמשה", "אהרן"];
        for token in ["ובמשה", "משה", "המשה", "שמשה", "כשמשה", "ואהרן", "ה"] {
            for target in targets {
                let via_split = token == target
                    || prefixes.splits(token).any(|(_, rest)| rest == target);
                assert_eq!(
                    via_split,
                    match_token(token, target, &prefixes).is_some(),
                    "{} / {}",
                    token,
                    target
                );
            }
        }
    }

    #[test]
    fn prefix_never_below_exact() {
        let mut t = tracker(&["משה", "אהרן", "ישראל"]);
        t.scan_text("משה ואהרן לישראל משה בני ישראל ומשה");
        for counts in t.counters().values() {
            assert!(counts.prefix >= counts.exact);
        }
        assert_eq!(t.counts("ישראל"), Some(WordCounts { exact: 1, prefix: 2 }));
    }

    #[test]
    fn frames_are_filtered_ranked_and_capped() {
        let tracked: Vec<String> = (0..30).map(|i| format!("א{}", char::from_u32(0x05d1 + i).unwrap_or('ב'))).collect();
        let mut t = WordTracker::new(tracked.clone());
        // Word i appears i times; the first word never appears.
        for (i, w) in tracked.iter().enumerate() {
            for _ in 0..i {
                t.count_token(w);
            }
        }
        let frame = t.snapshot("Genesis Ch.1");
        assert_eq!(frame.data.len(), LEADERBOARD_SIZE);
        assert_eq!(frame.data[0].name, tracked[29]);
        assert_eq!(frame.data[0].prefix, 29);
        assert_eq!(frame.data[LEADERBOARD_SIZE - 1].prefix, 10);
        assert!(frame.data.iter().all(|e| e.name != tracked[0]));
        assert!(frame.data.windows(2).all(|w| w[0].prefix > w[1].prefix));
    }

    #[test]
    fn zero_counts_shrink_the_frame() {
        let mut t = tracker(&["משה", "אהרן", "נח"]);
        t.scan_text("משה");
        let frame = t.snapshot("x");
        assert_eq!(frame.data.len(), 1);
        assert_eq!(frame.data[0].name, "משה");
    }

    #[test]
    fn ties_break_alphabetically() {
        let mut t = tracker(&["נח", "אהרן", "משה"]);
        t.scan_text("נח משה אהרן");
        let names: Vec<String> = t.snapshot("x").data.into_iter().map(|e| e.name).collect();
        assert_eq!(names, vec!["אהרן", "משה", "נח"]);
    }

    #[test]
    fn race_accumulates_across_chapters() {
        let corpus = vec![
            chapter("Exodus", 2, &["משה", "ומשה"]),
            chapter("Exodus", 3, &["אהרן"]),
            chapter("Exodus", 4, &["משה ואהרן ואהרן"]),
        ];
        let frames = build_race(&corpus, vec!["משה".to_string(), "אהרן".to_string()]);
        assert_eq!(frames.len(), 3);
        assert_eq!(frames[0].label, "Exodus Ch.2");
        assert_eq!(frames[0].data, vec![RaceEntry { name: "משה".into(), exact: 1, prefix: 2 }]);
        assert_eq!(frames[1].data.len(), 2);
        let last = &frames[2];
        assert_eq!(last.label, "Exodus Ch.4");
        assert_eq!(last.data[0], RaceEntry { name: "אהרן".into(), exact: 1, prefix: 3 });
        assert_eq!(last.data[1], RaceEntry { name: "משה".into(), exact: 2, prefix: 3 });
    }

    #[test]
    fn empty_corpus_yields_empty_timeline() {
        let frames = build_race(&Vec::<ChapterGroup>::new(), vec!["משה".to_string()]);
        assert!(frames.is_empty());
    }
}
