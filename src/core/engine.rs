use crate::config::Config;
use crate::core::index::{GematriaIndex, PhraseIndexer};
use crate::core::normalizer::normalize;
use crate::core::tracker::WordTracker;
use crate::core::types::{ChapterGroup, RaceFrame, VerseRecord};
use crate::corpus::{CorpusProvider, RetryPolicy};
use log::{debug, info, warn};

/// What a scan built, plus the units it had to skip.
#[derive(Debug, Clone)]
pub struct ScanOutcome<T> {
    pub output: T,
    /// "Book N" for every chapter that could not be read.
    pub missing: Vec<String>,
}

impl<T> ScanOutcome<T> {
    pub fn is_complete(&self) -> bool {
        self.missing.is_empty()
    }
}

// Walks the configured books chapter by chapter in canonical order and feeds
// each successfully read chapter to the indexer, the tracker or the text
// builder. A chapter that cannot be read is logged, recorded and skipped.
pub struct CorpusEngine<'p> {
    provider: &'p dyn CorpusProvider,
    books: Vec<(String, u32)>,
    retry: RetryPolicy,
    indexer: PhraseIndexer,
    min_word_length: usize,
}

impl<'p> CorpusEngine<'p> {
    pub fn new(provider: &'p dyn CorpusProvider, config: &Config) -> Self {
        Self {
            provider,
            books: config.books_and_chapter_counts.clone(),
            retry: config.retry_policy(),
            indexer: PhraseIndexer::new(config.max_phrase_length),
            min_word_length: config.min_word_length,
        }
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn min_word_length(&self) -> usize {
        self.min_word_length
    }

    /// Calls `f` once per readable chapter, in order. Returns the missing units.
    pub fn for_each_chapter(&self, mut f: impl FnMut(&ChapterGroup)) -> Vec<String> {
        let mut missing = Vec::new();

        for (book, chapters) in &self.books {
            info!("Processing {} ({} chapters)", book, chapters);
            for chapter in 1..=*chapters {
                let unit = format!("{} {}", book, chapter);
                let fetched = self.retry.run(&unit, || self.provider.fetch_chapter(book, chapter));
                match fetched {
                    Ok(text) => {
                        let group = text.into_group(book, chapter);
                        debug!("{}: {} verses", unit, group.verses.len());
                        f(&group);
                    }
                    Err(e) => {
                        warn!("[FAILED] skipping {}: {}", unit, e);
                        missing.push(unit);
                    }
                }
            }
        }

        if !missing.is_empty() {
            warn!("{} chapter(s) missing: {}", missing.len(), missing.join(", "));
        }
        missing
    }

    /// Builds the gematria index over the whole corpus.
    pub fn build_index(&self) -> ScanOutcome<GematriaIndex> {
        let mut index = GematriaIndex::new();
        let missing = self.for_each_chapter(|chapter| {
            for verse in &chapter.verses {
                self.indexer.index_verse(&mut index, verse);
            }
        });
        info!("Indexed {} entries under {} values", index.entry_count(), index.len());
        ScanOutcome { output: index, missing }
    }

    /// Runs the word race for `tracked`, one frame per readable chapter.
    pub fn build_race(&self, tracked: impl IntoIterator<Item = String>) -> ScanOutcome<Vec<RaceFrame>> {
        let min_len = self.min_word_length;
        let mut tracker = WordTracker::new(tracked.into_iter().filter(|w| w.chars().count() >= min_len));
        info!("Tracking {} words...", tracker.tracked_len());

        let mut timeline = Vec::new();
        let missing = self.for_each_chapter(|chapter| timeline.push(tracker.scan_chapter(chapter)));
        info!("Race timeline has {} frames", timeline.len());
        ScanOutcome { output: timeline, missing }
    }

    /// Flattens the corpus into normalized verse records with a running index.
    pub fn build_records(&self) -> ScanOutcome<Vec<VerseRecord>> {
        let mut records: Vec<VerseRecord> = Vec::new();
        let missing = self.for_each_chapter(|chapter| {
            for verse in &chapter.verses {
                records.push(VerseRecord {
                    book: verse.book.clone(),
                    reference: verse.reference.clone(),
                    text: normalize(&verse.raw_text),
                    original: verse.raw_text.clone(),
                    index: records.len(),
                });
            }
        });
        info!("Collected {} verses", records.len());
        ScanOutcome { output: records, missing }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::WordCounts;
    use crate::corpus::MemoryCorpus;

    fn config(books: &[(&str, u32)]) -> Config {
        Config {
            books_and_chapter_counts: books.iter().map(|(b, n)| (b.to_string(), *n)).collect(),
            ..Config::default()
        }
    }

    fn corpus() -> MemoryCorpus {
        MemoryCorpus::new()
            .with_chapter("Exodus", 1, &["וַיְדַבֵּר מֹשֶׁה", "וּמֹשֶׁה"], &["And Moses spoke", "And Moses"])
            .with_chapter("Exodus", 3, &["מֹשֶׁה"], &["Moses"])
    }

    #[test]
    fn missing_chapters_are_skipped_not_fatal() {
        let provider = corpus();
        let engine = CorpusEngine::new(&provider, &config(&[("Exodus", 3)])).with_retry(RetryPolicy::none());

        let race = engine.build_race(vec!["משה".to_string()]);
        assert_eq!(race.missing, vec!["Exodus 2".to_string()]);
        assert!(!race.is_complete());
        let labels: Vec<&str> = race.output.iter().map(|f| f.label.as_str()).collect();
        assert_eq!(labels, vec!["Exodus Ch.1", "Exodus Ch.3"]);
        assert_eq!(race.output[1].data[0].exact, 2);
        assert_eq!(race.output[1].data[0].prefix, 3);
    }

    #[test]
    fn short_words_are_not_tracked() {
        let provider = corpus();
        let mut cfg = config(&[("Exodus", 1)]);
        cfg.min_word_length = 4;
        let engine = CorpusEngine::new(&provider, &cfg).with_retry(RetryPolicy::none());
        let race = engine.build_race(vec!["משה".to_string()]);
        assert!(race.output.iter().all(|f| f.data.is_empty()));
    }

    #[test]
    fn index_covers_readable_chapters() {
        let provider = corpus();
        let engine = CorpusEngine::new(&provider, &config(&[("Exodus", 3)])).with_retry(RetryPolicy::none());
        let index = engine.build_index();
        let moshe = index.output.lookup(345);
        let refs: Vec<&str> = moshe.iter().map(|e| e.reference.as_str()).collect();
        assert_eq!(refs, vec!["Exodus 1:1", "Exodus 3:1", "Exodus 3:1"]);
        assert_eq!(moshe[0].context_en, "And Moses spoke");
    }

    #[test]
    fn records_run_in_corpus_order() {
        let provider = corpus();
        let engine = CorpusEngine::new(&provider, &config(&[("Exodus", 3)])).with_retry(RetryPolicy::none());
        let records = engine.build_records().output;
        assert_eq!(records.len(), 3);
        assert_eq!(records[0].text, "וידבר משה");
        assert_eq!(records[1].text, "ומשה");
        assert_eq!(records[2].reference, "Exodus 3:1");
        assert_eq!(records.iter().map(|r| r.index).collect::<Vec<_>>(), vec![0, 1, 2]);
    }

    #[test]
    fn empty_corpus_gives_empty_outputs() {
        let provider = MemoryCorpus::new();
        let engine = CorpusEngine::new(&provider, &config(&[("Genesis", 2)])).with_retry(RetryPolicy::none());
        let index = engine.build_index();
        assert!(index.output.is_empty());
        assert_eq!(index.missing.len(), 2);
        assert!(engine.build_race(vec!["משה".to_string()]).output.is_empty());
    }

    #[test]
    fn tracker_matches_engine_counts() {
        let provider = corpus();
        let engine = CorpusEngine::new(&provider, &config(&[("Exodus", 3)])).with_retry(RetryPolicy::none());
        let mut tracker = WordTracker::new(vec!["משה".to_string()]);
        engine.for_each_chapter(|c| {
            tracker.scan_chapter(c);
        });
        assert_eq!(tracker.counts("משה"), Some(WordCounts { exact: 2, prefix: 3 }));
    }
}
