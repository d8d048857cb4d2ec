// File: src/corpus.rs
use crate::core::types::{ChapterGroup, Verse};
use crate::error::{Error, Result};
use log::warn;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::thread;
use std::time::Duration;

/// One chapter as a text source delivers it: parallel Hebrew and
/// translation arrays, one element per verse.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChapterText {
    pub he: Vec<Value>,
    #[serde(default)]
    pub text: Vec<Value>,
}

impl ChapterText {
    pub fn new(he: &[&str], text: &[&str]) -> Self {
        Self {
            he: he.iter().map(|s| Value::from(*s)).collect(),
            text: text.iter().map(|s| Value::from(*s)).collect(),
        }
    }

    /// Turns the raw arrays into verses. A verse whose Hebrew is not a
    /// string is logged and dropped; its number is not reused.
    pub fn into_group(self, book: &str, chapter: u32) -> ChapterGroup {
        let mut translations = self.text.into_iter();
        let mut verses = Vec::with_capacity(self.he.len());

        for (i, he) in self.he.into_iter().enumerate() {
            let verse_number = i as u32 + 1;
            let translation = match translations.next() {
                Some(Value::String(s)) => s,
                _ => String::new(),
            };
            match he {
                Value::String(raw) => verses.push(Verse::new(book, chapter, verse_number, raw, translation)),
                other => warn!(
                    "skipping {}: {}",
                    crate::core::types::format_ref(book, chapter, verse_number),
                    Error::malformed("verse", format!("expected Hebrew text, found {}", other))
                ),
            }
        }

        ChapterGroup {
            book: book.to_string(),
            chapter,
            verses,
        }
    }
}

/// Source of chapter texts. Implementations may fail per chapter; the
/// engine skips what it cannot get.
pub trait CorpusProvider {
    fn fetch_chapter(&self, book: &str, chapter: u32) -> Result<ChapterText>;
}

/// Bounded retry with a fixed pause between attempts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub attempts: u32,
    pub pause: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            attempts: 5,
            pause: Duration::from_secs(2),
        }
    }
}

impl RetryPolicy {
    pub fn none() -> Self {
        Self {
            attempts: 1,
            pause: Duration::ZERO,
        }
    }

    /// Runs `op` until it succeeds, fails permanently, or the attempts run out.
    pub fn run<T>(&self, unit: &str, mut op: impl FnMut() -> Result<T>) -> Result<T> {
        let attempts = self.attempts.max(1);
        let mut last_reason = String::new();

        for attempt in 1..=attempts {
            match op() {
                Ok(value) => return Ok(value),
                Err(e) if !e.is_transient() => return Err(e),
                Err(e) => {
                    warn!("{}: attempt {}/{} failed: {}", unit, attempt, attempts, e);
                    last_reason = e.to_string();
                    if attempt < attempts && !self.pause.is_zero() {
                        thread::sleep(self.pause);
                    }
                }
            }
        }

        Err(Error::Fetch {
            unit: unit.to_string(),
            attempts,
            reason: last_reason,
        })
    }
}

/// Reads `<root>/<Book>.<chapter>.json` files.
#[derive(Debug, Clone)]
pub struct DirectoryCorpus {
    root: PathBuf,
}

impl DirectoryCorpus {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn chapter_path(&self, book: &str, chapter: u32) -> PathBuf {
        self.root.join(format!("{}.{}.json", book, chapter))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl CorpusProvider for DirectoryCorpus {
    fn fetch_chapter(&self, book: &str, chapter: u32) -> Result<ChapterText> {
        let unit = format!("{} {}", book, chapter);
        let path = self.chapter_path(book, chapter);
        let file = match File::open(&path) {
            Ok(file) => file,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(Error::malformed(unit, format!("{} not found", path.display())))
            }
            Err(e) => return Err(e.into()),
        };
        serde_json::from_reader(BufReader::new(file)).map_err(|e| Error::malformed(unit, e.to_string()))
    }
}

/// In-memory chapters, mostly for tests and embedding.
#[derive(Debug, Clone, Default)]
pub struct MemoryCorpus {
    chapters: HashMap<(String, u32), ChapterText>,
}

impl MemoryCorpus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, book: &str, chapter: u32, text: ChapterText) {
        self.chapters.insert((book.to_string(), chapter), text);
    }

    pub fn with_chapter(mut self, book: &str, chapter: u32, he: &[&str], en: &[&str]) -> Self {
        self.insert(book, chapter, ChapterText::new(he, en));
        self
    }
}

impl CorpusProvider for MemoryCorpus {
    fn fetch_chapter(&self, book: &str, chapter: u32) -> Result<ChapterText> {
        self.chapters
            .get(&(book.to_string(), chapter))
            .cloned()
            .ok_or_else(|| Error::malformed(format!("{} {}", book, chapter), "chapter not available"))
    }
}
