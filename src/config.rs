// File: src/config.rs
use crate::corpus::RetryPolicy;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::time::Duration;

/// The five books of the Torah with their chapter counts.
pub const TORAH_BOOKS: [(&str, u32); 5] = [
    ("Genesis", 50),
    ("Exodus", 40),
    ("Leviticus", 27),
    ("Numbers", 36),
    ("Deuteronomy", 34),
];

/// Build parameters. Every key is optional in the JSON form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Config {
    pub max_phrase_length: usize,
    pub min_word_length: usize,
    /// Books in canonical order, each with its chapter count.
    pub books_and_chapter_counts: Vec<(String, u32)>,
    pub retry_attempts: u32,
    pub retry_pause_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_phrase_length: 3,
            min_word_length: 2,
            books_and_chapter_counts: TORAH_BOOKS.iter().map(|(b, n)| (b.to_string(), *n)).collect(),
            retry_attempts: 5,
            retry_pause_secs: 2,
        }
    }
}

impl Config {
    pub fn from_file(path: &Path) -> Result<Self> {
        let file = File::open(path)?;
        let config: Config = serde_json::from_reader(BufReader::new(file))?;
        config.validate()?;
        Ok(config)
    }

    /// Loads `path` when given, defaults otherwise.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(p) => Self::from_file(p),
            None => Ok(Self::default()),
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_phrase_length == 0 {
            return Err(Error::config("maxPhraseLength must be at least 1"));
        }
        if self.books_and_chapter_counts.is_empty() {
            return Err(Error::config("booksAndChapterCounts is empty"));
        }
        if let Some((book, _)) = self.books_and_chapter_counts.iter().find(|(b, _)| b.trim().is_empty()) {
            return Err(Error::config(format!("invalid book name {:?}", book)));
        }
        if self.retry_attempts == 0 {
            return Err(Error::config("retryAttempts must be at least 1"));
        }
        Ok(())
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            attempts: self.retry_attempts,
            pause: Duration::from_secs(self.retry_pause_secs),
        }
    }

    /// Keeps only the named books, in their configured order.
    pub fn restrict_books(&mut self, names: &[String]) {
        if !names.is_empty() {
            self.books_and_chapter_counts.retain(|(b, _)| names.iter().any(|n| n == b));
        }
    }
}
