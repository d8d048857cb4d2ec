use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use crossterm::style::Stylize;
use gematria_core::config::Config;
use gematria_core::core::gematria::{difference, query_value};
use gematria_core::core::index::{HitKind, SearchOptions};
use gematria_core::core::trend::{trend, trend_prefixes};
use gematria_core::corpus::DirectoryCorpus;
use gematria_core::parsha;
use gematria_core::seeds::SeedList;
use gematria_core::{logging, persistence, CorpusEngine};
use log::{info, warn};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(
    name = "gematria",
    about = "Build gematria indexes and word races from Hebrew corpora",
    version
)]
struct Cli {
    /// JSON config file (maxPhraseLength, minWordLength, booksAndChapterCounts, ...)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Only scan these books (repeatable)
    #[arg(long = "book", global = true)]
    books: Vec<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the gematria value of each argument
    Value {
        #[arg(required = true)]
        texts: Vec<String>,
    },
    /// Build the value -> verses/phrases index
    Index {
        #[arg(long)]
        corpus: PathBuf,
        #[arg(long)]
        out: PathBuf,
        /// Also write a binary snapshot
        #[arg(long)]
        snapshot: Option<PathBuf>,
        #[arg(long)]
        max_phrase_length: Option<usize>,
    },
    /// Build the chapter-by-chapter word race timeline
    Race {
        #[arg(long)]
        corpus: PathBuf,
        /// Seed concept list; the curated list is used when omitted
        #[arg(long)]
        seeds: Option<PathBuf>,
        #[arg(long)]
        out: PathBuf,
        #[arg(long)]
        min_word_length: Option<usize>,
    },
    /// Write the curated seed concept list
    Seeds {
        #[arg(long)]
        out: PathBuf,
    },
    /// Write the flat normalized verse list
    Text {
        #[arg(long)]
        corpus: PathBuf,
        #[arg(long)]
        out: PathBuf,
    },
    /// Look up a value (or Hebrew text) in a built index
    Search {
        #[arg(long)]
        index: PathBuf,
        query: String,
        /// Search the distance between QUERY and this instead.
        /// Colel and the portion filter do not apply to a distance.
        #[arg(long)]
        against: Option<String>,
        /// Include value - 1 and value + 1
        #[arg(long)]
        colel: bool,
        #[arg(long)]
        single_word: bool,
        /// Restrict to a weekly portion ("Noach") or a range such as "Genesis 1:1-6:8"
        #[arg(long)]
        parsha: Option<String>,
        #[arg(long, default_value_t = 10)]
        limit: usize,
    },
    /// Cumulative occurrences of one word across a flat verse list
    Trend {
        #[arg(long)]
        text: PathBuf,
        word: String,
        #[arg(long)]
        exact_only: bool,
        #[arg(long, default_value_t = 50)]
        sample_rate: usize,
    },
}

fn main() -> Result<()> {
    logging::init();
    let cli = Cli::parse();

    let mut config = Config::load(cli.config.as_deref()).context("loading config")?;
    config.restrict_books(&cli.books);

    match cli.command {
        Command::Value { texts } => {
            for text in texts {
                println!("{} = {}", text, query_value(&text).to_string().bold());
            }
        }
        Command::Index { corpus, out, snapshot, max_phrase_length } => {
            if let Some(n) = max_phrase_length {
                config.max_phrase_length = n;
            }
            config.validate()?;
            let provider = DirectoryCorpus::new(corpus);
            let outcome = CorpusEngine::new(&provider, &config).build_index();
            report_missing(&outcome.missing);

            persistence::save_index(&outcome.output, &out)
                .with_context(|| format!("writing {}", out.display()))?;
            if let Some(path) = snapshot {
                persistence::save_snapshot(&outcome.output, &path)
                    .with_context(|| format!("writing {}", path.display()))?;
            }
            info!("Saved {}", out.display());
        }
        Command::Race { corpus, seeds, out, min_word_length } => {
            if let Some(n) = min_word_length {
                config.min_word_length = n;
            }
            config.validate()?;
            let seed_list = load_seed_list(seeds.as_deref())?;
            let tracked = seed_list.tracked_words(config.min_word_length);

            let provider = DirectoryCorpus::new(corpus);
            let outcome = CorpusEngine::new(&provider, &config).build_race(tracked);
            report_missing(&outcome.missing);

            persistence::save_race(&outcome.output, &out)
                .with_context(|| format!("writing {}", out.display()))?;
            info!("[SUCCESS] Race data saved to {}", out.display());
        }
        Command::Seeds { out } => {
            let seeds = SeedList::curated();
            persistence::save_seeds(&seeds, &out).with_context(|| format!("writing {}", out.display()))?;
            info!("Saved {} concepts to {}", seeds.len(), out.display());
        }
        Command::Text { corpus, out } => {
            config.validate()?;
            let provider = DirectoryCorpus::new(corpus);
            let outcome = CorpusEngine::new(&provider, &config).build_records();
            report_missing(&outcome.missing);
            persistence::save_records(&outcome.output, &out)
                .with_context(|| format!("writing {}", out.display()))?;
            info!("Saved {} verses to {}", outcome.output.len(), out.display());
        }
        Command::Search { index, query, against, colel, single_word, parsha: portion, limit } => {
            let idx = persistence::load_index(&index).with_context(|| format!("reading {}", index.display()))?;
            let target = match &against {
                Some(other) => difference(&query, other),
                None => query_value(&query),
            };
            if target == 0 {
                bail!("{:?} has no gematria value", query);
            }
            let matcher = against.is_some();
            if matcher && (colel || portion.is_some()) {
                warn!("--colel and --parsha are ignored with --against");
            }
            let options = SearchOptions {
                colel,
                single_word,
                parsha: portion.as_deref().map(parsha::resolve).transpose()?,
                matcher,
            };

            let hits = idx.search(target, &options);
            println!("{} {} ({} hits)", "Value".bold(), target.to_string().cyan(), hits.len());
            for hit in hits.iter().take(limit) {
                let marker = if hit.is_exact { String::new() } else { format!(" [{}]", hit.actual_value) };
                if hit.kind == HitKind::Stat {
                    println!("  {}{}  {}: {}", parsha::STATS_REF.yellow(), marker, hit.entry.phrase, hit.entry.context_en);
                    continue;
                }
                let shown = match (&hit.entry.original_he, hit.entry.is_verse) {
                    (Some(he), true) => he.as_str(),
                    _ => hit.entry.phrase.as_str(),
                };
                println!("  {}{}  {}", hit.entry.reference.as_str().green(), marker, shown);
            }
            for concept in SeedList::curated().get(query_value(&query)) {
                println!("  {} {}", "did you know:".dim(), concept);
            }
        }
        Command::Trend { text, word, exact_only, sample_rate } => {
            let records = persistence::load_records(&text).with_context(|| format!("reading {}", text.display()))?;
            let word = gematria_core::normalize(&word).replace(' ', "");
            let t = trend(&records, &word, !exact_only, sample_rate, &trend_prefixes());
            for (book, count) in t.per_book() {
                println!("  {:<12} {}", book, count);
            }
            println!("{} {}", "Total".bold(), t.total());
            println!("{}", serde_json::to_string(&t.points)?);
        }
    }

    Ok(())
}

fn load_seed_list(path: Option<&Path>) -> Result<SeedList> {
    match path {
        Some(p) => persistence::load_seeds(p).with_context(|| format!("reading {}", p.display())),
        None => Ok(SeedList::curated()),
    }
}

fn report_missing(missing: &[String]) {
    if missing.is_empty() {
        return;
    }
    warn!("The following chapters failed to load:");
    for unit in missing {
        warn!("   - {}", unit);
    }
}
