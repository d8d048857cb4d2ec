// File: src/persistence.rs
use crate::core::index::GematriaIndex;
use crate::core::types::{GematriaValue, IndexEntry, RaceFrame, VerseRecord};
use crate::error::Result;
use crate::seeds::SeedList;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;
use tempfile::NamedTempFile;

/// Writes `value` as JSON next to `path` and renames it into place, so a
/// reader never sees a half-written file.
pub fn save_json<T: Serialize + ?Sized>(value: &T, path: &Path) -> Result<()> {
    let parent_dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent_dir)?;

    let temp_file = NamedTempFile::new_in(parent_dir)?;
    {
        let mut writer = BufWriter::new(&temp_file);
        serde_json::to_writer(&mut writer, value)?;
        writer.flush()?;
    }

    temp_file.persist(path).map_err(|e| e.error)?;
    Ok(())
}

pub fn load_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let file = File::open(path)?;
    Ok(serde_json::from_reader(BufReader::new(file))?)
}

pub fn save_index(index: &GematriaIndex, path: &Path) -> Result<()> {
    save_json(index, path)
}

/// Loads an index JSON file and rebuilds its dedup state.
pub fn load_index(path: &Path) -> Result<GematriaIndex> {
    let buckets: BTreeMap<GematriaValue, Vec<IndexEntry>> = load_json(path)?;
    Ok(GematriaIndex::from_buckets(buckets))
}

pub fn save_race(timeline: &[RaceFrame], path: &Path) -> Result<()> {
    save_json(timeline, path)
}

pub fn save_seeds(seeds: &SeedList, path: &Path) -> Result<()> {
    save_json(seeds, path)
}

pub fn load_seeds(path: &Path) -> Result<SeedList> {
    load_json(path)
}

pub fn save_records(records: &[VerseRecord], path: &Path) -> Result<()> {
    save_json(records, path)
}

pub fn load_records(path: &Path) -> Result<Vec<VerseRecord>> {
    load_json(path)
}

/// Bincode cannot skip fields, so entries go through a plain mirror.
#[derive(Serialize, Deserialize)]
struct SnapshotEntry {
    phrase: String,
    reference: String,
    context_en: String,
    is_verse: bool,
    original_he: Option<String>,
}

#[derive(Serialize, Deserialize)]
struct SerializableIndex {
    buckets: Vec<(GematriaValue, Vec<SnapshotEntry>)>,
}

/// Compact binary copy of a built index, for fast reloads.
pub fn save_snapshot(index: &GematriaIndex, path: &Path) -> Result<()> {
    let parent_dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent_dir)?;

    let state = SerializableIndex {
        buckets: index
            .buckets()
            .iter()
            .map(|(val, entries)| {
                let entries = entries
                    .iter()
                    .map(|e| SnapshotEntry {
                        phrase: e.phrase.clone(),
                        reference: e.reference.clone(),
                        context_en: e.context_en.clone(),
                        is_verse: e.is_verse,
                        original_he: e.original_he.clone(),
                    })
                    .collect();
                (*val, entries)
            })
            .collect(),
    };

    let temp_file = NamedTempFile::new_in(parent_dir)?;
    {
        let mut writer = BufWriter::new(&temp_file);
        bincode::serialize_into(&mut writer, &state)?;
        writer.flush()?;
    }
    temp_file.persist(path).map_err(|e| e.error)?;
    Ok(())
}

pub fn load_snapshot(path: &Path) -> Result<GematriaIndex> {
    let file = File::open(path)?;
    let state: SerializableIndex = bincode::deserialize_from(BufReader::new(file))?;

    let buckets = state
        .buckets
        .into_iter()
        .map(|(val, entries)| {
            let entries = entries
                .into_iter()
                .map(|e| IndexEntry {
                    phrase: e.phrase,
                    reference: e.reference,
                    context_en: e.context_en,
                    is_verse: e.is_verse,
                    original_he: e.original_he,
                })
                .collect();
            (val, entries)
        })
        .collect();
    Ok(GematriaIndex::from_buckets(buckets))
}
