// src/lib.rs

pub mod config;
pub mod core;
pub mod corpus;
pub mod error;
pub mod logging;
pub mod parsha;
pub mod persistence;
pub mod seeds;

pub use crate::core::engine::CorpusEngine;
pub use crate::core::gematria::value;
pub use crate::core::index::{GematriaIndex, PhraseIndexer};
pub use crate::core::normalizer::normalize;
pub use crate::core::tracker::{build_race, WordTracker};
pub use crate::error::{Error, Result};
