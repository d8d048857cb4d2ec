// src/core/mod.rs

pub mod engine;
pub mod gematria;
pub mod index;
pub mod normalizer;
pub mod tracker;
pub mod trend;
pub mod types;
