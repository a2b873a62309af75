//! Keyword-level knowledge retrieval over co-occurrence tables.
//!
//! Indexing turns semi-structured text entities into a set of backend
//! tables: a multitoken dictionary, directional pair tables, per-field
//! context tables, and entity ID/agent side tables. Querying resolves
//! free-text input against those tables with a co-occurrence-ratio
//! association score standing in for learned embeddings.

pub mod commands;
pub mod distill;
pub mod entity;
pub mod format;
pub mod indexer;
pub mod params;
pub mod persist;
pub mod query;
pub mod scorer;
pub mod tables;
pub mod tokenizer;

/// Corpus record identifier.
pub type EntityId = u32;

pub use entity::{Entity, Field};
pub use indexer::{index_corpus, CorpusIndexer};
pub use params::{BackendParams, ExtraWeights, FrontendParams, OutputLimit, Section};
pub use query::process;
pub use scorer::AssociationScorer;
pub use tables::BackendTables;
