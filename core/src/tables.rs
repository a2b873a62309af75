use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::hash::Hash;

use crate::entity::Field;
use crate::EntityId;

/// Directional multitoken pair, as stored in the pair tables.
pub type Pair = (String, String);

/// Multitoken -> {item -> weighted count} table shape shared by the context,
/// ID, agent, and content tables.
pub type WeightedTable<K> = HashMap<String, HashMap<K, f64>>;

/// The full index produced by one corpus run. Built once by the indexer,
/// read-only afterwards.
#[derive(Default, Serialize, Deserialize)]
pub struct BackendTables {
    /// Multitoken -> occurrence count.
    pub dictionary: HashMap<String, u32>,
    /// Adjacent multitoken pairs (positional gap 1).
    pub hash_pairs: HashMap<Pair, u32>,
    /// Non-adjacent multitoken pairs (positional gap 2..=max_dist).
    pub ctokens: HashMap<Pair, u32>,
    /// One context table per field: multitoken -> {field value -> weight}.
    pub hash_context1: WeightedTable<String>,
    pub hash_context2: WeightedTable<String>,
    pub hash_context3: WeightedTable<String>,
    pub hash_context4: WeightedTable<String>,
    pub hash_context5: WeightedTable<String>,
    /// Multitoken -> {entity ID -> weight of the last matched field}.
    pub hash_id: WeightedTable<EntityId>,
    pub hash_agents: WeightedTable<String>,
    /// Multitoken -> {raw entity line -> weight}.
    pub full_content: WeightedTable<String>,
    pub id_to_content: HashMap<EntityId, String>,
    pub id_to_agents: HashMap<EntityId, HashMap<String, f64>>,
    pub id_size: HashMap<EntityId, usize>,
    /// Single-token fragment -> canonical single-token dictionary entry.
    pub kw_map: HashMap<String, String>,
}

impl BackendTables {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn context_table(&self, field: Field) -> &WeightedTable<String> {
        match field {
            Field::Category => &self.hash_context1,
            Field::TagList => &self.hash_context2,
            Field::Title => &self.hash_context3,
            Field::Description => &self.hash_context4,
            Field::Meta => &self.hash_context5,
        }
    }

    pub fn context_table_mut(&mut self, field: Field) -> &mut WeightedTable<String> {
        match field {
            Field::Category => &mut self.hash_context1,
            Field::TagList => &mut self.hash_context2,
            Field::Title => &mut self.hash_context3,
            Field::Description => &mut self.hash_context4,
            Field::Meta => &mut self.hash_context5,
        }
    }

    /// Symmetric co-occurrence count: both directions over both pair tables.
    /// Storage stays directional; only the lookup is symmetrized.
    pub fn pair_count(&self, a: &str, b: &str) -> u32 {
        let forward = (a.to_string(), b.to_string());
        let reverse = (b.to_string(), a.to_string());
        self.hash_pairs.get(&forward).copied().unwrap_or(0)
            + self.hash_pairs.get(&reverse).copied().unwrap_or(0)
            + self.ctokens.get(&forward).copied().unwrap_or(0)
            + self.ctokens.get(&reverse).copied().unwrap_or(0)
    }

    /// Sum of all dictionary counts.
    pub fn corpus_size(&self) -> u64 {
        self.dictionary.values().map(|&c| u64::from(c)).sum()
    }
}

pub(crate) fn bump<K: Eq + Hash>(map: &mut HashMap<K, u32>, key: K) {
    *map.entry(key).or_insert(0) += 1;
}

pub(crate) fn add_weighted<K1, K2>(
    table: &mut HashMap<K1, HashMap<K2, f64>>,
    key: K1,
    item: K2,
    weight: f64,
) where
    K1: Eq + Hash,
    K2: Eq + Hash,
{
    *table.entry(key).or_default().entry(item).or_insert(0.0) += weight;
}
