use std::collections::{HashMap, HashSet};

use crate::entity::{Entity, Field};
use crate::params::BackendParams;
use crate::tables::{add_weighted, bump, BackendTables};
use crate::tokenizer::{extract_multitokens, spaced, tokenize, SEPARATOR};

/// Streaming corpus indexer. Feed it raw entity lines, then call
/// [`CorpusIndexer::finish`] to obtain the completed tables. A single bad
/// record is logged and skipped; indexing never aborts on one.
pub struct CorpusIndexer {
    params: BackendParams,
    tables: BackendTables,
    seen_bodies: HashSet<String>,
    entities_indexed: usize,
    lines_skipped: usize,
}

impl CorpusIndexer {
    pub fn new(params: BackendParams) -> Self {
        Self {
            params,
            tables: BackendTables::new(),
            seen_bodies: HashSet::new(),
            entities_indexed: 0,
            lines_skipped: 0,
        }
    }

    pub fn entities_indexed(&self) -> usize {
        self.entities_indexed
    }

    pub fn lines_skipped(&self) -> usize {
        self.lines_skipped
    }

    /// Parse and index one raw record. Blank lines are ignored quietly;
    /// malformed ones are logged and counted. Duplicate entity bodies within
    /// one run are indexed only once.
    pub fn ingest_line(&mut self, line: &str) {
        if line.trim().is_empty() {
            return;
        }
        match Entity::parse(line) {
            Ok(entity) => {
                if !self.seen_bodies.insert(entity.body.clone()) {
                    return;
                }
                self.ingest_entity(&entity);
            }
            Err(err) => {
                tracing::error!(error = %err, "skipping malformed entity record");
                self.lines_skipped += 1;
            }
        }
    }

    /// Index one parsed entity: extract multitokens from the field
    /// concatenation, fold them into the dictionary and association tables,
    /// then accumulate pair co-occurrences over this entity's tokens.
    pub fn ingest_entity(&mut self, entity: &Entity) {
        self.tables.id_size.insert(entity.id, entity.body.len());

        let data = entity.concatenated_text();
        if data.is_empty() {
            return;
        }

        let words = tokenize(&data);
        let accepted = extract_multitokens(&words, self.params.max_multitoken);

        let mut entity_tokens: Vec<String> = Vec::new();
        let mut entity_seen: HashSet<String> = HashSet::new();
        for word in &accepted {
            self.update_field_associations(word, entity);
            bump(&mut self.tables.dictionary, word.clone());
            if entity_seen.insert(word.clone()) {
                entity_tokens.push(word.clone());
            }
        }

        self.accumulate_pairs(&entity_tokens);
        self.entities_indexed += 1;
    }

    /// Match one multitoken against every non-empty field by two-way
    /// substring containment (separators spaced out, case-insensitive).
    /// Each match updates that field's context table; the ID/agent/content
    /// update uses the weight of the last field matched in the fixed
    /// association order.
    fn update_field_associations(&mut self, word: &str, entity: &Entity) {
        let spaced_word = spaced(word);
        let mut last_weight = None;

        for field in Field::ASSOCIATION_ORDER {
            let value = entity.field(field);
            if value.is_empty() {
                continue;
            }
            let value_lower = value.to_lowercase();
            if value_lower.contains(&spaced_word) || spaced_word.contains(&value_lower) {
                let weight = self.params.extra_weights.weight(field);
                add_weighted(
                    self.tables.context_table_mut(field),
                    word.to_string(),
                    value.to_string(),
                    weight,
                );
                last_weight = Some(weight);
            }
        }

        let weight = match last_weight {
            Some(weight) => weight,
            None => return,
        };

        add_weighted(&mut self.tables.hash_id, word.to_string(), entity.id, weight);

        for agent in &entity.agents {
            add_weighted(
                &mut self.tables.hash_agents,
                word.to_string(),
                agent.clone(),
                weight,
            );
            add_weighted(
                &mut self.tables.id_to_agents,
                entity.id,
                agent.clone(),
                weight,
            );
        }

        add_weighted(
            &mut self.tables.full_content,
            word.to_string(),
            entity.raw.clone(),
            weight,
        );
        self.tables
            .id_to_content
            .insert(entity.id, entity.raw.clone());
    }

    /// Pair accumulation over this entity's accepted multitokens, in
    /// first-acceptance order, restricted to keys under the arity cap.
    /// Gap 1 feeds `hash_pairs`; gaps 2..=max_dist feed `ctokens`. Pairs are
    /// stored directionally and symmetrized at read time.
    fn accumulate_pairs(&mut self, entity_tokens: &[String]) {
        let max_terms = self.params.max_terms;
        let max_dist = self.params.max_dist;

        let tokens: Vec<&String> = entity_tokens
            .iter()
            .filter(|word| word.matches(SEPARATOR).count() < max_terms)
            .collect();

        for i in 0..tokens.len() {
            let upper = (i + 1 + max_dist).min(tokens.len());
            for j in (i + 1)..upper {
                let key = (tokens[i].clone(), tokens[j].clone());
                if j == i + 1 {
                    bump(&mut self.tables.hash_pairs, key);
                } else {
                    bump(&mut self.tables.ctokens, key);
                }
            }
        }
    }

    /// Seal the tables: build the keyword map from the final dictionary and
    /// log a structured summary.
    pub fn finish(mut self) -> BackendTables {
        self.tables.kw_map = build_kw_map(&self.tables.dictionary);
        tracing::info!(
            entities = self.entities_indexed,
            skipped = self.lines_skipped,
            dictionary = self.tables.dictionary.len(),
            pairs = self.tables.hash_pairs.len(),
            "indexing complete"
        );
        self.tables
    }
}

/// Index a whole corpus in one call.
pub fn index_corpus<I, S>(lines: I, params: BackendParams) -> BackendTables
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut indexer = CorpusIndexer::new(params);
    for line in lines {
        indexer.ingest_line(line.as_ref());
    }
    indexer.finish()
}

/// Map every single-token dictionary entry longer than two characters to
/// itself, as a lookup assist for coarse singularization of query tokens.
fn build_kw_map(dictionary: &HashMap<String, u32>) -> HashMap<String, String> {
    let mut kw_map = HashMap::new();
    for key in dictionary.keys() {
        if !key.contains(SEPARATOR) && key.chars().count() > 2 && !kw_map.contains_key(key) {
            kw_map.insert(key.clone(), key.clone());
        }
    }
    kw_map
}
