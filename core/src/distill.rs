use std::collections::BTreeSet;

use crate::params::FrontendParams;
use crate::query::{QueryDictionary, QueryEmbeddings};
use crate::tokenizer::SEPARATOR;

/// Prune the query-local structures before result generation. Two passes:
/// first drop query-dictionary entries that are over-frequent in the corpus
/// or redundant against another entry (substring with equal corpus count, or
/// a constituent token of a longer entry); then drop every embedding whose
/// query-side key was removed. Backend tables are never touched. Applying
/// this twice yields the same result as applying it once.
pub fn distill(
    q_dictionary: &mut QueryDictionary,
    q_embeddings: &mut QueryEmbeddings,
    params: &FrontendParams,
) {
    let mut doomed: BTreeSet<String> = BTreeSet::new();

    for (key, &count) in q_dictionary.iter() {
        if count as usize > params.max_token_count {
            doomed.insert(key.clone());
        }
    }

    for (key_a, &count_a) in q_dictionary.iter() {
        for (key_b, &count_b) in q_dictionary.iter() {
            if key_a == key_b {
                continue;
            }
            let redundant = (key_b.contains(key_a.as_str()) && count_a == count_b)
                || key_b.split(SEPARATOR).any(|token| token == key_a);
            if redundant {
                doomed.insert(key_a.clone());
                break;
            }
        }
    }

    for key in &doomed {
        q_dictionary.remove(key);
    }
    q_embeddings.retain(|(word, _), _| q_dictionary.contains_key(word));
}
