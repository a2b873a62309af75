use anyhow::{bail, Result};
use std::collections::BTreeMap;

use crate::commands;
use crate::distill::distill;
use crate::format::generate_results;
use crate::params::FrontendParams;
use crate::scorer::AssociationScorer;
use crate::tables::BackendTables;
use crate::tokenizer::{tokenize, SEPARATOR};

/// Query multitoken -> corpus count, for every query substring found in the
/// corpus dictionary. Ordered so result generation is deterministic.
pub type QueryDictionary = BTreeMap<String, u32>;

/// (query multitoken, corpus multitoken) -> association score, positive
/// entries only.
pub type QueryEmbeddings = BTreeMap<(String, String), f64>;

/// Process one query against the backend tables. Command queries mutate the
/// frontend parameters and short-circuit result generation; search queries
/// build the query-local structures and render the requested sections. The
/// possibly-updated parameters are handed back to the caller; a failure
/// inside processing becomes an error message, never a crash.
pub fn process(
    query: &str,
    tables: &BackendTables,
    mut params: FrontendParams,
) -> (String, FrontendParams) {
    let trimmed = query.trim();
    if commands::is_command(trimmed) {
        let message = commands::apply_command(trimmed, &mut params);
        return (message, params);
    }

    let text = match run_query(trimmed, tables, &params) {
        Ok(text) => text,
        Err(err) => {
            tracing::error!(query = trimmed, error = %err, "query processing failed");
            format!("Error processing query: {err}")
        }
    };
    (text, params)
}

fn run_query(query: &str, tables: &BackendTables, params: &FrontendParams) -> Result<String> {
    validate_params(params)?;
    let query = query.to_lowercase();
    let mut q_dictionary = build_query_dictionary(&query, tables, params);
    let mut q_embeddings = build_query_embeddings(&q_dictionary, tables, params);
    if params.fine_tune_mode {
        distill(&mut q_dictionary, &mut q_embeddings, params);
    }
    Ok(generate_results(&q_dictionary, tables, params))
}

/// Frontend parameters arrive as a plain struct the caller may have built by
/// hand; reject inconsistent settings before they distort resolution or
/// scoring.
fn validate_params(params: &FrontendParams) -> Result<()> {
    if params.max_token_count == 0 {
        bail!("max token count must be at least 1");
    }
    if params.min_rel_score > params.max_rel_score {
        bail!(
            "relevancy score band is inverted ({} > {})",
            params.min_rel_score,
            params.max_rel_score
        );
    }
    Ok(())
}

/// Resolve every single-token and contiguous multi-token substring of the
/// query against the corpus dictionary. Unmatched single tokens get one
/// trailing-`s` retry through the keyword map.
pub fn build_query_dictionary(
    query: &str,
    tables: &BackendTables,
    params: &FrontendParams,
) -> QueryDictionary {
    let tokens: Vec<String> = tokenize(query)
        .into_iter()
        .filter(|t| t.chars().count() >= params.min_token_len)
        .collect();

    let mut q_dictionary = QueryDictionary::new();
    for token in &tokens {
        if let Some(&count) = tables.dictionary.get(token) {
            q_dictionary.insert(token.clone(), count);
        } else if let Some(canonical) = singular_lookup(token, tables) {
            if let Some(&count) = tables.dictionary.get(&canonical) {
                q_dictionary.insert(canonical, count);
            }
        }
    }

    let n = tokens.len();
    for i in 0..n.saturating_sub(1) {
        let max_len = params.max_token_count.min(n - i);
        for j in 2..=max_len {
            let key = tokens[i..i + j].join(SEPARATOR);
            if let Some(&count) = tables.dictionary.get(&key) {
                q_dictionary.insert(key, count);
            }
        }
    }

    q_dictionary
}

/// Trailing-`s` singular form of a token, if the keyword map knows the
/// stripped form as a canonical dictionary entry.
fn singular_lookup(token: &str, tables: &BackendTables) -> Option<String> {
    let stripped = token.strip_suffix('s')?;
    tables.kw_map.get(stripped).cloned()
}

/// Score every (query word, corpus multitoken) pair and keep the positive
/// ones. In relevancy mode, scores outside the configured band are dropped.
/// This scan is the dominant query-time cost.
pub fn build_query_embeddings(
    q_dictionary: &QueryDictionary,
    tables: &BackendTables,
    params: &FrontendParams,
) -> QueryEmbeddings {
    let scorer = AssociationScorer::new(tables);
    let mut q_embeddings = QueryEmbeddings::new();
    for word in q_dictionary.keys() {
        for token in tables.dictionary.keys() {
            let score = scorer.score(word, token);
            if score <= 0.0 {
                continue;
            }
            if params.relevancy_mode
                && !(params.min_rel_score..=params.max_rel_score).contains(&score)
            {
                continue;
            }
            q_embeddings.insert((word.clone(), token.clone()), score);
        }
    }
    q_embeddings
}
