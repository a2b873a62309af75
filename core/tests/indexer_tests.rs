use termlink_core::tokenizer::{is_stopword, SEPARATOR};
use termlink_core::{index_corpus, BackendParams, CorpusIndexer};

const GAUSSIAN: &str = "1~~{title::Gaussian distribution||category::Probability||description::central moments of a Gaussian}";

fn two_token_params() -> BackendParams {
    BackendParams {
        max_multitoken: 2,
        ..BackendParams::default()
    }
}

#[test]
fn gaussian_scenario_dictionary() {
    let tables = index_corpus([GAUSSIAN], two_token_params());
    for key in [
        "gaussian",
        "distribution",
        "gaussian~distribution",
        "central",
        "moments",
        "central~moments",
    ] {
        assert!(tables.dictionary.contains_key(key), "missing {key}");
    }
    for key in ["of", "a", "moments~of", "moments~central"] {
        assert!(!tables.dictionary.contains_key(key), "unexpected {key}");
    }
}

#[test]
fn reindexing_is_deterministic() {
    let lines = [
        GAUSSIAN,
        "2~~{title::Poisson process||category::Probability||tag_list::stochastic}",
        "3~~{title::Naming policy||category::Governance standard}",
    ];
    let first = index_corpus(lines, BackendParams::default());
    let second = index_corpus(lines, BackendParams::default());
    assert_eq!(first.dictionary, second.dictionary);
    assert_eq!(first.hash_pairs, second.hash_pairs);
    assert_eq!(first.ctokens, second.ctokens);
}

#[test]
fn dictionary_keys_are_valid_multitokens() {
    let lines = [
        GAUSSIAN,
        "2~~{title::Poisson process||description::arrival times of a Poisson process}",
    ];
    let tables = index_corpus(lines, BackendParams::default());
    for key in tables.dictionary.keys() {
        for token in key.split(SEPARATOR) {
            assert!(token.chars().count() >= 2, "short token in {key}");
            assert!(!is_stopword(token), "stopword in {key}");
        }
    }
}

#[test]
fn malformed_line_is_skipped_and_counted() {
    let mut indexer = CorpusIndexer::new(BackendParams::default());
    indexer.ingest_line("this line has no separator");
    indexer.ingest_line(GAUSSIAN);
    assert_eq!(indexer.lines_skipped(), 1);
    assert_eq!(indexer.entities_indexed(), 1);
    let tables = indexer.finish();
    assert!(tables.dictionary.contains_key("gaussian"));
}

#[test]
fn blank_lines_are_ignored_quietly() {
    let mut indexer = CorpusIndexer::new(BackendParams::default());
    indexer.ingest_line("");
    indexer.ingest_line("   ");
    assert_eq!(indexer.lines_skipped(), 0);
    assert_eq!(indexer.entities_indexed(), 0);
}

#[test]
fn duplicate_bodies_index_once() {
    let body = "{title::Gaussian distribution||category::Probability}";
    let lines = [format!("1~~{body}"), format!("2~~{body}")];
    let tables = index_corpus(&lines, two_token_params());
    assert_eq!(tables.dictionary.get("gaussian~distribution"), Some(&1));
}

#[test]
fn empty_concatenation_skips_entity() {
    let tables = index_corpus(["5~~{junk::nothing recognized}"], BackendParams::default());
    assert!(tables.dictionary.is_empty());
    // Size is still recorded at parse time.
    assert!(tables.id_size.contains_key(&5));
}

#[test]
fn context_tables_follow_field_matches() {
    let tables = index_corpus([GAUSSIAN], two_token_params());
    // "probability" matches the category value case-insensitively.
    let category = tables
        .hash_context1
        .get("probability")
        .expect("probability should carry category context");
    assert!(category.contains_key("Probability"));
    // "gaussian~distribution" matches the title with separators spaced out.
    let titles = tables
        .hash_context3
        .get("gaussian~distribution")
        .expect("multitoken should carry title context");
    assert!(titles.contains_key("Gaussian distribution"));
}

#[test]
fn hash_id_uses_last_matched_field_weight() {
    let tables = index_corpus([GAUSSIAN], two_token_params());
    // "gaussian" matches title (0.2) then description (0.0); description is
    // last in the association order, so its weight wins.
    let ids = tables.hash_id.get("gaussian").expect("gaussian indexed");
    assert_eq!(ids.get(&1), Some(&0.0));
    // "probability" matches only the category (0.3).
    let ids = tables.hash_id.get("probability").expect("probability indexed");
    assert_eq!(ids.get(&1), Some(&0.3));
}

#[test]
fn pair_tables_split_adjacent_and_gapped() {
    let tables = index_corpus([GAUSSIAN], two_token_params());
    // First accepted tokens in order: gaussian, gaussian~distribution, ...
    assert!(tables
        .hash_pairs
        .contains_key(&("gaussian".to_string(), "gaussian~distribution".to_string())));
    // Gap of two lands in ctokens.
    assert!(tables
        .ctokens
        .contains_key(&("gaussian".to_string(), "distribution".to_string())));
    // No stored pair key involves an over-arity multitoken.
    let max_seps = BackendParams::default().max_terms;
    for (a, b) in tables.hash_pairs.keys().chain(tables.ctokens.keys()) {
        assert!(a.matches(SEPARATOR).count() < max_seps);
        assert!(b.matches(SEPARATOR).count() < max_seps);
    }
}

#[test]
fn agents_flow_into_agent_tables() {
    let lines = ["4~~{title::Naming policy overview||category::Governance||description::how names are chosen}"];
    let tables = index_corpus(lines, BackendParams::default());
    let agents = tables.id_to_agents.get(&4).expect("agents recorded");
    for name in ["Governance", "Policy", "Naming", "Overview"] {
        assert!(agents.contains_key(name), "missing agent {name}");
    }
    let by_word = tables.hash_agents.get("naming").expect("word agents recorded");
    assert!(by_word.contains_key("Policy"));
}

#[test]
fn kw_map_points_at_single_token_entries() {
    let tables = index_corpus([GAUSSIAN], two_token_params());
    assert_eq!(tables.kw_map.get("moments"), Some(&"moments".to_string()));
    assert!(!tables.kw_map.contains_key("gaussian~distribution"));
}
