use std::collections::{BTreeMap, BTreeSet};

use crate::params::{FrontendParams, Section};
use crate::query::QueryDictionary;
use crate::tables::{BackendTables, WeightedTable};
use crate::tokenizer::SEPARATOR;
use crate::EntityId;

/// Render the distilled query dictionary against the requested display
/// sections. Per section, each surviving query multitoken's table entries
/// are folded into a nested count map keyed by the associated item; small
/// groups are filtered, neighbor lists capped, and the whole output
/// truncated to the configured line limit.
pub fn generate_results(
    q_dictionary: &QueryDictionary,
    tables: &BackendTables,
    params: &FrontendParams,
) -> String {
    let mut lines: Vec<String> = Vec::new();

    for &section in &params.show {
        lines.push(format!(">>> RESULTS - SECTION: {}", section.label()));
        lines.push(String::new());
        if q_dictionary.is_empty() {
            lines.push("(no matching words in query)".to_string());
            lines.push(String::new());
            continue;
        }
        match section {
            Section::Dict => render_dict(&mut lines, q_dictionary, params),
            Section::Id => render_id(&mut lines, q_dictionary, tables, params),
            _ => render_grouped(&mut lines, section, q_dictionary, tables, params),
        }
    }

    lines.push(
        "Above results based on words found in prompt, matched back to backend tables."
            .to_string(),
    );
    lines.push("Numbers in parentheses are occurrences of word in corpus.".to_string());

    if params.show.contains(&Section::Id) && params.show.contains(&Section::Agents) {
        render_cross_table(&mut lines, q_dictionary, tables);
    }

    truncate(lines, params)
}

fn arity(word: &str) -> usize {
    word.split(SEPARATOR).count()
}

fn render_dict(lines: &mut Vec<String>, q_dictionary: &QueryDictionary, params: &FrontendParams) {
    for (word, count) in q_dictionary {
        if arity(word) < params.context_multitoken_min_size {
            continue;
        }
        lines.push(format!("   dict: {word} ({count})"));
    }
    lines.push(String::new());
}

/// Items associated with one query multitoken in the given section's table.
fn section_items(section: Section, word: &str, tables: &BackendTables) -> Vec<String> {
    let keys_of = |table: &WeightedTable<String>| {
        table
            .get(word)
            .map(|inner| inner.keys().cloned().collect())
            .unwrap_or_default()
    };
    match section {
        Section::Category => keys_of(&tables.hash_context1),
        Section::Tags => keys_of(&tables.hash_context2),
        Section::Titles => keys_of(&tables.hash_context3),
        Section::Descriptions => keys_of(&tables.hash_context4),
        Section::Meta => keys_of(&tables.hash_context5),
        Section::Whole => keys_of(&tables.full_content),
        Section::Agents => keys_of(&tables.hash_agents),
        Section::Pairs => {
            // Pair tables are keyed by directional tuples; a multitoken's
            // associated items are its partners in either direction.
            let mut partners: BTreeSet<String> = BTreeSet::new();
            for (a, b) in tables.hash_pairs.keys() {
                if a == word {
                    partners.insert(b.clone());
                } else if b == word {
                    partners.insert(a.clone());
                }
            }
            partners.into_iter().collect()
        }
        Section::Dict | Section::Id => Vec::new(),
    }
}

fn render_grouped(
    lines: &mut Vec<String>,
    section: Section,
    q_dictionary: &QueryDictionary,
    tables: &BackendTables,
    params: &FrontendParams,
) {
    let mut local: BTreeMap<String, BTreeMap<String, u32>> = BTreeMap::new();
    for (word, &count) in q_dictionary {
        if arity(word) < params.context_multitoken_min_size {
            continue;
        }
        for item in section_items(section, word, tables) {
            *local
                .entry(item)
                .or_default()
                .entry(word.clone())
                .or_insert(0) += count;
        }
    }

    for (item, linked) in &local {
        if linked.len() < params.min_output_list_size {
            continue;
        }
        lines.push(format!(
            "   {}: {} [{} entries]",
            section.label(),
            item,
            linked.len()
        ));
        for (word, count) in linked.iter().take(params.max_neighbors) {
            lines.push(format!("   Linked to: {word} ({count})"));
        }
        lines.push(String::new());
    }
}

fn render_id(
    lines: &mut Vec<String>,
    q_dictionary: &QueryDictionary,
    tables: &BackendTables,
    params: &FrontendParams,
) {
    let mut local: BTreeMap<EntityId, BTreeMap<String, u32>> = BTreeMap::new();
    for (word, &count) in q_dictionary {
        if arity(word) < params.context_multitoken_min_size {
            continue;
        }
        if let Some(ids) = tables.hash_id.get(word) {
            for &id in ids.keys() {
                *local
                    .entry(id)
                    .or_default()
                    .entry(word.clone())
                    .or_insert(0) += count;
            }
        }
    }

    for (id, linked) in &local {
        if linked.len() < params.min_output_list_size {
            continue;
        }
        lines.push(format!("   ID: {id} [{} entries]", linked.len()));
        for (word, count) in linked.iter().take(params.max_neighbors) {
            lines.push(format!("   Linked to: {word} ({count})"));
        }
        if let Some(agents) = tables.id_to_agents.get(id) {
            let names: BTreeSet<&str> = agents.keys().map(String::as_str).collect();
            let joined = names.into_iter().collect::<Vec<_>>().join(", ");
            lines.push(format!("   Agents: ({joined})"));
        }
        lines.push(String::new());
    }
}

/// (agent, multitoken) -> entity ID list cross table, emitted when both the
/// ID and agent sections are requested, followed by the sizes of the listed
/// entities.
fn render_cross_table(
    lines: &mut Vec<String>,
    q_dictionary: &QueryDictionary,
    tables: &BackendTables,
) {
    let mut cross: BTreeMap<(String, String), BTreeSet<EntityId>> = BTreeMap::new();
    for word in q_dictionary.keys() {
        if let Some(ids) = tables.hash_id.get(word) {
            for &id in ids.keys() {
                if let Some(agents) = tables.id_to_agents.get(&id) {
                    for agent in agents.keys() {
                        cross
                            .entry((agent.clone(), word.clone()))
                            .or_default()
                            .insert(id);
                    }
                }
            }
        }
    }

    lines.push("-".repeat(68));
    lines.push(">>> RESULTS - SECTION: (agent, multitoken) --> (ID list)".to_string());
    lines.push(String::new());

    let mut sizes: BTreeMap<EntityId, usize> = BTreeMap::new();
    for ((agent, word), ids) in &cross {
        let id_list = ids
            .iter()
            .map(|id| id.to_string())
            .collect::<Vec<_>>()
            .join(", ");
        lines.push(format!("({agent}, {word}) --> ({id_list})"));
        for id in ids {
            if let Some(&size) = tables.id_size.get(id) {
                sizes.insert(*id, size);
            }
        }
    }

    lines.push(String::new());
    lines.push("  ID  Size".to_string());
    for (id, size) in &sizes {
        lines.push(format!("{id:4} {size:5}"));
    }
}

fn truncate(lines: Vec<String>, params: &FrontendParams) -> String {
    match params.output_limit.line_cap() {
        Some(cap) if lines.len() > cap => {
            let mut kept: Vec<String> = lines.into_iter().take(cap).collect();
            kept.push(format!("... (output truncated to {cap} lines) ..."));
            kept.join("\n")
        }
        _ => lines.join("\n"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::OutputLimit;

    #[test]
    fn truncation_appends_single_notice() {
        let mut params = FrontendParams::default();
        params.output_limit = OutputLimit::Lines(3);
        let lines: Vec<String> = (0..10).map(|i| format!("line {i}")).collect();
        let out = truncate(lines, &params);
        let rendered: Vec<&str> = out.lines().collect();
        assert_eq!(rendered.len(), 4);
        assert!(rendered[3].contains("truncated to 3 lines"));
    }

    #[test]
    fn no_truncation_without_cap() {
        let mut params = FrontendParams::default();
        params.output_limit = OutputLimit::NoLimit;
        let lines: Vec<String> = (0..10).map(|i| format!("line {i}")).collect();
        assert_eq!(truncate(lines, &params).lines().count(), 10);
    }
}
