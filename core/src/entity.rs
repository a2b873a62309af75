use anyhow::{bail, Context, Result};
use lazy_static::lazy_static;
use regex::Regex;

use crate::EntityId;

lazy_static! {
    static ref ENTITY_RE: Regex = Regex::new(r"^\s*(\d+)~~(.*)$").expect("valid regex");

    /// Term -> agent lookup applied to category and title values.
    static ref AGENT_MAP: Vec<(&'static str, &'static str)> = vec![
        ("template", "Template"),
        ("policy", "Policy"),
        ("governance", "Governance"),
        ("documentation", "Documentation"),
        ("best practice", "Best Practices"),
        ("bestpractice", "Best Practices"),
        ("standard", "Standards"),
        ("naming", "Naming"),
        ("glossary", "Glossary"),
        ("historical data", "Data"),
        ("overview", "Overview"),
        ("training", "Training"),
    ];
}

/// Structured fields of a corpus record, in the fixed orders the indexer
/// depends on. `ASSOCIATION_ORDER` is the policy order for field matching
/// (last match wins for the ID/agent weight); `CONCAT_ORDER` is the order
/// fields are concatenated for token extraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Category,
    TagList,
    Title,
    Description,
    Meta,
}

impl Field {
    pub const ASSOCIATION_ORDER: [Field; 5] = [
        Field::Category,
        Field::TagList,
        Field::Title,
        Field::Description,
        Field::Meta,
    ];

    pub const CONCAT_ORDER: [Field; 5] = [
        Field::Title,
        Field::Category,
        Field::Description,
        Field::TagList,
        Field::Meta,
    ];
}

/// One parsed corpus record. Immutable once parsed; discarded after indexing.
#[derive(Debug, Clone, Default)]
pub struct Entity {
    pub id: EntityId,
    pub title: String,
    pub category: String,
    pub tag_list: String,
    pub description: String,
    pub meta: String,
    /// The whole raw line, kept for full-content lookup.
    pub raw: String,
    /// Raw body text after the ID separator, used for deduplication.
    pub body: String,
    pub agents: Vec<String>,
}

impl Entity {
    /// Parse one `"<ID>~~{key::value||key::value...}"` record. Unrecognized
    /// keys are ignored. Fails on a missing `~~` separator or an ID that does
    /// not fit an integer.
    pub fn parse(line: &str) -> Result<Entity> {
        let caps = match ENTITY_RE.captures(line) {
            Some(caps) => caps,
            None => bail!("malformed entity record (expected \"<ID>~~{{...}}\"): {line:?}"),
        };
        let id: EntityId = caps[1]
            .parse()
            .with_context(|| format!("entity ID out of range: {}", &caps[1]))?;
        let body = caps[2].to_string();

        let mut entity = Entity {
            id,
            raw: line.to_string(),
            body: body.clone(),
            ..Entity::default()
        };

        let inner = body
            .trim()
            .trim_start_matches('{')
            .trim_end_matches('}');
        for pair in inner.split("||") {
            if let Some((key, value)) = pair.split_once("::") {
                match key {
                    "title" => entity.title = value.to_string(),
                    "category" => entity.category = value.to_string(),
                    "tag_list" => entity.tag_list = value.to_string(),
                    "description" => entity.description = value.to_string(),
                    "meta" => entity.meta = value.to_string(),
                    _ => {}
                }
            }
        }

        let agents = derive_agents(&entity);
        entity.agents = agents;
        Ok(entity)
    }

    pub fn field(&self, field: Field) -> &str {
        match field {
            Field::Category => &self.category,
            Field::TagList => &self.tag_list,
            Field::Title => &self.title,
            Field::Description => &self.description,
            Field::Meta => &self.meta,
        }
    }

    /// Concatenation of all fields in `CONCAT_ORDER`, space separated,
    /// skipping empty values. Empty result means the entity is skipped.
    pub fn concatenated_text(&self) -> String {
        let mut data = String::new();
        for field in Field::CONCAT_ORDER {
            let value = self.field(field);
            if !value.is_empty() {
                data.push_str(value);
                data.push(' ');
            }
        }
        data
    }
}

/// Scan category and title for agent-map terms, deduplicated per entity.
fn derive_agents(entity: &Entity) -> Vec<String> {
    let mut agents = Vec::new();
    for value in [&entity.category, &entity.title] {
        let value = value.to_lowercase();
        for (term, agent) in AGENT_MAP.iter() {
            if value.contains(term) && !agents.iter().any(|a| a == agent) {
                agents.push(agent.to_string());
            }
        }
    }
    agents
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_fields() {
        let e = Entity::parse(
            "7~~{title::Gaussian distribution||category::Probability||description::central moments}",
        )
        .unwrap();
        assert_eq!(e.id, 7);
        assert_eq!(e.title, "Gaussian distribution");
        assert_eq!(e.category, "Probability");
        assert_eq!(e.description, "central moments");
        assert_eq!(e.tag_list, "");
    }

    #[test]
    fn ignores_unknown_keys() {
        let e = Entity::parse("1~~{title::T||junk::discard}").unwrap();
        assert_eq!(e.title, "T");
    }

    #[test]
    fn rejects_missing_separator() {
        assert!(Entity::parse("not an entity").is_err());
    }

    #[test]
    fn rejects_non_integer_id() {
        assert!(Entity::parse("abc~~{title::T}").is_err());
        assert!(Entity::parse("99999999999999~~{title::T}").is_err());
    }

    #[test]
    fn derives_agents_from_category_and_title() {
        let e = Entity::parse("3~~{title::Naming policy overview||category::Governance}").unwrap();
        assert_eq!(e.agents, vec!["Governance", "Policy", "Naming", "Overview"]);
    }
}
