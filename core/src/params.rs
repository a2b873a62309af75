use crate::entity::Field;

/// Static per-field association weights. The default weight elsewhere is 1.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtraWeights {
    pub category: f64,
    pub tag_list: f64,
    pub title: f64,
    pub description: f64,
    pub meta: f64,
}

impl ExtraWeights {
    pub fn weight(&self, field: Field) -> f64 {
        match field {
            Field::Category => self.category,
            Field::TagList => self.tag_list,
            Field::Title => self.title,
            Field::Description => self.description,
            Field::Meta => self.meta,
        }
    }
}

impl Default for ExtraWeights {
    fn default() -> Self {
        Self {
            category: 0.3,
            tag_list: 0.4,
            title: 0.2,
            description: 0.0,
            meta: 0.1,
        }
    }
}

/// Indexing-time parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct BackendParams {
    /// Max consecutive tokens per multitoken accepted into the dictionary.
    pub max_multitoken: usize,
    /// Max position delta between two multitokens to link them as a pair.
    pub max_dist: usize,
    /// Arity cap (separator count) for multitokens entering the pair tables.
    /// Must be <= `max_multitoken`.
    pub max_terms: usize,
    pub extra_weights: ExtraWeights,
}

impl Default for BackendParams {
    fn default() -> Self {
        Self {
            max_multitoken: 4,
            max_dist: 3,
            max_terms: 3,
            extra_weights: ExtraWeights::default(),
        }
    }
}

/// Display sections the formatter can render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Dict,
    Pairs,
    Category,
    Tags,
    Titles,
    Descriptions,
    Meta,
    Id,
    Whole,
    Agents,
}

impl Section {
    pub fn label(self) -> &'static str {
        match self {
            Section::Dict => "dict",
            Section::Pairs => "pairs",
            Section::Category => "category",
            Section::Tags => "tags",
            Section::Titles => "titles",
            Section::Descriptions => "descr",
            Section::Meta => "meta",
            Section::Id => "ID",
            Section::Whole => "whole",
            Section::Agents => "agents",
        }
    }

    pub fn parse(name: &str) -> Option<Section> {
        match name {
            "dict" => Some(Section::Dict),
            "pairs" => Some(Section::Pairs),
            "category" => Some(Section::Category),
            "tags" => Some(Section::Tags),
            "titles" => Some(Section::Titles),
            "descr" => Some(Section::Descriptions),
            "meta" => Some(Section::Meta),
            "id" => Some(Section::Id),
            "whole" => Some(Section::Whole),
            "agents" => Some(Section::Agents),
            _ => None,
        }
    }
}

/// Sections selected by the `all` command and by default.
pub const DEFAULT_SHOW: [Section; 7] = [
    Section::Dict,
    Section::Pairs,
    Section::Category,
    Section::Tags,
    Section::Titles,
    Section::Id,
    Section::Whole,
];

/// Output truncation policy. `Clear` is set by the clear-display command and
/// behaves as no-limit for later truncation; it is kept distinct so callers
/// can tell the two apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputLimit {
    NoLimit,
    Lines(usize),
    Clear,
}

impl OutputLimit {
    pub fn line_cap(self) -> Option<usize> {
        match self {
            OutputLimit::Lines(n) => Some(n),
            OutputLimit::NoLimit | OutputLimit::Clear => None,
        }
    }
}

/// Query-time parameters, threaded through every call and returned updated
/// rather than held as hidden state.
#[derive(Debug, Clone, PartialEq)]
pub struct FrontendParams {
    pub show: Vec<Section>,
    /// Query window cap, and the corpus-count ceiling used by distillation.
    pub max_token_count: usize,
    pub output_limit: OutputLimit,
    pub relevancy_mode: bool,
    pub min_rel_score: f64,
    pub max_rel_score: f64,
    pub fine_tune_mode: bool,
    /// Minimum token arity for a query multitoken to contribute to a section.
    pub context_multitoken_min_size: usize,
    pub min_output_list_size: usize,
    pub min_token_len: usize,
    pub max_neighbors: usize,
}

impl Default for FrontendParams {
    fn default() -> Self {
        Self {
            show: DEFAULT_SHOW.to_vec(),
            max_token_count: 80,
            output_limit: OutputLimit::Lines(50),
            relevancy_mode: true,
            min_rel_score: 0.5,
            max_rel_score: 3.0,
            fine_tune_mode: true,
            context_multitoken_min_size: 1,
            min_output_list_size: 1,
            min_token_len: 2,
            max_neighbors: 20,
        }
    }
}
