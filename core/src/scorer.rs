use crate::tables::BackendTables;

/// Pointwise association scorer over the pair tables. The corpus size is
/// computed once per scorer instance; create a fresh scorer per query batch
/// and never reuse one across index updates.
pub struct AssociationScorer<'a> {
    tables: &'a BackendTables,
    corpus_size: f64,
}

impl<'a> AssociationScorer<'a> {
    pub fn new(tables: &'a BackendTables) -> Self {
        Self {
            tables,
            corpus_size: tables.corpus_size() as f64,
        }
    }

    /// Co-occurrence ratio between two multitokens: observed pair count over
    /// the count expected under independence. Returns 0 when either term is
    /// missing from the dictionary, has count < 2, or the two never co-occur
    /// within range. Symmetric in its arguments; unbounded above.
    pub fn score(&self, word: &str, token: &str) -> f64 {
        let word_count = match self.tables.dictionary.get(word) {
            Some(&count) => count,
            None => return 0.0,
        };
        let token_count = match self.tables.dictionary.get(token) {
            Some(&count) => count,
            None => return 0.0,
        };
        if word_count < 2 || token_count < 2 {
            return 0.0;
        }

        let pair_count = self.tables.pair_count(word, token);
        if pair_count == 0 {
            return 0.0;
        }

        let expected = f64::from(word_count) * f64::from(token_count) / self.corpus_size;
        f64::from(pair_count) / expected
    }
}
