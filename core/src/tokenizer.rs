use lazy_static::lazy_static;
use std::collections::HashSet;
use unicode_normalization::UnicodeNormalization;

/// Joins constituent tokens inside a multitoken key.
pub const SEPARATOR: &str = "~";

/// Constituent tokens shorter than this are never indexed.
pub const MIN_TOKEN_LEN: usize = 2;

lazy_static! {
    static ref STOPWORDS: HashSet<&'static str> = {
        let words: &[&str] = &[
            "", "-", "in", "the", "and", "to", "of", "a", "this", "for", "is", "with", "from",
            "as", "on", "an", "that", "it", "are", "within", "will", "by", "or", "its", "can",
            "your", "be", "about", "used", "our", "their", "you", "into", "using", "these",
            "which", "we", "how", "see", "below", "all", "use", "across", "provide", "provides",
            "aims", "one", "&", "ensuring", "crucial", "at", "various", "through", "find",
            "ensure", "more", "another", "but", "should", "considered", "provided", "must",
            "whether", "located", "where", "begins", "any", "what", "some", "under", "does",
            "belong", "included", "part", "associated",
        ];
        words.iter().copied().collect()
    };
}

pub fn is_stopword(token: &str) -> bool { STOPWORDS.contains(token) }

/// Tokenize field text into lowercase word tokens using NFKC normalization
/// and whitespace splitting. Punctuation-bearing tokens survive here and are
/// filtered later by the length/stopword rules in [`extract_multitokens`].
pub fn tokenize(text: &str) -> Vec<String> {
    let normalized = text.nfkc().collect::<String>().to_lowercase();
    normalized.split_whitespace().map(|s| s.to_string()).collect()
}

/// Build all candidate multitokens from a token sequence: every window of
/// 1..=`max_multitoken` consecutive tokens starting at a position with at
/// least one token after it. Windows containing a short token or a stopword
/// are rejected. Repeated windows are returned once per occurrence.
pub fn extract_multitokens(words: &[String], max_multitoken: usize) -> Vec<String> {
    let n = words.len();
    let mut accepted = Vec::new();
    if n < 2 {
        return accepted;
    }
    for i in 0..n - 1 {
        let max_len = max_multitoken.min(n - i);
        'window: for j in 1..=max_len {
            let window = &words[i..i + j];
            for token in window {
                if token.chars().count() < MIN_TOKEN_LEN || is_stopword(token) {
                    continue 'window;
                }
            }
            accepted.push(window.join(SEPARATOR));
        }
    }
    accepted
}

/// Render a multitoken key with spaces instead of separators, for substring
/// matching against raw field values.
pub fn spaced(multitoken: &str) -> String {
    multitoken.replace(SEPARATOR, " ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn basic_tokenize() {
        let t = tokenize("Gaussian Distribution");
        assert_eq!(t, vec!["gaussian", "distribution"]);
    }

    #[test]
    fn single_token_yields_nothing() {
        assert!(extract_multitokens(&tokenize("gaussian"), 4).is_empty());
    }

    #[test]
    fn stopwords_break_windows() {
        let words = tokenize("moments of a gaussian");
        let out = extract_multitokens(&words, 2);
        assert!(out.contains(&"moments".to_string()));
        assert!(!out.contains(&"of".to_string()));
        assert!(!out.contains(&"moments~of".to_string()));
    }

    #[test]
    fn forward_windows_only() {
        let words = tokenize("central moments");
        let out = extract_multitokens(&words, 2);
        assert_eq!(out, vec!["central", "central~moments"]);
    }
}
