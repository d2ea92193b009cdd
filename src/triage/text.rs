use std::collections::HashSet;

#[rustfmt::skip]
const STOP_WORDS: &[&str] = &[
    // Articles
    "a", "an", "the",
    // Prepositions
    "in", "on", "at", "to", "from", "with", "by", "for", "of", "about", "into", "over", "after",
    "before", "under", "between", "out", "against",
    // Pronouns
    "i", "me", "my", "we", "our", "you", "your", "he", "she", "it", "they", "them",
    // Auxiliary verbs
    "is", "are", "was", "were", "be", "been", "being", "have", "has", "had", "do", "does", "did",
    // Modal and inability verbs
    "unable", "cannot", "cant", "could", "should", "would",
    // Generic incident words
    "issue", "problem", "error", "not", "working", "failed", "failure", "connection",
    "connecting", "access",
];

/// Lowercases the text, drops every character that is neither a word
/// character nor whitespace, and splits on whitespace.
pub fn tokenize(text: &str) -> Vec<String> {
    let cleaned: String = text
        .to_lowercase()
        .chars()
        .filter(|c| c.is_alphanumeric() || *c == '_' || c.is_whitespace())
        .collect();
    cleaned.split_whitespace().map(str::to_string).collect()
}

#[derive(Debug, Clone)]
pub struct StopWords {
    words: HashSet<String>,
}

impl StopWords {
    pub fn new<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            words: words.into_iter().map(Into::into).collect(),
        }
    }

    pub fn contains(&self, token: &str) -> bool {
        self.words.contains(token)
    }

    /// Tokens that are not stop words, in their original order.
    pub fn filter<'a>(&self, tokens: &'a [String]) -> Vec<&'a str> {
        tokens
            .iter()
            .map(String::as_str)
            .filter(|token| !self.contains(token))
            .collect()
    }
}

impl Default for StopWords {
    fn default() -> Self {
        Self::new(STOP_WORDS.iter().copied())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokenizes_and_strips_punctuation() {
        assert_eq!(
            tokenize("VPN: connection-timeout, in Office!"),
            vec!["vpn", "connectiontimeout", "in", "office"]
        );
        assert_eq!(tokenize("snake_case ok"), vec!["snake_case", "ok"]);
    }

    #[test]
    fn empty_text_has_no_tokens() {
        assert!(tokenize("").is_empty());
        assert!(tokenize("  ?! ").is_empty());
    }

    #[test]
    fn filters_stop_words_in_order() {
        let stop_words = StopWords::default();
        let tokens = tokenize("Unable to access the shared drive from laptop");
        assert_eq!(
            stop_words.filter(&tokens),
            vec!["shared", "drive", "laptop"]
        );
    }

    #[test]
    fn default_set_covers_generic_incident_words() {
        let stop_words = StopWords::default();
        for word in ["connection", "access", "working", "the", "cant"] {
            assert!(stop_words.contains(word), "{word} should be a stop word");
        }
        assert!(!stop_words.contains("timeout"));
        assert!(!stop_words.contains("vpn"));
    }
}
