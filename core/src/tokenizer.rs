use std::collections::HashSet;

/// Split text on whitespace. No case folding, no punctuation stripping.
pub fn tokenize(text: &str) -> Vec<&str> {
    text.split_whitespace().collect()
}

/// Keyword set of a search string. Repeated keywords collapse to one entry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query {
    keywords: HashSet<String>,
}

impl Query {
    pub fn parse(search: &str) -> Self {
        Self { keywords: search.split_whitespace().map(str::to_owned).collect() }
    }

    pub fn contains(&self, token: &str) -> bool { self.keywords.contains(token) }

    pub fn len(&self) -> usize { self.keywords.len() }

    pub fn is_empty(&self) -> bool { self.keywords.is_empty() }
}
