//! Two-field BM25 relevance scoring.
//!
//! Each field contributes `m * (k1 + 1) / (m + k1 * (1 - b + b * len / avg_len))`
//! where `m` counts every token occurrence in the field that is a query keyword.
//! There is no IDF term: the score is a pure function of one document, the query
//! and the corpus averages.

use crate::config::Bm25Params;
use crate::stats::CorpusStats;
use crate::tokenizer::{tokenize, Query};
use crate::{Document, ScoredMatch};

/// BM25 contribution of a single field.
pub fn field_score(text: &str, query: &Query, avg_len: f64, k1: f64, b: f64) -> f64 {
    let tokens = tokenize(text);
    let matches = tokens.iter().filter(|t| query.contains(t)).count();
    if matches == 0 {
        return 0.0;
    }
    // avg_len > 0 here: a field with a matching token is non-empty, so the corpus average is too.
    let m = matches as f64;
    let len_ratio = tokens.len() as f64 / avg_len;
    m * (k1 + 1.0) / (m + k1 * (1.0 - b + b * len_ratio))
}

/// Title plus content score, without the `min_score` cutoff.
pub fn raw_score(document: &Document, query: &Query, stats: &CorpusStats, params: &Bm25Params) -> f64 {
    field_score(&document.title, query, stats.avg_title_len, params.k1, params.b)
        + field_score(&document.content, query, stats.avg_content_len, params.k1, params.b)
}

/// Score one document; `None` when it falls below `params.min_score`.
pub fn score<'a>(
    document: &'a Document,
    query: &Query,
    stats: &CorpusStats,
    params: &Bm25Params,
) -> Option<ScoredMatch<'a>> {
    let total = raw_score(document, query, stats, params);
    (total >= params.min_score).then(|| ScoredMatch::new(total, document))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stats() -> CorpusStats {
        CorpusStats { avg_title_len: 4.0, avg_content_len: 4.0 }
    }

    #[test]
    fn exact_title_match_at_average_length() {
        let doc = Document::new("a", "Machine Learning is hard", "");
        let q = Query::parse("Machine Learning is hard");
        let params = Bm25Params::default();
        // m = 4, len/avg = 1 => 4 * 2.5 / (4 + 1.5) = 10 / 5.5
        let s = raw_score(&doc, &q, &stats(), &params);
        assert!((s - 10.0 / 5.5).abs() < 1e-12);
    }

    #[test]
    fn repeated_occurrences_each_count() {
        let q = Query::parse("rust");
        let once = field_score("rust a b c", &q, 4.0, 1.5, 0.75);
        let twice = field_score("rust rust b c", &q, 4.0, 1.5, 0.75);
        assert!(twice > once);
    }

    #[test]
    fn no_match_scores_zero_even_with_zero_average() {
        let q = Query::parse("rust");
        assert_eq!(field_score("", &q, 0.0, 1.5, 0.75), 0.0);
        assert_eq!(field_score("go java", &q, 2.0, 1.5, 0.75), 0.0);
    }

    #[test]
    fn below_threshold_is_dropped() {
        let doc = Document::new("c", "Learning to cook", "");
        let q = Query::parse("Machine Learning is hard");
        let low = Bm25Params { min_score: 0.2, ..Bm25Params::default() };
        let high = Bm25Params { min_score: 1.5, ..Bm25Params::default() };
        assert!(score(&doc, &q, &stats(), &low).is_some());
        assert!(score(&doc, &q, &stats(), &high).is_none());
    }

    #[test]
    fn case_sensitive_matching() {
        let q = Query::parse("rust");
        assert_eq!(field_score("Rust RUST", &q, 2.0, 1.5, 0.75), 0.0);
    }
}
