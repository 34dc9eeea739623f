use crate::error::{RankError, Result};
use crate::tokenizer::tokenize;
use crate::Document;
use serde::{Deserialize, Serialize};

/// Average token counts per field, computed once per corpus snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CorpusStats {
    pub avg_title_len: f64,
    pub avg_content_len: f64,
}

/// Sum token counts of every title and content and divide by corpus size.
///
/// Fails with [`RankError::DegenerateCorpus`] when the corpus is empty or every
/// field in it is empty.
pub fn compute_averages(corpus: &[Document]) -> Result<CorpusStats> {
    if corpus.is_empty() {
        return Err(RankError::DegenerateCorpus { documents: 0 });
    }
    let mut title_tokens = 0usize;
    let mut content_tokens = 0usize;
    for doc in corpus {
        title_tokens += tokenize(&doc.title).len();
        content_tokens += tokenize(&doc.content).len();
    }
    if title_tokens == 0 && content_tokens == 0 {
        return Err(RankError::DegenerateCorpus { documents: corpus.len() });
    }
    let n = corpus.len() as f64;
    let stats = CorpusStats {
        avg_title_len: title_tokens as f64 / n,
        avg_content_len: content_tokens as f64 / n,
    };
    tracing::debug!(documents = corpus.len(), ?stats, "computed corpus averages");
    Ok(stats)
}
