//! Bounded top-K BM25 ranking over a two-field (title, content) corpus.

pub mod config;
pub mod corpus;
pub mod document;
pub mod error;
pub mod parallel;
pub mod scorer;
pub mod search;
pub mod stats;
pub mod tokenizer;
pub mod topk;

pub use config::{Bm25Params, RankConfig};
pub use document::{rank_order, DocId, Document, ResultSet, ScoredMatch};
pub use error::{RankError, Result};
pub use parallel::{rank, ParallelScorer};
pub use search::{search, search_with};
pub use stats::{compute_averages, CorpusStats};
pub use tokenizer::{tokenize, Query};
pub use topk::{FullSort, OrderedInsert, SortedInsertTrim, Strategy, TopK};
