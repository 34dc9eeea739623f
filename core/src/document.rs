use serde::{Deserialize, Deserializer, Serialize};
use std::cmp::Ordering;

pub type DocId = String;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    /// Stable identifier; numeric ids in the source JSON are kept as their decimal text.
    #[serde(deserialize_with = "deserialize_id")]
    pub id: DocId,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
}

impl Document {
    pub fn new(id: impl Into<DocId>, title: impl Into<String>, content: impl Into<String>) -> Self {
        Self { id: id.into(), title: title.into(), content: content.into() }
    }
}

/// A qualifying document together with its relevance score.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoredMatch<'a> {
    pub score: f64,
    pub document: &'a Document,
}

impl<'a> ScoredMatch<'a> {
    pub fn new(score: f64, document: &'a Document) -> Self {
        Self { score, document }
    }

    pub fn id(&self) -> &'a str { &self.document.id }
}

/// Ranked matches, best first, at most `max_results` long.
pub type ResultSet<'a> = Vec<ScoredMatch<'a>>;

/// Ordering used everywhere a result set is sorted: higher score first, then lower id.
/// `Ordering::Less` means `a` ranks ahead of `b`.
pub fn rank_order(a: &ScoredMatch<'_>, b: &ScoredMatch<'_>) -> Ordering {
    b.score.total_cmp(&a.score).then_with(|| a.document.id.cmp(&b.document.id))
}

fn deserialize_id<'de, D>(deserializer: D) -> Result<DocId, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Text(String),
        Int(i64),
        Float(f64),
    }

    Ok(match RawId::deserialize(deserializer)? {
        RawId::Text(s) => s,
        RawId::Int(n) => n.to_string(),
        RawId::Float(f) => f.to_string(),
    })
}
