use crate::error::{RankError, Result};
use serde::{Deserialize, Serialize};

pub const DEFAULT_K1: f64 = 1.5;
pub const DEFAULT_B: f64 = 0.75;
pub const DEFAULT_MIN_SCORE: f64 = 0.2;
pub const DEFAULT_MAX_RESULTS: usize = 100;
/// Upper bound on the default worker count so large machines are not oversubscribed.
pub const MAX_DEFAULT_WORKERS: usize = 8;

/// Tunables threaded through every ranking call. Nothing here is global state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RankConfig {
    /// BM25 term-saturation parameter.
    pub k1: f64,
    /// BM25 length-normalization parameter, in `[0, 1]`.
    pub b: f64,
    /// Matches scoring below this are dropped.
    pub min_score: f64,
    pub max_results: usize,
    pub workers: usize,
}

impl Default for RankConfig {
    fn default() -> Self {
        Self {
            k1: DEFAULT_K1,
            b: DEFAULT_B,
            min_score: DEFAULT_MIN_SCORE,
            max_results: DEFAULT_MAX_RESULTS,
            workers: default_workers(),
        }
    }
}

impl RankConfig {
    pub fn with_k1(mut self, k1: f64) -> Self { self.k1 = k1; self }
    pub fn with_b(mut self, b: f64) -> Self { self.b = b; self }
    pub fn with_min_score(mut self, min_score: f64) -> Self { self.min_score = min_score; self }
    pub fn with_max_results(mut self, max_results: usize) -> Self { self.max_results = max_results; self }
    pub fn with_workers(mut self, workers: usize) -> Self { self.workers = workers; self }

    pub fn bm25(&self) -> Bm25Params {
        Bm25Params { k1: self.k1, b: self.b, min_score: self.min_score }
    }

    /// Reject out-of-range parameters before any scoring work begins.
    pub fn validate(&self) -> Result<()> {
        self.bm25().validate()?;
        if self.max_results < 1 {
            return Err(RankError::invalid("max_results must be at least 1"));
        }
        if self.workers < 1 {
            return Err(RankError::invalid("workers must be at least 1"));
        }
        Ok(())
    }
}

/// The scorer's slice of [`RankConfig`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bm25Params {
    pub k1: f64,
    pub b: f64,
    pub min_score: f64,
}

impl Default for Bm25Params {
    fn default() -> Self {
        RankConfig::default().bm25()
    }
}

impl Bm25Params {
    pub fn validate(&self) -> Result<()> {
        if !self.k1.is_finite() || self.k1 < 0.0 {
            return Err(RankError::invalid(format!("k1 must be finite and non-negative, got {}", self.k1)));
        }
        if !(0.0..=1.0).contains(&self.b) {
            return Err(RankError::invalid(format!("b must lie in [0, 1], got {}", self.b)));
        }
        if !self.min_score.is_finite() {
            return Err(RankError::invalid(format!("min_score must be finite, got {}", self.min_score)));
        }
        Ok(())
    }
}

/// `min(available parallelism, MAX_DEFAULT_WORKERS)`, never below one.
pub fn default_workers() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
        .clamp(1, MAX_DEFAULT_WORKERS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let cfg = RankConfig::default();
        assert!(cfg.validate().is_ok());
        assert_eq!(cfg.k1, 1.5);
        assert_eq!(cfg.b, 0.75);
        assert_eq!(cfg.max_results, 100);
        assert!((1..=MAX_DEFAULT_WORKERS).contains(&cfg.workers));
    }

    #[test]
    fn rejects_bad_values() {
        let base = RankConfig::default();
        for cfg in [
            base.clone().with_max_results(0),
            base.clone().with_workers(0),
            base.clone().with_k1(-0.1),
            base.clone().with_k1(f64::NAN),
            base.clone().with_b(1.5),
            base.clone().with_b(-0.5),
            base.clone().with_min_score(f64::INFINITY),
        ] {
            assert!(matches!(cfg.validate(), Err(RankError::InvalidConfiguration { .. })), "{cfg:?}");
        }
    }

    #[test]
    fn partial_json_fills_defaults() {
        let cfg: RankConfig = serde_json::from_str(r#"{"min_score": 1.0, "max_results": 5}"#).unwrap();
        assert_eq!(cfg.min_score, 1.0);
        assert_eq!(cfg.max_results, 5);
        assert_eq!(cfg.k1, DEFAULT_K1);
    }
}
