//! Partitioned scoring across a fixed-size worker pool.
//!
//! The corpus is cut into `workers` contiguous, near-equal chunks. Each worker scores its chunk
//! independently and returns every qualifying match; the only synchronization point
//! is the join before the merge, which sorts all partial lists together and
//! truncates to `max_results`. A panicking worker fails the whole call.

use crate::config::RankConfig;
use crate::error::{RankError, Result};
use crate::scorer::score;
use crate::stats::CorpusStats;
use crate::tokenizer::Query;
use crate::topk::{FullSort, TopK};
use crate::{Document, ResultSet, ScoredMatch};
use rayon::prelude::*;
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

/// Rank `corpus` against `query` on a pool of `config.workers` threads built for this call.
///
/// Callers ranking repeatedly should hold a [`ParallelScorer`] instead.
pub fn rank<'a>(
    query: &Query,
    corpus: &'a [Document],
    stats: &CorpusStats,
    config: &RankConfig,
) -> Result<ResultSet<'a>> {
    config.validate()?;
    ParallelScorer::new(config.workers)?.rank(query, corpus, stats, config)
}

/// Split `items` into `min(workers, len)` contiguous chunks whose sizes differ by
/// at most one. The first `len % workers` chunks carry the extra item.
pub fn partition<T>(items: &[T], workers: usize) -> Vec<&[T]> {
    let chunks = workers.max(1).min(items.len());
    if chunks == 0 {
        return Vec::new();
    }
    let base = items.len() / chunks;
    let rem = items.len() % chunks;
    let mut out = Vec::with_capacity(chunks);
    let mut rest = items;
    for i in 0..chunks {
        let (head, tail) = rest.split_at(base + usize::from(i < rem));
        out.push(head);
        rest = tail;
    }
    out
}

/// Fixed-size worker pool reused across ranking calls.
pub struct ParallelScorer {
    pool: rayon::ThreadPool,
    workers: usize,
}

impl ParallelScorer {
    pub fn new(workers: usize) -> Result<Self> {
        if workers < 1 {
            return Err(RankError::invalid("workers must be at least 1"));
        }
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(workers)
            .thread_name(|i| format!("rank-worker-{i}"))
            .build()
            .map_err(|e| RankError::WorkerFailure { worker: 0, reason: format!("failed to start worker pool: {e}") })?;
        Ok(Self { pool, workers })
    }

    pub fn from_config(config: &RankConfig) -> Result<Self> {
        config.validate()?;
        Self::new(config.workers)
    }

    pub fn workers(&self) -> usize { self.workers }

    /// Rank on this pool. The corpus is split across the pool's workers;
    /// `config.workers` is only consulted when a pool is built.
    pub fn rank<'a>(
        &self,
        query: &Query,
        corpus: &'a [Document],
        stats: &CorpusStats,
        config: &RankConfig,
    ) -> Result<ResultSet<'a>> {
        config.validate()?;
        let params = config.bm25();
        self.rank_with(corpus, config.max_results, |doc| score(doc, query, stats, &params))
    }

    pub(crate) fn rank_with<'a, F>(
        &self,
        corpus: &'a [Document],
        max_results: usize,
        scorer: F,
    ) -> Result<ResultSet<'a>>
    where
        F: Fn(&'a Document) -> Option<ScoredMatch<'a>> + Sync,
    {
        let chunks = partition(corpus, self.workers);
        tracing::debug!(documents = corpus.len(), workers = self.workers, chunks = chunks.len(), "partitioned rank");

        let partials = self.pool.install(|| {
            chunks
                .par_iter()
                .enumerate()
                .map(|(worker, part)| {
                    panic::catch_unwind(AssertUnwindSafe(|| part.iter().filter_map(&scorer).collect::<Vec<_>>()))
                        .map_err(|payload| {
                            let reason = panic_message(payload.as_ref());
                            tracing::warn!(worker, %reason, "scoring worker failed");
                            RankError::WorkerFailure { worker, reason }
                        })
                })
                .collect::<Result<Vec<_>>>()
        })?;

        let mut merged = FullSort::new(max_results);
        for partial in partials {
            merged.offer_all(partial);
        }
        let results = merged.into_sorted();
        tracing::debug!(kept = results.len(), "merged worker results");
        Ok(results)
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "worker panicked".to_string()
    }
}
