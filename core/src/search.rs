use crate::config::RankConfig;
use crate::error::Result;
use crate::scorer::score;
use crate::stats::CorpusStats;
use crate::tokenizer::Query;
use crate::topk::{Strategy, TopK};
use crate::{Document, ResultSet};

/// Score the corpus serially and keep the best `config.max_results` with `strategy`.
pub fn search<'a>(
    query: &Query,
    corpus: &'a [Document],
    stats: &CorpusStats,
    config: &RankConfig,
    strategy: Strategy,
) -> Result<ResultSet<'a>> {
    config.validate()?;
    let mut accumulator = strategy.accumulator(config.max_results);
    fill(accumulator.as_mut(), query, corpus, stats, config);
    let results = accumulator.snapshot();
    tracing::debug!(%strategy, documents = corpus.len(), kept = results.len(), "serial search done");
    Ok(results)
}

/// Like [`search`], but feeds a caller-supplied accumulator and returns its snapshot.
pub fn search_with<'a, A: TopK<'a>>(
    query: &Query,
    corpus: &'a [Document],
    stats: &CorpusStats,
    config: &RankConfig,
    mut accumulator: A,
) -> Result<ResultSet<'a>> {
    config.validate()?;
    fill(&mut accumulator, query, corpus, stats, config);
    Ok(accumulator.snapshot())
}

fn fill<'a, A: TopK<'a> + ?Sized>(
    accumulator: &mut A,
    query: &Query,
    corpus: &'a [Document],
    stats: &CorpusStats,
    config: &RankConfig,
) {
    let params = config.bm25();
    for doc in corpus {
        if let Some(m) = score(doc, query, stats, &params) {
            accumulator.offer(m);
        }
    }
}
