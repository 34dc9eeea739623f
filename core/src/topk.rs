//! Bounded top-K accumulators.
//!
//! Three interchangeable strategies share the [`TopK`] contract: offer candidates
//! one at a time (or in bulk) and read back the best `capacity` of them, ordered by
//! [`rank_order`]. They differ only in where the sorting cost is paid:
//!
//! | strategy             | `offer`                         | `snapshot`   |
//! |----------------------|---------------------------------|--------------|
//! | [`FullSort`]         | O(1) push                       | O(n log n)   |
//! | [`SortedInsertTrim`] | O(K log K) re-sort on overflow  | O(K log K)   |
//! | [`OrderedInsert`]    | O(log K) search + O(K) shift    | O(K)         |
//!
//! Because every strategy breaks score ties by document id, the same input stream
//! produces the same snapshot whichever strategy ingests it.

use crate::document::rank_order;
use crate::{ResultSet, ScoredMatch};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

pub trait TopK<'a> {
    /// Maximum number of matches a snapshot can hold.
    fn capacity(&self) -> usize;

    /// Ingest one candidate. It may be dropped immediately or evicted later.
    fn offer(&mut self, candidate: ScoredMatch<'a>);

    fn offer_all(&mut self, candidates: Vec<ScoredMatch<'a>>) {
        for candidate in candidates {
            self.offer(candidate);
        }
    }

    /// Current best matches, best first, at most `capacity` long.
    fn snapshot(&self) -> ResultSet<'a>;

    /// Number of candidates currently held (may exceed `capacity` for [`FullSort`]).
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Keeps every candidate and sorts once when a snapshot is taken.
#[derive(Debug, Clone, Default)]
pub struct FullSort<'a> {
    capacity: usize,
    buffer: Vec<ScoredMatch<'a>>,
}

impl<'a> FullSort<'a> {
    pub fn new(capacity: usize) -> Self {
        Self { capacity, buffer: Vec::new() }
    }

    /// Consume the accumulator, sorting in place instead of copying.
    pub fn into_sorted(mut self) -> ResultSet<'a> {
        self.buffer.sort_by(rank_order);
        self.buffer.truncate(self.capacity);
        self.buffer
    }
}

impl<'a> TopK<'a> for FullSort<'a> {
    fn capacity(&self) -> usize { self.capacity }

    fn offer(&mut self, candidate: ScoredMatch<'a>) {
        self.buffer.push(candidate);
    }

    fn offer_all(&mut self, candidates: Vec<ScoredMatch<'a>>) {
        self.buffer.extend(candidates);
    }

    fn snapshot(&self) -> ResultSet<'a> {
        self.clone().into_sorted()
    }

    fn len(&self) -> usize { self.buffer.len() }
}

/// Appends, and re-sorts the whole buffer every time it overflows, dropping the
/// minimum. Deliberately naive: kept as a benchmark baseline.
#[derive(Debug, Clone, Default)]
pub struct SortedInsertTrim<'a> {
    capacity: usize,
    buffer: Vec<ScoredMatch<'a>>,
}

impl<'a> SortedInsertTrim<'a> {
    pub fn new(capacity: usize) -> Self {
        Self { capacity, buffer: Vec::new() }
    }
}

impl<'a> TopK<'a> for SortedInsertTrim<'a> {
    fn capacity(&self) -> usize { self.capacity }

    fn offer(&mut self, candidate: ScoredMatch<'a>) {
        self.buffer.push(candidate);
        if self.buffer.len() > self.capacity {
            self.buffer.sort_by(rank_order);
            self.buffer.pop();
        }
    }

    fn snapshot(&self) -> ResultSet<'a> {
        // Entries appended since the last overflow are still unsorted.
        let mut out = self.buffer.clone();
        out.sort_by(rank_order);
        out
    }

    fn len(&self) -> usize { self.buffer.len() }
}

/// Buffer kept sorted worst-first by binary-search insertion; overflow evicts index 0.
#[derive(Debug, Clone, Default)]
pub struct OrderedInsert<'a> {
    capacity: usize,
    ascending: Vec<ScoredMatch<'a>>,
}

impl<'a> OrderedInsert<'a> {
    pub fn new(capacity: usize) -> Self {
        Self { capacity, ascending: Vec::new() }
    }

    /// Lowest-ranked match still held.
    pub fn floor(&self) -> Option<&ScoredMatch<'a>> {
        self.ascending.first()
    }
}

impl<'a> TopK<'a> for OrderedInsert<'a> {
    fn capacity(&self) -> usize { self.capacity }

    fn offer(&mut self, candidate: ScoredMatch<'a>) {
        if self.ascending.len() >= self.capacity {
            match self.floor() {
                // Full and the candidate cannot beat the current floor.
                Some(floor) if rank_order(&candidate, floor) != Ordering::Less => return,
                None => return,
                _ => {}
            }
        }
        let idx = self
            .ascending
            .partition_point(|held| rank_order(held, &candidate) == Ordering::Greater);
        self.ascending.insert(idx, candidate);
        if self.ascending.len() > self.capacity {
            self.ascending.remove(0);
        }
    }

    fn snapshot(&self) -> ResultSet<'a> {
        self.ascending.iter().rev().copied().collect()
    }

    fn len(&self) -> usize { self.ascending.len() }
}

/// Runtime selector over the accumulator strategies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Strategy {
    FullSort,
    SortedInsertTrim,
    OrderedInsert,
}

impl Strategy {
    pub const ALL: [Strategy; 3] = [Strategy::FullSort, Strategy::SortedInsertTrim, Strategy::OrderedInsert];

    pub fn accumulator<'a>(self, capacity: usize) -> Box<dyn TopK<'a> + 'a> {
        match self {
            Strategy::FullSort => Box::new(FullSort::new(capacity)),
            Strategy::SortedInsertTrim => Box::new(SortedInsertTrim::new(capacity)),
            Strategy::OrderedInsert => Box::new(OrderedInsert::new(capacity)),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Strategy::FullSort => "full-sort",
            Strategy::SortedInsertTrim => "sorted-insert-trim",
            Strategy::OrderedInsert => "ordered-insert",
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Strategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Strategy::ALL
            .into_iter()
            .find(|strategy| strategy.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| {
                let names: Vec<_> = Strategy::ALL.iter().map(|s| s.name()).collect();
                format!("unknown strategy {s:?}, expected one of {}", names.join(", "))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Document;

    fn docs(n: usize) -> Vec<Document> {
        (0..n).map(|i| Document::new(format!("d{i}"), "", "")).collect()
    }

    fn scores(rs: &ResultSet<'_>) -> Vec<f64> {
        rs.iter().map(|m| m.score).collect()
    }

    fn feed<'a>(acc: &mut dyn TopK<'a>, docs: &'a [Document], values: &[f64]) {
        for (doc, &s) in docs.iter().zip(values) {
            acc.offer(ScoredMatch::new(s, doc));
        }
    }

    #[test]
    fn capacity_eviction_keeps_two_highest() {
        let d = docs(4);
        for strategy in Strategy::ALL {
            let mut acc = strategy.accumulator(2);
            feed(acc.as_mut(), &d, &[0.5, 0.9, 0.3, 1.2]);
            assert_eq!(scores(&acc.snapshot()), vec![1.2, 0.9], "{strategy}");
        }
    }

    #[test]
    fn tie_at_boundary_keeps_exactly_one() {
        let d = docs(2);
        for strategy in Strategy::ALL {
            let mut acc = strategy.accumulator(1);
            feed(acc.as_mut(), &d, &[0.4, 0.4]);
            let snap = acc.snapshot();
            assert_eq!(snap.len(), 1, "{strategy}");
            assert_eq!(snap[0].score, 0.4);
            // Ties resolve to the lower id.
            assert_eq!(snap[0].id(), "d0");
        }
    }

    #[test]
    fn ties_kept_while_room_remains() {
        let d = docs(3);
        for strategy in Strategy::ALL {
            let mut acc = strategy.accumulator(5);
            feed(acc.as_mut(), &d, &[0.4, 0.4, 0.4]);
            assert_eq!(acc.snapshot().len(), 3, "{strategy}");
        }
    }

    #[test]
    fn fewer_than_capacity_returns_all_sorted() {
        let d = docs(3);
        for strategy in Strategy::ALL {
            let mut acc = strategy.accumulator(100);
            feed(acc.as_mut(), &d, &[0.1, 3.0, 2.0]);
            assert_eq!(scores(&acc.snapshot()), vec![3.0, 2.0, 0.1], "{strategy}");
        }
    }

    #[test]
    fn huge_capacity_allocates_lazily() {
        let d = docs(2);
        for strategy in Strategy::ALL {
            let mut acc = strategy.accumulator(usize::MAX);
            feed(acc.as_mut(), &d, &[0.3, 0.8]);
            assert_eq!(scores(&acc.snapshot()), vec![0.8, 0.3], "{strategy}");
        }
    }

    #[test]
    fn empty_snapshot() {
        for strategy in Strategy::ALL {
            let acc = strategy.accumulator(3);
            assert!(acc.is_empty());
            assert!(acc.snapshot().is_empty());
        }
    }

    #[test]
    fn bulk_matches_incremental() {
        let d = docs(6);
        let values = [0.7, 0.2, 0.7, 1.1, 0.0, 0.7];
        let bulk: Vec<_> = d.iter().zip(values).map(|(doc, s)| ScoredMatch::new(s, doc)).collect();
        for strategy in Strategy::ALL {
            let mut one = strategy.accumulator(3);
            feed(one.as_mut(), &d, &values);
            let mut many = strategy.accumulator(3);
            many.offer_all(bulk.clone());
            assert_eq!(one.snapshot(), many.snapshot(), "{strategy}");
        }
    }

    #[test]
    fn ordered_insert_floor_tracks_minimum() {
        let d = docs(3);
        let mut acc = OrderedInsert::new(2);
        feed(&mut acc, &d, &[0.5, 0.9, 0.7]);
        assert_eq!(acc.floor().map(|m| m.score), Some(0.7));
        assert_eq!(acc.len(), 2);
    }

    #[test]
    fn strategy_names_round_trip() {
        for strategy in Strategy::ALL {
            assert_eq!(strategy.name().parse::<Strategy>(), Ok(strategy));
        }
        assert!("heap".parse::<Strategy>().is_err());
    }
}
