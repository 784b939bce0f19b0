//! Running aggregate over accepted per-answer trait scores.
//!
//! The canonical data is the list of absolute per-answer scores. The
//! aggregate is always derived from integer totals over that list, so it
//! never accumulates rounding error, and deltas are computed on demand.

use super::score::{ScoreHistoryEntry, TraitAggregate, TraitKind};

/// Append-only score history with a derived per-trait mean.
#[derive(Debug, Clone, Default)]
pub struct ScoreAggregator {
    history: Vec<ScoreHistoryEntry>,
    totals: [u32; 4],
}

impl ScoreAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an entry and returns the recomputed aggregate.
    pub fn record(&mut self, entry: ScoreHistoryEntry) -> TraitAggregate {
        for (total, kind) in self.totals.iter_mut().zip(TraitKind::ALL) {
            *total += u32::from(entry.score.get(kind));
        }
        self.history.push(entry);
        self.aggregate()
    }

    /// Exact per-trait mean of every recorded score; all zero when empty.
    pub fn aggregate(&self) -> TraitAggregate {
        Self::mean(&self.totals, self.history.len())
    }

    /// Aggregate rounded to one decimal place.
    pub fn display_aggregate(&self) -> TraitAggregate {
        self.aggregate().rounded()
    }

    /// Change caused by the most recent entry, or `None` before any entry.
    pub fn last_delta(&self) -> Option<TraitAggregate> {
        let last = self.history.last()?;
        let mut previous = self.totals;
        for (total, kind) in previous.iter_mut().zip(TraitKind::ALL) {
            *total -= u32::from(last.score.get(kind));
        }
        let before = Self::mean(&previous, self.history.len() - 1);
        Some(self.aggregate().minus(before))
    }

    pub fn history(&self) -> &[ScoreHistoryEntry] {
        &self.history
    }

    pub fn len(&self) -> usize {
        self.history.len()
    }

    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }

    #[allow(clippy::cast_precision_loss)]
    fn mean(totals: &[u32; 4], count: usize) -> TraitAggregate {
        if count == 0 {
            return TraitAggregate::default();
        }
        let count = count as f64;
        TraitAggregate {
            perseverance: f64::from(totals[0]) / count,
            passion: f64::from(totals[1]) / count,
            goal_orientation: f64::from(totals[2]) / count,
            resilience: f64::from(totals[3]) / count,
        }
    }
}
