//! Per-run accumulator and final statistics

use serde::{Deserialize, Serialize};

/// Running totals owned by exactly one simulation run.
///
/// Every field only grows while a run is in progress; a new run starts from
/// [`RunAccumulator::default`]. Totals saturate at `u64::MAX`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunAccumulator {
    pub spins: u64,
    pub total_cost: u64,
    pub total_won: u64,
    pub hits: u64,
    pub max_win: u64,
}

impl RunAccumulator {
    /// Record one spin
    pub fn record(&mut self, cost: u64, win: u64) {
        self.spins += 1;
        self.total_cost = self.total_cost.saturating_add(cost);
        self.total_won = self.total_won.saturating_add(win);
        if win > 0 {
            self.hits += 1;
            self.max_win = self.max_win.max(win);
        }
    }

    /// Combine two partial accumulators (order independent)
    pub fn merge(self, other: Self) -> Self {
        Self {
            spins: self.spins + other.spins,
            total_cost: self.total_cost.saturating_add(other.total_cost),
            total_won: self.total_won.saturating_add(other.total_won),
            hits: self.hits + other.hits,
            max_win: self.max_win.max(other.max_win),
        }
    }

    /// Calculate RTP so far
    pub fn rtp(&self) -> f64 {
        if self.total_cost > 0 {
            (self.total_won as f64 / self.total_cost as f64) * 100.0
        } else {
            0.0
        }
    }

    /// Calculate hit frequency so far
    pub fn hit_frequency(&self) -> f64 {
        if self.spins > 0 {
            (self.hits as f64 / self.spins as f64) * 100.0
        } else {
            0.0
        }
    }

    /// Snapshot as a final result
    pub fn result(&self) -> StatisticsResult {
        StatisticsResult {
            rtp_percent: self.rtp(),
            hit_frequency_percent: self.hit_frequency(),
            max_win: self.max_win,
            total_cost: self.total_cost,
            total_won: self.total_won,
        }
    }
}

/// Final statistics of a completed run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatisticsResult {
    pub rtp_percent: f64,
    pub hit_frequency_percent: f64,
    pub max_win: u64,
    pub total_cost: u64,
    pub total_won: u64,
}
