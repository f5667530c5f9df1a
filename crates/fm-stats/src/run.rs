//! Batched simulation run
//!
//! A [`SimulationRun`] owns everything one Monte Carlo estimate needs: the
//! machine, the bet, the iteration target and its own [`RunAccumulator`].
//! Work happens in batches; after each batch the caller gets a [`Progress`]
//! and decides whether to continue.

use std::ops::ControlFlow;

use fm_slot::{MachineConfig, spin_with};
use rand::rngs::OsRng;
use rand::{SeedableRng, TryRngCore};
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::accumulator::{RunAccumulator, StatisticsResult};
use crate::config::SimConfig;
use crate::error::{StatsError, StatsResult};

/// Snapshot emitted after every batch
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Progress {
    pub spins_done: u64,
    /// In `[0, 1]`
    pub fraction_complete: f64,
    pub current_rtp: f64,
}

/// How a run ended
#[derive(Debug, Clone, PartialEq)]
pub enum RunOutcome {
    Completed(StatisticsResult),
    Cancelled,
}

/// One statistics run
#[derive(Debug)]
pub struct SimulationRun {
    config: MachineConfig,
    bet: u64,
    cost_per_spin: u64,
    iterations: u64,
    sim: SimConfig,
    acc: RunAccumulator,
    batches: u64,
}

impl SimulationRun {
    /// Create a run betting the machine's default bet on every line
    pub fn new(config: MachineConfig, iterations: u64, sim: SimConfig) -> StatsResult<Self> {
        if iterations == 0 {
            return Err(StatsError::InvalidIterations(iterations));
        }
        let bet = config.simulation_bet();
        config.check_bet(bet)?;
        let cost_per_spin = config.cost_per_spin(bet);
        Ok(Self {
            config,
            bet,
            cost_per_spin,
            iterations,
            sim,
            acc: RunAccumulator::default(),
            batches: 0,
        })
    }

    pub fn iterations(&self) -> u64 {
        self.iterations
    }

    pub fn accumulator(&self) -> &RunAccumulator {
        &self.acc
    }

    pub fn is_finished(&self) -> bool {
        self.acc.spins >= self.iterations
    }

    /// Current progress snapshot
    pub fn progress(&self) -> Progress {
        Progress {
            spins_done: self.acc.spins,
            fraction_complete: self.acc.spins as f64 / self.iterations as f64,
            current_rtp: self.acc.rtp(),
        }
    }

    /// Execute the next batch.
    ///
    /// The final batch is shortened so exactly `iterations` spins run.
    pub fn run_batch(&mut self) -> StatsResult<Progress> {
        let remaining = self.iterations.saturating_sub(self.acc.spins);
        let batch = remaining.min(self.sim.batch_len());
        let chunks = self.sim.chunk_count().min(batch.max(1));

        let partial = if chunks > 1 {
            let per_chunk = batch.div_ceil(chunks);
            (0..chunks)
                .into_par_iter()
                .map(|chunk| {
                    let start = chunk * per_chunk;
                    let count = per_chunk.min(batch.saturating_sub(start));
                    self.spin_chunk(chunk, count)
                })
                .try_reduce(RunAccumulator::default, |a, b| Ok(a.merge(b)))?
        } else {
            self.spin_chunk(0, batch)?
        };

        self.acc = self.acc.merge(partial);
        self.batches += 1;

        let progress = self.progress();
        log::debug!(
            "Batch {}: {}/{} spins, RTP {:.3}%",
            self.batches,
            progress.spins_done,
            self.iterations,
            progress.current_rtp
        );
        Ok(progress)
    }

    /// Drive batches to completion.
    ///
    /// `observer` sees every progress snapshot; returning
    /// [`ControlFlow::Break`] cancels the run and no result is produced.
    pub fn run<F>(mut self, mut observer: F) -> StatsResult<RunOutcome>
    where
        F: FnMut(Progress) -> ControlFlow<()>,
    {
        log::info!(
            "Simulating '{}': {} spins at bet {} x {} lines",
            self.config.name,
            self.iterations,
            self.bet,
            self.config.paylines.len()
        );

        while !self.is_finished() {
            let progress = self.run_batch()?;
            if observer(progress).is_break() {
                log::info!(
                    "Simulation cancelled after {} of {} spins",
                    self.acc.spins,
                    self.iterations
                );
                return Ok(RunOutcome::Cancelled);
            }
        }

        let result = self.acc.result();
        log::info!(
            "Simulation complete: RTP {:.3}%, hit frequency {:.3}%, max win {}",
            result.rtp_percent,
            result.hit_frequency_percent,
            result.max_win
        );
        Ok(RunOutcome::Completed(result))
    }

    fn spin_chunk(&self, chunk: u64, count: u64) -> StatsResult<RunAccumulator> {
        match self.sim.seed {
            Some(seed) => {
                let mut rng = ChaCha8Rng::seed_from_u64(seed);
                // Distinct stream per (batch, chunk)
                rng.set_stream(self.batches * self.sim.chunk_count() + chunk);
                self.spin_many(&mut rng, count)
            }
            None => self.spin_many(&mut OsRng, count),
        }
    }

    fn spin_many<R: TryRngCore + ?Sized>(
        &self,
        rng: &mut R,
        count: u64,
    ) -> StatsResult<RunAccumulator> {
        let mut acc = RunAccumulator::default();
        for _ in 0..count {
            let result = spin_with(rng, &self.config, self.bet)?;
            acc.record(self.cost_per_spin, result.total_win);
        }
        Ok(acc)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fm_slot::{GameSettings, PaylinePattern, PaytableEntry, SlotError, SymbolDef};

    fn always_win() -> MachineConfig {
        MachineConfig {
            name: "Always Win".into(),
            reels: 3,
            rows: 1,
            strip_length: 2,
            symbols: vec![SymbolDef::regular("a", "A"), SymbolDef::wild("w", "W")],
            reel_strips: vec![vec!["a".into(), "w".into()]; 3],
            paylines: vec![PaylinePattern::straight(1, 0, 3)],
            paytable: vec![
                PaytableEntry::new("a", &[(3, 3)]),
                PaytableEntry::new("w", &[(3, 3)]),
            ],
            min_match_count: 3,
            settings: GameSettings {
                default_bet: 2,
                ..Default::default()
            },
        }
    }

    fn sim(batch_size: usize) -> SimConfig {
        SimConfig::sequential().with_batch_size(batch_size).with_seed(1)
    }

    #[test]
    fn test_zero_iterations_rejected() {
        let err = SimulationRun::new(always_win(), 0, SimConfig::default()).unwrap_err();
        assert!(matches!(err, StatsError::InvalidIterations(0)));
    }

    #[test]
    fn test_oversized_default_bet_rejected() {
        let mut config = always_win();
        config.settings.default_bet = u64::MAX / 2;
        let err = SimulationRun::new(config, 10, SimConfig::default()).unwrap_err();
        assert!(matches!(err, StatsError::Slot(SlotError::BetTooLarge { .. })));
    }

    #[test]
    fn test_last_batch_is_shortened() {
        let mut run = SimulationRun::new(always_win(), 25, sim(10)).unwrap();
        assert_eq!(run.run_batch().unwrap().spins_done, 10);
        assert_eq!(run.run_batch().unwrap().spins_done, 20);
        let last = run.run_batch().unwrap();
        assert_eq!(last.spins_done, 25);
        assert_eq!(last.fraction_complete, 1.0);
        assert!(run.is_finished());
    }

    #[test]
    fn test_completed_totals() {
        let run = SimulationRun::new(always_win(), 1000, sim(64)).unwrap();
        let outcome = run.run(|_| ControlFlow::Continue(())).unwrap();
        let RunOutcome::Completed(result) = outcome else {
            panic!("expected completion");
        };
        // Every spin pays 3 x bet 2 on one line costing 2
        assert_eq!(result.total_cost, 2000);
        assert_eq!(result.total_won, 6000);
        assert_eq!(result.max_win, 6);
        assert_eq!(result.rtp_percent, 300.0);
        assert_eq!(result.hit_frequency_percent, 100.0);
    }

    #[test]
    fn test_progress_is_monotonic() {
        let run = SimulationRun::new(always_win(), 1000, sim(90)).unwrap();
        let mut seen = Vec::new();
        run.run(|p| {
            seen.push(p);
            ControlFlow::Continue(())
        })
        .unwrap();

        assert_eq!(seen.len(), 12);
        assert!(seen.windows(2).all(|w| w[0].spins_done < w[1].spins_done));
        assert!(seen.iter().all(|p| (0.0..=1.0).contains(&p.fraction_complete)));
        assert_eq!(seen.last().map(|p| p.fraction_complete), Some(1.0));
    }

    #[test]
    fn test_break_cancels_without_result() {
        let run = SimulationRun::new(always_win(), 1000, sim(10)).unwrap();
        let mut batches = 0;
        let outcome = run
            .run(|_| {
                batches += 1;
                ControlFlow::Break(())
            })
            .unwrap();
        assert_eq!(outcome, RunOutcome::Cancelled);
        assert_eq!(batches, 1);
    }

    #[test]
    fn test_seeded_parallel_is_reproducible() {
        let mut config = always_win();
        config.paytable = vec![PaytableEntry::new("a", &[(3, 3)])];
        let sim = SimConfig {
            batch_size: 500,
            chunks: 4,
            parallel: true,
            seed: Some(99),
            ..Default::default()
        };

        let outcome = |sim: SimConfig| {
            SimulationRun::new(config.clone(), 5000, sim)
                .unwrap()
                .run(|_| ControlFlow::Continue(()))
                .unwrap()
        };
        assert_eq!(outcome(sim.clone()), outcome(sim));
    }

    #[test]
    fn test_spin_error_aborts_run() {
        let mut config = always_win();
        config.strip_length = 0;
        let run = SimulationRun::new(config, 100, sim(10)).unwrap();
        let err = run.run(|_| ControlFlow::Continue(())).unwrap_err();
        assert!(matches!(err, StatsError::Slot(SlotError::InvalidStripLength)));
    }
}
