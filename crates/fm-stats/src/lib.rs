//! # fm-stats: Monte Carlo RTP Simulator for FruitForge Studio
//!
//! Estimates return-to-player and hit frequency for a [`fm_slot::MachineConfig`]
//! by spinning it many times, in batches, off the host's thread.
//!
//! ## Architecture
//!
//! ```text
//! Host ──HostCommand──▶ StatisticsWorker (thread "fm-stats-worker")
//!                              │
//!                              v
//!                       SimulationRun ── rayon chunks ──▶ RunAccumulator
//!                              │  (per batch)
//!                              v
//! Host ◀──DriverEvent── progress … progress, result | error
//! ```
//!
//! ## Guarantees
//!
//! - Stop takes effect at the next batch boundary
//! - Progress events arrive in increasing order of spins processed
//! - A result, if any, is the last event of its run; a stopped run has none

pub mod accumulator;
pub mod config;
pub mod error;
pub mod protocol;
pub mod run;
pub mod worker;

pub use accumulator::*;
pub use config::*;
pub use error::*;
pub use protocol::*;
pub use run::*;
pub use worker::*;
