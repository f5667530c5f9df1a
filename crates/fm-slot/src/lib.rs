//! # fm-slot: Payline Slot Engine for FruitForge Studio
//!
//! Evaluates configurable N-reel × M-row payline slot machines: circular reel
//! strips, wild substitution, per-symbol paytables and an optional reduced
//! payout for two-symbol runs.
//!
//! ## Features
//!
//! - **CSPRNG Stops**: Uniform stop positions from the operating system RNG
//! - **Payline Evaluation**: Left-to-right runs with wild substitution
//! - **Exact Analysis**: Analytic RTP by enumerating every stop combination
//! - **Validation**: Category-by-category config checks before play
//! - **Presets**: Classic, Vegas and Mega fruit machine templates
//!
//! ## Architecture
//!
//! ```text
//! MachineConfig
//!     │
//!     ├── SymbolDef (wild flag)
//!     ├── reel strips (circular)
//!     ├── PaylinePattern (row per reel)
//!     └── PaytableEntry (match count → pay)
//!           │
//!           v
//!     rng::generate_stops → grid::build_grid → paytable::evaluate_paylines
//!           │
//!           v
//!     SpinResult { stops, grid, wins, total_win }
//! ```

pub mod config;
pub mod error;
pub mod grid;
pub mod math;
pub mod paytable;
pub mod presets;
pub mod rng;
pub mod spin;
pub mod symbols;
pub mod validator;

pub use config::*;
pub use error::*;
pub use grid::*;
pub use math::*;
pub use paytable::*;
pub use presets::{MachinePreset, preset, presets};
pub use rng::*;
pub use spin::*;
pub use symbols::*;
pub use validator::*;
