//! Spin orchestration and spin result

use rand::TryRngCore;
use rand::rngs::OsRng;
use serde::{Deserialize, Serialize};

use crate::config::MachineConfig;
use crate::error::SlotResult;
use crate::grid::{Grid, build_grid};
use crate::paytable::{WinResult, evaluate_paylines, total_win};
use crate::rng::generate_stops_with;

/// Complete result of one spin
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpinResult {
    /// Stop position per reel
    pub stops: Vec<usize>,
    /// Visible grid, `grid[row][reel]`
    pub grid: Grid,
    /// Every paying line
    pub wins: Vec<WinResult>,
    /// Sum of all line payouts
    pub total_win: u64,
}

impl SpinResult {
    /// Evaluate a grid for already-drawn stops
    pub fn evaluate(config: &MachineConfig, stops: Vec<usize>, bet: u64) -> Self {
        let grid = build_grid(config, &stops);
        let wins = evaluate_paylines(config, &grid, bet);
        let total_win = total_win(&wins);
        Self {
            stops,
            grid,
            wins,
            total_win,
        }
    }

    /// Check if this is a winning spin
    pub fn is_win(&self) -> bool {
        self.total_win > 0
    }
}

/// Spin once using the OS CSPRNG
pub fn spin(config: &MachineConfig, bet: u64) -> SlotResult<SpinResult> {
    spin_with(&mut OsRng, config, bet)
}

/// Spin once drawing stops from `rng`.
///
/// Entropy failures propagate; a broken spin never reports a zero win.
/// Bets are checked with [`MachineConfig::check_bet`] before any draw.
pub fn spin_with<R: TryRngCore + ?Sized>(
    rng: &mut R,
    config: &MachineConfig,
    bet: u64,
) -> SlotResult<SpinResult> {
    config.check_bet(bet)?;
    let stops = generate_stops_with(rng, config.reels, config.strip_length)?;
    Ok(SpinResult::evaluate(config, stops, bet))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameSettings;
    use crate::error::SlotError;
    use crate::paytable::{PaylinePattern, PaytableEntry};
    use crate::symbols::SymbolDef;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn single_symbol_config() -> MachineConfig {
        MachineConfig {
            name: "Always Win".into(),
            reels: 3,
            rows: 2,
            strip_length: 4,
            symbols: vec![SymbolDef::regular("sym_seven", "Seven")],
            reel_strips: vec![vec!["sym_seven".to_string(); 4]; 3],
            paylines: vec![
                PaylinePattern::straight(1, 0, 3),
                PaylinePattern::straight(2, 1, 3),
            ],
            paytable: vec![PaytableEntry::new("sym_seven", &[(3, 25)])],
            min_match_count: 3,
            settings: GameSettings::default(),
        }
    }

    #[test]
    fn test_spin_total_is_sum_of_wins() {
        let config = single_symbol_config();
        let result = spin(&config, 2).unwrap();
        assert_eq!(result.stops.len(), 3);
        assert_eq!(result.grid.len(), 2);
        assert_eq!(result.wins.len(), 2);
        assert_eq!(result.total_win, 100);
        assert!(result.is_win());
    }

    #[test]
    fn test_seeded_spin_is_reproducible() {
        let config = single_symbol_config();
        let a = spin_with(&mut StdRng::seed_from_u64(9), &config, 1).unwrap();
        let b = spin_with(&mut StdRng::seed_from_u64(9), &config, 1).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_zero_bet_rejected() {
        let config = single_symbol_config();
        assert!(matches!(spin(&config, 0), Err(SlotError::InvalidBet)));
    }

    #[test]
    fn test_oversized_bet_rejected() {
        // Two lines, best line pays 25
        let config = single_symbol_config();
        let largest = u64::MAX / 50;
        assert_eq!(spin(&config, largest).unwrap().total_win, largest * 50);
        assert!(matches!(
            spin(&config, largest + 1),
            Err(SlotError::BetTooLarge { .. })
        ));
        assert!(matches!(
            spin(&config, u64::MAX),
            Err(SlotError::BetTooLarge { bet: u64::MAX })
        ));
    }

    #[test]
    fn test_evaluate_saturates_on_huge_bet() {
        let config = single_symbol_config();
        let result = SpinResult::evaluate(&config, vec![0, 0, 0], u64::MAX / 2);
        assert_eq!(result.wins.len(), 2);
        assert_eq!(result.total_win, u64::MAX);
    }

    #[test]
    fn test_zero_strip_length_propagates() {
        let mut config = single_symbol_config();
        config.strip_length = 0;
        assert!(matches!(spin(&config, 1), Err(SlotError::InvalidStripLength)));
    }
}
