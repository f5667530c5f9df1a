//! Exact paytable analysis by full stop enumeration

use serde::{Deserialize, Serialize};

use crate::config::MachineConfig;
use crate::error::{SlotError, SlotResult};
use crate::spin::SpinResult;

/// Default ceiling on enumerated stop combinations
pub const DEFAULT_COMBINATION_LIMIT: u64 = 5_000_000;

/// Analytic statistics over every equally likely stop combination
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExactAnalysis {
    /// Expected return, percent of amount wagered
    pub rtp_percent: f64,
    /// Percent of combinations with a non-zero win
    pub hit_frequency_percent: f64,
    /// Largest single-spin win
    pub max_win: u64,
    /// Sum of spin costs over all combinations
    pub total_cost: u64,
    /// Sum of wins over all combinations
    pub total_won: u64,
    /// Number of stop combinations evaluated
    pub combinations: u64,
}

/// Enumerate all `strip_length ^ reels` stop combinations
pub fn analyze(config: &MachineConfig, bet: u64) -> SlotResult<ExactAnalysis> {
    analyze_with_limit(config, bet, DEFAULT_COMBINATION_LIMIT)
}

/// Enumerate all stop combinations, refusing above `limit`
pub fn analyze_with_limit(
    config: &MachineConfig,
    bet: u64,
    limit: u64,
) -> SlotResult<ExactAnalysis> {
    config.check_bet(bet)?;
    if config.strip_length == 0 {
        return Err(SlotError::InvalidStripLength);
    }

    let too_many = |combinations: u128| SlotError::TooManyCombinations {
        combinations,
        limit: limit as u128,
    };
    let combinations = u32::try_from(config.reels)
        .ok()
        .and_then(|reels| (config.strip_length as u128).checked_pow(reels))
        .ok_or_else(|| too_many(u128::MAX))?;
    if combinations > limit as u128 {
        return Err(too_many(combinations));
    }
    let combinations = combinations as u64;

    let overflow = || SlotError::BetTooLarge { bet };
    let cost_per_spin = config.cost_per_spin(bet);
    let total_cost = cost_per_spin
        .checked_mul(combinations)
        .ok_or_else(overflow)?;
    let mut total_won = 0u64;
    let mut hits = 0u64;
    let mut max_win = 0u64;
    let mut stops = vec![0usize; config.reels];

    for _ in 0..combinations {
        let result = SpinResult::evaluate(config, stops.clone(), bet);
        total_won = total_won
            .checked_add(result.total_win)
            .ok_or_else(overflow)?;
        if result.is_win() {
            hits += 1;
            max_win = max_win.max(result.total_win);
        }

        // Odometer step
        for stop in stops.iter_mut() {
            *stop += 1;
            if *stop < config.strip_length {
                break;
            }
            *stop = 0;
        }
    }

    let analysis = ExactAnalysis {
        rtp_percent: percent(total_won, total_cost),
        hit_frequency_percent: percent(hits, combinations),
        max_win,
        total_cost,
        total_won,
        combinations,
    };

    log::debug!(
        "Exact analysis of '{}': {} combinations, RTP {:.4}%, hit {:.4}%",
        config.name,
        combinations,
        analysis.rtp_percent,
        analysis.hit_frequency_percent
    );

    Ok(analysis)
}

fn percent(part: u64, whole: u64) -> f64 {
    if whole > 0 {
        part as f64 / whole as f64 * 100.0
    } else {
        0.0
    }
}
