//! Machine configuration

use serde::{Deserialize, Serialize};

use crate::error::{SlotError, SlotResult};
use crate::paytable::{PaylinePattern, PaytableEntry};
use crate::symbols::{EMPTY_SYMBOL, SymbolDef};

/// Default smallest match length on the standard payout path
pub const DEFAULT_MIN_MATCH_COUNT: u32 = 3;

fn default_min_match_count() -> u32 {
    DEFAULT_MIN_MATCH_COUNT
}

/// Machine shape and rules.
///
/// Read-only input to every spin and every statistics run. The engine assumes
/// it already passed [`crate::validator::validate`] and degrades gracefully
/// (empty cells) rather than failing when it did not.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MachineConfig {
    /// Display name
    #[serde(default)]
    pub name: String,
    /// Number of reels (columns)
    pub reels: usize,
    /// Number of visible rows per reel
    pub rows: usize,
    /// Stop positions drawn per reel
    pub strip_length: usize,
    /// Symbol definitions, in display order
    pub symbols: Vec<SymbolDef>,
    /// `reel_strips[reel]` = symbol IDs on that reel's circular strip
    pub reel_strips: Vec<Vec<String>>,
    /// Payline patterns
    pub paylines: Vec<PaylinePattern>,
    /// Paytable, searched in order
    pub paytable: Vec<PaytableEntry>,
    /// Smallest match length meant for the standard payout path.
    ///
    /// Not consulted during evaluation; the validator warns about standard
    /// entries for counts above 2 and below this value.
    #[serde(default = "default_min_match_count")]
    pub min_match_count: u32,
    /// Credits and bet settings
    #[serde(default)]
    pub settings: GameSettings,
}

impl MachineConfig {
    /// Check whether a symbol ID belongs to a wild symbol.
    ///
    /// The empty sentinel is never wild.
    pub fn is_wild(&self, symbol_id: &str) -> bool {
        symbol_id != EMPTY_SYMBOL
            && self
                .symbols
                .iter()
                .any(|s| s.is_wild && s.id == symbol_id)
    }

    /// Get symbol definition by ID
    pub fn symbol(&self, symbol_id: &str) -> Option<&SymbolDef> {
        self.symbols.iter().find(|s| s.id == symbol_id)
    }

    /// First paytable entry for a symbol, in table order
    pub fn paytable_entry(&self, symbol_id: &str) -> Option<&PaytableEntry> {
        self.paytable.iter().find(|e| e.symbol_id == symbol_id)
    }

    /// First paytable entry owned by any wild symbol, in table order
    pub fn wild_paytable_entry(&self) -> Option<&PaytableEntry> {
        self.paytable.iter().find(|e| self.is_wild(&e.symbol_id))
    }

    /// Bet per line used by simulations (falls back to 1 when unset)
    pub fn simulation_bet(&self) -> u64 {
        if self.settings.default_bet > 0 {
            self.settings.default_bet
        } else {
            1
        }
    }

    /// Cost of one spin: bet on every payline.
    ///
    /// Saturates; [`MachineConfig::check_bet`] rejects bets where it would.
    pub fn cost_per_spin(&self, bet: u64) -> u64 {
        bet.saturating_mul(self.paylines.len() as u64)
    }

    /// Largest table value a single line can pay at bet 1
    pub fn max_line_pay(&self) -> u64 {
        self.paytable
            .iter()
            .flat_map(|e| e.payouts.values().copied().chain(e.two_symbol_payout()))
            .max()
            .unwrap_or(0)
    }

    /// Check that a bet is positive and that both the spin cost and the
    /// best possible spin win fit in a `u64`.
    pub fn check_bet(&self, bet: u64) -> SlotResult<()> {
        if bet == 0 {
            return Err(SlotError::InvalidBet);
        }
        let lines = self.paylines.len() as u64;
        let cost = bet.checked_mul(lines);
        let best_spin = self
            .max_line_pay()
            .checked_mul(bet)
            .and_then(|line| line.checked_mul(lines));
        match (cost, best_spin) {
            (Some(_), Some(_)) => Ok(()),
            _ => Err(SlotError::BetTooLarge { bet }),
        }
    }
}

/// Credits and bet settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GameSettings {
    /// Credits a new session starts with
    pub start_credits: u64,
    /// Selectable bets per line
    pub bet_options: Vec<u64>,
    /// Bet per line used when none is chosen
    pub default_bet: u64,
}

impl Default for GameSettings {
    fn default() -> Self {
        Self {
            start_credits: 1000,
            bet_options: vec![1, 2, 5, 10, 20],
            default_bet: 1,
        }
    }
}
