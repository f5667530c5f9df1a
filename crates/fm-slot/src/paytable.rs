//! Paylines, paytable and win calculation

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::config::MachineConfig;
use crate::symbols::EMPTY_SYMBOL;

/// A payline definition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaylinePattern {
    /// Unique payline ID
    pub id: u32,
    /// Row index for each reel (e.g., [0, 1, 2] for a diagonal)
    pub cells: Vec<usize>,
}

impl PaylinePattern {
    /// Create a payline from explicit row positions
    pub fn new(id: u32, cells: Vec<usize>) -> Self {
        Self { id, cells }
    }

    /// Create a straight line (same row across all reels)
    pub fn straight(id: u32, row: usize, reel_count: usize) -> Self {
        Self {
            id,
            cells: vec![row; reel_count],
        }
    }
}

/// Reduced payout for a two-symbol run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TwoSymbolStrategy {
    pub enabled: bool,
    pub payout: u64,
}

/// Paytable entry: payouts by match count for one symbol
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaytableEntry {
    /// Paying symbol ID
    pub symbol_id: String,
    /// Match count -> pay value (multiplied by bet)
    #[serde(deserialize_with = "match_counts::deserialize")]
    pub payouts: BTreeMap<u32, u64>,
    /// Optional reduced payout for 2-symbol runs
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub two_symbol_strategy: Option<TwoSymbolStrategy>,
}

impl PaytableEntry {
    /// Create an entry from (match count, pay value) pairs
    pub fn new(symbol_id: impl Into<String>, pays: &[(u32, u64)]) -> Self {
        Self {
            symbol_id: symbol_id.into(),
            payouts: pays.iter().copied().collect(),
            two_symbol_strategy: None,
        }
    }

    /// Attach a reduced 2-symbol payout
    pub fn with_two_symbol_payout(mut self, payout: u64) -> Self {
        self.two_symbol_strategy = Some(TwoSymbolStrategy {
            enabled: true,
            payout,
        });
        self
    }

    /// Standard table value for an exact match count. Zero counts as absent.
    pub fn pay(&self, match_count: u32) -> Option<u64> {
        self.payouts.get(&match_count).copied().filter(|&p| p > 0)
    }

    /// Reduced 2-symbol override, if enabled with a positive payout
    pub fn two_symbol_payout(&self) -> Option<u64> {
        self.two_symbol_strategy
            .filter(|s| s.enabled && s.payout > 0)
            .map(|s| s.payout)
    }
}

/// A win result on a single payline
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WinResult {
    /// Payline ID
    pub payline_id: u32,
    /// Winning symbol ID
    pub symbol_id: String,
    /// Number of matching positions from reel 0
    pub match_count: u32,
    /// Win amount (bet × pay value)
    pub payout: u64,
}

/// Sum of all payouts
pub fn total_win(wins: &[WinResult]) -> u64 {
    wins.iter().fold(0u64, |sum, w| sum.saturating_add(w.payout))
}

/// Evaluate every payline on a grid (`grid[row][reel]`).
///
/// Lines are independent: overlapping paylines can each pay for the same run.
pub fn evaluate_paylines(config: &MachineConfig, grid: &[Vec<String>], bet: u64) -> Vec<WinResult> {
    config
        .paylines
        .iter()
        .filter_map(|payline| evaluate_line(config, grid, payline, bet))
        .collect()
}

/// Symbols along a payline, left to right. Reels without a cell are skipped,
/// cells outside the grid read as empty.
fn line_symbols<'g>(
    config: &MachineConfig,
    grid: &'g [Vec<String>],
    payline: &PaylinePattern,
) -> Vec<&'g str> {
    (0..config.reels)
        .filter_map(|reel| {
            let row = *payline.cells.get(reel)?;
            Some(
                grid.get(row)
                    .and_then(|r| r.get(reel))
                    .map(String::as_str)
                    .unwrap_or(EMPTY_SYMBOL),
            )
        })
        .collect()
}

fn evaluate_line(
    config: &MachineConfig,
    grid: &[Vec<String>],
    payline: &PaylinePattern,
    bet: u64,
) -> Option<WinResult> {
    let line = line_symbols(config, grid, payline);

    // Wilds never become the base symbol
    let base = line
        .iter()
        .copied()
        .find(|&s| s != EMPTY_SYMBOL && !config.is_wild(s));

    match base {
        Some(base) => evaluate_base_line(config, payline, &line, base, bet),
        None => evaluate_wild_line(config, payline, &line, bet),
    }
}

fn evaluate_base_line(
    config: &MachineConfig,
    payline: &PaylinePattern,
    line: &[&str],
    base: &str,
    bet: u64,
) -> Option<WinResult> {
    let match_count = line
        .iter()
        .take_while(|&&s| s == base || config.is_wild(s))
        .count() as u32;

    let entry = config.paytable_entry(base)?;

    // Standard table first; the reduced rule only fills a missing 2-count
    let pay = match entry.pay(match_count) {
        Some(pay) => pay,
        None if match_count == 2 => entry.two_symbol_payout()?,
        None => return None,
    };

    Some(WinResult {
        payline_id: payline.id,
        symbol_id: base.to_string(),
        match_count,
        payout: pay.saturating_mul(bet),
    })
}

fn evaluate_wild_line(
    config: &MachineConfig,
    payline: &PaylinePattern,
    line: &[&str],
    bet: u64,
) -> Option<WinResult> {
    if line.is_empty() || !line.iter().all(|&s| config.is_wild(s)) {
        return None;
    }

    // First wild-owned entry in table order, even with several wild symbols
    let entry = config.wild_paytable_entry()?;
    let match_count = line.len() as u32;
    let pay = entry.pay(match_count)?;

    Some(WinResult {
        payline_id: payline.id,
        symbol_id: entry.symbol_id.clone(),
        match_count,
        payout: pay.saturating_mul(bet),
    })
}

/// JSON object keys are strings. Buffered deserializers (tagged enums) do not
/// coerce them to integers, so match counts accept either form.
mod match_counts {
    use std::collections::BTreeMap;
    use std::fmt;

    use serde::Deserialize;
    use serde::de::{self, Deserializer, MapAccess, Visitor};

    struct MatchCount(u32);

    impl<'de> Deserialize<'de> for MatchCount {
        fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
            struct CountVisitor;

            impl<'de> Visitor<'de> for CountVisitor {
                type Value = MatchCount;

                fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                    f.write_str("a match count")
                }

                fn visit_u64<E: de::Error>(self, v: u64) -> Result<MatchCount, E> {
                    u32::try_from(v).map(MatchCount).map_err(E::custom)
                }

                fn visit_i64<E: de::Error>(self, v: i64) -> Result<MatchCount, E> {
                    u32::try_from(v).map(MatchCount).map_err(E::custom)
                }

                fn visit_str<E: de::Error>(self, v: &str) -> Result<MatchCount, E> {
                    v.parse().map(MatchCount).map_err(E::custom)
                }
            }

            deserializer.deserialize_any(CountVisitor)
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<BTreeMap<u32, u64>, D::Error> {
        struct PayoutsVisitor;

        impl<'de> Visitor<'de> for PayoutsVisitor {
            type Value = BTreeMap<u32, u64>;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of match count to payout")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
                let mut payouts = BTreeMap::new();
                while let Some((MatchCount(count), pay)) = map.next_entry::<MatchCount, u64>()? {
                    payouts.insert(count, pay);
                }
                Ok(payouts)
            }
        }

        deserializer.deserialize_map(PayoutsVisitor)
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use crate::config::GameSettings;
    use crate::symbols::SymbolDef;
    use proptest::prelude::*;

    const CHERRY: &str = "sym_cherry";
    const BAR: &str = "sym_bar";
    const WILD: &str = "sym_wild";

    fn machine(
        reels: usize,
        rows: usize,
        lines: Vec<Vec<usize>>,
        two: Option<u64>,
    ) -> MachineConfig {
        let mut cherry = PaytableEntry::new(CHERRY, &[(3, 10), (4, 40)]);
        if let Some(pay) = two {
            cherry = cherry.with_two_symbol_payout(pay);
        }
        MachineConfig {
            name: "Random Lines".into(),
            reels,
            rows,
            strip_length: 1,
            symbols: vec![
                SymbolDef::regular(CHERRY, "Cherry"),
                SymbolDef::regular(BAR, "Bar"),
                SymbolDef::wild(WILD, "Wild"),
            ],
            reel_strips: Vec::new(),
            paylines: lines
                .into_iter()
                .enumerate()
                .map(|(i, cells)| PaylinePattern::new(i as u32 + 1, cells))
                .collect(),
            paytable: vec![
                cherry,
                PaytableEntry::new(BAR, &[(2, 3), (3, 20)]),
                PaytableEntry::new(WILD, &[(3, 100), (5, 500)]),
            ],
            min_match_count: 3,
            settings: GameSettings::default(),
        }
    }

    fn symbol() -> impl Strategy<Value = String> {
        prop::sample::select(vec![CHERRY, BAR, WILD, EMPTY_SYMBOL]).prop_map(String::from)
    }

    /// A machine with random lines (some reading past the last row) and a
    /// random grid for it
    fn machine_and_grid() -> impl Strategy<Value = (MachineConfig, Vec<Vec<String>>)> {
        (1usize..6, 1usize..4).prop_flat_map(|(reels, rows)| {
            let grid = prop::collection::vec(prop::collection::vec(symbol(), reels), rows);
            let lines = prop::collection::vec(prop::collection::vec(0..rows + 1, reels), 1..6);
            let two = prop::option::of(0u64..5);
            (grid, lines, two)
                .prop_map(move |(grid, lines, two)| (machine(reels, rows, lines, two), grid))
        })
    }

    proptest! {
        /// Same grid, same bet, same wins
        #[test]
        fn prop_evaluation_is_idempotent((config, grid) in machine_and_grid(), bet in 1u64..10_000) {
            prop_assert_eq!(
                evaluate_paylines(&config, &grid, bet),
                evaluate_paylines(&config, &grid, bet)
            );
        }

        /// Each payout is its table value times the bet
        #[test]
        fn prop_payout_scales_linearly_with_bet(
            (config, grid) in machine_and_grid(),
            bet in 1u64..10_000,
        ) {
            let unit = evaluate_paylines(&config, &grid, 1);
            let wins = evaluate_paylines(&config, &grid, bet);
            prop_assert_eq!(wins.len(), unit.len());
            for (win, one) in wins.iter().zip(&unit) {
                prop_assert_eq!(win.payout, one.payout * bet);
                prop_assert_eq!(win.payout % bet, 0);
                prop_assert_eq!(win.payline_id, one.payline_id);
            }
        }

        /// At most one win per line, in line order, each a real run
        #[test]
        fn prop_wins_are_well_formed((config, grid) in machine_and_grid(), bet in 1u64..10_000) {
            let wins = evaluate_paylines(&config, &grid, bet);
            prop_assert!(wins.len() <= config.paylines.len());
            prop_assert!(wins.windows(2).all(|w| w[0].payline_id < w[1].payline_id));
            for win in &wins {
                prop_assert!(win.payout > 0);
                prop_assert!(win.match_count >= 2);
                prop_assert!(win.match_count as usize <= config.reels);
                prop_assert!(win.symbol_id != EMPTY_SYMBOL);
            }
            prop_assert_eq!(total_win(&wins), wins.iter().map(|w| w.payout).sum::<u64>());
        }
    }
}
