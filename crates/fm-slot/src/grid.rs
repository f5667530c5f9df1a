//! Visible grid construction

use crate::config::MachineConfig;
use crate::symbols::{EMPTY_SYMBOL, symbol_at};

/// Visible symbols, `grid[row][reel]`
pub type Grid = Vec<Vec<String>>;

/// Slide a `rows`-high window down each circular strip, starting at its stop.
///
/// `grid[row][reel] = reel_strips[reel][(stops[reel] + row) % strip_len]`.
/// Missing strips, empty strips and missing stops produce empty cells.
pub fn build_grid(config: &MachineConfig, stops: &[usize]) -> Grid {
    (0..config.rows)
        .map(|row| {
            (0..config.reels)
                .map(|reel| {
                    let strip = config.reel_strips.get(reel).map(Vec::as_slice);
                    match stops.get(reel) {
                        Some(&stop) => symbol_at(strip, stop + row).to_string(),
                        None => EMPTY_SYMBOL.to_string(),
                    }
                })
                .collect()
        })
        .collect()
}
