//! Built-in machine templates

use serde::{Deserialize, Serialize};

use crate::config::{GameSettings, MachineConfig};
use crate::paytable::{PaylinePattern, PaytableEntry};
use crate::symbols::{SymbolDef, cyclic_strip};

/// A ready-to-run machine with display metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MachinePreset {
    pub id: String,
    pub name: String,
    pub description: String,
    pub config: MachineConfig,
}

/// Strip order shared by all templates, wild first
const STRIP_ORDER: [&str; 9] = [
    "sym_star",
    "sym_seven",
    "sym_bell",
    "sym_watermelon",
    "sym_grapes",
    "sym_strawberry",
    "sym_pear",
    "sym_plum",
    "sym_orange",
];

/// Get all built-in presets
pub fn presets() -> Vec<MachinePreset> {
    vec![classic_3x3(), vegas_5x3(), mega_5x4()]
}

/// Look up a preset by id
pub fn preset(id: &str) -> Option<MachinePreset> {
    presets().into_iter().find(|p| p.id == id)
}

/// Classic 3×3: three reels and five lines, three-of-a-kind pays only
pub fn classic_3x3() -> MachinePreset {
    let paylines = vec![
        PaylinePattern::straight(1, 1, 3),
        PaylinePattern::straight(2, 0, 3),
        PaylinePattern::straight(3, 2, 3),
        PaylinePattern::new(4, vec![0, 1, 2]),
        PaylinePattern::new(5, vec![2, 1, 0]),
    ];

    MachinePreset {
        id: "classic_3x3".to_string(),
        name: "Classic 3×3".to_string(),
        description: "Traditional 3-reel, 3-row fruit machine with 5 paylines.".to_string(),
        config: machine(
            "Classic Fruit Machine",
            (3, 3, 24),
            paylines,
            &[
                [200, 0, 0],
                [80, 0, 0],
                [40, 0, 0],
                [80, 0, 0],
                [80, 0, 0],
                [80, 0, 0],
                [40, 0, 0],
                [40, 0, 0],
                [40, 0, 0],
            ],
            GameSettings {
                start_credits: 1000,
                bet_options: vec![1, 2, 5, 10, 20],
                default_bet: 1,
            },
        ),
    }
}

/// Vegas 5×3 with twenty zig-zag lines
pub fn vegas_5x3() -> MachinePreset {
    MachinePreset {
        id: "vegas_5x3".to_string(),
        name: "Vegas 5×3".to_string(),
        description: "5-reel, 3-row layout with 20 paylines and higher payouts.".to_string(),
        config: machine(
            "Vegas Video Slot",
            (5, 3, 30),
            diagonal_paylines(20, 5, 3),
            &[
                [100, 500, 2000],
                [50, 200, 1000],
                [25, 100, 500],
                [25, 100, 500],
                [25, 100, 500],
                [25, 100, 500],
                [10, 40, 150],
                [10, 40, 150],
                [10, 40, 150],
            ],
            GameSettings {
                start_credits: 5000,
                bet_options: vec![1, 5, 10, 25, 50],
                default_bet: 1,
            },
        ),
    }
}

/// Mega 5×4 with thirty lines over four rows
pub fn mega_5x4() -> MachinePreset {
    MachinePreset {
        id: "mega_5x4".to_string(),
        name: "Mega 5×4".to_string(),
        description: "5 reels × 4 rows with 30 paylines.".to_string(),
        config: machine(
            "Mega Slots",
            (5, 4, 36),
            diagonal_paylines(30, 5, 4),
            &[
                [150, 750, 5000],
                [75, 300, 2000],
                [40, 150, 750],
                [40, 150, 750],
                [40, 150, 750],
                [40, 150, 750],
                [15, 60, 250],
                [15, 60, 250],
                [15, 60, 250],
            ],
            GameSettings {
                start_credits: 10000,
                bet_options: vec![1, 5, 10, 25, 50, 100],
                default_bet: 1,
            },
        ),
    }
}

/// Line `i` visits row `(i + reel) % rows` on each reel
fn diagonal_paylines(count: u32, reels: usize, rows: usize) -> Vec<PaylinePattern> {
    (0..count)
        .map(|i| {
            let cells = (0..reels).map(|r| (i as usize + r) % rows).collect();
            PaylinePattern::new(i + 1, cells)
        })
        .collect()
}

/// Assemble a template. `pays[s]` holds the 3/4/5-of-a-kind payouts for
/// `STRIP_ORDER[s]`; zero means no entry for that count.
fn machine(
    name: &str,
    (reels, rows, strip_length): (usize, usize, usize),
    paylines: Vec<PaylinePattern>,
    pays: &[[u64; 3]; 9],
    settings: GameSettings,
) -> MachineConfig {
    let symbols = STRIP_ORDER
        .iter()
        .map(|&id| {
            let name = display_name(id);
            if id == "sym_star" {
                SymbolDef::wild(id, name)
            } else {
                SymbolDef::regular(id, name)
            }
        })
        .collect();

    let paytable = STRIP_ORDER
        .iter()
        .zip(pays)
        .map(|(&id, row)| {
            let counts: Vec<(u32, u64)> = (3u32..)
                .zip(row.iter().copied())
                .filter(|&(_, pay)| pay > 0)
                .collect();
            PaytableEntry::new(id, &counts)
        })
        .collect();

    MachineConfig {
        name: name.to_string(),
        reels,
        rows,
        strip_length,
        symbols,
        reel_strips: vec![cyclic_strip(&STRIP_ORDER, strip_length); reels],
        paylines,
        paytable,
        min_match_count: 3,
        settings,
    }
}

fn display_name(id: &str) -> String {
    let bare = id.trim_start_matches("sym_");
    let mut chars = bare.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
