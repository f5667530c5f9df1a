//! Symbol definitions and reel strips

use serde::{Deserialize, Serialize};

/// Strip cell with no symbol placed. Never matches, never substitutes.
pub const EMPTY_SYMBOL: &str = "";

/// A symbol definition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SymbolDef {
    /// Unique symbol ID (e.g., "sym_cherry")
    pub id: String,
    /// Display name
    #[serde(default)]
    pub name: String,
    /// Wild - substitutes for any other symbol on a line
    #[serde(default)]
    pub is_wild: bool,
}

impl SymbolDef {
    /// Create a regular symbol
    pub fn regular(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            is_wild: false,
        }
    }

    /// Create a wild symbol
    pub fn wild(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            is_wild: true,
        }
    }
}

/// Get symbol at position on a circular strip.
///
/// Missing or empty strips yield [`EMPTY_SYMBOL`].
pub fn symbol_at(strip: Option<&[String]>, position: usize) -> &str {
    match strip {
        Some(symbols) if !symbols.is_empty() => &symbols[position % symbols.len()],
        _ => EMPTY_SYMBOL,
    }
}

/// Build a strip by cycling through `symbol_ids` until `length` cells are filled
pub fn cyclic_strip(symbol_ids: &[&str], length: usize) -> Vec<String> {
    if symbol_ids.is_empty() {
        return vec![EMPTY_SYMBOL.to_string(); length];
    }
    (0..length)
        .map(|i| symbol_ids[i % symbol_ids.len()].to_string())
        .collect()
}
