//! Configuration validator
//!
//! Rejects malformed machines before they reach the engine. The engine itself
//! never calls this; hosts run it when a config is loaded or edited.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::config::MachineConfig;
use crate::symbols::EMPTY_SYMBOL;

/// Validation status, ordered from best to worst
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValidationStatus {
    Valid,
    Warning,
    Error,
}

impl Default for ValidationStatus {
    fn default() -> Self {
        Self::Valid
    }
}

/// Result for one configuration area
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryValidation {
    pub status: ValidationStatus,
    pub messages: Vec<String>,
}

impl CategoryValidation {
    fn error(&mut self, message: impl Into<String>) {
        self.raise(ValidationStatus::Error, message);
    }

    fn warning(&mut self, message: impl Into<String>) {
        self.raise(ValidationStatus::Warning, message);
    }

    fn raise(&mut self, status: ValidationStatus, message: impl Into<String>) {
        self.status = self.status.max(status);
        self.messages.push(message.into());
    }

    /// Add a summary line when nothing was reported
    fn summarize(mut self, summary: impl FnOnce() -> String) -> Self {
        if self.status == ValidationStatus::Valid {
            self.messages.push(summary());
        }
        self
    }
}

/// Full validation report
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub overall: ValidationStatus,
    pub symbols: CategoryValidation,
    pub reels: CategoryValidation,
    pub paylines: CategoryValidation,
    pub paytable: CategoryValidation,
    pub settings: CategoryValidation,
}

impl ValidationReport {
    /// True when the engine can safely run this config
    pub fn is_runnable(&self) -> bool {
        self.overall != ValidationStatus::Error
    }

    /// All categories with their names
    pub fn categories(&self) -> [(&'static str, &CategoryValidation); 5] {
        [
            ("symbols", &self.symbols),
            ("reels", &self.reels),
            ("paylines", &self.paylines),
            ("paytable", &self.paytable),
            ("settings", &self.settings),
        ]
    }
}

/// Validate a machine configuration
pub fn validate(config: &MachineConfig) -> ValidationReport {
    let symbols = validate_symbols(config);
    let reels = validate_reels(config);
    let paylines = validate_paylines(config);
    let paytable = validate_paytable(config);
    let settings = validate_settings(config);

    let overall = [&symbols, &reels, &paylines, &paytable, &settings]
        .iter()
        .map(|c| c.status)
        .max()
        .unwrap_or_default();

    if overall != ValidationStatus::Valid {
        log::debug!("Config '{}' validated with status {:?}", config.name, overall);
    }

    ValidationReport {
        overall,
        symbols,
        reels,
        paylines,
        paytable,
        settings,
    }
}

fn validate_symbols(config: &MachineConfig) -> CategoryValidation {
    let mut result = CategoryValidation::default();

    if config.symbols.len() < 2 {
        result.error("Need at least 2 symbols.");
    }

    if !config.symbols.is_empty() && config.symbols.iter().all(|s| s.is_wild) {
        result.error("All symbols are Wild; need at least 1 non-Wild symbol.");
    }

    let mut seen = HashSet::new();
    if !config.symbols.iter().all(|s| seen.insert(s.id.as_str())) {
        result.error("Duplicate symbol IDs detected.");
    }

    result.summarize(|| format!("{} symbols configured.", config.symbols.len()))
}

fn validate_reels(config: &MachineConfig) -> CategoryValidation {
    let mut result = CategoryValidation::default();
    let known: HashSet<&str> = config.symbols.iter().map(|s| s.id.as_str()).collect();

    if config.reel_strips.len() < config.reels {
        result.error(format!(
            "Expected {} reel strips, found {}.",
            config.reels,
            config.reel_strips.len()
        ));
    }

    for (i, strip) in config.reel_strips.iter().enumerate() {
        let reel = i + 1;

        if strip.len() < config.rows {
            result.error(format!(
                "Reel {reel}: strip length ({}) is less than visible rows ({}).",
                strip.len(),
                config.rows
            ));
        }

        if strip.is_empty() {
            result.error(format!("Reel {reel}: strip is empty."));
            continue;
        }

        let unknown = strip
            .iter()
            .filter(|id| id.as_str() != EMPTY_SYMBOL && !known.contains(id.as_str()))
            .count();
        if unknown > 0 {
            result.error(format!(
                "Reel {reel}: {unknown} symbol(s) reference non-existent symbols."
            ));
        }
    }

    if config.strip_length < config.rows {
        result.warning(format!(
            "Strip length ({}) must be ≥ rows ({}).",
            config.strip_length, config.rows
        ));
    }

    result.summarize(|| {
        format!(
            "{} reels, {} symbols per strip.",
            config.reels, config.strip_length
        )
    })
}

fn validate_paylines(config: &MachineConfig) -> CategoryValidation {
    let mut result = CategoryValidation::default();

    if config.paylines.is_empty() {
        result.error("No paylines defined. Add at least 1 payline.");
        return result;
    }

    for payline in &config.paylines {
        if payline.cells.len() != config.reels {
            result.error(format!(
                "Payline {}: has {} cells but machine has {} reels.",
                payline.id,
                payline.cells.len(),
                config.reels
            ));
        }

        if payline.cells.iter().any(|&row| row >= config.rows) {
            result.error(format!(
                "Payline {}: cell(s) out of row bounds (0–{}).",
                payline.id,
                config.rows.saturating_sub(1)
            ));
        }
    }

    result.summarize(|| format!("{} payline(s) configured.", config.paylines.len()))
}

fn validate_paytable(config: &MachineConfig) -> CategoryValidation {
    let mut result = CategoryValidation::default();

    if config.paytable.is_empty() {
        result.error("No paytable entries. Add at least 1 payout.");
        return result;
    }

    if !config
        .paytable
        .iter()
        .any(|e| e.payouts.values().any(|&v| v > 0))
    {
        result.error("All payouts are 0. Set at least 1 payout > 0.");
    }

    let unknown = config
        .paytable
        .iter()
        .filter(|e| config.symbol(&e.symbol_id).is_none())
        .count();
    if unknown > 0 {
        result.error(format!(
            "{unknown} paytable entry/entries reference non-existent symbols."
        ));
    }

    let unpaid: Vec<&str> = config
        .symbols
        .iter()
        .filter(|s| !s.is_wild && config.paytable_entry(&s.id).is_none())
        .map(|s| if s.name.is_empty() { s.id.as_str() } else { s.name.as_str() })
        .collect();
    if !unpaid.is_empty() {
        result.warning(format!(
            "{} non-Wild symbol(s) have no paytable entry: {}.",
            unpaid.len(),
            unpaid.join(", ")
        ));
    }

    // A payline can only produce counts in 2..=reels
    let reels = config.reels as u32;
    let min = config.min_match_count;
    if min > reels {
        result.warning(format!(
            "Minimum match count ({min}) exceeds the number of reels ({reels})."
        ));
    }
    for entry in &config.paytable {
        for &count in entry.payouts.keys() {
            if count < 2 || count > reels {
                result.warning(format!(
                    "{}: payout for {count} matches can never be reached on {reels} reels.",
                    entry.symbol_id
                ));
            } else if count > 2 && count < min {
                // Count 2 is exempt
                result.warning(format!(
                    "{}: payout for {count} matches is below the minimum match count ({min}).",
                    entry.symbol_id
                ));
            }
        }
    }

    result.summarize(|| format!("{} paytable entries configured.", config.paytable.len()))
}

fn validate_settings(config: &MachineConfig) -> CategoryValidation {
    let mut result = CategoryValidation::default();
    let settings = &config.settings;

    if settings.start_credits == 0 {
        result.error("Start credits must be > 0.");
    }

    if settings.bet_options.is_empty() {
        result.error("No bet options defined.");
    }

    if settings.default_bet == 0 {
        result.warning("Default bet must be > 0.");
    }

    result.summarize(|| "Settings OK.".to_string())
}
