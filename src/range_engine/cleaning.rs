//! Data-cleaning heuristics applied to hand-entered range workbooks.
//!
//! Both heuristics are switched off by [`ParseOptions::strict`](crate::range_engine::parser::ParseOptions).

use log::debug;

use crate::range_engine::{
    hand_key::encode,
    models::{Action, Position, Scenario},
    table::StrategyTable,
};

/// Identity assumed for an RFI grid whose title could not be read.
pub fn default_rfi_scenario() -> Scenario {
    Scenario::Unopened { hero: Position::UTG }
}

/// Identity assumed for a VsOpen grid whose title could not be read.
pub fn default_vs_open_scenario() -> Scenario {
    Scenario::VsOpen { hero: Position::HJ, opener: Position::UTG }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CleaningReport {
    /// Fold markers stripped from AA/KK cells.
    pub folds_removed: usize,
    /// Entries dropped because nothing was left after stripping.
    pub entries_dropped: usize,
}

/// Strip `fold` from the two strongest pairs in every scenario.
///
/// AA and KK are never folded preflop, so a fold marker on those cells is
/// treated as an entry mistake. A cell that held nothing but the fold is
/// removed, which leaves that hand unassigned.
pub fn strip_premium_folds(table: StrategyTable) -> (StrategyTable, CleaningReport) {
    let premium = [encode(0, 0), encode(1, 1)];
    let mut report = CleaningReport::default();

    let cleaned: StrategyTable = table
        .into_entries()
        .into_iter()
        .filter_map(|(key, mut actions)| {
            if premium.contains(&key.hand) && actions.remove(Action::Fold) {
                report.folds_removed += 1;
                if actions.is_empty() {
                    report.entries_dropped += 1;
                    return None;
                }
            }
            Some((key, actions))
        })
        .collect();

    if report.folds_removed > 0 {
        debug!(
            "stripped {} fold marker(s) from AA/KK, dropped {} entr(ies)",
            report.folds_removed, report.entries_dropped
        );
    }
    (cleaned, report)
}
