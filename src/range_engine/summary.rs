//! Read-side statistics over one scenario's 169-hand slice.
//!
//! Everything here is a pure function of the table, the scenario and the
//! focus hand. A missing entry always counts as fold-only.

use std::collections::BTreeMap;
use serde::{Deserialize, Serialize};

use crate::range_engine::{
    hand_key::{all_hands, encode, Hand169, COMBO_TOTAL, GRID},
    models::{Action, Position, Scenario},
    table::StrategyTable,
};

/// Label for one hand: actions joined in R, C, F order, `"F"` when absent.
pub fn hand_label(table: &StrategyTable, scenario: Scenario, hand: Hand169) -> String {
    table.actions_or_fold(scenario, hand).label()
}

/// Enter / raise / call shares of a range, in percent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RangeShare {
    /// Raise or call present.
    pub enter: f64,
    pub raise: f64,
    pub call: f64,
}

/// Tallies over all 169 cells of one scenario.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SliceStats {
    pub total_cells: usize,
    /// Cells per label ("R", "R/C", "F", ...).
    pub counts: BTreeMap<String, usize>,
    /// Shares by number of cells, out of 169.
    pub cells: RangeShare,
    /// Shares by combination weight, out of 1326.
    pub combos: RangeShare,
}

pub fn slice_stats(table: &StrategyTable, scenario: Scenario) -> SliceStats {
    let mut counts = BTreeMap::new();
    let (mut enter, mut raise, mut call) = (0u32, 0u32, 0u32);
    let (mut enter_w, mut raise_w, mut call_w) = (0u32, 0u32, 0u32);
    let mut total = 0usize;

    for hand in all_hands() {
        total += 1;
        let actions = table.actions_or_fold(scenario, hand);
        *counts.entry(actions.label()).or_insert(0) += 1;

        let weight = hand.combos();
        if actions.enters() {
            enter += 1;
            enter_w += weight;
        }
        if actions.contains(Action::Raise) {
            raise += 1;
            raise_w += weight;
        }
        if actions.contains(Action::Call) {
            call += 1;
            call_w += weight;
        }
    }

    let cells = |n: u32| percent(n, total as u32);
    let combos = |w: u32| percent(w, COMBO_TOTAL);
    SliceStats {
        total_cells: total,
        counts,
        cells: RangeShare { enter: cells(enter), raise: cells(raise), call: cells(call) },
        combos: RangeShare { enter: combos(enter_w), raise: combos(raise_w), call: combos(call_w) },
    }
}

/// How wide an opener's own RFI range is.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OpenerRfi {
    pub opener: Position,
    /// Cells containing a raise, out of 169.
    pub cell_percent: f64,
    /// Combinations in those cells, out of 1326.
    pub combo_percent: f64,
}

/// Raise share of `opener`'s unopened slice. Missing cells are not raises.
pub fn opener_rfi(table: &StrategyTable, opener: Position) -> OpenerRfi {
    let rfi = Scenario::Unopened { hero: opener };
    let (mut cells, mut weight) = (0u32, 0u32);
    for hand in all_hands() {
        if table.allows(rfi, hand, Action::Raise) {
            cells += 1;
            weight += hand.combos();
        }
    }
    OpenerRfi {
        opener,
        cell_percent: percent(cells, (GRID * GRID) as u32),
        combo_percent: percent(weight, COMBO_TOTAL),
    }
}

fn percent(part: u32, whole: u32) -> f64 {
    if whole == 0 {
        return 0.0;
    }
    part as f64 / whole as f64 * 100.0
}

/// Aggregate sent alongside an advice request.
///
/// Field names follow the relay's JSON contract.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdviceSummary {
    pub total_cells: usize,
    pub counts: BTreeMap<String, usize>,
    pub hero_enter_percent: f64,
    pub hero_raise_percent: f64,
    pub hero_call_percent: f64,
    pub hero_enter_combo_percent: f64,
    pub hero_raise_combo_percent: f64,
    pub hero_call_combo_percent: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub opener_rfi_percent: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub opener_rfi_combo_percent: Option<f64>,
    pub hand_label: String,
}

/// Full summary for `hand` in `scenario`, with the opener cross-reference
/// filled in for `VsOpen` spots.
pub fn summarize(table: &StrategyTable, scenario: Scenario, hand: Hand169) -> AdviceSummary {
    let stats = slice_stats(table, scenario);
    let opener = scenario.opener().map(|p| opener_rfi(table, p));
    AdviceSummary {
        total_cells: stats.total_cells,
        counts: stats.counts,
        hero_enter_percent: stats.cells.enter,
        hero_raise_percent: stats.cells.raise,
        hero_call_percent: stats.cells.call,
        hero_enter_combo_percent: stats.combos.enter,
        hero_raise_combo_percent: stats.combos.raise,
        hero_call_combo_percent: stats.combos.call,
        opener_rfi_percent: opener.map(|o| o.cell_percent),
        opener_rfi_combo_percent: opener.map(|o| o.combo_percent),
        hand_label: hand_label(table, scenario, hand),
    }
}

/// 13×13 label matrix for a scenario, rows and columns A..2.
pub fn range_matrix(table: &StrategyTable, scenario: Scenario) -> Vec<Vec<String>> {
    (0..GRID)
        .map(|i| (0..GRID).map(|j| hand_label(table, scenario, encode(i, j))).collect())
        .collect()
}

/// 13×13 matrix of the opener's RFI: `"R"` where raising is allowed, `"-"` elsewhere.
pub fn rfi_matrix(table: &StrategyTable, opener: Position) -> Vec<Vec<String>> {
    let rfi = Scenario::Unopened { hero: opener };
    (0..GRID)
        .map(|i| {
            (0..GRID)
                .map(|j| {
                    let raise = table.allows(rfi, encode(i, j), Action::Raise);
                    (if raise { "R" } else { "-" }).to_string()
                })
                .collect()
        })
        .collect()
}
