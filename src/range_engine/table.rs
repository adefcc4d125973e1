//! The canonical strategy table: which actions each hand may take in each spot.

use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::str::FromStr;
use serde::{Deserialize, Serialize};

use crate::range_engine::{
    error::RangeError,
    hand_key::Hand169,
    models::{Action, ActionSet, Position, Scenario, ScenarioKind},
};

/// Structured table key: one hand in one scenario.
///
/// `opener` is `None` exactly when `kind` is [`ScenarioKind::Unopened`].
/// The text form is `kind|hero|opener|hand`, with an empty opener for
/// unopened spots (`unopened|UTG||AA`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct StrategyKey {
    pub kind: ScenarioKind,
    pub hero: Position,
    pub opener: Option<Position>,
    pub hand: Hand169,
}

/// Key for `hand` in `scenario`. The parser writes with this and every
/// reader looks up with it.
pub fn key_for(scenario: Scenario, hand: Hand169) -> StrategyKey {
    StrategyKey {
        kind: scenario.kind(),
        hero: scenario.hero(),
        opener: scenario.opener(),
        hand,
    }
}

impl StrategyKey {
    pub fn scenario(&self) -> Scenario {
        match (self.kind, self.opener) {
            (ScenarioKind::VsOpen, Some(opener)) => Scenario::VsOpen { hero: self.hero, opener },
            (ScenarioKind::Unopened, None) => Scenario::Unopened { hero: self.hero },
            (kind, opener) => {
                debug_assert!(false, "inconsistent key: {kind} with opener {opener:?}");
                match opener {
                    Some(opener) => Scenario::VsOpen { hero: self.hero, opener },
                    None => Scenario::Unopened { hero: self.hero },
                }
            }
        }
    }
}

impl fmt::Display for StrategyKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let opener = self.opener.map(Position::code).unwrap_or("");
        write!(f, "{}|{}|{}|{}", self.kind, self.hero, opener, self.hand)
    }
}

impl FromStr for StrategyKey {
    type Err = RangeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split('|').collect();
        let [kind, hero, opener, hand] = parts.as_slice() else {
            return Err(RangeError::InvalidKey(s.to_string()));
        };
        let kind: ScenarioKind = kind.parse()?;
        let opener = match (*opener).trim() {
            "" => None,
            code => Some(code.parse::<Position>()?),
        };
        if (kind == ScenarioKind::VsOpen) != opener.is_some() {
            return Err(RangeError::InvalidKey(s.to_string()));
        }
        Ok(StrategyKey {
            kind,
            hero: hero.parse()?,
            opener,
            hand: hand.parse()?,
        })
    }
}

/// Immutable snapshot built once per workbook. A reload replaces the whole table.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StrategyTable {
    entries: HashMap<StrategyKey, ActionSet>,
}

impl StrategyTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn insert(&mut self, key: StrategyKey, actions: ActionSet) {
        self.entries.insert(key, actions);
    }

    pub(crate) fn into_entries(self) -> HashMap<StrategyKey, ActionSet> {
        self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, key: &StrategyKey) -> Option<ActionSet> {
        self.entries.get(key).copied()
    }

    pub fn contains_key(&self, key: &StrategyKey) -> bool {
        self.entries.contains_key(key)
    }

    /// Allowed actions for `hand` in `scenario`; `None` when the cell was blank.
    pub fn lookup(&self, scenario: Scenario, hand: Hand169) -> Option<ActionSet> {
        self.get(&key_for(scenario, hand))
    }

    /// Like [`lookup`](Self::lookup), but a missing entry reads as fold-only.
    pub fn actions_or_fold(&self, scenario: Scenario, hand: Hand169) -> ActionSet {
        self.lookup(scenario, hand).unwrap_or_else(ActionSet::fold_only)
    }

    /// True when `action` is among the allowed actions for `hand` in `scenario`.
    pub fn allows(&self, scenario: Scenario, hand: Hand169, action: Action) -> bool {
        self.lookup(scenario, hand).is_some_and(|set| set.contains(action))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&StrategyKey, &ActionSet)> {
        self.entries.iter()
    }

    /// All keys in their total order, independent of hash-map iteration order.
    pub fn keys_sorted(&self) -> Vec<StrategyKey> {
        let mut keys: Vec<StrategyKey> = self.entries.keys().copied().collect();
        keys.sort_unstable();
        keys
    }

    /// Distinct scenarios that have at least one entry, in sorted order.
    pub fn scenarios(&self) -> Vec<Scenario> {
        let set: BTreeSet<Scenario> = self.entries.keys().map(StrategyKey::scenario).collect();
        set.into_iter().collect()
    }
}

impl FromIterator<(StrategyKey, ActionSet)> for StrategyTable {
    fn from_iter<I: IntoIterator<Item = (StrategyKey, ActionSet)>>(iter: I) -> Self {
        StrategyTable { entries: iter.into_iter().collect() }
    }
}
