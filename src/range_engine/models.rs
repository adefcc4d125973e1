use std::fmt;
use std::str::FromStr;
use serde::{Deserialize, Serialize};

use crate::range_engine::error::RangeError;

// ---------------------------------------------------------------------------
// Card primitives
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Suit {
    Clubs,
    Diamonds,
    Hearts,
    Spades,
}

impl Suit {
    pub const ALL: [Suit; 4] = [Suit::Clubs, Suit::Diamonds, Suit::Hearts, Suit::Spades];
}

impl fmt::Display for Suit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Suit::Clubs => write!(f, "c"),
            Suit::Diamonds => write!(f, "d"),
            Suit::Hearts => write!(f, "h"),
            Suit::Spades => write!(f, "s"),
        }
    }
}

/// Rank 2..=14 where 14 = Ace.
///
/// Range grids are indexed the other way round: grid index 0 is the Ace and
/// index 12 is the deuce. [`Rank::from_index`] and [`Rank::index`] convert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Rank(pub u8);

/// Grid order of the 13 rank symbols, highest first. This is also the exact
/// header sequence the workbook parser looks for.
pub const RANK_SYMBOLS: [&str; 13] = [
    "A", "K", "Q", "J", "T", "9", "8", "7", "6", "5", "4", "3", "2",
];

impl Rank {
    pub fn symbol(self) -> &'static str {
        match self.0 {
            2 => "2", 3 => "3", 4 => "4", 5 => "5", 6 => "6",
            7 => "7", 8 => "8", 9 => "9", 10 => "T",
            11 => "J", 12 => "Q", 13 => "K", 14 => "A",
            _ => "?",
        }
    }

    /// Grid index 0..13 → rank (0 = Ace).
    pub fn from_index(index: usize) -> Option<Rank> {
        (index < 13).then(|| Rank(14 - index as u8))
    }

    /// Rank → grid index (Ace = 0). Only meaningful for ranks 2..=14.
    pub fn index(self) -> usize {
        debug_assert!((2..=14).contains(&self.0), "rank out of range: {}", self.0);
        (14 - self.0) as usize
    }

    /// Parse one rank character, case-insensitive ("t" and "T" are both ten).
    pub fn from_symbol(c: char) -> Option<Rank> {
        let upper = c.to_ascii_uppercase();
        RANK_SYMBOLS
            .iter()
            .position(|s| s.starts_with(upper))
            .and_then(Rank::from_index)
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Card {
    pub rank: Rank,
    pub suit: Suit,
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.rank, self.suit)
    }
}

// ---------------------------------------------------------------------------
// Table metadata
// ---------------------------------------------------------------------------

/// The six seats of a six-handed table, in clockwise action order.
/// The derived ordering follows that action order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Position {
    UTG,
    HJ,   // Hijack
    CO,   // Cutoff
    BTN,  // Button
    SB,   // Small Blind
    BB,   // Big Blind
}

impl Position {
    pub const ALL: [Position; 6] = [
        Position::UTG, Position::HJ, Position::CO,
        Position::BTN, Position::SB, Position::BB,
    ];

    /// Short code used in workbook titles and table keys.
    pub fn code(self) -> &'static str {
        match self {
            Position::UTG => "UTG",
            Position::HJ  => "HJ",
            Position::CO  => "CO",
            Position::BTN => "BTN",
            Position::SB  => "SB",
            Position::BB  => "BB",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Position::UTG => "Under the Gun",
            Position::HJ  => "Hijack",
            Position::CO  => "Cutoff",
            Position::BTN => "Button",
            Position::SB  => "Small Blind",
            Position::BB  => "Big Blind",
        }
    }

    /// Everyone except the Big Blind can be first in with a raise.
    pub fn can_open(self) -> bool {
        self != Position::BB
    }

    /// Everyone except UTG can face an open from an earlier seat.
    pub fn can_face_open(self) -> bool {
        self != Position::UTG
    }

    /// True when `self` acts before `other` preflop.
    pub fn acts_before(self, other: Position) -> bool {
        self < other
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl FromStr for Position {
    type Err = RangeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let code = s.trim();
        Position::ALL
            .iter()
            .copied()
            .find(|p| p.code().eq_ignore_ascii_case(code))
            .ok_or_else(|| RangeError::InvalidPosition(s.to_string()))
    }
}

// ---------------------------------------------------------------------------
// Actions
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    Raise,
    Call,
    Fold,
}

impl Action {
    /// Fixed label order: Raise, Call, Fold.
    pub const ALL: [Action; 3] = [Action::Raise, Action::Call, Action::Fold];

    /// Single-letter code used in workbook cells and labels.
    pub fn letter(self) -> char {
        match self {
            Action::Raise => 'R',
            Action::Call  => 'C',
            Action::Fold  => 'F',
        }
    }

    pub fn from_letter(c: char) -> Option<Action> {
        match c.to_ascii_uppercase() {
            'R' => Some(Action::Raise),
            'C' => Some(Action::Call),
            'F' => Some(Action::Fold),
            _ => None,
        }
    }

    fn bit(self) -> u8 {
        match self {
            Action::Raise => 0b001,
            Action::Call  => 0b010,
            Action::Fold  => 0b100,
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Raise => write!(f, "raise"),
            Action::Call  => write!(f, "call"),
            Action::Fold  => write!(f, "fold"),
        }
    }
}

impl FromStr for Action {
    type Err = RangeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "raise" | "r" => Ok(Action::Raise),
            "call"  | "c" => Ok(Action::Call),
            "fold"  | "f" => Ok(Action::Fold),
            _ => Err(RangeError::InvalidAction(s.to_string())),
        }
    }
}

/// A set of 0–3 permitted actions for one hand in one scenario.
///
/// Mixed cells ("may raise or call") are ordinary multi-member sets.
/// Serialized as a list in Raise, Call, Fold order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "Vec<Action>", from = "Vec<Action>")]
pub struct ActionSet(u8);

impl ActionSet {
    pub const fn empty() -> Self {
        ActionSet(0)
    }

    pub fn fold_only() -> Self {
        ActionSet::from_iter([Action::Fold])
    }

    pub fn insert(&mut self, action: Action) {
        self.0 |= action.bit();
    }

    /// Returns true if the action was present.
    pub fn remove(&mut self, action: Action) -> bool {
        let had = self.contains(action);
        self.0 &= !action.bit();
        had
    }

    pub fn contains(self, action: Action) -> bool {
        self.0 & action.bit() != 0
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    /// Members in the fixed Raise, Call, Fold order.
    pub fn iter(self) -> impl Iterator<Item = Action> {
        Action::ALL.into_iter().filter(move |a| self.contains(*a))
    }

    /// Letters joined with "/" in R, C, F order, e.g. "R/C".
    /// An empty set yields the empty string; callers decide what absence means.
    pub fn label(self) -> String {
        self.iter()
            .map(|a| a.letter().to_string())
            .collect::<Vec<_>>()
            .join("/")
    }

    /// Raise or call present: the hand voluntarily enters the pot.
    pub fn enters(self) -> bool {
        self.contains(Action::Raise) || self.contains(Action::Call)
    }
}

impl FromIterator<Action> for ActionSet {
    fn from_iter<I: IntoIterator<Item = Action>>(iter: I) -> Self {
        let mut set = ActionSet::empty();
        for action in iter {
            set.insert(action);
        }
        set
    }
}

impl From<Vec<Action>> for ActionSet {
    fn from(actions: Vec<Action>) -> Self {
        actions.into_iter().collect()
    }
}

impl From<ActionSet> for Vec<Action> {
    fn from(set: ActionSet) -> Self {
        set.iter().collect()
    }
}

impl fmt::Display for ActionSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<String> = self.iter().map(|a| a.to_string()).collect();
        write!(f, "{}", names.join(" / "))
    }
}

// ---------------------------------------------------------------------------
// Scenarios
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScenarioKind {
    /// Nobody has voluntarily entered the pot (RFI).
    Unopened,
    /// Hero faces a single open raise.
    VsOpen,
}

impl ScenarioKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ScenarioKind::Unopened => "unopened",
            ScenarioKind::VsOpen   => "vs_open",
        }
    }
}

impl fmt::Display for ScenarioKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ScenarioKind {
    type Err = RangeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "unopened" => Ok(ScenarioKind::Unopened),
            "vs_open"  => Ok(ScenarioKind::VsOpen),
            _ => Err(RangeError::InvalidKind(s.to_string())),
        }
    }
}

/// One decision spot: who is acting and, for `VsOpen`, who opened.
///
/// Seat validity (hero is not the BB when unopened, the opener acted before
/// hero) comes from the workbook and is not re-checked here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Scenario {
    Unopened { hero: Position },
    VsOpen { hero: Position, opener: Position },
}

impl Scenario {
    pub fn kind(self) -> ScenarioKind {
        match self {
            Scenario::Unopened { .. } => ScenarioKind::Unopened,
            Scenario::VsOpen { .. }   => ScenarioKind::VsOpen,
        }
    }

    pub fn hero(self) -> Position {
        match self {
            Scenario::Unopened { hero } | Scenario::VsOpen { hero, .. } => hero,
        }
    }

    pub fn opener(self) -> Option<Position> {
        match self {
            Scenario::Unopened { .. } => None,
            Scenario::VsOpen { opener, .. } => Some(opener),
        }
    }

    /// The actions a player can choose from in this spot, with the button
    /// wording used by the quiz. Calling is not offered in an unopened pot.
    pub fn answer_options(self) -> Vec<AnswerOption> {
        match self {
            Scenario::Unopened { .. } => vec![
                AnswerOption::new(Action::Raise, "Raise (2.5bb)"),
                AnswerOption::new(Action::Fold, "Fold"),
            ],
            Scenario::VsOpen { .. } => vec![
                AnswerOption::new(Action::Raise, "3bet (Raise)"),
                AnswerOption::new(Action::Call, "Call"),
                AnswerOption::new(Action::Fold, "Fold"),
            ],
        }
    }
}

impl fmt::Display for Scenario {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scenario::Unopened { hero } => write!(f, "{hero}"),
            Scenario::VsOpen { hero, opener } => write!(f, "{hero} (Hero) vs {opener}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerOption {
    pub action: Action,
    pub text: String,
}

impl AnswerOption {
    fn new(action: Action, text: &str) -> Self {
        AnswerOption { action, text: text.to_string() }
    }
}

/// Study presets offered on the start screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StudyMode {
    Rfi,
    VsOpen,
}
