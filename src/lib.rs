//! # preflop_trainer
//!
//! Core of a preflop range trainer: load a strategy workbook, quiz on random
//! hands, grade answers, and summarize ranges for an optional advice relay.
//!
//! ## How it works
//!
//! 1. Parse a workbook with [`parse_workbook`]. The `RFI` sheet holds
//!    raise-first-in grids per position, the `VsOpen` sheet holds grids for
//!    facing an open. Each grid is a 13×13 block of cells like `R`, `R/C50`, `F`.
//! 2. Load the resulting [`StrategyTable`] into a [`QuizState`], optionally set
//!    a [`ScenarioFilter`], and call [`QuizState::draw`] for a question.
//! 3. [`QuizState::grade`] checks an [`Action`] and reports every action the
//!    range would have accepted.
//! 4. [`summarize`] computes the cell-count and combo-weighted shares of the
//!    range (and of the opener's RFI when facing an open). [`AdviceRequest`]
//!    packages that for the relay and [`AdviceClient`] sends it.
//!
//! ## Key features
//!
//! - **Mixed cells**: a hand may allow several actions (`R/C`); any of them grades as correct.
//! - **Combo weighting**: pairs count 6 combos, suited hands 4, offsuit 12, out of 1326.
//! - **Deterministic**: [`QuizState::with_seed`] reproduces the same question sequence.
//! - **Strict mode**: [`ParseOptions::strict`] turns off the AA/KK fold clean-up and the
//!   default identity for untitled grids.
//!
//! ## Quick start
//!
//! ```rust
//! use preflop_trainer::{
//!     key_for, encode, Action, ActionSet, Position, QuizState, Scenario, ScenarioFilter,
//!     ScenarioKind, StrategyTable,
//! };
//!
//! let utg = Scenario::Unopened { hero: Position::UTG };
//! let table: StrategyTable = [(key_for(utg, encode(0, 0)), ActionSet::from_iter([Action::Raise]))]
//!     .into_iter()
//!     .collect();
//!
//! let mut quiz = QuizState::with_seed(42);
//! quiz.load(table);
//! let filter = ScenarioFilter::kind(ScenarioKind::Unopened).with_hero(Position::UTG);
//! let question = *quiz.draw(Some(&filter)).expect("one candidate");
//! println!("Q: {question}");
//!
//! let grade = quiz.grade(Action::Raise).unwrap();
//! assert!(grade.correct);
//! ```

pub mod advice;
pub mod range_engine;

// Convenience re-exports so callers can use `preflop_trainer::parse_workbook`
// directly without reaching into `range_engine::`.
pub use advice::{interpret_response, AdviceClient, AdviceGate, AdviceRequest, AdviceTicket};
pub use range_engine::{
    encode, key_for, parse_workbook, summarize, AbsentPolicy, Action, ActionSet, AdviceError,
    AdviceSummary, ConfigError, Grade, Hand169, HandShape, LoadTicket, ParseOptions, Position,
    Question, QuizPhase, QuizState, RangeError, RankBuckets, Scenario, ScenarioFilter,
    ScenarioKind, StrategyKey, StrategyTable, StudyMode, TrainerConfig,
};
