//! Core range engine: workbook parsing, the strategy table, quiz state and statistics.
//!
//! ## Module overview
//!
//! | Module     | Purpose |
//! |------------|---------|
//! | `models`   | Shared types: ranks, cards, positions, actions, scenarios |
//! | `hand_key` | The 169 hand classes and their 13×13 grid layout |
//! | `deck`     | Concrete two-card holdings behind a hand class |
//! | `parser`   | `RFI` / `VsOpen` workbook → strategy table |
//! | `cleaning` | Data-cleaning heuristics applied after parsing |
//! | `table`    | Structured keys and the immutable strategy table |
//! | `quiz`     | Quiz state machine: load, draw, grade |
//! | `summary`  | Cell-count and combo-weighted range statistics |
//! | `buckets`  | Optional hand-strength buckets for hints |
//! | `config`   | JSON trainer configuration |
//! | `error`    | Error types |

pub mod buckets;
pub mod cleaning;
pub mod config;
pub mod deck;
pub mod error;
pub mod hand_key;
pub mod models;
pub mod parser;
pub mod quiz;
pub mod summary;
pub mod table;

// Re-export the public API surface so callers can use
// `range_engine::parse_workbook` without reaching into sub-modules.
pub use buckets::RankBuckets;
pub use config::TrainerConfig;
pub use error::{AdviceError, ConfigError, RangeError, Result};
pub use hand_key::{encode, Hand169, HandShape};
pub use models::{
    Action, ActionSet, AnswerOption, Card, Position, Rank, Scenario, ScenarioKind, StudyMode, Suit,
};
pub use parser::{parse_workbook, ParseOptions};
pub use quiz::{AbsentPolicy, Grade, LoadTicket, Question, QuizPhase, QuizState, ScenarioFilter};
pub use summary::{summarize, AdviceSummary};
pub use table::{key_for, StrategyKey, StrategyTable};
