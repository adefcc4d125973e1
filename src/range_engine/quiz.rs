use std::fmt;
use std::sync::Arc;

use log::debug;
use rand::{rngs::StdRng, Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::range_engine::{
    config::TrainerConfig,
    deck::deal_hole_cards,
    hand_key::Hand169,
    models::{Action, ActionSet, AnswerOption, Card, Position, Scenario, ScenarioKind, StudyMode},
    summary::{summarize, AdviceSummary},
    table::{key_for, StrategyKey, StrategyTable},
};

/// The active quiz question: one hand in one scenario.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Question {
    pub scenario: Scenario,
    pub hand: Hand169,
}

impl Question {
    pub fn key(&self) -> StrategyKey {
        key_for(self.scenario, self.hand)
    }

    pub fn answer_options(&self) -> Vec<AnswerOption> {
        self.scenario.answer_options()
    }

    /// A concrete holding of this hand class for display.
    pub fn hole_cards<R: Rng>(&self, rng: &mut R) -> [Card; 2] {
        deal_hole_cards(rng, self.hand)
    }
}

impl fmt::Display for Question {
    /// `UTG / AKs` or `BB (Hero) vs CO / AKs`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} / {}", self.scenario, self.hand)
    }
}

/// Partial predicate over a key's scenario fields. Every field that is set
/// must match exactly.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScenarioFilter {
    pub kind: Option<ScenarioKind>,
    pub hero: Option<Position>,
    /// `Some(None)` selects unopened spots only.
    pub opener: Option<Option<Position>>,
}

impl ScenarioFilter {
    pub fn kind(kind: ScenarioKind) -> Self {
        ScenarioFilter { kind: Some(kind), ..Self::default() }
    }

    pub fn with_hero(mut self, hero: Position) -> Self {
        self.hero = Some(hero);
        self
    }

    pub fn with_opener(mut self, opener: Option<Position>) -> Self {
        self.opener = Some(opener);
        self
    }

    pub fn matches(&self, key: &StrategyKey) -> bool {
        self.kind.map_or(true, |k| k == key.kind)
            && self.hero.map_or(true, |h| h == key.hero)
            && self.opener.map_or(true, |o| o == key.opener)
    }
}

impl From<StudyMode> for ScenarioFilter {
    fn from(mode: StudyMode) -> Self {
        match mode {
            StudyMode::Rfi    => ScenarioFilter::kind(ScenarioKind::Unopened),
            StudyMode::VsOpen => ScenarioFilter::kind(ScenarioKind::VsOpen),
        }
    }
}

/// How grading reads a question whose hand has no table entry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AbsentPolicy {
    /// Nothing is allowed, so every answer is wrong.
    #[default]
    Empty,
    /// Only folding is allowed, matching how ranges are displayed.
    FoldOnly,
}

impl AbsentPolicy {
    fn resolve(self, entry: Option<ActionSet>) -> ActionSet {
        match (entry, self) {
            (Some(actions), _) => actions,
            (None, AbsentPolicy::Empty) => ActionSet::empty(),
            (None, AbsentPolicy::FoldOnly) => ActionSet::fold_only(),
        }
    }
}

/// Result of grading one answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grade {
    pub submitted: Action,
    pub correct: bool,
    /// Everything that would have been accepted.
    pub allowed: ActionSet,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuizPhase {
    /// No table loaded yet.
    NoData,
    /// Table loaded, no question drawn.
    Idle,
    Active,
}

/// Issued by [`QuizState::begin_load`]; only the newest ticket may apply a table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct LoadTicket(u64);

/// Application state of the quiz.
///
/// All changes go through [`load`](Self::load), [`finish_load`](Self::finish_load),
/// [`set_study_filter`](Self::set_study_filter) and [`draw`](Self::draw).
#[derive(Debug)]
pub struct QuizState {
    table: Option<Arc<StrategyTable>>,
    question: Option<Question>,
    study_filter: Option<ScenarioFilter>,
    absent_policy: AbsentPolicy,
    rng: StdRng,
    latest_load: u64,
}

impl QuizState {
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    pub fn with_seed(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    pub fn from_config(config: &TrainerConfig) -> Self {
        let state = match config.rng_seed {
            Some(seed) => Self::with_seed(seed),
            None       => Self::new(),
        };
        state.with_absent_policy(config.absent_policy)
    }

    fn with_rng(rng: StdRng) -> Self {
        QuizState {
            table: None,
            question: None,
            study_filter: None,
            absent_policy: AbsentPolicy::default(),
            rng,
            latest_load: 0,
        }
    }

    pub fn with_absent_policy(mut self, policy: AbsentPolicy) -> Self {
        self.absent_policy = policy;
        self
    }

    pub fn phase(&self) -> QuizPhase {
        match (&self.table, &self.question) {
            (None, _) => QuizPhase::NoData,
            (Some(_), None) => QuizPhase::Idle,
            (Some(_), Some(_)) => QuizPhase::Active,
        }
    }

    pub fn table(&self) -> Option<&Arc<StrategyTable>> {
        self.table.as_ref()
    }

    pub fn question(&self) -> Option<&Question> {
        self.question.as_ref()
    }

    pub fn study_filter(&self) -> Option<&ScenarioFilter> {
        self.study_filter.as_ref()
    }

    /// Replace the table wholesale and clear the active question.
    pub fn load(&mut self, table: impl Into<Arc<StrategyTable>>) {
        let table = table.into();
        debug!("loaded strategy table with {} entries", table.len());
        self.table = Some(table);
        self.question = None;
    }

    /// Start an asynchronous load. Any earlier ticket becomes stale.
    pub fn begin_load(&mut self) -> LoadTicket {
        self.latest_load += 1;
        LoadTicket(self.latest_load)
    }

    /// Apply the result of a load started with `ticket`, unless a newer load
    /// has begun since. Returns whether the table was applied.
    pub fn finish_load(&mut self, ticket: LoadTicket, table: impl Into<Arc<StrategyTable>>) -> bool {
        if ticket.0 != self.latest_load {
            debug!("discarding stale load {} (latest is {})", ticket.0, self.latest_load);
            return false;
        }
        self.load(table);
        true
    }

    /// Filter used by [`draw`](Self::draw) when none is passed.
    pub fn set_study_filter(&mut self, filter: Option<ScenarioFilter>) {
        self.study_filter = filter;
    }

    /// Draw a new question uniformly from the keys matching `filter` (or the
    /// stored study filter). Leaves the state untouched and returns `None`
    /// when no table is loaded or nothing matches.
    pub fn draw(&mut self, filter: Option<&ScenarioFilter>) -> Option<&Question> {
        let table = self.table.as_ref()?;
        let filter = filter.copied().or(self.study_filter);

        // Sorted so the pick depends only on the RNG, not on hash order.
        let candidates: Vec<StrategyKey> = table
            .keys_sorted()
            .into_iter()
            .filter(|key| filter.map_or(true, |f| f.matches(key)))
            .collect();
        if candidates.is_empty() {
            debug!("no candidates for filter {filter:?}");
            return None;
        }

        let key = candidates[self.rng.gen_range(0..candidates.len())];
        let question = Question { scenario: key.scenario(), hand: key.hand };
        debug!("drew {question} from {} candidate(s)", candidates.len());
        self.question = Some(question);
        self.question.as_ref()
    }

    /// Grade `action` against the active question. `None` unless a question
    /// is active. The state does not change.
    pub fn grade(&self, action: Action) -> Option<Grade> {
        let question = self.question.as_ref()?;
        let table = self.table.as_ref()?;
        let allowed = self.absent_policy.resolve(table.get(&question.key()));
        Some(Grade { submitted: action, correct: allowed.contains(action), allowed })
    }

    /// Summary of the active question's scenario with its hand in focus.
    pub fn summary(&self) -> Option<AdviceSummary> {
        let question = self.question.as_ref()?;
        let table = self.table.as_ref()?;
        Some(summarize(table, question.scenario, question.hand))
    }
}

impl Default for QuizState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::range_engine::hand_key::{all_hands, encode};

    fn rfi(hero: Position) -> Scenario {
        Scenario::Unopened { hero }
    }

    fn full_table() -> StrategyTable {
        let scenarios = [
            rfi(Position::UTG),
            rfi(Position::BTN),
            Scenario::VsOpen { hero: Position::BB, opener: Position::BTN },
            Scenario::VsOpen { hero: Position::BB, opener: Position::CO },
            Scenario::VsOpen { hero: Position::CO, opener: Position::HJ },
        ];
        scenarios
            .iter()
            .flat_map(|&s| all_hands().map(move |h| (key_for(s, h), ActionSet::fold_only())))
            .collect()
    }

    #[test]
    fn phases_follow_load_and_draw() {
        let mut quiz = QuizState::with_seed(1);
        assert_eq!(quiz.phase(), QuizPhase::NoData);
        assert!(quiz.draw(None).is_none());
        assert!(quiz.grade(Action::Fold).is_none());

        quiz.load(full_table());
        assert_eq!(quiz.phase(), QuizPhase::Idle);
        assert!(quiz.grade(Action::Fold).is_none());

        assert!(quiz.draw(None).is_some());
        assert_eq!(quiz.phase(), QuizPhase::Active);

        quiz.load(StrategyTable::new());
        assert_eq!(quiz.phase(), QuizPhase::Idle);
    }

    #[test]
    fn filter_restricts_every_draw() {
        let mut quiz = QuizState::with_seed(7);
        quiz.load(full_table());
        let filter = ScenarioFilter::kind(ScenarioKind::VsOpen).with_hero(Position::BB);
        for _ in 0..200 {
            let q = *quiz.draw(Some(&filter)).unwrap();
            assert_eq!(q.scenario.kind(), ScenarioKind::VsOpen);
            assert_eq!(q.scenario.hero(), Position::BB);
        }
    }

    #[test]
    fn opener_filter_distinguishes_unopened() {
        let mut quiz = QuizState::with_seed(3);
        quiz.load(full_table());
        let unopened = ScenarioFilter::default().with_opener(None);
        let vs_co = ScenarioFilter::default().with_opener(Some(Position::CO));
        for _ in 0..100 {
            assert_eq!(quiz.draw(Some(&unopened)).unwrap().scenario.opener(), None);
            assert_eq!(quiz.draw(Some(&vs_co)).unwrap().scenario.opener(), Some(Position::CO));
        }
    }

    #[test]
    fn empty_candidate_set_keeps_previous_question() {
        let mut quiz = QuizState::with_seed(11);
        quiz.load(full_table());
        let before = *quiz.draw(None).unwrap();
        let nothing = ScenarioFilter::kind(ScenarioKind::Unopened).with_hero(Position::SB);
        assert!(quiz.draw(Some(&nothing)).is_none());
        assert_eq!(quiz.question(), Some(&before));
        assert_eq!(quiz.phase(), QuizPhase::Active);
    }

    #[test]
    fn stored_study_filter_applies_when_none_passed() {
        let mut quiz = QuizState::with_seed(5);
        quiz.load(full_table());
        quiz.set_study_filter(Some(StudyMode::Rfi.into()));
        for _ in 0..100 {
            assert_eq!(quiz.draw(None).unwrap().scenario.kind(), ScenarioKind::Unopened);
        }
        // An explicit filter wins over the stored one.
        let vs = ScenarioFilter::from(StudyMode::VsOpen);
        assert_eq!(quiz.draw(Some(&vs)).unwrap().scenario.kind(), ScenarioKind::VsOpen);
    }

    #[test]
    fn draws_are_reproducible_with_seed() {
        let run = |seed| {
            let mut quiz = QuizState::with_seed(seed);
            quiz.load(full_table());
            (0..20).map(|_| *quiz.draw(None).unwrap()).collect::<Vec<_>>()
        };
        assert_eq!(run(42), run(42));
    }

    #[test]
    fn draws_cover_all_candidates() {
        let s = rfi(Position::CO);
        let table: StrategyTable = (0..4)
            .map(|i| (key_for(s, encode(i, i)), ActionSet::fold_only()))
            .collect();
        let mut quiz = QuizState::with_seed(9);
        quiz.load(table);
        let mut seen = std::collections::HashSet::new();
        for _ in 0..400 {
            seen.insert(quiz.draw(None).unwrap().hand);
        }
        assert_eq!(seen.len(), 4);
    }

    #[test]
    fn grading_uses_absent_policy() {
        let s = rfi(Position::HJ);
        let hand = encode(0, 0);
        let empty_table = StrategyTable::new();
        // Force a question whose key is not in the table.
        let mut quiz = QuizState::with_seed(1);
        quiz.load(empty_table.clone());
        quiz.question = Some(Question { scenario: s, hand });

        for action in Action::ALL {
            let g = quiz.grade(action).unwrap();
            assert!(!g.correct);
            assert!(g.allowed.is_empty());
        }

        let mut lenient = QuizState::with_seed(1).with_absent_policy(AbsentPolicy::FoldOnly);
        lenient.load(empty_table);
        lenient.question = Some(Question { scenario: s, hand });
        assert!(lenient.grade(Action::Fold).unwrap().correct);
        assert!(!lenient.grade(Action::Raise).unwrap().correct);
    }

    #[test]
    fn stale_load_is_discarded() {
        let mut quiz = QuizState::with_seed(2);
        let first = quiz.begin_load();
        let second = quiz.begin_load();

        assert!(quiz.finish_load(second, full_table()));
        assert!(!quiz.finish_load(first, StrategyTable::new()));
        assert_eq!(quiz.table().unwrap().len(), 5 * 169);
    }

    #[test]
    fn question_title_and_options() {
        let q = Question {
            scenario: Scenario::VsOpen { hero: Position::BB, opener: Position::CO },
            hand: encode(0, 1),
        };
        assert_eq!(q.to_string(), "BB (Hero) vs CO / AKs");
        assert_eq!(q.answer_options().len(), 3);
        let q = Question { scenario: rfi(Position::UTG), hand: encode(1, 0) };
        assert_eq!(q.to_string(), "UTG / AKo");
    }
}
