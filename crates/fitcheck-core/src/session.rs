//! Assessment session: the stage state machine, answer capture and progress.
//!
//! A [`Session`] walks `Intro → Trait → Knowledge → Readiness → Results`.
//! Forward movement is gated on every question of the current stage being
//! answered; backward movement and jumps to completed stages are free.
//! Changing an answer of a completed stage reopens that stage and every stage
//! after it, so Results always reflects the stored answers.
//! Refused transitions return a [`TransitionError`] and leave the session
//! untouched.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::answers::AnswerStore;
use crate::bank::{reference, Catalog, QuestionBank};
use crate::config::{FitcheckConfig, ProgressConfig, RecommendationPolicy};
use crate::error::{ResultsError, ScoringError, TransitionError};
use crate::model::{Instrument, Question, Stage};
use crate::recommend::{recommend, Recommendation};
use crate::scoring::{round_percent, score, score_partial, InstrumentScore, PartialScore, ScoreSet};

/// Observable state of an attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssessmentState {
    pub stage: Stage,
    pub completed_stages: BTreeSet<Stage>,
    pub instrument_scores: BTreeMap<Instrument, InstrumentScore>,
    pub progress_percent: u8,
}

impl AssessmentState {
    fn initial(progress: &ProgressConfig) -> Self {
        Self {
            stage: Stage::Intro,
            completed_stages: BTreeSet::new(),
            instrument_scores: BTreeMap::new(),
            progress_percent: progress.baseline(Stage::Intro),
        }
    }
}

/// Correctness feedback for an answered knowledge question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerFeedback {
    pub question_id: String,
    pub chosen_index: usize,
    pub correct_index: usize,
    pub correct: bool,
    pub correct_option: String,
    pub explanation: Option<String>,
}

/// Scores and recommendation of a finished attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssessmentResults {
    pub scores: ScoreSet,
    pub recommendation: Recommendation,
}

/// One respondent's pass through the assessment.
#[derive(Debug, Clone)]
pub struct Session {
    bank: Arc<QuestionBank>,
    progress: ProgressConfig,
    policy: RecommendationPolicy,
    state: AssessmentState,
    answers: AnswerStore,
    /// Index of the displayed question within the current stage.
    cursor: usize,
}

impl Session {
    pub fn new(bank: Arc<QuestionBank>, progress: ProgressConfig, policy: RecommendationPolicy) -> Self {
        Self {
            state: AssessmentState::initial(&progress),
            bank,
            progress,
            policy,
            answers: AnswerStore::new(),
            cursor: 0,
        }
    }

    pub fn with_config(bank: Arc<QuestionBank>, config: &FitcheckConfig) -> Self {
        Self::new(bank, config.progress, config.policy)
    }

    /// A session over the built-in bank with default settings.
    pub fn with_reference() -> Self {
        Self::new(
            Arc::new(reference().clone()),
            ProgressConfig::default(),
            RecommendationPolicy::default(),
        )
    }

    pub fn bank(&self) -> &QuestionBank {
        &self.bank
    }

    pub fn state(&self) -> &AssessmentState {
        &self.state
    }

    pub fn answers(&self) -> &AnswerStore {
        &self.answers
    }

    pub fn policy(&self) -> &RecommendationPolicy {
        &self.policy
    }

    pub fn current_stage(&self) -> Stage {
        self.state.stage
    }

    pub fn progress(&self) -> u8 {
        self.state.progress_percent
    }

    /// Ordered questions shown in `stage`. Empty for Intro and Results.
    pub fn questions_for_stage(&self, stage: Stage) -> &[Question] {
        match stage.instrument() {
            Some(instrument) => self.bank.questions(instrument),
            None => &[],
        }
    }

    fn current_catalog(&self) -> Option<&Catalog> {
        self.state
            .stage
            .instrument()
            .map(|instrument| self.bank.catalog(instrument))
    }

    /// Record an answer to a question of the current stage.
    ///
    /// Unknown ids and out-of-range values are ignored and return `false`.
    /// A changed answer in a completed stage reopens it.
    pub fn record_answer(&mut self, question_id: &str, value: u8) -> bool {
        let Some(catalog) = self.current_catalog() else {
            tracing::debug!(stage = %self.state.stage, question_id, "ignoring answer outside an instrument stage");
            return false;
        };
        let instrument = catalog.instrument;
        match catalog.get(question_id).map(|q| q.accepts(value)) {
            Some(true) => {
                let previous = self.answers.insert(instrument, question_id, value);
                if previous != Some(value) {
                    self.reopen_from(self.state.stage);
                }
                true
            }
            Some(false) => {
                tracing::debug!(question_id, value, "ignoring out-of-range answer");
                false
            }
            None => {
                tracing::debug!(%instrument, question_id, "ignoring answer to unknown question");
                false
            }
        }
    }

    /// Answer the question under the cursor.
    pub fn answer_current(&mut self, value: u8) -> bool {
        match self.current_question().map(|q| q.id.clone()) {
            Some(id) => self.record_answer(&id, value),
            None => false,
        }
    }

    /// Whether the current stage may be left forwards.
    ///
    /// Intro and Results have no questions and are always complete.
    pub fn is_stage_complete(&self) -> bool {
        self.current_catalog()
            .map_or(true, |catalog| self.answers.covers(catalog))
    }

    /// Intro → Trait.
    pub fn start(&mut self) -> Result<(), TransitionError> {
        if self.state.stage != Stage::Intro {
            return self.refuse(TransitionError::NotAllowed {
                operation: "start",
                stage: self.state.stage,
            });
        }
        self.enter(Stage::Trait);
        Ok(())
    }

    /// Score the current instrument and move to the next stage.
    pub fn complete_stage(&mut self) -> Result<&InstrumentScore, TransitionError> {
        let stage = self.state.stage;
        let (Some(catalog), Some(next)) = (self.current_catalog(), stage.next()) else {
            return self.refuse(TransitionError::NotAllowed {
                operation: "complete_stage",
                stage,
            });
        };

        let instrument_score = match score(catalog, &self.answers) {
            Ok(s) => s,
            Err(ScoringError::Incomplete {
                answered, total, ..
            }) => {
                return self.refuse(TransitionError::StageIncomplete {
                    stage,
                    answered,
                    total,
                })
            }
        };

        let instrument = instrument_score.instrument;
        tracing::info!(%instrument, overall = instrument_score.overall, "stage scored");
        self.state.instrument_scores.insert(instrument, instrument_score);
        self.state.completed_stages.insert(stage);
        self.enter(next);

        Ok(&self.state.instrument_scores[&instrument])
    }

    /// Move forward: `start` at Intro, `complete_stage` at an instrument stage.
    pub fn advance(&mut self) -> Result<(), TransitionError> {
        match self.state.stage {
            Stage::Intro => self.start(),
            Stage::Trait | Stage::Knowledge | Stage::Readiness => self.complete_stage().map(|_| ()),
            Stage::Results => self.refuse(TransitionError::AtEnd(Stage::Results)),
        }
    }

    /// Step back to the preceding stage. Answers and scores are kept.
    pub fn go_back(&mut self) -> Result<(), TransitionError> {
        match self.state.stage.previous() {
            Some(previous) => {
                self.enter(previous);
                Ok(())
            }
            None => self.refuse(TransitionError::AtStart(self.state.stage)),
        }
    }

    /// Step back to the preceding stage with the cursor on its last question.
    pub fn go_back_to_last_question(&mut self) -> Result<(), TransitionError> {
        self.go_back()?;
        if let Some(catalog) = self.current_catalog() {
            self.cursor = catalog.len().saturating_sub(1);
        }
        Ok(())
    }

    /// Jump to Intro, an earlier stage, or a completed stage.
    pub fn jump_to(&mut self, target: Stage) -> Result<(), TransitionError> {
        if !self.can_jump_to(target) {
            return self.refuse(TransitionError::Unreached {
                from: self.state.stage,
                to: target,
            });
        }
        self.enter(target);
        Ok(())
    }

    pub fn can_jump_to(&self, target: Stage) -> bool {
        target == Stage::Intro
            || target <= self.state.stage
            || self.state.completed_stages.contains(&target)
    }

    /// Discard the attempt and return to Intro.
    pub fn restart(&mut self) {
        self.state = AssessmentState::initial(&self.progress);
        self.answers.clear();
        self.cursor = 0;
        tracing::info!("assessment restarted");
    }

    /// Scores and recommendation, once the Results stage is reached.
    pub fn results(&self) -> Result<AssessmentResults, ResultsError> {
        if self.state.stage != Stage::Results {
            return Err(ResultsError::NotAtResults(self.state.stage));
        }
        let scores = ScoreSet::from_map(&self.state.instrument_scores)
            .map_err(|missing| ResultsError::Incomplete { missing })?;
        let recommendation = recommend(&scores, &self.policy);
        Ok(AssessmentResults {
            scores,
            recommendation,
        })
    }

    /// Scores over what has been answered so far in the current stage.
    pub fn partial_score(&self) -> Option<PartialScore> {
        self.current_catalog()
            .map(|catalog| score_partial(catalog, &self.answers))
    }

    pub fn current_question(&self) -> Option<&Question> {
        self.current_catalog()
            .and_then(|catalog| catalog.questions.get(self.cursor))
    }

    /// Position of the cursor within the current stage.
    pub fn question_index(&self) -> Option<usize> {
        self.current_question().map(|_| self.cursor)
    }

    /// Move the cursor forward. Refused until the current question is answered.
    pub fn next_question(&mut self) -> Result<(), TransitionError> {
        let stage = self.state.stage;
        let Some(catalog) = self.current_catalog() else {
            return self.refuse(TransitionError::NoQuestion(stage));
        };
        let Some(question) = catalog.questions.get(self.cursor) else {
            return self.refuse(TransitionError::NoQuestion(stage));
        };
        if !self.answers.contains(catalog.instrument, &question.id) {
            let id = question.id.clone();
            return self.refuse(TransitionError::Unanswered(id));
        }
        if self.cursor + 1 >= catalog.len() {
            return self.refuse(TransitionError::NoQuestion(stage));
        }
        self.cursor += 1;
        Ok(())
    }

    pub fn previous_question(&mut self) -> Result<(), TransitionError> {
        if self.current_catalog().is_none() || self.cursor == 0 {
            return self.refuse(TransitionError::NoQuestion(self.state.stage));
        }
        self.cursor -= 1;
        Ok(())
    }

    /// Whether the cursor is on the last question of the stage.
    pub fn is_last_question(&self) -> bool {
        self.current_catalog()
            .is_some_and(|catalog| self.cursor + 1 == catalog.len())
    }

    /// Percent of the current stage's questions up to and including the cursor.
    pub fn section_progress(&self) -> Option<u8> {
        let catalog = self.current_catalog()?;
        let len = u32::try_from(catalog.len()).ok()?;
        let position = u32::try_from(self.cursor + 1).ok()?;
        round_percent(position, len)
    }

    /// Correctness of an answered knowledge question.
    pub fn feedback(&self, question_id: &str) -> Option<AnswerFeedback> {
        let question = self.bank.question(Instrument::Knowledge, question_id)?;
        let chosen = self.answers.get(Instrument::Knowledge, question_id)?;
        let correct_index = question.correct_index?;
        Some(AnswerFeedback {
            question_id: question.id.clone(),
            chosen_index: usize::from(chosen),
            correct_index,
            correct: question.is_correct(chosen),
            correct_option: question.options.get(correct_index)?.clone(),
            explanation: question.explanation.clone(),
        })
    }

    fn enter(&mut self, stage: Stage) {
        let from = self.state.stage;
        self.state.stage = stage;
        self.state.progress_percent = self.progress.baseline(stage);
        self.cursor = 0;
        tracing::info!(%from, to = %stage, progress = self.state.progress_percent, "stage changed");
    }

    /// Forget completion and scores of `stage` and everything after it.
    fn reopen_from(&mut self, stage: Stage) {
        if !self.state.completed_stages.contains(&stage) {
            return;
        }
        self.state.completed_stages.retain(|s| *s < stage);
        self.state
            .instrument_scores
            .retain(|instrument, _| instrument.stage() < stage);
        tracing::info!(%stage, "answers changed, stage reopened");
    }

    fn refuse<T>(&self, err: TransitionError) -> Result<T, TransitionError> {
        tracing::warn!(stage = %self.state.stage, "transition refused: {err}");
        Err(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn answer_stage(session: &mut Session, value: u8) {
        let ids: Vec<String> = session
            .questions_for_stage(session.current_stage())
            .iter()
            .map(|q| q.id.clone())
            .collect();
        for id in ids {
            assert!(session.record_answer(&id, value));
        }
    }

    fn answer_knowledge_correctly(session: &mut Session) {
        let answers: Vec<(String, u8)> = session
            .questions_for_stage(Stage::Knowledge)
            .iter()
            .map(|q| (q.id.clone(), q.correct_index.unwrap() as u8))
            .collect();
        for (id, value) in answers {
            assert!(session.record_answer(&id, value));
        }
    }

    fn finished_session() -> Session {
        let mut session = Session::with_reference();
        session.start().unwrap();
        answer_stage(&mut session, 4);
        session.complete_stage().unwrap();
        answer_knowledge_correctly(&mut session);
        session.complete_stage().unwrap();
        answer_stage(&mut session, 3);
        session.complete_stage().unwrap();
        session
    }

    #[test]
    fn new_session_starts_at_intro() {
        let session = Session::with_reference();
        let state = session.state();
        assert_eq!(state.stage, Stage::Intro);
        assert!(state.completed_stages.is_empty());
        assert!(state.instrument_scores.is_empty());
        assert_eq!(state.progress_percent, 20);
        assert!(session.is_stage_complete());
    }

    #[test]
    fn start_only_from_intro() {
        let mut session = Session::with_reference();
        session.start().unwrap();
        assert_eq!(session.current_stage(), Stage::Trait);
        assert_eq!(session.progress(), 25);

        let before = session.state().clone();
        assert!(matches!(
            session.start(),
            Err(TransitionError::NotAllowed { operation: "start", .. })
        ));
        assert_eq!(session.state(), &before);
    }

    #[test]
    fn full_flow_progress_baselines() {
        let mut session = Session::with_reference();
        let mut seen = vec![session.progress()];

        session.advance().unwrap();
        seen.push(session.progress());
        for value in [4, 1, 5] {
            answer_stage(&mut session, value);
            session.advance().unwrap();
            seen.push(session.progress());
        }

        assert_eq!(seen, vec![20, 25, 50, 75, 100]);
        assert_eq!(session.current_stage(), Stage::Results);
        assert_eq!(session.state().completed_stages.len(), 3);
        assert!(matches!(
            session.advance(),
            Err(TransitionError::AtEnd(Stage::Results))
        ));
    }

    #[test]
    fn advance_refused_without_answers() {
        let mut session = Session::with_reference();
        session.start().unwrap();
        let before = session.state().clone();

        let err = session.advance().unwrap_err();
        assert_eq!(
            err,
            TransitionError::StageIncomplete {
                stage: Stage::Trait,
                answered: 0,
                total: 24
            }
        );
        assert_eq!(session.state(), &before);
        assert!(session.state().completed_stages.is_empty());
    }

    #[test]
    fn advance_refused_with_one_answer_missing() {
        let mut session = Session::with_reference();
        session.start().unwrap();
        let ids: Vec<String> = session.questions_for_stage(Stage::Trait)[1..]
            .iter()
            .map(|q| q.id.clone())
            .collect();
        for id in &ids {
            session.record_answer(id, 3);
        }
        assert!(!session.is_stage_complete());
        assert!(session.complete_stage().is_err());
        assert_eq!(session.current_stage(), Stage::Trait);
    }

    #[test]
    fn jump_to_unreached_is_refused() {
        let mut session = Session::with_reference();
        let err = session.jump_to(Stage::Results).unwrap_err();
        assert_eq!(
            err,
            TransitionError::Unreached {
                from: Stage::Intro,
                to: Stage::Results
            }
        );
        assert_eq!(session.current_stage(), Stage::Intro);

        session.start().unwrap();
        assert!(session.jump_to(Stage::Knowledge).is_err());
        assert_eq!(session.current_stage(), Stage::Trait);
    }

    #[test]
    fn jump_between_completed_stages() {
        let mut session = finished_session();
        session.jump_to(Stage::Trait).unwrap();
        assert_eq!(session.progress(), 25);
        session.jump_to(Stage::Readiness).unwrap();
        assert_eq!(session.progress(), 75);
        session.jump_to(Stage::Intro).unwrap();
        assert_eq!(session.current_stage(), Stage::Intro);
        // Scores survive navigation.
        assert_eq!(session.state().instrument_scores.len(), 3);

        // Results is never completed, so it is reached only by advancing.
        assert!(session.jump_to(Stage::Results).is_err());
        session.jump_to(Stage::Readiness).unwrap();
        session.advance().unwrap();
        assert_eq!(session.current_stage(), Stage::Results);
    }

    #[test]
    fn edited_stage_must_be_completed_again_before_results() {
        let mut session = Session::with_reference();
        session.start().unwrap();
        for value in [4, 1, 4] {
            answer_stage(&mut session, value);
            session.advance().unwrap();
        }
        assert_eq!(session.results().unwrap().scores.trait_inventory.overall, 80);

        session.jump_to(Stage::Trait).unwrap();
        answer_stage(&mut session, 1);
        assert!(session.state().completed_stages.is_empty());
        assert!(session.state().instrument_scores.is_empty());

        let before = session.state().clone();
        assert!(matches!(
            session.jump_to(Stage::Results),
            Err(TransitionError::Unreached { .. })
        ));
        assert!(session.jump_to(Stage::Knowledge).is_err());
        assert_eq!(session.state(), &before);

        // Later answers are kept; each stage only needs completing again.
        for _ in 0..3 {
            session.advance().unwrap();
        }
        let results = session.results().unwrap();
        let fresh = score(session.bank().catalog(Instrument::Trait), session.answers()).unwrap();
        assert_eq!(fresh.overall, 20);
        assert_eq!(results.scores.trait_inventory, fresh);
    }

    #[test]
    fn unchanged_answer_keeps_completion() {
        let mut session = finished_session();
        session.jump_to(Stage::Trait).unwrap();
        answer_stage(&mut session, 4);
        assert_eq!(session.state().completed_stages.len(), 3);
        assert!(session.can_jump_to(Stage::Readiness));
    }

    #[test]
    fn go_back_sets_previous_baseline() {
        let mut session = Session::with_reference();
        assert!(matches!(session.go_back(), Err(TransitionError::AtStart(_))));

        session.start().unwrap();
        answer_stage(&mut session, 4);
        session.complete_stage().unwrap();
        assert_eq!(session.progress(), 50);

        session.go_back().unwrap();
        assert_eq!(session.current_stage(), Stage::Trait);
        assert_eq!(session.progress(), 25);
        assert!(session.is_stage_complete());
        // Knowledge was entered but never completed.
        assert!(!session.can_jump_to(Stage::Knowledge));
    }

    #[test]
    fn go_back_to_last_question_positions_cursor() {
        let mut session = Session::with_reference();
        session.start().unwrap();
        answer_stage(&mut session, 4);
        session.complete_stage().unwrap();

        session.go_back_to_last_question().unwrap();
        let total = session.questions_for_stage(Stage::Trait).len();
        assert_eq!(session.current_stage(), Stage::Trait);
        assert_eq!(session.question_index(), Some(total - 1));
        assert!(session.is_last_question());

        session.go_back_to_last_question().unwrap();
        assert_eq!(session.current_stage(), Stage::Intro);
        assert!(session.question_index().is_none());
        assert!(session.go_back_to_last_question().is_err());
    }

    #[test]
    fn progress_is_monotonic_under_advance() {
        let mut session = Session::with_reference();
        let mut last = session.progress();
        for round in 0..8 {
            if round % 2 == 1 {
                answer_stage(&mut session, 2);
            }
            let _ = session.advance();
            assert!(session.progress() >= last);
            last = session.progress();
        }
    }

    #[test]
    fn restart_clears_everything() {
        let mut session = finished_session();
        session.restart();
        let state = session.state();
        assert_eq!(state.stage, Stage::Intro);
        assert!(state.completed_stages.is_empty());
        assert!(state.instrument_scores.is_empty());
        assert_eq!(state.progress_percent, 20);
        assert!(session.answers().is_empty());

        let snapshot = session.state().clone();
        session.restart();
        assert_eq!(session.state(), &snapshot);
    }

    #[test]
    fn record_answer_rejects_unknown_and_out_of_range() {
        let mut session = Session::with_reference();
        assert!(!session.record_answer("interest_1", 4));

        session.start().unwrap();
        assert!(!session.record_answer("no_such_question", 4));
        assert!(!session.record_answer("interest_1", 0));
        assert!(!session.record_answer("interest_1", 6));
        assert!(session.record_answer("interest_1", 5));
        assert!(session.record_answer("interest_1", 2));
        assert_eq!(session.answers().get(Instrument::Trait, "interest_1"), Some(2));
        assert_eq!(session.answers().len(), 1);
    }

    #[test]
    fn knowledge_answers_are_bounded_by_options() {
        let mut session = Session::with_reference();
        session.start().unwrap();
        answer_stage(&mut session, 3);
        session.complete_stage().unwrap();

        let question = &session.questions_for_stage(Stage::Knowledge)[0];
        let id = question.id.clone();
        let options = question.options.len() as u8;
        assert!(!session.record_answer(&id, options));
        assert!(session.record_answer(&id, options - 1));
    }

    #[test]
    fn shared_ids_are_kept_apart_per_instrument() {
        let mut session = Session::with_reference();
        session.start().unwrap();
        answer_stage(&mut session, 5);
        session.complete_stage().unwrap();
        answer_knowledge_correctly(&mut session);
        session.complete_stage().unwrap();

        assert!(!session.is_stage_complete());
        assert!(session.record_answer("interest_1", 1));
        assert_eq!(session.answers().get(Instrument::Trait, "interest_1"), Some(5));
        assert_eq!(session.answers().get(Instrument::Readiness, "interest_1"), Some(1));
    }

    #[test]
    fn results_require_results_stage() {
        let mut session = Session::with_reference();
        assert_eq!(
            session.results().unwrap_err(),
            ResultsError::NotAtResults(Stage::Intro)
        );
        session.start().unwrap();
        assert!(session.results().is_err());
    }

    #[test]
    fn results_of_finished_session() {
        let session = finished_session();
        let results = session.results().unwrap();
        assert_eq!(results.scores.trait_inventory.overall, 80);
        assert_eq!(results.scores.knowledge_quiz.overall, 100);
        assert_eq!(results.scores.readiness_framework.overall, 60);
        assert_eq!(results.recommendation.final_score, 80);
        assert_eq!(
            results.recommendation.tier,
            crate::recommend::Tier::Proceed
        );
        // Re-entering results has no side effects.
        assert_eq!(session.results().unwrap(), results);
    }

    #[test]
    fn results_report_missing_scores() {
        let mut session = finished_session();
        session.state.instrument_scores.remove(&Instrument::Knowledge);
        assert_eq!(
            session.results().unwrap_err(),
            ResultsError::Incomplete {
                missing: vec![Instrument::Knowledge]
            }
        );
    }

    #[test]
    fn revisiting_a_stage_rescores_it() {
        let mut session = finished_session();
        session.jump_to(Stage::Trait).unwrap();
        answer_stage(&mut session, 5);
        session.complete_stage().unwrap();
        assert_eq!(session.state().instrument_scores[&Instrument::Trait].overall, 100);
        assert_eq!(session.current_stage(), Stage::Knowledge);
        assert!(!session.state().instrument_scores.contains_key(&Instrument::Knowledge));
    }

    #[test]
    fn cursor_is_gated_on_answers() {
        let mut session = Session::with_reference();
        assert!(session.current_question().is_none());
        assert!(session.next_question().is_err());

        session.start().unwrap();
        assert_eq!(session.question_index(), Some(0));
        let first = session.current_question().unwrap().id.clone();
        assert_eq!(
            session.next_question().unwrap_err(),
            TransitionError::Unanswered(first)
        );
        assert!(session.previous_question().is_err());

        assert!(session.answer_current(4));
        session.next_question().unwrap();
        assert_eq!(session.question_index(), Some(1));
        session.previous_question().unwrap();
        assert_eq!(session.question_index(), Some(0));
    }

    #[test]
    fn cursor_walks_to_last_question_and_resets_on_stage_change() {
        let mut session = Session::with_reference();
        session.start().unwrap();
        let total = session.questions_for_stage(Stage::Trait).len();
        assert_eq!(session.section_progress(), Some(4)); // 1 of 24

        while !session.is_last_question() {
            assert!(session.answer_current(3));
            session.next_question().unwrap();
        }
        assert!(session.answer_current(3));
        assert_eq!(session.question_index(), Some(total - 1));
        assert_eq!(session.section_progress(), Some(100));
        assert!(matches!(
            session.next_question(),
            Err(TransitionError::NoQuestion(Stage::Trait))
        ));

        session.complete_stage().unwrap();
        assert_eq!(session.question_index(), Some(0));
        assert_eq!(session.current_stage(), Stage::Knowledge);
    }

    #[test]
    fn feedback_for_knowledge_answers() {
        let mut session = Session::with_reference();
        session.start().unwrap();
        answer_stage(&mut session, 3);
        session.complete_stage().unwrap();

        let question = session.questions_for_stage(Stage::Knowledge)[0].clone();
        let correct = question.correct_index.unwrap();
        assert!(session.feedback(&question.id).is_none());

        let wrong = ((correct + 1) % question.options.len()) as u8;
        session.record_answer(&question.id, wrong);
        let feedback = session.feedback(&question.id).unwrap();
        assert!(!feedback.correct);
        assert_eq!(feedback.correct_index, correct);
        assert_eq!(feedback.correct_option, question.options[correct]);

        session.record_answer(&question.id, correct as u8);
        assert!(session.feedback(&question.id).unwrap().correct);
        assert!(session.feedback("interest_1").is_none());
    }

    #[test]
    fn partial_score_during_stage() {
        let mut session = Session::with_reference();
        assert!(session.partial_score().is_none());
        session.start().unwrap();
        session.answer_current(5);
        let partial = session.partial_score().unwrap();
        assert_eq!(partial.answered, 1);
        assert_eq!(partial.overall, Some(100));
    }

    #[test]
    fn custom_baselines_apply() {
        let progress = ProgressConfig {
            intro: 0,
            trait_stage: 10,
            knowledge: 40,
            readiness: 70,
            results: 100,
        };
        let mut session = Session::new(
            Arc::new(reference().clone()),
            progress,
            RecommendationPolicy::default(),
        );
        assert_eq!(session.progress(), 0);
        session.start().unwrap();
        assert_eq!(session.progress(), 10);
    }
}
