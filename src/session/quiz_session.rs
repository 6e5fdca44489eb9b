use std::collections::BTreeMap;

use rand::{rngs::StdRng, Rng, SeedableRng};

use crate::{
    errors::{QuizError, QuizResult},
    models::domain::{OptionLabel, QuizSet},
    session::{
        AnswerFeedback, AnswerRecord, DisplayMapping, Progress, QuestionView, ResultSummary,
        ReviewItem,
    },
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    Idle,
    AwaitingSelection,
    Answered,
    Finished,
}

/// Runs one user through a quiz set.
///
/// Transitions called in the wrong phase are no-ops and report `false` /
/// `None`; duplicate UI events must not change the score.
pub struct QuizSession<R = StdRng> {
    quiz_set: Option<QuizSet>,
    phase: SessionPhase,
    current_index: usize,
    score: u32,
    selected_answer: Option<OptionLabel>,
    mapping: Option<DisplayMapping>,
    answer_history: BTreeMap<usize, AnswerRecord>,
    rng: R,
}

impl QuizSession<StdRng> {
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }
}

impl Default for QuizSession<StdRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Rng> QuizSession<R> {
    pub fn with_rng(rng: R) -> Self {
        Self {
            quiz_set: None,
            phase: SessionPhase::Idle,
            current_index: 0,
            score: 0,
            selected_answer: None,
            mapping: None,
            answer_history: BTreeMap::new(),
            rng,
        }
    }

    /// Starts a quiz at question 1. An empty set is refused and leaves the
    /// session untouched.
    pub fn seed(&mut self, quiz_set: QuizSet) -> QuizResult<()> {
        if quiz_set.is_empty() {
            return Err(QuizError::creation_failure(
                "The quiz has no questions to play.",
            ));
        }

        log::debug!("Seeding quiz session with {} questions", quiz_set.len());
        self.quiz_set = Some(quiz_set);
        self.reset_progress();
        Ok(())
    }

    pub fn select(&mut self, display_label: OptionLabel) -> bool {
        if self.phase != SessionPhase::AwaitingSelection {
            return false;
        }
        self.selected_answer = Some(display_label);
        true
    }

    pub fn submit(&mut self) -> Option<AnswerFeedback> {
        if self.phase != SessionPhase::AwaitingSelection {
            return None;
        }
        let selected = self.selected_answer?;
        let mapping = self.mapping?;
        let record = self.quiz_set.as_ref()?.get(self.current_index)?;

        let feedback = AnswerFeedback::build(record, &mapping, selected);
        if feedback.is_correct {
            self.score += 1;
        }
        self.answer_history.insert(
            self.current_index,
            AnswerRecord {
                display_label: selected,
                original_label: mapping.original_for(selected),
                is_correct: feedback.is_correct,
            },
        );
        self.phase = SessionPhase::Answered;
        Some(feedback)
    }

    /// Moves to the next question, or to `Finished` after the last one.
    pub fn advance(&mut self) -> bool {
        if self.phase != SessionPhase::Answered {
            return false;
        }
        let next = self.current_index + 1;
        if next < self.total() {
            self.enter_question(next);
        } else {
            self.phase = SessionPhase::Finished;
            self.mapping = None;
            self.selected_answer = None;
            log::debug!("Quiz finished with score {}/{}", self.score, self.total());
        }
        true
    }

    /// Replays the same quiz set from question 1 without regenerating.
    pub fn restart(&mut self) -> bool {
        if self.quiz_set.is_none() {
            return false;
        }
        self.reset_progress();
        true
    }

    /// Drops the finished quiz set so a new one can be generated.
    pub fn return_to_input(&mut self) -> bool {
        if self.phase != SessionPhase::Finished {
            return false;
        }
        self.quiz_set = None;
        self.phase = SessionPhase::Idle;
        self.current_index = 0;
        self.score = 0;
        self.selected_answer = None;
        self.mapping = None;
        self.answer_history.clear();
        true
    }

    fn reset_progress(&mut self) {
        self.score = 0;
        self.answer_history.clear();
        self.enter_question(0);
    }

    fn enter_question(&mut self, index: usize) {
        let mapping = match self.quiz_set.as_ref().and_then(|set| set.get(index)) {
            Some(record) => DisplayMapping::shuffled(record, &mut self.rng),
            None => return,
        };
        self.current_index = index;
        self.mapping = Some(mapping);
        self.selected_answer = None;
        self.phase = SessionPhase::AwaitingSelection;
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn total(&self) -> usize {
        self.quiz_set.as_ref().map_or(0, QuizSet::len)
    }

    pub fn selected_answer(&self) -> Option<OptionLabel> {
        self.selected_answer
    }

    pub fn is_answered(&self) -> bool {
        self.phase == SessionPhase::Answered
    }

    pub fn answer_history(&self) -> &BTreeMap<usize, AnswerRecord> {
        &self.answer_history
    }

    pub fn quiz_set(&self) -> Option<&QuizSet> {
        self.quiz_set.as_ref()
    }

    pub fn display_mapping(&self) -> Option<&DisplayMapping> {
        self.mapping.as_ref()
    }

    /// `None` before a quiz is seeded. Once finished, `number` equals `total`.
    pub fn progress(&self) -> Option<Progress> {
        let total = self.total();
        if self.phase == SessionPhase::Idle || total == 0 {
            return None;
        }
        Some(Progress {
            number: (self.current_index + 1).min(total),
            total,
            score: self.score,
        })
    }

    pub fn current_question(&self) -> Option<QuestionView> {
        if !matches!(self.phase, SessionPhase::AwaitingSelection | SessionPhase::Answered) {
            return None;
        }
        let record = self.quiz_set.as_ref()?.get(self.current_index)?;
        let mapping = self.mapping.as_ref()?;
        Some(QuestionView::build(
            record,
            mapping,
            self.current_index,
            self.total(),
            self.selected_answer,
            self.score,
        ))
    }

    /// Feedback for the answered current question.
    pub fn feedback(&self) -> Option<AnswerFeedback> {
        if self.phase != SessionPhase::Answered {
            return None;
        }
        let record = self.quiz_set.as_ref()?.get(self.current_index)?;
        let answer = self.answer_history.get(&self.current_index)?;
        let mapping = self.mapping.as_ref()?;
        Some(AnswerFeedback::build(record, mapping, answer.display_label))
    }

    pub fn result_summary(&self) -> Option<ResultSummary> {
        (self.phase == SessionPhase::Finished)
            .then(|| ResultSummary::new(self.score, self.total() as u32))
    }

    pub fn review(&self) -> Option<Vec<ReviewItem>> {
        if self.phase != SessionPhase::Finished {
            return None;
        }
        let quiz_set = self.quiz_set.as_ref()?;
        Some(
            quiz_set
                .iter()
                .enumerate()
                .map(|(index, record)| ReviewItem::build(index, record, self.answer_history.get(&index)))
                .collect(),
        )
    }
}
