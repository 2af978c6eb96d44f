//! Quiz traversal engine.
//!
//! A [`QuizEngine`] borrows one immutable [`QuizDefinition`] and owns the
//! [`QuizRunState`] of a single session. Answers are applied one at a
//! time, the most recent answer can be retracted, and a completed run
//! resolves its total score to a [`ResultBand`].
//!
//! ```text
//! InProgress(0) --answer--> InProgress(1) --> ... --> InProgress(N-1) --answer--> Completed
//!               <--retract--              <-- ... <--                 <--retract--
//! ```
//!
//! Every mutating operation takes `&mut self`, so a state can never be
//! advanced by two callers at once. A failed operation leaves the state
//! exactly as it was.

use crate::error::QuizError;
use crate::model::{Question, QuizDefinition, QuizOption, ResultBand};
use crate::scoring::{resolve_band, total_overflows, BandMatch};

/// Progress of one session through a quiz.
///
/// Only [`QuizEngine`] can mutate it, which keeps `total_score` equal to
/// the sum of `answer_history` at every observable point.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct QuizRunState {
    current_index: usize,
    answer_history: Vec<i32>,
    choices: Vec<usize>,
    total_score: i32,
    completed: bool,
}

impl QuizRunState {
    /// Index of the question awaiting an answer (equals the question count
    /// once completed).
    pub fn current_index(&self) -> usize {
        self.current_index
    }

    /// Score of each answered question, in answer order.
    pub fn answer_history(&self) -> &[i32] {
        &self.answer_history
    }

    /// Position of the chosen option within each answered question.
    pub fn choices(&self) -> &[usize] {
        &self.choices
    }

    pub fn total_score(&self) -> i32 {
        self.total_score
    }

    pub fn is_completed(&self) -> bool {
        self.completed
    }

    pub fn answered(&self) -> usize {
        self.answer_history.len()
    }
}

/// The band a completed run resolved to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolution<'d> {
    pub band: &'d ResultBand,
    /// Index of `band` in the definition's `results`.
    pub index: usize,
    /// `false` when the score fell outside every band and the first band
    /// was used as the fallback.
    pub matched: bool,
    pub total_score: i32,
}

/// Drives one session through a quiz definition.
#[derive(Debug, Clone)]
pub struct QuizEngine<'d> {
    definition: &'d QuizDefinition,
    state: QuizRunState,
}

impl<'d> QuizEngine<'d> {
    /// Start a fresh run.
    ///
    /// Fails with [`QuizError::InvalidDefinition`] when the quiz has no
    /// questions, no result bands, or option scores whose running total can
    /// leave the `i32` range.
    pub fn initialize(definition: &'d QuizDefinition) -> Result<Self, QuizError> {
        if definition.questions.is_empty() {
            return Err(QuizError::InvalidDefinition {
                quiz_id: definition.id.clone(),
                reason: "quiz has no questions".into(),
            });
        }
        if definition.results.is_empty() {
            return Err(QuizError::InvalidDefinition {
                quiz_id: definition.id.clone(),
                reason: "quiz has no result bands".into(),
            });
        }
        if total_overflows(definition) {
            return Err(QuizError::InvalidDefinition {
                quiz_id: definition.id.clone(),
                reason: "score total overflows".into(),
            });
        }

        tracing::debug!(
            quiz = %definition.id,
            questions = definition.questions.len(),
            "quiz run started"
        );

        Ok(Self {
            definition,
            state: QuizRunState::default(),
        })
    }

    pub fn definition(&self) -> &'d QuizDefinition {
        self.definition
    }

    pub fn state(&self) -> &QuizRunState {
        &self.state
    }

    pub fn is_completed(&self) -> bool {
        self.state.completed
    }

    /// Number of questions in the quiz.
    pub fn len(&self) -> usize {
        self.definition.questions.len()
    }

    /// Always `false`: an engine cannot be built over an empty quiz.
    pub fn is_empty(&self) -> bool {
        self.definition.questions.is_empty()
    }

    /// The question awaiting an answer.
    pub fn current_question(&self) -> Result<&'d Question, QuizError> {
        if self.state.completed {
            return Err(QuizError::QuizAlreadyCompleted);
        }
        Ok(&self.definition.questions[self.state.current_index])
    }

    /// Answer the current question with `option`.
    ///
    /// The option is matched by text against the current question's
    /// authored options, and the authored score is what gets added; the
    /// score carried by `option` itself is ignored.
    pub fn apply_answer(&mut self, option: &QuizOption) -> Result<&QuizRunState, QuizError> {
        let question = self.current_question()?;
        let index = question
            .options
            .iter()
            .position(|o| o.text == option.text)
            .ok_or(QuizError::InvalidOption {
                question_index: self.state.current_index,
            })?;
        Ok(self.record(index))
    }

    /// Answer the current question with the option at `option_index`.
    pub fn apply_answer_at(&mut self, option_index: usize) -> Result<&QuizRunState, QuizError> {
        let question = self.current_question()?;
        if option_index >= question.options.len() {
            return Err(QuizError::InvalidOption {
                question_index: self.state.current_index,
            });
        }
        Ok(self.record(option_index))
    }

    fn record(&mut self, option_index: usize) -> &QuizRunState {
        let question_index = self.state.current_index;
        let score = self.definition.questions[question_index].options[option_index].score;

        self.state.answer_history.push(score);
        self.state.choices.push(option_index);
        // Cannot overflow: initialize rejects quizzes whose running total can.
        self.state.total_score += score;
        self.state.current_index += 1;
        self.state.completed = self.state.current_index == self.definition.questions.len();

        tracing::debug!(
            quiz = %self.definition.id,
            question = question_index,
            option = option_index,
            score,
            total = self.state.total_score,
            completed = self.state.completed,
            "answer applied"
        );

        &self.state
    }

    /// Undo the most recent answer and reopen its question.
    ///
    /// Returns the score that was removed. Repeated calls walk the history
    /// back to the initial state.
    pub fn retract_last_answer(&mut self) -> Result<i32, QuizError> {
        let score = self
            .state
            .answer_history
            .pop()
            .ok_or(QuizError::NoAnswerToRetract)?;
        self.state.choices.pop();
        self.state.total_score -= score;
        self.state.current_index -= 1;
        self.state.completed = false;

        tracing::debug!(
            quiz = %self.definition.id,
            question = self.state.current_index,
            score,
            total = self.state.total_score,
            "answer retracted"
        );

        Ok(score)
    }

    /// Discard all answers and start over at the first question.
    pub fn restart(&mut self) {
        self.state = QuizRunState::default();
    }

    /// Resolve the completed run to a band, reporting whether the fallback
    /// band was used.
    pub fn resolution(&self) -> Result<Resolution<'d>, QuizError> {
        if !self.state.completed {
            return Err(QuizError::QuizNotCompleted {
                answered: self.state.answered(),
                total: self.definition.questions.len(),
            });
        }

        let total_score = self.state.total_score;
        let BandMatch { index, matched } = resolve_band(&self.definition.results, total_score)
            .ok_or_else(|| QuizError::InvalidDefinition {
                quiz_id: self.definition.id.clone(),
                reason: "quiz has no result bands".into(),
            })?;

        if !matched {
            tracing::warn!(
                quiz = %self.definition.id,
                total_score,
                "score outside every result band, using the first band"
            );
        }

        Ok(Resolution {
            band: &self.definition.results[index],
            index,
            matched,
            total_score,
        })
    }

    /// The recommendation band for the completed run.
    ///
    /// The first band (in authored order) containing the total wins; a
    /// total no band contains resolves to the first band.
    pub fn resolve_result(&self) -> Result<&'d ResultBand, QuizError> {
        self.resolution().map(|r| r.band)
    }

    /// Fraction of the quiz reached, in `[0, 1]`.
    ///
    /// While in progress this counts the question on screen as reached:
    /// `(current_index + 1) / len`. Completed runs report exactly `1.0`.
    pub fn progress_fraction(&self) -> f64 {
        if self.state.completed {
            return 1.0;
        }
        let total = self.definition.questions.len() as f64;
        ((self.state.current_index + 1) as f64 / total).min(1.0)
    }
}
