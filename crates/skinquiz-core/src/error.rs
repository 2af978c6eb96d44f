//! Quiz engine error types.
//!
//! Every variant is a precondition violation raised synchronously by the
//! call that violates it. None of them are transient, so callers should
//! never retry; a UI that surfaces one of these has a bug.

use thiserror::Error;

/// Errors raised by the quiz engine and text localization.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QuizError {
    /// The definition cannot be run (no questions, or no result bands).
    #[error("invalid quiz definition '{quiz_id}': {reason}")]
    InvalidDefinition { quiz_id: String, reason: String },

    /// `current_question` was called after the last answer was applied.
    #[error("quiz is already completed")]
    QuizAlreadyCompleted,

    /// The chosen option is not one of the current question's options.
    #[error("option is not part of question {question_index}")]
    InvalidOption { question_index: usize },

    /// `retract_last_answer` was called with an empty answer history.
    #[error("no answer to retract")]
    NoAnswerToRetract,

    /// `resolve_result` was called before every question was answered.
    #[error("quiz is not completed ({answered}/{total} answered)")]
    QuizNotCompleted { answered: usize, total: usize },

    /// The language code is unknown, or not offered by this quiz.
    #[error("unsupported language: {0}")]
    UnsupportedLanguage(String),

    /// A localized text has neither the requested nor the default language.
    #[error("missing translation for '{language}' (default '{default}')")]
    MissingTranslation { language: String, default: String },
}

impl QuizError {
    /// Returns `true` for errors that mean the caller drove the engine
    /// through an illegal transition, as opposed to a bad definition or
    /// bad content.
    pub fn is_navigation_error(&self) -> bool {
        matches!(
            self,
            QuizError::QuizAlreadyCompleted
                | QuizError::InvalidOption { .. }
                | QuizError::NoAnswerToRetract
                | QuizError::QuizNotCompleted { .. }
        )
    }
}
