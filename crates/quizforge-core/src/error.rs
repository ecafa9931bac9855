//! Quiz session error types.
//!
//! Every failure is local to the call that caused it. Nothing is retried and
//! the session is left unchanged when an error is returned.

use thiserror::Error;

use crate::model::QuestionType;

/// Errors returned by [`QuizSession`](crate::session::QuizSession) operations.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum QuizError {
    /// The question set is empty or a question is malformed.
    #[error("invalid question set: {0}")]
    InvalidInput(String),

    /// The value is not acceptable for the current question.
    #[error("invalid answer for {question_type} question: {reason}")]
    InvalidAnswer {
        question_type: QuestionType,
        reason: String,
    },

    /// Navigation or a query fell outside the session's questions.
    #[error("position {index} is out of range for {len} question(s)")]
    OutOfRange { index: usize, len: usize },
}

impl QuizError {
    pub(crate) fn invalid_answer(question_type: QuestionType, reason: impl Into<String>) -> Self {
        QuizError::InvalidAnswer {
            question_type,
            reason: reason.into(),
        }
    }

    /// Returns `true` for errors caused by a navigation request.
    pub fn is_out_of_range(&self) -> bool {
        matches!(self, QuizError::OutOfRange { .. })
    }
}
