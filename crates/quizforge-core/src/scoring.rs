//! Per-type grading rules.
//!
//! Grading is all-or-nothing per question. These rules decide score
//! compatibility with any other implementation of the same quiz format, so
//! they are kept deliberately literal.

use crate::answer::Answer;
use crate::model::QuestionKind;

/// Normalize free text for comparison: trim surrounding whitespace and
/// lowercase.
pub fn normalize_text(text: &str) -> String {
    text.trim().to_lowercase()
}

/// Whether `answer` is a correct answer to a question of kind `kind`.
///
/// An unanswered slot is always incorrect, as is a stored value whose shape
/// does not match the question type.
pub fn grade(kind: &QuestionKind, answer: &Answer) -> bool {
    match (kind, answer) {
        (QuestionKind::MultipleChoice { correct_answer, .. }, Answer::Single(letter)) => {
            letter == correct_answer
        }
        (QuestionKind::TrueFalse { correct_answer }, Answer::Single(value)) => {
            *value == correct_answer.to_string()
        }
        (QuestionKind::MultipleResponse { correct_answers, .. }, Answer::Multiple(letters)) => {
            !letters.is_empty() && letters == correct_answers
        }
        (
            QuestionKind::ShortAnswer { accepted_answers }
            | QuestionKind::FillInBlank { accepted_answers },
            Answer::Single(text),
        ) => {
            let given = normalize_text(text);
            accepted_answers
                .iter()
                .any(|accepted| normalize_text(accepted) == given)
        }
        _ => false,
    }
}
