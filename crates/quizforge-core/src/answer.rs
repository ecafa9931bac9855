//! Answer slots and per-type answer validation.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::error::QuizError;
use crate::model::{Options, QuestionKind, QuestionType};

/// The value stored in one question's slot.
///
/// Serializes as `null`, a string, or a sorted array of letters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Answer {
    /// The slot has never been written.
    #[default]
    Unanswered,
    /// A letter, `"true"`/`"false"`, or free text, stored verbatim.
    Single(String),
    /// Selected letters of a multiple-response question.
    Multiple(BTreeSet<String>),
}

impl Answer {
    /// Whether this slot counts as answered for completion purposes.
    ///
    /// An empty string and an empty letter set count as unanswered even
    /// though they are stored.
    pub fn is_answered(&self) -> bool {
        match self {
            Answer::Unanswered => false,
            Answer::Single(value) => !value.is_empty(),
            Answer::Multiple(letters) => !letters.is_empty(),
        }
    }

    pub fn as_single(&self) -> Option<&str> {
        match self {
            Answer::Single(value) => Some(value),
            _ => None,
        }
    }

    pub fn letters(&self) -> Option<&BTreeSet<String>> {
        match self {
            Answer::Multiple(letters) => Some(letters),
            _ => None,
        }
    }
}

/// A value submitted by the caller for the current question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Response {
    Single(String),
    Multiple(Vec<String>),
}

impl From<&str> for Response {
    fn from(value: &str) -> Self {
        Response::Single(value.to_string())
    }
}

impl From<String> for Response {
    fn from(value: String) -> Self {
        Response::Single(value)
    }
}

impl From<Vec<String>> for Response {
    fn from(letters: Vec<String>) -> Self {
        Response::Multiple(letters)
    }
}

impl From<Vec<&str>> for Response {
    fn from(letters: Vec<&str>) -> Self {
        Response::Multiple(letters.into_iter().map(str::to_string).collect())
    }
}

impl<const N: usize> From<[&str; N]> for Response {
    fn from(letters: [&str; N]) -> Self {
        Response::Multiple(letters.into_iter().map(str::to_string).collect())
    }
}

impl From<BTreeSet<String>> for Response {
    fn from(letters: BTreeSet<String>) -> Self {
        Response::Multiple(letters.into_iter().collect())
    }
}

/// Validate `response` against `kind` and produce the value to store.
///
/// # Errors
///
/// Returns `QuizError::InvalidAnswer` when the response has the wrong shape
/// for the question type or names a letter that is not an option.
pub fn normalize(kind: &QuestionKind, response: Response) -> Result<Answer, QuizError> {
    let qtype = kind.question_type();
    match (kind, response) {
        (QuestionKind::MultipleChoice { options, .. }, Response::Single(letter)) => {
            ensure_option(options, &letter, qtype)?;
            Ok(Answer::Single(letter))
        }
        (QuestionKind::MultipleResponse { options, .. }, Response::Multiple(letters)) => {
            for letter in &letters {
                ensure_option(options, letter, qtype)?;
            }
            Ok(Answer::Multiple(letters.into_iter().collect()))
        }
        (QuestionKind::TrueFalse { .. }, Response::Single(value)) => match value.as_str() {
            "true" | "false" => Ok(Answer::Single(value)),
            _ => Err(QuizError::invalid_answer(
                qtype,
                format!("expected \"true\" or \"false\", got \"{value}\""),
            )),
        },
        (
            QuestionKind::ShortAnswer { .. } | QuestionKind::FillInBlank { .. },
            Response::Single(text),
        ) => Ok(Answer::Single(text)),
        (QuestionKind::MultipleResponse { .. }, Response::Single(_)) => Err(
            QuizError::invalid_answer(qtype, "expected a set of letters"),
        ),
        (_, Response::Multiple(_)) => Err(QuizError::invalid_answer(
            qtype,
            "expected a single value, not a set",
        )),
    }
}

/// Flip `letter` in the current multiple-response selection.
///
/// # Errors
///
/// Returns `QuizError::InvalidAnswer` for non multiple-response questions.
pub fn toggled(kind: &QuestionKind, current: &Answer, letter: &str) -> Result<Response, QuizError> {
    let QuestionKind::MultipleResponse { .. } = kind else {
        return Err(QuizError::invalid_answer(
            kind.question_type(),
            "only multiple_response answers can be toggled",
        ));
    };

    let mut letters = current.letters().cloned().unwrap_or_default();
    if !letters.remove(letter) {
        letters.insert(letter.to_string());
    }
    Ok(Response::from(letters))
}

fn ensure_option(
    options: &Options,
    letter: &str,
    qtype: QuestionType,
) -> Result<(), QuizError> {
    if options.contains_key(letter) {
        Ok(())
    } else {
        let valid: Vec<&str> = options.keys().map(String::as_str).collect();
        Err(QuizError::invalid_answer(
            qtype,
            format!("'{letter}' is not one of {}", valid.join(", ")),
        ))
    }
}
