//! Core data model types for quizforge.
//!
//! A [`Question`] carries its prompt plus a [`QuestionKind`] holding exactly
//! the data its type needs. Catalog records ([`QuizMeta`], [`Quiz`]) describe
//! where questions come from.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::QuizError;

/// Option letter → option text, ordered by letter.
pub type Options = BTreeMap<String, String>;

/// The five supported answer shapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionType {
    MultipleChoice,
    MultipleResponse,
    TrueFalse,
    ShortAnswer,
    FillInBlank,
}

impl fmt::Display for QuestionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QuestionType::MultipleChoice => write!(f, "multiple_choice"),
            QuestionType::MultipleResponse => write!(f, "multiple_response"),
            QuestionType::TrueFalse => write!(f, "true_false"),
            QuestionType::ShortAnswer => write!(f, "short_answer"),
            QuestionType::FillInBlank => write!(f, "fill_in_blank"),
        }
    }
}

impl FromStr for QuestionType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "multiple_choice" => Ok(QuestionType::MultipleChoice),
            "multiple_response" => Ok(QuestionType::MultipleResponse),
            "true_false" => Ok(QuestionType::TrueFalse),
            "short_answer" => Ok(QuestionType::ShortAnswer),
            "fill_in_blank" => Ok(QuestionType::FillInBlank),
            other => Err(format!("unknown question type: {other}")),
        }
    }
}

/// Type-specific question data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum QuestionKind {
    MultipleChoice {
        options: Options,
        correct_answer: String,
    },
    MultipleResponse {
        options: Options,
        correct_answers: BTreeSet<String>,
    },
    TrueFalse {
        correct_answer: bool,
    },
    ShortAnswer {
        accepted_answers: Vec<String>,
    },
    FillInBlank {
        accepted_answers: Vec<String>,
    },
}

impl QuestionKind {
    pub fn question_type(&self) -> QuestionType {
        match self {
            QuestionKind::MultipleChoice { .. } => QuestionType::MultipleChoice,
            QuestionKind::MultipleResponse { .. } => QuestionType::MultipleResponse,
            QuestionKind::TrueFalse { .. } => QuestionType::TrueFalse,
            QuestionKind::ShortAnswer { .. } => QuestionType::ShortAnswer,
            QuestionKind::FillInBlank { .. } => QuestionType::FillInBlank,
        }
    }

    /// The lettered options, for choice types.
    pub fn options(&self) -> Option<&Options> {
        match self {
            QuestionKind::MultipleChoice { options, .. }
            | QuestionKind::MultipleResponse { options, .. } => Some(options),
            QuestionKind::TrueFalse { .. }
            | QuestionKind::ShortAnswer { .. }
            | QuestionKind::FillInBlank { .. } => None,
        }
    }
}

/// A single quiz question. Its id is its index in the question list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    /// The question text shown to the user.
    pub prompt: String,
    #[serde(flatten)]
    pub kind: QuestionKind,
}

impl Question {
    pub fn new(prompt: impl Into<String>, kind: QuestionKind) -> Self {
        Self {
            prompt: prompt.into(),
            kind,
        }
    }

    pub fn multiple_choice<'a>(
        prompt: impl Into<String>,
        options: impl IntoIterator<Item = (&'a str, &'a str)>,
        correct_answer: &str,
    ) -> Self {
        Self::new(
            prompt,
            QuestionKind::MultipleChoice {
                options: collect_options(options),
                correct_answer: correct_answer.to_string(),
            },
        )
    }

    pub fn multiple_response<'a>(
        prompt: impl Into<String>,
        options: impl IntoIterator<Item = (&'a str, &'a str)>,
        correct_answers: &[&str],
    ) -> Self {
        Self::new(
            prompt,
            QuestionKind::MultipleResponse {
                options: collect_options(options),
                correct_answers: correct_answers.iter().map(|s| s.to_string()).collect(),
            },
        )
    }

    pub fn true_false(prompt: impl Into<String>, correct_answer: bool) -> Self {
        Self::new(prompt, QuestionKind::TrueFalse { correct_answer })
    }

    pub fn short_answer(prompt: impl Into<String>, accepted_answers: &[&str]) -> Self {
        Self::new(
            prompt,
            QuestionKind::ShortAnswer {
                accepted_answers: accepted_answers.iter().map(|s| s.to_string()).collect(),
            },
        )
    }

    pub fn fill_in_blank(prompt: impl Into<String>, accepted_answers: &[&str]) -> Self {
        Self::new(
            prompt,
            QuestionKind::FillInBlank {
                accepted_answers: accepted_answers.iter().map(|s| s.to_string()).collect(),
            },
        )
    }

    pub fn question_type(&self) -> QuestionType {
        self.kind.question_type()
    }

    pub fn options(&self) -> Option<&Options> {
        self.kind.options()
    }

    /// Check the structural invariants of this question.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::InvalidInput` describing the first violation found.
    pub fn validate(&self) -> Result<(), QuizError> {
        let qtype = self.question_type();
        match &self.kind {
            QuestionKind::MultipleChoice {
                options,
                correct_answer,
            } => {
                if options.is_empty() {
                    return Err(invalid(qtype, "has no options"));
                }
                if !options.contains_key(correct_answer) {
                    return Err(invalid(
                        qtype,
                        format!("correct answer '{correct_answer}' is not an option"),
                    ));
                }
            }
            QuestionKind::MultipleResponse {
                options,
                correct_answers,
            } => {
                if options.is_empty() {
                    return Err(invalid(qtype, "has no options"));
                }
                if correct_answers.is_empty() {
                    return Err(invalid(qtype, "has no correct answers"));
                }
                if let Some(stray) = correct_answers.iter().find(|l| !options.contains_key(*l)) {
                    return Err(invalid(
                        qtype,
                        format!("correct answer '{stray}' is not an option"),
                    ));
                }
            }
            QuestionKind::TrueFalse { .. } => {}
            QuestionKind::ShortAnswer { accepted_answers }
            | QuestionKind::FillInBlank { accepted_answers } => {
                if accepted_answers.is_empty() {
                    return Err(invalid(qtype, "has no accepted answers"));
                }
            }
        }
        Ok(())
    }
}

fn collect_options<'a>(options: impl IntoIterator<Item = (&'a str, &'a str)>) -> Options {
    options
        .into_iter()
        .map(|(letter, text)| (letter.to_string(), text.to_string()))
        .collect()
}

fn invalid(qtype: QuestionType, reason: impl fmt::Display) -> QuizError {
    QuizError::InvalidInput(format!("{qtype} question {reason}"))
}

/// One entry of a catalog index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizMeta {
    /// Unique identifier used to select the quiz.
    pub id: String,
    /// Human-readable title.
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub icon: String,
    /// File holding the questions, relative to the catalog root.
    pub file: String,
}

/// A quiz loaded from a catalog, ready to start a session with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quiz {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub icon: String,
    pub questions: Vec<Question>,
}

impl Quiz {
    pub fn from_meta(meta: &QuizMeta, questions: Vec<Question>) -> Self {
        Self {
            id: meta.id.clone(),
            title: meta.title.clone(),
            description: meta.description.clone(),
            icon: meta.icon.clone(),
            questions,
        }
    }
}
