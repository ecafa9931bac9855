//! JSON quiz file parser.
//!
//! Parses catalog index files and quiz question files, and validates them.
//! The wire format uses the catalog's camelCase field names; questions are
//! converted into typed [`Question`] values here so the session never sees
//! malformed data.

use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::path::Path;

use anyhow::{Context, Result};
use serde::de::{self, MapAccess, Visitor};
use serde::{Deserialize, Deserializer};

use crate::model::{Question, QuestionKind, QuestionType, QuizMeta};
use crate::scoring::normalize_text;

/// Intermediate JSON structure for quiz files.
#[derive(Debug, Deserialize)]
struct JsonQuizFile {
    questions: Vec<JsonQuestion>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct JsonQuestion {
    #[serde(rename = "type")]
    question_type: String,
    #[serde(alias = "prompt")]
    question: String,
    #[serde(default, deserialize_with = "unique_options")]
    options: BTreeMap<String, String>,
    #[serde(default)]
    correct_answer: Option<JsonCorrect>,
    #[serde(default)]
    correct_answers: Option<Vec<String>>,
}

/// Option maps reject repeated letters instead of keeping the last one.
fn unique_options<'de, D>(deserializer: D) -> std::result::Result<BTreeMap<String, String>, D::Error>
where
    D: Deserializer<'de>,
{
    struct OptionsVisitor;

    impl<'de> Visitor<'de> for OptionsVisitor {
        type Value = BTreeMap<String, String>;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a map of option letters to option text")
        }

        fn visit_map<A>(self, mut map: A) -> std::result::Result<Self::Value, A::Error>
        where
            A: MapAccess<'de>,
        {
            let mut options = BTreeMap::new();
            while let Some((letter, text)) = map.next_entry::<String, String>()? {
                if options.contains_key(&letter) {
                    return Err(de::Error::custom(format!("duplicate option '{letter}'")));
                }
                options.insert(letter, text);
            }
            Ok(options)
        }
    }

    deserializer.deserialize_map(OptionsVisitor)
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum JsonCorrect {
    Flag(bool),
    Text(String),
    List(Vec<String>),
}

impl JsonCorrect {
    fn into_list(self) -> Vec<String> {
        match self {
            JsonCorrect::Flag(flag) => vec![flag.to_string()],
            JsonCorrect::Text(text) => vec![text],
            JsonCorrect::List(list) => list,
        }
    }
}

impl JsonQuestion {
    fn into_question(self) -> Result<Question> {
        let qtype: QuestionType = self
            .question_type
            .parse()
            .map_err(|e: String| anyhow::anyhow!("{}", e))?;

        let kind = match qtype {
            QuestionType::MultipleChoice => {
                let correct_answer = match self.correct_answer {
                    Some(JsonCorrect::Text(letter)) => letter,
                    Some(JsonCorrect::List(mut list)) if list.len() == 1 => list.remove(0),
                    Some(_) => anyhow::bail!("correctAnswer must be a single option letter"),
                    None => anyhow::bail!("missing correctAnswer"),
                };
                QuestionKind::MultipleChoice {
                    options: self.options,
                    correct_answer,
                }
            }
            QuestionType::MultipleResponse => {
                let letters = self
                    .correct_answers
                    .or_else(|| self.correct_answer.map(JsonCorrect::into_list))
                    .context("missing correctAnswers")?;
                QuestionKind::MultipleResponse {
                    options: self.options,
                    correct_answers: letters.into_iter().collect(),
                }
            }
            QuestionType::TrueFalse => {
                let correct_answer = match self.correct_answer {
                    Some(JsonCorrect::Flag(flag)) => flag,
                    Some(JsonCorrect::Text(text)) => match text.trim().to_lowercase().as_str() {
                        "true" => true,
                        "false" => false,
                        other => anyhow::bail!("correctAnswer must be true or false, got '{other}'"),
                    },
                    Some(JsonCorrect::List(_)) => {
                        anyhow::bail!("correctAnswer must be true or false, got a list")
                    }
                    None => anyhow::bail!("missing correctAnswer"),
                };
                QuestionKind::TrueFalse { correct_answer }
            }
            QuestionType::ShortAnswer | QuestionType::FillInBlank => {
                let accepted_answers = self
                    .correct_answers
                    .or_else(|| self.correct_answer.map(JsonCorrect::into_list))
                    .context("missing correctAnswers")?;
                if qtype == QuestionType::ShortAnswer {
                    QuestionKind::ShortAnswer { accepted_answers }
                } else {
                    QuestionKind::FillInBlank { accepted_answers }
                }
            }
        };

        let question = Question::new(self.question, kind);
        question.validate()?;
        Ok(question)
    }
}

/// Parse a quiz file from disk.
pub fn parse_quiz_file(path: &Path) -> Result<Vec<Question>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read quiz file: {}", path.display()))?;

    parse_questions_str(&content, path)
}

/// Parse the contents of a quiz file. `source` is only used in error messages.
pub fn parse_questions_str(content: &str, source: &Path) -> Result<Vec<Question>> {
    let parsed: JsonQuizFile = serde_json::from_str(content)
        .with_context(|| format!("failed to parse quiz JSON: {}", source.display()))?;

    parsed
        .questions
        .into_iter()
        .enumerate()
        .map(|(idx, q)| {
            q.into_question()
                .with_context(|| format!("{}: question {}", source.display(), idx + 1))
        })
        .collect()
}

/// Parse a catalog `index.json`.
pub fn parse_index_str(content: &str, source: &Path) -> Result<Vec<QuizMeta>> {
    serde_json::from_str(content)
        .with_context(|| format!("failed to parse quiz index: {}", source.display()))
}

/// A warning from quiz validation.
#[derive(Debug, Clone)]
pub struct ValidationWarning {
    /// One-based question number (if applicable).
    pub question: Option<usize>,
    /// Warning message.
    pub message: String,
}

impl ValidationWarning {
    fn at(idx: usize, message: impl Into<String>) -> Self {
        Self {
            question: Some(idx + 1),
            message: message.into(),
        }
    }
}

/// Check parsed questions for issues that do not prevent a session from
/// starting but are probably mistakes.
pub fn validate_questions(questions: &[Question]) -> Vec<ValidationWarning> {
    let mut warnings = Vec::new();

    if questions.is_empty() {
        warnings.push(ValidationWarning {
            question: None,
            message: "quiz has no questions".into(),
        });
    }

    for (idx, q) in questions.iter().enumerate() {
        if q.prompt.trim().is_empty() {
            warnings.push(ValidationWarning::at(idx, "prompt is empty"));
        }

        if let Some(options) = q.options() {
            for (letter, text) in options {
                if text.trim().is_empty() {
                    warnings.push(ValidationWarning::at(
                        idx,
                        format!("option {letter} has no text"),
                    ));
                }
            }
        }

        match &q.kind {
            QuestionKind::MultipleResponse {
                correct_answers, ..
            } if correct_answers.len() == 1 => {
                warnings.push(ValidationWarning::at(
                    idx,
                    "multiple_response question has a single correct answer; consider multiple_choice",
                ));
            }
            QuestionKind::ShortAnswer { accepted_answers }
            | QuestionKind::FillInBlank { accepted_answers } => {
                let mut seen = HashSet::new();
                for accepted in accepted_answers {
                    let normalized = normalize_text(accepted);
                    if normalized.is_empty() {
                        warnings.push(ValidationWarning::at(idx, "accepted answer is blank"));
                    } else if !seen.insert(normalized) {
                        warnings.push(ValidationWarning::at(
                            idx,
                            format!("duplicate accepted answer: '{}'", accepted.trim()),
                        ));
                    }
                }
            }
            _ => {}
        }
    }

    warnings
}

/// Check a catalog index for duplicate ids.
pub fn validate_index(entries: &[QuizMeta]) -> Vec<ValidationWarning> {
    let mut seen = HashSet::new();
    entries
        .iter()
        .filter(|meta| !seen.insert(meta.id.as_str()))
        .map(|meta| ValidationWarning {
            question: None,
            message: format!("duplicate quiz id: {}", meta.id),
        })
        .collect()
}
