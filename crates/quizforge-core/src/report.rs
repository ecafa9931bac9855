//! Scored quiz reports.
//!
//! A [`Report`] is derived from a finished session's questions and answers.
//! It is never mutated after it is built; presenters only read it.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::answer::Answer;
use crate::model::{Options, Question, QuestionKind, QuestionType};
use crate::scoring::grade;

const NOT_ANSWERED: &str = "Not answered";

/// A complete scored report for one session.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    /// Session this report was produced for.
    pub session_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    /// Whole seconds between start and finish.
    pub duration_secs: u64,
    pub total_questions: usize,
    pub correct_count: usize,
    pub incorrect_count: usize,
    /// `100 * correct / total`, unrounded.
    pub percentage: f64,
    /// Per-question results, in question order.
    pub questions: Vec<QuestionResult>,
}

/// The expected answer of one question, shaped by its type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum CorrectAnswer {
    Letter(String),
    Letters(Vec<String>),
    Flag(bool),
    Accepted(Vec<String>),
}

impl From<&QuestionKind> for CorrectAnswer {
    fn from(kind: &QuestionKind) -> Self {
        match kind {
            QuestionKind::MultipleChoice { correct_answer, .. } => {
                CorrectAnswer::Letter(correct_answer.clone())
            }
            QuestionKind::MultipleResponse {
                correct_answers, ..
            } => CorrectAnswer::Letters(correct_answers.iter().cloned().collect()),
            QuestionKind::TrueFalse { correct_answer } => CorrectAnswer::Flag(*correct_answer),
            QuestionKind::ShortAnswer { accepted_answers }
            | QuestionKind::FillInBlank { accepted_answers } => {
                CorrectAnswer::Accepted(accepted_answers.clone())
            }
        }
    }
}

/// Outcome for a single question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuestionResult {
    pub question_type: QuestionType,
    pub prompt: String,
    #[serde(skip_serializing_if = "Options::is_empty")]
    pub options: Options,
    pub user_answer: Answer,
    pub correct_answer: CorrectAnswer,
    pub is_correct: bool,
}

impl QuestionResult {
    pub fn grade(question: &Question, answer: &Answer) -> Self {
        Self {
            question_type: question.question_type(),
            prompt: question.prompt.clone(),
            options: question.options().cloned().unwrap_or_default(),
            user_answer: answer.clone(),
            correct_answer: CorrectAnswer::from(&question.kind),
            is_correct: grade(&question.kind, answer),
        }
    }

    /// Human-readable form of the stored answer, e.g. `"B. Paris"`.
    pub fn user_answer_text(&self) -> String {
        if !self.user_answer.is_answered() {
            return NOT_ANSWERED.to_string();
        }
        match (&self.user_answer, self.question_type) {
            (Answer::Multiple(letters), _) => letters
                .iter()
                .map(|l| self.labelled(l))
                .collect::<Vec<_>>()
                .join(", "),
            (Answer::Single(letter), QuestionType::MultipleChoice) => self.labelled(letter),
            (Answer::Single(value), _) => value.clone(),
            (Answer::Unanswered, _) => NOT_ANSWERED.to_string(),
        }
    }

    /// Human-readable form of the expected answer.
    pub fn correct_answer_text(&self) -> String {
        match &self.correct_answer {
            CorrectAnswer::Letter(letter) => self.labelled(letter),
            CorrectAnswer::Letters(letters) => letters
                .iter()
                .map(|l| self.labelled(l))
                .collect::<Vec<_>>()
                .join(", "),
            CorrectAnswer::Flag(flag) => flag.to_string(),
            CorrectAnswer::Accepted(accepted) => accepted.join(", "),
        }
    }

    fn labelled(&self, letter: &str) -> String {
        match self.options.get(letter) {
            Some(text) => format!("{letter}. {text}"),
            None => letter.to_string(),
        }
    }
}

impl Report {
    /// Grade every answer against its question and summarize.
    ///
    /// `questions` and `answers` are paired by index.
    pub fn build(
        session_id: Uuid,
        questions: &[Question],
        answers: &[Answer],
        started_at: DateTime<Utc>,
        finished_at: DateTime<Utc>,
    ) -> Self {
        let results: Vec<QuestionResult> = questions
            .iter()
            .zip(answers)
            .map(|(q, a)| QuestionResult::grade(q, a))
            .collect();

        let total_questions = results.len();
        let correct_count = results.iter().filter(|r| r.is_correct).count();
        let percentage = if total_questions == 0 {
            0.0
        } else {
            100.0 * correct_count as f64 / total_questions as f64
        };
        let duration_secs = (finished_at - started_at).num_seconds().max(0) as u64;

        Self {
            session_id,
            started_at,
            finished_at,
            duration_secs,
            total_questions,
            correct_count,
            incorrect_count: total_questions - correct_count,
            percentage,
            questions: results,
        }
    }

    /// Percentage rounded for display.
    pub fn rounded_percentage(&self) -> u32 {
        self.percentage.round() as u32
    }

    pub fn formatted_duration(&self) -> String {
        format_duration(self.duration_secs)
    }

    /// Format the report as markdown.
    pub fn to_markdown(&self, title: &str) -> String {
        let mut md = String::new();

        md.push_str(&format!("## {title}\n\n"));
        md.push_str(&format!(
            "**Score:** {}% ({} correct, {} incorrect) in {}\n\n",
            self.rounded_percentage(),
            self.correct_count,
            self.incorrect_count,
            self.formatted_duration()
        ));

        md.push_str("| # | Question | Your answer | Correct answer | Result |\n");
        md.push_str("|---|----------|-------------|----------------|--------|\n");
        for (idx, q) in self.questions.iter().enumerate() {
            md.push_str(&format!(
                "| {} | {} | {} | {} | {} |\n",
                idx + 1,
                q.prompt,
                q.user_answer_text(),
                q.correct_answer_text(),
                if q.is_correct { "✓" } else { "✗" }
            ));
        }

        md
    }
}

/// Format whole seconds as zero-padded `MM:SS`.
pub fn format_duration(seconds: u64) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}
