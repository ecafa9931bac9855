//! quizforge-core — Quiz session state machine, grading, and reports.
//!
//! This crate owns the question model, validates and stores answers per
//! question type, and derives a scored [`report::Report`] when a session is
//! finished. It performs no file or network I/O of its own beyond the
//! convenience loaders in [`parser`].

pub mod answer;
pub mod error;
pub mod model;
pub mod parser;
pub mod report;
pub mod scoring;
pub mod session;
pub mod time;

pub use answer::{Answer, Response};
pub use error::QuizError;
pub use model::{Question, QuestionKind, QuestionType, Quiz, QuizMeta};
pub use report::{format_duration, QuestionResult, Report};
pub use session::{QuizSession, SessionProgress};
