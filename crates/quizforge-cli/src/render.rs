//! Terminal rendering of questions and reports.

use std::io::Write;

use anyhow::Result;
use clap::ValueEnum;
use comfy_table::{Cell, Table};

use quizforge_core::{Answer, QuestionKind, QuizSession, Report};

/// How results are printed once a quiz is finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
    Markdown,
}

/// Print the current question with its options and stored answer.
pub fn print_question(out: &mut impl Write, session: &QuizSession, elapsed: &str) -> Result<()> {
    let question = session.current_question()?;
    let progress = session.progress();

    writeln!(out)?;
    writeln!(
        out,
        "[{}/{}] {}  ({} answered)",
        progress.position + 1,
        progress.total,
        elapsed,
        progress.answered
    )?;
    writeln!(out, "{}", question.prompt)?;

    match &question.kind {
        QuestionKind::MultipleChoice { options, .. }
        | QuestionKind::MultipleResponse { options, .. } => {
            let selected = session.current_answer();
            for (letter, text) in options {
                let mark = if is_selected(selected, letter) { "*" } else { " " };
                writeln!(out, " {mark} {letter}. {text}")?;
            }
            if matches!(question.kind, QuestionKind::MultipleResponse { .. }) {
                writeln!(out, "  (select all that apply: t <letters>)")?;
            }
        }
        QuestionKind::TrueFalse { .. } => writeln!(out, "  t. true\n  f. false")?,
        QuestionKind::ShortAnswer { .. } | QuestionKind::FillInBlank { .. } => {
            if let Some(text) = session.current_answer().as_single() {
                if !text.is_empty() {
                    writeln!(out, "  current answer: {text}")?;
                }
            }
        }
    }

    Ok(())
}

fn is_selected(answer: &Answer, letter: &str) -> bool {
    match answer {
        Answer::Single(value) => value == letter,
        Answer::Multiple(letters) => letters.contains(letter),
        Answer::Unanswered => false,
    }
}

pub fn print_help(out: &mut impl Write) -> Result<()> {
    writeln!(out, "Commands:")?;
    writeln!(out, "  <answer>      answer the current question (letter, t/f, text)")?;
    writeln!(out, "  a <text>      answer with text that looks like a command")?;
    writeln!(out, "  t <letters>   toggle letters of a select-all question")?;
    writeln!(out, "  n, next       next question")?;
    writeln!(out, "  p, prev       previous question")?;
    writeln!(out, "  g <n>         go to question n")?;
    writeln!(out, "  c, clear      clear the current answer")?;
    writeln!(out, "  f, finish     finish and show results")?;
    writeln!(out, "  q, exit       leave without results")?;
    Ok(())
}

/// Render a finished report in the requested format.
pub fn render_report(report: &Report, title: &str, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(report)?),
        OutputFormat::Markdown => Ok(report.to_markdown(title)),
        OutputFormat::Text => Ok(format!(
            "{title}: {}%  ✓ {}  ✗ {}  time {}\n{}",
            report.rounded_percentage(),
            report.correct_count,
            report.incorrect_count,
            report.formatted_duration(),
            results_table(report)
        )),
    }
}

fn results_table(report: &Report) -> Table {
    let mut table = Table::new();
    table.set_header(vec!["#", "Question", "Your answer", "Correct answer", ""]);

    for (idx, q) in report.questions.iter().enumerate() {
        // Only wrong answers show the expected one.
        let correct = if q.is_correct {
            String::new()
        } else {
            q.correct_answer_text()
        };
        table.add_row(vec![
            Cell::new(idx + 1),
            Cell::new(&q.prompt),
            Cell::new(q.user_answer_text()),
            Cell::new(correct),
            Cell::new(if q.is_correct { "✓" } else { "✗" }),
        ]);
    }

    table
}
