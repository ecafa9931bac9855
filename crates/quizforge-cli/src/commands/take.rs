//! The `quizforge take` command: an interactive session over stdin.

use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader, Lines};

use quizforge_catalog::{load_config_from, open_catalog};
use quizforge_core::model::{Question, QuestionKind, Quiz};
use quizforge_core::{QuizError, QuizSession, Response};

use crate::render::{self, OutputFormat};
use crate::ticker::Ticker;

pub struct TakeArgs {
    pub quiz: String,
    pub catalog: Option<String>,
    pub config: Option<PathBuf>,
    pub format: OutputFormat,
    pub yes: bool,
}

/// Prompt behaviour for one run.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Settings {
    pub format: OutputFormat,
    pub confirm_exit: bool,
    pub confirm_incomplete: bool,
}

pub async fn execute(args: TakeArgs) -> Result<()> {
    let config = load_config_from(args.config.as_deref())?;
    let location = args.catalog.unwrap_or_else(|| config.catalog.clone());
    let source = open_catalog(&location, &config)?;
    tracing::debug!(catalog = %source.name(), quiz = %args.quiz, "loading quiz");

    let quiz = source
        .load(&args.quiz)
        .await
        .with_context(|| format!("failed to load quiz '{}' from {}", args.quiz, source.name()))?;

    let settings = Settings {
        format: args.format,
        confirm_exit: config.confirm_exit && !args.yes,
        confirm_incomplete: config.confirm_incomplete && !args.yes,
    };

    let mut input = BufReader::new(tokio::io::stdin()).lines();
    let mut out = std::io::stdout();
    run(&quiz, &mut input, &mut out, settings).await
}

enum Outcome {
    Finished,
    Exited,
}

/// Run sessions over `quiz` until the user quits, retaking on request.
pub(crate) async fn run<R, W>(
    quiz: &Quiz,
    input: &mut Lines<R>,
    out: &mut W,
    settings: Settings,
) -> Result<()>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    loop {
        let mut session =
            QuizSession::start(quiz.questions.clone()).context("quiz cannot be started")?;
        writeln!(out, "{} ({} questions). Type h for help.", quiz.title, session.len())?;

        if let Outcome::Exited = play(&mut session, input, out, settings).await? {
            writeln!(out, "Quiz abandoned.")?;
            return Ok(());
        }

        let report = session.finish();
        writeln!(out, "{}", render::render_report(report, &quiz.title, settings.format)?)?;
        write!(out, "r to retake, anything else to quit: ")?;
        out.flush()?;

        match input.next_line().await? {
            Some(line) if line.trim().eq_ignore_ascii_case("r") => continue,
            _ => return Ok(()),
        }
    }
}

async fn play<R, W>(
    session: &mut QuizSession,
    input: &mut Lines<R>,
    out: &mut W,
    settings: Settings,
) -> Result<Outcome>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    let ticker = Ticker::start(session.started_at());

    loop {
        render::print_question(out, session, &ticker.current())?;
        write!(out, "> ")?;
        out.flush()?;

        let Some(line) = input.next_line().await? else {
            return Ok(Outcome::Exited);
        };

        let command = match parse_command(&line, session.current_question()?) {
            Ok(command) => command,
            Err(message) => {
                writeln!(out, "! {message}")?;
                continue;
            }
        };

        let result = match command {
            Command::Answer(response) => session.answer(response),
            Command::Toggle(letters) => session.toggle_all(letters.as_slice()),
            Command::Next => session.advance().map(drop),
            Command::Prev => session.go_back().map(drop),
            Command::Goto(index) => session.set_position(index),
            Command::Clear => session.clear_answer(),
            Command::Help => {
                render::print_help(out)?;
                Ok(())
            }
            Command::Finish => {
                let unanswered = session.unanswered_count();
                let question = format!(
                    "{unanswered} question(s) unanswered. Finish anyway? [y/N] "
                );
                if unanswered == 0 || !settings.confirm_incomplete {
                    return Ok(Outcome::Finished);
                }
                match confirm(input, out, &question).await? {
                    Some(true) => return Ok(Outcome::Finished),
                    Some(false) => Ok(()),
                    None => return Ok(Outcome::Exited),
                }
            }
            Command::Exit => {
                if !settings.confirm_exit {
                    return Ok(Outcome::Exited);
                }
                match confirm(input, out, "Leave the quiz? Progress will be lost. [y/N] ").await? {
                    Some(false) => Ok(()),
                    Some(true) | None => return Ok(Outcome::Exited),
                }
            }
        };

        if let Err(e) = result {
            writeln!(out, "! {}", describe(&e, session.len()))?;
        }
    }
}

/// `None` on end of input.
async fn confirm<R, W>(input: &mut Lines<R>, out: &mut W, question: &str) -> Result<Option<bool>>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    write!(out, "{question}")?;
    out.flush()?;
    Ok(input
        .next_line()
        .await?
        .map(|line| matches!(line.trim().to_lowercase().as_str(), "y" | "yes")))
}

fn describe(err: &QuizError, len: usize) -> String {
    match err {
        QuizError::OutOfRange { .. } => format!("no such question (1-{len})"),
        other => other.to_string(),
    }
}

#[derive(Debug, PartialEq)]
pub(crate) enum Command {
    Answer(Response),
    Toggle(Vec<String>),
    Next,
    Prev,
    /// Zero-based target.
    Goto(usize),
    Clear,
    Finish,
    Exit,
    Help,
}

/// Interpret one input line against the current question.
///
/// Single-letter shortcuts yield to option letters, so `c` answers a
/// question that has an option C, and `t`/`f` answer a true/false question. `a <text>` forces a text answer and
/// `t <letters>` toggles; each only applies where it makes sense.
pub(crate) fn parse_command(line: &str, question: &Question) -> Result<Command, String> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return Err("type an answer, or h for help".into());
    }

    let (head, rest) = match trimmed.split_once(char::is_whitespace) {
        Some((head, rest)) => (head, rest.trim()),
        None => (trimmed, ""),
    };
    let options = question.options();
    let has_options = options.is_some();
    let is_option = options.is_some_and(|options| options.contains_key(&trimmed.to_uppercase()))
        || (matches!(question.kind, QuestionKind::TrueFalse { .. })
            && matches!(trimmed.to_lowercase().as_str(), "t" | "f"));

    match (head.to_lowercase().as_str(), rest.is_empty()) {
        ("next", true) => Ok(Command::Next),
        ("prev", true) => Ok(Command::Prev),
        ("clear", true) => Ok(Command::Clear),
        ("finish", true) => Ok(Command::Finish),
        ("exit" | "quit", true) => Ok(Command::Exit),
        ("help" | "?", true) => Ok(Command::Help),
        ("a", false) if !has_options => Ok(Command::Answer(parse_answer(rest, question))),
        ("t", false) if has_options => Ok(Command::Toggle(split_letters(rest, question))),
        ("g", false) => match rest.parse::<usize>() {
            Ok(n) if n >= 1 => Ok(Command::Goto(n - 1)),
            _ => Err(format!("'{rest}' is not a question number")),
        },
        (_, true) if is_option => Ok(Command::Answer(parse_answer(trimmed, question))),
        ("n", true) => Ok(Command::Next),
        ("p", true) => Ok(Command::Prev),
        ("c", true) => Ok(Command::Clear),
        ("f", true) => Ok(Command::Finish),
        ("q", true) => Ok(Command::Exit),
        ("h", true) => Ok(Command::Help),
        _ => Ok(Command::Answer(parse_answer(trimmed, question))),
    }
}

fn parse_answer(text: &str, question: &Question) -> Response {
    match &question.kind {
        QuestionKind::MultipleChoice { .. } => Response::Single(text.to_uppercase()),
        QuestionKind::MultipleResponse { .. } => {
            Response::Multiple(split_letters(text, question))
        }
        QuestionKind::TrueFalse { .. } => match text.to_lowercase().as_str() {
            "t" => Response::Single("true".into()),
            "f" => Response::Single("false".into()),
            other => Response::Single(other.to_string()),
        },
        QuestionKind::ShortAnswer { .. } | QuestionKind::FillInBlank { .. } => {
            Response::Single(text.to_string())
        }
    }
}

/// `"a, c"`, `"a c"` and `"ac"` all select A and C.
fn split_letters(text: &str, question: &Question) -> Vec<String> {
    let known = |token: &str| {
        question
            .options()
            .is_some_and(|options| options.contains_key(token))
    };

    text.split(|c: char| c == ',' || c.is_whitespace())
        .filter(|token| !token.is_empty())
        .map(str::to_uppercase)
        .flat_map(|token| {
            if token.chars().count() > 1 && !known(&token) {
                token.chars().map(String::from).collect()
            } else {
                vec![token]
            }
        })
        .collect()
}
