//! The `quizforge validate` command.

use std::path::PathBuf;

use anyhow::Result;

use quizforge_core::parser;

pub fn execute(quiz_file: PathBuf) -> Result<()> {
    let questions = parser::parse_quiz_file(&quiz_file)?;
    println!(
        "Quiz file: {} ({} questions)",
        quiz_file.display(),
        questions.len()
    );

    let warnings = parser::validate_questions(&questions);
    for w in &warnings {
        let prefix = w
            .question
            .map(|n| format!("  [q{n}]"))
            .unwrap_or_else(|| "  ".to_string());
        println!("{prefix} WARNING: {}", w.message);
    }

    if warnings.is_empty() {
        println!("All questions valid.");
    } else {
        println!("\n{} warning(s) found.", warnings.len());
    }

    Ok(())
}
