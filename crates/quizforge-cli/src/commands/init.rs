//! The `quizforge init` command.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

pub fn execute(dir: PathBuf) -> Result<()> {
    let quizzes = dir.join("quizzes");
    std::fs::create_dir_all(&quizzes)
        .with_context(|| format!("failed to create {}", quizzes.display()))?;

    write_once(&dir, "quizforge.toml", SAMPLE_CONFIG)?;
    write_once(&dir, "quizzes/index.json", SAMPLE_INDEX)?;
    write_once(&dir, "quizzes/rust-basics.json", SAMPLE_QUIZ)?;

    println!("\nNext steps:");
    println!("  1. Run: quizforge validate --quiz-file quizzes/rust-basics.json");
    println!("  2. Run: quizforge list");
    println!("  3. Run: quizforge take --quiz rust-basics");

    Ok(())
}

fn write_once(dir: &Path, relative: &str, content: &str) -> Result<()> {
    let path = dir.join(relative);
    if path.exists() {
        println!("{relative} already exists, skipping.");
    } else {
        std::fs::write(&path, content)
            .with_context(|| format!("failed to write {}", path.display()))?;
        println!("Created {relative}");
    }
    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# quizforge configuration

# Directory path or http(s):// base URL holding index.json.
catalog = "./quizzes"

http_timeout_secs = 30

# Ask before leaving a quiz in progress.
confirm_exit = true

# Ask before finishing with unanswered questions.
confirm_incomplete = true
"#;

const SAMPLE_INDEX: &str = r#"[
  {
    "id": "rust-basics",
    "title": "Rust Basics",
    "description": "Bindings, smart pointers and tooling",
    "icon": "🦀",
    "file": "rust-basics.json"
  }
]
"#;

const SAMPLE_QUIZ: &str = r#"{
  "questions": [
    {
      "type": "multiple_choice",
      "question": "Which keyword declares a mutable binding?",
      "options": { "A": "let", "B": "let mut", "C": "var", "D": "mut" },
      "correctAnswer": "B"
    },
    {
      "type": "multiple_response",
      "question": "Which of these are smart pointers in std?",
      "options": { "A": "Box", "B": "Rc", "C": "usize", "D": "Arc" },
      "correctAnswers": ["A", "B", "D"]
    },
    {
      "type": "true_false",
      "question": "Rust has a garbage collector.",
      "correctAnswer": false
    },
    {
      "type": "short_answer",
      "question": "Which tool builds and tests Rust projects?",
      "correctAnswers": ["Cargo"]
    },
    {
      "type": "fill_in_blank",
      "question": "The ____ checker enforces Rust's ownership rules.",
      "correctAnswers": ["borrow"]
    }
  ]
}
"#;
