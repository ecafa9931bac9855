//! CLI integration tests using assert_cmd.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn quizforge() -> Command {
    #[allow(deprecated)]
    let mut cmd = Command::cargo_bin("quizforge").unwrap();
    cmd.env_remove("QUIZFORGE_CATALOG").env_remove("RUST_LOG");
    cmd
}

/// A temp dir with the sample catalog and config from `init`.
fn initialized() -> TempDir {
    let dir = TempDir::new().unwrap();
    quizforge()
        .current_dir(dir.path())
        .arg("init")
        .assert()
        .success();
    dir
}

#[test]
fn init_creates_files() {
    let dir = TempDir::new().unwrap();

    quizforge()
        .current_dir(dir.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Created quizforge.toml"))
        .stdout(predicate::str::contains("Created quizzes/index.json"))
        .stdout(predicate::str::contains("Created quizzes/rust-basics.json"));

    assert!(dir.path().join("quizforge.toml").exists());
    assert!(dir.path().join("quizzes/rust-basics.json").exists());
}

#[test]
fn init_skips_existing_files() {
    let dir = initialized();

    quizforge()
        .current_dir(dir.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("quizforge.toml already exists, skipping."));
}

#[test]
fn init_into_directory() {
    let dir = TempDir::new().unwrap();

    quizforge()
        .arg("init")
        .arg("--dir")
        .arg(dir.path())
        .assert()
        .success();

    assert!(dir.path().join("quizzes/index.json").exists());
}

#[test]
fn validate_sample_quiz() {
    let dir = initialized();

    quizforge()
        .current_dir(dir.path())
        .arg("validate")
        .arg("--quiz-file")
        .arg("quizzes/rust-basics.json")
        .assert()
        .success()
        .stdout(predicate::str::contains("5 questions"))
        .stdout(predicate::str::contains("All questions valid."));
}

#[test]
fn validate_reports_warnings() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("quiz.json");
    std::fs::write(
        &path,
        r#"{"questions": [
            {"type": "multiple_response", "question": "Pick", "options": {"A": "x", "B": "y"}, "correctAnswers": ["A"]}
        ]}"#,
    )
    .unwrap();

    quizforge()
        .arg("validate")
        .arg("--quiz-file")
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("[q1] WARNING"))
        .stdout(predicate::str::contains("1 warning(s) found."));
}

#[test]
fn validate_rejects_malformed_question() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("quiz.json");
    std::fs::write(
        &path,
        r#"{"questions": [
            {"type": "multiple_choice", "question": "Pick", "options": {"A": "x"}, "correctAnswer": "Z"}
        ]}"#,
    )
    .unwrap();

    quizforge()
        .arg("validate")
        .arg("--quiz-file")
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("question 1"));
}

#[test]
fn validate_nonexistent_file() {
    quizforge()
        .arg("validate")
        .arg("--quiz-file")
        .arg("nonexistent.json")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error"));
}

#[test]
fn list_sample_catalog() {
    let dir = initialized();

    quizforge()
        .current_dir(dir.path())
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("rust-basics"))
        .stdout(predicate::str::contains("Rust Basics"));
}

#[test]
fn list_uses_catalog_flag() {
    let dir = initialized();

    quizforge()
        .arg("list")
        .arg("--catalog")
        .arg(dir.path().join("quizzes"))
        .assert()
        .success()
        .stdout(predicate::str::contains("1 quiz(zes)"));
}

#[test]
fn list_missing_catalog_fails() {
    let dir = TempDir::new().unwrap();

    quizforge()
        .current_dir(dir.path())
        .arg("list")
        .assert()
        .failure()
        .stderr(predicate::str::contains("index.json"));
}

#[test]
fn take_perfect_score() {
    let dir = initialized();

    quizforge()
        .current_dir(dir.path())
        .args(["take", "--quiz", "rust-basics"])
        .write_stdin("b\nn\nt a b d\nn\nfalse\nn\n  CARGO \nn\nborrow\nf\nq\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Rust Basics: 100%"));
}

#[test]
fn take_incomplete_with_yes_skips_confirmation() {
    let dir = initialized();

    quizforge()
        .current_dir(dir.path())
        .args(["take", "--quiz", "rust-basics", "--yes"])
        .write_stdin("b\nf\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Rust Basics: 20%"))
        .stdout(predicate::str::contains("Not answered"))
        .stdout(predicate::str::contains("[y/N]").not());
}

#[test]
fn take_json_report() {
    let dir = initialized();

    quizforge()
        .current_dir(dir.path())
        .args(["take", "--quiz", "rust-basics", "--format", "json", "--yes"])
        .write_stdin("a\nf\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("\"total_questions\": 5"))
        .stdout(predicate::str::contains("\"correct_count\": 0"));
}

#[test]
fn take_markdown_report() {
    let dir = initialized();

    quizforge()
        .current_dir(dir.path())
        .args(["take", "--quiz", "rust-basics", "--format", "markdown", "--yes"])
        .write_stdin("b\nf\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("## Rust Basics"))
        .stdout(predicate::str::contains("| 1 | Which keyword declares a mutable binding? | B. let mut |"));
}

#[test]
fn take_exit_without_report() {
    let dir = initialized();

    quizforge()
        .current_dir(dir.path())
        .args(["take", "--quiz", "rust-basics"])
        .write_stdin("b\nq\ny\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Quiz abandoned."))
        .stdout(predicate::str::contains("%  ✓").not());
}

#[test]
fn take_unknown_quiz() {
    let dir = initialized();

    quizforge()
        .current_dir(dir.path())
        .args(["take", "--quiz", "haskell"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("quiz not found: haskell"));
}

#[test]
fn catalog_env_override() {
    let dir = initialized();
    let elsewhere = TempDir::new().unwrap();

    quizforge()
        .current_dir(elsewhere.path())
        .env("QUIZFORGE_CATALOG", dir.path().join("quizzes"))
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("rust-basics"));
}

#[test]
fn help_output() {
    quizforge()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Take quizzes in the terminal"));
}

#[test]
fn version_output() {
    quizforge()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("quizforge"));
}
