//! The quiz session state machine.
//!
//! A [`QuizSession`] is created by [`QuizSession::start`] in the active phase,
//! accepts answers and navigation while active, and becomes finished on the
//! first call to [`QuizSession::finish`]. A finished session cannot be
//! reopened; retaking a quiz means starting a new session.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::answer::{self, Answer, Response};
use crate::error::QuizError;
use crate::model::Question;
use crate::report::Report;
use crate::time::Clock;

/// Aggregated view of session progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionProgress {
    pub total: usize,
    pub answered: usize,
    pub remaining: usize,
    /// Zero-based index of the current question.
    pub position: usize,
    pub is_complete: bool,
}

/// One user's attempt at a list of questions.
#[derive(Debug, Clone)]
pub struct QuizSession {
    id: Uuid,
    questions: Vec<Question>,
    answers: Vec<Answer>,
    position: usize,
    started_at: DateTime<Utc>,
    clock: Clock,
    /// Set by the first `finish`; a session with a report is finished.
    report: Option<Report>,
}

impl QuizSession {
    /// Start a session over `questions` using the system clock.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::InvalidInput` if `questions` is empty or any
    /// question is malformed.
    pub fn start(questions: Vec<Question>) -> Result<Self, QuizError> {
        Self::start_with_clock(questions, Clock::default())
    }

    /// Start a session with an explicit clock.
    ///
    /// # Errors
    ///
    /// See [`QuizSession::start`].
    pub fn start_with_clock(questions: Vec<Question>, clock: Clock) -> Result<Self, QuizError> {
        if questions.is_empty() {
            return Err(QuizError::InvalidInput("no questions".into()));
        }
        for (idx, question) in questions.iter().enumerate() {
            question.validate().map_err(|e| match e {
                QuizError::InvalidInput(msg) => {
                    QuizError::InvalidInput(format!("question {}: {msg}", idx + 1))
                }
                other => other,
            })?;
        }

        let id = Uuid::new_v4();
        let started_at = clock.now();
        tracing::debug!(session = %id, questions = questions.len(), "quiz session started");

        Ok(Self {
            id,
            answers: vec![Answer::Unanswered; questions.len()],
            questions,
            position: 0,
            started_at,
            clock,
            report: None,
        })
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Number of questions in the session.
    pub fn len(&self) -> usize {
        self.questions.len()
    }

    /// Always `false`: a session cannot be started without questions.
    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    /// All slots, indexed like [`QuizSession::questions`].
    pub fn answers(&self) -> &[Answer] {
        &self.answers
    }

    pub fn answer_at(&self, index: usize) -> Option<&Answer> {
        self.answers.get(index)
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    pub fn is_finished(&self) -> bool {
        self.report.is_some()
    }

    /// Mutable access to the session clock, for fixed-clock tests and replays.
    pub fn clock_mut(&mut self) -> &mut Clock {
        &mut self.clock
    }

    /// The question at the current position.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::OutOfRange` once the session is finished.
    pub fn current_question(&self) -> Result<&Question, QuizError> {
        self.ensure_active()?;
        Ok(&self.questions[self.position])
    }

    /// The stored answer for the current question.
    pub fn current_answer(&self) -> &Answer {
        &self.answers[self.position]
    }

    /// Store `value` as the answer to the current question, replacing any
    /// previous answer. Does not move the position.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::InvalidAnswer` if the value does not fit the
    /// question, or `QuizError::OutOfRange` once the session is finished.
    pub fn answer(&mut self, value: impl Into<Response>) -> Result<(), QuizError> {
        self.ensure_active()?;
        let question = &self.questions[self.position];
        let stored = answer::normalize(&question.kind, value.into())?;
        tracing::debug!(
            session = %self.id,
            position = self.position,
            answer = ?stored,
            "answer stored"
        );
        self.answers[self.position] = stored;
        Ok(())
    }

    /// Add `letter` to the current multiple-response selection, or remove it
    /// if already selected.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::InvalidAnswer` for other question types or unknown
    /// letters, or `QuizError::OutOfRange` once the session is finished.
    pub fn toggle(&mut self, letter: &str) -> Result<(), QuizError> {
        self.ensure_active()?;
        let question = &self.questions[self.position];
        let response = answer::toggled(&question.kind, &self.answers[self.position], letter)?;
        self.answer(response)
    }

    /// Toggle several letters as one change. If any letter is rejected the
    /// stored selection is not touched.
    ///
    /// # Errors
    ///
    /// Same as [`QuizSession::toggle`].
    pub fn toggle_all<S: AsRef<str>>(&mut self, letters: &[S]) -> Result<(), QuizError> {
        self.ensure_active()?;
        let kind = &self.questions[self.position].kind;
        let mut selection = self.answers[self.position].clone();
        for letter in letters {
            let toggled = answer::toggled(kind, &selection, letter.as_ref())?;
            selection = answer::normalize(kind, toggled)?;
        }
        self.answer(selection.letters().cloned().unwrap_or_default())
    }

    /// Reset the current slot to unanswered.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::OutOfRange` once the session is finished.
    pub fn clear_answer(&mut self) -> Result<(), QuizError> {
        self.ensure_active()?;
        self.answers[self.position] = Answer::Unanswered;
        Ok(())
    }

    /// Jump to question `index`. Unanswered questions may be skipped freely.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::OutOfRange` if `index` is past the last question or
    /// the session is finished.
    pub fn set_position(&mut self, index: usize) -> Result<(), QuizError> {
        self.ensure_active()?;
        if index >= self.questions.len() {
            return Err(QuizError::OutOfRange {
                index,
                len: self.questions.len(),
            });
        }
        tracing::debug!(session = %self.id, from = self.position, to = index, "position changed");
        self.position = index;
        Ok(())
    }

    /// Move to the next question and return the new position.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::OutOfRange` on the last question.
    pub fn advance(&mut self) -> Result<usize, QuizError> {
        self.set_position(self.position + 1)?;
        Ok(self.position)
    }

    /// Move to the previous question and return the new position.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::OutOfRange` on the first question.
    pub fn go_back(&mut self) -> Result<usize, QuizError> {
        self.ensure_active()?;
        let Some(index) = self.position.checked_sub(1) else {
            return Err(QuizError::OutOfRange {
                index: self.position,
                len: self.questions.len(),
            });
        };
        self.set_position(index)?;
        Ok(self.position)
    }

    /// Whether every slot holds an answer. Finishing is allowed either way.
    pub fn is_complete(&self) -> bool {
        self.answers.iter().all(Answer::is_answered)
    }

    pub fn unanswered_count(&self) -> usize {
        self.answers.iter().filter(|a| !a.is_answered()).count()
    }

    pub fn progress(&self) -> SessionProgress {
        let total = self.questions.len();
        let answered = total - self.unanswered_count();
        SessionProgress {
            total,
            answered,
            remaining: total - answered,
            position: self.position,
            is_complete: answered == total,
        }
    }

    /// Whole seconds since the session started, frozen once finished.
    pub fn elapsed_secs(&self) -> u64 {
        match &self.report {
            Some(report) => report.duration_secs,
            None => self.clock.seconds_since(self.started_at),
        }
    }

    /// Finish the session and return its report.
    ///
    /// The first call records the finish time and grades every answer. Later
    /// calls return the same report without touching the finish time.
    pub fn finish(&mut self) -> &Report {
        self.report.get_or_insert_with(|| {
            let report = Report::build(
                self.id,
                &self.questions,
                &self.answers,
                self.started_at,
                self.clock.now(),
            );
            tracing::info!(
                session = %report.session_id,
                correct = report.correct_count,
                total = report.total_questions,
                duration_secs = report.duration_secs,
                "quiz finished"
            );
            report
        })
    }

    /// The report, if the session has been finished.
    pub fn report(&self) -> Option<&Report> {
        self.report.as_ref()
    }

    fn ensure_active(&self) -> Result<(), QuizError> {
        match self.report {
            None => Ok(()),
            Some(_) => Err(QuizError::OutOfRange {
                index: self.position,
                len: self.questions.len(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::QuestionType;
    use crate::time::fixed_now;
    use chrono::Duration;

    fn scenario_questions() -> Vec<Question> {
        vec![
            Question::multiple_choice("Pick y", [("A", "x"), ("B", "y")], "B"),
            Question::true_false("Is it true?", true),
        ]
    }

    fn every_type() -> Vec<Question> {
        vec![
            Question::multiple_choice("mc", [("A", "x"), ("B", "y")], "A"),
            Question::multiple_response("mr", [("A", "x"), ("B", "y"), ("C", "z")], &["A", "C"]),
            Question::true_false("tf", false),
            Question::short_answer("sa", &["Paris"]),
            Question::fill_in_blank("fb", &["blue"]),
        ]
    }

    fn fixed_session(questions: Vec<Question>) -> QuizSession {
        QuizSession::start_with_clock(questions, Clock::fixed(fixed_now())).unwrap()
    }

    #[test]
    fn start_rejects_empty_question_list() {
        let err = QuizSession::start(vec![]).unwrap_err();
        assert!(matches!(err, QuizError::InvalidInput(_)));
    }

    #[test]
    fn start_rejects_choice_question_without_options() {
        let questions = vec![
            Question::true_false("ok", true),
            Question::multiple_choice("broken", Vec::<(&str, &str)>::new(), "A"),
        ];
        let err = QuizSession::start(questions).unwrap_err();
        assert!(err.to_string().contains("question 2"), "{err}");
    }

    #[test]
    fn fresh_session_is_incomplete_and_at_first_question() {
        let session = fixed_session(every_type());
        assert!(!session.is_complete());
        assert_eq!(session.position(), 0);
        assert_eq!(session.unanswered_count(), 5);
        assert!(session.answers().iter().all(|a| *a == Answer::Unanswered));
        assert_eq!(session.current_question().unwrap().prompt, "mc");
    }

    #[test]
    fn answer_replaces_without_advancing() {
        let mut session = fixed_session(scenario_questions());
        session.answer("A").unwrap();
        session.answer("B").unwrap();
        assert_eq!(session.position(), 0);
        assert_eq!(session.current_answer(), &Answer::Single("B".into()));
    }

    #[test]
    fn invalid_answer_leaves_slot_untouched() {
        let mut session = fixed_session(scenario_questions());
        session.answer("A").unwrap();
        let err = session.answer("C").unwrap_err();
        assert!(matches!(
            err,
            QuizError::InvalidAnswer {
                question_type: QuestionType::MultipleChoice,
                ..
            }
        ));
        assert_eq!(session.current_answer(), &Answer::Single("A".into()));
    }

    #[test]
    fn set_position_boundaries() {
        let mut session = fixed_session(every_type());
        let len = session.len();
        assert!(session.set_position(len).unwrap_err().is_out_of_range());
        assert!(session.set_position(len - 1).is_ok());
        assert_eq!(session.position(), len - 1);
        assert!(session.advance().unwrap_err().is_out_of_range());

        session.set_position(0).unwrap();
        assert!(session.go_back().unwrap_err().is_out_of_range());
        assert_eq!(session.advance().unwrap(), 1);
        assert_eq!(session.go_back().unwrap(), 0);
    }

    #[test]
    fn scenario_choice_and_true_false() {
        let mut session = fixed_session(scenario_questions());
        session.answer("B").unwrap();
        session.set_position(1).unwrap();
        session.answer("false").unwrap();

        let report = session.finish();
        assert_eq!(report.correct_count, 1);
        assert_eq!(report.incorrect_count, 1);
        assert!((report.percentage - 50.0).abs() < f64::EPSILON);
        assert!(report.questions[0].is_correct);
        assert!(!report.questions[1].is_correct);
    }

    #[test]
    fn scenario_multiple_response_any_order() {
        let questions = vec![Question::multiple_response(
            "Pick A and C",
            [("A", "a"), ("B", "b"), ("C", "c")],
            &["A", "C"],
        )];

        let mut forward = fixed_session(questions.clone());
        forward.answer(["A", "C"]).unwrap();
        let mut reversed = fixed_session(questions);
        reversed.answer(["C", "A"]).unwrap();

        assert!(forward.finish().questions[0].is_correct);
        assert!(reversed.finish().questions[0].is_correct);
    }

    #[test]
    fn scenario_short_answer_normalized() {
        let mut session = fixed_session(vec![Question::short_answer(
            "Capital of France?",
            &["Paris", "paris "],
        )]);
        session.answer("  PARIS  ").unwrap();
        let report = session.finish();
        assert!(report.questions[0].is_correct);
        assert_eq!(
            report.questions[0].user_answer,
            Answer::Single("  PARIS  ".into())
        );
    }

    #[test]
    fn stored_answers_round_trip_into_report() {
        let mut session = fixed_session(every_type());
        session.answer("B").unwrap();
        session.advance().unwrap();
        session.answer(["C", "B"]).unwrap();
        session.advance().unwrap();
        session.answer("true").unwrap();
        session.advance().unwrap();
        session.answer("Lyon").unwrap();
        session.advance().unwrap();
        session.answer("").unwrap();

        let report = session.finish();
        let stored: Vec<&Answer> = report.questions.iter().map(|q| &q.user_answer).collect();
        assert_eq!(stored[0], &Answer::Single("B".into()));
        assert_eq!(
            stored[1],
            &Answer::Multiple(["B".to_string(), "C".to_string()].into())
        );
        assert_eq!(stored[2], &Answer::Single("true".into()));
        assert_eq!(stored[3], &Answer::Single("Lyon".into()));
        assert_eq!(stored[4], &Answer::Single(String::new()));
        assert_eq!(report.correct_count, 0);
    }

    #[test]
    fn toggle_builds_selection() {
        let mut session = fixed_session(every_type());
        session.set_position(1).unwrap();
        session.toggle("C").unwrap();
        session.toggle("A").unwrap();
        session.toggle("B").unwrap();
        session.toggle("B").unwrap();
        assert_eq!(
            session.current_answer(),
            &Answer::Multiple(["A".to_string(), "C".to_string()].into())
        );
        assert!(session.toggle("Z").is_err());

        session.set_position(0).unwrap();
        assert!(session.toggle("A").is_err());
    }

    #[test]
    fn toggle_all_is_all_or_nothing() {
        let mut session = fixed_session(every_type());
        session.set_position(1).unwrap();
        let err = session.toggle_all(&["A", "Z"]).unwrap_err();
        assert!(err.to_string().contains("'Z'"), "{err}");
        assert_eq!(session.current_answer(), &Answer::Unanswered);

        session.toggle_all(&["A", "C", "B", "B"]).unwrap();
        assert_eq!(
            session.current_answer(),
            &Answer::Multiple(["A".to_string(), "C".to_string()].into())
        );

        session.set_position(2).unwrap();
        assert!(session.toggle_all(&["A"]).is_err());
        assert_eq!(session.current_answer(), &Answer::Unanswered);
    }

    #[test]
    fn empty_text_and_cleared_selection_count_as_unanswered() {
        let mut session = fixed_session(every_type());
        session.answer("A").unwrap();
        session.set_position(1).unwrap();
        session.toggle("A").unwrap();
        session.toggle("A").unwrap();
        session.set_position(2).unwrap();
        session.answer("false").unwrap();
        session.set_position(3).unwrap();
        session.answer("Paris").unwrap();
        session.set_position(4).unwrap();
        session.answer("").unwrap();

        assert_eq!(session.unanswered_count(), 2);
        session.answer("blue").unwrap();
        session.set_position(1).unwrap();
        session.answer(["A", "C"]).unwrap();
        assert!(session.is_complete());

        session.clear_answer().unwrap();
        assert!(!session.is_complete());
    }

    #[test]
    fn progress_tracks_answers_and_position() {
        let mut session = fixed_session(scenario_questions());
        session.answer("B").unwrap();
        session.advance().unwrap();
        let progress = session.progress();
        assert_eq!(progress.total, 2);
        assert_eq!(progress.answered, 1);
        assert_eq!(progress.remaining, 1);
        assert_eq!(progress.position, 1);
        assert!(!progress.is_complete);
    }

    #[test]
    fn finish_with_unanswered_questions_scores_them_incorrect() {
        let mut session = fixed_session(scenario_questions());
        let report = session.finish();
        assert_eq!(report.correct_count, 0);
        assert_eq!(report.incorrect_count, 2);
        assert_eq!(report.percentage, 0.0);
    }

    #[test]
    fn finish_is_idempotent_and_keeps_first_duration() {
        let mut session = fixed_session(scenario_questions());
        session.answer("B").unwrap();
        session.clock_mut().advance(Duration::seconds(42));
        let first = session.finish().clone();

        session.clock_mut().advance(Duration::seconds(600));
        let second = session.finish().clone();

        assert_eq!(first.duration_secs, 42);
        assert_eq!(first, second);
        assert_eq!(session.elapsed_secs(), 42);
    }

    #[test]
    fn finished_session_rejects_mutation_and_queries() {
        let mut session = fixed_session(scenario_questions());
        session.finish();
        assert!(session.is_finished());
        assert!(session.current_question().unwrap_err().is_out_of_range());
        assert!(session.answer("B").unwrap_err().is_out_of_range());
        assert!(session.set_position(1).unwrap_err().is_out_of_range());
        assert!(session.toggle("A").unwrap_err().is_out_of_range());
        assert!(session.report().is_some());
    }

    #[test]
    fn elapsed_follows_clock_while_active() {
        let mut session = fixed_session(scenario_questions());
        assert_eq!(session.elapsed_secs(), 0);
        session.clock_mut().advance(Duration::seconds(75));
        assert_eq!(session.elapsed_secs(), 75);
    }
}
