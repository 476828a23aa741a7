use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::errors::{AppError, AppResult};
use crate::models::domain::Question;

pub const QUESTIONS_PER_QUIZ: usize = 5;

/// One quiz attempt, from the moment the sampled questions arrive until the
/// result is persisted. All mutation goes through the transition methods,
/// which take the session by value and hand back the successor state, so the
/// progression is testable without any I/O.
///
/// Invariants held between transitions:
/// - `answers.len()` is the index of the question currently being asked
/// - `score` counts answers equal to their question's `correct_answer`
/// - `completed_at` is set exactly when the final answer lands
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QuizSession {
    id: Uuid,
    questions: Vec<Question>,
    answers: Vec<usize>,
    score: u8,
    started_at: DateTime<Utc>,
    completed_at: Option<DateTime<Utc>>,
    result_saved: bool,
}

/// What an `answer` transition produced: either the quiz moved to the next
/// question, or the final answer just landed. Completion is a return value
/// the caller handles, not a side effect to be observed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AnswerOutcome {
    Advanced { next_index: usize },
    Completed { score: u8 },
}

impl QuizSession {
    pub fn new(questions: Vec<Question>, started_at: DateTime<Utc>) -> AppResult<Self> {
        if questions.len() < QUESTIONS_PER_QUIZ {
            return Err(AppError::InsufficientData {
                available: questions.len(),
                required: QUESTIONS_PER_QUIZ,
            });
        }
        if questions.len() > QUESTIONS_PER_QUIZ {
            return Err(AppError::Internal(format!(
                "quiz session built with {} questions, expected {}",
                questions.len(),
                QUESTIONS_PER_QUIZ
            )));
        }
        if let Some(bad) = questions.iter().find(|q| !q.is_well_formed()) {
            return Err(AppError::Internal(format!(
                "malformed question {} reached a quiz session",
                bad.id
            )));
        }

        Ok(QuizSession {
            id: Uuid::new_v4(),
            questions,
            answers: Vec::with_capacity(QUESTIONS_PER_QUIZ),
            score: 0,
            started_at,
            completed_at: None,
            result_saved: false,
        })
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Index of the question currently being asked (0-based). Equals the
    /// number of answers recorded so far; 5 once the quiz is complete.
    pub fn current_index(&self) -> usize {
        self.answers.len()
    }

    /// The question awaiting an answer, or `None` once all five are done.
    pub fn current_question(&self) -> Option<&Question> {
        self.questions.get(self.answers.len())
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn answers(&self) -> &[usize] {
        &self.answers
    }

    pub fn score(&self) -> u8 {
        self.score
    }

    pub fn is_complete(&self) -> bool {
        self.answers.len() == QUESTIONS_PER_QUIZ
    }

    pub fn result_saved(&self) -> bool {
        self.result_saved
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    /// Wall-clock seconds from quiz start to the final answer. `None` until
    /// the quiz is complete.
    pub fn completion_seconds(&self) -> Option<i64> {
        self.completed_at
            .map(|done| (done - self.started_at).num_seconds())
    }

    /// Record an answer for the current question. Rejects answers once the
    /// quiz is complete and choice indices outside the current question's
    /// option list.
    pub fn answer(mut self, choice_index: usize, now: DateTime<Utc>) -> AppResult<(Self, AnswerOutcome)> {
        let question = match self.questions.get(self.answers.len()) {
            Some(q) => q,
            None => {
                return Err(AppError::Conflict(
                    "quiz is already complete, no answers accepted".to_string(),
                ))
            }
        };

        if choice_index >= question.options.len() {
            return Err(AppError::Validation(format!(
                "choice index {} out of range, question has {} options",
                choice_index,
                question.options.len()
            )));
        }

        if choice_index == question.correct_answer {
            self.score += 1;
        }
        self.answers.push(choice_index);

        let outcome = if self.answers.len() == QUESTIONS_PER_QUIZ {
            self.completed_at = Some(now);
            AnswerOutcome::Completed { score: self.score }
        } else {
            AnswerOutcome::Advanced {
                next_index: self.answers.len(),
            }
        };

        Ok((self, outcome))
    }

    /// Mark the result as persisted. Valid exactly once, and only on a
    /// completed session; a second attempt means the caller is racing itself.
    pub fn mark_saved(mut self) -> AppResult<Self> {
        if !self.is_complete() {
            return Err(AppError::Conflict(
                "quiz is not finished, nothing to save".to_string(),
            ));
        }
        if self.result_saved {
            return Err(AppError::Conflict(
                "quiz result has already been saved".to_string(),
            ));
        }
        self.result_saved = true;
        Ok(self)
    }
}
