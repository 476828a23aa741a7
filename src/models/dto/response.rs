use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::models::domain::{Question, QuizResult, QuizSession, User, QUESTIONS_PER_QUIZ};

#[derive(Debug, Clone, Serialize)]
pub struct UserDto {
    pub id: Uuid,
    pub email: String,
}

impl From<User> for UserDto {
    fn from(user: User) -> Self {
        UserDto {
            id: user.id,
            email: user.email,
        }
    }
}

/// Question as shown to the player. The correct-answer index stays server
/// side; grading happens in the session state machine.
#[derive(Debug, Clone, Serialize)]
pub struct QuestionDto {
    pub id: Uuid,
    pub question_text: String,
    pub options: Vec<String>,
}

impl From<&Question> for QuestionDto {
    fn from(question: &Question) -> Self {
        QuestionDto {
            id: question.id,
            question_text: question.question_text.clone(),
            options: question.options.clone(),
        }
    }
}

/// Where a quiz attempt currently stands: the question being asked, or the
/// final score once the fifth answer has landed.
#[derive(Debug, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum QuizStateResponse {
    InProgress {
        session_id: Uuid,
        question_number: usize,
        total_questions: usize,
        question: QuestionDto,
    },
    Completed {
        session_id: Uuid,
        score: u8,
        total_questions: usize,
        completion_time_seconds: i64,
        result_saved: bool,
    },
}

impl QuizStateResponse {
    pub fn from_session(session: &QuizSession) -> Self {
        match session.current_question() {
            Some(question) => QuizStateResponse::InProgress {
                session_id: session.id(),
                question_number: session.current_index() + 1,
                total_questions: QUESTIONS_PER_QUIZ,
                question: QuestionDto::from(question),
            },
            None => QuizStateResponse::Completed {
                session_id: session.id(),
                score: session.score(),
                total_questions: QUESTIONS_PER_QUIZ,
                completion_time_seconds: session.completion_seconds().unwrap_or_default(),
                result_saved: session.result_saved(),
            },
        }
    }
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub access_token: String,
    pub user: UserDto,
}

#[derive(Debug, Serialize)]
pub struct SavedResultResponse {
    pub score: u8,
    pub completion_time_seconds: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct ResultDto {
    pub score: u8,
    pub completion_time: i64,
    pub created_at: DateTime<Utc>,
}

impl From<QuizResult> for ResultDto {
    fn from(result: QuizResult) -> Self {
        ResultDto {
            score: result.score,
            completion_time: result.completion_time,
            created_at: result.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ResultsResponse {
    pub results: Vec<ResultDto>,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn five_questions() -> Vec<Question> {
        (0..QUESTIONS_PER_QUIZ)
            .map(|n| Question {
                id: Uuid::new_v4(),
                question_text: format!("Question {}", n),
                options: vec!["a".to_string(), "b".to_string()],
                correct_answer: 0,
            })
            .collect()
    }

    #[test]
    fn question_dto_does_not_leak_the_answer() {
        let question = &five_questions()[0];
        let dto = QuestionDto::from(question);

        let json = serde_json::to_value(&dto).expect("dto should serialize");
        assert!(json.get("correct_answer").is_none());
        assert_eq!(json["options"].as_array().map(Vec::len), Some(2));
    }

    #[test]
    fn in_progress_session_maps_to_one_based_question_number() {
        let session = QuizSession::new(five_questions(), Utc::now()).expect("session");
        let response = QuizStateResponse::from_session(&session);

        match response {
            QuizStateResponse::InProgress {
                question_number,
                total_questions,
                ..
            } => {
                assert_eq!(question_number, 1);
                assert_eq!(total_questions, QUESTIONS_PER_QUIZ);
            }
            other => panic!("expected InProgress, got {:?}", other),
        }
    }

    #[test]
    fn completed_session_maps_to_score_view() {
        let mut session = QuizSession::new(five_questions(), Utc::now()).expect("session");
        for _ in 0..QUESTIONS_PER_QUIZ {
            let (next, _) = session.answer(0, Utc::now()).expect("answer in range");
            session = next;
        }

        match QuizStateResponse::from_session(&session) {
            QuizStateResponse::Completed {
                score,
                result_saved,
                ..
            } => {
                assert_eq!(score, 5);
                assert!(!result_saved);
            }
            other => panic!("expected Completed, got {:?}", other),
        }
    }
}
