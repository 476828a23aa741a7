use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::{
    auth::AuthGateway,
    errors::{AppError, AppResult},
    models::domain::{AnswerOutcome, NewQuizResult, QuizSession, QUESTIONS_PER_QUIZ},
    repositories::{QuestionRepository, QuizResultRepository},
    services::sampling,
};

/// How many rows to request from the question bank before sampling a quiz.
pub const QUESTION_FETCH_LIMIT: usize = 15;

/// Drives quiz attempts: fetch-and-sample, answer bookkeeping, and result
/// persistence. Sessions live in memory, one per user; starting a new quiz
/// replaces the previous attempt outright, and requests name the session id
/// they were issued against so a superseded attempt is rejected instead of
/// silently cross-wired.
pub struct QuizService {
    questions: Arc<dyn QuestionRepository>,
    results: Arc<dyn QuizResultRepository>,
    auth: Arc<dyn AuthGateway>,
    sessions: RwLock<HashMap<Uuid, QuizSession>>,
}

impl QuizService {
    pub fn new(
        questions: Arc<dyn QuestionRepository>,
        results: Arc<dyn QuizResultRepository>,
        auth: Arc<dyn AuthGateway>,
    ) -> Self {
        Self {
            questions,
            results,
            auth,
            sessions: RwLock::new(HashMap::new()),
        }
    }

    /// Start (or restart) a quiz for `user_id`. Fetch failures and a short
    /// question bank propagate to the caller, who may simply try again;
    /// nothing is retried here.
    pub async fn start_quiz(&self, user_id: Uuid) -> AppResult<QuizSession> {
        let candidates = self.questions.fetch_candidates(QUESTION_FETCH_LIMIT).await?;
        let picked = sampling::sample_questions(candidates, QUESTIONS_PER_QUIZ, &mut rand::thread_rng())?;
        let session = QuizSession::new(picked, Utc::now())?;

        log::info!("user {} started quiz session {}", user_id, session.id());
        self.sessions.write().await.insert(user_id, session.clone());
        Ok(session)
    }

    /// Current state of the caller's quiz. `session_id` must match the
    /// attempt the caller was issued; a stale id means the attempt was
    /// superseded by a newer `start_quiz`.
    pub async fn session(&self, user_id: Uuid, session_id: Uuid) -> AppResult<QuizSession> {
        let sessions = self.sessions.read().await;
        let session = sessions
            .get(&user_id)
            .ok_or_else(|| AppError::NotFound("no quiz in progress".to_string()))?;
        if session.id() != session_id {
            return Err(AppError::Conflict(
                "quiz session superseded by a newer attempt".to_string(),
            ));
        }
        Ok(session.clone())
    }

    pub async fn answer(
        &self,
        user_id: Uuid,
        session_id: Uuid,
        choice_index: usize,
    ) -> AppResult<(QuizSession, AnswerOutcome)> {
        let mut sessions = self.sessions.write().await;
        let session = sessions
            .get(&user_id)
            .ok_or_else(|| AppError::NotFound("no quiz in progress".to_string()))?;
        if session.id() != session_id {
            return Err(AppError::Conflict(
                "quiz session superseded by a newer attempt".to_string(),
            ));
        }

        let (next, outcome) = session.clone().answer(choice_index, Utc::now())?;
        sessions.insert(user_id, next.clone());
        Ok((next, outcome))
    }

    /// Persist the completed attempt. Requires the caller's identity to still
    /// resolve through the gateway; no identity means no insert is attempted.
    /// The session is only marked saved after the insert succeeds, so a
    /// failed insert can be retried.
    pub async fn save_result(&self, access_token: &str, session_id: Uuid) -> AppResult<NewQuizResult> {
        let user = self
            .auth
            .get_user(access_token)
            .await?
            .ok_or(AppError::AuthRequired)?;

        let mut sessions = self.sessions.write().await;
        let session = sessions
            .get(&user.id)
            .ok_or_else(|| AppError::NotFound("no quiz in progress".to_string()))?;
        if session.id() != session_id {
            return Err(AppError::Conflict(
                "quiz session superseded by a newer attempt".to_string(),
            ));
        }

        let saved = session.clone().mark_saved()?;
        let completion_time = saved.completion_seconds().ok_or_else(|| {
            AppError::Internal("completed session is missing a completion time".to_string())
        })?;
        let result = NewQuizResult {
            user_id: user.id,
            score: saved.score(),
            completion_time,
        };

        self.results.insert(access_token, &result).await?;
        sessions.insert(user.id, saved);

        log::info!(
            "user {} saved quiz result: {}/{} in {}s",
            user.id,
            result.score,
            QUESTIONS_PER_QUIZ,
            result.completion_time
        );
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::MockAuthGateway;
    use crate::models::domain::User;
    use crate::repositories::{MockQuestionRepository, MockQuizResultRepository};
    use crate::test_utils::fixtures::question_bank;
    use mockall::predicate::eq;

    fn service_with_bank(bank_size: usize) -> QuizService {
        let bank = question_bank(bank_size);
        let mut questions = MockQuestionRepository::new();
        questions
            .expect_fetch_candidates()
            .with(eq(QUESTION_FETCH_LIMIT))
            .returning(move |_| Ok(bank.clone()));

        QuizService::new(
            Arc::new(questions),
            Arc::new(MockQuizResultRepository::new()),
            Arc::new(MockAuthGateway::new()),
        )
    }

    async fn answer_all(
        service: &QuizService,
        user_id: Uuid,
        session: QuizSession,
        miss_index: Option<usize>,
    ) -> QuizSession {
        let mut current = session;
        for i in 0..QUESTIONS_PER_QUIZ {
            let question = current.current_question().expect("question pending").clone();
            let correct = question.correct_answer;
            let choice = match miss_index {
                Some(miss) if miss == i => (correct + 1) % question.options.len(),
                _ => correct,
            };
            let (next, _) = service
                .answer(user_id, current.id(), choice)
                .await
                .expect("answer accepted");
            current = next;
        }
        current
    }

    #[tokio::test]
    async fn start_quiz_samples_five_distinct_questions() {
        let service = service_with_bank(15);
        let user_id = Uuid::new_v4();

        let session = service.start_quiz(user_id).await.expect("quiz starts");

        assert_eq!(session.questions().len(), QUESTIONS_PER_QUIZ);
        let mut ids: Vec<Uuid> = session.questions().iter().map(|q| q.id).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), QUESTIONS_PER_QUIZ);
        assert_eq!(session.current_index(), 0);
    }

    #[tokio::test]
    async fn empty_bank_surfaces_insufficient_data() {
        let service = service_with_bank(0);
        let err = service.start_quiz(Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, AppError::InsufficientData { available: 0, .. }));
    }

    #[tokio::test]
    async fn fetch_failure_propagates_to_the_caller() {
        let mut questions = MockQuestionRepository::new();
        questions
            .expect_fetch_candidates()
            .returning(|_| Err(AppError::DataFetch("gateway timed out".to_string())));
        let service = QuizService::new(
            Arc::new(questions),
            Arc::new(MockQuizResultRepository::new()),
            Arc::new(MockAuthGateway::new()),
        );

        let err = service.start_quiz(Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, AppError::DataFetch(_)));
    }

    #[tokio::test]
    async fn all_correct_answers_complete_with_score_five() {
        let service = service_with_bank(15);
        let user_id = Uuid::new_v4();
        let session = service.start_quiz(user_id).await.expect("quiz starts");

        let done = answer_all(&service, user_id, session, None).await;

        assert!(done.is_complete());
        assert_eq!(done.score(), 5);
        assert_eq!(done.answers().len(), QUESTIONS_PER_QUIZ);
    }

    #[tokio::test]
    async fn one_missed_answer_scores_four() {
        let service = service_with_bank(15);
        let user_id = Uuid::new_v4();
        let session = service.start_quiz(user_id).await.expect("quiz starts");

        let done = answer_all(&service, user_id, session, Some(2)).await;

        assert_eq!(done.score(), 4);
    }

    #[tokio::test]
    async fn answering_without_a_session_is_not_found() {
        let service = service_with_bank(15);
        let err = service
            .answer(Uuid::new_v4(), Uuid::new_v4(), 0)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn superseded_session_id_is_rejected() {
        let service = service_with_bank(15);
        let user_id = Uuid::new_v4();

        let first = service.start_quiz(user_id).await.expect("first attempt");
        let second = service.start_quiz(user_id).await.expect("second attempt");
        assert_ne!(first.id(), second.id());

        let err = service.answer(user_id, first.id(), 0).await.unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));

        // the replacement session is untouched by the stale request
        let current = service
            .session(user_id, second.id())
            .await
            .expect("current attempt");
        assert!(current.answers().is_empty());
        assert_eq!(current.score(), 0);
    }

    #[tokio::test]
    async fn restarting_resets_answers_and_score() {
        let service = service_with_bank(15);
        let user_id = Uuid::new_v4();

        let session = service.start_quiz(user_id).await.expect("quiz starts");
        let choice = session
            .current_question()
            .expect("question pending")
            .correct_answer;
        service
            .answer(user_id, session.id(), choice)
            .await
            .expect("answer accepted");

        let fresh = service.start_quiz(user_id).await.expect("restart");
        assert!(fresh.answers().is_empty());
        assert_eq!(fresh.score(), 0);
        assert_eq!(fresh.current_index(), 0);
    }

    #[tokio::test]
    async fn completed_quiz_saves_exactly_one_result() {
        let bank = question_bank(15);
        let user = User::test_user("quizzer@example.com");
        let user_id = user.id;

        let mut questions = MockQuestionRepository::new();
        questions
            .expect_fetch_candidates()
            .returning(move |_| Ok(bank.clone()));

        let mut auth = MockAuthGateway::new();
        auth.expect_get_user()
            .with(eq("token-1"))
            .returning(move |_| Ok(Some(user.clone())));

        let mut results = MockQuizResultRepository::new();
        results
            .expect_insert()
            .withf(move |token, result| {
                token == "token-1"
                    && result.user_id == user_id
                    && result.score == 5
                    && result.completion_time >= 0
            })
            .times(1)
            .returning(|_, _| Ok(()));

        let service = QuizService::new(Arc::new(questions), Arc::new(results), Arc::new(auth));
        let session = service.start_quiz(user_id).await.expect("quiz starts");
        let done = answer_all(&service, user_id, session, None).await;

        let saved = service
            .save_result("token-1", done.id())
            .await
            .expect("result saved");
        assert_eq!(saved.score, 5);
    }

    #[tokio::test]
    async fn save_without_identity_attempts_no_insert() {
        let bank = question_bank(15);
        let mut questions = MockQuestionRepository::new();
        questions
            .expect_fetch_candidates()
            .returning(move |_| Ok(bank.clone()));

        let mut auth = MockAuthGateway::new();
        auth.expect_get_user().returning(|_| Ok(None));

        let mut results = MockQuizResultRepository::new();
        results.expect_insert().times(0);

        let service = QuizService::new(Arc::new(questions), Arc::new(results), Arc::new(auth));
        let user_id = Uuid::new_v4();
        let session = service.start_quiz(user_id).await.expect("quiz starts");
        let done = answer_all(&service, user_id, session, None).await;

        let err = service.save_result("revoked-token", done.id()).await.unwrap_err();
        assert!(matches!(err, AppError::AuthRequired));
    }

    #[tokio::test]
    async fn save_before_completion_is_rejected() {
        let bank = question_bank(15);
        let user = User::test_user("quizzer@example.com");
        let user_id = user.id;

        let mut questions = MockQuestionRepository::new();
        questions
            .expect_fetch_candidates()
            .returning(move |_| Ok(bank.clone()));
        let mut auth = MockAuthGateway::new();
        auth.expect_get_user().returning(move |_| Ok(Some(user.clone())));
        let mut results = MockQuizResultRepository::new();
        results.expect_insert().times(0);

        let service = QuizService::new(Arc::new(questions), Arc::new(results), Arc::new(auth));
        let session = service.start_quiz(user_id).await.expect("quiz starts");

        let err = service.save_result("token-1", session.id()).await.unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
    }

    #[tokio::test]
    async fn second_save_is_rejected_without_a_second_insert() {
        let bank = question_bank(15);
        let user = User::test_user("quizzer@example.com");
        let user_id = user.id;

        let mut questions = MockQuestionRepository::new();
        questions
            .expect_fetch_candidates()
            .returning(move |_| Ok(bank.clone()));
        let mut auth = MockAuthGateway::new();
        auth.expect_get_user().returning(move |_| Ok(Some(user.clone())));
        let mut results = MockQuizResultRepository::new();
        results.expect_insert().times(1).returning(|_, _| Ok(()));

        let service = QuizService::new(Arc::new(questions), Arc::new(results), Arc::new(auth));
        let session = service.start_quiz(user_id).await.expect("quiz starts");
        let done = answer_all(&service, user_id, session, None).await;

        service
            .save_result("token-1", done.id())
            .await
            .expect("first save succeeds");
        let err = service.save_result("token-1", done.id()).await.unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
    }

    #[tokio::test]
    async fn failed_insert_leaves_the_session_retryable() {
        let bank = question_bank(15);
        let user = User::test_user("quizzer@example.com");
        let user_id = user.id;

        let mut questions = MockQuestionRepository::new();
        questions
            .expect_fetch_candidates()
            .returning(move |_| Ok(bank.clone()));
        let mut auth = MockAuthGateway::new();
        auth.expect_get_user().returning(move |_| Ok(Some(user.clone())));

        let mut results = MockQuizResultRepository::new();
        let mut attempts = 0;
        results.expect_insert().times(2).returning(move |_, _| {
            attempts += 1;
            if attempts == 1 {
                Err(AppError::Persistence("insert failed".to_string()))
            } else {
                Ok(())
            }
        });

        let service = QuizService::new(Arc::new(questions), Arc::new(results), Arc::new(auth));
        let session = service.start_quiz(user_id).await.expect("quiz starts");
        let done = answer_all(&service, user_id, session, None).await;

        let err = service.save_result("token-1", done.id()).await.unwrap_err();
        assert!(matches!(err, AppError::Persistence(_)));

        // the failure was surfaced, not swallowed, and a retry can succeed
        service
            .save_result("token-1", done.id())
            .await
            .expect("retry saves the result");
    }
}
