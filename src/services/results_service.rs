use std::sync::Arc;

use uuid::Uuid;

use crate::{
    errors::AppResult,
    models::domain::QuizResult,
    repositories::QuizResultRepository,
};

/// How many historical results the results view shows.
pub const HISTORY_LIMIT: usize = 5;

/// Read-side of the quiz history. A gateway failure here is a real error
/// surfaced to the caller; an empty list only ever means the user has no
/// history yet.
pub struct ResultsService {
    results: Arc<dyn QuizResultRepository>,
}

impl ResultsService {
    pub fn new(results: Arc<dyn QuizResultRepository>) -> Self {
        Self { results }
    }

    pub async fn recent_results(
        &self,
        access_token: &str,
        user_id: Uuid,
    ) -> AppResult<Vec<QuizResult>> {
        self.results
            .recent_for_user(access_token, user_id, HISTORY_LIMIT)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::AppError;
    use crate::repositories::MockQuizResultRepository;
    use chrono::{Duration, Utc};
    use mockall::predicate::eq;

    fn history(count: usize, user_id: Uuid) -> Vec<QuizResult> {
        (0..count)
            .map(|n| QuizResult {
                user_id,
                score: (n % 6) as u8,
                completion_time: 30 + n as i64,
                created_at: Utc::now() - Duration::minutes(n as i64),
            })
            .collect()
    }

    #[tokio::test]
    async fn requests_at_most_five_newest_results() {
        let user_id = Uuid::new_v4();
        let rows = history(5, user_id);
        let returned = rows.clone();

        let mut repository = MockQuizResultRepository::new();
        repository
            .expect_recent_for_user()
            .with(eq("token-1"), eq(user_id), eq(HISTORY_LIMIT))
            .times(1)
            .returning(move |_, _, _| Ok(returned.clone()));

        let service = ResultsService::new(Arc::new(repository));
        let results = service
            .recent_results("token-1", user_id)
            .await
            .expect("history fetch succeeds");

        assert_eq!(results, rows);
    }

    #[tokio::test]
    async fn gateway_failure_is_surfaced_not_an_empty_list() {
        let mut repository = MockQuizResultRepository::new();
        repository
            .expect_recent_for_user()
            .returning(|_, _, _| Err(AppError::DataFetch("gateway timed out".to_string())));

        let service = ResultsService::new(Arc::new(repository));
        let err = service
            .recent_results("token-1", Uuid::new_v4())
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::DataFetch(_)));
    }

    #[tokio::test]
    async fn no_history_yet_is_an_empty_list() {
        let mut repository = MockQuizResultRepository::new();
        repository
            .expect_recent_for_user()
            .returning(|_, _, _| Ok(Vec::new()));

        let service = ResultsService::new(Arc::new(repository));
        let results = service
            .recent_results("token-1", Uuid::new_v4())
            .await
            .expect("empty history is fine");

        assert!(results.is_empty());
    }
}
