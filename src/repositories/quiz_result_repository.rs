use async_trait::async_trait;
use reqwest::Method;
use uuid::Uuid;

use crate::{
    errors::{AppError, AppResult},
    gateway::{response_error_text, GatewayClient},
    models::domain::{NewQuizResult, QuizResult},
};

/// Access to the persisted `quiz_results` collection. Both operations act on
/// the caller's behalf, so they carry the user's bearer token.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait QuizResultRepository: Send + Sync {
    /// Insert one completed result. Failures surface as `Persistence`; the
    /// caller decides whether to retry, this layer never does.
    async fn insert(&self, access_token: &str, result: &NewQuizResult) -> AppResult<()>;

    /// The user's most recent results, newest first, at most `limit`.
    async fn recent_for_user(
        &self,
        access_token: &str,
        user_id: Uuid,
        limit: usize,
    ) -> AppResult<Vec<QuizResult>>;
}

pub struct RestQuizResultRepository {
    client: GatewayClient,
    table: String,
}

impl RestQuizResultRepository {
    pub fn new(client: &GatewayClient, table: &str) -> Self {
        Self {
            client: client.clone(),
            table: table.to_string(),
        }
    }
}

#[async_trait]
impl QuizResultRepository for RestQuizResultRepository {
    async fn insert(&self, access_token: &str, result: &NewQuizResult) -> AppResult<()> {
        let url = self.client.table_url(&self.table);
        let response = self
            .client
            .request(Method::POST, &url, Some(access_token))
            .json(result)
            .send()
            .await
            .map_err(|err| AppError::Persistence(format!("result insert failed: {}", err)))?;

        if !response.status().is_success() {
            return Err(AppError::Persistence(response_error_text(response).await));
        }
        Ok(())
    }

    async fn recent_for_user(
        &self,
        access_token: &str,
        user_id: Uuid,
        limit: usize,
    ) -> AppResult<Vec<QuizResult>> {
        let url = self.client.table_url(&self.table);
        let user_filter = format!("eq.{}", user_id);
        let limit = limit.to_string();
        let response = self
            .client
            .request(Method::GET, &url, Some(access_token))
            .query(&[
                ("select", "*"),
                ("user_id", user_filter.as_str()),
                ("order", "created_at.desc"),
                ("limit", limit.as_str()),
            ])
            .send()
            .await
            .map_err(|err| AppError::DataFetch(format!("result history fetch failed: {}", err)))?;

        if !response.status().is_success() {
            return Err(AppError::DataFetch(response_error_text(response).await));
        }

        response
            .json::<Vec<QuizResult>>()
            .await
            .map_err(|err| AppError::DataFetch(format!("malformed result rows: {}", err)))
    }
}
