use async_trait::async_trait;
use reqwest::Method;

use crate::{
    errors::{AppError, AppResult},
    gateway::{response_error_text, GatewayClient},
    models::domain::Question,
};

/// Read access to the `questions` collection. The bank is small; one bounded
/// fetch per quiz, no pagination.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait QuestionRepository: Send + Sync {
    async fn fetch_candidates(&self, limit: usize) -> AppResult<Vec<Question>>;
}

pub struct RestQuestionRepository {
    client: GatewayClient,
    table: String,
}

impl RestQuestionRepository {
    pub fn new(client: &GatewayClient, table: &str) -> Self {
        Self {
            client: client.clone(),
            table: table.to_string(),
        }
    }
}

#[async_trait]
impl QuestionRepository for RestQuestionRepository {
    async fn fetch_candidates(&self, limit: usize) -> AppResult<Vec<Question>> {
        let url = self.client.table_url(&self.table);
        let limit = limit.to_string();
        let response = self
            .client
            .request(Method::GET, &url, None)
            .query(&[("select", "*"), ("limit", limit.as_str())])
            .send()
            .await
            .map_err(|err| AppError::DataFetch(format!("question fetch failed: {}", err)))?;

        if !response.status().is_success() {
            return Err(AppError::DataFetch(response_error_text(response).await));
        }

        response
            .json::<Vec<Question>>()
            .await
            .map_err(|err| AppError::DataFetch(format!("malformed question rows: {}", err)))
    }
}
