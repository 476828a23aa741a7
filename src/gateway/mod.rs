use std::time::Duration;

use reqwest::{Method, RequestBuilder, Response};
use secrecy::{ExposeSecret, SecretString};

use crate::{
    config::Config,
    errors::{AppError, AppResult},
};

/// HTTP client for the remote gateway. One instance is shared by the auth
/// gateway and the record repositories; it owns the base URL, the project
/// API key, and the request timeout.
#[derive(Clone)]
pub struct GatewayClient {
    http: reqwest::Client,
    base_url: String,
    api_key: SecretString,
}

impl GatewayClient {
    pub fn new(config: &Config) -> AppResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.gateway_timeout_secs))
            .build()
            .map_err(|err| {
                AppError::Internal(format!("failed to build gateway HTTP client: {}", err))
            })?;

        Ok(Self {
            http,
            base_url: config.gateway_url.trim_end_matches('/').to_string(),
            api_key: config.gateway_api_key.clone(),
        })
    }

    pub fn auth_url(&self, path: &str) -> String {
        format!("{}/auth/v1/{}", self.base_url, path)
    }

    pub fn table_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.base_url, table)
    }

    /// Build a request carrying the project API key. When no user token is
    /// supplied the key itself doubles as the bearer, which is how anonymous
    /// reads of the question bank are authorized.
    pub fn request(&self, method: Method, url: &str, bearer: Option<&str>) -> RequestBuilder {
        let api_key = self.api_key.expose_secret();
        self.http
            .request(method, url)
            .header("apikey", api_key)
            .bearer_auth(bearer.unwrap_or(api_key))
    }

    pub async fn health_check(&self) -> AppResult<()> {
        let response = self
            .request(Method::GET, &self.auth_url("health"), None)
            .send()
            .await
            .map_err(|err| AppError::DataFetch(format!("gateway unreachable: {}", err)))?;

        if !response.status().is_success() {
            return Err(AppError::DataFetch(format!(
                "gateway health check returned {}",
                response.status()
            )));
        }
        Ok(())
    }
}

/// Render a failed gateway response into a short diagnostic, preferring the
/// gateway's own message fields over the raw body.
pub async fn response_error_text(response: Response) -> String {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();

    let detail = serde_json::from_str::<serde_json::Value>(&body)
        .ok()
        .and_then(|value| {
            ["error_description", "msg", "message", "error"]
                .iter()
                .find_map(|key| {
                    value
                        .get(key)
                        .and_then(|field| field.as_str())
                        .map(String::from)
                })
        })
        .unwrap_or(body);

    format!("{}: {}", status, detail.trim())
}
