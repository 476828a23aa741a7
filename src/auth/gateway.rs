use async_trait::async_trait;
use reqwest::{Method, StatusCode};
use serde::Deserialize;
use serde_json::json;

use crate::{
    errors::{AppError, AppResult},
    gateway::{response_error_text, GatewayClient},
    models::domain::User,
};

/// A signed-in session as issued by the gateway: the bearer token plus the
/// identity it resolves to.
#[derive(Clone, Debug, Deserialize)]
pub struct AuthSession {
    pub access_token: String,
    pub user: User,
}

/// Auth facet of the remote gateway. Sign-up intentionally returns no
/// session: the gateway may require email confirmation, so callers sign in
/// as a separate step.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AuthGateway: Send + Sync {
    async fn sign_up(&self, email: &str, password: &str) -> AppResult<()>;
    async fn sign_in_with_password(&self, email: &str, password: &str) -> AppResult<AuthSession>;
    async fn sign_out(&self, access_token: &str) -> AppResult<()>;
    /// `Ok(None)` means the token does not resolve to a user; transport
    /// failures are errors.
    async fn get_user(&self, access_token: &str) -> AppResult<Option<User>>;
}

pub struct RestAuthGateway {
    client: GatewayClient,
}

impl RestAuthGateway {
    pub fn new(client: &GatewayClient) -> Self {
        Self {
            client: client.clone(),
        }
    }
}

#[async_trait]
impl AuthGateway for RestAuthGateway {
    async fn sign_up(&self, email: &str, password: &str) -> AppResult<()> {
        let response = self
            .client
            .request(Method::POST, &self.client.auth_url("signup"), None)
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await
            .map_err(|err| AppError::Auth(format!("sign-up request failed: {}", err)))?;

        if !response.status().is_success() {
            return Err(AppError::Auth(response_error_text(response).await));
        }
        Ok(())
    }

    async fn sign_in_with_password(&self, email: &str, password: &str) -> AppResult<AuthSession> {
        let url = self.client.auth_url("token?grant_type=password");
        let response = self
            .client
            .request(Method::POST, &url, None)
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await
            .map_err(|err| AppError::Auth(format!("sign-in request failed: {}", err)))?;

        if !response.status().is_success() {
            return Err(AppError::Auth(response_error_text(response).await));
        }

        response
            .json::<AuthSession>()
            .await
            .map_err(|err| AppError::Internal(format!("malformed session payload: {}", err)))
    }

    async fn sign_out(&self, access_token: &str) -> AppResult<()> {
        let response = self
            .client
            .request(Method::POST, &self.client.auth_url("logout"), Some(access_token))
            .send()
            .await
            .map_err(|err| AppError::Auth(format!("sign-out request failed: {}", err)))?;

        if !response.status().is_success() {
            return Err(AppError::Auth(response_error_text(response).await));
        }
        Ok(())
    }

    async fn get_user(&self, access_token: &str) -> AppResult<Option<User>> {
        let response = self
            .client
            .request(Method::GET, &self.client.auth_url("user"), Some(access_token))
            .send()
            .await
            .map_err(|err| AppError::Auth(format!("user lookup failed: {}", err)))?;

        match response.status() {
            status if status.is_success() => {
                let user = response.json::<User>().await.map_err(|err| {
                    AppError::Internal(format!("malformed user payload: {}", err))
                })?;
                Ok(Some(user))
            }
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Ok(None),
            _ => Err(AppError::Auth(response_error_text(response).await)),
        }
    }
}
