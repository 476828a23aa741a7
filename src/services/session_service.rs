use std::sync::Arc;

use crate::{
    auth::{AuthGateway, AuthSession},
    errors::{AppError, AppResult},
    models::domain::User,
};

/// Sign-in, sign-up, and sign-out, delegated to the gateway's auth facet.
/// The gateway holds all credential state; this service only translates
/// outcomes into the application's error taxonomy.
pub struct SessionService {
    auth: Arc<dyn AuthGateway>,
}

impl SessionService {
    pub fn new(auth: Arc<dyn AuthGateway>) -> Self {
        Self { auth }
    }

    pub async fn sign_up(&self, email: &str, password: &str) -> AppResult<()> {
        self.auth.sign_up(email, password).await?;
        log::info!("account created for {}", email);
        Ok(())
    }

    pub async fn sign_in(&self, email: &str, password: &str) -> AppResult<AuthSession> {
        let session = self.auth.sign_in_with_password(email, password).await?;
        log::info!("user {} signed in", session.user.id);
        Ok(session)
    }

    pub async fn sign_out(&self, access_token: &str) -> AppResult<()> {
        self.auth.sign_out(access_token).await
    }

    /// Resolve a bearer token to a user. An unresolvable token is
    /// `AuthRequired`; that absence is the only signal route guarding uses.
    pub async fn current_user(&self, access_token: &str) -> AppResult<User> {
        self.auth
            .get_user(access_token)
            .await?
            .ok_or(AppError::AuthRequired)
    }
}
