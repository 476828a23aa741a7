use std::future::{ready, Ready};

use actix_web::{dev::ServiceRequest, web, Error, FromRequest, HttpMessage, HttpRequest};
use actix_web_httpauth::extractors::bearer::BearerAuth;

use crate::{app_state::AppState, errors::AppError, models::domain::User};

/// Identity attached to a request once the bearer token has been resolved
/// through the gateway. The token rides along because result persistence
/// and sign-out need to act on the caller's behalf.
#[derive(Clone, Debug)]
pub struct AuthenticatedUser {
    pub user: User,
    pub access_token: String,
}

/// Validator for `HttpAuthentication::bearer`. The gateway is the single
/// source of truth for whether a token resolves to a user; no token state is
/// kept locally.
pub async fn validate_bearer(
    req: ServiceRequest,
    credentials: BearerAuth,
) -> Result<ServiceRequest, (Error, ServiceRequest)> {
    let state = match req.app_data::<web::Data<AppState>>() {
        Some(state) => state.clone(),
        None => {
            return Err((
                AppError::Internal("application state not configured".to_string()).into(),
                req,
            ))
        }
    };

    match state.session_service.current_user(credentials.token()).await {
        Ok(user) => {
            req.extensions_mut().insert(AuthenticatedUser {
                user,
                access_token: credentials.token().to_string(),
            });
            Ok(req)
        }
        Err(err) => Err((err.into(), req)),
    }
}

impl FromRequest for AuthenticatedUser {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut actix_web::dev::Payload) -> Self::Future {
        let identity = req
            .extensions()
            .get::<AuthenticatedUser>()
            .cloned()
            .ok_or(AppError::AuthRequired);

        ready(identity)
    }
}
