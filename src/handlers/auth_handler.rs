use actix_web::{get, post, web, HttpResponse};
use validator::Validate;

use crate::{
    app_state::AppState,
    auth::AuthenticatedUser,
    errors::AppError,
    models::dto::request::{LoginRequest, SignUpRequest},
    models::dto::response::{LoginResponse, MessageResponse, UserDto},
};

#[post("/api/auth/signup")]
pub async fn signup(
    state: web::Data<AppState>,
    request: web::Json<SignUpRequest>,
) -> Result<HttpResponse, AppError> {
    let request = request.into_inner();
    request.validate()?;

    state
        .session_service
        .sign_up(&request.email, &request.password)
        .await?;

    Ok(HttpResponse::Ok().json(MessageResponse {
        message: "account created, sign in to start your first quiz".to_string(),
    }))
}

#[post("/api/auth/login")]
pub async fn login(
    state: web::Data<AppState>,
    request: web::Json<LoginRequest>,
) -> Result<HttpResponse, AppError> {
    let request = request.into_inner();
    request.validate()?;

    let session = state
        .session_service
        .sign_in(&request.email, &request.password)
        .await?;

    Ok(HttpResponse::Ok().json(LoginResponse {
        access_token: session.access_token,
        user: UserDto::from(session.user),
    }))
}

#[post("/api/auth/logout")]
pub async fn logout(
    state: web::Data<AppState>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    state.session_service.sign_out(&auth.access_token).await?;
    Ok(HttpResponse::Ok().json(MessageResponse {
        message: "signed out".to_string(),
    }))
}

#[get("/api/auth/user")]
pub async fn current_user(auth: AuthenticatedUser) -> Result<HttpResponse, AppError> {
    Ok(HttpResponse::Ok().json(UserDto::from(auth.user)))
}
