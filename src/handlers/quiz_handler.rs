use actix_web::{get, post, web, HttpResponse};
use uuid::Uuid;

use crate::{
    app_state::AppState,
    auth::AuthenticatedUser,
    errors::AppError,
    models::dto::request::AnswerRequest,
    models::dto::response::{QuizStateResponse, SavedResultResponse},
};

#[post("/api/quiz")]
pub async fn start_quiz(
    state: web::Data<AppState>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let session = state.quiz_service.start_quiz(auth.user.id).await?;
    Ok(HttpResponse::Created().json(QuizStateResponse::from_session(&session)))
}

#[get("/api/quiz/{session_id}")]
pub async fn get_quiz(
    state: web::Data<AppState>,
    session_id: web::Path<Uuid>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let session = state
        .quiz_service
        .session(auth.user.id, session_id.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(QuizStateResponse::from_session(&session)))
}

#[post("/api/quiz/{session_id}/answers")]
pub async fn submit_answer(
    state: web::Data<AppState>,
    session_id: web::Path<Uuid>,
    request: web::Json<AnswerRequest>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let (session, _outcome) = state
        .quiz_service
        .answer(auth.user.id, session_id.into_inner(), request.choice_index)
        .await?;
    Ok(HttpResponse::Ok().json(QuizStateResponse::from_session(&session)))
}

#[post("/api/quiz/{session_id}/result")]
pub async fn save_result(
    state: web::Data<AppState>,
    session_id: web::Path<Uuid>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let saved = state
        .quiz_service
        .save_result(&auth.access_token, session_id.into_inner())
        .await?;
    Ok(HttpResponse::Created().json(SavedResultResponse {
        score: saved.score,
        completion_time_seconds: saved.completion_time,
    }))
}
