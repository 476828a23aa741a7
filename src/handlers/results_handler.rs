use actix_web::{get, web, HttpResponse};

use crate::{
    app_state::AppState,
    auth::AuthenticatedUser,
    errors::AppError,
    models::dto::response::{ResultDto, ResultsResponse},
};

#[get("/api/results")]
pub async fn recent_results(
    state: web::Data<AppState>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let results = state
        .results_service
        .recent_results(&auth.access_token, auth.user.id)
        .await?;

    Ok(HttpResponse::Ok().json(ResultsResponse {
        results: results.into_iter().map(ResultDto::from).collect(),
    }))
}
