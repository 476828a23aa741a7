use actix_web::{get, web, HttpResponse};
use serde_json::json;

use crate::{app_state::AppState, errors::AppError};

/// Liveness plus gateway reachability. A gateway outage surfaces as 502 so
/// orchestration can tell "service down" from "dependency down".
#[get("/api/health")]
pub async fn health(state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    state.gateway.health_check().await?;
    Ok(HttpResponse::Ok().json(json!({ "status": "ok" })))
}
