use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Payload inserted into the `quiz_results` collection. `created_at` is
/// assigned by the gateway on insert, so it is absent here.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewQuizResult {
    pub user_id: Uuid,
    pub score: u8,
    pub completion_time: i64,
}

/// A persisted quiz result as read back from the gateway.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct QuizResult {
    pub user_id: Uuid,
    pub score: u8,
    pub completion_time: i64,
    pub created_at: DateTime<Utc>,
}
