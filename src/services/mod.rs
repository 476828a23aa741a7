pub mod quiz_service;
pub mod results_service;
pub mod sampling;
pub mod session_service;

pub use quiz_service::{QuizService, QUESTION_FETCH_LIMIT};
pub use results_service::{ResultsService, HISTORY_LIMIT};
pub use session_service::SessionService;
