pub mod auth_handler;
pub mod health_handler;
pub mod quiz_handler;
pub mod results_handler;

pub use auth_handler::{current_user, login, logout, signup};
pub use health_handler::health;
pub use quiz_handler::{get_quiz, save_result, start_quiz, submit_answer};
pub use results_handler::recent_results;
