pub mod question;
pub mod quiz_result;
pub mod quiz_session;
pub mod user;

pub use question::Question;
pub use quiz_result::{NewQuizResult, QuizResult};
pub use quiz_session::{AnswerOutcome, QuizSession, QUESTIONS_PER_QUIZ};
pub use user::User;
