pub mod question_repository;
pub mod quiz_result_repository;

pub use question_repository::{QuestionRepository, RestQuestionRepository};
pub use quiz_result_repository::{QuizResultRepository, RestQuizResultRepository};

#[cfg(test)]
pub use question_repository::MockQuestionRepository;
#[cfg(test)]
pub use quiz_result_repository::MockQuizResultRepository;
