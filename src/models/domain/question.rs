use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A multiple-choice question row from the gateway's question bank.
/// Immutable once fetched; the gateway owns the canonical copy.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct Question {
    pub id: Uuid,
    pub question_text: String,
    pub options: Vec<String>,
    pub correct_answer: usize,
}

impl Question {
    /// A row is usable only if it has text, at least one option, and a
    /// correct-answer index that points inside the option list. Rows that
    /// fail this are dropped from the candidate set before sampling.
    pub fn is_well_formed(&self) -> bool {
        !self.question_text.trim().is_empty()
            && !self.options.is_empty()
            && self.correct_answer < self.options.len()
    }
}
