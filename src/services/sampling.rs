use rand::seq::SliceRandom;
use rand::Rng;

use crate::{
    errors::{AppError, AppResult},
    models::domain::Question,
};

/// Pick `count` questions uniformly, without replacement, from the fetched
/// candidates. Malformed rows are dropped first; a bank that cannot cover a
/// full quiz is an explicit error, not a shorter quiz.
///
/// Uniformity comes from `shuffle`, a Fisher-Yates permutation, followed by
/// taking the prefix.
pub fn sample_questions<R: Rng + ?Sized>(
    mut candidates: Vec<Question>,
    count: usize,
    rng: &mut R,
) -> AppResult<Vec<Question>> {
    candidates.retain(|question| {
        if question.is_well_formed() {
            true
        } else {
            log::warn!("dropping malformed question {} from candidate set", question.id);
            false
        }
    });

    if candidates.len() < count {
        return Err(AppError::InsufficientData {
            available: candidates.len(),
            required: count,
        });
    }

    candidates.shuffle(rng);
    candidates.truncate(count);
    Ok(candidates)
}
