use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::model::ids::QuestionId;
use crate::model::question::Question;

//
// ─── PER-QUESTION OUTCOME ──────────────────────────────────────────────────────
//

/// Correctness flag for a single question of a finished exam.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionOutcome {
    pub position: usize,
    pub question_id: QuestionId,
    /// Option the user picked, `None` when the question was left unanswered.
    pub selected: Option<usize>,
    pub correct_option: usize,
    pub is_correct: bool,
}

//
// ─── EXAM RESULT ───────────────────────────────────────────────────────────────
//

/// Final outcome of an exam attempt, derived from a completed session.
///
/// Computed once by the scorer and cached on the session; never stored on its
/// own. Serializable because the result sink posts it to the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExamResult {
    pub total_questions: usize,
    pub correct: usize,
    /// Rounded percentage of correct answers, `0..=100`.
    pub accuracy: u32,
    /// Seconds spent, `configured limit - remaining time`.
    pub elapsed_secs: u32,
    pub outcomes: Vec<QuestionOutcome>,
}

impl ExamResult {
    /// Score a set of recorded answers against the question list.
    ///
    /// Every question weighs the same: an unanswered question counts as
    /// incorrect, there is no partial credit and no negative marking. A zero
    /// question list yields accuracy 0 rather than dividing by zero.
    #[must_use]
    pub fn compute(
        questions: &[Question],
        answers: &BTreeMap<usize, usize>,
        time_limit_secs: u32,
        remaining_secs: u32,
    ) -> Self {
        let outcomes: Vec<QuestionOutcome> = questions
            .iter()
            .enumerate()
            .map(|(position, question)| {
                let selected = answers.get(&position).copied();
                QuestionOutcome {
                    position,
                    question_id: question.id().clone(),
                    selected,
                    correct_option: question.correct_option(),
                    is_correct: selected == Some(question.correct_option()),
                }
            })
            .collect();

        let total_questions = questions.len();
        let correct = outcomes.iter().filter(|o| o.is_correct).count();
        let accuracy = if total_questions == 0 {
            0
        } else {
            #[allow(
                clippy::cast_precision_loss,
                clippy::cast_sign_loss,
                clippy::cast_possible_truncation
            )]
            let pct = (correct as f64 / total_questions as f64 * 100.0).round() as u32;
            pct
        };

        Self {
            total_questions,
            correct,
            accuracy,
            elapsed_secs: time_limit_secs.saturating_sub(remaining_secs),
            outcomes,
        }
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
