use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::ids::QuestionId;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuestionError {
    #[error("question prompt cannot be empty")]
    EmptyPrompt,

    #[error("question must have at least two options, got {0}")]
    TooFewOptions(usize),

    #[error("option {0} cannot be blank")]
    BlankOption(usize),

    #[error("correct option {index} is out of bounds for {len} options")]
    CorrectOptionOutOfBounds { index: usize, len: usize },
}

//
// ─── DIFFICULTY ────────────────────────────────────────────────────────────────
//

/// Difficulty tier of a question or an exam configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    /// Stable lowercase name, matching the serialized form.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }
}

//
// ─── QUESTION ──────────────────────────────────────────────────────────────────
//

/// Unvalidated question as received from a provider.
///
/// Call [`QuestionDraft::validate`] to obtain a [`Question`] that is safe to
/// put into a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionDraft {
    pub id: QuestionId,
    pub prompt: String,
    pub options: Vec<String>,
    pub correct_option: usize,
    pub explanation: Option<String>,
    pub subject: String,
    pub difficulty: Difficulty,
}

impl QuestionDraft {
    /// Validate the draft and produce an immutable `Question`.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError` if the prompt is empty, there are fewer than
    /// two options, any option is blank, or the correct index is out of bounds.
    pub fn validate(self) -> Result<Question, QuestionError> {
        if self.prompt.trim().is_empty() {
            return Err(QuestionError::EmptyPrompt);
        }
        if self.options.len() < 2 {
            return Err(QuestionError::TooFewOptions(self.options.len()));
        }
        if let Some(blank) = self.options.iter().position(|o| o.trim().is_empty()) {
            return Err(QuestionError::BlankOption(blank));
        }
        if self.correct_option >= self.options.len() {
            return Err(QuestionError::CorrectOptionOutOfBounds {
                index: self.correct_option,
                len: self.options.len(),
            });
        }

        Ok(Question {
            id: self.id,
            prompt: self.prompt,
            options: self.options,
            correct_option: self.correct_option,
            explanation: self.explanation,
            subject: self.subject,
            difficulty: self.difficulty,
        })
    }
}

/// A validated multiple-choice question.
///
/// Immutable once loaded into a session; all fields are only readable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    id: QuestionId,
    prompt: String,
    options: Vec<String>,
    correct_option: usize,
    explanation: Option<String>,
    subject: String,
    difficulty: Difficulty,
}

impl Question {
    #[must_use]
    pub fn id(&self) -> &QuestionId {
        &self.id
    }

    #[must_use]
    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    #[must_use]
    pub fn options(&self) -> &[String] {
        &self.options
    }

    /// Index into `options` of the correct answer.
    #[must_use]
    pub fn correct_option(&self) -> usize {
        self.correct_option
    }

    #[must_use]
    pub fn explanation(&self) -> Option<&str> {
        self.explanation.as_deref()
    }

    #[must_use]
    pub fn subject(&self) -> &str {
        &self.subject
    }

    #[must_use]
    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    /// Returns true when `option` is a valid index into this question's options.
    #[must_use]
    pub fn has_option(&self, option: usize) -> bool {
        option < self.options.len()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;

    fn draft() -> QuestionDraft {
        QuestionDraft {
            id: QuestionId::new("q1"),
            prompt: "Qual é a principal função do sistema cardiovascular?".into(),
            options: vec![
                "Digestão de alimentos".into(),
                "Transporte de nutrientes e oxigênio".into(),
                "Produção de hormônios".into(),
                "Filtração de toxinas".into(),
            ],
            correct_option: 1,
            explanation: None,
            subject: "Ciências".into(),
            difficulty: Difficulty::Medium,
        }
    }

    #[test]
    fn valid_draft_validates() {
        let question = draft().validate().unwrap();
        assert_eq!(question.correct_option(), 1);
        assert_eq!(question.options().len(), 4);
        assert!(question.has_option(3));
        assert!(!question.has_option(4));
    }

    #[test]
    fn empty_prompt_is_rejected() {
        let mut d = draft();
        d.prompt = "   ".into();
        assert!(matches!(d.validate(), Err(QuestionError::EmptyPrompt)));
    }

    #[test]
    fn single_option_is_rejected() {
        let mut d = draft();
        d.options.truncate(1);
        assert!(matches!(d.validate(), Err(QuestionError::TooFewOptions(1))));
    }

    #[test]
    fn blank_option_is_rejected() {
        let mut d = draft();
        d.options[2] = " ".into();
        assert!(matches!(d.validate(), Err(QuestionError::BlankOption(2))));
    }

    #[test]
    fn out_of_bounds_correct_option_is_rejected() {
        let mut d = draft();
        d.correct_option = 4;
        let err = d.validate().unwrap_err();
        assert!(matches!(
            err,
            QuestionError::CorrectOptionOutOfBounds { index: 4, len: 4 }
        ));
    }

    #[test]
    fn difficulty_serializes_lowercase() {
        assert_eq!(Difficulty::Medium.as_str(), "medium");
    }
}
