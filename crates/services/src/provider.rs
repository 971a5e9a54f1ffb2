//! Collaborator contracts for question supply and result delivery.
//!
//! The session core never talks to the network itself: it asks a
//! [`QuestionProvider`] for a question set at start and hands the finished
//! [`ExamResult`] to a [`ResultSink`]. Real implementations live in
//! [`crate::backend`]; the in-memory doubles here back tests and demos.

use async_trait::async_trait;
use rand::seq::SliceRandom;
use std::sync::{Arc, Mutex};

use simulado_core::model::{Difficulty, ExamResult, Question};

use crate::error::{ProviderError, SubmitError};

/// Source of question sets for new exam sessions.
#[async_trait]
pub trait QuestionProvider: Send + Sync {
    /// Fetch up to `count` questions for the given subject and difficulty.
    ///
    /// # Errors
    ///
    /// Returns `ProviderError` when no questions can be obtained. A set
    /// shorter than `count` is not an error; the caller decides whether to
    /// accept it.
    async fn fetch_questions(
        &self,
        subject: &str,
        difficulty: Difficulty,
        count: u32,
    ) -> Result<Vec<Question>, ProviderError>;
}

/// Destination for finished exam results.
#[async_trait]
pub trait ResultSink: Send + Sync {
    /// Deliver a final result.
    ///
    /// # Errors
    ///
    /// Returns `SubmitError` when delivery fails. The caller surfaces the
    /// failure without retrying or queueing.
    async fn submit_result(&self, result: &ExamResult) -> Result<(), SubmitError>;
}

//
// ─── FIXTURE PROVIDER ──────────────────────────────────────────────────────────
//

/// In-memory question pool implementing [`QuestionProvider`].
#[derive(Clone, Default)]
pub struct FixtureProvider {
    pool: Arc<Mutex<Vec<Question>>>,
    shuffle: bool,
}

impl FixtureProvider {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the provider with a fixed pool of questions.
    #[must_use]
    pub fn with_pool(questions: Vec<Question>) -> Self {
        Self {
            pool: Arc::new(Mutex::new(questions)),
            shuffle: false,
        }
    }

    /// Enable or disable shuffling of matching questions before selection.
    #[must_use]
    pub fn with_shuffle(mut self, shuffle: bool) -> Self {
        self.shuffle = shuffle;
        self
    }

    pub fn push(&self, question: Question) {
        self.pool
            .lock()
            .expect("fixture pool lock poisoned")
            .push(question);
    }
}

#[async_trait]
impl QuestionProvider for FixtureProvider {
    async fn fetch_questions(
        &self,
        subject: &str,
        difficulty: Difficulty,
        count: u32,
    ) -> Result<Vec<Question>, ProviderError> {
        let mut matching: Vec<Question> = self
            .pool
            .lock()
            .expect("fixture pool lock poisoned")
            .iter()
            .filter(|q| q.subject() == subject && q.difficulty() == difficulty)
            .cloned()
            .collect();

        if matching.is_empty() {
            return Err(ProviderError::Empty);
        }

        if self.shuffle {
            let mut rng = rand::rng();
            matching.shuffle(&mut rng);
        }

        matching.truncate(usize::try_from(count).unwrap_or(usize::MAX));
        Ok(matching)
    }
}

//
// ─── RECORDING SINK ────────────────────────────────────────────────────────────
//

/// [`ResultSink`] double that records every submitted result.
///
/// Can be told to reject submissions to exercise failure paths.
#[derive(Clone, Default)]
pub struct RecordingSink {
    submitted: Arc<Mutex<Vec<ExamResult>>>,
    reject_with: Arc<Mutex<Option<String>>>,
}

impl RecordingSink {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// All results delivered so far, in submission order.
    #[must_use]
    pub fn submitted(&self) -> Vec<ExamResult> {
        self.submitted
            .lock()
            .expect("recording sink lock poisoned")
            .clone()
    }

    /// Make every following submission fail with `SubmitError::Rejected`.
    pub fn reject_with(&self, reason: impl Into<String>) {
        *self
            .reject_with
            .lock()
            .expect("recording sink lock poisoned") = Some(reason.into());
    }
}

#[async_trait]
impl ResultSink for RecordingSink {
    async fn submit_result(&self, result: &ExamResult) -> Result<(), SubmitError> {
        if let Some(reason) = self
            .reject_with
            .lock()
            .expect("recording sink lock poisoned")
            .clone()
        {
            return Err(SubmitError::Rejected(reason));
        }

        self.submitted
            .lock()
            .expect("recording sink lock poisoned")
            .push(result.clone());
        Ok(())
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use simulado_core::model::{QuestionDraft, QuestionId};

    fn question(id: u64, subject: &str, difficulty: Difficulty) -> Question {
        QuestionDraft {
            id: QuestionId::new(format!("q{id}")),
            prompt: format!("Questão {id}"),
            options: vec!["A".into(), "B".into(), "C".into(), "D".into()],
            correct_option: 0,
            explanation: None,
            subject: subject.into(),
            difficulty,
        }
        .validate()
        .unwrap()
    }

    #[tokio::test]
    async fn fixture_filters_by_subject_and_difficulty() {
        let provider = FixtureProvider::with_pool(vec![
            question(1, "Matemática", Difficulty::Medium),
            question(2, "Português", Difficulty::Medium),
            question(3, "Matemática", Difficulty::Hard),
        ]);

        let got = provider
            .fetch_questions("Matemática", Difficulty::Medium, 10)
            .await
            .unwrap();
        assert_eq!(got.len(), 1);
        assert_eq!(got[0].id().as_str(), "q1");
    }

    #[tokio::test]
    async fn fixture_truncates_to_requested_count() {
        let provider = FixtureProvider::with_pool(
            (1..=5)
                .map(|i| question(i, "História", Difficulty::Easy))
                .collect(),
        );

        let got = provider
            .fetch_questions("História", Difficulty::Easy, 3)
            .await
            .unwrap();
        assert_eq!(got.len(), 3);
    }

    #[tokio::test]
    async fn fixture_without_matches_fails_empty() {
        let provider = FixtureProvider::new();
        let err = provider
            .fetch_questions("Geografia", Difficulty::Easy, 5)
            .await
            .unwrap_err();
        assert!(matches!(err, ProviderError::Empty));
    }

    #[tokio::test]
    async fn recording_sink_captures_and_rejects() {
        use std::collections::BTreeMap;

        let sink = RecordingSink::new();
        let questions = vec![question(1, "Geral", Difficulty::Medium)];
        let result = ExamResult::compute(&questions, &BTreeMap::from([(0, 0)]), 60, 30);

        sink.submit_result(&result).await.unwrap();
        assert_eq!(sink.submitted().len(), 1);

        sink.reject_with("backend indisponível");
        let err = sink.submit_result(&result).await.unwrap_err();
        assert!(matches!(err, SubmitError::Rejected(_)));
        assert_eq!(sink.submitted().len(), 1);
    }
}
