use std::sync::Arc;

use tracing::{info, warn};

use simulado_core::Clock;
use simulado_core::model::{CurrentUser, ExamConfig, ExamResult, ExamSession};

use crate::error::{ExamServiceError, ProviderError, SubmitError};
use crate::provider::{QuestionProvider, ResultSink};

/// Result of finishing an exam together with the submission attempt.
///
/// Submission failure never blocks the result: the score is always present
/// and the failed delivery is carried alongside for the caller to surface.
#[derive(Debug)]
pub struct ExamOutcome {
    pub result: ExamResult,
    pub submission: Result<(), SubmitError>,
}

/// Orchestrates exam attempts against the external collaborators.
///
/// Holds the question provider and result sink behind trait objects so the
/// same service runs against the real backend or the in-memory fixtures.
#[derive(Clone)]
pub struct ExamService {
    clock: Clock,
    provider: Arc<dyn QuestionProvider>,
    sink: Arc<dyn ResultSink>,
}

impl ExamService {
    #[must_use]
    pub fn new(clock: Clock, provider: Arc<dyn QuestionProvider>, sink: Arc<dyn ResultSink>) -> Self {
        Self {
            clock,
            provider,
            sink,
        }
    }

    /// Start a new exam attempt for `user` with the chosen configuration.
    ///
    /// A question set shorter than requested is accepted as-is; only an empty
    /// set fails. The returned session is already `InProgress`.
    ///
    /// # Errors
    ///
    /// Returns `ExamServiceError::Provider` when the question set cannot be
    /// obtained or is empty.
    pub async fn start(
        &self,
        user: CurrentUser,
        config: &ExamConfig,
    ) -> Result<ExamSession, ExamServiceError> {
        let questions = self
            .provider
            .fetch_questions(
                config.subject(),
                config.difficulty(),
                config.question_count(),
            )
            .await?;

        if questions.is_empty() {
            return Err(ProviderError::Empty.into());
        }
        if questions.len() < config.question_count() as usize {
            warn!(
                subject = config.subject(),
                requested = config.question_count(),
                received = questions.len(),
                "provider returned a short question set, accepting"
            );
        }

        let mut session = ExamSession::new(
            user,
            questions,
            config.time_limit_secs(),
            self.clock.now(),
        );
        session.start();

        info!(
            session_id = %session.id(),
            subject = config.subject(),
            total = session.total_questions(),
            time_limit_secs = session.time_limit_secs(),
            "exam session started"
        );
        Ok(session)
    }

    /// Finish the session and return its result.
    ///
    /// Idempotent via the session's cached result.
    pub fn finish(&self, session: &mut ExamSession) -> ExamResult {
        let result = session.finish(self.clock.now()).clone();
        info!(
            session_id = %session.id(),
            correct = result.correct,
            total = result.total_questions,
            accuracy = result.accuracy,
            "exam session finished"
        );
        result
    }

    /// Deliver a finished result to the sink.
    ///
    /// # Errors
    ///
    /// Returns `SubmitError` on delivery failure; the caller may let the user
    /// retry manually.
    pub async fn submit(&self, result: &ExamResult) -> Result<(), SubmitError> {
        match self.sink.submit_result(result).await {
            Ok(()) => Ok(()),
            Err(err) => {
                warn!(error = %err, "result submission failed");
                Err(err)
            }
        }
    }

    /// Finish the session and attempt submission in one step.
    ///
    /// The result is computed and returned even when submission fails.
    pub async fn finish_and_submit(&self, session: &mut ExamSession) -> ExamOutcome {
        let result = self.finish(session);
        let submission = self.submit(&result).await;
        ExamOutcome { result, submission }
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use simulado_core::model::{Difficulty, Question, QuestionDraft, QuestionId, SessionStatus};
    use simulado_core::time::fixed_clock;

    use crate::provider::{FixtureProvider, RecordingSink};

    fn question(id: u64, correct_option: usize) -> Question {
        QuestionDraft {
            id: QuestionId::new(format!("q{id}")),
            prompt: format!("Questão {id}"),
            options: vec!["A".into(), "B".into(), "C".into(), "D".into()],
            correct_option,
            explanation: None,
            subject: "Matemática".into(),
            difficulty: Difficulty::Medium,
        }
        .validate()
        .unwrap()
    }

    fn service_with(pool: Vec<Question>) -> (ExamService, RecordingSink) {
        let sink = RecordingSink::new();
        let service = ExamService::new(
            fixed_clock(),
            Arc::new(FixtureProvider::with_pool(pool)),
            Arc::new(sink.clone()),
        );
        (service, sink)
    }

    fn config(count: u32) -> ExamConfig {
        ExamConfig::new("Matemática", count, 30, Difficulty::Medium).unwrap()
    }

    #[tokio::test]
    async fn start_builds_an_in_progress_session() {
        let (service, _sink) = service_with(vec![question(1, 0), question(2, 1)]);
        let session = service
            .start(CurrentUser::new("u1", "Ana"), &config(2))
            .await
            .unwrap();

        assert_eq!(session.status(), SessionStatus::InProgress);
        assert_eq!(session.total_questions(), 2);
        assert_eq!(session.remaining_secs(), 1800);
        assert_eq!(session.user().name(), "Ana");
    }

    #[tokio::test]
    async fn start_accepts_a_short_question_set() {
        let (service, _sink) = service_with(vec![question(1, 0)]);
        let session = service
            .start(CurrentUser::new("u1", "Ana"), &config(5))
            .await
            .unwrap();
        assert_eq!(session.total_questions(), 1);
    }

    #[tokio::test]
    async fn start_fails_when_provider_has_nothing() {
        let (service, _sink) = service_with(Vec::new());
        let err = service
            .start(CurrentUser::new("u1", "Ana"), &config(5))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ExamServiceError::Provider(ProviderError::Empty)
        ));
    }

    #[tokio::test]
    async fn finish_and_submit_delivers_the_result() {
        let (service, sink) = service_with(vec![question(1, 0), question(2, 1)]);
        let mut session = service
            .start(CurrentUser::new("u1", "Ana"), &config(2))
            .await
            .unwrap();

        session.record_answer(0, 0);
        session.advance(fixed_clock().now());
        session.record_answer(1, 3);

        let outcome = service.finish_and_submit(&mut session).await;
        assert!(outcome.submission.is_ok());
        assert_eq!(outcome.result.correct, 1);
        assert_eq!(outcome.result.accuracy, 50);
        assert_eq!(sink.submitted(), vec![outcome.result]);
    }

    #[tokio::test]
    async fn submit_failure_does_not_block_the_result() {
        let (service, sink) = service_with(vec![question(1, 0)]);
        sink.reject_with("backend indisponível");

        let mut session = service
            .start(CurrentUser::new("u1", "Ana"), &config(1))
            .await
            .unwrap();
        session.record_answer(0, 0);

        let outcome = service.finish_and_submit(&mut session).await;
        assert!(matches!(outcome.submission, Err(SubmitError::Rejected(_))));
        assert_eq!(outcome.result.accuracy, 100);
        assert!(sink.submitted().is_empty());

        // Manual retry goes through the same path and surfaces the failure again.
        let retried = service.submit(&outcome.result).await;
        assert!(matches!(retried, Err(SubmitError::Rejected(_))));
    }

    #[tokio::test]
    async fn finishing_twice_returns_the_same_result() {
        let (service, _sink) = service_with(vec![question(1, 0)]);
        let mut session = service
            .start(CurrentUser::new("u1", "Ana"), &config(1))
            .await
            .unwrap();

        let first = service.finish(&mut session);
        let second = service.finish(&mut session);
        assert_eq!(first, second);
    }
}
