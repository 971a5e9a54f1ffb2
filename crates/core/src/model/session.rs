use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use thiserror::Error;

use crate::model::ids::SessionId;
use crate::model::question::Question;
use crate::model::result::ExamResult;
use crate::model::user::CurrentUser;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

/// Contract violation on `jump_to`: the target position has not been reached.
///
/// This is a caller bug, not a runtime condition to recover from; the UI is
/// expected to only offer navigation to visited positions or the next one.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("cannot jump to position {requested}: highest reachable is {max_allowed}")]
pub struct NavigationError {
    pub requested: usize,
    pub max_allowed: usize,
}

//
// ─── STATUS ────────────────────────────────────────────────────────────────────
//

/// Lifecycle of an exam attempt.
///
/// `NotStarted -> InProgress <-> Paused -> Completed`; `Completed` is terminal.
/// Pausing only stops the timer tick, every other operation stays valid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    NotStarted,
    InProgress,
    Paused,
    Completed,
}

//
// ─── SESSION ───────────────────────────────────────────────────────────────────
//

/// One in-memory exam attempt.
///
/// Owns the fixed question sequence, the sparse answer map, the position
/// pointer and the countdown. Mutated only through the methods below; invalid
/// inputs are silent no-ops so a tick and a user action can interleave in any
/// order without extra coordination. The session is discarded once its
/// [`ExamResult`] has been computed and shown; durable storage of results is
/// the backend's job.
pub struct ExamSession {
    id: SessionId,
    user: CurrentUser,
    questions: Vec<Question>,
    answers: BTreeMap<usize, usize>,
    position: usize,
    highest_visited: usize,
    time_limit_secs: u32,
    remaining_secs: u32,
    status: SessionStatus,
    created_at: DateTime<Utc>,
    completed_at: Option<DateTime<Utc>>,
    result: Option<ExamResult>,
}

impl ExamSession {
    /// Create a session over a fixed question sequence.
    ///
    /// `created_at` should come from the services layer clock to keep time
    /// deterministic. The session starts as `NotStarted`; call [`Self::start`].
    #[must_use]
    pub fn new(
        user: CurrentUser,
        questions: Vec<Question>,
        time_limit_secs: u32,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: SessionId::generate(),
            user,
            questions,
            answers: BTreeMap::new(),
            position: 0,
            highest_visited: 0,
            time_limit_secs,
            remaining_secs: time_limit_secs,
            status: SessionStatus::NotStarted,
            created_at,
            completed_at: None,
            result: None,
        }
    }

    // ── accessors ──────────────────────────────────────────────────────────

    #[must_use]
    pub fn id(&self) -> SessionId {
        self.id
    }

    #[must_use]
    pub fn user(&self) -> &CurrentUser {
        &self.user
    }

    #[must_use]
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    #[must_use]
    pub fn total_questions(&self) -> usize {
        self.questions.len()
    }

    #[must_use]
    pub fn position(&self) -> usize {
        self.position
    }

    #[must_use]
    pub fn highest_visited(&self) -> usize {
        self.highest_visited
    }

    #[must_use]
    pub fn current_question(&self) -> Option<&Question> {
        self.questions.get(self.position)
    }

    /// Recorded answer at `position`, if any.
    #[must_use]
    pub fn answer_at(&self, position: usize) -> Option<usize> {
        self.answers.get(&position).copied()
    }

    #[must_use]
    pub fn answered_count(&self) -> usize {
        self.answers.len()
    }

    #[must_use]
    pub fn time_limit_secs(&self) -> u32 {
        self.time_limit_secs
    }

    #[must_use]
    pub fn remaining_secs(&self) -> u32 {
        self.remaining_secs
    }

    #[must_use]
    pub fn status(&self) -> SessionStatus {
        self.status
    }

    #[must_use]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    #[must_use]
    pub fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.completed_at
    }

    /// Cached result, present once the session has been finished.
    #[must_use]
    pub fn result(&self) -> Option<&ExamResult> {
        self.result.as_ref()
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        matches!(self.status, SessionStatus::Completed)
    }

    /// True while the attempt is running or paused.
    #[must_use]
    pub fn is_active(&self) -> bool {
        matches!(self.status, SessionStatus::InProgress | SessionStatus::Paused)
    }

    // ── state machine ──────────────────────────────────────────────────────

    /// Move from `NotStarted` to `InProgress`. No-op in any other state.
    pub fn start(&mut self) {
        if matches!(self.status, SessionStatus::NotStarted) {
            self.status = SessionStatus::InProgress;
        }
    }

    /// Stop the timer. Only valid from `InProgress`.
    pub fn pause(&mut self) {
        if matches!(self.status, SessionStatus::InProgress) {
            self.status = SessionStatus::Paused;
        }
    }

    /// Resume the timer exactly where it left off. Only valid from `Paused`.
    pub fn resume(&mut self) {
        if matches!(self.status, SessionStatus::Paused) {
            self.status = SessionStatus::InProgress;
        }
    }

    /// Record (or overwrite) the answer for a visited position.
    ///
    /// Silent no-op when the session is not active, when `position` is beyond
    /// the highest visited question, or when `option` is out of bounds for
    /// that question. Never advances the pointer.
    pub fn record_answer(&mut self, position: usize, option: usize) {
        if !self.is_active() {
            return;
        }
        if position > self.highest_visited {
            return;
        }
        let Some(question) = self.questions.get(position) else {
            return;
        };
        if !question.has_option(option) {
            return;
        }
        self.answers.insert(position, option);
    }

    /// Move the pointer forward by one; finishing the exam when already at
    /// the last question.
    pub fn advance(&mut self, now: DateTime<Utc>) {
        if !self.is_active() {
            return;
        }
        if self.position + 1 < self.questions.len() {
            self.position += 1;
            self.highest_visited = self.highest_visited.max(self.position);
        } else {
            self.finish(now);
        }
    }

    /// Move the pointer backward by one; no-op at position 0.
    pub fn retreat(&mut self) {
        if !self.is_active() {
            return;
        }
        self.position = self.position.saturating_sub(1);
    }

    /// Jump directly to a visited position or the immediately-next one.
    ///
    /// # Errors
    ///
    /// Returns `NavigationError` when `position` is beyond `highest visited
    /// + 1` or past the end of the question list.
    pub fn jump_to(&mut self, position: usize) -> Result<(), NavigationError> {
        if !self.is_active() {
            return Ok(());
        }
        let max_allowed = (self.highest_visited + 1).min(self.questions.len().saturating_sub(1));
        if position > max_allowed {
            return Err(NavigationError {
                requested: position,
                max_allowed,
            });
        }
        self.position = position;
        self.highest_visited = self.highest_visited.max(position);
        Ok(())
    }

    /// Complete the attempt, freeze the countdown and compute the result.
    ///
    /// Idempotent: finishing an already-completed session returns the cached
    /// result unchanged, ignoring `now`.
    pub fn finish(&mut self, now: DateTime<Utc>) -> &ExamResult {
        if self.result.is_none() {
            let result = ExamResult::compute(
                &self.questions,
                &self.answers,
                self.time_limit_secs,
                self.remaining_secs,
            );
            self.result = Some(result);
            self.status = SessionStatus::Completed;
            self.completed_at = Some(now);
        }
        self.result.as_ref().expect("result cached on completion")
    }

    /// One countdown step: decrement the remaining time by a second.
    ///
    /// Only ticks while `InProgress`; paused and completed sessions ignore
    /// ticks entirely. Reaching zero clamps and forces completion. Invocable
    /// by any scheduling mechanism, including a test driving it manually.
    pub fn tick(&mut self, now: DateTime<Utc>) {
        if !matches!(self.status, SessionStatus::InProgress) {
            return;
        }
        self.remaining_secs = self.remaining_secs.saturating_sub(1);
        if self.remaining_secs == 0 {
            self.finish(now);
        }
    }
}

impl std::fmt::Debug for ExamSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExamSession")
            .field("id", &self.id)
            .field("questions_len", &self.questions.len())
            .field("position", &self.position)
            .field("answered", &self.answers.len())
            .field("remaining_secs", &self.remaining_secs)
            .field("status", &self.status)
            .finish_non_exhaustive()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
