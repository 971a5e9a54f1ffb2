use thiserror::Error;

use crate::model::question::Difficulty;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("exam subject cannot be empty")]
    EmptySubject,

    #[error("question count must be > 0")]
    InvalidQuestionCount,

    #[error("time limit must be > 0 minutes")]
    InvalidTimeLimit,
}

//
// ─── CONFIG ────────────────────────────────────────────────────────────────────
//

/// Configuration the user picks before starting an exam attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExamConfig {
    subject: String,
    question_count: u32,
    time_limit_min: u32,
    difficulty: Difficulty,
}

impl ExamConfig {
    /// Creates a validated exam configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the subject is blank, or question count or time
    /// limit is zero.
    pub fn new(
        subject: impl Into<String>,
        question_count: u32,
        time_limit_min: u32,
        difficulty: Difficulty,
    ) -> Result<Self, ConfigError> {
        let subject = subject.into();
        if subject.trim().is_empty() {
            return Err(ConfigError::EmptySubject);
        }
        if question_count == 0 {
            return Err(ConfigError::InvalidQuestionCount);
        }
        if time_limit_min == 0 {
            return Err(ConfigError::InvalidTimeLimit);
        }

        Ok(Self {
            subject,
            question_count,
            time_limit_min,
            difficulty,
        })
    }

    /// The preset catalogue offered on the simulado screen.
    #[must_use]
    pub fn presets() -> Vec<ExamConfig> {
        let presets = [
            ("Matemática", 10, 30, Difficulty::Medium),
            ("Português", 15, 45, Difficulty::Medium),
            ("História", 12, 35, Difficulty::Easy),
            ("Geografia", 12, 35, Difficulty::Easy),
            ("Ciências", 10, 30, Difficulty::Medium),
            ("Simulado Completo", 50, 120, Difficulty::Hard),
        ];

        presets
            .into_iter()
            .map(|(subject, count, minutes, difficulty)| {
                ExamConfig::new(subject, count, minutes, difficulty)
                    .expect("preset configurations are valid")
            })
            .collect()
    }

    #[must_use]
    pub fn subject(&self) -> &str {
        &self.subject
    }

    #[must_use]
    pub fn question_count(&self) -> u32 {
        self.question_count
    }

    #[must_use]
    pub fn time_limit_min(&self) -> u32 {
        self.time_limit_min
    }

    /// Time limit converted to seconds, as counted down by the session timer.
    #[must_use]
    pub fn time_limit_secs(&self) -> u32 {
        self.time_limit_min * 60
    }

    #[must_use]
    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
