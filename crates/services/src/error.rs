//! Shared error types for the services crate.

use thiserror::Error;

use simulado_core::model::ConfigError;

/// Failures while obtaining a question set from a provider.
///
/// Surfaced to the caller as a non-retryable start failure; the UI lets the
/// user pick another configuration or retry manually.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ProviderError {
    #[error("question provider is not configured")]
    Disabled,

    #[error("provider returned no questions")]
    Empty,

    #[error("provider request failed with status {0}")]
    HttpStatus(reqwest::StatusCode),

    #[error("provider reported failure: {0}")]
    Backend(String),

    #[error("provider returned a malformed question: {0}")]
    Malformed(String),

    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

/// Failures while posting a final result to the result sink.
///
/// The locally computed result is unaffected and still shown; submission
/// failure is reported but never blocks displaying results.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SubmitError {
    #[error("result sink is not configured")]
    Disabled,

    #[error("result submission failed with status {0}")]
    HttpStatus(reqwest::StatusCode),

    #[error("result submission rejected: {0}")]
    Rejected(String),

    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

/// Errors emitted by `ExamService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ExamServiceError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Provider(#[from] ProviderError),

    #[error(transparent)]
    Submit(#[from] SubmitError),
}
