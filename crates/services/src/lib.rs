#![forbid(unsafe_code)]

pub mod backend;
pub mod error;
pub mod exam_service;
pub mod progress;
pub mod provider;

pub use simulado_core::Clock;

pub use backend::{BackendClient, BackendConfig};
pub use error::{ExamServiceError, ProviderError, SubmitError};
pub use exam_service::{ExamOutcome, ExamService};
pub use progress::{ExamProgress, format_clock};
pub use provider::{FixtureProvider, QuestionProvider, RecordingSink, ResultSink};
