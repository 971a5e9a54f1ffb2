mod config;
mod ids;
mod question;
mod result;
mod session;
mod user;

pub use config::{ConfigError, ExamConfig};
pub use ids::{ParseIdError, QuestionId, SessionId};
pub use question::{Difficulty, Question, QuestionDraft, QuestionError};
pub use result::{ExamResult, QuestionOutcome};
pub use session::{ExamSession, NavigationError, SessionStatus};
pub use user::CurrentUser;
