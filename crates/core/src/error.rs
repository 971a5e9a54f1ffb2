use thiserror::Error;

use crate::model::{ConfigError, NavigationError, QuestionError};

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Question(#[from] QuestionError),
    #[error(transparent)]
    Navigation(#[from] NavigationError),
}
