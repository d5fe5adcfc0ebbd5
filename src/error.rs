use std::io;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("configuration error: {0}")]
    Configuration(String),
    #[error("version control error: {0}")]
    VersionControl(String),
    #[error("issue tracker error: {0}")]
    IssueTracker(String),
    #[error("notification error: {0}")]
    Notification(String),
    #[error("invalid payload: {0}")]
    Payload(String),
    #[error("{failed} of {total} commits could not be applied")]
    CommitsFailed { failed: usize, total: usize },
    #[error(transparent)]
    Io(#[from] io::Error),
}

pub type AppResult<T> = Result<T, AppError>;
