use thiserror::Error;

#[derive(Error, Debug)]
pub enum SurveyError {
    #[error("Worker task failed: {0}")]
    JoinError(#[from] tokio::task::JoinError),

    #[error("Other error: {0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, SurveyError>;
