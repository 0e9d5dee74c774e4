use thiserror::Error;

pub type Result<T> = std::result::Result<T, EvaluatorError>;

#[derive(Error, Debug)]
pub enum EvaluatorError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("Failed to parse JSON: {0}")]
    ParseError(#[from] serde_json::Error),

    #[error("Evaluation API error ({status}): {body}")]
    ApiError { status: u16, body: String },

    #[error("Unexpected response: {0}")]
    UnexpectedResponse(String),

    #[error("Evaluation failed: {0}")]
    EvaluationError(String),
}
