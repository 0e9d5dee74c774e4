use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use evaluator::EvaluatorError;
use serde_json::json;
use std::fmt;
use storage::error::StorageError;
use storage::models::TransitionError;
use storage::services::shortlist_ranking::RankingError;
use storage::services::submission_table::TableError;
use storage::services::weights::WeightError;
use validator::ValidationErrors;

/// Web layer errors
#[derive(Debug)]
pub enum WebError {
    Storage(StorageError),
    Validation(ValidationErrors),
    Evaluation(EvaluatorError),
    BadRequest(String),
    Unauthorized,
}

impl fmt::Display for WebError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Storage(e) => write!(f, "Storage error: {}", e),
            Self::Validation(e) => write!(f, "Validation error: {}", e),
            Self::Evaluation(e) => write!(f, "Evaluation error: {}", e),
            Self::BadRequest(msg) => write!(f, "Bad request: {}", msg),
            Self::Unauthorized => write!(f, "Unauthorized"),
        }
    }
}

impl IntoResponse for WebError {
    fn into_response(self) -> Response {
        let status_code = match &self {
            Self::Storage(StorageError::NotFound) => StatusCode::NOT_FOUND,
            Self::Storage(StorageError::ConstraintViolation(_)) => StatusCode::CONFLICT,
            Self::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::Evaluation(_) => StatusCode::BAD_GATEWAY,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
        };

        let body = match &self {
            Self::Storage(StorageError::NotFound) => {
                json!({
                    "error": "Resource not found"
                })
            }
            Self::Storage(StorageError::ConstraintViolation(msg)) => {
                json!({
                    "error": msg
                })
            }
            Self::Storage(e) => {
                tracing::error!("Storage error: {:?}", e);
                json!({
                    "error": "An internal error occurred"
                })
            }
            Self::Validation(errors) => {
                let field_errors: Vec<String> = errors
                    .field_errors()
                    .iter()
                    .flat_map(|(field, errors)| {
                        errors.iter().map(move |e| {
                            format!(
                                "{}: {}",
                                field,
                                e.message
                                    .as_ref()
                                    .map(|m| m.to_string())
                                    .unwrap_or_else(|| e.code.to_string())
                            )
                        })
                    })
                    .collect();

                json!({
                    "error": "Validation failed",
                    "details": field_errors
                })
            }
            Self::Evaluation(e) => {
                tracing::error!("Evaluation backend error: {}", e);
                json!({
                    "error": "Evaluation service failed"
                })
            }
            Self::BadRequest(msg) => {
                json!({
                    "error": msg
                })
            }
            Self::Unauthorized => {
                json!({
                    "error": "Unauthorized"
                })
            }
        };

        (status_code, Json(body)).into_response()
    }
}

impl From<StorageError> for WebError {
    fn from(error: StorageError) -> Self {
        Self::Storage(error)
    }
}

impl From<ValidationErrors> for WebError {
    fn from(error: ValidationErrors) -> Self {
        Self::Validation(error)
    }
}

impl From<EvaluatorError> for WebError {
    fn from(error: EvaluatorError) -> Self {
        Self::Evaluation(error)
    }
}

impl From<WeightError> for WebError {
    fn from(error: WeightError) -> Self {
        match error {
            WeightError::UnknownParameter(_) => Self::Storage(StorageError::NotFound),
            WeightError::NotSelected(_) => Self::BadRequest(error.to_string()),
        }
    }
}

impl From<TableError> for WebError {
    fn from(error: TableError) -> Self {
        Self::BadRequest(error.to_string())
    }
}

impl From<RankingError> for WebError {
    fn from(error: RankingError) -> Self {
        Self::BadRequest(error.to_string())
    }
}

impl From<TransitionError> for WebError {
    fn from(error: TransitionError) -> Self {
        Self::BadRequest(error.to_string())
    }
}

pub type WebResult<T> = Result<T, WebError>;

#[cfg(test)]
mod tests {
    use super::*;
    use storage::models::SubmissionStatus;

    #[test]
    fn test_status_codes() {
        let cases = [
            (WebError::Storage(StorageError::NotFound), StatusCode::NOT_FOUND),
            (
                WebError::Storage(StorageError::ConstraintViolation("dup".into())),
                StatusCode::CONFLICT,
            ),
            (
                WebError::Storage(StorageError::InvalidData("bad status".into())),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (
                WebError::Evaluation(EvaluatorError::UnexpectedResponse("?".into())),
                StatusCode::BAD_GATEWAY,
            ),
            (WebError::Unauthorized, StatusCode::UNAUTHORIZED),
        ];

        for (error, expected) in cases {
            assert_eq!(error.into_response().status(), expected);
        }
    }

    #[test]
    fn test_illegal_transition_is_bad_request() {
        let error: WebError = TransitionError {
            from: SubmissionStatus::Rejected,
            to: SubmissionStatus::Shortlisted,
        }
        .into();
        assert_eq!(error.into_response().status(), StatusCode::BAD_REQUEST);
    }
}
