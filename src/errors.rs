use crate::auth::FieldErrors;
use crate::storage::StorageError;
use axum::{http::StatusCode, Json};

#[derive(Debug)]
pub enum AppError {
    Status { status: StatusCode, message: String },
    Fields(FieldErrors),
}

impl AppError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::Status {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::Status {
            status: StatusCode::UNAUTHORIZED,
            message: message.into(),
        }
    }

    pub fn internal(err: impl std::error::Error) -> Self {
        Self::Status {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: err.to_string(),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Status { status, .. } => *status,
            AppError::Fields(_) => StatusCode::UNPROCESSABLE_ENTITY,
        }
    }
}

impl From<StorageError> for AppError {
    fn from(err: StorageError) -> Self {
        Self::internal(err)
    }
}

impl From<FieldErrors> for AppError {
    fn from(errors: FieldErrors) -> Self {
        Self::Fields(errors)
    }
}

impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let status = self.status();
        match self {
            AppError::Status { message, .. } => (status, message).into_response(),
            AppError::Fields(errors) => {
                (status, Json(serde_json::json!({ "fieldErrors": errors }))).into_response()
            }
        }
    }
}
