//! Error responses.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use folio_core::evaluation::EvaluationError;
use folio_core::portfolio::PortfolioError;
use folio_core::transfer::TransferError;
use folio_shared::AppError;
use serde_json::json;

/// Handler error rendered as `{"error": code, "message": message}`.
#[derive(Debug)]
pub struct ApiError(pub AppError);

impl ApiError {
    /// HTTP status for this error.
    #[must_use]
    pub fn status(&self) -> StatusCode {
        StatusCode::from_u16(self.0.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status(),
            Json(json!({
                "error": self.0.error_code(),
                "message": self.0.message(),
            })),
        )
            .into_response()
    }
}

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        Self(err)
    }
}

impl From<TransferError> for ApiError {
    fn from(err: TransferError) -> Self {
        let message = err.to_string();
        Self(match err {
            TransferError::MissingKey | TransferError::InvalidKey | TransferError::MissingBody => {
                AppError::Validation(message)
            }
            TransferError::NotFound { .. } => AppError::NotFound(message),
            TransferError::MissingBinding | TransferError::Configuration(_) => {
                AppError::Configuration(message)
            }
            TransferError::Transport(_) => AppError::ExternalService(message),
        })
    }
}

impl From<PortfolioError> for ApiError {
    fn from(err: PortfolioError) -> Self {
        let message = err.to_string();
        match err {
            PortfolioError::UserNotFound(_)
            | PortfolioError::FolderNotFound(_)
            | PortfolioError::FileNotFound(_) => Self(AppError::NotFound(message)),
            PortfolioError::Validation(_) | PortfolioError::FileTooLarge { .. } => {
                Self(AppError::Validation(message))
            }
            PortfolioError::Transfer(e) => e.into(),
            PortfolioError::Storage(_) => Self(AppError::ExternalService(message)),
            PortfolioError::Repository(_) => Self(AppError::Database(message)),
        }
    }
}

impl From<EvaluationError> for ApiError {
    fn from(err: EvaluationError) -> Self {
        let message = err.to_string();
        match err {
            EvaluationError::FolderNotFound(_) => Self(AppError::NotFound(message)),
            EvaluationError::Validation(_) | EvaluationError::ScoreOutOfRange(_) => {
                Self(AppError::Validation(message))
            }
            EvaluationError::Transfer(e) => e.into(),
            EvaluationError::Repository(_) => Self(AppError::Database(message)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;
    use rstest::rstest;
    use uuid::Uuid;

    #[rstest]
    #[case(TransferError::MissingKey, StatusCode::BAD_REQUEST)]
    #[case(TransferError::InvalidKey, StatusCode::BAD_REQUEST)]
    #[case(TransferError::MissingBody, StatusCode::BAD_REQUEST)]
    #[case(TransferError::MissingBinding, StatusCode::INTERNAL_SERVER_ERROR)]
    #[case(TransferError::NotFound { key: "k".into() }, StatusCode::NOT_FOUND)]
    #[case(TransferError::transport("boom"), StatusCode::INTERNAL_SERVER_ERROR)]
    fn test_transfer_error_status(#[case] err: TransferError, #[case] status: StatusCode) {
        assert_eq!(ApiError::from(err).status(), status);
    }

    #[test]
    fn test_portfolio_errors() {
        let err = ApiError::from(PortfolioError::FileNotFound(Uuid::nil()));
        assert_eq!(err.status(), StatusCode::NOT_FOUND);

        let err = ApiError::from(PortfolioError::FileTooLarge { size: 2, max: 1 });
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);

        let err = ApiError::from(PortfolioError::Transfer(TransferError::transport("sig")));
        assert_eq!(err.0.error_code(), "EXTERNAL_SERVICE_ERROR");
    }

    #[tokio::test]
    async fn test_body_carries_raw_message() {
        let response = ApiError::from(TransferError::transport("InvalidAccessKeyId")).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = response.into_body().collect().await.unwrap().to_bytes();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["error"], "EXTERNAL_SERVICE_ERROR");
        assert_eq!(json["message"], "InvalidAccessKeyId");
    }
}
