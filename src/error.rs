/*
 * Responsibility
 * - アプリ共通の AppError 定義 (集中エラーレスポンス)
 * - IntoResponse 実装 (HTTP status / JSON error body)
 * - AccessError / RepoError / IdCodecError を統一的に変換
 * - 内部エラーの詳細はレスポンスに出さない (ログのみ)
 */
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::policy::AccessError;
use crate::repos::error::RepoError;
use crate::services::id_codec::IdCodecError;

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: ErrorBody,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorBody {
    pub status_code: u16,
    pub code: &'static str,
    pub message: String,
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{code}: {message}")]
    BadRequest { code: &'static str, message: String },
    #[error("{0}")]
    Unauthorized(&'static str),
    #[error(transparent)]
    Access(#[from] AccessError),
    #[error("internal server error")]
    Internal,
}

impl AppError {
    pub fn bad_request(code: &'static str, message: impl Into<String>) -> Self {
        Self::BadRequest {
            code,
            message: message.into(),
        }
    }

    pub fn not_found(resource: &'static str) -> Self {
        Self::Access(AccessError::NotFound(resource))
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Access(err) => err.status_code(),
            AppError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let (code, message) = match self {
            AppError::BadRequest { code, message } => (code, message),
            AppError::Unauthorized(message) => ("UNAUTHORIZED", message.to_string()),
            AppError::Access(err @ AccessError::Forbidden(_)) => ("FORBIDDEN", err.to_string()),
            AppError::Access(err @ AccessError::NotFound(_)) => ("NOT_FOUND", err.to_string()),
            AppError::Internal => ("INTERNAL_SERVER_ERROR", "internal server error".into()),
        };

        let body = ErrorResponse {
            error: ErrorBody {
                status_code: status.as_u16(),
                code,
                message,
            },
        };

        (status, Json(body)).into_response()
    }
}

impl From<RepoError> for AppError {
    fn from(e: RepoError) -> Self {
        match e {
            RepoError::Db(err) => {
                tracing::error!(error = ?err, "database error");
                AppError::Internal
            }
            RepoError::MissingReference => {
                AppError::bad_request("UNKNOWN_REFERENCE", "tour or user does not exist")
            }
            RepoError::Corrupt(what) => {
                tracing::error!(column = what, "unexpected value in database row");
                AppError::Internal
            }
        }
    }
}

impl From<IdCodecError> for AppError {
    fn from(e: IdCodecError) -> Self {
        match e {
            // Client supplied a malformed public id (e.g. /bookings/{id})
            IdCodecError::DecodeInvalidFormat | IdCodecError::DecodeOutOfRange => {
                AppError::bad_request("INVALID_PUBLIC_ID", "invalid id")
            }

            // These indicate server-side config / programming errors
            other => {
                tracing::error!(error = %other, "id codec failure");
                AppError::Internal
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn body_json(err: AppError) -> (StatusCode, serde_json::Value) {
        let res = err.into_response();
        let status = res.status();
        let bytes = axum::body::to_bytes(res.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn forbidden_body_has_status_code_and_message() {
        let err = AppError::from(AccessError::Forbidden("Allowed roles: admin".into()));
        let (status, body) = body_json(err).await;

        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body["error"]["statusCode"], 403);
        assert_eq!(body["error"]["code"], "FORBIDDEN");
        assert_eq!(body["error"]["message"], "Allowed roles: admin");
    }

    #[tokio::test]
    async fn not_found_body() {
        let (status, body) = body_json(AppError::not_found("booking")).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"]["statusCode"], 404);
        assert_eq!(body["error"]["message"], "No booking found with that ID");
    }

    #[tokio::test]
    async fn internal_error_hides_details() {
        let err = AppError::from(RepoError::Corrupt("role"));
        let (status, body) = body_json(err).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"]["message"], "internal server error");
    }

    #[test]
    fn malformed_public_id_is_bad_request() {
        let err = AppError::from(IdCodecError::DecodeInvalidFormat);
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
    }
}
