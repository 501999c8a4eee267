/*
 * Responsibility
 * - guard が返す判定値 (AccessDecision) と拒否理由 (AccessError)
 * - HTTP レスポンスへの変換は error::AppError 側 (ここは status code の分類のみ)
 */
use axum::http::StatusCode;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AccessError {
    #[error("{0}")]
    Forbidden(String),
    #[error("No {0} found with that ID")]
    NotFound(&'static str),
}

impl AccessError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AccessError::Forbidden(_) => StatusCode::FORBIDDEN,
            AccessError::NotFound(_) => StatusCode::NOT_FOUND,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccessDecision {
    Allow,
    Deny(AccessError),
}

impl AccessDecision {
    /// Pipeline boundary: `Deny` becomes the error the composer forwards.
    pub fn into_result(self) -> Result<(), AccessError> {
        match self {
            AccessDecision::Allow => Ok(()),
            AccessDecision::Deny(err) => Err(err),
        }
    }
}
