use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use crate::error::AppError;

use super::CurrentUser;

/// Handler で CurrentUser を受け取るための extractor
/// access middleware が CurrentUser を request.extensions() に insert 済みである前提
/// 見つからない場合は 401 を返す（ミドルウェア未設定 = 認証されていない）
pub struct CurrentUserExtractor(pub CurrentUser);

impl<S> FromRequestParts<S> for CurrentUserExtractor
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<CurrentUser>()
            .cloned()
            .map(CurrentUserExtractor)
            .ok_or(AppError::Unauthorized("You are not logged in"))
    }
}
