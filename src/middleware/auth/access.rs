//! access token（JWT）検証 → CurrentUser を extensions に入れる
//!
//! - token は `Authorization: Bearer <jwt>` か `jwt` cookie から取り出す
//! - role は token ではなく DB の現在値を使う (降格が即時に効く)
//! - パスワード変更より前に発行された token は拒否する
//! - どこで失敗しても 401。DB 障害だけは 500 としてそのまま上に流す

use axum::{
    Router,
    body::Body,
    extract::State,
    http::{HeaderMap, Request, header},
    middleware::{self, Next},
    response::Response,
};

use crate::api::v1::extractors::{CurrentUser, UserId};
use crate::error::AppError;
use crate::repos::user_repo;
use crate::state::AppState;

const TOKEN_COOKIE: &str = "jwt";

/// 認証が必要なルートに middleware を適用する。
///
/// 例：
/// ```ignore
/// let protected = middleware::auth::access::apply(protected, state.clone());
/// ```
pub fn apply(router: Router<AppState>, state: AppState) -> Router<AppState> {
    router.layer(middleware::from_fn_with_state(state, access_middleware))
}

async fn access_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let token = bearer_token(req.headers())
        .or_else(|| cookie_token(req.headers()))
        .ok_or(AppError::Unauthorized(
            "You are not logged in. Please log in to get access",
        ))?;

    let verified = match state.auth.verify(token) {
        Ok(verified) => verified,
        Err(err) => {
            tracing::warn!(error = %err, "access token verification failed");
            return Err(AppError::Unauthorized("Invalid or expired token"));
        }
    };

    let Some(user) = user_repo::find_active(&state.db, verified.user_id.as_uuid()).await? else {
        tracing::warn!(user_id = %verified.user_id, "token subject no longer exists");
        return Err(AppError::Unauthorized(
            "The user belonging to this token no longer exists",
        ));
    };

    if user.changed_password_after(verified.issued_at) {
        tracing::warn!(user_id = %verified.user_id, "token issued before password change");
        return Err(AppError::Unauthorized(
            "User recently changed password. Please log in again",
        ));
    }

    let current_user = CurrentUser::new(UserId::from(user.id), user.role);
    tracing::debug!(
        user_id = %current_user.id,
        role = %current_user.role,
        jti = verified.jti.as_deref().unwrap_or("-"),
        "request authenticated"
    );

    // middleware → extractor への受け渡し
    req.extensions_mut().insert(current_user);

    Ok(next.run(req).await)
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

fn cookie_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == TOKEN_COOKIE)
        .map(|(_, value)| value.trim())
        .filter(|t| !t.is_empty() && *t != "loggedout")
}

#[cfg(test)]
mod tests {
    use axum::{http::StatusCode, routing::get};
    use sqlx::postgres::PgPoolOptions;
    use tower::ServiceExt;

    use super::*;
    use crate::services::auth::access_jwt::tests::test_service;
    use crate::services::id_codec::IdCodec;

    fn headers(name: header::HeaderName, value: &str) -> HeaderMap {
        let mut map = HeaderMap::new();
        map.insert(name, value.parse().unwrap());
        map
    }

    fn test_app() -> Router {
        // Lazy pool: requests rejected before the user lookup never touch the DB.
        let db = PgPoolOptions::new()
            .connect_lazy("postgres://localhost/unused")
            .unwrap();
        let codec = IdCodec::new(10, "abcdefghijklmnopqrstuvwxyz0123456789").unwrap();
        let state = AppState::new(db, codec, std::sync::Arc::new(test_service()));

        let router = Router::new().route("/", get(|| async { "ok" }));
        apply(router, state.clone()).with_state(state)
    }

    #[test]
    fn reads_bearer_token() {
        let map = headers(header::AUTHORIZATION, "Bearer abc.def.ghi");
        assert_eq!(bearer_token(&map), Some("abc.def.ghi"));

        let map = headers(header::AUTHORIZATION, "Basic dXNlcjpwYXNz");
        assert_eq!(bearer_token(&map), None);
    }

    #[test]
    fn reads_jwt_cookie_among_others() {
        let map = headers(header::COOKIE, "theme=dark; jwt=abc.def.ghi; lang=en");
        assert_eq!(cookie_token(&map), Some("abc.def.ghi"));
    }

    #[test]
    fn logged_out_cookie_is_no_token() {
        let map = headers(header::COOKIE, "jwt=loggedout");
        assert_eq!(cookie_token(&map), None);
    }

    #[tokio::test]
    async fn request_without_credentials_is_unauthorized() {
        let req = Request::get("/").body(Body::empty()).unwrap();
        let resp = test_app().oneshot(req).await.unwrap();

        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn request_with_invalid_token_is_unauthorized() {
        let req = Request::get("/")
            .header(header::AUTHORIZATION, "Bearer not.a.jwt")
            .body(Body::empty())
            .unwrap();
        let resp = test_app().oneshot(req).await.unwrap();

        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["error"]["statusCode"], 401);
        assert_eq!(body["error"]["message"], "Invalid or expired token");
    }
}
