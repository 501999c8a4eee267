/*
 * Responsibility
 * - v1 の URL 構造を定義
 * - stage の順序: access (401) → restrict (403) → handler (所有者チェック 404/403)
 * - /health だけは認証なし
 */
use axum::{
    Router,
    routing::{get, patch},
};

use crate::api::v1::handlers::{
    bookings::{
        create_booking, delete_booking, get_booking, list_bookings, list_my_bookings,
        list_tour_bookings, update_booking,
    },
    health::health,
};
use crate::middleware::auth::{access, restrict};
use crate::policy::BOOKING_STAFF;
use crate::state::AppState;

pub fn routes(state: AppState) -> Router<AppState> {
    let protected = Router::new()
        .route(
            "/bookings",
            restrict::apply(get(list_bookings).post(create_booking), BOOKING_STAFF),
        )
        .route("/bookings/me", get(list_my_bookings))
        .route(
            "/bookings/{booking_id}",
            // any logged-in user may try; the handler decides owner-or-admin
            get(get_booking).merge(restrict::apply(
                patch(update_booking).delete(delete_booking),
                BOOKING_STAFF,
            )),
        )
        .route(
            "/tours/{tour_id}/bookings",
            restrict::apply(get(list_tour_bookings), BOOKING_STAFF),
        );

    Router::new()
        .route("/health", get(health))
        .merge(access::apply(protected, state))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use sqlx::postgres::PgPoolOptions;
    use tower::ServiceExt;

    use super::*;
    use crate::services::auth::access_jwt::tests::test_service;
    use crate::services::id_codec::IdCodec;

    fn app() -> Router {
        let db = PgPoolOptions::new()
            .connect_lazy("postgres://localhost/unused")
            .unwrap();
        let codec = IdCodec::new(10, "abcdefghijklmnopqrstuvwxyz0123456789").unwrap();
        let state = AppState::new(db, codec, Arc::new(test_service()));

        routes(state.clone()).with_state(state)
    }

    async fn status_of(method: &str, uri: &str) -> StatusCode {
        let req = Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .unwrap();
        app().oneshot(req).await.unwrap().status()
    }

    #[tokio::test]
    async fn health_is_public() {
        assert_eq!(status_of("GET", "/health").await, StatusCode::OK);
    }

    #[tokio::test]
    async fn every_booking_route_requires_authentication() {
        for (method, uri) in [
            ("GET", "/bookings"),
            ("POST", "/bookings"),
            ("GET", "/bookings/me"),
            ("GET", "/bookings/abcdefghij"),
            ("PATCH", "/bookings/abcdefghij"),
            ("DELETE", "/bookings/abcdefghij"),
            ("GET", "/tours/abcdefghij/bookings"),
        ] {
            assert_eq!(
                status_of(method, uri).await,
                StatusCode::UNAUTHORIZED,
                "{method} {uri}"
            );
        }
    }
}
