//! Role-restriction stage.
//!
//! Must run after `access`: it reads the `CurrentUser` that stage attached.
//! A missing `CurrentUser` means the stage order is wrong and is answered with 401.

use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware::{self, Next},
    response::Response,
    routing::MethodRouter,
};

use crate::api::v1::extractors::CurrentUser;
use crate::error::AppError;
use crate::policy::{Role, RoleGuard};

/// Restrict every method of `route` to `roles`. The role set is fixed here, at registration.
///
/// ```ignore
/// .route("/bookings", restrict::apply(get(list_bookings), BOOKING_STAFF))
/// ```
pub fn apply<S>(route: MethodRouter<S>, roles: impl IntoIterator<Item = Role>) -> MethodRouter<S>
where
    S: Clone + Send + Sync + 'static,
{
    let guard = RoleGuard::new(roles);
    route.route_layer(middleware::from_fn_with_state(guard, restrict_middleware))
}

async fn restrict_middleware(
    State(guard): State<RoleGuard>,
    req: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let Some(current_user) = req.extensions().get::<CurrentUser>() else {
        tracing::error!("role guard ran without a resolved user");
        return Err(AppError::Unauthorized("You are not logged in"));
    };

    if let Err(err) = guard.evaluate(current_user).into_result() {
        tracing::warn!(
            user_id = %current_user.id,
            role = %current_user.role,
            allowed = ?guard.allowed().collect::<Vec<_>>(),
            "role guard denied request"
        );
        return Err(err.into());
    }

    Ok(next.run(req).await)
}

#[cfg(test)]
mod tests {
    use axum::{Router, http::StatusCode, routing::get};
    use tower::ServiceExt;
    use uuid::Uuid;

    use super::*;
    use crate::api::v1::extractors::UserId;
    use crate::policy::BOOKING_STAFF;

    async fn dummy_handler() -> &'static str {
        "ok"
    }

    fn app() -> Router {
        Router::new().route("/", apply(get(dummy_handler), BOOKING_STAFF))
    }

    fn request_as(role: Option<Role>) -> Request<Body> {
        let mut req = Request::get("/").body(Body::empty()).unwrap();
        if let Some(role) = role {
            req.extensions_mut()
                .insert(CurrentUser::new(UserId::new(Uuid::new_v4()), role));
        }
        req
    }

    #[tokio::test]
    async fn staff_roles_pass_through() {
        for role in BOOKING_STAFF {
            let resp = app().oneshot(request_as(Some(role))).await.unwrap();
            assert_eq!(resp.status(), StatusCode::OK);
        }
    }

    #[tokio::test]
    async fn other_roles_are_forbidden_with_allowed_list() {
        for role in [Role::Guide, Role::User] {
            let resp = app().oneshot(request_as(Some(role))).await.unwrap();
            assert_eq!(resp.status(), StatusCode::FORBIDDEN);

            let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
                .await
                .unwrap();
            let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
            let message = body["error"]["message"].as_str().unwrap();
            assert!(message.contains("admin"));
            assert!(message.contains("lead-guide"));
        }
    }

    #[tokio::test]
    async fn missing_user_is_unauthorized() {
        let resp = app().oneshot(request_as(None)).await.unwrap();
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn unguarded_methods_on_other_routes_are_untouched() {
        let app = Router::new()
            .route("/open", get(dummy_handler))
            .route("/staff", apply(get(dummy_handler), [Role::Admin]));

        let req = Request::get("/open").body(Body::empty()).unwrap();
        assert_eq!(app.oneshot(req).await.unwrap().status(), StatusCode::OK);
    }
}
