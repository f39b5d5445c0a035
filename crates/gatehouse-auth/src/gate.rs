//! Request gate middleware.
//!
//! ```ignore
//! let protected = Router::new()
//!     .route("/api/ping", get(ping))
//!     .route_layer(middleware::from_fn_with_state(gatehouse.clone(), require_auth));
//! ```

use crate::dispatch::Gatehouse;
use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::sync::Arc;

/// Axum middleware that only lets authenticated requests through.
///
/// Failures answer `401 Unauthorized` with an empty body and never reach
/// the inner handler. The reason is logged, not returned.
pub async fn require_auth(
    State(gatehouse): State<Arc<Gatehouse>>,
    request: Request,
    next: Next,
) -> Response {
    match gatehouse.authenticate_request(request.headers()).await {
        Ok(principal) => {
            tracing::debug!(
                method = principal.method(),
                path = %request.uri().path(),
                "request authenticated"
            );
            next.run(request).await
        }
        Err(err) => {
            tracing::warn!(
                kind = err.kind(),
                error = %err,
                path = %request.uri().path(),
                "request denied"
            );
            StatusCode::UNAUTHORIZED.into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::GatehouseSettings;
    use axum::{Router, body::Body, http::Request, middleware, routing::get};
    use chrono::Duration;
    use tower::ServiceExt;

    fn app() -> (Router, Arc<Gatehouse>) {
        let settings =
            GatehouseSettings::new("secret", "test.local", Duration::hours(1)).unwrap();
        let gatehouse = Arc::new(Gatehouse::new(settings).unwrap());

        let app = Router::new()
            .route("/protected", get(|| async { (StatusCode::CREATED, "inner") }))
            .route_layer(middleware::from_fn_with_state(gatehouse.clone(), require_auth));

        (app, gatehouse)
    }

    #[tokio::test]
    async fn test_missing_header_is_unauthorized() {
        let (app, _) = app();

        let response = app
            .oneshot(Request::builder().uri("/protected").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert!(body.is_empty());
    }

    #[tokio::test]
    async fn test_inner_response_passes_through() {
        let (app, gatehouse) = app();
        let session = gatehouse.issue_session("testy").unwrap();

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/protected")
                    .header("Authorization", format!("Bearer {}", session.access_token))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::CREATED);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&body[..], b"inner");
    }
}
