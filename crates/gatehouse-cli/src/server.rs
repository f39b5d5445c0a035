//! HTTP surface of the gateway.
//!
//! | Route | Auth | |
//! |-------|------|-|
//! | `GET /healthz` | none | liveness |
//! | `POST /token` | Basic | issue a session token |
//! | `GET /api/ping` | any | protected probe |

use axum::{
    Json, Router,
    extract::State,
    http::{HeaderMap, StatusCode},
    middleware,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use gatehouse_auth::{Gatehouse, Principal, require_auth};
use serde_json::json;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

/// Build the gateway router around a shared gatehouse.
pub fn create_router(gatehouse: Arc<Gatehouse>) -> Router {
    let protected = Router::new()
        .route("/api/ping", get(ping))
        .route_layer(middleware::from_fn_with_state(gatehouse.clone(), require_auth));

    Router::new()
        .route("/healthz", get(healthz))
        .route("/token", post(issue_token))
        .with_state(gatehouse)
        .merge(protected)
        .layer(TraceLayer::new_for_http())
}

async fn healthz() -> Json<serde_json::Value> {
    Json(json!({ "ok": true, "service": "gatehouse" }))
}

async fn ping() -> Json<serde_json::Value> {
    Json(json!({ "pong": true }))
}

/// Exchange Basic credentials for a session token.
async fn issue_token(State(gatehouse): State<Arc<Gatehouse>>, headers: HeaderMap) -> Response {
    let username = match gatehouse.authenticate_request(&headers).await {
        Ok(Principal::User(username)) => username,
        Ok(other) => {
            tracing::warn!(method = other.method(), "token request without basic credentials");
            return StatusCode::UNAUTHORIZED.into_response();
        }
        Err(err) => {
            tracing::warn!(kind = err.kind(), error = %err, "token request denied");
            return StatusCode::UNAUTHORIZED.into_response();
        }
    };

    match gatehouse.issue_session(&username) {
        Ok(session) => {
            tracing::info!(subject = %session.id, "session issued");
            Json(session).into_response()
        }
        Err(err) => {
            tracing::error!(kind = err.kind(), error = %err, "failed to issue session");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}
