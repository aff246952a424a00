//! HTTP transport for the function service. Requires the `http` feature.
//!
//! ## Routes
//!
//! - `POST /:function`: dispatch a function. Body = JSON input, request
//!   headers → `Session`. Answers with the envelope and the mapped status.
//! - `OPTIONS /:function`: CORS preflight.
//! - `GET /health`: `{ "ok": true, "functions": [...] }`.
//!
//! Every response carries `Access-Control-Allow-Origin: *`.
//!
//! ## Example
//!
//! ```ignore
//! let service = Arc::new(handlers::service(backend));
//!
//! // Compose with other axum routes
//! let app = functions::router(service.clone());
//!
//! // Or serve directly
//! functions::serve(service, "0.0.0.0:3000").await?;
//! ```

use std::collections::HashMap;
use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::{HeaderMap, HeaderName, Method, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use super::service::Service;
use super::session::Session;
use crate::envelope::Envelope;

/// Headers a browser caller may send.
pub const ALLOWED_HEADERS: [&str; 4] = ["authorization", "x-client-info", "apikey", "content-type"];

/// CORS policy: any origin, `POST`/`GET`/`OPTIONS`, the function headers.
pub fn cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::POST, Method::GET, Method::OPTIONS])
        .allow_headers(ALLOWED_HEADERS.map(HeaderName::from_static))
}

/// Build an axum `Router` that dispatches functions via the given service.
pub fn router<R: Send + Sync + 'static>(service: Arc<Service<R>>) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/:function", post(function_handler).options(preflight_handler))
        .with_state(service)
        .layer(cors())
        .layer(TraceLayer::new_for_http())
}

/// Serve the service over HTTP at the given address (e.g. `"0.0.0.0:3000"`).
pub async fn serve<R: Send + Sync + 'static>(
    service: Arc<Service<R>>,
    addr: &str,
) -> Result<(), std::io::Error> {
    let app = router(service);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(addr = %listener.local_addr()?, "function service listening");
    axum::serve(listener, app).await
}

async fn health_handler<R: Send + Sync + 'static>(
    State(service): State<Arc<Service<R>>>,
) -> impl IntoResponse {
    let functions: Vec<&str> = service.functions();
    Json(json!({ "ok": true, "functions": functions }))
}

/// Answers preflights that reach the router without the CORS layer
/// short-circuiting them (e.g. no `Access-Control-Request-Method`).
async fn preflight_handler() -> impl IntoResponse {
    StatusCode::OK
}

async fn function_handler<R: Send + Sync + 'static>(
    State(service): State<Arc<Service<R>>>,
    Path(function): Path<String>,
    headers: HeaderMap,
    body: Result<Json<Value>, JsonRejection>,
) -> impl IntoResponse {
    let input = match body {
        Ok(Json(input)) => input,
        Err(rejection) => {
            let envelope = Envelope::err(format!("Invalid request body: {}", rejection.body_text()));
            return (StatusCode::BAD_REQUEST, Json(envelope)).into_response();
        }
    };

    let session = session_from_headers(&headers);
    let (status, envelope) = service.dispatch_envelope(&function, input, session).await;
    let status = StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, Json(envelope)).into_response()
}

/// All headers become session variables, keyed by their lowercase name.
fn session_from_headers(headers: &HeaderMap) -> Session {
    let mut vars = HashMap::new();
    for (name, value) in headers.iter() {
        if let Ok(v) = value.to_str() {
            vars.insert(name.as_str().to_string(), v.to_string());
        }
    }
    Session::from_map(vars)
}
