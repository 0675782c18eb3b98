use crate::server::app::AppState;
use crate::utils::error::PortalError;
use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::{IntoResponse, Response},
};

/// Rejects requests whose `Authorization` header is not exactly the shared
/// secret. No `Bearer` prefix handling, comparison is case-sensitive.
pub async fn require_api_key(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let provided = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok());

    if is_authorized(provided, &state.shared_secret) {
        next.run(request).await
    } else {
        tracing::warn!(
            "🔒 Rejected {} {} (header {})",
            request.method(),
            request.uri().path(),
            if provided.is_some() { "mismatch" } else { "missing" }
        );
        PortalError::Unauthorized.into_response()
    }
}

pub fn is_authorized(provided: Option<&str>, secret: &str) -> bool {
    match provided {
        Some(value) => constant_time_eq(value.as_bytes(), secret.as_bytes()),
        None => false,
    }
}

// 比較時間不取決於第一個不同位元組的位置
fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}
