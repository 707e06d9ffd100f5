// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// AUTENTICAÇÃO - Bearer Token Middleware
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

use axum::{
    body::Body,
    extract::State,
    http::{Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Json, Response},
};
use std::sync::Arc;

use super::types::{ApiError, ApiErrorDetail};
use super::AppState;

/// Rotas que dispensam token
const PUBLIC_PATHS: &[&str] = &["/", "/health"];

/// Middleware de autenticação Bearer token.
///
/// Ativado apenas quando `ASSISTANT_SECRET` ou `--secret=TOKEN` é informado.
pub async fn auth_middleware(
    State(state): State<Arc<AppState>>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let secret = match &state.secret {
        Some(s) => s,
        None => return next.run(request).await,
    };

    if PUBLIC_PATHS.contains(&request.uri().path()) {
        return next.run(request).await;
    }

    let token = request
        .headers()
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|header| header.strip_prefix("Bearer "));

    match token {
        Some(token) if token == secret => next.run(request).await,
        _ => {
            log::warn!("🔒 Requisição sem token válido: {}", request.uri().path());
            unauthorized_response()
        }
    }
}

fn unauthorized_response() -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(ApiError {
            error: ApiErrorDetail {
                message: "Unauthorized. Please provide a valid Bearer token.".into(),
                error_type: "invalid_request_error".into(),
                param: None,
                code: Some("unauthorized".into()),
            },
        }),
    )
        .into_response()
}
