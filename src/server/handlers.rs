// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// ENDPOINT HANDLERS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use std::sync::Arc;

use super::types::*;
use super::AppState;
use crate::analytics::ReportKind;
use crate::language::detect_language;
use crate::responses;
use crate::tickets::{NewTicket, TicketError};

// ── GET / ───────────────────────────────────────

/// Descrição do serviço
pub async fn index() -> Json<ServiceInfo> {
    Json(ServiceInfo {
        service: "Editorial Assistant API".into(),
        version: crate::VERSION.into(),
        endpoints: [
            "GET /health",
            "GET /books",
            "GET /analytics?kind=",
            "POST /chat",
            "POST /ticket",
        ]
        .iter()
        .map(|e| e.to_string())
        .collect(),
    })
}

// ── GET /health ─────────────────────────────────

/// Health check com estado do catálogo e das sessões
pub async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let assistant = &state.assistant;
    Json(HealthResponse {
        status: "ok".into(),
        assistant_ready: assistant.tools().catalog().is_ok(),
        llm_enabled: assistant.has_llm(),
        sessions: assistant.sessions().stats(),
    })
}

// ── GET /books ──────────────────────────────────

/// Lista resumida do catálogo
pub async fn list_books(State(state): State<Arc<AppState>>) -> Response {
    match state.assistant.tools().catalog() {
        Ok(catalog) => {
            let books: Vec<BookSummary> = catalog.books.iter().map(BookSummary::from).collect();
            Json(BookList {
                total_books: books.len(),
                books,
            })
            .into_response()
        }
        Err(e) => {
            log::error!("[books] Falha ao ler catálogo: {}", e);
            error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Catalog is unavailable.",
                "server_error",
            )
        }
    }
}

// ── GET /analytics ──────────────────────────────

/// Relatório estatístico em JSON
pub async fn analytics(
    State(state): State<Arc<AppState>>,
    Query(query): Query<AnalyticsQuery>,
) -> Response {
    let kind = match query.kind.as_deref() {
        None | Some("") => ReportKind::default(),
        Some(label) => match ReportKind::from_label(label) {
            Some(kind) => kind,
            None => {
                return error_response(
                    StatusCode::BAD_REQUEST,
                    &format!(
                        "Unknown report kind '{}'. Use comprehensive, publications, authors, imprints or market.",
                        label
                    ),
                    "invalid_request_error",
                )
            }
        },
    };

    match state.assistant.report(kind) {
        Ok(report) => Json(report).into_response(),
        Err(e) => {
            log::error!("[analytics] Falha ao gerar relatório: {}", e);
            error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Catalog is unavailable.",
                "server_error",
            )
        }
    }
}

// ── POST /chat ──────────────────────────────────

/// Processa uma mensagem do chat.
///
/// Mensagem vazia não é erro: o assistente responde com a ajuda.
pub async fn chat(State(state): State<Arc<AppState>>, Json(body): Json<ChatRequest>) -> Response {
    let reply = state
        .assistant
        .process(&body.message, body.session_id.as_deref())
        .await;

    Json(ChatResponse {
        response: reply.response,
        intent: reply.intent,
        session_id: reply.session_id,
    })
    .into_response()
}

// ── POST /ticket ────────────────────────────────

/// Abre ticket com os dados completos do cliente
pub async fn create_ticket(
    State(state): State<Arc<AppState>>,
    Json(body): Json<NewTicket>,
) -> Response {
    let lang = detect_language(&body.message).unwrap_or(state.assistant.default_language());

    match state.assistant.create_ticket(body) {
        Ok(ticket) => Json(TicketResponse {
            success: true,
            message: responses::ticket_created(&ticket, lang),
            ticket_id: ticket.id,
        })
        .into_response(),
        Err(TicketError::Invalid(reason)) => error_response(
            StatusCode::BAD_REQUEST,
            &format!("Invalid ticket: {}", reason),
            "invalid_request_error",
        ),
        Err(e) => {
            log::error!("[ticket] Falha ao gravar ticket: {}", e);
            error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Could not save the ticket.",
                "server_error",
            )
        }
    }
}

// ── Helpers ─────────────────────────────────────

fn error_response(status: StatusCode, message: &str, error_type: &str) -> Response {
    (
        status,
        Json(ApiError {
            error: ApiErrorDetail {
                message: message.into(),
                error_type: error_type.into(),
                param: None,
                code: None,
            },
        }),
    )
        .into_response()
}
