// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// SCHEMAS API - Requisições e respostas JSON
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#![allow(missing_docs)]

use serde::{Deserialize, Serialize};

use crate::session::SessionStats;
use crate::types::{Book, Intent};

// ─────────────────────────────────────────────────
// Serviço
// ─────────────────────────────────────────────────

/// Resposta de GET /
#[derive(Debug, Serialize)]
pub struct ServiceInfo {
    pub service: String,
    pub version: String,
    pub endpoints: Vec<String>,
}

/// Resposta de GET /health
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Sempre "ok"
    pub status: String,
    /// Catálogo legível
    pub assistant_ready: bool,
    pub llm_enabled: bool,
    pub sessions: SessionStats,
}

// ─────────────────────────────────────────────────
// Catálogo
// ─────────────────────────────────────────────────

/// Livro resumido (sem sinopse nem disponibilidade)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookSummary {
    pub title: String,
    pub author: String,
    pub imprint: String,
    pub release_date: String,
}

impl From<&Book> for BookSummary {
    fn from(book: &Book) -> Self {
        Self {
            title: book.title.clone(),
            author: book.author.clone(),
            imprint: book.imprint.clone(),
            release_date: book.release_date.clone(),
        }
    }
}

/// Resposta de GET /books
#[derive(Debug, Serialize, Deserialize)]
pub struct BookList {
    pub total_books: usize,
    pub books: Vec<BookSummary>,
}

/// Query de GET /analytics
#[derive(Debug, Default, Deserialize)]
pub struct AnalyticsQuery {
    /// comprehensive | publications | authors | imprints | market
    pub kind: Option<String>,
}

// ─────────────────────────────────────────────────
// Chat
// ─────────────────────────────────────────────────

/// Request para POST /chat
#[derive(Debug, Clone, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub message: String,
    /// Sessão anterior; omitida cria uma nova
    pub session_id: Option<String>,
}

/// Resposta de POST /chat
#[derive(Debug, Serialize, Deserialize)]
pub struct ChatResponse {
    pub response: String,
    pub intent: Intent,
    pub session_id: String,
}

// ─────────────────────────────────────────────────
// Tickets
// ─────────────────────────────────────────────────

/// Resposta de POST /ticket
#[derive(Debug, Serialize, Deserialize)]
pub struct TicketResponse {
    pub success: bool,
    pub ticket_id: String,
    pub message: String,
}

// ─────────────────────────────────────────────────
// Errors
// ─────────────────────────────────────────────────

/// Erro no formato padrão da API
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiError {
    pub error: ApiErrorDetail,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ApiErrorDetail {
    pub message: String,
    #[serde(rename = "type")]
    pub error_type: String,
    pub param: Option<String>,
    pub code: Option<String>,
}
