// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// HTTP SERVER - API JSON do assistente editorial
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//!
//! Servidor HTTP fino sobre o [`EditorialAssistant`].
//!
//! ## Endpoints
//!
//! - `GET /` - Descrição do serviço
//! - `GET /health` - Health check (catálogo + sessões)
//! - `GET /books` - Lista resumida do catálogo
//! - `GET /analytics?kind=` - Relatório estatístico em JSON
//! - `POST /chat` - Mensagem para o assistente
//! - `POST /ticket` - Abertura de ticket de suporte
//!
//! ## Uso
//!
//! ```bash
//! cargo run -- --server --port=3000
//! cargo run -- --server --port=3000 --secret=minha-chave
//! ```

#[allow(missing_docs)]
pub mod types;
#[allow(missing_docs)]
pub mod handlers;
mod auth;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::CorsLayer;

use crate::assistant::EditorialAssistant;

pub use types::*;

/// Estado compartilhado entre todos os handlers
pub struct AppState {
    /// Assistente com catálogo, tickets e sessões
    pub assistant: Arc<EditorialAssistant>,
    /// Token de autenticação opcional (Bearer)
    pub secret: Option<String>,
}

/// Monta as rotas com CORS e, havendo segredo, autenticação
pub fn create_router(state: Arc<AppState>) -> Router {
    let routes = Router::new()
        .route("/", get(handlers::index))
        .route("/health", get(handlers::health))
        .route("/books", get(handlers::list_books))
        .route("/analytics", get(handlers::analytics))
        .route("/chat", post(handlers::chat))
        .route("/ticket", post(handlers::create_ticket));

    // Auth middleware condicional
    let routes = if state.secret.is_some() {
        routes.layer(middleware::from_fn_with_state(
            state.clone(),
            auth::auth_middleware,
        ))
    } else {
        routes
    };

    routes.layer(CorsLayer::permissive()).with_state(state)
}

/// Inicia o servidor HTTP no endereço especificado.
///
/// Entry point chamado de main.rs quando `--server` é passado.
/// Uma tarefa de fundo varre as sessões expiradas a cada minuto.
pub async fn start_server(addr: SocketAddr, state: Arc<AppState>) -> anyhow::Result<()> {
    let sessions = state.assistant.sessions().clone();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(std::time::Duration::from_secs(60));
        loop {
            interval.tick().await;
            let removed = sessions.cleanup_expired();
            if removed > 0 {
                log::debug!("🧹 {} sessões expiradas removidas", removed);
            }
        }
    });

    let app = create_router(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    log::info!("📚 Editorial assistant listening on http://{}", addr);
    axum::serve(listener, app).await?;
    Ok(())
}
