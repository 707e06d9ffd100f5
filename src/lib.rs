//! # Editorial Assistant - Implementação Rust
//!
//! Este crate implementa um **assistente editorial bilíngue** (português/inglês)
//! para o catálogo de uma editora: responde perguntas sobre livros, indica onde
//! comprá-los, abre tickets de suporte e calcula estatísticas do catálogo.
//!
//! ## Como uma mensagem é tratada?
//!
//! 1. Recupera (ou cria) a sessão do usuário
//! 2. Detecta o idioma pela presença de palavras-marcador
//! 3. Classifica a intenção com precedência explícita e configurável
//! 4. Extrai título e cidade (com fallback para o contexto da sessão)
//! 5. Chama a ferramenta correspondente e formata a resposta
//!
//! ## Arquitetura Principal
//!
//! ### 1. Regras (`intent`, `extract`, `language`)
//! Classificação por palavras-chave, sem chamadas externas:
//! - **BookDetails**: sinopse, autor, lançamento
//! - **StoreInfo**: onde comprar, lojas por cidade
//! - **Support**: problemas, reclamações, tickets
//! - **Analytics**: estatísticas e relatórios do catálogo
//! - **Unknown**: ajuda ou fallback generativo (Gemini)
//!
//! ### 2. Ferramentas (`tools`)
//! Interface `EditorialService` com três operações:
//! - `lookup_book`, `find_stores` e `create_ticket`
//!
//! ### 3. Persistência (`catalog`, `tickets`)
//! Catálogo em JSON somente leitura e registro de tickets em JSON com
//! escrita atômica (arquivo temporário + rename).
//!
//! ### 4. Sessões (`session`)
//! Cache com TTL, ordem de criação e varredura de expirados.
//!
//! ## Exemplo de Uso
//!
//! ```rust,ignore
//! use editorial_assistant::prelude::*;
//!
//! #[tokio::main]
//! async fn main() {
//!     let assistant = EditorialAssistant::from_config(&load_assistant_config());
//!     let reply = assistant.process("Onde comprar A Abelha em São Paulo?", None).await;
//!     println!("{}", reply.response);
//! }
//! ```

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

/// Tipos fundamentais compartilhados por todo o sistema.
///
/// Este módulo define as estruturas de dados básicas como:
/// - [`Language`]: Idiomas suportados
/// - [`Intent`]: Intenções reconhecidas
/// - [`Book`]: Registro do catálogo
/// - [`Availability`]: Lojas por localização
/// - [`ChatReply`]: Resultado de uma interação
pub mod types;

/// Catálogo de livros.
///
/// Define a trait `CatalogSource` e implementações para:
/// - Arquivo JSON (`JsonCatalogFile`)
/// - Lista em memória (`StaticCatalog`)
///
/// Também faz a busca por título (exata, parcial, sem acentos)
/// e a validação dos registros.
pub mod catalog;

/// Detecção de idioma por palavras-marcador.
pub mod language;

/// Classificação de intenções por palavras-chave.
///
/// A ordem de avaliação é explícita (`DEFAULT_PRECEDENCE`) e pode ser
/// trocada por configuração (`INTENT_PRECEDENCE`).
pub mod intent;

/// Extração de título e cidade a partir de texto livre.
pub mod extract;

/// Sessões de conversa com TTL.
///
/// Thread-safe, com limite de histórico por sessão e
/// varredura de sessões expiradas.
pub mod session;

/// Registro de tickets de suporte.
///
/// Define a trait `TicketStore` e implementações para:
/// - Arquivo JSON com escrita atômica (`JsonTicketStore`)
/// - Memória (`MemoryTicketStore`), usada em testes
pub mod tickets;

/// Ferramentas editoriais (`EditorialService`).
pub mod tools;

/// Textos de resposta localizados.
pub mod responses;

/// Estatísticas descritivas do catálogo (BI).
///
/// Fornece:
/// - Média, mediana, moda, variância
/// - Gini, entropia de Shannon, HHI, CR3
/// - Relatórios por ano, autor, selo e mercado
pub mod analytics;

/// Cliente para o modelo generativo (Gemini).
///
/// Define a trait `LlmClient`, usada apenas quando nenhuma regra
/// reconhece a mensagem e há `GEMINI_API_KEY` configurada.
pub mod llm;

/// Assistente editorial: orquestra sessão, regras e ferramentas.
pub mod assistant;

/// Modo interativo de terminal (REPL).
pub mod repl;

/// Utilitários diversos.
///
/// Funções auxiliares usadas em todo o sistema:
/// - Normalização de texto e acentos
/// - Cronometragem de ações
pub mod utils;

/// Configuração via variáveis de ambiente.
///
/// **Dados:**
/// - `CATALOG_PATH`: Arquivo do catálogo (padrão: "data/mock_catalog.json")
/// - `TICKETS_PATH`: Arquivo de tickets (padrão: "data/mock_tickets.json")
/// - `DEFAULT_LANGUAGE`: Idioma padrão ("pt" ou "en", padrão: "pt")
/// - `INTENT_PRECEDENCE`: Ordem das regras (ex.: "analytics,support,store_info,book_details")
///
/// **Sessões:**
/// - `SESSION_TIMEOUT_MINUTES`: Inatividade até expirar (padrão: 30)
/// - `MAX_CONVERSATION_HISTORY`: Interações usadas como contexto (padrão: 3)
/// - `SESSION_SWEEP_THRESHOLD`: Sessões antes de varrer expiradas (padrão: 10)
/// - `MAX_SESSIONS`: Sessões guardadas antes de despejar a mais antiga (padrão: 10000)
///
/// **LLM:**
/// - `GEMINI_API_KEY`: Ativa o fallback generativo
/// - `GEMINI_MODEL`: Modelo (padrão: "gemini-1.5-flash")
/// - `GEMINI_TEMPERATURE`: Temperatura (padrão: 0.7)
/// - `GEMINI_MAX_TOKENS`: Limite da resposta (padrão: 1000)
///
/// **Servidor:**
/// - `ASSISTANT_SECRET`: Token Bearer opcional
///
/// Também inclui o panic hook que registra panics no log.
pub mod config;

/// Servidor HTTP (axum).
///
/// Disponível com a feature `server` (ativa por padrão).
#[cfg(feature = "server")]
pub mod server;

// Re-exports principais
pub use analytics::{CatalogReport, ReportKind};
pub use assistant::{AssistantError, EditorialAssistant};
pub use catalog::{Catalog, CatalogError, CatalogSource, JsonCatalogFile, StaticCatalog};
pub use config::{install_panic_hook, load_assistant_config, AssistantConfig};
pub use intent::IntentClassifier;
pub use session::{SessionConfig, SessionManager};
pub use tickets::{JsonTicketStore, MemoryTicketStore, NewTicket, SupportTicket, TicketStore};
pub use tools::{BookLookup, EditorialService, EditorialTools, StoreAvailability};
pub use types::*;

/// Versão da biblioteca.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prelude com imports comuns para uso rápido.
///
/// Importar tudo de uma vez:
/// ```rust,ignore
/// use editorial_assistant::prelude::*;
/// ```
pub mod prelude {
    pub use crate::analytics::{CatalogReport, ReportKind};
    pub use crate::assistant::EditorialAssistant;
    pub use crate::catalog::{Catalog, CatalogSource, JsonCatalogFile, StaticCatalog};
    pub use crate::config::{load_assistant_config, AssistantConfig};
    pub use crate::intent::IntentClassifier;
    pub use crate::llm::{GeminiClient, LlmClient};
    pub use crate::session::{SessionConfig, SessionManager};
    pub use crate::tickets::{JsonTicketStore, NewTicket, TicketStore};
    pub use crate::tools::{EditorialService, EditorialTools};
    pub use crate::types::*;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
