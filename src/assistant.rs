// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// ASSISTENTE EDITORIAL
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//
// Pipeline de uma mensagem:
//   sessão → idioma → intenção (com contexto) → extração → ferramenta → texto
//
// `process` nunca falha: erro de acesso a dados vira texto de erro e
// qualquer outra falha vira o pedido de desculpas padrão.
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

use std::sync::Arc;

use crate::analytics::{CatalogReport, ReportKind};
use crate::catalog::{Catalog, CatalogError, CatalogSource, JsonCatalogFile, ValidationIssue};
use crate::config::AssistantConfig;
use crate::extract::{extract_city, resolve_city, resolve_title};
use crate::intent::IntentClassifier;
use crate::language::detect_language;
use crate::llm::{editorial_system_prompt, GeminiClient, LlmClient};
use crate::responses;
use crate::session::{SessionContext, SessionManager};
use crate::tickets::{JsonTicketStore, NewTicket, SupportTicket, TicketError, TicketStore};
use crate::tools::{BookLookup, EditorialService, EditorialTools, StoreAvailability};
use crate::types::{ChatReply, Intent, Language};
use crate::utils::{first_words, truncate_chars, ActionTimer};

/// Palavras da mensagem usadas como assunto de tickets abertos pelo chat
const CHAT_TICKET_SUBJECT_WORDS: usize = 8;
const CHAT_TICKET_SUBJECT_MAX_CHARS: usize = 80;

/// Falhas internas do processamento de uma mensagem
#[derive(Debug, thiserror::Error)]
pub enum AssistantError {
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error(transparent)]
    Ticket(#[from] TicketError),
}

impl AssistantError {
    /// Se a falha é de leitura/escrita dos arquivos de dados
    pub fn is_data_access(&self) -> bool {
        match self {
            Self::Catalog(_) => true,
            Self::Ticket(e) => matches!(
                e,
                TicketError::Io { .. } | TicketError::Persist { .. } | TicketError::Serialize(_)
            ),
        }
    }
}

/// Assistente editorial com dependências injetadas.
///
/// # Exemplo
///
/// ```rust,ignore
/// let assistant = EditorialAssistant::from_config(&load_assistant_config());
/// let reply = assistant.process("Tell me about A Abelha", None).await;
/// assert_eq!(reply.intent, Intent::BookDetails);
/// ```
pub struct EditorialAssistant {
    tools: EditorialTools,
    classifier: IntentClassifier,
    sessions: Arc<SessionManager>,
    llm: Option<Arc<dyn LlmClient>>,
    default_language: Language,
}

impl EditorialAssistant {
    /// Cria assistente sem fallback LLM, em português
    pub fn new(
        tools: EditorialTools,
        classifier: IntentClassifier,
        sessions: Arc<SessionManager>,
    ) -> Self {
        Self {
            tools,
            classifier,
            sessions,
            llm: None,
            default_language: Language::default(),
        }
    }

    /// Ativa o fallback generativo para mensagens não reconhecidas
    pub fn with_llm(mut self, llm: Arc<dyn LlmClient>) -> Self {
        self.llm = Some(llm);
        self
    }

    /// Idioma usado quando a mensagem não dá pistas
    pub fn with_default_language(mut self, lang: Language) -> Self {
        self.default_language = lang;
        self
    }

    /// Monta o assistente com arquivos JSON e, havendo chave, o Gemini
    pub fn from_config(config: &AssistantConfig) -> Self {
        let catalog: Arc<dyn CatalogSource> = Arc::new(JsonCatalogFile::new(&config.catalog_path));
        let tickets: Arc<dyn TicketStore> = Arc::new(JsonTicketStore::new(&config.tickets_path));

        let mut assistant = Self::new(
            EditorialTools::new(catalog, tickets),
            IntentClassifier::with_precedence(&config.intent_precedence),
            Arc::new(SessionManager::new(config.session.clone())),
        )
        .with_default_language(config.default_language);

        if config.llm.is_enabled() {
            match GeminiClient::new(config.llm.clone()) {
                Ok(client) => assistant = assistant.with_llm(Arc::new(client)),
                Err(e) => log::warn!("⚠️ Fallback LLM desativado: {}", e),
            }
        } else {
            log::info!("🧠 GEMINI_API_KEY ausente: apenas respostas por regras");
        }

        log::info!("🤖 Assistente pronto ({})", assistant.tools.describe());
        assistant
    }

    /// Ferramentas editoriais
    pub fn tools(&self) -> &EditorialTools {
        &self.tools
    }

    /// Gerenciador de sessões
    pub fn sessions(&self) -> &Arc<SessionManager> {
        &self.sessions
    }

    /// Idioma padrão
    pub fn default_language(&self) -> Language {
        self.default_language
    }

    /// Se o fallback LLM está ativo
    pub fn has_llm(&self) -> bool {
        self.llm.is_some()
    }

    /// Valida o catálogo atual
    pub fn validate_catalog(&self) -> Result<Vec<ValidationIssue>, CatalogError> {
        Ok(self.tools.catalog()?.validate())
    }

    /// Relatório estatístico do catálogo atual
    pub fn report(&self, kind: ReportKind) -> Result<CatalogReport, CatalogError> {
        Ok(CatalogReport::build(&self.tools.catalog()?, kind))
    }

    /// Abre ticket com dados completos (endpoint HTTP e comando `ticket`)
    pub fn create_ticket(&self, request: NewTicket) -> Result<SupportTicket, TicketError> {
        self.tools.create_ticket(request)
    }

    /// Processa uma mensagem e devolve a resposta.
    ///
    /// A sessão é criada se não existir (ou se expirou).
    pub async fn process(&self, message: &str, session_id: Option<&str>) -> ChatReply {
        let timer = ActionTimer::start("process_message");
        let mut session = self.sessions.get_or_create(session_id);
        let message = message.trim();

        if message.is_empty() {
            let lang = session.language.unwrap_or(self.default_language);
            let session_id = session.session_id.clone();
            self.sessions.save(session);
            timer.finish("empty");
            return ChatReply {
                response: responses::help(lang),
                intent: Intent::Unknown,
                session_id,
            };
        }

        let lang = detect_language(message)
            .or(session.language)
            .unwrap_or(self.default_language);

        let history = session.recent_context(self.sessions.config().max_history);
        let mut intent = self.classifier.classify_with_context(message, history);
        if intent == Intent::Unknown {
            intent = self.refine_unknown(message, &session);
        }
        log::info!(
            "💬 [{}] intenção={} idioma={}",
            short_id(&session.session_id),
            intent,
            lang.code()
        );

        let response = match self.dispatch(intent, message, &mut session, lang).await {
            Ok(text) => text,
            Err(e) if e.is_data_access() => {
                log::error!("❌ Erro de dados ({}): {}", intent, e);
                responses::data_error(lang)
            }
            Err(e) => {
                log::error!("❌ Erro inesperado ({}): {}", intent, e);
                responses::apology(lang)
            }
        };

        let history_limit = self.sessions.config().history_limit;
        session.add_interaction(message, &response, intent, history_limit);
        session.language = Some(lang);
        let session_id = session.session_id.clone();
        self.sessions.save(session);

        timer.finish(intent.as_str());
        ChatReply {
            response,
            intent,
            session_id,
        }
    }

    /// Segunda chance para mensagens sem palavra-chave:
    /// um título do catálogo citado sozinho vira consulta de detalhes, e
    /// só uma cidade ("E em Salvador?") com livro na sessão vira consulta de lojas.
    fn refine_unknown(&self, message: &str, session: &SessionContext) -> Intent {
        let Ok(catalog) = self.tools.catalog() else {
            return Intent::Unknown;
        };

        if catalog.find_title_in_text(message).is_some() {
            log::debug!("🎯 Título do catálogo sem palavra-chave → book_details");
            return Intent::BookDetails;
        }

        if session.current_book.is_some() && extract_city(message, Some(&catalog)).is_some() {
            log::debug!("🎯 Cidade com livro na sessão → store_info");
            return Intent::StoreInfo;
        }

        Intent::Unknown
    }

    async fn dispatch(
        &self,
        intent: Intent,
        message: &str,
        session: &mut SessionContext,
        lang: Language,
    ) -> Result<String, AssistantError> {
        match intent {
            Intent::BookDetails => self.handle_book_details(message, session, lang),
            Intent::StoreInfo => self.handle_store_info(message, session, lang),
            Intent::Support => self.handle_support(message, session, lang),
            Intent::Analytics => self.handle_analytics(message, lang),
            Intent::Unknown => Ok(self.handle_unknown(message, lang).await),
        }
    }

    fn handle_book_details(
        &self,
        message: &str,
        session: &mut SessionContext,
        lang: Language,
    ) -> Result<String, AssistantError> {
        let catalog = self.tools.catalog()?;
        let Some(title) = title_or_current(message, &catalog, session) else {
            return Ok(responses::ask_for_title(Intent::BookDetails, lang));
        };

        let result = self.tools.lookup_book(&title)?;
        if let BookLookup::Found(book) = &result {
            session.current_book = Some(book.title.clone());
        }
        Ok(responses::lookup(&result, lang))
    }

    fn handle_store_info(
        &self,
        message: &str,
        session: &mut SessionContext,
        lang: Language,
    ) -> Result<String, AssistantError> {
        let catalog = self.tools.catalog()?;
        let city = resolve_city(message, Some(&catalog), Some(session));
        let Some(title) = title_or_current(message, &catalog, session) else {
            return Ok(responses::ask_for_title(Intent::StoreInfo, lang));
        };

        let result = self.tools.find_stores(&title, city.as_deref())?;
        match &result {
            StoreAvailability::BookNotFound { .. } => {}
            StoreAvailability::AllLocations { title, .. }
            | StoreAvailability::InCity { title, .. }
            | StoreAvailability::OnlineFallback { title, .. }
            | StoreAvailability::Unavailable { title, .. } => {
                session.current_book = Some(title.clone());
            }
        }
        if city.is_some() {
            session.current_city = city;
        }
        Ok(responses::stores(&result, lang))
    }

    fn handle_support(
        &self,
        message: &str,
        session: &SessionContext,
        lang: Language,
    ) -> Result<String, AssistantError> {
        let name = match lang {
            Language::Portuguese => "Visitante",
            Language::English => "Guest",
        };
        let subject = truncate_chars(
            &first_words(message, CHAT_TICKET_SUBJECT_WORDS),
            CHAT_TICKET_SUBJECT_MAX_CHARS,
        );
        let body = match &session.current_book {
            Some(book) => format!("{} (Related to book: {})", message, book),
            None => message.to_string(),
        };

        let ticket = self
            .tools
            .create_ticket(NewTicket::new(name, "", subject, body))?;
        Ok(responses::chat_ticket_created(&ticket, lang))
    }

    fn handle_analytics(&self, message: &str, lang: Language) -> Result<String, AssistantError> {
        let kind = ReportKind::detect(message);
        log::debug!("📊 Relatório pedido: {}", kind.as_str());
        let catalog = self.tools.catalog()?;
        Ok(CatalogReport::build(&catalog, kind).render(lang))
    }

    async fn handle_unknown(&self, message: &str, lang: Language) -> String {
        let Some(llm) = &self.llm else {
            return responses::help(lang);
        };

        let catalog = self.tools.catalog().unwrap_or_else(|e| {
            log::warn!("⚠️ Catálogo indisponível para o prompt do LLM: {}", e);
            Catalog::default()
        });
        let system = editorial_system_prompt(&catalog.titles(), lang);

        match llm.complete(&system, message).await {
            Ok(text) => text,
            Err(e) => {
                log::warn!("⚠️ Fallback LLM falhou, usando ajuda padrão: {}", e);
                responses::help(lang)
            }
        }
    }
}

impl std::fmt::Debug for EditorialAssistant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EditorialAssistant")
            .field("tools", &self.tools)
            .field("precedence", &self.classifier.precedence())
            .field("llm", &self.llm.is_some())
            .field("default_language", &self.default_language)
            .finish()
    }
}

/// Título da mensagem; sem nenhum, o livro em discussão na sessão
fn title_or_current(message: &str, catalog: &Catalog, session: &SessionContext) -> Option<String> {
    resolve_title(message, catalog, Some(session)).or_else(|| {
        let current = session.current_book.clone();
        if let Some(title) = &current {
            log::debug!("🔎 Sem título na mensagem, usando '{}' da sessão", title);
        }
        current
    })
}

fn short_id(session_id: &str) -> &str {
    match session_id.char_indices().nth(8) {
        Some((idx, _)) => &session_id[..idx],
        None => session_id,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{sample_books, StaticCatalog};
    use crate::llm::{LlmError, MockLlmClient};
    use crate::session::SessionConfig;
    use crate::tickets::MemoryTicketStore;

    struct Fixture {
        assistant: EditorialAssistant,
        tickets: Arc<MemoryTicketStore>,
    }

    fn fixture() -> Fixture {
        let tickets = Arc::new(MemoryTicketStore::new());
        let tools = EditorialTools::new(
            Arc::new(StaticCatalog::new(sample_books())),
            tickets.clone(),
        );
        let assistant = EditorialAssistant::new(
            tools,
            IntentClassifier::new(),
            Arc::new(SessionManager::new(SessionConfig::for_tests())),
        );
        Fixture { assistant, tickets }
    }

    fn broken_assistant() -> EditorialAssistant {
        let tools = EditorialTools::new(
            Arc::new(JsonCatalogFile::new("/nonexistent/catalog.json")),
            Arc::new(MemoryTicketStore::new()),
        );
        EditorialAssistant::new(
            tools,
            IntentClassifier::new(),
            Arc::new(SessionManager::new(SessionConfig::for_tests())),
        )
    }

    #[tokio::test]
    async fn test_book_details_in_english() {
        let f = fixture();
        let reply = f.assistant.process("Tell me about A Abelha", None).await;
        assert_eq!(reply.intent, Intent::BookDetails);
        assert!(reply.response.contains("Cristovão Tezza"));
        assert!(reply.response.contains("Elo Editora"));
        assert!(reply.response.contains("**Synopsis:**"));
    }

    #[tokio::test]
    async fn test_book_details_in_portuguese() {
        let f = fixture();
        let reply = f.assistant.process("Me fale sobre o livro A Borboleta", None).await;
        assert_eq!(reply.intent, Intent::BookDetails);
        assert!(reply.response.contains("**Autor:** Cristovão Tezza"));
    }

    #[tokio::test]
    async fn test_unknown_title_reply_mentions_query() {
        let f = fixture();
        let reply = f.assistant.process("Tell me about \"Dom Casmurro\"", None).await;
        assert_eq!(reply.intent, Intent::BookDetails);
        assert!(reply.response.contains("Dom Casmurro"));
        assert!(reply.response.contains("not found"));
    }

    #[tokio::test]
    async fn test_store_info_online_fallback() {
        let f = fixture();
        let reply = f
            .assistant
            .process("Where can I buy A Abelha in Salvador?", None)
            .await;
        assert_eq!(reply.intent, Intent::StoreInfo);
        assert!(reply.response.contains("Amazon"));
        assert!(reply.response.contains("Loja Elo Editora"));
    }

    #[tokio::test]
    async fn test_follow_ups_use_session_context() {
        let f = fixture();
        let first = f.assistant.process("Tell me about A Baleia-azul", None).await;
        let sid = first.session_id.as_str();

        let second = f.assistant.process("Where can I buy it?", Some(sid)).await;
        assert_eq!(second.intent, Intent::StoreInfo);
        assert!(second.response.contains("A Baleia-azul"));

        let third = f.assistant.process("E no Rio de Janeiro?", Some(sid)).await;
        assert_eq!(third.intent, Intent::StoreInfo);
        assert!(third.response.contains("Livraria Travessa - Leblon"));

        let session = f.assistant.sessions().get(sid).unwrap();
        assert_eq!(session.conversation_history.len(), 3);
        assert_eq!(session.current_book.as_deref(), Some("A Baleia-azul"));
        assert_eq!(session.current_city.as_deref(), Some("Rio de Janeiro"));
    }

    #[tokio::test]
    async fn test_support_creates_ticket() {
        let f = fixture();
        let reply = f
            .assistant
            .process("Preciso de ajuda com meu pedido atrasado", None)
            .await;
        assert_eq!(reply.intent, Intent::Support);
        assert!(reply.response.contains("TCK-"));

        let tickets = f.tickets.list().unwrap();
        assert_eq!(tickets.len(), 1);
        assert_eq!(tickets[0].name, "Visitante");
        assert_eq!(tickets[0].message, "Preciso de ajuda com meu pedido atrasado");
    }

    #[tokio::test]
    async fn test_follow_ups_without_reference_reuse_session_book() {
        let f = fixture();
        let first = f
            .assistant
            .process("Where can I buy A Baleia-azul in São Paulo?", None)
            .await;
        assert_eq!(first.intent, Intent::StoreInfo);
        let sid = first.session_id.as_str();

        let second = f.assistant.process("Tell me more", Some(sid)).await;
        assert_eq!(second.intent, Intent::BookDetails);
        assert!(second.response.contains("Marina Colasanti"));

        let third = f.assistant.process("Where can I buy?", Some(sid)).await;
        assert_eq!(third.intent, Intent::StoreInfo);
        assert!(third.response.contains("A Baleia-azul"));
    }

    #[tokio::test]
    async fn test_without_session_book_still_asks_for_title() {
        let f = fixture();
        let reply = f.assistant.process("Where can I buy?", None).await;
        assert_eq!(reply.intent, Intent::StoreInfo);
        assert!(!reply.response.contains("A Baleia-azul"));
    }

    #[tokio::test]
    async fn test_support_ticket_mentions_session_book() {
        let f = fixture();
        let first = f.assistant.process("Tell me about A Abelha", None).await;
        let sid = first.session_id.as_str();

        let reply = f
            .assistant
            .process("Preciso de ajuda, meu pedido veio com defeito", Some(sid))
            .await;
        assert_eq!(reply.intent, Intent::Support);

        let tickets = f.tickets.list().unwrap();
        assert_eq!(tickets.len(), 1);
        assert_eq!(
            tickets[0].message,
            "Preciso de ajuda, meu pedido veio com defeito (Related to book: A Abelha)"
        );
    }

    #[tokio::test]
    async fn test_analytics_report() {
        let f = fixture();
        let reply = f.assistant.process("Show me author statistics", None).await;
        assert_eq!(reply.intent, Intent::Analytics);
        assert!(reply.response.contains("Gini"));
        assert!(reply.response.contains("Cristovão Tezza"));
    }

    #[tokio::test]
    async fn test_empty_message_returns_help() {
        let f = fixture();
        for input in ["", "   ", "\n\t"] {
            let reply = f.assistant.process(input, None).await;
            assert_eq!(reply.intent, Intent::Unknown);
            assert!(reply.response.contains("Assistente Editorial"));
        }
    }

    #[tokio::test]
    async fn test_bare_title_is_book_details() {
        let f = fixture();
        let reply = f.assistant.process("A Borboleta", None).await;
        assert_eq!(reply.intent, Intent::BookDetails);
        assert!(reply.response.contains("Elo Kids"));
    }

    #[tokio::test]
    async fn test_repeated_lookup_is_identical() {
        let f = fixture();
        let a = f.assistant.process("Tell me about A Abelha", None).await;
        let b = f.assistant.process("Tell me about A Abelha", None).await;
        assert_eq!(a.response, b.response);
        assert_ne!(a.session_id, b.session_id);
    }

    #[tokio::test]
    async fn test_missing_catalog_returns_data_error() {
        let assistant = broken_assistant();
        let reply = assistant.process("Tell me about A Abelha", None).await;
        assert_eq!(reply.response, responses::data_error(Language::English));
    }

    #[tokio::test]
    async fn test_unknown_without_llm_returns_help() {
        let f = fixture();
        let reply = f.assistant.process("blorp zzz", None).await;
        assert_eq!(reply.intent, Intent::Unknown);
        assert_eq!(reply.response, responses::help(Language::Portuguese));
    }

    #[tokio::test]
    async fn test_unknown_uses_llm() {
        let mut mock = MockLlmClient::new();
        mock.expect_complete()
            .withf(|system, user| system.contains("- A Abelha") && user.contains("good morning"))
            .times(1)
            .returning(|_, _| Ok("Good morning! How can I help?".into()));

        let f = fixture();
        let assistant = f.assistant.with_llm(Arc::new(mock));
        let reply = assistant.process("good morning friend", None).await;
        assert_eq!(reply.intent, Intent::Unknown);
        assert_eq!(reply.response, "Good morning! How can I help?");
    }

    #[tokio::test]
    async fn test_llm_failure_falls_back_to_help() {
        let mut mock = MockLlmClient::new();
        mock.expect_complete()
            .returning(|_, _| Err(LlmError::RateLimitError));

        let f = fixture();
        let assistant = f
            .assistant
            .with_llm(Arc::new(mock))
            .with_default_language(Language::English);
        let reply = assistant.process("blorp zzz", None).await;
        assert_eq!(reply.response, responses::help(Language::English));
    }

    #[tokio::test]
    async fn test_language_sticks_to_session() {
        let f = fixture();
        let first = f.assistant.process("Tell me about A Abelha", None).await;
        // "A Borboleta" sozinho não tem marcadores de idioma
        let second = f
            .assistant
            .process("A Borboleta", Some(&first.session_id))
            .await;
        assert!(second.response.contains("**Publisher:**"));
    }

    #[test]
    fn test_error_classification() {
        let data = AssistantError::Catalog(CatalogError::NotFound("x".into()));
        assert!(data.is_data_access());
        let invalid = AssistantError::Ticket(TicketError::Invalid("x".into()));
        assert!(!invalid.is_data_access());
        assert_eq!(short_id("1234567890abc"), "12345678");
        assert_eq!(short_id("abc"), "abc");
    }
}
