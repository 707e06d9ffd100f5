// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// CONFIGURAÇÃO DO ASSISTENTE
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//
// Caminhos dos dados, idioma padrão, sessões, ordem das intenções e LLM.
// Todas as configurações podem ser definidas via .env
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

use std::path::PathBuf;
use std::str::FromStr;

use crate::intent::DEFAULT_PRECEDENCE;
use crate::llm::LlmConfig;
use crate::session::SessionConfig;
use crate::types::{Intent, Language};

/// Catálogo padrão (relativo ao diretório de trabalho)
pub const DEFAULT_CATALOG_PATH: &str = "data/mock_catalog.json";

/// Registro de tickets padrão
pub const DEFAULT_TICKETS_PATH: &str = "data/mock_tickets.json";

/// Teto do timeout de sessão (um ano, em minutos)
pub const MAX_SESSION_TIMEOUT_MINUTES: i64 = 365 * 24 * 60;

/// Configuração completa do assistente
#[derive(Debug, Clone, PartialEq)]
pub struct AssistantConfig {
    /// Arquivo JSON do catálogo
    pub catalog_path: PathBuf,
    /// Arquivo JSON dos tickets
    pub tickets_path: PathBuf,
    /// Idioma usado quando a mensagem não indica nenhum
    pub default_language: Language,
    /// Ordem de avaliação das regras de intenção
    pub intent_precedence: Vec<Intent>,
    /// Sessões
    pub session: SessionConfig,
    /// Fallback generativo
    pub llm: LlmConfig,
    /// Token Bearer exigido pelo servidor HTTP (opcional)
    pub server_secret: Option<String>,
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            catalog_path: PathBuf::from(DEFAULT_CATALOG_PATH),
            tickets_path: PathBuf::from(DEFAULT_TICKETS_PATH),
            default_language: Language::default(),
            intent_precedence: DEFAULT_PRECEDENCE.to_vec(),
            session: SessionConfig::default(),
            llm: LlmConfig::default(),
            server_secret: None,
        }
    }
}

/// Lê um número; valores inválidos são logados e ignorados
fn parse_number<T: FromStr>(name: &str, raw: &str) -> Option<T> {
    match raw.trim().parse::<T>() {
        Ok(value) => Some(value),
        Err(_) => {
            log::warn!("⚠️ {}='{}' inválido, usando padrão", name, raw);
            None
        }
    }
}

/// Converte `"support,analytics,store_info"` em lista de intenções.
///
/// Rótulos desconhecidos são ignorados; `None` se nenhum for válido.
pub fn parse_precedence(value: &str) -> Option<Vec<Intent>> {
    let mut order = Vec::new();
    for label in value.split(',').map(str::trim).filter(|l| !l.is_empty()) {
        match Intent::from_label(label) {
            Some(Intent::Unknown) | None => {
                log::warn!("⚠️ INTENT_PRECEDENCE: rótulo '{}' ignorado", label)
            }
            Some(intent) if !order.contains(&intent) => order.push(intent),
            Some(_) => {}
        }
    }
    (!order.is_empty()).then_some(order)
}

impl AssistantConfig {
    /// Monta a configuração a partir de uma função de consulta de variáveis.
    ///
    /// Permite testar sem alterar o ambiente do processo.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        if let Some(path) = get("CATALOG_PATH") {
            log::info!("📦 CATALOG_PATH={}", path);
            config.catalog_path = PathBuf::from(path);
        }

        if let Some(path) = get("TICKETS_PATH") {
            log::info!("📦 TICKETS_PATH={}", path);
            config.tickets_path = PathBuf::from(path);
        }

        if let Some(code) = get("DEFAULT_LANGUAGE") {
            match Language::from_code(&code) {
                Some(lang) => {
                    config.default_language = lang;
                    log::info!("📦 DEFAULT_LANGUAGE={}", lang);
                }
                None => log::warn!("⚠️ DEFAULT_LANGUAGE='{}' desconhecido, usando pt-br", code),
            }
        }

        if let Some(minutes) = get("SESSION_TIMEOUT_MINUTES")
            .and_then(|v| parse_number::<i64>("SESSION_TIMEOUT_MINUTES", &v))
            .filter(|m| *m > 0)
        {
            if minutes > MAX_SESSION_TIMEOUT_MINUTES {
                log::warn!(
                    "⚠️ SESSION_TIMEOUT_MINUTES={} acima do teto, usando {}",
                    minutes,
                    MAX_SESSION_TIMEOUT_MINUTES
                );
            }
            config.session.timeout_minutes = minutes.min(MAX_SESSION_TIMEOUT_MINUTES);
            log::info!("📦 SESSION_TIMEOUT_MINUTES={}", config.session.timeout_minutes);
        }

        if let Some(history) = get("MAX_CONVERSATION_HISTORY")
            .and_then(|v| parse_number::<usize>("MAX_CONVERSATION_HISTORY", &v))
            .filter(|h| *h > 0)
        {
            config.session.max_history = history;
            log::info!("📦 MAX_CONVERSATION_HISTORY={}", history);
        }

        if let Some(threshold) = get("SESSION_SWEEP_THRESHOLD")
            .and_then(|v| parse_number::<usize>("SESSION_SWEEP_THRESHOLD", &v))
            .filter(|t| *t > 0)
        {
            config.session.sweep_threshold = threshold;
            log::info!("📦 SESSION_SWEEP_THRESHOLD={}", threshold);
        }

        if let Some(max) = get("MAX_SESSIONS")
            .and_then(|v| parse_number::<usize>("MAX_SESSIONS", &v))
            .filter(|m| *m > 0)
        {
            config.session.max_sessions = max;
            log::info!("📦 MAX_SESSIONS={}", max);
        }

        if let Some(order) = get("INTENT_PRECEDENCE").and_then(|v| parse_precedence(&v)) {
            log::info!(
                "📦 INTENT_PRECEDENCE={}",
                order.iter().map(Intent::as_str).collect::<Vec<_>>().join(",")
            );
            config.intent_precedence = order;
        }

        if let Some(key) = get("GEMINI_API_KEY") {
            log::info!("📦 GEMINI_API_KEY=*** (fallback LLM ativo)");
            config.llm.api_key = Some(key);
        }

        if let Some(model) = get("GEMINI_MODEL") {
            log::info!("📦 GEMINI_MODEL={}", model);
            config.llm.model = model;
        }

        if let Some(temperature) = get("GEMINI_TEMPERATURE")
            .and_then(|v| parse_number::<f32>("GEMINI_TEMPERATURE", &v))
            .filter(|t| (0.0..=2.0).contains(t))
        {
            config.llm.temperature = temperature;
        }

        if let Some(tokens) = get("GEMINI_MAX_TOKENS")
            .and_then(|v| parse_number::<u32>("GEMINI_MAX_TOKENS", &v))
            .filter(|t| *t > 0)
        {
            config.llm.max_output_tokens = tokens;
        }

        if let Some(secret) = get("ASSISTANT_SECRET") {
            log::info!("📦 ASSISTANT_SECRET=*** (autenticação Bearer ativa)");
            config.server_secret = Some(secret);
        }

        config
    }
}

/// Carrega configuração a partir das variáveis de ambiente.
///
/// Variáveis suportadas:
/// - `CATALOG_PATH`, `TICKETS_PATH`: arquivos de dados
/// - `DEFAULT_LANGUAGE`: `pt-br` ou `en`
/// - `SESSION_TIMEOUT_MINUTES`, `MAX_CONVERSATION_HISTORY`, `SESSION_SWEEP_THRESHOLD`, `MAX_SESSIONS`
/// - `INTENT_PRECEDENCE`: ex. `support,analytics,store_info,book_details`
/// - `GEMINI_API_KEY`, `GEMINI_MODEL`, `GEMINI_TEMPERATURE`, `GEMINI_MAX_TOKENS`
/// - `ASSISTANT_SECRET`: token do servidor HTTP
///
/// # Exemplo
///
/// ```rust,ignore
/// // .env
/// DEFAULT_LANGUAGE=en
/// SESSION_TIMEOUT_MINUTES=10
///
/// let config = load_assistant_config();
/// assert_eq!(config.default_language, Language::English);
/// ```
pub fn load_assistant_config() -> AssistantConfig {
    AssistantConfig::from_lookup(|name| std::env::var(name).ok())
}

/// Instala panic hook que registra o panic no log antes do hook padrão.
///
/// Um handler HTTP em panic derruba só a task; o log guarda thread e local.
pub fn install_panic_hook() {
    let original_hook = std::panic::take_hook();

    std::panic::set_hook(Box::new(move |panic_info| {
        let thread = std::thread::current();
        let thread_name = thread.name().unwrap_or("unnamed");

        let location = panic_info
            .location()
            .map(|loc| format!("{}:{}:{}", loc.file(), loc.line(), loc.column()))
            .unwrap_or_else(|| "unknown location".to_string());

        let message = if let Some(s) = panic_info.payload().downcast_ref::<&str>() {
            s.to_string()
        } else if let Some(s) = panic_info.payload().downcast_ref::<String>() {
            s.clone()
        } else {
            "Unknown panic payload".to_string()
        };

        log::error!("[PANIC] Thread {} at {}: {}", thread_name, location, message);
        original_hook(panic_info);
    }));
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(vars: &[(&str, &str)]) -> AssistantConfig {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AssistantConfig::from_lookup(|name| map.get(name).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[]);
        assert_eq!(config.catalog_path, PathBuf::from("data/mock_catalog.json"));
        assert_eq!(config.tickets_path, PathBuf::from("data/mock_tickets.json"));
        assert_eq!(config.default_language, Language::Portuguese);
        assert_eq!(config.intent_precedence, DEFAULT_PRECEDENCE.to_vec());
        assert_eq!(config.session.timeout_minutes, 30);
        assert_eq!(config.session.max_history, 3);
        assert!(!config.llm.is_enabled());
        assert!(config.server_secret.is_none());
    }

    #[test]
    fn test_overrides() {
        let config = config_from(&[
            ("CATALOG_PATH", "/tmp/catalog.json"),
            ("DEFAULT_LANGUAGE", "en"),
            ("SESSION_TIMEOUT_MINUTES", "5"),
            ("MAX_CONVERSATION_HISTORY", "7"),
            ("GEMINI_API_KEY", "abc"),
            ("GEMINI_MODEL", "gemini-pro"),
            ("GEMINI_MAX_TOKENS", "256"),
            ("ASSISTANT_SECRET", "s3cret"),
        ]);
        assert_eq!(config.catalog_path, PathBuf::from("/tmp/catalog.json"));
        assert_eq!(config.default_language, Language::English);
        assert_eq!(config.session.timeout_minutes, 5);
        assert_eq!(config.session.max_history, 7);
        assert!(config.llm.is_enabled());
        assert_eq!(config.llm.model, "gemini-pro");
        assert_eq!(config.llm.max_output_tokens, 256);
        assert_eq!(config.server_secret.as_deref(), Some("s3cret"));
    }

    #[test]
    fn test_invalid_values_keep_defaults() {
        let config = config_from(&[
            ("DEFAULT_LANGUAGE", "klingon"),
            ("SESSION_TIMEOUT_MINUTES", "soon"),
            ("GEMINI_TEMPERATURE", "9.5"),
            ("GEMINI_API_KEY", "   "),
        ]);
        assert_eq!(config.default_language, Language::Portuguese);
        assert_eq!(config.session.timeout_minutes, 30);
        assert_eq!(config.llm.temperature, 0.7);
        assert!(!config.llm.is_enabled());
    }

    #[test]
    fn test_parse_precedence() {
        assert_eq!(
            parse_precedence("support, store_info,support,unknown,bogus"),
            Some(vec![Intent::Support, Intent::StoreInfo])
        );
        assert_eq!(parse_precedence("bogus"), None);
        assert_eq!(parse_precedence(""), None);
    }

    #[test]
    fn test_precedence_from_env() {
        let config = config_from(&[("INTENT_PRECEDENCE", "book_details,store_info")]);
        assert_eq!(
            config.intent_precedence,
            vec![Intent::BookDetails, Intent::StoreInfo]
        );
    }

    #[test]
    fn test_oversized_session_timeout_is_capped() {
        let config = config_from(&[
            ("SESSION_TIMEOUT_MINUTES", "200000000000000"),
            ("MAX_SESSIONS", "50"),
        ]);
        assert_eq!(config.session.timeout_minutes, MAX_SESSION_TIMEOUT_MINUTES);
        assert_eq!(config.session.max_sessions, 50);

        let session = crate::session::SessionContext::new("s".into());
        assert!(!session.is_expired(config.session.timeout_minutes));
    }
}
