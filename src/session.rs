// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// SESSÕES DE CONVERSA (TTL)
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//
// Contexto conversacional em memória com expiração por inatividade.
// Mantém ordem de criação e faz varredura de sessões expiradas quando o
// número de sessões passa do limite configurado. Com o armazenamento
// cheio, a sessão mais antiga é despejada.
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

use chrono::{DateTime, Duration as ChronoDuration, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::RwLock;

use crate::types::{Intent, Language};

/// Configuração das sessões
#[derive(Debug, Clone, PartialEq)]
pub struct SessionConfig {
    /// Minutos de inatividade até a sessão expirar
    pub timeout_minutes: i64,
    /// Interações devolvidas por `recent_context` (padrão: 3)
    pub max_history: usize,
    /// Interações guardadas por sessão
    pub history_limit: usize,
    /// Quantidade de sessões que dispara a varredura de expiradas
    pub sweep_threshold: usize,
    /// Máximo de sessões guardadas; acima disso a mais antiga sai
    pub max_sessions: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            timeout_minutes: 30,
            max_history: 3,
            history_limit: 50,
            sweep_threshold: 10,
            max_sessions: 10_000,
        }
    }
}

impl SessionConfig {
    /// Configuração para testes (sessões que nunca expiram durante o teste)
    pub fn for_tests() -> Self {
        Self {
            timeout_minutes: 24 * 60,
            ..Default::default()
        }
    }
}

/// Uma troca pergunta/resposta registrada na sessão
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Interaction {
    /// Momento da interação
    pub timestamp: DateTime<Utc>,
    /// Mensagem do usuário
    pub user_input: String,
    /// Resposta do assistente
    pub response: String,
    /// Intenção detectada
    pub intent: Intent,
}

/// Estado de uma conversa
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionContext {
    /// Identificador da sessão
    pub session_id: String,
    /// Criação
    pub created_at: DateTime<Utc>,
    /// Última atividade (renova o TTL)
    pub last_activity: DateTime<Utc>,
    /// Histórico em ordem cronológica
    pub conversation_history: Vec<Interaction>,
    /// Último livro discutido
    pub current_book: Option<String>,
    /// Última cidade consultada
    pub current_city: Option<String>,
    /// Idioma usado na última resposta
    pub language: Option<Language>,
}

impl SessionContext {
    /// Cria sessão vazia
    pub fn new(session_id: String) -> Self {
        let now = Utc::now();
        Self {
            session_id,
            created_at: now,
            last_activity: now,
            conversation_history: Vec::new(),
            current_book: None,
            current_city: None,
            language: None,
        }
    }

    /// Registra uma interação e renova a atividade.
    ///
    /// Mantém no máximo `limit` interações (as mais antigas saem).
    pub fn add_interaction(&mut self, user_input: &str, response: &str, intent: Intent, limit: usize) {
        let now = Utc::now();
        self.conversation_history.push(Interaction {
            timestamp: now,
            user_input: user_input.to_string(),
            response: response.to_string(),
            intent,
        });
        if self.conversation_history.len() > limit {
            let excess = self.conversation_history.len() - limit;
            self.conversation_history.drain(..excess);
        }
        self.last_activity = now;
    }

    /// Se a sessão passou do tempo de inatividade.
    ///
    /// Um timeout fora da faixa representável nunca expira.
    pub fn is_expired(&self, timeout_minutes: i64) -> bool {
        match ChronoDuration::try_minutes(timeout_minutes) {
            Some(ttl) => Utc::now() - self.last_activity > ttl,
            None => false,
        }
    }

    /// Últimas `n` interações (ordem cronológica)
    pub fn recent_context(&self, n: usize) -> &[Interaction] {
        let start = self.conversation_history.len().saturating_sub(n);
        &self.conversation_history[start..]
    }

    /// Intenção da última interação
    pub fn last_intent(&self) -> Option<Intent> {
        self.conversation_history.last().map(|i| i.intent)
    }
}

/// Estatísticas das sessões
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionStats {
    /// Sessões ativas no momento
    pub active: usize,
    /// Sessões criadas desde o início
    pub created: u64,
    /// Sessões removidas por expiração
    pub expired: u64,
    /// Sessões despejadas por falta de espaço
    #[serde(default)]
    pub evicted: u64,
}

struct SessionStore {
    sessions: HashMap<String, SessionContext>,
    /// Ordem de criação (para varredura e despejo do mais antigo)
    order: VecDeque<String>,
}

impl SessionStore {
    fn remove(&mut self, session_id: &str) -> Option<SessionContext> {
        let removed = self.sessions.remove(session_id);
        if removed.is_some() {
            self.order.retain(|id| id != session_id);
        }
        removed
    }

    /// Despeja as sessões mais antigas até sobrar espaço para uma nova
    fn evict_oldest(&mut self, max_sessions: usize) -> Vec<String> {
        let mut evicted = Vec::new();
        while self.sessions.len() >= max_sessions.max(1) {
            let Some(oldest) = self.order.pop_front() else {
                break;
            };
            if self.sessions.remove(&oldest).is_some() {
                evicted.push(oldest);
            }
        }
        evicted
    }
}

/// Gerenciador de sessões thread-safe com TTL.
///
/// # Exemplo
///
/// ```rust,ignore
/// let manager = SessionManager::new(SessionConfig::default());
/// let mut session = manager.get_or_create(None);
/// session.current_book = Some("A Abelha".into());
/// manager.save(session);
/// ```
pub struct SessionManager {
    store: RwLock<SessionStore>,
    config: SessionConfig,
    created: AtomicU64,
    expired: AtomicU64,
    evicted: AtomicU64,
}

impl SessionManager {
    /// Cria gerenciador vazio
    pub fn new(config: SessionConfig) -> Self {
        Self {
            store: RwLock::new(SessionStore {
                sessions: HashMap::new(),
                order: VecDeque::new(),
            }),
            config,
            created: AtomicU64::new(0),
            expired: AtomicU64::new(0),
            evicted: AtomicU64::new(0),
        }
    }

    /// Configuração em uso
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Cria sessão nova (ID informado ou UUID v4)
    pub fn create(&self, session_id: Option<&str>) -> SessionContext {
        let id = session_id
            .map(|s| s.to_string())
            .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());
        let session = SessionContext::new(id.clone());

        if let Ok(mut store) = self.store.write() {
            if store.sessions.len() >= self.config.sweep_threshold {
                self.sweep_locked(&mut store);
            }
            store.remove(&id);
            let evicted = store.evict_oldest(self.config.max_sessions);
            if !evicted.is_empty() {
                self.evicted
                    .fetch_add(evicted.len() as u64, Ordering::Relaxed);
                log::warn!(
                    "🗑️ Limite de {} sessões atingido: {} despejada(s)",
                    self.config.max_sessions,
                    evicted.len()
                );
            }
            store.sessions.insert(id.clone(), session.clone());
            store.order.push_back(id.clone());
        }

        self.created.fetch_add(1, Ordering::Relaxed);
        log::debug!("🆕 Sessão criada: {}", id);
        session
    }

    /// Busca sessão ativa; sessões expiradas são removidas e retornam `None`
    pub fn get(&self, session_id: &str) -> Option<SessionContext> {
        if let Ok(store) = self.store.read() {
            match store.sessions.get(session_id) {
                Some(session) if !session.is_expired(self.config.timeout_minutes) => {
                    return Some(session.clone());
                }
                Some(_) => {}
                None => return None,
            }
        }

        // Expirada: remover
        if let Ok(mut store) = self.store.write() {
            let expired = store
                .sessions
                .get(session_id)
                .map(|s| s.is_expired(self.config.timeout_minutes))
                .unwrap_or(false);
            if expired {
                store.remove(session_id);
                self.expired.fetch_add(1, Ordering::Relaxed);
                log::debug!("⌛ Sessão expirada removida: {}", session_id);
            }
        }
        None
    }

    /// Sessão existente ou uma nova com o mesmo ID (ou ID novo se `None`)
    pub fn get_or_create(&self, session_id: Option<&str>) -> SessionContext {
        match session_id.and_then(|id| self.get(id)) {
            Some(session) => session,
            None => self.create(session_id),
        }
    }

    /// Grava o estado atualizado de uma sessão
    pub fn save(&self, session: SessionContext) {
        if let Ok(mut store) = self.store.write() {
            if !store.sessions.contains_key(&session.session_id) {
                store.order.push_back(session.session_id.clone());
            }
            store.sessions.insert(session.session_id.clone(), session);
        }
    }

    /// Remove uma sessão
    pub fn remove(&self, session_id: &str) -> Option<SessionContext> {
        self.store.write().ok().and_then(|mut s| s.remove(session_id))
    }

    /// Remove todas as sessões expiradas; retorna quantas saíram
    pub fn cleanup_expired(&self) -> usize {
        match self.store.write() {
            Ok(mut store) => self.sweep_locked(&mut store),
            Err(_) => 0,
        }
    }

    fn sweep_locked(&self, store: &mut SessionStore) -> usize {
        let timeout = self.config.timeout_minutes;
        let expired_ids: Vec<String> = store
            .order
            .iter()
            .filter(|id| {
                store
                    .sessions
                    .get(id.as_str())
                    .map(|s| s.is_expired(timeout))
                    .unwrap_or(true)
            })
            .cloned()
            .collect();

        for id in &expired_ids {
            store.remove(id);
        }

        let removed = expired_ids.len();
        if removed > 0 {
            self.expired.fetch_add(removed as u64, Ordering::Relaxed);
            log::info!("🧹 {} sessões expiradas removidas", removed);
        }
        removed
    }

    /// IDs ativos na ordem de criação
    pub fn session_ids(&self) -> Vec<String> {
        self.store
            .read()
            .map(|s| s.order.iter().cloned().collect())
            .unwrap_or_default()
    }

    /// Número de sessões guardadas (inclui expiradas ainda não varridas)
    pub fn len(&self) -> usize {
        self.store.read().map(|s| s.sessions.len()).unwrap_or(0)
    }

    /// Se não há sessões
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Estatísticas atuais
    pub fn stats(&self) -> SessionStats {
        SessionStats {
            active: self.len(),
            created: self.created.load(Ordering::Relaxed),
            expired: self.expired.load(Ordering::Relaxed),
            evicted: self.evicted.load(Ordering::Relaxed),
        }
    }

    /// Resumo formatado para logs
    pub fn summary(&self) -> String {
        let stats = self.stats();
        format!(
            "Sessions: {} active | {} created | {} expired | {} evicted | TTL: {}min",
            stats.active,
            stats.created,
            stats.expired,
            stats.evicted,
            self.config.timeout_minutes
        )
    }
}

impl std::fmt::Debug for SessionManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionManager")
            .field("sessions", &self.len())
            .field("config", &self.config)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn expired_config() -> SessionConfig {
        SessionConfig {
            timeout_minutes: -1, // Expira imediatamente
            ..Default::default()
        }
    }

    #[test]
    fn test_add_interaction_and_recent_context() {
        let mut session = SessionContext::new("s".into());
        for i in 0..5 {
            session.add_interaction(&format!("q{}", i), "r", Intent::BookDetails, 50);
        }

        let recent = session.recent_context(3);
        assert_eq!(recent.len(), 3);
        assert_eq!(recent[0].user_input, "q2");
        assert_eq!(recent[2].user_input, "q4");
        assert_eq!(session.last_intent(), Some(Intent::BookDetails));
    }

    #[test]
    fn test_history_limit_drops_oldest() {
        let mut session = SessionContext::new("s".into());
        for i in 0..5 {
            session.add_interaction(&format!("q{}", i), "r", Intent::Unknown, 2);
        }
        assert_eq!(session.conversation_history.len(), 2);
        assert_eq!(session.conversation_history[0].user_input, "q3");
    }

    #[test]
    fn test_recent_context_on_empty_session() {
        let session = SessionContext::new("s".into());
        assert!(session.recent_context(3).is_empty());
        assert_eq!(session.last_intent(), None);
    }

    #[test]
    fn test_session_expiration() {
        let session = SessionContext::new("s".into());
        assert!(!session.is_expired(30));
        assert!(session.is_expired(-1));
        assert!(!session.is_expired(i64::MAX));
    }

    #[test]
    fn test_create_and_get() {
        let manager = SessionManager::new(SessionConfig::for_tests());
        let session = manager.create(None);
        assert!(!session.session_id.is_empty());

        let fetched = manager.get(&session.session_id).unwrap();
        assert_eq!(fetched.session_id, session.session_id);
        assert!(manager.get("missing").is_none());
    }

    #[test]
    fn test_save_persists_changes() {
        let manager = SessionManager::new(SessionConfig::for_tests());
        let mut session = manager.get_or_create(Some("abc"));
        session.current_book = Some("A Abelha".into());
        session.add_interaction("oi", "olá", Intent::Unknown, 50);
        manager.save(session);

        let again = manager.get_or_create(Some("abc"));
        assert_eq!(again.current_book.as_deref(), Some("A Abelha"));
        assert_eq!(again.conversation_history.len(), 1);
        assert_eq!(manager.len(), 1);
    }

    #[test]
    fn test_expired_session_is_replaced() {
        let manager = SessionManager::new(expired_config());
        let mut session = manager.create(Some("abc"));
        session.current_book = Some("A Abelha".into());
        manager.save(session);

        assert!(manager.get("abc").is_none());
        let fresh = manager.get_or_create(Some("abc"));
        assert_eq!(fresh.current_book, None);
        assert_eq!(manager.stats().expired, 1);
    }

    #[test]
    fn test_cleanup_expired() {
        let manager = SessionManager::new(expired_config());
        for i in 0..3 {
            manager.create(Some(&format!("s{}", i)));
        }
        assert_eq!(manager.len(), 3);
        assert_eq!(manager.cleanup_expired(), 3);
        assert!(manager.is_empty());
    }

    #[test]
    fn test_sweep_triggered_by_threshold() {
        let config = SessionConfig {
            sweep_threshold: 3,
            ..expired_config()
        };
        let manager = SessionManager::new(config);
        for i in 0..3 {
            manager.create(Some(&format!("s{}", i)));
        }
        // A quarta criação encontra 3 sessões e varre as expiradas
        manager.create(Some("s3"));
        assert_eq!(manager.session_ids(), vec!["s3".to_string()]);
    }

    #[test]
    fn test_session_ids_keep_creation_order() {
        let manager = SessionManager::new(SessionConfig::for_tests());
        manager.create(Some("b"));
        manager.create(Some("a"));
        manager.create(Some("c"));
        assert_eq!(manager.session_ids(), vec!["b", "a", "c"]);
    }

    #[test]
    fn test_stats_and_summary() {
        let manager = SessionManager::new(SessionConfig::for_tests());
        manager.create(None);
        manager.create(None);
        let stats = manager.stats();
        assert_eq!(stats.active, 2);
        assert_eq!(stats.created, 2);
        assert!(manager.summary().contains("2 active"));
    }

    #[test]
    fn test_full_store_evicts_oldest() {
        let config = SessionConfig {
            max_sessions: 2,
            ..SessionConfig::for_tests()
        };
        let manager = SessionManager::new(config);
        manager.create(Some("a"));
        manager.create(Some("b"));
        manager.create(Some("c"));

        assert_eq!(manager.session_ids(), vec!["b", "c"]);
        assert!(manager.get("a").is_none());
        assert_eq!(manager.stats().evicted, 1);
    }

    #[test]
    fn test_huge_timeout_keeps_sessions() {
        let config = SessionConfig {
            timeout_minutes: i64::MAX / 60,
            ..Default::default()
        };
        let manager = SessionManager::new(config);
        manager.create(Some("abc"));
        assert!(manager.get("abc").is_some());
        assert_eq!(manager.cleanup_expired(), 0);
    }
}
