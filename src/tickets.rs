// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// TICKETS DE SUPORTE
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//
// Registro append-only de tickets. O backend JSON relê o arquivo inteiro,
// acrescenta o ticket e grava tudo de novo via arquivo temporário + rename,
// com um lock no processo serializando os escritores.
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

use serde::{Deserialize, Serialize};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Prefixo padrão dos IDs de ticket
pub const DEFAULT_TICKET_PREFIX: &str = "TCK";

/// Status de todo ticket recém-criado
pub const DEFAULT_TICKET_STATUS: &str = "open";

/// Erros do registro de tickets
#[derive(Debug, thiserror::Error)]
pub enum TicketError {
    #[error("failed to access tickets file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to serialize tickets: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("failed to replace tickets file {path}: {source}")]
    Persist {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("ticket store lock poisoned")]
    LockPoisoned,

    #[error("invalid ticket: {0}")]
    Invalid(String),
}

/// Dados informados pelo usuário para abrir um ticket
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewTicket {
    /// Nome do cliente
    pub name: String,
    /// E-mail de contato (pode ficar vazio em tickets abertos pelo chat)
    #[serde(default)]
    pub email: String,
    /// Assunto
    pub subject: String,
    /// Descrição do problema
    pub message: String,
}

impl NewTicket {
    /// Cria pedido de ticket
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        subject: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            subject: subject.into(),
            message: message.into(),
        }
    }

    /// Verifica campos obrigatórios e formato do e-mail
    pub fn validate(&self) -> Result<(), TicketError> {
        let required = [
            ("name", &self.name),
            ("subject", &self.subject),
            ("message", &self.message),
        ];
        for (field, value) in required {
            if value.trim().is_empty() {
                return Err(TicketError::Invalid(format!("'{}' must not be empty", field)));
            }
        }

        let email = self.email.trim();
        if !email.is_empty() && !email.contains('@') {
            return Err(TicketError::Invalid(format!("'{}' is not an e-mail address", email)));
        }
        Ok(())
    }
}

/// Ticket gravado no registro
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SupportTicket {
    /// Identificador gerado
    pub id: String,
    /// Nome do cliente
    pub name: String,
    /// E-mail de contato
    pub email: String,
    /// Assunto
    pub subject: String,
    /// Descrição do problema
    pub message: String,
    /// Momento da criação (RFC 3339, horário local)
    pub timestamp: String,
    /// Situação do ticket
    pub status: String,
}

impl SupportTicket {
    /// Materializa um pedido com ID e timestamp novos
    pub fn open(request: NewTicket, prefix: &str) -> Self {
        Self {
            id: generate_ticket_id(prefix),
            name: request.name.trim().to_string(),
            email: request.email.trim().to_string(),
            subject: request.subject.trim().to_string(),
            message: request.message.trim().to_string(),
            timestamp: chrono::Local::now().to_rfc3339(),
            status: DEFAULT_TICKET_STATUS.to_string(),
        }
    }
}

/// Gera ID no formato `PREFIX-YYYYMMDDHHMMSS-XXXX`.
///
/// O sufixo aleatório evita colisão entre tickets abertos no mesmo segundo.
pub fn generate_ticket_id(prefix: &str) -> String {
    let suffix: String = uuid::Uuid::new_v4()
        .simple()
        .to_string()
        .chars()
        .take(4)
        .collect();
    format!(
        "{}-{}-{}",
        prefix,
        chrono::Local::now().format("%Y%m%d%H%M%S"),
        suffix.to_uppercase()
    )
}

/// Destino dos tickets de suporte
pub trait TicketStore: Send + Sync {
    /// Valida, grava e devolve o ticket criado
    fn append(&self, request: NewTicket) -> Result<SupportTicket, TicketError>;

    /// Todos os tickets registrados, em ordem de criação
    fn list(&self) -> Result<Vec<SupportTicket>, TicketError>;

    /// Descrição para logs
    fn describe(&self) -> String;
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// BACKEND: Arquivo JSON
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Registro em arquivo JSON (array de tickets)
pub struct JsonTicketStore {
    path: PathBuf,
    prefix: String,
    write_lock: Mutex<()>,
}

impl JsonTicketStore {
    /// Cria registro com o prefixo padrão
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self::with_prefix(path, DEFAULT_TICKET_PREFIX)
    }

    /// Cria registro com prefixo de ID customizado
    pub fn with_prefix(path: impl Into<PathBuf>, prefix: &str) -> Self {
        Self {
            path: path.into(),
            prefix: prefix.to_string(),
            write_lock: Mutex::new(()),
        }
    }

    /// Caminho do arquivo
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Lê o arquivo; ausente ou corrompido vira lista vazia
    fn read_all(&self) -> Result<Vec<SupportTicket>, TicketError> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(source) => {
                return Err(TicketError::Io {
                    path: self.path.clone(),
                    source,
                })
            }
        };

        if content.trim().is_empty() {
            return Ok(Vec::new());
        }

        match serde_json::from_str(&content) {
            Ok(tickets) => Ok(tickets),
            Err(e) => {
                log::warn!(
                    "⚠ Arquivo de tickets {:?} inválido ({}), recomeçando com lista vazia",
                    self.path,
                    e
                );
                Ok(Vec::new())
            }
        }
    }

    /// Grava a lista inteira em um temporário no mesmo diretório e renomeia
    fn write_all(&self, tickets: &[SupportTicket]) -> Result<(), TicketError> {
        let dir = self
            .path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));

        let io_err = |source| TicketError::Io {
            path: self.path.clone(),
            source,
        };

        std::fs::create_dir_all(dir).map_err(io_err)?;
        let mut tmp = tempfile::NamedTempFile::new_in(dir).map_err(io_err)?;
        serde_json::to_writer_pretty(&mut tmp, tickets)?;
        tmp.write_all(b"\n").map_err(io_err)?;
        tmp.as_file().sync_all().map_err(io_err)?;

        tmp.persist(&self.path)
            .map_err(|e| TicketError::Persist {
                path: self.path.clone(),
                source: e.error,
            })?;
        Ok(())
    }
}

impl TicketStore for JsonTicketStore {
    fn append(&self, request: NewTicket) -> Result<SupportTicket, TicketError> {
        request.validate()?;
        let _guard = self.write_lock.lock().map_err(|_| TicketError::LockPoisoned)?;

        let mut tickets = self.read_all()?;
        let ticket = SupportTicket::open(request, &self.prefix);
        tickets.push(ticket.clone());
        self.write_all(&tickets)?;

        log::info!(
            "🎫 Ticket {} registrado ({} no total)",
            ticket.id,
            tickets.len()
        );
        Ok(ticket)
    }

    fn list(&self) -> Result<Vec<SupportTicket>, TicketError> {
        let _guard = self.write_lock.lock().map_err(|_| TicketError::LockPoisoned)?;
        self.read_all()
    }

    fn describe(&self) -> String {
        format!("json:{}", self.path.display())
    }
}

impl std::fmt::Debug for JsonTicketStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JsonTicketStore")
            .field("path", &self.path)
            .field("prefix", &self.prefix)
            .finish()
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// BACKEND: Memória (testes)
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Registro em memória, descartado ao fim do processo
#[derive(Debug, Default)]
pub struct MemoryTicketStore {
    tickets: Mutex<Vec<SupportTicket>>,
}

impl MemoryTicketStore {
    /// Cria registro vazio
    pub fn new() -> Self {
        Self::default()
    }
}

impl TicketStore for MemoryTicketStore {
    fn append(&self, request: NewTicket) -> Result<SupportTicket, TicketError> {
        request.validate()?;
        let ticket = SupportTicket::open(request, DEFAULT_TICKET_PREFIX);
        self.tickets
            .lock()
            .map_err(|_| TicketError::LockPoisoned)?
            .push(ticket.clone());
        Ok(ticket)
    }

    fn list(&self) -> Result<Vec<SupportTicket>, TicketError> {
        Ok(self
            .tickets
            .lock()
            .map_err(|_| TicketError::LockPoisoned)?
            .clone())
    }

    fn describe(&self) -> String {
        "memory".into()
    }
}
