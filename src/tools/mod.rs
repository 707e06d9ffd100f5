//! # Ferramentas Editoriais
//!
//! As três operações que o assistente executa sobre os dados, atrás de
//! uma interface única ([`EditorialService`]):
//!
//! - [`lookup_book`](EditorialService::lookup_book): detalhes de um livro
//! - [`find_stores`](EditorialService::find_stores): onde comprar, com filtro de cidade
//! - [`create_ticket`](EditorialService::create_ticket): registro de suporte
//!
//! Os resultados são estruturados; a formatação fica em [`crate::responses`].
//! O catálogo e o registro de tickets chegam por injeção (`Arc<dyn ...>`).

use std::sync::Arc;

use serde::Serialize;

use crate::catalog::{Catalog, CatalogError, CatalogSource};
use crate::tickets::{NewTicket, SupportTicket, TicketError, TicketStore};
use crate::types::{Book, LocationStores};
use crate::utils::{contains_phrase, normalize_for_match};

/// Resultado de uma busca por título
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum BookLookup {
    /// Livro encontrado
    Found(Book),
    /// Nenhum título corresponde à consulta
    NotFound {
        /// Texto pesquisado
        query: String,
        /// Tamanho do catálogo consultado
        catalog_size: usize,
    },
}

/// Resultado de uma busca de lojas
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum StoreAvailability {
    /// Nenhuma cidade pedida: todas as localizações do livro
    AllLocations {
        /// Título canônico
        title: String,
        /// Localizações na ordem do catálogo
        locations: Vec<LocationStores>,
    },
    /// Há lojas físicas na cidade pedida
    InCity {
        /// Título canônico
        title: String,
        /// Cidade como aparece no catálogo
        city: String,
        /// Lojas físicas da cidade
        stores: Vec<String>,
        /// Lojas online (vazio se o livro não é vendido online)
        online: Vec<String>,
    },
    /// Sem loja física na cidade, mas o livro é vendido online
    OnlineFallback {
        /// Título canônico
        title: String,
        /// Cidade pedida
        city: String,
        /// Lojas online
        online: Vec<String>,
    },
    /// Nem loja física nem online
    Unavailable {
        /// Título canônico
        title: String,
        /// Cidade pedida, se houver
        city: Option<String>,
    },
    /// O título não existe no catálogo
    BookNotFound {
        /// Texto pesquisado
        query: String,
    },
}

/// Interface das operações editoriais
pub trait EditorialService: Send + Sync {
    /// Busca um livro pelo título (exato ou parcial)
    fn lookup_book(&self, query: &str) -> Result<BookLookup, CatalogError>;

    /// Onde comprar um livro, opcionalmente filtrando por cidade
    fn find_stores(&self, title: &str, city: Option<&str>)
        -> Result<StoreAvailability, CatalogError>;

    /// Registra um ticket de suporte
    fn create_ticket(&self, request: NewTicket) -> Result<SupportTicket, TicketError>;
}

/// Implementação sobre uma fonte de catálogo e um registro de tickets
#[derive(Clone)]
pub struct EditorialTools {
    catalog: Arc<dyn CatalogSource>,
    tickets: Arc<dyn TicketStore>,
}

impl EditorialTools {
    /// Cria as ferramentas com as dependências informadas
    pub fn new(catalog: Arc<dyn CatalogSource>, tickets: Arc<dyn TicketStore>) -> Self {
        Self { catalog, tickets }
    }

    /// Estado atual do catálogo (relido da fonte)
    pub fn catalog(&self) -> Result<Catalog, CatalogError> {
        self.catalog.load()
    }

    /// Registro de tickets
    pub fn ticket_store(&self) -> &Arc<dyn TicketStore> {
        &self.tickets
    }

    /// Descrição das fontes para logs
    pub fn describe(&self) -> String {
        format!(
            "catalog={} tickets={}",
            self.catalog.describe(),
            self.tickets.describe()
        )
    }
}

impl std::fmt::Debug for EditorialTools {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EditorialTools")
            .field("catalog", &self.catalog.describe())
            .field("tickets", &self.tickets.describe())
            .finish()
    }
}

impl EditorialService for EditorialTools {
    fn lookup_book(&self, query: &str) -> Result<BookLookup, CatalogError> {
        let catalog = self.catalog.load()?;
        let result = match catalog.find_by_title(query) {
            Some(book) => BookLookup::Found(book.clone()),
            None => BookLookup::NotFound {
                query: query.trim().to_string(),
                catalog_size: catalog.len(),
            },
        };
        log::debug!(
            "📖 lookup_book('{}') → {}",
            query,
            matches!(result, BookLookup::Found(_))
        );
        Ok(result)
    }

    fn find_stores(
        &self,
        title: &str,
        city: Option<&str>,
    ) -> Result<StoreAvailability, CatalogError> {
        let catalog = self.catalog.load()?;
        let Some(book) = catalog.find_by_title(title) else {
            return Ok(StoreAvailability::BookNotFound {
                query: title.trim().to_string(),
            });
        };
        Ok(availability_for(book, city))
    }

    fn create_ticket(&self, request: NewTicket) -> Result<SupportTicket, TicketError> {
        let ticket = self.tickets.append(request)?;
        log::debug!("🎫 create_ticket → {} ({})", ticket.id, ticket.subject);
        Ok(ticket)
    }
}

/// Filtra a disponibilidade de um livro por cidade
pub fn availability_for(book: &Book, city: Option<&str>) -> StoreAvailability {
    let title = book.title.clone();
    let online: Vec<String> = book
        .availability
        .online()
        .map(|e| e.stores.clone())
        .unwrap_or_default();

    let Some(city) = city.map(str::trim).filter(|c| !c.is_empty()) else {
        if book.availability.is_empty() {
            return StoreAvailability::Unavailable { title, city: None };
        }
        return StoreAvailability::AllLocations {
            title,
            locations: book.availability.iter().cloned().collect(),
        };
    };

    let wanted = normalize_for_match(city);
    let physical = book.availability.physical().find(|e| {
        let location = normalize_for_match(&e.location);
        location == wanted || contains_phrase(&location, &wanted)
    });

    match physical {
        Some(entry) if !entry.stores.is_empty() => StoreAvailability::InCity {
            title,
            city: entry.location.clone(),
            stores: entry.stores.clone(),
            online,
        },
        _ if !online.is_empty() => StoreAvailability::OnlineFallback {
            title,
            city: city.to_string(),
            online,
        },
        _ => StoreAvailability::Unavailable {
            title,
            city: Some(city.to_string()),
        },
    }
}
