// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// TIPOS COMPARTILHADOS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

use chrono::{Datelike, NaiveDate};
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Nome da localização que representa a venda pela internet.
pub const ONLINE_LOCATION: &str = "Online";

/// Formato das datas de lançamento no catálogo (DD/MM/YYYY).
pub const RELEASE_DATE_FORMAT: &str = "%d/%m/%Y";

// ─────────────────────────────────────────────────
// Idioma
// ─────────────────────────────────────────────────

/// Idiomas suportados nas respostas
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Language {
    /// Português do Brasil (padrão)
    #[default]
    Portuguese,
    /// Inglês
    English,
}

impl Language {
    /// Converte código de idioma ("pt-br", "pt", "en", "en-us") para `Language`.
    ///
    /// Valores desconhecidos retornam `None`.
    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim().to_lowercase().as_str() {
            "pt" | "pt-br" | "pt_br" | "portuguese" | "português" => Some(Self::Portuguese),
            "en" | "en-us" | "en_us" | "en-gb" | "english" | "inglês" => Some(Self::English),
            _ => None,
        }
    }

    /// Código curto usado em configuração e logs
    pub fn code(&self) -> &'static str {
        match self {
            Self::Portuguese => "pt-br",
            Self::English => "en",
        }
    }

    /// Nome legível para logs
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Portuguese => "Português",
            Self::English => "English",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

// ─────────────────────────────────────────────────
// Intenção
// ─────────────────────────────────────────────────

/// Intenção detectada em uma mensagem do usuário
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    /// Detalhes de um livro (autor, editora, sinopse)
    BookDetails,
    /// Onde comprar um livro
    StoreInfo,
    /// Pedido de suporte / abertura de ticket
    Support,
    /// Relatório estatístico do catálogo
    Analytics,
    /// Nenhuma regra reconheceu a mensagem
    Unknown,
}

impl Intent {
    /// Todas as intenções reconhecíveis por regra (exclui `Unknown`)
    pub const RECOGNIZED: [Intent; 4] = [
        Intent::BookDetails,
        Intent::StoreInfo,
        Intent::Support,
        Intent::Analytics,
    ];

    /// Rótulo estável usado na API e nos logs
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::BookDetails => "book_details",
            Self::StoreInfo => "store_info",
            Self::Support => "support",
            Self::Analytics => "analytics",
            Self::Unknown => "unknown",
        }
    }

    /// Converte rótulo ("book_details", "store", "analysis"...) para `Intent`.
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim().to_lowercase().as_str() {
            "book_details" | "book" | "details" => Some(Self::BookDetails),
            "store_info" | "store" | "stores" => Some(Self::StoreInfo),
            "support" | "ticket" => Some(Self::Support),
            "analytics" | "analysis" | "statistics" => Some(Self::Analytics),
            "unknown" => Some(Self::Unknown),
            _ => None,
        }
    }
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ─────────────────────────────────────────────────
// Disponibilidade
// ─────────────────────────────────────────────────

/// Lojas de uma localização ("Online" ou nome de cidade)
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LocationStores {
    /// Nome da localização, como aparece no catálogo
    pub location: String,
    /// Lojas que vendem o livro nessa localização
    pub stores: Vec<String>,
}

impl LocationStores {
    /// Se a localização é a loja virtual
    pub fn is_online(&self) -> bool {
        self.location.eq_ignore_ascii_case(ONLINE_LOCATION)
    }
}

/// Mapa localização → lojas, preservando a ordem do arquivo.
///
/// Serializa e desserializa como objeto JSON (`{"São Paulo": [...], "Online": [...]}`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Availability {
    entries: Vec<LocationStores>,
}

impl Availability {
    /// Cria mapa vazio
    pub fn new() -> Self {
        Self::default()
    }

    /// Adiciona (ou substitui) as lojas de uma localização
    pub fn insert(&mut self, location: impl Into<String>, stores: Vec<String>) {
        let location = location.into();
        match self.entries.iter_mut().find(|e| e.location == location) {
            Some(existing) => existing.stores = stores,
            None => self.entries.push(LocationStores { location, stores }),
        }
    }

    /// Builder encadeável usado em testes e fixtures
    pub fn with(mut self, location: &str, stores: &[&str]) -> Self {
        self.insert(location, stores.iter().map(|s| s.to_string()).collect());
        self
    }

    /// Itera sobre todas as localizações na ordem original
    pub fn iter(&self) -> impl Iterator<Item = &LocationStores> {
        self.entries.iter()
    }

    /// Localizações físicas (tudo exceto "Online")
    pub fn physical(&self) -> impl Iterator<Item = &LocationStores> {
        self.entries.iter().filter(|e| !e.is_online())
    }

    /// Entrada "Online", se existir
    pub fn online(&self) -> Option<&LocationStores> {
        self.entries.iter().find(|e| e.is_online())
    }

    /// Busca localização pelo nome exato (case-insensitive)
    pub fn get(&self, location: &str) -> Option<&LocationStores> {
        self.entries
            .iter()
            .find(|e| e.location.to_lowercase() == location.to_lowercase())
    }

    /// Número de localizações
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Se não há nenhuma localização
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Total de lojas somando todas as localizações
    pub fn total_stores(&self) -> usize {
        self.entries.iter().map(|e| e.stores.len()).sum()
    }
}

impl Serialize for Availability {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for entry in &self.entries {
            map.serialize_entry(&entry.location, &entry.stores)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Availability {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct AvailabilityVisitor;

        impl<'de> Visitor<'de> for AvailabilityVisitor {
            type Value = Availability;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of location names to store lists")
            }

            fn visit_map<M: MapAccess<'de>>(self, mut access: M) -> Result<Self::Value, M::Error> {
                let mut availability = Availability::new();
                while let Some((location, stores)) = access.next_entry::<String, Vec<String>>()? {
                    availability.insert(location, stores);
                }
                Ok(availability)
            }
        }

        deserializer.deserialize_map(AvailabilityVisitor)
    }
}

// ─────────────────────────────────────────────────
// Livro
// ─────────────────────────────────────────────────

/// Registro de livro do catálogo (dado de referência, imutável)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Book {
    /// Título
    pub title: String,
    /// Autor
    #[serde(default)]
    pub author: String,
    /// Editora / selo editorial
    #[serde(default)]
    pub imprint: String,
    /// Data de lançamento no formato DD/MM/YYYY
    #[serde(default)]
    pub release_date: String,
    /// Sinopse
    #[serde(default)]
    pub synopsis: String,
    /// Disponibilidade por localização
    #[serde(default)]
    pub availability: Availability,
}

impl Book {
    /// Data de lançamento interpretada, se estiver no formato DD/MM/YYYY
    pub fn release_date_parsed(&self) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(self.release_date.trim(), RELEASE_DATE_FORMAT).ok()
    }

    /// Ano de lançamento
    pub fn release_year(&self) -> Option<i32> {
        self.release_date_parsed().map(|d| d.year())
    }
}

// ─────────────────────────────────────────────────
// Resposta do assistente
// ─────────────────────────────────────────────────

/// Resultado de uma interação com o assistente
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatReply {
    /// Texto da resposta
    pub response: String,
    /// Intenção detectada
    pub intent: Intent,
    /// Sessão usada (criada se não foi informada)
    pub session_id: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_language_from_code() {
        assert_eq!(Language::from_code("pt-br"), Some(Language::Portuguese));
        assert_eq!(Language::from_code("PT"), Some(Language::Portuguese));
        assert_eq!(Language::from_code("en"), Some(Language::English));
        assert_eq!(Language::from_code("klingon"), None);
        assert_eq!(Language::default(), Language::Portuguese);
    }

    #[test]
    fn test_intent_labels() {
        assert_eq!(Intent::BookDetails.as_str(), "book_details");
        assert_eq!(Intent::StoreInfo.to_string(), "store_info");
        assert_eq!(Intent::from_label("analysis"), Some(Intent::Analytics));
        assert_eq!(Intent::from_label(" Support "), Some(Intent::Support));
        assert_eq!(Intent::from_label("nope"), None);
        assert_eq!(
            serde_json::to_string(&Intent::StoreInfo).unwrap(),
            "\"store_info\""
        );
    }

    #[test]
    fn test_availability_keeps_file_order() {
        let json = r#"{"São Paulo": ["A"], "Online": ["B", "C"], "Curitiba": []}"#;
        let availability: Availability = serde_json::from_str(json).unwrap();

        let locations: Vec<&str> = availability.iter().map(|e| e.location.as_str()).collect();
        assert_eq!(locations, vec!["São Paulo", "Online", "Curitiba"]);
        assert_eq!(availability.online().unwrap().stores.len(), 2);
        assert_eq!(availability.physical().count(), 2);
        assert_eq!(availability.total_stores(), 3);

        let back = serde_json::to_string(&availability).unwrap();
        assert!(back.find("São Paulo").unwrap() < back.find("Online").unwrap());
    }

    #[test]
    fn test_availability_get_is_case_insensitive() {
        let availability = Availability::new().with("São Paulo", &["Loja"]);
        assert!(availability.get("SÃO PAULO").is_some());
        assert!(availability.get("Salvador").is_none());
    }

    #[test]
    fn test_book_release_year() {
        let book = Book {
            title: "X".into(),
            author: String::new(),
            imprint: String::new(),
            release_date: "15/03/2021".into(),
            synopsis: String::new(),
            availability: Availability::new(),
        };
        assert_eq!(book.release_year(), Some(2021));

        let bad = Book {
            release_date: "2021-03-15".into(),
            ..book
        };
        assert_eq!(bad.release_year(), None);
    }
}
