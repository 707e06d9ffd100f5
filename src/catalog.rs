// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// CATÁLOGO DE LIVROS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//
// Fonte de dados do catálogo (arquivo JSON relido a cada consulta),
// busca por título exato/parcial e validação dos registros.
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::path::{Path, PathBuf};

use crate::types::Book;
use crate::utils::{contains_phrase, normalize_for_match, trim_punctuation};

/// Consultas parciais com até este número de caracteres não casam por substring
const MIN_PARTIAL_QUERY_CHARS: usize = 3;

/// Erros de acesso ao catálogo
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("catalog file not found: {0}")]
    NotFound(PathBuf),

    #[error("failed to read catalog {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid catalog JSON in {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Conjunto de livros carregado de uma fonte
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    /// Livros na ordem do arquivo
    #[serde(default)]
    pub books: Vec<Book>,
}

impl Catalog {
    /// Cria catálogo a partir de uma lista de livros
    pub fn new(books: Vec<Book>) -> Self {
        Self { books }
    }

    /// Número de livros
    pub fn len(&self) -> usize {
        self.books.len()
    }

    /// Se o catálogo está vazio
    pub fn is_empty(&self) -> bool {
        self.books.is_empty()
    }

    /// Títulos na ordem do catálogo
    pub fn titles(&self) -> Vec<&str> {
        self.books.iter().map(|b| b.title.as_str()).collect()
    }

    /// Busca um livro pelo título.
    ///
    /// Ordem de tentativa (case e acentos ignorados):
    /// 1. Igualdade exata
    /// 2. Consulta contida no título (`"Abelha"` → `"A Abelha"`)
    /// 3. Título contido na consulta (`"o livro A Abelha"` → `"A Abelha"`)
    pub fn find_by_title(&self, query: &str) -> Option<&Book> {
        let query = normalize_for_match(trim_punctuation(query));
        if query.is_empty() {
            return None;
        }

        if let Some(book) = self
            .books
            .iter()
            .find(|b| normalize_for_match(&b.title) == query)
        {
            return Some(book);
        }

        if query.chars().count() < MIN_PARTIAL_QUERY_CHARS {
            return None;
        }

        self.books
            .iter()
            .find(|b| normalize_for_match(&b.title).contains(&query))
            .or_else(|| {
                self.books
                    .iter()
                    .find(|b| contains_phrase(&query, &normalize_for_match(&b.title)))
            })
    }

    /// Procura qualquer título do catálogo mencionado literalmente no texto.
    ///
    /// Quando mais de um título aparece, o mais longo vence.
    pub fn find_title_in_text(&self, text: &str) -> Option<&Book> {
        let text = normalize_for_match(text);
        self.books
            .iter()
            .filter(|b| contains_phrase(&text, &normalize_for_match(&b.title)))
            .max_by_key(|b| b.title.chars().count())
    }

    /// Verifica a consistência dos registros do catálogo
    pub fn validate(&self) -> Vec<ValidationIssue> {
        let mut issues = Vec::new();
        let mut seen_titles = HashSet::new();

        for (index, book) in self.books.iter().enumerate() {
            let mut push = |kind: IssueKind| {
                issues.push(ValidationIssue {
                    index,
                    title: book.title.clone(),
                    kind,
                })
            };

            let required = [
                ("title", &book.title),
                ("author", &book.author),
                ("imprint", &book.imprint),
                ("release_date", &book.release_date),
                ("synopsis", &book.synopsis),
            ];
            for (field, value) in required {
                if value.trim().is_empty() {
                    push(IssueKind::MissingField(field));
                }
            }

            if !book.release_date.trim().is_empty() && book.release_date_parsed().is_none() {
                push(IssueKind::InvalidReleaseDate(book.release_date.clone()));
            }

            if book.availability.is_empty() {
                push(IssueKind::NoAvailability);
            }

            let key = normalize_for_match(&book.title);
            if !key.is_empty() && !seen_titles.insert(key) {
                push(IssueKind::DuplicateTitle);
            }
        }

        issues
    }
}

/// Tipo de problema encontrado na validação
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IssueKind {
    /// Campo obrigatório vazio ou ausente
    MissingField(&'static str),
    /// Data fora do formato DD/MM/YYYY
    InvalidReleaseDate(String),
    /// Título repetido (comparação sem case/acentos)
    DuplicateTitle,
    /// Nenhuma localização de venda
    NoAvailability,
}

/// Problema de validação de um registro
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationIssue {
    /// Posição do livro no arquivo
    pub index: usize,
    /// Título do livro (pode estar vazio)
    pub title: String,
    /// O que está errado
    pub kind: IssueKind,
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "book #{} ('{}'): ", self.index, self.title)?;
        match &self.kind {
            IssueKind::MissingField(field) => write!(f, "missing field '{}'", field),
            IssueKind::InvalidReleaseDate(date) => {
                write!(f, "release_date '{}' is not DD/MM/YYYY", date)
            }
            IssueKind::DuplicateTitle => write!(f, "duplicate title"),
            IssueKind::NoAvailability => write!(f, "no availability entries"),
        }
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// FONTES DE CATÁLOGO
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Origem dos dados do catálogo.
///
/// Cada chamada a `load` devolve o estado atual da fonte; não há cache.
pub trait CatalogSource: Send + Sync {
    /// Carrega o catálogo completo
    fn load(&self) -> Result<Catalog, CatalogError>;

    /// Descrição para logs
    fn describe(&self) -> String;
}

/// Catálogo em arquivo JSON (`{"books": [...]}`), relido a cada consulta
#[derive(Debug, Clone)]
pub struct JsonCatalogFile {
    path: PathBuf,
}

impl JsonCatalogFile {
    /// Cria fonte apontando para o arquivo
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Caminho do arquivo
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl CatalogSource for JsonCatalogFile {
    fn load(&self) -> Result<Catalog, CatalogError> {
        let content = std::fs::read_to_string(&self.path).map_err(|source| {
            if source.kind() == std::io::ErrorKind::NotFound {
                CatalogError::NotFound(self.path.clone())
            } else {
                CatalogError::Io {
                    path: self.path.clone(),
                    source,
                }
            }
        })?;

        let catalog: Catalog =
            serde_json::from_str(&content).map_err(|source| CatalogError::Parse {
                path: self.path.clone(),
                source,
            })?;

        log::debug!(
            "📚 Catálogo carregado de {:?}: {} livros",
            self.path,
            catalog.len()
        );
        Ok(catalog)
    }

    fn describe(&self) -> String {
        format!("json:{}", self.path.display())
    }
}

/// Catálogo fixo em memória (testes e benchmarks)
#[derive(Debug, Clone, Default)]
pub struct StaticCatalog {
    catalog: Catalog,
}

impl StaticCatalog {
    /// Cria fonte com os livros informados
    pub fn new(books: Vec<Book>) -> Self {
        Self {
            catalog: Catalog::new(books),
        }
    }
}

impl CatalogSource for StaticCatalog {
    fn load(&self) -> Result<Catalog, CatalogError> {
        Ok(self.catalog.clone())
    }

    fn describe(&self) -> String {
        format!("static:{} books", self.catalog.len())
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// FIXTURES PARA TESTES
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Catálogo pequeno usado pelos testes unitários dos outros módulos
#[cfg(test)]
pub(crate) fn sample_books() -> Vec<Book> {
    use crate::types::Availability;

    vec![
        Book {
            title: "A Abelha".into(),
            author: "Cristovão Tezza".into(),
            imprint: "Elo Editora".into(),
            release_date: "15/03/2021".into(),
            synopsis: "Uma abelha operária parte em busca de novas flores.".into(),
            availability: Availability::new()
                .with("São Paulo", &["Livraria Cultura - Av. Paulista"])
                .with("Online", &["Amazon", "Loja Elo Editora"]),
        },
        Book {
            title: "A Baleia-azul".into(),
            author: "Marina Colasanti".into(),
            imprint: "Elo Editora".into(),
            release_date: "02/08/2020".into(),
            synopsis: "A longa viagem da maior criatura do oceano.".into(),
            availability: Availability::new()
                .with("São Paulo", &["Livraria Cultura - Conjunto Nacional"])
                .with("Rio de Janeiro", &["Livraria Travessa - Leblon"])
                .with("Online", &["Amazon"]),
        },
        Book {
            title: "A Borboleta".into(),
            author: "Cristovão Tezza".into(),
            imprint: "Elo Kids".into(),
            release_date: "10/11/2022".into(),
            synopsis: "Do casulo ao primeiro voo.".into(),
            availability: Availability::new().with("Online", &["Amazon"]),
        },
        Book {
            title: "O Príncipe da Pérsia".into(),
            author: "Ana Maria Machado".into(),
            imprint: "Elo Clássicos".into(),
            release_date: "21/04/2019".into(),
            synopsis: "Um jovem príncipe atravessa o deserto.".into(),
            availability: Availability::new()
                .with("Curitiba", &["Livrarias Curitiba - Centro"]),
        },
    ]
}
