// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// EXTRAÇÃO DE ENTIDADES (TÍTULO E CIDADE)
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//
// Título: lista ordenada de regex (aspas, "comprar X em Y", "sobre X"...),
// primeira captura válida vence; depois busca literal de títulos do catálogo.
// Cidade: lista fixa de capitais brasileiras + localizações do catálogo.
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

use once_cell::sync::Lazy;
use regex::Regex;

use crate::catalog::Catalog;
use crate::intent::mentions_book_reference;
use crate::session::SessionContext;
use crate::utils::{clean_text, contains_phrase, normalize_for_match, trim_punctuation};

/// Cidades reconhecidas mesmo quando não aparecem no catálogo
pub const KNOWN_CITIES: &[&str] = &[
    "São Paulo",
    "Rio de Janeiro",
    "Salvador",
    "Curitiba",
    "Belo Horizonte",
    "Brasília",
    "Fortaleza",
    "Recife",
    "Porto Alegre",
    "Manaus",
];

/// Referências à cidade da interação anterior
const CITY_REFERENCES: &[&str] = &[
    "there", "same place", "same city", "la", "mesmo lugar", "mesma cidade", "nessa cidade",
    "nesta cidade",
];

/// Capturas que nunca são títulos
const REJECTED_CANDIDATES: &[&str] = &[
    "ola", "oi", "hello", "hi", "tchau", "bye", "obrigado", "obrigada", "thanks", "it", "ele",
    "isso", "this one", "that one", "that book", "this book", "esse livro", "este livro", "book",
    "books", "livro", "livros", "a book", "the book", "um livro", "o livro", "stores", "lojas",
];

/// Palavras soltas no fim da captura ("comprar A Abelha em")
const TRAILING_CONNECTIVES: &[&str] = &["em", "de", "da", "do", "in", "at", "please"];

const CITY_SUFFIX: &str = r"(?:\s+(?:in|em|na|no|at)\s+.+)?$";
const BOOK_PREFIX: &str = r"(?:(?:o|the)\s+(?:livro|book)\s+)?";

static TITLE_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    let patterns = [
        // Entre aspas duplas ou tipográficas
        r#"["“]([^"”]+)["”]"#.to_string(),
        // Entre aspas simples (apóstrofos no meio de palavras não contam)
        r"(?:^|\s)'([^']+)'".to_string(),
        // "buy X in Y" / "comprar X em Y"
        format!(
            r"(?i)\b(?:buy|purchase|comprar|compro|encontrar|encontro|find|achar|acho)\s+{}(.+?){}",
            BOOK_PREFIX, CITY_SUFFIX
        ),
        // "stores selling X" / "lojas que vendem X"
        format!(
            r"(?i)\b(?:selling|sells|sell|vendem|vende|vendendo)\s+{}(.+?){}",
            BOOK_PREFIX, CITY_SUFFIX
        ),
        // "tell me about X" / "me fale sobre X"
        format!(
            r"(?i)\b(?:tell me about|details about|information about|info about|informações sobre|detalhes sobre|detalhes de|detalhes do|sobre|about|what is|o que é|quem escreveu|who wrote|describe|descreva)\s+{}(.+?){}",
            BOOK_PREFIX, CITY_SUFFIX
        ),
        // "o livro X" / "the book X"
        format!(
            r"(?i)\b(?:livro|book|título|title)\s+(.+?){}",
            CITY_SUFFIX
        ),
    ];

    patterns
        .iter()
        .filter_map(|p| match Regex::new(p) {
            Ok(re) => Some(re),
            Err(e) => {
                log::error!("Regex de título inválida '{}': {}", p, e);
                None
            }
        })
        .collect()
});

/// Aplica as regex em ordem e devolve a primeira captura aceitável
pub fn title_candidate(text: &str) -> Option<String> {
    let cleaned = clean_text(text);
    let cleaned = cleaned
        .trim_end_matches(|c: char| matches!(c, '?' | '!' | '.' | ',' | ';' | ':'))
        .trim();
    if cleaned.is_empty() {
        return None;
    }

    TITLE_PATTERNS.iter().find_map(|re| {
        re.captures(cleaned)
            .and_then(|caps| caps.get(1))
            .and_then(|m| clean_candidate(m.as_str()))
    })
}

/// Extrai o título mencionado na mensagem.
///
/// 1. Captura por regex, resolvida para o título canônico do catálogo
/// 2. Qualquer título do catálogo presente literalmente no texto
/// 3. A captura crua (para a resposta "não encontrado" citar o pedido)
pub fn extract_title(text: &str, catalog: &Catalog) -> Option<String> {
    let candidate = title_candidate(text);

    if let Some(book) = candidate.as_deref().and_then(|c| catalog.find_by_title(c)) {
        log::debug!("🔎 Título por regex: '{}'", book.title);
        return Some(book.title.clone());
    }

    if let Some(book) = catalog.find_title_in_text(text) {
        log::debug!("🔎 Título por varredura do catálogo: '{}'", book.title);
        return Some(book.title.clone());
    }

    if let Some(ref raw) = candidate {
        log::debug!("🔎 Título não resolvido no catálogo: '{}'", raw);
    }
    candidate
}

/// Extrai a cidade mencionada (lista fixa + localizações físicas do catálogo)
pub fn extract_city(text: &str, catalog: Option<&Catalog>) -> Option<String> {
    let normalized = normalize_for_match(text);
    if normalized.is_empty() {
        return None;
    }

    let catalog_locations = catalog
        .into_iter()
        .flat_map(|c| c.books.iter())
        .flat_map(|b| b.availability.physical())
        .map(|e| e.location.as_str());

    KNOWN_CITIES
        .iter()
        .copied()
        .chain(catalog_locations)
        .find(|city| contains_phrase(&normalized, &normalize_for_match(city)))
        .map(|city| city.to_string())
}

/// Título da mensagem ou, em perguntas de continuação, o livro da sessão.
///
/// Continuação = referência ao livro ("it", "esse livro") ou apenas uma
/// nova cidade ("E em Salvador?"). Uma captura fora do catálogo só vence
/// o livro da sessão quando a mensagem não se refere a ele.
pub fn resolve_title(
    text: &str,
    catalog: &Catalog,
    session: Option<&SessionContext>,
) -> Option<String> {
    let extracted = extract_title(text, catalog);
    if let Some(title) = &extracted {
        if catalog.find_by_title(title).is_some() {
            return extracted;
        }
    }

    let current = session.and_then(|s| s.current_book.clone());
    let normalized = normalize_for_match(text);
    let follow_up = match &extracted {
        Some(_) => mentions_book_reference(&normalized),
        None => {
            mentions_book_reference(&normalized) || extract_city(text, Some(catalog)).is_some()
        }
    };

    match current {
        Some(current) if follow_up => {
            log::debug!("🔎 Título da sessão: '{}'", current);
            Some(current)
        }
        _ => extracted,
    }
}

/// Cidade da mensagem ou, se o usuário disser "lá"/"same city", a da sessão
pub fn resolve_city(
    text: &str,
    catalog: Option<&Catalog>,
    session: Option<&SessionContext>,
) -> Option<String> {
    if let Some(city) = extract_city(text, catalog) {
        return Some(city);
    }

    let current = session.and_then(|s| s.current_city.clone())?;
    let normalized = normalize_for_match(text);
    CITY_REFERENCES
        .iter()
        .any(|r| contains_phrase(&normalized, r))
        .then_some(current)
}

fn clean_candidate(raw: &str) -> Option<String> {
    let mut words: Vec<&str> = trim_punctuation(raw).split_whitespace().collect();

    while words.len() > 1 {
        let last = words[words.len() - 1].to_lowercase();
        if TRAILING_CONNECTIVES.contains(&last.as_str()) {
            words.pop();
        } else if last == "favor"
            && words.len() > 2
            && words[words.len() - 2].eq_ignore_ascii_case("por")
        {
            words.truncate(words.len() - 2);
        } else {
            break;
        }
    }

    let candidate = trim_punctuation(&words.join(" ")).to_string();
    let normalized = normalize_for_match(&candidate);
    if candidate.chars().count() <= 2 || REJECTED_CANDIDATES.contains(&normalized.as_str()) {
        return None;
    }
    Some(candidate)
}
