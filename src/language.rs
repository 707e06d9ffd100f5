// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// DETECÇÃO DE IDIOMA
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//
// Heurística por palavras marcadoras para escolher entre português e inglês.
// Acentos não contam: nomes de cidades ("São Paulo") aparecem nos dois idiomas.
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

use crate::types::Language;

const PORTUGUESE_MARKERS: &[&str] = &[
    "onde", "posso", "comprar", "compro", "sobre", "livro", "livros", "quero", "fale", "conte",
    "que", "qual", "quais", "quem", "do", "da", "dos", "das", "em", "um", "uma", "ajuda",
    "preciso", "problema", "meu", "minha", "ola", "oi", "obrigado", "obrigada", "nao", "sim",
    "loja", "lojas", "para", "com", "tem", "estatisticas", "analise", "mesmo", "mesma", "lugar",
    "cidade", "pedido", "reclamacao", "detalhes", "informacoes", "informacao", "autor", "editora",
    "sinopse", "vende", "vendem", "encontrar", "la", "esse", "este", "isso", "dele", "tchau",
    "voce", "pode", "podem", "gostaria", "saber", "disponivel", "relatorio", "mercado", "duvida",
];

const ENGLISH_MARKERS: &[&str] = &[
    "where", "can", "i", "buy", "about", "tell", "the", "book", "books", "what", "who", "is",
    "in", "help", "need", "my", "with", "find", "stores", "store", "details", "publisher",
    "please", "hello", "hi", "thanks", "thank", "you", "have", "it", "that", "this", "same",
    "place", "there", "order", "statistics", "analysis", "show", "how", "and", "of", "for",
    "sell", "sells", "available", "purchase", "want", "know", "information", "give", "report",
    "market", "issue", "complaint", "bye", "which", "does",
];

/// Detecta o idioma de uma mensagem.
///
/// Retorna `None` quando não há sinal suficiente (empate ou nenhum marcador);
/// o chamador decide o padrão (idioma da sessão ou da configuração).
pub fn detect_language(text: &str) -> Option<Language> {
    let normalized = crate::utils::normalize_for_match(text);
    let (mut pt, mut en) = (0usize, 0usize);

    for word in normalized
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
    {
        if PORTUGUESE_MARKERS.contains(&word) {
            pt += 1;
        }
        if ENGLISH_MARKERS.contains(&word) {
            en += 1;
        }
    }

    log::debug!("🌐 Marcadores de idioma: pt={} en={}", pt, en);

    match pt.cmp(&en) {
        std::cmp::Ordering::Greater => Some(Language::Portuguese),
        std::cmp::Ordering::Less => Some(Language::English),
        std::cmp::Ordering::Equal => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_english() {
        assert_eq!(detect_language("Tell me about A Abelha"), Some(Language::English));
        assert_eq!(
            detect_language("Where can I buy A Baleia-azul in São Paulo?"),
            Some(Language::English)
        );
        assert_eq!(
            detect_language("I need help with my order"),
            Some(Language::English)
        );
    }

    #[test]
    fn test_detect_portuguese() {
        assert_eq!(
            detect_language("Onde posso comprar A Baleia-azul em São Paulo?"),
            Some(Language::Portuguese)
        );
        assert_eq!(
            detect_language("Me fale sobre o livro A Abelha"),
            Some(Language::Portuguese)
        );
        assert_eq!(
            detect_language("Preciso de ajuda com meu pedido"),
            Some(Language::Portuguese)
        );
    }

    #[test]
    fn test_detect_without_signal() {
        assert_eq!(detect_language(""), None);
        assert_eq!(detect_language("A Abelha"), None);
        assert_eq!(detect_language("12345"), None);
    }
}
