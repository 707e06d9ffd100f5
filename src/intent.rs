// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// CLASSIFICAÇÃO DE INTENÇÃO
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//
// Classificador determinístico por palavras-chave. Cada intenção tem uma
// regra; as regras são testadas em uma lista ordenada e a primeira que
// casar vence. Sem pontuação de confiança.
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

use crate::session::Interaction;
use crate::types::Intent;
use crate::utils::{contains_phrase, normalize_for_match};

/// Ordem padrão de avaliação das regras.
///
/// Relatórios e suporte vêm antes das consultas ao catálogo: uma mensagem
/// que fala de "problema" com um livro vira ticket, não consulta.
pub const DEFAULT_PRECEDENCE: [Intent; 4] = [
    Intent::Analytics,
    Intent::Support,
    Intent::StoreInfo,
    Intent::BookDetails,
];

/// Quantas interações recentes o contexto conversacional considera
const CONTEXT_WINDOW: usize = 2;

const ANALYTICS_KEYWORDS: &[&str] = &[
    "statistics", "estatisticas", "estatistica", "analytics", "analysis", "analise", "metrics",
    "metricas", "hhi", "herfindahl", "entropy", "entropia", "shannon", "gini",
    "market intelligence", "business intelligence", "inteligencia de mercado", "relatorio",
    "concentration", "concentracao",
];

const SUPPORT_KEYWORDS: &[&str] = &[
    "help", "ajuda", "support", "suporte", "problem", "problema", "ticket", "reclamacao",
    "complaint", "issue", "order", "pedido", "submission", "submissao", "manuscript",
    "manuscrito", "contact", "contato", "atendimento", "refund", "reembolso", "defeito",
];

const STORE_KEYWORDS: &[&str] = &[
    "where", "onde", "buy", "comprar", "compro", "purchase", "store", "stores", "loja", "lojas",
    "livraria", "livrarias", "shop", "sell", "sells", "selling", "vende", "vendem", "vender",
    "available", "disponivel", "disponibilidade", "find", "encontrar", "encontro", "achar",
];

const BOOK_KEYWORDS: &[&str] = &[
    "about", "sobre", "details", "detalhes", "info", "information", "informacao", "informacoes",
    "tell me", "what is", "o que e", "describe", "descreva", "book", "livro", "author", "autor",
    "synopsis", "sinopse", "summary", "resumo", "publisher", "editora", "who wrote",
    "quem escreveu", "fale", "conte",
];

/// Referências a um livro já mencionado na conversa
const BOOK_REFERENCES: &[&str] = &[
    "it", "that book", "this book", "this one", "that one", "ele", "esse livro", "este livro",
    "isso", "dele", "nele",
];

/// Pedidos de aprofundamento após uma consulta de lojas
const MORE_DETAILS: &[&str] = &[
    "more", "details", "tell me more", "mais detalhes", "mais sobre", "detalhes",
];

/// Regra de uma intenção: lista de palavras-chave (normalizadas)
#[derive(Debug, Clone)]
pub struct IntentRule {
    intent: Intent,
    keywords: Vec<String>,
}

impl IntentRule {
    /// Cria regra a partir de palavras-chave; a normalização é aplicada aqui
    pub fn new(intent: Intent, keywords: &[&str]) -> Self {
        Self {
            intent,
            keywords: keywords.iter().map(|k| normalize_for_match(k)).collect(),
        }
    }

    /// Regra padrão para a intenção (`Unknown` não tem palavras-chave)
    pub fn default_for(intent: Intent) -> Self {
        let keywords = match intent {
            Intent::Analytics => ANALYTICS_KEYWORDS,
            Intent::Support => SUPPORT_KEYWORDS,
            Intent::StoreInfo => STORE_KEYWORDS,
            Intent::BookDetails => BOOK_KEYWORDS,
            Intent::Unknown => &[],
        };
        Self::new(intent, keywords)
    }

    /// Intenção produzida pela regra
    pub fn intent(&self) -> Intent {
        self.intent
    }

    /// Primeira palavra-chave encontrada no texto já normalizado
    pub fn matched_keyword(&self, normalized: &str) -> Option<&str> {
        self.keywords
            .iter()
            .find(|k| contains_phrase(normalized, k))
            .map(|k| k.as_str())
    }
}

/// Classificador de intenção com precedência explícita.
///
/// # Exemplo
///
/// ```rust,ignore
/// let classifier = IntentClassifier::new();
/// assert_eq!(classifier.classify("Tell me about A Abelha"), Intent::BookDetails);
/// ```
#[derive(Debug, Clone)]
pub struct IntentClassifier {
    rules: Vec<IntentRule>,
}

impl Default for IntentClassifier {
    fn default() -> Self {
        Self::new()
    }
}

impl IntentClassifier {
    /// Classificador com a ordem padrão ([`DEFAULT_PRECEDENCE`])
    pub fn new() -> Self {
        Self::with_precedence(&DEFAULT_PRECEDENCE)
    }

    /// Classificador com ordem customizada.
    ///
    /// Intenções ausentes da lista entram no final, na ordem padrão;
    /// repetições e `Unknown` são ignoradas.
    pub fn with_precedence(order: &[Intent]) -> Self {
        let mut ordered: Vec<Intent> = Vec::with_capacity(DEFAULT_PRECEDENCE.len());
        for intent in order.iter().chain(DEFAULT_PRECEDENCE.iter()) {
            if *intent != Intent::Unknown && !ordered.contains(intent) {
                ordered.push(*intent);
            }
        }

        Self {
            rules: ordered.into_iter().map(IntentRule::default_for).collect(),
        }
    }

    /// Ordem efetiva das regras
    pub fn precedence(&self) -> Vec<Intent> {
        self.rules.iter().map(|r| r.intent()).collect()
    }

    /// Regra vencedora e a palavra-chave que a disparou
    pub fn explain(&self, text: &str) -> Option<(Intent, String)> {
        let normalized = normalize_for_match(text);
        if normalized.is_empty() {
            return None;
        }
        self.rules.iter().find_map(|rule| {
            rule.matched_keyword(&normalized)
                .map(|k| (rule.intent(), k.to_string()))
        })
    }

    /// Classifica uma mensagem isolada
    pub fn classify(&self, text: &str) -> Intent {
        match self.explain(text) {
            Some((intent, keyword)) => {
                log::debug!("🎯 Intenção {} (palavra-chave '{}')", intent, keyword);
                intent
            }
            None => Intent::Unknown,
        }
    }

    /// Classifica considerando as últimas interações da sessão.
    ///
    /// - "mais detalhes" logo após uma consulta de lojas → `BookDetails`
    /// - "onde compro ele?" após falar de um livro → `StoreInfo`
    ///
    /// Suporte e relatórios nunca são sobrescritos pelo contexto.
    pub fn classify_with_context(&self, text: &str, history: &[Interaction]) -> Intent {
        let base = self.classify(text);
        if matches!(base, Intent::Support | Intent::Analytics) || history.is_empty() {
            return base;
        }

        let normalized = normalize_for_match(text);
        let asks_more = mentions_any(&normalized, MORE_DETAILS);

        if asks_more && history.last().map(|i| i.intent) == Some(Intent::StoreInfo) {
            log::debug!("🎯 Contexto: detalhes após consulta de lojas → book_details");
            return Intent::BookDetails;
        }

        let recent = &history[history.len().saturating_sub(CONTEXT_WINDOW)..];
        if !asks_more
            && mentions_book_reference(&normalized)
            && recent.iter().any(|i| i.intent == Intent::BookDetails)
        {
            log::debug!("🎯 Contexto: referência ao livro anterior → store_info");
            return Intent::StoreInfo;
        }

        base
    }
}

/// Se o texto normalizado se refere a um livro já mencionado ("it", "esse livro"...)
pub fn mentions_book_reference(normalized: &str) -> bool {
    mentions_any(normalized, BOOK_REFERENCES)
}

fn mentions_any(normalized: &str, phrases: &[&str]) -> bool {
    phrases.iter().any(|p| contains_phrase(normalized, p))
}
