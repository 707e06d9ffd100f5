// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// RESPOSTAS FORMATADAS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//
// Templates em português e inglês para cada resultado das ferramentas,
// mais os textos fixos (ajuda, boas-vindas, pedidos de esclarecimento,
// erro de dados e desculpas genéricas).
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

use std::fmt::Write as _;

use crate::tickets::SupportTicket;
use crate::tools::{BookLookup, StoreAvailability};
use crate::types::{Book, Intent, Language, LocationStores};

/// Formata uma busca de livro
pub fn lookup(result: &BookLookup, lang: Language) -> String {
    match result {
        BookLookup::Found(book) => book_details(book, lang),
        BookLookup::NotFound {
            query,
            catalog_size,
        } => book_not_found(query, *catalog_size, lang),
    }
}

/// Ficha completa do livro
pub fn book_details(book: &Book, lang: Language) -> String {
    let mut out = String::new();
    match lang {
        Language::Portuguese => {
            let _ = writeln!(out, "📚 **{}**", book.title);
            let _ = writeln!(out);
            let _ = writeln!(out, "**Autor:** {}", book.author);
            let _ = writeln!(out, "**Editora:** {}", book.imprint);
            let _ = writeln!(out, "**Data de Lançamento:** {}", book.release_date);
            let _ = writeln!(out);
            let _ = writeln!(out, "**Sinopse:** {}", book.synopsis);
            if !book.availability.is_empty() {
                let _ = writeln!(out);
                let _ = write!(out, "**Onde Comprar:**");
            }
        }
        Language::English => {
            let _ = writeln!(out, "📚 **{}**", book.title);
            let _ = writeln!(out);
            let _ = writeln!(out, "**Author:** {}", book.author);
            let _ = writeln!(out, "**Publisher:** {}", book.imprint);
            let _ = writeln!(out, "**Release Date:** {}", book.release_date);
            let _ = writeln!(out);
            let _ = writeln!(out, "**Synopsis:** {}", book.synopsis);
            if !book.availability.is_empty() {
                let _ = writeln!(out);
                let _ = write!(out, "**Where to Buy:**");
            }
        }
    }
    for entry in book.availability.iter() {
        let _ = write!(out, "\n{}", location_line(entry));
    }
    out.trim_end().to_string()
}

/// Livro ausente do catálogo; sempre cita a consulta
pub fn book_not_found(query: &str, catalog_size: usize, lang: Language) -> String {
    match lang {
        Language::Portuguese => format!(
            "❌ Desculpe, não encontrei o livro '{}' em nosso catálogo. Temos {} livros disponíveis.",
            query, catalog_size
        ),
        Language::English => format!(
            "❌ Sorry, book '{}' not found in our catalog. We have {} books available.",
            query, catalog_size
        ),
    }
}

fn location_line(entry: &LocationStores) -> String {
    format!("• **{}:** {}", entry.location, entry.stores.join(", "))
}

fn bullet_list(items: &[String]) -> String {
    items
        .iter()
        .map(|s| format!("• {}", s))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Formata uma busca de lojas
pub fn stores(result: &StoreAvailability, lang: Language) -> String {
    let pt = lang == Language::Portuguese;
    match result {
        StoreAvailability::AllLocations { title, locations } => {
            let header = if pt {
                format!("🏪 **Onde comprar '{}':**", title)
            } else {
                format!("🏪 **Where to buy '{}':**", title)
            };
            let lines: Vec<String> = locations.iter().map(location_line).collect();
            format!("{}\n{}", header, lines.join("\n"))
        }
        StoreAvailability::InCity {
            title,
            city,
            stores,
            online,
        } => {
            let mut out = if pt {
                format!("🏪 **Lojas em {} que vendem '{}':**\n", city, title)
            } else {
                format!("🏪 **Stores in {} selling '{}':**\n", city, title)
            };
            out.push_str(&bullet_list(stores));
            if !online.is_empty() {
                let label = if pt { "Também online" } else { "Also online" };
                let _ = write!(out, "\n\n🌐 **{}:** {}", label, online.join(", "));
            }
            out
        }
        StoreAvailability::OnlineFallback {
            title,
            city,
            online,
        } => {
            let header = if pt {
                format!(
                    "📍 Não encontrei lojas físicas em {} que vendem '{}', mas o livro está disponível online:",
                    city, title
                )
            } else {
                format!(
                    "📍 No physical stores in {} sell '{}', but the book is available online:",
                    city, title
                )
            };
            format!("{}\n{}", header, bullet_list(online))
        }
        StoreAvailability::Unavailable { title, city } => match (city, pt) {
            (Some(city), true) => format!(
                "❌ '{}' não está disponível em {} nem online no momento.",
                title, city
            ),
            (Some(city), false) => format!(
                "❌ '{}' is not available in {} or online at the moment.",
                title, city
            ),
            (None, true) => format!("❌ '{}' não está disponível em nenhuma loja no momento.", title),
            (None, false) => format!("❌ '{}' is not available in any store at the moment.", title),
        },
        StoreAvailability::BookNotFound { query } => {
            if pt {
                format!("❌ Livro '{}' não encontrado no catálogo.", query)
            } else {
                format!("❌ Book '{}' not found in catalog.", query)
            }
        }
    }
}

/// Confirmação de ticket aberto pelo endpoint/comando explícito
pub fn ticket_created(ticket: &SupportTicket, lang: Language) -> String {
    match lang {
        Language::Portuguese => format!(
            "🎫 **Ticket de Suporte Criado**\n\n\
             **ID do Ticket:** {}\n\
             **Status:** {}\n\
             **Assunto:** {}\n\
             **Mensagem:** {}\n\n\
             ✅ Seu ticket foi criado com sucesso! Nossa equipe entrará em contato em até 24 horas.",
            ticket.id, ticket.status, ticket.subject, ticket.message
        ),
        Language::English => format!(
            "🎫 **Support Ticket Created**\n\n\
             **Ticket ID:** {}\n\
             **Status:** {}\n\
             **Subject:** {}\n\
             **Message:** {}\n\n\
             ✅ Your ticket was created successfully! Our team will contact you within 24 hours.",
            ticket.id, ticket.status, ticket.subject, ticket.message
        ),
    }
}

/// Confirmação de ticket aberto a partir de uma mensagem livre no chat
pub fn chat_ticket_created(ticket: &SupportTicket, lang: Language) -> String {
    let hint = match lang {
        Language::Portuguese => {
            "📧 Para receber retorno por e-mail, abra um ticket completo: \
             ticket <nome> <email> <assunto> <mensagem>"
        }
        Language::English => {
            "📧 To get an e-mail reply, file a complete ticket: \
             ticket <name> <email> <subject> <message>"
        }
    };
    format!("{}\n\n{}", ticket_created(ticket, lang), hint)
}

/// Falha ao registrar ticket (dados inválidos ou erro de gravação)
pub fn ticket_failed(reason: &str, lang: Language) -> String {
    match lang {
        Language::Portuguese => format!("❌ Não foi possível criar o ticket: {}", reason),
        Language::English => format!("❌ Could not create the ticket: {}", reason),
    }
}

/// Pergunta de esclarecimento quando falta o título
pub fn ask_for_title(intent: Intent, lang: Language) -> String {
    match (intent, lang) {
        (Intent::StoreInfo, Language::Portuguese) => {
            "🤔 De qual livro você quer saber onde comprar? Ex.: \"Onde comprar A Abelha em São Paulo?\"".into()
        }
        (Intent::StoreInfo, Language::English) => {
            "🤔 Which book would you like to buy? E.g. \"Where can I buy A Abelha in São Paulo?\"".into()
        }
        (_, Language::Portuguese) => {
            "🤔 Sobre qual livro você quer saber? Ex.: \"Me fale sobre A Abelha\"".into()
        }
        (_, Language::English) => {
            "🤔 Which book would you like to know about? E.g. \"Tell me about A Abelha\"".into()
        }
    }
}

/// Texto de ajuda (também usado para mensagens vazias e não reconhecidas)
pub fn help(lang: Language) -> String {
    match lang {
        Language::Portuguese => "\
🤖 **Assistente Editorial**

Posso ajudar com:
📚 Informações sobre livros: \"Me fale sobre A Abelha\"
🏪 Onde comprar: \"Onde comprar A Baleia-azul em São Paulo?\"
🎫 Suporte: \"Preciso de ajuda com meu pedido\"
📊 Estatísticas do catálogo: \"Mostre uma análise das editoras\""
            .into(),
        Language::English => "\
🤖 **Editorial Assistant**

I can help with:
📚 Book information: \"Tell me about A Abelha\"
🏪 Where to buy: \"Where can I buy A Baleia-azul in São Paulo?\"
🎫 Support: \"I need help with my order\"
📊 Catalog statistics: \"Show me an analysis of the publishers\""
            .into(),
    }
}

/// Mensagem inicial do REPL
pub fn welcome(lang: Language) -> String {
    match lang {
        Language::Portuguese => format!(
            "👋 Olá! Sou o assistente editorial.\n\n{}\n\nDigite 'help' para ajuda ou 'sair' para encerrar.",
            help(lang)
        ),
        Language::English => format!(
            "👋 Hello! I'm the editorial assistant.\n\n{}\n\nType 'help' for help or 'quit' to exit.",
            help(lang)
        ),
    }
}

/// Falha de acesso ao catálogo ou ao registro de tickets
pub fn data_error(lang: Language) -> String {
    match lang {
        Language::Portuguese => {
            "❌ Erro ao acessar os dados do catálogo. Tente novamente em instantes.".into()
        }
        Language::English => {
            "❌ Error accessing catalog data. Please try again shortly.".into()
        }
    }
}

/// Desculpa genérica para erros inesperados
pub fn apology(lang: Language) -> String {
    match lang {
        Language::Portuguese => {
            "Desculpe, ocorreu um erro ao processar sua solicitação. Por favor, tente novamente."
                .into()
        }
        Language::English => {
            "I apologize, but I encountered an error while processing your request. Please try again."
                .into()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::sample_books;

    #[test]
    fn test_book_details_has_every_field() {
        let book = &sample_books()[0];
        for lang in [Language::Portuguese, Language::English] {
            let text = book_details(book, lang);
            assert!(text.contains("A Abelha"));
            assert!(text.contains("Cristovão Tezza"));
            assert!(text.contains("Elo Editora"));
            assert!(text.contains("15/03/2021"));
            assert!(text.contains("abelha operária"));
            assert!(text.contains("Livraria Cultura - Av. Paulista"));
        }
        assert!(book_details(book, Language::English).contains("**Publisher:**"));
    }

    #[test]
    fn test_not_found_mentions_query() {
        let pt = book_not_found("Dom Casmurro", 8, Language::Portuguese);
        assert!(pt.contains("'Dom Casmurro'"));
        assert!(pt.contains("8 livros"));
        let en = book_not_found("Dom Casmurro", 8, Language::English);
        assert!(en.contains("not found"));
        assert!(en.contains("Dom Casmurro"));
    }

    #[test]
    fn test_online_fallback_lists_online_stores() {
        let result = StoreAvailability::OnlineFallback {
            title: "A Abelha".into(),
            city: "Salvador".into(),
            online: vec!["Amazon".into(), "Loja Elo Editora".into()],
        };
        let text = stores(&result, Language::Portuguese);
        assert!(text.contains("Salvador"));
        assert!(text.contains("online"));
        assert!(text.contains("• Amazon"));
        assert!(text.contains("• Loja Elo Editora"));
    }

    #[test]
    fn test_in_city_mentions_online_as_well() {
        let result = StoreAvailability::InCity {
            title: "A Abelha".into(),
            city: "São Paulo".into(),
            stores: vec!["Livraria Cultura".into()],
            online: vec!["Amazon".into()],
        };
        let text = stores(&result, Language::English);
        assert!(text.starts_with("🏪 **Stores in São Paulo selling 'A Abelha':**"));
        assert!(text.contains("Also online"));
    }

    #[test]
    fn test_ticket_confirmation_echoes_message() {
        let ticket = SupportTicket {
            id: "TCK-20240101120000-ABCD".into(),
            name: "Ana".into(),
            email: "a@x.com".into(),
            subject: "S".into(),
            message: "M".into(),
            timestamp: "2024-01-01T12:00:00-03:00".into(),
            status: "open".into(),
        };
        let text = ticket_created(&ticket, Language::English);
        assert!(text.contains("TCK-20240101120000-ABCD"));
        assert!(text.contains("**Message:** M"));

        let chat = chat_ticket_created(&ticket, Language::Portuguese);
        assert!(chat.contains("ticket <nome> <email> <assunto> <mensagem>"));
    }

    #[test]
    fn test_fixed_texts_are_localized() {
        assert!(apology(Language::English).starts_with("I apologize"));
        assert!(apology(Language::Portuguese).starts_with("Desculpe"));
        assert!(help(Language::Portuguese).contains("Posso ajudar"));
        assert!(welcome(Language::English).contains("help"));
        assert_ne!(
            ask_for_title(Intent::StoreInfo, Language::Portuguese),
            ask_for_title(Intent::BookDetails, Language::Portuguese)
        );
    }
}
