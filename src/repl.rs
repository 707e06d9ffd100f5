// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// MODO INTERATIVO (REPL)
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//
// Comandos: help, quit/exit/sair/bye, ticket <nome> <email> <assunto> <mensagem>.
// Qualquer outra linha vai para o assistente, sempre na mesma sessão.
// Lê de qualquer `BufRead` e escreve em qualquer `Write` (stdin/stdout ou testes).
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

use std::io::{BufRead, Write};

use crate::assistant::EditorialAssistant;
use crate::language::detect_language;
use crate::responses;
use crate::tickets::NewTicket;
use crate::types::Language;

const PROMPT: &str = "\n💬 > ";

/// Linha digitada no REPL
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplCommand {
    /// Linha em branco (ignorada)
    Empty,
    /// Mostrar ajuda
    Help,
    /// Encerrar
    Quit,
    /// `ticket` com os quatro campos
    Ticket(NewTicket),
    /// `ticket` com campos faltando
    InvalidTicket,
    /// Pergunta livre para o assistente
    Message(String),
}

/// Separa a primeira palavra do restante (restante sem espaços à esquerda)
fn split_word(text: &str) -> Option<(&str, &str)> {
    let text = text.trim_start();
    if text.is_empty() {
        return None;
    }
    match text.find(char::is_whitespace) {
        Some(idx) => Some((&text[..idx], text[idx..].trim_start())),
        None => Some((text, "")),
    }
}

impl ReplCommand {
    /// Interpreta uma linha de entrada
    pub fn parse(line: &str) -> Self {
        let line = line.trim();
        if line.is_empty() {
            return Self::Empty;
        }

        match line.to_lowercase().as_str() {
            "help" | "ajuda" | "?" => return Self::Help,
            "quit" | "exit" | "sair" | "bye" => return Self::Quit,
            _ => {}
        }

        let Some((command, rest)) = split_word(line) else {
            return Self::Empty;
        };
        if !command.eq_ignore_ascii_case("ticket") {
            return Self::Message(line.to_string());
        }
        Self::parse_ticket(rest)
    }

    fn parse_ticket(rest: &str) -> Self {
        let parsed = split_word(rest).and_then(|(name, rest)| {
            let (email, rest) = split_word(rest)?;
            let (subject, message) = split_word(rest)?;
            let message = message.trim();
            (!message.is_empty()).then(|| NewTicket::new(name, email, subject, message))
        });

        match parsed {
            Some(ticket) => Self::Ticket(ticket),
            None => Self::InvalidTicket,
        }
    }
}

fn ticket_usage(lang: Language) -> &'static str {
    match lang {
        Language::Portuguese => "❌ Formato inválido. Use: ticket <nome> <email> <assunto> <mensagem>",
        Language::English => "❌ Invalid ticket format. Use: ticket <name> <email> <subject> <message>",
    }
}

fn goodbye(lang: Language) -> &'static str {
    match lang {
        Language::Portuguese => "👋 Obrigado por usar o assistente editorial! Até logo!",
        Language::English => "👋 Thank you for using the editorial assistant! Goodbye!",
    }
}

/// Executa o loop até `quit` ou fim da entrada.
///
/// Retorna quantas mensagens foram enviadas ao assistente.
pub async fn run_repl<R, W>(
    assistant: &EditorialAssistant,
    input: R,
    mut output: W,
) -> std::io::Result<usize>
where
    R: BufRead,
    W: Write,
{
    let default_lang = assistant.default_language();
    let mut session_id: Option<String> = None;
    let mut processed = 0usize;

    writeln!(output, "{}", responses::welcome(default_lang))?;

    let mut lines = input.lines();
    loop {
        write!(output, "{}", PROMPT)?;
        output.flush()?;

        let Some(line) = lines.next() else {
            writeln!(output)?;
            break;
        };
        let line = line?;

        match ReplCommand::parse(&line) {
            ReplCommand::Empty => continue,
            ReplCommand::Help => writeln!(output, "\n{}", responses::help(default_lang))?,
            ReplCommand::Quit => {
                writeln!(output, "\n{}", goodbye(default_lang))?;
                break;
            }
            ReplCommand::InvalidTicket => writeln!(output, "\n{}", ticket_usage(default_lang))?,
            ReplCommand::Ticket(request) => {
                let lang = detect_language(&request.message).unwrap_or(default_lang);
                let text = match assistant.create_ticket(request) {
                    Ok(ticket) => responses::ticket_created(&ticket, lang),
                    Err(e) => {
                        log::warn!("⚠️ Ticket recusado: {}", e);
                        responses::ticket_failed(&e.to_string(), lang)
                    }
                };
                writeln!(output, "\n🤖 {}", text)?;
            }
            ReplCommand::Message(message) => {
                let reply = assistant.process(&message, session_id.as_deref()).await;
                session_id = Some(reply.session_id);
                processed += 1;
                writeln!(output, "\n🤖 {}", reply.response)?;
            }
        }
    }

    Ok(processed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{sample_books, StaticCatalog};
    use crate::intent::IntentClassifier;
    use crate::session::{SessionConfig, SessionManager};
    use crate::tickets::{MemoryTicketStore, TicketStore};
    use crate::tools::EditorialTools;
    use std::sync::Arc;

    #[test]
    fn test_parse_commands() {
        assert_eq!(ReplCommand::parse("   "), ReplCommand::Empty);
        assert_eq!(ReplCommand::parse("HELP"), ReplCommand::Help);
        assert_eq!(ReplCommand::parse("sair"), ReplCommand::Quit);
        assert_eq!(ReplCommand::parse("bye"), ReplCommand::Quit);
        assert_eq!(
            ReplCommand::parse("Tell me about A Abelha"),
            ReplCommand::Message("Tell me about A Abelha".into())
        );
        // "tickets" não é o comando
        assert!(matches!(
            ReplCommand::parse("tickets are slow"),
            ReplCommand::Message(_)
        ));
    }

    #[test]
    fn test_parse_ticket_keeps_message_spaces() {
        let parsed = ReplCommand::parse("ticket Ana a@x.com Entrega  meu   pedido não chegou");
        assert_eq!(
            parsed,
            ReplCommand::Ticket(NewTicket::new(
                "Ana",
                "a@x.com",
                "Entrega",
                "meu   pedido não chegou"
            ))
        );
    }

    #[test]
    fn test_parse_incomplete_ticket() {
        assert_eq!(ReplCommand::parse("ticket"), ReplCommand::InvalidTicket);
        assert_eq!(
            ReplCommand::parse("ticket Ana a@x.com Assunto"),
            ReplCommand::InvalidTicket
        );
    }

    fn assistant(tickets: Arc<MemoryTicketStore>) -> EditorialAssistant {
        EditorialAssistant::new(
            EditorialTools::new(Arc::new(StaticCatalog::new(sample_books())), tickets),
            IntentClassifier::new(),
            Arc::new(SessionManager::new(SessionConfig::for_tests())),
        )
    }

    #[tokio::test]
    async fn test_repl_session() {
        let tickets = Arc::new(MemoryTicketStore::new());
        let assistant = assistant(tickets.clone());
        let input = "\nTell me about A Abelha\nWhere can I buy it?\nticket Ana a@x.com S M\nquit\nignored after quit\n";
        let mut output = Vec::new();

        let processed = run_repl(&assistant, input.as_bytes(), &mut output)
            .await
            .unwrap();
        let text = String::from_utf8(output).unwrap();

        assert_eq!(processed, 2);
        assert!(text.contains("Cristovão Tezza"));
        assert!(text.contains("Where to buy 'A Abelha'"));
        assert!(text.contains("**Mensagem:** M") || text.contains("**Message:** M"));
        assert!(text.contains("Até logo"));
        assert_eq!(tickets.list().unwrap().len(), 1);
        // As duas perguntas compartilham a sessão
        assert_eq!(assistant.sessions().len(), 1);
    }

    #[tokio::test]
    async fn test_repl_stops_at_eof() {
        let assistant = assistant(Arc::new(MemoryTicketStore::new()));
        let mut output = Vec::new();
        let processed = run_repl(&assistant, "help\n".as_bytes(), &mut output)
            .await
            .unwrap();
        assert_eq!(processed, 0);
        assert!(String::from_utf8(output).unwrap().contains("Posso ajudar"));
    }
}
