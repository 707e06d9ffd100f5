// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// EDITORIAL ASSISTANT CLI
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//
// CLI do assistente editorial.
//
// Uso:
//   editorial-assistant-cli                          (modo interativo)
//   editorial-assistant-cli "Onde comprar A Abelha?" (pergunta única)
//   editorial-assistant-cli --server --port=8000     (API HTTP)
//   editorial-assistant-cli --validate               (valida o catálogo)
//   editorial-assistant-cli --analytics market       (relatório no terminal)
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

use editorial_assistant::prelude::*;
use editorial_assistant::{install_panic_hook, repl};
use std::path::PathBuf;

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 8000;

/// Tenta carregar o arquivo .env de múltiplos locais possíveis
fn load_dotenv() {
    let possible_paths = [
        // Diretório atual
        PathBuf::from(".env"),
        // Diretório pai
        PathBuf::from("../.env"),
        // Diretório do crate (ao rodar de outro lugar com cargo run)
        PathBuf::from(env!("CARGO_MANIFEST_DIR")).join(".env"),
    ];

    for path in &possible_paths {
        if path.exists() {
            match dotenvy::from_path(path) {
                Ok(_) => {
                    eprintln!(
                        "✓ Carregado .env de: {:?}",
                        path.canonicalize().unwrap_or(path.clone())
                    );
                    return;
                }
                Err(e) => {
                    eprintln!("⚠ Erro ao carregar {:?}: {}", path, e);
                }
            }
        }
    }
    // Sem .env: apenas variáveis do ambiente (GEMINI_API_KEY é opcional)
}

/// Modo de execução escolhido pelos argumentos
enum Mode {
    Interactive,
    Server {
        host: String,
        port: u16,
        secret: Option<String>,
    },
    Validate,
    Analytics(Option<String>),
    Question(String),
    Usage,
}

fn parse_args(args: &[String]) -> Mode {
    let Some(first) = args.first() else {
        return Mode::Interactive;
    };

    match first.as_str() {
        "--help" | "-h" => Mode::Usage,
        "--validate" => Mode::Validate,
        "--analytics" => Mode::Analytics(args.get(1).cloned()),
        "--server" => {
            let mut host = DEFAULT_HOST.to_string();
            let mut port = DEFAULT_PORT;
            let mut secret = None;
            for arg in &args[1..] {
                if let Some(value) = arg.strip_prefix("--port=") {
                    match value.parse() {
                        Ok(p) => port = p,
                        Err(_) => eprintln!("⚠ Porta inválida '{}', usando {}", value, port),
                    }
                } else if let Some(value) = arg.strip_prefix("--host=") {
                    host = value.to_string();
                } else if let Some(value) = arg.strip_prefix("--secret=") {
                    secret = Some(value.to_string());
                } else {
                    eprintln!("⚠ Argumento ignorado: {}", arg);
                }
            }
            Mode::Server { host, port, secret }
        }
        _ => Mode::Question(args.join(" ")),
    }
}

fn print_usage(program: &str) {
    eprintln!("Editorial Assistant CLI v{}", editorial_assistant::VERSION);
    eprintln!();
    eprintln!("Uso: {} [opções] [pergunta]", program);
    eprintln!();
    eprintln!("Opções:");
    eprintln!("  (sem argumentos)      Modo interativo");
    eprintln!("  --server              API HTTP (--port=N --host=H --secret=S)");
    eprintln!("  --validate            Valida o catálogo (código 1 se houver problemas)");
    eprintln!("  --analytics [tipo]    Relatório: comprehensive, publications, authors, imprints, market");
    eprintln!();
    eprintln!("Exemplos:");
    eprintln!("  {} \"Onde comprar A Abelha em São Paulo?\"", program);
    eprintln!("  {} --server --port=8000", program);
}

/// Registra no log os problemas do catálogo encontrados na partida
fn log_catalog_health(assistant: &EditorialAssistant) {
    match assistant.validate_catalog() {
        Ok(issues) if issues.is_empty() => log::info!("✅ Catálogo validado sem problemas"),
        Ok(issues) => {
            for issue in &issues {
                log::warn!("⚠️ Catálogo: {}", issue);
            }
        }
        Err(e) => log::error!("❌ Catálogo indisponível: {}", e),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Carregar .env PRIMEIRO, antes de qualquer coisa
    load_dotenv();

    // Inicializar logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    install_panic_hook();

    let args: Vec<String> = std::env::args().collect();
    let program = args.first().map(String::as_str).unwrap_or("editorial-assistant-cli");
    let mode = parse_args(args.get(1..).unwrap_or_default());

    if let Mode::Usage = mode {
        print_usage(program);
        return Ok(());
    }

    let config = load_assistant_config();
    let assistant = EditorialAssistant::from_config(&config);

    match mode {
        Mode::Usage => Ok(()),
        Mode::Validate => run_validate(&assistant),
        Mode::Analytics(kind) => run_analytics(&assistant, kind.as_deref()),
        Mode::Question(question) => {
            log_catalog_health(&assistant);
            let reply = assistant.process(&question, None).await;
            println!("{}", reply.response);
            Ok(())
        }
        Mode::Interactive => {
            log_catalog_health(&assistant);
            let stdin = std::io::stdin();
            let stdout = std::io::stdout();
            let processed = repl::run_repl(&assistant, stdin.lock(), stdout.lock()).await?;
            log::info!("👋 Sessão interativa encerrada ({} mensagens)", processed);
            Ok(())
        }
        Mode::Server { host, port, secret } => {
            log_catalog_health(&assistant);
            run_server(assistant, &host, port, secret.or(config.server_secret)).await
        }
    }
}

fn run_validate(assistant: &EditorialAssistant) -> anyhow::Result<()> {
    let issues = assistant.validate_catalog()?;

    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!(" VALIDAÇÃO DO CATÁLOGO");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

    if issues.is_empty() {
        println!("✅ Nenhum problema encontrado");
        return Ok(());
    }

    for issue in &issues {
        println!("  • {}", issue);
    }
    println!();
    println!("❌ {} problema(s) encontrado(s)", issues.len());
    std::process::exit(1);
}

fn run_analytics(assistant: &EditorialAssistant, kind: Option<&str>) -> anyhow::Result<()> {
    let kind = match kind {
        None => ReportKind::default(),
        Some(label) => ReportKind::from_label(label)
            .ok_or_else(|| anyhow::anyhow!("Tipo de relatório desconhecido: {}", label))?,
    };

    let report = editorial_assistant::timed!("catalog_report", assistant.report(kind))?;
    println!("{}", report.render(assistant.default_language()));
    Ok(())
}

#[cfg(feature = "server")]
async fn run_server(
    assistant: EditorialAssistant,
    host: &str,
    port: u16,
    secret: Option<String>,
) -> anyhow::Result<()> {
    use editorial_assistant::server::{start_server, AppState};
    use std::sync::Arc;

    let addr: std::net::SocketAddr = format!("{}:{}", host, port).parse()?;

    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!(" EDITORIAL ASSISTANT API v{}", editorial_assistant::VERSION);
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!("Endereço: http://{}", addr);
    println!("Autenticação: {}", if secret.is_some() { "Bearer" } else { "desativada" });
    println!();

    let state = Arc::new(AppState {
        assistant: Arc::new(assistant),
        secret,
    });
    start_server(addr, state).await
}

#[cfg(not(feature = "server"))]
async fn run_server(
    _assistant: EditorialAssistant,
    _host: &str,
    _port: u16,
    _secret: Option<String>,
) -> anyhow::Result<()> {
    anyhow::bail!("Servidor HTTP indisponível: compile com a feature `server`")
}
