//! Benchmarks das regras de interpretação de mensagens.
//!
//! Testa performance de:
//! - Classificação de intenção (com e sem contexto)
//! - Extração de título e cidade
//! - Relatório estatístico sobre o catálogo de demonstração
//!
//! Executar: `cargo bench --bench intent_bench`

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use editorial_assistant::analytics::{CatalogReport, ReportKind};
use editorial_assistant::catalog::{Catalog, CatalogSource, JsonCatalogFile};
use editorial_assistant::extract::{extract_city, extract_title};
use editorial_assistant::intent::IntentClassifier;
use editorial_assistant::language::detect_language;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// HELPERS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

const MESSAGES: &[(&str, &str)] = &[
    ("book_en", "Tell me about A Abelha"),
    ("book_pt", "Quero saber sobre O Príncipe da Pérsia"),
    ("store_en", "Where can I buy A Baleia-azul in São Paulo?"),
    ("store_pt", "Onde posso comprar Cartas para Amanhã em Brasília?"),
    ("support", "Meu pedido chegou com defeito, preciso de ajuda"),
    ("analytics", "Show me the catalog statistics by author"),
    ("unknown", "bom dia, tudo bem?"),
];

fn demo_catalog() -> Catalog {
    let path = std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("data/mock_catalog.json");
    JsonCatalogFile::new(path).load().unwrap_or_default()
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// BENCHMARK: Classificação
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

fn bench_classify(c: &mut Criterion) {
    let classifier = IntentClassifier::new();
    let mut group = c.benchmark_group("classify");
    group.throughput(Throughput::Elements(1));

    for (name, message) in MESSAGES {
        group.bench_with_input(BenchmarkId::from_parameter(name), message, |bencher, msg| {
            bencher.iter(|| black_box(classifier.classify(black_box(msg))))
        });
    }

    group.bench_function("detect_language", |bencher| {
        bencher.iter(|| {
            for (_, message) in MESSAGES {
                black_box(detect_language(black_box(message)));
            }
        })
    });

    group.finish();
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// BENCHMARK: Extração
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

fn bench_extract(c: &mut Criterion) {
    let catalog = demo_catalog();
    let mut group = c.benchmark_group("extract");

    for (name, message) in MESSAGES {
        group.bench_with_input(BenchmarkId::new("title", name), message, |bencher, msg| {
            bencher.iter(|| black_box(extract_title(black_box(msg), &catalog)))
        });
    }

    group.bench_function("city_with_catalog", |bencher| {
        bencher.iter(|| {
            black_box(extract_city(
                black_box("Onde posso comprar Cartas para Amanhã em Brasília?"),
                Some(&catalog),
            ))
        })
    });

    group.finish();
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// BENCHMARK: Relatório
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

fn bench_report(c: &mut Criterion) {
    let catalog = demo_catalog();

    c.bench_function("report_comprehensive", |bencher| {
        bencher.iter(|| black_box(CatalogReport::build(&catalog, ReportKind::Comprehensive)))
    });
}

criterion_group!(benches, bench_classify, bench_extract, bench_report);
criterion_main!(benches);
