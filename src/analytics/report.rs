// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// RELATÓRIO DO CATÁLOGO
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//
// Agrega o catálogo em contagens (ano, autor, selo, cidade) e aplica as
// fórmulas de `stats`. O relatório serializa em JSON e renderiza em texto.
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use std::fmt::Write as _;

use super::stats::{self, BalanceLevel, ConcentrationLevel};
use crate::catalog::Catalog;
use crate::types::{Book, Language};
use crate::utils::{contains_phrase, normalize_for_match};

/// Quantas entradas aparecem nos rankings do texto
const TOP_N: usize = 3;

/// Recorte do relatório
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportKind {
    /// Todas as seções
    #[default]
    Comprehensive,
    /// Lançamentos por ano
    Publications,
    /// Distribuição por autor
    Authors,
    /// Participação dos selos editoriais
    Imprints,
    /// Distribuição geográfica e online
    Market,
}

impl ReportKind {
    /// Converte rótulo da API/CLI (`"authors"`, `"market"`...)
    pub fn from_label(label: &str) -> Option<Self> {
        match normalize_for_match(label).as_str() {
            "" | "comprehensive" | "all" | "completo" => Some(Self::Comprehensive),
            "publications" | "publication" | "publicacoes" | "years" => Some(Self::Publications),
            "authors" | "author" | "autores" => Some(Self::Authors),
            "imprints" | "imprint" | "publishers" | "editoras" | "selos" => Some(Self::Imprints),
            "market" | "mercado" | "stores" | "lojas" => Some(Self::Market),
            _ => None,
        }
    }

    /// Detecta o recorte pedido numa mensagem livre; sem pistas, relatório completo
    pub fn detect(text: &str) -> Self {
        let text = normalize_for_match(text);
        let by_year = ["year", "years", "ano", "anos"]
            .iter()
            .any(|w| contains_phrase(&text, w));

        if by_year || has_word_prefix(&text, &["publica", "lancamento"]) {
            Self::Publications
        } else if has_word_prefix(&text, &["author", "autor"]) {
            Self::Authors
        } else if has_word_prefix(&text, &["imprint", "publisher", "editora", "selo"]) {
            Self::Imprints
        } else if has_word_prefix(&text, &["market", "mercado", "store", "loja", "cidade", "city", "cities"]) {
            Self::Market
        } else {
            Self::Comprehensive
        }
    }

    /// Rótulo estável
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Comprehensive => "comprehensive",
            Self::Publications => "publications",
            Self::Authors => "authors",
            Self::Imprints => "imprints",
            Self::Market => "market",
        }
    }

    fn includes(&self, section: ReportKind) -> bool {
        *self == Self::Comprehensive || *self == section
    }
}

fn has_word_prefix(text: &str, prefixes: &[&str]) -> bool {
    text.split_whitespace()
        .any(|word| prefixes.iter().any(|p| word.starts_with(p)))
}

// ─────────────────────────────────────────────────
// Seções
// ─────────────────────────────────────────────────

/// Contagem nomeada com participação no total
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NamedCount {
    /// Autor, selo, cidade ou loja
    pub name: String,
    /// Número de livros
    pub count: usize,
    /// Fração do total (0..1)
    pub share: f64,
}

/// Livros lançados em um ano
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct YearCount {
    /// Ano
    pub year: i32,
    /// Lançamentos
    pub count: usize,
}

/// Visão geral do catálogo
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Overview {
    /// Livros no catálogo
    pub total_books: usize,
    /// Autores distintos
    pub total_authors: usize,
    /// Selos distintos
    pub total_imprints: usize,
    /// Cidades com loja física
    pub total_cities: usize,
    /// Percentual de campos preenchidos (0..100)
    pub completeness_pct: f64,
    /// Tamanho médio da sinopse em caracteres
    pub synopsis_mean_chars: Option<f64>,
    /// Coeficiente de variação do tamanho da sinopse
    pub synopsis_cv: Option<f64>,
}

/// Estatísticas de lançamentos
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PublicationStats {
    /// Livros com data válida
    pub dated_books: usize,
    /// Lançamento mais antigo (DD/MM/YYYY)
    pub earliest: Option<String>,
    /// Lançamento mais recente (DD/MM/YYYY)
    pub latest: Option<String>,
    /// Dias entre o primeiro e o último lançamento
    pub span_days: Option<i64>,
    /// Intervalo médio entre lançamentos consecutivos
    pub mean_interval_days: Option<f64>,
    /// Média dos anos de lançamento
    pub mean_year: Option<f64>,
    /// Mediana dos anos
    pub median_year: Option<f64>,
    /// Ano com mais lançamentos
    pub mode_year: Option<i64>,
    /// Variância amostral dos anos
    pub year_variance: Option<f64>,
    /// Desvio padrão amostral dos anos
    pub year_std_dev: Option<f64>,
    /// Lançamentos por ano, em ordem crescente
    pub books_per_year: Vec<YearCount>,
    /// Mês (1..12) com mais lançamentos
    pub peak_month: Option<u32>,
}

/// Distribuição de livros por categoria (autor ou selo)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DistributionStats {
    /// Categorias distintas
    pub categories: usize,
    /// Contagens ordenadas (maior primeiro, empate por nome)
    pub counts: Vec<NamedCount>,
    /// Média de livros por categoria
    pub mean_per_category: Option<f64>,
    /// Coeficiente de Gini das contagens
    pub gini: f64,
    /// Classificação do Gini
    pub balance: BalanceLevel,
    /// Entropia de Shannon (nats)
    pub entropy: f64,
    /// Equitabilidade de Pielou
    pub evenness: f64,
    /// Herfindahl-Hirschman (0..1)
    pub hhi: f64,
    /// Classificação do HHI
    pub concentration: ConcentrationLevel,
    /// Participação das 3 maiores
    pub cr3: f64,
    /// 1 / HHI
    pub effective_competitors: Option<f64>,
}

/// Distribuição geográfica e online
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MarketStats {
    /// Cidades com pelo menos uma loja física
    pub physical_cities: usize,
    /// Livros disponíveis por cidade
    pub books_per_city: Vec<NamedCount>,
    /// Livros vendidos online
    pub online_books: usize,
    /// Percentual do catálogo vendido online
    pub online_coverage_pct: f64,
    /// Livros por loja online
    pub online_stores: Vec<NamedCount>,
    /// Gini dos livros por cidade
    pub gini: f64,
    /// Classificação do Gini
    pub balance: BalanceLevel,
    /// HHI dos livros por cidade
    pub hhi: f64,
    /// Classificação do HHI
    pub concentration: ConcentrationLevel,
    /// Participação das 3 maiores cidades
    pub cr3: f64,
    /// Correlação entre ano de lançamento e número de localizações
    pub year_reach_correlation: Option<f64>,
}

/// Relatório estatístico completo ou parcial
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CatalogReport {
    /// Recorte calculado
    pub kind: ReportKind,
    /// Momento do cálculo
    pub generated_at: DateTime<Utc>,
    /// Visão geral (sempre presente)
    pub overview: Overview,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub publications: Option<PublicationStats>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub authors: Option<DistributionStats>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub imprints: Option<DistributionStats>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub market: Option<MarketStats>,
}

// ─────────────────────────────────────────────────
// Construção
// ─────────────────────────────────────────────────

impl CatalogReport {
    /// Calcula o relatório pedido sobre o catálogo
    pub fn build(catalog: &Catalog, kind: ReportKind) -> Self {
        let books = &catalog.books;
        Self {
            kind,
            generated_at: Utc::now(),
            overview: overview(books),
            publications: kind
                .includes(ReportKind::Publications)
                .then(|| publications(books)),
            authors: kind
                .includes(ReportKind::Authors)
                .then(|| distribution(books.iter().map(|b| b.author.as_str()))),
            imprints: kind
                .includes(ReportKind::Imprints)
                .then(|| distribution(books.iter().map(|b| b.imprint.as_str()))),
            market: kind.includes(ReportKind::Market).then(|| market(books)),
        }
    }
}

/// Conta ocorrências por nome, ignorando vazios; ordenado por contagem desc, nome asc
fn tally<'a>(names: impl Iterator<Item = &'a str>) -> Vec<NamedCount> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for name in names.map(str::trim).filter(|n| !n.is_empty()) {
        *counts.entry(name).or_default() += 1;
    }
    let total: usize = counts.values().sum();

    let mut tallied: Vec<NamedCount> = counts
        .into_iter()
        .map(|(name, count)| NamedCount {
            name: name.to_string(),
            count,
            share: if total > 0 {
                count as f64 / total as f64
            } else {
                0.0
            },
        })
        .collect();
    tallied.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.name.cmp(&b.name)));
    tallied
}

fn as_f64(counts: &[NamedCount]) -> Vec<f64> {
    counts.iter().map(|c| c.count as f64).collect()
}

fn overview(books: &[Book]) -> Overview {
    let authors = tally(books.iter().map(|b| b.author.as_str()));
    let imprints = tally(books.iter().map(|b| b.imprint.as_str()));
    let cities = tally(
        books
            .iter()
            .flat_map(|b| b.availability.physical().map(|l| l.location.as_str())),
    );

    let filled: usize = books
        .iter()
        .map(|b| {
            [
                !b.title.trim().is_empty(),
                !b.author.trim().is_empty(),
                !b.imprint.trim().is_empty(),
                b.release_date_parsed().is_some(),
                !b.synopsis.trim().is_empty(),
                !b.availability.is_empty(),
            ]
            .iter()
            .filter(|ok| **ok)
            .count()
        })
        .sum();
    let completeness_pct = if books.is_empty() {
        0.0
    } else {
        filled as f64 * 100.0 / (books.len() * 6) as f64
    };

    let synopsis_lengths: Vec<f64> = books
        .iter()
        .filter(|b| !b.synopsis.trim().is_empty())
        .map(|b| b.synopsis.chars().count() as f64)
        .collect();

    Overview {
        total_books: books.len(),
        total_authors: authors.len(),
        total_imprints: imprints.len(),
        total_cities: cities.len(),
        completeness_pct,
        synopsis_mean_chars: stats::mean(&synopsis_lengths),
        synopsis_cv: stats::coefficient_of_variation(&synopsis_lengths),
    }
}

fn publications(books: &[Book]) -> PublicationStats {
    let mut dates: Vec<NaiveDate> = books.iter().filter_map(Book::release_date_parsed).collect();
    dates.sort();

    let years: Vec<f64> = dates.iter().map(|d| d.year() as f64).collect();
    let years_i64: Vec<i64> = dates.iter().map(|d| d.year() as i64).collect();

    let mut per_year: BTreeMap<i32, usize> = BTreeMap::new();
    let mut per_month: BTreeMap<u32, usize> = BTreeMap::new();
    for date in &dates {
        *per_year.entry(date.year()).or_default() += 1;
        *per_month.entry(date.month()).or_default() += 1;
    }

    let intervals: Vec<f64> = dates
        .windows(2)
        .map(|w| (w[1] - w[0]).num_days() as f64)
        .collect();

    let format = |d: &NaiveDate| d.format(crate::types::RELEASE_DATE_FORMAT).to_string();

    PublicationStats {
        dated_books: dates.len(),
        earliest: dates.first().map(format),
        latest: dates.last().map(format),
        span_days: match (dates.first(), dates.last()) {
            (Some(first), Some(last)) => Some((*last - *first).num_days()),
            _ => None,
        },
        mean_interval_days: stats::mean(&intervals),
        mean_year: stats::mean(&years),
        median_year: stats::median(&years),
        mode_year: stats::mode(&years_i64),
        year_variance: stats::variance(&years),
        year_std_dev: stats::std_dev(&years),
        books_per_year: per_year
            .into_iter()
            .map(|(year, count)| YearCount { year, count })
            .collect(),
        // Em empate, o primeiro mês do ano
        peak_month: per_month
            .into_iter()
            .rev()
            .max_by_key(|(_, count)| *count)
            .map(|(month, _)| month),
    }
}

fn distribution<'a>(names: impl Iterator<Item = &'a str>) -> DistributionStats {
    let counts = tally(names);
    let values = as_f64(&counts);
    let gini = stats::gini(&values);
    let hhi = stats::hhi(&values);

    DistributionStats {
        categories: counts.len(),
        mean_per_category: stats::mean(&values),
        gini,
        balance: BalanceLevel::from_gini(gini),
        entropy: stats::shannon_entropy(&values),
        evenness: stats::evenness(&values),
        hhi,
        concentration: ConcentrationLevel::from_hhi(hhi),
        cr3: stats::concentration_ratio(&values, 3),
        effective_competitors: stats::effective_competitors(hhi),
        counts,
    }
}

fn market(books: &[Book]) -> MarketStats {
    let per_city = tally(
        books
            .iter()
            .flat_map(|b| b.availability.physical().map(|l| l.location.as_str())),
    );
    let online_stores = tally(
        books
            .iter()
            .filter_map(|b| b.availability.online())
            .flat_map(|l| l.stores.iter().map(String::as_str)),
    );
    let online_books = books
        .iter()
        .filter(|b| b.availability.online().is_some())
        .count();

    let values = as_f64(&per_city);
    let gini = stats::gini(&values);
    let hhi = stats::hhi(&values);

    let (years, reach): (Vec<f64>, Vec<f64>) = books
        .iter()
        .filter_map(|b| {
            b.release_year()
                .map(|y| (y as f64, b.availability.len() as f64))
        })
        .unzip();

    MarketStats {
        physical_cities: per_city.len(),
        online_books,
        online_coverage_pct: if books.is_empty() {
            0.0
        } else {
            online_books as f64 * 100.0 / books.len() as f64
        },
        online_stores,
        gini,
        balance: BalanceLevel::from_gini(gini),
        hhi,
        concentration: ConcentrationLevel::from_hhi(hhi),
        cr3: stats::concentration_ratio(&values, 3),
        year_reach_correlation: stats::pearson(&years, &reach),
        books_per_city: per_city,
    }
}

// ─────────────────────────────────────────────────
// Texto
// ─────────────────────────────────────────────────

fn opt(value: Option<f64>, decimals: usize) -> String {
    match value {
        Some(v) => format!("{:.*}", decimals, v),
        None => "-".to_string(),
    }
}

fn top_list(counts: &[NamedCount]) -> String {
    counts
        .iter()
        .take(TOP_N)
        .map(|c| format!("{} ({}, {:.1}%)", c.name, c.count, c.share * 100.0))
        .collect::<Vec<_>>()
        .join(", ")
}

impl CatalogReport {
    /// Renderiza o relatório como texto multi-linha no idioma pedido
    pub fn render(&self, lang: Language) -> String {
        let pt = lang == Language::Portuguese;
        let t = |pt_text: &'static str, en_text: &'static str| if pt { pt_text } else { en_text };
        let mut out = String::new();

        let o = &self.overview;
        let _ = writeln!(out, "📊 {}", t("Relatório do catálogo", "Catalog report"));
        let _ = writeln!(out, "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
        let _ = writeln!(out, "{}: {}", t("Livros", "Books"), o.total_books);
        let _ = writeln!(out, "{}: {}", t("Autores", "Authors"), o.total_authors);
        let _ = writeln!(out, "{}: {}", t("Selos editoriais", "Imprints"), o.total_imprints);
        let _ = writeln!(out, "{}: {}", t("Cidades com loja física", "Cities with physical stores"), o.total_cities);
        let _ = writeln!(out, "{}: {:.1}%", t("Completude dos dados", "Data completeness"), o.completeness_pct);
        let _ = writeln!(
            out,
            "{}: {} {} (CV {})",
            t("Sinopse média", "Average synopsis"),
            opt(o.synopsis_mean_chars, 0),
            t("caracteres", "characters"),
            opt(o.synopsis_cv, 2)
        );

        if let Some(p) = &self.publications {
            let _ = writeln!(out);
            let _ = writeln!(out, "📅 {}", t("Lançamentos", "Publications"));
            let _ = writeln!(out, "{}: {}", t("Livros com data válida", "Books with a valid date"), p.dated_books);
            if let (Some(first), Some(last)) = (&p.earliest, &p.latest) {
                let _ = writeln!(
                    out,
                    "{}: {} → {} ({} {})",
                    t("Período", "Range"),
                    first,
                    last,
                    p.span_days.unwrap_or(0),
                    t("dias", "days")
                );
            }
            let _ = writeln!(
                out,
                "{}: {} | {}: {} | {}: {}",
                t("Ano médio", "Mean year"),
                opt(p.mean_year, 1),
                t("Mediana", "Median"),
                opt(p.median_year, 1),
                t("Desvio padrão", "Std dev"),
                opt(p.year_std_dev, 2)
            );
            let per_year = p
                .books_per_year
                .iter()
                .map(|y| format!("{}: {}", y.year, y.count))
                .collect::<Vec<_>>()
                .join(", ");
            let _ = writeln!(out, "{}: {}", t("Por ano", "Per year"), per_year);
            if let Some(month) = p.peak_month {
                let _ = writeln!(out, "{}: {}", t("Mês com mais lançamentos", "Peak month"), month);
            }
        }

        if let Some(a) = &self.authors {
            let _ = writeln!(out);
            let _ = writeln!(out, "✍️ {}", t("Autores", "Authors"));
            let _ = writeln!(out, "{}: {}", t("Principais", "Top"), top_list(&a.counts));
            let _ = writeln!(
                out,
                "{}: {}",
                t("Livros por autor", "Books per author"),
                opt(a.mean_per_category, 2)
            );
            let _ = writeln!(out, "Gini: {:.3} ({})", a.gini, a.balance.label(lang));
            let _ = writeln!(
                out,
                "{}: {:.3} | {}: {:.3}",
                t("Entropia", "Entropy"),
                a.entropy,
                t("Equitabilidade", "Evenness"),
                a.evenness
            );
        }

        if let Some(i) = &self.imprints {
            let _ = writeln!(out);
            let _ = writeln!(out, "🏷️ {}", t("Selos editoriais", "Imprints"));
            let _ = writeln!(out, "{}: {}", t("Participação", "Market share"), top_list(&i.counts));
            let _ = writeln!(out, "HHI: {:.3} ({})", i.hhi, i.concentration.label(lang));
            let _ = writeln!(out, "CR3: {:.1}%", i.cr3 * 100.0);
            let _ = writeln!(
                out,
                "{}: {}",
                t("Competidores efetivos", "Effective competitors"),
                opt(i.effective_competitors, 2)
            );
            let _ = writeln!(out, "{}: {:.3}", t("Entropia", "Entropy"), i.entropy);
        }

        if let Some(m) = &self.market {
            let _ = writeln!(out);
            let _ = writeln!(out, "🏬 {}", t("Mercado", "Market"));
            let _ = writeln!(
                out,
                "{}: {}",
                t("Livros por cidade", "Books per city"),
                top_list(&m.books_per_city)
            );
            let _ = writeln!(
                out,
                "{}: {}/{} ({:.1}%)",
                t("Cobertura online", "Online coverage"),
                m.online_books,
                o.total_books,
                m.online_coverage_pct
            );
            if !m.online_stores.is_empty() {
                let _ = writeln!(out, "{}: {}", t("Lojas online", "Online stores"), top_list(&m.online_stores));
            }
            let _ = writeln!(out, "Gini: {:.3} ({})", m.gini, m.balance.label(lang));
            let _ = writeln!(out, "CR3: {:.1}%", m.cr3 * 100.0);
        }

        out.trim_end().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::sample_books;

    fn report(kind: ReportKind) -> CatalogReport {
        CatalogReport::build(&Catalog::new(sample_books()), kind)
    }

    #[test]
    fn test_kind_detection() {
        assert_eq!(ReportKind::detect("análise de publicações"), ReportKind::Publications);
        assert_eq!(ReportKind::detect("books per year statistics"), ReportKind::Publications);
        assert_eq!(ReportKind::detect("author statistics"), ReportKind::Authors);
        assert_eq!(ReportKind::detect("estatísticas das editoras"), ReportKind::Imprints);
        assert_eq!(ReportKind::detect("market analysis"), ReportKind::Market);
        assert_eq!(ReportKind::detect("relatório geral"), ReportKind::Comprehensive);
    }

    #[test]
    fn test_kind_from_label() {
        assert_eq!(ReportKind::from_label("Authors"), Some(ReportKind::Authors));
        assert_eq!(ReportKind::from_label(""), Some(ReportKind::Comprehensive));
        assert_eq!(ReportKind::from_label("weather"), None);
    }

    #[test]
    fn test_comprehensive_includes_every_section() {
        let r = report(ReportKind::Comprehensive);
        assert!(r.publications.is_some());
        assert!(r.authors.is_some());
        assert!(r.imprints.is_some());
        assert!(r.market.is_some());
        assert_eq!(r.overview.total_books, 4);
        assert_eq!(r.overview.total_authors, 3);
        assert_eq!(r.overview.total_imprints, 3);
        assert!((r.overview.completeness_pct - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_partial_report_only_has_requested_section() {
        let r = report(ReportKind::Authors);
        assert!(r.authors.is_some());
        assert!(r.publications.is_none());
        assert!(r.market.is_none());

        let json = serde_json::to_value(&r).unwrap();
        assert_eq!(json["kind"], "authors");
        assert!(json.get("market").is_none());
    }

    #[test]
    fn test_publication_stats() {
        let p = report(ReportKind::Publications).publications.unwrap();
        assert_eq!(p.dated_books, 4);
        assert_eq!(p.earliest.as_deref(), Some("21/04/2019"));
        assert_eq!(p.latest.as_deref(), Some("10/11/2022"));
        assert_eq!(p.books_per_year.len(), 4);
        assert_eq!(p.mean_year, Some(2020.5));
    }

    #[test]
    fn test_author_distribution() {
        let a = report(ReportKind::Authors).authors.unwrap();
        assert_eq!(a.categories, 3);
        assert_eq!(a.counts[0].name, "Cristovão Tezza");
        assert_eq!(a.counts[0].count, 2);
        assert!((a.counts[0].share - 0.5).abs() < 1e-9);
        assert!(a.gini > 0.0);
        assert!(a.evenness > 0.0 && a.evenness < 1.0);
    }

    #[test]
    fn test_imprint_concentration() {
        let i = report(ReportKind::Imprints).imprints.unwrap();
        // Participações 0.5, 0.25, 0.25
        assert!((i.hhi - 0.375).abs() < 1e-9);
        assert_eq!(i.concentration, ConcentrationLevel::High);
        assert!((i.cr3 - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_market_stats() {
        let m = report(ReportKind::Market).market.unwrap();
        assert_eq!(m.physical_cities, 3);
        assert_eq!(m.books_per_city[0].name, "São Paulo");
        assert_eq!(m.books_per_city[0].count, 2);
        assert_eq!(m.online_books, 3);
        assert!((m.online_coverage_pct - 75.0).abs() < 1e-9);
        assert_eq!(m.online_stores[0].name, "Amazon");
    }

    #[test]
    fn test_empty_catalog_has_no_nan() {
        let r = CatalogReport::build(&Catalog::default(), ReportKind::Comprehensive);
        let json = serde_json::to_string(&r).unwrap();
        assert!(!json.contains("NaN"));
        assert_eq!(r.overview.completeness_pct, 0.0);
        assert_eq!(r.market.unwrap().online_coverage_pct, 0.0);
    }

    #[test]
    fn test_render_is_localized() {
        let r = report(ReportKind::Comprehensive);
        let pt = r.render(Language::Portuguese);
        let en = r.render(Language::English);

        assert!(pt.contains("Relatório do catálogo"));
        assert!(pt.contains("Gini"));
        assert!(pt.contains("HHI"));
        assert!(en.contains("Catalog report"));
        assert!(en.contains("Entropy"));
        assert!(en.contains("Cristovão Tezza"));
    }
}
