// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// ANALYTICS (BUSINESS INTELLIGENCE)
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//
// Estatísticas descritivas sobre o catálogo:
// - `stats`: fórmulas puras (média, variância, Gini, Shannon, HHI...)
// - `report`: agregação por ano/autor/selo/cidade e renderização
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

pub mod report;
pub mod stats;

pub use report::{
    CatalogReport, DistributionStats, MarketStats, NamedCount, Overview, PublicationStats,
    ReportKind, YearCount,
};
pub use stats::{BalanceLevel, ConcentrationLevel};
