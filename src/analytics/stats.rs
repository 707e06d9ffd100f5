// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// FÓRMULAS ESTATÍSTICAS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//
// Funções puras sobre contagens derivadas do catálogo. Toda divisão é
// protegida: entradas vazias ou somas nulas nunca geram NaN/inf.
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

use serde::Serialize;
use std::collections::BTreeMap;

use crate::types::Language;

/// Média aritmética
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        None
    } else {
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }
}

/// Mediana
pub fn median(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        Some((sorted[mid - 1] + sorted[mid]) / 2.0)
    } else {
        Some(sorted[mid])
    }
}

/// Moda (em empate, o menor valor)
pub fn mode(values: &[i64]) -> Option<i64> {
    let mut counts: BTreeMap<i64, usize> = BTreeMap::new();
    for v in values {
        *counts.entry(*v).or_default() += 1;
    }
    // BTreeMap itera em ordem crescente; max_by_key devolve o último máximo
    counts
        .into_iter()
        .rev()
        .max_by_key(|(_, count)| *count)
        .map(|(value, _)| value)
}

/// Variância amostral (n - 1); precisa de pelo menos 2 valores
pub fn variance(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let m = mean(values)?;
    let sum_sq: f64 = values.iter().map(|v| (v - m).powi(2)).sum();
    Some(sum_sq / (values.len() - 1) as f64)
}

/// Desvio padrão amostral
pub fn std_dev(values: &[f64]) -> Option<f64> {
    variance(values).map(f64::sqrt)
}

/// Coeficiente de variação (desvio / média)
pub fn coefficient_of_variation(values: &[f64]) -> Option<f64> {
    let m = mean(values)?;
    if m == 0.0 {
        return None;
    }
    std_dev(values).map(|sd| sd / m)
}

/// Coeficiente de Gini (0 = distribuição perfeitamente igual)
pub fn gini(values: &[f64]) -> f64 {
    let n = values.len();
    let total: f64 = values.iter().sum();
    if n == 0 || total <= 0.0 {
        return 0.0;
    }

    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));

    let weighted: f64 = sorted
        .iter()
        .enumerate()
        .map(|(i, v)| (2.0 * (i as f64 + 1.0) - n as f64 - 1.0) * v)
        .sum();

    weighted / (n as f64 * total)
}

fn shares(counts: &[f64]) -> Vec<f64> {
    let total: f64 = counts.iter().sum();
    if total <= 0.0 {
        return Vec::new();
    }
    counts.iter().map(|c| c / total).collect()
}

/// Entropia de Shannon em nats (log natural); categorias vazias são ignoradas
pub fn shannon_entropy(counts: &[f64]) -> f64 {
    shares(counts)
        .into_iter()
        .filter(|p| *p > 0.0)
        .map(|p| -p * p.ln())
        .sum()
}

/// Equitabilidade de Pielou: H / ln(k), com k categorias não vazias.
///
/// Com menos de 2 categorias não há diversidade: retorna 0.
pub fn evenness(counts: &[f64]) -> f64 {
    let k = counts.iter().filter(|c| **c > 0.0).count();
    if k < 2 {
        return 0.0;
    }
    shannon_entropy(counts) / (k as f64).ln()
}

/// Número efetivo de categorias, exp(H)
pub fn effective_diversity(counts: &[f64]) -> f64 {
    if counts.iter().all(|c| *c <= 0.0) {
        return 0.0;
    }
    shannon_entropy(counts).exp()
}

/// Índice Herfindahl-Hirschman (soma dos quadrados das participações, 0..1)
pub fn hhi(counts: &[f64]) -> f64 {
    shares(counts).iter().map(|s| s * s).sum()
}

/// Participação somada das `k` maiores categorias
pub fn concentration_ratio(counts: &[f64], k: usize) -> f64 {
    let mut sorted = shares(counts);
    sorted.sort_by(|a, b| b.total_cmp(a));
    sorted.iter().take(k).sum()
}

/// Número equivalente de competidores de mesmo tamanho (1 / HHI)
pub fn effective_competitors(hhi: f64) -> Option<f64> {
    if hhi > 0.0 {
        Some(1.0 / hhi)
    } else {
        None
    }
}

/// Correlação de Pearson; `None` se tamanhos diferem, n < 2 ou variância nula
pub fn pearson(xs: &[f64], ys: &[f64]) -> Option<f64> {
    if xs.len() != ys.len() || xs.len() < 2 {
        return None;
    }
    let mx = mean(xs)?;
    let my = mean(ys)?;

    let (mut cov, mut vx, mut vy) = (0.0, 0.0, 0.0);
    for (x, y) in xs.iter().zip(ys) {
        let (dx, dy) = (x - mx, y - my);
        cov += dx * dy;
        vx += dx * dx;
        vy += dy * dy;
    }

    if vx == 0.0 || vy == 0.0 {
        return None;
    }
    Some(cov / (vx.sqrt() * vy.sqrt()))
}

/// Classificação do equilíbrio segundo o Gini
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BalanceLevel {
    /// Gini < 0.2
    HighlyBalanced,
    /// Gini < 0.4
    ModeratelyBalanced,
    /// Gini < 0.6
    ModeratelyUnbalanced,
    /// Gini ≥ 0.6
    HighlyUnbalanced,
}

impl BalanceLevel {
    /// Classifica um coeficiente de Gini
    pub fn from_gini(gini: f64) -> Self {
        if gini < 0.2 {
            Self::HighlyBalanced
        } else if gini < 0.4 {
            Self::ModeratelyBalanced
        } else if gini < 0.6 {
            Self::ModeratelyUnbalanced
        } else {
            Self::HighlyUnbalanced
        }
    }

    /// Rótulo no idioma pedido
    pub fn label(&self, lang: Language) -> &'static str {
        match (self, lang) {
            (Self::HighlyBalanced, Language::Portuguese) => "Muito equilibrado",
            (Self::ModeratelyBalanced, Language::Portuguese) => "Moderadamente equilibrado",
            (Self::ModeratelyUnbalanced, Language::Portuguese) => "Moderadamente desequilibrado",
            (Self::HighlyUnbalanced, Language::Portuguese) => "Muito desequilibrado",
            (Self::HighlyBalanced, Language::English) => "Highly balanced",
            (Self::ModeratelyBalanced, Language::English) => "Moderately balanced",
            (Self::ModeratelyUnbalanced, Language::English) => "Moderately unbalanced",
            (Self::HighlyUnbalanced, Language::English) => "Highly unbalanced",
        }
    }
}

/// Classificação de concentração segundo o HHI
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConcentrationLevel {
    /// HHI < 0.15 (competitivo)
    Low,
    /// HHI < 0.25
    Moderate,
    /// HHI ≥ 0.25
    High,
}

impl ConcentrationLevel {
    /// Classifica um HHI normalizado (0..1)
    pub fn from_hhi(hhi: f64) -> Self {
        if hhi < 0.15 {
            Self::Low
        } else if hhi < 0.25 {
            Self::Moderate
        } else {
            Self::High
        }
    }

    /// Rótulo no idioma pedido
    pub fn label(&self, lang: Language) -> &'static str {
        match (self, lang) {
            (Self::Low, Language::Portuguese) => "Baixa concentração (competitivo)",
            (Self::Moderate, Language::Portuguese) => "Concentração moderada",
            (Self::High, Language::Portuguese) => "Alta concentração",
            (Self::Low, Language::English) => "Low concentration (competitive)",
            (Self::Moderate, Language::English) => "Moderate concentration",
            (Self::High, Language::English) => "High concentration",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_central_tendency() {
        let values = [2.0, 4.0, 4.0, 5.0];
        assert_eq!(mean(&values), Some(3.75));
        assert_eq!(median(&values), Some(4.0));
        assert_eq!(median(&[3.0, 1.0, 2.0]), Some(2.0));
        assert_eq!(mean(&[]), None);
        assert_eq!(median(&[]), None);
    }

    #[test]
    fn test_mode_prefers_smallest_on_tie() {
        assert_eq!(mode(&[2021, 2020, 2021, 2020, 2019]), Some(2020));
        assert_eq!(mode(&[2022, 2022, 2019]), Some(2022));
        assert_eq!(mode(&[]), None);
    }

    #[test]
    fn test_sample_variance() {
        let values = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        assert!(approx(variance(&values).unwrap(), 32.0 / 7.0));
        assert!(approx(std_dev(&values).unwrap(), (32.0f64 / 7.0).sqrt()));
        assert_eq!(variance(&[1.0]), None);
    }

    #[test]
    fn test_coefficient_of_variation_guards_zero_mean() {
        assert_eq!(coefficient_of_variation(&[0.0, 0.0]), None);
        assert!(coefficient_of_variation(&[1.0, 3.0]).unwrap() > 0.0);
    }

    #[test]
    fn test_gini() {
        assert!(approx(gini(&[1.0, 1.0, 1.0, 1.0]), 0.0));
        // Um único detentor de tudo entre 4: (n-1)/n
        assert!(approx(gini(&[0.0, 0.0, 0.0, 8.0]), 0.75));
        assert_eq!(gini(&[]), 0.0);
        assert_eq!(gini(&[0.0, 0.0]), 0.0);
    }

    #[test]
    fn test_entropy_and_evenness() {
        let uniform = [5.0, 5.0, 5.0, 5.0];
        assert!(approx(shannon_entropy(&uniform), 4f64.ln()));
        assert!(approx(evenness(&uniform), 1.0));
        assert!(approx(effective_diversity(&uniform), 4.0));

        assert_eq!(shannon_entropy(&[7.0]), 0.0);
        assert_eq!(evenness(&[7.0]), 0.0);
        assert_eq!(shannon_entropy(&[]), 0.0);
        assert_eq!(effective_diversity(&[]), 0.0);
    }

    #[test]
    fn test_hhi_and_concentration() {
        assert!(approx(hhi(&[10.0]), 1.0));
        assert!(approx(hhi(&[1.0, 1.0, 1.0, 1.0]), 0.25));
        assert_eq!(hhi(&[]), 0.0);
        assert!(approx(concentration_ratio(&[5.0, 3.0, 1.0, 1.0], 3), 0.9));
        assert_eq!(effective_competitors(0.25), Some(4.0));
        assert_eq!(effective_competitors(0.0), None);
    }

    #[test]
    fn test_pearson() {
        let xs = [1.0, 2.0, 3.0, 4.0];
        assert!(approx(pearson(&xs, &[2.0, 4.0, 6.0, 8.0]).unwrap(), 1.0));
        assert!(approx(pearson(&xs, &[8.0, 6.0, 4.0, 2.0]).unwrap(), -1.0));
        assert_eq!(pearson(&xs, &[1.0, 1.0, 1.0, 1.0]), None);
        assert_eq!(pearson(&xs, &[1.0]), None);
    }

    #[test]
    fn test_levels() {
        assert_eq!(BalanceLevel::from_gini(0.1), BalanceLevel::HighlyBalanced);
        assert_eq!(BalanceLevel::from_gini(0.3), BalanceLevel::ModeratelyBalanced);
        assert_eq!(BalanceLevel::from_gini(0.5), BalanceLevel::ModeratelyUnbalanced);
        assert_eq!(BalanceLevel::from_gini(0.9), BalanceLevel::HighlyUnbalanced);

        assert_eq!(ConcentrationLevel::from_hhi(0.1), ConcentrationLevel::Low);
        assert_eq!(ConcentrationLevel::from_hhi(0.2), ConcentrationLevel::Moderate);
        assert_eq!(ConcentrationLevel::from_hhi(0.25), ConcentrationLevel::High);
        assert_eq!(
            ConcentrationLevel::High.label(Language::English),
            "High concentration"
        );
    }
}
