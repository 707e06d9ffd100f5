// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// CRONOMETRAGEM
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//
// Duração de cada mensagem processada (e de relatórios na CLI).
// Acima do limite de lentidão o registro sobe de `info` para `warn`:
// na prática só o fallback LLM chega lá.
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

use std::time::{Duration, Instant};

/// Limite padrão a partir do qual uma ação é considerada lenta
pub const DEFAULT_SLOW_THRESHOLD: Duration = Duration::from_secs(2);

/// Cronômetro de uma ação do assistente
#[derive(Debug)]
pub struct ActionTimer {
    action: &'static str,
    started: Instant,
    slow_after: Duration,
}

impl ActionTimer {
    /// Começa a medir `action`
    pub fn start(action: &'static str) -> Self {
        Self {
            action,
            started: Instant::now(),
            slow_after: DEFAULT_SLOW_THRESHOLD,
        }
    }

    /// Troca o limite de lentidão
    pub fn slow_after(mut self, threshold: Duration) -> Self {
        self.slow_after = threshold;
        self
    }

    /// Tempo desde o início
    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    /// Se a ação já passou do limite
    pub fn is_slow(&self) -> bool {
        self.elapsed() >= self.slow_after
    }

    /// Encerra e registra a duração com um detalhe (intenção, tipo de relatório...)
    pub fn finish(self, detail: &str) -> Duration {
        let elapsed = self.elapsed();
        if elapsed >= self.slow_after {
            log::warn!(
                "🐢 {} [{}] levou {}ms",
                self.action,
                detail,
                elapsed.as_millis()
            );
        } else {
            log::info!(
                "⏱️  {} [{}] em {}ms",
                self.action,
                detail,
                elapsed.as_millis()
            );
        }
        elapsed
    }
}

/// Mede um bloco e registra a duração sob `name`
#[macro_export]
macro_rules! timed {
    ($name:expr, $block:expr) => {{
        let timer = $crate::utils::ActionTimer::start($name);
        let result = $block;
        timer.finish("ok");
        result
    }};
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slow_threshold() {
        let timer = ActionTimer::start("process_message").slow_after(Duration::ZERO);
        assert!(timer.is_slow());

        let timer = ActionTimer::start("process_message").slow_after(Duration::from_secs(3600));
        assert!(!timer.is_slow());
        assert!(timer.finish("book_details") < Duration::from_secs(3600));
    }

    #[test]
    fn test_timed_macro_returns_block_value() {
        let titles = crate::timed!("count_titles", ["A Abelha", "A Borboleta"].len());
        assert_eq!(titles, 2);
    }
}
