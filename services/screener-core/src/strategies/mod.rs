//! Strategy evaluators
//!
//! Each evaluator is a pure function of (snapshot, config) that emits zero
//! or more signals. Evaluators never look at each other's output, so
//! switching one off cannot change what another produces.

use crate::config::StrategyConfig;
use crate::error::EvaluatorError;
use crate::signal::{Signal, StrategyKind};
use market_data::MarketSnapshot;
use std::cmp::Ordering;

pub mod mean_reversion;
pub mod momentum;
pub mod sentiment;
pub mod value;

pub use mean_reversion::{RsiOversoldStrategy, SupportResistanceStrategy};
pub use momentum::{MovingAverageCrossoverStrategy, TopGainersStrategy};
pub use sentiment::{ContrarianStrategy, MarketMoodStrategy};
pub use value::{HighDividendStrategy, LowPeStrategy};

/// Core strategy trait - every screening rule implements this
pub trait Strategy: Send + Sync {
    /// Which rule this is
    fn kind(&self) -> StrategyKind;

    /// Display name
    fn name(&self) -> &str {
        self.kind().display_name()
    }

    /// Evaluate the whole snapshot. Symbols with missing or bad data are
    /// skipped; an error means the snapshot as a whole is unusable.
    fn evaluate(
        &self,
        snapshot: &MarketSnapshot,
        config: &StrategyConfig,
    ) -> Result<Vec<Signal>, EvaluatorError>;
}

/// Builds evaluators by kind
pub struct StrategyFactory;

impl StrategyFactory {
    pub fn create(kind: StrategyKind) -> Box<dyn Strategy> {
        match kind {
            StrategyKind::TopGainers => Box::new(TopGainersStrategy),
            StrategyKind::MovingAverageCrossover => Box::new(MovingAverageCrossoverStrategy),
            StrategyKind::RsiOversold => Box::new(RsiOversoldStrategy),
            StrategyKind::SupportResistance => Box::new(SupportResistanceStrategy),
            StrategyKind::LowPe => Box::new(LowPeStrategy),
            StrategyKind::HighDividend => Box::new(HighDividendStrategy),
            StrategyKind::MarketMood => Box::new(MarketMoodStrategy),
            StrategyKind::Contrarian => Box::new(ContrarianStrategy),
        }
    }

    /// Every enabled evaluator, in evaluation order
    pub fn enabled(config: &StrategyConfig) -> Vec<Box<dyn Strategy>> {
        config
            .enabled_strategies()
            .into_iter()
            .map(Self::create)
            .collect()
    }
}

/// Strongest first, ties by symbol, then keep `max`
pub(crate) fn keep_best(mut signals: Vec<Signal>, max: usize) -> Vec<Signal> {
    signals.sort_by(|a, b| {
        b.confidence
            .partial_cmp(&a.confidence)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.symbol.cmp(&b.symbol))
    });
    signals.truncate(max);
    signals
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_factory_covers_every_kind() {
        for kind in StrategyKind::ALL {
            assert_eq!(StrategyFactory::create(kind).kind(), kind);
        }
    }

    #[test]
    fn test_enabled_respects_flags() {
        let mut config = StrategyConfig::default();
        config.value.low_pe.enabled = false;
        config.sentiment.contrarian.enabled = false;
        let kinds: Vec<StrategyKind> = StrategyFactory::enabled(&config)
            .iter()
            .map(|s| s.kind())
            .collect();
        assert_eq!(kinds.len(), 6);
        assert!(!kinds.contains(&StrategyKind::LowPe));
        assert!(!kinds.contains(&StrategyKind::Contrarian));
    }
}
