//! Screening engine - runs every enabled strategy over one snapshot and
//! hands the signals to the risk aggregator

use crate::aggregator::{Recommendation, Rejection, RiskAggregator};
use crate::config::StrategyConfig;
use crate::error::{ConfigError, EvaluatorError};
use crate::signal::{Direction, Signal, StrategyKind};
use crate::strategies::{Strategy, StrategyFactory};
use chrono::{DateTime, Utc};
use market_data::sentiment::{self, NewsSentiment};
use market_data::{aggregators, universe, Breadth, MarketSnapshot};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{info, warn};

/// A strategy that could not run on this snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluatorFailure {
    pub strategy: StrategyKind,
    pub error: EvaluatorError,
}

/// Everything one run produced
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScreeningReport {
    pub as_of: DateTime<Utc>,
    pub universe_size: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub market: Option<Breadth>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub news_sentiment: Option<NewsSentiment>,
    pub strategies_run: Vec<StrategyKind>,
    pub signals_generated: usize,
    pub signal_counts: BTreeMap<StrategyKind, usize>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub failures: Vec<EvaluatorFailure>,
    pub recommendations: Vec<Recommendation>,
    #[serde(default)]
    pub rejected: Vec<Rejection>,
}

impl ScreeningReport {
    pub fn buys(&self) -> impl Iterator<Item = &Recommendation> {
        self.recommendations
            .iter()
            .filter(|r| r.direction == Direction::Buy)
    }

    pub fn sells(&self) -> impl Iterator<Item = &Recommendation> {
        self.recommendations
            .iter()
            .filter(|r| r.direction == Direction::Sell)
    }

    /// Sum of implied allocations, percent of capital
    pub fn total_allocation_pct(&self) -> f64 {
        self.recommendations
            .iter()
            .map(|r| r.implied_allocation_pct)
            .sum()
    }
}

/// Screening engine - single evaluation path for all strategies
pub struct ScreeningEngine {
    config: StrategyConfig,
    strategies: Vec<Box<dyn Strategy>>,
}

impl ScreeningEngine {
    /// Validate the config and build every enabled strategy
    pub fn new(config: StrategyConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let strategies = StrategyFactory::enabled(&config);
        Ok(Self { config, strategies })
    }

    /// Run an explicit strategy set instead of the config's enabled flags
    pub fn with_strategies(
        config: StrategyConfig,
        strategies: Vec<Box<dyn Strategy>>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { config, strategies })
    }

    pub fn config(&self) -> &StrategyConfig {
        &self.config
    }

    pub fn strategy_kinds(&self) -> Vec<StrategyKind> {
        self.strategies.iter().map(|s| s.kind()).collect()
    }

    /// Run every strategy. A failing strategy is recorded and skipped.
    pub fn evaluate(&self, snapshot: &MarketSnapshot) -> (Vec<Signal>, Vec<EvaluatorFailure>) {
        let mut signals = Vec::new();
        let mut failures = Vec::new();

        for strategy in &self.strategies {
            match strategy.evaluate(snapshot, &self.config) {
                Ok(found) => {
                    info!("{} generated {} signal(s)", strategy.name(), found.len());
                    signals.extend(found);
                }
                Err(e) => {
                    warn!("{} failed: {}", strategy.name(), e);
                    failures.push(EvaluatorFailure {
                        strategy: strategy.kind(),
                        error: e,
                    });
                }
            }
        }

        (signals, failures)
    }

    /// Full run: strategies, aggregation, market context
    pub fn run(&self, snapshot: &MarketSnapshot) -> ScreeningReport {
        info!(
            "Screening {} stocks as of {} with {} strategies",
            snapshot.len(),
            snapshot.as_of,
            self.strategies.len()
        );

        let (signals, failures) = self.evaluate(snapshot);

        let mut signal_counts = BTreeMap::new();
        for signal in &signals {
            *signal_counts.entry(signal.strategy).or_insert(0) += 1;
        }

        let aggregation = RiskAggregator::new(
            &self.config.risk_management,
            &self.config.aggregation,
        )
        .aggregate(&signals, |symbol| {
            snapshot
                .get(symbol)
                .map(|stock| stock.resolved_sector())
                .unwrap_or_else(|| universe::sector_for(symbol).to_string())
        });

        info!(
            "{} signal(s) -> {} recommendation(s), {} rejected",
            signals.len(),
            aggregation.recommendations.len(),
            aggregation.rejected.len()
        );

        ScreeningReport {
            as_of: snapshot.as_of,
            universe_size: snapshot.len(),
            market: aggregators::breadth(snapshot).ok(),
            news_sentiment: sentiment::summarize(&snapshot.news),
            strategies_run: self.strategy_kinds(),
            signals_generated: signals.len(),
            signal_counts,
            failures,
            recommendations: aggregation.recommendations,
            rejected: aggregation.rejected,
        }
    }
}
