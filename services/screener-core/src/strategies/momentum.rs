//! Momentum rules: day's top gainers and short/long SMA crossovers

use super::Strategy;
use crate::config::StrategyConfig;
use crate::confidence;
use crate::error::EvaluatorError;
use crate::indicators;
use crate::signal::{Signal, StrategyFamily, StrategyKind};
use market_data::{aggregators, normalizers, MarketSnapshot};
use rust_decimal::Decimal;
use tracing::debug;

/// Gain over the threshold at which a top gainer saturates, in points
const GAIN_FULL_SCALE_PCT: f64 = 8.0;

/// SMA spread at which a crossover saturates, in percent of the long SMA
const SPREAD_FULL_SCALE_PCT: f64 = 2.0;

/// Buy the top N gainers that cleared the minimum gain
pub struct TopGainersStrategy;

impl Strategy for TopGainersStrategy {
    fn kind(&self) -> StrategyKind {
        StrategyKind::TopGainers
    }

    fn evaluate(
        &self,
        snapshot: &MarketSnapshot,
        config: &StrategyConfig,
    ) -> Result<Vec<Signal>, EvaluatorError> {
        let params = &config.momentum.top_gainers;
        let size = config.position_size(StrategyFamily::Momentum);

        let signals = aggregators::top_gainers(snapshot, params.top_n)
            .into_iter()
            .filter(|m| m.change_pct > params.min_gain_percent)
            .map(|m| {
                let score = confidence::from_excess(
                    m.change_pct - params.min_gain_percent,
                    GAIN_FULL_SCALE_PCT,
                );
                Signal::buy(
                    m.symbol.clone(),
                    self.kind(),
                    m.change_pct,
                    score,
                    format!("Top gainer, up {:.2}% from the open", m.change_pct),
                    snapshot.as_of,
                )
                .with_price(Some(m.last_price))
                .with_position_size(size)
            })
            .collect();

        Ok(signals)
    }
}

/// Buy when the short SMA recently crossed above the long SMA
pub struct MovingAverageCrossoverStrategy;

impl Strategy for MovingAverageCrossoverStrategy {
    fn kind(&self) -> StrategyKind {
        StrategyKind::MovingAverageCrossover
    }

    fn evaluate(
        &self,
        snapshot: &MarketSnapshot,
        config: &StrategyConfig,
    ) -> Result<Vec<Signal>, EvaluatorError> {
        let params = &config.momentum.moving_average;
        let size = config.position_size(StrategyFamily::Momentum);
        let min_len = params.long_period + params.crossover_lookback - 1;
        let mut signals = Vec::new();

        for stock in snapshot.iter() {
            let Some(closes) = normalizers::closes(&stock.candles, min_len) else {
                debug!("{}: not enough usable candles for MA crossover", stock.symbol);
                continue;
            };

            let Some((short, long)) = indicators::bullish_crossover(
                &closes,
                params.short_period,
                params.long_period,
                params.crossover_lookback,
            ) else {
                continue;
            };

            if long <= 0.0 {
                continue;
            }
            let spread_pct = (short - long) / long * 100.0;

            signals.push(
                Signal::buy(
                    stock.symbol.clone(),
                    self.kind(),
                    spread_pct,
                    confidence::from_excess(spread_pct, SPREAD_FULL_SCALE_PCT),
                    format!(
                        "{}-day SMA ({:.2}) crossed above {}-day SMA ({:.2})",
                        params.short_period, short, params.long_period, long
                    ),
                    snapshot.as_of,
                )
                .with_price(stock.last_price().or_else(|| last_close(&closes)))
                .with_position_size(size),
            );
        }

        Ok(signals)
    }
}

fn last_close(closes: &[f64]) -> Option<Decimal> {
    closes.last().and_then(|c| Decimal::try_from(*c).ok())
}
