//! Mean reversion rules
//!
//! - RSI oversold: buy when the simple-average RSI drops under the threshold
//! - Support/resistance: buy near the rolling support, sell near the
//!   rolling resistance

use super::Strategy;
use crate::config::StrategyConfig;
use crate::confidence;
use crate::error::EvaluatorError;
use crate::indicators;
use crate::signal::{Signal, StrategyFamily, StrategyKind};
use market_data::{normalizers, MarketSnapshot};
use rust_decimal::prelude::*;
use tracing::debug;

pub struct RsiOversoldStrategy;

impl Strategy for RsiOversoldStrategy {
    fn kind(&self) -> StrategyKind {
        StrategyKind::RsiOversold
    }

    fn evaluate(
        &self,
        snapshot: &MarketSnapshot,
        config: &StrategyConfig,
    ) -> Result<Vec<Signal>, EvaluatorError> {
        let params = &config.mean_reversion.rsi;
        let size = config.position_size(StrategyFamily::MeanReversion);
        let mut signals = Vec::new();

        for stock in snapshot.iter() {
            let Some(closes) = normalizers::closes(&stock.candles, params.period + 1) else {
                debug!("{}: not enough usable candles for RSI", stock.symbol);
                continue;
            };
            let Some(rsi) = indicators::rsi(&closes, params.period) else {
                continue;
            };

            if rsi < params.oversold_threshold {
                let score = confidence::from_excess(
                    params.oversold_threshold - rsi,
                    params.oversold_threshold,
                );
                signals.push(
                    Signal::buy(
                        stock.symbol.clone(),
                        self.kind(),
                        rsi,
                        score,
                        format!(
                            "RSI({}) at {:.2}, below oversold level {:.0}",
                            params.period, rsi, params.oversold_threshold
                        ),
                        snapshot.as_of,
                    )
                    .with_price(stock.last_price())
                    .with_position_size(size),
                );
            }
        }

        Ok(signals)
    }
}

pub struct SupportResistanceStrategy;

impl Strategy for SupportResistanceStrategy {
    fn kind(&self) -> StrategyKind {
        StrategyKind::SupportResistance
    }

    fn evaluate(
        &self,
        snapshot: &MarketSnapshot,
        config: &StrategyConfig,
    ) -> Result<Vec<Signal>, EvaluatorError> {
        let params = &config.mean_reversion.support_resistance;
        let size = config.position_size(StrategyFamily::MeanReversion);
        let min_len = params.window + params.recent_bars - 1;
        let mut signals = Vec::new();

        for stock in snapshot.iter() {
            let Some(bars) = normalizers::hlc(&stock.candles, min_len) else {
                debug!("{}: not enough usable candles for support/resistance", stock.symbol);
                continue;
            };
            let Some((support, resistance)) =
                indicators::support_resistance(&bars, params.window, params.recent_bars)
            else {
                continue;
            };
            let Some(price) = stock.last_price() else {
                continue;
            };
            let Some(current) = price.to_f64() else {
                continue;
            };
            if support <= 0.0 || resistance <= 0.0 {
                continue;
            }

            // Buy side wins when a narrow range puts price near both levels
            let above_support = current / support - 1.0;
            let below_resistance = 1.0 - current / resistance;

            let signal = if current <= support * (1.0 + params.support_tolerance) {
                let score = confidence::from_excess(
                    params.support_tolerance - above_support,
                    params.support_tolerance,
                );
                Signal::buy(
                    stock.symbol.clone(),
                    self.kind(),
                    above_support * 100.0,
                    score,
                    format!(
                        "Price {:.2} within {:.1}% of support {:.2}",
                        current,
                        params.support_tolerance * 100.0,
                        support
                    ),
                    snapshot.as_of,
                )
            } else if current >= resistance * (1.0 - params.resistance_tolerance) {
                let score = confidence::from_excess(
                    params.resistance_tolerance - below_resistance,
                    params.resistance_tolerance,
                );
                Signal::sell(
                    stock.symbol.clone(),
                    self.kind(),
                    below_resistance * 100.0,
                    score,
                    format!(
                        "Price {:.2} within {:.1}% of resistance {:.2}",
                        current,
                        params.resistance_tolerance * 100.0,
                        resistance
                    ),
                    snapshot.as_of,
                )
            } else {
                continue;
            };

            signals.push(signal.with_price(Some(price)).with_position_size(size));
        }

        Ok(signals)
    }
}
