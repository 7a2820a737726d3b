//! Value rules over fundamentals

use super::{keep_best, Strategy};
use crate::config::StrategyConfig;
use crate::confidence;
use crate::error::EvaluatorError;
use crate::signal::{Signal, StrategyFamily, StrategyKind};
use market_data::MarketSnapshot;
use tracing::debug;

/// Buy the cheapest stocks by P/E inside [min, max]
pub struct LowPeStrategy;

impl Strategy for LowPeStrategy {
    fn kind(&self) -> StrategyKind {
        StrategyKind::LowPe
    }

    fn evaluate(
        &self,
        snapshot: &MarketSnapshot,
        config: &StrategyConfig,
    ) -> Result<Vec<Signal>, EvaluatorError> {
        let params = &config.value.low_pe;
        let size = config.position_size(StrategyFamily::Value);
        let span = params.max_pe_ratio - params.min_pe_ratio;

        let signals = snapshot
            .iter()
            .filter_map(|stock| {
                let Some(pe) = stock.fundamentals.as_ref().and_then(|f| f.effective_pe()) else {
                    debug!("{}: no P/E available", stock.symbol);
                    return None;
                };
                // Negative or zero earnings never count as cheap
                if pe <= 0.0 || pe < params.min_pe_ratio || pe > params.max_pe_ratio {
                    return None;
                }

                Some(
                    Signal::buy(
                        stock.symbol.clone(),
                        self.kind(),
                        pe,
                        confidence::from_excess(params.max_pe_ratio - pe, span),
                        format!("P/E {:.2} under {:.0}", pe, params.max_pe_ratio),
                        snapshot.as_of,
                    )
                    .with_price(stock.last_price())
                    .with_position_size(size),
                )
            })
            .collect();

        Ok(keep_best(signals, params.max_stocks))
    }
}

/// Buy the highest dividend yields above the floor
pub struct HighDividendStrategy;

impl Strategy for HighDividendStrategy {
    fn kind(&self) -> StrategyKind {
        StrategyKind::HighDividend
    }

    fn evaluate(
        &self,
        snapshot: &MarketSnapshot,
        config: &StrategyConfig,
    ) -> Result<Vec<Signal>, EvaluatorError> {
        let params = &config.value.high_dividend;
        let size = config.position_size(StrategyFamily::Value);
        // Twice the floor saturates; a zero floor falls back to 1 point
        let full_scale = params.min_yield_percent.max(1.0);

        let signals = snapshot
            .iter()
            .filter_map(|stock| {
                let yield_pct = stock
                    .fundamentals
                    .as_ref()
                    .and_then(|f| f.dividend_yield_percent)?;
                if yield_pct < params.min_yield_percent || yield_pct <= 0.0 {
                    return None;
                }

                Some(
                    Signal::buy(
                        stock.symbol.clone(),
                        self.kind(),
                        yield_pct,
                        confidence::from_excess(yield_pct - params.min_yield_percent, full_scale),
                        format!("Dividend yield {:.2}%", yield_pct),
                        snapshot.as_of,
                    )
                    .with_price(stock.last_price())
                    .with_position_size(size),
                )
            })
            .collect();

        Ok(keep_best(signals, params.max_stocks))
    }
}
