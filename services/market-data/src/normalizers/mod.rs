// Validation and cleanup of provider data before strategies see it
use crate::types::*;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use tracing::debug;

/// Normalize a raw ticker to the provider format (`tcs` -> `TCS.NS`)
pub fn normalize_symbol(raw: &str) -> String {
    let upper = raw.trim().to_uppercase();
    if upper.ends_with(crate::universe::NSE_SUFFIX) || upper.starts_with('^') {
        upper
    } else {
        format!("{}{}", upper, crate::universe::NSE_SUFFIX)
    }
}

/// Validate that a quote is usable (positive open and last price)
pub fn validate_quote(symbol: &str, quote: &Quote) -> Result<()> {
    if quote.open <= Decimal::ZERO {
        return Err(MarketDataError::InvalidData {
            symbol: symbol.to_string(),
            reason: "open price must be positive".to_string(),
        });
    }
    if quote.last_price <= Decimal::ZERO {
        return Err(MarketDataError::InvalidData {
            symbol: symbol.to_string(),
            reason: "last price must be positive".to_string(),
        });
    }
    Ok(())
}

fn candle_is_valid(candle: &Candle) -> bool {
    candle.close > Decimal::ZERO
        && candle.low > Decimal::ZERO
        && candle.high >= candle.low
}

/// Closing prices as f64, or `None` when any candle is unusable
/// or the series is shorter than `min_len`.
pub fn closes(candles: &[Candle], min_len: usize) -> Option<Vec<f64>> {
    if candles.len() < min_len {
        return None;
    }
    if !candles.iter().all(candle_is_valid) {
        return None;
    }
    candles.iter().map(|c| c.close.to_f64()).collect()
}

/// (high, low, close) triples as f64, same rules as [`closes`]
pub fn hlc(candles: &[Candle], min_len: usize) -> Option<Vec<(f64, f64, f64)>> {
    if candles.len() < min_len {
        return None;
    }
    if !candles.iter().all(candle_is_valid) {
        return None;
    }
    candles
        .iter()
        .map(|c| Some((c.high.to_f64()?, c.low.to_f64()?, c.close.to_f64()?)))
        .collect()
}

/// Sort candles oldest-first and drop duplicate timestamps
pub fn normalize_candles(mut candles: Vec<Candle>) -> Vec<Candle> {
    candles.sort_by(|a, b| a.timestamp.cmp(&b.timestamp));
    candles.dedup_by(|a, b| a.timestamp == b.timestamp);
    candles
}

/// Clean up a stock snapshot in place: canonical symbol, ordered candles,
/// invalid quote removed.
pub fn normalize_stock(mut stock: StockSnapshot) -> StockSnapshot {
    stock.symbol = normalize_symbol(&stock.symbol);
    stock.candles = normalize_candles(stock.candles);

    if let Some(quote) = &stock.quote {
        if let Err(e) = validate_quote(&stock.symbol, quote) {
            debug!("Dropping quote: {}", e);
            stock.quote = None;
        }
    }

    if let Some(f) = stock.fundamentals.as_mut() {
        f.forward_pe = f.forward_pe.filter(|v| v.is_finite());
        f.trailing_pe = f.trailing_pe.filter(|v| v.is_finite());
        f.dividend_yield_percent = f.dividend_yield_percent.filter(|v| v.is_finite() && *v >= 0.0);
    }

    stock
}
