//! Technical indicators over oldest-first price series

/// Simple moving average of the `period` values ending at `end` (inclusive)
pub fn sma_at(values: &[f64], period: usize, end: usize) -> Option<f64> {
    if period == 0 || end >= values.len() || end + 1 < period {
        return None;
    }
    let window = &values[end + 1 - period..=end];
    Some(window.iter().sum::<f64>() / period as f64)
}

/// Simple moving average of the last `period` values
pub fn sma(values: &[f64], period: usize) -> Option<f64> {
    let end = values.len().checked_sub(1)?;
    sma_at(values, period, end)
}

/// RSI over the last `period` changes, simple averages of gains and losses.
///
/// Needs `period + 1` closes. A window with no losses reads 100.
pub fn rsi(closes: &[f64], period: usize) -> Option<f64> {
    if period == 0 || closes.len() < period + 1 {
        return None;
    }

    let start = closes.len() - period;
    let (gains, losses) = (start..closes.len()).fold((0.0, 0.0), |(g, l), i| {
        let change = closes[i] - closes[i - 1];
        if change >= 0.0 {
            (g + change, l)
        } else {
            (g, l - change)
        }
    });

    let avg_gain = gains / period as f64;
    let avg_loss = losses / period as f64;

    if avg_loss == 0.0 {
        return Some(100.0);
    }

    let rs = avg_gain / avg_loss;
    Some(100.0 - 100.0 / (1.0 + rs))
}

/// Short SMA crossed above the long SMA within the last `lookback` bars:
/// at or below at the start of the window, above on the latest bar.
///
/// Returns the latest (short, long) pair when a crossover is found.
pub fn bullish_crossover(
    closes: &[f64],
    short: usize,
    long: usize,
    lookback: usize,
) -> Option<(f64, f64)> {
    if lookback < 2 || closes.len() < long + lookback - 1 {
        return None;
    }
    let last = closes.len() - 1;
    let first = last + 1 - lookback;

    let short_now = sma_at(closes, short, last)?;
    let long_now = sma_at(closes, long, last)?;
    let short_then = sma_at(closes, short, first)?;
    let long_then = sma_at(closes, long, first)?;

    if short_now > long_now && short_then <= long_then {
        Some((short_now, long_now))
    } else {
        None
    }
}

/// Support and resistance levels.
///
/// Support is the lowest rolling `window`-bar low over the last `recent`
/// bars, resistance the highest rolling high. Input is (high, low, close).
pub fn support_resistance(bars: &[(f64, f64, f64)], window: usize, recent: usize) -> Option<(f64, f64)> {
    if window == 0 || recent == 0 {
        return None;
    }
    let needed = window + recent - 1;
    if bars.len() < needed {
        return None;
    }

    let span = &bars[bars.len() - needed..];
    let support = span.iter().map(|b| b.1).fold(f64::INFINITY, f64::min);
    let resistance = span.iter().map(|b| b.0).fold(f64::NEG_INFINITY, f64::max);
    Some((support, resistance))
}
