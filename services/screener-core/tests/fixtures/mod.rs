//! Shared snapshot fixtures for screening tests

use chrono::{DateTime, Duration, TimeZone, Utc};
use market_data::{Candle, Fundamentals, MarketSnapshot, Quote, StockSnapshot};
use rust_decimal::prelude::*;

pub fn as_of() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 3, 15, 30, 0).unwrap()
}

pub fn quote(open: f64, last: f64) -> Quote {
    Quote {
        open: Decimal::from_f64(open).unwrap(),
        last_price: Decimal::from_f64(last).unwrap(),
        previous_close: None,
        volume: None,
    }
}

pub fn candles(closes: &[f64]) -> Vec<Candle> {
    let start = as_of() - Duration::days(closes.len() as i64);
    closes
        .iter()
        .enumerate()
        .map(|(i, close)| {
            let c = Decimal::from_f64(*close).unwrap();
            Candle {
                timestamp: start + Duration::days(i as i64),
                open: c,
                high: c + Decimal::ONE,
                low: c - Decimal::ONE,
                close: c,
                volume: Decimal::from(10_000),
            }
        })
        .collect()
}

/// 11 one-point gains then 3 eleven-point losses: RSI(14) = 25
pub fn rsi_25_closes() -> Vec<f64> {
    let mut closes = vec![200.0];
    for i in 1..=11 {
        closes.push(200.0 + i as f64);
    }
    for i in 1..=3 {
        closes.push(211.0 - 11.0 * i as f64);
    }
    closes
}

pub fn fundamentals(pe: f64, dividend: f64) -> Fundamentals {
    Fundamentals {
        forward_pe: Some(pe),
        trailing_pe: None,
        dividend_yield_percent: Some(dividend),
        market_cap: None,
    }
}

/// Day change in percent from an open of 100
pub fn mover(symbol: &str, change_pct: f64) -> StockSnapshot {
    StockSnapshot::new(symbol).with_quote(quote(100.0, 100.0 + change_pct))
}

/// A small Nifty slice exercising every family:
///
/// - TCS: RSI 25 and nothing else
/// - HDFCBANK / ICICIBANK / SBIN: banking gainers
/// - ITC / COALINDIA: cheap, high yield
/// - WIPRO: sharp loser
/// - TATASTEEL: big gainer, so momentum buys and contrarian fades it
/// - NTPC: quiet, expensive
pub fn nifty_snapshot() -> MarketSnapshot {
    MarketSnapshot::new(as_of())
        .with_stock(StockSnapshot::new("TCS.NS").with_candles(candles(&rsi_25_closes())))
        .with_stock(mover("HDFCBANK.NS", 4.0))
        .with_stock(mover("ICICIBANK.NS", 3.0))
        .with_stock(mover("SBIN.NS", 2.5))
        .with_stock(mover("ITC.NS", 0.5).with_fundamentals(fundamentals(8.0, 4.0)))
        .with_stock(mover("COALINDIA.NS", -1.0).with_fundamentals(fundamentals(7.0, 6.0)))
        .with_stock(mover("WIPRO.NS", -6.0))
        .with_stock(mover("TATASTEEL.NS", 7.0))
        .with_stock(mover("NTPC.NS", -0.5).with_fundamentals(fundamentals(30.0, 1.0)))
}
