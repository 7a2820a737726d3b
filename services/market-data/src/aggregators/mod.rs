// Cross-sectional aggregation: movers and market breadth
use crate::types::*;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use tracing::debug;

/// One symbol's day move
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mover {
    pub symbol: String,
    pub open: Decimal,
    pub last_price: Decimal,
    pub change_pct: f64,
}

/// Overall market direction derived from breadth
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MarketMood {
    Bullish,
    Bearish,
    Neutral,
}

impl std::fmt::Display for MarketMood {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MarketMood::Bullish => write!(f, "bullish"),
            MarketMood::Bearish => write!(f, "bearish"),
            MarketMood::Neutral => write!(f, "neutral"),
        }
    }
}

/// Breadth statistics behind a mood call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Breadth {
    pub mood: MarketMood,
    pub gainers: usize,
    pub losers: usize,
    pub total: usize,
    /// Share of the winning side in percent (50 for neutral)
    pub dominant_pct: f64,
    pub avg_gain_pct: f64,
    pub avg_loss_pct: f64,
}

impl Breadth {
    pub fn describe(&self) -> String {
        match self.mood {
            MarketMood::Bullish => format!(
                "Market is bullish with {:.2}% of stocks gaining and an average gain of {:.2}%. Stocks losing on average {:.2}%.",
                self.dominant_pct, self.avg_gain_pct, self.avg_loss_pct
            ),
            MarketMood::Bearish => format!(
                "Market is bearish with {:.2}% of stocks losing and an average loss of {:.2}%. Stocks gaining on average {:.2}%.",
                self.dominant_pct, self.avg_loss_pct, self.avg_gain_pct
            ),
            MarketMood::Neutral => {
                "Market mood is neutral with equal gainers and losers.".to_string()
            }
        }
    }
}

fn by_change_desc(a: &Mover, b: &Mover) -> Ordering {
    b.change_pct
        .partial_cmp(&a.change_pct)
        .unwrap_or(Ordering::Equal)
        .then_with(|| a.symbol.cmp(&b.symbol))
}

/// All symbols with a usable quote, strongest first (ties by symbol)
pub fn movers(snapshot: &MarketSnapshot) -> Vec<Mover> {
    let mut movers: Vec<Mover> = snapshot
        .iter()
        .filter_map(|stock| {
            let quote = stock.quote.as_ref()?;
            match quote.change_pct() {
                Some(change_pct) if change_pct.is_finite() => Some(Mover {
                    symbol: stock.symbol.clone(),
                    open: quote.open,
                    last_price: quote.last_price,
                    change_pct,
                }),
                _ => {
                    debug!("Skipping {}: no usable quote", stock.symbol);
                    None
                }
            }
        })
        .collect();

    movers.sort_by(by_change_desc);
    movers
}

/// Top `n` gainers (largest change first)
pub fn top_gainers(snapshot: &MarketSnapshot, n: usize) -> Vec<Mover> {
    movers(snapshot).into_iter().take(n).collect()
}

/// Top `n` losers (largest drop first)
pub fn top_losers(snapshot: &MarketSnapshot, n: usize) -> Vec<Mover> {
    let mut all = movers(snapshot);
    all.sort_by(|a, b| {
        a.change_pct
            .partial_cmp(&b.change_pct)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.symbol.cmp(&b.symbol))
    });
    all.into_iter().take(n).collect()
}

/// Market breadth. A flat stock counts as a loser.
pub fn breadth(snapshot: &MarketSnapshot) -> Result<Breadth> {
    let movers = movers(snapshot);
    if movers.is_empty() {
        return Err(MarketDataError::SourceUnavailable(
            "No data available to determine market mood".to_string(),
        ));
    }

    let (up, down): (Vec<&Mover>, Vec<&Mover>) = movers.iter().partition(|m| m.change_pct > 0.0);
    let avg = |side: &[&Mover]| {
        if side.is_empty() {
            0.0
        } else {
            side.iter().map(|m| m.change_pct).sum::<f64>() / side.len() as f64
        }
    };

    let total = movers.len();
    let (mood, dominant) = match up.len().cmp(&down.len()) {
        Ordering::Greater => (MarketMood::Bullish, up.len()),
        Ordering::Less => (MarketMood::Bearish, down.len()),
        Ordering::Equal => (MarketMood::Neutral, up.len()),
    };

    Ok(Breadth {
        mood,
        gainers: up.len(),
        losers: down.len(),
        total,
        dominant_pct: dominant as f64 / total as f64 * 100.0,
        avg_gain_pct: avg(&up),
        avg_loss_pct: avg(&down),
    })
}
