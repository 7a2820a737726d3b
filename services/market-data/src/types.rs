use chrono::{DateTime, Utc};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Intraday quote for a single equity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    pub open: Decimal,
    pub last_price: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub previous_close: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub volume: Option<Decimal>,
}

impl Quote {
    /// Day change in percent, measured from the open.
    ///
    /// Returns `None` when either price is not positive or the change
    /// does not fit in a `Decimal`.
    pub fn change_pct(&self) -> Option<f64> {
        if self.open <= Decimal::ZERO || self.last_price <= Decimal::ZERO {
            return None;
        }
        self.last_price
            .checked_sub(self.open)?
            .checked_div(self.open)?
            .checked_mul(Decimal::ONE_HUNDRED)?
            .to_f64()
    }
}

/// Daily OHLCV candle, oldest first within a series
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candle {
    pub timestamp: DateTime<Utc>,
    pub open: Decimal,
    pub high: Decimal,
    pub low: Decimal,
    pub close: Decimal,
    #[serde(default)]
    pub volume: Decimal,
}

/// Valuation fundamentals as reported by the provider
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Fundamentals {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub forward_pe: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trailing_pe: Option<f64>,
    /// Dividend yield in percent (2.5 = 2.5%)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dividend_yield_percent: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub market_cap: Option<Decimal>,
}

impl Fundamentals {
    /// Forward P/E, falling back to trailing P/E
    pub fn effective_pe(&self) -> Option<f64> {
        self.forward_pe
            .filter(|pe| pe.is_finite())
            .or(self.trailing_pe.filter(|pe| pe.is_finite()))
    }
}

/// A single news headline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewsItem {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl NewsItem {
    /// Title and summary joined for text analysis
    pub fn text(&self) -> String {
        match &self.summary {
            Some(summary) => format!("{} {}", self.title, summary),
            None => self.title.clone(),
        }
    }
}

/// Everything the provider knows about one symbol at snapshot time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockSnapshot {
    pub symbol: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sector: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quote: Option<Quote>,
    #[serde(default)]
    pub candles: Vec<Candle>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fundamentals: Option<Fundamentals>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub news: Vec<NewsItem>,
}

impl StockSnapshot {
    pub fn new(symbol: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            sector: None,
            quote: None,
            candles: Vec::new(),
            fundamentals: None,
            news: Vec::new(),
        }
    }

    pub fn with_sector(mut self, sector: impl Into<String>) -> Self {
        self.sector = Some(sector.into());
        self
    }

    pub fn with_quote(mut self, quote: Quote) -> Self {
        self.quote = Some(quote);
        self
    }

    pub fn with_candles(mut self, candles: Vec<Candle>) -> Self {
        self.candles = candles;
        self
    }

    pub fn with_fundamentals(mut self, fundamentals: Fundamentals) -> Self {
        self.fundamentals = Some(fundamentals);
        self
    }

    /// Sector from the provider, then the static universe map
    pub fn resolved_sector(&self) -> String {
        self.sector
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| crate::universe::sector_for(&self.symbol).to_string())
    }

    /// Most recent traded price: quote first, then the last candle close
    pub fn last_price(&self) -> Option<Decimal> {
        self.quote
            .as_ref()
            .map(|q| q.last_price)
            .or_else(|| self.candles.last().map(|c| c.close))
            .filter(|p| *p > Decimal::ZERO)
    }
}

/// Point-in-time view of the whole universe
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketSnapshot {
    pub as_of: DateTime<Utc>,
    #[serde(default)]
    pub stocks: BTreeMap<String, StockSnapshot>,
    /// Index-level news
    #[serde(default)]
    pub news: Vec<NewsItem>,
}

impl MarketSnapshot {
    pub fn new(as_of: DateTime<Utc>) -> Self {
        Self {
            as_of,
            stocks: BTreeMap::new(),
            news: Vec::new(),
        }
    }

    pub fn insert(&mut self, stock: StockSnapshot) {
        self.stocks.insert(stock.symbol.clone(), stock);
    }

    pub fn with_stock(mut self, stock: StockSnapshot) -> Self {
        self.insert(stock);
        self
    }

    pub fn get(&self, symbol: &str) -> Option<&StockSnapshot> {
        self.stocks.get(symbol)
    }

    /// Stocks in symbol order
    pub fn iter(&self) -> impl Iterator<Item = &StockSnapshot> {
        self.stocks.values()
    }

    pub fn len(&self) -> usize {
        self.stocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stocks.is_empty()
    }
}

/// Error types for market data access
#[derive(Debug, thiserror::Error)]
pub enum MarketDataError {
    #[error("Symbol not found: {0}")]
    SymbolNotFound(String),

    #[error("Invalid data for {symbol}: {reason}")]
    InvalidData { symbol: String, reason: String },

    #[error("Failed to read snapshot {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse snapshot: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Source unavailable: {0}")]
    SourceUnavailable(String),
}

/// Result type for market data operations
pub type Result<T> = std::result::Result<T, MarketDataError>;

/// Trait for market data providers
#[async_trait::async_trait]
pub trait MarketDataSource: Send + Sync {
    /// Symbols this source can serve
    async fn universe(&self) -> Result<Vec<String>>;

    /// Full per-symbol snapshot
    async fn stock(&self, symbol: &str) -> Result<StockSnapshot>;

    /// Index-level headlines
    async fn index_news(&self) -> Result<Vec<NewsItem>>;

    /// Timestamp the data refers to, when the source knows it
    fn as_of(&self) -> Option<DateTime<Utc>> {
        None
    }

    /// Source name
    fn name(&self) -> &str;
}
