use crate::types::*;
use chrono::{DateTime, Utc};
use std::collections::HashSet;

/// Source backed by an in-memory snapshot
#[derive(Debug, Clone)]
pub struct MemorySource {
    snapshot: MarketSnapshot,
    failing: HashSet<String>,
    name: String,
}

impl MemorySource {
    pub fn new(snapshot: MarketSnapshot) -> Self {
        Self {
            snapshot,
            failing: HashSet::new(),
            name: "memory".to_string(),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Make lookups for `symbol` fail as if the provider errored
    pub fn with_failure(mut self, symbol: impl Into<String>) -> Self {
        self.failing.insert(symbol.into());
        self
    }

    pub fn snapshot(&self) -> &MarketSnapshot {
        &self.snapshot
    }
}

#[async_trait::async_trait]
impl MarketDataSource for MemorySource {
    async fn universe(&self) -> Result<Vec<String>> {
        Ok(self.snapshot.stocks.keys().cloned().collect())
    }

    async fn stock(&self, symbol: &str) -> Result<StockSnapshot> {
        if self.failing.contains(symbol) {
            return Err(MarketDataError::SourceUnavailable(format!(
                "{} unavailable for {}",
                self.name, symbol
            )));
        }
        self.snapshot
            .get(symbol)
            .cloned()
            .ok_or_else(|| MarketDataError::SymbolNotFound(symbol.to_string()))
    }

    async fn index_news(&self) -> Result<Vec<NewsItem>> {
        Ok(self.snapshot.news.clone())
    }

    fn as_of(&self) -> Option<DateTime<Utc>> {
        Some(self.snapshot.as_of)
    }

    fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn source() -> MemorySource {
        let snapshot = MarketSnapshot::new(Utc.with_ymd_and_hms(2024, 6, 3, 10, 0, 0).unwrap())
            .with_stock(StockSnapshot::new("ITC.NS"))
            .with_stock(StockSnapshot::new("TCS.NS"));
        MemorySource::new(snapshot)
    }

    #[test]
    fn test_universe_is_symbol_ordered() {
        let universe = tokio_test::block_on(source().universe()).unwrap();
        assert_eq!(universe, vec!["ITC.NS".to_string(), "TCS.NS".to_string()]);
    }

    #[test]
    fn test_unknown_and_failing_symbols() {
        let source = source().with_failure("TCS.NS");
        assert!(matches!(
            tokio_test::block_on(source.stock("WIPRO.NS")),
            Err(MarketDataError::SymbolNotFound(_))
        ));
        assert!(matches!(
            tokio_test::block_on(source.stock("TCS.NS")),
            Err(MarketDataError::SourceUnavailable(_))
        ));
        assert!(tokio_test::block_on(source.stock("ITC.NS")).is_ok());
    }
}
