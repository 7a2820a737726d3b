pub mod types;
pub mod sources;
pub mod normalizers;
pub mod aggregators;
pub mod cache;
pub mod sentiment;
pub mod universe;

pub use types::*;
pub use aggregators::{Breadth, MarketMood, Mover};
pub use cache::CachedSource;
pub use sources::{JsonFileSource, MemorySource};

use chrono::Utc;
use std::sync::Arc;
use tracing::{info, warn};

/// Pulls a full universe snapshot out of a source
pub struct SnapshotBuilder {
    source: Arc<dyn MarketDataSource>,
    symbols: Option<Vec<String>>,
}

impl SnapshotBuilder {
    pub fn new(source: Arc<dyn MarketDataSource>) -> Self {
        Self {
            source,
            symbols: None,
        }
    }

    /// Restrict the snapshot to these symbols instead of the source universe
    pub fn with_symbols(mut self, symbols: Vec<String>) -> Self {
        self.symbols = Some(symbols);
        self
    }

    /// Fetch every symbol concurrently. Symbols that fail are logged and
    /// left out; the snapshot only fails when the universe itself is
    /// unavailable.
    pub async fn build(&self) -> Result<MarketSnapshot> {
        let symbols = match &self.symbols {
            Some(symbols) => symbols.clone(),
            None => self.source.universe().await?,
        };

        info!(
            "Fetching {} symbols from {}",
            symbols.len(),
            self.source.name()
        );

        let futures = symbols.iter().map(|symbol| self.source.stock(symbol));
        let results = futures::future::join_all(futures).await;

        let as_of = self.source.as_of().unwrap_or_else(Utc::now);
        let mut snapshot = MarketSnapshot::new(as_of);
        let mut failed = 0usize;

        for (symbol, result) in symbols.iter().zip(results) {
            match result {
                Ok(stock) => snapshot.insert(normalizers::normalize_stock(stock)),
                Err(e) => {
                    failed += 1;
                    warn!("Skipping {}: {}", symbol, e);
                }
            }
        }

        snapshot.news = match self.source.index_news().await {
            Ok(news) => news,
            Err(e) => {
                warn!("Index news unavailable: {}", e);
                Vec::new()
            }
        };

        info!(
            "Snapshot ready: {} stocks, {} failed, {} headlines",
            snapshot.len(),
            failed,
            snapshot.news.len()
        );

        Ok(snapshot)
    }
}
