// In-process TTL cache in front of any market data source
use crate::types::*;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;
use tracing::debug;

/// Default time-to-live for cached stock data
pub const DEFAULT_TTL: Duration = Duration::from_secs(300);

struct Entry {
    stock: StockSnapshot,
    stored_at: Instant,
}

/// Wraps a source and caches per-symbol lookups
pub struct CachedSource {
    inner: Arc<dyn MarketDataSource>,
    ttl: Duration,
    entries: RwLock<HashMap<String, Entry>>,
    news: RwLock<Option<(Vec<NewsItem>, Instant)>>,
}

impl CachedSource {
    pub fn new(inner: Arc<dyn MarketDataSource>) -> Self {
        Self::with_ttl(inner, DEFAULT_TTL)
    }

    pub fn with_ttl(inner: Arc<dyn MarketDataSource>, ttl: Duration) -> Self {
        Self {
            inner,
            ttl,
            entries: RwLock::new(HashMap::new()),
            news: RwLock::new(None),
        }
    }

    fn is_fresh(&self, stored_at: Instant) -> bool {
        stored_at.elapsed() < self.ttl
    }

    /// Drop everything
    pub async fn clear(&self) {
        self.entries.write().await.clear();
        *self.news.write().await = None;
    }

    /// Number of cached symbols (fresh or stale)
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }
}

#[async_trait::async_trait]
impl MarketDataSource for CachedSource {
    async fn universe(&self) -> Result<Vec<String>> {
        self.inner.universe().await
    }

    async fn stock(&self, symbol: &str) -> Result<StockSnapshot> {
        {
            let entries = self.entries.read().await;
            if let Some(entry) = entries.get(symbol) {
                if self.is_fresh(entry.stored_at) {
                    debug!("Cache hit for {}", symbol);
                    return Ok(entry.stock.clone());
                }
            }
        }

        let stock = self.inner.stock(symbol).await?;
        self.entries.write().await.insert(
            symbol.to_string(),
            Entry {
                stock: stock.clone(),
                stored_at: Instant::now(),
            },
        );
        Ok(stock)
    }

    async fn index_news(&self) -> Result<Vec<NewsItem>> {
        {
            let news = self.news.read().await;
            if let Some((items, stored_at)) = news.as_ref() {
                if self.is_fresh(*stored_at) {
                    return Ok(items.clone());
                }
            }
        }

        let items = self.inner.index_news().await?;
        *self.news.write().await = Some((items.clone(), Instant::now()));
        Ok(items)
    }

    fn as_of(&self) -> Option<DateTime<Utc>> {
        self.inner.as_of()
    }

    fn name(&self) -> &str {
        self.inner.name()
    }
}
