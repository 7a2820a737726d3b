use super::memory::MemorySource;
use crate::types::*;
use chrono::{DateTime, Utc};
use std::path::{Path, PathBuf};
use tracing::info;

/// Source that serves a `MarketSnapshot` saved as JSON
#[derive(Debug, Clone)]
pub struct JsonFileSource {
    path: PathBuf,
    inner: MemorySource,
}

impl JsonFileSource {
    /// Read and parse the snapshot file
    pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let raw = tokio::fs::read_to_string(&path)
            .await
            .map_err(|source| MarketDataError::Io {
                path: path.display().to_string(),
                source,
            })?;
        let snapshot: MarketSnapshot = serde_json::from_str(&raw)?;

        info!(
            "Loaded snapshot {} ({} stocks, as of {})",
            path.display(),
            snapshot.len(),
            snapshot.as_of
        );

        Ok(Self {
            path,
            inner: MemorySource::new(snapshot).with_name("json_file"),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait::async_trait]
impl MarketDataSource for JsonFileSource {
    async fn universe(&self) -> Result<Vec<String>> {
        self.inner.universe().await
    }

    async fn stock(&self, symbol: &str) -> Result<StockSnapshot> {
        self.inner.stock(symbol).await
    }

    async fn index_news(&self) -> Result<Vec<NewsItem>> {
        self.inner.index_news().await
    }

    fn as_of(&self) -> Option<DateTime<Utc>> {
        self.inner.as_of()
    }

    fn name(&self) -> &str {
        self.inner.name()
    }
}
