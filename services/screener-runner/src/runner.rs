//! Screener runner - one batch run from snapshot to report

use crate::cli::Mode;
use crate::report::{self, MarketOverview, NewsDigest};
use anyhow::{anyhow, Context};
use market_data::{
    aggregators, normalizers, sentiment, universe, CachedSource, JsonFileSource,
    MarketDataSource, MarketSnapshot, SnapshotBuilder,
};
use screener_core::{ScreeningEngine, ScreeningReport, StrategyConfig};
use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};

/// Result of one run, by mode
#[derive(Debug, Clone)]
pub enum Outcome {
    Screening(ScreeningReport),
    Overview(MarketOverview),
    News(NewsDigest),
}

impl Outcome {
    pub fn render(&self) -> String {
        match self {
            Outcome::Screening(r) => report::render_report(r),
            Outcome::Overview(o) => report::render_overview(o),
            Outcome::News(n) => report::render_news(n),
        }
    }

    pub async fn write_json(&self, path: &Path) -> anyhow::Result<()> {
        match self {
            Outcome::Screening(r) => report::write_json(path, r).await,
            Outcome::Overview(o) => report::write_json(path, o).await,
            Outcome::News(n) => report::write_json(path, n).await,
        }
    }
}

/// Read a snapshot file through the cache and normalize it. Only Nifty 50
/// constituents are kept.
pub async fn load_snapshot(path: &Path) -> anyhow::Result<MarketSnapshot> {
    let file = JsonFileSource::open(path)
        .await
        .with_context(|| format!("Failed to load snapshot {}", path.display()))?;
    let source: Arc<dyn MarketDataSource> = Arc::new(CachedSource::new(Arc::new(file)));

    let (symbols, outside): (Vec<String>, Vec<String>) = source
        .universe()
        .await?
        .into_iter()
        .partition(|s| universe::is_constituent(&normalizers::normalize_symbol(s)));
    if !outside.is_empty() {
        warn!(
            "Ignoring {} symbols outside the Nifty 50: {}",
            outside.len(),
            outside.join(", ")
        );
    }

    let snapshot = SnapshotBuilder::new(source)
        .with_symbols(symbols)
        .build()
        .await?;
    Ok(snapshot)
}

/// Runs a mode against a snapshot with a fixed configuration
pub struct ScreenerRunner {
    config: StrategyConfig,
}

impl ScreenerRunner {
    pub fn new(config: StrategyConfig) -> Self {
        Self { config }
    }

    pub fn execute(
        &self,
        mode: Mode,
        snapshot: &MarketSnapshot,
        top: usize,
        symbol: Option<&str>,
    ) -> anyhow::Result<Outcome> {
        match mode {
            Mode::Overview => Ok(Outcome::Overview(self.overview(snapshot, top))),
            Mode::News => self.news(snapshot, symbol).map(Outcome::News),
            _ => self.screen(mode, snapshot).map(Outcome::Screening),
        }
    }

    fn screen(&self, mode: Mode, snapshot: &MarketSnapshot) -> anyhow::Result<ScreeningReport> {
        let config = match mode.families() {
            Some(families) => self.config.restricted_to(&families),
            None => self.config.clone(),
        };

        let engine = ScreeningEngine::new(config).context("Invalid strategy config")?;
        info!(
            "Running {:?} screen with {} strategies",
            mode,
            engine.strategy_kinds().len()
        );
        Ok(engine.run(snapshot))
    }

    fn overview(&self, snapshot: &MarketSnapshot, top: usize) -> MarketOverview {
        let breadth = aggregators::breadth(snapshot).ok();
        let summary = breadth
            .as_ref()
            .map(|b| b.describe())
            .unwrap_or_else(|| "No data available to determine market mood".to_string());

        MarketOverview {
            as_of: snapshot.as_of,
            breadth,
            summary,
            top_gainers: aggregators::top_gainers(snapshot, top),
            top_losers: aggregators::top_losers(snapshot, top),
        }
    }

    fn news(&self, snapshot: &MarketSnapshot, symbol: Option<&str>) -> anyhow::Result<NewsDigest> {
        let (symbol, items) = match symbol {
            Some(raw) => {
                let symbol = normalizers::normalize_symbol(raw);
                let stock = snapshot
                    .get(&symbol)
                    .ok_or_else(|| anyhow!("{} is not in the snapshot", symbol))?;
                (Some(symbol), stock.news.as_slice())
            }
            None => (None, snapshot.news.as_slice()),
        };

        Ok(NewsDigest {
            as_of: snapshot.as_of,
            symbol,
            sentiment: sentiment::summarize(items),
        })
    }
}
