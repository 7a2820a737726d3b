//! Console rendering and JSON output

use chrono::{DateTime, Utc};
use market_data::sentiment::{NewsSentiment, SentimentLabel};
use market_data::{Breadth, Mover};
use rust_decimal::Decimal;
use screener_core::{Recommendation, ScreeningReport};
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;
use std::path::Path;
use tokio::fs;
use tracing::debug;

const RULE: &str = "============================================================";

/// Market mood and the day's biggest movers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketOverview {
    pub as_of: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub breadth: Option<Breadth>,
    pub summary: String,
    pub top_gainers: Vec<Mover>,
    pub top_losers: Vec<Mover>,
}

/// Headline sentiment for the index or one symbol
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewsDigest {
    pub as_of: DateTime<Utc>,
    /// `None` for index-level news
    #[serde(skip_serializing_if = "Option::is_none")]
    pub symbol: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sentiment: Option<NewsSentiment>,
}

fn price(p: Option<Decimal>) -> String {
    p.map(|p| format!("{:.2}", p)).unwrap_or_else(|| "-".to_string())
}

fn recommendation_line(out: &mut String, rec: &Recommendation) {
    let _ = writeln!(
        out,
        "{:>2}. {:<14} {:<4} conf {:>5.1}  alloc {:>4.1}%  px {:>9}  [{}]",
        rec.rank,
        rec.symbol,
        rec.direction.to_string(),
        rec.aggregated_confidence,
        rec.implied_allocation_pct,
        price(rec.price),
        rec.sector
    );
    let _ = writeln!(out, "    {}", rec.rationale);
}

/// Human-readable screening report
pub fn render_report(report: &ScreeningReport) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", RULE);
    let _ = writeln!(out, "NIFTY 50 SCREENER - {}", report.as_of.format("%Y-%m-%d %H:%M UTC"));
    let _ = writeln!(out, "{}", RULE);

    if let Some(market) = &report.market {
        let _ = writeln!(out, "Market mood: {}", market.mood.to_string().to_uppercase());
        let _ = writeln!(out, "{}", market.describe());
    }
    if let Some(news) = &report.news_sentiment {
        let _ = writeln!(
            out,
            "News sentiment: {} ({:.1}% of {} headlines)",
            news.overall,
            news.confidence,
            news.total()
        );
    }

    let _ = writeln!(
        out,
        "\n{} stocks, {} strategies, {} signals",
        report.universe_size,
        report.strategies_run.len(),
        report.signals_generated
    );
    for (kind, count) in &report.signal_counts {
        let _ = writeln!(out, "  {:<40} {}", kind.display_name(), count);
    }

    let buys: Vec<&Recommendation> = report.buys().collect();
    let sells: Vec<&Recommendation> = report.sells().collect();
    for (label, picks) in [("BUY", buys), ("SELL", sells)] {
        if picks.is_empty() {
            continue;
        }
        let _ = writeln!(out, "\n{} RECOMMENDATIONS ({})", label, picks.len());
        for rec in picks {
            recommendation_line(&mut out, rec);
        }
    }

    if report.recommendations.is_empty() {
        let _ = writeln!(out, "\nNo recommendations cleared the risk filters.");
    } else {
        let _ = writeln!(
            out,
            "\nTotal implied allocation: {:.1}%",
            report.total_allocation_pct()
        );
    }

    if !report.rejected.is_empty() {
        let _ = writeln!(out, "\nFiltered out ({}):", report.rejected.len());
        for rejection in &report.rejected {
            let _ = writeln!(out, "  {:<14} {}", rejection.symbol, rejection.reason);
        }
    }

    if !report.failures.is_empty() {
        let _ = writeln!(out, "\nStrategies that could not run:");
        for failure in &report.failures {
            let _ = writeln!(out, "  {}: {}", failure.strategy.display_name(), failure.error);
        }
    }

    out
}

fn mover_line(out: &mut String, m: &Mover) {
    let _ = writeln!(
        out,
        "  {:<14} {:>+7.2}%  {:>9.2} -> {:>9.2}",
        m.symbol, m.change_pct, m.open, m.last_price
    );
}

pub fn render_overview(overview: &MarketOverview) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", RULE);
    let _ = writeln!(out, "MARKET OVERVIEW - {}", overview.as_of.format("%Y-%m-%d %H:%M UTC"));
    let _ = writeln!(out, "{}", RULE);
    let _ = writeln!(out, "{}", overview.summary);

    let _ = writeln!(out, "\nTop gainers:");
    for m in &overview.top_gainers {
        mover_line(&mut out, m);
    }
    let _ = writeln!(out, "\nTop losers:");
    for m in &overview.top_losers {
        mover_line(&mut out, m);
    }
    out
}

pub fn render_news(digest: &NewsDigest) -> String {
    let mut out = String::new();
    let scope = digest.symbol.as_deref().unwrap_or("NIFTY 50");
    let _ = writeln!(out, "{}", RULE);
    let _ = writeln!(out, "NEWS - {}", scope);
    let _ = writeln!(out, "{}", RULE);

    let Some(sentiment) = &digest.sentiment else {
        let _ = writeln!(out, "No news available.");
        return out;
    };

    let _ = writeln!(
        out,
        "Overall: {} ({:.1}%)  positive {} / negative {} / neutral {}",
        sentiment.overall,
        sentiment.confidence,
        sentiment.positive,
        sentiment.negative,
        sentiment.neutral
    );
    for headline in &sentiment.headlines {
        let tag = match headline.sentiment.label {
            SentimentLabel::Positive => "+",
            SentimentLabel::Negative => "-",
            SentimentLabel::Neutral => " ",
        };
        let provider = headline.provider.as_deref().unwrap_or("unknown");
        let _ = writeln!(out, " [{}] {} ({})", tag, headline.title, provider);
    }
    out
}

/// Pretty JSON to `path`, creating parent directories
pub async fn write_json<T: Serialize>(path: &Path, value: &T) -> anyhow::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).await?;
    }
    let json = serde_json::to_string_pretty(value)?;
    fs::write(path, json).await?;
    debug!("Wrote {}", path.display());
    Ok(())
}
