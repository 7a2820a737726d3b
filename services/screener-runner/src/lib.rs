//! Screener Runner Library
//!
//! Batch front end for the Nifty 50 screener: CLI parsing, layered
//! configuration, one-shot runs and report output.

pub mod cli;
pub mod config;
pub mod report;
pub mod runner;

// Re-export main types for convenience
pub use cli::{Cli, Mode};
pub use report::{MarketOverview, NewsDigest};
pub use runner::{load_snapshot, Outcome, ScreenerRunner};
