//! Command line interface

use clap::{Parser, ValueEnum};
use screener_core::StrategyFamily;
use std::path::PathBuf;

/// Nifty 50 stock screener
#[derive(Parser, Debug, Clone)]
#[command(name = "screener", author, version, about = "Screen Nifty 50 stocks with momentum, mean reversion, value and sentiment strategies")]
pub struct Cli {
    /// Strategy configuration file (YAML). Missing file means defaults.
    #[arg(long, default_value = crate::config::DEFAULT_CONFIG_PATH)]
    pub config: PathBuf,

    /// Market snapshot to screen (JSON)
    #[arg(long, env = "SCREENER_SNAPSHOT")]
    pub snapshot: PathBuf,

    /// What to run
    #[arg(long, value_enum, default_value_t = Mode::Comprehensive)]
    pub mode: Mode,

    /// Write the result as JSON to this path
    #[arg(long)]
    pub output: Option<PathBuf>,

    /// Number of gainers/losers shown in overview mode
    #[arg(long, default_value_t = 5)]
    pub top: usize,

    /// Restrict news mode to one symbol's headlines
    #[arg(long)]
    pub symbol: Option<String>,

    /// Print the effective configuration as YAML and exit
    #[arg(long)]
    pub print_config: bool,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Every enabled strategy
    Comprehensive,
    Momentum,
    MeanReversion,
    Value,
    Sentiment,
    /// Market mood plus top movers
    Overview,
    /// News headlines with keyword sentiment
    News,
}

impl Mode {
    /// Families a screening mode is limited to; `None` for non-screening
    /// modes and for `comprehensive`, which runs what the config enables.
    pub fn families(&self) -> Option<Vec<StrategyFamily>> {
        match self {
            Mode::Momentum => Some(vec![StrategyFamily::Momentum]),
            Mode::MeanReversion => Some(vec![StrategyFamily::MeanReversion]),
            Mode::Value => Some(vec![StrategyFamily::Value]),
            Mode::Sentiment => Some(vec![StrategyFamily::Sentiment]),
            Mode::Comprehensive | Mode::Overview | Mode::News => None,
        }
    }

    pub fn is_screening(&self) -> bool {
        !matches!(self, Mode::Overview | Mode::News)
    }
}
