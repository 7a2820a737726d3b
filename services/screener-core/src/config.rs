//! Strategy configuration
//!
//! One immutable tree per run. Every field has a default so a partial
//! file (or none at all) still yields a usable configuration; values that
//! parse but make no sense are caught by [`StrategyConfig::validate`].

use crate::error::ConfigError;
use crate::signal::{StrategyFamily, StrategyKind};
use serde::{Deserialize, Serialize};

/// Complete screener configuration
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StrategyConfig {
    pub momentum: MomentumConfig,
    pub mean_reversion: MeanReversionConfig,
    pub value: ValueConfig,
    pub sentiment: SentimentConfig,
    pub risk_management: RiskConfig,
    pub aggregation: AggregationConfig,
}

fn enabled() -> bool {
    true
}

// --- Momentum ---

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MomentumConfig {
    #[serde(default)]
    pub top_gainers: TopGainersConfig,
    #[serde(default)]
    pub moving_average: MovingAverageConfig,
    /// Suggested position size for momentum calls, percent of capital
    #[serde(default = "default_momentum_position")]
    pub position_size_percent: f64,
}

fn default_momentum_position() -> f64 {
    8.0
}

impl Default for MomentumConfig {
    fn default() -> Self {
        Self {
            top_gainers: TopGainersConfig::default(),
            moving_average: MovingAverageConfig::default(),
            position_size_percent: default_momentum_position(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopGainersConfig {
    #[serde(default = "enabled")]
    pub enabled: bool,
    #[serde(default = "default_top_n")]
    pub top_n: usize,
    #[serde(default = "default_min_gain")]
    pub min_gain_percent: f64,
}

fn default_top_n() -> usize {
    5
}

fn default_min_gain() -> f64 {
    2.0
}

impl Default for TopGainersConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            top_n: default_top_n(),
            min_gain_percent: default_min_gain(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovingAverageConfig {
    #[serde(default = "enabled")]
    pub enabled: bool,
    #[serde(default = "default_short_period")]
    pub short_period: usize,
    #[serde(default = "default_long_period")]
    pub long_period: usize,
    /// Bars the crossover may have happened within, current bar included
    #[serde(default = "default_crossover_lookback")]
    pub crossover_lookback: usize,
}

fn default_short_period() -> usize {
    20
}

fn default_long_period() -> usize {
    50
}

fn default_crossover_lookback() -> usize {
    3
}

impl Default for MovingAverageConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            short_period: default_short_period(),
            long_period: default_long_period(),
            crossover_lookback: default_crossover_lookback(),
        }
    }
}

// --- Mean reversion ---

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeanReversionConfig {
    #[serde(default)]
    pub rsi: RsiConfig,
    #[serde(default)]
    pub support_resistance: SupportResistanceConfig,
    #[serde(default = "default_mean_reversion_position")]
    pub position_size_percent: f64,
}

fn default_mean_reversion_position() -> f64 {
    6.0
}

impl Default for MeanReversionConfig {
    fn default() -> Self {
        Self {
            rsi: RsiConfig::default(),
            support_resistance: SupportResistanceConfig::default(),
            position_size_percent: default_mean_reversion_position(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RsiConfig {
    #[serde(default = "enabled")]
    pub enabled: bool,
    #[serde(default = "default_rsi_period")]
    pub period: usize,
    #[serde(default = "default_oversold")]
    pub oversold_threshold: f64,
}

fn default_rsi_period() -> usize {
    14
}

fn default_oversold() -> f64 {
    30.0
}

impl Default for RsiConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            period: default_rsi_period(),
            oversold_threshold: default_oversold(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SupportResistanceConfig {
    #[serde(default = "enabled")]
    pub enabled: bool,
    /// Rolling window for the low/high extremes
    #[serde(default = "default_sr_window")]
    pub window: usize,
    /// Number of most recent rolling values the level is taken over
    #[serde(default = "default_recent_bars")]
    pub recent_bars: usize,
    /// Fractional band around the level (0.02 = 2%)
    #[serde(default = "default_tolerance")]
    pub support_tolerance: f64,
    #[serde(default = "default_tolerance")]
    pub resistance_tolerance: f64,
}

fn default_sr_window() -> usize {
    20
}

fn default_recent_bars() -> usize {
    5
}

fn default_tolerance() -> f64 {
    0.02
}

impl Default for SupportResistanceConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            window: default_sr_window(),
            recent_bars: default_recent_bars(),
            support_tolerance: default_tolerance(),
            resistance_tolerance: default_tolerance(),
        }
    }
}

// --- Value ---

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValueConfig {
    #[serde(default)]
    pub low_pe: LowPeConfig,
    #[serde(default)]
    pub high_dividend: HighDividendConfig,
    #[serde(default = "default_value_position")]
    pub position_size_percent: f64,
}

fn default_value_position() -> f64 {
    10.0
}

impl Default for ValueConfig {
    fn default() -> Self {
        Self {
            low_pe: LowPeConfig::default(),
            high_dividend: HighDividendConfig::default(),
            position_size_percent: default_value_position(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LowPeConfig {
    #[serde(default = "enabled")]
    pub enabled: bool,
    #[serde(default)]
    pub min_pe_ratio: f64,
    #[serde(default = "default_max_pe")]
    pub max_pe_ratio: f64,
    #[serde(default = "default_value_max_stocks")]
    pub max_stocks: usize,
}

fn default_max_pe() -> f64 {
    15.0
}

fn default_value_max_stocks() -> usize {
    10
}

impl Default for LowPeConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            min_pe_ratio: 0.0,
            max_pe_ratio: default_max_pe(),
            max_stocks: default_value_max_stocks(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HighDividendConfig {
    #[serde(default = "enabled")]
    pub enabled: bool,
    #[serde(default = "default_min_yield")]
    pub min_yield_percent: f64,
    #[serde(default = "default_value_max_stocks")]
    pub max_stocks: usize,
}

fn default_min_yield() -> f64 {
    2.0
}

impl Default for HighDividendConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            min_yield_percent: default_min_yield(),
            max_stocks: default_value_max_stocks(),
        }
    }
}

// --- Sentiment ---

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentimentConfig {
    #[serde(default)]
    pub market_mood: MarketMoodConfig,
    #[serde(default)]
    pub contrarian: ContrarianConfig,
    #[serde(default = "default_sentiment_position")]
    pub position_size_percent: f64,
}

fn default_sentiment_position() -> f64 {
    5.0
}

impl Default for SentimentConfig {
    fn default() -> Self {
        Self {
            market_mood: MarketMoodConfig::default(),
            contrarian: ContrarianConfig::default(),
            position_size_percent: default_sentiment_position(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketMoodConfig {
    #[serde(default = "enabled")]
    pub enabled: bool,
    #[serde(default = "default_mood_top_n")]
    pub top_n: usize,
}

fn default_mood_top_n() -> usize {
    3
}

impl Default for MarketMoodConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            top_n: default_mood_top_n(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContrarianConfig {
    #[serde(default = "enabled")]
    pub enabled: bool,
    #[serde(default = "default_min_loss")]
    pub min_loss_percent: f64,
    #[serde(default = "default_contrarian_max_stocks")]
    pub max_stocks: usize,
    /// Also sell stretched gainers
    #[serde(default = "enabled")]
    pub fade_gainers: bool,
    #[serde(default = "default_fade_gain")]
    pub fade_gain_percent: f64,
}

fn default_min_loss() -> f64 {
    3.0
}

fn default_contrarian_max_stocks() -> usize {
    3
}

fn default_fade_gain() -> f64 {
    5.0
}

impl Default for ContrarianConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            min_loss_percent: default_min_loss(),
            max_stocks: default_contrarian_max_stocks(),
            fade_gainers: true,
            fade_gain_percent: default_fade_gain(),
        }
    }
}

// --- Risk and aggregation ---

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskConfig {
    #[serde(default = "default_max_recommendations")]
    pub max_recommendations: usize,
    #[serde(default = "default_min_confidence")]
    pub min_confidence_score: f64,
    #[serde(default = "default_max_per_sector")]
    pub max_stocks_per_sector: usize,
    /// Percent of capital
    #[serde(default = "default_max_allocation")]
    pub max_allocation_per_stock: f64,
}

fn default_max_recommendations() -> usize {
    15
}

fn default_min_confidence() -> f64 {
    50.0
}

fn default_max_per_sector() -> usize {
    3
}

fn default_max_allocation() -> f64 {
    10.0
}

impl Default for RiskConfig {
    fn default() -> Self {
        Self {
            max_recommendations: default_max_recommendations(),
            min_confidence_score: default_min_confidence(),
            max_stocks_per_sector: default_max_per_sector(),
            max_allocation_per_stock: default_max_allocation(),
        }
    }
}

/// How opposing calls on one symbol are settled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConflictPolicy {
    /// Larger side wins, confidence is the difference
    #[default]
    Net,
    /// Larger side wins with its own confidence
    Strongest,
    /// Any conflict drops the symbol
    Drop,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AggregationConfig {
    pub conflict_policy: ConflictPolicy,
    pub family_weights: FamilyWeights,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FamilyWeights {
    pub momentum: f64,
    pub mean_reversion: f64,
    pub value: f64,
    pub sentiment: f64,
}

impl Default for FamilyWeights {
    fn default() -> Self {
        Self {
            momentum: 1.0,
            mean_reversion: 1.0,
            value: 1.0,
            sentiment: 1.0,
        }
    }
}

impl FamilyWeights {
    pub fn weight(&self, family: StrategyFamily) -> f64 {
        match family {
            StrategyFamily::Momentum => self.momentum,
            StrategyFamily::MeanReversion => self.mean_reversion,
            StrategyFamily::Value => self.value,
            StrategyFamily::Sentiment => self.sentiment,
        }
    }
}

impl StrategyConfig {
    /// Whether a rule is switched on
    pub fn is_enabled(&self, kind: StrategyKind) -> bool {
        match kind {
            StrategyKind::TopGainers => self.momentum.top_gainers.enabled,
            StrategyKind::MovingAverageCrossover => self.momentum.moving_average.enabled,
            StrategyKind::RsiOversold => self.mean_reversion.rsi.enabled,
            StrategyKind::SupportResistance => self.mean_reversion.support_resistance.enabled,
            StrategyKind::LowPe => self.value.low_pe.enabled,
            StrategyKind::HighDividend => self.value.high_dividend.enabled,
            StrategyKind::MarketMood => self.sentiment.market_mood.enabled,
            StrategyKind::Contrarian => self.sentiment.contrarian.enabled,
        }
    }

    fn set_enabled(&mut self, kind: StrategyKind, on: bool) {
        match kind {
            StrategyKind::TopGainers => self.momentum.top_gainers.enabled = on,
            StrategyKind::MovingAverageCrossover => self.momentum.moving_average.enabled = on,
            StrategyKind::RsiOversold => self.mean_reversion.rsi.enabled = on,
            StrategyKind::SupportResistance => self.mean_reversion.support_resistance.enabled = on,
            StrategyKind::LowPe => self.value.low_pe.enabled = on,
            StrategyKind::HighDividend => self.value.high_dividend.enabled = on,
            StrategyKind::MarketMood => self.sentiment.market_mood.enabled = on,
            StrategyKind::Contrarian => self.sentiment.contrarian.enabled = on,
        }
    }

    /// Enabled rules in evaluation order
    pub fn enabled_strategies(&self) -> Vec<StrategyKind> {
        StrategyKind::ALL
            .into_iter()
            .filter(|kind| self.is_enabled(*kind))
            .collect()
    }

    /// Copy with every rule outside `families` switched off
    pub fn restricted_to(&self, families: &[StrategyFamily]) -> Self {
        let mut config = self.clone();
        for kind in StrategyKind::ALL {
            if !families.contains(&kind.family()) {
                config.set_enabled(kind, false);
            }
        }
        config
    }

    /// Suggested position size for a family's calls
    pub fn position_size(&self, family: StrategyFamily) -> f64 {
        match family {
            StrategyFamily::Momentum => self.momentum.position_size_percent,
            StrategyFamily::MeanReversion => self.mean_reversion.position_size_percent,
            StrategyFamily::Value => self.value.position_size_percent,
            StrategyFamily::Sentiment => self.sentiment.position_size_percent,
        }
    }

    /// Reject values that would make a run meaningless
    pub fn validate(&self) -> Result<(), ConfigError> {
        let tg = &self.momentum.top_gainers;
        positive_count("momentum.top_gainers.top_n", tg.top_n)?;
        non_negative("momentum.top_gainers.min_gain_percent", tg.min_gain_percent)?;

        let ma = &self.momentum.moving_average;
        positive_count("momentum.moving_average.short_period", ma.short_period)?;
        if ma.short_period >= ma.long_period {
            return Err(ConfigError::invalid(
                "momentum.moving_average.short_period",
                format!(
                    "short period {} must be below long period {}",
                    ma.short_period, ma.long_period
                ),
            ));
        }
        if ma.crossover_lookback < 2 {
            return Err(ConfigError::invalid(
                "momentum.moving_average.crossover_lookback",
                "must cover at least 2 bars",
            ));
        }

        let rsi = &self.mean_reversion.rsi;
        if rsi.period < 2 {
            return Err(ConfigError::invalid(
                "mean_reversion.rsi.period",
                "must be at least 2",
            ));
        }
        open_range(
            "mean_reversion.rsi.oversold_threshold",
            rsi.oversold_threshold,
            0.0,
            100.0,
        )?;

        let sr = &self.mean_reversion.support_resistance;
        if sr.window < 2 {
            return Err(ConfigError::invalid(
                "mean_reversion.support_resistance.window",
                "must be at least 2",
            ));
        }
        positive_count("mean_reversion.support_resistance.recent_bars", sr.recent_bars)?;
        open_range(
            "mean_reversion.support_resistance.support_tolerance",
            sr.support_tolerance,
            0.0,
            1.0,
        )?;
        open_range(
            "mean_reversion.support_resistance.resistance_tolerance",
            sr.resistance_tolerance,
            0.0,
            1.0,
        )?;

        let pe = &self.value.low_pe;
        non_negative("value.low_pe.min_pe_ratio", pe.min_pe_ratio)?;
        if !pe.max_pe_ratio.is_finite() || pe.max_pe_ratio <= pe.min_pe_ratio {
            return Err(ConfigError::invalid(
                "value.low_pe.max_pe_ratio",
                format!("must be above min_pe_ratio {}", pe.min_pe_ratio),
            ));
        }
        positive_count("value.low_pe.max_stocks", pe.max_stocks)?;

        let dividend = &self.value.high_dividend;
        non_negative("value.high_dividend.min_yield_percent", dividend.min_yield_percent)?;
        positive_count("value.high_dividend.max_stocks", dividend.max_stocks)?;

        positive_count("sentiment.market_mood.top_n", self.sentiment.market_mood.top_n)?;

        let contrarian = &self.sentiment.contrarian;
        open_range(
            "sentiment.contrarian.min_loss_percent",
            contrarian.min_loss_percent,
            0.0,
            100.0,
        )?;
        positive_count("sentiment.contrarian.max_stocks", contrarian.max_stocks)?;
        if contrarian.fade_gainers {
            non_negative("sentiment.contrarian.fade_gain_percent", contrarian.fade_gain_percent)?;
        }

        for family in StrategyFamily::ALL {
            let field = match family {
                StrategyFamily::Momentum => "momentum.position_size_percent",
                StrategyFamily::MeanReversion => "mean_reversion.position_size_percent",
                StrategyFamily::Value => "value.position_size_percent",
                StrategyFamily::Sentiment => "sentiment.position_size_percent",
            };
            let size = self.position_size(family);
            if !size.is_finite() || size <= 0.0 || size > 100.0 {
                return Err(ConfigError::invalid(field, "must be in (0, 100]"));
            }

            let weight = self.aggregation.family_weights.weight(family);
            if !weight.is_finite() || weight < 0.0 {
                return Err(ConfigError::invalid(
                    "aggregation.family_weights",
                    format!("{} weight must be a non-negative number", family.display_name()),
                ));
            }
        }

        let risk = &self.risk_management;
        positive_count("risk_management.max_recommendations", risk.max_recommendations)?;
        positive_count("risk_management.max_stocks_per_sector", risk.max_stocks_per_sector)?;
        if !(0.0..=100.0).contains(&risk.min_confidence_score) {
            return Err(ConfigError::invalid(
                "risk_management.min_confidence_score",
                "must be within [0, 100]",
            ));
        }
        if !risk.max_allocation_per_stock.is_finite()
            || risk.max_allocation_per_stock <= 0.0
            || risk.max_allocation_per_stock > 100.0
        {
            return Err(ConfigError::invalid(
                "risk_management.max_allocation_per_stock",
                "must be in (0, 100]",
            ));
        }

        Ok(())
    }
}

fn positive_count(field: &str, value: usize) -> Result<(), ConfigError> {
    if value == 0 {
        return Err(ConfigError::invalid(field, "must be at least 1"));
    }
    Ok(())
}

fn non_negative(field: &str, value: f64) -> Result<(), ConfigError> {
    if !value.is_finite() || value < 0.0 {
        return Err(ConfigError::invalid(field, "must be a non-negative number"));
    }
    Ok(())
}

fn open_range(field: &str, value: f64, low: f64, high: f64) -> Result<(), ConfigError> {
    if !value.is_finite() || value <= low || value >= high {
        return Err(ConfigError::invalid(
            field,
            format!("must be strictly between {} and {}", low, high),
        ));
    }
    Ok(())
}
