//! Screening signals - output from strategies

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Direction of a call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Buy,
    Sell,
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Direction::Buy => write!(f, "BUY"),
            Direction::Sell => write!(f, "SELL"),
        }
    }
}

/// Strategy group a rule belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrategyFamily {
    Momentum,
    MeanReversion,
    Value,
    Sentiment,
}

impl StrategyFamily {
    pub const ALL: [StrategyFamily; 4] = [
        StrategyFamily::Momentum,
        StrategyFamily::MeanReversion,
        StrategyFamily::Value,
        StrategyFamily::Sentiment,
    ];

    pub fn display_name(&self) -> &'static str {
        match self {
            StrategyFamily::Momentum => "Momentum",
            StrategyFamily::MeanReversion => "Mean Reversion",
            StrategyFamily::Value => "Value",
            StrategyFamily::Sentiment => "Sentiment",
        }
    }
}

/// Individual screening rule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrategyKind {
    TopGainers,
    MovingAverageCrossover,
    RsiOversold,
    SupportResistance,
    LowPe,
    HighDividend,
    MarketMood,
    Contrarian,
}

impl StrategyKind {
    /// Evaluation order used by the engine
    pub const ALL: [StrategyKind; 8] = [
        StrategyKind::TopGainers,
        StrategyKind::MovingAverageCrossover,
        StrategyKind::RsiOversold,
        StrategyKind::SupportResistance,
        StrategyKind::LowPe,
        StrategyKind::HighDividend,
        StrategyKind::MarketMood,
        StrategyKind::Contrarian,
    ];

    pub fn family(&self) -> StrategyFamily {
        match self {
            StrategyKind::TopGainers | StrategyKind::MovingAverageCrossover => {
                StrategyFamily::Momentum
            }
            StrategyKind::RsiOversold | StrategyKind::SupportResistance => {
                StrategyFamily::MeanReversion
            }
            StrategyKind::LowPe | StrategyKind::HighDividend => StrategyFamily::Value,
            StrategyKind::MarketMood | StrategyKind::Contrarian => StrategyFamily::Sentiment,
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            StrategyKind::TopGainers => "Momentum - Top Gainers",
            StrategyKind::MovingAverageCrossover => "Momentum - MA Crossover",
            StrategyKind::RsiOversold => "Mean Reversion - RSI Oversold",
            StrategyKind::SupportResistance => "Mean Reversion - Support/Resistance",
            StrategyKind::LowPe => "Value - Low P/E",
            StrategyKind::HighDividend => "Value - High Dividend",
            StrategyKind::MarketMood => "Sentiment - Market Mood",
            StrategyKind::Contrarian => "Sentiment - Contrarian",
        }
    }
}

impl std::fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Signal strength bucket
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SignalStrength {
    Weak,
    Moderate,
    Strong,
    VeryStrong,
}

impl SignalStrength {
    /// Bucket a 0-100 confidence score
    pub fn from_confidence(confidence: f64) -> Self {
        if confidence >= 90.0 {
            SignalStrength::VeryStrong
        } else if confidence >= 70.0 {
            SignalStrength::Strong
        } else if confidence >= 50.0 {
            SignalStrength::Moderate
        } else {
            SignalStrength::Weak
        }
    }
}

/// One strategy's directional call on one symbol
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Signal {
    pub symbol: String,
    pub strategy: StrategyKind,
    pub family: StrategyFamily,
    pub direction: Direction,
    /// The metric the rule fired on (% change, RSI, P/E, ...)
    pub raw_metric: f64,
    /// 0 - 100
    pub confidence: f64,
    pub strength: SignalStrength,
    pub reason: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<Decimal>,
    /// Suggested position size, percent of capital
    pub suggested_position_pct: f64,
    /// Snapshot time the call refers to
    pub timestamp: DateTime<Utc>,
}

impl Signal {
    fn new(
        direction: Direction,
        symbol: impl Into<String>,
        strategy: StrategyKind,
        raw_metric: f64,
        confidence: f64,
        reason: String,
        timestamp: DateTime<Utc>,
    ) -> Self {
        let confidence = crate::confidence::clamp(confidence);
        Self {
            symbol: symbol.into(),
            strategy,
            family: strategy.family(),
            direction,
            raw_metric,
            confidence,
            strength: SignalStrength::from_confidence(confidence),
            reason,
            price: None,
            suggested_position_pct: 0.0,
            timestamp,
        }
    }

    /// Create a buy signal
    pub fn buy(
        symbol: impl Into<String>,
        strategy: StrategyKind,
        raw_metric: f64,
        confidence: f64,
        reason: String,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self::new(Direction::Buy, symbol, strategy, raw_metric, confidence, reason, timestamp)
    }

    /// Create a sell signal
    pub fn sell(
        symbol: impl Into<String>,
        strategy: StrategyKind,
        raw_metric: f64,
        confidence: f64,
        reason: String,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self::new(Direction::Sell, symbol, strategy, raw_metric, confidence, reason, timestamp)
    }

    pub fn with_price(mut self, price: Option<Decimal>) -> Self {
        self.price = price;
        self
    }

    /// Set suggested position size (percent of capital)
    pub fn with_position_size(mut self, pct: f64) -> Self {
        self.suggested_position_pct = pct;
        self
    }

    /// Check if signal clears a confidence floor
    pub fn is_actionable(&self, min_confidence: f64) -> bool {
        self.confidence >= min_confidence
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strength_buckets() {
        assert_eq!(SignalStrength::from_confidence(95.0), SignalStrength::VeryStrong);
        assert_eq!(SignalStrength::from_confidence(70.0), SignalStrength::Strong);
        assert_eq!(SignalStrength::from_confidence(55.0), SignalStrength::Moderate);
        assert_eq!(SignalStrength::from_confidence(10.0), SignalStrength::Weak);
    }

    #[test]
    fn test_signal_confidence_is_clamped() {
        let s = Signal::buy("ITC.NS", StrategyKind::LowPe, 8.0, 140.0, "cheap".into(), Utc::now());
        assert_eq!(s.confidence, 100.0);
        assert_eq!(s.family, StrategyFamily::Value);
        assert_eq!(s.direction, Direction::Buy);
    }

    #[test]
    fn test_every_kind_has_a_family() {
        for kind in StrategyKind::ALL {
            assert!(StrategyFamily::ALL.contains(&kind.family()));
        }
    }
}
