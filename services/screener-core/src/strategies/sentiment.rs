//! Sentiment rules driven by market breadth

use super::Strategy;
use crate::config::StrategyConfig;
use crate::confidence;
use crate::error::EvaluatorError;
use crate::signal::{Signal, StrategyFamily, StrategyKind};
use market_data::{aggregators, MarketMood, MarketSnapshot};
use tracing::info;

/// Loss (or stretch) beyond the threshold at which contrarian calls saturate
const CONTRARIAN_FULL_SCALE_PCT: f64 = 10.0;

/// Ride a bullish tape: buy the top gainers when advancers dominate
pub struct MarketMoodStrategy;

impl Strategy for MarketMoodStrategy {
    fn kind(&self) -> StrategyKind {
        StrategyKind::MarketMood
    }

    fn evaluate(
        &self,
        snapshot: &MarketSnapshot,
        config: &StrategyConfig,
    ) -> Result<Vec<Signal>, EvaluatorError> {
        let params = &config.sentiment.market_mood;
        let size = config.position_size(StrategyFamily::Sentiment);

        let breadth = aggregators::breadth(snapshot)
            .map_err(|e| EvaluatorError::InsufficientData(e.to_string()))?;

        if breadth.mood != MarketMood::Bullish {
            info!("Market is {}; no mood-following picks", breadth.mood);
            return Ok(Vec::new());
        }

        // Breadth share above an even split drives the score
        let score = confidence::from_excess(breadth.dominant_pct - 50.0, 50.0);

        let signals = aggregators::top_gainers(snapshot, params.top_n)
            .into_iter()
            .filter(|m| m.change_pct > 0.0)
            .map(|m| {
                Signal::buy(
                    m.symbol.clone(),
                    self.kind(),
                    m.change_pct,
                    score,
                    format!(
                        "Bullish market ({:.0}% advancing), up {:.2}%",
                        breadth.dominant_pct, m.change_pct
                    ),
                    snapshot.as_of,
                )
                .with_price(Some(m.last_price))
                .with_position_size(size)
            })
            .collect();

        Ok(signals)
    }
}

/// Buy sharp losers, and optionally fade stretched gainers
pub struct ContrarianStrategy;

impl Strategy for ContrarianStrategy {
    fn kind(&self) -> StrategyKind {
        StrategyKind::Contrarian
    }

    fn evaluate(
        &self,
        snapshot: &MarketSnapshot,
        config: &StrategyConfig,
    ) -> Result<Vec<Signal>, EvaluatorError> {
        let params = &config.sentiment.contrarian;
        let size = config.position_size(StrategyFamily::Sentiment);
        let mut signals: Vec<Signal> = aggregators::top_losers(snapshot, usize::MAX)
            .iter()
            .filter(|m| m.change_pct < -params.min_loss_percent)
            .take(params.max_stocks)
            .map(|m| {
                let loss = -m.change_pct;
                Signal::buy(
                    m.symbol.clone(),
                    self.kind(),
                    m.change_pct,
                    confidence::from_excess(loss - params.min_loss_percent, CONTRARIAN_FULL_SCALE_PCT),
                    format!("Oversold on the day, down {:.2}%", loss),
                    snapshot.as_of,
                )
                .with_price(Some(m.last_price))
                .with_position_size(size)
            })
            .collect();

        if params.fade_gainers {
            signals.extend(
                aggregators::movers(snapshot)
                    .iter()
                    .filter(|m| m.change_pct > params.fade_gain_percent)
                    .take(params.max_stocks)
                    .map(|m| {
                        Signal::sell(
                            m.symbol.clone(),
                            self.kind(),
                            m.change_pct,
                            confidence::from_excess(
                                m.change_pct - params.fade_gain_percent,
                                CONTRARIAN_FULL_SCALE_PCT,
                            ),
                            format!("Stretched on the day, up {:.2}%", m.change_pct),
                            snapshot.as_of,
                        )
                        .with_price(Some(m.last_price))
                        .with_position_size(size)
                    }),
            );
        }

        Ok(signals)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signal::Direction;
    use crate::strategies::fixtures::*;
    use market_data::{MarketSnapshot, StockSnapshot};

    #[test]
    fn test_mood_follows_bullish_breadth() {
        let snap = snapshot(vec![
            mover("A.NS", 3.0),
            mover("B.NS", 2.0),
            mover("C.NS", 1.0),
            mover("D.NS", -1.0),
        ]);
        let mut config = StrategyConfig::default();
        config.sentiment.market_mood.top_n = 2;

        let signals = MarketMoodStrategy.evaluate(&snap, &config).unwrap();
        let symbols: Vec<&str> = signals.iter().map(|s| s.symbol.as_str()).collect();
        assert_eq!(symbols, vec!["A.NS", "B.NS"]);
        // 75% advancing
        assert!((signals[0].confidence - 75.0).abs() < 1e-9);
    }

    #[test]
    fn test_mood_bearish_is_silent() {
        let snap = snapshot(vec![mover("A.NS", 1.0), mover("B.NS", -2.0), mover("C.NS", 0.0)]);
        let signals = MarketMoodStrategy
            .evaluate(&snap, &StrategyConfig::default())
            .unwrap();
        assert!(signals.is_empty());
    }

    #[test]
    fn test_mood_fails_without_quotes() {
        let snap = snapshot(vec![StockSnapshot::new("A.NS")]);
        let err = MarketMoodStrategy
            .evaluate(&snap, &StrategyConfig::default())
            .unwrap_err();
        assert!(matches!(err, EvaluatorError::InsufficientData(_)));

        let empty = MarketSnapshot::new(as_of());
        assert!(MarketMoodStrategy
            .evaluate(&empty, &StrategyConfig::default())
            .is_err());
    }

    #[test]
    fn test_contrarian_buys_losers_and_fades_gainers() {
        let snap = snapshot(vec![
            mover("UP.NS", 7.0),
            mover("FLAT.NS", 0.5),
            mover("DIP.NS", -2.0),
            mover("DROP.NS", -4.0),
            mover("CRASH.NS", -9.0),
        ]);

        let signals = ContrarianStrategy
            .evaluate(&snap, &StrategyConfig::default())
            .unwrap();

        let buys: Vec<&str> = signals
            .iter()
            .filter(|s| s.direction == Direction::Buy)
            .map(|s| s.symbol.as_str())
            .collect();
        assert_eq!(buys, vec!["CRASH.NS", "DROP.NS"]);

        let sells: Vec<&str> = signals
            .iter()
            .filter(|s| s.direction == Direction::Sell)
            .map(|s| s.symbol.as_str())
            .collect();
        assert_eq!(sells, vec!["UP.NS"]);
    }

    #[test]
    fn test_contrarian_respects_cap_and_fade_switch() {
        let snap = snapshot(vec![
            mover("A.NS", -5.0),
            mover("B.NS", -6.0),
            mover("C.NS", -7.0),
            mover("D.NS", 9.0),
        ]);
        let mut config = StrategyConfig::default();
        config.sentiment.contrarian.max_stocks = 2;
        config.sentiment.contrarian.fade_gainers = false;

        let signals = ContrarianStrategy.evaluate(&snap, &config).unwrap();
        let symbols: Vec<&str> = signals.iter().map(|s| s.symbol.as_str()).collect();
        assert_eq!(symbols, vec!["C.NS", "B.NS"]);
    }
}
