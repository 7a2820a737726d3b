//! End-to-end screening properties: caps, floor, ordering, conflicts,
//! evaluator isolation and failure handling.

mod fixtures;

use fixtures::*;
use market_data::{MarketSnapshot, Quote, StockSnapshot};
use rust_decimal::Decimal;
use screener_core::{
    ConflictPolicy, Direction, RejectionReason, ScreeningEngine, StrategyConfig, StrategyFactory,
    StrategyKind,
};
use std::collections::HashMap;

fn run(config: StrategyConfig, snapshot: &MarketSnapshot) -> screener_core::ScreeningReport {
    ScreeningEngine::new(config).unwrap().run(snapshot)
}

#[test]
fn test_default_run_respects_every_cap() {
    let config = StrategyConfig::default();
    let report = run(config.clone(), &nifty_snapshot());
    let risk = &config.risk_management;

    assert!(!report.recommendations.is_empty());
    assert!(report.recommendations.len() <= risk.max_recommendations);

    let mut per_sector: HashMap<&str, usize> = HashMap::new();
    for rec in &report.recommendations {
        *per_sector.entry(rec.sector.as_str()).or_insert(0) += 1;
        assert!(rec.aggregated_confidence >= risk.min_confidence_score);
        assert!(rec.implied_allocation_pct <= risk.max_allocation_per_stock);
        assert!(!rec.contributing_signals.is_empty());
    }
    assert!(per_sector.values().all(|n| *n <= risk.max_stocks_per_sector));
    assert!(report.total_allocation_pct() <= 100.0);
}

#[test]
fn test_ranking_is_descending_with_symbol_tie_break() {
    let report = run(StrategyConfig::default(), &nifty_snapshot());

    for pair in report.recommendations.windows(2) {
        let (a, b) = (&pair[0], &pair[1]);
        assert!(a.aggregated_confidence >= b.aggregated_confidence);
        if a.aggregated_confidence == b.aggregated_confidence {
            assert!(a.symbol < b.symbol);
        }
        assert_eq!(a.rank + 1, b.rank);
    }

    // Both value names saturate at 100; COALINDIA sorts first
    assert_eq!(report.recommendations[0].symbol, "COALINDIA.NS");
    assert_eq!(report.recommendations[1].symbol, "ITC.NS");
}

#[test]
fn test_identical_input_gives_identical_output() {
    let snapshot = nifty_snapshot();
    let first = run(StrategyConfig::default(), &snapshot);
    let second = run(StrategyConfig::default(), &snapshot);

    assert_eq!(first, second);
    assert_eq!(
        serde_json::to_string(&first).unwrap(),
        serde_json::to_string(&second).unwrap()
    );
}

#[test]
fn test_rsi_only_symbol_scores_from_rsi_alone() {
    let report = run(StrategyConfig::default(), &nifty_snapshot());

    let tcs = report
        .recommendations
        .iter()
        .find(|r| r.symbol == "TCS.NS")
        .expect("TCS should be recommended");

    assert_eq!(tcs.direction, Direction::Buy);
    assert_eq!(tcs.sector, "Information Technology");
    assert_eq!(tcs.contributing_signals.len(), 1);
    assert_eq!(tcs.contributing_signals[0].strategy, StrategyKind::RsiOversold);
    assert!((tcs.aggregated_confidence - 58.333_333_333).abs() < 1e-6);
}

#[test]
fn test_sector_cap_of_one_keeps_strongest_bank() {
    let mut config = StrategyConfig::default();
    config.risk_management.max_stocks_per_sector = 1;
    let report = run(config, &nifty_snapshot());

    let banks: Vec<&str> = report
        .recommendations
        .iter()
        .filter(|r| r.sector == "Banking")
        .map(|r| r.symbol.as_str())
        .collect();
    assert_eq!(banks, vec!["HDFCBANK.NS"]);

    for symbol in ["ICICIBANK.NS", "SBIN.NS"] {
        assert!(report.rejected.iter().any(|r| r.symbol == symbol
            && matches!(r.reason, RejectionReason::SectorCap { .. })));
    }
}

#[test]
fn test_max_recommendations_truncates_ranked_list() {
    let mut config = StrategyConfig::default();
    config.risk_management.max_recommendations = 3;
    let report = run(config, &nifty_snapshot());

    let symbols: Vec<&str> = report.recommendations.iter().map(|r| r.symbol.as_str()).collect();
    assert_eq!(symbols, vec!["COALINDIA.NS", "ITC.NS", "HDFCBANK.NS"]);
    assert!(report
        .rejected
        .iter()
        .any(|r| matches!(r.reason, RejectionReason::CapacityReached { .. })));
}

#[test]
fn test_momentum_vs_contrarian_conflict_never_yields_two_calls() {
    for policy in [ConflictPolicy::Net, ConflictPolicy::Strongest, ConflictPolicy::Drop] {
        let mut config = StrategyConfig::default();
        config.aggregation.conflict_policy = policy;
        let report = run(config, &nifty_snapshot());

        // The conflict really is there
        let (signals, _) = ScreeningEngine::new(StrategyConfig::default())
            .unwrap()
            .evaluate(&nifty_snapshot());
        let directions: Vec<Direction> = signals
            .iter()
            .filter(|s| s.symbol == "TATASTEEL.NS")
            .map(|s| s.direction)
            .collect();
        assert!(directions.contains(&Direction::Buy));
        assert!(directions.contains(&Direction::Sell));

        let calls: Vec<_> = report
            .recommendations
            .iter()
            .filter(|r| r.symbol == "TATASTEEL.NS")
            .collect();
        assert!(calls.len() <= 1);

        match policy {
            ConflictPolicy::Net => {
                // Buy side outweighs the fade, but not by enough to clear the floor
                assert!(calls.is_empty());
                assert!(report.rejected.iter().any(|r| r.symbol == "TATASTEEL.NS"
                    && matches!(r.reason, RejectionReason::BelowConfidence { .. })));
            }
            ConflictPolicy::Strongest => {
                assert_eq!(calls.len(), 1);
                assert_eq!(calls[0].direction, Direction::Buy);
                assert_eq!(calls[0].dissenting_signals.len(), 1);
            }
            ConflictPolicy::Drop => {
                assert!(calls.is_empty());
                assert!(report.rejected.iter().any(|r| r.symbol == "TATASTEEL.NS"
                    && matches!(r.reason, RejectionReason::Conflict { .. })));
            }
        }
    }
}

#[test]
fn test_evaluators_are_independent() {
    let snapshot = nifty_snapshot();
    let config = StrategyConfig::default();
    let (all, _) = ScreeningEngine::new(config.clone()).unwrap().evaluate(&snapshot);

    for kind in StrategyKind::ALL {
        let alone = StrategyFactory::create(kind).evaluate(&snapshot, &config).unwrap();
        let within: Vec<_> = all.iter().filter(|s| s.strategy == kind).cloned().collect();
        assert_eq!(alone, within, "{} changed when run with others", kind);
    }

    let mut without_value = config.clone();
    without_value.value.low_pe.enabled = false;
    without_value.value.high_dividend.enabled = false;
    let (rest, _) = ScreeningEngine::new(without_value).unwrap().evaluate(&snapshot);
    let expected: Vec<_> = all
        .iter()
        .filter(|s| !matches!(s.strategy, StrategyKind::LowPe | StrategyKind::HighDividend))
        .cloned()
        .collect();
    assert_eq!(rest, expected);
}

#[test]
fn test_failed_evaluator_does_not_sink_the_run() {
    // No quotes anywhere: breadth is impossible, RSI still works
    let snapshot = MarketSnapshot::new(as_of())
        .with_stock(StockSnapshot::new("TCS.NS").with_candles(candles(&rsi_25_closes())));
    let report = run(StrategyConfig::default(), &snapshot);

    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].strategy, StrategyKind::MarketMood);
    assert!(report.market.is_none());
    assert_eq!(report.recommendations.len(), 1);
    assert_eq!(report.recommendations[0].symbol, "TCS.NS");
}

#[test]
fn test_overflowing_quote_is_skipped_not_fatal() {
    let absurd = Quote {
        open: Decimal::ONE,
        last_price: Decimal::from_i128_with_scale(10i128.pow(27), 0),
        previous_close: None,
        volume: None,
    };
    let snapshot = nifty_snapshot().with_stock(StockSnapshot::new("BUBBLE.NS").with_quote(absurd));
    let report = run(StrategyConfig::default(), &snapshot);

    assert!(report.failures.is_empty());
    assert!(report.recommendations.iter().all(|r| r.symbol != "BUBBLE.NS"));
    assert!(report.recommendations.iter().any(|r| r.symbol == "HDFCBANK.NS"));
    // Eight fixture quotes; TCS has candles only and BUBBLE is dropped
    assert_eq!(report.market.unwrap().total, 8);
}

#[test]
fn test_invalid_yaml_config_is_rejected_before_evaluation() {
    let yaml = r#"
momentum:
  moving_average:
    short_period: 60
    long_period: 50
"#;
    let config: StrategyConfig = serde_yaml::from_str(yaml).unwrap();
    let err = ScreeningEngine::new(config).err().expect("config should be rejected");
    assert!(err.to_string().contains("short_period"));
}

#[test]
fn test_yaml_overrides_merge_with_defaults() {
    let yaml = r#"
risk_management:
  max_recommendations: 5
aggregation:
  conflict_policy: strongest
  family_weights:
    sentiment: 0.5
"#;
    let config: StrategyConfig = serde_yaml::from_str(yaml).unwrap();
    assert_eq!(config.risk_management.max_recommendations, 5);
    assert_eq!(config.risk_management.max_stocks_per_sector, 3);
    assert_eq!(config.aggregation.conflict_policy, ConflictPolicy::Strongest);
    assert_eq!(config.aggregation.family_weights.sentiment, 0.5);
    assert_eq!(config.aggregation.family_weights.value, 1.0);

    let report = run(config, &nifty_snapshot());
    assert!(report.recommendations.len() <= 5);
}
