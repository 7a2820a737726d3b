//! Risk aggregation: merge per-strategy signals into capped recommendations

use crate::config::{AggregationConfig, ConflictPolicy, RiskConfig};
use crate::confidence;
use crate::signal::{Direction, Signal, SignalStrength};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};
use tracing::debug;

/// One admitted pick
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    /// 1-based position in the final list
    pub rank: usize,
    pub symbol: String,
    pub sector: String,
    pub direction: Direction,
    pub aggregated_confidence: f64,
    pub strength: SignalStrength,
    /// Percent of capital; 0 for sells
    pub implied_allocation_pct: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<Decimal>,
    pub rationale: String,
    /// Signals on the winning side
    pub contributing_signals: Vec<Signal>,
    /// Opposing signals outvoted under the net/strongest policies
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub dissenting_signals: Vec<Signal>,
}

/// Why a symbol did not make the list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum RejectionReason {
    BelowConfidence { confidence: f64, minimum: f64 },
    Conflict { buy_confidence: f64, sell_confidence: f64 },
    SectorCap { sector: String, cap: usize },
    AllocationCap { allocation_pct: f64, limit_pct: f64 },
    CapacityReached { max_recommendations: usize },
}

impl std::fmt::Display for RejectionReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RejectionReason::BelowConfidence { confidence, minimum } => {
                write!(f, "confidence {:.1} below minimum {:.1}", confidence, minimum)
            }
            RejectionReason::Conflict {
                buy_confidence,
                sell_confidence,
            } => write!(
                f,
                "conflicting signals (buy {:.1} vs sell {:.1})",
                buy_confidence, sell_confidence
            ),
            RejectionReason::SectorCap { sector, cap } => {
                write!(f, "sector {} already has {} picks", sector, cap)
            }
            RejectionReason::AllocationCap {
                allocation_pct,
                limit_pct,
            } => write!(
                f,
                "allocation {:.1}% exceeds limit {:.1}%",
                allocation_pct, limit_pct
            ),
            RejectionReason::CapacityReached {
                max_recommendations,
            } => write!(f, "list already holds {} picks", max_recommendations),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rejection {
    pub symbol: String,
    #[serde(flatten)]
    pub reason: RejectionReason,
}

/// Recommendations plus everything that was turned away
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Aggregation {
    pub recommendations: Vec<Recommendation>,
    pub rejected: Vec<Rejection>,
}

/// A symbol's merged view before risk limits
#[derive(Debug, Clone)]
struct Candidate {
    symbol: String,
    direction: Direction,
    confidence: f64,
    allocation_pct: f64,
    winners: Vec<Signal>,
    dissent: Vec<Signal>,
}

/// Applies confidence floor, conflict policy and risk caps
pub struct RiskAggregator<'a> {
    risk: &'a RiskConfig,
    aggregation: &'a AggregationConfig,
}

impl<'a> RiskAggregator<'a> {
    pub fn new(risk: &'a RiskConfig, aggregation: &'a AggregationConfig) -> Self {
        Self { risk, aggregation }
    }

    /// Merge signals into at most `max_recommendations` picks.
    ///
    /// `sector_of` resolves a symbol's sector for the per-sector cap.
    pub fn aggregate<F>(&self, signals: &[Signal], sector_of: F) -> Aggregation
    where
        F: Fn(&str) -> String,
    {
        let min_confidence = self.risk.min_confidence_score;
        let mut rejected = Vec::new();

        // Only actionable signals may promote
        let mut by_symbol: BTreeMap<&str, Vec<&Signal>> = BTreeMap::new();
        let mut weak: BTreeMap<&str, f64> = BTreeMap::new();
        for signal in signals {
            if signal.is_actionable(min_confidence) {
                by_symbol.entry(signal.symbol.as_str()).or_default().push(signal);
            } else {
                let best = weak.entry(signal.symbol.as_str()).or_insert(0.0);
                *best = best.max(signal.confidence);
            }
        }
        for (symbol, best) in weak {
            if !by_symbol.contains_key(symbol) {
                rejected.push(Rejection {
                    symbol: symbol.to_string(),
                    reason: RejectionReason::BelowConfidence {
                        confidence: best,
                        minimum: min_confidence,
                    },
                });
            }
        }

        let mut candidates = Vec::new();
        for (symbol, group) in by_symbol {
            match self.merge(symbol, &group) {
                Ok(candidate) if candidate.confidence >= min_confidence => candidates.push(candidate),
                Ok(candidate) => rejected.push(Rejection {
                    symbol: candidate.symbol,
                    reason: RejectionReason::BelowConfidence {
                        confidence: candidate.confidence,
                        minimum: min_confidence,
                    },
                }),
                Err(reason) => rejected.push(Rejection {
                    symbol: symbol.to_string(),
                    reason,
                }),
            }
        }

        candidates.sort_by(|a, b| {
            b.confidence
                .partial_cmp(&a.confidence)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.symbol.cmp(&b.symbol))
        });

        let recommendations = self.admit(candidates, &sector_of, &mut rejected);
        Aggregation {
            recommendations,
            rejected,
        }
    }

    /// Combine one symbol's signals, settling buy/sell conflicts
    fn merge(&self, symbol: &str, group: &[&Signal]) -> Result<Candidate, RejectionReason> {
        let weights = &self.aggregation.family_weights;
        let effective = |s: &&Signal| confidence::weighted(s.confidence, weights.weight(s.family));

        let (buys, sells): (Vec<&Signal>, Vec<&Signal>) =
            group.iter().copied().partition(|s| s.direction == Direction::Buy);
        let buy = confidence::combine(buys.iter().map(effective));
        let sell = confidence::combine(sells.iter().map(effective));

        let conflict = || RejectionReason::Conflict {
            buy_confidence: buy,
            sell_confidence: sell,
        };

        let (direction, score) = if sells.is_empty() {
            (Direction::Buy, buy)
        } else if buys.is_empty() {
            (Direction::Sell, sell)
        } else {
            let winner = match buy.partial_cmp(&sell) {
                Some(Ordering::Greater) => Direction::Buy,
                Some(Ordering::Less) => Direction::Sell,
                _ => return Err(conflict()),
            };
            let (won, lost) = match winner {
                Direction::Buy => (buy, sell),
                Direction::Sell => (sell, buy),
            };
            match self.aggregation.conflict_policy {
                ConflictPolicy::Drop => return Err(conflict()),
                ConflictPolicy::Net => (winner, won - lost),
                ConflictPolicy::Strongest => (winner, won),
            }
        };

        let (winners, dissent): (Vec<&Signal>, Vec<&Signal>) =
            group.iter().copied().partition(|s| s.direction == direction);

        let allocation_pct = match direction {
            Direction::Buy => winners
                .iter()
                .map(|s| s.suggested_position_pct)
                .fold(0.0, f64::max),
            Direction::Sell => 0.0,
        };

        debug!(
            "{}: {} at {:.1} from {} signal(s), {} dissenting",
            symbol,
            direction,
            score,
            winners.len(),
            dissent.len()
        );

        Ok(Candidate {
            symbol: symbol.to_string(),
            direction,
            confidence: confidence::clamp(score),
            allocation_pct,
            winners: winners.into_iter().cloned().collect(),
            dissent: dissent.into_iter().cloned().collect(),
        })
    }

    /// Greedy fill in rank order; violators are skipped, not fatal
    fn admit<F>(
        &self,
        candidates: Vec<Candidate>,
        sector_of: &F,
        rejected: &mut Vec<Rejection>,
    ) -> Vec<Recommendation>
    where
        F: Fn(&str) -> String,
    {
        let mut recommendations: Vec<Recommendation> = Vec::new();
        let mut per_sector: HashMap<String, usize> = HashMap::new();
        let mut allocated = 0.0;

        for candidate in candidates {
            if recommendations.len() >= self.risk.max_recommendations {
                rejected.push(Rejection {
                    symbol: candidate.symbol,
                    reason: RejectionReason::CapacityReached {
                        max_recommendations: self.risk.max_recommendations,
                    },
                });
                continue;
            }

            let sector = sector_of(&candidate.symbol);
            let taken = per_sector.get(&sector).copied().unwrap_or(0);
            if taken >= self.risk.max_stocks_per_sector {
                rejected.push(Rejection {
                    symbol: candidate.symbol,
                    reason: RejectionReason::SectorCap {
                        sector,
                        cap: self.risk.max_stocks_per_sector,
                    },
                });
                continue;
            }

            let limit = self.risk.max_allocation_per_stock;
            if candidate.allocation_pct > limit || allocated + candidate.allocation_pct > 100.0 {
                rejected.push(Rejection {
                    symbol: candidate.symbol,
                    reason: RejectionReason::AllocationCap {
                        allocation_pct: candidate.allocation_pct,
                        limit_pct: limit.min(100.0 - allocated),
                    },
                });
                continue;
            }

            allocated += candidate.allocation_pct;
            *per_sector.entry(sector.clone()).or_insert(0) += 1;

            let rationale = candidate
                .winners
                .iter()
                .map(|s| format!("{}: {}", s.strategy.display_name(), s.reason))
                .collect::<Vec<_>>()
                .join("; ");
            let price = candidate.winners.iter().find_map(|s| s.price);

            recommendations.push(Recommendation {
                rank: recommendations.len() + 1,
                symbol: candidate.symbol,
                sector,
                direction: candidate.direction,
                aggregated_confidence: candidate.confidence,
                strength: SignalStrength::from_confidence(candidate.confidence),
                implied_allocation_pct: candidate.allocation_pct,
                price,
                rationale,
                contributing_signals: candidate.winners,
                dissenting_signals: candidate.dissent,
            });
        }

        recommendations
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signal::StrategyKind;
    use chrono::{TimeZone, Utc};

    fn signal(symbol: &str, kind: StrategyKind, direction: Direction, confidence: f64) -> Signal {
        let ts = Utc.with_ymd_and_hms(2024, 6, 3, 15, 30, 0).unwrap();
        let s = match direction {
            Direction::Buy => Signal::buy(symbol, kind, 0.0, confidence, "test".into(), ts),
            Direction::Sell => Signal::sell(symbol, kind, 0.0, confidence, "test".into(), ts),
        };
        s.with_position_size(5.0)
    }

    fn sector(symbol: &str) -> String {
        match symbol {
            "HDFCBANK.NS" | "ICICIBANK.NS" | "SBIN.NS" => "Banking".to_string(),
            _ => "Other".to_string(),
        }
    }

    fn run(signals: &[Signal], risk: RiskConfig, aggregation: AggregationConfig) -> Aggregation {
        RiskAggregator::new(&risk, &aggregation).aggregate(signals, sector)
    }

    #[test]
    fn test_agreeing_signals_reinforce() {
        let signals = vec![
            signal("ITC.NS", StrategyKind::LowPe, Direction::Buy, 60.0),
            signal("ITC.NS", StrategyKind::HighDividend, Direction::Buy, 50.0),
            signal("TCS.NS", StrategyKind::LowPe, Direction::Buy, 70.0),
        ];
        let out = run(&signals, RiskConfig::default(), AggregationConfig::default());

        assert_eq!(out.recommendations.len(), 2);
        assert_eq!(out.recommendations[0].symbol, "ITC.NS");
        assert!((out.recommendations[0].aggregated_confidence - 80.0).abs() < 1e-9);
        assert_eq!(out.recommendations[0].contributing_signals.len(), 2);
        assert_eq!(out.recommendations[0].rank, 1);
        assert_eq!(out.recommendations[1].rank, 2);
    }

    #[test]
    fn test_floor_filters_weak_signals() {
        let signals = vec![signal("ITC.NS", StrategyKind::LowPe, Direction::Buy, 45.0)];
        let out = run(&signals, RiskConfig::default(), AggregationConfig::default());
        assert!(out.recommendations.is_empty());
        assert!(matches!(
            out.rejected[0].reason,
            RejectionReason::BelowConfidence { .. }
        ));
    }

    #[test]
    fn test_sector_cap_keeps_stronger() {
        let signals = vec![
            signal("HDFCBANK.NS", StrategyKind::LowPe, Direction::Buy, 70.0),
            signal("ICICIBANK.NS", StrategyKind::LowPe, Direction::Buy, 80.0),
            signal("ITC.NS", StrategyKind::LowPe, Direction::Buy, 60.0),
        ];
        let risk = RiskConfig {
            max_stocks_per_sector: 1,
            ..RiskConfig::default()
        };
        let out = run(&signals, risk, AggregationConfig::default());

        let symbols: Vec<&str> = out.recommendations.iter().map(|r| r.symbol.as_str()).collect();
        assert_eq!(symbols, vec!["ICICIBANK.NS", "ITC.NS"]);
        assert!(out
            .rejected
            .iter()
            .any(|r| r.symbol == "HDFCBANK.NS" && matches!(r.reason, RejectionReason::SectorCap { .. })));
    }

    #[test]
    fn test_capacity_and_tie_break() {
        let signals: Vec<Signal> = ["D.NS", "B.NS", "C.NS", "A.NS"]
            .iter()
            .map(|s| signal(s, StrategyKind::LowPe, Direction::Buy, 70.0))
            .collect();
        let risk = RiskConfig {
            max_recommendations: 2,
            max_stocks_per_sector: 10,
            ..RiskConfig::default()
        };
        let out = run(&signals, risk, AggregationConfig::default());

        let symbols: Vec<&str> = out.recommendations.iter().map(|r| r.symbol.as_str()).collect();
        assert_eq!(symbols, vec!["A.NS", "B.NS"]);
        assert_eq!(out.rejected.len(), 2);
    }

    #[test]
    fn test_total_allocation_never_exceeds_capital() {
        let mut signals: Vec<Signal> = (1..=11)
            .map(|i| {
                signal(&format!("S{:02}.NS", i), StrategyKind::LowPe, Direction::Buy, 95.0 - i as f64)
                    .with_position_size(10.0)
            })
            .collect();
        signals.push(signal("X1.NS", StrategyKind::Contrarian, Direction::Sell, 60.0));
        signals.push(signal("X2.NS", StrategyKind::Contrarian, Direction::Sell, 55.0));

        let risk = RiskConfig {
            max_recommendations: 15,
            max_stocks_per_sector: 20,
            ..RiskConfig::default()
        };
        let out = run(&signals, risk, AggregationConfig::default());

        let buys = out
            .recommendations
            .iter()
            .filter(|r| r.direction == Direction::Buy)
            .count();
        assert_eq!(buys, 10);
        let total: f64 = out.recommendations.iter().map(|r| r.implied_allocation_pct).sum();
        assert!((total - 100.0).abs() < 1e-9);

        let eleventh = out.rejected.iter().find(|r| r.symbol == "S11.NS").unwrap();
        match &eleventh.reason {
            RejectionReason::AllocationCap {
                allocation_pct,
                limit_pct,
            } => {
                assert_eq!(*allocation_pct, 10.0);
                assert_eq!(*limit_pct, 0.0);
            }
            other => panic!("unexpected rejection {:?}", other),
        }

        // Sells carry no allocation and still fit after the book is full
        let sells: Vec<&str> = out
            .recommendations
            .iter()
            .filter(|r| r.direction == Direction::Sell)
            .map(|r| r.symbol.as_str())
            .collect();
        assert_eq!(sells, vec!["X1.NS", "X2.NS"]);
        assert_eq!(out.recommendations.len(), 12);
    }

    #[test]
    fn test_allocation_cap_skips_and_continues() {
        let big = signal("BIG.NS", StrategyKind::LowPe, Direction::Buy, 90.0).with_position_size(25.0);
        let small = signal("SMALL.NS", StrategyKind::LowPe, Direction::Buy, 60.0);
        let out = run(&[big, small], RiskConfig::default(), AggregationConfig::default());

        assert_eq!(out.recommendations.len(), 1);
        assert_eq!(out.recommendations[0].symbol, "SMALL.NS");
        assert_eq!(out.recommendations[0].rank, 1);
        assert!(matches!(
            out.rejected[0].reason,
            RejectionReason::AllocationCap { .. }
        ));
    }

    #[test]
    fn test_conflict_policies() {
        let signals = vec![
            signal("X.NS", StrategyKind::TopGainers, Direction::Buy, 90.0),
            signal("X.NS", StrategyKind::Contrarian, Direction::Sell, 60.0),
        ];

        let net = run(&signals, RiskConfig::default(), AggregationConfig::default());
        assert!(net.recommendations.is_empty());
        assert!(matches!(
            net.rejected[0].reason,
            RejectionReason::BelowConfidence { .. }
        ));

        let mut strongest = AggregationConfig::default();
        strongest.conflict_policy = ConflictPolicy::Strongest;
        let out = run(&signals, RiskConfig::default(), strongest);
        assert_eq!(out.recommendations.len(), 1);
        assert_eq!(out.recommendations[0].direction, Direction::Buy);
        assert_eq!(out.recommendations[0].aggregated_confidence, 90.0);
        assert_eq!(out.recommendations[0].dissenting_signals.len(), 1);

        let mut drop = AggregationConfig::default();
        drop.conflict_policy = ConflictPolicy::Drop;
        let out = run(&signals, RiskConfig::default(), drop);
        assert!(out.recommendations.is_empty());
        assert!(matches!(out.rejected[0].reason, RejectionReason::Conflict { .. }));
    }

    #[test]
    fn test_net_policy_keeps_clear_winner() {
        let signals = vec![
            signal("X.NS", StrategyKind::LowPe, Direction::Buy, 100.0),
            signal("X.NS", StrategyKind::Contrarian, Direction::Sell, 40.0),
        ];
        let risk = RiskConfig {
            min_confidence_score: 30.0,
            ..RiskConfig::default()
        };
        let out = run(&signals, risk, AggregationConfig::default());
        assert_eq!(out.recommendations.len(), 1);
        assert!((out.recommendations[0].aggregated_confidence - 60.0).abs() < 1e-9);
    }

    #[test]
    fn test_exact_tie_is_a_conflict() {
        let signals = vec![
            signal("X.NS", StrategyKind::LowPe, Direction::Buy, 70.0),
            signal("X.NS", StrategyKind::Contrarian, Direction::Sell, 70.0),
        ];
        let out = run(&signals, RiskConfig::default(), AggregationConfig::default());
        assert!(out.recommendations.is_empty());
        assert!(matches!(out.rejected[0].reason, RejectionReason::Conflict { .. }));
    }

    #[test]
    fn test_family_weight_scales_confidence() {
        let signals = vec![signal("ITC.NS", StrategyKind::LowPe, Direction::Buy, 60.0)];
        let mut aggregation = AggregationConfig::default();
        aggregation.family_weights.value = 0.5;
        let out = run(&signals, RiskConfig::default(), aggregation);
        assert!(out.recommendations.is_empty());
    }

    #[test]
    fn test_sell_implies_no_allocation() {
        let signals = vec![signal("X.NS", StrategyKind::SupportResistance, Direction::Sell, 70.0)];
        let out = run(&signals, RiskConfig::default(), AggregationConfig::default());
        assert_eq!(out.recommendations[0].direction, Direction::Sell);
        assert_eq!(out.recommendations[0].implied_allocation_pct, 0.0);
    }
}
