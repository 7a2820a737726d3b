pub mod aggregator;
pub mod confidence;
pub mod config;
pub mod engine;
pub mod error;
pub mod indicators;
pub mod signal;
pub mod strategies;

pub use aggregator::{Aggregation, Recommendation, Rejection, RejectionReason, RiskAggregator};
pub use config::{ConflictPolicy, StrategyConfig};
pub use engine::{EvaluatorFailure, ScreeningEngine, ScreeningReport};
pub use error::{ConfigError, EvaluatorError};
pub use signal::{Direction, Signal, SignalStrength, StrategyFamily, StrategyKind};
pub use strategies::{Strategy, StrategyFactory};
