//! Domain types for FolioChart

pub mod point;
pub mod prices;
pub mod strategy;

pub use point::{StrategyId, TimelinePoint};
pub use prices::TokenPrices;
pub use strategy::{Bucket, StrategySnapshot, Transfer};

/// A backtest timeline, oldest day first.
pub type Timeline = Vec<TimelinePoint>;
