//! TimelinePoint — one simulated day across every compared strategy.

use super::prices::TokenPrices;
use super::strategy::StrategySnapshot;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Strategy identifier as emitted by the backtest service.
pub type StrategyId = String;

/// A single day of a backtest timeline.
///
/// Array position is the only chronological index; `date` is unique within a
/// timeline and only used for display and validation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimelinePoint {
    pub date: NaiveDate,

    #[serde(default)]
    pub token_price: TokenPrices,

    #[serde(default, deserialize_with = "lenient_strategies")]
    pub strategies: BTreeMap<StrategyId, StrategySnapshot>,

    /// Trailing moving average of the representative price. Set by
    /// `indicators::dma::enrich_with_dma`; `None` until a full contiguous
    /// window is available.
    #[serde(default)]
    pub dma_200: Option<f64>,

    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl TimelinePoint {
    pub fn new(date: NaiveDate) -> Self {
        Self {
            date,
            token_price: TokenPrices::new(),
            strategies: BTreeMap::new(),
            dma_200: None,
            extra: BTreeMap::new(),
        }
    }

    pub fn with_price(mut self, symbol: &str, price: f64) -> Self {
        self.token_price.insert(symbol, price);
        self
    }

    pub fn with_strategy(mut self, id: &str, snapshot: StrategySnapshot) -> Self {
        self.strategies.insert(id.to_string(), snapshot);
        self
    }

    /// True if any non-baseline strategy signalled or moved funds on this day.
    ///
    /// Boundary points are critical too, but that depends on position and is
    /// decided by the sampler.
    pub fn has_critical_activity(&self) -> bool {
        self.strategies.values().any(StrategySnapshot::is_chart_critical)
    }

    /// The price the moving average tracks: the reference token if priced,
    /// else the first priced token in document order.
    pub fn representative_price(&self, reference_token: &str) -> Option<f64> {
        self.token_price
            .get(reference_token)
            .or_else(|| self.token_price.first())
    }
}

/// A null map is empty; null or malformed strategy records are skipped.
fn lenient_strategies<'de, D>(
    deserializer: D,
) -> Result<BTreeMap<StrategyId, StrategySnapshot>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw = Option::<BTreeMap<StrategyId, serde_json::Value>>::deserialize(deserializer)?
        .unwrap_or_default();
    Ok(raw
        .into_iter()
        .filter_map(|(id, value)| {
            if value.is_null() {
                return None;
            }
            match serde_json::from_value(value) {
                Ok(snapshot) => Some((id, snapshot)),
                Err(e) => {
                    tracing::debug!(strategy = %id, error = %e, "skipping malformed strategy record");
                    None
                }
            }
        })
        .collect())
}
