//! Per-strategy state recorded on each timeline day.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Where funds sit inside a simulated portfolio.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Bucket {
    Spot,
    Stable,
    #[serde(alias = "liquidity_position")]
    Lp,
    /// Any bucket name this engine does not model.
    #[serde(other)]
    Other,
}

/// A movement of funds between buckets on a given day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transfer {
    pub from: Bucket,
    pub to: Bucket,
    pub amount_usd: f64,
}

/// One strategy's record for one simulated day.
///
/// `is_baseline` marks the reference strategy (plain periodic buying) whose
/// activity never makes a day chart-critical. Fields the engine does not
/// interpret are kept in `extra` and written back out unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StrategySnapshot {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event: Option<String>,

    #[serde(default, deserialize_with = "lenient_transfers", skip_serializing_if = "Vec::is_empty")]
    pub transfers: Vec<Transfer>,

    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub is_baseline: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub portfolio_value: Option<f64>,

    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl StrategySnapshot {
    /// A day on which this strategy fired a signal or moved funds.
    pub fn has_activity(&self) -> bool {
        self.event.is_some() || !self.transfers.is_empty()
    }

    /// Activity that must survive chart sampling.
    pub fn is_chart_critical(&self) -> bool {
        !self.is_baseline && self.has_activity()
    }
}

/// A null list is empty; entries that are not a well-formed transfer are
/// dropped so the rest of the day still loads.
fn lenient_transfers<'de, D>(deserializer: D) -> Result<Vec<Transfer>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw = Option::<Vec<serde_json::Value>>::deserialize(deserializer)?.unwrap_or_default();
    Ok(raw
        .into_iter()
        .filter_map(|value| serde_json::from_value(value).ok())
        .collect())
}
