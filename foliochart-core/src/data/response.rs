//! Backtest response loading.
//!
//! The backtest service returns a JSON object whose `timeline` array holds
//! one point per simulated day. The array may be missing or null (failed or
//! empty simulation); that loads as an empty timeline rather than an error so
//! the chart always has something to render. A bare JSON array is accepted
//! as a timeline on its own.

use crate::domain::{Timeline, TimelinePoint};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid backtest response JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("backtest response must be a JSON object or array, got {0}")]
    UnexpectedShape(&'static str),
}

/// Backtest service response. Fields other than `timeline` are carried
/// through untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BacktestResponse {
    #[serde(default)]
    pub timeline: Option<Timeline>,

    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl BacktestResponse {
    pub fn from_timeline(timeline: Timeline) -> Self {
        Self {
            timeline: Some(timeline),
            extra: BTreeMap::new(),
        }
    }

    /// The timeline, or an empty one when the service sent none.
    pub fn timeline(&self) -> &[TimelinePoint] {
        self.timeline.as_deref().unwrap_or(&[])
    }

    pub fn into_timeline(self) -> Timeline {
        self.timeline.unwrap_or_default()
    }
}

/// Parse a backtest response from JSON text.
pub fn parse_response(json: &str) -> Result<BacktestResponse, LoadError> {
    let value: serde_json::Value = serde_json::from_str(json)?;
    match value {
        serde_json::Value::Array(_) => Ok(BacktestResponse::from_timeline(
            serde_json::from_value(value)?,
        )),
        serde_json::Value::Object(_) => Ok(serde_json::from_value(value)?),
        serde_json::Value::Null => Ok(BacktestResponse::default()),
        other => Err(LoadError::UnexpectedShape(json_kind(&other))),
    }
}

/// Read and parse a backtest response file.
pub fn load_response(path: &Path) -> Result<BacktestResponse, LoadError> {
    let content = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.display().to_string(),
        source,
    })?;
    let response = parse_response(&content)?;
    tracing::debug!(
        path = %path.display(),
        points = response.timeline().len(),
        "loaded backtest response"
    );
    Ok(response)
}

/// Mark the listed strategy ids as baseline on every point.
///
/// Tags already present in the payload are kept; this only adds.
pub fn tag_baselines(mut timeline: Timeline, baseline_ids: &[String]) -> Timeline {
    if baseline_ids.is_empty() {
        return timeline;
    }
    for point in &mut timeline {
        for (id, snapshot) in point.strategies.iter_mut() {
            if baseline_ids.iter().any(|b| b == id) {
                snapshot.is_baseline = true;
            }
        }
    }
    timeline
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}
