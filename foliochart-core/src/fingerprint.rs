//! Content fingerprints for prepared charts.
//!
//! A prepared chart is fully determined by the raw timeline and the chart
//! config, so a renderer can cache prepared output under
//! `(timeline_hash, config_hash)`.

use crate::config::ChartConfig;
use crate::domain::TimelinePoint;
use serde::{Deserialize, Serialize};
use std::fmt;

/// BLAKE3 digest, hex encoded.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ContentHash(pub String);

impl ContentHash {
    pub fn from_bytes(bytes: &[u8]) -> Self {
        Self(blake3::hash(bytes).to_hex().to_string())
    }

    /// First 12 hex characters, for log lines and file names.
    pub fn short(&self) -> &str {
        &self.0[..self.0.len().min(12)]
    }
}

impl fmt::Display for ContentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Hash of the timeline's canonical JSON (strategy maps are ordered by id,
/// price maps by document order).
pub fn timeline_hash(timeline: &[TimelinePoint]) -> Result<ContentHash, serde_json::Error> {
    let mut hasher = blake3::Hasher::new();
    serde_json::to_writer(&mut hasher, timeline)?;
    Ok(ContentHash(hasher.finalize().to_hex().to_string()))
}

/// Hash of the config fields that affect chart output.
pub fn config_hash(config: &ChartConfig) -> Result<ContentHash, serde_json::Error> {
    let json = serde_json::to_vec(config)?;
    Ok(ContentHash::from_bytes(&json))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{synthetic_timeline, SyntheticOptions};

    #[test]
    fn hashing_is_deterministic() {
        let tl = synthetic_timeline(30, 1, &SyntheticOptions::default());
        assert_eq!(timeline_hash(&tl).unwrap(), timeline_hash(&tl).unwrap());
    }

    #[test]
    fn any_change_changes_hash() {
        let tl = synthetic_timeline(30, 1, &SyntheticOptions::default());
        let mut changed = tl.clone();
        changed[10].token_price.insert("btc", 1.0);
        assert_ne!(timeline_hash(&tl).unwrap(), timeline_hash(&changed).unwrap());
    }

    #[test]
    fn config_hash_tracks_sampling_params() {
        let a = ChartConfig::default();
        let mut b = ChartConfig::default();
        b.sampling.min_points = 60;
        assert_ne!(config_hash(&a).unwrap(), config_hash(&b).unwrap());
    }

    #[test]
    fn short_hash_is_prefix() {
        let h = ContentHash::from_bytes(b"timeline");
        assert_eq!(h.0.len(), 64);
        assert!(h.0.starts_with(h.short()));
        assert_eq!(h.short().len(), 12);
    }
}
