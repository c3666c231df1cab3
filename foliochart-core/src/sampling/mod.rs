//! Chart sampling — bounded-size timelines that never lose a trading signal.
//!
//! Two pieces:
//! - `spacing`: generic evenly spaced pick of k out of n
//! - `critical`: keeps boundary and signal days, fills the rest evenly

pub mod critical;
pub mod spacing;

pub use critical::{critical_indices, plan_sample, sample_timeline, SamplePlan};
pub use spacing::{even_positions, space_evenly};

use serde::{Deserialize, Serialize};

/// Below this many points a timeline is charted as-is.
pub const MIN_CHART_POINTS: usize = 90;

/// Chart ceiling when not overridden.
pub const MAX_CHART_POINTS: usize = 150;

/// Slack added to the critical count when sizing the ceiling.
pub const EVENT_PADDING: usize = 20;

/// What to do when critical points alone exceed the sampling budget.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CeilingPolicy {
    /// Return every critical point, even above `max_points`.
    #[default]
    Soft,
    /// Thin critical points evenly down to `max_points`, keeping first and last.
    Hard,
}

/// Point-count band for one sampling call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SamplingParams {
    pub min_points: usize,
    pub max_points: usize,
    pub event_padding: usize,
    pub ceiling: CeilingPolicy,
}

impl Default for SamplingParams {
    fn default() -> Self {
        Self {
            min_points: MIN_CHART_POINTS,
            max_points: MAX_CHART_POINTS,
            event_padding: EVENT_PADDING,
            ceiling: CeilingPolicy::Soft,
        }
    }
}

impl SamplingParams {
    pub fn with_min_points(mut self, min_points: usize) -> Self {
        self.min_points = min_points;
        self
    }

    /// Dynamic ceiling: dense-event timelines may use more of the budget,
    /// never beyond `max_points`.
    pub fn effective_max(&self, critical_count: usize) -> usize {
        self.max_points
            .min(self.min_points.max(critical_count + self.event_padding))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_chart_constants() {
        let p = SamplingParams::default();
        assert_eq!(p.min_points, 90);
        assert_eq!(p.max_points, 150);
        assert_eq!(p.event_padding, 20);
        assert_eq!(p.ceiling, CeilingPolicy::Soft);
    }

    #[test]
    fn effective_max_floors_at_min_points() {
        assert_eq!(SamplingParams::default().effective_max(4), 90);
    }

    #[test]
    fn effective_max_grows_with_events() {
        assert_eq!(SamplingParams::default().effective_max(100), 120);
    }

    #[test]
    fn effective_max_capped_at_max_points() {
        assert_eq!(SamplingParams::default().effective_max(400), 150);
    }

    #[test]
    fn ceiling_policy_serde_names() {
        let p: SamplingParams = toml::from_str("ceiling = \"hard\"").unwrap();
        assert_eq!(p.ceiling, CeilingPolicy::Hard);
        assert_eq!(p.min_points, 90);
    }
}
