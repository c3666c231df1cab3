//! Chart preparation pipeline: raw backtest timeline in, chart-ready timeline out.
//!
//! Order matters: the moving average is computed over the full timeline and
//! only then is the timeline sampled. Sampling first would leave holes in the
//! averaging window.

use crate::config::ChartConfig;
use crate::data::{tag_baselines, BacktestResponse};
use crate::domain::{Timeline, TimelinePoint};
use crate::fingerprint::{config_hash, timeline_hash, ContentHash};
use crate::indicators::enrich_with_dma;
use crate::sampling::plan_sample;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// What the pipeline did to one timeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SampleSummary {
    pub input_points: usize,
    pub output_points: usize,
    pub critical_points: usize,
    pub effective_max: usize,
    pub resampled: bool,
    pub overflow: bool,
    pub thinned: bool,
    pub points_with_dma: usize,
    /// Days on which each strategy signalled or moved funds (full timeline).
    pub active_days: BTreeMap<String, usize>,
    pub first_date: Option<NaiveDate>,
    pub last_date: Option<NaiveDate>,
    /// Hash of the raw (baseline-tagged) timeline.
    pub timeline_hash: Option<ContentHash>,
    pub config_hash: Option<ContentHash>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PreparedTimeline {
    pub points: Timeline,
    pub summary: SampleSummary,
}

/// Tag baselines, enrich with the moving average, then sample.
pub fn prepare_chart_timeline(raw: Timeline, config: &ChartConfig) -> PreparedTimeline {
    let raw = tag_baselines(raw, &config.baseline.strategy_ids);
    let hash = timeline_hash(&raw)
        .map_err(|e| tracing::warn!(error = %e, "could not fingerprint timeline"))
        .ok();
    let settings_hash = config_hash(config)
        .map_err(|e| tracing::warn!(error = %e, "could not fingerprint chart config"))
        .ok();
    let active_days = active_days(&raw);

    let enriched = enrich_with_dma(&raw, &config.dma);
    let plan = plan_sample(&enriched, &config.sampling);

    let points: Timeline = plan.apply_owned(enriched);

    let summary = SampleSummary {
        input_points: plan.input_len,
        output_points: points.len(),
        critical_points: plan.critical_count,
        effective_max: plan.effective_max,
        resampled: plan.resampled,
        overflow: plan.overflow,
        thinned: plan.thinned,
        points_with_dma: points.iter().filter(|p| p.dma_200.is_some()).count(),
        active_days,
        first_date: raw.first().map(|p| p.date),
        last_date: raw.last().map(|p| p.date),
        timeline_hash: hash,
        config_hash: settings_hash,
    };

    tracing::info!(
        input = summary.input_points,
        output = summary.output_points,
        critical = summary.critical_points,
        "prepared chart timeline"
    );

    PreparedTimeline { points, summary }
}

/// Prepare the timeline carried by a backtest response; a response without
/// a timeline prepares to an empty chart.
pub fn prepare_response(response: BacktestResponse, config: &ChartConfig) -> PreparedTimeline {
    prepare_chart_timeline(response.into_timeline(), config)
}

fn active_days(timeline: &[TimelinePoint]) -> BTreeMap<String, usize> {
    let mut counts = BTreeMap::new();
    for point in timeline {
        for (id, snapshot) in &point.strategies {
            let entry = counts.entry(id.clone()).or_insert(0);
            if snapshot.has_activity() {
                *entry += 1;
            }
        }
    }
    counts
}
