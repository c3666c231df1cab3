//! Critical-point sampler.
//!
//! A point is critical if it is the first or last point, or if any non-baseline
//! strategy signalled or moved funds that day. Critical points are never
//! sampled away; remaining budget goes to evenly spaced ordinary days.
//!
//! Sampling works on positions throughout, so each picked point maps straight
//! back to its source index.

use super::spacing::even_positions;
use super::{CeilingPolicy, SamplingParams};
use crate::domain::TimelinePoint;
use std::borrow::Cow;

/// Which input positions a sampling call keeps, and why.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SamplePlan {
    /// Kept positions, strictly ascending.
    pub indices: Vec<usize>,
    pub input_len: usize,
    pub critical_count: usize,
    pub effective_max: usize,
    /// False when the input fits the budget and is returned as-is.
    pub resampled: bool,
    /// Critical points alone exceeded `max_points` and were all kept.
    pub overflow: bool,
    /// Critical points were thinned to honour a hard ceiling.
    pub thinned: bool,
}

impl SamplePlan {
    pub fn output_len(&self) -> usize {
        self.indices.len()
    }

    /// Materialize the plan. Borrows the input when nothing was dropped.
    pub fn apply<'a>(&self, timeline: &'a [TimelinePoint]) -> Cow<'a, [TimelinePoint]> {
        if !self.resampled {
            return Cow::Borrowed(timeline);
        }
        Cow::Owned(
            self.indices
                .iter()
                .filter_map(|&i| timeline.get(i).cloned())
                .collect(),
        )
    }

    /// Materialize the plan from an owned timeline, handing it back untouched
    /// when nothing was dropped.
    pub fn apply_owned(&self, timeline: Vec<TimelinePoint>) -> Vec<TimelinePoint> {
        if !self.resampled {
            return timeline;
        }
        self.apply(&timeline).into_owned()
    }
}

/// Positions of every critical point, ascending. Includes 0 and the last
/// position for any non-empty timeline.
pub fn critical_indices(timeline: &[TimelinePoint]) -> Vec<usize> {
    let last = match timeline.len() {
        0 => return Vec::new(),
        n => n - 1,
    };
    timeline
        .iter()
        .enumerate()
        .filter(|(i, point)| *i == 0 || *i == last || point.has_critical_activity())
        .map(|(i, _)| i)
        .collect()
}

/// Decide which points of `timeline` to chart.
pub fn plan_sample(timeline: &[TimelinePoint], params: &SamplingParams) -> SamplePlan {
    let len = timeline.len();
    let critical = critical_indices(timeline);
    let critical_count = critical.len();
    let effective_max = params.effective_max(critical_count);

    let unchanged = |critical_count, effective_max| SamplePlan {
        indices: (0..len).collect(),
        input_len: len,
        critical_count,
        effective_max,
        resampled: false,
        overflow: false,
        thinned: false,
    };

    if len <= params.min_points || len <= effective_max {
        tracing::debug!(len, critical_count, effective_max, "timeline fits chart budget");
        return unchanged(critical_count, effective_max);
    }

    if critical_count >= effective_max {
        return critical_only(critical, len, effective_max, params);
    }

    let remaining_slots = effective_max - critical_count;
    let mut is_critical = vec![false; len];
    for &i in &critical {
        is_critical[i] = true;
    }
    let ordinary: Vec<usize> = (0..len).filter(|&i| !is_critical[i]).collect();

    let mut indices: Vec<usize> = even_positions(ordinary.len(), remaining_slots)
        .into_iter()
        .map(|pos| ordinary[pos])
        .chain(critical)
        .collect();
    indices.sort_unstable();

    tracing::debug!(
        len,
        critical_count,
        effective_max,
        output = indices.len(),
        "sampled timeline"
    );

    SamplePlan {
        indices,
        input_len: len,
        critical_count,
        effective_max,
        resampled: true,
        overflow: false,
        thinned: false,
    }
}

/// No room for ordinary days: keep critical points only.
fn critical_only(
    critical: Vec<usize>,
    len: usize,
    effective_max: usize,
    params: &SamplingParams,
) -> SamplePlan {
    let critical_count = critical.len();
    let over_ceiling = critical_count > params.max_points;

    let (indices, overflow, thinned) = match params.ceiling {
        CeilingPolicy::Hard if over_ceiling => (thin_critical(&critical, params.max_points), false, true),
        _ => (critical, over_ceiling, false),
    };

    if overflow {
        tracing::warn!(
            critical_count,
            max_points = params.max_points,
            "critical points exceed chart ceiling; keeping all of them"
        );
    } else if thinned {
        tracing::warn!(
            critical_count,
            max_points = params.max_points,
            "thinning critical points to honour hard chart ceiling"
        );
    }

    SamplePlan {
        indices,
        input_len: len,
        critical_count,
        effective_max,
        resampled: true,
        overflow,
        thinned,
    }
}

/// Evenly thin `critical` down to `target` positions, always keeping the
/// first and last one.
fn thin_critical(critical: &[usize], target: usize) -> Vec<usize> {
    if critical.len() <= target {
        return critical.to_vec();
    }
    let (first, last) = match (critical.first(), critical.last()) {
        (Some(&f), Some(&l)) if critical.len() >= 2 => (f, l),
        _ => return critical.to_vec(),
    };
    if target < 2 {
        return vec![first, last];
    }
    let interior = &critical[1..critical.len() - 1];
    let mut out = Vec::with_capacity(target);
    out.push(first);
    out.extend(
        even_positions(interior.len(), target - 2)
            .into_iter()
            .map(|pos| interior[pos]),
    );
    out.push(last);
    out
}

/// Sample `timeline` for charting. Returns the input itself when it already
/// fits the budget.
pub fn sample_timeline<'a>(
    timeline: &'a [TimelinePoint],
    params: &SamplingParams,
) -> Cow<'a, [TimelinePoint]> {
    plan_sample(timeline, params).apply(timeline)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::StrategySnapshot;
    use chrono::NaiveDate;

    fn timeline(len: usize, signal_days: &[usize]) -> Vec<TimelinePoint> {
        let base = NaiveDate::from_ymd_opt(2023, 1, 1).unwrap();
        (0..len)
            .map(|i| {
                let mut p = TimelinePoint::new(base + chrono::Duration::days(i as i64))
                    .with_price("btc", 100.0 + i as f64)
                    .with_strategy(
                        "dca_classic",
                        StrategySnapshot {
                            event: Some("buy".into()),
                            is_baseline: true,
                            ..Default::default()
                        },
                    );
                if signal_days.contains(&i) {
                    p = p.with_strategy(
                        "smart_dca",
                        StrategySnapshot {
                            event: Some("sell_spot".into()),
                            ..Default::default()
                        },
                    );
                }
                p
            })
            .collect()
    }

    #[test]
    fn critical_indices_include_boundaries() {
        let tl = timeline(10, &[4]);
        assert_eq!(critical_indices(&tl), vec![0, 4, 9]);
    }

    #[test]
    fn critical_indices_single_point() {
        assert_eq!(critical_indices(&timeline(1, &[])), vec![0]);
        assert!(critical_indices(&[]).is_empty());
    }

    #[test]
    fn short_timeline_is_borrowed_unchanged() {
        let tl = timeline(90, &[3]);
        let out = sample_timeline(&tl, &SamplingParams::default());
        assert!(matches!(out, Cow::Borrowed(_)));
        assert_eq!(out.len(), 90);
    }

    #[test]
    fn baseline_events_do_not_count() {
        // every day has a baseline buy; only boundaries are critical
        let plan = plan_sample(&timeline(300, &[]), &SamplingParams::default());
        assert_eq!(plan.critical_count, 2);
        assert_eq!(plan.effective_max, 90);
        assert_eq!(plan.output_len(), 90);
    }

    #[test]
    fn fits_dynamic_ceiling_unchanged() {
        // 100 signal days → effective_max = min(150, 102 + 20) = 122 ≥ 110
        let signals: Vec<usize> = (1..101).collect();
        let tl = timeline(110, &signals);
        let plan = plan_sample(&tl, &SamplingParams::default());
        assert!(!plan.resampled);
        assert_eq!(plan.output_len(), 110);
    }

    #[test]
    fn soft_ceiling_keeps_every_critical_point() {
        let signals: Vec<usize> = (0..400).collect();
        let tl = timeline(400, &signals);
        let plan = plan_sample(&tl, &SamplingParams::default());
        assert_eq!(plan.output_len(), 400);
        assert!(plan.overflow);
        assert!(!plan.thinned);
    }

    #[test]
    fn hard_ceiling_thins_to_max_points() {
        let signals: Vec<usize> = (0..400).collect();
        let tl = timeline(400, &signals);
        let params = SamplingParams {
            ceiling: CeilingPolicy::Hard,
            ..Default::default()
        };
        let plan = plan_sample(&tl, &params);
        assert_eq!(plan.output_len(), 150);
        assert!(plan.thinned);
        assert!(!plan.overflow);
        assert_eq!(plan.indices[0], 0);
        assert_eq!(*plan.indices.last().unwrap(), 399);
        assert!(plan.indices.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn critical_count_equal_to_ceiling_is_exact() {
        // 148 signals + 2 boundaries = 150 = effective_max
        let signals: Vec<usize> = (1..149).map(|i| i * 2).collect();
        let tl = timeline(400, &signals);
        let plan = plan_sample(&tl, &SamplingParams::default());
        assert_eq!(plan.critical_count, 150);
        assert_eq!(plan.output_len(), 150);
        assert!(!plan.overflow);
    }

    #[test]
    fn apply_clones_selected_points_in_order() {
        let tl = timeline(200, &[10, 150]);
        let plan = plan_sample(&tl, &SamplingParams::default());
        let out = plan.apply(&tl);
        assert!(matches!(out, Cow::Owned(_)));
        for (point, &i) in out.iter().zip(&plan.indices) {
            assert_eq!(point.date, tl[i].date);
        }
    }

    #[test]
    fn apply_owned_matches_borrowed_apply() {
        let tl = timeline(200, &[10, 150]);
        let plan = plan_sample(&tl, &SamplingParams::default());
        assert_eq!(plan.apply_owned(tl.clone()), plan.apply(&tl).into_owned());

        let short = timeline(20, &[]);
        let passthrough = plan_sample(&short, &SamplingParams::default());
        assert_eq!(passthrough.apply_owned(short.clone()), short);
    }

    #[test]
    fn thin_critical_small_targets() {
        assert_eq!(thin_critical(&[1, 5, 9, 12], 1), vec![1, 12]);
        assert_eq!(thin_critical(&[1, 5, 9, 12], 3), vec![1, 9, 12]);
        assert_eq!(thin_critical(&[7], 0), vec![7]);
    }
}
