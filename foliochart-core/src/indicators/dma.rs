//! Daily Moving Average (DMA) over a timeline's representative price.
//!
//! Rolling mean with a strict contiguity rule: a day without any usable price
//! empties the window, so the average only reappears after `window` further
//! priced days. First valid value lands at index window-1 of an unbroken run.

use crate::domain::TimelinePoint;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Number of days in the chart's moving average.
pub const DMA_WINDOW: usize = 200;

/// Benchmark asset whose price the moving average follows when present.
pub const DEFAULT_REFERENCE_TOKEN: &str = "btc";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DmaConfig {
    pub reference_token: String,
    pub window: usize,
}

impl Default for DmaConfig {
    fn default() -> Self {
        Self {
            reference_token: DEFAULT_REFERENCE_TOKEN.to_string(),
            window: DMA_WINDOW,
        }
    }
}

/// Fixed-size window with a running sum.
#[derive(Debug, Clone)]
pub struct RollingMean {
    window: usize,
    values: VecDeque<f64>,
    sum: f64,
}

impl RollingMean {
    pub fn new(window: usize) -> Self {
        Self {
            window,
            values: VecDeque::with_capacity(window + 1),
            sum: 0.0,
        }
    }

    /// Add a value; returns the mean once the window is exactly full.
    pub fn push(&mut self, value: f64) -> Option<f64> {
        if self.window == 0 {
            return None;
        }
        self.values.push_back(value);
        self.sum += value;
        if self.values.len() > self.window {
            if let Some(oldest) = self.values.pop_front() {
                self.sum -= oldest;
            }
        }
        (self.values.len() == self.window).then(|| self.sum / self.window as f64)
    }

    /// Drop everything seen so far.
    pub fn reset(&mut self) {
        self.values.clear();
        self.sum = 0.0;
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Moving-average value for every point, in order.
pub fn dma_series(timeline: &[TimelinePoint], config: &DmaConfig) -> Vec<Option<f64>> {
    let mut window = RollingMean::new(config.window);
    timeline
        .iter()
        .map(|point| match point.representative_price(&config.reference_token) {
            Some(price) => window.push(price),
            None => {
                window.reset();
                None
            }
        })
        .collect()
}

/// Copy of `timeline` with `dma_200` filled in on every point.
///
/// Must run on the full timeline: a sampled timeline has holes that would
/// corrupt the window.
pub fn enrich_with_dma(timeline: &[TimelinePoint], config: &DmaConfig) -> Vec<TimelinePoint> {
    let values = dma_series(timeline, config);
    let enriched: Vec<TimelinePoint> = timeline
        .iter()
        .zip(values)
        .map(|(point, dma)| TimelinePoint {
            dma_200: dma,
            ..point.clone()
        })
        .collect();

    tracing::debug!(
        points = enriched.len(),
        with_dma = enriched.iter().filter(|p| p.dma_200.is_some()).count(),
        window = config.window,
        "enriched timeline with moving average"
    );
    enriched
}
