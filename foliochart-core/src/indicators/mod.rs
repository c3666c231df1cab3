//! Indicators computed over a full timeline before any sampling.

pub mod dma;

pub use dma::{dma_series, enrich_with_dma, DmaConfig, RollingMean, DMA_WINDOW};

/// Create a daily timeline with one `btc` price per day (`None` = unpriced day).
#[cfg(test)]
pub fn make_timeline(prices: &[Option<f64>]) -> Vec<crate::domain::TimelinePoint> {
    use crate::domain::TimelinePoint;
    let base_date = chrono::NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
    prices
        .iter()
        .enumerate()
        .map(|(i, price)| {
            let point = TimelinePoint::new(base_date + chrono::Duration::days(i as i64));
            match price {
                Some(p) => point.with_price("btc", *p),
                None => point,
            }
        })
        .collect()
}

/// Assert two f64 values are approximately equal (within epsilon).
#[cfg(test)]
pub fn assert_approx(actual: f64, expected: f64, epsilon: f64) {
    assert!(
        (actual - expected).abs() < epsilon,
        "assert_approx failed: actual={actual}, expected={expected}, diff={}, epsilon={epsilon}",
        (actual - expected).abs()
    );
}

/// Default epsilon for indicator tests.
#[cfg(test)]
pub const DEFAULT_EPSILON: f64 = 1e-10;
