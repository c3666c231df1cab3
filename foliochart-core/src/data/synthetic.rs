//! Deterministic synthetic timelines for tests, benchmarks and demos.
//!
//! Prices follow a seeded random walk. The baseline strategy buys weekly;
//! each signal strategy alternates buy/sell signals with a matching transfer
//! between the stable and spot buckets.

use crate::config::DEFAULT_BASELINE_ID;
use crate::domain::{Bucket, StrategySnapshot, Timeline, TimelinePoint, Transfer};
use chrono::NaiveDate;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

#[derive(Debug, Clone)]
pub struct SyntheticOptions {
    pub start: NaiveDate,
    /// Priced tokens, in the order they appear in each point's price map.
    pub tokens: Vec<String>,
    pub signal_strategies: Vec<String>,
    /// Daily chance that a signal strategy acts. Ignored when `signal_every` is set.
    pub signal_probability: f64,
    /// Fire signals on every n-th day instead of randomly.
    pub signal_every: Option<usize>,
    /// Days with no prices at all.
    pub gap_days: Vec<usize>,
}

impl Default for SyntheticOptions {
    fn default() -> Self {
        Self {
            start: NaiveDate::from_ymd_opt(2021, 1, 1).unwrap_or_default(),
            tokens: vec!["btc".into(), "eth".into()],
            signal_strategies: vec!["smart_dca".into()],
            signal_probability: 0.03,
            signal_every: None,
            gap_days: Vec::new(),
        }
    }
}

/// Generate `days` consecutive daily points from `seed`.
pub fn synthetic_timeline(days: usize, seed: u64, opts: &SyntheticOptions) -> Timeline {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut prices: Vec<f64> = opts
        .tokens
        .iter()
        .map(|_| rng.gen_range(50.0..50_000.0))
        .collect();
    // Next event per signal strategy alternates buy/sell.
    let mut holding = vec![false; opts.signal_strategies.len()];

    (0..days)
        .map(|day| {
            let date = opts.start + chrono::Duration::days(day as i64);
            let mut point = TimelinePoint::new(date);

            for (token, price) in opts.tokens.iter().zip(prices.iter_mut()) {
                *price *= 1.0 + rng.gen_range(-0.04..0.04);
                if !opts.gap_days.contains(&day) {
                    point.token_price.insert(token.as_str(), *price);
                }
            }

            point = point.with_strategy(
                DEFAULT_BASELINE_ID,
                StrategySnapshot {
                    event: (day % 7 == 0).then(|| "buy".to_string()),
                    is_baseline: true,
                    portfolio_value: Some(100.0 * (day / 7 + 1) as f64),
                    ..Default::default()
                },
            );

            for (i, id) in opts.signal_strategies.iter().enumerate() {
                let fires = match opts.signal_every {
                    Some(n) if n > 0 => day > 0 && day % n == 0,
                    Some(_) => false,
                    None => rng.gen_bool(opts.signal_probability.clamp(0.0, 1.0)),
                };
                let snapshot = if fires {
                    holding[i] = !holding[i];
                    let (event, from, to) = if holding[i] {
                        ("buy_spot", Bucket::Stable, Bucket::Spot)
                    } else {
                        ("sell_spot", Bucket::Spot, Bucket::Stable)
                    };
                    StrategySnapshot {
                        event: Some(event.to_string()),
                        transfers: vec![Transfer {
                            from,
                            to,
                            amount_usd: rng.gen_range(10.0..1_000.0),
                        }],
                        ..Default::default()
                    }
                } else {
                    StrategySnapshot::default()
                };
                point = point.with_strategy(id, snapshot);
            }

            point
        })
        .collect()
}
