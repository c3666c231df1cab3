//! FolioChart Core — chart preparation for backtest comparison timelines.
//!
//! Turns a long daily backtest timeline into a bounded chart series:
//! - Domain types (timeline points, per-strategy snapshots, ordered price maps)
//! - 200-day moving average with a strict contiguity rule
//! - Critical-point sampling that never drops a trading signal or transfer
//! - Evenly spaced selection shared by the sampler
//! - TOML chart config, response loading, synthetic timelines, fingerprints
//!
//! Everything here is synchronous and pure: each call turns an immutable
//! input into a new output.

pub mod config;
pub mod data;
pub mod domain;
pub mod fingerprint;
pub mod indicators;
pub mod pipeline;
pub mod sampling;

pub use config::{ChartConfig, ConfigError};
pub use domain::{Timeline, TimelinePoint};
pub use pipeline::{prepare_chart_timeline, prepare_response, PreparedTimeline, SampleSummary};
pub use sampling::{sample_timeline, space_evenly, CeilingPolicy, SamplingParams};
