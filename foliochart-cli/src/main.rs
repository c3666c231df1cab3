//! FolioChart CLI — prepare backtest timelines for charting.
//!
//! Commands:
//! - `prepare` — enrich + sample one or more backtest responses, write chart JSON/CSV
//! - `inspect` — report what preparation would do, plus timeline problems
//! - `synth` — write a deterministic synthetic backtest response

mod export;

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use foliochart_core::data::{
    load_response, synthetic_timeline, validate_timeline, BacktestResponse, SyntheticOptions,
};
use foliochart_core::{prepare_response, CeilingPolicy, ChartConfig, SampleSummary};
use rayon::prelude::*;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "foliochart",
    about = "FolioChart CLI — chart-ready backtest timelines"
)]
struct Cli {
    /// Debug-level logging (overridden by RUST_LOG).
    #[arg(long, short, global = true, default_value_t = false)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Enrich and sample backtest responses into chart files.
    Prepare {
        /// Backtest response JSON files.
        #[arg(long = "input", short, required = true, num_args = 1..)]
        inputs: Vec<PathBuf>,

        /// Output directory for <name>.chart.json (and .chart.csv).
        #[arg(long, default_value = "charts")]
        output_dir: PathBuf,

        /// Also write a flat CSV next to each chart JSON.
        #[arg(long, default_value_t = false)]
        csv: bool,

        #[command(flatten)]
        chart: ChartArgs,
    },
    /// Print the preparation summary for a backtest response without writing anything.
    Inspect {
        /// Backtest response JSON file.
        #[arg(long, short)]
        input: PathBuf,

        #[command(flatten)]
        chart: ChartArgs,
    },
    /// Write a synthetic backtest response.
    Synth {
        /// Number of simulated days.
        #[arg(long, default_value_t = 730)]
        days: usize,

        /// RNG seed.
        #[arg(long, default_value_t = 42)]
        seed: u64,

        /// First simulated day (YYYY-MM-DD).
        #[arg(long)]
        start: Option<String>,

        /// Fire a signal every n days instead of randomly.
        #[arg(long)]
        signal_every: Option<usize>,

        /// Daily signal probability when --signal-every is not given.
        #[arg(long, default_value_t = 0.03)]
        signal_probability: f64,

        /// Day indices with no prices (repeatable).
        #[arg(long = "gap-at")]
        gap_days: Vec<usize>,

        /// Output JSON file.
        #[arg(long, short)]
        output: PathBuf,
    },
}

/// Chart config source plus per-field overrides.
#[derive(Args, Debug, Clone, Default)]
struct ChartArgs {
    /// TOML chart config. Defaults apply when omitted.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Minimum point count before sampling kicks in.
    #[arg(long)]
    min_points: Option<usize>,

    /// Chart point ceiling.
    #[arg(long)]
    max_points: Option<usize>,

    /// Thin critical points rather than exceed --max-points.
    #[arg(long, default_value_t = false)]
    hard_ceiling: bool,

    /// Token whose price drives the moving average.
    #[arg(long)]
    reference_token: Option<String>,
}

impl ChartArgs {
    fn resolve(&self) -> Result<ChartConfig> {
        let mut config = match &self.config {
            Some(path) => ChartConfig::load(path)?,
            None => ChartConfig::default(),
        };
        if let Some(n) = self.min_points {
            config.sampling.min_points = n;
        }
        if let Some(n) = self.max_points {
            config.sampling.max_points = n;
        }
        if self.hard_ceiling {
            config.sampling.ceiling = CeilingPolicy::Hard;
        }
        if let Some(token) = &self.reference_token {
            config.dma.reference_token = token.clone();
        }
        config.validate()?;
        Ok(config)
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Prepare {
            inputs,
            output_dir,
            csv,
            chart,
        } => run_prepare(&inputs, &output_dir, csv, &chart.resolve()?),
        Commands::Inspect { input, chart } => run_inspect(&input, &chart.resolve()?),
        Commands::Synth {
            days,
            seed,
            start,
            signal_every,
            signal_probability,
            gap_days,
            output,
        } => run_synth(days, seed, start, signal_every, signal_probability, gap_days, &output),
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn run_prepare(inputs: &[PathBuf], output_dir: &Path, csv: bool, config: &ChartConfig) -> Result<()> {
    let mut claimed: BTreeMap<String, &Path> = BTreeMap::new();
    for input in inputs {
        let stem = chart_stem(input);
        if let Some(previous) = claimed.insert(stem.clone(), input.as_path()) {
            bail!(
                "{} and {} would both write {stem}.chart.json; rename one input",
                previous.display(),
                input.display()
            );
        }
    }

    std::fs::create_dir_all(output_dir)
        .with_context(|| format!("Failed to create output dir {}", output_dir.display()))?;

    let results: Vec<(PathBuf, Result<SampleSummary>)> = inputs
        .par_iter()
        .map(|input| (input.clone(), prepare_file(input, output_dir, csv, config)))
        .collect();

    let mut failures = 0;
    for (input, result) in &results {
        match result {
            Ok(summary) => print_summary(input, summary),
            Err(e) => {
                failures += 1;
                tracing::error!(input = %input.display(), "{e:#}");
            }
        }
    }

    if failures > 0 {
        bail!("{failures} of {} input(s) failed", results.len());
    }
    Ok(())
}

fn prepare_file(input: &Path, output_dir: &Path, csv: bool, config: &ChartConfig) -> Result<SampleSummary> {
    let response = load_response(input)?;
    let passthrough = response.extra.clone();
    let prepared = prepare_response(response, config);

    let stem = chart_stem(input);

    let json_path = output_dir.join(format!("{stem}.chart.json"));
    export::write_chart_json(&json_path, &export::chart_document(&prepared, &passthrough)?)?;
    tracing::debug!(path = %json_path.display(), "wrote chart JSON");

    if csv {
        let csv_path = output_dir.join(format!("{stem}.chart.csv"));
        export::write_chart_csv(&csv_path, &prepared.points)?;
        tracing::debug!(path = %csv_path.display(), "wrote chart CSV");
    }

    Ok(prepared.summary)
}

/// Output file stem for an input: its file stem, or `timeline` if it has none.
fn chart_stem(input: &Path) -> String {
    input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "timeline".to_string())
}

fn run_inspect(input: &Path, config: &ChartConfig) -> Result<()> {
    let response = load_response(input)?;

    let issues = validate_timeline(response.timeline());
    for issue in &issues {
        tracing::warn!("{issue}");
    }

    let prepared = prepare_response(response, config);
    print_summary(input, &prepared.summary);

    let s = &prepared.summary;
    if let (Some(first), Some(last)) = (s.first_date, s.last_date) {
        println!("  Range:          {first} to {last}");
    }
    println!("  With DMA:       {} of {} charted points", s.points_with_dma, s.output_points);
    if !s.active_days.is_empty() {
        println!("  Active days per strategy:");
        for (id, days) in &s.active_days {
            println!("    {id:<20} {days:>6}");
        }
    }
    if let Some(hash) = &s.timeline_hash {
        println!("  Timeline hash:  {}", hash.short());
    }
    if !issues.is_empty() {
        println!("  Ordering issues: {}", issues.len());
    }
    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn run_synth(
    days: usize,
    seed: u64,
    start: Option<String>,
    signal_every: Option<usize>,
    signal_probability: f64,
    gap_days: Vec<usize>,
    output: &Path,
) -> Result<()> {
    if !(0.0..=1.0).contains(&signal_probability) {
        bail!("--signal-probability must be within 0..=1, got {signal_probability}");
    }

    let mut opts = SyntheticOptions {
        signal_every,
        signal_probability,
        gap_days,
        ..Default::default()
    };
    if let Some(s) = start.as_deref() {
        opts.start = NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .with_context(|| format!("invalid --start date '{s}' (expected YYYY-MM-DD)"))?;
    }

    let response = BacktestResponse::from_timeline(synthetic_timeline(days, seed, &opts));
    let file = std::fs::File::create(output)
        .with_context(|| format!("Failed to create {}", output.display()))?;
    serde_json::to_writer_pretty(std::io::BufWriter::new(file), &response)
        .with_context(|| format!("Failed to write {}", output.display()))?;

    println!("Wrote {days} synthetic days to {}", output.display());
    Ok(())
}

fn print_summary(input: &Path, s: &SampleSummary) {
    let mut notes = Vec::new();
    if !s.resampled {
        notes.push("unchanged");
    }
    if s.overflow {
        notes.push("critical points exceed ceiling");
    }
    if s.thinned {
        notes.push("critical points thinned");
    }
    let notes = if notes.is_empty() {
        String::new()
    } else {
        format!(" ({})", notes.join(", "))
    };
    println!(
        "{}: {} -> {} points, {} critical, budget {}{}",
        input.display(),
        s.input_points,
        s.output_points,
        s.critical_points,
        s.effective_max,
        notes
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_parses_prepare_with_overrides() {
        let cli = Cli::try_parse_from([
            "foliochart",
            "prepare",
            "--input",
            "a.json",
            "b.json",
            "--min-points",
            "60",
            "--hard-ceiling",
            "--csv",
        ])
        .unwrap();
        match cli.command {
            Commands::Prepare { inputs, csv, chart, .. } => {
                assert_eq!(inputs.len(), 2);
                assert!(csv);
                let config = chart.resolve().unwrap();
                assert_eq!(config.sampling.min_points, 60);
                assert_eq!(config.sampling.ceiling, CeilingPolicy::Hard);
            }
            _ => panic!("expected prepare"),
        }
    }

    #[test]
    fn invalid_override_is_rejected() {
        let args = ChartArgs {
            min_points: Some(500),
            ..Default::default()
        };
        assert!(args.resolve().is_err());
    }

    #[test]
    fn synth_then_prepare_writes_chart_files() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("run.json");
        run_synth(400, 3, None, Some(50), 0.0, vec![10], &input).unwrap();

        let out = dir.path().join("charts");
        run_prepare(&[input], &out, true, &ChartConfig::default()).unwrap();

        assert!(out.join("run.chart.json").exists());
        assert!(out.join("run.chart.csv").exists());
        let doc: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(out.join("run.chart.json")).unwrap())
                .unwrap();
        assert_eq!(doc["summary"]["input_points"], 400);
        assert_eq!(doc["timeline"].as_array().unwrap().len(), 90);
    }

    #[test]
    fn prepare_reports_missing_input() {
        let dir = tempfile::tempdir().unwrap();
        let result = run_prepare(
            &[dir.path().join("missing.json")],
            dir.path(),
            false,
            &ChartConfig::default(),
        );
        assert!(result.is_err());
    }

    #[test]
    fn prepare_rejects_inputs_sharing_a_chart_name() {
        let dir = tempfile::tempdir().unwrap();
        let a = dir.path().join("a");
        let b = dir.path().join("b");
        std::fs::create_dir_all(&a).unwrap();
        std::fs::create_dir_all(&b).unwrap();
        run_synth(30, 1, None, None, 0.1, vec![], &a.join("run.json")).unwrap();
        run_synth(30, 2, None, None, 0.1, vec![], &b.join("run.json")).unwrap();

        let out = dir.path().join("charts");
        let err = run_prepare(&[a.join("run.json"), b.join("run.json")], &out, false, &ChartConfig::default())
            .unwrap_err();
        assert!(err.to_string().contains("run.chart.json"));
        assert!(!out.join("run.chart.json").exists());
    }

    #[test]
    fn synth_rejects_bad_start_date() {
        let dir = tempfile::tempdir().unwrap();
        let result = run_synth(10, 1, Some("01/02/2024".into()), None, 0.1, vec![], &dir.path().join("x.json"));
        assert!(result.is_err());
    }
}
