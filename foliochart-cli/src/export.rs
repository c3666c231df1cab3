//! Prepared chart export (JSON/CSV).

use anyhow::{Context, Result};
use foliochart_core::domain::TimelinePoint;
use foliochart_core::PreparedTimeline;
use serde_json::{Map, Value};
use std::collections::{BTreeMap, BTreeSet};
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

/// Chart document: response metadata passed through, plus `summary` and the
/// prepared `timeline`.
pub fn chart_document(
    prepared: &PreparedTimeline,
    passthrough: &BTreeMap<String, Value>,
) -> Result<Value> {
    let mut doc: Map<String, Value> = passthrough
        .iter()
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect();
    doc.insert(
        "summary".into(),
        serde_json::to_value(&prepared.summary).context("Failed to encode chart summary")?,
    );
    doc.insert(
        "timeline".into(),
        serde_json::to_value(&prepared.points).context("Failed to encode chart timeline")?,
    );
    Ok(Value::Object(doc))
}

pub fn write_chart_json(path: &Path, document: &Value) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("Failed to create chart JSON {}", path.display()))?;
    serde_json::to_writer_pretty(BufWriter::new(file), document)
        .with_context(|| format!("Failed to write chart JSON {}", path.display()))?;
    Ok(())
}

/// Flat CSV: one row per point with the moving average, every token price
/// and every strategy's event and transferred USD.
pub fn write_chart_csv(path: &Path, points: &[TimelinePoint]) -> Result<()> {
    let tokens = token_columns(points);
    let strategies: BTreeSet<&str> = points
        .iter()
        .flat_map(|p| p.strategies.keys().map(String::as_str))
        .collect();

    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("Failed to create chart CSV {}", path.display()))?;

    let mut header = vec!["date".to_string(), "dma_200".to_string()];
    header.extend(tokens.iter().map(|t| format!("price:{t}")));
    for id in &strategies {
        header.push(format!("event:{id}"));
        header.push(format!("transfer_usd:{id}"));
    }
    writer.write_record(&header)?;

    for point in points {
        let mut row = vec![point.date.to_string(), fmt_opt(point.dma_200)];
        row.extend(tokens.iter().map(|t| fmt_opt(point.token_price.get(t))));
        for id in &strategies {
            match point.strategies.get(*id) {
                Some(snap) => {
                    row.push(snap.event.clone().unwrap_or_default());
                    let moved: f64 = snap.transfers.iter().map(|t| t.amount_usd).sum();
                    row.push(if snap.transfers.is_empty() { String::new() } else { format!("{moved:.2}") });
                }
                None => {
                    row.push(String::new());
                    row.push(String::new());
                }
            }
        }
        writer.write_record(&row)?;
    }
    writer
        .flush()
        .with_context(|| format!("Failed to write chart CSV {}", path.display()))?;
    Ok(())
}

/// Token symbols in first-seen order across the timeline.
fn token_columns(points: &[TimelinePoint]) -> Vec<String> {
    let mut tokens: Vec<String> = Vec::new();
    for symbol in points.iter().flat_map(|p| p.token_price.symbols()) {
        if !tokens.iter().any(|t| t == symbol) {
            tokens.push(symbol.to_string());
        }
    }
    tokens
}

fn fmt_opt(value: Option<f64>) -> String {
    value.map(|v| format!("{v:.4}")).unwrap_or_default()
}
