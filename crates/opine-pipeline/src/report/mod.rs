//! Static HTML summary of a persisted pipeline output.
//!
//! The input is read as loose JSON with no schema validation: malformed
//! files produce an empty or partial report instead of an error.

mod html;

use std::path::{Path, PathBuf};

use opine_core::METRIC_KEYS;
use serde_json::{Map, Value};

use crate::error::PipelineError;

pub use html::render_html;

/// Keys left out of the table.
const HIDDEN_KEYS: [&str; 1] = ["generation"];
const SOURCE_KEY: &str = "source";

/// Collections flattened into table rows, in display order.
const ROW_COLLECTIONS: [&str; 2] = ["articles", "tweets"];

pub(crate) const STAGE_KEYS: [&str; 3] = ["stage", "documents", "average_sentiment"];
pub(crate) const FAILURE_KEYS: [&str; 2] = ["source", "error"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReportOutcome {
    /// The input file does not exist; nothing was written.
    NoData,
    Written { rows: usize, path: PathBuf },
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReportRow {
    pub collection: &'static str,
    /// One cell per entry in [`Report::columns`]; `None` renders empty.
    pub cells: Vec<Option<String>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MetricMean {
    pub metric: &'static str,
    /// `None` when no row has a numeric value for the metric.
    pub mean: Option<f64>,
    pub count: usize,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Report {
    pub columns: Vec<String>,
    pub rows: Vec<ReportRow>,
    pub means: Vec<MetricMean>,
    /// `[stage, documents, average_sentiment]` per recorded stage.
    pub stages: Vec<[String; 3]>,
    /// `[source, error]` per failed document.
    pub failures: Vec<[String; 2]>,
}

/// Flatten a loosely parsed output file into report rows and aggregates.
#[must_use]
pub fn build_report(value: &Value) -> Report {
    let records: Vec<(&'static str, &Map<String, Value>)> = ROW_COLLECTIONS
        .iter()
        .flat_map(|&collection| {
            value
                .get(collection)
                .and_then(Value::as_array)
                .into_iter()
                .flatten()
                .filter_map(Value::as_object)
                .map(move |record| (collection, record))
        })
        .collect();

    let mut columns: Vec<String> = METRIC_KEYS.iter().map(|k| (*k).to_string()).collect();
    columns.push(SOURCE_KEY.to_string());
    for (_, record) in &records {
        for key in record.keys() {
            if !HIDDEN_KEYS.contains(&key.as_str()) && !columns.contains(key) {
                columns.push(key.clone());
            }
        }
    }

    let rows = records
        .iter()
        .map(|&(collection, record)| ReportRow {
            collection,
            cells: columns
                .iter()
                .map(|column| record.get(column).and_then(cell_text))
                .collect(),
        })
        .collect();

    let means = METRIC_KEYS
        .iter()
        .map(|&metric| {
            let values: Vec<f64> = records
                .iter()
                .filter_map(|(_, record)| record.get(metric).and_then(Value::as_f64))
                .collect();
            #[allow(clippy::cast_precision_loss)]
            let mean = (!values.is_empty())
                .then(|| values.iter().sum::<f64>() / values.len() as f64);
            MetricMean {
                metric,
                mean,
                count: values.len(),
            }
        })
        .collect();

    Report {
        columns,
        rows,
        means,
        stages: section_rows(value, "stages", STAGE_KEYS),
        failures: section_rows(value, "failures", FAILURE_KEYS),
    }
}

/// Load `input`, build the report, and write it as HTML to `output`.
///
/// A missing input is not an error: it logs "no data" and writes nothing.
///
/// # Errors
///
/// Returns [`PipelineError::Io`] if the input exists but cannot be read, or
/// the report cannot be written.
pub async fn render(input: &Path, output: &Path) -> Result<ReportOutcome, PipelineError> {
    let raw = match tokio::fs::read(input).await {
        Ok(raw) => raw,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::info!(path = %input.display(), "no data: input file not found");
            return Ok(ReportOutcome::NoData);
        }
        Err(e) => return Err(PipelineError::io(input, e)),
    };

    let value: Value = serde_json::from_slice(&raw).unwrap_or_else(|e| {
        tracing::warn!(path = %input.display(), error = %e, "input is not valid JSON; report will be empty");
        Value::Null
    });

    let report = build_report(&value);
    let rows = report.rows.len();
    let page = render_html(&report, &input.display().to_string());

    tokio::fs::write(output, page)
        .await
        .map_err(|e| PipelineError::io(output, e))?;

    tracing::info!(path = %output.display(), rows, "wrote report");
    Ok(ReportOutcome::Written {
        rows,
        path: output.to_path_buf(),
    })
}

fn cell_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

fn section_rows<const N: usize>(
    value: &Value,
    section: &str,
    keys: [&str; N],
) -> Vec<[String; N]> {
    value
        .get(section)
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
        .filter_map(Value::as_object)
        .map(|entry| keys.map(|key| entry.get(key).and_then(cell_text).unwrap_or_default()))
        .collect()
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn rows_follow_articles_then_tweets() {
        let value = json!({
            "articles": [{ "work_flexibility": 4, "source": "https://a" }],
            "tweets": [{ "work_flexibility": 2, "source": "https://t" }]
        });
        let report = build_report(&value);
        assert_eq!(report.rows.len(), 2);
        assert_eq!(report.rows[0].collection, "articles");
        assert_eq!(report.rows[1].collection, "tweets");
        assert_eq!(report.rows[1].cells[0].as_deref(), Some("2"));
    }

    #[test]
    fn columns_start_with_metrics_and_source() {
        let value = json!({
            "articles": [{ "stop_reason": "stop", "generation": "long text", "overall_sentiment": 3 }]
        });
        let report = build_report(&value);
        assert_eq!(
            report.columns,
            vec![
                "work_flexibility",
                "burnout_risk",
                "remote_work_appeal",
                "productivity_impact",
                "overall_sentiment",
                "source",
                "stop_reason",
            ]
        );
    }

    #[test]
    fn missing_keys_render_as_empty_cells() {
        let value = json!({ "articles": [{ "burnout_risk": 2, "source": null }] });
        let report = build_report(&value);
        let cells = &report.rows[0].cells;
        assert_eq!(cells[0], None);
        assert_eq!(cells[1].as_deref(), Some("2"));
        assert_eq!(cells[5], None);
    }

    #[test]
    fn means_are_per_metric_over_numeric_values() {
        let value = json!({
            "articles": [
                { "work_flexibility": 4, "burnout_risk": 2 },
                { "work_flexibility": 5, "burnout_risk": "high" },
                "not a record"
            ]
        });
        let report = build_report(&value);
        assert_eq!(report.rows.len(), 2);
        assert_eq!(report.means[0].metric, "work_flexibility");
        assert_eq!(report.means[0].mean, Some(4.5));
        assert_eq!(report.means[0].count, 2);
        assert_eq!(report.means[1].mean, Some(2.0));
        assert_eq!(report.means[1].count, 1);
        assert_eq!(report.means[2].mean, None);
    }

    #[test]
    fn malformed_root_yields_empty_report() {
        for value in [Value::Null, json!([1, 2]), json!({ "articles": "nope" })] {
            let report = build_report(&value);
            assert!(report.rows.is_empty());
            assert!(report.means.iter().all(|m| m.mean.is_none()));
        }
    }

    #[test]
    fn stages_and_failures_are_collected() {
        let value = json!({
            "articles": [],
            "stages": [
                { "stage": "ingestion", "documents": 51 },
                { "stage": "quantification", "documents": 51, "average_sentiment": 4.0 }
            ],
            "failures": [{ "source": "https://x", "error": "boom" }]
        });
        let report = build_report(&value);
        assert_eq!(
            report.stages,
            vec![
                ["ingestion".to_string(), "51".to_string(), String::new()],
                ["quantification".to_string(), "51".to_string(), "4.0".to_string()],
            ]
        );
        assert_eq!(report.failures, vec![["https://x".to_string(), "boom".to_string()]]);
    }
}
