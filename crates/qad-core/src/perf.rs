//! Performance-test results and SLA statistics.
//!
//! Each perf scenario drops a JSON file under `.qad/perf-results/`: a list
//! of labeled duration measurements. Statistics are computed per label and
//! compared against the configured SLA thresholds.

use crate::config::SlaThreshold;
use crate::error::{DashboardError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

// ---------------------------------------------------------------------------
// Input format
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct Measurement {
    pub label: String,
    pub duration_ms: f64,
}

// ---------------------------------------------------------------------------
// PerfStatistic
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerfStatistic {
    pub label: String,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub samples: u32,
    /// `None` when no SLA threshold exists for the label (informational row).
    pub within_sla: Option<bool>,
}

/// Compute per-label statistics from raw measurements.
/// Labels with no samples never appear, so there is no division by zero.
pub fn compute_statistics(
    measurements: &[Measurement],
    thresholds: &[SlaThreshold],
) -> Vec<PerfStatistic> {
    let mut grouped: BTreeMap<&str, Vec<f64>> = BTreeMap::new();
    for m in measurements {
        grouped.entry(m.label.as_str()).or_default().push(m.duration_ms);
    }

    grouped
        .into_iter()
        .map(|(label, durations)| {
            let min = durations.iter().copied().fold(f64::INFINITY, f64::min);
            let max = durations.iter().copied().fold(f64::NEG_INFINITY, f64::max);
            let mean = durations.iter().sum::<f64>() / durations.len() as f64;
            let within_sla = thresholds
                .iter()
                .find(|t| t.label == label)
                .map(|t| mean <= t.max_mean_ms);
            PerfStatistic {
                label: label.to_string(),
                min,
                max,
                mean,
                samples: durations.len() as u32,
                within_sla,
            }
        })
        .collect()
}

/// Load every `*.json` results file from the perf-results directory.
/// A missing directory means perf tests are not set up: empty result.
pub fn load_measurements(dir: &Path) -> Result<Vec<Measurement>> {
    if !dir.is_dir() {
        return Ok(Vec::new());
    }
    let mut measurements = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if path.extension().and_then(|e| e.to_str()) != Some("json") {
            continue;
        }
        let data = std::fs::read_to_string(&path)?;
        let mut parsed: Vec<Measurement> =
            serde_json::from_str(&data).map_err(|e| DashboardError::MalformedReport {
                path: path.display().to_string(),
                reason: e.to_string(),
            })?;
        measurements.append(&mut parsed);
    }
    Ok(measurements)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn m(label: &str, duration_ms: f64) -> Measurement {
        Measurement {
            label: label.to_string(),
            duration_ms,
        }
    }

    #[test]
    fn statistics_per_label() {
        let measurements = vec![
            m("stack-analysis", 100.0),
            m("stack-analysis", 300.0),
            m("component-search", 50.0),
        ];
        let stats = compute_statistics(&measurements, &[]);
        assert_eq!(stats.len(), 2);

        let sa = stats.iter().find(|s| s.label == "stack-analysis").unwrap();
        assert_eq!(sa.min, 100.0);
        assert_eq!(sa.max, 300.0);
        assert_eq!(sa.mean, 200.0);
        assert_eq!(sa.samples, 2);
        assert_eq!(sa.within_sla, None);
    }

    #[test]
    fn sla_comparison() {
        let measurements = vec![m("stack-analysis", 100.0), m("stack-analysis", 300.0)];
        let thresholds = vec![SlaThreshold {
            label: "stack-analysis".to_string(),
            max_mean_ms: 150.0,
        }];
        let stats = compute_statistics(&measurements, &thresholds);
        assert_eq!(stats[0].within_sla, Some(false));

        let generous = vec![SlaThreshold {
            label: "stack-analysis".to_string(),
            max_mean_ms: 200.0,
        }];
        let stats = compute_statistics(&measurements, &generous);
        assert_eq!(stats[0].within_sla, Some(true));
    }

    #[test]
    fn no_measurements_no_statistics() {
        assert!(compute_statistics(&[], &[]).is_empty());
    }

    #[test]
    fn load_from_directory() {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join("api.json"),
            r#"[{"label": "stack-analysis", "duration_ms": 123.4}]"#,
        )
        .unwrap();
        std::fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        let measurements = load_measurements(dir.path()).unwrap();
        assert_eq!(measurements.len(), 1);
        assert_eq!(measurements[0].label, "stack-analysis");
    }

    #[test]
    fn missing_directory_is_empty() {
        let dir = TempDir::new().unwrap();
        let measurements = load_measurements(&dir.path().join("nope")).unwrap();
        assert!(measurements.is_empty());
    }

    #[test]
    fn malformed_results_file_is_error() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("bad.json"), "{not a list}").unwrap();
        assert!(matches!(
            load_measurements(dir.path()),
            Err(DashboardError::MalformedReport { .. })
        ));
    }
}
