//! Metrics collection and reporting for generation worldtests.
//!
//! Reports are exported as JSON so CI can track generation throughput and
//! degraded-placement counts across commits.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

/// Top-level metrics report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsReport {
    /// Test/benchmark identifier
    pub test_name: String,

    /// Timestamp when metrics were collected (ISO 8601)
    pub timestamp: String,

    /// Overall test result
    pub result: TestResult,

    /// Territory generation metrics
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generation: Option<GenerationMetrics>,

    /// Determinism validation results
    #[serde(skip_serializing_if = "Option::is_none")]
    pub determinism: Option<DeterminismMetrics>,

    /// Test execution metrics
    pub test_execution: TestExecutionMetrics,
}

/// Overall test result status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TestResult {
    /// Test passed all validations
    Pass,
    /// Test failed
    Fail,
    /// Test was skipped
    Skip,
}

/// Territory generation throughput and placement quality.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationMetrics {
    /// Territories generated
    pub territories_generated: usize,

    /// Ornament instances placed across all territories
    pub instances_placed: usize,

    /// Instances replaced by a fallback shape
    pub instances_degraded: usize,

    /// Instances skipped because no anchor was found
    pub instances_skipped: usize,

    /// Average generation time per territory (microseconds)
    pub avg_gen_time_us: f64,

    /// Max generation time (microseconds)
    pub max_gen_time_us: u128,

    /// Number of distinct archetypes covered
    pub archetypes_covered: usize,
}

/// Determinism validation results.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeterminismMetrics {
    /// Territories compared
    pub territories_compared: usize,

    /// Regeneration rounds per territory
    pub rounds: usize,

    /// Canonical JSON mismatches found
    pub mismatches: usize,
}

/// Test execution and infrastructure metrics
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestExecutionMetrics {
    /// Total test duration (seconds)
    pub duration_seconds: f64,

    /// Number of assertions checked
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assertions_checked: Option<usize>,
}

/// Builder for constructing metrics reports
pub struct MetricsReportBuilder {
    report: MetricsReport,
}

impl MetricsReportBuilder {
    /// Create a new builder with test name
    pub fn new(test_name: impl Into<String>) -> Self {
        Self {
            report: MetricsReport {
                test_name: test_name.into(),
                timestamp: chrono::Utc::now().to_rfc3339(),
                result: TestResult::Pass,
                generation: None,
                determinism: None,
                test_execution: TestExecutionMetrics {
                    duration_seconds: 0.0,
                    assertions_checked: None,
                },
            },
        }
    }

    /// Set test result
    pub fn result(mut self, result: TestResult) -> Self {
        self.report.result = result;
        self
    }

    /// Set generation metrics
    pub fn generation(mut self, metrics: GenerationMetrics) -> Self {
        self.report.generation = Some(metrics);
        self
    }

    /// Set determinism metrics
    pub fn determinism(mut self, metrics: DeterminismMetrics) -> Self {
        self.report.determinism = Some(metrics);
        self
    }

    /// Set test execution metrics
    pub fn execution(mut self, metrics: TestExecutionMetrics) -> Self {
        self.report.test_execution = metrics;
        self
    }

    /// Build the metrics report
    pub fn build(self) -> MetricsReport {
        self.report
    }
}

/// Sink for writing metrics reports to JSON files
pub struct MetricsSink {
    path: std::path::PathBuf,
}

impl MetricsSink {
    /// Create a new metrics sink at the specified path
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        Ok(Self { path })
    }

    /// Write metrics report to file
    pub fn write(&self, report: &MetricsReport) -> Result<()> {
        let json = serde_json::to_string_pretty(report)?;
        let mut file = File::create(&self.path)?;
        file.write_all(json.as_bytes())?;
        tracing::debug!(path = %self.path.display(), "wrote metrics report");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{SystemTime, UNIX_EPOCH};

    #[test]
    fn metrics_report_roundtrip() {
        let report = MetricsReportBuilder::new("test_example")
            .result(TestResult::Pass)
            .generation(GenerationMetrics {
                territories_generated: 70,
                instances_placed: 2100,
                instances_degraded: 0,
                instances_skipped: 3,
                avg_gen_time_us: 85.0,
                max_gen_time_us: 400,
                archetypes_covered: 7,
            })
            .execution(TestExecutionMetrics {
                duration_seconds: 0.4,
                assertions_checked: Some(70),
            })
            .build();

        let path = std::env::temp_dir().join(format!(
            "terrafuse-metrics-{}.json",
            SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .unwrap()
                .as_nanos()
        ));
        let sink = MetricsSink::create(&path).expect("sink");
        sink.write(&report).expect("write");

        let contents = fs::read_to_string(&path).expect("read");
        let parsed: MetricsReport = serde_json::from_str(&contents).expect("parse");
        assert_eq!(parsed.test_name, "test_example");
        assert_eq!(parsed.result, TestResult::Pass);
        let generation = parsed.generation.expect("generation metrics");
        assert_eq!(generation.territories_generated, 70);
        assert!(parsed.determinism.is_none());
        let _ = fs::remove_file(&path);
    }
}
