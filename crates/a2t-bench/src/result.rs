//! Benchmark result types.

use std::time::Duration;

use serde::Serialize;

use crate::stats::Summary;

/// Result of one tool invocation.
#[derive(Debug, Clone, Serialize)]
pub struct RunResult {
    /// Command line that was run
    pub command: String,
    /// Time reported by the tool (`Finished in <ms>ms`), if any
    pub finished_ms: Option<u64>,
    /// Whether the run was killed at the timeout
    pub timed_out: bool,
    /// Error message if the run could not complete
    pub error: Option<String>,
    /// Wall-clock duration of the invocation
    #[serde(with = "duration_ms")]
    pub duration: Duration,
    /// Combined stdout and stderr
    #[serde(skip)]
    pub output: String,
}

impl RunResult {
    /// A run that completed (whether or not it reported a time).
    pub fn completed(
        command: impl Into<String>,
        finished_ms: Option<u64>,
        duration: Duration,
        output: String,
    ) -> Self {
        Self {
            command: command.into(),
            finished_ms,
            timed_out: false,
            error: None,
            duration,
            output,
        }
    }

    /// A run killed at the timeout.
    pub fn timeout(command: impl Into<String>, timeout: Duration) -> Self {
        Self {
            command: command.into(),
            finished_ms: None,
            timed_out: true,
            error: Some(format!("Timeout after {:?}", timeout)),
            duration: timeout,
            output: String::new(),
        }
    }

    /// A run that could not be started.
    pub fn failed(command: impl Into<String>, error: impl Into<String>, duration: Duration) -> Self {
        Self {
            command: command.into(),
            finished_ms: None,
            timed_out: false,
            error: Some(error.into()),
            duration,
            output: String::new(),
        }
    }

    /// Whether the run produced a timing.
    pub fn has_timing(&self) -> bool {
        self.finished_ms.is_some()
    }

    /// Format as a single-line status.
    pub fn format_status(&self) -> String {
        match (self.finished_ms, &self.error) {
            (Some(ms), _) => format!("[TIME] {} ms ({:.3} s): {}", ms, ms as f64 / 1000.0, self.command),
            (None, Some(error)) => format!("[FAIL] {}: {}", self.command, error),
            (None, None) => format!("[MISS] no 'Finished in ...ms' in output: {}", self.command),
        }
    }
}

/// Measurements for one scope `n`.
#[derive(Debug, Clone, Serialize)]
pub struct ScopeReport {
    /// Scope parsed from the directory name
    pub n: usize,
    /// Configuration root (`config_<stem>_n<NN>`)
    pub directory: String,
    /// Alloy timings
    pub alloy: Summary,
    /// TLC timings, summed element-wise over every sub-configuration
    pub tlc: Summary,
    /// Number of TLC sub-configurations
    pub tlc_configs: usize,
}

/// Measurements for every configuration root under one base directory.
#[derive(Debug, Clone, Serialize)]
pub struct SuiteReport {
    /// Runs per measurement
    pub runs: usize,
    pub scopes: Vec<ScopeReport>,
    /// Total wall-clock duration of the suite
    #[serde(with = "duration_ms")]
    pub total_duration: Duration,
}

impl SuiteReport {
    /// Format as a report table.
    pub fn format_report(&self) -> String {
        let mut report = String::new();

        report.push_str("Alloy vs TLC Benchmark\n");
        report.push_str("======================\n\n");
        report.push_str(&format!("{} runs per measurement\n\n", self.runs));
        report.push_str(&format!(
            "{:>4}  {:>18}  {:>18}  {:>8}\n",
            "N", "Alloy (ms)", "TLC (ms)", "configs"
        ));

        for scope in &self.scopes {
            report.push_str(&format!(
                "{:>4}  {:>18}  {:>18}  {:>8}\n",
                scope.n,
                scope.alloy.format_mean_stdev(),
                scope.tlc.format_mean_stdev(),
                scope.tlc_configs
            ));
        }

        report.push_str(&format!("\nTotal: {:.2}s\n", self.total_duration.as_secs_f64()));
        report
    }
}

mod duration_ms {
    use std::time::Duration;

    use serde::Serializer;

    pub fn serialize<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(duration.as_millis() as u64)
    }
}
