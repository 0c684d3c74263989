//! Timed tool invocations.
//!
//! Both Alloy runners and TLC print `Finished in <ms>ms` when they are done;
//! that figure, not the wall clock, is the measurement. The last occurrence in
//! the combined output wins.

use std::path::Path;
use std::process::Stdio;
use std::time::{Duration, Instant};

use regex::Regex;
use tokio::process::Command;
use tracing::{debug, info, warn};

use crate::result::RunResult;

/// Pattern of the timing line printed by both tools.
pub const FINISHED_PATTERN: &str = r"Finished in (\d+)ms";

/// Last `Finished in <ms>ms` figure in `output`.
pub fn scrape_finished_ms(output: &str) -> Option<u64> {
    let re = Regex::new(FINISHED_PATTERN).ok()?;
    re.captures_iter(output)
        .filter_map(|caps| caps.get(1)?.as_str().parse().ok())
        .last()
}

/// A command line to benchmark.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BenchCommand {
    pub program: String,
    pub args: Vec<String>,
}

impl BenchCommand {
    pub fn new<S: Into<String>>(program: impl Into<String>, args: impl IntoIterator<Item = S>) -> Self {
        Self {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    /// Parse a whitespace-separated command line. `None` if it is blank.
    pub fn from_command_line(line: &str) -> Option<Self> {
        let mut parts = line.split_whitespace();
        let program = parts.next()?;
        Some(Self::new(program, parts))
    }

    /// `<java> -cp <jar> <runner> <als>`
    pub fn alloy(java_bin: &str, alloy_jar: &str, runner: &str, als_file: &str) -> Self {
        Self::new(java_bin, ["-cp", alloy_jar, runner, als_file])
    }

    /// `<tlc> <tla> -tool -modelcheck -coverage 1 -config <cfg>`
    pub fn tlc(tlc_bin: &str, tla_file: &str, cfg_file: &str) -> Self {
        Self::new(
            tlc_bin,
            [tla_file, "-tool", "-modelcheck", "-coverage", "1", "-config", cfg_file],
        )
    }

    pub fn display(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Run `command` once in `work_dir`, killing it after `timeout`.
pub async fn run_once(command: &BenchCommand, work_dir: &Path, timeout: Duration) -> RunResult {
    let start = Instant::now();
    let shown = command.display();

    let mut cmd = Command::new(&command.program);
    cmd.args(&command.args)
        .current_dir(work_dir)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    let result = tokio::time::timeout(timeout, cmd.output()).await;
    let duration = start.elapsed();

    match result {
        Ok(Ok(output)) => {
            let stdout = String::from_utf8_lossy(&output.stdout);
            let stderr = String::from_utf8_lossy(&output.stderr);
            let combined = format!("{}\n{}", stdout, stderr);
            debug!("{} output:\n{}", shown, combined);

            let finished_ms = scrape_finished_ms(&combined);
            match finished_ms {
                Some(ms) => info!("Model checking time: {} ms ({:.3} s)", ms, ms as f64 / 1000.0),
                None => warn!("Could not find 'Finished in ...ms' in output of {}", shown),
            }
            RunResult::completed(shown, finished_ms, duration, combined)
        }
        Ok(Err(e)) => {
            warn!("Failed to run {}: {}", shown, e);
            RunResult::failed(shown, format!("Failed to run: {}", e), duration)
        }
        Err(_) => {
            warn!("Timeout expired after {:?}: {}", timeout, shown);
            RunResult::timeout(shown, timeout)
        }
    }
}

/// Options for a series of runs.
#[derive(Debug, Clone, Copy)]
pub struct SeriesOptions {
    /// Number of runs
    pub runs: usize,
    /// Timeout per run
    pub timeout: Duration,
    /// Discard the whole series at the first run without a timing
    pub fail_fast: bool,
}

/// Run `command` repeatedly and collect the reported timings.
///
/// Without `fail_fast`, runs that report no timing are skipped. With it, the
/// first such run ends the series and an empty series is returned.
pub async fn run_series(command: &BenchCommand, work_dir: &Path, options: SeriesOptions) -> Vec<u64> {
    debug_assert!(options.runs > 0, "Series needs at least one run");

    let mut times = Vec::with_capacity(options.runs);
    for i in 0..options.runs {
        info!(
            "Run '{}' ({}/{}) (workdir={})",
            command.display(),
            i + 1,
            options.runs,
            work_dir.display()
        );
        let result = run_once(command, work_dir, options.timeout).await;
        match result.finished_ms {
            Some(ms) => times.push(ms),
            None if options.fail_fast => return Vec::new(),
            None => {}
        }
    }
    times
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scrape_last_timing() {
        let output = "Executing command: run$1\nFinished in 12ms\nFinished in 345ms\nSAT";
        assert_eq!(scrape_finished_ms(output), Some(345));
        assert_eq!(scrape_finished_ms("Model checking completed."), None);
        assert_eq!(scrape_finished_ms("Finished in ms"), None);
    }

    #[test]
    fn test_command_lines() {
        assert_eq!(
            BenchCommand::tlc("tlc", "MCEcho.tla", "MCEcho.cfg").display(),
            "tlc MCEcho.tla -tool -modelcheck -coverage 1 -config MCEcho.cfg"
        );
        assert_eq!(
            BenchCommand::alloy("java", "alloy.jar", "AlloyRunner.java", "Echo.als").display(),
            "java -cp alloy.jar AlloyRunner.java Echo.als"
        );
        let parsed = BenchCommand::from_command_line(" tla2tools  -deadlock ").unwrap();
        assert_eq!(parsed, BenchCommand::new("tla2tools", ["-deadlock"]));
        assert!(BenchCommand::from_command_line("").is_none());
    }

    #[cfg(unix)]
    mod unix {
        use super::*;

        fn sh(script: &str) -> BenchCommand {
            BenchCommand::new("sh", ["-c", script])
        }

        #[tokio::test]
        async fn test_run_once_reads_stderr_too() {
            let dir = tempfile::tempdir().unwrap();
            let result = run_once(&sh("echo start; echo 'Finished in 42ms' >&2"), dir.path(), Duration::from_secs(10)).await;
            assert_eq!(result.finished_ms, Some(42));
            assert!(!result.timed_out);
            assert!(result.output.contains("start"));
        }

        #[tokio::test]
        async fn test_run_once_uses_work_dir() {
            let dir = tempfile::tempdir().unwrap();
            std::fs::write(dir.path().join("timing.txt"), "Finished in 7ms\n").unwrap();
            let result = run_once(&sh("cat timing.txt"), dir.path(), Duration::from_secs(10)).await;
            assert_eq!(result.finished_ms, Some(7));
        }

        #[tokio::test]
        async fn test_run_once_timeout() {
            let dir = tempfile::tempdir().unwrap();
            let result = run_once(&sh("sleep 5; echo 'Finished in 1ms'"), dir.path(), Duration::from_millis(100)).await;
            assert!(result.timed_out);
            assert_eq!(result.finished_ms, None);
        }

        #[tokio::test]
        async fn test_run_once_missing_program() {
            let dir = tempfile::tempdir().unwrap();
            let command = BenchCommand::new("/nonexistent/tlc", ["Spec.tla"]);
            let result = run_once(&command, dir.path(), Duration::from_secs(1)).await;
            assert!(result.error.is_some());
            assert!(!result.timed_out);
        }

        #[tokio::test]
        async fn test_series_skips_or_fails_fast() {
            let dir = tempfile::tempdir().unwrap();
            // Alternates between a timed and an untimed run via a marker file.
            let script = "if [ -f marker ]; then rm marker; echo nothing; else touch marker; echo 'Finished in 5ms'; fi";
            let options = SeriesOptions {
                runs: 3,
                timeout: Duration::from_secs(10),
                fail_fast: false,
            };
            assert_eq!(run_series(&sh(script), dir.path(), options).await, vec![5, 5]);

            std::fs::write(dir.path().join("marker"), "").unwrap();
            let strict = SeriesOptions { fail_fast: true, ..options };
            assert!(run_series(&sh(script), dir.path(), strict).await.is_empty());
        }
    }
}
