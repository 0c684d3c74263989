//! Alloy vs TLC benchmark suite over a generated configuration tree.
//!
//! For every `config_<stem>_n<NN>` root under the base directory:
//! 1. Time the Alloy runner on the scoped `.als` file.
//! 2. Time TLC on every sub-configuration and sum the series element-wise,
//!    giving the cost of checking all configurations of that scope.

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use tracing::{info, warn};

use crate::discover::{discover_roots, find_als_file, find_config_directories, find_tlc_input};
use crate::result::{ScopeReport, SuiteReport};
use crate::runner::{run_series, BenchCommand, SeriesOptions};
use crate::stats::{sum_series, Summary};
use crate::BenchError;

/// Default runs per measurement.
pub const RUNS_DEFAULT: usize = 3;

/// Default timeout per run (seconds).
pub const TIMEOUT_SECONDS_DEFAULT: u64 = 600;

/// Alloy distribution jar.
pub const ALLOY_JAR_DEFAULT: &str = "org.alloytools.alloy.dist.jar";

/// Java source of the timing Alloy runner.
pub const ALLOY_RUNNER_DEFAULT: &str = "AlloyRunner.java";

/// TLC launcher.
pub const TLC_BIN_DEFAULT: &str = "tlc";

/// Java launcher for the Alloy runner.
pub const JAVA_BIN_DEFAULT: &str = "java";

/// Benchmark configuration.
#[derive(Debug, Clone)]
pub struct BenchConfig {
    /// Runs per measurement
    pub runs: usize,
    /// Timeout per run
    pub timeout: Duration,
    /// Java launcher
    pub java_bin: String,
    /// Alloy distribution jar (relative paths resolve against the current directory)
    pub alloy_jar: PathBuf,
    /// Alloy runner source (relative paths resolve against the current directory)
    pub alloy_runner: PathBuf,
    /// TLC launcher
    pub tlc_bin: String,
    /// Drop a series at its first run without a timing
    pub fail_fast: bool,
}

impl Default for BenchConfig {
    fn default() -> Self {
        Self {
            runs: RUNS_DEFAULT,
            timeout: Duration::from_secs(TIMEOUT_SECONDS_DEFAULT),
            java_bin: JAVA_BIN_DEFAULT.to_string(),
            alloy_jar: PathBuf::from(ALLOY_JAR_DEFAULT),
            alloy_runner: PathBuf::from(ALLOY_RUNNER_DEFAULT),
            tlc_bin: TLC_BIN_DEFAULT.to_string(),
            fail_fast: false,
        }
    }
}

impl BenchConfig {
    /// Quick config for smoke runs.
    pub fn quick() -> Self {
        Self {
            runs: 1,
            timeout: Duration::from_secs(60),
            ..Default::default()
        }
    }

    /// Thorough config for published numbers.
    pub fn thorough() -> Self {
        Self {
            runs: 10,
            timeout: Duration::from_secs(3600),
            ..Default::default()
        }
    }

    /// Default config with tool paths from the environment.
    pub fn from_env() -> Self {
        Self::default().with_env()
    }

    /// Apply `JAVA_BIN`, `ALLOY_JAR`, `ALLOY_RUNNER` and `TLC_BIN` from the environment.
    pub fn with_env(self) -> Self {
        let var = |name: &str| std::env::var(name).ok().filter(|v| !v.trim().is_empty());
        let mut config = self;
        if let Some(java) = var("JAVA_BIN") {
            config.java_bin = java.trim().to_string();
        }
        if let Some(jar) = var("ALLOY_JAR") {
            config.alloy_jar = PathBuf::from(jar.trim());
        }
        if let Some(runner) = var("ALLOY_RUNNER") {
            config.alloy_runner = PathBuf::from(runner.trim());
        }
        if let Some(tlc) = var("TLC_BIN") {
            config.tlc_bin = tlc.trim().to_string();
        }
        config
    }

    pub fn with_runs(mut self, runs: usize) -> Self {
        debug_assert!(runs > 0, "Runs must be positive");
        self.runs = runs;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_fail_fast(mut self, fail_fast: bool) -> Self {
        self.fail_fast = fail_fast;
        self
    }

    fn series_options(&self) -> SeriesOptions {
        SeriesOptions {
            runs: self.runs,
            timeout: self.timeout,
            fail_fast: self.fail_fast,
        }
    }
}

/// Resolve `path` against the current directory; tools run inside the
/// configuration directories.
fn absolute(path: &Path) -> Result<PathBuf, BenchError> {
    if path.is_absolute() {
        return Ok(path.to_path_buf());
    }
    let cwd = std::env::current_dir().map_err(BenchError::io(Path::new(".")))?;
    Ok(cwd.join(path))
}

/// Benchmark every configuration root under `base`.
pub async fn run_suite(base: &Path, config: &BenchConfig) -> Result<SuiteReport, BenchError> {
    let start = Instant::now();
    let options = config.series_options();
    let alloy_jar = absolute(&config.alloy_jar)?;
    let alloy_runner = absolute(&config.alloy_runner)?;

    let roots = discover_roots(base).map_err(BenchError::io(base))?;
    if roots.is_empty() {
        return Err(BenchError::NoConfigDirectories(base.to_path_buf()));
    }
    info!(
        "Found config directories: {}",
        roots.iter().map(|r| r.name.as_str()).collect::<Vec<_>>().join("; ")
    );

    let mut scopes = Vec::with_capacity(roots.len());
    for root in roots {
        info!("================== N = {} ==================", root.n);

        let alloy_times = match find_als_file(&root.path).map_err(BenchError::io(&root.path))? {
            Some(als_file) => {
                let command = BenchCommand::alloy(
                    &config.java_bin,
                    &alloy_jar.to_string_lossy(),
                    &alloy_runner.to_string_lossy(),
                    &als_file,
                );
                run_series(&command, &root.path, options).await
            }
            None => {
                warn!("No .als file in {}", root.path.display());
                Vec::new()
            }
        };

        let tlc_dirs = find_config_directories(&root.path).map_err(BenchError::io(&root.path))?;
        let mut tlc_times: Vec<u64> = Vec::new();
        for tlc_dir in &tlc_dirs {
            let dir = root.path.join(tlc_dir);
            let Some(input) = find_tlc_input(&dir).map_err(BenchError::io(&dir))? else {
                warn!("No .cfg file in {}", dir.display());
                continue;
            };

            let command = BenchCommand::tlc(&config.tlc_bin, &input.tla_file, &input.cfg_file);
            let times = run_series(&command, &dir, options).await;
            if times.is_empty() && config.fail_fast {
                warn!("No timing for {}; dropping the TLC series for N = {}", dir.display(), root.n);
                tlc_times.clear();
                break;
            }
            tlc_times = sum_series(&tlc_times, &times);
        }

        scopes.push(ScopeReport {
            n: root.n,
            directory: root.name,
            alloy: Summary::from_samples(&alloy_times),
            tlc: Summary::from_samples(&tlc_times),
            tlc_configs: tlc_dirs.len(),
        });
    }

    Ok(SuiteReport {
        runs: config.runs,
        scopes,
        total_duration: start.elapsed(),
    })
}
