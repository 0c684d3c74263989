//! # a2t-bench
//!
//! Benchmark the Alloy solver against TLC on configuration trees written by
//! `a2t-generate`.
//!
//! This crate provides:
//! - A timed subprocess runner that scrapes `Finished in <ms>ms`
//! - Discovery of `config_<stem>_n<NN>` trees
//! - Mean / sample standard deviation / element-wise series sums
//! - A suite that times every scope and emits a JSON report
//! - In-place rescoping of hand-maintained `.als` / `.cfg` working copies
//!
//! # Usage
//!
//! ```bash
//! # Time every config_* root under the current directory
//! ALLOY_JAR=/opt/alloy/org.alloytools.alloy.dist.jar a2t-bench suite --runs 3
//!
//! # JSON report for plotting
//! a2t-bench suite --quick --json report.json
//!
//! # Switch a working copy to N = 4 and activate instance 2
//! a2t-bench rescope-als echo.als 4
//! a2t-bench activate echo_n4 2 MCEcho.tla
//! ```
//!
//! # Tools
//!
//! | Tool  | Command                                                           |
//! |-------|-------------------------------------------------------------------|
//! | Alloy | `<JAVA_BIN> -cp <ALLOY_JAR> <ALLOY_RUNNER> <stem>.als`            |
//! | TLC   | `<TLC_BIN> <M>.tla -tool -modelcheck -coverage 1 -config <M>.cfg` |

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

pub mod discover;
pub mod rescope;
pub mod result;
pub mod runner;
pub mod stats;
pub mod suite;

pub use discover::{
    discover_roots, find_als_file, find_config_directories, find_tlc_input, parse_scope,
    ConfigRoot, TlcInput,
};
pub use rescope::{
    activate_instance, count_instances, rescope_alloy, rescope_alloy_file, rescope_cfg,
    rescope_cfg_file,
};
pub use result::{RunResult, ScopeReport, SuiteReport};
pub use runner::{run_once, run_series, scrape_finished_ms, BenchCommand, SeriesOptions};
pub use stats::{mean, stdev, sum_series, Summary};
pub use suite::{run_suite, BenchConfig};

/// Benchmark errors.
#[derive(Debug, Error)]
pub enum BenchError {
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("no config_* directories under {0}")]
    NoConfigDirectories(PathBuf),

    #[error("{0} does not exist")]
    MissingFile(PathBuf),

    #[error("invalid pattern: {0}")]
    Pattern(#[from] regex::Error),

    #[error("failed to serialize report: {0}")]
    Json(#[from] serde_json::Error),
}

impl BenchError {
    /// Map an `io::Error` at `path`.
    pub fn io(path: &Path) -> impl FnOnce(io::Error) -> BenchError + '_ {
        move |source| BenchError::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}
