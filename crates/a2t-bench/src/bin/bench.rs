//! a2t-bench: time Alloy against TLC on generated configurations.
//!
//! # Usage
//!
//! ```bash
//! a2t-bench suite --base . --runs 3 --json report.json
//! a2t-bench rescope-als learning_conc.als 5
//! a2t-bench rescope-cfg Simple.cfg 5
//! a2t-bench activate echo_n3 2 MCEcho.tla
//! ```

use std::io::IsTerminal;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use clap::{Parser, Subcommand};
use tracing::error;
use tracing_subscriber::EnvFilter;

use a2t_bench::{
    activate_instance, count_instances, rescope_alloy_file, rescope_cfg_file, run_suite,
    BenchConfig, BenchError,
};

/// Maximum timeout per run (seconds).
const TIMEOUT_SECONDS_MAX: u64 = 86_400;

#[derive(Parser)]
#[command(name = "a2t-bench", version)]
#[command(about = "Benchmark Alloy against TLC on generated configurations", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Debug logging (includes tool output)
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Time every config_<stem>_n<NN> root under a base directory
    Suite {
        /// Directory holding the configuration roots
        #[arg(long, default_value = ".")]
        base: PathBuf,

        /// Runs per measurement
        #[arg(long)]
        runs: Option<usize>,

        /// Timeout per run in seconds
        #[arg(long)]
        timeout: Option<u64>,

        /// One run per measurement, short timeout
        #[arg(long, conflicts_with = "thorough")]
        quick: bool,

        /// Ten runs per measurement, long timeout
        #[arg(long)]
        thorough: bool,

        /// Drop a series at its first run without a timing
        #[arg(long)]
        fail_fast: bool,

        /// Write the JSON report to this file ("-" for stdout)
        #[arg(long, value_name = "FILE")]
        json: Option<PathBuf>,
    },

    /// Rewrite `for <k> but 1..steps` scopes in an Alloy file
    RescopeAls {
        #[arg(value_name = "FILE")]
        file: PathBuf,
        #[arg(value_name = "N")]
        n: usize,
    },

    /// Rewrite `CONSTANT <name> = <k>` in a TLC configuration
    RescopeCfg {
        #[arg(value_name = "FILE")]
        file: PathBuf,
        #[arg(value_name = "N")]
        n: usize,
        /// Constant to rewrite
        #[arg(long, default_value = "N")]
        constant: String,
    },

    /// Copy one instance's generated file into a working directory
    Activate {
        /// Instance root (e.g. echo_n3)
        #[arg(value_name = "ROOT")]
        root: PathBuf,
        /// Instance index (0 only prints the instance count)
        #[arg(value_name = "INDEX")]
        index: usize,
        /// File to copy out of the instance directory
        #[arg(value_name = "FILE")]
        file: String,
        /// Destination directory
        #[arg(long, default_value = ".")]
        dest: PathBuf,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(if cli.verbose { "debug" } else { "info" }));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .with_target(false)
        .without_time()
        .init();

    let result = match cli.command {
        Commands::Suite {
            base,
            runs,
            timeout,
            quick,
            thorough,
            fail_fast,
            json,
        } => cmd_suite(base, runs, timeout, quick, thorough, fail_fast, json).await,
        Commands::RescopeAls { file, n } => rescope_alloy_file(&file, n).map(|changed| {
            println!("{}: {}", file.display(), if changed { "rescoped" } else { "unchanged" });
        }),
        Commands::RescopeCfg { file, n, constant } => {
            rescope_cfg_file(&file, &constant, n).map(|changed| {
                println!("{}: {}", file.display(), if changed { "rescoped" } else { "unchanged" });
            })
        }
        Commands::Activate {
            root,
            index,
            file,
            dest,
        } => cmd_activate(root, index, &file, dest),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

async fn cmd_suite(
    base: PathBuf,
    runs: Option<usize>,
    timeout: Option<u64>,
    quick: bool,
    thorough: bool,
    fail_fast: bool,
    json: Option<PathBuf>,
) -> Result<(), BenchError> {
    let mut config = if quick {
        BenchConfig::quick()
    } else if thorough {
        BenchConfig::thorough()
    } else {
        BenchConfig::default()
    }
    .with_env()
    .with_fail_fast(fail_fast);

    if let Some(runs) = runs.filter(|&r| r > 0) {
        config = config.with_runs(runs);
    }
    if let Some(secs) = timeout.filter(|&s| s > 0) {
        config = config.with_timeout(Duration::from_secs(secs.min(TIMEOUT_SECONDS_MAX)));
    }

    let report = run_suite(&base, &config).await?;

    // With `--json -` stdout carries the JSON report and nothing else.
    match json {
        Some(path) if path.as_os_str() == "-" => {
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        Some(path) => {
            println!();
            println!("{}", report.format_report());
            std::fs::write(&path, serde_json::to_string_pretty(&report)?)
                .map_err(BenchError::io(&path))?;
            println!("Report written to: {}", path.display());
        }
        None => {
            println!();
            println!("{}", report.format_report());
        }
    }
    Ok(())
}

fn cmd_activate(root: PathBuf, index: usize, file: &str, dest: PathBuf) -> Result<(), BenchError> {
    println!("{}", count_instances(&root)?);
    if index > 0 {
        activate_instance(&root, index, file, &dest)?;
    }
    Ok(())
}
