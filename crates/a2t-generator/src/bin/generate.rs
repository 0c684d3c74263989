//! CLI for generating TLC configurations from an Alloy specification.
//!
//! # Usage
//!
//! ```bash
//! a2t-generate Echo.als 3
//! a2t-generate --template voting --out results Paxos.als 2
//! A2T_SOLVER="python3 bridge.py" a2t-generate TCommit.als 4
//! ```

use std::error::Error as _;
use std::io::IsTerminal;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use a2t_generator::{
    infer_from_path, template_by_name, ConfigTemplate, EnumerationOutcome, IndexStyle, Pipeline,
    PipelineConfig, PipelineError, TEMPLATE_NAMES,
};
use a2t_solver::{BridgeSolver, CannedSolver, Solver};
use clap::error::ErrorKind;
use clap::{CommandFactory, Parser};
use tracing::error;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "a2t-generate", version)]
#[command(about = "Enumerate Alloy instances into TLC model configurations", long_about = None)]
struct Cli {
    /// Alloy specification
    #[arg(value_name = "SPEC")]
    spec: PathBuf,

    /// Number of objects in scope
    #[arg(value_name = "N")]
    n: usize,

    /// Template name (echo, voting, simple, tcommit); inferred from SPEC if omitted
    #[arg(short, long)]
    template: Option<String>,

    /// Directory in which config_<stem>_n<NN> is created
    #[arg(short, long, value_name = "DIR", default_value = ".")]
    out: PathBuf,

    /// Directory holding the support files (defaults to the directory of SPEC)
    #[arg(long, value_name = "DIR")]
    source: Option<PathBuf>,

    /// Number configuration directories without zero padding
    #[arg(long)]
    plain_index: bool,

    /// Replay instances from a JSON file instead of starting the solver
    #[arg(long, value_name = "FILE")]
    replay: Option<PathBuf>,

    /// Debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
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

    let template = match template_for(&cli) {
        Ok(template) => template,
        Err(e) => e.exit(),
    };

    let mut config = PipelineConfig::default().with_output_root(&cli.out);
    if let Some(ref source) = cli.source {
        config = config.with_source_dir(source);
    }
    if cli.plain_index {
        config = config.with_index_style(IndexStyle::Plain);
    }

    match cli.replay {
        Some(ref path) => {
            let json = match std::fs::read_to_string(path) {
                Ok(json) => json,
                Err(e) => {
                    eprintln!("Failed to read {}: {}", path.display(), e);
                    return ExitCode::FAILURE;
                }
            };
            match CannedSolver::from_json(&json) {
                Ok(solver) => run(solver, template, config, &cli.spec, cli.n),
                Err(e) => {
                    eprintln!("Invalid replay file {}: {}", path.display(), e);
                    ExitCode::FAILURE
                }
            }
        }
        None => run(BridgeSolver::from_env(), template, config, &cli.spec, cli.n),
    }
}

/// Template from `--template`, else inferred from the specification name.
fn template_for(cli: &Cli) -> Result<Box<dyn ConfigTemplate>, clap::Error> {
    let template = match cli.template.as_deref() {
        Some(name) => template_by_name(name),
        None => infer_from_path(&cli.spec),
    };
    template.ok_or_else(|| {
        Cli::command().error(
            ErrorKind::InvalidValue,
            format!(
                "cannot determine template for {}; pass --template (one of: {})",
                cli.spec.display(),
                TEMPLATE_NAMES.join(", ")
            ),
        )
    })
}

fn run<S: Solver>(
    solver: S,
    template: Box<dyn ConfigTemplate>,
    config: PipelineConfig,
    spec: &Path,
    n: usize,
) -> ExitCode {
    let mut pipeline = Pipeline::new(solver, template, config);

    match pipeline.run(spec, n) {
        Ok(report) => {
            match report.outcome {
                Some(EnumerationOutcome::NoInstance) => {
                    println!("No satisfying instance found. The predicate may be inconsistent.");
                }
                Some(EnumerationOutcome::Exhausted { instances, .. }) => {
                    println!("No more satisfying instances ({} enumerated).", instances);
                }
                None => {}
            }
            println!(
                "Wrote {} configuration(s) under {}",
                report.configs.len(),
                report.base_dir.display()
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            log_error_chain(&e);
            if let PipelineError::Driver(ref driver) = e {
                eprintln!(
                    "Kept {} configuration(s) written before the failure.",
                    driver.report.configs.len()
                );
            }
            ExitCode::FAILURE
        }
    }
}

fn log_error_chain(e: &PipelineError) {
    error!("{}", e);
    let mut source = e.source();
    while let Some(cause) = source {
        error!("  caused by: {}", cause);
        source = cause.source();
    }
}
