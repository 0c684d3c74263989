//! End-to-end generation for one specification and scope.
//!
//! ```text
//! <spec>.als ──scope──> config_<stem>_n<NN>/<stem>.als
//!     │
//!     └──+ run command──> temporary solver input ──> Solver ──> driver
//!                                                          │
//!                              config_<stem>_n<NN>/config_<stem>_n<NN>_<i>/
//! ```
//!
//! The temporary solver input is written next to the specification so that
//! relative `open` statements still resolve. It is removed when the run ends,
//! whether or not the run succeeded.
//!
//! Every template has its command executed, so a specification the solver
//! rejects never yields configurations. Templates that do not enumerate then
//! ignore the instances and render once at index 1.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use a2t_core::block::BLOCK_KEYWORD_DEFAULT;
use a2t_core::BlockHeader;
use a2t_solver::{Solver, SolverError, SolverSession};
use thiserror::Error;
use tracing::{debug, info};

use crate::driver::{self, DriverError, EnumerationOutcome};
use crate::materialize::{IndexStyle, MaterializeError, Materializer};
use crate::templates::{ConfigTemplate, TemplateError};

/// Prefix of every output root directory.
pub const OUTPUT_PREFIX: &str = "config";

/// Pipeline errors.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("scope must be at least 1")]
    ZeroScope,

    #[error("specification path {0} has no usable file stem")]
    InvalidSpecPath(PathBuf),

    #[error("I/O error at {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error(transparent)]
    Template(#[from] TemplateError),

    #[error(transparent)]
    Materialize(#[from] MaterializeError),

    #[error("solver failed to execute the command")]
    Solver(#[from] SolverError),

    #[error(transparent)]
    Driver(#[from] DriverError),
}

impl PipelineError {
    /// Whether the failure happened after the solver was started.
    pub fn is_solver_stage(&self) -> bool {
        matches!(self, PipelineError::Solver(_) | PipelineError::Driver(_))
    }
}

fn io_error(path: &Path) -> impl FnOnce(io::Error) -> PipelineError + '_ {
    move |source| PipelineError::Io {
        path: path.to_path_buf(),
        source,
    }
}

/// Pipeline configuration.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Directory in which `config_<stem>_n<NN>` is created
    pub output_root: PathBuf,
    /// Directory holding the support files (defaults to the specification's directory)
    pub source_dir: Option<PathBuf>,
    /// Index rendering of configuration directories
    pub index_style: IndexStyle,
    /// Keyword of the block whose scope is rewritten
    pub block_keyword: String,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            output_root: PathBuf::from("."),
            source_dir: None,
            index_style: IndexStyle::default(),
            block_keyword: BLOCK_KEYWORD_DEFAULT.to_string(),
        }
    }
}

impl PipelineConfig {
    pub fn with_output_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.output_root = root.into();
        self
    }

    pub fn with_source_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.source_dir = Some(dir.into());
        self
    }

    pub fn with_index_style(mut self, style: IndexStyle) -> Self {
        self.index_style = style;
        self
    }

    pub fn with_block_keyword(mut self, keyword: impl Into<String>) -> Self {
        self.block_keyword = keyword.into();
        self
    }
}

/// Result of one pipeline run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineReport {
    /// `config_<stem>_n<NN>`
    pub base_dir: PathBuf,
    /// Scope-injected copy of the specification
    pub scoped_spec: PathBuf,
    /// Command executed by the solver
    pub command: String,
    /// Enumeration outcome (`None` if the template does not enumerate)
    pub outcome: Option<EnumerationOutcome>,
    /// Configuration directories written, in index order
    pub configs: Vec<PathBuf>,
}

/// Name of the output root for a specification stem and scope.
pub fn output_dir_name(stem: &str, n: usize) -> String {
    format!("{}_{}_n{:02}", OUTPUT_PREFIX, stem, n)
}

/// Scope-inject, solve and materialize one specification.
pub struct Pipeline<S> {
    solver: S,
    template: Box<dyn ConfigTemplate>,
    config: PipelineConfig,
}

impl<S: Solver> Pipeline<S> {
    pub fn new(solver: S, template: Box<dyn ConfigTemplate>, config: PipelineConfig) -> Self {
        Self {
            solver,
            template,
            config,
        }
    }

    pub fn solver(&self) -> &S {
        &self.solver
    }

    pub fn template(&self) -> &dyn ConfigTemplate {
        self.template.as_ref()
    }

    /// Run the pipeline for `spec_path` at scope `n`.
    pub fn run(&mut self, spec_path: &Path, n: usize) -> Result<PipelineReport, PipelineError> {
        if n == 0 {
            return Err(PipelineError::ZeroScope);
        }
        self.template.check_scope(n)?;

        let stem = spec_path
            .file_stem()
            .and_then(|stem| stem.to_str())
            .filter(|stem| !stem.is_empty())
            .ok_or_else(|| PipelineError::InvalidSpecPath(spec_path.to_path_buf()))?;
        let spec_dir = match spec_path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        let text = fs::read_to_string(spec_path).map_err(io_error(spec_path))?;

        let base_dir = self.config.output_root.join(output_dir_name(stem, n));
        fs::create_dir_all(&base_dir).map_err(io_error(&base_dir))?;

        let scoped_spec = base_dir.join(format!("{}.als", stem));
        let header = BlockHeader::new(self.config.block_keyword.as_str());
        let scoped = header.change_scope(&text, self.template.scope_block(), &self.template.scope(n));
        fs::write(&scoped_spec, scoped).map_err(io_error(&scoped_spec))?;
        info!("Wrote scoped specification: {}", scoped_spec.display());

        let source_dir = self.config.source_dir.clone().unwrap_or_else(|| spec_dir.clone());
        let materializer =
            Materializer::new(&base_dir, source_dir).with_style(self.config.index_style);

        let mut input = tempfile::Builder::new()
            .prefix(".a2t-")
            .suffix(".als")
            .tempfile_in(&spec_dir)
            .map_err(io_error(&spec_dir))?;
        let input_path = input.path().to_path_buf();
        write!(input, "{}\n{}", text, self.template.run_command(n))
            .and_then(|()| input.flush())
            .map_err(io_error(&input_path))?;
        debug!(input = %input_path.display(), "wrote solver input");

        let mut session = self.solver.execute(&input_path)?;
        let command = session.command_label().to_string();
        info!("Executing command: {}", command);

        let (configs, outcome) = if self.template.enumerates() {
            let outcome = driver::enumerate(&mut session, self.template.as_ref(), n, &materializer)?;
            (outcome.configs().to_vec(), Some(outcome))
        } else {
            let configs = self.template.render(n, None)?;
            let configs = driver::write_configs(&materializer, self.template.as_ref(), 1, &configs)?;
            (configs, None)
        };
        drop(session);
        input.close().map_err(io_error(&input_path))?;

        Ok(PipelineReport {
            base_dir,
            scoped_spec,
            command,
            outcome,
            configs,
        })
    }
}
