//! Enumeration driver.
//!
//! Walks every instance of a solver session, renders it through a template and
//! materializes each rendered configuration under the next free index. Indices
//! start at 1 and are contiguous across instances.
//!
//! The driver never rolls back: if the solver fails halfway through, the
//! directories already written stay on disk and the error carries a report of
//! what was produced.

use std::path::PathBuf;

use a2t_solver::{SolverError, SolverSession};
use thiserror::Error;
use tracing::info;

use crate::materialize::{write_config, MaterializeError, Materializer};
use crate::templates::{ConfigTemplate, TemplateError};

/// A failure while generating one configuration.
#[derive(Debug, Error)]
pub enum GenerateError {
    #[error(transparent)]
    Solver(#[from] SolverError),

    #[error(transparent)]
    Template(#[from] TemplateError),

    #[error(transparent)]
    Materialize(#[from] MaterializeError),
}

/// What an enumeration produced so far.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnumerationReport {
    /// Instances consumed from the solver
    pub instances: usize,
    /// Configuration directories written, in index order
    pub configs: Vec<PathBuf>,
}

/// How an enumeration ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnumerationOutcome {
    /// The very first query was unsatisfiable.
    NoInstance,
    /// Every instance was consumed.
    Exhausted {
        instances: usize,
        configs: Vec<PathBuf>,
    },
}

impl EnumerationOutcome {
    /// Configuration directories written.
    pub fn configs(&self) -> &[PathBuf] {
        match self {
            EnumerationOutcome::NoInstance => &[],
            EnumerationOutcome::Exhausted { configs, .. } => configs,
        }
    }
}

/// Enumeration stopped by an error, with everything written before it.
#[derive(Debug, Error)]
#[error("enumeration stopped after {} instance(s) and {} config(s)", .report.instances, .report.configs.len())]
pub struct DriverError {
    pub report: EnumerationReport,
    #[source]
    pub source: GenerateError,
}

/// Write rendered configurations at `first_index`, `first_index + 1`, ...
pub fn write_configs(
    materializer: &Materializer,
    template: &dyn ConfigTemplate,
    first_index: usize,
    configs: &[String],
) -> Result<Vec<PathBuf>, MaterializeError> {
    let mut written = Vec::with_capacity(configs.len());
    for (offset, contents) in configs.iter().enumerate() {
        let dir = materializer.materialize(first_index + offset, template.copy_list())?;
        info!("Created config directory: {}", dir.display());
        write_config(&dir, template.output_file(), contents)?;
        written.push(dir);
    }
    Ok(written)
}

/// Enumerate all instances of `session` into configuration directories.
///
/// Takes the session by `&mut`, so at most one enumeration request is ever
/// outstanding.
pub fn enumerate<S: SolverSession>(
    session: &mut S,
    template: &dyn ConfigTemplate,
    n: usize,
    materializer: &Materializer,
) -> Result<EnumerationOutcome, DriverError> {
    let mut report = EnumerationReport::default();

    for next in session.instances() {
        let step = next.map_err(GenerateError::from).and_then(|instance| {
            report.instances += 1;
            info!("Instance {} found", report.instances);

            let configs = template.render(n, Some(&instance))?;
            let first_index = report.configs.len() + 1;
            Ok(write_configs(materializer, template, first_index, &configs)?)
        });

        match step {
            Ok(written) => report.configs.extend(written),
            Err(source) => return Err(DriverError { report, source }),
        }
    }

    if report.instances == 0 {
        info!("No satisfying instance found");
        return Ok(EnumerationOutcome::NoInstance);
    }

    info!(
        instances = report.instances,
        configs = report.configs.len(),
        "No more satisfying instances"
    );
    Ok(EnumerationOutcome::Exhausted {
        instances: report.instances,
        configs: report.configs,
    })
}
