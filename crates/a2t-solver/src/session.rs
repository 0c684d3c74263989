//! Solver and enumeration session traits.
//!
//! A session is a stateful cursor over the models of one executed command.
//! The first `next_instance` call yields the first model; every later call
//! asks the solver for a model different from all models produced so far
//! (`fork(-1)`). `Ok(None)` means the solver reported exhaustion.

use std::io;
use std::path::Path;

use a2t_core::InstanceQuery;
use thiserror::Error;

/// Solver errors.
#[derive(Debug, Error)]
pub enum SolverError {
    #[error("failed to start solver `{program}`")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("solver I/O error")]
    Io(#[from] io::Error),

    #[error("malformed solver message: {0}")]
    Protocol(String),

    #[error("solver closed its output before answering")]
    Closed,

    #[error("solver reported: {0}")]
    Solver(String),
}

/// Entry point of a constraint solver.
pub trait Solver {
    type Session: SolverSession;

    /// Parse the specification at `spec_path` and execute its last command.
    fn execute(&mut self, spec_path: &Path) -> Result<Self::Session, SolverError>;
}

/// Enumeration cursor over the models of one command.
pub trait SolverSession {
    type Instance: InstanceQuery;

    /// Label of the executed command (e.g. `run$1`).
    fn command_label(&self) -> &str;

    /// Next model, or `None` once the solver has no further models.
    fn next_instance(&mut self) -> Result<Option<Self::Instance>, SolverError>;

    /// Iterate the remaining models.
    fn instances(&mut self) -> Instances<'_, Self>
    where
        Self: Sized,
    {
        Instances {
            session: self,
            finished: false,
        }
    }
}

/// Lazy, finite, non-restartable sequence of models.
///
/// Fused: after exhaustion or the first error it yields `None` forever.
pub struct Instances<'a, S: SolverSession> {
    session: &'a mut S,
    finished: bool,
}

impl<S: SolverSession> Iterator for Instances<'_, S> {
    type Item = Result<S::Instance, SolverError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        match self.session.next_instance() {
            Ok(Some(instance)) => Some(Ok(instance)),
            Ok(None) => {
                self.finished = true;
                None
            }
            Err(e) => {
                self.finished = true;
                Some(Err(e))
            }
        }
    }
}

impl<S: SolverSession> std::iter::FusedIterator for Instances<'_, S> {}
