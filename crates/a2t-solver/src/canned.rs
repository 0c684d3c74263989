//! Canned solver that replays a fixed list of instances.
//!
//! Used by tests and by offline runs that replay a previously recorded
//! enumeration (a JSON array of `InstanceSnapshot`s).

use std::collections::VecDeque;
use std::path::{Path, PathBuf};

use a2t_core::InstanceSnapshot;

use crate::session::{Solver, SolverError, SolverSession};

/// Command label reported by canned sessions.
pub const CANNED_COMMAND_LABEL: &str = "run$canned";

/// Solver that answers every command with the same instance list.
#[derive(Debug, Clone, Default)]
pub struct CannedSolver {
    instances: Vec<InstanceSnapshot>,
    fail_after: Option<usize>,
    rejection: Option<String>,
    executed: Vec<PathBuf>,
    inputs: Vec<String>,
}

impl CannedSolver {
    pub fn new(instances: Vec<InstanceSnapshot>) -> Self {
        Self {
            instances,
            ..Default::default()
        }
    }

    /// Solver with no models at all (every command is unsatisfiable).
    pub fn unsatisfiable() -> Self {
        Self::new(Vec::new())
    }

    /// Load a recorded enumeration from a JSON array of snapshots.
    pub fn from_json(json: &str) -> Result<Self, SolverError> {
        let instances: Vec<InstanceSnapshot> =
            serde_json::from_str(json).map_err(|e| SolverError::Protocol(e.to_string()))?;
        Ok(Self::new(instances))
    }

    /// Report a solver error after `count` instances have been produced.
    pub fn failing_after(mut self, count: usize) -> Self {
        self.fail_after = Some(count);
        self
    }

    /// Refuse every command with `message`, as for a specification that
    /// does not parse.
    pub fn rejecting(mut self, message: impl Into<String>) -> Self {
        self.rejection = Some(message.into());
        self
    }

    /// Specification paths passed to `execute`, in call order.
    pub fn executed(&self) -> &[PathBuf] {
        &self.executed
    }

    /// Specification text read at each `execute` call.
    pub fn inputs(&self) -> &[String] {
        &self.inputs
    }
}

impl Solver for CannedSolver {
    type Session = CannedSession;

    fn execute(&mut self, spec_path: &Path) -> Result<CannedSession, SolverError> {
        let text = std::fs::read_to_string(spec_path)?;
        self.executed.push(spec_path.to_path_buf());
        self.inputs.push(text);
        if let Some(ref message) = self.rejection {
            return Err(SolverError::Solver(message.clone()));
        }

        Ok(CannedSession {
            remaining: self.instances.iter().cloned().collect(),
            fail_after: self.fail_after,
            produced: 0,
        })
    }
}

/// Session over a canned instance list.
#[derive(Debug)]
pub struct CannedSession {
    remaining: VecDeque<InstanceSnapshot>,
    fail_after: Option<usize>,
    produced: usize,
}

impl SolverSession for CannedSession {
    type Instance = InstanceSnapshot;

    fn command_label(&self) -> &str {
        CANNED_COMMAND_LABEL
    }

    fn next_instance(&mut self) -> Result<Option<InstanceSnapshot>, SolverError> {
        if self.fail_after == Some(self.produced) {
            return Err(SolverError::Solver(format!(
                "canned failure after {} instances",
                self.produced
            )));
        }
        let next = self.remaining.pop_front();
        if next.is_some() {
            self.produced += 1;
        }
        Ok(next)
    }
}
