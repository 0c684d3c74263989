//! # a2t-solver
//!
//! Boundary to the constraint solver that produces Alloy instances.
//!
//! The solver runs out of process. This crate provides:
//! - `Solver` / `SolverSession`: execute a command, then pull models one at a
//!   time until the solver reports exhaustion
//! - `Instances`: the enumeration as a fused iterator
//! - `BridgeSolver`: JSON-lines protocol over a bridge subprocess
//! - `CannedSolver`: replays a fixed list of instances (tests, offline runs)
//!
//! Sessions are stateful cursors. Each call to `next_instance` mutates the
//! solver's enumeration state, so a session is driven through `&mut` only.

pub mod bridge;
pub mod canned;
pub mod session;

pub use bridge::{BridgeConfig, BridgeMessage, BridgeSession, BridgeSolver, JsonLinesSession};
pub use canned::{CannedSession, CannedSolver};
pub use session::{Instances, Solver, SolverError, SolverSession};
