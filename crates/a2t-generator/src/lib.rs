//! # a2t-generator
//!
//! Generate TLC model configurations from Alloy instances.
//!
//! This crate provides:
//! - Per-specification templates (Echo, Voting, Simple, TCommit)
//! - The enumeration driver: one numbered directory per rendered configuration
//! - The materializer that lays out those directories
//! - `Pipeline`, which ties scoping, solving and materialization together
//!
//! # Usage
//!
//! ```bash
//! # Enumerate Echo topologies with 3 nodes
//! cargo run -p a2t-generator -- specifications/echo/Echo.als 3
//!
//! # Explicit template and output root
//! cargo run -p a2t-generator -- --template paxos --out /tmp/voting Voting.als 3
//!
//! # Replay a recorded enumeration instead of starting the solver
//! cargo run -p a2t-generator -- --replay instances.json Echo.als 3
//! ```
//!
//! # Layout
//!
//! ```text
//! config_Echo_n03/
//! ├── Echo.als                 (scope-injected specification)
//! ├── config_Echo_n03_01/
//! │   ├── Echo.tla, Relation.tla, MCEcho.cfg
//! │   └── MCEcho.tla
//! ├── config_Echo_n03_02/
//! └── ...
//! ```

pub mod driver;
pub mod materialize;
pub mod pipeline;
pub mod templates;

pub use driver::{
    enumerate, write_configs, DriverError, EnumerationOutcome, EnumerationReport, GenerateError,
};
pub use materialize::{write_config, IndexStyle, MaterializeError, Materializer};
pub use pipeline::{output_dir_name, Pipeline, PipelineConfig, PipelineError, PipelineReport};
pub use templates::{
    infer_from_path, template_by_name, ConfigTemplate, EchoTemplate, SimpleTemplate,
    TCommitTemplate, TemplateError, VotingTemplate, TEMPLATE_NAMES,
};
