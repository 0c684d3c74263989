//! # a2t-core
//!
//! Text and data primitives for turning Alloy instances into TLA+ models.
//!
//! This crate provides:
//! - `locate_block` / `change_block_scope` for rewriting the scope of an
//!   Alloy `check` block
//! - `InstanceQuery` and the extractors that recover index relations and
//!   groupings from a solved instance
//! - Literal renderers for dense boolean relations and label sets
//! - `TlcConfig` for TLC `.cfg` files
//!
//! Nothing here performs I/O; every renderer is a pure function of its inputs.

pub mod block;
pub mod instance;
pub mod literal;
pub mod tla_config;

pub use block::{
    change_block_scope, inject_scope, locate_block, BlockError, BlockHeader, BlockLocation,
};
pub use instance::{
    atom_index, extract_grouping, extract_pairs, extract_relation, AtomError, ExtractError,
    FieldSnapshot, Grouping, InstanceQuery, InstanceSnapshot, Relation, SignatureSnapshot, Tuple,
};
pub use literal::{dense_relation, grouping_sets, quoted_list, unquoted_list, LiteralError};
pub use tla_config::{CfgStatement, TlcConfig};
