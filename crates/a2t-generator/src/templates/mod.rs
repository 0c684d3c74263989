//! Per-specification configuration templates.
//!
//! A template knows how to scope one Alloy specification to `n` objects and
//! how to turn a solved instance into the TLA+ files that model-check the same
//! system with TLC.
//!
//! | Template | Scoped block         | Output        | Enumerates |
//! |----------|----------------------|---------------|------------|
//! | Echo     | `AncestorProperties` | `MCEcho.tla`  | yes, one config per initiator |
//! | Voting   | `Inv`                | `MCVoting.tla`| yes        |
//! | Simple   | `Invariants`         | `Simple.cfg`  | no         |
//! | TCommit  | `TCConsistent`       | `TCommit.cfg` | no         |

use std::path::Path;

use a2t_core::{ExtractError, InstanceQuery, LiteralError};
use thiserror::Error;

pub mod echo;
pub mod simple;
pub mod tcommit;
pub mod voting;

pub use echo::EchoTemplate;
pub use simple::SimpleTemplate;
pub use tcommit::TCommitTemplate;
pub use voting::VotingTemplate;

/// Template rendering errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TemplateError {
    #[error("template {template} supports at most {max} objects, got {n}")]
    ScopeTooLarge {
        template: &'static str,
        n: usize,
        max: usize,
    },

    #[error("template {0} needs a solved instance to render")]
    MissingInstance(&'static str),

    #[error(transparent)]
    Extract(#[from] ExtractError),

    #[error(transparent)]
    Literal(#[from] LiteralError),
}

/// Scoping and rendering rules for one specification family.
pub trait ConfigTemplate {
    /// Short name used on the command line.
    fn name(&self) -> &'static str;

    /// Command appended to the specification for the solver run.
    fn run_command(&self, n: usize) -> String;

    /// Name of the `check` block whose scope is rewritten.
    fn scope_block(&self) -> &'static str;

    /// Scope injected after the block.
    fn scope(&self, n: usize) -> String;

    /// Support files copied into every configuration directory.
    fn copy_list(&self) -> &'static [&'static str];

    /// File name of the generated configuration.
    fn output_file(&self) -> &'static str;

    /// Largest supported `n`, if bounded by a fixed label set.
    fn max_n(&self) -> Option<usize> {
        None
    }

    /// Whether configurations come from enumerated instances. Templates that
    /// return `false` still have their command executed, then render once at
    /// index 1 whatever the solver found.
    fn enumerates(&self) -> bool {
        true
    }

    /// Render the configurations for one instance, in index order.
    fn render(
        &self,
        n: usize,
        instance: Option<&dyn InstanceQuery>,
    ) -> Result<Vec<String>, TemplateError>;

    /// Reject `n` outside the template's label range.
    fn check_scope(&self, n: usize) -> Result<(), TemplateError> {
        match self.max_n() {
            Some(max) if n > max => Err(TemplateError::ScopeTooLarge {
                template: self.name(),
                n,
                max,
            }),
            _ => Ok(()),
        }
    }
}

/// First `n` labels of a fixed label set.
pub(crate) fn labels_for(
    template: &'static str,
    labels: &'static [&'static str],
    n: usize,
) -> Result<&'static [&'static str], TemplateError> {
    labels.get(..n).ok_or(TemplateError::ScopeTooLarge {
        template,
        n,
        max: labels.len(),
    })
}

/// Names accepted by [`template_by_name`].
pub const TEMPLATE_NAMES: &[&str] = &["echo", "voting", "simple", "tcommit"];

/// Look up a template by name or alias (case-insensitive).
pub fn template_by_name(name: &str) -> Option<Box<dyn ConfigTemplate>> {
    match name.to_ascii_lowercase().as_str() {
        "echo" => Some(Box::new(EchoTemplate)),
        "voting" | "paxos" => Some(Box::new(VotingTemplate)),
        "simple" | "teachingconcurrency" | "learning_conc" => Some(Box::new(SimpleTemplate)),
        "tcommit" | "transaction_commit" => Some(Box::new(TCommitTemplate)),
        _ => None,
    }
}

/// Infer the template from a specification's file stem (`Echo.als` → echo).
pub fn infer_from_path(spec_path: &Path) -> Option<Box<dyn ConfigTemplate>> {
    spec_path
        .file_stem()
        .and_then(|stem| stem.to_str())
        .and_then(template_by_name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_template_by_name_and_alias() {
        assert_eq!(template_by_name("Echo").unwrap().name(), "echo");
        assert_eq!(template_by_name("paxos").unwrap().name(), "voting");
        assert_eq!(template_by_name("TeachingConcurrency").unwrap().name(), "simple");
        assert_eq!(template_by_name("transaction_commit").unwrap().name(), "tcommit");
        assert!(template_by_name("lamport_mutex").is_none());
    }

    #[test]
    fn test_every_listed_name_resolves() {
        for name in TEMPLATE_NAMES {
            assert_eq!(template_by_name(name).unwrap().name(), *name);
        }
    }

    #[test]
    fn test_infer_from_path() {
        let template = infer_from_path(Path::new("specifications/echo/Echo.als")).unwrap();
        assert_eq!(template.output_file(), "MCEcho.tla");
        assert_eq!(
            infer_from_path(Path::new("TCommit.als")).unwrap().output_file(),
            "TCommit.cfg"
        );
        assert!(infer_from_path(Path::new("Unknown.als")).is_none());
    }

    #[test]
    fn test_check_scope() {
        assert!(VotingTemplate.check_scope(4).is_ok());
        assert_eq!(
            VotingTemplate.check_scope(5),
            Err(TemplateError::ScopeTooLarge {
                template: "voting",
                n: 5,
                max: 4
            })
        );
        assert!(SimpleTemplate.check_scope(1000).is_ok());
    }
}
