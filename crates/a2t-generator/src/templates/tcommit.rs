//! Transaction commit: a single `TCommit.cfg` over resource managers `r1..rn`.

use a2t_core::{InstanceQuery, TlcConfig};

use super::{labels_for, ConfigTemplate, TemplateError};

const RM_LABELS: &[&str] = &[
    "r1", "r2", "r3", "r4", "r5", "r6", "r7", "r8", "r9", "r10", "r11", "r12", "r13", "r14",
    "r15", "r16", "r17", "r18", "r19", "r20",
];

/// Template for `TCommit.als`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TCommitTemplate;

/// TLC configuration for the given resource managers.
pub fn config(resource_managers: &[&str]) -> TlcConfig {
    TlcConfig::new()
        .constant_set("RM", resource_managers)
        .invariants(["TCTypeOK", "TCConsistent"])
        .specification("TCSpec")
        .without_deadlock_check()
}

impl ConfigTemplate for TCommitTemplate {
    fn name(&self) -> &'static str {
        "tcommit"
    }

    fn run_command(&self, n: usize) -> String {
        format!("run {{}} for exactly {} RM", n)
    }

    fn scope_block(&self) -> &'static str {
        "TCConsistent"
    }

    fn scope(&self, n: usize) -> String {
        format!("for exactly {} RM, 1..steps", n)
    }

    fn copy_list(&self) -> &'static [&'static str] {
        &["TCommit.tla"]
    }

    fn output_file(&self) -> &'static str {
        "TCommit.cfg"
    }

    fn max_n(&self) -> Option<usize> {
        Some(RM_LABELS.len())
    }

    fn enumerates(&self) -> bool {
        false
    }

    fn render(
        &self,
        n: usize,
        _instance: Option<&dyn InstanceQuery>,
    ) -> Result<Vec<String>, TemplateError> {
        let resource_managers = labels_for(self.name(), RM_LABELS, n)?;
        Ok(vec![config(resource_managers).render()])
    }
}
