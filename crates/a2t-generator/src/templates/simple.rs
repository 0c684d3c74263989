//! Teaching-concurrency `Simple`: a single `Simple.cfg` with `N = n`.

use a2t_core::{InstanceQuery, TlcConfig};

use super::{ConfigTemplate, TemplateError};

/// Template for `Simple.als`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SimpleTemplate;

/// TLC configuration for `n` processes.
pub fn config(n: usize) -> TlcConfig {
    TlcConfig::new()
        .constant("N", n)
        .specification("Spec")
        .invariants(["PCorrect", "TypeOK", "Inv"])
}

impl ConfigTemplate for SimpleTemplate {
    fn name(&self) -> &'static str {
        "simple"
    }

    fn run_command(&self, n: usize) -> String {
        format!("run {{}} for exactly {} Process", n)
    }

    fn scope_block(&self) -> &'static str {
        "Invariants"
    }

    fn scope(&self, n: usize) -> String {
        format!("for exactly {} Process, 1..steps", n)
    }

    fn copy_list(&self) -> &'static [&'static str] {
        &["Simple.tla", "TLAPS.tla"]
    }

    fn output_file(&self) -> &'static str {
        "Simple.cfg"
    }

    fn enumerates(&self) -> bool {
        false
    }

    fn render(
        &self,
        n: usize,
        _instance: Option<&dyn InstanceQuery>,
    ) -> Result<Vec<String>, TemplateError> {
        Ok(vec![config(n).render()])
    }
}
