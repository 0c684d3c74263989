//! Echo algorithm: one `MCEcho.tla` per (instance, initiator).
//!
//! The node graph comes from `this/Node.neighbors`. Every node of the instance
//! is tried as the initiator, so one instance fans out to `n` configurations.

use a2t_core::{dense_relation, extract_relation, quoted_list, InstanceQuery};

use super::{labels_for, ConfigTemplate, TemplateError};

const NODE_LABELS: &[&str] = &["a", "b", "c", "d", "e", "f", "g", "h", "i", "j"];

const NODE_SIGNATURE: &str = "this/Node";
const NEIGHBORS_FIELD: &str = "neighbors";

/// Template for `Echo.als`.
#[derive(Debug, Clone, Copy, Default)]
pub struct EchoTemplate;

/// Render the `MCEcho` module for one graph and initiator.
pub fn render_module(nodes: &[&str], initiator: &str, edges: &str) -> String {
    format!(
        r#"---------- MODULE MCEcho ----------
EXTENDS Echo

N1 == {{{nodes}}}

I1 == "{initiator}"

R1 == (
{edges}
)

\* Print R and initiator to stdout at startup.
TestSpec == PrintT(R) /\ PrintT(initiator) /\ Spec        
===================================
"#,
        nodes = quoted_list(nodes),
        initiator = initiator,
        edges = edges,
    )
}

impl ConfigTemplate for EchoTemplate {
    fn name(&self) -> &'static str {
        "echo"
    }

    fn run_command(&self, n: usize) -> String {
        format!("run {{}} for exactly {} Node", n)
    }

    fn scope_block(&self) -> &'static str {
        "AncestorProperties"
    }

    fn scope(&self, n: usize) -> String {
        format!("for exactly {} Node, 1..steps", n)
    }

    fn copy_list(&self) -> &'static [&'static str] {
        &["Echo.tla", "Relation.tla", "MCEcho.cfg"]
    }

    fn output_file(&self) -> &'static str {
        "MCEcho.tla"
    }

    fn max_n(&self) -> Option<usize> {
        Some(NODE_LABELS.len())
    }

    fn render(
        &self,
        n: usize,
        instance: Option<&dyn InstanceQuery>,
    ) -> Result<Vec<String>, TemplateError> {
        let instance = instance.ok_or(TemplateError::MissingInstance(self.name()))?;
        let nodes = labels_for(self.name(), NODE_LABELS, n)?;
        let graph = extract_relation(instance, NODE_SIGNATURE, NEIGHBORS_FIELD)?;
        let edges = dense_relation(nodes, &graph);

        Ok(nodes
            .iter()
            .map(|initiator| render_module(nodes, initiator, &edges))
            .collect())
    }
}
