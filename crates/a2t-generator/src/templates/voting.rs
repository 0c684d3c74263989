//! Paxos voting: one `MCVoting.tla` per instance.
//!
//! Quorums come from `this/Quorum.nodes`, grouped by quorum atom. The acceptor
//! constants are fixed by the module header, so at most four acceptors.

use a2t_core::{extract_grouping, grouping_sets, unquoted_list, InstanceQuery};

use super::{labels_for, ConfigTemplate, TemplateError};

const ACCEPTOR_LABELS: &[&str] = &["a1", "a2", "a3", "a4"];

const QUORUM_SIGNATURE: &str = "this/Quorum";
const NODES_FIELD: &str = "nodes";

/// Template for `Voting.als`.
#[derive(Debug, Clone, Copy, Default)]
pub struct VotingTemplate;

/// Render the `MCVoting` module.
pub fn render_module(acceptors: &[&str], quorums: &str) -> String {
    format!(
        r#"------------------------------ MODULE MCVoting ------------------------------
EXTENDS Voting, TLC

CONSTANTS a1, a2, a3, a4  \* acceptors
CONSTANTS v1, v2      \* Values

MCAcceptor == {{{acceptors}}}
MCValue == {{v1, v2}}
MCQuorum == {{{quorums}}}
MCBallot == 0..1
MCSymmetry == Permutations(MCAcceptor) \cup Permutations(MCValue)
=============================================================================
"#,
        acceptors = unquoted_list(acceptors),
        quorums = quorums,
    )
}

impl ConfigTemplate for VotingTemplate {
    fn name(&self) -> &'static str {
        "voting"
    }

    fn run_command(&self, n: usize) -> String {
        format!(
            "run {{}} for exactly {n} Acceptor, exactly {n} Quorum, exactly 2 Value, 2 Ballot",
            n = n
        )
    }

    fn scope_block(&self) -> &'static str {
        "Inv"
    }

    fn scope(&self, n: usize) -> String {
        format!(
            "for exactly {n} Acceptor, exactly {n} Quorum, exactly 2 Value, 2 Ballot, 1..steps",
            n = n
        )
    }

    fn copy_list(&self) -> &'static [&'static str] {
        &["Voting.tla", "TLAPS.tla", "MCVoting.cfg"]
    }

    fn output_file(&self) -> &'static str {
        "MCVoting.tla"
    }

    fn max_n(&self) -> Option<usize> {
        Some(ACCEPTOR_LABELS.len())
    }

    fn render(
        &self,
        n: usize,
        instance: Option<&dyn InstanceQuery>,
    ) -> Result<Vec<String>, TemplateError> {
        let instance = instance.ok_or(TemplateError::MissingInstance(self.name()))?;
        let acceptors = labels_for(self.name(), ACCEPTOR_LABELS, n)?;
        let quorum = extract_grouping(instance, QUORUM_SIGNATURE, NODES_FIELD)?;
        let quorums = grouping_sets(acceptors, &quorum)?;

        Ok(vec![render_module(acceptors, &quorums)])
    }
}
