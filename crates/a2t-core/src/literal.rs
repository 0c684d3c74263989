//! TLA+ literal rendering for relations and groupings.
//!
//! Every function here is pure. Output ordering is fixed so that the same
//! instance always produces the same configuration text.

use std::collections::BTreeSet;

use thiserror::Error;

use crate::instance::{Grouping, Relation};

/// Join operator between TLA+ function overrides.
pub const OVERRIDE_JOIN: &str = " @@";

/// Literal rendering errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LiteralError {
    #[error("member index {index} has no label ({labels} labels available)")]
    LabelOutOfRange { index: usize, labels: usize },
}

/// `"a", "b", "c"`
pub fn quoted_list<S: AsRef<str>>(items: &[S]) -> String {
    items
        .iter()
        .map(|item| format!("\"{}\"", item.as_ref()))
        .collect::<Vec<_>>()
        .join(", ")
}

/// `a, b, c`
pub fn unquoted_list<S: AsRef<str>>(items: &[S]) -> String {
    items
        .iter()
        .map(|item| item.as_ref())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Render a relation as a dense boolean function over all label pairs.
///
/// One `<<"from", "to">> :> TRUE|FALSE` override per ordered pair, row-major,
/// chained with `@@`. Always `labels.len()²` entries, one per line.
pub fn dense_relation<S: AsRef<str>>(labels: &[S], relation: &Relation) -> String {
    let count = labels.len();
    let mut lines = Vec::with_capacity(count * count);

    for (i, from) in labels.iter().enumerate() {
        for (j, to) in labels.iter().enumerate() {
            let exists = relation.contains(&(i, j));
            let mut line = format!(
                "<<\"{}\", \"{}\">> :> {}",
                from.as_ref(),
                to.as_ref(),
                if exists { "TRUE" } else { "FALSE" }
            );
            if i + j < 2 * count - 2 {
                line.push_str(OVERRIDE_JOIN);
            }
            lines.push(line);
        }
    }

    debug_assert_eq!(lines.len(), count * count);
    lines.join("\n")
}

/// Render a grouping as comma-separated label sets, e.g. `{a1, a2}, {a3}`.
///
/// Groups come out in ascending key order. Labels inside a group are sorted
/// and duplicates collapse.
pub fn grouping_sets<S: AsRef<str>>(labels: &[S], grouping: &Grouping) -> Result<String, LiteralError> {
    let mut groups = Vec::with_capacity(grouping.len());

    for members in grouping.values() {
        let mut label_set = BTreeSet::new();
        for &index in members {
            let label = labels.get(index).ok_or(LiteralError::LabelOutOfRange {
                index,
                labels: labels.len(),
            })?;
            label_set.insert(label.as_ref());
        }
        groups.push(format!(
            "{{{}}}",
            label_set.into_iter().collect::<Vec<_>>().join(", ")
        ));
    }

    Ok(groups.join(", "))
}
