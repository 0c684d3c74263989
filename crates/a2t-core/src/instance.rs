//! Solver instances and relational data extraction.
//!
//! The solver is an external collaborator. Everything this workspace needs
//! from a solved instance goes through [`InstanceQuery`]: list signatures,
//! list the fields of a signature, and evaluate a field to tuples of atoms.
//!
//! Atoms are identified by their printed names (`Node$0`, `Quorum$2`, ...).
//! The solver suffixes every atom with a zero-based ordinal, which is how
//! atoms are mapped back onto label indices.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

/// Set of `(from, to)` index pairs.
pub type Relation = BTreeSet<(usize, usize)>;

/// Group index to member indices.
pub type Grouping = BTreeMap<usize, Vec<usize>>;

/// Read-only view of one solved instance.
pub trait InstanceQuery {
    /// Names of all reachable signatures (e.g. `this/Node`).
    fn signatures(&self) -> Vec<String>;

    /// Labels of the fields declared on `signature`.
    fn fields(&self, signature: &str) -> Vec<String>;

    /// Tuples assigned to `signature.field`. Unknown names yield no tuples.
    fn eval(&self, signature: &str, field: &str) -> Vec<Tuple>;
}

/// A tuple of printed atom names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Tuple {
    pub atoms: Vec<String>,
}

impl Tuple {
    pub fn new<S: Into<String>>(atoms: impl IntoIterator<Item = S>) -> Self {
        Self {
            atoms: atoms.into_iter().map(Into::into).collect(),
        }
    }

    /// Atom at `position`, if the tuple is that wide.
    pub fn atom(&self, position: usize) -> Option<&str> {
        self.atoms.get(position).map(String::as_str)
    }

    pub fn arity(&self) -> usize {
        self.atoms.len()
    }
}

/// One field of a signature and its value in the instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldSnapshot {
    pub label: String,
    #[serde(default)]
    pub tuples: Vec<Tuple>,
}

/// One signature with its atoms and fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignatureSnapshot {
    pub name: String,
    #[serde(default)]
    pub atoms: Vec<String>,
    #[serde(default)]
    pub fields: Vec<FieldSnapshot>,
}

/// Owned, serializable instance.
///
/// This is the wire format of the solver bridge and the canned instance type
/// used by stub solvers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstanceSnapshot {
    #[serde(default)]
    pub signatures: Vec<SignatureSnapshot>,
}

impl InstanceSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add (or extend) `signature.field` with the given pairs of atoms.
    pub fn with_field<S: Into<String>>(
        mut self,
        signature: &str,
        field: &str,
        tuples: impl IntoIterator<Item = (S, S)>,
    ) -> Self {
        let tuples: Vec<Tuple> = tuples
            .into_iter()
            .map(|(from, to)| Tuple::new([from.into(), to.into()]))
            .collect();

        let sig = match self.signatures.iter().position(|s| s.name == signature) {
            Some(index) => &mut self.signatures[index],
            None => {
                self.signatures.push(SignatureSnapshot {
                    name: signature.to_string(),
                    atoms: Vec::new(),
                    fields: Vec::new(),
                });
                let last = self.signatures.len() - 1;
                &mut self.signatures[last]
            }
        };

        match sig.fields.iter_mut().find(|f| f.label == field) {
            Some(existing) => existing.tuples.extend(tuples),
            None => sig.fields.push(FieldSnapshot {
                label: field.to_string(),
                tuples,
            }),
        }
        self
    }

    fn signature(&self, name: &str) -> Option<&SignatureSnapshot> {
        self.signatures.iter().find(|s| s.name == name)
    }
}

impl InstanceQuery for InstanceSnapshot {
    fn signatures(&self) -> Vec<String> {
        self.signatures.iter().map(|s| s.name.clone()).collect()
    }

    fn fields(&self, signature: &str) -> Vec<String> {
        self.signature(signature)
            .map(|s| s.fields.iter().map(|f| f.label.clone()).collect())
            .unwrap_or_default()
    }

    fn eval(&self, signature: &str, field: &str) -> Vec<Tuple> {
        self.signature(signature)
            .and_then(|s| s.fields.iter().find(|f| f.label == field))
            .map(|f| f.tuples.clone())
            .unwrap_or_default()
    }
}

/// Atom naming errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AtomError {
    #[error("atom `{0}` does not end in a decimal ordinal")]
    MissingOrdinal(String),

    #[error("ordinal of atom `{0}` does not fit in usize")]
    OrdinalOverflow(String),
}

/// Extraction errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExtractError {
    #[error(transparent)]
    Atom(#[from] AtomError),

    #[error("tuple of {signature}.{field} has arity {arity}, expected at least 2")]
    Arity {
        signature: String,
        field: String,
        arity: usize,
    },
}

/// Index of an atom from the trailing digit run of its printed name.
///
/// `Node$12` → 12. Names without a trailing ordinal are rejected.
pub fn atom_index(atom: &str) -> Result<usize, AtomError> {
    let digits_start = atom
        .char_indices()
        .rev()
        .take_while(|(_, c)| c.is_ascii_digit())
        .last()
        .map(|(i, _)| i)
        .ok_or_else(|| AtomError::MissingOrdinal(atom.to_string()))?;

    atom[digits_start..]
        .parse()
        .map_err(|_| AtomError::OrdinalOverflow(atom.to_string()))
}

/// Index pairs of `signature.field`, in the order the instance reports them.
///
/// A signature or field missing from the instance yields an empty result.
pub fn extract_pairs(
    instance: &dyn InstanceQuery,
    signature: &str,
    field: &str,
) -> Result<Vec<(usize, usize)>, ExtractError> {
    if !instance.signatures().iter().any(|s| s == signature) {
        debug!(signature, "signature absent from instance");
        return Ok(Vec::new());
    }
    if !instance.fields(signature).iter().any(|f| f == field) {
        debug!(signature, field, "field absent from instance");
        return Ok(Vec::new());
    }

    let mut pairs = Vec::new();
    for tuple in instance.eval(signature, field) {
        let (Some(from), Some(to)) = (tuple.atom(0), tuple.atom(1)) else {
            return Err(ExtractError::Arity {
                signature: signature.to_string(),
                field: field.to_string(),
                arity: tuple.arity(),
            });
        };
        pairs.push((atom_index(from)?, atom_index(to)?));
    }
    Ok(pairs)
}

/// `signature.field` as a graph over atom indices.
pub fn extract_relation(
    instance: &dyn InstanceQuery,
    signature: &str,
    field: &str,
) -> Result<Relation, ExtractError> {
    Ok(extract_pairs(instance, signature, field)?.into_iter().collect())
}

/// `signature.field` as a grouping: first column is the group, second the member.
pub fn extract_grouping(
    instance: &dyn InstanceQuery,
    signature: &str,
    field: &str,
) -> Result<Grouping, ExtractError> {
    let mut grouping = Grouping::new();
    for (group, member) in extract_pairs(instance, signature, field)? {
        grouping.entry(group).or_default().push(member);
    }
    Ok(grouping)
}
