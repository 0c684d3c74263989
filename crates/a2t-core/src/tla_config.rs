//! TLC model configuration (`.cfg`) files.
//!
//! Statements are rendered one per line, in the order they were added, with
//! a leading and trailing newline:
//!
//! ```text
//!
//! CONSTANT N = 3
//! SPECIFICATION Spec
//! INVARIANTS PCorrect TypeOK Inv
//! ```

use std::fmt;

/// A single `.cfg` statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CfgStatement {
    /// `CONSTANT name = value`
    Constant { name: String, value: String },
    /// `SPECIFICATION name`
    Specification(String),
    /// `INVARIANTS a b c`
    Invariants(Vec<String>),
    /// `CHECK_DEADLOCK TRUE|FALSE`
    CheckDeadlock(bool),
}

impl fmt::Display for CfgStatement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CfgStatement::Constant { name, value } => write!(f, "CONSTANT {} = {}", name, value),
            CfgStatement::Specification(name) => write!(f, "SPECIFICATION {}", name),
            CfgStatement::Invariants(names) => write!(f, "INVARIANTS {}", names.join(" ")),
            CfgStatement::CheckDeadlock(check) => {
                write!(f, "CHECK_DEADLOCK {}", if *check { "TRUE" } else { "FALSE" })
            }
        }
    }
}

/// Ordered TLC configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TlcConfig {
    statements: Vec<CfgStatement>,
}

impl TlcConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// `CONSTANT name = value`
    pub fn constant(mut self, name: impl Into<String>, value: impl fmt::Display) -> Self {
        self.statements.push(CfgStatement::Constant {
            name: name.into(),
            value: value.to_string(),
        });
        self
    }

    /// `CONSTANT name = {a, b, c}`
    pub fn constant_set<S: AsRef<str>>(self, name: impl Into<String>, members: &[S]) -> Self {
        let value = format!("{{{}}}", crate::literal::unquoted_list(members));
        self.constant(name, value)
    }

    pub fn specification(mut self, name: impl Into<String>) -> Self {
        self.statements.push(CfgStatement::Specification(name.into()));
        self
    }

    pub fn invariants<S: Into<String>>(mut self, names: impl IntoIterator<Item = S>) -> Self {
        let names: Vec<String> = names.into_iter().map(Into::into).collect();
        debug_assert!(!names.is_empty(), "INVARIANTS needs at least one name");
        self.statements.push(CfgStatement::Invariants(names));
        self
    }

    /// `CHECK_DEADLOCK FALSE`
    pub fn without_deadlock_check(mut self) -> Self {
        self.statements.push(CfgStatement::CheckDeadlock(false));
        self
    }

    pub fn statements(&self) -> &[CfgStatement] {
        &self.statements
    }

    /// Render the configuration text.
    pub fn render(&self) -> String {
        let mut text = String::from("\n");
        for statement in &self.statements {
            text.push_str(&statement.to_string());
            text.push('\n');
        }
        text
    }
}
