//! Balanced-block scanning and scope injection for Alloy sources.
//!
//! An Alloy `check` command can carry an inline body followed by its scope:
//!
//! ```text
//! check Inv {
//!     all n: Node | n.ready
//! } for 5 but 1..steps
//! ```
//!
//! [`locate_block`] finds the body by its header and returns the exact byte
//! range of the braces. [`inject_scope`] then replaces whatever trails the
//! closing brace on that line with a new scope annotation.

use regex::Regex;
use thiserror::Error;
use tracing::{debug, warn};

/// Keyword used when no other header is configured.
pub const BLOCK_KEYWORD_DEFAULT: &str = "check";

/// Byte range of a brace-balanced block.
///
/// `start` points at the opening `{`, `end` is one past the matching `}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockLocation {
    pub start: usize,
    pub end: usize,
}

impl BlockLocation {
    /// The block text, braces included.
    pub fn slice<'a>(&self, text: &'a str) -> &'a str {
        &text[self.start..self.end]
    }
}

/// Block scanning errors.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BlockError {
    /// The block opened but its braces never balance before the text ends.
    #[error("unbalanced braces in block `{name}` opened at byte {open}: {depth} left unclosed")]
    Unbalanced {
        name: String,
        open: usize,
        depth: usize,
    },

    #[error("invalid block header pattern: {0}")]
    InvalidHeader(#[from] regex::Error),
}

/// Header pattern of a named block: `<keyword> <name> {`.
#[derive(Debug, Clone)]
pub struct BlockHeader {
    keyword: String,
}

impl Default for BlockHeader {
    fn default() -> Self {
        Self::new(BLOCK_KEYWORD_DEFAULT)
    }
}

impl BlockHeader {
    /// Header with a custom keyword (e.g. `run`, `pred`).
    pub fn new(keyword: impl Into<String>) -> Self {
        let keyword = keyword.into();
        debug_assert!(!keyword.is_empty(), "Block keyword must not be empty");
        Self { keyword }
    }

    fn pattern(&self, name: &str) -> Result<Regex, BlockError> {
        let source = format!(
            r"{}\s+{}\s*\{{",
            regex::escape(&self.keyword),
            regex::escape(name)
        );
        Ok(Regex::new(&source)?)
    }

    /// Locate the first block named `name` in `text`.
    ///
    /// Returns `Ok(None)` when no header matches.
    pub fn locate(&self, text: &str, name: &str) -> Result<Option<BlockLocation>, BlockError> {
        let Some(header) = self.pattern(name)?.find(text) else {
            return Ok(None);
        };

        let start = header.end() - 1;
        debug_assert_eq!(text.as_bytes()[start], b'{');

        let mut depth = 0usize;
        for (offset, byte) in text.as_bytes()[start..].iter().enumerate() {
            match byte {
                b'{' => depth += 1,
                b'}' => {
                    depth -= 1;
                    if depth == 0 {
                        return Ok(Some(BlockLocation {
                            start,
                            end: start + offset + 1,
                        }));
                    }
                }
                _ => {}
            }
        }

        Err(BlockError::Unbalanced {
            name: name.to_string(),
            open: start,
            depth,
        })
    }

    /// Rewrite the scope of the block named `name`. See [`change_block_scope`].
    pub fn change_scope(&self, text: &str, name: &str, scope: &str) -> String {
        match self.locate(text, name) {
            Ok(Some(location)) => {
                debug!(block = name, scope, "injecting scope");
                inject_scope(text, &location, scope)
            }
            Ok(None) => {
                debug!(block = name, "block not found, scope unchanged");
                text.to_string()
            }
            Err(e) => {
                warn!("SYNTAX ERROR: {e}");
                text.to_string()
            }
        }
    }
}

/// Locate the first `check <name> { ... }` block.
pub fn locate_block(text: &str, name: &str) -> Result<Option<BlockLocation>, BlockError> {
    BlockHeader::default().locate(text, name)
}

/// Put ` <scope>` right after the block, replacing the rest of that line.
pub fn inject_scope(text: &str, location: &BlockLocation, scope: &str) -> String {
    debug_assert!(location.end <= text.len());

    let line_end = text[location.end..]
        .find('\n')
        .map_or(text.len(), |offset| location.end + offset);

    let mut result = String::with_capacity(text.len() + scope.len() + 1);
    result.push_str(&text[..location.end]);
    result.push(' ');
    result.push_str(scope);
    result.push_str(&text[line_end..]);
    result
}

/// Rewrite the scope of the `check <name>` block.
///
/// Missing blocks and unbalanced braces leave `text` untouched; the latter is
/// reported through a warning.
pub fn change_block_scope(text: &str, name: &str, scope: &str) -> String {
    BlockHeader::default().change_scope(text, name, scope)
}
