//! Token identifiers and the immutable diagnostic name table.
//!
//! Token ids double as indices into a parallel name table used for
//! diagnostics. The table always leads with the two reserved ids, so a
//! grammar-defined token's ordinal is its document index plus two.

use crate::error::IrError;
use crate::limits::{MAX_NAME_LENGTH, MAX_TOKEN_KINDS};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of one token kind. Ordinal 0 and 1 are reserved.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default,
)]
#[serde(transparent)]
pub struct TokenId(pub u32);

impl TokenId {
    /// Reserved id emitted when a transition lookup resolves to the
    /// invalid state.
    pub const INVALID_CHARACTER: TokenId = TokenId(0);

    /// Reserved id emitted once the input is exhausted, and forever after.
    pub const END_OF_STREAM: TokenId = TokenId(1);

    /// Number of reserved ids preceding the grammar-defined ones.
    pub const RESERVED: usize = 2;

    /// Id of the nth grammar-defined token kind.
    pub fn grammar(index: usize) -> Self {
        TokenId((index + Self::RESERVED) as u32)
    }

    /// Ordinal of this id, usable as a name-table index.
    pub fn index(self) -> usize {
        self.0 as usize
    }

    pub fn is_reserved(self) -> bool {
        self.index() < Self::RESERVED
    }
}

impl fmt::Display for TokenId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Immutable mapping from token id to display name, validated at
/// construction so indexing is always in range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenTable {
    names: Vec<String>,
}

/// Display names of the reserved ids, in ordinal order.
pub const RESERVED_NAMES: [&str; TokenId::RESERVED] = ["InvalidCharacter", "EndOfStream"];

impl TokenTable {
    /// Build a table from the grammar-defined names of an IR document.
    /// The reserved names are prepended; the result is validated for
    /// identifier syntax, case-insensitive uniqueness, and size.
    pub fn from_grammar_names<S: AsRef<str>>(grammar_names: &[S]) -> Result<Self, IrError> {
        if grammar_names.is_empty() {
            return Err(IrError::NoTokens);
        }

        let count = grammar_names.len() + TokenId::RESERVED;
        if count > MAX_TOKEN_KINDS {
            return Err(IrError::TooManyTokens {
                count,
                limit: MAX_TOKEN_KINDS,
            });
        }

        let mut names: Vec<String> = Vec::with_capacity(count);
        names.extend(RESERVED_NAMES.iter().map(|s| s.to_string()));

        let mut seen: Vec<String> = RESERVED_NAMES.iter().map(|s| s.to_lowercase()).collect();
        for name in grammar_names {
            let name = name.as_ref();
            if !is_identifier(name) || name.len() > MAX_NAME_LENGTH {
                return Err(IrError::InvalidTokenName {
                    name: name.to_string(),
                });
            }
            let folded = name.to_lowercase();
            if RESERVED_NAMES.iter().any(|r| r.to_lowercase() == folded) {
                return Err(IrError::ReservedTokenName {
                    name: name.to_string(),
                });
            }
            if seen.contains(&folded) {
                return Err(IrError::DuplicateTokenName {
                    name: name.to_string(),
                });
            }
            seen.push(folded);
            names.push(name.to_string());
        }

        Ok(Self { names })
    }

    /// Total number of token kinds, reserved ids included.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Display name for an id; `None` when the id is out of range.
    pub fn name(&self, id: TokenId) -> Option<&str> {
        self.names.get(id.index()).map(String::as_str)
    }

    /// Whether an id falls inside the table.
    pub fn contains(&self, id: TokenId) -> bool {
        id.index() < self.names.len()
    }

    /// Iterate over grammar-defined ids with their names, in ordinal order.
    pub fn grammar_entries(&self) -> impl Iterator<Item = (TokenId, &str)> {
        self.names
            .iter()
            .enumerate()
            .skip(TokenId::RESERVED)
            .map(|(i, name)| (TokenId(i as u32), name.as_str()))
    }
}

/// Check that a name is usable as an identifier in generated code.
pub fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn reserved_ids_occupy_first_two_slots() {
        let table = TokenTable::from_grammar_names(&["ident", "plus"]).unwrap();
        assert_eq!(table.name(TokenId::INVALID_CHARACTER), Some("InvalidCharacter"));
        assert_eq!(table.name(TokenId::END_OF_STREAM), Some("EndOfStream"));
        assert_eq!(table.name(TokenId::grammar(0)), Some("ident"));
        assert_eq!(table.name(TokenId::grammar(1)), Some("plus"));
        assert_eq!(table.len(), 4);
    }

    #[test]
    fn out_of_range_lookup_is_none() {
        let table = TokenTable::from_grammar_names(&["ident"]).unwrap();
        assert_eq!(table.name(TokenId(99)), None);
        assert!(!table.contains(TokenId(99)));
    }

    #[test]
    fn rejects_duplicate_names_case_insensitively() {
        let err = TokenTable::from_grammar_names(&["Ident", "ident"]).unwrap_err();
        assert_matches!(err, IrError::DuplicateTokenName { .. });
    }

    #[test]
    fn rejects_reserved_collisions() {
        let err = TokenTable::from_grammar_names(&["endofstream"]).unwrap_err();
        assert_matches!(err, IrError::ReservedTokenName { .. });
    }

    #[test]
    fn rejects_non_identifier_names() {
        let err = TokenTable::from_grammar_names(&["1bad"]).unwrap_err();
        assert_matches!(err, IrError::InvalidTokenName { .. });
        let err = TokenTable::from_grammar_names(&["with space"]).unwrap_err();
        assert_matches!(err, IrError::InvalidTokenName { .. });
    }

    #[test]
    fn rejects_empty_grammar() {
        let names: [&str; 0] = [];
        assert_matches!(TokenTable::from_grammar_names(&names), Err(IrError::NoTokens));
    }

    #[test]
    fn grammar_entries_skip_reserved() {
        let table = TokenTable::from_grammar_names(&["ident", "plus"]).unwrap();
        let entries: Vec<_> = table.grammar_entries().collect();
        assert_eq!(entries, vec![(TokenId(2), "ident"), (TokenId(3), "plus")]);
    }
}
