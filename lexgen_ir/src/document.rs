//! The scanner description document.
//!
//! `ScannerIr` is the structured input contract of the code generator and
//! the runtime: grammar-defined token names, one automaton per named mode,
//! and the designated main mode. Documents arrive as JSON and must pass
//! `validate` before anything consumes them.

use crate::automaton::Automaton;
use crate::error::IrError;
use crate::limits::{MAX_MODES, MAX_NAME_LENGTH, MAX_STATES_PER_MODE};
use crate::token_table::{is_identifier, TokenId, TokenTable};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A complete scanner description.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScannerIr {
    /// Grammar-defined token names, in ordinal order. Reserved ids are
    /// implicit and always precede these.
    pub tokens: Vec<String>,
    /// Name of the root mode, pushed exactly once at scanner construction.
    pub main_mode: String,
    /// Automata by mode name.
    pub modes: BTreeMap<String, Automaton>,
}

impl ScannerIr {
    /// Deserialize a JSON document. Structural validity is checked
    /// separately by [`ScannerIr::validate`].
    pub fn from_json(text: &str) -> Result<Self, IrError> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn to_json(&self) -> Result<String, IrError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Build the validated diagnostic name table for this document.
    pub fn token_table(&self) -> Result<TokenTable, IrError> {
        TokenTable::from_grammar_names(&self.tokens)
    }

    /// Per-token-kind capture predicate, indexed by token ordinal.
    /// Capture is a property of the token kind: contradictory flags
    /// across accepting states are a validation error. The reserved
    /// invalid-character id always captures (it carries the offending
    /// text); end-of-stream never does.
    pub fn capture_table(&self) -> Result<Vec<bool>, IrError> {
        let table = self.token_table()?;
        let mut captures = vec![false; table.len()];
        let mut decided = vec![false; table.len()];

        captures[TokenId::INVALID_CHARACTER.index()] = true;
        decided[TokenId::INVALID_CHARACTER.index()] = true;
        decided[TokenId::END_OF_STREAM.index()] = true;

        for automaton in self.modes.values() {
            for state in &automaton.states {
                let action = match &state.accept {
                    Some(action) => action,
                    None => continue,
                };
                let index = action.token.index();
                if index >= captures.len() {
                    continue; // out-of-range accepts are reported by validate()
                }
                if decided[index] && captures[index] != action.capture {
                    return Err(IrError::InconsistentCapture {
                        name: table
                            .name(action.token)
                            .unwrap_or_default()
                            .to_string(),
                    });
                }
                captures[index] = action.capture;
                decided[index] = true;
            }
        }

        Ok(captures)
    }

    pub fn mode(&self, name: &str) -> Option<&Automaton> {
        self.modes.get(name)
    }

    /// Resolve a mode name to the document's own key string. Lets
    /// borrowers hold mode names for as long as the document lives.
    pub fn mode_key(&self, name: &str) -> Option<&str> {
        self.modes.get_key_value(name).map(|(k, _)| k.as_str())
    }

    pub fn main(&self) -> Option<&Automaton> {
        self.modes.get(&self.main_mode)
    }

    /// Whether the document uses more than one lexical mode.
    pub fn is_multi_mode(&self) -> bool {
        self.modes.len() > 1
    }

    /// Validate the whole document: token table, mode inventory, and
    /// every automaton's internal references. A document that passes
    /// here can be scanned and rendered without further range checks.
    pub fn validate(&self) -> Result<(), IrError> {
        let table = self.token_table()?;

        if self.modes.is_empty() {
            return Err(IrError::NoModes);
        }
        if self.modes.len() > MAX_MODES {
            return Err(IrError::TooManyModes {
                count: self.modes.len(),
                limit: MAX_MODES,
            });
        }
        for name in self.modes.keys() {
            if !is_identifier(name) || name.len() > MAX_NAME_LENGTH {
                return Err(IrError::InvalidModeName { name: name.clone() });
            }
        }
        if !self.modes.contains_key(&self.main_mode) {
            return Err(IrError::UnknownMainMode {
                name: self.main_mode.clone(),
            });
        }

        for (name, automaton) in &self.modes {
            self.validate_automaton(name, automaton, &table)?;
        }

        self.capture_table()?;
        Ok(())
    }

    fn validate_automaton(
        &self,
        mode: &str,
        automaton: &Automaton,
        table: &TokenTable,
    ) -> Result<(), IrError> {
        if automaton.states.is_empty() {
            return Err(IrError::EmptyAutomaton {
                mode: mode.to_string(),
            });
        }
        if automaton.states.len() > MAX_STATES_PER_MODE {
            return Err(IrError::TooManyStates {
                mode: mode.to_string(),
                count: automaton.states.len(),
                limit: MAX_STATES_PER_MODE,
            });
        }
        if automaton.state(automaton.initial_state).is_none() {
            return Err(IrError::InitialStateOutOfRange {
                mode: mode.to_string(),
                state: automaton.initial_state.0,
            });
        }

        for (index, state) in automaton.states.iter().enumerate() {
            let state_id = index as u32;
            for edge in &state.edges {
                if automaton.state(edge.target).is_none() {
                    return Err(IrError::TargetOutOfRange {
                        mode: mode.to_string(),
                        state: state_id,
                        target: edge.target.0,
                    });
                }
                for range in &edge.ranges {
                    if range.first < 0 {
                        return Err(IrError::NegativeRange {
                            mode: mode.to_string(),
                            state: state_id,
                            first: range.first,
                        });
                    }
                    if range.first > range.last {
                        return Err(IrError::InvertedRange {
                            mode: mode.to_string(),
                            state: state_id,
                            first: range.first,
                            last: range.last,
                        });
                    }
                }
            }

            if let Some(action) = &state.accept {
                if !table.contains(action.token) {
                    return Err(IrError::TokenOutOfRange {
                        mode: mode.to_string(),
                        state: state_id,
                        token: action.token.0,
                    });
                }
                if action.token.is_reserved() {
                    return Err(IrError::ReservedTokenAccept {
                        mode: mode.to_string(),
                        state: state_id,
                        token: action.token.0,
                    });
                }
                if let Some(target) = action.mode_change.target() {
                    if !self.modes.contains_key(target) {
                        return Err(IrError::UnknownMode {
                            mode: mode.to_string(),
                            target: target.to_string(),
                        });
                    }
                }
            }
        }

        Ok(())
    }
}
