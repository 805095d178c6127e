//! Per-mode finite automata with capture and mode-switch annotations.
//!
//! A state either shifts on a matching code point range, accepts with an
//! action, or rejects. Undefined transitions are not representable; the
//! `lookup` dispatch routes them to [`Step::Reject`], which keeps the
//! transition function total over every (state, code point) pair.

use crate::codepoint::Codepoint;
use crate::token_table::TokenId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Index of a state within one automaton. Opaque across automata.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default,
)]
#[serde(transparent)]
pub struct StateId(pub u32);

impl StateId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for StateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Inclusive code point interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodepointRange {
    pub first: Codepoint,
    pub last: Codepoint,
}

impl CodepointRange {
    pub fn new(first: Codepoint, last: Codepoint) -> Self {
        Self { first, last }
    }

    pub fn single(value: Codepoint) -> Self {
        Self {
            first: value,
            last: value,
        }
    }

    pub fn contains(&self, c: Codepoint) -> bool {
        c >= self.first && c <= self.last
    }

    pub fn is_single(&self) -> bool {
        self.first == self.last
    }
}

/// One outgoing transition: any code point inside `ranges` shifts to
/// `target`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    pub ranges: Vec<CodepointRange>,
    pub target: StateId,
}

impl Edge {
    pub fn matches(&self, c: Codepoint) -> bool {
        self.ranges.iter().any(|r| r.contains(c))
    }
}

/// Mode-stack instruction attached to an accepting state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ModeChange {
    /// Stay in the current mode.
    #[default]
    None,
    /// Suspend the current mode and enter the named one.
    Push(String),
    /// Leave the current mode and resume the enclosing one.
    Pop,
    /// Replace the current mode with the named one.
    Switch(String),
}

impl ModeChange {
    pub fn is_none(&self) -> bool {
        matches!(self, ModeChange::None)
    }

    /// Name of the mode this change enters, if any.
    pub fn target(&self) -> Option<&str> {
        match self {
            ModeChange::Push(name) | ModeChange::Switch(name) => Some(name),
            ModeChange::None | ModeChange::Pop => None,
        }
    }
}

/// What happens when an accepting state's lookahead does not extend the
/// current token.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AcceptAction {
    /// Token kind recognized by this state.
    pub token: TokenId,
    /// Whether the token kind retains its matched text.
    #[serde(default)]
    pub capture: bool,
    /// Whether the match is discarded instead of emitted.
    #[serde(default)]
    pub skip: bool,
    #[serde(default)]
    pub mode_change: ModeChange,
}

/// One automaton state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct State {
    #[serde(default)]
    pub edges: Vec<Edge>,
    #[serde(default)]
    pub accept: Option<AcceptAction>,
}

/// Result of a transition lookup. `Reject` is the automaton's invalid
/// state: every (state, code point) pair without an explicit edge or
/// accept action resolves here.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Step<'a> {
    Shift(StateId),
    Accept(&'a AcceptAction),
    Reject,
}

/// A finite automaton for one lexical mode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Automaton {
    pub initial_state: StateId,
    pub states: Vec<State>,
}

impl Automaton {
    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    pub fn state(&self, id: StateId) -> Option<&State> {
        self.states.get(id.index())
    }

    /// Total transition dispatch for one decoded code point. The
    /// end-of-stream sentinel never matches an edge, so at an accepting
    /// state it finalizes the token and everywhere else it rejects.
    pub fn lookup(&self, id: StateId, c: Codepoint) -> Step<'_> {
        let state = match self.state(id) {
            Some(state) => state,
            None => return Step::Reject,
        };
        for edge in &state.edges {
            if edge.matches(c) {
                return Step::Shift(edge.target);
            }
        }
        match &state.accept {
            Some(action) => Step::Accept(action),
            None => Step::Reject,
        }
    }
}
