//! Automaton intermediate representation for the lexgen backend.
//!
//! This crate defines the language-agnostic scanner description produced by
//! the grammar front-end: token tables, per-mode automata with capture and
//! mode-switch annotations, and the source-position types shared by the
//! runtime and the code generator. It has no lexgen-internal dependencies so
//! both halves of the system can consume it.

pub mod automaton;
pub mod codepoint;
pub mod document;
pub mod error;
pub mod limits;
pub mod position;
pub mod token_table;

// Re-export key types for library consumers
pub use automaton::{AcceptAction, Automaton, CodepointRange, Edge, ModeChange, State, StateId, Step};
pub use codepoint::{Codepoint, END_OF_STREAM};
pub use document::ScannerIr;
pub use error::IrError;
pub use position::{Position, Span};
pub use token_table::{TokenId, TokenTable};
