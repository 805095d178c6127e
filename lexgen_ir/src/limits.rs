//! Structural bounds enforced when validating an IR document.

/// Maximum number of token kinds in one document, reserved ids included.
/// Keeps the generated enum and name table a sane size.
pub const MAX_TOKEN_KINDS: usize = 1_024;

/// Maximum number of lexical modes in one document.
pub const MAX_MODES: usize = 64;

/// Maximum number of states a single mode's automaton may declare.
pub const MAX_STATES_PER_MODE: usize = 8_192;

/// Maximum identifier length for token and mode names.
/// Generated identifiers embed these names, so they stay bounded.
pub const MAX_NAME_LENGTH: usize = 128;
