//! Validation errors for IR documents.

/// Errors raised while validating or deserializing a scanner description.
#[derive(Debug, thiserror::Error)]
pub enum IrError {
    #[error("document defines no token kinds")]
    NoTokens,

    #[error("too many token kinds: {count} (max {limit})")]
    TooManyTokens { count: usize, limit: usize },

    #[error("invalid token name: '{name}'")]
    InvalidTokenName { name: String },

    #[error("duplicate token name: '{name}'")]
    DuplicateTokenName { name: String },

    #[error("token name '{name}' collides with a reserved token id")]
    ReservedTokenName { name: String },

    #[error("document defines no modes")]
    NoModes,

    #[error("too many modes: {count} (max {limit})")]
    TooManyModes { count: usize, limit: usize },

    #[error("invalid mode name: '{name}'")]
    InvalidModeName { name: String },

    #[error("main mode '{name}' is not defined")]
    UnknownMainMode { name: String },

    #[error("mode '{mode}' references undefined mode '{target}'")]
    UnknownMode { mode: String, target: String },

    #[error("mode '{mode}' has too many states: {count} (max {limit})")]
    TooManyStates {
        mode: String,
        count: usize,
        limit: usize,
    },

    #[error("mode '{mode}' has no states")]
    EmptyAutomaton { mode: String },

    #[error("initial state {state} of mode '{mode}' is out of range")]
    InitialStateOutOfRange { mode: String, state: u32 },

    #[error("state {state} of mode '{mode}' targets out-of-range state {target}")]
    TargetOutOfRange {
        mode: String,
        state: u32,
        target: u32,
    },

    #[error("state {state} of mode '{mode}' has an inverted range {first}..{last}")]
    InvertedRange {
        mode: String,
        state: u32,
        first: i32,
        last: i32,
    },

    #[error("state {state} of mode '{mode}' has a negative range bound {first}")]
    NegativeRange {
        mode: String,
        state: u32,
        first: i32,
    },

    #[error("state {state} of mode '{mode}' accepts out-of-range token id {token}")]
    TokenOutOfRange {
        mode: String,
        state: u32,
        token: u32,
    },

    #[error("state {state} of mode '{mode}' accepts reserved token id {token}")]
    ReservedTokenAccept {
        mode: String,
        state: u32,
        token: u32,
    },

    #[error("token '{name}' has contradictory capture flags across accepting states")]
    InconsistentCapture { name: String },

    #[error("IR document is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}
