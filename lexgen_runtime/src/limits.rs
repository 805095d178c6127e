//! Hard bounds on per-scan resource usage.

/// Maximum number of characters buffered for one token. Reaching the
/// bound treats the remainder of the input as exhausted rather than
/// emitting a truncated token; an unterminated capturing construct
/// therefore ends the scan instead of growing without bound.
pub const MAX_TOKEN_LENGTH: usize = 4096;

/// Maximum depth of the lexical mode stack.
pub const MAX_MODE_DEPTH: usize = 256;
