//! Decoded character values.
//!
//! The runtime treats decoded values as opaque integral code points; no
//! normalization or range validation happens at this layer.

/// One decoded logical character.
pub type Codepoint = i32;

/// Sentinel code point produced once the underlying byte stream is
/// exhausted. Never matches any transition edge.
pub const END_OF_STREAM: Codepoint = -1;

/// Check whether a code point renders as printable ASCII in diagnostics.
pub fn is_printable_ascii(c: Codepoint) -> bool {
    c > 31 && c < 128
}
