//! Scanner runtime errors.

use lexgen_ir::IrError;

/// Errors raised while decoding the underlying byte stream.
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    #[error("malformed encoding: invalid lead byte 0x{byte:02x} at line {line}, column {column}")]
    InvalidLeadByte { byte: u8, line: u32, column: u32 },

    #[error(
        "malformed encoding: invalid continuation byte 0x{byte:02x} at line {line}, column {column}"
    )]
    InvalidContinuation { byte: u8, line: u32, column: u32 },

    #[error("malformed encoding: input ended inside a multi-byte sequence at line {line}, column {column}")]
    TruncatedSequence { line: u32, column: u32 },

    #[error("read failed at line {line}, column {column}: {source}")]
    Io {
        line: u32,
        column: u32,
        #[source]
        source: std::io::Error,
    },
}

/// Errors raised by the scanner execution engine. All variants are fatal
/// for the current scan: after returning one, the scanner keeps yielding
/// the end-of-stream token.
#[derive(Debug, thiserror::Error)]
pub enum ScanError {
    #[error("decode failed: {0}")]
    Decode(#[from] DecodeError),

    #[error("unbalanced mode nesting: cannot leave the root mode at line {line}, column {column}")]
    UnbalancedMode { line: u32, column: u32 },

    #[error(
        "unterminated mode '{mode}': input ended before the mode was left, at line {line}, column {column}"
    )]
    UnterminatedMode {
        mode: String,
        line: u32,
        column: u32,
    },

    #[error("mode stack depth exceeded ({limit}) at line {line}, column {column}")]
    ModeDepthExceeded { limit: usize, line: u32, column: u32 },

    #[error("invalid scanner description: {0}")]
    Ir(#[from] IrError),
}
