//! Renderer errors.
//!
//! Rendering is all-or-nothing: any of these aborts the whole unit set
//! before a single byte of output exists.

use crate::config::options::OptionsError;

#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("invalid IR document: {0}")]
    Ir(#[from] lexgen_ir::IrError),

    #[error("no binding for placeholder '${name}' in unit '{unit}' (line {line})")]
    UnknownPlaceholder {
        unit: String,
        name: String,
        line: usize,
    },

    #[error("invalid renderer options: {0}")]
    Options(#[from] OptionsError),

    #[error("{field} '{value}' is reserved in the {backend} backend")]
    ReservedIdentifier {
        backend: &'static str,
        field: &'static str,
        value: String,
    },

    #[error("the {backend} backend supports a single mode, but the document defines {count}")]
    ModesUnsupported { backend: &'static str, count: usize },

    #[error("the {backend} backend does not support mode-switching rules")]
    ModeChangesUnsupported { backend: &'static str },

    #[error("rendered unit '{unit}' is {size} bytes (max {limit})")]
    UnitTooLarge {
        unit: String,
        size: usize,
        limit: usize,
    },
}
